//! Chart renderers
//!
//! Terminal stand-ins for the charting library: each one draws a
//! [`ChartFrame`] onto a writer.

use serde::Serialize;
use std::io::Write;

use crate::chart::{ChartFrame, RenderError, RenderMode};

/// Draws chart frames
pub trait ChartRenderer {
    /// Draw `frame`, constructing a new chart or redrawing the existing one
    fn render(&mut self, frame: &ChartFrame, mode: RenderMode) -> Result<(), RenderError>;
}

/// Aligned text table, one row per year
pub struct TableRenderer<W: Write> {
    out: W,
}

impl<W: Write> TableRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ChartRenderer for TableRenderer<W> {
    fn render(&mut self, frame: &ChartFrame, mode: RenderMode) -> Result<(), RenderError> {
        if mode == RenderMode::Redraw {
            writeln!(self.out)?;
        }
        writeln!(self.out, "{}", frame.title)?;

        let widths: Vec<usize> = frame
            .datasets
            .iter()
            .map(|d| d.label.chars().count().max(10))
            .collect();

        // Header
        write!(self.out, "{:<6}", frame.x_label)?;
        for (dataset, width) in frame.datasets.iter().zip(&widths) {
            write!(self.out, " | {:<width$}", dataset.label, width = width)?;
        }
        writeln!(self.out)?;

        // Separator
        writeln!(
            self.out,
            "{}",
            "-".repeat(6 + widths.iter().map(|w| w + 3).sum::<usize>())
        )?;

        // Data rows
        for (idx, year) in frame.labels.iter().enumerate() {
            write!(self.out, "{:<6}", year)?;
            for (dataset, width) in frame.datasets.iter().zip(&widths) {
                let value = dataset.values[idx]
                    .map(|v| format!("{:.1}", v))
                    .unwrap_or_else(|| "-".to_string());
                write!(self.out, " | {:<width$}", value, width = width)?;
            }
            writeln!(self.out)?;
        }

        self.out.flush()?;
        Ok(())
    }
}

/// CSV with a `year` column followed by one column per dataset
pub struct CsvRenderer<W: Write> {
    out: W,
}

impl<W: Write> CsvRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ChartRenderer for CsvRenderer<W> {
    fn render(&mut self, frame: &ChartFrame, _mode: RenderMode) -> Result<(), RenderError> {
        let mut writer = csv::Writer::from_writer(&mut self.out);

        let mut header = vec!["year".to_string()];
        header.extend(frame.datasets.iter().map(|d| d.label.clone()));
        writer.write_record(&header)?;

        for (idx, year) in frame.labels.iter().enumerate() {
            let mut row = vec![year.to_string()];
            row.extend(frame.datasets.iter().map(|d| {
                d.values[idx]
                    .map(|v| format!("{:.2}", v))
                    .unwrap_or_default()
            }));
            writer.write_record(&row)?;
        }

        writer.flush()?;
        Ok(())
    }
}

/// One JSON document per frame
pub struct JsonRenderer<W: Write> {
    out: W,
    pretty: bool,
}

#[derive(Serialize)]
struct JsonFrame<'a> {
    mode: RenderMode,
    frame: &'a ChartFrame,
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, pretty: false }
    }

    /// Builder method: pretty-print output
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ChartRenderer for JsonRenderer<W> {
    fn render(&mut self, frame: &ChartFrame, mode: RenderMode) -> Result<(), RenderError> {
        let doc = JsonFrame { mode, frame };
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.out, &doc)?;
        } else {
            serde_json::to_writer(&mut self.out, &doc)?;
        }
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}

impl<R: ChartRenderer + ?Sized> ChartRenderer for Box<R> {
    fn render(&mut self, frame: &ChartFrame, mode: RenderMode) -> Result<(), RenderError> {
        (**self).render(frame, mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{ChartDataset, ChartKind};

    fn frame() -> ChartFrame {
        ChartFrame {
            kind: ChartKind::Line,
            title: "Obesity in AL".to_string(),
            x_label: "Year".to_string(),
            y_label: "Value".to_string(),
            labels: vec![2011, 2012],
            datasets: vec![ChartDataset {
                label: "Obesity in AL".to_string(),
                values: vec![Some(29.4), None],
                marker_sizes: None,
                hover: Vec::new(),
                incomplete: true,
            }],
        }
    }

    #[test]
    fn test_table_renderer() {
        let mut renderer = TableRenderer::new(Vec::new());
        renderer.render(&frame(), RenderMode::Construct).unwrap();

        let text = String::from_utf8(renderer.into_inner()).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "Obesity in AL");
        assert_eq!(lines[1], "Year   | Obesity in AL");
        assert_eq!(lines[3], "2011   | 29.4         ");
        assert_eq!(lines[4], "2012   | -            ");
    }

    #[test]
    fn test_table_aligns_non_ascii_labels() {
        let mut frame = frame();
        frame.datasets[0].label = "Guam – Ñandú sample".to_string();

        let mut renderer = TableRenderer::new(Vec::new());
        renderer.render(&frame, RenderMode::Construct).unwrap();

        let text = String::from_utf8(renderer.into_inner()).unwrap();
        let widths: Vec<_> = text.lines().skip(1).map(|l| l.chars().count()).collect();
        assert_eq!(widths.len(), 4);
        assert!(widths.iter().all(|w| *w == widths[0]), "{:?}", widths);
    }

    #[test]
    fn test_csv_renderer() {
        let mut renderer = CsvRenderer::new(Vec::new());
        renderer.render(&frame(), RenderMode::Construct).unwrap();

        let text = String::from_utf8(renderer.into_inner()).unwrap();
        assert_eq!(text, "year,Obesity in AL\n2011,29.40\n2012,\n");
    }

    #[test]
    fn test_json_renderer_marks_mode() {
        let mut renderer = JsonRenderer::new(Vec::new());
        renderer.render(&frame(), RenderMode::Redraw).unwrap();

        let text = String::from_utf8(renderer.into_inner()).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(doc["mode"], "redraw");
        assert_eq!(doc["frame"]["kind"], "line");
        assert_eq!(doc["frame"]["datasets"][0]["values"][1], serde_json::Value::Null);
    }
}
