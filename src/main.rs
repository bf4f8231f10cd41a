//! Healthboard CLI
//!
//! Command-line front end for the survey dashboards:
//! - List filter options
//! - Query a (location, topic) selection and draw it
//! - Show the info and metadata panels
//! - Write a default config file

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use healthboard::chart::{
    ChartBinding, ChartKind, ChartRenderer, CsvRenderer, JsonRenderer, TableRenderer,
};
use healthboard::config::{generate_default_config, Config, LoggingConfig};
use healthboard::dataset::{DatasetLoader, DatasetSource};
use healthboard::query::FilterOptions;
use healthboard::session::{ChartUpdate, DashboardObserver, DashboardSession, LogObserver};

#[derive(Parser)]
#[command(name = "healthboard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Query and chart public-health survey datasets")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: ~/.config/healthboard/config.toml or ./healthboard.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Dataset file path or URL
    #[arg(short, long, global = true)]
    pub dataset: Option<String>,

    /// Field mapping preset (nutrition, chronic_disease, nutrition_by_location)
    #[arg(short, long, global = true)]
    pub preset: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the locations and topics in the dataset
    Options,

    /// Query a selection and draw the chart
    Query {
        /// Location (default: first location)
        #[arg(short, long)]
        location: Option<String>,
        /// Topic (default: first topic)
        #[arg(short, long)]
        topic: Option<String>,
        /// Earliest year (inclusive)
        #[arg(long)]
        from: Option<i32>,
        /// Latest year (inclusive)
        #[arg(long)]
        to: Option<i32>,
        /// Chart type (bar, line, bubble)
        #[arg(long)]
        chart: Option<String>,
        /// Output format (table, csv, json)
        #[arg(short, long)]
        format: Option<String>,
    },

    /// Show the info panel for the earliest record of a selection
    Summary {
        #[arg(short, long)]
        location: Option<String>,
        #[arg(short, long)]
        topic: Option<String>,
    },

    /// Show the metadata panel for a location
    Metadata {
        #[arg(short, long)]
        location: String,
    },

    /// Write the default configuration
    Config {
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Config { output } = &cli.command {
        return write_default_config(output.as_ref());
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default()?,
    };
    if let Some(dataset) = &cli.dataset {
        config.dataset.source = dataset.clone();
    }
    if let Some(preset) = &cli.preset {
        config.dataset.preset = preset.clone();
        config.fields = None;
    }

    init_logging(&config.logging)?;
    tracing::debug!("Healthboard v{}", env!("CARGO_PKG_VERSION"));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start runtime")?;

    runtime.block_on(run(cli.command, config))
}

async fn run(command: Commands, mut config: Config) -> anyhow::Result<()> {
    let loader = DatasetLoader::new(config.field_mapping()?).with_timeout(config.request_timeout());
    let source = config.dataset_source();

    match command {
        Commands::Options => {
            let session = open(&loader, &source, &config, LogObserver).await?;
            print_options(session.options());
            if let Some(names) = session.dataset().names() {
                println!();
                println!("Names: {}", names.join(", "));
            }
        }

        Commands::Query {
            location,
            topic,
            from,
            to,
            chart,
            format,
        } => {
            if from.is_some() || to.is_some() {
                config.query.year_min = from.or(config.query.year_min);
                config.query.year_max = to.or(config.query.year_max);
            }
            if let Some(chart) = chart {
                config.chart.kind = match ChartKind::from_str(&chart) {
                    Some(kind) => kind,
                    None => bail!("Unknown chart type: {} (expected bar, line or bubble)", chart),
                };
            }
            let format = format.unwrap_or_else(|| config.chart.format.clone());

            let binding = ChartBinding::new(config.chart.kind, renderer(&format)?);
            let mut session = open(&loader, &source, &config, binding).await?;

            let outcome = select(&mut session, location, topic).map(|_| ());
            for notification in session.observer_mut().take_notifications() {
                eprintln!("{}", notification);
            }
            outcome?;
        }

        Commands::Summary { location, topic } => {
            let mut session = open(&loader, &source, &config, LogObserver).await?;
            let update = select(&mut session, location, topic)?;
            print_rows(&update.summary.rows());
        }

        Commands::Metadata { location } => {
            let session = open(&loader, &source, &config, LogObserver).await?;
            match session.dataset().metadata_for(&location) {
                Some(rows) => print_rows(&rows),
                None => bail!("No records for location: {}", location),
            }
        }

        Commands::Config { output } => write_default_config(output.as_ref())?,
    }

    Ok(())
}

async fn open<O: DashboardObserver>(
    loader: &DatasetLoader,
    source: &DatasetSource,
    config: &Config,
    observer: O,
) -> anyhow::Result<DashboardSession<O>> {
    let session = DashboardSession::open(loader, source, config.query_options()?, observer)
        .await
        .with_context(|| format!("Failed to open dataset {}", source))?;
    Ok(session)
}

/// Select the requested values, defaulting to the current selection
fn select<O: DashboardObserver>(
    session: &mut DashboardSession<O>,
    location: Option<String>,
    topic: Option<String>,
) -> anyhow::Result<&ChartUpdate> {
    let current = session.selection().clone();
    let location = location.unwrap_or(current.location);
    let topic = topic.unwrap_or(current.topic);

    Ok(session.select(&location, &topic)?)
}

fn renderer(format: &str) -> anyhow::Result<Box<dyn ChartRenderer>> {
    let out = std::io::stdout();
    let renderer: Box<dyn ChartRenderer> = match format.to_lowercase().as_str() {
        "table" => Box::new(TableRenderer::new(out)),
        "csv" => Box::new(CsvRenderer::new(out)),
        "json" => Box::new(JsonRenderer::new(out).pretty(true)),
        other => bail!("Unknown output format: {} (expected table, csv or json)", other),
    };
    Ok(renderer)
}

fn init_logging(logging: &LoggingConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("healthboard={}", logging.level)));

    let (pretty, json) = if logging.format.eq_ignore_ascii_case("json") {
        (
            None,
            Some(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)),
        )
    } else {
        (
            Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
            None,
        )
    };

    let file = match &logging.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(pretty)
        .with(json)
        .with(file)
        .init();

    Ok(())
}

fn write_default_config(output: Option<&PathBuf>) -> anyhow::Result<()> {
    let content = generate_default_config();
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Wrote default config to {}", path.display());
        }
        None => print!("{}", content),
    }
    Ok(())
}

fn print_options(options: &FilterOptions) {
    println!("Locations ({}):", options.locations().len());
    for location in options.locations() {
        println!("  {}", location);
    }
    println!();
    println!("Topics ({}):", options.topics().len());
    for topic in options.topics() {
        println!("  {}", topic);
    }
}

fn print_rows(rows: &[(String, String)]) {
    let width = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0).max(12);
    for (key, value) in rows {
        println!("{:<width$} | {}", key, value, width = width);
    }
}
