//! Core data types for survey datasets
//!
//! This module defines the types shared by the loader and the query engine:
//! - `Record`: a single survey observation
//! - `Dataset`: the non-empty, immutable collection of records
//! - `FieldMapping` and `SeriesSpec`: which source fields carry what meaning

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::{LoadError, LoadResult};

/// What a projected series represents on a chart
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SeriesRole {
    /// Primary measurement (weighted data value, average indicator value)
    #[default]
    Value,
    /// Confidence limit around the primary measurement
    Bound,
    /// Number of respondents behind the measurement
    SampleSize,
}

impl std::fmt::Display for SeriesRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeriesRole::Value => write!(f, "value"),
            SeriesRole::Bound => write!(f, "bound"),
            SeriesRole::SampleSize => write!(f, "sample_size"),
        }
    }
}

/// A numeric field to extract from every queried record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeriesSpec {
    /// Display label for legends and table headers
    pub label: String,
    /// Source field name in the dataset
    pub field: String,
    #[serde(default)]
    pub role: SeriesRole,
}

impl SeriesSpec {
    /// Create a value series
    pub fn new(label: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            field: field.into(),
            role: SeriesRole::Value,
        }
    }

    /// Builder method: set the role
    pub fn role(mut self, role: SeriesRole) -> Self {
        self.role = role;
        self
    }
}

/// Names of the source fields a dashboard reads
///
/// Each dashboard variant publishes the same kind of data under different
/// field names; a mapping is what makes one engine serve all of them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldMapping {
    /// Categorical location field (e.g. `State`, `LocationDesc`)
    pub location: String,
    /// Categorical topic field (e.g. `Question`, `CDI_Topic`)
    pub topic: String,
    /// Integer year field (e.g. `Year`, `YearEnd`)
    pub year: String,
    /// Series projected for charts, in display order
    #[serde(default)]
    pub series: Vec<SeriesSpec>,
}

impl FieldMapping {
    /// Names accepted by [`FieldMapping::preset`]
    pub const PRESETS: &'static [&'static str] =
        &["nutrition", "chronic_disease", "nutrition_by_location"];

    /// Nutrition, physical activity and obesity survey (state/question/year)
    pub fn nutrition() -> Self {
        Self {
            location: "State".to_string(),
            topic: "Question".to_string(),
            year: "Year".to_string(),
            series: vec![
                SeriesSpec::new("Average Data Value", "Weighted_Data_Value"),
                SeriesSpec::new("Average Low Confidence Limit", "Weighted_Low_Confidence_Limit")
                    .role(SeriesRole::Bound),
                SeriesSpec::new(
                    "Average High Confidence Limit",
                    "Weighted_High_Confidence_Limit",
                )
                .role(SeriesRole::Bound),
                SeriesSpec::new("Total Sample Size", "Total_Sample_Size")
                    .role(SeriesRole::SampleSize),
            ],
        }
    }

    /// Chronic disease indicators, averaged per location/topic/year
    pub fn chronic_disease() -> Self {
        Self {
            location: "LocationDesc".to_string(),
            topic: "CDI_Topic".to_string(),
            year: "YearEnd".to_string(),
            series: vec![SeriesSpec::new("Avg CDI Data Value", "avg_CDI_DataValue")],
        }
    }

    /// Nutrition survey keyed by location description and year end
    pub fn nutrition_by_location() -> Self {
        Self {
            location: "LocationDesc".to_string(),
            topic: "Question".to_string(),
            year: "YearEnd".to_string(),
            series: vec![
                SeriesSpec::new("Data Value", "Weighted_Data_Value"),
                SeriesSpec::new("High Confidence Limit", "Weighted_High_Confidence_Limit")
                    .role(SeriesRole::Bound),
                SeriesSpec::new("Total Sample Size", "Total_Sample_Size")
                    .role(SeriesRole::SampleSize),
            ],
        }
    }

    /// Look up a preset by name
    pub fn preset(name: &str) -> Option<Self> {
        match name.to_lowercase().replace('-', "_").as_str() {
            "nutrition" => Some(Self::nutrition()),
            "chronic_disease" | "cdi" => Some(Self::chronic_disease()),
            "nutrition_by_location" => Some(Self::nutrition_by_location()),
            _ => None,
        }
    }
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self::nutrition()
    }
}

/// A single survey observation
///
/// The categorical and year fields are extracted once at load time; the raw
/// source object is kept so any configured measurement can be projected.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub location: String,
    pub topic: String,
    pub year: i32,
    fields: Map<String, Value>,
}

impl Record {
    /// Create a record with no measurement fields
    pub fn new(location: impl Into<String>, topic: impl Into<String>, year: i32) -> Self {
        Self {
            location: location.into(),
            topic: topic.into(),
            year,
            fields: Map::new(),
        }
    }

    /// Builder method: add a numeric measurement
    pub fn with_value(mut self, field: impl Into<String>, value: f64) -> Self {
        let number = serde_json::Number::from_f64(value)
            .map(Value::Number)
            .unwrap_or(Value::Null);
        self.fields.insert(field.into(), number);
        self
    }

    /// Builder method: add an arbitrary raw field
    pub fn with_field(mut self, field: impl Into<String>, value: Value) -> Self {
        self.fields.insert(field.into(), value);
        self
    }

    /// Build a record from a source object
    ///
    /// Returns `None` when the location, topic or year field is absent, null
    /// or of an unusable type.
    pub fn from_fields(fields: Map<String, Value>, mapping: &FieldMapping) -> Option<Self> {
        let location = categorical(fields.get(&mapping.location)?)?;
        let topic = categorical(fields.get(&mapping.topic)?)?;
        let year = parse_year(fields.get(&mapping.year)?)?;

        Some(Self {
            location,
            topic,
            year,
            fields,
        })
    }

    /// Get a raw source field
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Get a numeric measurement, if present and numeric
    pub fn value(&self, field: &str) -> Option<f64> {
        self.fields.get(field).and_then(parse_number)
    }

    /// All raw source fields, in source order
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

fn categorical(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn parse_year(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i32::try_from(i).ok()
            } else {
                let f = n.as_f64()?;
                // 2011.0 is a year, 2011.5 is not
                if f.fract() == 0.0 && f >= i32::MIN as f64 && f <= i32::MAX as f64 {
                    Some(f as i32)
                } else {
                    None
                }
            }
        }
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn parse_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

/// An immutable, non-empty collection of records
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<Record>,
    names: Option<Vec<String>>,
}

impl Dataset {
    /// Create a dataset, rejecting an empty record list
    pub fn new(records: Vec<Record>) -> LoadResult<Self> {
        if records.is_empty() {
            return Err(LoadError::Empty);
        }
        Ok(Self {
            records,
            names: None,
        })
    }

    /// Builder method: attach the sample names published alongside the records
    pub fn with_names(mut self, names: Vec<String>) -> Self {
        self.names = Some(names);
        self
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Sample identifiers from a `names` document, if the source had one
    pub fn names(&self) -> Option<&[String]> {
        self.names.as_deref()
    }

    /// Metadata panel for a location
    ///
    /// Lists every field of the first record for `location` with upper-cased
    /// keys, skipping the `_id` field.
    pub fn metadata_for(&self, location: &str) -> Option<Vec<(String, String)>> {
        let record = self.records.iter().find(|r| r.location == location)?;

        Some(
            record
                .fields()
                .iter()
                .filter(|(key, _)| key.as_str() != "_id")
                .map(|(key, value)| {
                    let text = match value {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    (key.to_uppercase(), text)
                })
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_record_from_fields() {
        let fields = object(json!({
            "State": "Alabama",
            "Question": "Percent of adults aged 18 years and older who have obesity",
            "Year": 2011,
            "Weighted_Data_Value": 32.0,
            "Total_Sample_Size": "7304"
        }));

        let record = Record::from_fields(fields, &FieldMapping::nutrition()).unwrap();
        assert_eq!(record.location, "Alabama");
        assert_eq!(record.year, 2011);
        assert_eq!(record.value("Weighted_Data_Value"), Some(32.0));
        assert_eq!(record.value("Total_Sample_Size"), Some(7304.0));
        assert_eq!(record.value("Weighted_Low_Confidence_Limit"), None);
    }

    #[test]
    fn test_record_rejects_null_keys() {
        let mapping = FieldMapping::nutrition();

        let no_state = object(json!({"State": null, "Question": "Q", "Year": 2011}));
        assert!(Record::from_fields(no_state, &mapping).is_none());

        let no_year = object(json!({"State": "AL", "Question": "Q"}));
        assert!(Record::from_fields(no_year, &mapping).is_none());

        let fractional_year = object(json!({"State": "AL", "Question": "Q", "Year": 2011.5}));
        assert!(Record::from_fields(fractional_year, &mapping).is_none());
    }

    #[test]
    fn test_year_parsing_variants() {
        let mapping = FieldMapping::chronic_disease();

        let float_year = object(json!({"LocationDesc": "Ohio", "CDI_Topic": "Asthma", "YearEnd": 2015.0}));
        assert_eq!(Record::from_fields(float_year, &mapping).unwrap().year, 2015);

        let string_year = object(json!({"LocationDesc": "Ohio", "CDI_Topic": "Asthma", "YearEnd": " 2016 "}));
        assert_eq!(Record::from_fields(string_year, &mapping).unwrap().year, 2016);
    }

    #[test]
    fn test_non_numeric_value_is_missing() {
        let record = Record::new("AL", "Obesity", 2012)
            .with_field("Weighted_Data_Value", json!("~"))
            .with_field("Total_Sample_Size", json!(null));

        assert_eq!(record.value("Weighted_Data_Value"), None);
        assert_eq!(record.value("Total_Sample_Size"), None);
    }

    #[test]
    fn test_dataset_rejects_empty() {
        assert!(matches!(Dataset::new(Vec::new()), Err(LoadError::Empty)));
    }

    #[test]
    fn test_metadata_panel() {
        let fields = object(json!({
            "_id": "65f0c1",
            "LocationDesc": "Guam",
            "Question": "Q",
            "YearEnd": 2013,
            "Weighted_Data_Value": 27.5
        }));
        let record = Record::from_fields(fields, &FieldMapping::nutrition_by_location()).unwrap();
        let dataset = Dataset::new(vec![record]).unwrap();

        let panel = dataset.metadata_for("Guam").unwrap();
        assert_eq!(
            panel,
            vec![
                ("LOCATIONDESC".to_string(), "Guam".to_string()),
                ("QUESTION".to_string(), "Q".to_string()),
                ("YEAREND".to_string(), "2013".to_string()),
                ("WEIGHTED_DATA_VALUE".to_string(), "27.5".to_string()),
            ]
        );
        assert!(dataset.metadata_for("Texas").is_none());
    }

    #[test]
    fn test_presets() {
        for name in FieldMapping::PRESETS {
            assert!(FieldMapping::preset(name).is_some(), "missing preset {}", name);
        }
        assert_eq!(FieldMapping::preset("CDI"), Some(FieldMapping::chronic_disease()));
        assert!(FieldMapping::preset("unknown").is_none());
    }
}
