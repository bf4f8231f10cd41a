//! Healthboard Query Engine
//!
//! Turns a loaded dataset and a user selection into chart-ready series:
//!
//! - **Options**: distinct, sorted locations and topics
//! - **Selection**: the validated (location, topic) pair
//! - **Engine**: filter by selection and year range, stable sort by year
//! - **Projection**: extract named numeric series aligned with the years
//!
//! # Example
//!
//! ```rust
//! use healthboard::dataset::{Dataset, Record, SeriesSpec};
//! use healthboard::query::{project, QueryEngine, SelectionState};
//!
//! let dataset = Dataset::new(vec![
//!     Record::new("AL", "Obesity", 2012).with_value("value", 30.1),
//!     Record::new("AL", "Obesity", 2011).with_value("value", 29.4),
//! ])
//! .unwrap();
//!
//! let state = SelectionState::initialize(&dataset).unwrap();
//! let result = QueryEngine::default().query(&dataset, state.selection());
//! let projection = project(&result, &[SeriesSpec::new("Value", "value")]);
//!
//! assert_eq!(projection.years, vec![2011, 2012]);
//! ```

mod engine;
mod error;
mod options;
mod projection;
mod selection;

pub use engine::{query, QueryEngine, QueryOptions, QueryResult, YearRange};
pub use error::{Dimension, EngineResult, QueryError};
pub use options::FilterOptions;
pub use projection::{project, Projection, Series};
pub use selection::{Selection, SelectionState};
