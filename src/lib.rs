//! Grouped aggregation broadcast for pandas-like DataFrames
//!
//! [`GroupByAggExt::groupby_agg`] groups a [`DataFrame`], aggregates one
//! column per group and assigns the result, broadcast back onto every row
//! of the group, as a new column in a single chainable call.

pub mod column;
pub mod config;
pub mod dataframe;
pub mod error;
pub mod groupby;
pub mod io;
pub mod value;

// Re-export commonly used types
pub use column::{Column, ColumnType};
pub use config::{DeprecationNotice, GroupByAggConfig, LoadedConfig};
pub use dataframe::{DataFrame, GroupByAggExt, GroupByAggOptions, Row};
pub use error::{Error, Result};
pub use groupby::{AggFunc, Aggregation, GroupKeySpec, Grouping};
pub use value::Scalar;

// Export version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
