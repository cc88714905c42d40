// DataFrame implementation module
pub mod base;
pub mod groupby_agg;

pub use base::{DataFrame, Row};
pub use groupby_agg::{GroupByAggExt, GroupByAggOptions};
