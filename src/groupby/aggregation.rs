//! Aggregation vocabulary and per-group reductions

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::column::ColumnType;
use crate::error::{Error, Result};
use crate::value::Scalar;

/// Named aggregations understood by [`Aggregation`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggFunc {
    Sum,
    Prod,
    Mean,
    Median,
    Min,
    Max,
    /// Sample standard deviation (ddof = 1)
    Std,
    /// Sample variance (ddof = 1)
    Var,
    /// Non-missing values
    Count,
    /// Rows, missing values included
    Size,
    Nunique,
    First,
    Last,
}

impl AggFunc {
    pub const ALL: [AggFunc; 13] = [
        AggFunc::Sum,
        AggFunc::Prod,
        AggFunc::Mean,
        AggFunc::Median,
        AggFunc::Min,
        AggFunc::Max,
        AggFunc::Std,
        AggFunc::Var,
        AggFunc::Count,
        AggFunc::Size,
        AggFunc::Nunique,
        AggFunc::First,
        AggFunc::Last,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AggFunc::Sum => "sum",
            AggFunc::Prod => "prod",
            AggFunc::Mean => "mean",
            AggFunc::Median => "median",
            AggFunc::Min => "min",
            AggFunc::Max => "max",
            AggFunc::Std => "std",
            AggFunc::Var => "var",
            AggFunc::Count => "count",
            AggFunc::Size => "size",
            AggFunc::Nunique => "nunique",
            AggFunc::First => "first",
            AggFunc::Last => "last",
        }
    }

    /// Type of the aggregated value for an input column of `input` type,
    /// or `None` when the aggregation does not apply to that type
    pub fn output_type(&self, input: ColumnType) -> Option<ColumnType> {
        let numeric = matches!(
            input,
            ColumnType::Int64 | ColumnType::Float64 | ColumnType::Boolean
        );
        match self {
            AggFunc::Count | AggFunc::Size | AggFunc::Nunique => Some(ColumnType::Int64),
            AggFunc::Min | AggFunc::Max | AggFunc::First | AggFunc::Last => Some(input),
            AggFunc::Sum | AggFunc::Prod if numeric => match input {
                ColumnType::Float64 => Some(ColumnType::Float64),
                _ => Some(ColumnType::Int64),
            },
            AggFunc::Mean | AggFunc::Median | AggFunc::Std | AggFunc::Var if numeric => {
                Some(ColumnType::Float64)
            }
            _ => None,
        }
    }

    /// Reduce the values of one group taken from a column of `input` type.
    ///
    /// `values` holds every row of the group, missing ones as
    /// `Scalar::Null`. The caller has already checked `output_type`.
    pub fn reduce(&self, values: &[Scalar], input: ColumnType) -> Result<Scalar> {
        let present = || values.iter().filter(|v| !v.is_missing());

        let reduced = match self {
            AggFunc::Size => Scalar::Int64(to_i64(values.len())?),
            AggFunc::Count => Scalar::Int64(to_i64(present().count())?),
            AggFunc::Nunique => {
                let distinct: HashSet<&Scalar> = present().collect();
                Scalar::Int64(to_i64(distinct.len())?)
            }
            AggFunc::First => present().next().cloned().unwrap_or(Scalar::Null),
            AggFunc::Last => present().last().cloned().unwrap_or(Scalar::Null),
            AggFunc::Min => present()
                .min_by(|a, b| a.total_cmp(b))
                .cloned()
                .unwrap_or(Scalar::Null),
            AggFunc::Max => present()
                .max_by(|a, b| a.total_cmp(b))
                .cloned()
                .unwrap_or(Scalar::Null),
            AggFunc::Sum if input == ColumnType::Float64 => {
                Scalar::Float64(present().filter_map(Scalar::as_f64).sum())
            }
            AggFunc::Sum => {
                let total = present()
                    .filter_map(Scalar::as_i64)
                    .try_fold(0i64, |acc, v| acc.checked_add(v))
                    .ok_or_else(|| overflow("sum"))?;
                Scalar::Int64(total)
            }
            AggFunc::Prod if input == ColumnType::Float64 => {
                Scalar::Float64(present().filter_map(Scalar::as_f64).product())
            }
            AggFunc::Prod => {
                let total = present()
                    .filter_map(Scalar::as_i64)
                    .try_fold(1i64, |acc, v| acc.checked_mul(v))
                    .ok_or_else(|| overflow("prod"))?;
                Scalar::Int64(total)
            }
            AggFunc::Mean => {
                let numbers: Vec<f64> = present().filter_map(Scalar::as_f64).collect();
                mean(&numbers).map_or(Scalar::Null, Scalar::Float64)
            }
            AggFunc::Median => {
                let mut numbers: Vec<f64> = present().filter_map(Scalar::as_f64).collect();
                numbers.sort_by(f64::total_cmp);
                match numbers.len() {
                    0 => Scalar::Null,
                    n if n % 2 == 1 => Scalar::Float64(numbers[n / 2]),
                    n => Scalar::Float64((numbers[n / 2 - 1] + numbers[n / 2]) / 2.0),
                }
            }
            AggFunc::Var => {
                let numbers: Vec<f64> = present().filter_map(Scalar::as_f64).collect();
                sample_variance(&numbers).map_or(Scalar::Null, Scalar::Float64)
            }
            AggFunc::Std => {
                let numbers: Vec<f64> = present().filter_map(Scalar::as_f64).collect();
                sample_variance(&numbers).map_or(Scalar::Null, |v| Scalar::Float64(v.sqrt()))
            }
        };

        Ok(reduced)
    }
}

fn to_i64(n: usize) -> Result<i64> {
    num_traits::cast(n).ok_or_else(|| Error::ComputationError(format!("count {} overflows i64", n)))
}

fn overflow(op: &str) -> Error {
    Error::ComputationError(format!("integer overflow in {}", op))
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

fn sample_variance(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    Some(values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64)
}

impl fmt::Display for AggFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AggFunc {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let func = match s.trim().to_ascii_lowercase().as_str() {
            "sum" => AggFunc::Sum,
            "prod" | "product" => AggFunc::Prod,
            "mean" | "average" => AggFunc::Mean,
            "median" => AggFunc::Median,
            "min" => AggFunc::Min,
            "max" => AggFunc::Max,
            "std" => AggFunc::Std,
            "var" => AggFunc::Var,
            "count" => AggFunc::Count,
            "size" | "len" => AggFunc::Size,
            "nunique" | "n_unique" => AggFunc::Nunique,
            "first" => AggFunc::First,
            "last" => AggFunc::Last,
            _ => return Err(Error::UnknownAggregation(s.to_string())),
        };
        Ok(func)
    }
}

/// User supplied reduction over the values of one group
pub type ReduceFn = dyn Fn(&[Scalar]) -> Result<Scalar> + Send + Sync;

/// How each group is reduced to one value
#[derive(Clone)]
pub enum Aggregation {
    /// A name, resolved against [`AggFunc`] when the aggregation runs
    Named(String),
    Func(AggFunc),
    Custom {
        label: String,
        func: Arc<ReduceFn>,
    },
}

impl Aggregation {
    /// Wrap a custom reduction. `label` only shows up in logs and errors.
    pub fn custom<F>(label: impl Into<String>, func: F) -> Self
    where
        F: Fn(&[Scalar]) -> Result<Scalar> + Send + Sync + 'static,
    {
        Aggregation::Custom {
            label: label.into(),
            func: Arc::new(func),
        }
    }

    /// Resolve a name into an [`AggFunc`]; other variants pass through
    pub fn resolve(&self) -> Result<Aggregation> {
        match self {
            Aggregation::Named(name) => Ok(Aggregation::Func(name.parse()?)),
            other => Ok(other.clone()),
        }
    }

    /// Reduce the values of one group taken from a column of `input` type
    pub fn reduce(&self, values: &[Scalar], input: ColumnType) -> Result<Scalar> {
        match self {
            Aggregation::Named(name) => name.parse::<AggFunc>()?.reduce(values, input),
            Aggregation::Func(func) => func.reduce(values, input),
            Aggregation::Custom { func, .. } => func(values),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Aggregation::Named(name) => name,
            Aggregation::Func(func) => func.name(),
            Aggregation::Custom { label, .. } => label,
        }
    }
}

impl fmt::Debug for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Aggregation::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Aggregation::Func(func) => f.debug_tuple("Func").field(func).finish(),
            Aggregation::Custom { label, .. } => {
                f.debug_struct("Custom").field("label", label).finish_non_exhaustive()
            }
        }
    }
}

impl From<AggFunc> for Aggregation {
    fn from(func: AggFunc) -> Self {
        Aggregation::Func(func)
    }
}

impl From<&str> for Aggregation {
    fn from(name: &str) -> Self {
        Aggregation::Named(name.to_string())
    }
}

impl From<String> for Aggregation {
    fn from(name: String) -> Self {
        Aggregation::Named(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(values: &[Option<i64>]) -> Vec<Scalar> {
        values.iter().map(|v| Scalar::from(*v)).collect()
    }

    #[test]
    fn test_parse_names_and_aliases() {
        for func in AggFunc::ALL {
            assert_eq!(func.name().parse::<AggFunc>().unwrap(), func);
        }
        assert_eq!("MEAN".parse::<AggFunc>().unwrap(), AggFunc::Mean);
        assert_eq!("average".parse::<AggFunc>().unwrap(), AggFunc::Mean);
        assert_eq!("len".parse::<AggFunc>().unwrap(), AggFunc::Size);
        assert!(matches!(
            "mode".parse::<AggFunc>(),
            Err(Error::UnknownAggregation(name)) if name == "mode"
        ));
    }

    #[test]
    fn test_count_and_size_treat_missing_differently() {
        let values = ints(&[Some(1), None, Some(3)]);
        assert_eq!(AggFunc::Count.reduce(&values, ColumnType::Int64).unwrap(), Scalar::Int64(2));
        assert_eq!(AggFunc::Size.reduce(&values, ColumnType::Int64).unwrap(), Scalar::Int64(3));
    }

    #[test]
    fn test_numeric_reductions() {
        let values = ints(&[Some(100), Some(120), Some(200)]);
        assert_eq!(AggFunc::Mean.reduce(&values, ColumnType::Int64).unwrap(), Scalar::Float64(140.0));
        assert_eq!(AggFunc::Sum.reduce(&values, ColumnType::Int64).unwrap(), Scalar::Int64(420));
        assert_eq!(AggFunc::Median.reduce(&values, ColumnType::Int64).unwrap(), Scalar::Float64(120.0));
        assert_eq!(AggFunc::Min.reduce(&values, ColumnType::Int64).unwrap(), Scalar::Int64(100));
        assert_eq!(AggFunc::Max.reduce(&values, ColumnType::Int64).unwrap(), Scalar::Int64(200));
        assert_eq!(AggFunc::Var.reduce(&values, ColumnType::Int64).unwrap(), Scalar::Float64(2800.0));
    }

    #[test]
    fn test_empty_groups() {
        let values = ints(&[None, None]);
        assert_eq!(AggFunc::Mean.reduce(&values, ColumnType::Int64).unwrap(), Scalar::Null);
        assert_eq!(AggFunc::Sum.reduce(&values, ColumnType::Int64).unwrap(), Scalar::Int64(0));
        assert_eq!(AggFunc::First.reduce(&values, ColumnType::Int64).unwrap(), Scalar::Null);
        assert_eq!(AggFunc::Std.reduce(&ints(&[Some(1)]), ColumnType::Int64).unwrap(), Scalar::Null);
    }

    #[test]
    fn test_float_sum_and_prod_of_missing_group() {
        let values = vec![Scalar::Null, Scalar::Float64(f64::NAN)];
        assert_eq!(
            AggFunc::Sum.reduce(&values, ColumnType::Float64).unwrap(),
            Scalar::Float64(0.0)
        );
        assert_eq!(
            AggFunc::Prod.reduce(&values, ColumnType::Float64).unwrap(),
            Scalar::Float64(1.0)
        );
        assert_eq!(
            AggFunc::Prod.reduce(&values, ColumnType::Int64).unwrap(),
            Scalar::Int64(1)
        );
    }

    #[test]
    fn test_sum_overflow_is_an_error() {
        let values = ints(&[Some(i64::MAX), Some(1)]);
        assert!(matches!(
            AggFunc::Sum.reduce(&values, ColumnType::Int64),
            Err(Error::ComputationError(_))
        ));
    }

    #[test]
    fn test_output_types() {
        assert_eq!(AggFunc::Mean.output_type(ColumnType::String), None);
        assert_eq!(AggFunc::Sum.output_type(ColumnType::Boolean), Some(ColumnType::Int64));
        assert_eq!(AggFunc::Max.output_type(ColumnType::String), Some(ColumnType::String));
        assert_eq!(AggFunc::Count.output_type(ColumnType::String), Some(ColumnType::Int64));
    }

    #[test]
    fn test_resolve() {
        let agg = Aggregation::from("nunique").resolve().unwrap();
        assert!(matches!(agg, Aggregation::Func(AggFunc::Nunique)));
        assert!(Aggregation::from("bogus").resolve().is_err());
        assert_eq!(Aggregation::custom("range", |_| Ok(Scalar::Null)).label(), "range");
    }
}
