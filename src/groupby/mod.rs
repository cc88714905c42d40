//! Row partitioning and group-wise transform
//!
//! [`Grouping`] splits the rows of a [`DataFrame`] into groups by a
//! [`GroupKeySpec`], then [`Grouping::transform`] reduces one column per
//! group and broadcasts the result back onto the rows.

mod aggregation;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::column::{Column, ColumnType};
use crate::dataframe::{DataFrame, Row};
use crate::error::{Error, Result};
use crate::value::Scalar;

pub use aggregation::{AggFunc, Aggregation, ReduceFn};

/// Function deriving a group key from a row
pub type KeyFn = dyn Fn(&Row<'_>) -> Result<Scalar> + Send + Sync;

/// What rows are grouped by
#[derive(Clone)]
pub enum GroupKeySpec {
    /// One or more column names; the key is the tuple of their values
    Columns(Vec<String>),
    /// A key computed from each row
    Derived(Arc<KeyFn>),
}

impl GroupKeySpec {
    pub fn derived<F>(func: F) -> Self
    where
        F: Fn(&Row<'_>) -> Result<Scalar> + Send + Sync + 'static,
    {
        GroupKeySpec::Derived(Arc::new(func))
    }

    /// Check that every referenced column exists
    pub fn validate(&self, df: &DataFrame) -> Result<()> {
        if let GroupKeySpec::Columns(columns) = self {
            if columns.is_empty() {
                return Err(Error::InvalidInput(
                    "grouping requires at least one column".to_string(),
                ));
            }
            for name in columns {
                df.column(name)?;
            }
        }
        Ok(())
    }

    fn evaluate(&self, df: &DataFrame) -> Result<Vec<GroupKey>> {
        match self {
            GroupKeySpec::Columns(names) => {
                let columns = names
                    .iter()
                    .map(|name| df.column(name))
                    .collect::<Result<Vec<_>>>()?;
                (0..df.row_count())
                    .map(|row| {
                        columns
                            .iter()
                            .map(|col| col.get_scalar(row))
                            .collect::<Result<Vec<_>>>()
                            .map(GroupKey)
                    })
                    .collect()
            }
            GroupKeySpec::Derived(func) => (0..df.row_count())
                .map(|row| -> Result<GroupKey> {
                    let row = df.row(row)?;
                    Ok(GroupKey(vec![func(&row)?]))
                })
                .collect(),
        }
    }
}

impl fmt::Debug for GroupKeySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKeySpec::Columns(columns) => f.debug_tuple("Columns").field(columns).finish(),
            GroupKeySpec::Derived(_) => f.write_str("Derived(<fn>)"),
        }
    }
}

impl From<&str> for GroupKeySpec {
    fn from(column: &str) -> Self {
        GroupKeySpec::Columns(vec![column.to_string()])
    }
}

impl From<String> for GroupKeySpec {
    fn from(column: String) -> Self {
        GroupKeySpec::Columns(vec![column])
    }
}

impl From<Vec<String>> for GroupKeySpec {
    fn from(columns: Vec<String>) -> Self {
        GroupKeySpec::Columns(columns)
    }
}

impl From<Vec<&str>> for GroupKeySpec {
    fn from(columns: Vec<&str>) -> Self {
        columns.as_slice().into()
    }
}

impl From<&[&str]> for GroupKeySpec {
    fn from(columns: &[&str]) -> Self {
        GroupKeySpec::Columns(columns.iter().map(|c| c.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for GroupKeySpec {
    fn from(columns: [&str; N]) -> Self {
        columns.as_slice().into()
    }
}

/// Evaluated key of one row
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey(pub Vec<Scalar>);

impl GroupKey {
    /// True when any component of the key is missing
    pub fn has_missing(&self) -> bool {
        self.0.iter().any(Scalar::is_missing)
    }
}

/// Rows of a DataFrame partitioned into groups
#[derive(Debug, Clone)]
pub struct Grouping {
    /// Group keys in order of first appearance
    keys: Vec<GroupKey>,
    /// Member rows of each group, ascending
    groups: Vec<Vec<usize>>,
    /// Group of each row, `None` for rows dropped by the missing-key policy
    membership: Vec<Option<usize>>,
}

impl Grouping {
    /// Partition the rows of `df`.
    ///
    /// With `dropna` set, rows whose key has a missing component belong to
    /// no group. Otherwise missing components compare equal to each other
    /// and those rows form groups like any other.
    pub fn new(df: &DataFrame, by: &GroupKeySpec, dropna: bool) -> Result<Self> {
        by.validate(df)?;

        let row_keys = by.evaluate(df)?;
        let mut index: HashMap<GroupKey, usize> = HashMap::new();
        let mut keys = Vec::new();
        let mut groups: Vec<Vec<usize>> = Vec::new();
        let mut membership = Vec::with_capacity(row_keys.len());

        for (row, key) in row_keys.into_iter().enumerate() {
            if dropna && key.has_missing() {
                membership.push(None);
                continue;
            }

            let group = match index.get(&key) {
                Some(&group) => group,
                None => {
                    let group = groups.len();
                    index.insert(key.clone(), group);
                    keys.push(key);
                    groups.push(Vec::new());
                    group
                }
            };
            groups[group].push(row);
            membership.push(Some(group));
        }

        Ok(Self {
            keys,
            groups,
            membership,
        })
    }

    pub fn ngroups(&self) -> usize {
        self.groups.len()
    }

    pub fn keys(&self) -> &[GroupKey] {
        &self.keys
    }

    /// Number of rows in each group, in group order
    pub fn group_sizes(&self) -> Vec<usize> {
        self.groups.iter().map(Vec::len).collect()
    }

    /// Rows that belong to no group
    pub fn excluded_rows(&self) -> Vec<usize> {
        self.membership
            .iter()
            .enumerate()
            .filter_map(|(row, group)| group.is_none().then_some(row))
            .collect()
    }

    /// Reduce `column` within each group, one value per group
    pub fn aggregate(&self, column: &Column, agg: &Aggregation) -> Result<Vec<Scalar>> {
        let agg = agg.resolve()?;
        check_compatible(column, &agg)?;
        self.reduce_groups(column, &agg)
    }

    /// Reduce `column` per group and broadcast each group's value to its
    /// rows. The result has one entry per row, in row order; rows outside
    /// every group get a missing value.
    pub fn transform(&self, column: &Column, agg: &Aggregation) -> Result<Column> {
        let agg = agg.resolve()?;
        let output_type = check_compatible(column, &agg)?;

        let per_group = self.reduce_groups(column, &agg)?;
        let broadcast: Vec<Scalar> = self
            .membership
            .iter()
            .map(|group| group.map_or(Scalar::Null, |g| per_group[g].clone()))
            .collect();

        let output_type = match output_type {
            Some(ty) => ty,
            None => infer_column_type(&broadcast, agg.label())?,
        };
        let column_name = column.name().unwrap_or_default().to_string();
        Column::from_scalars(column_name, &broadcast, output_type)
    }

    // `agg` must already be resolved and checked against `column`
    fn reduce_groups(&self, column: &Column, agg: &Aggregation) -> Result<Vec<Scalar>> {
        let input = column.column_type();
        let values = column.scalars()?;
        self.groups
            .iter()
            .map(|rows| {
                let group_values: Vec<Scalar> = rows.iter().map(|&r| values[r].clone()).collect();
                agg.reduce(&group_values, input)
            })
            .collect()
    }
}

/// Output type of a resolved named aggregation over `column`, `None` for a
/// custom reducer whose type is only known from its results
fn check_compatible(column: &Column, agg: &Aggregation) -> Result<Option<ColumnType>> {
    match agg {
        Aggregation::Func(func) => func
            .output_type(column.column_type())
            .map(Some)
            .ok_or_else(|| Error::IncompatibleAggregation {
                agg: func.name().to_string(),
                column: column.name().unwrap_or_default().to_string(),
                column_type: column.column_type(),
            }),
        _ => Ok(None),
    }
}

/// Column type able to hold every value; Float64 when all are missing
fn infer_column_type(values: &[Scalar], label: &str) -> Result<ColumnType> {
    let mut inferred: Option<ColumnType> = None;
    for ty in values.iter().filter(|v| !v.is_missing()).filter_map(Scalar::column_type) {
        inferred = match (inferred, ty) {
            (None, ty) => Some(ty),
            (Some(a), b) if a == b => Some(a),
            (Some(ColumnType::Int64), ColumnType::Float64)
            | (Some(ColumnType::Float64), ColumnType::Int64) => Some(ColumnType::Float64),
            (Some(a), b) => {
                return Err(Error::ComputationError(format!(
                    "aggregation '{}' returned mixed types {:?} and {:?}",
                    label, a, b
                )))
            }
        };
    }
    Ok(inferred.unwrap_or(ColumnType::Float64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::{Int64Column, StringColumn};

    fn keyed_frame() -> DataFrame {
        let mut df = DataFrame::new();
        df.add_column(
            "x",
            StringColumn::from_options(vec![
                Some("a".to_string()),
                Some("a".to_string()),
                None,
                Some("b".to_string()),
            ]),
        )
        .unwrap();
        df.add_column("y", Int64Column::new(vec![9, 9, 9, 9])).unwrap();
        df
    }

    #[test]
    fn test_groups_in_first_appearance_order() {
        let df = keyed_frame();
        let grouping = Grouping::new(&df, &"x".into(), false).unwrap();

        assert_eq!(grouping.ngroups(), 3);
        assert_eq!(grouping.group_sizes(), vec![2, 1, 1]);
        assert_eq!(grouping.keys()[0], GroupKey(vec![Scalar::from("a")]));
        assert!(grouping.keys()[1].has_missing());
        assert!(grouping.excluded_rows().is_empty());
    }

    #[test]
    fn test_dropna_excludes_missing_keys() {
        let df = keyed_frame();
        let grouping = Grouping::new(&df, &"x".into(), true).unwrap();

        assert_eq!(grouping.ngroups(), 2);
        assert_eq!(grouping.excluded_rows(), vec![2]);
    }

    #[test]
    fn test_transform_broadcasts() {
        let df = keyed_frame();
        let grouping = Grouping::new(&df, &"x".into(), true).unwrap();
        let out = grouping
            .transform(df.column("y").unwrap(), &AggFunc::Sum.into())
            .unwrap();

        assert_eq!(out.column_type(), ColumnType::Int64);
        assert_eq!(
            out.scalars().unwrap(),
            vec![Scalar::Int64(18), Scalar::Int64(18), Scalar::Null, Scalar::Int64(9)]
        );
    }

    #[test]
    fn test_unknown_column_and_empty_key_list() {
        let df = keyed_frame();
        assert!(matches!(
            Grouping::new(&df, &"nope".into(), true),
            Err(Error::ColumnNotFound(name)) if name == "nope"
        ));
        assert!(matches!(
            Grouping::new(&df, &GroupKeySpec::Columns(Vec::new()), true),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_incompatible_aggregation() {
        let df = keyed_frame();
        let grouping = Grouping::new(&df, &"y".into(), true).unwrap();
        let result = grouping.transform(df.column("x").unwrap(), &AggFunc::Mean.into());
        assert!(matches!(
            result,
            Err(Error::IncompatibleAggregation { column_type: ColumnType::String, .. })
        ));
    }

    #[test]
    fn test_aggregate_rejects_numeric_reduction_of_strings() {
        let df = keyed_frame();
        let grouping = Grouping::new(&df, &"y".into(), true).unwrap();
        let strings = df.column("x").unwrap();

        for func in [AggFunc::Sum, AggFunc::Mean] {
            assert!(matches!(
                grouping.aggregate(strings, &func.into()),
                Err(Error::IncompatibleAggregation { column_type: ColumnType::String, .. })
            ));
        }
        assert_eq!(
            grouping.aggregate(strings, &"nunique".into()).unwrap(),
            vec![Scalar::Int64(2)]
        );
    }

    #[test]
    fn test_custom_result_type_inference() {
        assert_eq!(
            infer_column_type(&[Scalar::Int64(1), Scalar::Float64(0.5)], "f").unwrap(),
            ColumnType::Float64
        );
        assert_eq!(infer_column_type(&[Scalar::Null], "f").unwrap(), ColumnType::Float64);
        assert!(infer_column_type(&[Scalar::Int64(1), Scalar::from("a")], "f").is_err());
    }
}
