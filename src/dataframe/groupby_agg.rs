//! Fluent grouped aggregation assignment
//!
//! `df.groupby_agg(by, new_column_name, agg_column_name, agg, dropna)` is
//! the one-call form of grouping `df` by `by`, transforming
//! `agg_column_name` with `agg`, and assigning the broadcast result to
//! `new_column_name`.

use crate::dataframe::base::DataFrame;
use crate::error::Result;
use crate::groupby::{Aggregation, GroupKeySpec, Grouping};

/// Options for [`GroupByAggExt::groupby_agg_with`]
#[derive(Debug, Clone)]
pub struct GroupByAggOptions {
    pub by: GroupKeySpec,
    pub new_column_name: String,
    pub agg_column_name: String,
    pub agg: Aggregation,
    /// Exclude rows with a missing key from aggregation (default `true`)
    pub dropna: bool,
}

impl GroupByAggOptions {
    pub fn new(
        by: impl Into<GroupKeySpec>,
        new_column_name: impl Into<String>,
        agg_column_name: impl Into<String>,
        agg: impl Into<Aggregation>,
    ) -> Self {
        Self {
            by: by.into(),
            new_column_name: new_column_name.into(),
            agg_column_name: agg_column_name.into(),
            agg: agg.into(),
            dropna: true,
        }
    }

    pub fn dropna(mut self, dropna: bool) -> Self {
        self.dropna = dropna;
        self
    }
}

/// Extension trait adding `groupby_agg` to DataFrame
pub trait GroupByAggExt {
    /// Assign a group-wise aggregation of `agg_column_name` to
    /// `new_column_name`.
    ///
    /// Every row receives the aggregate of the group it belongs to, so the
    /// result has the same rows, in the same order, as `self`. With
    /// `dropna` set, rows whose key is missing get a missing value;
    /// otherwise those rows are aggregated as a group of their own. An
    /// existing `new_column_name` column is overwritten. `self` is never
    /// modified.
    ///
    /// # Example
    /// ```ignore
    /// use pandrs_groupagg::GroupByAggExt;
    ///
    /// let out = df.groupby_agg("item", "avg_quantity", "quantity", "mean", true)?;
    /// ```
    fn groupby_agg(
        &self,
        by: impl Into<GroupKeySpec>,
        new_column_name: &str,
        agg_column_name: &str,
        agg: impl Into<Aggregation>,
        dropna: bool,
    ) -> Result<DataFrame>;

    /// Same as [`GroupByAggExt::groupby_agg`], taking prepared options
    fn groupby_agg_with(&self, options: &GroupByAggOptions) -> Result<DataFrame>;
}

impl GroupByAggExt for DataFrame {
    fn groupby_agg(
        &self,
        by: impl Into<GroupKeySpec>,
        new_column_name: &str,
        agg_column_name: &str,
        agg: impl Into<Aggregation>,
        dropna: bool,
    ) -> Result<DataFrame> {
        let options = GroupByAggOptions::new(by, new_column_name, agg_column_name, agg)
            .dropna(dropna);
        self.groupby_agg_with(&options)
    }

    fn groupby_agg_with(&self, options: &GroupByAggOptions) -> Result<DataFrame> {
        // Reject bad input before any grouping work
        let source = self.column(&options.agg_column_name)?;
        let agg = options.agg.resolve()?;
        options.by.validate(self)?;

        let grouping = Grouping::new(self, &options.by, options.dropna)?;
        log::debug!(
            "groupby_agg: {} rows into {} groups ({} excluded), {}({}) -> {}",
            self.row_count(),
            grouping.ngroups(),
            grouping.excluded_rows().len(),
            agg.label(),
            options.agg_column_name,
            options.new_column_name
        );

        let broadcast = grouping.transform(source, &agg)?;
        self.assign(options.new_column_name.as_str(), broadcast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::{ColumnType, Int64Column, StringColumn};
    use crate::error::Error;
    use crate::groupby::AggFunc;
    use crate::value::Scalar;

    fn items() -> DataFrame {
        let mut df = DataFrame::new();
        df.add_column(
            "item",
            StringColumn::new(
                ["shoe", "shoe", "bag", "shoe", "bag"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            ),
        )
        .unwrap();
        df.add_column("quantity", Int64Column::new(vec![100, 120, 75, 200, 25]))
            .unwrap();
        df
    }

    #[test]
    fn test_mean_per_item() {
        let df = items();
        let out = df
            .groupby_agg("item", "avg_quantity", "quantity", "mean", true)
            .unwrap();

        assert_eq!(out.column_names(), vec!["item", "quantity", "avg_quantity"]);
        assert_eq!(
            out.get_column_numeric_values("avg_quantity").unwrap(),
            vec![140.0, 140.0, 50.0, 140.0, 50.0]
        );
        // input untouched
        assert_eq!(df.column_count(), 2);
    }

    #[test]
    fn test_options_builder() {
        let options = GroupByAggOptions::new(vec!["item"], "n", "quantity", AggFunc::Count)
            .dropna(false);
        assert!(!options.dropna);

        let out = items().groupby_agg_with(&options).unwrap();
        assert_eq!(out.column("n").unwrap().column_type(), ColumnType::Int64);
        assert_eq!(out.get_scalar("n", 2).unwrap(), Scalar::Int64(2));
    }

    #[test]
    fn test_failures_leave_no_result() {
        let df = items();
        assert!(matches!(
            df.groupby_agg("item", "out", "price", "mean", true),
            Err(Error::ColumnNotFound(name)) if name == "price"
        ));
        assert!(matches!(
            df.groupby_agg("colour", "out", "quantity", "mean", true),
            Err(Error::ColumnNotFound(name)) if name == "colour"
        ));
        assert!(matches!(
            df.groupby_agg("item", "out", "quantity", "average_ish", true),
            Err(Error::UnknownAggregation(_))
        ));
        assert!(!df.contains_column("out"));
    }
}
