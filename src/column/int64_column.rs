use std::sync::Arc;

use crate::column::common::{utils, ColumnTrait, ColumnType};
use crate::error::{Error, Result};
use crate::value::Scalar;

/// Column of 64-bit integers
#[derive(Debug, Clone)]
pub struct Int64Column {
    pub(crate) data: Arc<[i64]>,
    pub(crate) null_mask: Option<Arc<[u8]>>,
    pub(crate) name: Option<String>,
}

impl Int64Column {
    pub fn new(data: Vec<i64>) -> Self {
        Self {
            data: data.into(),
            null_mask: None,
            name: None,
        }
    }

    /// Create a column where `nulls[i]` marks row i as missing
    pub fn with_nulls(data: Vec<i64>, nulls: Vec<bool>) -> Self {
        Self {
            data: data.into(),
            null_mask: utils::null_mask_from(&nulls),
            name: None,
        }
    }

    pub fn from_options(values: Vec<Option<i64>>) -> Self {
        let nulls: Vec<bool> = values.iter().map(Option::is_none).collect();
        let data: Vec<i64> = values.into_iter().map(|v| v.unwrap_or_default()).collect();
        Self::with_nulls(data, nulls)
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    pub fn get(&self, index: usize) -> Result<Option<i64>> {
        if index >= self.data.len() {
            return Err(Error::IndexOutOfBounds {
                index,
                size: self.data.len(),
            });
        }

        if utils::is_null(self.null_mask.as_ref(), index) {
            return Ok(None);
        }

        Ok(Some(self.data[index]))
    }

    /// Values in row order, `None` for missing entries
    pub fn iter(&self) -> impl Iterator<Item = Option<i64>> + '_ {
        self.data
            .iter()
            .enumerate()
            .map(|(i, &v)| (!utils::is_null(self.null_mask.as_ref(), i)).then_some(v))
    }
}

impl ColumnTrait for Int64Column {
    fn len(&self) -> usize {
        self.data.len()
    }

    fn column_type(&self) -> ColumnType {
        ColumnType::Int64
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn null_count(&self) -> usize {
        utils::count_set(self.null_mask.as_ref(), self.data.len())
    }

    fn scalar_at(&self, index: usize) -> Result<Scalar> {
        Ok(self.get(index)?.into())
    }
}
