use std::sync::Arc;

use crate::column::common::{utils, ColumnTrait, ColumnType};
use crate::error::{Error, Result};
use crate::value::Scalar;

/// Column of 64-bit floats. NaN is read back as missing.
#[derive(Debug, Clone)]
pub struct Float64Column {
    pub(crate) data: Arc<[f64]>,
    pub(crate) null_mask: Option<Arc<[u8]>>,
    pub(crate) name: Option<String>,
}

impl Float64Column {
    pub fn new(data: Vec<f64>) -> Self {
        Self {
            data: data.into(),
            null_mask: None,
            name: None,
        }
    }

    /// Create a column where `nulls[i]` marks row i as missing
    pub fn with_nulls(data: Vec<f64>, nulls: Vec<bool>) -> Self {
        Self {
            data: data.into(),
            null_mask: utils::null_mask_from(&nulls),
            name: None,
        }
    }

    pub fn from_options(values: Vec<Option<f64>>) -> Self {
        let nulls: Vec<bool> = values.iter().map(Option::is_none).collect();
        let data: Vec<f64> = values.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect();
        Self::with_nulls(data, nulls)
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    pub fn get(&self, index: usize) -> Result<Option<f64>> {
        if index >= self.data.len() {
            return Err(Error::IndexOutOfBounds {
                index,
                size: self.data.len(),
            });
        }

        if utils::is_null(self.null_mask.as_ref(), index) || self.data[index].is_nan() {
            return Ok(None);
        }

        Ok(Some(self.data[index]))
    }

    /// Values in row order, `None` for missing entries
    pub fn iter(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        self.data.iter().enumerate().map(|(i, &v)| {
            (!utils::is_null(self.null_mask.as_ref(), i) && !v.is_nan()).then_some(v)
        })
    }
}

impl ColumnTrait for Float64Column {
    fn len(&self) -> usize {
        self.data.len()
    }

    fn column_type(&self) -> ColumnType {
        ColumnType::Float64
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn null_count(&self) -> usize {
        self.iter().filter(Option::is_none).count()
    }

    fn scalar_at(&self, index: usize) -> Result<Scalar> {
        Ok(self.get(index)?.into())
    }
}
