use std::sync::Arc;

use crate::column::common::{utils, BitMask, ColumnTrait, ColumnType};
use crate::error::{Error, Result};
use crate::value::Scalar;

/// Column of booleans packed into a [`BitMask`]
#[derive(Debug, Clone)]
pub struct BooleanColumn {
    pub(crate) data: BitMask,
    pub(crate) null_mask: Option<Arc<[u8]>>,
    pub(crate) name: Option<String>,
}

impl BooleanColumn {
    pub fn new(data: Vec<bool>) -> Self {
        Self {
            data: BitMask::from_bools(&data),
            null_mask: None,
            name: None,
        }
    }

    /// Create a column where `nulls[i]` marks row i as missing
    pub fn with_nulls(data: Vec<bool>, nulls: Vec<bool>) -> Self {
        Self {
            data: BitMask::from_bools(&data),
            null_mask: utils::null_mask_from(&nulls),
            name: None,
        }
    }

    pub fn from_options(values: Vec<Option<bool>>) -> Self {
        let nulls: Vec<bool> = values.iter().map(Option::is_none).collect();
        let data: Vec<bool> = values.into_iter().map(|v| v.unwrap_or(false)).collect();
        Self::with_nulls(data, nulls)
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    pub fn get(&self, index: usize) -> Result<Option<bool>> {
        if index >= self.data.len() {
            return Err(Error::IndexOutOfBounds {
                index,
                size: self.data.len(),
            });
        }

        if utils::is_null(self.null_mask.as_ref(), index) {
            return Ok(None);
        }

        self.data.get(index).map(Some)
    }
}

impl ColumnTrait for BooleanColumn {
    fn len(&self) -> usize {
        self.data.len()
    }

    fn column_type(&self) -> ColumnType {
        ColumnType::Boolean
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
