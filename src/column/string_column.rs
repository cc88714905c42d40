use std::sync::Arc;

use crate::column::common::{utils, ColumnTrait, ColumnType};
use crate::error::{Error, Result};
use crate::value::Scalar;

/// Column of owned strings
#[derive(Debug, Clone)]
pub struct StringColumn {
    pub(crate) data: Arc<[String]>,
    pub(crate) null_mask: Option<Arc<[u8]>>,
    pub(crate) name: Option<String>,
}

impl StringColumn {
    pub fn new(data: Vec<String>) -> Self {
        Self {
            data: data.into(),
            null_mask: None,
            name: None,
        }
    }

    /// Create a column where `nulls[i]` marks row i as missing
    pub fn with_nulls(data: Vec<String>, nulls: Vec<bool>) -> Self {
        Self {
            data: data.into(),
            null_mask: utils::null_mask_from(&nulls),
            name: None,
        }
    }

    pub fn from_options(values: Vec<Option<String>>) -> Self {
        let nulls: Vec<bool> = values.iter().map(Option::is_none).collect();
        let data: Vec<String> = values.into_iter().map(Option::unwrap_or_default).collect();
        Self::with_nulls(data, nulls)
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    pub fn get(&self, index: usize) -> Result<Option<&str>> {
        if index >= self.data.len() {
            return Err(Error::IndexOutOfBounds {
                index,
                size: self.data.len(),
            });
        }

        if utils::is_null(self.null_mask.as_ref(), index) {
            return Ok(None);
        }

        Ok(Some(self.data[index].as_str()))
    }

    /// All strings in row order, `None` for missing entries
    pub fn to_strings(&self) -> Vec<Option<String>> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, s)| (!utils::is_null(self.null_mask.as_ref(), i)).then(|| s.clone()))
            .collect()
    }
}

impl ColumnTrait for StringColumn {
    fn len(&self) -> usize {
        self.data.len()
    }

    fn column_type(&self) -> ColumnType {
        ColumnType::String
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
