use std::fmt::Debug;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::value::Scalar;

/// Identifies the physical type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Int64,
    Float64,
    String,
    Boolean,
}

/// Operations shared by every typed column
pub trait ColumnTrait: Debug + Send + Sync {
    /// Number of rows
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn column_type(&self) -> ColumnType;

    fn name(&self) -> Option<&str>;

    /// Number of missing entries
    fn null_count(&self) -> usize;

    /// Value at `index` as a [`Scalar`], `Scalar::Null` when missing
    fn scalar_at(&self, index: usize) -> Result<Scalar>;
}

/// A column of any supported type
#[derive(Debug, Clone)]
pub enum Column {
    Int64(crate::column::Int64Column),
    Float64(crate::column::Float64Column),
    String(crate::column::StringColumn),
    Boolean(crate::column::BooleanColumn),
}

/// Packed bit vector, one bit per row
#[derive(Debug, Clone)]
pub struct BitMask {
    pub(crate) data: Arc<[u8]>,
    pub(crate) len: usize,
}

impl BitMask {
    pub fn from_bools(bools: &[bool]) -> Self {
        Self {
            data: utils::create_bitmask(bools),
            len: bools.len(),
        }
    }

    /// Whether bit `index` is set
    pub fn get(&self, index: usize) -> Result<bool> {
        if index >= self.len {
            return Err(Error::IndexOutOfBounds {
                index,
                size: self.len,
            });
        }
        Ok(utils::is_set(&self.data, index))
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Null mask helpers
pub mod utils {
    use std::sync::Arc;

    /// Pack booleans into a bitmask, bit i set when `bools[i]` is true
    pub fn create_bitmask(bools: &[bool]) -> Arc<[u8]> {
        let mut data = vec![0u8; bools.len().div_ceil(8)];

        for (i, &is_set) in bools.iter().enumerate() {
            if is_set {
                data[i / 8] |= 1 << (i % 8);
            }
        }

        data.into()
    }

    /// Null mask for `nulls`, or `None` when nothing is null
    pub fn null_mask_from(nulls: &[bool]) -> Option<Arc<[u8]>> {
        if nulls.iter().any(|&is_null| is_null) {
            Some(create_bitmask(nulls))
        } else {
            None
        }
    }

    pub fn is_set(mask: &[u8], index: usize) -> bool {
        let byte_idx = index / 8;
        byte_idx < mask.len() && (mask[byte_idx] & (1 << (index % 8))) != 0
    }

    pub fn is_null(mask: Option<&Arc<[u8]>>, index: usize) -> bool {
        mask.is_some_and(|m| is_set(m, index))
    }

    pub fn count_set(mask: Option<&Arc<[u8]>>, len: usize) -> usize {
        match mask {
            Some(m) => (0..len).filter(|&i| is_set(m, i)).count(),
            None => 0,
        }
    }
}

impl Column {
    fn inner(&self) -> &dyn ColumnTrait {
        match self {
            Column::Int64(col) => col,
            Column::Float64(col) => col,
            Column::String(col) => col,
            Column::Boolean(col) => col,
        }
    }

    pub fn len(&self) -> usize {
        self.inner().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn column_type(&self) -> ColumnType {
        self.inner().column_type()
    }

    pub fn name(&self) -> Option<&str> {
        self.inner().name()
    }

    pub fn null_count(&self) -> usize {
        self.inner().null_count()
    }

    /// Rename the column in place
    pub fn set_name(&mut self, name: impl Into<String>) {
        match self {
            Column::Int64(col) => col.set_name(name),
            Column::Float64(col) => col.set_name(name),
            Column::String(col) => col.set_name(name),
            Column::Boolean(col) => col.set_name(name),
        }
    }

    /// Value at `index`
    pub fn get_scalar(&self, index: usize) -> Result<Scalar> {
        self.inner().scalar_at(index)
    }

    /// All values in row order
    pub fn scalars(&self) -> Result<Vec<Scalar>> {
        (0..self.len()).map(|i| self.get_scalar(i)).collect()
    }

    /// Build a column of `column_type` from scalars.
    ///
    /// `Scalar::Null` (and NaN) become missing entries. Integers are
    /// widened into Float64 columns; any other type that does not fit
    /// fails with [`Error::ColumnTypeMismatch`].
    pub fn from_scalars(
        name: impl Into<String>,
        values: &[Scalar],
        column_type: ColumnType,
    ) -> Result<Self> {
        let name = name.into();
        let mismatch = |value: &Scalar| -> Error {
            Error::ColumnTypeMismatch {
                name: name.clone(),
                expected: column_type,
                // column_type() is only None for Null, which never reaches here
                found: value.column_type().unwrap_or(column_type),
            }
        };

        let mut column = match column_type {
            ColumnType::Int64 => {
                let data = values
                    .iter()
                    .map(|v| match v {
                        v if v.is_missing() => Ok(None),
                        Scalar::Int64(i) => Ok(Some(*i)),
                        other => Err(mismatch(other)),
                    })
                    .collect::<Result<Vec<_>>>()?;
                Column::Int64(crate::column::Int64Column::from_options(data))
            }
            ColumnType::Float64 => {
                let data = values
                    .iter()
                    .map(|v| match v {
                        v if v.is_missing() => Ok(None),
                        Scalar::Float64(f) => Ok(Some(*f)),
                        Scalar::Int64(i) => Ok(num_traits::cast::<i64, f64>(*i)),
                        other => Err(mismatch(other)),
                    })
                    .collect::<Result<Vec<_>>>()?;
                Column::Float64(crate::column::Float64Column::from_options(data))
            }
            ColumnType::String => {
                let data = values
                    .iter()
                    .map(|v| match v {
                        v if v.is_missing() => Ok(None),
                        Scalar::String(s) => Ok(Some(s.clone())),
                        other => Err(mismatch(other)),
                    })
                    .collect::<Result<Vec<_>>>()?;
                Column::String(crate::column::StringColumn::from_options(data))
            }
            ColumnType::Boolean => {
                let data = values
                    .iter()
                    .map(|v| match v {
                        v if v.is_missing() => Ok(None),
                        Scalar::Boolean(b) => Ok(Some(*b)),
                        other => Err(mismatch(other)),
                    })
                    .collect::<Result<Vec<_>>>()?;
                Column::Boolean(crate::column::BooleanColumn::from_options(data))
            }
        };

        column.set_name(name);
        Ok(column)
    }
}

impl From<crate::column::Int64Column> for Column {
    fn from(col: crate::column::Int64Column) -> Self {
        Column::Int64(col)
    }
}

impl From<crate::column::Float64Column> for Column {
    fn from(col: crate::column::Float64Column) -> Self {
        Column::Float64(col)
    }
}

impl From<crate::column::StringColumn> for Column {
    fn from(col: crate::column::StringColumn) -> Self {
        Column::String(col)
    }
}

impl From<crate::column::BooleanColumn> for Column {
    fn from(col: crate::column::BooleanColumn) -> Self {
        Column::Boolean(col)
    }
}
