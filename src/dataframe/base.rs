//! Core DataFrame structure

use std::fmt;

use crate::column::{Column, ColumnType};
use crate::error::{Error, Result};
use crate::value::Scalar;

/// Ordered collection of named, equal-length columns.
///
/// Column storage is reference counted, so cloning a DataFrame is cheap and
/// never copies cell data. Operations that produce a modified frame return a
/// new `DataFrame` and leave `self` untouched.
#[derive(Debug, Clone, Default)]
pub struct DataFrame {
    columns: Vec<Column>,
    column_names: Vec<String>,
    row_count: usize,
}

/// Read-only view of a single row, handed to key derivation functions
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    df: &'a DataFrame,
    index: usize,
}

impl<'a> Row<'a> {
    /// Position of the row in its DataFrame
    pub fn index(&self) -> usize {
        self.index
    }

    /// Value of `column` in this row
    pub fn get(&self, column: &str) -> Result<Scalar> {
        self.df.get_scalar(column, self.index)
    }
}

impl DataFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column. The first column fixes the row count.
    pub fn add_column(&mut self, name: impl Into<String>, column: impl Into<Column>) -> Result<()> {
        let name = name.into();
        let mut column = column.into();

        if self.contains_column(&name) {
            return Err(Error::DuplicateColumnName(name));
        }

        if !self.columns.is_empty() && column.len() != self.row_count {
            return Err(Error::InconsistentRowCount {
                expected: self.row_count,
                found: column.len(),
            });
        }

        if self.columns.is_empty() {
            self.row_count = column.len();
        }

        column.set_name(name.clone());
        self.columns.push(column);
        self.column_names.push(name);
        Ok(())
    }

    /// Return a copy of this frame with `column` stored under `name`.
    ///
    /// An existing column of that name is replaced in place, keeping its
    /// position; otherwise the column is appended.
    pub fn assign(&self, name: impl Into<String>, column: impl Into<Column>) -> Result<DataFrame> {
        let name = name.into();
        let mut column = column.into();

        if !self.columns.is_empty() && column.len() != self.row_count {
            return Err(Error::InconsistentRowCount {
                expected: self.row_count,
                found: column.len(),
            });
        }

        let mut result = self.clone();
        match result.column_position(&name) {
            Some(pos) => {
                column.set_name(name);
                result.columns[pos] = column;
            }
            None => result.add_column(name, column)?,
        }
        Ok(result)
    }

    fn column_position(&self, name: &str) -> Option<usize> {
        self.column_names.iter().position(|n| n == name)
    }

    pub fn contains_column(&self, name: &str) -> bool {
        self.column_position(name).is_some()
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.column_position(name)
            .map(|pos| &self.columns[pos])
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))
    }

    pub fn column_names(&self) -> Vec<String> {
        self.column_names.clone()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn get_scalar(&self, column: &str, row: usize) -> Result<Scalar> {
        self.column(column)?.get_scalar(row)
    }

    pub fn row(&self, index: usize) -> Result<Row<'_>> {
        if index >= self.row_count {
            return Err(Error::IndexOutOfBounds {
                index,
                size: self.row_count,
            });
        }
        Ok(Row { df: self, index })
    }

    /// Numeric values of a column, NaN for missing entries
    pub fn get_column_numeric_values(&self, name: &str) -> Result<Vec<f64>> {
        let column = self.column(name)?;
        match column.column_type() {
            ColumnType::Int64 | ColumnType::Float64 | ColumnType::Boolean => Ok(column
                .scalars()?
                .iter()
                .map(|v| v.as_f64().unwrap_or(f64::NAN))
                .collect()),
            found => Err(Error::ColumnTypeMismatch {
                name: name.to_string(),
                expected: ColumnType::Float64,
                found,
            }),
        }
    }

    /// String values of a column, `None` for missing entries
    pub fn get_column_string_values(&self, name: &str) -> Result<Vec<Option<String>>> {
        match self.column(name)? {
            Column::String(col) => Ok(col.to_strings()),
            other => Err(Error::ColumnTypeMismatch {
                name: name.to_string(),
                expected: ColumnType::String,
                found: other.column_type(),
            }),
        }
    }
}

impl fmt::Display for DataFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut cells: Vec<Vec<String>> = Vec::with_capacity(self.row_count + 1);
        cells.push(self.column_names.clone());
        for row in 0..self.row_count {
            let rendered = self
                .columns
                .iter()
                .map(|col| {
                    col.get_scalar(row)
                        .map(|v| v.to_string())
                        .map_err(|_| fmt::Error)
                })
                .collect::<std::result::Result<Vec<_>, _>>()?;
            cells.push(rendered);
        }

        let widths: Vec<usize> = (0..self.columns.len())
            .map(|c| cells.iter().map(|r| r[c].chars().count()).max().unwrap_or(0))
            .collect();
        let index_width = self.row_count.saturating_sub(1).to_string().len();

        for (r, row) in cells.iter().enumerate() {
            if r == 0 {
                write!(f, "{:>w$}", "", w = index_width)?;
            } else {
                write!(f, "{:>w$}", r - 1, w = index_width)?;
            }
            for (value, width) in row.iter().zip(&widths) {
                write!(f, "  {:>w$}", value, w = *width)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
