//! Single cell values
//!
//! [`Scalar`] is what a column hands out for one row, what a custom
//! reducer receives and returns, and what a group key is made of.

use std::cmp::Ordering;
use std::fmt::{self, Display};
use std::hash::{Hash, Hasher};

use crate::column::ColumnType;

/// A single value of any supported column type, or the missing sentinel
#[derive(Debug, Clone)]
pub enum Scalar {
    /// Missing value
    Null,
    Int64(i64),
    Float64(f64),
    String(String),
    Boolean(bool),
}

impl Scalar {
    /// True for `Null` and for a floating point NaN
    pub fn is_missing(&self) -> bool {
        match self {
            Scalar::Null => true,
            Scalar::Float64(v) => v.is_nan(),
            _ => false,
        }
    }

    /// Column type this value belongs to, `None` for `Null`
    pub fn column_type(&self) -> Option<ColumnType> {
        match self {
            Scalar::Null => None,
            Scalar::Int64(_) => Some(ColumnType::Int64),
            Scalar::Float64(_) => Some(ColumnType::Float64),
            Scalar::String(_) => Some(ColumnType::String),
            Scalar::Boolean(_) => Some(ColumnType::Boolean),
        }
    }

    /// Numeric view of the value. Booleans count as 0/1.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int64(v) => num_traits::cast(*v),
            Scalar::Float64(v) => Some(*v),
            Scalar::Boolean(v) => Some(if *v { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Int64(v) => Some(*v),
            Scalar::Boolean(v) => Some(i64::from(*v)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Ordering between two values of the same type. Missing values sort
    /// first; values of different types are ordered by type.
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Scalar::Int64(a), Scalar::Int64(b)) => a.cmp(b),
            (Scalar::Float64(a), Scalar::Float64(b)) => a.total_cmp(b),
            (Scalar::Int64(a), Scalar::Float64(b)) => (*a as f64).total_cmp(b),
            (Scalar::Float64(a), Scalar::Int64(b)) => a.total_cmp(&(*b as f64)),
            (Scalar::String(a), Scalar::String(b)) => a.cmp(b),
            (Scalar::Boolean(a), Scalar::Boolean(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Scalar::Null => 0,
            Scalar::Boolean(_) => 1,
            Scalar::Int64(_) => 2,
            Scalar::Float64(_) => 3,
            Scalar::String(_) => 4,
        }
    }

    // -0.0 and 0.0 must land in the same group, and every NaN is missing
    fn float_bits(v: f64) -> u64 {
        if v == 0.0 {
            0.0f64.to_bits()
        } else if v.is_nan() {
            f64::NAN.to_bits()
        } else {
            v.to_bits()
        }
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        if self.is_missing() || other.is_missing() {
            return self.is_missing() && other.is_missing();
        }
        match (self, other) {
            (Scalar::Int64(a), Scalar::Int64(b)) => a == b,
            (Scalar::Float64(a), Scalar::Float64(b)) => {
                Self::float_bits(*a) == Self::float_bits(*b)
            }
            (Scalar::String(a), Scalar::String(b)) => a == b,
            (Scalar::Boolean(a), Scalar::Boolean(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Scalar {}

impl Hash for Scalar {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Scalar::Null => 0u8.hash(state),
            Scalar::Float64(v) if v.is_nan() => 0u8.hash(state),
            Scalar::Int64(v) => {
                1u8.hash(state);
                v.hash(state);
            }
            Scalar::Float64(v) => {
                2u8.hash(state);
                Self::float_bits(*v).hash(state);
            }
            Scalar::String(s) => {
                3u8.hash(state);
                s.hash(state);
            }
            Scalar::Boolean(b) => {
                4u8.hash(state);
                b.hash(state);
            }
        }
    }
}

impl Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => write!(f, "NA"),
            Scalar::Int64(v) => write!(f, "{}", v),
            Scalar::Float64(v) if v.is_nan() => write!(f, "NaN"),
            Scalar::Float64(v) if v.fract() == 0.0 && v.is_finite() => write!(f, "{:.1}", v),
            Scalar::Float64(v) => write!(f, "{}", v),
            Scalar::String(s) => write!(f, "{}", s),
            Scalar::Boolean(b) => write!(f, "{}", b),
        }
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Int64(v)
    }
}

impl From<i32> for Scalar {
    fn from(v: i32) -> Self {
        Scalar::Int64(i64::from(v))
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Float64(v)
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Boolean(v)
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::String(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::String(v.to_string())
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => Scalar::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_missing_values_are_equal() {
        assert_eq!(Scalar::Null, Scalar::Float64(f64::NAN));
        assert!(Scalar::Float64(f64::NAN).is_missing());
        assert!(!Scalar::Int64(0).is_missing());
    }

    #[test]
    fn test_hash_consistent_with_eq() {
        let mut set = HashSet::new();
        set.insert(Scalar::Float64(0.0));
        set.insert(Scalar::Float64(-0.0));
        set.insert(Scalar::Null);
        set.insert(Scalar::Float64(f64::NAN));
        set.insert(Scalar::from("a"));
        set.insert(Scalar::from("a"));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_int_and_float_are_distinct_keys() {
        assert_ne!(Scalar::Int64(1), Scalar::Float64(1.0));
    }

    #[test]
    fn test_display() {
        assert_eq!(Scalar::Float64(140.0).to_string(), "140.0");
        assert_eq!(Scalar::Float64(2.5).to_string(), "2.5");
        assert_eq!(Scalar::Null.to_string(), "NA");
        assert_eq!(Scalar::from(Some(3i64)).to_string(), "3");
        assert_eq!(Scalar::from(None::<i64>).to_string(), "NA");
    }
}
