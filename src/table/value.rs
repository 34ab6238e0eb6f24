use std::{fmt, sync::Arc};

use super::AreaId;

/// A single cell in a [`GeoTable`](super::GeoTable) row.
///
/// Delimited-text ingestion produces `Str` and `Null` cells only; the
/// reconciliation passes write typed `Int` values back. The accessors parse
/// on demand so both shapes behave the same.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    Str(Arc<str>),
}

impl Value {
    pub fn is_null(&self) -> bool { matches!(self, Value::Null) }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Integer view; digit strings parse, whole floats truncate.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::Float(v) if v.fract() == 0.0 => Some(*v as i64),
            Value::Str(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            Value::Str(s) => s.trim().parse().ok(),
            Value::Null => None,
        }
    }

    /// Identifier view; `None` for null or blank cells.
    pub fn as_area_id(&self) -> Option<AreaId> {
        let id = match self {
            Value::Null => return None,
            Value::Int(v) => AreaId::new(&v.to_string()),
            Value::Float(v) => AreaId::new(&v.to_string()),
            Value::Str(s) => AreaId::new(s),
        };
        (!id.is_empty()).then_some(id)
    }

    /// Text written back out to delimited files; `None` keeps nulls empty.
    pub fn to_csv(&self) -> Option<String> {
        match self {
            Value::Null => None,
            _ => Some(self.to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self { Value::Int(v) }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self { Value::Float(v) }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self { Value::Str(Arc::from(s)) }
}

impl From<AreaId> for Value {
    fn from(id: AreaId) -> Self { Value::Str(Arc::from(id.as_str())) }
}
