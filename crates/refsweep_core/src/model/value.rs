use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single permissible value for a sweep parameter.
///
/// Values come straight from YAML/JSON scalars, so the representation is
/// untagged. The display form is what ends up in rendered templates, file
/// names and report cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl ParameterValue {
    /// Numeric view used for report ordering.
    ///
    /// Text values count as numeric when they parse as a float.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParameterValue::Int(v) => Some(*v as f64),
            ParameterValue::Float(v) => Some(*v),
            ParameterValue::Text(s) => s.trim().parse::<f64>().ok(),
            ParameterValue::Bool(_) => None,
        }
    }

    /// Total order over numeric views, NaN sorting last
    pub(crate) fn cmp_numeric(a: f64, b: f64) -> Ordering {
        a.partial_cmp(&b).unwrap_or_else(|| a.is_nan().cmp(&b.is_nan()))
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterValue::Bool(v) => write!(f, "{v}"),
            ParameterValue::Int(v) => write!(f, "{v}"),
            // Debug keeps the trailing ".0" on integral floats so 2.0 and 2 stay distinct
            ParameterValue::Float(v) => write!(f, "{v:?}"),
            ParameterValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ParameterValue {
    fn from(v: i64) -> Self {
        ParameterValue::Int(v)
    }
}

impl From<f64> for ParameterValue {
    fn from(v: f64) -> Self {
        ParameterValue::Float(v)
    }
}

impl From<bool> for ParameterValue {
    fn from(v: bool) -> Self {
        ParameterValue::Bool(v)
    }
}

impl From<&str> for ParameterValue {
    fn from(v: &str) -> Self {
        ParameterValue::Text(v.to_string())
    }
}

impl From<String> for ParameterValue {
    fn from(v: String) -> Self {
        ParameterValue::Text(v)
    }
}
