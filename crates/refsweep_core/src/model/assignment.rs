use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::ParameterValue;

/// One concrete value per parameter, in declaration order.
///
/// Produced by [`crate::analysis::ParameterSpace`]; immutable once built.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterAssignment(IndexMap<String, ParameterValue>);

impl ParameterAssignment {
    /// Look up the value bound to a parameter
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParameterValue> {
        self.0.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(name, value)` pairs in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParameterValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// `name:value` pairs for every parameter except `target`, joined by ", "
    #[must_use]
    pub fn context_excluding(&self, target: &str) -> String {
        self.iter()
            .filter(|(k, _)| *k != target)
            .map(|(k, v)| format!("{k}:{v}"))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// File stem encoding every value, e.g. `run_phil3_seats4`.
    ///
    /// Each `<name><value>` component is sanitized so the stem is always a
    /// single path component.
    #[must_use]
    pub fn file_stem(&self, prefix: &str) -> String {
        let parts: Vec<String> = self
            .iter()
            .map(|(k, v)| sanitize_component(&format!("{k}{v}")))
            .collect();
        format!("{prefix}{}", parts.join("_"))
    }
}

impl<K: Into<String>> FromIterator<(K, ParameterValue)> for ParameterAssignment {
    fn from_iter<I: IntoIterator<Item = (K, ParameterValue)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

fn sanitize_component(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
