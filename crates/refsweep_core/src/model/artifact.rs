use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::ParameterAssignment;

/// Pass/fail verdict of a single assertion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Pass,
    Fail,
}

impl Verdict {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Verdict::Pass => "PASS",
            Verdict::Fail => "FAIL",
        }
    }
}

/// One entry of the tool's `results` list.
///
/// Only the fields the sweep and the reports read are typed; everything else
/// the tool emits is carried through untouched in `extra`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CheckResult {
    /// Pass/fail code, `1` meaning the assertion passed
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub result: Value,
    /// Kept as emitted; read through [`CheckResult::states`]
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub visited_states: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub visited_transitions: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CheckResult {
    #[must_use]
    pub fn verdict(&self) -> Verdict {
        if self.result.as_f64() == Some(1.0) {
            Verdict::Pass
        } else {
            Verdict::Fail
        }
    }

    /// Visited state count, if the tool reported a usable number
    #[must_use]
    pub fn states(&self) -> Option<u64> {
        counter(&self.visited_states)
    }

    #[must_use]
    pub fn transitions(&self) -> Option<u64> {
        counter(&self.visited_transitions)
    }
}

/// Non-negative integer or float counter; floats are truncated
fn counter(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.is_finite() && *f >= 0.0)
            .map(|f| f as u64)
    })
}

/// `null` is read as an empty list
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Raw structured output of the verification tool
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ToolPayload {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub errors: Vec<Value>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub results: Vec<CheckResult>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ToolPayload {
    /// Human-readable message for every entry of `errors`
    #[must_use]
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(error_message).collect()
    }

    /// Stamp run metadata onto the payload, producing the persisted artifact
    #[must_use]
    pub fn into_artifact(mut self, time: f64, parameters: ParameterAssignment) -> RunArtifact {
        // The injected fields win over anything the tool happened to emit
        self.extra.remove("time");
        self.extra.remove("parameters");
        RunArtifact {
            errors: self.errors,
            results: self.results,
            extra: self.extra,
            time,
            parameters,
        }
    }
}

fn error_message(entry: &Value) -> String {
    match entry {
        Value::String(s) => s.clone(),
        Value::Object(map) => match map.get("message") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => entry.to_string(),
        },
        other => other.to_string(),
    }
}

/// Tool payload enriched with run metadata, one per rendered configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RunArtifact {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub errors: Vec<Value>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub results: Vec<CheckResult>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    /// Elapsed wall-clock seconds
    #[serde(default)]
    pub time: f64,
    #[serde(default)]
    pub parameters: ParameterAssignment,
}

impl RunArtifact {
    /// First result entry, which carries the exploration counters
    #[must_use]
    pub fn primary_result(&self) -> Option<&CheckResult> {
        self.results.first()
    }

    #[must_use]
    pub fn verdicts(&self) -> Vec<Verdict> {
        self.results.iter().map(CheckResult::verdict).collect()
    }
}
