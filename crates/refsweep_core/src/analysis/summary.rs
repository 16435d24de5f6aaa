//! Aggregation of persisted artifacts into summary rows.

use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::model::{CheckResult, ParameterValue, RunArtifact};
use crate::store;

/// Projection of one artifact onto a target parameter
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    /// Value of the target parameter
    pub value: ParameterValue,
    /// Visited states of the first result, 0 when absent
    pub states: u64,
    /// Visited transitions of the first result, 0 when absent
    pub transitions: u64,
    /// Elapsed seconds
    pub time: f64,
    /// The remaining parameters as `name:value` pairs
    pub context: String,
}

impl SummaryRow {
    /// Project an artifact, or `None` if it was not produced with `target`
    #[must_use]
    pub fn from_artifact(artifact: &RunArtifact, target: &str) -> Option<Self> {
        let value = artifact.parameters.get(target)?.clone();
        let first = artifact.primary_result();
        Some(Self {
            value,
            states: first.and_then(CheckResult::states).unwrap_or(0),
            transitions: first.and_then(CheckResult::transitions).unwrap_or(0),
            time: artifact.time,
            context: artifact.parameters.context_excluding(target),
        })
    }
}

/// Rows for one target parameter plus the files that could not be read
#[derive(Debug, Clone)]
pub struct SummaryReport {
    pub target: String,
    pub rows: Vec<SummaryRow>,
    pub skipped: Vec<(PathBuf, StoreError)>,
}

/// Load every artifact in `dir` named with `prefix` and summarise it for `target`.
///
/// Unreadable or malformed artifacts are skipped and listed in the report.
/// Only failing to list `dir` itself is an error.
pub fn summarise(dir: &Path, prefix: &str, target: &str) -> Result<SummaryReport, StoreError> {
    let mut rows = Vec::new();
    let mut skipped = Vec::new();

    for path in store::scan(dir, prefix)? {
        match store::load(&path) {
            Ok(artifact) => rows.extend(SummaryRow::from_artifact(&artifact, target)),
            Err(e) => skipped.push((path, e)),
        }
    }

    sort_rows(&mut rows);
    Ok(SummaryReport {
        target: target.to_string(),
        rows,
        skipped,
    })
}

/// Sort by target value: numerically when every value is numeric,
/// otherwise lexicographically by display form.
pub fn sort_rows(rows: &mut [SummaryRow]) {
    let numeric: Option<Vec<f64>> = rows.iter().map(|r| r.value.as_f64()).collect();
    if numeric.is_some() {
        rows.sort_by(|a, b| {
            let (a, b) = (a.value.as_f64(), b.value.as_f64());
            ParameterValue::cmp_numeric(a.unwrap_or(f64::NAN), b.unwrap_or(f64::NAN))
        });
    } else {
        rows.sort_by_cached_key(|r| r.value.to_string());
    }
}
