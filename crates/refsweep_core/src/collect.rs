//! Classification of the tool's output into run outcomes.

use std::time::Duration;

use crate::model::{ParameterAssignment, RunArtifact, ToolPayload, Verdict};

/// Terminal classification of one tool run
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Standard output was not the expected JSON payload
    MalformedOutput { reason: String },
    /// The tool reported errors; nothing is persisted
    ToolError { messages: Vec<String> },
    /// The tool ran its assertions; the artifact is ready to persist
    Completed {
        artifact: Box<RunArtifact>,
        verdicts: Vec<Verdict>,
    },
}

impl RunOutcome {
    /// Short label used in logs and summaries
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            RunOutcome::MalformedOutput { .. } => "malformed_output",
            RunOutcome::ToolError { .. } => "tool_error",
            RunOutcome::Completed { verdicts, .. } if verdicts.is_empty() => "no_assertions",
            RunOutcome::Completed { .. } => "completed",
        }
    }

    /// Completed, but the tool checked no assertions
    #[must_use]
    pub fn is_no_assertions(&self) -> bool {
        matches!(self, RunOutcome::Completed { verdicts, .. } if verdicts.is_empty())
    }

    #[must_use]
    pub fn artifact(&self) -> Option<&RunArtifact> {
        match self {
            RunOutcome::Completed { artifact, .. } => Some(artifact.as_ref()),
            _ => None,
        }
    }
}

/// Classify the captured standard output of a run.
///
/// Never fails: unparseable output is itself an outcome.
#[must_use]
pub fn classify(stdout: &str, parameters: &ParameterAssignment, duration: Duration) -> RunOutcome {
    let payload: ToolPayload = match serde_json::from_str(stdout) {
        Ok(payload) => payload,
        Err(e) => {
            return RunOutcome::MalformedOutput {
                reason: e.to_string(),
            };
        }
    };

    if !payload.errors.is_empty() {
        return RunOutcome::ToolError {
            messages: payload.error_messages(),
        };
    }

    let artifact = payload.into_artifact(duration.as_secs_f64(), parameters.clone());
    let verdicts = artifact.verdicts();
    RunOutcome::Completed {
        artifact: Box::new(artifact),
        verdicts,
    }
}
