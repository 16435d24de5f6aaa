//! Sweep reporter backed by `tracing` events.

use std::path::Path;
use std::time::Duration;

use refsweep_core::ParameterAssignment;
use refsweep_core::analysis::{RunReport, SweepReporter, SweepSummary};
use refsweep_core::collect::RunOutcome;
use refsweep_core::model::Verdict;
use tracing::{debug, error, info, warn};

use crate::util::format::{format_percentage, format_seconds};

/// Logs every sweep event; constructed once in `main`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

/// `name:value` pairs for log fields
fn describe(parameters: &ParameterAssignment) -> String {
    parameters.context_excluding("")
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

impl SweepReporter for TracingReporter {
    fn sweep_started(&self, start: usize, total: usize) {
        info!(start, total, "Starting sweep at index {start} of {total}");
    }

    fn placeholders_missing(&self, constants: &[String]) {
        for constant in constants {
            warn!(constant = %constant, "Template has no declaration for {constant}; it will not be substituted");
        }
    }

    fn run_started(&self, index: usize, file: &Path, parameters: &ParameterAssignment) {
        info!(
            index,
            file = %file_name(file),
            parameters = %describe(parameters),
            "Running"
        );
    }

    fn run_finished(&self, report: &RunReport) {
        let file = file_name(&report.file);
        let parameters = describe(&report.parameters);

        if !report.stderr.trim().is_empty() {
            debug!(file = %file, stderr = %report.stderr.trim_end(), "Tool stderr");
        }
        if let Some(code) = report.exit_code.filter(|&c| c != 0) {
            debug!(file = %file, code, "Tool exited with non-zero status");
        }

        match &report.outcome {
            RunOutcome::MalformedOutput { reason } => {
                error!(
                    critical = true,
                    file = %file,
                    parameters = %parameters,
                    "Tool output is not valid JSON: {reason}"
                );
            }
            RunOutcome::ToolError { messages } => {
                for message in messages {
                    error!(file = %file, parameters = %parameters, "Tool error: {message}");
                }
            }
            RunOutcome::Completed { verdicts, .. } if verdicts.is_empty() => {
                warn!(file = %file, parameters = %parameters, "No assertions were checked");
            }
            RunOutcome::Completed { verdicts, .. } => {
                for (i, verdict) in verdicts.iter().enumerate() {
                    match verdict {
                        Verdict::Pass => info!(
                            file = %file,
                            parameters = %parameters,
                            assertion = i,
                            "{}",
                            verdict.label()
                        ),
                        Verdict::Fail => warn!(
                            file = %file,
                            parameters = %parameters,
                            assertion = i,
                            "{}",
                            verdict.label()
                        ),
                    }
                }
            }
        }

        if let Some(path) = &report.artifact_path {
            debug!(artifact = %path.display(), "Artifact written");
        }
    }

    fn progress(&self, completed: usize, total: usize, last: Duration) {
        info!(
            "PROGRESS: {completed}/{total} ({}) last run {}s",
            format_percentage(completed, total),
            format_seconds(last.as_secs_f64())
        );
    }

    fn sweep_finished(&self, summary: &SweepSummary) {
        info!(
            executed = summary.executed,
            completed = summary.completed,
            passed = summary.passed,
            failed = summary.failed,
            tool_errors = summary.tool_errors,
            malformed = summary.malformed,
            no_assertions = summary.no_assertions,
            "Sweep finished"
        );
    }
}
