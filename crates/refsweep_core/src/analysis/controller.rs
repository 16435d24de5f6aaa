//! Sequential sweep over the parameter space.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::collect::{RunOutcome, classify};
use crate::config::SweepConfig;
use crate::error::{ConfigError, SweepError};
use crate::exec::{Execution, RunExecutor};
use crate::model::{ParameterAssignment, Verdict};
use crate::store;
use crate::template::{Template, TemplateRenderer};

use super::{ParameterSpace, SweepProgress};

/// Receives everything the controller has to say about a sweep.
///
/// Constructed once by the caller and passed by reference; all methods
/// default to doing nothing.
pub trait SweepReporter {
    /// The sweep is about to start at `start` of `total`
    fn sweep_started(&self, _start: usize, _total: usize) {}

    /// Constants with no declaration in the template (non-strict mode)
    fn placeholders_missing(&self, _constants: &[String]) {}

    /// A configuration has been rendered and the tool is being launched
    fn run_started(&self, _index: usize, _file: &Path, _parameters: &ParameterAssignment) {}

    /// A run reached a terminal outcome
    fn run_finished(&self, _report: &RunReport) {}

    /// `completed` of `total` points are done; `last` is the latest run's duration
    fn progress(&self, _completed: usize, _total: usize, _last: Duration) {}

    fn sweep_finished(&self, _summary: &SweepSummary) {}
}

/// Reporter that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl SweepReporter for NullReporter {}

/// Everything known about one finished run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub index: usize,
    /// Rendered configuration
    pub file: PathBuf,
    pub parameters: ParameterAssignment,
    pub duration: Duration,
    /// Exit code, `None` when the tool was killed by a signal
    pub exit_code: Option<i32>,
    pub stderr: String,
    pub outcome: RunOutcome,
    /// Where the artifact was written, if one was
    pub artifact_path: Option<PathBuf>,
}

/// Outcome tallies for a sweep
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepSummary {
    pub start: usize,
    pub total: usize,
    /// Runs executed by this invocation
    pub executed: usize,
    /// Runs that produced an artifact
    pub completed: usize,
    pub passed: usize,
    pub failed: usize,
    pub tool_errors: usize,
    pub malformed: usize,
    pub no_assertions: usize,
}

impl SweepSummary {
    fn new(start: usize, total: usize) -> Self {
        Self {
            start,
            total,
            ..Default::default()
        }
    }

    fn record(&mut self, outcome: &RunOutcome) {
        self.executed += 1;
        if outcome.is_no_assertions() {
            self.no_assertions += 1;
        }
        match outcome {
            RunOutcome::MalformedOutput { .. } => self.malformed += 1,
            RunOutcome::ToolError { .. } => self.tool_errors += 1,
            RunOutcome::Completed { verdicts, .. } => {
                self.completed += 1;
                for v in verdicts {
                    match v {
                        Verdict::Pass => self.passed += 1,
                        Verdict::Fail => self.failed += 1,
                    }
                }
            }
        }
    }
}

/// One entry of a sweep plan
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedRun {
    pub index: usize,
    pub parameters: ParameterAssignment,
    pub file: PathBuf,
}

/// Drives render → execute → collect → store over the parameter space
#[derive(Debug, Clone)]
pub struct SweepController {
    config: SweepConfig,
    renderer: TemplateRenderer,
    executor: RunExecutor,
}

impl SweepController {
    /// Build a controller, rejecting sweeps where two assignments would
    /// share a rendered file name
    pub fn new(config: SweepConfig) -> Result<Self, SweepError> {
        let renderer = TemplateRenderer::new(&config.spec)?;
        let executor = RunExecutor::new(config.tool.clone());
        let controller = Self {
            config,
            renderer,
            executor,
        };
        controller.check_unique_file_names()?;
        Ok(controller)
    }

    fn check_unique_file_names(&self) -> Result<(), ConfigError> {
        let mut seen: HashMap<String, usize> = HashMap::new();
        for (index, parameters) in self.space().iter().enumerate() {
            let stem = parameters.file_stem(&self.config.prefix);
            if let Some(&first) = seen.get(&stem) {
                return Err(ConfigError::FileNameCollision {
                    file: stem,
                    first,
                    second: index,
                });
            }
            seen.insert(stem, index);
        }
        Ok(())
    }

    #[must_use]
    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    #[must_use]
    pub fn space(&self) -> ParameterSpace<'_> {
        ParameterSpace::new(&self.config.spec)
    }

    /// Number of assignments in the sweep
    #[must_use]
    pub fn total(&self) -> usize {
        self.space().len()
    }

    /// Every index with its assignment and rendered file, without running anything
    #[must_use]
    pub fn plan(&self) -> Vec<PlannedRun> {
        self.space()
            .iter()
            .enumerate()
            .map(|(index, parameters)| {
                let file = self.rendered_path(&parameters);
                PlannedRun {
                    index,
                    parameters,
                    file,
                }
            })
            .collect()
    }

    fn rendered_path(&self, parameters: &ParameterAssignment) -> PathBuf {
        self.config
            .rendered_path(&parameters.file_stem(&self.config.prefix))
    }

    /// Run the sweep from `start` to the end of the space.
    ///
    /// Fails before doing any work if the template cannot be read, if `start`
    /// lies outside `[0, total)`, or if strict placeholders are on and a
    /// constant is missing. Per-run failures are reported and skipped.
    /// Cancellation through `progress` kills the in-flight tool and returns
    /// [`SweepError::Cancelled`]; artifacts already written are left alone.
    pub fn run(
        &self,
        start: i64,
        progress: &SweepProgress,
        reporter: &dyn SweepReporter,
    ) -> Result<SweepSummary, SweepError> {
        let template = Template::load(&self.config.template)?;

        let space = self.space();
        let total = space.len();
        let start = usize::try_from(start)
            .ok()
            .filter(|&s| s < total)
            .ok_or(SweepError::InvalidStartIndex { start, total })?;

        let missing = self.renderer.missing_constants(template.text());
        if !missing.is_empty() {
            if self.config.strict_placeholders {
                return Err(SweepError::MissingPlaceholder { constants: missing });
            }
            reporter.placeholders_missing(&missing);
        }

        progress.reset(start, total);
        reporter.sweep_started(start, total);
        let mut summary = SweepSummary::new(start, total);

        for index in start..total {
            if progress.is_cancelled() {
                return Err(SweepError::Cancelled { index });
            }
            let Some(parameters) = space.get(index) else {
                break;
            };

            let file = self.rendered_path(&parameters);
            let rendered = self.renderer.render(template.text(), &parameters);
            fs::write(&file, rendered).map_err(|source| SweepError::Io {
                path: file.clone(),
                source,
            })?;

            reporter.run_started(index, &file, &parameters);
            let run = match self.executor.execute(&file, progress)? {
                Execution::Finished(run) => run,
                Execution::Cancelled => return Err(SweepError::Cancelled { index }),
            };

            let outcome = classify(&run.stdout, &parameters, run.duration);
            let artifact_path = match outcome.artifact() {
                Some(artifact) => Some(store::persist(artifact, &file)?),
                None => None,
            };
            summary.record(&outcome);

            reporter.run_finished(&RunReport {
                index,
                file,
                parameters,
                duration: run.duration,
                exit_code: run.status.code(),
                stderr: run.stderr,
                outcome,
                artifact_path,
            });

            progress.increment();
            reporter.progress(index + 1, total, run.duration);
        }

        reporter.sweep_finished(&summary);
        Ok(summary)
    }
}
