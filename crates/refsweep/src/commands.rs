//! Subcommand implementations.

use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

use refsweep_core::analysis::summarise as summarise_artifacts;
use refsweep_core::{SweepController, SweepError, SweepProgress};
use tracing::{info, warn};

use crate::config::load_sweep_config;
use crate::report::{ReportFormat, print_report};
use crate::reporter::TracingReporter;
use crate::signal::spawn_interrupt_listener;

/// Conventional exit status for a run stopped by SIGINT
pub const EXIT_INTERRUPTED: u8 = 130;

/// Resume index from the command line.
///
/// Absent or non-numeric input starts from 0; numeric input is passed through
/// as-is so the controller can reject it when out of range.
pub fn parse_start(raw: Option<&str>) -> i64 {
    let Some(raw) = raw else {
        return 0;
    };
    match raw.trim().parse::<i64>() {
        Ok(start) => start,
        Err(_) => {
            warn!("Start index {raw:?} is not a number, starting from 0");
            0
        }
    }
}

/// `refsweep run`
pub fn run(dir: &Path, config: Option<&Path>, start: Option<&str>) -> color_eyre::Result<ExitCode> {
    let controller = SweepController::new(load_sweep_config(dir, config)?)?;
    let start = parse_start(start);

    let progress = SweepProgress::default();
    if let Err(e) = spawn_interrupt_listener(progress.clone()) {
        warn!("Ctrl-C handling unavailable: {e}");
    }

    info!(
        tool = %controller.config().tool.program,
        template = %controller.config().template.display(),
        "Loaded sweep of {} configurations",
        controller.total()
    );

    match controller.run(start, &progress, &TracingReporter) {
        Ok(_) => Ok(ExitCode::SUCCESS),
        Err(SweepError::Cancelled { index }) => {
            warn!("Sweep cancelled at index {index}; resume with `refsweep run {index}`");
            Ok(ExitCode::from(EXIT_INTERRUPTED))
        }
        Err(e) => Err(e.into()),
    }
}

/// `refsweep summarise`
pub fn summarise(
    dir: &Path,
    prefix: &str,
    param: &str,
    format: ReportFormat,
    hide_context: bool,
) -> color_eyre::Result<ExitCode> {
    let report = summarise_artifacts(dir, prefix, param)?;

    for (path, e) in &report.skipped {
        warn!(file = %path.display(), "Skipping artifact: {e}");
    }
    if report.rows.is_empty() {
        warn!("No artifacts in {} were produced with parameter {param:?}", dir.display());
    }

    print_report(&report, format, !hide_context)?;
    Ok(ExitCode::SUCCESS)
}

/// `refsweep plan`
pub fn plan(dir: &Path, config: Option<&Path>) -> color_eyre::Result<ExitCode> {
    let controller = SweepController::new(load_sweep_config(dir, config)?)?;
    let mut stdout = io::stdout().lock();
    write_plan(&controller, &mut stdout)?;
    Ok(ExitCode::SUCCESS)
}

fn write_plan(controller: &SweepController, out: &mut impl Write) -> io::Result<()> {
    for run in controller.plan() {
        let file = run
            .file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        writeln!(
            out,
            "{:>6}  {}  {}",
            run.index,
            file,
            run.parameters.context_excluding("")
        )?;
    }
    out.flush()
}
