//! Child-process execution of the external verification tool.

use std::io::{self, Read};
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::analysis::SweepProgress;
use crate::error::ExecError;

/// Tool invoked when the configuration does not name one
pub const DEFAULT_TOOL: &str = "refines";

/// Flag asking the tool for machine-readable output
pub const DEFAULT_TOOL_ARGS: &[&str] = &["--format=json"];

/// How often the wait loop checks the child and the cancellation flag
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Program plus fixed arguments; the rendered file path is appended last
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCommand {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    fn command(&self, file: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .arg(file)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }
}

impl Default for ToolCommand {
    fn default() -> Self {
        Self::new(DEFAULT_TOOL, DEFAULT_TOOL_ARGS.iter().copied())
    }
}

/// Captured output of a tool run that ran to completion
#[derive(Debug, Clone)]
pub struct ToolRun {
    pub stdout: String,
    pub stderr: String,
    pub status: ExitStatus,
    /// Wall-clock time from spawn to exit
    pub duration: Duration,
}

/// Result of a single cancellable execution
#[derive(Debug)]
pub enum Execution {
    Finished(ToolRun),
    /// The cancellation flag was raised; the child has been killed and reaped
    Cancelled,
}

/// Runs the tool against one rendered file at a time
#[derive(Debug, Clone)]
pub struct RunExecutor {
    tool: ToolCommand,
    poll_interval: Duration,
}

impl RunExecutor {
    #[must_use]
    pub fn new(tool: ToolCommand) -> Self {
        Self {
            tool,
            poll_interval: POLL_INTERVAL,
        }
    }

    /// Run the tool on `file` and block until it exits or `progress` is cancelled.
    ///
    /// Output pipes are drained on helper threads so a verbose tool cannot
    /// stall on a full pipe. No timeout is applied.
    pub fn execute(&self, file: &Path, progress: &SweepProgress) -> Result<Execution, ExecError> {
        if progress.is_cancelled() {
            return Ok(Execution::Cancelled);
        }

        let start = Instant::now();
        let mut child = self
            .tool
            .command(file)
            .spawn()
            .map_err(|source| ExecError::Launch {
                program: self.tool.program.clone(),
                source,
            })?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        loop {
            let exited = match child.try_wait() {
                Ok(exited) => exited,
                Err(e) => {
                    // Never leave the tool running behind a failed wait
                    let _ = terminate(&mut child);
                    return Err(ExecError::Wait(e));
                }
            };

            if let Some(status) = exited {
                // A terminal interrupt reaches the child too; its output is not a result
                if interrupted(&status) {
                    progress.cancel();
                }
                if progress.is_cancelled() {
                    return Ok(Execution::Cancelled);
                }
                let duration = start.elapsed();
                return Ok(Execution::Finished(ToolRun {
                    stdout: collect(stdout),
                    stderr: collect(stderr),
                    status,
                    duration,
                }));
            }

            if progress.is_cancelled() {
                terminate(&mut child)?;
                // Reader threads are left detached: a grandchild may still hold the pipes open
                return Ok(Execution::Cancelled);
            }

            thread::sleep(self.poll_interval);
        }
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<Vec<u8>>> {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            // A read error just truncates the capture
            let _ = pipe.read_to_end(&mut buf);
            buf
        })
    })
}

fn collect(handle: Option<JoinHandle<Vec<u8>>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default()
}

#[cfg(unix)]
fn interrupted(status: &ExitStatus) -> bool {
    use std::os::unix::process::ExitStatusExt;
    const SIGINT: i32 = 2;
    status.signal() == Some(SIGINT)
}

#[cfg(not(unix))]
fn interrupted(_status: &ExitStatus) -> bool {
    false
}

fn terminate(child: &mut Child) -> Result<(), ExecError> {
    match child.kill() {
        Ok(()) => {}
        // Already exited between the last poll and the kill
        Err(e) if e.kind() == io::ErrorKind::InvalidInput => {}
        Err(e) => return Err(ExecError::Wait(e)),
    }
    child.wait().map_err(ExecError::Wait)?;
    Ok(())
}
