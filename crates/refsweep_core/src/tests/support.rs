//! Shared fixtures for the integration tests

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::TempDir;

use crate::analysis::{RunReport, SweepReporter, SweepSummary};
use crate::config::{ParameterSpec, SweepConfig};
use crate::exec::ToolCommand;
use crate::model::ParameterAssignment;

pub const PASSING_OUTPUT: &str =
    r#"{"errors": [], "results": [{"result": 1, "visited_states": 10, "visited_transitions": 25}]}"#;

/// A temporary sweep workspace: template in the root, outputs in `out/`
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new(template: &str) -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("model.csp"), template).unwrap();
        fs::create_dir(dir.path().join("out")).unwrap();
        Self { dir }
    }

    pub fn template(&self) -> PathBuf {
        self.dir.path().join("model.csp")
    }

    pub fn out(&self) -> PathBuf {
        self.dir.path().join("out")
    }

    /// Write a stand-in tool. The script sees `--format=json` as `$1` and the
    /// rendered file as `$2`.
    pub fn tool(&self, body: &str) -> ToolCommand {
        let script = self.dir.path().join("tool.sh");
        fs::write(&script, body).unwrap();
        ToolCommand::new("sh", [script.display().to_string(), "--format=json".to_string()])
    }

    pub fn config(&self, spec: ParameterSpec, tool: ToolCommand) -> SweepConfig {
        SweepConfig::new(spec, self.template())
            .with_work_dir(self.out())
            .with_tool(tool)
    }

    /// Sorted file names in `out/`
    pub fn outputs(&self) -> Vec<String> {
        list(&self.out())
    }
}

pub fn list(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Tool that always prints `output`
pub fn echo_tool(output: &str) -> String {
    format!("cat <<'JSON'\n{output}\nJSON\n")
}

/// Reporter that records events as strings
#[derive(Default)]
pub struct Recorder {
    pub events: RefCell<Vec<String>>,
}

impl Recorder {
    pub fn events(&self) -> Vec<String> {
        self.events.borrow().clone()
    }

    fn push(&self, event: String) {
        self.events.borrow_mut().push(event);
    }
}

impl SweepReporter for Recorder {
    fn sweep_started(&self, start: usize, total: usize) {
        self.push(format!("start {start}/{total}"));
    }

    fn placeholders_missing(&self, constants: &[String]) {
        self.push(format!("missing {}", constants.join(",")));
    }

    fn run_started(&self, index: usize, file: &Path, _parameters: &ParameterAssignment) {
        let name = file.file_name().unwrap().to_string_lossy();
        self.push(format!("run {index} {name}"));
    }

    fn run_finished(&self, report: &RunReport) {
        self.push(format!("done {} {}", report.index, report.outcome.kind()));
    }

    fn progress(&self, completed: usize, total: usize, _last: Duration) {
        self.push(format!("progress {completed}/{total}"));
    }

    fn sweep_finished(&self, summary: &SweepSummary) {
        self.push(format!("finished {}", summary.executed));
    }
}
