//! End-to-end sweep tests
//!
//! Each test builds a throwaway workspace with a template and a scripted
//! stand-in for the verification tool, then drives the controller.

use std::fs;
use std::path::Path;
use std::time::Duration;

use super::support::{PASSING_OUTPUT, Recorder, Workspace, echo_tool};
use crate::analysis::{NullReporter, RunReport, SweepController, SweepProgress, SweepReporter};
use crate::config::ParameterSpec;
use crate::error::{ConfigError, ExecError, SweepError};
use crate::exec::ToolCommand;
use crate::model::{ParameterAssignment, ParameterValue};
use crate::store;

fn n_spec(values: &[i64]) -> ParameterSpec {
    ParameterSpec::builder()
        .parameter("n", "N", values.iter().copied())
        .build()
        .unwrap()
}

/// Tool that fails on N = 2, prints garbage on N = 3 and passes otherwise
const MIXED_TOOL: &str = r#"
if grep -q "N = 2" "$2"; then
  echo '{"errors": ["boom"], "results": []}'
elif grep -q "N = 3" "$2"; then
  echo 'this is not json'
else
  echo '{"errors": [], "results": [{"result": 1, "visited_states": 10}]}'
fi
"#;

#[test]
fn test_renders_each_assignment_in_order() {
    let ws = Workspace::new("-- header\nN = 1\n");
    let tool = ws.tool(&echo_tool(PASSING_OUTPUT));
    let controller = SweepController::new(ws.config(n_spec(&[2, 3]), tool)).unwrap();
    let recorder = Recorder::default();

    let summary = controller
        .run(0, &SweepProgress::default(), &recorder)
        .unwrap();

    assert_eq!(
        fs::read_to_string(ws.out().join("run_n2.csp")).unwrap(),
        "-- header\nN = 2\n"
    );
    assert_eq!(
        fs::read_to_string(ws.out().join("run_n3.csp")).unwrap(),
        "-- header\nN = 3\n"
    );
    assert_eq!(
        ws.outputs(),
        vec!["run_n2.csp", "run_n2.json", "run_n3.csp", "run_n3.json"]
    );

    assert_eq!(
        recorder.events(),
        vec![
            "start 0/2",
            "run 0 run_n2.csp",
            "done 0 completed",
            "progress 1/2",
            "run 1 run_n3.csp",
            "done 1 completed",
            "progress 2/2",
            "finished 2",
        ]
    );
    assert_eq!(summary.executed, 2);
    assert_eq!(summary.completed, 2);
    assert_eq!(summary.passed, 2);
}

#[test]
fn test_artifact_carries_time_and_parameters() {
    let ws = Workspace::new("N = 1\n");
    let tool = ws.tool(&echo_tool(PASSING_OUTPUT));
    let controller = SweepController::new(ws.config(n_spec(&[5]), tool)).unwrap();

    controller
        .run(0, &SweepProgress::default(), &NullReporter)
        .unwrap();

    let artifact = store::load(&ws.out().join("run_n5.json")).unwrap();
    let expected: ParameterAssignment = [("n", ParameterValue::Int(5))].into_iter().collect();
    assert_eq!(artifact.parameters, expected);
    assert!(artifact.time > 0.0);
    assert_eq!(artifact.results[0].states(), Some(10));
    assert_eq!(artifact.results[0].transitions(), Some(25));
}

#[test]
fn test_per_run_failures_do_not_stop_the_sweep() {
    let ws = Workspace::new("N = 1\n");
    let tool = ws.tool(MIXED_TOOL);
    let controller = SweepController::new(ws.config(n_spec(&[2, 3, 4]), tool)).unwrap();
    let recorder = Recorder::default();

    let summary = controller
        .run(0, &SweepProgress::default(), &recorder)
        .unwrap();

    assert_eq!(summary.executed, 3);
    assert_eq!(summary.tool_errors, 1);
    assert_eq!(summary.malformed, 1);
    assert_eq!(summary.completed, 1);
    assert_eq!(summary.passed, 1);

    // Only the completed run leaves an artifact behind
    assert_eq!(
        ws.outputs(),
        vec!["run_n2.csp", "run_n3.csp", "run_n4.csp", "run_n4.json"]
    );

    let finished: Vec<String> = recorder
        .events()
        .into_iter()
        .filter(|e| e.starts_with("done"))
        .collect();
    assert_eq!(
        finished,
        vec!["done 0 tool_error", "done 1 malformed_output", "done 2 completed"]
    );
}

#[test]
fn test_no_assertions_still_persists() {
    let ws = Workspace::new("N = 1\n");
    let tool = ws.tool(&echo_tool(r#"{"errors": [], "results": []}"#));
    let controller = SweepController::new(ws.config(n_spec(&[1]), tool)).unwrap();

    let summary = controller
        .run(0, &SweepProgress::default(), &NullReporter)
        .unwrap();

    assert_eq!(summary.no_assertions, 1);
    assert!(ws.out().join("run_n1.json").exists());
}

#[test]
fn test_resume_from_index() {
    let ws = Workspace::new("N = 1\n");
    let tool = ws.tool(&echo_tool(PASSING_OUTPUT));
    let controller = SweepController::new(ws.config(n_spec(&[2, 3, 4]), tool)).unwrap();
    let progress = SweepProgress::default();

    let summary = controller.run(2, &progress, &NullReporter).unwrap();

    assert_eq!(summary.start, 2);
    assert_eq!(summary.executed, 1);
    assert_eq!(ws.outputs(), vec!["run_n4.csp", "run_n4.json"]);
    assert_eq!(progress.completed(), 3);
    assert_eq!(progress.total(), 3);
}

#[test]
fn test_start_index_equal_to_total_is_rejected() {
    let ws = Workspace::new("N = 1\n");
    let tool = ws.tool(&echo_tool(PASSING_OUTPUT));
    let controller = SweepController::new(ws.config(n_spec(&[2, 3]), tool)).unwrap();
    let recorder = Recorder::default();

    let err = controller
        .run(2, &SweepProgress::default(), &recorder)
        .unwrap_err();

    assert!(matches!(
        err,
        SweepError::InvalidStartIndex { start: 2, total: 2 }
    ));
    assert!(ws.outputs().is_empty());
    assert!(recorder.events().is_empty());
}

#[test]
fn test_negative_and_oversized_start_indices_are_rejected() {
    let ws = Workspace::new("N = 1\n");
    let tool = ws.tool(&echo_tool(PASSING_OUTPUT));
    let controller = SweepController::new(ws.config(n_spec(&[2, 3]), tool)).unwrap();

    for start in [-1, 7] {
        let err = controller
            .run(start, &SweepProgress::default(), &NullReporter)
            .unwrap_err();
        assert!(matches!(err, SweepError::InvalidStartIndex { total: 2, .. }));
    }
    assert!(ws.outputs().is_empty());
}

#[test]
fn test_missing_template_is_fatal() {
    let ws = Workspace::new("N = 1\n");
    fs::remove_file(ws.template()).unwrap();
    let tool = ws.tool(&echo_tool(PASSING_OUTPUT));
    let controller = SweepController::new(ws.config(n_spec(&[2]), tool)).unwrap();

    let err = controller
        .run(0, &SweepProgress::default(), &NullReporter)
        .unwrap_err();

    assert!(matches!(err, SweepError::MissingTemplate { .. }));
    assert!(ws.outputs().is_empty());
}

#[test]
fn test_missing_placeholder_warns_by_default() {
    let ws = Workspace::new("N = 1\n");
    let tool = ws.tool(&echo_tool(PASSING_OUTPUT));
    let spec = ParameterSpec::builder()
        .parameter("n", "N", [2_i64])
        .parameter("k", "K", [7_i64])
        .build()
        .unwrap();
    let controller = SweepController::new(ws.config(spec, tool)).unwrap();
    let recorder = Recorder::default();

    controller
        .run(0, &SweepProgress::default(), &recorder)
        .unwrap();

    assert_eq!(recorder.events()[0], "missing K");
    assert_eq!(
        fs::read_to_string(ws.out().join("run_n2_k7.csp")).unwrap(),
        "N = 2\n"
    );
}

#[test]
fn test_missing_placeholder_is_fatal_when_strict() {
    let ws = Workspace::new("N = 1\n");
    let tool = ws.tool(&echo_tool(PASSING_OUTPUT));
    let spec = ParameterSpec::builder()
        .parameter("k", "K", [7_i64])
        .build()
        .unwrap();
    let controller = SweepController::new(ws.config(spec, tool).strict(true)).unwrap();

    let err = controller
        .run(0, &SweepProgress::default(), &NullReporter)
        .unwrap_err();

    match err {
        SweepError::MissingPlaceholder { constants } => assert_eq!(constants, vec!["K"]),
        other => panic!("unexpected error: {other}"),
    }
    assert!(ws.outputs().is_empty());
}

/// Cancels the sweep as soon as a given index is launched
struct CancelAt {
    index: usize,
    progress: SweepProgress,
}

impl SweepReporter for CancelAt {
    fn run_started(&self, index: usize, _file: &Path, _parameters: &ParameterAssignment) {
        if index == self.index {
            self.progress.cancel();
        }
    }

    fn run_finished(&self, report: &RunReport) {
        assert!(report.index < self.index, "no run may finish after cancellation");
    }
}

#[test]
fn test_cancellation_stops_the_sweep_and_keeps_earlier_artifacts() {
    let ws = Workspace::new("N = 1\n");
    let tool = ws.tool(&echo_tool(PASSING_OUTPUT));
    let controller = SweepController::new(ws.config(n_spec(&[2, 3, 4]), tool)).unwrap();
    let progress = SweepProgress::default();
    let reporter = CancelAt {
        index: 1,
        progress: progress.clone(),
    };

    let err = controller.run(0, &progress, &reporter).unwrap_err();

    assert!(matches!(err, SweepError::Cancelled { index: 1 }));
    assert_eq!(ws.outputs(), vec!["run_n2.csp", "run_n2.json", "run_n3.csp"]);
    let earlier = store::load(&ws.out().join("run_n2.json")).unwrap();
    assert_eq!(earlier.results.len(), 1);
}

#[test]
fn test_cancellation_kills_running_tool() {
    let ws = Workspace::new("N = 1\n");
    let tool = ws.tool("exec sleep 30\n");
    let controller = SweepController::new(ws.config(n_spec(&[2, 3]), tool)).unwrap();
    let progress = SweepProgress::default();

    let canceller = {
        let progress = progress.clone();
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(200));
            progress.cancel();
        })
    };

    let started = std::time::Instant::now();
    let err = controller.run(0, &progress, &NullReporter).unwrap_err();
    canceller.join().unwrap();

    assert!(matches!(err, SweepError::Cancelled { index: 0 }));
    assert!(started.elapsed() < Duration::from_secs(10));
    assert_eq!(ws.outputs(), vec!["run_n2.csp"]);
}

#[test]
fn test_launch_failure_is_fatal() {
    let ws = Workspace::new("N = 1\n");
    let tool = ToolCommand::new("/nonexistent/refines", ["--format=json"]);
    let controller = SweepController::new(ws.config(n_spec(&[2, 3]), tool)).unwrap();

    let err = controller
        .run(0, &SweepProgress::default(), &NullReporter)
        .unwrap_err();

    assert!(matches!(err, SweepError::Exec(ExecError::Launch { .. })));
}

#[test]
fn test_rerun_overwrites_artifacts() {
    let ws = Workspace::new("N = 1\n");
    let tool = ws.tool(&echo_tool(PASSING_OUTPUT));
    let controller = SweepController::new(ws.config(n_spec(&[2]), tool)).unwrap();

    controller
        .run(0, &SweepProgress::default(), &NullReporter)
        .unwrap();
    let first = store::load(&ws.out().join("run_n2.json")).unwrap();
    controller
        .run(0, &SweepProgress::default(), &NullReporter)
        .unwrap();
    let second = store::load(&ws.out().join("run_n2.json")).unwrap();

    assert_eq!(first.parameters, second.parameters);
    assert_eq!(ws.outputs(), vec!["run_n2.csp", "run_n2.json"]);
}

#[test]
fn test_plan_lists_every_index() {
    let ws = Workspace::new("N = 1\n");
    let spec = ParameterSpec::builder()
        .parameter("a", "A", [1_i64, 2])
        .parameter("b", "B", ["x", "y"])
        .build()
        .unwrap();
    let controller = SweepController::new(ws.config(spec, ToolCommand::default())).unwrap();

    let plan = controller.plan();
    let names: Vec<String> = plan
        .iter()
        .map(|p| p.file.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec!["run_a1_bx.csp", "run_a1_by.csp", "run_a2_bx.csp", "run_a2_by.csp"]
    );
    assert_eq!(plan[3].index, 3);
    assert!(ws.outputs().is_empty());
}

#[test]
fn test_values_sanitized_to_the_same_name_are_rejected() {
    let ws = Workspace::new("N = 1\n");
    let spec = ParameterSpec::builder()
        .parameter("n", "N", ["a/b", "a_b", "a b"])
        .build()
        .unwrap();

    let err = SweepController::new(ws.config(spec, ws.tool(&echo_tool(PASSING_OUTPUT))))
        .err()
        .unwrap();

    match err {
        SweepError::Config(ConfigError::FileNameCollision {
            file,
            first,
            second,
        }) => {
            assert_eq!(file, "run_na_b");
            assert_eq!((first, second), (0, 1));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(ws.outputs().is_empty());
}

#[test]
fn test_number_and_numeric_text_collide() {
    let ws = Workspace::new("N = 1\n");
    let spec = ParameterSpec::builder()
        .parameter("n", "N", [ParameterValue::Int(2), ParameterValue::from("2")])
        .build()
        .unwrap();

    let err = SweepController::new(ws.config(spec, ToolCommand::default()))
        .err()
        .unwrap();

    assert!(matches!(
        err,
        SweepError::Config(ConfigError::FileNameCollision {
            first: 0,
            second: 1,
            ..
        })
    ));
}

#[test]
fn test_tool_interrupted_by_sigint_cancels_the_sweep() {
    let ws = Workspace::new("N = 1\n");
    let tool = ws.tool("kill -INT $$\nsleep 5\n");
    let controller = SweepController::new(ws.config(n_spec(&[2, 3]), tool)).unwrap();
    let progress = SweepProgress::default();

    let err = controller.run(0, &progress, &NullReporter).unwrap_err();

    assert!(matches!(err, SweepError::Cancelled { index: 0 }));
    assert!(progress.is_cancelled());
    assert_eq!(ws.outputs(), vec!["run_n2.csp"]);
}
