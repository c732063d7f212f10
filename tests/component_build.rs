//! Component builds driven through the library with fake git and process runners.

mod common;

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use common::prelude::*;
use component_builder::request::{BuildOutcome, BuildRequest, ComponentRequest, StatusCode};

fn component(repo: &str, name: &str) -> BuildRequest {
    BuildRequest::Component(ComponentRequest {
        repo: repo.to_string(),
        branch: None,
        name: name.to_string(),
    })
}

#[test]
fn test_component_build_installs_then_builds_in_target() {
    let temp = TempDir::new().unwrap();
    let git = Arc::new(FakeGit::new().with_repo(
        "https://example.com/btn.git",
        &[("package.json", r#"{"name": "btn"}"#)],
    ));
    let runner = Arc::new(RecordingRunner::new());
    let pipeline = pipeline(temp.path(), git.clone(), runner.clone());

    let outcome = pipeline.build(&component("https://example.com/btn.git", "btn"));

    assert_eq!(outcome, BuildOutcome::success("build success"));
    let target = temp.path().join("btn");
    assert!(target.join("package.json").is_file());
    assert_eq!(
        runner.calls(),
        vec![
            RunnerCall {
                command: "yarn install".to_string(),
                working_dir: target.clone(),
            },
            RunnerCall {
                command: "npm run build".to_string(),
                working_dir: target,
            },
        ]
    );
}

#[test]
fn test_unreachable_repository_reports_clone_error() {
    let temp = TempDir::new().unwrap();
    let git = Arc::new(FakeGit::new());
    let runner = Arc::new(RecordingRunner::new());
    let pipeline = pipeline(temp.path(), git, runner.clone());

    let outcome = pipeline.build(&component("https://unreachable.invalid/x.git", "btn"));

    assert_eq!(outcome.code, StatusCode::Failure);
    assert!(outcome.message.contains("Could not resolve host"));
    assert!(runner.calls().is_empty());
}

#[test]
fn test_install_failure_skips_build_tool() {
    let temp = TempDir::new().unwrap();
    let git = Arc::new(FakeGit::new().with_repo("btn", &[("package.json", "{}")]));
    let runner = Arc::new(RecordingRunner::failing("yarn"));
    let pipeline = pipeline(temp.path(), git, runner.clone());

    let outcome = pipeline.build(&component("btn", "btn"));

    assert_eq!(outcome, BuildOutcome::failure("stderr:yarn failed"));
    assert_eq!(runner.calls().len(), 1);
}

#[test]
fn test_build_failure_message_is_outcome() {
    let temp = TempDir::new().unwrap();
    let git = Arc::new(FakeGit::new().with_repo("btn", &[("package.json", "{}")]));
    let runner = Arc::new(RecordingRunner::failing("npm"));
    let pipeline = pipeline(temp.path(), git, runner.clone());

    let outcome = pipeline.build(&component("btn", "btn"));

    assert_eq!(outcome, BuildOutcome::failure("stderr:npm failed"));
    assert_eq!(runner.calls().len(), 2);
}

#[test]
fn test_rebuild_discards_previous_checkout() {
    let temp = TempDir::new().unwrap();
    let git = Arc::new(FakeGit::new().with_repo("btn", &[("package.json", "{}")]));
    let runner = Arc::new(RecordingRunner::new());
    let pipeline = pipeline(temp.path(), git.clone(), runner);

    assert!(pipeline.build(&component("btn", "btn")).is_success());
    let stale = temp.path().join("btn/node_modules/stale.js");
    fs::create_dir_all(stale.parent().unwrap()).unwrap();
    fs::write(&stale, "old").unwrap();

    assert!(pipeline.build(&component("btn", "btn")).is_success());

    assert!(!stale.exists());
    assert_eq!(git.cloned(), vec!["btn".to_string(), "btn".to_string()]);
}

#[test]
fn test_concurrent_builds_of_same_name_run_one_at_a_time() {
    let temp = TempDir::new().unwrap();
    let git = Arc::new(
        FakeGit::new()
            .with_repo("btn", &[("package.json", "{}")])
            .with_delay(Duration::from_millis(100)),
    );
    let runner = Arc::new(RecordingRunner::new());
    let pipeline = pipeline(temp.path(), git.clone(), runner.clone());

    let outcomes: Vec<BuildOutcome> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| pipeline.build(&component("btn", "btn"))))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(outcomes.iter().all(BuildOutcome::is_success));
    assert_eq!(git.cloned().len(), 4);
    assert_eq!(git.peak_concurrent_clones(&temp.path().join("btn")), 1);
    assert_eq!(runner.calls().len(), 8);
}

#[test]
fn test_separate_pipelines_on_one_root_run_one_at_a_time() {
    // Each pipeline has its own lock registry, like two CLI processes.
    let temp = TempDir::new().unwrap();
    let git = Arc::new(
        FakeGit::new()
            .with_repo("btn", &[("package.json", "{}")])
            .with_delay(Duration::from_millis(300)),
    );
    let first = pipeline(temp.path(), git.clone(), Arc::new(RecordingRunner::new()));
    let second = pipeline(temp.path(), git.clone(), Arc::new(RecordingRunner::new()));

    let outcomes: Vec<BuildOutcome> = std::thread::scope(|scope| {
        let a = scope.spawn(|| first.build(&component("btn", "btn")));
        let b = scope.spawn(|| second.build(&component("btn", "btn")));
        vec![a.join().unwrap(), b.join().unwrap()]
    });

    assert!(outcomes.iter().all(BuildOutcome::is_success));
    assert_eq!(git.cloned().len(), 2);
    assert_eq!(git.peak_concurrent_clones(&temp.path().join("btn")), 1);
}

#[test]
fn test_request_json_drives_component_build() {
    let temp = TempDir::new().unwrap();
    let git = Arc::new(FakeGit::new().with_repo("btn", &[("package.json", "{}")]));
    let runner = Arc::new(RecordingRunner::new());
    let pipeline = pipeline(temp.path(), git, runner);

    let request = BuildRequest::from_json(
        r#"{"kind": "component", "repository_url": "btn", "name": "btn"}"#,
    )
    .unwrap();
    let outcome = pipeline.build(&request);

    assert_eq!(
        serde_json::to_value(&outcome).unwrap(),
        json!({"code": "success", "message": "build success"})
    );
}
