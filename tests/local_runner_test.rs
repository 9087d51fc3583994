//! Runs real processes through LocalRunner to check failure classification.

#![cfg(unix)]

use std::time::{Duration, Instant};
use virtuoso_health::system::{CommandRunner, LocalRunner};
use virtuoso_health::ProbeError;

#[tokio::test]
async fn test_captures_stdout() {
    let runner = LocalRunner::new(Duration::from_secs(5));
    let out = runner
        .run("sh", &["-c".to_string(), "echo 'Mem: 1 2 3 4 5'".to_string()])
        .await
        .unwrap();
    assert_eq!(out.trim(), "Mem: 1 2 3 4 5");
}

#[tokio::test]
async fn test_missing_binary() {
    let runner = LocalRunner::new(Duration::from_secs(5));
    let err = runner
        .run("/nonexistent/bin/isql", &["0.0.0.0:1111".to_string()])
        .await
        .unwrap_err();
    assert!(matches!(err, ProbeError::Spawn { .. }));
}

#[tokio::test]
async fn test_non_zero_exit() {
    let runner = LocalRunner::new(Duration::from_secs(5));
    let err = runner
        .run("sh", &["-c".to_string(), "echo oops >&2; exit 3".to_string()])
        .await
        .unwrap_err();

    match err {
        ProbeError::ExitStatus { code, stderr, .. } => {
            assert_eq!(code, Some(3));
            assert_eq!(stderr, "oops");
        }
        other => panic!("expected exit status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_deadline_expires() {
    let runner = LocalRunner::new(Duration::from_secs(1));
    let started = Instant::now();
    let err = runner
        .run("sleep", &["30".to_string()])
        .await
        .unwrap_err();

    assert!(matches!(err, ProbeError::Timeout { timeout_secs: 1, .. }));
    assert!(started.elapsed() < Duration::from_secs(10));
}
