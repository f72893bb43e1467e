mod common;

use std::time::Duration;

use anyhow::Result;
use common::{Outcome, ScriptedModel};
use vwwbench_runtime::{RunConfig, VariantRegistry, Worker, WorkerError};

#[tokio::test]
async fn worker_runs_off_the_caller_thread() -> Result<()> {
    let mut reg = VariantRegistry::new();
    reg.register("Baseline", ScriptedModel::instant())?;
    reg.register("Student", ScriptedModel::instant())?;

    let handle = Worker::spawn(reg)?;
    let report = handle.run(RunConfig::with_iterations(10)).await?;

    assert_eq!(report.names(), vec!["Baseline", "Student"]);
    assert!(!handle.is_running());
    Ok(())
}

#[tokio::test]
async fn loaded_models_are_reused_across_runs() -> Result<()> {
    let model = ScriptedModel::instant();
    let calls = model.call_counter();
    let mut reg = VariantRegistry::new();
    reg.register("Baseline", model)?;

    let handle = Worker::spawn(reg)?;
    handle.run(RunConfig::with_iterations(10)).await?;
    handle.run(RunConfig::with_iterations(10)).await?;

    assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 30);
    Ok(())
}

#[tokio::test]
async fn second_run_while_busy_is_rejected() -> Result<()> {
    let mut reg = VariantRegistry::new();
    reg.register(
        "Baseline",
        ScriptedModel::new(|_| Outcome::Ok(Duration::from_millis(5))),
    )?;

    let handle = Worker::spawn(reg)?;
    let config = RunConfig {
        iterations: 10,
        warmup: 0,
        ..RunConfig::default()
    };
    let (first, second) = tokio::join!(handle.run(config), handle.run(config));

    assert_eq!(first?.names(), vec!["Baseline"]);
    assert!(matches!(second, Err(WorkerError::Busy)));

    // Once the first run is done a new one is accepted.
    let third = handle.run(config).await?;
    assert_eq!(third.results.len(), 1);
    Ok(())
}

#[tokio::test]
async fn abandoned_run_keeps_the_worker_busy() -> Result<()> {
    let mut reg = VariantRegistry::new();
    reg.register(
        "Baseline",
        ScriptedModel::new(|_| Outcome::Ok(Duration::from_millis(20))),
    )?;

    let handle = Worker::spawn(reg)?;
    let slow = RunConfig {
        iterations: 50,
        warmup: 0,
        ..RunConfig::default()
    };
    let abandoned = tokio::time::timeout(Duration::from_millis(50), handle.run(slow)).await;
    assert!(abandoned.is_err(), "run should still be in progress");

    assert!(handle.is_running());
    let quick = RunConfig {
        iterations: 1,
        warmup: 0,
        ..RunConfig::default()
    };
    assert!(matches!(handle.run(quick).await, Err(WorkerError::Busy)));

    let deadline = tokio::time::Instant::now() + Duration::from_secs(10);
    while handle.is_running() {
        assert!(tokio::time::Instant::now() < deadline, "worker never finished");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    let report = handle.run(quick).await?;
    assert_eq!(report.names(), vec!["Baseline"]);
    Ok(())
}
