use std::time::Duration;
use tempfile::TempDir;

use cinema_admin::{
    config::Config,
    dataset::Dataset,
    models::{Film, RecordKind, Session},
    persistence::PersistenceService,
    pipeline::{DatasetGate, PipelineCoordinator, PipelineStatus, StageStatus},
};

fn config_in(temp_dir: &TempDir) -> Config {
    let mut config = Config::with_data_dir(temp_dir.path());
    config.pipeline.loader_delay = Duration::ZERO;
    config
}

fn films(titles: &[&str]) -> Dataset {
    let mut dataset = Dataset::new();
    for title in titles {
        dataset.append(Film::new(*title, "Director", "2000", "Drama", "100 min"));
    }
    dataset
}

fn titles(dataset: &Dataset) -> Vec<String> {
    dataset.films().iter().map(|f| f.title.clone()).collect()
}

#[tokio::test]
async fn test_two_film_scenario() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_in(&temp_dir);
    let coordinator = PipelineCoordinator::new(DatasetGate::new(films(&["A", "B"])), config.clone());

    let execution = coordinator.run_pipeline().await.unwrap();
    assert!(execution.is_success(), "{execution:?}");

    let dataset = coordinator.gate().snapshot().await;
    assert_eq!(titles(&dataset), vec!["A (edited)", "B (edited)"]);

    let films_file = config.storage.markup_path(RecordKind::Film);
    assert!(films_file.exists());
    let mut exported = Dataset::new();
    PersistenceService::new(config.storage.clone())
        .import_markup(&mut exported)
        .await
        .into_result()
        .unwrap();
    assert_eq!(titles(&exported), vec!["A (edited)", "B (edited)"]);

    let html = std::fs::read_to_string(config.storage.pipeline_report_path()).unwrap();
    assert!(html.contains("A (edited)"));
    assert!(html.contains("B (edited)"));
}

#[tokio::test]
async fn test_loader_replaces_dataset_from_snapshot() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_in(&temp_dir);

    let mut snapshot = films(&["Snapshot"]);
    snapshot.append(Session::new("Snapshot", "01.01.2026", "10:00", "Hall 1", "350"));
    PersistenceService::new(config.storage.clone())
        .export_markup(&snapshot)
        .await
        .unwrap();

    let coordinator = PipelineCoordinator::new(DatasetGate::new(films(&["InMemory"])), config);
    let execution = coordinator.run_pipeline().await.unwrap();

    assert!(execution.is_success());
    let loader = execution.stage("loader").unwrap();
    assert_eq!(loader.counts.unwrap().films, 1);

    let dataset = coordinator.gate().snapshot().await;
    assert_eq!(titles(&dataset), vec!["Snapshot (edited)"]);
    assert_eq!(dataset.sessions()[0].price, "350 (edited)");
}

#[tokio::test]
async fn test_repeated_runs_keep_single_title_suffix() {
    let temp_dir = TempDir::new().unwrap();
    let coordinator =
        PipelineCoordinator::new(DatasetGate::new(films(&["A"])), config_in(&temp_dir));

    coordinator.run_pipeline().await.unwrap();
    coordinator.run_pipeline().await.unwrap();

    let dataset = coordinator.gate().snapshot().await;
    assert_eq!(titles(&dataset), vec!["A (edited)"]);
}

#[tokio::test]
async fn test_failing_loader_still_releases_downstream() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_in(&temp_dir);
    std::fs::write(
        config.storage.markup_path(RecordKind::Film),
        "<cinema><films><film title=\"broken\">",
    )
    .unwrap();

    let coordinator = PipelineCoordinator::new(DatasetGate::new(films(&["A"])), config.clone());
    let execution = tokio::time::timeout(Duration::from_secs(10), coordinator.run_pipeline())
        .await
        .expect("downstream stages must not hang")
        .unwrap();

    assert_eq!(execution.status, PipelineStatus::Failed);
    assert!(matches!(
        execution.stage("loader").unwrap().status,
        StageStatus::Failed { .. }
    ));
    assert_eq!(execution.stage("editor").unwrap().status, StageStatus::Completed);
    assert_eq!(execution.stage("reporter").unwrap().status, StageStatus::Completed);

    let dataset = coordinator.gate().snapshot().await;
    assert_eq!(titles(&dataset), vec!["A (edited)"]);
    assert!(config.storage.pipeline_report_path().exists());
}

#[tokio::test]
async fn test_loader_fails_when_snapshot_location_cannot_be_checked() {
    let temp_dir = TempDir::new().unwrap();
    let not_a_dir = temp_dir.path().join("plain-file");
    std::fs::write(&not_a_dir, "").unwrap();
    let mut config = Config::with_data_dir(not_a_dir.clone());
    config.pipeline.loader_delay = Duration::ZERO;

    let coordinator = PipelineCoordinator::new(DatasetGate::new(films(&["A"])), config);
    let execution = coordinator.run_pipeline().await.unwrap();

    assert_eq!(execution.status, PipelineStatus::Failed);
    assert!(matches!(
        execution.stage("loader").unwrap().status,
        StageStatus::Failed { .. }
    ));
}

#[tokio::test]
async fn test_reporter_failure_is_recorded_not_raised() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = config_in(&temp_dir);
    config.storage.pipeline_report_file = "missing-dir/report.html".to_string();

    let coordinator = PipelineCoordinator::new(DatasetGate::new(films(&["A"])), config);
    let execution = coordinator.run_pipeline().await.unwrap();

    assert_eq!(execution.status, PipelineStatus::Failed);
    assert_eq!(execution.failed_stages().len(), 1);
    assert_eq!(execution.failed_stages()[0].id, "reporter");
    assert_eq!(execution.stage("editor").unwrap().status, StageStatus::Completed);
}
