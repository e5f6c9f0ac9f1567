//! Registry persistence feeding the player

use emaki::cli::dump::{StopReason, run_dump};
use emaki::{
    CursorSnapshot, FileSystemRepository, PlayerConfig, RegistryRepository, SnapshotRepository,
    SurfaceCommand, TimelineRegistry,
};

const SAMPLE: &str = include_str!("../scenarios/sample.json");

#[tokio::test]
async fn stored_sample_plays_to_first_gate() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FileSystemRepository::new(dir.path());
    let sample = TimelineRegistry::from_json(SAMPLE).unwrap();

    repo.save_registry("sample", &sample).await.unwrap();
    let loaded = repo.load_registry("sample").await.unwrap();
    assert_eq!(loaded, sample);

    let report = run_dump(&loaded, &PlayerConfig::default(), "start").unwrap();
    assert_eq!(report.stopped, StopReason::Gate);
    assert_eq!(report.cursor.index, 5);
    assert!(report.commands.contains(&SurfaceCommand::SetDialogText {
        text: "Where would you like to begin?".to_string(),
    }));
}

#[tokio::test]
async fn snapshot_survives_between_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FileSystemRepository::new(dir.path());
    let snapshot = CursorSnapshot {
        timeline_key: Some("test".to_string()),
        index: 1,
    };

    repo.save_snapshot("sample", &snapshot).await.unwrap();

    let reopened = FileSystemRepository::new(dir.path());
    assert_eq!(
        reopened.load_snapshot("sample").await.unwrap(),
        Some(snapshot)
    );
    assert!(reopened.list_registries().await.unwrap().is_empty());
}

#[tokio::test]
async fn dump_of_unit01_reports_restart() {
    let dir = tempfile::tempdir().unwrap();
    tokio::fs::write(dir.path().join("sample.json"), SAMPLE)
        .await
        .unwrap();
    let repo = FileSystemRepository::new(dir.path());
    let registry = repo.load_registry("sample").await.unwrap();

    let report = run_dump(&registry, &PlayerConfig::default(), "unit01").unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(report.advances, 0);
    assert_eq!(json["stopped"]["navigation"]["Restart"]["timeline"], "unit02");
}
