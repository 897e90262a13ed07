mod common;

use common::*;
use domain_pulse::core::health::{DomainHealth, HealthState};
use domain_pulse::domain::{AlertKind, DomainRecord, DomainStatus, DomainStore};
use domain_pulse::utils::validation::Validate;
use domain_pulse::{JsonFileStore, MonitorConfig, MonitorEngine};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tempfile::{NamedTempFile, TempDir};

#[tokio::test(start_paused = true)]
async fn sweep_persists_updates_to_json_store() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("domains.json");
    let mut paused = checked_record("d3", "paused.example");
    paused.monitoring_enabled = false;
    let records = vec![
        checked_record("d1", "up.example"),
        checked_record("d2", "down.example"),
        paused,
    ];
    std::fs::write(&path, serde_json::to_vec_pretty(&records).unwrap()).unwrap();

    let probe = Arc::new(
        ScriptedProbe::new().with("down.example", Outcome::Reading(reading(false, 80, true))),
    );
    let dispatcher = Arc::new(RecordingDispatcher::new());
    let engine = MonitorEngine::new(
        Arc::new(JsonFileStore::new(&path)),
        probe.clone(),
        dispatcher.clone(),
        fast_settings(),
    );

    let report = engine.sweep().await.unwrap();
    assert_eq!(report.checked, 2);
    assert_eq!(report.skipped, 1);
    assert_eq!(dispatcher.kinds(), vec![AlertKind::Down]);

    let stored = JsonFileStore::new(&path).domains().await.unwrap();
    assert_eq!(stored[0].status, DomainStatus::Active);
    assert_eq!(stored[1].status, DomainStatus::Inactive);
    assert!((stored[1].uptime_percentage - 95.0).abs() < 1e-9);
    assert_eq!(stored[2], records[2]);

    let health = DomainHealth::from_record(&stored[1], chrono::Utc::now());
    assert_eq!(health.state, HealthState::Down);
}

#[tokio::test]
async fn json_store_accepts_minimal_records() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("domains.json");
    std::fs::write(&path, r#"[{"id":"d1","name":"example.com"}]"#).unwrap();

    let stored = JsonFileStore::new(&path).domains().await.unwrap();

    assert_eq!(stored, vec![DomainRecord::new("d1", "example.com")]);
}

#[tokio::test]
async fn config_file_drives_engine_settings() {
    let dir = TempDir::new().unwrap();
    let store_path = dir.path().join("list.json");
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[schedule]
startup_delay_ms = 500
sweep_interval_ms = 120000
inter_check_delay_ms = 1000

[alerts]
slow_response_threshold_ms = 800

[store]
path = "{}"
"#,
        store_path.display()
    )
    .unwrap();

    let config = MonitorConfig::from_file(file.path()).unwrap();
    config.validate().unwrap();

    let settings = config.monitor_settings();
    assert_eq!(settings.startup_delay, Duration::from_millis(500));
    assert_eq!(settings.sweep_interval, Duration::from_secs(120));
    assert_eq!(settings.slow_response_threshold_ms, 800);
    assert_eq!(config.store_path(), store_path.display().to_string());
    assert!(config.enabled_email().is_none());
    assert!(config.enabled_webhook().is_none());
}
