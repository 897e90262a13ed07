mod common;

use common::*;
use domain_pulse::adapters::{HttpProbe, HttpProbeConfig};
use domain_pulse::core::settings::MonitorSettings;
use domain_pulse::domain::{AlertKind, DomainStatus};
use domain_pulse::{MemoryStore, MonitorEngine};
use httpmock::prelude::*;
use httpmock::Method::HEAD;
use std::sync::Arc;
use std::time::Duration;

// Every technique answers slower than its own timeout, so the chain runs into
// its deadline. The domain must come out as down with an alert, not as a
// failed check.
#[tokio::test]
async fn hanging_host_is_reported_down_with_default_timeouts() {
    let server = MockServer::start_async().await;
    for (method, path) in [(GET, "/favicon.ico"), (GET, "/robots.txt"), (HEAD, "/")] {
        server
            .mock_async(|when, then| {
                when.method(method).path(path);
                then.status(200).delay(Duration::from_secs(6));
            })
            .await;
    }

    let probe = HttpProbe::new(HttpProbeConfig {
        base_url: Some(server.base_url()),
        ..HttpProbeConfig::default()
    })
    .unwrap();
    let store = Arc::new(MemoryStore::new(vec![checked_record("d1", "example.com")]));
    let dispatcher = Arc::new(RecordingDispatcher::new());
    let engine = MonitorEngine::new(
        store.clone(),
        Arc::new(probe),
        dispatcher.clone(),
        MonitorSettings::default().with_inter_check_delay(Duration::from_millis(1_000)),
    );

    let report = engine.sweep().await.unwrap();

    assert_eq!(report.checked, 1);
    assert_eq!(report.failed, 0);
    assert!(dispatcher.kinds().contains(&AlertKind::Down));
    assert!(dispatcher.sent()[0].message.contains("timed out"));

    let stored = store.snapshot().await;
    assert_eq!(stored[0].status, DomainStatus::Inactive);
    assert!((stored[0].uptime_percentage - 95.0).abs() < 1e-9);
}

#[tokio::test]
async fn chain_deadline_cuts_off_slow_techniques() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/favicon.ico");
            then.status(200).delay(Duration::from_secs(3));
        })
        .await;

    let probe = HttpProbe::new(HttpProbeConfig {
        base_url: Some(server.base_url()),
        technique_timeout: Duration::from_secs(2),
        deadline: Duration::from_millis(1_000),
        ..HttpProbeConfig::default()
    })
    .unwrap();

    let started = std::time::Instant::now();
    let result = domain_pulse::domain::Probe::check(&probe, "example.com")
        .await
        .unwrap();

    assert!(!result.is_up);
    assert_eq!(
        result.error.as_deref(),
        Some("Domain check timed out after 1000ms")
    );
    assert!(started.elapsed() < Duration::from_secs(2));
}
