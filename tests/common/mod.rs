#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use domain_pulse::core::settings::MonitorSettings;
use domain_pulse::domain::{
    AlertDispatcher, AlertIntent, AlertKind, DomainRecord, DomainStore, DomainUpdate, Probe,
    ProbeResult,
};
use domain_pulse::{MemoryStore, MonitorEngine, MonitorError, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What a scripted probe does for one domain.
#[derive(Debug, Clone)]
pub enum Outcome {
    Reading(ProbeResult),
    Fail(String),
    Hang,
    Panic,
    Slow(Duration, ProbeResult),
}

#[derive(Default)]
pub struct ScriptedProbe {
    outcomes: Mutex<HashMap<String, Outcome>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, domain: &str, outcome: Outcome) -> Self {
        self.set(domain, outcome);
        self
    }

    pub fn set(&self, domain: &str, outcome: Outcome) {
        self.outcomes
            .lock()
            .unwrap()
            .insert(domain.to_string(), outcome);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Probe for ScriptedProbe {
    async fn check(&self, domain: &str) -> Result<ProbeResult> {
        self.calls.lock().unwrap().push(domain.to_string());
        let outcome = self
            .outcomes
            .lock()
            .unwrap()
            .get(domain)
            .cloned()
            .unwrap_or_else(|| Outcome::Reading(ProbeResult::up(120, true)));

        match outcome {
            Outcome::Reading(result) => Ok(result),
            Outcome::Fail(message) => Err(MonitorError::ProbeError {
                domain: domain.to_string(),
                message,
            }),
            Outcome::Hang => std::future::pending().await,
            Outcome::Panic => panic!("probe exploded for {}", domain),
            Outcome::Slow(delay, result) => {
                tokio::time::sleep(delay).await;
                Ok(result)
            }
        }
    }
}

/// Records every alert; can be told to fail delivery.
#[derive(Default)]
pub struct RecordingDispatcher {
    sent: Mutex<Vec<AlertIntent>>,
    attempts: AtomicUsize,
    fail: bool,
    hang: bool,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Accepts the alert and never answers.
    pub fn hanging() -> Self {
        Self {
            hang: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<AlertIntent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn kinds(&self) -> Vec<AlertKind> {
        self.sent().into_iter().map(|a| a.kind).collect()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AlertDispatcher for RecordingDispatcher {
    async fn send(&self, alert: &AlertIntent) -> Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.hang {
            return std::future::pending().await;
        }
        if self.fail {
            return Err(MonitorError::DispatchError {
                channel: "recording".to_string(),
                message: "channel offline".to_string(),
            });
        }
        self.sent.lock().unwrap().push(alert.clone());
        Ok(())
    }

    fn channel_name(&self) -> &str {
        "recording"
    }
}

/// Store whose list cannot be read.
pub struct BrokenStore;

#[async_trait]
impl DomainStore for BrokenStore {
    async fn domains(&self) -> Result<Vec<DomainRecord>> {
        Err(MonitorError::StoreError {
            message: "backend unavailable".to_string(),
        })
    }

    async fn apply_update(&self, _id: &str, _update: &DomainUpdate) -> Result<()> {
        Err(MonitorError::StoreError {
            message: "backend unavailable".to_string(),
        })
    }
}

/// A record that has been checked before, so transitions are compared.
pub fn checked_record(id: &str, name: &str) -> DomainRecord {
    let mut record = DomainRecord::new(id, name);
    record.last_check = Some(Utc::now() - ChronoDuration::minutes(5));
    record
}

pub fn reading(is_up: bool, response_time_ms: u64, ssl_valid: bool) -> ProbeResult {
    ProbeResult {
        is_up,
        response_time_ms,
        ssl_valid,
        ssl_expiry: None,
        domain_expiry: None,
        registrar: None,
        error: None,
    }
}

pub fn fast_settings() -> MonitorSettings {
    MonitorSettings::default().with_inter_check_delay(Duration::from_millis(1_000))
}

pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub probe: Arc<ScriptedProbe>,
    pub dispatcher: Arc<RecordingDispatcher>,
    pub engine: Arc<MonitorEngine>,
}

impl Harness {
    pub fn new(records: Vec<DomainRecord>, probe: ScriptedProbe) -> Self {
        Self::with_parts(records, probe, RecordingDispatcher::new(), fast_settings())
    }

    pub fn with_parts(
        records: Vec<DomainRecord>,
        probe: ScriptedProbe,
        dispatcher: RecordingDispatcher,
        settings: MonitorSettings,
    ) -> Self {
        let store = Arc::new(MemoryStore::new(records));
        let probe = Arc::new(probe);
        let dispatcher = Arc::new(dispatcher);
        let engine = Arc::new(MonitorEngine::new(
            store.clone(),
            probe.clone(),
            dispatcher.clone(),
            settings,
        ));
        Self {
            store,
            probe,
            dispatcher,
            engine,
        }
    }

    pub async fn record(&self, id: &str) -> DomainRecord {
        self.store
            .snapshot()
            .await
            .into_iter()
            .find(|r| r.id == id)
            .unwrap()
    }
}
