use crate::core::settings::MonitorSettings;
use crate::core::transition::TransitionDetector;
use crate::core::update::{build_update, check_time};
use crate::domain::{AlertDispatcher, AlertIntent, DomainRecord, DomainStore, DomainUpdate, Probe, ProbeResult};
use crate::utils::error::{MonitorError, Result};
use chrono::Utc;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Counters for one sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub checked: usize,
    pub skipped: usize,
    pub failed: usize,
    pub alerts_sent: usize,
    pub alerts_failed: usize,
    pub updates_failed: usize,
}

/// Held for the duration of a sweep; dropping it returns the engine to idle,
/// whichever way the sweep ends.
#[derive(Debug)]
pub struct SweepGuard {
    running: Arc<AtomicBool>,
}

impl Drop for SweepGuard {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Release);
    }
}

pub struct MonitorEngine {
    store: Arc<dyn DomainStore>,
    probe: Arc<dyn Probe>,
    dispatcher: Arc<dyn AlertDispatcher>,
    detector: TransitionDetector,
    settings: MonitorSettings,
    running: Arc<AtomicBool>,
}

impl MonitorEngine {
    pub fn new(
        store: Arc<dyn DomainStore>,
        probe: Arc<dyn Probe>,
        dispatcher: Arc<dyn AlertDispatcher>,
        settings: MonitorSettings,
    ) -> Self {
        let detector =
            TransitionDetector::new(settings.slow_response_threshold_ms, settings.first_check);
        Self {
            store,
            probe,
            dispatcher,
            detector,
            settings,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn settings(&self) -> &MonitorSettings {
        &self.settings
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Moves the engine from idle to running, or returns `None` if a sweep
    /// is already in progress.
    pub fn try_begin_sweep(&self) -> Option<SweepGuard> {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SweepGuard {
                running: Arc::clone(&self.running),
            })
    }

    /// Runs one sweep now. Returns `None` when another sweep holds the engine.
    pub async fn sweep(&self) -> Option<SweepReport> {
        match self.try_begin_sweep() {
            Some(guard) => Some(self.run_sweep(guard).await),
            None => {
                tracing::debug!("Sweep already running, trigger dropped");
                None
            }
        }
    }

    pub async fn run_sweep(&self, _guard: SweepGuard) -> SweepReport {
        let mut report = SweepReport::default();

        let domains = match self.store.domains().await {
            Ok(domains) => domains,
            Err(e) => {
                tracing::error!("Could not load domains, skipping sweep: {}", e);
                return report;
            }
        };

        tracing::info!("Starting sweep over {} domains", domains.len());

        for domain in &domains {
            if !domain.monitoring_enabled {
                report.skipped += 1;
                continue;
            }

            tracing::debug!(domain = %domain.name, "Checking domain");
            match self.check_domain(domain, &mut report).await {
                Ok(()) => report.checked += 1,
                Err(e) => {
                    report.failed += 1;
                    tracing::warn!(domain = %domain.name, "Check failed, marking as error: {}", e);
                    let update = DomainUpdate::degraded(check_time(domain, Utc::now()));
                    if let Err(e) = self.store.apply_update(&domain.id, &update).await {
                        report.updates_failed += 1;
                        tracing::error!(domain = %domain.name, "Could not record degraded state: {}", e);
                    }
                }
            }

            tokio::time::sleep(self.settings.inter_check_delay).await;
        }

        tracing::info!(
            checked = report.checked,
            skipped = report.skipped,
            failed = report.failed,
            alerts_sent = report.alerts_sent,
            alerts_failed = report.alerts_failed,
            "Sweep finished"
        );
        report
    }

    async fn check_domain(&self, domain: &DomainRecord, report: &mut SweepReport) -> Result<()> {
        let result = self.probe_bounded(&domain.name).await?;
        let update = build_update(domain, &result, Utc::now());
        let intents = self.detector.detect(domain, &result);

        for intent in &intents {
            self.dispatch(intent, report).await;
        }

        self.store.apply_update(&domain.id, &update).await?;
        tracing::debug!(
            domain = %domain.name,
            is_up = result.is_up,
            response_time_ms = result.response_time_ms,
            "Update recorded"
        );
        Ok(())
    }

    /// Runs the probe on its own task so a panic or a hang stays contained.
    async fn probe_bounded(&self, name: &str) -> Result<ProbeResult> {
        let probe = Arc::clone(&self.probe);
        let target = name.to_string();
        let mut handle = tokio::spawn(async move { probe.check(&target).await });

        match tokio::time::timeout(self.settings.probe_timeout, &mut handle).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(MonitorError::ProbeError {
                domain: name.to_string(),
                message: format!("probe task aborted: {}", join_error),
            }),
            Err(_) => {
                handle.abort();
                Err(MonitorError::ProbeTimeout {
                    domain: name.to_string(),
                    timeout_ms: self.settings.probe_timeout.as_millis() as u64,
                })
            }
        }
    }

    async fn dispatch(&self, intent: &AlertIntent, report: &mut SweepReport) {
        tracing::info!(domain = %intent.domain, kind = %intent.kind, "Sending alert");
        let delivery = tokio::time::timeout(
            self.settings.dispatch_timeout,
            self.dispatcher.send(intent),
        )
        .await
        .unwrap_or_else(|_| {
            Err(MonitorError::dispatch(
                self.dispatcher.channel_name(),
                format!(
                    "no answer within {}ms",
                    self.settings.dispatch_timeout.as_millis()
                ),
            ))
        });

        match delivery {
            Ok(()) => report.alerts_sent += 1,
            Err(e) => {
                report.alerts_failed += 1;
                tracing::error!(
                    domain = %intent.domain,
                    kind = %intent.kind,
                    channel = self.dispatcher.channel_name(),
                    "Alert delivery failed: {}",
                    e
                );
            }
        }
    }

    pub async fn send_test_alert(&self, domain: &str) -> Result<()> {
        self.dispatcher.send_test(domain).await?;
        tracing::info!(
            domain,
            channel = self.dispatcher.channel_name(),
            "Test notification sent"
        );
        Ok(())
    }
}
