use crate::core::engine::MonitorEngine;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trigger {
    Startup,
    Interval,
}

/// Drives periodic sweeps: one startup trigger, then a fixed interval.
///
/// Triggers that fire while a sweep is running are dropped. `stop` prevents
/// any future trigger but never interrupts the sweep in progress; `join`
/// waits for it to drain.
pub struct MonitorScheduler {
    engine: Arc<MonitorEngine>,
    startup_delay: Duration,
    sweep_interval: Duration,
    cancel: CancellationToken,
    timer: Option<JoinHandle<()>>,
}

impl MonitorScheduler {
    pub fn new(engine: Arc<MonitorEngine>) -> Self {
        let startup_delay = engine.settings().startup_delay;
        let sweep_interval = engine.settings().sweep_interval;
        Self {
            engine,
            startup_delay,
            sweep_interval,
            cancel: CancellationToken::new(),
            timer: None,
        }
    }

    pub fn is_started(&self) -> bool {
        self.timer.is_some()
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn start(&mut self) {
        if self.timer.is_some() {
            tracing::warn!("Scheduler already started");
            return;
        }
        if self.cancel.is_cancelled() {
            tracing::warn!("Scheduler was stopped and cannot be restarted");
            return;
        }

        tracing::info!(
            startup_delay_ms = self.startup_delay.as_millis() as u64,
            sweep_interval_ms = self.sweep_interval.as_millis() as u64,
            "Starting monitor scheduler"
        );

        self.timer = Some(tokio::spawn(run_timers(
            Arc::clone(&self.engine),
            self.startup_delay,
            self.sweep_interval,
            self.cancel.clone(),
        )));
    }

    pub fn stop(&self) {
        tracing::info!("Stopping monitor scheduler");
        self.cancel.cancel();
    }

    /// Waits for the timer task and any in-flight sweep to finish.
    pub async fn join(&mut self) {
        if let Some(timer) = self.timer.take() {
            if let Err(e) = timer.await {
                tracing::error!("Scheduler task ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for MonitorScheduler {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run_timers(
    engine: Arc<MonitorEngine>,
    startup_delay: Duration,
    sweep_interval: Duration,
    cancel: CancellationToken,
) {
    let started = Instant::now();
    let startup = tokio::time::sleep_until(started + startup_delay);
    tokio::pin!(startup);
    let mut startup_pending = true;

    let mut ticker = tokio::time::interval_at(started + sweep_interval, sweep_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut in_flight: Option<JoinHandle<()>> = None;

    loop {
        let trigger = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = &mut startup, if startup_pending => {
                startup_pending = false;
                Trigger::Startup
            }
            _ = ticker.tick() => Trigger::Interval,
        };

        let Some(guard) = engine.try_begin_sweep() else {
            tracing::debug!(?trigger, "Sweep still running, trigger dropped");
            continue;
        };

        // The previous sweep released the guard, so its task is done or about to be.
        if let Some(previous) = in_flight.take() {
            reap(previous).await;
        }

        tracing::debug!(?trigger, "Sweep triggered");
        let engine = Arc::clone(&engine);
        in_flight = Some(tokio::spawn(async move {
            engine.run_sweep(guard).await;
        }));
    }

    if let Some(sweep) = in_flight {
        reap(sweep).await;
    }
    tracing::info!("Monitor scheduler stopped");
}

async fn reap(sweep: JoinHandle<()>) {
    if let Err(e) = sweep.await {
        tracing::error!("Sweep task failed: {}", e);
    }
}
