use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use domain_pulse::adapters::{
    EmailDispatcher, FanoutDispatcher, HttpProbe, JsonFileStore, LogDispatcher, WebhookDispatcher,
};
use domain_pulse::core::health::DomainHealth;
use domain_pulse::domain::{AlertDispatcher, DomainStore};
use domain_pulse::utils::error::ErrorSeverity;
use domain_pulse::utils::{logger, validation::Validate};
use domain_pulse::{CliConfig, MonitorConfig, MonitorEngine, MonitorError, MonitorScheduler};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let config = match cli.load_monitor_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(exit_code(&e));
        }
    };

    let verbose = config.logging.verbose.unwrap_or(false);
    if config.json_logs() {
        logger::init_json_logger(verbose);
    } else {
        logger::init_cli_logger(verbose);
    }

    tracing::info!("Starting domain-pulse");
    if verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(exit_code(&e));
    }

    let store: Arc<dyn DomainStore> = Arc::new(JsonFileStore::new(config.store_path()));
    let probe = Arc::new(
        HttpProbe::new(config.http_probe_config()).context("failed to build the HTTP probe")?,
    );
    let dispatcher = build_dispatcher(&config).context("failed to set up alert channels")?;
    let engine = Arc::new(MonitorEngine::new(
        Arc::clone(&store),
        probe,
        dispatcher,
        config.monitor_settings(),
    ));

    if let Some(domain) = &cli.test_alert {
        return match engine.send_test_alert(domain).await {
            Ok(()) => {
                println!("✅ Test notification sent for {}", domain);
                Ok(())
            }
            Err(e) => {
                tracing::error!("❌ Test notification failed: {}", e);
                eprintln!("❌ {}", e.user_friendly_message());
                std::process::exit(exit_code(&e));
            }
        };
    }

    if cli.status {
        let domains = store
            .domains()
            .await
            .with_context(|| format!("failed to read domain list from {}", config.store_path()))?;
        let now = Utc::now();
        for record in &domains {
            println!("{}", DomainHealth::from_record(record, now));
        }
        return Ok(());
    }

    if cli.once {
        if let Some(report) = engine.sweep().await {
            tracing::info!("✅ Sweep completed");
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        return Ok(());
    }

    let mut scheduler = MonitorScheduler::new(engine);
    scheduler.start();
    tracing::info!("🔍 Monitoring {} (Ctrl-C to stop)", config.store_path());

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;

    tracing::info!("Shutdown requested, waiting for the current sweep to finish");
    scheduler.stop();
    scheduler.join().await;
    tracing::info!("✅ Stopped");

    Ok(())
}

fn build_dispatcher(config: &MonitorConfig) -> domain_pulse::Result<Arc<dyn AlertDispatcher>> {
    let mut channels: Vec<Arc<dyn AlertDispatcher>> = Vec::new();

    if let Some(email) = config.enabled_email() {
        channels.push(Arc::new(EmailDispatcher::new(email.clone())));
    }
    if let Some(webhook) = config.enabled_webhook() {
        channels.push(Arc::new(WebhookDispatcher::new(webhook.clone())?));
    }

    let dispatcher: Arc<dyn AlertDispatcher> = match channels.len() {
        0 => {
            tracing::info!("No alert channels configured, alerts go to the log");
            Arc::new(LogDispatcher::new())
        }
        1 => channels.remove(0),
        _ => Arc::new(FanoutDispatcher::new(channels)),
    };
    Ok(dispatcher)
}

fn exit_code(e: &MonitorError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}
