pub mod toml_config;

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "domain-pulse")]
#[command(about = "Periodic availability, SSL and latency monitoring for a list of domains")]
pub struct CliConfig {
    #[arg(long, short = 'c', help = "Path to a TOML configuration file")]
    pub config: Option<String>,

    #[arg(long, help = "Path to the JSON domain list (overrides store.path)")]
    pub store: Option<String>,

    #[arg(long, help = "Run a single sweep and exit")]
    pub once: bool,

    #[arg(long, help = "Print the health of every domain and exit")]
    pub status: bool,

    #[arg(long, value_name = "DOMAIN", help = "Send a test notification and exit")]
    pub test_alert: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Loads the TOML file if one was given and layers the command line on top.
    pub fn load_monitor_config(&self) -> crate::Result<toml_config::MonitorConfig> {
        let mut config = match &self.config {
            Some(path) => toml_config::MonitorConfig::from_file(path)?,
            None => toml_config::MonitorConfig::default(),
        };

        if let Some(store) = &self.store {
            config.store.path = Some(store.clone());
        }
        if self.json_logs {
            config.logging.json = Some(true);
        }
        if self.verbose {
            config.logging.verbose = Some(true);
        }

        Ok(config)
    }
}
