pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{HttpProbe, JsonFileStore, MemoryStore};
pub use config::toml_config::MonitorConfig;
pub use self::core::{
    engine::{MonitorEngine, SweepReport},
    scheduler::MonitorScheduler,
    settings::MonitorSettings,
};
pub use utils::error::{MonitorError, Result};
