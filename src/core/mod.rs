pub mod engine;
pub mod health;
pub mod scheduler;
pub mod settings;
pub mod transition;
pub mod update;
pub mod uptime;

pub use crate::domain::model::{AlertIntent, DomainRecord, DomainUpdate, ProbeResult};
pub use crate::domain::ports::{AlertDispatcher, DomainStore, Probe};
pub use crate::utils::error::Result;
