// Adapters layer: concrete implementations of the domain ports (probing, alert delivery, domain storage).

pub mod alerts;
pub mod http_probe;
pub mod storage;

pub use alerts::{EmailDispatcher, FanoutDispatcher, LogDispatcher, WebhookDispatcher};
pub use http_probe::{HttpProbe, HttpProbeConfig, Technique};
pub use storage::{JsonFileStore, MemoryStore};
