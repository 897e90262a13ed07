// Domain layer: records, probe readings, alert intents and the ports the engine talks through.

pub mod model;
pub mod ports;

pub use model::{
    AlertIntent, AlertKind, DomainRecord, DomainStatus, DomainUpdate, ProbeResult, SslStatus,
};
pub use ports::{AlertDispatcher, DomainStore, Probe};
