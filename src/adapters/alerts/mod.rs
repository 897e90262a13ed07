// Alert channels behind the AlertDispatcher port

pub mod email;
pub mod fanout;
pub mod log;
pub mod webhook;

pub use email::EmailDispatcher;
pub use fanout::FanoutDispatcher;
pub use log::LogDispatcher;
pub use webhook::WebhookDispatcher;
