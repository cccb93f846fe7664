pub mod config;
pub mod store;

pub use config::{ConfigError, ServerConfig, SliceLimits, TelemetryConfig};
pub use store::SqliteTelemetryStore;
