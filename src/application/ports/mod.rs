mod telemetry_store;

pub use telemetry_store::{StatsRow, StoreError, TelemetryStore};
