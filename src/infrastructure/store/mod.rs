mod sqlite;

pub use sqlite::SqliteTelemetryStore;
