pub mod ports;
pub mod use_cases;

pub use ports::{StatsRow, StoreError, TelemetryStore};
pub use use_cases::{GetStatsUseCase, StatsSummary};
