use serde::{Deserialize, Serialize};

/// One strategy decision emitted by the AI layer, immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
    pub mint: String,
    /// Chosen action, e.g. `"Hold"` or `"ExitFull"`.
    pub action: String,
    /// Confidence score in `[0, 1]`.
    pub confidence: f64,
    /// Free-text rationale for the action.
    pub reasoning: String,
    /// Seconds since the Unix epoch (coarser than trade timestamps).
    pub timestamp_secs: i64,
}
