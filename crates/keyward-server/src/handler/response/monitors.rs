//! Monitor response types.

use serde::{Deserialize, Serialize};

/// Liveness response.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorStatus {
    /// Always `"ok"` while the server answers.
    pub status: String,
    /// Application version.
    pub version: String,
}

impl Default for MonitorStatus {
    fn default() -> Self {
        Self {
            status: "ok".to_owned(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
        }
    }
}
