// Path: crates/types/src/app/mode.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// The execution mode an admission attempt runs under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecMode {
    /// Mempool admission: ante checks only, against the check-state layer.
    Check,
    /// Block execution: ante checks and message dispatch, against deliver state.
    Deliver,
    /// Gas estimation: infinite gas meter, never committed.
    Simulate,
}

impl ExecMode {
    /// A stable, lowercase label for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecMode::Check => "check",
            ExecMode::Deliver => "deliver",
            ExecMode::Simulate => "simulate",
        }
    }

    /// Returns true in simulate mode.
    pub fn is_simulate(&self) -> bool {
        matches!(self, ExecMode::Simulate)
    }
}

impl fmt::Display for ExecMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
