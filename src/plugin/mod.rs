//! Per-plugin run results.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    Succeeded,
    Skipped,
    Failed,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunState::Succeeded => "succeeded",
            RunState::Skipped => "skipped",
            RunState::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Outcome of driving one plugin's example app.
///
/// For a skip, `details` holds the single reason; for a failure, the paths of
/// every target that failed or timed out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginResult {
    pub state: RunState,
    pub details: Vec<String>,
}

impl PluginResult {
    pub fn success() -> Self {
        Self { state: RunState::Succeeded, details: Vec::new() }
    }

    pub fn skip(reason: impl Into<String>) -> Self {
        Self { state: RunState::Skipped, details: vec![reason.into()] }
    }

    pub fn fail(errors: Vec<String>) -> Self {
        Self { state: RunState::Failed, details: errors }
    }

    pub fn is_failed(&self) -> bool {
        self.state == RunState::Failed
    }

    /// `['a', 'b']` style rendering used in the console report.
    pub fn details_display(&self) -> String {
        let items: Vec<String> = self.details.iter().map(|d| format!("'{}'", d)).collect();
        format!("[{}]", items.join(", "))
    }
}
