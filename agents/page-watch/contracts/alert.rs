//! Alert messages sent to the chat

use serde::Serialize;

/// A notification the poll loop emits
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Alert {
    /// Baseline stored on first run
    Started { label: String },

    /// Page fingerprint moved
    Changed { label: String, url: String },

    /// Startup fetch failed; the process is about to exit
    InitialFetchFailed { error: String },

    /// A steady-state tick failed
    CheckFailed { error: String },
}

impl Alert {
    pub fn started(label: impl Into<String>) -> Self {
        Alert::Started { label: label.into() }
    }

    pub fn changed(label: impl Into<String>, url: impl Into<String>) -> Self {
        Alert::Changed {
            label: label.into(),
            url: url.into(),
        }
    }

    pub fn initial_fetch_failed(error: impl ToString) -> Self {
        Alert::InitialFetchFailed {
            error: error.to_string(),
        }
    }

    pub fn check_failed(error: impl ToString) -> Self {
        Alert::CheckFailed {
            error: error.to_string(),
        }
    }

    /// Message text as delivered to the chat
    pub fn render(&self) -> String {
        match self {
            Alert::Started { label } => format!(
                "🟢 Monitor started for {}.\nI'll alert you when the page changes.",
                label
            ),
            Alert::Changed { label, url } => {
                format!("🚨 {} page changed! Check now:\n{}", label, url)
            }
            Alert::InitialFetchFailed { error } => format!("⚠️ Initial fetch failed: {}", error),
            Alert::CheckFailed { error } => format!("⚠️ Error while checking page: {}", error),
        }
    }

    /// Warnings as opposed to informational alerts
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            Alert::InitialFetchFailed { .. } | Alert::CheckFailed { .. }
        )
    }
}
