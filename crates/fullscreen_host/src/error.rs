//! Host-level failures reported by native full-screen requests.

use serde::{Deserialize, Serialize};

/// Typed error describing why the platform refused or abandoned a full-screen transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FullscreenHostError {
    /// The platform has no native full-screen support, or it is disabled for this document.
    Unsupported,
    /// The platform refused the request (permission policy, missing user gesture).
    Denied {
        /// Platform-provided reason text used in diagnostics.
        reason: String,
    },
    /// Another element already holds the document-wide full-screen slot.
    AlreadyActive,
    /// An accepted request failed asynchronously.
    Failed {
        /// Platform-provided reason text used in diagnostics.
        reason: String,
    },
}

impl FullscreenHostError {
    /// Builds a [`Self::Denied`] error from any displayable reason.
    pub fn denied(reason: impl Into<String>) -> Self {
        Self::Denied {
            reason: reason.into(),
        }
    }

    /// Builds a [`Self::Failed`] error from any displayable reason.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for FullscreenHostError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unsupported => write!(f, "native full-screen is not supported"),
            Self::Denied { reason } => write!(f, "native full-screen request denied: {reason}"),
            Self::AlreadyActive => write!(f, "another element is already full-screen"),
            Self::Failed { reason } => write!(f, "native full-screen transition failed: {reason}"),
        }
    }
}

impl std::error::Error for FullscreenHostError {}
