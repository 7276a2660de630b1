//! Controller failure taxonomy.

use fullscreen_host::FullscreenHostError;
use thiserror::Error;

use crate::OperationKind;

/// Failures returned by full-screen controller operations.
///
/// Out-of-band platform exits are not errors; the controller resynchronizes silently.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FullScreenError {
    /// The native mechanism refused or abandoned the request.
    #[error(transparent)]
    Host(#[from] FullscreenHostError),
    /// Another transition is still in flight.
    #[error("full-screen {in_flight} is already in progress")]
    ConcurrentRequest {
        /// Operation holding the controller.
        in_flight: OperationKind,
    },
    /// No element is attached to present.
    #[error("full-screen target element is missing")]
    MissingTarget,
    /// The target cannot change while a session is active or a transition is pending.
    #[error("full-screen target cannot change while a session is active")]
    TargetLocked,
    /// Options rejected at the call boundary, such as an unknown mode token.
    #[error("invalid full-screen options: {reason}")]
    InvalidOptions {
        /// Validation failure detail.
        reason: String,
    },
    /// Configuration rejected while loading.
    #[error("invalid full-screen config: {reason}")]
    InvalidConfig {
        /// Validation failure detail.
        reason: String,
    },
    /// The controller has been torn down.
    #[error("full-screen controller has been torn down")]
    Disposed,
}

impl FullScreenError {
    /// Returns whether the failure came from another request being in flight.
    pub const fn is_concurrent_request(&self) -> bool {
        matches!(self, Self::ConcurrentRequest { .. })
    }
}
