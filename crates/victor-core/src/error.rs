// ── Core error types ──
//
// The coordinator classifies every refresh failure into exactly two
// external signals: auth-failed (stale credentials, user action needed)
// and update-failed (everything else -- the next poll is the retry).
// Nothing below this layer is allowed to swallow errors silently.

use std::sync::Arc;

use thiserror::Error;

/// Configuration and construction errors. Raised immediately and loudly,
/// never deferred to the first request.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Classified outcome of a failed refresh cycle.
///
/// Carries the original cause behind an `Arc` so the same error can be
/// returned to the caller and broadcast to event subscribers.
#[derive(Debug, Clone, Error)]
pub enum UpdateError {
    /// Credentials were rejected -- re-authentication required.
    /// Not a generic failure: the host must prompt the user.
    #[error("authentication failed -- re-authentication required: {cause}")]
    AuthFailed { cause: Arc<victor_api::Error> },

    /// Transport, HTTP, or decode failure. The previous snapshot stays
    /// valid; the next scheduled poll is the retry mechanism.
    #[error("update failed: {cause}")]
    UpdateFailed { cause: Arc<victor_api::Error> },
}

impl UpdateError {
    /// Returns `true` if the host should trigger a re-authentication flow.
    pub fn requires_reauth(&self) -> bool {
        matches!(self, Self::AuthFailed { .. })
    }

    /// The underlying API error.
    pub fn cause(&self) -> &victor_api::Error {
        match self {
            Self::AuthFailed { cause } | Self::UpdateFailed { cause } => cause,
        }
    }
}

impl From<victor_api::Error> for UpdateError {
    fn from(err: victor_api::Error) -> Self {
        let cause = Arc::new(err);
        if cause.is_auth_error() {
            Self::AuthFailed { cause }
        } else {
            Self::UpdateFailed { cause }
        }
    }
}
