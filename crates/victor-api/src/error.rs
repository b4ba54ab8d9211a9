use thiserror::Error;

/// Top-level error type for the `victor-api` crate.
///
/// Covers authentication, transport, and decoding failures.
/// `victor-core` maps these into its two external failure signals.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The token endpoint rejected the username/password pair.
    /// The API answers 400 or 401 for bad credentials.
    #[error("Invalid credentials rejected by token endpoint (HTTP {status})")]
    InvalidCredentials { status: u16 },

    /// Client construction rejected its inputs (empty username/password).
    #[error("Validation failed: {message}")]
    Validation { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Non-success HTTP status outside the 401-retry path.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    // ── Data ────────────────────────────────────────────────────────
    /// The response body had a shape the API never produces
    /// (not a list, not a `results` envelope, token reply without a token).
    #[error("Unexpected response shape: {message}")]
    UnexpectedResponse { message: String },

    /// A payload failed field-level conversion into a typed resource.
    #[error("Failed to decode {resource}: {message}")]
    Decode {
        resource: &'static str,
        message: String,
    },

    /// Strict decoding found a field the schema does not know about.
    #[error("Unknown field `{path}` in {resource} payload")]
    UnknownField {
        resource: &'static str,
        path: String,
    },
}

impl Error {
    /// Returns `true` if this error means the stored credentials are stale
    /// and user interaction is required.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::InvalidCredentials { .. })
    }

    /// Returns `true` if this is a transient transport error the next
    /// scheduled poll may clear.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
