// ── Core error types ──
//
// User-facing errors from rapid-core. Consumers never see transport
// details directly; the `From<rapid_feed::Error>` impl translates the
// feed layer's errors into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The feed endpoint could not be built from the configuration.
    #[error("invalid feed endpoint: {reason}")]
    Endpoint { reason: String },

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<rapid_feed::Error> for CoreError {
    fn from(err: rapid_feed::Error) -> Self {
        match err {
            rapid_feed::Error::InvalidUrl(e) => CoreError::Endpoint {
                reason: e.to_string(),
            },
            // Handshake failures never cross this boundary in normal
            // operation -- the feed loop absorbs them into its retry
            // schedule before anyone sees them.
            rapid_feed::Error::Connect(reason) => CoreError::Internal(reason),
        }
    }
}
