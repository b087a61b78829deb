use thiserror::Error;

/// Error type for the `rapid-feed` crate.
///
/// Transport faults during an established stream are *not* represented
/// here; they are normalized into socket closes and absorbed by the
/// reconnection loop. Only endpoint construction and the initial
/// handshake can produce an `Error` value.
#[derive(Debug, Error)]
pub enum Error {
    /// WebSocket handshake failed (host unreachable, refused, bad upgrade).
    #[error("feed connection failed: {0}")]
    Connect(String),

    /// Endpoint URL could not be constructed or parsed.
    #[error("invalid feed URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}
