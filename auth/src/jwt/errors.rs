use thiserror::Error;

/// Error type for JWT operations.
///
/// Decoding failures deliberately collapse into `InvalidToken`: callers cannot
/// tell a bad signature from an expired or malformed token.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is invalid")]
    InvalidToken,
}
