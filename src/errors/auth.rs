use thiserror::Error;

/// Reasons a caller could not be authenticated. Every variant is reported to
/// the client with the same 401 body; the variant only reaches the logs.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("token signature does not verify")]
    BadSignature,

    #[error("token has expired")]
    Expired,

    #[error("token is malformed")]
    Malformed,

    #[error("token subject no longer exists")]
    UnknownSubject,

    #[error("invalid credentials")]
    InvalidCredentials,
}
