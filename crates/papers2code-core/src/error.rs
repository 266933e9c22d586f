//! Failure taxonomy for Papers API calls

/// Error from a list or vote request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// 401: the user must log in
    AuthenticationRequired,
    /// 403 with a session/CSRF body: the session must be re-established
    SessionInvalid,
    /// 422: the server rejected the request parameters
    ValidationFailed(String),
    /// Any other failure, including transport errors and timeouts
    Unknown(String),
    /// Superseded or unmounted. Never shown to the user.
    Cancelled,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationRequired => f.write_str("authentication required"),
            Self::SessionInvalid => f.write_str("session expired, please log in again"),
            Self::ValidationFailed(msg) => write!(f, "invalid request: {msg}"),
            Self::Unknown(msg) => f.write_str(msg),
            Self::Cancelled => f.write_str("request cancelled"),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Whether the caller should show a login prompt instead of an error banner.
    pub fn requires_login(&self) -> bool {
        matches!(self, Self::AuthenticationRequired | Self::SessionInvalid)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
