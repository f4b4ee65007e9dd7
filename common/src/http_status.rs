//! HTTP status code helpers for error classification and retry decisions.

/// HTTP status code carried by a failed vendor call.
///
/// Stored directly rather than parsed from error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpStatusCode(pub u16);

impl HttpStatusCode {
    pub const BAD_REQUEST: Self = Self(400);
    pub const UNAUTHORIZED: Self = Self(401);
    pub const FORBIDDEN: Self = Self(403);
    pub const NOT_FOUND: Self = Self(404);
    pub const CONFLICT: Self = Self(409);
    pub const TOO_MANY_REQUESTS: Self = Self(429);

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.0)
    }

    /// The vendor throttled the caller.
    pub fn is_rate_limited(&self) -> bool {
        *self == Self::TOO_MANY_REQUESTS
    }

    /// The vendor refused the bearer token. Umbrella answers 403 both for a
    /// stale token and for a real permission denial.
    pub fn is_forbidden(&self) -> bool {
        *self == Self::FORBIDDEN
    }
}

impl From<u16> for HttpStatusCode {
    fn from(code: u16) -> Self {
        HttpStatusCode(code)
    }
}

impl From<reqwest::StatusCode> for HttpStatusCode {
    fn from(status: reqwest::StatusCode) -> Self {
        HttpStatusCode(status.as_u16())
    }
}

impl std::fmt::Display for HttpStatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
