//! Session authentication.
//!
//! A session is a signed HS256 token carrying `{userId, iat, exp}` stored in
//! the `auth-token` cookie. Sessions are stateless: there is no server-side
//! session table and no revocation list, a token stays valid until `exp`
//! unless the cookie is removed.

mod cookie;
mod jwt;
mod session;

pub use cookie::{AUTH_COOKIE_NAME, CookieStore, MAX_COOKIE_BYTES, build_cookie};
pub use jwt::{Authenticator, Claims, Clock, ManualClock, SessionPayload, SystemClock, TOKEN_TTL_SECS};
pub use session::{AuthUser, CurrentUser};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum VerificationFailure {
    #[error("malformed token")]
    Malformed,
    #[error("signature mismatch")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("unsupported algorithm")]
    UnsupportedAlgorithm,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The service cannot sign tokens at all. Not retried.
    #[error("failed to sign session token: {0}")]
    Signing(String),

    #[error("session token rejected: {0}")]
    Verification(VerificationFailure),

    #[error("session cookie unavailable: {0}")]
    Storage(String),

    #[error("no user for session")]
    NotFound,

    #[error("user lookup failed: {0}")]
    Store(#[from] quickticket_shared::Error),
}
