use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponseParts, ResponseParts},
};
use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use quickticket_shared::{Level, log_event};
use serde_json::json;

use super::{AuthError, TOKEN_TTL_SECS};

pub const AUTH_COOKIE_NAME: &str = "auth-token";

/// Largest `name=value` pair browsers are required to keep (RFC 6265 6.1).
pub const MAX_COOKIE_BYTES: usize = 4096;

pub fn build_cookie(token: impl Into<String>, secure: bool, max_age: i64) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE_NAME, token.into()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::seconds(max_age))
        .build()
}

// %x21 / %x23-2B / %x2D-3A / %x3C-5B / %x5D-7E
fn is_cookie_octet(b: u8) -> bool {
    matches!(b, 0x21 | 0x23..=0x2B | 0x2D..=0x3A | 0x3C..=0x5B | 0x5D..=0x7E)
}

/// Request-scoped view of the session cookie.
///
/// Reads come from the incoming `Cookie` header. Writes are collected in the
/// wrapped jar and emitted as `Set-Cookie` headers when the store is returned
/// as part of a response.
#[derive(Debug, Clone)]
pub struct CookieStore {
    jar: CookieJar,
    secure: bool,
    max_age: i64,
    size_limit: usize,
}

impl CookieStore {
    pub fn new(jar: CookieJar, secure: bool) -> Self {
        Self {
            jar,
            secure,
            max_age: TOKEN_TTL_SECS,
            size_limit: MAX_COOKIE_BYTES,
        }
    }

    /// Values whose `name=value` pair exceeds `size_limit` bytes are refused.
    pub fn with_size_limit(mut self, size_limit: usize) -> Self {
        self.size_limit = size_limit;
        self
    }

    pub fn with_max_age(mut self, max_age: i64) -> Self {
        self.max_age = max_age;
        self
    }

    pub fn set(&mut self, token: &str) -> Result<(), AuthError> {
        let reason = if token.is_empty() || !token.bytes().all(is_cookie_octet) {
            Some("token is not a valid cookie value".to_owned())
        } else if AUTH_COOKIE_NAME.len() + 1 + token.len() > self.size_limit {
            Some(format!("cookie exceeds {} bytes", self.size_limit))
        } else {
            None
        };

        if let Some(reason) = reason {
            let err = AuthError::Storage(reason);
            log_event(
                "Error setting auth cookie",
                "auth",
                json!({ "cookie": AUTH_COOKIE_NAME, "tokenLength": token.len() }),
                Level::Error,
                Some(&err),
            );

            return Err(err);
        }

        let jar = std::mem::take(&mut self.jar);
        self.jar = jar.add(build_cookie(token, self.secure, self.max_age));

        Ok(())
    }

    pub fn get(&self) -> Option<String> {
        self.jar
            .get(AUTH_COOKIE_NAME)
            .map(|cookie| cookie.value().to_owned())
            .filter(|value| !value.is_empty())
    }

    /// Removes the session cookie. Safe to call when no cookie is present.
    pub fn delete(&mut self) {
        let jar = std::mem::take(&mut self.jar);
        self.jar = jar.remove(Cookie::build(AUTH_COOKIE_NAME).path("/"));
    }
}

impl FromRequestParts<crate::routes::AppState> for CookieStore {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &crate::routes::AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self::new(
            CookieJar::from_headers(&parts.headers),
            state.authenticator.secure_cookie,
        )
        .with_max_age(state.authenticator.ttl())
        .with_size_limit(state.authenticator.cookie_size_limit))
    }
}

impl IntoResponseParts for CookieStore {
    type Error = Infallible;

    fn into_response_parts(self, res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        self.jar.into_response_parts(res)
    }
}
