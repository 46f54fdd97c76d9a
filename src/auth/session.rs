use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts, response::Redirect};
use quickticket_shared::{Level, log_event};
use quickticket_user::UserView;
use serde_json::json;

use super::{AuthError, Authenticator, CookieStore, SessionPayload};

impl Authenticator {
    /// Resolves the user behind the session cookie.
    ///
    /// A request without a session cookie is anonymous, not an error.
    pub async fn resolve(
        &self,
        cookies: &CookieStore,
        users: &quickticket_user::Query,
    ) -> Result<Option<UserView>, AuthError> {
        let Some(token) = cookies.get() else {
            return Ok(None);
        };

        let claims = self.verify::<SessionPayload>(&token)?;

        users
            .find(&claims.payload.user_id)
            .await?
            .map(Some)
            .ok_or(AuthError::NotFound)
    }

    /// Same as [`Authenticator::resolve`] with every failure collapsed into
    /// `None`. Store errors are logged before being dropped.
    pub async fn current_user(
        &self,
        cookies: &CookieStore,
        users: &quickticket_user::Query,
    ) -> Option<UserView> {
        match self.resolve(cookies, users).await {
            Ok(user) => user,
            Err(AuthError::Store(err)) => {
                log_event(
                    "Error loading session user",
                    "auth",
                    json!({}),
                    Level::Error,
                    Some(&err),
                );

                None
            }
            Err(AuthError::NotFound) => {
                log_event(
                    "Session user no longer exists",
                    "auth",
                    json!({}),
                    Level::Warning,
                    None,
                );

                None
            }
            Err(_) => None,
        }
    }

    /// Issues a session token for `user_id` and stores it in the cookie.
    ///
    /// Signing failures always propagate. Cookie write failures propagate
    /// only when the authenticator requires the cookie on login.
    pub fn start_session(&self, cookies: &mut CookieStore, user_id: &str) -> Result<(), AuthError> {
        let token = self.issue_session(user_id)?;

        match cookies.set(&token) {
            Ok(()) => Ok(()),
            Err(err) if self.require_cookie_on_login => Err(err),
            Err(err) => {
                log_event(
                    "Session cookie not stored, continuing without it",
                    "auth",
                    json!({ "userId": user_id }),
                    Level::Warning,
                    Some(&err),
                );

                Ok(())
            }
        }
    }

    pub fn end_session(&self, cookies: &mut CookieStore) {
        cookies.delete();

        log_event("User logged out successfully", "auth", json!({}), Level::Info, None);
    }
}

/// Optional session user, for pages that render differently when signed in.
///
/// Resolved once per request and cached in the request extensions.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<UserView>);

impl FromRequestParts<crate::routes::AppState> for CurrentUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &crate::routes::AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(current) = parts.extensions.get::<CurrentUser>() {
            return Ok(current.clone());
        }

        let cookies = CookieStore::from_request_parts(parts, state).await?;
        let current = CurrentUser(
            state
                .authenticator
                .current_user(&cookies, &state.user_query)
                .await,
        );
        parts.extensions.insert(current.clone());

        Ok(current)
    }
}

/// Signed-in user. Anonymous requests are redirected to the login page.
pub struct AuthUser(pub UserView);

impl FromRequestParts<crate::routes::AppState> for AuthUser {
    type Rejection = Redirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &crate::routes::AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state)
            .await
            .map_err(|_| Redirect::to("/login"))?;

        user.map(AuthUser).ok_or_else(|| Redirect::to("/login"))
    }
}
