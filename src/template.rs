use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{Html, IntoResponse, Response},
};
use quickticket_user::UserView;
use std::convert::Infallible;

use crate::auth::CurrentUser;

pub const SERVER_ERROR_MESSAGE: &str = "Something went wrong, please retry later";

pub(crate) mod filters {
    use time::{OffsetDateTime, macros::format_description};

    #[askama::filter_fn]
    pub fn date(value: &i64, _values: &dyn askama::Values) -> askama::Result<String> {
        let date = OffsetDateTime::from_unix_timestamp(*value)
            .map_err(|e| askama::Error::Custom(Box::new(e)))?;

        date.format(format_description!(
            "[year]-[month]-[day] [hour]:[minute] UTC"
        ))
        .map_err(|e| askama::Error::Custom(Box::new(e)))
    }
}

/// Page renderer aware of the signed-in user.
pub struct Template {
    pub current_user: Option<UserView>,
}

impl Template {
    pub fn user(&self) -> Option<UserView> {
        self.current_user.clone()
    }

    pub fn render<T: askama::Template>(&self, template: T) -> Response {
        match template.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => {
                tracing::error!("{err}");

                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to render template. Error: {err}"),
                )
                    .into_response()
            }
        }
    }

    pub fn not_found(&self) -> Response {
        (
            StatusCode::NOT_FOUND,
            self.render(NotFoundTemplate {
                current_user: self.user(),
            }),
        )
            .into_response()
    }

    pub fn server_error(&self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            self.render(ServerTemplate {
                current_user: self.user(),
            }),
        )
            .into_response()
    }
}

impl FromRequestParts<crate::routes::AppState> for Template {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &crate::routes::AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(current_user) = CurrentUser::from_request_parts(parts, state).await?;

        Ok(Template { current_user })
    }
}

#[derive(askama::Template)]
#[template(path = "404.html")]
pub struct NotFoundTemplate {
    pub current_user: Option<UserView>,
}

#[derive(askama::Template)]
#[template(path = "500.html")]
pub struct ServerTemplate {
    pub current_user: Option<UserView>,
}

#[macro_export]
macro_rules! try_page_response {
    ($result:expr, $template:expr) => {
        match $result.await {
            Ok(r) => r,
            Err(err) => {
                tracing::error!("{err}");

                return $template.server_error();
            }
        }
    };

    (opt: $result:expr, $template:expr) => {
        match $result.await {
            Ok(Some(r)) => r,
            Ok(_) => return $template.not_found(),
            Err(err) => {
                tracing::error!("{err}");

                return $template.server_error();
            }
        }
    };
}
