use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect},
};
use quickticket_user::{RegisterInput, UserView};
use serde::Deserialize;

use crate::{
    auth::CookieStore,
    routes::{AppState, error_message},
    template::{SERVER_ERROR_MESSAGE, Template},
};

#[derive(askama::Template)]
#[template(path = "register.html")]
pub struct RegisterTemplate {
    pub current_user: Option<UserView>,
    pub error_message: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
}

pub async fn page(template: Template) -> impl IntoResponse {
    if template.current_user.is_some() {
        return Redirect::to("/tickets").into_response();
    }

    template
        .render(RegisterTemplate {
            current_user: None,
            error_message: None,
            name: None,
            email: None,
        })
        .into_response()
}

#[derive(Deserialize)]
pub struct ActionInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

pub async fn action(
    template: Template,
    State(state): State<AppState>,
    mut cookies: CookieStore,
    Form(input): Form<ActionInput>,
) -> impl IntoResponse {
    let render_error = |message: String| {
        template
            .render(RegisterTemplate {
                current_user: template.user(),
                error_message: Some(message),
                name: Some(input.name.to_owned()),
                email: Some(input.email.to_owned()),
            })
            .into_response()
    };

    let user = match state
        .user_command
        .register(RegisterInput {
            name: input.name.trim().to_owned(),
            email: input.email.trim().to_owned(),
            password: input.password.to_owned(),
        })
        .await
    {
        Ok(user) => user,
        Err(e) => return render_error(error_message(&e)),
    };

    if let Err(e) = state.authenticator.start_session(&mut cookies, &user.id) {
        tracing::error!("{e}");

        return render_error(SERVER_ERROR_MESSAGE.to_owned());
    }

    (cookies, Redirect::to("/tickets")).into_response()
}
