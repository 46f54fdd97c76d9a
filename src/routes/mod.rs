use std::sync::Arc;

use axum::{
    Router,
    response::IntoResponse,
    routing::{get, post},
};
use sqlx::SqlitePool;

use crate::{
    auth::{AuthError, Authenticator, Clock},
    config::Config,
    template::{SERVER_ERROR_MESSAGE, Template},
};

mod health;
mod index;
mod login;
mod register;
mod tickets;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub authenticator: Authenticator,
    pub user_command: quickticket_user::Command,
    pub user_query: quickticket_user::Query,
    pub ticket_command: quickticket_ticket::Command,
    pub ticket_query: quickticket_ticket::Query,
    pub pool: SqlitePool,
}

impl AppState {
    pub fn new(
        config: Config,
        read_pool: SqlitePool,
        write_pool: SqlitePool,
    ) -> Result<Self, AuthError> {
        let authenticator = Authenticator::new(&config.jwt.secret)?
            .with_ttl(config.token_ttl_secs())
            .with_secure_cookie(config.secure_cookie())
            .with_require_cookie_on_login(config.session.require_cookie_on_login);

        let state = quickticket_shared::State {
            read_db: read_pool.clone(),
            write_db: write_pool,
        };

        Ok(Self {
            config,
            authenticator,
            user_command: quickticket_user::Command(state.clone()),
            user_query: quickticket_user::Query(read_pool.clone()),
            ticket_command: quickticket_ticket::Command(state),
            ticket_query: quickticket_ticket::Query(read_pool.clone()),
            pool: read_pool,
        })
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.authenticator = self.authenticator.with_clock(clock);
        self
    }
}

/// Message shown in a form after a failed command. Internal errors are
/// logged and replaced by a generic message.
pub(crate) fn error_message(err: &quickticket_shared::Error) -> String {
    match err {
        quickticket_shared::Error::User(msg) => msg.to_owned(),
        quickticket_shared::Error::Validate(_) => "Please check the form fields".to_owned(),
        quickticket_shared::Error::Server(_) | quickticket_shared::Error::Unknown(_) => {
            tracing::error!("{err}");

            SERVER_ERROR_MESSAGE.to_owned()
        }
    }
}

pub async fn fallback(template: Template) -> impl IntoResponse {
    template.not_found()
}

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .with_state(app_state.pool.clone())
        .merge(
            Router::new()
                .route("/", get(index::page))
                .route("/register", get(register::page).post(register::action))
                .route("/login", get(login::page).post(login::action))
                .route("/logout", post(login::logout))
                .route("/tickets", get(tickets::index))
                .route("/tickets/new", get(tickets::new).post(tickets::create))
                .route("/tickets/close", post(tickets::close))
                .route("/tickets/{id}", get(tickets::detail))
                .fallback(fallback)
                .with_state(app_state),
        )
}
