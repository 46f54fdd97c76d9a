use axum::{
    Form,
    extract::{Path, State},
    response::IntoResponse,
};
use quickticket_shared::{Level, log_event};
use quickticket_ticket::{CreateInput, Priority, Ticket};
use quickticket_user::UserView;
use serde::Deserialize;
use serde_json::json;
use strum::VariantArray;

use crate::{
    auth::{AuthUser, CurrentUser},
    routes::{AppState, error_message},
    template::{Template, filters},
    try_page_response,
};

#[derive(askama::Template)]
#[template(path = "tickets/index.html")]
pub struct IndexTemplate {
    pub current_user: Option<UserView>,
    pub tickets: Vec<Ticket>,
    pub error_message: Option<String>,
}

pub async fn index(
    template: Template,
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> impl IntoResponse {
    let tickets = match user {
        Some(user) => try_page_response!(state.ticket_query.list_by_user(&user.id), template),
        _ => {
            log_event(
                "Unauthorized attempt to fetch tickets",
                "ticket",
                json!({}),
                Level::Warning,
                None,
            );

            vec![]
        }
    };

    template
        .render(IndexTemplate {
            current_user: template.user(),
            tickets,
            error_message: None,
        })
        .into_response()
}

#[derive(askama::Template)]
#[template(path = "tickets/new.html")]
pub struct NewTemplate {
    pub current_user: Option<UserView>,
    pub priorities: &'static [Priority],
    pub error_message: Option<String>,
    pub success_message: Option<String>,
    pub ticket_id: Option<String>,
    pub subject: String,
    pub description: String,
    pub priority: String,
}

impl NewTemplate {
    fn blank(current_user: Option<UserView>) -> Self {
        Self {
            current_user,
            priorities: Priority::VARIANTS,
            error_message: None,
            success_message: None,
            ticket_id: None,
            subject: String::new(),
            description: String::new(),
            priority: Priority::default().to_string(),
        }
    }
}

pub async fn new(template: Template, AuthUser(_user): AuthUser) -> impl IntoResponse {
    template.render(NewTemplate::blank(template.user()))
}

#[derive(Deserialize)]
pub struct CreateForm {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: String,
}

pub async fn create(
    template: Template,
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Form(input): Form<CreateForm>,
) -> impl IntoResponse {
    let Some(user) = user else {
        log_event(
            "Unauthorized attempt to create ticket",
            "ticket",
            json!({ "subject": input.subject }),
            Level::Warning,
            None,
        );

        return template
            .render(NewTemplate {
                error_message: Some("You must be logged in to create a ticket".to_owned()),
                ..NewTemplate::blank(None)
            })
            .into_response();
    };

    let result = state
        .ticket_command
        .create(
            &user.id,
            CreateInput {
                subject: input.subject.trim().to_owned(),
                description: input.description.trim().to_owned(),
                priority: input.priority.trim().to_owned(),
            },
        )
        .await;

    match result {
        Ok(id) => template
            .render(NewTemplate {
                success_message: Some("Ticket created successfully".to_owned()),
                ticket_id: Some(id),
                ..NewTemplate::blank(template.user())
            })
            .into_response(),
        Err(e) => template
            .render(NewTemplate {
                error_message: Some(error_message(&e)),
                subject: input.subject,
                description: input.description,
                priority: input.priority,
                ..NewTemplate::blank(template.user())
            })
            .into_response(),
    }
}

#[derive(askama::Template)]
#[template(path = "tickets/detail.html")]
pub struct DetailTemplate {
    pub current_user: Option<UserView>,
    pub ticket: Ticket,
    pub success_message: Option<String>,
}

pub async fn detail(
    template: Template,
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let ticket = try_page_response!(opt: state.ticket_query.find(&id), template);

    if !ticket.is_owned_by(&user.id) {
        return template.not_found();
    }

    template
        .render(DetailTemplate {
            current_user: template.user(),
            ticket,
            success_message: None,
        })
        .into_response()
}

#[derive(Deserialize)]
pub struct CloseForm {
    #[serde(default, rename = "ticketId")]
    pub ticket_id: String,
}

pub async fn close(
    template: Template,
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Form(input): Form<CloseForm>,
) -> impl IntoResponse {
    let ticket_id = input.ticket_id.trim();
    let close_error = |message: &str, tickets: Vec<Ticket>| {
        template
            .render(IndexTemplate {
                current_user: template.user(),
                tickets,
                error_message: Some(message.to_owned()),
            })
            .into_response()
    };

    if ticket_id.is_empty() {
        log_event(
            "Validation Error: Missing ticket ID",
            "ticket",
            json!({}),
            Level::Warning,
            None,
        );

        let tickets = match &user {
            Some(user) => try_page_response!(state.ticket_query.list_by_user(&user.id), template),
            _ => vec![],
        };

        return close_error("Ticket ID is required", tickets);
    }

    let Some(user) = user else {
        log_event(
            "Unauthorized attempt to close ticket",
            "ticket",
            json!({ "ticketId": ticket_id }),
            Level::Warning,
            None,
        );

        return close_error("You must be logged in to close a ticket", vec![]);
    };

    if let Err(e) = state.ticket_command.close(ticket_id, &user.id).await {
        let tickets = try_page_response!(state.ticket_query.list_by_user(&user.id), template);

        return close_error(&error_message(&e), tickets);
    }

    let ticket = try_page_response!(opt: state.ticket_query.find(ticket_id), template);

    template
        .render(DetailTemplate {
            current_user: template.user(),
            ticket,
            success_message: Some("Ticket closed successfully".to_owned()),
        })
        .into_response()
}
