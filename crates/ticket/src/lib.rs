use std::ops::Deref;

use quickticket_shared::{Level, log_event};
use serde_json::json;
use sqlx::SqlitePool;

mod close;
mod create;
pub(crate) mod repository;
mod types;

pub use create::CreateInput;
pub use types::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub id: String,
    pub user_id: String,
    pub subject: String,
    pub description: String,
    pub priority: Priority,
    pub status: Status,
    pub created_at: i64,
}

impl Ticket {
    pub fn is_closed(&self) -> bool {
        self.status == Status::Closed
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}

impl From<repository::TicketRow> for Ticket {
    fn from(row: repository::TicketRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            subject: row.subject,
            description: row.description,
            priority: row.priority.0,
            status: row.status.0,
            created_at: row.created_at,
        }
    }
}

#[derive(Clone)]
pub struct Command(pub quickticket_shared::State);

impl Deref for Command {
    type Target = quickticket_shared::State;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(Clone)]
pub struct Query(pub SqlitePool);

impl Query {
    pub async fn find(&self, id: impl Into<String>) -> quickticket_shared::Result<Option<Ticket>> {
        let id = id.into();
        let ticket = repository::find(&self.0, &id).await?.map(Ticket::from);

        if ticket.is_none() {
            log_event(
                format!("Ticket not found: {id}"),
                "ticket",
                json!({ "ticketId": id }),
                Level::Warning,
                None,
            );
        }

        Ok(ticket)
    }

    /// Tickets owned by `user_id`, newest first.
    pub async fn list_by_user(
        &self,
        user_id: impl Into<String>,
    ) -> quickticket_shared::Result<Vec<Ticket>> {
        let user_id = user_id.into();
        let tickets = repository::list_by_user(&self.0, &user_id)
            .await?
            .into_iter()
            .map(Ticket::from)
            .collect::<Vec<_>>();

        log_event(
            format!("Tickets retrieved for user: {user_id}"),
            "ticket",
            json!({ "userId": user_id, "count": tickets.len() }),
            Level::Info,
            None,
        );

        Ok(tickets)
    }
}
