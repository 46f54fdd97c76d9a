use quickticket_shared::{Level, log_event};
use serde_json::json;

use crate::{Status, repository};

impl super::Command {
    /// Closes a ticket owned by `user_id`.
    ///
    /// A ticket that does not exist and a ticket owned by someone else are
    /// reported the same way. Closing an already closed ticket succeeds.
    pub async fn close(
        &self,
        id: impl Into<String>,
        user_id: impl Into<String>,
    ) -> quickticket_shared::Result<()> {
        let id = id.into();
        let user_id = user_id.into();

        if id.trim().is_empty() {
            log_event(
                "Validation Error: Missing ticket ID",
                "ticket",
                json!({ "ticketId": id }),
                Level::Warning,
                None,
            );
            quickticket_shared::user!("Ticket ID is required");
        }

        let ticket = repository::find(&self.read_db, &id).await?;

        let Some(ticket) = ticket.filter(|t| t.user_id == user_id) else {
            log_event(
                format!("Ticket not found: {id}"),
                "ticket",
                json!({ "ticketId": id, "userId": user_id }),
                Level::Warning,
                None,
            );
            quickticket_shared::user!("Ticket not found");
        };

        if ticket.status.0 == Status::Closed {
            return Ok(());
        }

        repository::update_status(&self.write_db, &id, Status::Closed).await?;

        log_event(
            format!("Ticket closed successfully: {id}"),
            "ticket",
            json!({ "ticketId": id }),
            Level::Info,
            None,
        );

        Ok(())
    }
}
