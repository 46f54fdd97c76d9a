use std::str::FromStr;

use quickticket_shared::{Level, log_event};
use serde_json::json;
use ulid::Ulid;
use validator::Validate;

use crate::{Priority, repository};

#[derive(Validate)]
pub struct CreateInput {
    #[validate(length(min = 1, max = 120))]
    pub subject: String,
    #[validate(length(min = 1, max = 5000))]
    pub description: String,
    pub priority: String,
}

impl super::Command {
    pub async fn create(
        &self,
        user_id: impl Into<String>,
        input: CreateInput,
    ) -> quickticket_shared::Result<String> {
        if input.subject.trim().is_empty()
            || input.description.trim().is_empty()
            || input.priority.trim().is_empty()
        {
            log_event(
                "Validation Error: Missing ticket fields",
                "ticket",
                json!({
                    "subject": input.subject,
                    "description": input.description,
                    "priority": input.priority,
                }),
                Level::Warning,
                None,
            );
            quickticket_shared::user!("All fields are required");
        }

        input.validate()?;

        let Ok(priority) = Priority::from_str(&input.priority) else {
            quickticket_shared::user!("Invalid priority");
        };

        let id = Ulid::new().to_string();

        repository::create(
            &self.write_db,
            repository::CreateInput {
                id: id.to_owned(),
                user_id: user_id.into(),
                subject: input.subject,
                description: input.description,
                priority,
            },
        )
        .await?;

        log_event(
            format!("Ticket created successfully: {id}"),
            "ticket",
            json!({ "ticketId": id }),
            Level::Info,
            None,
        );

        Ok(id)
    }
}
