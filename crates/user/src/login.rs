use quickticket_shared::{Level, log_event};
use serde_json::json;

use crate::{
    UserView,
    password::verify_password,
    repository::{self, FindType},
};

pub struct LoginInput {
    pub email: String,
    pub password: String,
}

const INVALID_CREDENTIALS: &str = "Invalid credentials";

impl super::Command {
    /// Checks the credentials and returns the matching user.
    ///
    /// Unknown email and wrong password produce the same error.
    pub async fn login(&self, input: LoginInput) -> quickticket_shared::Result<UserView> {
        if input.email.trim().is_empty() || input.password.is_empty() {
            log_event(
                "Validation Error: Missing login fields",
                "auth",
                json!({ "email": input.email }),
                Level::Warning,
                None,
            );
            quickticket_shared::user!("All fields are required");
        }

        let Some(row) =
            repository::find(&self.read_db, FindType::Email(input.email.to_owned())).await?
        else {
            log_event(
                "Validation Error: User not found",
                "auth",
                json!({ "email": input.email }),
                Level::Warning,
                None,
            );
            return Err(quickticket_shared::Error::User(INVALID_CREDENTIALS.to_owned()));
        };

        if !verify_password(&input.password, &row.password)? {
            log_event(
                "Validation Error: Invalid password",
                "auth",
                json!({ "email": input.email }),
                Level::Warning,
                None,
            );
            return Err(quickticket_shared::Error::User(INVALID_CREDENTIALS.to_owned()));
        }

        log_event(
            format!("User logged in successfully: {}", input.email),
            "auth",
            json!({ "userId": row.id }),
            Level::Info,
            None,
        );

        Ok(row.into())
    }
}
