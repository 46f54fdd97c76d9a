use quickticket_shared::{Level, log_event};
use serde_json::json;
use ulid::Ulid;
use validator::Validate;

use crate::{
    UserView,
    password::hash_password,
    repository::{self, CreateInput, FindType},
};

#[derive(Validate)]
pub struct RegisterInput {
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 64))]
    pub password: String,
}

impl super::Command {
    pub async fn register(&self, input: RegisterInput) -> quickticket_shared::Result<UserView> {
        if input.name.trim().is_empty() || input.email.trim().is_empty() || input.password.is_empty()
        {
            log_event(
                "Validation Error: Missing registration fields",
                "auth",
                json!({ "name": input.name, "email": input.email }),
                Level::Warning,
                None,
            );
            quickticket_shared::user!("All fields are required");
        }

        input.validate()?;

        if repository::find(&self.read_db, FindType::Email(input.email.to_owned()))
            .await?
            .is_some()
        {
            log_event(
                "Validation Error: User already exists",
                "auth",
                json!({ "email": input.email }),
                Level::Warning,
                None,
            );
            quickticket_shared::user!("User already exists");
        }

        let id = Ulid::new().to_string();
        let password = hash_password(&input.password)?;

        let created = repository::create(
            &self.write_db,
            CreateInput {
                id: id.to_owned(),
                name: input.name.to_owned(),
                email: input.email.to_owned(),
                password,
            },
        )
        .await;

        match created {
            Ok(()) => {}
            // another registration took the email since the lookup above
            Err(sqlx::Error::Database(err)) if err.is_unique_violation() => {
                log_event(
                    "Validation Error: User already exists",
                    "auth",
                    json!({ "email": input.email }),
                    Level::Warning,
                    None,
                );
                quickticket_shared::user!("User already exists");
            }
            Err(err) => return Err(err.into()),
        }

        log_event(
            format!("User registered successfully: {}", input.email),
            "auth",
            json!({ "userId": id }),
            Level::Info,
            None,
        );

        Ok(UserView {
            id,
            name: input.name,
            email: input.email,
        })
    }
}
