use std::{path::PathBuf, str::FromStr};

use quickticket_shared::State;
use quickticket_ticket::CreateInput;
use quickticket_user::{RegisterInput, UserView};
use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};
use sqlx_migrator::{Migrate, Plan};

pub async fn setup_test_state(path: PathBuf) -> anyhow::Result<State> {
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.to_str().unwrap()))?
        .create_if_missing(true);
    let pool = SqlitePool::connect_with(opts).await?;
    let mut conn = pool.acquire().await?;
    quickticket_db::migrator()?
        .run(&mut *conn, &Plan::apply_all())
        .await?;

    Ok(State::new(pool))
}

pub async fn create_user(state: &State, name: impl Into<String>) -> anyhow::Result<UserView> {
    let name = name.into();
    let command = quickticket_user::Command(state.clone());

    Ok(command
        .register(RegisterInput {
            name: name.to_owned(),
            email: format!("{name}@quickticket.localhost"),
            password: "my_password".to_owned(),
        })
        .await?)
}

#[allow(dead_code)]
pub async fn create_ticket(
    command: &quickticket_ticket::Command,
    user_id: &str,
    subject: impl Into<String>,
) -> anyhow::Result<String> {
    Ok(command
        .create(
            user_id,
            CreateInput {
                subject: subject.into(),
                description: "my description".to_owned(),
                priority: "High".to_owned(),
            },
        )
        .await?)
}
