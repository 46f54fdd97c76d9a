use std::{path::PathBuf, str::FromStr};

use quickticket_shared::State;
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

#[allow(dead_code)]
pub async fn create_user(
    command: &quickticket_user::Command,
    name: impl Into<String>,
) -> anyhow::Result<UserView> {
    let name = name.into();

    Ok(command
        .register(RegisterInput {
            name: name.to_owned(),
            email: format!("{name}@quickticket.localhost"),
            password: "my_password".to_owned(),
        })
        .await?)
}
