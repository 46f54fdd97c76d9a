use std::ops::Deref;

use serde::Serialize;

mod login;
pub mod password;
mod query;
pub(crate) mod repository;
mod register;

pub use login::LoginInput;
pub use query::Query;
pub use register::RegisterInput;

/// Non-secret projection of a user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserView {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<repository::UserRow> for UserView {
    fn from(row: repository::UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
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
