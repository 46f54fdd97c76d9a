use sqlx::SqlitePool;

use crate::{
    UserView,
    repository::{self, FindType},
};

#[derive(Clone)]
pub struct Query(pub SqlitePool);

impl Query {
    pub async fn find(&self, id: impl Into<String>) -> quickticket_shared::Result<Option<UserView>> {
        let row = repository::find(&self.0, FindType::Id(id.into())).await?;

        Ok(row.map(UserView::from))
    }

    pub async fn find_by_email(
        &self,
        email: impl Into<String>,
    ) -> quickticket_shared::Result<Option<UserView>> {
        let row = repository::find(&self.0, FindType::Email(email.into())).await?;

        Ok(row.map(UserView::from))
    }
}
