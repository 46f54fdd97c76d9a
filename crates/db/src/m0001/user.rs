use sea_query::{ColumnDef, Index, Table};
use sqlx_migrator::Operation;

use crate::table::User;

pub struct CreateTable;

#[async_trait::async_trait]
impl Operation<sqlx::Sqlite> for CreateTable {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = Table::create()
            .table(User::Table)
            .col(
                ColumnDef::new(User::Id)
                    .string()
                    .not_null()
                    .string_len(26)
                    .primary_key(),
            )
            .col(ColumnDef::new(User::Name).string().not_null())
            .col(ColumnDef::new(User::Email).string().not_null())
            .col(ColumnDef::new(User::Password).string().not_null())
            .col(ColumnDef::new(User::CreatedAt).big_integer().not_null())
            .to_string(sea_query::SqliteQueryBuilder);

        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = Table::drop()
            .table(User::Table)
            .to_string(sea_query::SqliteQueryBuilder);

        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }
}

pub struct CreateUk1;

#[async_trait::async_trait]
impl Operation<sqlx::Sqlite> for CreateUk1 {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = Index::create()
            .name("uk_user_email")
            .table(User::Table)
            .unique()
            .col(User::Email)
            .to_string(sea_query::SqliteQueryBuilder);

        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = Index::drop()
            .name("uk_user_email")
            .table(User::Table)
            .to_string(sea_query::SqliteQueryBuilder);

        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }
}
