use sea_query::{ColumnDef, Index, Table};
use sqlx_migrator::Operation;

use crate::table::Ticket;

pub struct CreateTable;

#[async_trait::async_trait]
impl Operation<sqlx::Sqlite> for CreateTable {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = Table::create()
            .table(Ticket::Table)
            .col(
                ColumnDef::new(Ticket::Id)
                    .string()
                    .not_null()
                    .string_len(26)
                    .primary_key(),
            )
            .col(
                ColumnDef::new(Ticket::UserId)
                    .string()
                    .not_null()
                    .string_len(26),
            )
            .col(ColumnDef::new(Ticket::Subject).string().not_null())
            .col(ColumnDef::new(Ticket::Description).text().not_null())
            .col(
                ColumnDef::new(Ticket::Priority)
                    .string()
                    .not_null()
                    .string_len(10),
            )
            .col(
                ColumnDef::new(Ticket::Status)
                    .string()
                    .not_null()
                    .string_len(10),
            )
            .col(ColumnDef::new(Ticket::CreatedAt).big_integer().not_null())
            .col(ColumnDef::new(Ticket::UpdatedAt).big_integer().null())
            .to_string(sea_query::SqliteQueryBuilder);

        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = Table::drop()
            .table(Ticket::Table)
            .to_string(sea_query::SqliteQueryBuilder);

        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }
}

pub struct CreateIdx1;

#[async_trait::async_trait]
impl Operation<sqlx::Sqlite> for CreateIdx1 {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = Index::create()
            .name("idx_ticket_user_created")
            .table(Ticket::Table)
            .col(Ticket::UserId)
            .col(Ticket::CreatedAt)
            .to_string(sea_query::SqliteQueryBuilder);

        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = Index::drop()
            .name("idx_ticket_user_created")
            .table(Ticket::Table)
            .to_string(sea_query::SqliteQueryBuilder);

        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }
}
