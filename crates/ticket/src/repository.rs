use quickticket_db::table::Ticket;
use sea_query::{Expr, ExprTrait, Order, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{SqlitePool, prelude::FromRow};
use time::OffsetDateTime;

use crate::{Priority, Status};

#[derive(FromRow)]
pub struct TicketRow {
    pub id: String,
    pub user_id: String,
    pub subject: String,
    pub description: String,
    pub priority: sqlx::types::Text<Priority>,
    pub status: sqlx::types::Text<Status>,
    pub created_at: i64,
}

const COLUMNS: [Ticket; 7] = [
    Ticket::Id,
    Ticket::UserId,
    Ticket::Subject,
    Ticket::Description,
    Ticket::Priority,
    Ticket::Status,
    Ticket::CreatedAt,
];

pub(crate) async fn find(
    pool: &SqlitePool,
    id: impl Into<String>,
) -> quickticket_shared::Result<Option<TicketRow>> {
    let statement = Query::select()
        .columns(COLUMNS)
        .from(Ticket::Table)
        .and_where(Expr::col(Ticket::Id).eq(id.into()))
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, TicketRow, _>(&sql, values)
        .fetch_optional(pool)
        .await?)
}

pub(crate) async fn list_by_user(
    pool: &SqlitePool,
    user_id: impl Into<String>,
) -> quickticket_shared::Result<Vec<TicketRow>> {
    let statement = Query::select()
        .columns(COLUMNS)
        .from(Ticket::Table)
        .and_where(Expr::col(Ticket::UserId).eq(user_id.into()))
        .order_by(Ticket::CreatedAt, Order::Desc)
        .order_by(Ticket::Id, Order::Desc)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, TicketRow, _>(&sql, values)
        .fetch_all(pool)
        .await?)
}

pub(crate) struct CreateInput {
    pub id: String,
    pub user_id: String,
    pub subject: String,
    pub description: String,
    pub priority: Priority,
}

pub(crate) async fn create(pool: &SqlitePool, input: CreateInput) -> quickticket_shared::Result<()> {
    let now = OffsetDateTime::now_utc().unix_timestamp();
    let statement = Query::insert()
        .into_table(Ticket::Table)
        .columns([
            Ticket::Id,
            Ticket::UserId,
            Ticket::Subject,
            Ticket::Description,
            Ticket::Priority,
            Ticket::Status,
            Ticket::CreatedAt,
        ])
        .values_panic([
            input.id.into(),
            input.user_id.into(),
            input.subject.into(),
            input.description.into(),
            input.priority.to_string().into(),
            Status::Open.to_string().into(),
            now.into(),
        ])
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    sqlx::query_with(&sql, values).execute(pool).await?;

    Ok(())
}

pub(crate) async fn update_status(
    pool: &SqlitePool,
    id: impl Into<String>,
    status: Status,
) -> quickticket_shared::Result<()> {
    let now = OffsetDateTime::now_utc().unix_timestamp();
    let statement = Query::update()
        .table(Ticket::Table)
        .value(Ticket::Status, status.as_ref())
        .value(Ticket::UpdatedAt, now)
        .and_where(Expr::col(Ticket::Id).eq(id.into()))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(pool).await?;

    Ok(())
}
