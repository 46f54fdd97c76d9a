use sea_query::Iden;

#[derive(Iden, Clone)]
pub enum User {
    Table,
    Id,
    Name,
    Email,
    Password,
    CreatedAt,
}

#[derive(Iden, Clone)]
pub enum Ticket {
    Table,
    Id,
    UserId,
    Subject,
    Description,
    Priority,
    Status,
    CreatedAt,
    UpdatedAt,
}
