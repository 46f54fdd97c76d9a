use axum::response::IntoResponse;
use quickticket_user::UserView;

use crate::template::Template;

#[derive(askama::Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub current_user: Option<UserView>,
}

pub async fn page(template: Template) -> impl IntoResponse {
    template.render(IndexTemplate {
        current_user: template.user(),
    })
}
