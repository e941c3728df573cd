use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{
    create_teacher, delete_teacher, get_teacher, get_teachers, update_teacher,
};

pub fn init_teachers_router() -> Router<AppState> {
    Router::new()
        .route("/paginated", get(get_teachers))
        .route("/create", post(create_teacher))
        .route(
            "/{id}",
            get(get_teacher).patch(update_teacher).delete(delete_teacher),
        )
}
