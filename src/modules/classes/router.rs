use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{
    create_class, delete_class, export_students, get_class, get_classes, update_class,
};

pub fn init_classes_router() -> Router<AppState> {
    Router::new()
        .route("/paginated", get(get_classes))
        .route("/create", post(create_class))
        .route(
            "/{id}",
            get(get_class).patch(update_class).delete(delete_class),
        )
        .route("/{id}/export-students", get(export_students))
}
