use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{
    assign_permissions, create_permission, create_role, delete_permission, delete_role,
    get_assigned_permissions, get_permission, get_permissions, get_role, get_roles,
    update_permission, update_role,
};

pub fn init_roles_router() -> Router<AppState> {
    Router::new()
        .route("/paginated", get(get_roles))
        .route("/create", post(create_role))
        .route("/{id}", get(get_role).patch(update_role).delete(delete_role))
}

pub fn init_permissions_router() -> Router<AppState> {
    Router::new()
        .route("/paginated", get(get_permissions))
        .route("/create", post(create_permission))
        .route(
            "/{id}",
            get(get_permission)
                .patch(update_permission)
                .delete(delete_permission),
        )
}

/// The role-scoped assignment surface the admin frontend calls.
pub fn init_role_permissions_router() -> Router<AppState> {
    Router::new().route(
        "/{roleId}",
        get(get_assigned_permissions).post(assign_permissions),
    )
}
