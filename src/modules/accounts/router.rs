use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{
    change_password, create_account, delete_account, get_account, get_accounts, get_profile, login,
    update_account,
};

pub fn init_accounts_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/paginated", get(get_accounts))
        .route("/profile", get(get_profile))
        .route("/change-password", post(change_password))
        .route("/create", post(create_account))
        .route(
            "/{id}",
            get(get_account).patch(update_account).delete(delete_account),
        )
}
