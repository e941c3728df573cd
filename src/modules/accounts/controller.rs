use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Serialize;
use tracing::instrument;
use utoipa::ToSchema;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::pagination::{PageMeta, PageRequest};
use crate::validator::ValidatedJson;

use super::model::{
    AccountDto, AccountFilterParams, AccountStatus, ChangePasswordDto, CreateAccountDto,
    DeleteResponse, LoginRequest, LoginResponse, PaginatedAccountsResponse, UpdateAccountDto,
};
use super::service::AccountService;

#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

fn parse_status_filter(status: Option<&str>) -> Result<Option<AccountStatus>, AppError> {
    status
        .map(|s| {
            AccountStatus::parse(s)
                .ok_or_else(|| AppError::bad_request(anyhow::anyhow!("Invalid status filter")))
        })
        .transpose()
}

/// Login and receive a bearer token
#[utoipa::path(
    post,
    path = "/api/Account/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Accounts"
)]
#[instrument(skip(state, dto))]
pub async fn login(
    State(state): State<AppState>,
    Json(dto): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let response = AccountService::login(&state.db, dto, &state.jwt_config).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/Account/paginated",
    params(AccountFilterParams, PageRequest),
    responses(
        (status = 200, description = "Paginated accounts", body = PaginatedAccountsResponse),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Accounts"
)]
#[instrument(skip(state, _auth))]
pub async fn get_accounts(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(filters): Query<AccountFilterParams>,
    Query(page): Query<PageRequest>,
) -> Result<Json<PaginatedAccountsResponse>, AppError> {
    let window = page.window()?;
    let status = parse_status_filter(filters.status.as_deref())?;

    let (accounts, total) =
        AccountService::search_accounts(&state.db, filters.keyword.as_deref(), status, &window)
            .await?;

    Ok(Json(PaginatedAccountsResponse {
        accounts,
        meta: PageMeta::new(total, &window),
    }))
}

#[utoipa::path(
    get,
    path = "/api/Account/profile",
    responses(
        (status = 200, description = "The caller's account", body = AccountDto),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Account not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Accounts"
)]
#[instrument(skip(state, auth))]
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<AccountDto>, AppError> {
    let account = AccountService::get_account(&state.db, auth.account_id()?).await?;
    Ok(Json(account))
}

#[utoipa::path(
    post,
    path = "/api/Account/change-password",
    request_body = ChangePasswordDto,
    responses(
        (status = 200, description = "Password changed", body = DeleteResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Account not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Accounts"
)]
#[instrument(skip(state, auth, dto))]
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(dto): ValidatedJson<ChangePasswordDto>,
) -> Result<Json<DeleteResponse>, AppError> {
    AccountService::change_password(&state.db, auth.account_id()?, dto).await?;
    Ok(Json(DeleteResponse { success: true }))
}

#[utoipa::path(
    get,
    path = "/api/Account/{id}",
    params(("id" = i64, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Account details", body = AccountDto),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Account not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Accounts"
)]
#[instrument(skip(state, _auth))]
pub async fn get_account(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<AccountDto>, AppError> {
    let account = AccountService::get_account(&state.db, id).await?;
    Ok(Json(account))
}

#[utoipa::path(
    post,
    path = "/api/Account/create",
    request_body = CreateAccountDto,
    responses(
        (status = 200, description = "Account created", body = AccountDto),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 409, description = "Email already in use", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Accounts"
)]
#[instrument(skip(state, _auth, dto))]
pub async fn create_account(
    State(state): State<AppState>,
    _auth: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateAccountDto>,
) -> Result<Json<AccountDto>, AppError> {
    let account = AccountService::create_account(&state.db, dto).await?;
    Ok(Json(account))
}

#[utoipa::path(
    patch,
    path = "/api/Account/{id}",
    params(("id" = i64, Path, description = "Account ID")),
    request_body = UpdateAccountDto,
    responses(
        (status = 200, description = "Account updated", body = AccountDto),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Account not found", body = ErrorResponse),
        (status = 409, description = "Email already in use", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Accounts"
)]
#[instrument(skip(state, _auth, dto))]
pub async fn update_account(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateAccountDto>,
) -> Result<Json<AccountDto>, AppError> {
    let account = AccountService::update_account(&state.db, id, dto).await?;
    Ok(Json(account))
}

#[utoipa::path(
    delete,
    path = "/api/Account/{id}",
    params(("id" = i64, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Account deleted", body = DeleteResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Account not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Accounts"
)]
#[instrument(skip(state, _auth))]
pub async fn delete_account(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<DeleteResponse>, AppError> {
    AccountService::delete_account(&state.db, id).await?;
    Ok(Json(DeleteResponse { success: true }))
}
