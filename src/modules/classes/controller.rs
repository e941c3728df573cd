use axum::{
    Json,
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::modules::accounts::controller::ErrorResponse;
use crate::modules::accounts::model::DeleteResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::pagination::{PageMeta, PageRequest};
use crate::validator::ValidatedJson;

use super::model::{
    ClassDto, ClassFilterParams, CreateClassDto, PaginatedClassesResponse, UpdateClassDto,
};
use super::service::ClassService;

#[utoipa::path(
    get,
    path = "/api/Class/paginated",
    params(ClassFilterParams, PageRequest),
    responses(
        (status = 200, description = "Paginated classes", body = PaginatedClassesResponse),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Classes"
)]
#[instrument(skip(state, _auth))]
pub async fn get_classes(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(filters): Query<ClassFilterParams>,
    Query(page): Query<PageRequest>,
) -> Result<Json<PaginatedClassesResponse>, AppError> {
    let window = page.window()?;
    let (classes, total) =
        ClassService::search_classes(&state.db, filters.keyword.as_deref(), &window).await?;

    Ok(Json(PaginatedClassesResponse {
        classes,
        meta: PageMeta::new(total, &window),
    }))
}

#[utoipa::path(
    get,
    path = "/api/Class/{id}",
    params(("id" = i64, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Class details", body = ClassDto),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Class not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Classes"
)]
#[instrument(skip(state, _auth))]
pub async fn get_class(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<ClassDto>, AppError> {
    let class = ClassService::get_class(&state.db, id).await?;
    Ok(Json(class))
}

#[utoipa::path(
    post,
    path = "/api/Class/create",
    request_body = CreateClassDto,
    responses(
        (status = 200, description = "Class created", body = ClassDto),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 409, description = "Code already in use", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Classes"
)]
#[instrument(skip(state, _auth, dto))]
pub async fn create_class(
    State(state): State<AppState>,
    _auth: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateClassDto>,
) -> Result<Json<ClassDto>, AppError> {
    let class = ClassService::create_class(&state.db, dto).await?;
    Ok(Json(class))
}

#[utoipa::path(
    patch,
    path = "/api/Class/{id}",
    params(("id" = i64, Path, description = "Class ID")),
    request_body = UpdateClassDto,
    responses(
        (status = 200, description = "Class updated", body = ClassDto),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Class not found", body = ErrorResponse),
        (status = 409, description = "Code already in use", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Classes"
)]
#[instrument(skip(state, _auth, dto))]
pub async fn update_class(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateClassDto>,
) -> Result<Json<ClassDto>, AppError> {
    let class = ClassService::update_class(&state.db, id, dto).await?;
    Ok(Json(class))
}

#[utoipa::path(
    delete,
    path = "/api/Class/{id}",
    params(("id" = i64, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Class deleted", body = DeleteResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Class not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Classes"
)]
#[instrument(skip(state, _auth))]
pub async fn delete_class(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<DeleteResponse>, AppError> {
    ClassService::delete_class(&state.db, id).await?;
    Ok(Json(DeleteResponse { success: true }))
}

/// Download the class roster as a spreadsheet
#[utoipa::path(
    get,
    path = "/api/Class/{id}/export-students",
    params(("id" = i64, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Spreadsheet stream", body = Vec<u8>, content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Class not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Classes"
)]
#[instrument(skip(state, _auth))]
pub async fn export_students(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let (file_name, buffer) = ClassService::export_students(&state.db, id).await?;

    let headers = [
        (
            header::CONTENT_TYPE,
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet".to_string(),
        ),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file_name),
        ),
    ];

    Ok((headers, buffer).into_response())
}
