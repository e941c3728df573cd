use axum::{
    Json,
    extract::{Path, Query, State},
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
    CreateTeacherDto, PaginatedTeachersResponse, TeacherDto, TeacherFilterParams, UpdateTeacherDto,
};
use super::service::TeacherService;

#[utoipa::path(
    get,
    path = "/api/Teacher/paginated",
    params(TeacherFilterParams, PageRequest),
    responses(
        (status = 200, description = "Paginated teachers", body = PaginatedTeachersResponse),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Teachers"
)]
#[instrument(skip(state, _auth))]
pub async fn get_teachers(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(filters): Query<TeacherFilterParams>,
    Query(page): Query<PageRequest>,
) -> Result<Json<PaginatedTeachersResponse>, AppError> {
    let window = page.window()?;
    let (teachers, total) =
        TeacherService::search_teachers(&state.db, filters.keyword.as_deref(), &window).await?;

    Ok(Json(PaginatedTeachersResponse {
        teachers,
        meta: PageMeta::new(total, &window),
    }))
}

#[utoipa::path(
    get,
    path = "/api/Teacher/{id}",
    params(("id" = i64, Path, description = "Teacher ID")),
    responses(
        (status = 200, description = "Teacher details", body = TeacherDto),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Teacher not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Teachers"
)]
#[instrument(skip(state, _auth))]
pub async fn get_teacher(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<TeacherDto>, AppError> {
    let teacher = TeacherService::get_teacher(&state.db, id).await?;
    Ok(Json(teacher))
}

#[utoipa::path(
    post,
    path = "/api/Teacher/create",
    request_body = CreateTeacherDto,
    responses(
        (status = 200, description = "Teacher created", body = TeacherDto),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 409, description = "Code or citizen id already in use", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Teachers"
)]
#[instrument(skip(state, _auth, dto))]
pub async fn create_teacher(
    State(state): State<AppState>,
    _auth: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateTeacherDto>,
) -> Result<Json<TeacherDto>, AppError> {
    let teacher = TeacherService::create_teacher(&state.db, dto).await?;
    Ok(Json(teacher))
}

#[utoipa::path(
    patch,
    path = "/api/Teacher/{id}",
    params(("id" = i64, Path, description = "Teacher ID")),
    request_body = UpdateTeacherDto,
    responses(
        (status = 200, description = "Teacher updated", body = TeacherDto),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Teacher not found", body = ErrorResponse),
        (status = 409, description = "Code or citizen id already in use", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Teachers"
)]
#[instrument(skip(state, _auth, dto))]
pub async fn update_teacher(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateTeacherDto>,
) -> Result<Json<TeacherDto>, AppError> {
    let teacher = TeacherService::update_teacher(&state.db, id, dto).await?;
    Ok(Json(teacher))
}

#[utoipa::path(
    delete,
    path = "/api/Teacher/{id}",
    params(("id" = i64, Path, description = "Teacher ID")),
    responses(
        (status = 200, description = "Teacher deleted", body = DeleteResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Teacher not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Teachers"
)]
#[instrument(skip(state, _auth))]
pub async fn delete_teacher(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<DeleteResponse>, AppError> {
    TeacherService::delete_teacher(&state.db, id).await?;
    Ok(Json(DeleteResponse { success: true }))
}
