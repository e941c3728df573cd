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
    CreateDepartmentDto, DepartmentDto, DepartmentFilterParams, PaginatedDepartmentsResponse,
    UpdateDepartmentDto,
};
use super::service::DepartmentService;

#[utoipa::path(
    get,
    path = "/api/Department/paginated",
    params(DepartmentFilterParams, PageRequest),
    responses(
        (status = 200, description = "Paginated departments", body = PaginatedDepartmentsResponse),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Departments"
)]
#[instrument(skip(state, _auth))]
pub async fn get_departments(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(filters): Query<DepartmentFilterParams>,
    Query(page): Query<PageRequest>,
) -> Result<Json<PaginatedDepartmentsResponse>, AppError> {
    let window = page.window()?;
    let (departments, total) =
        DepartmentService::search_departments(&state.db, filters.keyword.as_deref(), &window)
            .await?;

    Ok(Json(PaginatedDepartmentsResponse {
        departments,
        meta: PageMeta::new(total, &window),
    }))
}

#[utoipa::path(
    get,
    path = "/api/Department/{id}",
    params(("id" = i64, Path, description = "Department ID")),
    responses(
        (status = 200, description = "Department details", body = DepartmentDto),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Department not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Departments"
)]
#[instrument(skip(state, _auth))]
pub async fn get_department(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<DepartmentDto>, AppError> {
    let department = DepartmentService::get_department(&state.db, id).await?;
    Ok(Json(department))
}

#[utoipa::path(
    post,
    path = "/api/Department/create",
    request_body = CreateDepartmentDto,
    responses(
        (status = 200, description = "Department created", body = DepartmentDto),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 409, description = "Code already in use", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Departments"
)]
#[instrument(skip(state, _auth, dto))]
pub async fn create_department(
    State(state): State<AppState>,
    _auth: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateDepartmentDto>,
) -> Result<Json<DepartmentDto>, AppError> {
    let department = DepartmentService::create_department(&state.db, dto).await?;
    Ok(Json(department))
}

#[utoipa::path(
    patch,
    path = "/api/Department/{id}",
    params(("id" = i64, Path, description = "Department ID")),
    request_body = UpdateDepartmentDto,
    responses(
        (status = 200, description = "Department updated", body = DepartmentDto),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Department not found", body = ErrorResponse),
        (status = 409, description = "Code already in use", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Departments"
)]
#[instrument(skip(state, _auth, dto))]
pub async fn update_department(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateDepartmentDto>,
) -> Result<Json<DepartmentDto>, AppError> {
    let department = DepartmentService::update_department(&state.db, id, dto).await?;
    Ok(Json(department))
}

#[utoipa::path(
    delete,
    path = "/api/Department/{id}",
    params(("id" = i64, Path, description = "Department ID")),
    responses(
        (status = 200, description = "Department deleted", body = DeleteResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Department not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Departments"
)]
#[instrument(skip(state, _auth))]
pub async fn delete_department(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<DeleteResponse>, AppError> {
    DepartmentService::delete_department(&state.db, id).await?;
    Ok(Json(DeleteResponse { success: true }))
}
