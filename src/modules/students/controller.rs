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
    CreateStudentDto, PaginatedStudentsResponse, StudentDto, StudentFilterParams, StudentStatus,
    UpdateStudentDto,
};
use super::service::StudentService;

fn parse_status_filter(status: Option<&str>) -> Result<Option<StudentStatus>, AppError> {
    status
        .map(|s| {
            StudentStatus::parse(s)
                .ok_or_else(|| AppError::bad_request(anyhow::anyhow!("Invalid status filter")))
        })
        .transpose()
}

#[utoipa::path(
    get,
    path = "/api/Student/paginated",
    params(StudentFilterParams, PageRequest),
    responses(
        (status = 200, description = "Paginated students", body = PaginatedStudentsResponse),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, _auth))]
pub async fn get_students(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(filters): Query<StudentFilterParams>,
    Query(page): Query<PageRequest>,
) -> Result<Json<PaginatedStudentsResponse>, AppError> {
    let window = page.window()?;
    let status = parse_status_filter(filters.status.as_deref())?;

    let (students, total) =
        StudentService::search_students(&state.db, filters.keyword.as_deref(), status, &window)
            .await?;

    Ok(Json(PaginatedStudentsResponse {
        students,
        meta: PageMeta::new(total, &window),
    }))
}

#[utoipa::path(
    get,
    path = "/api/Student/{id}",
    params(("id" = i64, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student details", body = StudentDto),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, _auth))]
pub async fn get_student(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<StudentDto>, AppError> {
    let student = StudentService::get_student(&state.db, id).await?;
    Ok(Json(student))
}

#[utoipa::path(
    post,
    path = "/api/Student/create",
    request_body = CreateStudentDto,
    responses(
        (status = 200, description = "Student created", body = StudentDto),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 409, description = "Code or citizen id already in use", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, _auth, dto))]
pub async fn create_student(
    State(state): State<AppState>,
    _auth: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateStudentDto>,
) -> Result<Json<StudentDto>, AppError> {
    let student = StudentService::create_student(&state.db, dto).await?;
    Ok(Json(student))
}

#[utoipa::path(
    patch,
    path = "/api/Student/{id}",
    params(("id" = i64, Path, description = "Student ID")),
    request_body = UpdateStudentDto,
    responses(
        (status = 200, description = "Student updated", body = StudentDto),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse),
        (status = 409, description = "Code or citizen id already in use", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, _auth, dto))]
pub async fn update_student(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateStudentDto>,
) -> Result<Json<StudentDto>, AppError> {
    let student = StudentService::update_student(&state.db, id, dto).await?;
    Ok(Json(student))
}

#[utoipa::path(
    delete,
    path = "/api/Student/{id}",
    params(("id" = i64, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student deleted", body = DeleteResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, _auth))]
pub async fn delete_student(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<DeleteResponse>, AppError> {
    StudentService::delete_student(&state.db, id).await?;
    Ok(Json(DeleteResponse { success: true }))
}
