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
    AssignPermissionsDto, CreatePermissionDto, CreateRoleDto, PaginatedPermissionsResponse,
    PaginatedRolesResponse, PermissionDto, PermissionFilterParams, RoleFilterParams,
    RoleWithPermissions, UpdatePermissionDto, UpdateRoleDto,
};
use super::service::{PermissionService, RoleService};

#[utoipa::path(
    get,
    path = "/api/Role/paginated",
    params(RoleFilterParams, PageRequest),
    responses(
        (status = 200, description = "Paginated roles", body = PaginatedRolesResponse),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Roles"
)]
#[instrument(skip(state, _auth))]
pub async fn get_roles(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(filters): Query<RoleFilterParams>,
    Query(page): Query<PageRequest>,
) -> Result<Json<PaginatedRolesResponse>, AppError> {
    let window = page.window()?;
    let (roles, total) =
        RoleService::search_roles(&state.db, filters.keyword.as_deref(), &window).await?;

    Ok(Json(PaginatedRolesResponse {
        roles,
        meta: PageMeta::new(total, &window),
    }))
}

#[utoipa::path(
    get,
    path = "/api/Role/{id}",
    params(("id" = i64, Path, description = "Role ID")),
    responses(
        (status = 200, description = "Role with its permissions", body = RoleWithPermissions),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Role not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Roles"
)]
#[instrument(skip(state, _auth))]
pub async fn get_role(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<RoleWithPermissions>, AppError> {
    let role = RoleService::get_role(&state.db, id).await?;
    Ok(Json(role))
}

#[utoipa::path(
    post,
    path = "/api/Role/create",
    request_body = CreateRoleDto,
    responses(
        (status = 200, description = "Role created", body = RoleWithPermissions),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 409, description = "Code already in use", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Roles"
)]
#[instrument(skip(state, _auth, dto))]
pub async fn create_role(
    State(state): State<AppState>,
    _auth: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateRoleDto>,
) -> Result<Json<RoleWithPermissions>, AppError> {
    let role = RoleService::create_role(&state.db, dto).await?;
    Ok(Json(role))
}

#[utoipa::path(
    patch,
    path = "/api/Role/{id}",
    params(("id" = i64, Path, description = "Role ID")),
    request_body = UpdateRoleDto,
    responses(
        (status = 200, description = "Role updated", body = RoleWithPermissions),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Role not found", body = ErrorResponse),
        (status = 409, description = "Code already in use", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Roles"
)]
#[instrument(skip(state, _auth, dto))]
pub async fn update_role(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateRoleDto>,
) -> Result<Json<RoleWithPermissions>, AppError> {
    let role = RoleService::update_role(&state.db, id, dto).await?;
    Ok(Json(role))
}

#[utoipa::path(
    delete,
    path = "/api/Role/{id}",
    params(("id" = i64, Path, description = "Role ID")),
    responses(
        (status = 200, description = "Role deleted", body = DeleteResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Role not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Roles"
)]
#[instrument(skip(state, _auth))]
pub async fn delete_role(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<DeleteResponse>, AppError> {
    RoleService::delete_role(&state.db, id).await?;
    Ok(Json(DeleteResponse { success: true }))
}

#[utoipa::path(
    get,
    path = "/api/Permission/paginated",
    params(PermissionFilterParams, PageRequest),
    responses(
        (status = 200, description = "Paginated permissions", body = PaginatedPermissionsResponse),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Permissions"
)]
#[instrument(skip(state, _auth))]
pub async fn get_permissions(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(filters): Query<PermissionFilterParams>,
    Query(page): Query<PageRequest>,
) -> Result<Json<PaginatedPermissionsResponse>, AppError> {
    let window = page.window()?;
    let (permissions, total) = PermissionService::search_permissions(
        &state.db,
        filters.keyword.as_deref(),
        filters.module.as_deref(),
        &window,
    )
    .await?;

    Ok(Json(PaginatedPermissionsResponse {
        permissions,
        meta: PageMeta::new(total, &window),
    }))
}

#[utoipa::path(
    get,
    path = "/api/Permission/{id}",
    params(("id" = i64, Path, description = "Permission ID")),
    responses(
        (status = 200, description = "Permission details", body = PermissionDto),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Permission not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Permissions"
)]
#[instrument(skip(state, _auth))]
pub async fn get_permission(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<PermissionDto>, AppError> {
    let permission = PermissionService::get_permission(&state.db, id).await?;
    Ok(Json(permission))
}

#[utoipa::path(
    post,
    path = "/api/Permission/create",
    request_body = CreatePermissionDto,
    responses(
        (status = 200, description = "Permission created", body = PermissionDto),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Permissions"
)]
#[instrument(skip(state, _auth, dto))]
pub async fn create_permission(
    State(state): State<AppState>,
    _auth: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreatePermissionDto>,
) -> Result<Json<PermissionDto>, AppError> {
    let permission = PermissionService::create_permission(&state.db, dto).await?;
    Ok(Json(permission))
}

#[utoipa::path(
    patch,
    path = "/api/Permission/{id}",
    params(("id" = i64, Path, description = "Permission ID")),
    request_body = UpdatePermissionDto,
    responses(
        (status = 200, description = "Permission updated", body = PermissionDto),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Permission not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Permissions"
)]
#[instrument(skip(state, _auth, dto))]
pub async fn update_permission(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdatePermissionDto>,
) -> Result<Json<PermissionDto>, AppError> {
    let permission = PermissionService::update_permission(&state.db, id, dto).await?;
    Ok(Json(permission))
}

#[utoipa::path(
    delete,
    path = "/api/Permission/{id}",
    params(("id" = i64, Path, description = "Permission ID")),
    responses(
        (status = 200, description = "Permission deleted", body = DeleteResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Permission not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Permissions"
)]
#[instrument(skip(state, _auth))]
pub async fn delete_permission(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<DeleteResponse>, AppError> {
    PermissionService::delete_permission(&state.db, id).await?;
    Ok(Json(DeleteResponse { success: true }))
}

/// Replace a role's permission set with the given ids
#[utoipa::path(
    post,
    path = "/api/permissions/{roleId}",
    params(("roleId" = i64, Path, description = "Role ID")),
    request_body = AssignPermissionsDto,
    responses(
        (status = 200, description = "Permission set replaced", body = RoleWithPermissions),
        (status = 400, description = "Invalid permission ids", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Role not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Permissions"
)]
#[instrument(skip(state, _auth, dto))]
pub async fn assign_permissions(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(role_id): Path<i64>,
    Json(dto): Json<AssignPermissionsDto>,
) -> Result<Json<RoleWithPermissions>, AppError> {
    let role = RoleService::assign_permissions(&state.db, role_id, dto).await?;
    Ok(Json(role))
}

/// List the permissions currently assigned to a role
#[utoipa::path(
    get,
    path = "/api/permissions/{roleId}",
    params(("roleId" = i64, Path, description = "Role ID")),
    responses(
        (status = 200, description = "Assigned permissions", body = Vec<PermissionDto>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Role not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Permissions"
)]
#[instrument(skip(state, _auth))]
pub async fn get_assigned_permissions(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(role_id): Path<i64>,
) -> Result<Json<Vec<PermissionDto>>, AppError> {
    let role = RoleService::get_role(&state.db, role_id).await?;
    Ok(Json(role.permissions))
}
