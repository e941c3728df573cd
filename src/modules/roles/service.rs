use anyhow::anyhow;
use sqlx::PgPool;
use std::collections::BTreeSet;
use tracing::instrument;

use crate::utils::errors::{AppError, map_unique_violation};
use crate::utils::listing::ListQuery;
use crate::utils::pagination::PageWindow;

use super::model::{
    AssignPermissionsDto, CreatePermissionDto, CreateRoleDto, PermissionDto, PermissionRow,
    RoleDto, RoleRow, RoleWithPermissions, UpdatePermissionDto, UpdateRoleDto,
};

const ROLE_COLUMNS: &str = "id, code, name, description, created_at, updated_at";
const PERMISSION_COLUMNS: &str = "id, name, module, created_at, updated_at";

pub struct RoleService;

impl RoleService {
    #[instrument(skip(db))]
    pub async fn search_roles(
        db: &PgPool,
        keyword: Option<&str>,
        window: &PageWindow,
    ) -> Result<(Vec<RoleDto>, i64), AppError> {
        let (rows, total) = ListQuery::new("roles", ROLE_COLUMNS, "is_deleted")
            .keyword(&["code", "name"], keyword)
            .order_by("id")
            .fetch_page::<RoleRow>(db, window)
            .await?;

        Ok((rows.into_iter().map(RoleDto::from).collect(), total))
    }

    #[instrument(skip(db))]
    pub async fn get_role(db: &PgPool, id: i64) -> Result<RoleWithPermissions, AppError> {
        let role = Self::load_role(db, id).await?;
        let permissions = Self::get_role_permissions(db, id).await?;

        Ok(RoleWithPermissions {
            role: RoleDto::from(role),
            permissions,
        })
    }

    #[instrument(skip(db, dto))]
    pub async fn create_role(db: &PgPool, dto: CreateRoleDto) -> Result<RoleWithPermissions, AppError> {
        if Self::role_code_in_use(db, &dto.code, None).await? {
            return Err(AppError::conflict(anyhow!(
                "Role with code {} already exists",
                dto.code
            )));
        }

        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO roles (code, name, description) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&dto.code)
        .bind(&dto.name)
        .bind(&dto.description)
        .fetch_one(db)
        .await
        .map_err(|e| map_unique_violation(e, "Role with this code already exists"))?;

        Self::get_role(db, id).await
    }

    #[instrument(skip(db, dto))]
    pub async fn update_role(
        db: &PgPool,
        id: i64,
        dto: UpdateRoleDto,
    ) -> Result<RoleWithPermissions, AppError> {
        let existing = Self::load_role(db, id).await?;

        if let Some(code) = &dto.code {
            if Self::role_code_in_use(db, code, Some(id)).await? {
                return Err(AppError::conflict(anyhow!(
                    "Role with code {} already exists",
                    code
                )));
            }
        }

        let code = dto.code.unwrap_or(existing.code);
        let name = dto.name.unwrap_or(existing.name);
        let description = dto.description.or(existing.description);

        sqlx::query(
            "UPDATE roles SET code = $1, name = $2, description = $3, updated_at = NOW() \
             WHERE id = $4 AND is_deleted = FALSE",
        )
        .bind(&code)
        .bind(&name)
        .bind(&description)
        .bind(id)
        .execute(db)
        .await
        .map_err(|e| map_unique_violation(e, "Role with this code already exists"))?;

        Self::get_role(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_role(db: &PgPool, id: i64) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE roles SET is_deleted = TRUE, updated_at = NOW() \
             WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(id)
        .execute(db)
        .await
        .map_err(|e| AppError::database(anyhow::Error::from(e)))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Role not found")));
        }

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn get_role_permissions(
        db: &PgPool,
        role_id: i64,
    ) -> Result<Vec<PermissionDto>, AppError> {
        let rows = sqlx::query_as::<_, PermissionRow>(
            "SELECT p.id, p.name, p.module, p.created_at, p.updated_at \
             FROM permissions p \
             INNER JOIN role_permissions rp ON rp.permission_id = p.id \
             WHERE rp.role_id = $1 AND p.is_deleted = FALSE \
             ORDER BY p.module, p.name",
        )
        .bind(role_id)
        .fetch_all(db)
        .await
        .map_err(|e| AppError::database(anyhow::Error::from(e)))?;

        Ok(rows.into_iter().map(PermissionDto::from).collect())
    }

    /// Replaces the role's permission set with the given ids. The previous
    /// assignments and the new ones live in the same transaction, so a
    /// failure midway leaves the old set intact.
    #[instrument(skip(db, dto))]
    pub async fn assign_permissions(
        db: &PgPool,
        role_id: i64,
        dto: AssignPermissionsDto,
    ) -> Result<RoleWithPermissions, AppError> {
        let role = Self::load_role(db, role_id).await?;

        // Dedupe up front; the pair key on the join table makes duplicates a
        // constraint violation rather than a second row.
        let permission_ids: Vec<i64> = dto
            .permission_ids
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let known = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM permissions WHERE id = ANY($1) AND is_deleted = FALSE",
        )
        .bind(&permission_ids)
        .fetch_one(db)
        .await
        .map_err(|e| AppError::database(anyhow::Error::from(e)))?;

        if known != permission_ids.len() as i64 {
            return Err(AppError::bad_request(anyhow!(
                "One or more permission ids are invalid"
            )));
        }

        let mut tx = db
            .begin()
            .await
            .map_err(|e| AppError::database(anyhow::Error::from(e)))?;

        sqlx::query("DELETE FROM role_permissions WHERE role_id = $1")
            .bind(role_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(anyhow::Error::from(e)))?;

        for permission_id in &permission_ids {
            sqlx::query(
                "INSERT INTO role_permissions (role_id, permission_id) VALUES ($1, $2) \
                 ON CONFLICT (role_id, permission_id) DO NOTHING",
            )
            .bind(role_id)
            .bind(permission_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(anyhow::Error::from(e)))?;
        }

        tx.commit()
            .await
            .map_err(|e| AppError::database(anyhow::Error::from(e)))?;

        let permissions = Self::get_role_permissions(db, role_id).await?;

        Ok(RoleWithPermissions {
            role: RoleDto::from(role),
            permissions,
        })
    }

    async fn load_role(db: &PgPool, id: i64) -> Result<RoleRow, AppError> {
        let sql = format!(
            "SELECT {} FROM roles WHERE id = $1 AND is_deleted = FALSE",
            ROLE_COLUMNS
        );

        sqlx::query_as::<_, RoleRow>(&sql)
            .bind(id)
            .fetch_optional(db)
            .await
            .map_err(|e| AppError::database(anyhow::Error::from(e)))?
            .ok_or_else(|| AppError::not_found(anyhow!("Role not found")))
    }

    async fn role_code_in_use(
        db: &PgPool,
        code: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool, AppError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM roles \
             WHERE code = $1 AND is_deleted = FALSE AND id <> $2)",
        )
        .bind(code)
        .bind(exclude_id.unwrap_or(0))
        .fetch_one(db)
        .await
        .map_err(|e| AppError::database(anyhow::Error::from(e)))
    }
}

pub struct PermissionService;

impl PermissionService {
    #[instrument(skip(db))]
    pub async fn search_permissions(
        db: &PgPool,
        keyword: Option<&str>,
        module: Option<&str>,
        window: &PageWindow,
    ) -> Result<(Vec<PermissionDto>, i64), AppError> {
        let (rows, total) = ListQuery::new("permissions", PERMISSION_COLUMNS, "is_deleted")
            .keyword(&["name", "module"], keyword)
            .equals("module", module)
            .order_by("module, name")
            .fetch_page::<PermissionRow>(db, window)
            .await?;

        Ok((rows.into_iter().map(PermissionDto::from).collect(), total))
    }

    #[instrument(skip(db))]
    pub async fn get_permission(db: &PgPool, id: i64) -> Result<PermissionDto, AppError> {
        let sql = format!(
            "SELECT {} FROM permissions WHERE id = $1 AND is_deleted = FALSE",
            PERMISSION_COLUMNS
        );

        let row = sqlx::query_as::<_, PermissionRow>(&sql)
            .bind(id)
            .fetch_optional(db)
            .await
            .map_err(|e| AppError::database(anyhow::Error::from(e)))?
            .ok_or_else(|| AppError::not_found(anyhow!("Permission not found")))?;

        Ok(PermissionDto::from(row))
    }

    #[instrument(skip(db, dto))]
    pub async fn create_permission(
        db: &PgPool,
        dto: CreatePermissionDto,
    ) -> Result<PermissionDto, AppError> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO permissions (name, module) VALUES ($1, $2) RETURNING id",
        )
        .bind(&dto.name)
        .bind(&dto.module)
        .fetch_one(db)
        .await
        .map_err(|e| AppError::database(anyhow::Error::from(e)))?;

        Self::get_permission(db, id).await
    }

    #[instrument(skip(db, dto))]
    pub async fn update_permission(
        db: &PgPool,
        id: i64,
        dto: UpdatePermissionDto,
    ) -> Result<PermissionDto, AppError> {
        let existing = Self::get_permission(db, id).await?;

        let name = dto.name.unwrap_or(existing.name);
        let module = dto.module.unwrap_or(existing.module);

        sqlx::query(
            "UPDATE permissions SET name = $1, module = $2, updated_at = NOW() \
             WHERE id = $3 AND is_deleted = FALSE",
        )
        .bind(&name)
        .bind(&module)
        .bind(id)
        .execute(db)
        .await
        .map_err(|e| AppError::database(anyhow::Error::from(e)))?;

        Self::get_permission(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_permission(db: &PgPool, id: i64) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE permissions SET is_deleted = TRUE, updated_at = NOW() \
             WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(id)
        .execute(db)
        .await
        .map_err(|e| AppError::database(anyhow::Error::from(e)))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Permission not found")));
        }

        Ok(())
    }
}
