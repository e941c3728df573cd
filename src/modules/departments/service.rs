use anyhow::anyhow;
use sqlx::PgPool;
use tracing::instrument;

use crate::utils::errors::{AppError, map_unique_violation};
use crate::utils::listing::ListQuery;
use crate::utils::pagination::PageWindow;

use super::model::{CreateDepartmentDto, DepartmentDto, DepartmentRow, UpdateDepartmentDto};

const DEPARTMENT_COLUMNS: &str = "id, code, name, description, created_at, updated_at";

pub struct DepartmentService;

impl DepartmentService {
    #[instrument(skip(db))]
    pub async fn search_departments(
        db: &PgPool,
        keyword: Option<&str>,
        window: &PageWindow,
    ) -> Result<(Vec<DepartmentDto>, i64), AppError> {
        let (rows, total) = ListQuery::new("departments", DEPARTMENT_COLUMNS, "is_deleted")
            .keyword(&["code", "name"], keyword)
            .order_by("id")
            .fetch_page::<DepartmentRow>(db, window)
            .await?;

        Ok((rows.into_iter().map(DepartmentDto::from).collect(), total))
    }

    #[instrument(skip(db))]
    pub async fn get_department(db: &PgPool, id: i64) -> Result<DepartmentDto, AppError> {
        let sql = format!(
            "SELECT {} FROM departments WHERE id = $1 AND is_deleted = FALSE",
            DEPARTMENT_COLUMNS
        );

        let row = sqlx::query_as::<_, DepartmentRow>(&sql)
            .bind(id)
            .fetch_optional(db)
            .await
            .map_err(|e| AppError::database(anyhow::Error::from(e)))?
            .ok_or_else(|| AppError::not_found(anyhow!("Department not found")))?;

        Ok(DepartmentDto::from(row))
    }

    #[instrument(skip(db, dto))]
    pub async fn create_department(
        db: &PgPool,
        dto: CreateDepartmentDto,
    ) -> Result<DepartmentDto, AppError> {
        if Self::code_in_use(db, &dto.code, None).await? {
            return Err(AppError::conflict(anyhow!(
                "Department with code {} already exists",
                dto.code
            )));
        }

        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO departments (code, name, description) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&dto.code)
        .bind(&dto.name)
        .bind(&dto.description)
        .fetch_one(db)
        .await
        .map_err(|e| map_unique_violation(e, "Department with this code already exists"))?;

        Self::get_department(db, id).await
    }

    #[instrument(skip(db, dto))]
    pub async fn update_department(
        db: &PgPool,
        id: i64,
        dto: UpdateDepartmentDto,
    ) -> Result<DepartmentDto, AppError> {
        let existing = Self::get_department(db, id).await?;

        if let Some(code) = &dto.code {
            if Self::code_in_use(db, code, Some(id)).await? {
                return Err(AppError::conflict(anyhow!(
                    "Department with code {} already exists",
                    code
                )));
            }
        }

        let code = dto.code.unwrap_or(existing.code);
        let name = dto.name.unwrap_or(existing.name);
        let description = dto.description.or(existing.description);

        sqlx::query(
            "UPDATE departments SET code = $1, name = $2, description = $3, updated_at = NOW() \
             WHERE id = $4 AND is_deleted = FALSE",
        )
        .bind(&code)
        .bind(&name)
        .bind(&description)
        .bind(id)
        .execute(db)
        .await
        .map_err(|e| map_unique_violation(e, "Department with this code already exists"))?;

        Self::get_department(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_department(db: &PgPool, id: i64) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE departments SET is_deleted = TRUE, updated_at = NOW() \
             WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(id)
        .execute(db)
        .await
        .map_err(|e| AppError::database(anyhow::Error::from(e)))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Department not found")));
        }

        Ok(())
    }

    pub(crate) async fn exists(db: &PgPool, id: i64) -> Result<bool, AppError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM departments WHERE id = $1 AND is_deleted = FALSE)",
        )
        .bind(id)
        .fetch_one(db)
        .await
        .map_err(|e| AppError::database(anyhow::Error::from(e)))
    }

    async fn code_in_use(
        db: &PgPool,
        code: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool, AppError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM departments \
             WHERE code = $1 AND is_deleted = FALSE AND id <> $2)",
        )
        .bind(code)
        .bind(exclude_id.unwrap_or(0))
        .fetch_one(db)
        .await
        .map_err(|e| AppError::database(anyhow::Error::from(e)))
    }
}
