use anyhow::anyhow;
use sqlx::PgPool;
use tracing::instrument;

use crate::modules::departments::service::DepartmentService;
use crate::utils::errors::{AppError, map_unique_violation};
use crate::utils::listing::ListQuery;
use crate::utils::pagination::PageWindow;

use super::model::{CreateTeacherDto, TeacherDto, TeacherRow, UpdateTeacherDto};

const TEACHER_COLUMNS: &str = "t.id, t.code, t.position, t.degree, t.specialization, \
                               t.department_id, d.name AS department_name, t.account_id, \
                               p.id AS person_id, p.full_name, p.date_of_birth, p.gender, \
                               p.email, p.phone, p.address, p.citizen_id, \
                               t.created_at, t.updated_at";
const TEACHER_FROM: &str = "teachers t \
                            INNER JOIN persons p ON p.id = t.person_id \
                            LEFT JOIN departments d ON d.id = t.department_id AND d.is_deleted = FALSE";

pub struct TeacherService;

impl TeacherService {
    #[instrument(skip(db))]
    pub async fn search_teachers(
        db: &PgPool,
        keyword: Option<&str>,
        window: &PageWindow,
    ) -> Result<(Vec<TeacherDto>, i64), AppError> {
        let (rows, total) = ListQuery::new(TEACHER_FROM, TEACHER_COLUMNS, "t.is_deleted")
            .keyword(&["t.code", "p.full_name"], keyword)
            .order_by("t.id")
            .fetch_page::<TeacherRow>(db, window)
            .await?;

        Ok((rows.into_iter().map(TeacherDto::from).collect(), total))
    }

    #[instrument(skip(db))]
    pub async fn get_teacher(db: &PgPool, id: i64) -> Result<TeacherDto, AppError> {
        let row = Self::load_row(db, id).await?;
        Ok(TeacherDto::from(row))
    }

    /// Creates the Person and the Teacher in one transaction.
    #[instrument(skip(db, dto))]
    pub async fn create_teacher(db: &PgPool, dto: CreateTeacherDto) -> Result<TeacherDto, AppError> {
        if let Some(department_id) = dto.department_id {
            if !DepartmentService::exists(db, department_id).await? {
                return Err(AppError::bad_request(anyhow!("Department does not exist")));
            }
        }
        if Self::code_in_use(db, &dto.code, None).await? {
            return Err(AppError::conflict(anyhow!(
                "Teacher with code {} already exists",
                dto.code
            )));
        }
        if Self::citizen_id_in_use(db, &dto.citizen_id, None).await? {
            return Err(AppError::conflict(anyhow!(
                "Person with citizen id {} already exists",
                dto.citizen_id
            )));
        }

        let mut tx = db
            .begin()
            .await
            .map_err(|e| AppError::database(anyhow::Error::from(e)))?;

        let person_id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO persons (full_name, date_of_birth, gender, email, phone, address, citizen_id, person_type) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, 'teacher') \
             RETURNING id",
        )
        .bind(&dto.full_name)
        .bind(dto.date_of_birth)
        .bind(&dto.gender)
        .bind(&dto.email)
        .bind(&dto.phone)
        .bind(&dto.address)
        .bind(&dto.citizen_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, "Person with this citizen id already exists"))?;

        let teacher_id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO teachers (code, person_id, department_id, position, degree, specialization) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id",
        )
        .bind(&dto.code)
        .bind(person_id)
        .bind(dto.department_id)
        .bind(&dto.position)
        .bind(&dto.degree)
        .bind(&dto.specialization)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, "Teacher with this code already exists"))?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(anyhow::Error::from(e)))?;

        Self::get_teacher(db, teacher_id).await
    }

    #[instrument(skip(db, dto))]
    pub async fn update_teacher(
        db: &PgPool,
        id: i64,
        dto: UpdateTeacherDto,
    ) -> Result<TeacherDto, AppError> {
        let existing = Self::load_row(db, id).await?;

        if let Some(department_id) = dto.department_id {
            if !DepartmentService::exists(db, department_id).await? {
                return Err(AppError::bad_request(anyhow!("Department does not exist")));
            }
        }
        if let Some(code) = &dto.code {
            if Self::code_in_use(db, code, Some(id)).await? {
                return Err(AppError::conflict(anyhow!(
                    "Teacher with code {} already exists",
                    code
                )));
            }
        }
        if let Some(citizen_id) = &dto.citizen_id {
            if Self::citizen_id_in_use(db, citizen_id, Some(existing.person_id)).await? {
                return Err(AppError::conflict(anyhow!(
                    "Person with citizen id {} already exists",
                    citizen_id
                )));
            }
        }

        let code = dto.code.unwrap_or(existing.code);
        let position = dto.position.or(existing.position);
        let degree = dto.degree.or(existing.degree);
        let specialization = dto.specialization.or(existing.specialization);
        let department_id = dto.department_id.or(existing.department_id);

        let full_name = dto.full_name.unwrap_or(existing.full_name);
        let date_of_birth = dto.date_of_birth.or(existing.date_of_birth);
        let gender = dto.gender.or(existing.gender);
        let email = dto.email.or(existing.email);
        let phone = dto.phone.or(existing.phone);
        let address = dto.address.or(existing.address);
        let citizen_id = dto.citizen_id.unwrap_or(existing.citizen_id);

        let mut tx = db
            .begin()
            .await
            .map_err(|e| AppError::database(anyhow::Error::from(e)))?;

        sqlx::query(
            "UPDATE persons \
             SET full_name = $1, date_of_birth = $2, gender = $3, email = $4, phone = $5, \
                 address = $6, citizen_id = $7, updated_at = NOW() \
             WHERE id = $8",
        )
        .bind(&full_name)
        .bind(date_of_birth)
        .bind(&gender)
        .bind(&email)
        .bind(&phone)
        .bind(&address)
        .bind(&citizen_id)
        .bind(existing.person_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, "Person with this citizen id already exists"))?;

        sqlx::query(
            "UPDATE teachers \
             SET code = $1, department_id = $2, position = $3, degree = $4, \
                 specialization = $5, updated_at = NOW() \
             WHERE id = $6 AND is_deleted = FALSE",
        )
        .bind(&code)
        .bind(department_id)
        .bind(&position)
        .bind(&degree)
        .bind(&specialization)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, "Teacher with this code already exists"))?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(anyhow::Error::from(e)))?;

        Self::get_teacher(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_teacher(db: &PgPool, id: i64) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE teachers SET is_deleted = TRUE, updated_at = NOW() \
             WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(id)
        .execute(db)
        .await
        .map_err(|e| AppError::database(anyhow::Error::from(e)))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Teacher not found")));
        }

        Ok(())
    }

    async fn load_row(db: &PgPool, id: i64) -> Result<TeacherRow, AppError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE t.id = $1 AND t.is_deleted = FALSE",
            TEACHER_COLUMNS, TEACHER_FROM
        );

        sqlx::query_as::<_, TeacherRow>(&sql)
            .bind(id)
            .fetch_optional(db)
            .await
            .map_err(|e| AppError::database(anyhow::Error::from(e)))?
            .ok_or_else(|| AppError::not_found(anyhow!("Teacher not found")))
    }

    async fn code_in_use(
        db: &PgPool,
        code: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool, AppError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM teachers \
             WHERE code = $1 AND is_deleted = FALSE AND id <> $2)",
        )
        .bind(code)
        .bind(exclude_id.unwrap_or(0))
        .fetch_one(db)
        .await
        .map_err(|e| AppError::database(anyhow::Error::from(e)))
    }

    async fn citizen_id_in_use(
        db: &PgPool,
        citizen_id: &str,
        exclude_person_id: Option<i64>,
    ) -> Result<bool, AppError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM persons \
             WHERE citizen_id = $1 AND is_deleted = FALSE AND id <> $2)",
        )
        .bind(citizen_id)
        .bind(exclude_person_id.unwrap_or(0))
        .fetch_one(db)
        .await
        .map_err(|e| AppError::database(anyhow::Error::from(e)))
    }
}
