use anyhow::anyhow;
use sqlx::PgPool;
use tracing::instrument;

use crate::modules::classes::service::ClassService;
use crate::utils::errors::{AppError, map_unique_violation};
use crate::utils::listing::ListQuery;
use crate::utils::pagination::PageWindow;

use super::model::{CreateStudentDto, StudentDto, StudentRow, StudentStatus, UpdateStudentDto};

const STUDENT_COLUMNS: &str = "s.id, s.code, s.status, s.enrollment_date, s.graduation_date, \
                               s.class_id, c.name AS class_name, s.account_id, \
                               p.id AS person_id, p.full_name, p.date_of_birth, p.gender, \
                               p.email, p.phone, p.address, p.citizen_id, \
                               s.created_at, s.updated_at";
const STUDENT_FROM: &str = "students s \
                            INNER JOIN persons p ON p.id = s.person_id \
                            LEFT JOIN classes c ON c.id = s.class_id AND c.is_deleted = FALSE";

pub struct StudentService;

impl StudentService {
    #[instrument(skip(db))]
    pub async fn search_students(
        db: &PgPool,
        keyword: Option<&str>,
        status: Option<StudentStatus>,
        window: &PageWindow,
    ) -> Result<(Vec<StudentDto>, i64), AppError> {
        let (rows, total) = ListQuery::new(STUDENT_FROM, STUDENT_COLUMNS, "s.is_deleted")
            .keyword(&["s.code", "p.full_name"], keyword)
            .equals("s.status", status.map(|s| s.as_str()))
            .order_by("s.id")
            .fetch_page::<StudentRow>(db, window)
            .await?;

        Ok((rows.into_iter().map(StudentDto::from).collect(), total))
    }

    #[instrument(skip(db))]
    pub async fn get_student(db: &PgPool, id: i64) -> Result<StudentDto, AppError> {
        let row = Self::load_row(db, id).await?;
        Ok(StudentDto::from(row))
    }

    /// Creates the Person and the Student in one transaction: either both
    /// rows commit or neither does.
    #[instrument(skip(db, dto))]
    pub async fn create_student(db: &PgPool, dto: CreateStudentDto) -> Result<StudentDto, AppError> {
        if let Some(class_id) = dto.class_id {
            if !ClassService::exists(db, class_id).await? {
                return Err(AppError::bad_request(anyhow!("Class does not exist")));
            }
        }
        if Self::code_in_use(db, &dto.code, None).await? {
            return Err(AppError::conflict(anyhow!(
                "Student with code {} already exists",
                dto.code
            )));
        }
        if Self::citizen_id_in_use(db, &dto.citizen_id, None).await? {
            return Err(AppError::conflict(anyhow!(
                "Person with citizen id {} already exists",
                dto.citizen_id
            )));
        }

        let status = dto.status.unwrap_or(StudentStatus::Active);

        let mut tx = db
            .begin()
            .await
            .map_err(|e| AppError::database(anyhow::Error::from(e)))?;

        let person_id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO persons (full_name, date_of_birth, gender, email, phone, address, citizen_id, person_type) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, 'student') \
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

        let student_id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO students (code, person_id, class_id, enrollment_date, graduation_date, status) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id",
        )
        .bind(&dto.code)
        .bind(person_id)
        .bind(dto.class_id)
        .bind(dto.enrollment_date)
        .bind(dto.graduation_date)
        .bind(status.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, "Student with this code already exists"))?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(anyhow::Error::from(e)))?;

        Self::get_student(db, student_id).await
    }

    /// Partial edit across the aggregate: fields absent from the request
    /// keep their prior values, and the person and student rows are updated
    /// in the same transaction.
    #[instrument(skip(db, dto))]
    pub async fn update_student(
        db: &PgPool,
        id: i64,
        dto: UpdateStudentDto,
    ) -> Result<StudentDto, AppError> {
        let existing = Self::load_row(db, id).await?;

        if let Some(class_id) = dto.class_id {
            if !ClassService::exists(db, class_id).await? {
                return Err(AppError::bad_request(anyhow!("Class does not exist")));
            }
        }
        if let Some(code) = &dto.code {
            if Self::code_in_use(db, code, Some(id)).await? {
                return Err(AppError::conflict(anyhow!(
                    "Student with code {} already exists",
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
        let status = dto
            .status
            .map(|s| s.as_str().to_string())
            .unwrap_or(existing.status);
        let enrollment_date = dto.enrollment_date.or(existing.enrollment_date);
        let graduation_date = dto.graduation_date.or(existing.graduation_date);
        let class_id = dto.class_id.or(existing.class_id);

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
            "UPDATE students \
             SET code = $1, class_id = $2, enrollment_date = $3, graduation_date = $4, \
                 status = $5, updated_at = NOW() \
             WHERE id = $6 AND is_deleted = FALSE",
        )
        .bind(&code)
        .bind(class_id)
        .bind(enrollment_date)
        .bind(graduation_date)
        .bind(&status)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, "Student with this code already exists"))?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(anyhow::Error::from(e)))?;

        Self::get_student(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_student(db: &PgPool, id: i64) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE students SET is_deleted = TRUE, updated_at = NOW() \
             WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(id)
        .execute(db)
        .await
        .map_err(|e| AppError::database(anyhow::Error::from(e)))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Student not found")));
        }

        Ok(())
    }

    async fn load_row(db: &PgPool, id: i64) -> Result<StudentRow, AppError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE s.id = $1 AND s.is_deleted = FALSE",
            STUDENT_COLUMNS, STUDENT_FROM
        );

        sqlx::query_as::<_, StudentRow>(&sql)
            .bind(id)
            .fetch_optional(db)
            .await
            .map_err(|e| AppError::database(anyhow::Error::from(e)))?
            .ok_or_else(|| AppError::not_found(anyhow!("Student not found")))
    }

    async fn code_in_use(
        db: &PgPool,
        code: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool, AppError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM students \
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
