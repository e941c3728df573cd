use anyhow::anyhow;
use rust_xlsxwriter::Workbook;
use sqlx::PgPool;
use tracing::instrument;

use crate::utils::errors::{AppError, map_unique_violation};
use crate::utils::listing::ListQuery;
use crate::utils::pagination::PageWindow;

use super::model::{ClassDto, ClassRow, ClassStudentRow, CreateClassDto, UpdateClassDto};

const CLASS_COLUMNS: &str = "c.id, c.code, c.name, c.academic_year, c.semester, \
                             c.department_id, d.name AS department_name, \
                             c.homeroom_teacher_id, tp.full_name AS homeroom_teacher_name, \
                             c.created_at, c.updated_at";
const CLASS_FROM: &str = "classes c \
                          LEFT JOIN departments d ON d.id = c.department_id AND d.is_deleted = FALSE \
                          LEFT JOIN teachers t ON t.id = c.homeroom_teacher_id AND t.is_deleted = FALSE \
                          LEFT JOIN persons tp ON tp.id = t.person_id";

pub struct ClassService;

impl ClassService {
    #[instrument(skip(db))]
    pub async fn search_classes(
        db: &PgPool,
        keyword: Option<&str>,
        window: &PageWindow,
    ) -> Result<(Vec<ClassDto>, i64), AppError> {
        let (rows, total) = ListQuery::new(CLASS_FROM, CLASS_COLUMNS, "c.is_deleted")
            .keyword(&["c.code", "c.name"], keyword)
            .order_by("c.id")
            .fetch_page::<ClassRow>(db, window)
            .await?;

        Ok((rows.into_iter().map(ClassDto::from).collect(), total))
    }

    #[instrument(skip(db))]
    pub async fn get_class(db: &PgPool, id: i64) -> Result<ClassDto, AppError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE c.id = $1 AND c.is_deleted = FALSE",
            CLASS_COLUMNS, CLASS_FROM
        );

        let row = sqlx::query_as::<_, ClassRow>(&sql)
            .bind(id)
            .fetch_optional(db)
            .await
            .map_err(|e| AppError::database(anyhow::Error::from(e)))?
            .ok_or_else(|| AppError::not_found(anyhow!("Class not found")))?;

        Ok(ClassDto::from(row))
    }

    #[instrument(skip(db, dto))]
    pub async fn create_class(db: &PgPool, dto: CreateClassDto) -> Result<ClassDto, AppError> {
        Self::check_references(db, dto.department_id, dto.homeroom_teacher_id).await?;

        if Self::code_in_use(db, &dto.code, None).await? {
            return Err(AppError::conflict(anyhow!(
                "Class with code {} already exists",
                dto.code
            )));
        }

        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO classes (code, name, academic_year, semester, department_id, homeroom_teacher_id) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id",
        )
        .bind(&dto.code)
        .bind(&dto.name)
        .bind(&dto.academic_year)
        .bind(dto.semester)
        .bind(dto.department_id)
        .bind(dto.homeroom_teacher_id)
        .fetch_one(db)
        .await
        .map_err(|e| map_unique_violation(e, "Class with this code already exists"))?;

        Self::get_class(db, id).await
    }

    #[instrument(skip(db, dto))]
    pub async fn update_class(
        db: &PgPool,
        id: i64,
        dto: UpdateClassDto,
    ) -> Result<ClassDto, AppError> {
        let existing = Self::get_class(db, id).await?;

        Self::check_references(db, dto.department_id, dto.homeroom_teacher_id).await?;

        if let Some(code) = &dto.code {
            if Self::code_in_use(db, code, Some(id)).await? {
                return Err(AppError::conflict(anyhow!(
                    "Class with code {} already exists",
                    code
                )));
            }
        }

        let code = dto.code.unwrap_or(existing.code);
        let name = dto.name.unwrap_or(existing.name);
        let academic_year = dto.academic_year.unwrap_or(existing.academic_year);
        let semester = dto.semester.unwrap_or(existing.semester);
        let department_id = dto.department_id.or(existing.department_id);
        let homeroom_teacher_id = dto.homeroom_teacher_id.or(existing.homeroom_teacher_id);

        sqlx::query(
            "UPDATE classes \
             SET code = $1, name = $2, academic_year = $3, semester = $4, \
                 department_id = $5, homeroom_teacher_id = $6, updated_at = NOW() \
             WHERE id = $7 AND is_deleted = FALSE",
        )
        .bind(&code)
        .bind(&name)
        .bind(&academic_year)
        .bind(semester)
        .bind(department_id)
        .bind(homeroom_teacher_id)
        .bind(id)
        .execute(db)
        .await
        .map_err(|e| map_unique_violation(e, "Class with this code already exists"))?;

        Self::get_class(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_class(db: &PgPool, id: i64) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE classes SET is_deleted = TRUE, updated_at = NOW() \
             WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(id)
        .execute(db)
        .await
        .map_err(|e| AppError::database(anyhow::Error::from(e)))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Class not found")));
        }

        Ok(())
    }

    /// Renders the class roster (non-deleted students joined to their person
    /// rows) into an xlsx workbook, returning the suggested file name and
    /// the workbook bytes.
    #[instrument(skip(db))]
    pub async fn export_students(db: &PgPool, id: i64) -> Result<(String, Vec<u8>), AppError> {
        let class = Self::get_class(db, id).await?;

        let students = sqlx::query_as::<_, ClassStudentRow>(
            "SELECT s.code, p.full_name, p.date_of_birth, p.gender, p.email, p.phone, s.status \
             FROM students s \
             INNER JOIN persons p ON p.id = s.person_id \
             WHERE s.class_id = $1 AND s.is_deleted = FALSE \
             ORDER BY s.code",
        )
        .bind(id)
        .fetch_all(db)
        .await
        .map_err(|e| AppError::database(anyhow::Error::from(e)))?;

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();

        let headers = [
            "Student Code",
            "Full Name",
            "Date Of Birth",
            "Gender",
            "Email",
            "Phone",
            "Status",
        ];
        for (col, header) in headers.iter().enumerate() {
            worksheet.write(0, col as u16, *header)?;
        }

        for (i, student) in students.iter().enumerate() {
            let row = (i + 1) as u32;
            worksheet.write(row, 0, student.code.as_str())?;
            worksheet.write(row, 1, student.full_name.as_str())?;
            worksheet.write(
                row,
                2,
                student
                    .date_of_birth
                    .map(|d| d.to_string())
                    .unwrap_or_default(),
            )?;
            worksheet.write(row, 3, student.gender.clone().unwrap_or_default())?;
            worksheet.write(row, 4, student.email.clone().unwrap_or_default())?;
            worksheet.write(row, 5, student.phone.clone().unwrap_or_default())?;
            worksheet.write(row, 6, student.status.as_str())?;
        }

        let buffer = workbook.save_to_buffer()?;
        let file_name = format!("class-{}-students.xlsx", class.code);

        Ok((file_name, buffer))
    }

    pub(crate) async fn exists(db: &PgPool, id: i64) -> Result<bool, AppError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM classes WHERE id = $1 AND is_deleted = FALSE)",
        )
        .bind(id)
        .fetch_one(db)
        .await
        .map_err(|e| AppError::database(anyhow::Error::from(e)))
    }

    async fn check_references(
        db: &PgPool,
        department_id: Option<i64>,
        homeroom_teacher_id: Option<i64>,
    ) -> Result<(), AppError> {
        if let Some(department_id) = department_id {
            if !crate::modules::departments::service::DepartmentService::exists(db, department_id)
                .await?
            {
                return Err(AppError::bad_request(anyhow!("Department does not exist")));
            }
        }

        if let Some(teacher_id) = homeroom_teacher_id {
            let exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM teachers WHERE id = $1 AND is_deleted = FALSE)",
            )
            .bind(teacher_id)
            .fetch_one(db)
            .await
            .map_err(|e| AppError::database(anyhow::Error::from(e)))?;

            if !exists {
                return Err(AppError::bad_request(anyhow!("Teacher does not exist")));
            }
        }

        Ok(())
    }

    async fn code_in_use(
        db: &PgPool,
        code: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool, AppError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM classes \
             WHERE code = $1 AND is_deleted = FALSE AND id <> $2)",
        )
        .bind(code)
        .bind(exclude_id.unwrap_or(0))
        .fetch_one(db)
        .await
        .map_err(|e| AppError::database(anyhow::Error::from(e)))
    }
}
