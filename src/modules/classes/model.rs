use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::utils::pagination::{PageMeta, deserialize_optional_string};

/// Listing/detail projection: class joined to its department and homeroom
/// teacher's person record.
#[derive(Debug, Clone, FromRow)]
pub struct ClassRow {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub academic_year: String,
    pub semester: i32,
    pub department_id: Option<i64>,
    pub department_name: Option<String>,
    pub homeroom_teacher_id: Option<i64>,
    pub homeroom_teacher_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct ClassDto {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub academic_year: String,
    pub semester: i32,
    pub department_id: Option<i64>,
    /// Display name of the owning department; null when unassigned.
    pub department_name: Option<String>,
    pub homeroom_teacher_id: Option<i64>,
    pub homeroom_teacher_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ClassRow> for ClassDto {
    fn from(row: ClassRow) -> Self {
        Self {
            id: row.id,
            code: row.code,
            name: row.name,
            academic_year: row.academic_year,
            semester: row.semester,
            department_id: row.department_id,
            department_name: row.department_name,
            homeroom_teacher_id: row.homeroom_teacher_id,
            homeroom_teacher_name: row.homeroom_teacher_name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// One row of the class-roster spreadsheet: student joined to person.
#[derive(Debug, Clone, FromRow)]
pub struct ClassStudentRow {
    pub code: String,
    pub full_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct CreateClassDto {
    #[validate(length(min = 1, max = 50, message = "Code must be between 1 and 50 characters"))]
    pub code: String,
    #[validate(length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 20, message = "AcademicYear must not be empty"))]
    pub academic_year: String,
    #[validate(range(min = 1, max = 3, message = "Semester must be between 1 and 3"))]
    pub semester: i32,
    pub department_id: Option<i64>,
    pub homeroom_teacher_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateClassDto {
    #[validate(length(min = 1, max = 50, message = "Code must be between 1 and 50 characters"))]
    pub code: Option<String>,
    #[validate(length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 20, message = "AcademicYear must not be empty"))]
    pub academic_year: Option<String>,
    #[validate(range(min = 1, max = 3, message = "Semester must be between 1 and 3"))]
    pub semester: Option<i32>,
    pub department_id: Option<i64>,
    pub homeroom_teacher_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "PascalCase")]
pub struct ClassFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub keyword: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedClassesResponse {
    #[serde(rename = "Class")]
    pub classes: Vec<ClassDto>,
    #[serde(flatten)]
    pub meta: PageMeta,
}
