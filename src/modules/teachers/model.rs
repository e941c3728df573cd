use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::utils::pagination::{PageMeta, deserialize_optional_string};

/// Listing/detail projection: teacher joined to its person and department.
#[derive(Debug, Clone, FromRow)]
pub struct TeacherRow {
    pub id: i64,
    pub code: String,
    pub position: Option<String>,
    pub degree: Option<String>,
    pub specialization: Option<String>,
    pub department_id: Option<i64>,
    pub department_name: Option<String>,
    pub account_id: Option<i64>,
    pub person_id: i64,
    pub full_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub citizen_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct TeacherDto {
    pub id: i64,
    pub code: String,
    pub position: Option<String>,
    pub degree: Option<String>,
    pub specialization: Option<String>,
    pub department_id: Option<i64>,
    /// Display name of the teacher's department; null when unassigned.
    pub department_name: Option<String>,
    pub account_id: Option<i64>,
    pub full_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub citizen_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TeacherRow> for TeacherDto {
    fn from(row: TeacherRow) -> Self {
        Self {
            id: row.id,
            code: row.code,
            position: row.position,
            degree: row.degree,
            specialization: row.specialization,
            department_id: row.department_id,
            department_name: row.department_name,
            account_id: row.account_id,
            full_name: row.full_name,
            date_of_birth: row.date_of_birth,
            gender: row.gender,
            email: row.email,
            phone: row.phone,
            address: row.address,
            citizen_id: row.citizen_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct CreateTeacherDto {
    #[validate(length(min = 1, max = 50, message = "Code must be between 1 and 50 characters"))]
    pub code: String,
    #[validate(length(min = 1, max = 200, message = "FullName must not be empty"))]
    pub full_name: String,
    #[validate(length(min = 1, max = 20, message = "CitizenId must not be empty"))]
    pub citizen_id: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    #[validate(email(message = "Email must be a valid email address"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub position: Option<String>,
    pub degree: Option<String>,
    pub specialization: Option<String>,
    pub department_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateTeacherDto {
    #[validate(length(min = 1, max = 50, message = "Code must be between 1 and 50 characters"))]
    pub code: Option<String>,
    #[validate(length(min = 1, max = 200, message = "FullName must not be empty"))]
    pub full_name: Option<String>,
    #[validate(length(min = 1, max = 20, message = "CitizenId must not be empty"))]
    pub citizen_id: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    #[validate(email(message = "Email must be a valid email address"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub position: Option<String>,
    pub degree: Option<String>,
    pub specialization: Option<String>,
    pub department_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "PascalCase")]
pub struct TeacherFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub keyword: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedTeachersResponse {
    #[serde(rename = "Teacher")]
    pub teachers: Vec<TeacherDto>,
    #[serde(flatten)]
    pub meta: PageMeta,
}
