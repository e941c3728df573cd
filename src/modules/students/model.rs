use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::utils::pagination::{PageMeta, deserialize_optional_string};

/// Student lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StudentStatus {
    Active,
    Graduated,
    Suspended,
    Dropped,
    Retired,
}

impl StudentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Graduated => "graduated",
            Self::Suspended => "suspended",
            Self::Dropped => "dropped",
            Self::Retired => "retired",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "active" => Some(Self::Active),
            "graduated" => Some(Self::Graduated),
            "suspended" => Some(Self::Suspended),
            "dropped" => Some(Self::Dropped),
            "retired" => Some(Self::Retired),
            _ => None,
        }
    }
}

/// Listing/detail projection: student joined to its person and class.
#[derive(Debug, Clone, FromRow)]
pub struct StudentRow {
    pub id: i64,
    pub code: String,
    pub status: String,
    pub enrollment_date: Option<NaiveDate>,
    pub graduation_date: Option<NaiveDate>,
    pub class_id: Option<i64>,
    pub class_name: Option<String>,
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
pub struct StudentDto {
    pub id: i64,
    pub code: String,
    pub status: String,
    pub enrollment_date: Option<NaiveDate>,
    pub graduation_date: Option<NaiveDate>,
    pub class_id: Option<i64>,
    /// Display name of the student's class; null when unassigned.
    pub class_name: Option<String>,
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

impl From<StudentRow> for StudentDto {
    fn from(row: StudentRow) -> Self {
        Self {
            id: row.id,
            code: row.code,
            status: row.status,
            enrollment_date: row.enrollment_date,
            graduation_date: row.graduation_date,
            class_id: row.class_id,
            class_name: row.class_name,
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
pub struct CreateStudentDto {
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
    pub enrollment_date: Option<NaiveDate>,
    pub graduation_date: Option<NaiveDate>,
    pub status: Option<StudentStatus>,
    pub class_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateStudentDto {
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
    pub enrollment_date: Option<NaiveDate>,
    pub graduation_date: Option<NaiveDate>,
    pub status: Option<StudentStatus>,
    pub class_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "PascalCase")]
pub struct StudentFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub keyword: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedStudentsResponse {
    #[serde(rename = "Student")]
    pub students: Vec<StudentDto>,
    #[serde(flatten)]
    pub meta: PageMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            StudentStatus::Active,
            StudentStatus::Graduated,
            StudentStatus::Suspended,
            StudentStatus::Dropped,
            StudentStatus::Retired,
        ] {
            assert_eq!(StudentStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(StudentStatus::parse("bogus"), None);
    }

    #[test]
    fn create_dto_accepts_pascal_case_body() {
        let json = r#"{"Code":"SV001","FullName":"Binh Nguyen","CitizenId":"0123456789","ClassId":3}"#;
        let dto: CreateStudentDto = serde_json::from_str(json).unwrap();
        assert_eq!(dto.code, "SV001");
        assert_eq!(dto.class_id, Some(3));
        assert!(dto.status.is_none());
    }
}
