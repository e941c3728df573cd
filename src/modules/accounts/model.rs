use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::utils::pagination::{PageMeta, deserialize_optional_string};

/// JWT claims carried by every bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // account id
    pub email: String,
    pub iss: String,
    pub aud: String,
    pub iat: usize,
    pub exp: usize,
}

/// Account lifecycle states. Only `active` accounts can log in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Pending,
    Active,
    Suspended,
    Locked,
    Expired,
    Inactive,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Suspended => "suspended",
            Self::Locked => "locked",
            Self::Expired => "expired",
            Self::Inactive => "inactive",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "active" => Some(Self::Active),
            "suspended" => Some(Self::Suspended),
            "locked" => Some(Self::Locked),
            "expired" => Some(Self::Expired),
            "inactive" => Some(Self::Inactive),
            _ => None,
        }
    }
}

/// Listing/detail projection: account joined to its (non-deleted) role.
#[derive(Debug, Clone, FromRow)]
pub struct AccountRow {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub status: String,
    pub role_id: i64,
    pub role_name: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full account record including the credential digest. Never serialized.
#[derive(Debug, Clone, FromRow)]
pub struct AccountRecord {
    pub id: i64,
    pub email: String,
    pub password_digest: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub status: String,
    pub role_id: i64,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct AccountDto {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub status: String,
    pub role_id: i64,
    /// Display name of the account's role; null when the role row is gone.
    pub role_name: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AccountRow> for AccountDto {
    fn from(row: AccountRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            full_name: row.full_name,
            phone: row.phone,
            status: row.status,
            role_id: row.role_id,
            role_name: row.role_name,
            avatar_url: row.avatar_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct CreateAccountDto {
    #[validate(email(message = "Email must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "FullName must not be empty"))]
    pub full_name: String,
    pub phone: Option<String>,
    pub role_id: i64,
    pub avatar_url: Option<String>,
    pub status: Option<AccountStatus>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateAccountDto {
    #[validate(email(message = "Email must be a valid email address"))]
    pub email: Option<String>,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: Option<String>,
    #[validate(length(min = 1, message = "FullName must not be empty"))]
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub role_id: Option<i64>,
    pub avatar_url: Option<String>,
    pub status: Option<AccountStatus>,
}

/// Login body. Both fields are optional on purpose: a missing field is a
/// rejected attempt, not a malformed request, so the response stays the
/// same 401 every other rejection produces.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct ChangePasswordDto {
    #[validate(length(min = 1, message = "CurrentPassword must not be empty"))]
    pub current_password: String,
    #[validate(length(min = 6, message = "NewPassword must be at least 6 characters"))]
    pub new_password: String,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "PascalCase")]
pub struct AccountFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub keyword: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedAccountsResponse {
    #[serde(rename = "Account")]
    pub accounts: Vec<AccountDto>,
    #[serde(flatten)]
    pub meta: PageMeta,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteResponse {
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            AccountStatus::Pending,
            AccountStatus::Active,
            AccountStatus::Suspended,
            AccountStatus::Locked,
            AccountStatus::Expired,
            AccountStatus::Inactive,
        ] {
            assert_eq!(AccountStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(AccountStatus::parse("ACTIVE"), Some(AccountStatus::Active));
        assert_eq!(AccountStatus::parse("unknown"), None);
    }

    #[test]
    fn account_dto_serializes_pascal_case() {
        let dto = AccountDto {
            id: 7,
            email: "a@b.c".to_string(),
            full_name: "Alice".to_string(),
            phone: None,
            status: "active".to_string(),
            role_id: 1,
            role_name: Some("Administrator".to_string()),
            avatar_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let serialized = serde_json::to_string(&dto).unwrap();
        assert!(serialized.contains(r#""Id":7"#));
        assert!(serialized.contains(r#""FullName":"Alice""#));
        assert!(serialized.contains(r#""RoleName":"Administrator""#));
    }

    #[test]
    fn create_dto_accepts_pascal_case_body() {
        let json = r#"{"Email":"a@b.c","Password":"secret1","FullName":"Alice","RoleId":2}"#;
        let dto: CreateAccountDto = serde_json::from_str(json).unwrap();
        assert_eq!(dto.email, "a@b.c");
        assert_eq!(dto.role_id, 2);
        assert!(dto.status.is_none());
    }

    #[test]
    fn paginated_response_uses_entity_named_list_field() {
        use crate::utils::pagination::{PageMeta, PageWindow};

        let response = PaginatedAccountsResponse {
            accounts: vec![],
            meta: PageMeta::new(0, &PageWindow { page: 1, page_size: 10 }),
        };
        let serialized = serde_json::to_string(&response).unwrap();
        assert!(serialized.contains(r#""Account":[]"#));
        assert!(serialized.contains(r#""TotalCount":0"#));
        assert!(serialized.contains(r#""TotalPages":0"#));
    }
}
