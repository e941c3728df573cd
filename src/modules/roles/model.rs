use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::utils::pagination::{PageMeta, deserialize_optional_string};

#[derive(Debug, Clone, FromRow)]
pub struct RoleRow {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct PermissionRow {
    pub id: i64,
    pub name: String,
    pub module: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct RoleDto {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<RoleRow> for RoleDto {
    fn from(row: RoleRow) -> Self {
        Self {
            id: row.id,
            code: row.code,
            name: row.name,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct PermissionDto {
    pub id: i64,
    pub name: String,
    /// Grouping label used to cluster permissions for display.
    pub module: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PermissionRow> for PermissionDto {
    fn from(row: PermissionRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            module: row.module,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Role detail including its assigned permission set.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RoleWithPermissions {
    #[serde(flatten)]
    pub role: RoleDto,
    #[serde(rename = "Permissions")]
    pub permissions: Vec<PermissionDto>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct CreateRoleDto {
    #[validate(length(min = 1, max = 50, message = "Code must be between 1 and 50 characters"))]
    pub code: String,
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,
    #[validate(length(max = 500, message = "Description must not exceed 500 characters"))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateRoleDto {
    #[validate(length(min = 1, max = 50, message = "Code must be between 1 and 50 characters"))]
    pub code: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 500, message = "Description must not exceed 500 characters"))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct CreatePermissionDto {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 50, message = "Module must be between 1 and 50 characters"))]
    pub module: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct UpdatePermissionDto {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 50, message = "Module must be between 1 and 50 characters"))]
    pub module: Option<String>,
}

/// Body for replacing a role's permission set.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct AssignPermissionsDto {
    pub permission_ids: Vec<i64>,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "PascalCase")]
pub struct RoleFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub keyword: Option<String>,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "PascalCase")]
pub struct PermissionFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub keyword: Option<String>,
    /// Restrict to one module grouping.
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub module: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedRolesResponse {
    #[serde(rename = "Role")]
    pub roles: Vec<RoleDto>,
    #[serde(flatten)]
    pub meta: PageMeta,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedPermissionsResponse {
    #[serde(rename = "Permission")]
    pub permissions: Vec<PermissionDto>,
    #[serde(flatten)]
    pub meta: PageMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_with_permissions_flattens_role_fields() {
        let now = Utc::now();
        let detail = RoleWithPermissions {
            role: RoleDto {
                id: 5,
                code: "admin".to_string(),
                name: "Administrator".to_string(),
                description: None,
                created_at: now,
                updated_at: now,
            },
            permissions: vec![PermissionDto {
                id: 1,
                name: "accounts.read".to_string(),
                module: "accounts".to_string(),
                created_at: now,
                updated_at: now,
            }],
        };
        let serialized = serde_json::to_string(&detail).unwrap();
        assert!(serialized.contains(r#""Code":"admin""#));
        assert!(serialized.contains(r#""Permissions":[{"#));
        assert!(serialized.contains(r#""Module":"accounts""#));
    }

    #[test]
    fn assign_dto_accepts_pascal_case_ids() {
        let dto: AssignPermissionsDto =
            serde_json::from_str(r#"{"PermissionIds":[1,2,3]}"#).unwrap();
        assert_eq!(dto.permission_ids, vec![1, 2, 3]);
    }
}
