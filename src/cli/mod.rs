//! Bootstrap commands run from the binary's argument dispatch instead of the
//! HTTP surface.

use anyhow::{Context, Result, anyhow};
use sqlx::PgPool;

use crate::utils::password::digest_password;

/// Creates an active administrator account bound to the seeded `admin` role.
/// Fails if the email is already taken by a non-deleted account.
pub async fn create_admin(
    db: &PgPool,
    email: &str,
    password: &str,
    full_name: &str,
) -> Result<i64> {
    let role_id = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM roles WHERE code = 'admin' AND is_deleted = FALSE",
    )
    .fetch_optional(db)
    .await
    .context("Failed to look up the admin role")?
    .ok_or_else(|| anyhow!("The admin role is missing; run migrations first"))?;

    let taken = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM accounts WHERE LOWER(email) = LOWER($1) AND is_deleted = FALSE)",
    )
    .bind(email)
    .fetch_one(db)
    .await
    .context("Failed to check for an existing account")?;

    if taken {
        return Err(anyhow!("An account with email {} already exists", email));
    }

    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO accounts (email, password_digest, full_name, status, role_id) \
         VALUES ($1, $2, $3, 'active', $4) \
         RETURNING id",
    )
    .bind(email)
    .bind(digest_password(password))
    .bind(full_name)
    .bind(role_id)
    .fetch_one(db)
    .await
    .context("Failed to create the admin account")?;

    Ok(id)
}
