use anyhow::anyhow;
use sqlx::PgPool;
use tracing::{instrument, warn};

use crate::config::jwt::JwtConfig;
use crate::utils::errors::{AppError, map_unique_violation};
use crate::utils::jwt::create_access_token;
use crate::utils::listing::ListQuery;
use crate::utils::pagination::PageWindow;
use crate::utils::password::{digest_password, verify_password};

use super::model::{
    AccountDto, AccountRecord, AccountRow, AccountStatus, ChangePasswordDto, CreateAccountDto,
    LoginRequest, LoginResponse, UpdateAccountDto,
};

const ACCOUNT_COLUMNS: &str = "a.id, a.email, a.full_name, a.phone, a.status, a.role_id, \
                               r.name AS role_name, a.avatar_url, a.created_at, a.updated_at";
const ACCOUNT_FROM: &str =
    "accounts a LEFT JOIN roles r ON r.id = a.role_id AND r.is_deleted = FALSE";

pub struct AccountService;

impl AccountService {
    #[instrument(skip(db))]
    pub async fn search_accounts(
        db: &PgPool,
        keyword: Option<&str>,
        status: Option<AccountStatus>,
        window: &PageWindow,
    ) -> Result<(Vec<AccountDto>, i64), AppError> {
        let (rows, total) = ListQuery::new(ACCOUNT_FROM, ACCOUNT_COLUMNS, "a.is_deleted")
            .keyword(&["a.email", "a.full_name"], keyword)
            .equals("a.status", status.map(|s| s.as_str()))
            .order_by("a.id")
            .fetch_page::<AccountRow>(db, window)
            .await?;

        Ok((rows.into_iter().map(AccountDto::from).collect(), total))
    }

    #[instrument(skip(db))]
    pub async fn get_account(db: &PgPool, id: i64) -> Result<AccountDto, AppError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE a.id = $1 AND a.is_deleted = FALSE",
            ACCOUNT_COLUMNS, ACCOUNT_FROM
        );

        let row = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(id)
            .fetch_optional(db)
            .await
            .map_err(|e| AppError::database(anyhow::Error::from(e)))?
            .ok_or_else(|| AppError::not_found(anyhow!("Account not found")))?;

        Ok(AccountDto::from(row))
    }

    #[instrument(skip(db, dto))]
    pub async fn create_account(db: &PgPool, dto: CreateAccountDto) -> Result<AccountDto, AppError> {
        if !Self::role_exists(db, dto.role_id).await? {
            return Err(AppError::bad_request(anyhow!("Role does not exist")));
        }
        if Self::email_in_use(db, &dto.email, None).await? {
            return Err(AppError::conflict(anyhow!(
                "Account with email {} already exists",
                dto.email
            )));
        }

        let status = dto.status.unwrap_or(AccountStatus::Pending);
        let password_digest = digest_password(&dto.password);

        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO accounts (email, password_digest, full_name, phone, status, role_id, avatar_url) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING id",
        )
        .bind(&dto.email)
        .bind(&password_digest)
        .bind(&dto.full_name)
        .bind(&dto.phone)
        .bind(status.as_str())
        .bind(dto.role_id)
        .bind(&dto.avatar_url)
        .fetch_one(db)
        .await
        .map_err(|e| map_unique_violation(e, "Account with this email already exists"))?;

        Self::get_account(db, id).await
    }

    #[instrument(skip(db, dto))]
    pub async fn update_account(
        db: &PgPool,
        id: i64,
        dto: UpdateAccountDto,
    ) -> Result<AccountDto, AppError> {
        let existing = Self::load_record(db, id).await?;

        if let Some(email) = &dto.email {
            if Self::email_in_use(db, email, Some(id)).await? {
                return Err(AppError::conflict(anyhow!(
                    "Account with email {} already exists",
                    email
                )));
            }
        }
        if let Some(role_id) = dto.role_id {
            if !Self::role_exists(db, role_id).await? {
                return Err(AppError::bad_request(anyhow!("Role does not exist")));
            }
        }

        let email = dto.email.unwrap_or(existing.email);
        let full_name = dto.full_name.unwrap_or(existing.full_name);
        let phone = dto.phone.or(existing.phone);
        let status = dto
            .status
            .map(|s| s.as_str().to_string())
            .unwrap_or(existing.status);
        let role_id = dto.role_id.unwrap_or(existing.role_id);
        let avatar_url = dto.avatar_url.or(existing.avatar_url);
        let password_digest = dto
            .password
            .map(|p| digest_password(&p))
            .unwrap_or(existing.password_digest);

        sqlx::query(
            "UPDATE accounts \
             SET email = $1, password_digest = $2, full_name = $3, phone = $4, status = $5, \
                 role_id = $6, avatar_url = $7, updated_at = NOW() \
             WHERE id = $8 AND is_deleted = FALSE",
        )
        .bind(&email)
        .bind(&password_digest)
        .bind(&full_name)
        .bind(&phone)
        .bind(&status)
        .bind(role_id)
        .bind(&avatar_url)
        .bind(id)
        .execute(db)
        .await
        .map_err(|e| map_unique_violation(e, "Account with this email already exists"))?;

        Self::get_account(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_account(db: &PgPool, id: i64) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE accounts SET is_deleted = TRUE, updated_at = NOW() \
             WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(id)
        .execute(db)
        .await
        .map_err(|e| AppError::database(anyhow::Error::from(e)))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Account not found")));
        }

        Ok(())
    }

    /// Login state machine. Every rejection collapses to the same 401 so the
    /// caller cannot distinguish unknown emails from wrong passwords; the
    /// specific reason is only logged.
    #[instrument(skip(db, dto, jwt_config))]
    pub async fn login(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let email = dto.email.as_deref().unwrap_or("").trim().to_string();
        let password = dto.password.unwrap_or_default();

        if email.is_empty() || password.is_empty() {
            warn!("Login rejected: missing email or password");
            return Err(Self::rejected());
        }

        // No is_deleted filter here: deleted accounts are still looked up,
        // and the status gate below is the only thing keeping them out.
        let account = sqlx::query_as::<_, AccountRecord>(
            "SELECT id, email, password_digest, full_name, phone, status, role_id, avatar_url \
             FROM accounts WHERE LOWER(email) = LOWER($1)",
        )
        .bind(&email)
        .fetch_optional(db)
        .await
        .map_err(|e| AppError::database(anyhow::Error::from(e)))?;

        let Some(account) = account else {
            warn!(email = %email, "Login rejected: account not found");
            return Err(Self::rejected());
        };

        if account.status != AccountStatus::Active.as_str() {
            warn!(account.id = %account.id, status = %account.status, "Login rejected: account not active");
            return Err(Self::rejected());
        }

        if account.password_digest.is_empty() {
            warn!(account.id = %account.id, "Login rejected: account has no stored credential");
            return Err(Self::rejected());
        }

        if !verify_password(&password, &account.password_digest) {
            warn!(account.id = %account.id, "Login rejected: bad credentials");
            return Err(Self::rejected());
        }

        let token = create_access_token(account.id, &account.email, jwt_config)?;

        Ok(LoginResponse { token })
    }

    #[instrument(skip(db, dto))]
    pub async fn change_password(
        db: &PgPool,
        account_id: i64,
        dto: ChangePasswordDto,
    ) -> Result<(), AppError> {
        let account = Self::load_record(db, account_id).await?;

        if !verify_password(&dto.current_password, &account.password_digest) {
            return Err(AppError::unauthorized(anyhow!(
                "Current password is incorrect"
            )));
        }

        sqlx::query(
            "UPDATE accounts SET password_digest = $1, updated_at = NOW() \
             WHERE id = $2 AND is_deleted = FALSE",
        )
        .bind(digest_password(&dto.new_password))
        .bind(account_id)
        .execute(db)
        .await
        .map_err(|e| AppError::database(anyhow::Error::from(e)))?;

        Ok(())
    }

    fn rejected() -> AppError {
        AppError::unauthorized(anyhow!("Invalid email or password"))
    }

    async fn load_record(db: &PgPool, id: i64) -> Result<AccountRecord, AppError> {
        sqlx::query_as::<_, AccountRecord>(
            "SELECT id, email, password_digest, full_name, phone, status, role_id, avatar_url \
             FROM accounts WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(id)
        .fetch_optional(db)
        .await
        .map_err(|e| AppError::database(anyhow::Error::from(e)))?
        .ok_or_else(|| AppError::not_found(anyhow!("Account not found")))
    }

    async fn role_exists(db: &PgPool, role_id: i64) -> Result<bool, AppError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM roles WHERE id = $1 AND is_deleted = FALSE)",
        )
        .bind(role_id)
        .fetch_one(db)
        .await
        .map_err(|e| AppError::database(anyhow::Error::from(e)))
    }

    async fn email_in_use(
        db: &PgPool,
        email: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool, AppError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM accounts \
             WHERE LOWER(email) = LOWER($1) AND is_deleted = FALSE AND id <> $2)",
        )
        .bind(email)
        .bind(exclude_id.unwrap_or(0))
        .fetch_one(db)
        .await
        .map_err(|e| AppError::database(anyhow::Error::from(e)))
    }
}
