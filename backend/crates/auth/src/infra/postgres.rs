//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::error::conversions::is_unique_violation;
use kernel::id::AccountId;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{Account, RoleCounts};
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{
    account_password::AccountPassword, account_role::AccountRole, email::Email,
    username::Username,
};
use crate::error::{AuthError, AuthResult};

/// PostgreSQL-backed account repository
#[derive(Clone)]
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Unique index hits become a conflict instead of a generic database error
fn map_write_error(err: sqlx::Error) -> AuthError {
    if is_unique_violation(&err) {
        AuthError::IdentityTaken
    } else {
        AuthError::Database(err)
    }
}

const ACCOUNT_COLUMNS: &str =
    "id, username, email, password_hash, role, created_at, updated_at";

impl AccountRepository for PgAccountRepository {
    async fn create(&self, account: &Account) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO accounts (
                id,
                username,
                email,
                password_hash,
                role,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(account.id.as_uuid())
        .bind(account.username.as_str())
        .bind(account.email.as_str())
        .bind(account.password.as_phc_string())
        .bind(account.role.code())
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(())
    }

    async fn find_by_id(&self, id: AccountId) -> AuthResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(AccountRow::into_account).transpose()
    }

    async fn find_by_login(&self, identifier: &str) -> AuthResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE username = $1 OR email = lower($1) LIMIT 1"
        ))
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await?;

        row.map(AccountRow::into_account).transpose()
    }

    async fn find_many(&self, ids: &[AccountId]) -> AuthResult<Vec<Account>> {
        let ids: Vec<Uuid> = ids.iter().map(|id| id.into_uuid()).collect();
        let rows = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = ANY($1)"
        ))
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(AccountRow::into_account).collect()
    }

    async fn username_taken(
        &self,
        username: &Username,
        except: Option<AccountId>,
    ) -> AuthResult<bool> {
        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM accounts WHERE username = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(username.as_str())
        .bind(except.map(AccountId::into_uuid))
        .fetch_one(&self.pool)
        .await?;

        Ok(taken)
    }

    async fn email_taken(&self, email: &Email, except: Option<AccountId>) -> AuthResult<bool> {
        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM accounts WHERE email = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(email.as_str())
        .bind(except.map(AccountId::into_uuid))
        .fetch_one(&self.pool)
        .await?;

        Ok(taken)
    }

    async fn update(&self, account: &Account) -> AuthResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE accounts SET
                username = $2,
                email = $3,
                password_hash = $4,
                role = $5,
                updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(account.id.as_uuid())
        .bind(account.username.as_str())
        .bind(account.email.as_str())
        .bind(account.password.as_phc_string())
        .bind(account.role.code())
        .bind(account.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        if result.rows_affected() == 0 {
            return Err(AuthError::UserNotFound);
        }
        Ok(())
    }

    async fn delete(&self, id: AccountId) -> AuthResult<bool> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_staff(&self) -> AuthResult<Vec<Account>> {
        // 'admin' sorts before 'owner'
        let rows = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE role IN ('admin', 'owner') ORDER BY role ASC, created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(AccountRow::into_account).collect()
    }

    async fn count_by_role(&self) -> AuthResult<RoleCounts> {
        let rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT role, COUNT(*) FROM accounts GROUP BY role")
                .fetch_all(&self.pool)
                .await?;

        let mut counts = RoleCounts::default();
        for (role, count) in rows {
            match AccountRole::from_code(&role) {
                Some(AccountRole::User) => counts.users = count,
                Some(AccountRole::Admin) => counts.admins = count,
                Some(AccountRole::Owner) => counts.owners = count,
                None => tracing::warn!(role = %role, "Unknown role in accounts table"),
            }
        }
        Ok(counts)
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AccountRow {
    fn into_account(self) -> AuthResult<Account> {
        let role = AccountRole::from_code(&self.role)
            .ok_or_else(|| AuthError::Internal(format!("Invalid role: {}", self.role)))?;

        Ok(Account {
            id: AccountId::from_uuid(self.id),
            username: Username::from_db(self.username),
            email: Email::from_db(self.email),
            password: AccountPassword::from_db(self.password_hash)?,
            role,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
