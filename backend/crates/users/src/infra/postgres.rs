//! PostgreSQL Repository Implementation

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::account::Account;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{
    account_id::AccountId, account_password::AccountPassword, email::Email, role::Role,
};
use crate::error::{UsersError, UsersResult};

const ACCOUNT_COLUMNS: &str = r#"
    account_id,
    email,
    role,
    password_hash,
    is_active,
    is_staff,
    is_superuser,
    last_login,
    date_joined
"#;

/// PostgreSQL-backed account repository
#[derive(Clone)]
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert(&self, account: &Account, on_conflict: &str) -> Result<u64, sqlx::Error> {
        let sql = format!(
            "INSERT INTO accounts ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) {}",
            ACCOUNT_COLUMNS, on_conflict
        );

        let result = sqlx::query(&sql)
            .bind(account.account_id.as_uuid())
            .bind(account.email.as_str())
            .bind(account.role.code())
            .bind(account.password.as_ref().map(|p| p.as_str()))
            .bind(account.is_active)
            .bind(account.is_staff)
            .bind(account.is_superuser)
            .bind(account.last_login)
            .bind(account.date_joined)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

impl AccountRepository for PgAccountRepository {
    async fn create(&self, account: &Account) -> UsersResult<()> {
        self.insert(account, "").await.map_err(map_insert_error)?;
        Ok(())
    }

    async fn find_by_email(&self, email: &Email) -> UsersResult<Option<Account>> {
        let sql = format!("SELECT {} FROM accounts WHERE email = $1", ACCOUNT_COLUMNS);
        let row = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| r.into_account()).transpose()
    }

    async fn get_or_create(&self, candidate: &Account) -> UsersResult<(Account, bool)> {
        let inserted = self
            .insert(candidate, "ON CONFLICT (email) DO NOTHING")
            .await?;
        if inserted == 1 {
            return Ok((candidate.clone(), true));
        }

        let existing = self.find_by_email(&candidate.email).await?.ok_or_else(|| {
            UsersError::Internal(format!(
                "Account for {} vanished after insert conflict",
                candidate.email
            ))
        })?;

        Ok((existing, false))
    }

    async fn update_password(
        &self,
        account_id: &AccountId,
        password: &AccountPassword,
    ) -> UsersResult<()> {
        sqlx::query("UPDATE accounts SET password_hash = $1 WHERE account_id = $2")
            .bind(password.as_str())
            .bind(account_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn record_login(&self, account_id: &AccountId, at: DateTime<Utc>) -> UsersResult<()> {
        sqlx::query("UPDATE accounts SET last_login = $1 WHERE account_id = $2")
            .bind(at)
            .bind(account_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

fn map_insert_error(err: sqlx::Error) -> UsersError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return UsersError::EmailTaken;
        }
    }
    UsersError::Database(err)
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct AccountRow {
    account_id: Uuid,
    email: String,
    role: String,
    password_hash: Option<String>,
    is_active: bool,
    is_staff: bool,
    is_superuser: bool,
    last_login: Option<DateTime<Utc>>,
    date_joined: DateTime<Utc>,
}

impl AccountRow {
    fn into_account(self) -> UsersResult<Account> {
        let role = Role::from_code(&self.role)
            .map_err(|e| UsersError::Internal(format!("Invalid role in database: {}", e)))?;
        let password = self
            .password_hash
            .map(AccountPassword::from_db)
            .transpose()
            .map_err(|e| UsersError::Internal(format!("Invalid password hash: {}", e)))?;

        Ok(Account {
            account_id: AccountId::from_uuid(self.account_id),
            email: Email::from_db(self.email),
            role,
            password,
            is_active: self.is_active,
            is_staff: self.is_staff,
            is_superuser: self.is_superuser,
            last_login: self.last_login,
            date_joined: self.date_joined,
        })
    }
}
