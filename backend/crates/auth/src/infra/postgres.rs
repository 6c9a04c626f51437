//! PostgreSQL Repository Implementation

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::identity::Identity;
use crate::domain::repository::IdentityRepository;
use crate::domain::value_object::{
    email::Email, identity_id::IdentityId, password::StoredPassword, provider::Provider,
};
use crate::error::{AuthError, AuthResult};
use kernel::page::{Page, Paged};

const IDENTITY_COLUMNS: &str = r#"
    identity_id,
    first_name,
    last_name,
    email,
    password_hash,
    google_id,
    twitter_id,
    thumbnail,
    thumbnail_object_id,
    location,
    reset_otp,
    reset_otp_expires_at,
    reset_verified,
    created_at,
    updated_at
"#;

/// PostgreSQL-backed identity repository
#[derive(Clone)]
pub struct PgIdentityRepository {
    pool: PgPool,
}

impl PgIdentityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl IdentityRepository for PgIdentityRepository {
    async fn create(&self, identity: &Identity) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO identities (
                identity_id,
                first_name,
                last_name,
                email,
                password_hash,
                google_id,
                twitter_id,
                thumbnail,
                thumbnail_object_id,
                location,
                reset_otp,
                reset_otp_expires_at,
                reset_verified,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(identity.identity_id.as_uuid())
        .bind(&identity.first_name)
        .bind(&identity.last_name)
        .bind(identity.email.as_str())
        .bind(identity.password.as_ref().map(|p| p.as_phc_string()))
        .bind(&identity.google_id)
        .bind(&identity.twitter_id)
        .bind(&identity.thumbnail)
        .bind(&identity.thumbnail_object_id)
        .bind(&identity.location)
        .bind(&identity.reset_otp)
        .bind(identity.reset_otp_expires_at)
        .bind(identity.reset_verified)
        .bind(identity.created_at)
        .bind(identity.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(())
    }

    async fn find_by_id(&self, identity_id: &IdentityId) -> AuthResult<Option<Identity>> {
        let row = sqlx::query_as::<_, IdentityRow>(&format!(
            "SELECT {IDENTITY_COLUMNS} FROM identities WHERE identity_id = $1"
        ))
        .bind(identity_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_identity()).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Identity>> {
        let row = sqlx::query_as::<_, IdentityRow>(&format!(
            "SELECT {IDENTITY_COLUMNS} FROM identities WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_identity()).transpose()
    }

    async fn find_by_provider_id(
        &self,
        provider: Provider,
        provider_user_id: &str,
    ) -> AuthResult<Option<Identity>> {
        let column = match provider {
            Provider::Google => "google_id",
            Provider::Twitter => "twitter_id",
        };

        let row = sqlx::query_as::<_, IdentityRow>(&format!(
            "SELECT {IDENTITY_COLUMNS} FROM identities WHERE {column} = $1"
        ))
        .bind(provider_user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_identity()).transpose()
    }

    async fn search_by_name(&self, name: &str, page: Page) -> AuthResult<Paged<Identity>> {
        let pattern = format!("%{}%", escape_like(name));

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM identities WHERE first_name ILIKE $1 OR last_name ILIKE $1",
        )
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, IdentityRow>(&format!(
            r#"
            SELECT {IDENTITY_COLUMNS} FROM identities
            WHERE first_name ILIKE $1 OR last_name ILIKE $1
            ORDER BY created_at
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(&pattern)
        .bind(i64::from(page.limit))
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await?;

        let items = rows
            .into_iter()
            .map(|r| r.into_identity())
            .collect::<AuthResult<Vec<_>>>()?;

        Ok(Paged {
            items,
            page,
            total: total as u64,
        })
    }

    async fn update(&self, identity: &Identity) -> AuthResult<()> {
        sqlx::query(
            r#"
            UPDATE identities SET
                first_name = $2,
                last_name = $3,
                email = $4,
                password_hash = $5,
                google_id = $6,
                twitter_id = $7,
                thumbnail = $8,
                thumbnail_object_id = $9,
                location = $10,
                reset_otp = $11,
                reset_otp_expires_at = $12,
                reset_verified = $13,
                updated_at = $14
            WHERE identity_id = $1
            "#,
        )
        .bind(identity.identity_id.as_uuid())
        .bind(&identity.first_name)
        .bind(&identity.last_name)
        .bind(identity.email.as_str())
        .bind(identity.password.as_ref().map(|p| p.as_phc_string()))
        .bind(&identity.google_id)
        .bind(&identity.twitter_id)
        .bind(&identity.thumbnail)
        .bind(&identity.thumbnail_object_id)
        .bind(&identity.location)
        .bind(&identity.reset_otp)
        .bind(identity.reset_otp_expires_at)
        .bind(identity.reset_verified)
        .bind(identity.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(())
    }

    async fn delete(&self, identity_id: &IdentityId) -> AuthResult<()> {
        sqlx::query("DELETE FROM identities WHERE identity_id = $1")
            .bind(identity_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

/// Unique-index violations on email surface as the register-time conflict.
fn map_unique_violation(e: sqlx::Error) -> AuthError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.code().as_deref() == Some("23505") {
            return AuthError::EmailTaken;
        }
    }
    AuthError::Database(e)
}

/// Escape LIKE metacharacters so user input matches literally.
fn escape_like(input: &str) -> String {
    input.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

#[derive(sqlx::FromRow)]
struct IdentityRow {
    identity_id: Uuid,
    first_name: String,
    last_name: String,
    email: String,
    password_hash: Option<String>,
    google_id: Option<String>,
    twitter_id: Option<String>,
    thumbnail: Option<String>,
    thumbnail_object_id: Option<String>,
    location: Option<String>,
    reset_otp: Option<String>,
    reset_otp_expires_at: Option<DateTime<Utc>>,
    reset_verified: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl IdentityRow {
    fn into_identity(self) -> AuthResult<Identity> {
        let password = self
            .password_hash
            .map(StoredPassword::from_db)
            .transpose()
            .map_err(|_| AuthError::Internal("Invalid password digest in store".to_string()))?;

        Ok(Identity {
            identity_id: IdentityId::from(self.identity_id),
            first_name: self.first_name,
            last_name: self.last_name,
            email: Email::from_db(self.email),
            password,
            google_id: self.google_id,
            twitter_id: self.twitter_id,
            thumbnail: self.thumbnail,
            thumbnail_object_id: self.thumbnail_object_id,
            location: self.location,
            reset_otp: self.reset_otp,
            reset_otp_expires_at: self.reset_otp_expires_at,
            reset_verified: self.reset_verified,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("ada"), "ada");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
    }
}
