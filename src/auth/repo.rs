use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: Option<String>,
    pub created_at: OffsetDateTime,
    pub is_active: bool,
}

#[derive(Debug, Error)]
pub enum CreateUserError {
    /// The `users.email` unique constraint fired. The handler-level
    /// existence pre-check can always lose a race with a concurrent
    /// registration, so this is the authoritative signal.
    #[error("email already registered")]
    DuplicateEmail,
    #[error(transparent)]
    Database(sqlx::Error),
}

impl User {
    /// Look up a user by email. Exact match: emails are stored and
    /// compared verbatim, no case folding.
    pub async fn find_by_email(db: &PgPool, email: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, name, created_at, is_active
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, name, created_at, is_active
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    /// Insert a new user. The database generates `id` and `created_at`;
    /// `is_active` defaults true.
    pub async fn create(
        db: &PgPool,
        email: &str,
        password_hash: &str,
        name: Option<&str>,
    ) -> Result<User, CreateUserError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, name)
            VALUES ($1, $2, $3)
            RETURNING id, email, password_hash, name, created_at, is_active
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(name)
        .fetch_one(db)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                CreateUserError::DuplicateEmail
            }
            _ => CreateUserError::Database(e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_never_serializes() {
        let user = User {
            id: Uuid::new_v4(),
            email: "a@x.com".into(),
            password_hash: "$argon2id$secret".into(),
            name: Some("Ana".into()),
            created_at: OffsetDateTime::now_utc(),
            is_active: true,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("argon2id"));
        assert!(json.contains("a@x.com"));
    }
}
