use serde::{Deserialize, Serialize};
use sqlx::any::AnyRow;
use sqlx::{AnyPool, Row};

use crate::db::Session;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub fullname: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

impl User {
    /// Find a user by email.
    pub async fn find_by_email(db: &AnyPool, email: &str) -> anyhow::Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, fullname, email, password_hash
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        row.map(Self::from_row).transpose()
    }

    pub async fn find_by_id(db: &AnyPool, id: i64) -> anyhow::Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, fullname, email, password_hash
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        row.map(Self::from_row).transpose()
    }

    /// Insert a new user inside the caller's session. The unique index on
    /// `email` is the actual duplicate guard; a violation surfaces as the
    /// storage error, untranslated.
    pub async fn create(
        session: &mut Session,
        fullname: &str,
        email: &str,
        password_hash: &str,
    ) -> anyhow::Result<User> {
        let row = sqlx::query(
            r#"
            INSERT INTO users (fullname, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, fullname, email, password_hash
            "#,
        )
        .bind(fullname)
        .bind(email)
        .bind(password_hash)
        .fetch_one(session.conn())
        .await?;
        Self::from_row(row)
    }

    fn from_row(row: AnyRow) -> anyhow::Result<User> {
        Ok(User {
            id: row.try_get("id")?,
            fullname: row.try_get("fullname")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
        })
    }
}
