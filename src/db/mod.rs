//! Persistence core: connection-target handling, the shared pool, the
//! scoped [`Session`] and the idempotent schema initializer.
//!
//! Layout:
//! - `schema.rs`: bundled DDL per backend
//! - `session.rs`: explicit-commit unit of work

use std::time::Duration;

use sqlx::any::{install_default_drivers, AnyPoolOptions};
use sqlx::AnyPool;
use thiserror::Error;
use tracing::info;

pub mod schema;
mod session;

pub use session::Session;

/// A pooled connection is discarded and replaced once it reaches this age,
/// staying ahead of server-side idle-connection termination.
const POOL_RECYCLE: Duration = Duration::from_secs(300);

const MAX_CONNECTIONS: u32 = 10;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("unsupported database scheme in `{0}`")]
    UnsupportedScheme(String),

    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

/// Which driver the resolved target selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbKind {
    Postgres,
    Sqlite,
}

pub fn kind_of(database_url: &str) -> Result<DbKind, DbError> {
    if database_url.starts_with("postgresql://") || database_url.starts_with("postgres://") {
        Ok(DbKind::Postgres)
    } else if database_url.starts_with("sqlite:") {
        Ok(DbKind::Sqlite)
    } else {
        Err(DbError::UnsupportedScheme(database_url.to_string()))
    }
}

/// Process-lifetime persistence handle: one pool shared by every request
/// handler via `AppState`. Raw connections are never handed out except
/// through the pool, which arbitrates all concurrent access.
#[derive(Clone)]
pub struct Db {
    pool: AnyPool,
    kind: DbKind,
}

impl Db {
    /// Builds the pool for the resolved target with the fixed policy:
    /// liveness-checked before every acquire, recycled after
    /// [`POOL_RECYCLE`].
    pub async fn connect(database_url: &str) -> Result<Self, DbError> {
        install_default_drivers();
        let kind = kind_of(database_url)?;
        let pool = AnyPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .test_before_acquire(true)
            .max_lifetime(POOL_RECYCLE)
            .connect(&connect_target(database_url)?)
            .await?;
        info!(kind = ?kind, "database pool ready");
        Ok(Self { pool, kind })
    }

    /// Lazy pool for unit tests that construct state without touching a
    /// real database.
    pub fn connect_lazy(database_url: &str) -> Result<Self, DbError> {
        install_default_drivers();
        let kind = kind_of(database_url)?;
        let pool = AnyPoolOptions::new()
            .max_connections(1)
            .connect_lazy(&connect_target(database_url)?)?;
        Ok(Self { pool, kind })
    }

    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    pub fn kind(&self) -> DbKind {
        self.kind
    }

    /// Opens one unit of work. Writes require [`Session::commit`]; every
    /// other exit path rolls back.
    pub async fn session(&self) -> Result<Session, DbError> {
        Ok(Session::new(self.pool.begin().await?))
    }

    /// Ensures both tables and their indexes exist; a no-op for structures
    /// that are already present. Reapplying never alters existing data.
    pub async fn create_all(&self) -> Result<(), DbError> {
        let ddl = match self.kind {
            DbKind::Postgres => schema::PG_INIT,
            DbKind::Sqlite => schema::SQLITE_INIT,
        };
        // sqlx::query runs one statement at a time
        for stmt in ddl.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }
}

/// Translates the resolved target into the string handed to the driver.
pub fn connect_target(database_url: &str) -> Result<String, DbError> {
    match kind_of(database_url)? {
        DbKind::Postgres => Ok(database_url.to_string()),
        DbKind::Sqlite => Ok(sqlite_target(database_url)),
    }
}

/// Embedded-store accommodations.
///
/// The legacy deployment wrote relative file targets in the three-slash
/// form (`sqlite:///./plan.db`); sqlx reads that as an absolute path, so
/// the extra slash is peeled off. This is a shim for exactly that form,
/// not a general URL parser. `mode=rwc` creates the file on first open.
/// Cross-thread use of the resulting connections is safe because only the
/// pool hands them out.
fn sqlite_target(url: &str) -> String {
    if url.contains(":memory:") {
        return url.to_string();
    }
    let url = match url.strip_prefix("sqlite:///./") {
        Some(rest) => format!("sqlite://./{rest}"),
        None => url.to_string(),
    };
    if url.contains('?') {
        url
    } else {
        format!("{url}?mode=rwc")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_sqlite_target_keeps_relative_path() {
        let target = connect_target("sqlite:///./intellectmoney.db").unwrap();
        assert_eq!(target, "sqlite://./intellectmoney.db?mode=rwc");
    }

    #[test]
    fn absolute_sqlite_target_stays_absolute() {
        let target = connect_target("sqlite:///var/lib/app/plan.db").unwrap();
        assert_eq!(target, "sqlite:///var/lib/app/plan.db?mode=rwc");
    }

    #[test]
    fn sqlite_target_with_query_is_untouched() {
        let target = connect_target("sqlite://./x.db?mode=ro").unwrap();
        assert_eq!(target, "sqlite://./x.db?mode=ro");
    }

    #[test]
    fn memory_target_is_untouched() {
        let target = connect_target("sqlite::memory:").unwrap();
        assert_eq!(target, "sqlite::memory:");
    }

    #[test]
    fn postgres_target_is_identity() {
        let url = "postgresql://u:p@host:5432/db";
        assert_eq!(connect_target(url).unwrap(), url);
    }

    #[test]
    fn unknown_scheme_is_rejected() {
        let err = connect_target("mysql://localhost/db").unwrap_err();
        assert!(matches!(err, DbError::UnsupportedScheme(_)));
    }

    #[test]
    fn kind_detection() {
        assert_eq!(kind_of("postgres://h/db").unwrap(), DbKind::Postgres);
        assert_eq!(kind_of("postgresql://h/db").unwrap(), DbKind::Postgres);
        assert_eq!(kind_of("sqlite:///./x.db").unwrap(), DbKind::Sqlite);
        assert!(kind_of("file:///x.db").is_err());
    }
}
