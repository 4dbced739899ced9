use serde::Deserialize;

/// Fallback target when `DATABASE_URL` is unset: a local SQLite file next
/// to the process, good enough for development and tests.
pub const DEFAULT_DATABASE_URL: &str = "sqlite:///./intellectmoney.db";

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = resolve_database_url(std::env::var("DATABASE_URL").ok());
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "intellectmoney".into()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "intellectmoney-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
            refresh_ttl_minutes: std::env::var("JWT_REFRESH_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24 * 14),
        };
        Ok(Self { database_url, jwt })
    }
}

/// Normalizes the configured connection target.
///
/// Render hands out `postgres://` URLs while the driver side standardizes on
/// `postgresql://`; only the leading scheme is rewritten, anything after it
/// is left alone. Unset input falls back to [`DEFAULT_DATABASE_URL`].
pub fn resolve_database_url(raw: Option<String>) -> String {
    let url = raw.unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
    if url.starts_with("postgres://") {
        url.replacen("postgres://", "postgresql://", 1)
    } else {
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_deprecated_postgres_scheme() {
        let resolved = resolve_database_url(Some("postgres://u:p@host/db".into()));
        assert_eq!(resolved, "postgresql://u:p@host/db");
    }

    #[test]
    fn rewrites_only_the_leading_scheme() {
        let resolved =
            resolve_database_url(Some("postgres://u:p@host/db?mirror=postgres://other".into()));
        assert_eq!(resolved, "postgresql://u:p@host/db?mirror=postgres://other");
    }

    #[test]
    fn canonical_scheme_passes_through() {
        let url = "postgresql://u:p@host/db";
        assert_eq!(resolve_database_url(Some(url.into())), url);
    }

    #[test]
    fn sqlite_passes_through() {
        let url = "sqlite:///./x.db";
        assert_eq!(resolve_database_url(Some(url.into())), url);
    }

    #[test]
    fn unset_falls_back_to_local_file() {
        assert_eq!(resolve_database_url(None), "sqlite:///./intellectmoney.db");
    }
}
