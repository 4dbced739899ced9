//! Bundled DDL for both supported backends.
//!
//! Statements are exclusively `CREATE ... IF NOT EXISTS`, so reapplying on
//! an initialized store changes nothing. There is no migration machinery;
//! schema drift across versions is out of scope.
//!
//! `created_at` is RFC3339 TEXT on both backends: the runtime-dispatched
//! driver then decodes every row identically, and the stored form sorts
//! chronologically.

pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    fullname TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_users_fullname ON users(fullname);

CREATE TABLE IF NOT EXISTS financial_plans (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    income REAL NOT NULL,
    expenses REAL NOT NULL,
    savings REAL NOT NULL,
    risk_tolerance TEXT NOT NULL,
    ai_summary TEXT NULL,
    recommendations_json TEXT NULL,
    portfolio_json TEXT NULL,
    created_at TEXT NOT NULL,
    owner_id INTEGER NULL REFERENCES users(id)
);

CREATE INDEX IF NOT EXISTS idx_financial_plans_owner_id ON financial_plans(owner_id);
"#;

pub const PG_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id BIGSERIAL PRIMARY KEY,
    fullname TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_users_fullname ON users(fullname);

CREATE TABLE IF NOT EXISTS financial_plans (
    id BIGSERIAL PRIMARY KEY,
    income DOUBLE PRECISION NOT NULL,
    expenses DOUBLE PRECISION NOT NULL,
    savings DOUBLE PRECISION NOT NULL,
    risk_tolerance TEXT NOT NULL,
    ai_summary TEXT NULL,
    recommendations_json TEXT NULL,
    portfolio_json TEXT NULL,
    created_at TEXT NOT NULL,
    owner_id BIGINT NULL REFERENCES users(id)
);

CREATE INDEX IF NOT EXISTS idx_financial_plans_owner_id ON financial_plans(owner_id);
"#;
