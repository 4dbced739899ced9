use serde::{Deserialize, Serialize};
use sqlx::any::AnyRow;
use sqlx::{AnyPool, Row};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::db::Session;

/// Snapshot of one planning request and its computed result, immutable
/// once stored: no update or delete exists in this module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialPlan {
    pub id: i64,
    pub income: f64,
    pub expenses: f64,
    pub savings: f64,
    pub risk_tolerance: String,
    pub ai_summary: Option<String>,
    /// Serialized by the caller, stored opaque, never parsed here.
    pub recommendations_json: Option<String>,
    pub portfolio_json: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Nullable: a row written around the API keeps working without an owner.
    pub owner_id: Option<i64>,
}

/// Insert payload for one plan row.
#[derive(Debug)]
pub struct NewFinancialPlan<'a> {
    pub income: f64,
    pub expenses: f64,
    pub savings: f64,
    pub risk_tolerance: &'a str,
    pub ai_summary: Option<&'a str>,
    pub recommendations_json: Option<&'a str>,
    pub portfolio_json: Option<&'a str>,
    pub owner_id: Option<i64>,
}

/// Insert inside the caller's session. `created_at` defaults to now (UTC)
/// here, not in the database.
pub async fn insert(
    session: &mut Session,
    plan: NewFinancialPlan<'_>,
) -> anyhow::Result<FinancialPlan> {
    let created_at = OffsetDateTime::now_utc().format(&Rfc3339)?;
    let row = sqlx::query(
        r#"
        INSERT INTO financial_plans
            (income, expenses, savings, risk_tolerance,
             ai_summary, recommendations_json, portfolio_json,
             created_at, owner_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING id, income, expenses, savings, risk_tolerance,
                  ai_summary, recommendations_json, portfolio_json,
                  created_at, owner_id
        "#,
    )
    .bind(plan.income)
    .bind(plan.expenses)
    .bind(plan.savings)
    .bind(plan.risk_tolerance)
    .bind(plan.ai_summary)
    .bind(plan.recommendations_json)
    .bind(plan.portfolio_json)
    .bind(created_at)
    .bind(plan.owner_id)
    .fetch_one(session.conn())
    .await?;
    from_row(row)
}

/// Explicit owner → plans accessor, newest first.
pub async fn list_by_owner(
    db: &AnyPool,
    owner_id: i64,
    limit: i64,
    offset: i64,
) -> anyhow::Result<Vec<FinancialPlan>> {
    let rows = sqlx::query(
        r#"
        SELECT id, income, expenses, savings, risk_tolerance,
               ai_summary, recommendations_json, portfolio_json,
               created_at, owner_id
        FROM financial_plans
        WHERE owner_id = $1
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(owner_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;
    rows.into_iter().map(from_row).collect()
}

/// One plan of the given owner's.
pub async fn find_owned(
    db: &AnyPool,
    owner_id: i64,
    id: i64,
) -> anyhow::Result<Option<FinancialPlan>> {
    let row = sqlx::query(
        r#"
        SELECT id, income, expenses, savings, risk_tolerance,
               ai_summary, recommendations_json, portfolio_json,
               created_at, owner_id
        FROM financial_plans
        WHERE id = $1 AND owner_id = $2
        "#,
    )
    .bind(id)
    .bind(owner_id)
    .fetch_optional(db)
    .await?;
    row.map(from_row).transpose()
}

/// Direct lookup regardless of ownership (unowned rows included).
pub async fn find_by_id(db: &AnyPool, id: i64) -> anyhow::Result<Option<FinancialPlan>> {
    let row = sqlx::query(
        r#"
        SELECT id, income, expenses, savings, risk_tolerance,
               ai_summary, recommendations_json, portfolio_json,
               created_at, owner_id
        FROM financial_plans
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    row.map(from_row).transpose()
}

fn from_row(row: AnyRow) -> anyhow::Result<FinancialPlan> {
    let created_at_raw: String = row.try_get("created_at")?;
    let created_at = OffsetDateTime::parse(&created_at_raw, &Rfc3339)
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
    Ok(FinancialPlan {
        id: row.try_get("id")?,
        income: row.try_get("income")?,
        expenses: row.try_get("expenses")?,
        savings: row.try_get("savings")?,
        risk_tolerance: row.try_get("risk_tolerance")?,
        ai_summary: row.try_get("ai_summary")?,
        recommendations_json: row.try_get("recommendations_json")?,
        portfolio_json: row.try_get("portfolio_json")?,
        created_at,
        owner_id: row.try_get("owner_id")?,
    })
}
