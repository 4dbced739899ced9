use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Request body for storing a completed planning run. The numeric inputs
/// and risk tolerance are what the user submitted; summary,
/// recommendations and portfolio are whatever the planning computation
/// produced.
#[derive(Debug, Deserialize)]
pub struct CreatePlanRequest {
    pub income: f64,
    pub expenses: f64,
    pub savings: f64,
    pub risk_tolerance: String,
    pub ai_summary: Option<String>,
    pub recommendations: Option<serde_json::Value>,
    pub portfolio: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct CreatedPlanResponse {
    pub id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Serialize)]
pub struct PlanListItem {
    pub id: i64,
    pub income: f64,
    pub expenses: f64,
    pub savings: f64,
    pub risk_tolerance: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Serialize)]
pub struct PlanDetails {
    pub id: i64,
    pub income: f64,
    pub expenses: f64,
    pub savings: f64,
    pub risk_tolerance: String,
    pub ai_summary: Option<String>,
    pub recommendations: Option<serde_json::Value>,
    pub portfolio: Option<serde_json::Value>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}
fn default_limit() -> i64 {
    20
}
