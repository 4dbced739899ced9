use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument};

use crate::{auth::jwt::AuthUser, plans::repo, state::AppState};

use super::dto::{CreatePlanRequest, CreatedPlanResponse, Pagination, PlanDetails, PlanListItem};
use super::repo::NewFinancialPlan;

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/plans", get(list_plans))
        .route("/plans/:id", get(get_plan))
}

pub fn write_routes() -> Router<AppState> {
    Router::new().route("/plans", post(create_plan))
}

/// POST /plans: store one completed planning run for the caller.
#[instrument(skip(state, body))]
pub async fn create_plan(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<CreatePlanRequest>,
) -> Result<(StatusCode, HeaderMap, Json<CreatedPlanResponse>), (StatusCode, String)> {
    let recommendations_json = body
        .recommendations
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(internal)?;
    let portfolio_json = body
        .portfolio
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(internal)?;

    let mut session = state.db.session().await.map_err(internal)?;
    let plan = repo::insert(
        &mut session,
        NewFinancialPlan {
            income: body.income,
            expenses: body.expenses,
            savings: body.savings,
            risk_tolerance: &body.risk_tolerance,
            ai_summary: body.ai_summary.as_deref(),
            recommendations_json: recommendations_json.as_deref(),
            portfolio_json: portfolio_json.as_deref(),
            owner_id: Some(user_id),
        },
    )
    .await
    .map_err(internal)?;
    session.commit().await.map_err(internal)?;

    info!(plan_id = %plan.id, %user_id, "plan stored");

    let mut headers = HeaderMap::new();
    headers.insert(
        axum::http::header::LOCATION,
        format!("/plans/{}", plan.id).parse().unwrap(),
    );

    Ok((
        StatusCode::CREATED,
        headers,
        Json(CreatedPlanResponse {
            id: plan.id,
            created_at: plan.created_at,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn list_plans(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<PlanListItem>>, (StatusCode, String)> {
    let plans = repo::list_by_owner(state.db.pool(), user_id, p.limit, p.offset)
        .await
        .map_err(internal)?;
    let items = plans
        .into_iter()
        .map(|plan| PlanListItem {
            id: plan.id,
            income: plan.income,
            expenses: plan.expenses,
            savings: plan.savings,
            risk_tolerance: plan.risk_tolerance,
            created_at: plan.created_at,
        })
        .collect();
    Ok(Json(items))
}

#[instrument(skip(state))]
pub async fn get_plan(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<PlanDetails>, (StatusCode, String)> {
    let plan = match repo::find_owned(state.db.pool(), user_id, id).await {
        Ok(Some(p)) => p,
        Ok(None) => return Err((StatusCode::NOT_FOUND, "Plan not found".into())),
        Err(e) => {
            error!(error = %e, %user_id, %id, "get_plan failed");
            return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };

    // Stored opaque; a row that carries junk JSON surfaces the parse error
    let recommendations = plan
        .recommendations_json
        .as_deref()
        .map(serde_json::from_str)
        .transpose()
        .map_err(internal)?;
    let portfolio = plan
        .portfolio_json
        .as_deref()
        .map(serde_json::from_str)
        .transpose()
        .map_err(internal)?;

    Ok(Json(PlanDetails {
        id: plan.id,
        income: plan.income,
        expenses: plan.expenses,
        savings: plan.savings,
        risk_tolerance: plan.risk_tolerance,
        ai_summary: plan.ai_summary,
        recommendations,
        portfolio,
        created_at: plan.created_at,
    }))
}

fn internal<E: std::fmt::Display>(e: E) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
