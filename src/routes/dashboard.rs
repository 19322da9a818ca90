use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::dashboard::{DashboardQuery, DashboardSummary},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::dashboard_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/dashboard", get(merchant_dashboard))
}

#[utoipa::path(
    get,
    path = "/api/dashboard",
    params(("merchantId" = Uuid, Query, description = "Merchant ID (required)")),
    responses(
        (status = 200, description = "Sales dashboard for a merchant", body = ApiResponse<DashboardSummary>),
        (status = 403, description = "Merchant missing or not owned by caller")
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboard"
)]
pub async fn merchant_dashboard(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<DashboardQuery>,
) -> AppResult<Json<ApiResponse<DashboardSummary>>> {
    let resp = dashboard_service::merchant_dashboard(&state, &user, query).await?;
    Ok(Json(resp))
}
