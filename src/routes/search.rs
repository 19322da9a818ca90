use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::{
    dto::search::{SearchQuery, SearchResultList},
    error::AppResult,
    response::ApiResponse,
    services::search_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/product/search", get(search_products))
}

#[utoipa::path(
    get,
    path = "/api/product/search",
    params(
        ("name" = Option<String>, Query, description = "Substring match on item name"),
        ("category" = Option<String>, Query, description = "Merchant category"),
        ("sortBy" = Option<String>, Query, description = "termurah or termahal")
    ),
    responses(
        (status = 200, description = "Search sellable products", body = ApiResponse<SearchResultList>)
    ),
    tag = "Search"
)]
pub async fn search_products(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<ApiResponse<SearchResultList>>> {
    let resp = search_service::search_products(&state, query).await?;
    Ok(Json(resp))
}
