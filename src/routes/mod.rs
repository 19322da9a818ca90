use axum::Router;
use axum::extract::multipart::MultipartError;

use crate::{error::AppError, state::AppState};

pub mod auth;
pub mod cart;
pub mod dashboard;
pub mod doc;
pub mod health;
pub mod items;
pub mod merchants;
pub mod messages;
pub mod orders;
pub mod owner;
pub mod search;
pub mod stock;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(merchants::router())
        .merge(items::router())
        .merge(stock::router())
        .merge(search::router())
        .merge(cart::router())
        .merge(orders::router())
        .merge(dashboard::router())
        .merge(messages::router())
        .merge(owner::router())
}

pub(crate) fn multipart_error(_: MultipartError) -> AppError {
    AppError::Validation("Form data tidak valid".into())
}
