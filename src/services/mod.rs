pub mod auth_service;
pub mod cart_service;
pub mod catalog;
pub mod dashboard_service;
pub mod item_service;
pub mod merchant_service;
pub mod message_service;
pub mod order_service;
pub mod owner_service;
pub mod search_service;
pub mod stock_service;
