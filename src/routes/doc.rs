use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{Claims, LoginRequest, LoginResponse, RegisterRequest},
        cart::{AddToCartRequest, CartEntryView, CartList, UpdateCartRequest},
        dashboard::{DashboardSummary, TopProduct},
        items::{ItemList, ItemListQuery},
        merchants::{MerchantList, MerchantListQuery},
        messages::{MessageList, MessageSender, MessageView, SendMessageRequest},
        orders::{OrderList, UpdateOrderStatusRequest},
        owner::{BuyerSummary, MerchantSummary, OwnerOrderList, OwnerOrderView},
        search::{SearchResult, SearchResultList},
        stock::{SetStockRequest, StockList, StockView},
    },
    models::{CartEntry, Item, Merchant, Message, Order, OrderStatus, Stock, User},
    response::{ApiResponse, Meta},
    routes::{
        auth, cart, dashboard, health, items, merchants, messages, orders, owner, search, stock,
    },
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::profile,
        merchants::create_merchant,
        merchants::list_merchants,
        items::create_item,
        items::update_item,
        items::delete_item,
        items::list_items,
        stock::set_stock,
        stock::list_stock,
        search::search_products,
        cart::cart_list,
        cart::add_to_cart,
        cart::update_cart_entry,
        cart::remove_cart_entry,
        orders::place_order,
        orders::list_my_orders,
        orders::list_merchant_orders,
        orders::update_order_status,
        dashboard::merchant_dashboard,
        messages::send_message,
        messages::merchant_messages,
        owner::list_all_orders,
        owner::override_order_status
    ),
    components(
        schemas(
            User,
            Merchant,
            Item,
            Stock,
            CartEntry,
            Order,
            Message,
            OrderStatus,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            Claims,
            MerchantListQuery,
            MerchantList,
            ItemListQuery,
            ItemList,
            SetStockRequest,
            StockView,
            StockList,
            SearchResult,
            SearchResultList,
            AddToCartRequest,
            UpdateCartRequest,
            CartEntryView,
            CartList,
            UpdateOrderStatusRequest,
            OrderList,
            DashboardSummary,
            TopProduct,
            SendMessageRequest,
            MessageSender,
            MessageView,
            MessageList,
            MerchantSummary,
            BuyerSummary,
            OwnerOrderView,
            OwnerOrderList,
            Meta,
            ApiResponse<User>,
            ApiResponse<Merchant>,
            ApiResponse<Order>,
            ApiResponse<OrderList>,
            ApiResponse<SearchResultList>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Registration, login and profile"),
        (name = "Merchants", description = "Merchant (store) endpoints"),
        (name = "Items", description = "Item endpoints"),
        (name = "Stock", description = "Stock ledger endpoints"),
        (name = "Search", description = "Product search"),
        (name = "Cart", description = "Cart endpoints"),
        (name = "Orders", description = "Ordering and status updates"),
        (name = "Dashboard", description = "Seller dashboard"),
        (name = "Messages", description = "Buyer-to-merchant messages"),
        (name = "Owner", description = "Platform owner endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
