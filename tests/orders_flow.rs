use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use pasarku_api::{
    db::{create_orm_conn, create_pool, run_migrations},
    dto::{
        cart::AddToCartRequest,
        dashboard::DashboardQuery,
        items::{CreateItemInput, UpdateItemInput},
        merchants::CreateMerchantInput,
        messages::{MerchantMessagesQuery, SendMessageRequest},
        orders::{PlaceOrderInput, UpdateOrderStatusRequest},
        search::SearchQuery,
    },
    error::AppError,
    images::ImageStore,
    middleware::auth::AuthUser,
    models::Merchant,
    services::{
        cart_service, catalog, dashboard_service, item_service, merchant_service, message_service,
        order_service, owner_service, search_service,
    },
    state::AppState,
};
use sea_orm::{ConnectionTrait, Statement};
use uuid::Uuid;

// Integration flow over the whole marketplace: register data, place orders
// against the stock ledger, walk the status machine, and read the seller
// dashboard. Runs as one sequential test because it owns the database.
#[tokio::test]
async fn marketplace_flow() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;

    let seller = create_user(&state, "user", "siti@example.com").await?;
    let buyer = create_user(&state, "user", "budi@example.com").await?;
    let platform_owner = create_user(&state, "owner", "owner@example.com").await?;

    // Seller opens a store and lists an item with stock 5 at 10000.
    let merchant = create_merchant(&state, &seller, "Warung Bu Siti", "sayur").await?;
    let bayam = create_item(&state, &seller, merchant.id, "Bayam Segar", "10000", "5").await?;

    // Ordering the whole stock succeeds and snapshots the price.
    let placed = order_service::place_order(
        &state,
        &buyer,
        order_input(merchant.id, bayam, "5", "pickup", "cod", None),
    )
    .await?
    .data
    .unwrap();
    assert_eq!(placed.total, 50000);
    assert_eq!(placed.price, 10000);
    assert_eq!(placed.item_name, "Bayam Segar");
    assert_eq!(placed.status, "pending");
    assert_eq!(placed.address, None);

    let stock = catalog::get_stock(&state.orm, bayam).await?.unwrap();
    assert_eq!(stock.quantity, 0);

    // One more unit is an oversell.
    let err = order_service::place_order(
        &state,
        &buyer,
        order_input(merchant.id, bayam, "1", "pickup", "cod", None),
    )
    .await
    .unwrap_err();
    assert_validation(err, "Stok tidak cukup");
    let stock = catalog::get_stock(&state.orm, bayam).await?.unwrap();
    assert_eq!(stock.quantity, 0);

    // Delivery without an address fails before any stock is touched.
    let wortel = create_item(&state, &seller, merchant.id, "Wortel", "8000", "3").await?;
    let err = order_service::place_order(
        &state,
        &buyer,
        order_input(merchant.id, wortel, "2", "delivery", "cod", None),
    )
    .await
    .unwrap_err();
    assert_validation(err, "Alamat wajib untuk pengiriman delivery");
    let err = order_service::place_order(
        &state,
        &buyer,
        order_input(merchant.id, wortel, "2", "pickup", "digital", None),
    )
    .await
    .unwrap_err();
    assert_validation(err, "Bukti pembayaran wajib untuk metode digital");
    let stock = catalog::get_stock(&state.orm, wortel).await?.unwrap();
    assert_eq!(stock.quantity, 3);

    // The buyer's order list holds exactly the one placed order.
    let my_orders = order_service::list_my_orders(&state, &buyer).await?.data.unwrap();
    assert_eq!(my_orders.items.len(), 1);
    assert_eq!(my_orders.items[0].id, placed.id);

    // Status machine: pending -> shipped -> completed, then it is closed.
    let updated = order_service::update_order_status(
        &state,
        &seller,
        placed.id,
        status_request("shipped"),
    )
    .await?
    .data
    .unwrap();
    assert_eq!(updated.status, "shipped");

    let err = order_service::update_order_status(
        &state,
        &seller,
        placed.id,
        status_request("pending"),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::InvalidStatusTransition { .. }));

    let err = order_service::update_order_status(&state, &seller, placed.id, status_request("paid"))
        .await
        .unwrap_err();
    assert_validation(
        err,
        "Status tidak valid. Gunakan: pending, shipped, completed, canceled",
    );

    // A non-merchant cannot move the status at all.
    let err = order_service::update_order_status(
        &state,
        &buyer,
        placed.id,
        status_request("completed"),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    // The platform owner can, without owning the merchant.
    let err = owner_service::list_all_orders(&state, &buyer).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
    let all_orders = owner_service::list_all_orders(&state, &platform_owner)
        .await?
        .data
        .unwrap();
    assert_eq!(all_orders.items.len(), 1);
    assert_eq!(all_orders.items[0].merchant.name, "Warung Bu Siti");

    let completed = owner_service::update_order_status(
        &state,
        &platform_owner,
        placed.id,
        status_request("completed"),
    )
    .await?
    .data
    .unwrap();
    assert_eq!(completed.status, "completed");

    // Ownership gate on item mutation fires before payload validation.
    let err = item_service::update_item(&state, &buyer, bayam, UpdateItemInput::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    // Snapshots survive item edits: bump the price, the order keeps 10000.
    item_service::update_item(
        &state,
        &seller,
        bayam,
        UpdateItemInput {
            name: Some("Bayam Segar".into()),
            category: Some("sayur".into()),
            base_price: Some("12000".into()),
            photo: None,
        },
    )
    .await?;
    let my_orders = order_service::list_my_orders(&state, &buyer).await?.data.unwrap();
    assert_eq!(my_orders.items[0].price, 10000);
    assert_eq!(my_orders.items[0].total, 50000);

    // Cart boundaries: zero quantity rejected, available quantity accepted.
    let err = cart_service::add_to_cart(
        &state,
        &buyer,
        AddToCartRequest {
            merchant_id: Some(merchant.id),
            item_id: Some(wortel),
            quantity: Some(0),
        },
    )
    .await
    .unwrap_err();
    assert_validation(err, "Quantity harus berupa angka positif");

    let err = cart_service::add_to_cart(
        &state,
        &buyer,
        AddToCartRequest {
            merchant_id: Some(merchant.id),
            item_id: Some(wortel),
            quantity: Some(4),
        },
    )
    .await
    .unwrap_err();
    assert_validation(err, "Stok tidak cukup");

    let entry = cart_service::add_to_cart(
        &state,
        &buyer,
        AddToCartRequest {
            merchant_id: Some(merchant.id),
            item_id: Some(wortel),
            quantity: Some(3),
        },
    )
    .await?
    .data
    .unwrap();
    let cart = cart_service::list_cart(&state, &buyer).await?.data.unwrap();
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].entry.id, entry.id);
    assert_eq!(
        cart.items[0].item.as_ref().map(|i| i.name.as_str()),
        Some("Wortel")
    );

    // Search: empty category is an empty list, name filter and price sort work.
    let empty = search_service::search_products(
        &state,
        SearchQuery {
            name: None,
            category: Some("perkakas".into()),
            sort_by: None,
        },
    )
    .await?
    .data
    .unwrap();
    assert!(empty.items.is_empty());

    let cheapest_first = search_service::search_products(
        &state,
        SearchQuery {
            name: None,
            category: Some("sayur".into()),
            sort_by: Some("termurah".into()),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(cheapest_first.items.len(), 2);
    let prices: Vec<i64> = cheapest_first
        .items
        .iter()
        .map(|p| p.item.as_ref().unwrap().base_price)
        .collect();
    assert_eq!(prices, vec![8000, 12000]);

    let named = search_service::search_products(
        &state,
        SearchQuery {
            name: Some("wor".into()),
            category: None,
            sort_by: None,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(named.items.len(), 1);
    assert_eq!(named.items[0].item.as_ref().unwrap().name, "Wortel");

    // Messaging: buyer writes, seller reads it with the sender attached.
    message_service::send_message(
        &state,
        &buyer,
        SendMessageRequest {
            merchant_id: Some(merchant.id),
            message: Some("Masih ada bayam besok?".into()),
        },
    )
    .await?;
    let inbox = message_service::merchant_messages(
        &state,
        &seller,
        MerchantMessagesQuery {
            merchant_id: Some(merchant.id),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(inbox.items.len(), 1);
    assert_eq!(inbox.items[0].message.status, "unread");
    assert_eq!(inbox.items[0].user.email, "budi@example.com");

    // Dashboard: one completed order worth 50000.
    let summary = dashboard_service::merchant_dashboard(
        &state,
        &seller,
        DashboardQuery {
            merchant_id: Some(merchant.id),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(summary.total_sales, 50000);
    assert_eq!(summary.orders_by_status.get("completed"), Some(&1));
    assert_eq!(summary.top_products[0].item, "Bayam Segar");

    // Deleting an item takes its stock row with it.
    item_service::delete_item(&state, &seller, wortel).await?;
    assert!(catalog::get_stock(&state.orm, wortel).await?.is_none());
    assert!(catalog::get_item(&state.orm, wortel).await?.is_none());

    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url).await?;
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;

    // Clean tables between runs
    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE messages, orders, carts, stocks, items, merchants, audit_logs, users RESTART IDENTITY CASCADE",
    ))
    .await?;

    let media_root = std::env::temp_dir().join(format!("pasarku-test-media-{}", Uuid::new_v4()));
    Ok(AppState {
        pool,
        orm,
        images: ImageStore::new(media_root, "http://localhost:3000/media"),
        jwt_secret: "test-secret".into(),
    })
}

async fn create_user(state: &AppState, role: &str, email: &str) -> anyhow::Result<AuthUser> {
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(b"rahasia", &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO users (id, email, password_hash, name, address, phone_number, role)
        VALUES ($1, $2, $3, $4, 'Jl. Tes 1', '0811111111', $5)
        "#,
    )
    .bind(id)
    .bind(email)
    .bind(password_hash)
    .bind(email.split('@').next().unwrap())
    .bind(role)
    .execute(&state.pool)
    .await?;

    Ok(AuthUser {
        user_id: id,
        role: role.into(),
    })
}

async fn create_merchant(
    state: &AppState,
    seller: &AuthUser,
    name: &str,
    category: &str,
) -> anyhow::Result<Merchant> {
    let resp = merchant_service::create_merchant(
        state,
        seller,
        CreateMerchantInput {
            name: Some(name.into()),
            category: Some(category.into()),
            lat: Some("-6.2088".into()),
            lng: Some("106.8456".into()),
            norek: None,
            photo: None,
        },
    )
    .await?;
    Ok(resp.data.unwrap())
}

async fn create_item(
    state: &AppState,
    seller: &AuthUser,
    merchant_id: Uuid,
    name: &str,
    base_price: &str,
    quantity: &str,
) -> anyhow::Result<Uuid> {
    let resp = item_service::create_item(
        state,
        seller,
        CreateItemInput {
            merchant_id: Some(merchant_id.to_string()),
            name: Some(name.into()),
            category: Some("sayur".into()),
            base_price: Some(base_price.into()),
            quantity: Some(quantity.into()),
            photo: None,
        },
    )
    .await?;
    Ok(resp.data.unwrap().id)
}

fn order_input(
    merchant_id: Uuid,
    item_id: Uuid,
    quantity: &str,
    delivery_method: &str,
    payment_method: &str,
    address: Option<&str>,
) -> PlaceOrderInput {
    PlaceOrderInput {
        merchant_id: Some(merchant_id.to_string()),
        item_id: Some(item_id.to_string()),
        quantity: Some(quantity.into()),
        delivery_method: Some(delivery_method.into()),
        payment_method: Some(payment_method.into()),
        address: address.map(Into::into),
        payment_proof: None,
    }
}

fn status_request(status: &str) -> UpdateOrderStatusRequest {
    UpdateOrderStatusRequest {
        status: Some(status.into()),
    }
}

fn assert_validation(err: AppError, expected: &str) {
    match err {
        AppError::Validation(msg) => assert_eq!(msg, expected),
        other => panic!("expected validation error, got {other:?}"),
    }
}
