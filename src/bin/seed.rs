use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use pasarku_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;

    let owner_id = ensure_user(
        &pool,
        "owner@pasarku.id",
        "owner123",
        "Pengelola Pasarku",
        "owner",
    )
    .await?;
    let seller_id = ensure_user(
        &pool,
        "penjual@pasarku.id",
        "penjual123",
        "Bu Siti",
        "user",
    )
    .await?;
    let buyer_id = ensure_user(
        &pool,
        "pembeli@pasarku.id",
        "pembeli123",
        "Pak Budi",
        "user",
    )
    .await?;

    seed_merchant(&pool, seller_id).await?;

    println!("Seed completed. Owner: {owner_id}, Seller: {seller_id}, Buyer: {buyer_id}");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    email: &str,
    password: &str,
    name: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, password_hash, name, address, phone_number, role)
        VALUES ($1, $2, $3, $4, 'Jl. Pasar Baru 1', '0800000000', $5)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .bind(name)
    .bind(role)
    .fetch_optional(pool)
    .await?;

    let user_id = match row {
        Some((id,)) => id,
        None => {
            let existing: (Uuid,) = sqlx::query_as("SELECT id FROM users WHERE email = $1")
                .bind(email)
                .fetch_one(pool)
                .await?;
            existing.0
        }
    };

    println!("Ensured user {email} (role={role})");
    Ok(user_id)
}

async fn seed_merchant(pool: &sqlx::PgPool, seller_id: Uuid) -> anyhow::Result<()> {
    let merchant_id = Uuid::new_v4();
    let inserted: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO merchants (id, name, category, lat, lng, user_id)
        SELECT $1, 'Warung Bu Siti', 'sayur', -6.2088, 106.8456, $2
        WHERE NOT EXISTS (SELECT 1 FROM merchants WHERE name = 'Warung Bu Siti')
        RETURNING id
        "#,
    )
    .bind(merchant_id)
    .bind(seller_id)
    .fetch_optional(pool)
    .await?;

    let merchant_id = match inserted {
        Some((id,)) => id,
        None => {
            println!("Merchant already seeded");
            return Ok(());
        }
    };

    let items = vec![
        ("Bayam Segar", "sayur", 5000_i64, 40),
        ("Wortel", "sayur", 8000, 25),
        ("Cabai Rawit", "bumbu", 15000, 10),
    ];

    for (name, category, price, stock) in items {
        let item_id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO items (id, merchant_id, name, category, base_price, user_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(item_id)
        .bind(merchant_id)
        .bind(name)
        .bind(category)
        .bind(price)
        .bind(seller_id)
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO stocks (item_id, merchant_id, quantity, user_id)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(item_id)
        .bind(merchant_id)
        .bind(stock)
        .bind(seller_id)
        .execute(pool)
        .await?;
    }

    println!("Seeded merchant and items");
    Ok(())
}
