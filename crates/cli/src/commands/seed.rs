//! Seed the demo accounts and the menu.
//!
//! Idempotent: every insert is `ON CONFLICT DO NOTHING`, so re-running the
//! command never duplicates rows or overwrites changed prices.

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use rust_decimal::Decimal;
use sqlx::PgPool;

use coffee_run_core::CupSize;

use super::{CommandError, connect};

/// Demo accounts: (email, password, admin).
const USERS: &[(&str, &str, bool)] = &[
    ("admin@titanscoffee.com", "test123", true),
    ("user@titanscoffee.com", "password123", false),
];

/// Run the seed.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    seed_users(&pool).await?;
    seed_products(&pool).await?;

    tracing::info!("Seed complete!");
    Ok(())
}

async fn seed_users(pool: &PgPool) -> Result<(), CommandError> {
    for (email, password, admin) in USERS {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|_| CommandError::PasswordHash)?
            .to_string();

        sqlx::query(
            r"
            INSERT INTO users (email, password_hash, admin)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO NOTHING
            ",
        )
        .bind(email)
        .bind(&hash)
        .bind(admin)
        .execute(pool)
        .await?;

        tracing::info!(email, admin, "Seeded user");
    }

    Ok(())
}

async fn seed_products(pool: &PgPool) -> Result<(), CommandError> {
    let all_sizes: Vec<&str> = CupSize::ALL.iter().map(CupSize::as_str).collect();
    let sizes_json = serde_json::to_string(&all_sizes).unwrap_or_else(|_| "[]".to_owned());

    let menu: [(&str, Decimal); 3] = [
        ("Cappuccino", Decimal::new(900, 2)),
        ("Macaroons", Decimal::new(400, 2)),
        ("Donuts", Decimal::new(500, 2)),
    ];

    for (name, price) in menu {
        sqlx::query(
            r"
            INSERT INTO products (name, price, available_sizes, active)
            VALUES ($1, $2, $3, TRUE)
            ON CONFLICT (name) DO NOTHING
            ",
        )
        .bind(name)
        .bind(price)
        .bind(&sizes_json)
        .execute(pool)
        .await?;

        tracing::info!(name, %price, "Seeded product");
    }

    Ok(())
}
