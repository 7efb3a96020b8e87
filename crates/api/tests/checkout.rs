//! Database-backed checkout tests.
//!
//! `#[sqlx::test]` provisions an isolated database per test (requires
//! `DATABASE_URL` pointing at a running `PostgreSQL`) and applies the
//! migrations in `crates/api/migrations/` before each one.

#![allow(clippy::unwrap_used)]

use rust_decimal::{Decimal, dec};
use sqlx::PgPool;

use sungrove_api::db::CartRepository;
use sungrove_api::models::ShippingAddress;
use sungrove_api::services::{CheckoutError, CheckoutService};
use sungrove_core::{CartId, ProductId, UserId};

async fn seed_user(pool: &PgPool, email: &str) -> UserId {
    let (id,): (i32,) =
        sqlx::query_as("INSERT INTO users (email, password_hash) VALUES ($1, 'x') RETURNING id")
            .bind(email)
            .fetch_one(pool)
            .await
            .unwrap();
    UserId::new(id)
}

async fn seed_product(pool: &PgPool, price: Decimal, stock: i32) -> ProductId {
    let (id,): (i32,) = sqlx::query_as(
        "INSERT INTO products (name, price, quantity) VALUES ('widget', $1, $2) RETURNING id",
    )
    .bind(price)
    .bind(stock)
    .fetch_one(pool)
    .await
    .unwrap();
    ProductId::new(id)
}

async fn counters_of(pool: &PgPool, product_id: ProductId) -> (i32, i32) {
    sqlx::query_as("SELECT quantity, sold FROM products WHERE id = $1")
        .bind(product_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn order_count(pool: &PgPool) -> i64 {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orders")
        .fetch_one(pool)
        .await
        .unwrap();
    count
}

fn address() -> ShippingAddress {
    ShippingAddress {
        street: "1 Grove Lane".to_string(),
        city: "Portsmouth".to_string(),
        phone: "555-0100".to_string(),
        postal_code: None,
    }
}

#[sqlx::test]
async fn checkout_commits_order_counters_and_retires_the_cart(pool: PgPool) {
    let user_id = seed_user(&pool, "shopper@example.com").await;
    let product_id = seed_product(&pool, dec!(10), 8).await;

    let carts = CartRepository::new(&pool);
    let cart = carts.add_item(user_id, product_id, 3).await.unwrap();

    let order = CheckoutService::new(&pool)
        .checkout(cart.id, user_id, &address())
        .await
        .unwrap();

    assert_eq!(order.total_price, dec!(30));
    assert_eq!(order.items.len(), 1);
    assert_eq!(counters_of(&pool, product_id).await, (5, 3));
    assert!(carts.get_by_user(user_id).await.unwrap().is_none());
}

#[sqlx::test]
async fn foreign_cart_id_is_not_found_and_mutates_nothing(pool: PgPool) {
    let owner_id = seed_user(&pool, "owner@example.com").await;
    let intruder_id = seed_user(&pool, "intruder@example.com").await;
    let product_id = seed_product(&pool, dec!(10), 8).await;

    let carts = CartRepository::new(&pool);
    let cart = carts.add_item(owner_id, product_id, 3).await.unwrap();

    let err = CheckoutService::new(&pool)
        .checkout(cart.id, intruder_id, &address())
        .await
        .unwrap_err();
    assert!(matches!(err, CheckoutError::CartNotFound));

    // A missing cart id reads identically to a foreign one.
    let err = CheckoutService::new(&pool)
        .checkout(CartId::new(cart.id.as_i32() + 1000), owner_id, &address())
        .await
        .unwrap_err();
    assert!(matches!(err, CheckoutError::CartNotFound));

    assert_eq!(order_count(&pool).await, 0);
    assert_eq!(counters_of(&pool, product_id).await, (8, 0));
    assert!(carts.get_for_user(cart.id, owner_id).await.unwrap().is_some());
}

#[sqlx::test]
async fn oversubscribed_line_rolls_back_the_whole_checkout(pool: PgPool) {
    let user_id = seed_user(&pool, "shopper@example.com").await;
    // First line succeeds, second asks for more than is on hand; the
    // rollback must undo the first line's adjustment too.
    let plentiful_id = seed_product(&pool, dec!(10), 8).await;
    let scarce_id = seed_product(&pool, dec!(20), 3).await;

    let carts = CartRepository::new(&pool);
    carts.add_item(user_id, plentiful_id, 1).await.unwrap();
    let cart = carts.add_item(user_id, scarce_id, 5).await.unwrap();

    let err = CheckoutService::new(&pool)
        .checkout(cart.id, user_id, &address())
        .await
        .unwrap_err();
    assert!(matches!(err, CheckoutError::OutOfStock(id) if id == scarce_id));

    assert_eq!(order_count(&pool).await, 0);
    assert_eq!(counters_of(&pool, plentiful_id).await, (8, 0));
    assert_eq!(counters_of(&pool, scarce_id).await, (3, 0));
    assert!(carts.get_by_user(user_id).await.unwrap().is_some());
}
