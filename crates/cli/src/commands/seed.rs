//! Seed the database with a small sample catalog for local development.
//!
//! Idempotent: rows are keyed on slug/code and skipped when already present.

use rust_decimal::Decimal;

use super::{CommandError, connect};

struct SeedProduct {
    name: &'static str,
    slug: &'static str,
    price: Decimal,
    stock: i32,
    track_inventory: bool,
}

struct SeedCoupon {
    code: &'static str,
    discount_type: &'static str,
    value: Decimal,
    max_discount_amount: Option<Decimal>,
    min_order_amount: Option<Decimal>,
}

fn sample_products() -> Vec<SeedProduct> {
    vec![
        SeedProduct {
            name: "Custom Photo Mug",
            slug: "custom-photo-mug",
            price: Decimal::from(349),
            stock: 120,
            track_inventory: true,
        },
        SeedProduct {
            name: "Engraved Photo Frame",
            slug: "engraved-photo-frame",
            price: Decimal::from(600),
            stock: 45,
            track_inventory: true,
        },
        SeedProduct {
            name: "Personalized Cushion",
            slug: "personalized-cushion",
            price: Decimal::from(499),
            stock: 80,
            track_inventory: true,
        },
        SeedProduct {
            name: "Greeting Card Pack",
            slug: "greeting-card-pack",
            price: Decimal::from(149),
            stock: 0,
            // Printed on demand, never runs out
            track_inventory: false,
        },
    ]
}

fn sample_coupons() -> Vec<SeedCoupon> {
    vec![
        SeedCoupon {
            code: "WELCOME10",
            discount_type: "percentage",
            value: Decimal::from(10),
            max_discount_amount: Some(Decimal::from(200)),
            min_order_amount: None,
        },
        SeedCoupon {
            code: "FLAT100",
            discount_type: "fixed",
            value: Decimal::from(100),
            max_discount_amount: None,
            min_order_amount: Some(Decimal::from(799)),
        },
    ]
}

/// Insert sample products and coupons, skipping existing rows.
///
/// # Errors
///
/// Returns `CommandError` if the database is unreachable or an insert fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    for product in sample_products() {
        let result = sqlx::query(
            r"
            INSERT INTO products (name, slug, price, stock, track_inventory, active)
            VALUES ($1, $2, $3, $4, $5, TRUE)
            ON CONFLICT (slug) DO NOTHING
            ",
        )
        .bind(product.name)
        .bind(product.slug)
        .bind(product.price)
        .bind(product.stock)
        .bind(product.track_inventory)
        .execute(&pool)
        .await?;

        if result.rows_affected() > 0 {
            tracing::info!(slug = product.slug, "Seeded product");
        } else {
            tracing::info!(slug = product.slug, "Product already present, skipped");
        }
    }

    for coupon in sample_coupons() {
        let result = sqlx::query(
            r"
            INSERT INTO coupons
                (code, active, discount_type, value, max_discount_amount, min_order_amount)
            VALUES ($1, TRUE, $2, $3, $4, $5)
            ON CONFLICT (upper(code)) DO NOTHING
            ",
        )
        .bind(coupon.code)
        .bind(coupon.discount_type)
        .bind(coupon.value)
        .bind(coupon.max_discount_amount)
        .bind(coupon.min_order_amount)
        .execute(&pool)
        .await?;

        if result.rows_affected() > 0 {
            tracing::info!(code = coupon.code, "Seeded coupon");
        } else {
            tracing::info!(code = coupon.code, "Coupon already present, skipped");
        }
    }

    tracing::info!("Seed complete");
    Ok(())
}
