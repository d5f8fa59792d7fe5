//! Sample catalog used by the `seed` command.

use super::product::NewProduct;

/// The five demo products a fresh catalog is seeded with
pub fn sample_products() -> Vec<NewProduct> {
    vec![
        NewProduct::new(
            "MacBook Pro 16\"",
            Some("High-performance laptop with M3 Pro chip, 16GB RAM, and 512GB SSD"),
            2499.99,
            "electronics",
            Some(true),
        ),
        NewProduct::new(
            "Wireless Gaming Mouse",
            Some("Ergonomic wireless gaming mouse with RGB lighting and 16000 DPI"),
            79.99,
            "electronics",
            Some(true),
        ),
        NewProduct::new(
            "Mechanical Keyboard",
            Some("RGB mechanical keyboard with Cherry MX switches"),
            149.99,
            "electronics",
            Some(true),
        ),
        NewProduct::new(
            "Smart Coffee Maker",
            Some("WiFi-enabled programmable coffee maker with mobile app control"),
            129.99,
            "kitchen",
            Some(true),
        ),
        NewProduct::new(
            "Blender Pro 3000",
            Some("Professional-grade blender with 10 speed settings and 2L capacity"),
            89.99,
            "kitchen",
            Some(false),
        ),
    ]
}
