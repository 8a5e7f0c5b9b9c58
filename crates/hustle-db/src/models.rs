//! Database row types — these map directly to SQLite rows.
//! Distinct from hustle-types API models to keep the DB layer independent.

pub struct UserRow {
    pub user_id: i64,
    pub username: String,
    /// Argon2 PHC string.
    pub password: String,
    pub email: Option<String>,
}

pub struct ProductRow {
    pub product_id: i64,
    pub product_name: String,
    pub product_description: String,
    pub price: f64,
    pub category: String,
    pub product_image_url: String,
    pub seller_id: i64,
    pub sold: bool,
}

/// Catalog projection of a product.
pub struct ListingRow {
    pub product_id: i64,
    pub product_name: String,
    pub product_image_url: String,
    pub price: f64,
}

pub struct NewProduct<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub price: f64,
    pub category: &'a str,
    pub image_url: &'a str,
    pub seller_id: i64,
}

/// A transaction joined with the product it bought.
pub struct PurchaseRow {
    pub confirmation_number: String,
    pub buyer_id: i64,
    pub seller_id: i64,
    pub transaction_date: String,
    pub price: f64,
    pub product: ProductRow,
}

/// Result of attempting to record a purchase.
#[derive(Debug, Clone, PartialEq)]
pub enum PurchaseOutcome {
    Completed { seller_id: i64, price: f64 },
    AlreadySold,
    ProductNotFound,
}
