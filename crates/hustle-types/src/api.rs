use serde::{Deserialize, Serialize};

// -- Forms --
//
// Every field is optional: browsers submit partially filled forms, and a
// missing field is a client error reported by the handler, not a
// deserialization failure.

#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpForm {
    pub username: Option<String>,
    pub password: Option<String>,
    /// Password confirmation.
    pub rec_password: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseForm {
    pub product_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostItemForm {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub category: Option<String>,
    pub img_link: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    pub filter: Option<String>,
    pub search: Option<String>,
}

// -- Responses --

/// A product as shown in list views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub product_name: String,
    pub product_image_url: String,
    pub price: f64,
    pub product_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    pub product_id: i64,
    pub product_name: String,
    pub product_description: String,
    pub price: f64,
    pub category: String,
    pub product_image_url: String,
    pub seller_id: i64,
    /// 0 while listed, 1 once sold.
    pub sold_status: u8,
}

/// One of the current seller's listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostedItem {
    pub product_id: i64,
    pub product_name: String,
    pub product_description: String,
    pub product_image_url: String,
    pub price: f64,
    pub sold_status: u8,
}

/// A completed purchase joined with the product it bought.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRecord {
    pub confirmation_number: String,
    pub product_id: i64,
    pub product_name: String,
    pub product_description: String,
    pub category: String,
    pub product_image_url: String,
    pub seller_id: i64,
    pub buyer_id: i64,
    pub sold_status: u8,
    pub transaction_date: String,
    /// Price paid, snapshotted at sale time.
    pub price: f64,
}
