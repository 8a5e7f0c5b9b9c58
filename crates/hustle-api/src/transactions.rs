use axum::{Extension, Json, extract::State};
use chrono::{SecondsFormat, Utc};
use tracing::{info, warn};

use hustle_db::models::{PurchaseOutcome, PurchaseRow};
use hustle_types::api::{PurchaseForm, PurchaseRecord};

use crate::confirmation;
use crate::error::ApiError;
use crate::form::{FormInput, present};
use crate::session::SessionUser;
use crate::state::{AppState, run_blocking};

/// Buy a single product for the logged-in user. Responds with the
/// confirmation number as plain text.
pub async fn process_transaction(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    FormInput(form): FormInput<PurchaseForm>,
) -> Result<String, ApiError> {
    let raw_id = present(form.product_id).ok_or(ApiError::MissingProductId)?;
    let product_id: i64 = raw_id
        .trim()
        .parse()
        .map_err(|_| ApiError::NotFound("Product not found."))?;

    let confirmation_number = confirmation::generate();
    let transaction_date = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

    let conf = confirmation_number.clone();
    let buyer_id = user.user_id;
    let outcome = run_blocking(&state, move |db| {
        db.record_purchase(product_id, buyer_id, &conf, &transaction_date)
    })
    .await?;

    match outcome {
        PurchaseOutcome::Completed { seller_id, price } => {
            info!(
                "'{}' bought product {} from seller {} for {} ({})",
                user.username, product_id, seller_id, price, confirmation_number
            );
            Ok(confirmation_number)
        }
        PurchaseOutcome::AlreadySold => {
            warn!("'{}' tried to buy sold product {}", user.username, product_id);
            Err(ApiError::AlreadySold)
        }
        PurchaseOutcome::ProductNotFound => Err(ApiError::NotFound("Product not found.")),
    }
}

/// Purchase history of the logged-in user.
pub async fn get_transactions(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
) -> Result<Json<Vec<PurchaseRecord>>, ApiError> {
    let buyer_id = user.user_id;
    let rows = run_blocking(&state, move |db| db.get_purchases_by_buyer(buyer_id)).await?;

    Ok(Json(rows.into_iter().map(purchase_record).collect()))
}

fn purchase_record(row: PurchaseRow) -> PurchaseRecord {
    PurchaseRecord {
        confirmation_number: row.confirmation_number,
        product_id: row.product.product_id,
        product_name: row.product.product_name,
        product_description: row.product.product_description,
        category: row.product.category,
        product_image_url: row.product.product_image_url,
        seller_id: row.seller_id,
        buyer_id: row.buyer_id,
        sold_status: u8::from(row.product.sold),
        transaction_date: row.transaction_date,
        price: row.price,
    }
}
