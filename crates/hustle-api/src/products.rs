use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use tracing::{debug, info};

use hustle_db::models::{NewProduct, ProductRow};
use hustle_types::api::{CatalogQuery, PostItemForm, PostedItem, ProductDetail, ProductSummary};
use hustle_types::models::{CATEGORY_SENTINEL, CatalogFilter};

use crate::error::ApiError;
use crate::form::{FormInput, present};
use crate::session::SessionUser;
use crate::state::{AppState, run_blocking};

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductDetail>, ApiError> {
    let not_found = || ApiError::NotFound("Product not found.");
    let product_id: i64 = id.parse().map_err(|_| not_found())?;

    let row = run_blocking(&state, move |db| db.get_product(product_id))
        .await?
        .ok_or_else(not_found)?;

    Ok(Json(product_detail(row)))
}

/// Unsold products, narrowed by `filter` (category) or `search` (substring).
pub async fn display_all_items(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<Vec<ProductSummary>>, ApiError> {
    let filter = CatalogFilter::from_query(query.filter.as_deref(), query.search.as_deref());
    debug!("Catalog listing: {:?}", filter);

    let rows = run_blocking(&state, move |db| db.list_products(&filter)).await?;

    Ok(Json(
        rows.into_iter()
            .map(|row| ProductSummary {
                product_name: row.product_name,
                product_image_url: row.product_image_url,
                price: row.price,
                product_id: row.product_id,
            })
            .collect(),
    ))
}

pub async fn post_items(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    FormInput(form): FormInput<PostItemForm>,
) -> Result<&'static str, ApiError> {
    let (Some(name), Some(description), Some(price), Some(category), Some(image_url)) = (
        present(form.name),
        present(form.description),
        present(form.price),
        present(form.category),
        present(form.img_link),
    ) else {
        return Err(ApiError::MissingFields("Missing Parameters!"));
    };

    if category == CATEGORY_SENTINEL {
        return Err(ApiError::CategoryRequired);
    }
    let price = parse_price(&price)?;

    let seller_id = user.user_id;
    let product_id = run_blocking(&state, move |db| {
        db.insert_product(&NewProduct {
            name: &name,
            description: &description,
            price,
            category: &category,
            image_url: &image_url,
            seller_id,
        })
    })
    .await?;
    info!("'{}' listed product {}", user.username, product_id);

    Ok("Success !")
}

/// Every listing of the logged-in seller, sold or not.
pub async fn posted_items(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
) -> Result<Json<Vec<PostedItem>>, ApiError> {
    let seller_id = user.user_id;
    let rows = run_blocking(&state, move |db| db.get_products_by_seller(seller_id)).await?;

    Ok(Json(
        rows.into_iter()
            .map(|row| PostedItem {
                product_id: row.product_id,
                product_name: row.product_name,
                product_description: row.product_description,
                product_image_url: row.product_image_url,
                price: row.price,
                sold_status: u8::from(row.sold),
            })
            .collect(),
    ))
}

fn parse_price(raw: &str) -> Result<f64, ApiError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite() && *p >= 0.0)
        .ok_or(ApiError::InvalidPrice)
}

fn product_detail(row: ProductRow) -> ProductDetail {
    ProductDetail {
        product_id: row.product_id,
        product_name: row.product_name,
        product_description: row.product_description,
        price: row.price,
        category: row.category,
        product_image_url: row.product_image_url,
        seller_id: row.seller_id,
        sold_status: u8::from(row.sold),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("12").unwrap(), 12.0);
        assert_eq!(parse_price(" 4.99 ").unwrap(), 4.99);
        assert_eq!(parse_price("0").unwrap(), 0.0);
        assert!(matches!(parse_price("-1"), Err(ApiError::InvalidPrice)));
        assert!(matches!(parse_price("free"), Err(ApiError::InvalidPrice)));
        assert!(matches!(parse_price("NaN"), Err(ApiError::InvalidPrice)));
        assert!(matches!(parse_price("inf"), Err(ApiError::InvalidPrice)));
    }
}
