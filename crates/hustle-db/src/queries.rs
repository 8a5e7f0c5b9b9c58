use crate::Database;
use crate::models::{ListingRow, NewProduct, ProductRow, PurchaseOutcome, PurchaseRow, UserRow};
use anyhow::Result;
use hustle_types::models::CatalogFilter;
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row, TransactionBehavior};
use tracing::{debug, warn};

const PRODUCT_COLUMNS: &str = "product_id, product_name, product_description, price, category, \
     product_image_url, seller_id, sold_status";

impl Database {
    // -- Users --

    /// Insert a user. Returns `None` when the username is already taken.
    pub fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        email: Option<&str>,
    ) -> Result<Option<i64>> {
        self.with_conn_mut(|conn| {
            let inserted = conn.execute(
                "INSERT INTO users (username, password, email) VALUES (?1, ?2, ?3)",
                (username, password_hash, email),
            );

            match inserted {
                Ok(_) => Ok(Some(conn.last_insert_rowid())),
                Err(rusqlite::Error::SqliteFailure(e, _))
                    if e.code == ErrorCode::ConstraintViolation =>
                {
                    warn!("Username '{}' already exists", username);
                    Ok(None)
                }
                Err(e) => Err(e.into()),
            }
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_username(conn, username))
    }

    pub fn username_exists(&self, username: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let exists = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM users WHERE username = ?1)",
                [username],
                |row| row.get(0),
            )?;
            Ok(exists)
        })
    }

    // -- Products --

    pub fn insert_product(&self, product: &NewProduct<'_>) -> Result<i64> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO products (product_name, product_description, price, category, \
                 product_image_url, seller_id, sold_status)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0)",
                rusqlite::params![
                    product.name,
                    product.description,
                    product.price,
                    product.category,
                    product.image_url,
                    product.seller_id,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn get_product(&self, product_id: i64) -> Result<Option<ProductRow>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE product_id = ?1");
            let row = conn.query_row(&sql, [product_id], product_from_row).optional()?;
            Ok(row)
        })
    }

    /// Unsold products matching the catalog filter, oldest listing first.
    pub fn list_products(&self, filter: &CatalogFilter) -> Result<Vec<ListingRow>> {
        self.with_conn(|conn| query_listings(conn, filter))
    }

    pub fn get_products_by_seller(&self, seller_id: i64) -> Result<Vec<ProductRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {PRODUCT_COLUMNS} FROM products WHERE seller_id = ?1 ORDER BY product_id"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([seller_id], product_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Transactions --

    /// Record a sale and mark the product sold in one immediate transaction.
    ///
    /// The sold flag is re-checked by the conditional update, so two buyers
    /// racing for the same product cannot both commit.
    pub fn record_purchase(
        &self,
        product_id: i64,
        buyer_id: i64,
        confirmation_number: &str,
        transaction_date: &str,
    ) -> Result<PurchaseOutcome> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let product: Option<(i64, f64, bool)> = tx
                .query_row(
                    "SELECT seller_id, price, sold_status FROM products WHERE product_id = ?1",
                    [product_id],
                    |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
                )
                .optional()?;

            let Some((seller_id, price, sold)) = product else {
                return Ok(PurchaseOutcome::ProductNotFound);
            };
            if sold {
                return Ok(PurchaseOutcome::AlreadySold);
            }

            tx.execute(
                "INSERT INTO transactions (confirmation_number, buyer_id, seller_id, product_id, \
                 transaction_date, price)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![
                    confirmation_number,
                    buyer_id,
                    seller_id,
                    product_id,
                    transaction_date,
                    price,
                ],
            )?;

            let flipped = tx.execute(
                "UPDATE products SET sold_status = 1 WHERE product_id = ?1 AND sold_status = 0",
                [product_id],
            )?;
            // Zero rows when something else marked the row sold after the check above.
            if flipped != 1 {
                tx.rollback()?;
                return Ok(PurchaseOutcome::AlreadySold);
            }

            tx.commit()?;
            debug!("Product {} sold to user {} ({})", product_id, buyer_id, confirmation_number);
            Ok(PurchaseOutcome::Completed { seller_id, price })
        })
    }

    /// Purchases made by a buyer, most recent first.
    pub fn get_purchases_by_buyer(&self, buyer_id: i64) -> Result<Vec<PurchaseRow>> {
        self.with_conn(|conn| query_purchases(conn, buyer_id))
    }
}

fn query_user_by_username(conn: &Connection, username: &str) -> Result<Option<UserRow>> {
    let mut stmt =
        conn.prepare("SELECT user_id, username, password, email FROM users WHERE username = ?1")?;

    let row = stmt
        .query_row([username], |row| {
            Ok(UserRow {
                user_id: row.get(0)?,
                username: row.get(1)?,
                password: row.get(2)?,
                email: row.get(3)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_listings(conn: &Connection, filter: &CatalogFilter) -> Result<Vec<ListingRow>> {
    const SELECT: &str =
        "SELECT product_id, product_name, product_image_url, price FROM products WHERE sold_status = 0";

    let (sql, params): (String, Vec<String>) = match filter {
        CatalogFilter::All => (format!("{SELECT} ORDER BY product_id"), vec![]),
        CatalogFilter::Category(category) => (
            format!("{SELECT} AND category = ?1 ORDER BY product_id"),
            vec![category.clone()],
        ),
        CatalogFilter::Search(term) => (
            format!(
                "{SELECT} AND (product_name LIKE ?1 ESCAPE '\\' OR product_description LIKE ?1 ESCAPE '\\') \
                 ORDER BY product_id"
            ),
            vec![like_pattern(term)],
        ),
    };

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(rusqlite::params_from_iter(params.iter()), |row| {
            Ok(ListingRow {
                product_id: row.get(0)?,
                product_name: row.get(1)?,
                product_image_url: row.get(2)?,
                price: row.get(3)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn query_purchases(conn: &Connection, buyer_id: i64) -> Result<Vec<PurchaseRow>> {
    let mut stmt = conn.prepare(
        "SELECT t.confirmation_number, t.buyer_id, t.seller_id, t.transaction_date, t.price,
                p.product_id, p.product_name, p.product_description, p.price, p.category,
                p.product_image_url, p.seller_id, p.sold_status
         FROM transactions t
         JOIN products p ON p.product_id = t.product_id
         WHERE t.buyer_id = ?1
         ORDER BY t.transaction_date DESC",
    )?;

    let rows = stmt
        .query_map([buyer_id], |row| {
            Ok(PurchaseRow {
                confirmation_number: row.get(0)?,
                buyer_id: row.get(1)?,
                seller_id: row.get(2)?,
                transaction_date: row.get(3)?,
                price: row.get(4)?,
                product: ProductRow {
                    product_id: row.get(5)?,
                    product_name: row.get(6)?,
                    product_description: row.get(7)?,
                    price: row.get(8)?,
                    category: row.get(9)?,
                    product_image_url: row.get(10)?,
                    seller_id: row.get(11)?,
                    sold: row.get(12)?,
                },
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn product_from_row(row: &Row<'_>) -> rusqlite::Result<ProductRow> {
    Ok(ProductRow {
        product_id: row.get(0)?,
        product_name: row.get(1)?,
        product_description: row.get(2)?,
        price: row.get(3)?,
        category: row.get(4)?,
        product_image_url: row.get(5)?,
        seller_id: row.get(6)?,
        sold: row.get(7)?,
    })
}

/// Wrap a search term in `%` wildcards, escaping LIKE metacharacters so the
/// term matches literally.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
