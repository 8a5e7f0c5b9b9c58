use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Running migration v1 (initial schema)");
        conn.execute_batch(
            "
            CREATE TABLE users (
                user_id     INTEGER PRIMARY KEY AUTOINCREMENT,
                username    TEXT NOT NULL UNIQUE,
                password    TEXT NOT NULL,
                email       TEXT,
                created_at  TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE products (
                product_id          INTEGER PRIMARY KEY AUTOINCREMENT,
                product_name        TEXT NOT NULL,
                product_description TEXT NOT NULL,
                price               REAL NOT NULL,
                category            TEXT NOT NULL,
                product_image_url   TEXT NOT NULL,
                seller_id           INTEGER NOT NULL REFERENCES users(user_id),
                sold_status         INTEGER NOT NULL DEFAULT 0 CHECK (sold_status IN (0, 1))
            );

            CREATE INDEX idx_products_listing ON products(sold_status, category);
            CREATE INDEX idx_products_seller ON products(seller_id);

            CREATE TABLE transactions (
                confirmation_number TEXT PRIMARY KEY,
                buyer_id            INTEGER NOT NULL REFERENCES users(user_id),
                seller_id           INTEGER NOT NULL REFERENCES users(user_id),
                product_id          INTEGER NOT NULL UNIQUE REFERENCES products(product_id),
                transaction_date    TEXT NOT NULL,
                price               REAL NOT NULL
            );

            CREATE INDEX idx_transactions_buyer ON transactions(buyer_id, transaction_date);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
