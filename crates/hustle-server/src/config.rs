use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use tracing::info;

pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub public_dir: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self> {
        // PORT is what most hosting platforms set
        let default_port = env::var("PORT").unwrap_or_else(|_| "8000".into());

        Ok(Self {
            host: try_load("HUSTLE_HOST", "0.0.0.0")?,
            port: try_load("HUSTLE_PORT", &default_port)?,
            db_path: try_load("HUSTLE_DB_PATH", "husky-hustle.db")?,
            public_dir: try_load("HUSTLE_PUBLIC_DIR", "public")?,
        })
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.parse()
        .map_err(|e| anyhow::anyhow!("{e}"))
        .with_context(|| format!("Invalid {key} value: {raw}"))
}
