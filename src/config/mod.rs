//! Application configuration - environment variables, `config.toml`, and database setup.
//!
//! Settings come from the process environment (a `.env` file is loaded by the binary
//! beforehand). Default categories come from `config.toml` when present and from a
//! built-in list otherwise.

/// Default category definitions and seeding
pub mod categories;
/// Database connection and table creation
pub mod database;

use crate::errors::{Error, Result};
use categories::CategoryConfig;
use std::{net::SocketAddr, path::PathBuf};
use tracing::{debug, info};

/// Default bind host when `HOST` is unset.
const DEFAULT_HOST: &str = "127.0.0.1";
/// Default port when `PORT` is unset.
const DEFAULT_PORT: u16 = 5000;
/// Default allowed CORS origin when `FRONTEND_URL` is unset.
const DEFAULT_FRONTEND_URL: &str = "http://localhost:3000";
/// Default location of the optional TOML file.
const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Everything the binary needs to start serving.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `SeaORM` connection string
    pub database_url: String,
    /// Address the HTTP server binds to
    pub bind_address: SocketAddr,
    /// Origin allowed to call the API from a browser
    pub frontend_url: String,
    /// Categories seeded as shared defaults at startup
    pub default_categories: Vec<CategoryConfig>,
}

/// Loads the application configuration from the environment and `config.toml`.
///
/// # Errors
/// Returns [`Error::Config`] when `PORT` or `HOST` cannot be parsed, or when the
/// configuration file exists but is not valid TOML.
pub fn load_app_configuration() -> Result<AppConfig> {
    let database_url = database::get_database_url();
    let bind_address = bind_address_from(std::env::var("HOST").ok(), std::env::var("PORT").ok())?;
    let frontend_url =
        std::env::var("FRONTEND_URL").unwrap_or_else(|_| DEFAULT_FRONTEND_URL.to_string());

    let config_path = PathBuf::from(
        std::env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string()),
    );
    let default_categories = if config_path.exists() {
        debug!("Loading categories from {:?}", config_path);
        categories::load_config(&config_path)?.categories
    } else {
        debug!("No config file at {:?}, using built-in categories", config_path);
        categories::builtin_categories()
    };

    info!(
        %bind_address,
        categories = default_categories.len(),
        "Loaded application configuration"
    );

    Ok(AppConfig {
        database_url,
        bind_address,
        frontend_url,
        default_categories,
    })
}

/// Combines optional `HOST` and `PORT` values into a socket address.
fn bind_address_from(host: Option<String>, port: Option<String>) -> Result<SocketAddr> {
    let host = host.unwrap_or_else(|| DEFAULT_HOST.to_string());
    let port = match port {
        Some(raw) => raw.trim().parse::<u16>().map_err(|e| Error::Config {
            message: format!("Invalid PORT '{raw}': {e}"),
        })?,
        None => DEFAULT_PORT,
    };

    format!("{host}:{port}")
        .parse()
        .map_err(|e| Error::Config {
            message: format!("Invalid HOST '{host}': {e}"),
        })
}
