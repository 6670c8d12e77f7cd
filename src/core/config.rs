use crate::entities::user::{MAX_BCRYPT_COST, MIN_BCRYPT_COST};
use dotenv::dotenv;
use std::env;
use tracing::{info, warn};

const DEFAULT_SECRET_KEY: &str = "warbler development secret, change me";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub secret_key: String,
    pub server_host: String,
    pub server_port: u16,
    pub max_connections: u32,
    pub bcrypt_cost: u32,
    pub allow_self_follow: bool,
    pub app_env: String,
}

impl Config {
    /// Load the configuration from environment variables.
    /// Reads `.env` first when present.
    pub fn from_env() -> Result<Self, String> {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://warbler.db".to_string());

        let secret_key = env::var("SECRET_KEY").unwrap_or_else(|_| {
            warn!("SECRET_KEY not set, using default (not secure for production!)");
            DEFAULT_SECRET_KEY.to_string()
        });

        let server_host = env::var("SERVER_HOST")
            .unwrap_or_else(|_| "127.0.0.1".to_string());

        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| "Invalid SERVER_PORT: must be a number between 0-65535".to_string())?;

        let max_connections = env::var("MAX_DB_CONNECTIONS")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u32>()
            .map_err(|_| "Invalid MAX_DB_CONNECTIONS: must be a positive number".to_string())?;

        let bcrypt_cost = match env::var("BCRYPT_COST") {
            Ok(value) => Self::parse_bcrypt_cost(&value)?,
            Err(_) => bcrypt::DEFAULT_COST,
        };

        let allow_self_follow = match env::var("ALLOW_SELF_FOLLOW") {
            Ok(value) => Self::parse_flag(&value)
                .ok_or_else(|| "Invalid ALLOW_SELF_FOLLOW: must be true or false".to_string())?,
            Err(_) => false,
        };

        let app_env = env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string());

        Ok(Config {
            database_url,
            secret_key,
            server_host,
            server_port,
            max_connections,
            bcrypt_cost,
            allow_self_follow,
            app_env,
        })
    }

    /// Log the configuration, hiding secrets
    pub fn print_info(&self) {
        info!("Server Configuration:");
        info!("   Environment: {}", self.app_env);
        info!("   Server Address: {}:{}", self.server_host, self.server_port);
        info!("   Database: {}", Self::mask_url(&self.database_url));
        info!("   Max DB Connections: {}", self.max_connections);
        info!("   Bcrypt Cost: {}", self.bcrypt_cost);
        info!("   Self Follow Allowed: {}", self.allow_self_follow);
        if self.secret_key == DEFAULT_SECRET_KEY {
            warn!("   Secret Key: USING DEFAULT (INSECURE!)");
        } else {
            info!("   Secret Key: custom secret configured");
        }
    }

    fn parse_bcrypt_cost(value: &str) -> Result<u32, String> {
        value
            .parse::<u32>()
            .ok()
            .filter(|cost| (MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(cost))
            .ok_or_else(|| "Invalid BCRYPT_COST: must be a number between 4-31".to_string())
    }

    fn parse_flag(value: &str) -> Option<bool> {
        match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        }
    }

    /// Mask the credentials of the database URL for logging
    fn mask_url(url: &str) -> String {
        if let Some(at_pos) = url.find('@') {
            if let Some(scheme_end) = url.find("://") {
                let scheme = &url[..scheme_end + 3];
                let after_at = &url[at_pos..];
                return format!("{}***{}", scheme, after_at);
            }
        }
        url.to_string()
    }
}
