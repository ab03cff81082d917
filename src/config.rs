use std::net::SocketAddr;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_address: SocketAddr,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub admin_username: String,
    pub admin_password: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = match std::env::var("PORT") {
            Ok(port) => port.parse::<u16>().context("PORT must be a number")?,
            Err(_) => 5000,
        };

        let bind_address = format!("{}:{}", host, port)
            .parse()
            .with_context(|| format!("Invalid bind address {}:{}", host, port))?;

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite:hospital.db".to_string());

        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set; generated a random secret, tokens will not survive a restart");
            use rand::Rng;
            let mut rng = rand::thread_rng();
            let bytes: [u8; 32] = rng.gen();
            use base64::Engine;
            base64::engine::general_purpose::STANDARD.encode(bytes)
        });

        let token_ttl_hours = match std::env::var("TOKEN_TTL_HOURS") {
            Ok(hours) => hours
                .parse::<i64>()
                .ok()
                .filter(|h| *h > 0)
                .context("TOKEN_TTL_HOURS must be a positive number")?,
            Err(_) => 12,
        };

        let admin_username = std::env::var("ADMIN_USERNAME")
            .unwrap_or_else(|_| "admin".to_string());
        let admin_password = std::env::var("ADMIN_PASSWORD")
            .unwrap_or_else(|_| "admin".to_string());

        Ok(Self {
            database_url,
            bind_address,
            jwt_secret,
            token_ttl_hours,
            admin_username,
            admin_password,
        })
    }
}
