use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub payment: PaymentConfig,
}

/// Settings for the external payment verifier and the leave-competition
/// purchase it checks.
#[derive(Debug, Clone)]
pub struct PaymentConfig {
    pub api_url: String,
    pub api_key: String,
    pub leave_product_id: String,
    pub leave_price: f64,
    pub leave_currency: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: std::env::var("HOST").context("Cannot load HOST env variable")?,
            port: std::env::var("PORT")
                .context("PORT must be a number")?
                .parse()?,
            database_url: std::env::var("DATABASE_URL")
                .context("Cannot load DATABASE_URL env variable")?,
            jwt_secret: std::env::var("JWT_SECRET")
                .context("Cannot load JWT_SECRET env variable")?,
            payment: PaymentConfig::from_env()?,
        })
    }
}

impl PaymentConfig {
    fn from_env() -> Result<Self> {
        Ok(Self {
            api_url: std::env::var("PAYMENT_API_URL")
                .unwrap_or_else(|_| "https://api.revenuecat.com/v1".to_string()),
            api_key: std::env::var("PAYMENT_API_KEY").unwrap_or_default(),
            leave_product_id: std::env::var("LEAVE_PRODUCT_ID")
                .unwrap_or_else(|_| "leave_competition".to_string()),
            leave_price: std::env::var("LEAVE_PRICE")
                .unwrap_or_else(|_| "2.99".to_string())
                .parse()
                .context("LEAVE_PRICE must be a number")?,
            leave_currency: std::env::var("LEAVE_CURRENCY").unwrap_or_else(|_| "USD".to_string()),
        })
    }
}
