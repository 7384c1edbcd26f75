use anyhow::{Context, Result, anyhow};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: String,
    pub backend_url: String,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_protected_per_min: u32,

    pub api_prefix: String,
    pub receipt_logo_path: String,
    pub log_dir: String,
    pub log_level: tracing::Level,
    pub cookie_secure: bool,
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_var<T>(key: &str, default: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = var_or(key, default);
    raw.trim()
        .parse()
        .map_err(|e| anyhow!("{key}={raw:?} is invalid: {e}"))
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let backend_url = env::var("BACKEND_URL")
            .or_else(|_| env::var("STRAPI_URL"))
            .context("BACKEND_URL (or STRAPI_URL) must be set")?;

        Ok(Self {
            server_addr: var_or("SERVER_ADDR", "127.0.0.1:8080"),
            backend_url: backend_url.trim_end_matches('/').to_string(),

            rate_login_per_min: parse_var("RATE_LOGIN_PER_MIN", "60")?,
            rate_protected_per_min: parse_var("RATE_PROTECTED_PER_MIN", "1000")?,

            api_prefix: var_or("API_PREFIX", "/api"),
            receipt_logo_path: var_or("RECEIPT_LOGO_PATH", "assets/logo_black.png"),
            log_dir: var_or("LOG_DIR", "logs"),
            log_level: parse_var("LOG_LEVEL", "debug")?,
            cookie_secure: parse_var("COOKIE_SECURE", "false")?,
        })
    }

    #[cfg(test)]
    pub fn for_tests(backend_url: &str) -> Self {
        Self {
            server_addr: "127.0.0.1:0".to_string(),
            backend_url: backend_url.trim_end_matches('/').to_string(),
            rate_login_per_min: 60,
            rate_protected_per_min: 1000,
            api_prefix: "/api".to_string(),
            receipt_logo_path: "does/not/exist.png".to_string(),
            log_dir: "logs".to_string(),
            log_level: tracing::Level::DEBUG,
            cookie_secure: false,
        }
    }
}
