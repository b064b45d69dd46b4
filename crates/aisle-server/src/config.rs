use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use tracing::info;

use aisle_api::assistant::DEFAULT_CHAT_URL;
use aisle_api::query::ReadRetry;

/// JWT secrets shipped in sample env files. Refused at startup.
const PLACEHOLDER_SECRETS: &[&str] = &[
    "change-me",
    "change-me-to-a-random-string",
    "dev-secret-change-me",
];

pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub storage_dir: PathBuf,
    pub static_dir: Option<PathBuf>,
    pub jwt_secret: String,
    pub admin_password: Option<String>,
    pub openai_api_key: Option<String>,
    pub llm_url: String,
    pub read_retry: ReadRetry,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let jwt_secret = var("AISLE_JWT_SECRET").unwrap_or_default();
        if jwt_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
            bail!("AISLE_JWT_SECRET is unset or still a placeholder; set it in your .env file");
        }

        let admin_password = var("ADMIN_PASSWORD");
        if admin_password.is_none() {
            info!("ADMIN_PASSWORD not set, admin sign-in is disabled");
        }

        Ok(Self {
            host: var("AISLE_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_or(&var, "AISLE_PORT", 3000)?,
            db_path: var("AISLE_DB_PATH").unwrap_or_else(|| "aisle.db".into()).into(),
            storage_dir: var("AISLE_STORAGE_DIR").unwrap_or_else(|| "./storage".into()).into(),
            static_dir: var("AISLE_STATIC_DIR").map(PathBuf::from),
            jwt_secret,
            admin_password,
            openai_api_key: var("OPENAI_API_KEY"),
            llm_url: var("AISLE_LLM_URL").unwrap_or_else(|| DEFAULT_CHAT_URL.into()),
            read_retry: ReadRetry {
                attempts: parse_or(&var, "AISLE_READ_RETRIES", 3)?,
                delay: Duration::from_millis(parse_or(&var, "AISLE_READ_RETRY_DELAY_MS", 500)?),
            },
        })
    }
}

fn parse_or<T>(var: impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match var(key) {
        Some(raw) => raw.trim().parse().with_context(|| format!("invalid {key} value '{raw}'")),
        None => Ok(default),
    }
}
