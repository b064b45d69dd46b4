use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use tracing::{error, warn};

use aisle_db::Database;

use crate::auth::AppState;
use crate::error::ApiError;

/// Fixed retry policy for read queries. Writes are never retried.
#[derive(Debug, Clone, Copy)]
pub struct ReadRetry {
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for ReadRetry {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay: Duration::from_millis(500),
        }
    }
}

/// Runs a blocking read off the async runtime, retrying on failure.
pub async fn read<F, T>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: Fn(&Database) -> anyhow::Result<T> + Send + Sync + 'static,
    T: Send + 'static,
{
    let policy = state.read_retry;
    let f = Arc::new(f);
    let mut attempt = 1;

    loop {
        let db = state.clone();
        let query = f.clone();
        let result = tokio::task::spawn_blocking(move || query(&db.db))
            .await
            .map_err(|e| {
                error!("spawn_blocking join error: {}", e);
                ApiError::Load(anyhow!("query task failed"))
            })?;

        match result {
            Ok(value) => return Ok(value),
            Err(e) if attempt < policy.attempts.max(1) => {
                warn!("Read failed (attempt {}/{}): {:#}", attempt, policy.attempts, e);
                attempt += 1;
                tokio::time::sleep(policy.delay).await;
            }
            Err(e) => return Err(ApiError::Load(e)),
        }
    }
}

/// Runs a blocking write off the async runtime. One attempt only.
pub async fn write<F, T>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&Database) -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let db = state.clone();
    tokio::task::spawn_blocking(move || f(&db.db))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Save(anyhow!("write task failed"))
        })?
        .map_err(ApiError::Save)
}
