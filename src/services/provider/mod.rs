//! Network provider layer.
//!
//! Exposes the Solana RPC provider together with the retry policy applied to
//! transient failures. Retrying here means re-issuing a single RPC request;
//! it never means resubmitting an already-signed transaction.

use serde::Serialize;
use std::{env, future::Future, time::Duration};
use thiserror::Error;

mod solana;
pub use solana::*;

use crate::constants::{
    DEFAULT_RETRY_BASE_DELAY_MILLIS, DEFAULT_RETRY_MAX_ATTEMPTS, DEFAULT_RETRY_MAX_DELAY_MILLIS,
};

#[derive(Error, Debug, Serialize)]
pub enum ProviderError {
    #[error("RPC client error: {0}")]
    SolanaRpcError(#[from] SolanaProviderError),
    #[error("Network configuration error: {0}")]
    NetworkConfiguration(String),
}

/// Bounds for the exponential backoff applied to transient RPC failures.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_RETRY_MAX_ATTEMPTS,
            base_delay: Duration::from_millis(DEFAULT_RETRY_BASE_DELAY_MILLIS),
            max_delay: Duration::from_millis(DEFAULT_RETRY_MAX_DELAY_MILLIS),
        }
    }
}

impl RetryConfig {
    /// Reads `RPC_RETRY_MAX_ATTEMPTS`, `RPC_RETRY_BASE_DELAY_MS` and
    /// `RPC_RETRY_MAX_DELAY_MS`, falling back to the defaults for anything
    /// unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let read_u64 = |name: &str, fallback: u64| {
            env::var(name)
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(fallback)
        };

        Self {
            max_attempts: read_u64("RPC_RETRY_MAX_ATTEMPTS", defaults.max_attempts as u64) as u32,
            base_delay: Duration::from_millis(read_u64(
                "RPC_RETRY_BASE_DELAY_MS",
                defaults.base_delay.as_millis() as u64,
            )),
            max_delay: Duration::from_millis(read_u64(
                "RPC_RETRY_MAX_DELAY_MS",
                defaults.max_delay.as_millis() as u64,
            )),
        }
    }
}

/// Runs `operation` up to `config.max_attempts` times, sleeping with
/// exponential backoff between attempts. Only errors accepted by
/// `is_retriable` are retried; the last error is returned unchanged.
pub async fn retry_with_backoff<T, E, F, Fut>(
    operation_name: &str,
    config: &RetryConfig,
    is_retriable: fn(&E) -> bool,
    operation: F,
) -> Result<T, E>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut delay = config.base_delay;
    let mut attempt: u32 = 1;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(error) if attempt < config.max_attempts && is_retriable(&error) => {
                log::warn!(
                    "{operation_name} attempt {attempt}/{} failed, retrying in {delay:?}: {error}",
                    config.max_attempts
                );
                tokio::time::sleep(delay).await;
                delay = std::cmp::min(delay * 2, config.max_delay);
                attempt += 1;
            }
            Err(error) => return Err(error),
        }
    }
}
