//! Runtime configuration from environment variables.
//!
//! Everything has a sensible default except the mint program id, which has no
//! meaningful fallback. The wallet keypair path defaults to the standard
//! Solana CLI location under the home directory.

use solana_sdk::{commitment_config::CommitmentConfig, pubkey::Pubkey};
use std::{env, path::PathBuf, str::FromStr, time::Duration};
use thiserror::Error;

use crate::constants::{DEFAULT_CONFIRMATION_TIMEOUT_SECONDS, DEFAULT_RPC_TIMEOUT_SECONDS};

pub const DEFAULT_RPC_URL: &str = "https://api.devnet.solana.com";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),

    #[error("Invalid value for {name}: {reason}")]
    InvalidValue { name: String, reason: String },

    #[error("Cannot resolve home directory for the default keypair path")]
    HomeDirectory,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// RPC endpoint of the target cluster.
    pub rpc_url: String,
    /// Path to the wallet authority's keypair file.
    pub keypair_path: PathBuf,
    /// Identity of the on-chain mint program to invoke.
    pub program_id: Pubkey,
    /// Commitment level for RPC reads.
    pub commitment: CommitmentConfig,
    pub rpc_timeout_seconds: u64,
    pub confirmation_timeout: Duration,
}

impl AppConfig {
    /// Reads `RPC_URL`, `KEYPAIR_PATH`, `MINT_PROGRAM_ID`,
    /// `COMMITMENT_LEVEL`, `RPC_TIMEOUT_SECONDS` and
    /// `CONFIRMATION_TIMEOUT_SECONDS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let rpc_url = env::var("RPC_URL").unwrap_or_else(|_| DEFAULT_RPC_URL.to_string());

        let keypair_path = match env::var("KEYPAIR_PATH") {
            Ok(path) => PathBuf::from(path),
            Err(_) => default_keypair_path()?,
        };

        let program_id_str =
            env::var("MINT_PROGRAM_ID").map_err(|_| ConfigError::MissingEnv("MINT_PROGRAM_ID".to_string()))?;
        let program_id = Pubkey::from_str(&program_id_str).map_err(|e| ConfigError::InvalidValue {
            name: "MINT_PROGRAM_ID".to_string(),
            reason: e.to_string(),
        })?;

        let commitment = match env::var("COMMITMENT_LEVEL") {
            Ok(level) => {
                CommitmentConfig::from_str(&level).map_err(|e| ConfigError::InvalidValue {
                    name: "COMMITMENT_LEVEL".to_string(),
                    reason: e.to_string(),
                })?
            }
            Err(_) => CommitmentConfig::confirmed(),
        };

        let rpc_timeout_seconds =
            parse_seconds("RPC_TIMEOUT_SECONDS", DEFAULT_RPC_TIMEOUT_SECONDS)?;
        let confirmation_timeout = Duration::from_secs(parse_seconds(
            "CONFIRMATION_TIMEOUT_SECONDS",
            DEFAULT_CONFIRMATION_TIMEOUT_SECONDS,
        )?);

        Ok(Self {
            rpc_url,
            keypair_path,
            program_id,
            commitment,
            rpc_timeout_seconds,
            confirmation_timeout,
        })
    }
}

fn parse_seconds(name: &str, fallback: u64) -> Result<u64, ConfigError> {
    match env::var(name) {
        Ok(value) => value.parse::<u64>().map_err(|e| ConfigError::InvalidValue {
            name: name.to_string(),
            reason: e.to_string(),
        }),
        Err(_) => Ok(fallback),
    }
}

/// The Solana CLI default: `~/.config/solana/id.json`.
fn default_keypair_path() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::HomeDirectory)?;
    Ok(home.join(".config").join("solana").join("id.json"))
}
