//! One-shot client that mints a new token through a fixed on-chain program.
//!
//! Loads the wallet authority from the Solana CLI keypair file, generates a
//! fresh mint keypair, derives the associated token account, and submits a
//! single seven-account instruction to the configured program. Exits zero
//! only once the transaction is finalized; a timed-out wait exits non-zero
//! with a message distinguishing it from an on-chain failure.

use dotenvy::dotenv;
use eyre::eyre;
use log::info;

mod config;
mod constants;
mod domain;
mod logging;
mod models;
mod services;

use config::AppConfig;
use domain::{run_mint_pipeline, ConfirmationConfig};
use models::ConfirmationOutcome;
use services::{SignerSource, SolanaProvider, SolanaSignTrait, SolanaSignerFactory};

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    dotenv().ok();
    color_eyre::install()?;
    logging::setup_logging();

    let config = AppConfig::from_env()?;
    info!("Using Solana RPC endpoint {}", config.rpc_url);

    let provider = SolanaProvider::new(
        &config.rpc_url,
        config.rpc_timeout_seconds,
        config.commitment,
    )?;

    let authority = SolanaSignerFactory::create_signer(&SignerSource::KeypairFile(
        config.keypair_path.clone(),
    ))?;
    info!("Wallet authority loaded: {}", authority.pubkey().await?);
    info!("Mint program: {}", config.program_id);

    let confirmation = ConfirmationConfig {
        timeout: config.confirmation_timeout,
        ..Default::default()
    };

    let receipt =
        run_mint_pipeline(&provider, &authority, &config.program_id, &confirmation).await?;
    info!("Mint receipt: {}", serde_json::to_string(&receipt)?);

    match receipt.outcome {
        ConfirmationOutcome::Finalized => {
            info!(
                "Token {} finalized in transaction {}",
                receipt.mint, receipt.signature
            );
            Ok(())
        }
        ConfirmationOutcome::Failed(reason) => Err(eyre!(
            "mint transaction {} rejected on chain: {reason}",
            receipt.signature
        )),
        ConfirmationOutcome::TimedOut(last_status) => Err(eyre!(
            "confirmation wait for {} timed out (last observed status: {last_status}); \
             the transaction may still land",
            receipt.signature
        )),
    }
}
