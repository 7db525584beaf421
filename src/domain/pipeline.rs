//! One-shot mint pipeline.
//!
//! Wires the stages together: derive the holding account, assemble the
//! seven-account instruction, fetch a recent blockhash, sign with the wallet
//! authority and the fresh mint keypair, then submit and wait. Each run owns
//! its keypairs and provider handle; nothing is kept across invocations.

use log::info;
use serde::Serialize;
use solana_sdk::{pubkey::Pubkey, signature::Signature};
use thiserror::Error;

use crate::domain::{
    build_mint_instruction, build_signed_transaction, derive_token_account_address,
    submit_and_confirm, verify_token_account_address, ConfirmationConfig, DerivationError,
};
use crate::models::{ConfirmationOutcome, MintInstructionAccounts};
use crate::services::{
    SignerError, SignerSource, SolanaProviderError, SolanaProviderTrait, SolanaSignTrait,
    SolanaSignerFactory,
};

/// Pipeline failure, tagged with the stage that produced it.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("address derivation failed: {0}")]
    Derivation(#[from] DerivationError),

    #[error("transaction signing failed: {0}")]
    Signer(#[from] SignerError),

    #[error("network operation failed: {0}")]
    Provider(#[from] SolanaProviderError),
}

/// What a pipeline run produced.
#[derive(Debug, Clone, Serialize)]
pub struct MintReceipt {
    pub mint: Pubkey,
    pub token_account: Pubkey,
    pub signature: Signature,
    pub outcome: ConfirmationOutcome,
}

/// Runs the full mint flow once.
///
/// The mint keypair is generated here and dropped with the run; only its
/// public half survives in the receipt. A non-`Finalized` outcome is not an
/// `Err`: the pipeline itself succeeded in submitting, and the caller decides
/// how to treat failure and timeout.
pub async fn run_mint_pipeline<P, S>(
    provider: &P,
    authority: &S,
    program_id: &Pubkey,
    confirmation: &ConfirmationConfig,
) -> Result<MintReceipt, PipelineError>
where
    P: SolanaProviderTrait + ?Sized,
    S: SolanaSignTrait,
{
    let authority_pubkey = authority.pubkey().await?;

    let mint_signer = SolanaSignerFactory::create_signer(&SignerSource::Generated)?;
    let mint = mint_signer.pubkey().await?;
    info!("minting new token {mint} with authority {authority_pubkey}");

    let token_account = derive_token_account_address(&authority_pubkey, &mint);
    verify_token_account_address(&authority_pubkey, &mint, &token_account)?;
    info!("derived associated token account {token_account}");

    let instruction = build_mint_instruction(
        program_id,
        &MintInstructionAccounts {
            mint,
            token_account,
            authority: authority_pubkey,
        },
    );

    let recent_blockhash = provider.get_latest_blockhash().await?;
    let transaction = build_signed_transaction(
        &[instruction],
        &authority_pubkey,
        recent_blockhash,
        &[authority as &dyn SolanaSignTrait, &mint_signer],
    )
    .await?;

    let (signature, outcome) = submit_and_confirm(provider, &transaction, confirmation).await?;

    Ok(MintReceipt {
        mint,
        token_account,
        signature,
        outcome,
    })
}
