//! Signing layer.
//!
//! A freshly generated mint keypair and a wallet keypair loaded from disk
//! differ only in provenance; both sit behind [`SolanaSignTrait`], the single
//! capability the transaction builder consumes. The factory picks the
//! provenance.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
};
use std::{fmt, fs, path::{Path, PathBuf}};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SignerError {
    /// Unreadable or malformed key material; configuration-sourced, fatal.
    #[error("Invalid key material: {0}")]
    KeyError(String),

    #[error("Signing error: {0}")]
    SigningError(String),

    /// The transaction names this pubkey as a required signer but no keypair
    /// for it was supplied. The transaction must not be submitted.
    #[error("Missing required signer: {0}")]
    MissingSigner(Pubkey),
}

/// Solana-specific signing operations.
#[async_trait]
#[cfg_attr(test, automock)]
pub trait SolanaSignTrait: Send + Sync {
    /// The public key this signer produces signatures for.
    async fn pubkey(&self) -> Result<Pubkey, SignerError>;

    /// Signs the serialized transaction message.
    async fn sign(&self, message: &[u8]) -> Result<Signature, SignerError>;
}

/// In-memory ed25519 signer.
pub struct LocalSigner {
    keypair: Keypair,
}

impl LocalSigner {
    /// Generates an ephemeral keypair from the OS RNG.
    pub fn generate() -> Self {
        Self {
            keypair: Keypair::new(),
        }
    }

    /// Builds a signer from the 64-byte secret-plus-public representation.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SignerError> {
        let keypair = Keypair::try_from(bytes)
            .map_err(|e| SignerError::KeyError(format!("invalid keypair bytes: {e}")))?;
        Ok(Self { keypair })
    }

    /// Loads a signer from a Solana CLI keypair file (a JSON byte array).
    pub fn from_keypair_file(path: impl AsRef<Path>) -> Result<Self, SignerError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| {
            SignerError::KeyError(format!("failed to read keypair file {}: {e}", path.display()))
        })?;
        let bytes: Vec<u8> = serde_json::from_str(&raw).map_err(|e| {
            SignerError::KeyError(format!(
                "keypair file {} is not a JSON byte array: {e}",
                path.display()
            ))
        })?;
        Self::from_bytes(&bytes)
    }
}

// Secret bytes stay out of Debug output and logs.
impl fmt::Debug for LocalSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalSigner")
            .field("pubkey", &self.keypair.pubkey())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl SolanaSignTrait for LocalSigner {
    async fn pubkey(&self) -> Result<Pubkey, SignerError> {
        Ok(self.keypair.pubkey())
    }

    async fn sign(&self, message: &[u8]) -> Result<Signature, SignerError> {
        Ok(self.keypair.sign_message(message))
    }
}

/// Where a signer's key material comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignerSource {
    /// Fresh keypair from the OS RNG (used for the mint account).
    Generated,
    /// Solana CLI keypair file (used for the wallet authority).
    KeypairFile(PathBuf),
}

pub struct SolanaSignerFactory;

impl SolanaSignerFactory {
    pub fn create_signer(source: &SignerSource) -> Result<LocalSigner, SignerError> {
        match source {
            SignerSource::Generated => Ok(LocalSigner::generate()),
            SignerSource::KeypairFile(path) => LocalSigner::from_keypair_file(path),
        }
    }
}
