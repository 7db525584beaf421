//! Solana RPC provider.
//!
//! Thin abstraction over the non-blocking `RpcClient` covering the three
//! logical operations the mint pipeline needs from the network: fetching a
//! recent blockhash, submitting a signed transaction, and querying a
//! signature's confirmation status. Errors are classified into transient and
//! permanent so the retry layer knows which requests are safe to re-issue.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::Serialize;
use solana_client::{
    client_error::{ClientError, ClientErrorKind},
    nonblocking::rpc_client::RpcClient,
};
use solana_sdk::{
    commitment_config::CommitmentConfig, hash::Hash, signature::Signature,
    transaction::Transaction,
};
use std::{sync::Arc, time::Duration};
use thiserror::Error;

use super::{retry_with_backoff, ProviderError, RetryConfig};
use crate::models::TransactionSignatureStatus;

/// Matches an error pattern ignoring case and spacing, so that
/// "Blockhash not found" and "blockhashnotfound" both hit.
fn matches_error_pattern(error_msg: &str, pattern: &str) -> bool {
    let normalized_msg = error_msg.to_lowercase().replace(' ', "");
    let normalized_pattern = pattern.to_lowercase().replace(' ', "");
    normalized_msg.contains(&normalized_pattern)
}

/// Errors surfaced by the Solana provider.
///
/// `is_transient()` decides whether the retry layer may re-issue the request.
#[derive(Error, Debug, Serialize)]
pub enum SolanaProviderError {
    /// Connection issue or timeout; safe to retry.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// RPC-level problem such as node lag; safe to retry.
    #[error("RPC error: {0}")]
    RpcError(String),

    /// HTTP error; retriability depends on the status code.
    #[error("Request error (HTTP {status_code}): {error}")]
    RequestError { error: String, status_code: u16 },

    /// The attached blockhash is unknown or expired. Retrying the same signed
    /// bytes is pointless; the caller must rebuild with a fresh blockhash.
    #[error("Blockhash not found or expired: {0}")]
    BlockhashNotFound(String),

    /// The fee payer cannot cover the transaction fee.
    #[error("Insufficient funds for transaction: {0}")]
    InsufficientFunds(String),

    /// Malformed transaction or execution rejected by the invoked program.
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),

    /// The same signed transaction already landed.
    #[error("Transaction already processed: {0}")]
    AlreadyProcessed(String),
}

impl SolanaProviderError {
    /// Transient errors may be retried as-is; permanent ones must surface.
    pub fn is_transient(&self) -> bool {
        match self {
            SolanaProviderError::NetworkError(_) => true,
            SolanaProviderError::RpcError(_) => true,

            SolanaProviderError::RequestError { status_code, .. } => match *status_code {
                // Not Implemented / HTTP Version Not Supported stay broken
                501 | 505 => false,
                500 | 502..=504 | 506..=599 => true,
                // timeout and rate-limit responses clear up on their own
                408 | 425 | 429 => true,
                _ => false,
            },

            SolanaProviderError::BlockhashNotFound(_) => false,
            SolanaProviderError::InsufficientFunds(_) => false,
            SolanaProviderError::InvalidTransaction(_) => false,
            SolanaProviderError::AlreadyProcessed(_) => false,
        }
    }

    /// Classifies a Solana RPC client error into a provider error variant.
    pub fn from_rpc_error(error: ClientError) -> Self {
        match error.kind() {
            ClientErrorKind::Io(_) => SolanaProviderError::NetworkError(error.to_string()),

            ClientErrorKind::Reqwest(reqwest_err) => {
                if let Some(status) = reqwest_err.status() {
                    SolanaProviderError::RequestError {
                        error: error.to_string(),
                        status_code: status.as_u16(),
                    }
                } else {
                    SolanaProviderError::NetworkError(error.to_string())
                }
            }

            ClientErrorKind::RpcError(rpc_err) => {
                let rpc_err_str = format!("{rpc_err}");
                Self::from_rpc_response_error(&rpc_err_str, &error)
            }

            ClientErrorKind::TransactionError(tx_error) => {
                Self::from_transaction_error(tx_error, &error)
            }

            ClientErrorKind::Custom(msg) => Self::from_rpc_response_error(msg, &error),

            _ => SolanaProviderError::RpcError(error.to_string()),
        }
    }

    /// Classification by JSON-RPC error code, falling back to message
    /// patterns for codes without a dedicated mapping.
    ///
    /// Transient: -32004 (block not available), -32005 (node behind),
    /// -32014 (block status pending), -32016 (context slot not reached).
    /// Permanent: -32002 (simulation failed), -32003 (signature verification),
    /// -32009 (already processed), -32013 (signature length mismatch),
    /// -32015 (unsupported version), -32602 (invalid params).
    /// -32008 (blockhash not found) requires a rebuilt transaction.
    fn from_rpc_response_error(rpc_err: &str, full_error: &ClientError) -> Self {
        if rpc_err.contains("-32002") {
            if matches_error_pattern(rpc_err, "blockhash not found") {
                SolanaProviderError::BlockhashNotFound(full_error.to_string())
            } else if matches_error_pattern(rpc_err, "insufficient funds") {
                SolanaProviderError::InsufficientFunds(full_error.to_string())
            } else {
                SolanaProviderError::InvalidTransaction(full_error.to_string())
            }
        } else if rpc_err.contains("-32003")
            || rpc_err.contains("-32013")
            || rpc_err.contains("-32015")
            || rpc_err.contains("-32602")
        {
            SolanaProviderError::InvalidTransaction(full_error.to_string())
        } else if rpc_err.contains("-32008") {
            SolanaProviderError::BlockhashNotFound(full_error.to_string())
        } else if rpc_err.contains("-32009") {
            SolanaProviderError::AlreadyProcessed(full_error.to_string())
        } else if rpc_err.contains("-32004")
            || rpc_err.contains("-32005")
            || rpc_err.contains("-32014")
            || rpc_err.contains("-32016")
        {
            SolanaProviderError::RpcError(full_error.to_string())
        } else if matches_error_pattern(rpc_err, "insufficient funds") {
            SolanaProviderError::InsufficientFunds(full_error.to_string())
        } else if matches_error_pattern(rpc_err, "blockhash not found") {
            SolanaProviderError::BlockhashNotFound(full_error.to_string())
        } else if matches_error_pattern(rpc_err, "already processed") {
            SolanaProviderError::AlreadyProcessed(full_error.to_string())
        } else {
            // Unknown codes default to a retriable RPC error
            SolanaProviderError::RpcError(full_error.to_string())
        }
    }

    /// Classifies a structured `TransactionError` from the SDK.
    fn from_transaction_error(
        tx_error: &solana_sdk::transaction::TransactionError,
        full_error: &ClientError,
    ) -> Self {
        use solana_sdk::transaction::TransactionError as TxErr;

        match tx_error {
            TxErr::InsufficientFundsForFee | TxErr::InsufficientFundsForRent { .. } => {
                SolanaProviderError::InsufficientFunds(full_error.to_string())
            }

            TxErr::BlockhashNotFound => {
                SolanaProviderError::BlockhashNotFound(full_error.to_string())
            }

            TxErr::AlreadyProcessed => {
                SolanaProviderError::AlreadyProcessed(full_error.to_string())
            }

            TxErr::SignatureFailure
            | TxErr::MissingSignatureForFee
            | TxErr::InvalidAccountForFee
            | TxErr::AccountNotFound
            | TxErr::InvalidAccountIndex
            | TxErr::InvalidProgramForExecution
            | TxErr::ProgramAccountNotFound
            | TxErr::InstructionError(_, _)
            | TxErr::InvalidWritableAccount
            | TxErr::InvalidRentPayingAccount => {
                SolanaProviderError::InvalidTransaction(full_error.to_string())
            }

            TxErr::AccountInUse | TxErr::AccountLoadedTwice | TxErr::ClusterMaintenance => {
                SolanaProviderError::RpcError(full_error.to_string())
            }

            // Anything unmapped is treated as transient
            _ => SolanaProviderError::RpcError(full_error.to_string()),
        }
    }
}

/// The three network operations the mint pipeline depends on.
#[async_trait]
#[cfg_attr(test, automock)]
pub trait SolanaProviderTrait: Send + Sync {
    /// Retrieves a recent blockhash to bound the transaction's validity.
    async fn get_latest_blockhash(&self) -> Result<Hash, SolanaProviderError>;

    /// Submits a fully signed transaction; returns its signature.
    async fn send_transaction(
        &self,
        transaction: &Transaction,
    ) -> Result<Signature, SolanaProviderError>;

    /// Queries the commitment level the cluster reports for a signature.
    async fn get_transaction_status(
        &self,
        signature: &Signature,
    ) -> Result<TransactionSignatureStatus, SolanaProviderError>;
}

/// Provider backed by a single RPC endpoint.
pub struct SolanaProvider {
    client: Arc<RpcClient>,
    retry_config: RetryConfig,
}

impl SolanaProvider {
    pub fn new(
        url: &str,
        timeout_seconds: u64,
        commitment: CommitmentConfig,
    ) -> Result<Self, ProviderError> {
        let rpc_url: reqwest::Url = url.parse().map_err(|e| {
            ProviderError::NetworkConfiguration(format!("Invalid RPC URL {url}: {e}"))
        })?;

        let client = RpcClient::new_with_timeout_and_commitment(
            rpc_url.to_string(),
            Duration::from_secs(timeout_seconds),
            commitment,
        );

        Ok(Self {
            client: Arc::new(client),
            retry_config: RetryConfig::from_env(),
        })
    }

    /// Retry helper for RPC calls; transient errors are re-issued with
    /// backoff, everything else surfaces immediately.
    async fn retry_rpc_call<T, F, Fut>(
        &self,
        operation_name: &str,
        operation: F,
    ) -> Result<T, SolanaProviderError>
    where
        F: Fn(Arc<RpcClient>) -> Fut,
        Fut: std::future::Future<Output = Result<T, SolanaProviderError>>,
    {
        retry_with_backoff(
            operation_name,
            &self.retry_config,
            SolanaProviderError::is_transient,
            || operation(Arc::clone(&self.client)),
        )
        .await
    }
}

#[async_trait]
impl SolanaProviderTrait for SolanaProvider {
    async fn get_latest_blockhash(&self) -> Result<Hash, SolanaProviderError> {
        self.retry_rpc_call("get_latest_blockhash", |client| async move {
            client
                .get_latest_blockhash()
                .await
                .map_err(SolanaProviderError::from_rpc_error)
        })
        .await
    }

    /// Submission is a single attempt. Once the bytes may have reached the
    /// network, re-sending them risks duplicate-effect ambiguity; recovery is
    /// the caller's job, with a fresh blockhash and a newly built transaction.
    async fn send_transaction(
        &self,
        transaction: &Transaction,
    ) -> Result<Signature, SolanaProviderError> {
        self.client
            .send_transaction(transaction)
            .await
            .map_err(SolanaProviderError::from_rpc_error)
    }

    async fn get_transaction_status(
        &self,
        signature: &Signature,
    ) -> Result<TransactionSignatureStatus, SolanaProviderError> {
        let result = self
            .retry_rpc_call("get_transaction_status", |client| async move {
                client
                    .get_signature_statuses_with_history(&[*signature])
                    .await
                    .map_err(SolanaProviderError::from_rpc_error)
            })
            .await?;

        match result.value.first() {
            Some(Some(status)) => {
                if let Some(err) = &status.err {
                    Ok(TransactionSignatureStatus::Failed(err.to_string()))
                } else if status.satisfies_commitment(CommitmentConfig::finalized()) {
                    Ok(TransactionSignatureStatus::Finalized)
                } else if status.satisfies_commitment(CommitmentConfig::confirmed()) {
                    Ok(TransactionSignatureStatus::Confirmed)
                } else {
                    Ok(TransactionSignatureStatus::Processed)
                }
            }
            _ => Err(SolanaProviderError::RpcError(
                "Transaction confirmation status not available".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_error_pattern_ignores_case_and_spacing() {
        assert!(matches_error_pattern(
            "Transaction simulation failed: BlockhashNotFound",
            "blockhash not found"
        ));
        assert!(matches_error_pattern(
            "error: insufficient funds for fee",
            "Insufficient Funds"
        ));
        assert!(!matches_error_pattern("node is behind", "blockhash not found"));
    }

    #[test]
    fn test_transient_classification() {
        assert!(SolanaProviderError::NetworkError("io".into()).is_transient());
        assert!(SolanaProviderError::RpcError("behind".into()).is_transient());

        assert!(!SolanaProviderError::BlockhashNotFound("expired".into()).is_transient());
        assert!(!SolanaProviderError::InsufficientFunds("fee".into()).is_transient());
        assert!(!SolanaProviderError::InvalidTransaction("bad".into()).is_transient());
        assert!(!SolanaProviderError::AlreadyProcessed("dup".into()).is_transient());
    }

    #[test]
    fn test_request_error_transient_by_status_code() {
        let request_error = |status_code| SolanaProviderError::RequestError {
            error: "http".to_string(),
            status_code,
        };

        assert!(request_error(500).is_transient());
        assert!(request_error(502).is_transient());
        assert!(request_error(429).is_transient());
        assert!(request_error(408).is_transient());

        assert!(!request_error(501).is_transient());
        assert!(!request_error(400).is_transient());
        assert!(!request_error(404).is_transient());
    }

    #[test]
    fn test_provider_rejects_invalid_url() {
        let result = SolanaProvider::new("not a url", 30, CommitmentConfig::confirmed());
        assert!(matches!(
            result,
            Err(ProviderError::NetworkConfiguration(_))
        ));
    }

    #[test]
    fn test_provider_accepts_valid_url() {
        let result = SolanaProvider::new(
            "https://api.devnet.solana.com",
            30,
            CommitmentConfig::confirmed(),
        );
        assert!(result.is_ok());
    }
}
