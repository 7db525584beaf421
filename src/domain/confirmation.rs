//! Submission and confirmation wait.
//!
//! Sends the signed transaction once, then polls the signature's status in an
//! explicit loop with exponential backoff until a terminal state or the
//! deadline. The loop never resubmits: the same signed bytes sent again after
//! they may already be partially visible would risk a duplicate effect, so
//! recovery is left to the caller with a rebuilt transaction.

use log::{debug, info, warn};
use solana_sdk::{signature::Signature, transaction::Transaction};
use std::time::{Duration, Instant};

use crate::constants::{
    CONFIRMATION_INITIAL_POLL_INTERVAL_MILLIS, CONFIRMATION_MAX_POLL_INTERVAL_MILLIS,
    DEFAULT_CONFIRMATION_TIMEOUT_SECONDS,
};
use crate::models::{ConfirmationOutcome, ConfirmationStatus, TransactionSignatureStatus};
use crate::services::{SolanaProviderError, SolanaProviderTrait};

/// Bounds for the confirmation wait.
#[derive(Debug, Clone)]
pub struct ConfirmationConfig {
    pub timeout: Duration,
    pub initial_poll_interval: Duration,
    pub max_poll_interval: Duration,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_CONFIRMATION_TIMEOUT_SECONDS),
            initial_poll_interval: Duration::from_millis(CONFIRMATION_INITIAL_POLL_INTERVAL_MILLIS),
            max_poll_interval: Duration::from_millis(CONFIRMATION_MAX_POLL_INTERVAL_MILLIS),
        }
    }
}

/// Submits `transaction` and waits for a terminal status.
///
/// Success is reported only at `Finalized`; a `Confirmed` observation is
/// logged as progress but the wait continues, since that level can still be
/// rolled back. Status-query errors during the wait are logged and polling
/// continues (the signature is often not yet visible right after
/// submission). Only the submission itself failing aborts with an error.
///
/// Reaching the deadline yields [`ConfirmationOutcome::TimedOut`] with the
/// last observed status; the transaction may still land afterwards.
pub async fn submit_and_confirm<P>(
    provider: &P,
    transaction: &Transaction,
    config: &ConfirmationConfig,
) -> Result<(Signature, ConfirmationOutcome), SolanaProviderError>
where
    P: SolanaProviderTrait + ?Sized,
{
    debug!(
        "submitting transaction, status: {}",
        ConfirmationStatus::Unsent
    );
    let signature = provider.send_transaction(transaction).await?;
    let mut status = ConfirmationStatus::Submitted;
    info!("transaction {signature} submitted, waiting for finality");

    let started = Instant::now();
    let mut poll_interval = config.initial_poll_interval;

    loop {
        match provider.get_transaction_status(&signature).await {
            Ok(observed) => {
                let observed = match observed {
                    TransactionSignatureStatus::Processed => ConfirmationStatus::Submitted,
                    TransactionSignatureStatus::Confirmed => ConfirmationStatus::Confirmed,
                    TransactionSignatureStatus::Finalized => ConfirmationStatus::Finalized,
                    TransactionSignatureStatus::Failed(reason) => {
                        ConfirmationStatus::Failed(reason)
                    }
                };

                if observed != status {
                    info!("transaction {signature} status: {observed}");
                    status = observed;
                }

                match &status {
                    ConfirmationStatus::Finalized => {
                        return Ok((signature, ConfirmationOutcome::Finalized));
                    }
                    ConfirmationStatus::Failed(reason) => {
                        return Ok((signature, ConfirmationOutcome::Failed(reason.clone())));
                    }
                    _ => {}
                }
            }
            Err(e) => {
                warn!("status query for {signature} failed, still polling: {e}");
            }
        }

        if started.elapsed() >= config.timeout {
            warn!(
                "gave up waiting for {signature} after {:?}; last observed status: {status}",
                config.timeout
            );
            return Ok((signature, ConfirmationOutcome::TimedOut(status)));
        }

        tokio::time::sleep(poll_interval).await;
        poll_interval = std::cmp::min(poll_interval * 2, config.max_poll_interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::MockSolanaProviderTrait;
    use solana_sdk::{hash::Hash, message::Message, signature::Keypair, signer::Signer};

    fn test_transaction() -> Transaction {
        let payer = Keypair::new();
        let message = Message::new_with_blockhash(
            &[],
            Some(&payer.pubkey()),
            &Hash::new_unique(),
        );
        Transaction::new_unsigned(message)
    }

    fn fast_config() -> ConfirmationConfig {
        ConfirmationConfig {
            timeout: Duration::from_millis(200),
            initial_poll_interval: Duration::from_millis(5),
            max_poll_interval: Duration::from_millis(10),
        }
    }

    fn test_signature() -> Signature {
        Signature::from([7u8; 64])
    }

    #[tokio::test]
    async fn test_finalized_after_one_poll() {
        let mut provider = MockSolanaProviderTrait::new();
        let signature = test_signature();

        provider
            .expect_send_transaction()
            .times(1)
            .returning(move |_| Box::pin(async move { Ok(signature) }));
        provider
            .expect_get_transaction_status()
            .times(1)
            .returning(|_| Box::pin(async { Ok(TransactionSignatureStatus::Finalized) }));

        let (returned, outcome) = submit_and_confirm(&provider, &test_transaction(), &fast_config())
            .await
            .unwrap();

        assert_eq!(returned, signature);
        assert_eq!(outcome, ConfirmationOutcome::Finalized);
    }

    #[tokio::test]
    async fn test_confirmed_does_not_end_the_wait() {
        let mut provider = MockSolanaProviderTrait::new();
        let signature = test_signature();

        provider
            .expect_send_transaction()
            .times(1)
            .returning(move |_| Box::pin(async move { Ok(signature) }));

        let mut polls = 0;
        provider
            .expect_get_transaction_status()
            .returning(move |_| {
                polls += 1;
                let status = if polls < 3 {
                    TransactionSignatureStatus::Confirmed
                } else {
                    TransactionSignatureStatus::Finalized
                };
                Box::pin(async move { Ok(status) })
            });

        let (_, outcome) = submit_and_confirm(&provider, &test_transaction(), &fast_config())
            .await
            .unwrap();

        assert_eq!(outcome, ConfirmationOutcome::Finalized);
    }

    #[tokio::test]
    async fn test_timeout_is_distinct_from_failure() {
        let mut provider = MockSolanaProviderTrait::new();
        let signature = test_signature();

        provider
            .expect_send_transaction()
            .times(1)
            .returning(move |_| Box::pin(async move { Ok(signature) }));
        provider
            .expect_get_transaction_status()
            .returning(|_| Box::pin(async { Ok(TransactionSignatureStatus::Processed) }));

        let (_, outcome) = submit_and_confirm(&provider, &test_transaction(), &fast_config())
            .await
            .unwrap();

        assert_eq!(
            outcome,
            ConfirmationOutcome::TimedOut(ConfirmationStatus::Submitted)
        );
    }

    #[tokio::test]
    async fn test_on_chain_failure_surfaces_reason_verbatim() {
        let mut provider = MockSolanaProviderTrait::new();
        let signature = test_signature();

        provider
            .expect_send_transaction()
            .times(1)
            .returning(move |_| Box::pin(async move { Ok(signature) }));
        provider.expect_get_transaction_status().returning(|_| {
            Box::pin(async {
                Ok(TransactionSignatureStatus::Failed(
                    "Error processing Instruction 0: custom program error: 0x1".to_string(),
                ))
            })
        });

        let (_, outcome) = submit_and_confirm(&provider, &test_transaction(), &fast_config())
            .await
            .unwrap();

        assert_eq!(
            outcome,
            ConfirmationOutcome::Failed(
                "Error processing Instruction 0: custom program error: 0x1".to_string()
            )
        );
    }

    #[tokio::test]
    async fn test_submission_error_aborts() {
        let mut provider = MockSolanaProviderTrait::new();

        provider.expect_send_transaction().times(1).returning(|_| {
            Box::pin(async {
                Err(SolanaProviderError::BlockhashNotFound(
                    "blockhash expired".to_string(),
                ))
            })
        });
        provider.expect_get_transaction_status().times(0);

        let result = submit_and_confirm(&provider, &test_transaction(), &fast_config()).await;
        assert!(matches!(
            result,
            Err(SolanaProviderError::BlockhashNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_status_query_errors_are_tolerated() {
        let mut provider = MockSolanaProviderTrait::new();
        let signature = test_signature();

        provider
            .expect_send_transaction()
            .times(1)
            .returning(move |_| Box::pin(async move { Ok(signature) }));

        let mut polls = 0;
        provider
            .expect_get_transaction_status()
            .returning(move |_| {
                polls += 1;
                let result = if polls == 1 {
                    Err(SolanaProviderError::RpcError(
                        "Transaction confirmation status not available".to_string(),
                    ))
                } else {
                    Ok(TransactionSignatureStatus::Finalized)
                };
                Box::pin(async move { result })
            });

        let (_, outcome) = submit_and_confirm(&provider, &test_transaction(), &fast_config())
            .await
            .unwrap();

        assert_eq!(outcome, ConfirmationOutcome::Finalized);
    }
}
