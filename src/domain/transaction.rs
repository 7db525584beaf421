//! Transaction assembly and signing.
//!
//! Builds the single-instruction message with the authority as fee payer,
//! attaches the caller-supplied recent blockhash, and collects a signature
//! for every pubkey the message marks as a required signer. Signing is
//! entirely local; nothing leaves the process here.

use solana_sdk::{
    hash::Hash, instruction::Instruction, message::Message, pubkey::Pubkey,
    signature::Signature, transaction::Transaction,
};

use crate::services::{SignerError, SolanaSignTrait};

/// Produces a fully signed transaction or no transaction at all.
///
/// Each of the message's required signers must be matched by one of
/// `signers`; the first unmatched pubkey aborts with
/// [`SignerError::MissingSigner`] before anything is signed incompletely.
pub async fn build_signed_transaction(
    instructions: &[Instruction],
    payer: &Pubkey,
    recent_blockhash: Hash,
    signers: &[&dyn SolanaSignTrait],
) -> Result<Transaction, SignerError> {
    let message = Message::new_with_blockhash(instructions, Some(payer), &recent_blockhash);
    let mut transaction = Transaction::new_unsigned(message);

    let num_required = transaction.message.header.num_required_signatures as usize;
    transaction
        .signatures
        .resize(num_required, Signature::default());

    let mut available = Vec::with_capacity(signers.len());
    for signer in signers {
        available.push((signer.pubkey().await?, *signer));
    }

    let message_data = transaction.message_data();
    for index in 0..num_required {
        let required = transaction.message.account_keys[index];
        let signer = available
            .iter()
            .find(|(pubkey, _)| *pubkey == required)
            .map(|(_, signer)| *signer)
            .ok_or(SignerError::MissingSigner(required))?;

        transaction.signatures[index] = signer.sign(&message_data).await?;
    }

    // Invariant: every slot was filled above; a default signature would mean
    // an unsigned required signer slipped through.
    if transaction.signatures.iter().any(|s| *s == Signature::default()) {
        return Err(SignerError::SigningError(
            "transaction left with an unsigned required signer".to_string(),
        ));
    }

    Ok(transaction)
}
