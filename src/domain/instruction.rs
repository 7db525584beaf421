//! Mint instruction assembly.

use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};

use crate::models::{AccountSlot, MintInstructionAccounts};

/// Builds the single invocation of the mint program.
///
/// The account list follows [`AccountSlot::ORDER`] with each slot's fixed
/// signer/writable flags; the instruction carries no data, the program reads
/// everything from the account layout.
pub fn build_mint_instruction(
    program_id: &Pubkey,
    accounts: &MintInstructionAccounts,
) -> Instruction {
    let account_metas = AccountSlot::ORDER
        .iter()
        .map(|slot| AccountMeta {
            pubkey: accounts.pubkey_for(*slot),
            is_signer: slot.is_signer(),
            is_writable: slot.is_writable(),
        })
        .collect();

    Instruction {
        program_id: *program_id,
        accounts: account_metas,
        data: Vec::new(),
    }
}
