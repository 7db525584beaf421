//! Account layout of the mint program invocation.
//!
//! The on-chain program takes no instruction data; everything it needs is
//! communicated through the order of the accounts passed to it. That order,
//! together with the signer/writable flag of each position, is a wire
//! contract: the program offers no way to detect a reordering on the client
//! side, it simply misreads the accounts. The layout is therefore modelled as
//! an enumeration of named slots rather than positional literals, so tests
//! can assert on slot identity.

use serde::Serialize;
use solana_sdk::{pubkey::Pubkey, system_program, sysvar};

/// One position in the mint instruction's account list.
///
/// `ORDER` is the exact sequence the on-chain program expects. The first
/// three slots vary per invocation; the remaining four are well-known
/// program/sysvar addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AccountSlot {
    /// The mint account being created. Signs because the system program
    /// creates it as a fresh account.
    Mint,
    /// The associated token account that will hold the minted token.
    TokenAccount,
    /// The wallet that pays fees and becomes the mint authority.
    MintAuthority,
    RentSysvar,
    SystemProgram,
    TokenProgram,
    AssociatedTokenProgram,
}

impl AccountSlot {
    /// The protocol-defined account order, all seven slots.
    pub const ORDER: [AccountSlot; 7] = [
        AccountSlot::Mint,
        AccountSlot::TokenAccount,
        AccountSlot::MintAuthority,
        AccountSlot::RentSysvar,
        AccountSlot::SystemProgram,
        AccountSlot::TokenProgram,
        AccountSlot::AssociatedTokenProgram,
    ];

    pub fn is_signer(&self) -> bool {
        matches!(self, AccountSlot::Mint | AccountSlot::MintAuthority)
    }

    pub fn is_writable(&self) -> bool {
        matches!(self, AccountSlot::Mint | AccountSlot::TokenAccount)
    }
}

/// The per-invocation addresses feeding the variable slots of the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MintInstructionAccounts {
    /// Freshly generated mint account.
    pub mint: Pubkey,
    /// Associated token account derived from (authority, mint).
    pub token_account: Pubkey,
    /// Wallet authority; also the transaction fee payer.
    pub authority: Pubkey,
}

impl MintInstructionAccounts {
    /// Resolves a slot to its concrete address for this invocation.
    pub fn pubkey_for(&self, slot: AccountSlot) -> Pubkey {
        match slot {
            AccountSlot::Mint => self.mint,
            AccountSlot::TokenAccount => self.token_account,
            AccountSlot::MintAuthority => self.authority,
            AccountSlot::RentSysvar => sysvar::rent::id(),
            AccountSlot::SystemProgram => system_program::id(),
            AccountSlot::TokenProgram => spl_token::id(),
            AccountSlot::AssociatedTokenProgram => spl_associated_token_account::id(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_order_has_seven_entries() {
        assert_eq!(AccountSlot::ORDER.len(), 7);
    }

    #[test]
    fn test_slot_flags_match_program_contract() {
        let expected = [
            (AccountSlot::Mint, true, true),
            (AccountSlot::TokenAccount, false, true),
            (AccountSlot::MintAuthority, true, false),
            (AccountSlot::RentSysvar, false, false),
            (AccountSlot::SystemProgram, false, false),
            (AccountSlot::TokenProgram, false, false),
            (AccountSlot::AssociatedTokenProgram, false, false),
        ];

        for (i, (slot, is_signer, is_writable)) in expected.iter().enumerate() {
            assert_eq!(AccountSlot::ORDER[i], *slot);
            assert_eq!(slot.is_signer(), *is_signer, "signer flag for {slot:?}");
            assert_eq!(slot.is_writable(), *is_writable, "writable flag for {slot:?}");
        }
    }

    #[test]
    fn test_fixed_slots_resolve_to_well_known_ids() {
        let accounts = MintInstructionAccounts {
            mint: Pubkey::new_unique(),
            token_account: Pubkey::new_unique(),
            authority: Pubkey::new_unique(),
        };

        assert_eq!(accounts.pubkey_for(AccountSlot::Mint), accounts.mint);
        assert_eq!(
            accounts.pubkey_for(AccountSlot::TokenAccount),
            accounts.token_account
        );
        assert_eq!(
            accounts.pubkey_for(AccountSlot::MintAuthority),
            accounts.authority
        );
        assert_eq!(accounts.pubkey_for(AccountSlot::RentSysvar), sysvar::rent::id());
        assert_eq!(
            accounts.pubkey_for(AccountSlot::SystemProgram),
            system_program::id()
        );
        assert_eq!(accounts.pubkey_for(AccountSlot::TokenProgram), spl_token::id());
        assert_eq!(
            accounts.pubkey_for(AccountSlot::AssociatedTokenProgram),
            spl_associated_token_account::id()
        );
    }
}
