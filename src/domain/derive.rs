//! Associated token account derivation.
//!
//! The holding account's address is not chosen; it is computed from the
//! owning wallet and the mint under the associated-token program. The
//! derivation is a pure function of its inputs, so it can be re-run anywhere
//! to verify an address without touching the network.

use solana_sdk::pubkey::Pubkey;
use spl_associated_token_account::get_associated_token_address;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DerivationError {
    #[error("derived token account {derived} does not match expected {expected}")]
    Mismatch { derived: Pubkey, expected: Pubkey },
}

/// Derives the associated token account for `owner` holding `mint`.
///
/// Deterministic and order-sensitive: swapping owner and mint yields a
/// different address. Exhaustion of the underlying bump-seed space is
/// treated as unreachable by the SDK and would panic there.
pub fn derive_token_account_address(owner: &Pubkey, mint: &Pubkey) -> Pubkey {
    get_associated_token_address(owner, mint)
}

/// Re-derives the token account for `(owner, mint)` and compares it with
/// `expected`.
pub fn verify_token_account_address(
    owner: &Pubkey,
    mint: &Pubkey,
    expected: &Pubkey,
) -> Result<(), DerivationError> {
    let derived = derive_token_account_address(owner, mint);
    if derived == *expected {
        Ok(())
    } else {
        Err(DerivationError::Mismatch {
            derived,
            expected: *expected,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_derivation_is_deterministic() {
        let owner = Pubkey::new_unique();
        let mint = Pubkey::new_unique();

        let first = derive_token_account_address(&owner, &mint);
        let second = derive_token_account_address(&owner, &mint);
        assert_eq!(first, second);
    }

    #[test]
    fn test_derivation_is_order_sensitive() {
        let owner = Pubkey::new_unique();
        let mint = Pubkey::new_unique();

        assert_ne!(
            derive_token_account_address(&owner, &mint),
            derive_token_account_address(&mint, &owner)
        );
    }

    #[test]
    fn test_different_inputs_yield_different_addresses() {
        let owner = Pubkey::new_unique();
        let mint_a = Pubkey::new_unique();
        let mint_b = Pubkey::new_unique();

        assert_ne!(
            derive_token_account_address(&owner, &mint_a),
            derive_token_account_address(&owner, &mint_b)
        );
    }

    #[test]
    fn test_verify_detects_altered_inputs() {
        let owner = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let derived = derive_token_account_address(&owner, &mint);

        assert_eq!(verify_token_account_address(&owner, &mint, &derived), Ok(()));

        let other_owner = Pubkey::new_unique();
        let result = verify_token_account_address(&other_owner, &mint, &derived);
        assert!(matches!(result, Err(DerivationError::Mismatch { .. })));

        let other_mint = Pubkey::new_unique();
        let result = verify_token_account_address(&owner, &other_mint, &derived);
        assert!(matches!(result, Err(DerivationError::Mismatch { .. })));
    }

    proptest! {
        #[test]
        fn test_round_trip_verification_holds_for_any_pair(
            owner_bytes in any::<[u8; 32]>(),
            mint_bytes in any::<[u8; 32]>(),
        ) {
            let owner = Pubkey::new_from_array(owner_bytes);
            let mint = Pubkey::new_from_array(mint_bytes);

            let derived = derive_token_account_address(&owner, &mint);
            prop_assert_eq!(derive_token_account_address(&owner, &mint), derived);
            prop_assert!(verify_token_account_address(&owner, &mint, &derived).is_ok());
        }
    }
}
