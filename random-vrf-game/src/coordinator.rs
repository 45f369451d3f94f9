//! Client side of the VRF coordinator program, as much as the game needs
//! to place a request over CPI.

use {
    borsh::{BorshDeserialize, BorshSerialize},
    sha2::{Digest, Sha256},
    solana_program::{
        instruction::{AccountMeta, Instruction},
        program_error::ProgramError,
        pubkey::Pubkey,
        system_program,
    },
};

pub const NUM_WORDS: u32 = 1;
pub const MINIMUM_CONFIRMATIONS: u8 = 1;
pub const CALLBACK_GAS_LIMIT: u64 = 200_000;

const SEED_DOMAIN: &[u8] = b"random_vrf_game";

/// Coordinator instruction layout. Variant order has to match the
/// coordinator's own enum since borsh encodes the index.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub enum CoordinatorInstruction {
    CreateSubscription {
        min_balance: u64,
        confirmations: u8,
    },
    FundSubscription {
        amount: u64,
    },
    RequestRandomness {
        seed: [u8; 32],
        callback_data: Vec<u8>,
        num_words: u32,
        minimum_confirmations: u8,
        callback_gas_limit: u64,
    },
}

/// Seed for the `request_count`-th request of `game`.
pub fn request_seed(key_hash: &[u8; 32], game: &Pubkey, request_count: u64) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(SEED_DOMAIN);
    hasher.update(key_hash);
    hasher.update(game.as_ref());
    hasher.update(request_count.to_le_bytes());
    hasher.finalize().into()
}

pub fn request_randomness(
    vrf_coordinator: &Pubkey,
    requester: &Pubkey,
    request_account: &Pubkey,
    subscription: &Pubkey,
    seed: [u8; 32],
    callback_data: Vec<u8>,
) -> Result<Instruction, ProgramError> {
    let data = borsh::to_vec(&CoordinatorInstruction::RequestRandomness {
        seed,
        callback_data,
        num_words: NUM_WORDS,
        minimum_confirmations: MINIMUM_CONFIRMATIONS,
        callback_gas_limit: CALLBACK_GAS_LIMIT,
    })?;
    Ok(Instruction {
        program_id: *vrf_coordinator,
        accounts: vec![
            AccountMeta::new(*requester, true),
            AccountMeta::new(*request_account, false),
            AccountMeta::new_readonly(*subscription, false),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_randomness_variant_index() {
        let ix = request_randomness(
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
            [7; 32],
            vec![2],
        )
        .unwrap();
        assert_eq!(ix.data[0], 2);
        assert!(ix.accounts[0].is_signer);
        assert!(ix.accounts[1].is_writable);
    }

    #[test]
    fn test_request_seed_depends_on_every_input() {
        let game = Pubkey::new_unique();
        let seed = request_seed(&[1; 32], &game, 0);
        assert_eq!(seed, request_seed(&[1; 32], &game, 0));
        assert_ne!(seed, request_seed(&[1; 32], &game, 1));
        assert_ne!(seed, request_seed(&[2; 32], &game, 0));
        assert_ne!(seed, request_seed(&[1; 32], &Pubkey::new_unique(), 0));
    }
}
