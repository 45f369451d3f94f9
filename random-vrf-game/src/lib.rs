//! On-chain game that draws a number between 1 and 100 from a VRF coordinator.
//!
//! A game is deployed by `Initialize`, which records the deployer as owner
//! together with the coordinator, subscription and key hash. The owner asks
//! for randomness with `RequestRandomness` and the coordinator answers through
//! the `ConsumeRandomness` callback. A request whose result can never be
//! consumed is dropped with `CancelRequest`.

pub mod coordinator;
pub mod error;
pub mod event;
pub mod instruction;
pub mod processor;
pub mod state;

pub use processor::process_instruction;

solana_program::declare_id!("At4Fg9mZ1dscehNpAxDWDeK8MKDdktnhs4pa69sXT3FV");

#[cfg(not(feature = "no-entrypoint"))]
solana_program::entrypoint!(process_instruction);

#[cfg(test)]
mod tests {
    use super::*;
    use solana_program::{account_info::AccountInfo, clock::Epoch, program_error::ProgramError, pubkey::Pubkey};

    #[test]
    fn test_sanity() {
        let program_id = id();
        let key = Pubkey::default();
        let mut lamports = 0;
        let mut data = vec![0; 4];
        let owner = Pubkey::default();

        let account = AccountInfo::new(
            &key,
            false,
            true,
            &mut lamports,
            &mut data,
            &owner,
            false,
            Epoch::default(),
        );

        let accounts = vec![account];
        let instruction_data: Vec<u8> = Vec::new();

        let result = process_instruction(&program_id, &accounts, &instruction_data);
        assert_eq!(result, Err(ProgramError::InvalidInstructionData));
    }

    #[test]
    fn test_consume_rejects_foreign_game_account() {
        let program_id = id();
        let mut accounts_data: Vec<(Pubkey, u64, Vec<u8>, Pubkey)> = (0..3)
            .map(|_| (Pubkey::new_unique(), 0, vec![0u8; 8], Pubkey::new_unique()))
            .collect();
        let accounts: Vec<AccountInfo> = accounts_data
            .iter_mut()
            .map(|(key, lamports, data, owner)| {
                AccountInfo::new(key, false, true, lamports, data, owner, false, Epoch::default())
            })
            .collect();

        let data = borsh::to_vec(&instruction::GameInstruction::ConsumeRandomness).unwrap();
        let result = process_instruction(&program_id, &accounts, &data);
        assert_eq!(result, Err(ProgramError::IllegalOwner));
    }
}
