use {
    crate::state::VrfConfig,
    borsh::{BorshDeserialize, BorshSerialize},
    solana_program::{
        instruction::{AccountMeta, Instruction},
        program_error::ProgramError,
        pubkey::Pubkey,
        system_program,
    },
};

/// Instructions for the game
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub enum GameInstruction {
    /// Deploy a game bound to the given VRF parameters
    /// Accounts expected:
    /// 0. `[signer]` Game owner
    /// 1. `[signer, writable]` Game state account
    /// 2. `[signer, writable]` Payer for account creation
    /// 3. `[]` System program
    Initialize(VrfConfig),

    /// Request a new random number
    /// Accounts expected:
    /// 0. `[signer, writable]` Game owner
    /// 1. `[writable]` Game state account
    /// 2. `[writable]` VRF request account
    /// 3. `[]` VRF subscription account
    /// 4. `[]` VRF coordinator program
    /// 5. `[]` System program
    RequestRandomness,

    /// Consume randomness callback from VRF
    /// Accounts expected:
    /// 0. `[]` VRF result account
    /// 1. `[]` VRF request account
    /// 2. `[writable]` Game state account
    ConsumeRandomness,

    /// Hand the game over to another owner
    /// Accounts expected:
    /// 0. `[signer]` Current owner
    /// 1. `[writable]` Game state account
    TransferOwnership { new_owner: Pubkey },

    /// Drop the pending request so a new one can be placed
    /// Accounts expected:
    /// 0. `[signer]` Game owner
    /// 1. `[writable]` Game state account
    CancelRequest,
}

pub fn initialize(
    program_id: &Pubkey,
    owner: &Pubkey,
    game_state: &Pubkey,
    payer: &Pubkey,
    vrf: VrfConfig,
) -> Result<Instruction, ProgramError> {
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new_readonly(*owner, true),
            AccountMeta::new(*game_state, true),
            AccountMeta::new(*payer, true),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
        data: borsh::to_vec(&GameInstruction::Initialize(vrf))?,
    })
}

pub fn request_randomness(
    program_id: &Pubkey,
    owner: &Pubkey,
    game_state: &Pubkey,
    request_account: &Pubkey,
    vrf: &VrfConfig,
) -> Result<Instruction, ProgramError> {
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*owner, true),
            AccountMeta::new(*game_state, false),
            AccountMeta::new(*request_account, false),
            AccountMeta::new_readonly(vrf.subscription, false),
            AccountMeta::new_readonly(vrf.vrf_coordinator, false),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
        data: borsh::to_vec(&GameInstruction::RequestRandomness)?,
    })
}

pub fn consume_randomness(
    program_id: &Pubkey,
    vrf_result: &Pubkey,
    request_account: &Pubkey,
    game_state: &Pubkey,
) -> Result<Instruction, ProgramError> {
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new_readonly(*vrf_result, false),
            AccountMeta::new_readonly(*request_account, false),
            AccountMeta::new(*game_state, false),
        ],
        data: borsh::to_vec(&GameInstruction::ConsumeRandomness)?,
    })
}

pub fn transfer_ownership(
    program_id: &Pubkey,
    owner: &Pubkey,
    game_state: &Pubkey,
    new_owner: &Pubkey,
) -> Result<Instruction, ProgramError> {
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new_readonly(*owner, true),
            AccountMeta::new(*game_state, false),
        ],
        data: borsh::to_vec(&GameInstruction::TransferOwnership {
            new_owner: *new_owner,
        })?,
    })
}

pub fn cancel_request(
    program_id: &Pubkey,
    owner: &Pubkey,
    game_state: &Pubkey,
) -> Result<Instruction, ProgramError> {
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new_readonly(*owner, true),
            AccountMeta::new(*game_state, false),
        ],
        data: borsh::to_vec(&GameInstruction::CancelRequest)?,
    })
}
