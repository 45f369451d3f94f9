use {
    borsh::{BorshDeserialize, BorshSerialize},
    solana_program::{
        entrypoint::ProgramResult, program_error::ProgramError, pubkey::Pubkey,
    },
};

/// Discriminator prefixed to every game state account
pub const GAME_STATE_DISCRIMINATOR: [u8; 8] = *b"GAMESTAT";

/// Discriminator the VRF coordinator writes in front of its result accounts
pub const VRF_RESULT_DISCRIMINATOR: [u8; 8] = *b"VRFRSLT\0";

/// Seed prefix of the coordinator's result PDA
pub const VRF_RESULT_SEED: &[u8] = b"vrf_result";

/// Oracle parameters fixed when the game is deployed
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VrfConfig {
    /// The VRF coordinator program that owns request and result accounts
    pub vrf_coordinator: Pubkey,
    /// The subscription account paying for randomness
    pub subscription: Pubkey,
    /// Gas lane selecting the oracle job
    pub key_hash: [u8; 32],
}

/// State for the game
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    /// The owner of the game
    pub owner: Pubkey,
    /// The VRF parameters passed at deployment
    pub vrf: VrfConfig,
    /// The current random number (1-100), zero before the first fulfilment
    pub current_number: u8,
    /// The coordinator request we're waiting on. Only a valid fulfilment
    /// or an owner's `CancelRequest` clears it.
    pub pending_request: Option<Pubkey>,
    /// Number of requests issued so far
    pub request_count: u64,
}

impl GameState {
    /// Borsh size of the body with `pending_request` set.
    pub const LEN: usize = 32 + (32 + 32 + 32) + 1 + (1 + 32) + 8;
    /// Account size including the discriminator.
    pub const SPACE: usize = 8 + Self::LEN;

    pub fn new(owner: Pubkey, vrf: VrfConfig) -> Self {
        Self {
            owner,
            vrf,
            current_number: 0,
            pending_request: None,
            request_count: 0,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending_request.is_some()
    }

    /// Decodes account data, checking the discriminator. The body may be
    /// followed by zero padding when no request is pending.
    pub fn unpack(data: &[u8]) -> Result<Self, ProgramError> {
        if data.len() < 8 || data[0..8] != GAME_STATE_DISCRIMINATOR {
            return Err(ProgramError::InvalidAccountData);
        }
        let mut body = &data[8..];
        Self::deserialize(&mut body).map_err(|_| ProgramError::InvalidAccountData)
    }

    pub fn pack(&self, dst: &mut [u8]) -> ProgramResult {
        if dst.len() < Self::SPACE {
            return Err(ProgramError::AccountDataTooSmall);
        }
        dst[0..8].copy_from_slice(&GAME_STATE_DISCRIMINATOR);
        dst[8..].fill(0);
        self.serialize(&mut &mut dst[8..])?;
        Ok(())
    }
}

/// VRF result from the coordinator
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone)]
pub struct VrfResult {
    /// The randomness outputs
    pub randomness: Vec<[u8; 64]>,
    /// The VRF proof
    pub proof: Vec<u8>,
    /// Block number when proof was generated
    pub proof_block: u64,
}

impl VrfResult {
    pub fn try_deserialize(data: &[u8]) -> Result<Self, ProgramError> {
        if data.len() < 8 || data[0..8] != VRF_RESULT_DISCRIMINATOR {
            return Err(ProgramError::InvalidAccountData);
        }
        Self::try_from_slice(&data[8..]).map_err(|_| ProgramError::InvalidAccountData)
    }

    /// Account bytes as the coordinator lays them out.
    pub fn to_account_data(&self) -> Result<Vec<u8>, ProgramError> {
        let mut data = VRF_RESULT_DISCRIMINATOR.to_vec();
        data.extend(borsh::to_vec(self)?);
        Ok(data)
    }

    /// Maps the first word onto 1..=100.
    pub fn number_in_range(&self) -> Option<u8> {
        let word = self.randomness.first()?;
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&word[0..8]);
        let value = u64::from_le_bytes(bytes);
        Some(((value % 100) + 1) as u8)
    }
}

/// Result PDA the coordinator derives for `request`.
pub fn find_vrf_result_address(request: &Pubkey, vrf_coordinator: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[VRF_RESULT_SEED, request.as_ref()], vrf_coordinator)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(value: u64) -> [u8; 64] {
        let mut word = [0u8; 64];
        word[0..8].copy_from_slice(&value.to_le_bytes());
        word
    }

    #[test]
    fn test_space_fits_pending_state() {
        let mut state = GameState::new(Pubkey::new_unique(), VrfConfig::default());
        state.pending_request = Some(Pubkey::new_unique());
        state.request_count = u64::MAX;
        assert_eq!(borsh::to_vec(&state).unwrap().len(), GameState::LEN);
    }

    #[test]
    fn test_pack_clears_stale_request() {
        let mut data = vec![0u8; GameState::SPACE];
        let mut state = GameState::new(Pubkey::new_unique(), VrfConfig::default());
        state.pending_request = Some(Pubkey::new_unique());
        state.pack(&mut data).unwrap();

        state.pending_request = None;
        state.current_number = 7;
        state.pack(&mut data).unwrap();

        let decoded = GameState::unpack(&data).unwrap();
        assert_eq!(decoded, state);
        assert!(data[8 + GameState::LEN - 32..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_unpack_rejects_wrong_discriminator() {
        let mut data = vec![0u8; GameState::SPACE];
        GameState::new(Pubkey::new_unique(), VrfConfig::default())
            .pack(&mut data)
            .unwrap();
        data[0] = b'X';
        assert_eq!(
            GameState::unpack(&data).unwrap_err(),
            ProgramError::InvalidAccountData
        );
        assert!(GameState::unpack(&data[..4]).is_err());
    }

    #[test]
    fn test_pack_rejects_short_buffer() {
        let mut data = vec![0u8; GameState::SPACE - 1];
        let state = GameState::new(Pubkey::new_unique(), VrfConfig::default());
        assert_eq!(
            state.pack(&mut data).unwrap_err(),
            ProgramError::AccountDataTooSmall
        );
    }

    #[test]
    fn test_number_in_range() {
        let result = |value| VrfResult {
            randomness: vec![word(value)],
            proof: vec![],
            proof_block: 0,
        };
        assert_eq!(result(0).number_in_range(), Some(1));
        assert_eq!(result(41).number_in_range(), Some(42));
        assert_eq!(result(99).number_in_range(), Some(100));
        assert_eq!(result(u64::MAX).number_in_range(), Some(16));

        let empty = VrfResult {
            randomness: vec![],
            proof: vec![],
            proof_block: 0,
        };
        assert_eq!(empty.number_in_range(), None);
    }

    #[test]
    fn test_vrf_result_account_data() {
        let result = VrfResult {
            randomness: vec![word(5)],
            proof: vec![1, 2, 3],
            proof_block: 9,
        };
        let data = result.to_account_data().unwrap();
        assert_eq!(&data[0..8], b"VRFRSLT\0");
        let decoded = VrfResult::try_deserialize(&data).unwrap();
        assert_eq!(decoded.randomness, result.randomness);
        assert_eq!(decoded.proof_block, 9);

        assert!(VrfResult::try_deserialize(&data[8..]).is_err());
    }
}
