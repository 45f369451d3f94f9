use {
    base64::Engine,
    borsh::{BorshDeserialize, BorshSerialize},
    solana_program::{entrypoint::ProgramResult, msg, pubkey::Pubkey},
};

/// Log prefix that marks a serialized game event
pub const EVENT_LOG_PREFIX: &str = "GAME_EVENT:";

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    GameInitialized {
        game: Pubkey,
        owner: Pubkey,
        vrf_coordinator: Pubkey,
        subscription: Pubkey,
        key_hash: [u8; 32],
    },
    RandomnessRequested {
        game: Pubkey,
        request: Pubkey,
        seed: [u8; 32],
    },
    RandomnessFulfilled {
        game: Pubkey,
        request: Pubkey,
        number: u8,
    },
    OwnershipTransferred {
        game: Pubkey,
        previous_owner: Pubkey,
        new_owner: Pubkey,
    },
    RequestCancelled {
        game: Pubkey,
        request: Pubkey,
    },
}

impl GameEvent {
    pub fn emit(&self) -> ProgramResult {
        let data = borsh::to_vec(self)?;
        let b64 = base64::engine::general_purpose::STANDARD.encode(data);
        msg!("{}{}", EVENT_LOG_PREFIX, b64);
        Ok(())
    }

    /// Parses a transaction log line. The runtime prepends `Program log: `
    /// to messages, which is accepted here as well.
    pub fn parse_log(log_msg: &str) -> Option<Self> {
        let log_msg = log_msg.trim_start_matches("Program log: ");
        let base64_data = log_msg.strip_prefix(EVENT_LOG_PREFIX)?.trim();
        let event_data = base64::engine::general_purpose::STANDARD
            .decode(base64_data)
            .ok()?;
        Self::try_from_slice(&event_data).ok()
    }
}
