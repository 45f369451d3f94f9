use {
    solana_program::program_error::ProgramError,
    thiserror::Error,
};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Game is already pending randomness")]
    AlreadyPending,
    #[error("Invalid game owner")]
    InvalidOwner,
    #[error("Invalid VRF coordinator program")]
    InvalidVrfCoordinator,
    #[error("Invalid VRF result account")]
    InvalidVrfResult,
    #[error("Invalid VRF request account")]
    InvalidVrfRequest,
    #[error("Game state account is already initialized")]
    AlreadyInitialized,
    #[error("Invalid VRF subscription account")]
    InvalidSubscription,
    #[error("Game is not waiting for randomness")]
    NotPending,
}

impl From<GameError> for ProgramError {
    fn from(e: GameError) -> Self {
        ProgramError::Custom(e as u32)
    }
}
