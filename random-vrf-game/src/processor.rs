use {
    crate::{
        coordinator,
        error::GameError,
        event::GameEvent,
        instruction::GameInstruction,
        state::{find_vrf_result_address, GameState, VrfConfig, VrfResult},
    },
    borsh::BorshDeserialize,
    solana_program::{
        account_info::{next_account_info, AccountInfo},
        entrypoint::ProgramResult,
        msg,
        program::invoke,
        program_error::ProgramError,
        pubkey::Pubkey,
        system_instruction,
        sysvar::{rent::Rent, Sysvar},
    },
};

pub fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    msg!("Game Program: Processing instruction");
    let instruction = GameInstruction::try_from_slice(instruction_data)
        .map_err(|e| {
            msg!("Game Program: Failed to deserialize instruction: {}", e);
            ProgramError::InvalidInstructionData
        })?;

    match instruction {
        GameInstruction::Initialize(vrf) => {
            msg!("Game Program: Initialize instruction");
            process_initialize(program_id, accounts, vrf)
        }
        GameInstruction::RequestRandomness => {
            msg!("Game Program: RequestRandomness instruction");
            process_request_randomness(program_id, accounts)
        }
        GameInstruction::ConsumeRandomness => {
            msg!("Game Program: ConsumeRandomness instruction");
            process_consume_randomness(program_id, accounts)
        }
        GameInstruction::TransferOwnership { new_owner } => {
            msg!("Game Program: TransferOwnership instruction");
            process_transfer_ownership(program_id, accounts, new_owner)
        }
        GameInstruction::CancelRequest => {
            msg!("Game Program: CancelRequest instruction");
            process_cancel_request(program_id, accounts)
        }
    }
}

fn process_initialize(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    vrf: VrfConfig,
) -> ProgramResult {
    let accounts_iter = &mut accounts.iter();
    let owner = next_account_info(accounts_iter)?;
    let game_state = next_account_info(accounts_iter)?;
    let payer = next_account_info(accounts_iter)?;
    let system_program = next_account_info(accounts_iter)?;

    msg!("Game Program: Owner: {}", owner.key);
    msg!("Game Program: Game state: {}", game_state.key);
    msg!("Game Program: VRF coordinator: {}", vrf.vrf_coordinator);
    msg!("Game Program: Subscription: {}", vrf.subscription);

    if !owner.is_signer {
        msg!("Game Program: Error - Missing owner signature");
        return Err(ProgramError::MissingRequiredSignature);
    }
    if !payer.is_signer {
        msg!("Game Program: Error - Missing payer signature");
        return Err(ProgramError::MissingRequiredSignature);
    }
    if game_state.owner == program_id {
        msg!("Game Program: Error - Game state already initialized");
        return Err(GameError::AlreadyInitialized.into());
    }

    let rent = Rent::get()?;
    let lamports = rent.minimum_balance(GameState::SPACE);
    msg!(
        "Game Program: Creating game state account - space: {}, lamports: {}",
        GameState::SPACE,
        lamports
    );

    invoke(
        &system_instruction::create_account(
            payer.key,
            game_state.key,
            lamports,
            GameState::SPACE as u64,
            program_id,
        ),
        &[payer.clone(), game_state.clone(), system_program.clone()],
    )?;

    let state = GameState::new(*owner.key, vrf);
    state.pack(&mut game_state.try_borrow_mut_data()?)?;

    GameEvent::GameInitialized {
        game: *game_state.key,
        owner: *owner.key,
        vrf_coordinator: vrf.vrf_coordinator,
        subscription: vrf.subscription,
        key_hash: vrf.key_hash,
    }
    .emit()?;

    msg!("Game Program: Initialize completed successfully");
    Ok(())
}

fn process_request_randomness(program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
    let accounts_iter = &mut accounts.iter();
    let owner = next_account_info(accounts_iter)?;
    let game_state = next_account_info(accounts_iter)?;
    let request_account = next_account_info(accounts_iter)?;
    let subscription = next_account_info(accounts_iter)?;
    let vrf_program = next_account_info(accounts_iter)?;
    let system_program = next_account_info(accounts_iter)?;

    msg!("Game Program: Owner: {}", owner.key);
    msg!("Game Program: Request account: {}", request_account.key);

    if !owner.is_signer {
        msg!("Game Program: Error - Missing owner signature");
        return Err(ProgramError::MissingRequiredSignature);
    }

    let mut state = load_game_state(program_id, game_state)?;
    if state.owner != *owner.key {
        msg!("Game Program: Error - {} is not the game owner", owner.key);
        return Err(GameError::InvalidOwner.into());
    }
    if state.is_pending() {
        return Err(GameError::AlreadyPending.into());
    }
    if *vrf_program.key != state.vrf.vrf_coordinator {
        msg!(
            "Game Program: Error - Invalid VRF coordinator. Expected {}, got {}",
            state.vrf.vrf_coordinator,
            vrf_program.key
        );
        return Err(GameError::InvalidVrfCoordinator.into());
    }
    if *subscription.key != state.vrf.subscription {
        msg!(
            "Game Program: Error - Invalid subscription. Expected {}, got {}",
            state.vrf.subscription,
            subscription.key
        );
        return Err(GameError::InvalidSubscription.into());
    }

    let seed = coordinator::request_seed(&state.vrf.key_hash, game_state.key, state.request_count);
    let request_ix = coordinator::request_randomness(
        vrf_program.key,
        owner.key,
        request_account.key,
        subscription.key,
        seed,
        borsh::to_vec(&GameInstruction::ConsumeRandomness)?,
    )?;
    invoke(
        &request_ix,
        &[
            owner.clone(),
            request_account.clone(),
            subscription.clone(),
            system_program.clone(),
            vrf_program.clone(),
        ],
    )?;

    state.pending_request = Some(*request_account.key);
    state.request_count = state
        .request_count
        .checked_add(1)
        .ok_or(ProgramError::ArithmeticOverflow)?;
    state.pack(&mut game_state.try_borrow_mut_data()?)?;

    GameEvent::RandomnessRequested {
        game: *game_state.key,
        request: *request_account.key,
        seed,
    }
    .emit()?;

    Ok(())
}

fn process_consume_randomness(program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
    let accounts_iter = &mut accounts.iter();
    let vrf_result = next_account_info(accounts_iter)?;
    let request_account = next_account_info(accounts_iter)?;
    let game_state = next_account_info(accounts_iter)?;

    msg!("Game Program: VRF result account: {}", vrf_result.key);
    msg!("Game Program: Request account: {}", request_account.key);
    msg!("Game Program: Game state account: {}", game_state.key);

    let mut state = load_game_state(program_id, game_state)?;

    match state.pending_request {
        None => {
            msg!("Game Program: Error - No request is pending");
            return Err(GameError::NotPending.into());
        }
        Some(pending) if pending != *request_account.key => {
            msg!(
                "Game Program: Error - Invalid request. Expected {}, got {}",
                pending,
                request_account.key
            );
            return Err(GameError::InvalidVrfRequest.into());
        }
        Some(_) => {}
    }

    let vrf_coordinator_id = state.vrf.vrf_coordinator;
    if vrf_result.owner != &vrf_coordinator_id {
        msg!(
            "Game Program: Error - Invalid VRF result owner. Expected {}, got {}",
            vrf_coordinator_id,
            vrf_result.owner
        );
        return Err(GameError::InvalidVrfCoordinator.into());
    }
    if request_account.owner != &vrf_coordinator_id {
        msg!(
            "Game Program: Error - Invalid request account owner. Expected {}, got {}",
            vrf_coordinator_id,
            request_account.owner
        );
        return Err(GameError::InvalidVrfCoordinator.into());
    }

    let (expected_vrf_result, _) =
        find_vrf_result_address(request_account.key, &vrf_coordinator_id);
    if expected_vrf_result != *vrf_result.key {
        msg!(
            "Game Program: Error - Invalid VRF result PDA. Expected {}, got {}",
            expected_vrf_result,
            vrf_result.key
        );
        return Err(GameError::InvalidVrfResult.into());
    }

    let result = VrfResult::try_deserialize(&vrf_result.data.borrow())
        .map_err(|_| GameError::InvalidVrfResult)?;
    let number = result.number_in_range().ok_or_else(|| {
        msg!("Game Program: Error - VRF result has no randomness values");
        GameError::InvalidVrfResult
    })?;
    msg!("Game Program: New random number: {}", number);

    state.current_number = number;
    state.pending_request = None;
    state.pack(&mut game_state.try_borrow_mut_data()?)?;

    GameEvent::RandomnessFulfilled {
        game: *game_state.key,
        request: *request_account.key,
        number,
    }
    .emit()?;

    Ok(())
}

fn process_transfer_ownership(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    new_owner: Pubkey,
) -> ProgramResult {
    let accounts_iter = &mut accounts.iter();
    let owner = next_account_info(accounts_iter)?;
    let game_state = next_account_info(accounts_iter)?;

    if !owner.is_signer {
        msg!("Game Program: Error - Missing owner signature");
        return Err(ProgramError::MissingRequiredSignature);
    }

    let mut state = load_game_state(program_id, game_state)?;
    if state.owner != *owner.key {
        msg!("Game Program: Error - {} is not the game owner", owner.key);
        return Err(GameError::InvalidOwner.into());
    }

    let previous_owner = state.owner;
    state.owner = new_owner;
    state.pack(&mut game_state.try_borrow_mut_data()?)?;
    msg!("Game Program: Ownership moved from {} to {}", previous_owner, new_owner);

    GameEvent::OwnershipTransferred {
        game: *game_state.key,
        previous_owner,
        new_owner,
    }
    .emit()?;

    Ok(())
}

fn process_cancel_request(program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
    let accounts_iter = &mut accounts.iter();
    let owner = next_account_info(accounts_iter)?;
    let game_state = next_account_info(accounts_iter)?;

    if !owner.is_signer {
        msg!("Game Program: Error - Missing owner signature");
        return Err(ProgramError::MissingRequiredSignature);
    }

    let mut state = load_game_state(program_id, game_state)?;
    if state.owner != *owner.key {
        msg!("Game Program: Error - {} is not the game owner", owner.key);
        return Err(GameError::InvalidOwner.into());
    }
    let request = state.pending_request.take().ok_or_else(|| {
        msg!("Game Program: Error - No request is pending");
        GameError::NotPending
    })?;
    state.pack(&mut game_state.try_borrow_mut_data()?)?;
    msg!("Game Program: Cancelled request {}", request);

    GameEvent::RequestCancelled {
        game: *game_state.key,
        request,
    }
    .emit()?;

    Ok(())
}

fn load_game_state(program_id: &Pubkey, game_state: &AccountInfo) -> Result<GameState, ProgramError> {
    if game_state.owner != program_id {
        msg!(
            "Game Program: Error - Invalid game state owner. Expected {}, got {}",
            program_id,
            game_state.owner
        );
        return Err(ProgramError::IllegalOwner);
    }
    if !game_state.is_writable {
        return Err(ProgramError::InvalidArgument);
    }
    let data = game_state.data.borrow();
    GameState::unpack(&data)
}
