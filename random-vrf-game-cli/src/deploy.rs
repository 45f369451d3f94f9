// Copyright (c) 2022, Mangekyou Network, Inc.
// SPDX-License-Identifier: Apache-2.0

use {
    crate::config::{format_key_hash, DeployConfig},
    random_vrf_game::{
        instruction,
        state::{GameState, VrfConfig},
    },
    solana_client::{client_error::ClientError, nonblocking::rpc_client::RpcClient},
    solana_sdk::{
        account::Account,
        hash::Hash,
        program_error::ProgramError,
        pubkey::Pubkey,
        signature::{Keypair, Signature, Signer},
        transaction::Transaction,
    },
    std::fmt,
    thiserror::Error,
    tracing::{debug, info},
};

#[derive(Error, Debug)]
pub enum DeployError {
    #[error("RPC request failed: {0}")]
    Rpc(#[from] ClientError),

    #[error("Failed to build instruction: {0}")]
    Instruction(#[from] ProgramError),

    #[error("Game account {0} does not exist")]
    GameNotFound(Pubkey),

    #[error("Account {account} is owned by {owner}, not by the game program {program_id}")]
    NotAGame {
        account: Pubkey,
        owner: Pubkey,
        program_id: Pubkey,
    },

    #[error("Account {0} does not hold a valid game state")]
    InvalidGameState(Pubkey),
}

/// A confirmed deployment.
#[derive(Debug, Clone)]
pub struct Deployment {
    pub game: Pubkey,
    pub owner: Pubkey,
    pub signature: Signature,
}

impl fmt::Display for Deployment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RandomVRFGame deployed to: {}", self.game)
    }
}

/// The deployer pays for, signs and owns the new game.
pub fn build_deploy_transaction(
    program_id: &Pubkey,
    deployer: &Keypair,
    game: &Keypair,
    vrf: VrfConfig,
    recent_blockhash: Hash,
) -> Result<Transaction, DeployError> {
    let ix = instruction::initialize(
        program_id,
        &deployer.pubkey(),
        &game.pubkey(),
        &deployer.pubkey(),
        vrf,
    )?;
    Ok(Transaction::new_signed_with_payer(
        &[ix],
        Some(&deployer.pubkey()),
        &[deployer, game],
        recent_blockhash,
    ))
}

pub async fn deploy(client: &RpcClient, config: &DeployConfig) -> Result<Deployment, DeployError> {
    let deployer = config.deployer.pubkey();
    info!("Deploying with: {}", deployer);
    info!("Using VRF Coordinator: {}", config.vrf.vrf_coordinator);
    info!("Using subscription ID: {}", config.vrf.subscription);
    info!("Using keyHash: {}", format_key_hash(&config.vrf.key_hash));
    debug!(program_id = %config.program_id, rpc_url = %config.rpc_url, "Deploy target");

    let game = Keypair::new();
    let recent_blockhash = client.get_latest_blockhash().await?;
    let transaction = build_deploy_transaction(
        &config.program_id,
        &config.deployer,
        &game,
        config.vrf,
        recent_blockhash,
    )?;

    debug!(game = %game.pubkey(), "Sending deploy transaction");
    let signature = client.send_and_confirm_transaction(&transaction).await?;
    info!(%signature, "Deploy transaction confirmed");

    let deployment = Deployment {
        game: game.pubkey(),
        owner: deployer,
        signature,
    };
    info!("{}", deployment);
    Ok(deployment)
}

pub fn decode_game_state(
    program_id: &Pubkey,
    address: &Pubkey,
    account: &Account,
) -> Result<GameState, DeployError> {
    if account.owner != *program_id {
        return Err(DeployError::NotAGame {
            account: *address,
            owner: account.owner,
            program_id: *program_id,
        });
    }
    GameState::unpack(&account.data).map_err(|_| DeployError::InvalidGameState(*address))
}

pub async fn fetch_game_state(
    client: &RpcClient,
    program_id: &Pubkey,
    game: &Pubkey,
) -> Result<GameState, DeployError> {
    let account = client
        .get_account_with_commitment(game, client.commitment())
        .await?
        .value
        .ok_or(DeployError::GameNotFound(*game))?;
    decode_game_state(program_id, game, &account)
}
