// Copyright (c) 2022, Mangekyou Network, Inc.
// SPDX-License-Identifier: Apache-2.0

use clap::{Args, Parser};
use random_vrf_game::state::GameState;
use random_vrf_game_cli::config::{self, format_key_hash, ConfigError, DeployConfig, Network};
use random_vrf_game_cli::deploy::{deploy, fetch_game_state, DeployError};
use random_vrf_game_cli::logger;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{commitment_config::CommitmentConfig, pubkey::Pubkey};
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

#[derive(Parser)]
#[command(name = "vrf-game-cli")]
#[command(about = "Deploy and inspect games that draw numbers from a VRF coordinator.", long_about = None)]
enum Command {
    /// Deploy a new game owned by the deployer account.
    Deploy(DeployArguments),

    /// Print the state of a deployed game.
    Status(StatusArguments),
}

#[derive(Args, Clone)]
struct TargetArguments {
    /// Network to talk to. `base` reads its RPC endpoint from BASE_RPC_URL.
    #[clap(short, long, value_enum, default_value_t = Network::Local)]
    network: Network,

    /// Address of the deployed game program.
    #[clap(long, default_value_t = random_vrf_game::id())]
    program_id: Pubkey,

    /// Enable debug output.
    #[clap(short, long)]
    verbose: bool,
}

#[derive(Parser, Clone)]
struct DeployArguments {
    #[command(flatten)]
    target: TargetArguments,

    /// Keypair file of the deployer, used when DEPLOYER_PRIVATE_KEY is not set.
    #[clap(short, long)]
    keypair: Option<PathBuf>,
}

#[derive(Parser, Clone)]
struct StatusArguments {
    #[command(flatten)]
    target: TargetArguments,

    /// Address of the game state account.
    #[clap(short, long)]
    game: Pubkey,
}

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Deploy(#[from] DeployError),
}

impl CliError {
    fn exit_code(&self) -> exitcode::ExitCode {
        match self {
            CliError::Config(_) => exitcode::CONFIG,
            CliError::Deploy(DeployError::Rpc(_)) => exitcode::UNAVAILABLE,
            CliError::Deploy(DeployError::Instruction(_)) => exitcode::SOFTWARE,
            CliError::Deploy(_) => exitcode::DATAERR,
        }
    }
}

impl Command {
    fn target(&self) -> &TargetArguments {
        match self {
            Command::Deploy(arguments) => &arguments.target,
            Command::Status(arguments) => &arguments.target,
        }
    }
}

#[tokio::main]
async fn main() {
    let cmd = Command::parse();
    logger::init_cli_logger(cmd.target().verbose);

    match execute(cmd, &config::env_lookup).await {
        Ok(res) => {
            println!("{}", res);
            std::process::exit(exitcode::OK);
        }
        Err(e) => {
            debug!("{:?}", e);
            eprintln!("Error: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}

async fn execute(
    cmd: Command,
    lookup: &dyn Fn(&str) -> Option<String>,
) -> Result<String, CliError> {
    match cmd {
        Command::Deploy(arguments) => {
            let target = arguments.target;
            let config = DeployConfig::resolve(
                target.network,
                target.program_id,
                arguments.keypair.as_deref(),
                lookup,
            )?;
            let client =
                RpcClient::new_with_commitment(config.rpc_url.clone(), CommitmentConfig::confirmed());

            let deployment = deploy(&client, &config).await?;
            Ok(deployment.to_string())
        }

        Command::Status(arguments) => {
            let target = arguments.target;
            let rpc_url = target.network.rpc_url(lookup)?;
            let client = RpcClient::new_with_commitment(rpc_url, CommitmentConfig::confirmed());

            let state = fetch_game_state(&client, &target.program_id, &arguments.game).await?;
            Ok(format_status(&arguments.game, &state))
        }
    }
}

fn format_status(game: &Pubkey, state: &GameState) -> String {
    let current_number = match state.current_number {
        0 => "none yet".to_string(),
        n => n.to_string(),
    };
    let pending_request = state
        .pending_request
        .map(|request| request.to_string())
        .unwrap_or_else(|| "none".to_string());

    [
        format!("Game:            {}", game),
        format!("Owner:           {}", state.owner),
        format!("VRF Coordinator: {}", state.vrf.vrf_coordinator),
        format!("Subscription ID: {}", state.vrf.subscription),
        format!("Key hash:        {}", format_key_hash(&state.vrf.key_hash)),
        format!("Current number:  {}", current_number),
        format!("Pending request: {}", pending_request),
        format!("Requests made:   {}", state.request_count),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {

    use crate::{execute, format_status, CliError, Command, DeployArguments, StatusArguments, TargetArguments};
    use random_vrf_game::state::{GameState, VrfConfig};
    use random_vrf_game_cli::config::{ConfigError, Network, BASE_RPC_URL};
    use regex::Regex;
    use solana_sdk::pubkey::Pubkey;

    fn base_target() -> TargetArguments {
        TargetArguments {
            network: Network::Base,
            program_id: random_vrf_game::id(),
            verbose: false,
        }
    }

    #[test]
    fn test_format_status() {
        let game = Pubkey::new_unique();
        let mut state = GameState::new(Pubkey::new_unique(), VrfConfig::default());
        let output = format_status(&game, &state);
        assert!(output.contains("Current number:  none yet"));
        assert!(output.contains("Pending request: none"));
        assert!(output.contains(&format!("Owner:           {}", state.owner)));

        let request = Pubkey::new_unique();
        state.current_number = 42;
        state.pending_request = Some(request);
        state.request_count = 3;
        let output = format_status(&game, &state);
        let expected = Regex::new(r"Current number:  42\nPending request: (\w+)\nRequests made:   3").unwrap();
        let captures = expected.captures(&output).unwrap();
        assert_eq!(captures.get(1).unwrap().as_str(), request.to_string());
    }

    #[tokio::test]
    async fn test_deploy_requires_base_rpc_url() {
        let result = execute(
            Command::Deploy(DeployArguments {
                target: base_target(),
                keypair: None,
            }),
            &|_| None,
        )
        .await;
        let err = result.unwrap_err();
        assert!(matches!(err, CliError::Config(ConfigError::MissingVar(BASE_RPC_URL))));
        assert_eq!(err.exit_code(), exitcode::CONFIG);
    }

    #[tokio::test]
    async fn test_status_requires_base_rpc_url() {
        let result = execute(
            Command::Status(StatusArguments {
                target: base_target(),
                game: Pubkey::new_unique(),
            }),
            &|_| None,
        )
        .await;
        assert!(matches!(
            result,
            Err(CliError::Config(ConfigError::MissingVar(BASE_RPC_URL)))
        ));
    }
}
