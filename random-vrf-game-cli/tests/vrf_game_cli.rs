// Copyright (c) 2022, Mangekyou Network, Inc.
// SPDX-License-Identifier: Apache-2.0

use assert_cmd::Command;
use predicates::prelude::*;
use solana_sdk::{pubkey::Pubkey, signature::Keypair};
use std::io::Write;
use tempfile::NamedTempFile;

const ENV_VARS: [&str; 5] = [
    "BASE_RPC_URL",
    "DEPLOYER_PRIVATE_KEY",
    "VRF_COORDINATOR",
    "VRF_SUBSCRIPTION_ID",
    "VRF_KEY_HASH",
];

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("vrf-game-cli").unwrap();
    for name in ENV_VARS {
        cmd.env_remove(name);
    }
    cmd
}

#[test]
fn integration_test_help_lists_commands() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("deploy").and(predicate::str::contains("status")));
}

#[test]
fn integration_test_deploy_base_without_rpc_url() {
    cli()
        .args(["deploy", "--network", "base"])
        .assert()
        .failure()
        .code(exitcode::CONFIG)
        .stderr(predicate::str::contains("BASE_RPC_URL is not set"));
}

#[test]
fn integration_test_deploy_base_without_deployer() {
    cli()
        .args(["deploy", "--network", "base"])
        .env("BASE_RPC_URL", "http://127.0.0.1:1")
        .assert()
        .failure()
        .code(exitcode::CONFIG)
        .stderr(predicate::str::contains(
            "No deployer account configured for the base network",
        ));
}

#[test]
fn integration_test_deploy_rejects_placeholder_key_hash() {
    cli()
        .args(["deploy", "--network", "base"])
        .env("BASE_RPC_URL", "http://127.0.0.1:1")
        .env("DEPLOYER_PRIVATE_KEY", Keypair::new().to_base58_string())
        .env("VRF_COORDINATOR", Pubkey::new_unique().to_string())
        .env("VRF_KEY_HASH", "0xYourKeyHash")
        .assert()
        .failure()
        .code(exitcode::CONFIG)
        .stderr(predicate::str::contains("VRF_KEY_HASH must be 32 hex-encoded bytes"));
}

#[test]
fn integration_test_deploy_with_unreadable_keypair_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "not a keypair").unwrap();

    cli()
        .args(["deploy", "--network", "base", "--keypair"])
        .arg(file.path())
        .env("BASE_RPC_URL", "http://127.0.0.1:1")
        .assert()
        .failure()
        .code(exitcode::CONFIG)
        .stderr(predicate::str::contains("Invalid deployer key"));
}

#[test]
fn integration_test_status_rejects_bad_game_address() {
    cli()
        .args(["status", "--game", "not-a-pubkey"])
        .assert()
        .failure()
        .code(2);
}
