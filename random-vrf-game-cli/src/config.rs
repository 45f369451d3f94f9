// Copyright (c) 2022, Mangekyou Network, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Network and deployment settings, resolved from the environment.
//!
//! Every resolver takes a `lookup` closure instead of reading the process
//! environment directly; [`env_lookup`] is the production implementation.

use {
    clap::ValueEnum,
    random_vrf_game::state::VrfConfig,
    solana_sdk::{pubkey::Pubkey, signature::Keypair},
    std::{
        fmt,
        path::{Path, PathBuf},
        str::FromStr,
    },
    thiserror::Error,
    zeroize::{Zeroize, Zeroizing},
};

pub const BASE_RPC_URL: &str = "BASE_RPC_URL";
pub const DEPLOYER_PRIVATE_KEY: &str = "DEPLOYER_PRIVATE_KEY";
pub const VRF_COORDINATOR: &str = "VRF_COORDINATOR";
pub const VRF_SUBSCRIPTION_ID: &str = "VRF_SUBSCRIPTION_ID";
pub const VRF_KEY_HASH: &str = "VRF_KEY_HASH";

pub const LOCAL_RPC_URL: &str = "http://localhost:8899";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} is not set")]
    MissingVar(&'static str),

    #[error("{name} is not a valid public key: {value}")]
    InvalidPubkey { name: &'static str, value: String },

    #[error("VRF_KEY_HASH must be 32 hex-encoded bytes: {0}")]
    InvalidKeyHash(String),

    #[error("Invalid deployer key: {0}")]
    InvalidPrivateKey(String),

    #[error("Failed to read keypair file {}: {source}", .path.display())]
    KeypairFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("No deployer account configured for the {0} network")]
    NoDeployer(Network),
}

/// Target cluster, the counterpart of a network entry in a hardhat config.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, ValueEnum)]
pub enum Network {
    /// Local test validator
    #[default]
    Local,
    /// Cluster reached through BASE_RPC_URL
    Base,
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Local => write!(f, "local"),
            Network::Base => write!(f, "base"),
        }
    }
}

impl Network {
    pub fn rpc_url(&self, lookup: &dyn Fn(&str) -> Option<String>) -> Result<String, ConfigError> {
        match self {
            Network::Local => Ok(LOCAL_RPC_URL.to_string()),
            Network::Base => var(lookup, BASE_RPC_URL).ok_or(ConfigError::MissingVar(BASE_RPC_URL)),
        }
    }
}

/// Everything `deploy` needs before it talks to the cluster.
pub struct DeployConfig {
    pub network: Network,
    pub rpc_url: String,
    pub program_id: Pubkey,
    pub deployer: Keypair,
    pub vrf: VrfConfig,
}

impl DeployConfig {
    pub fn resolve(
        network: Network,
        program_id: Pubkey,
        keypair_path: Option<&Path>,
        lookup: &dyn Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            network,
            rpc_url: network.rpc_url(lookup)?,
            program_id,
            deployer: resolve_deployer(network, keypair_path, lookup)?,
            vrf: resolve_vrf_config(network, lookup)?,
        })
    }
}

/// Reads the process environment.
pub fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn var(lookup: &dyn Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// `DEPLOYER_PRIVATE_KEY` wins over `keypair_path`. On the local network the
/// Solana CLI default keypair is the last resort.
pub fn resolve_deployer(
    network: Network,
    keypair_path: Option<&Path>,
    lookup: &dyn Fn(&str) -> Option<String>,
) -> Result<Keypair, ConfigError> {
    let secret = lookup(DEPLOYER_PRIVATE_KEY).map(Zeroizing::new);
    if let Some(key) = secret.as_deref().map(|key| key.trim()).filter(|key| !key.is_empty()) {
        return parse_private_key(key);
    }
    if let Some(path) = keypair_path {
        return read_keypair(path);
    }
    match network {
        Network::Local => {
            let home = var(lookup, "HOME").ok_or(ConfigError::NoDeployer(network))?;
            read_keypair(&Path::new(&home).join(".config/solana/id.json"))
        }
        Network::Base => Err(ConfigError::NoDeployer(network)),
    }
}

pub fn resolve_vrf_config(
    network: Network,
    lookup: &dyn Fn(&str) -> Option<String>,
) -> Result<VrfConfig, ConfigError> {
    let vrf_coordinator = match var(lookup, VRF_COORDINATOR) {
        Some(value) => parse_pubkey(VRF_COORDINATOR, &value)?,
        None if network == Network::Local => Pubkey::default(),
        None => return Err(ConfigError::MissingVar(VRF_COORDINATOR)),
    };
    let subscription = match var(lookup, VRF_SUBSCRIPTION_ID) {
        Some(value) => parse_subscription(&value)?,
        None => Pubkey::default(),
    };
    let key_hash = match var(lookup, VRF_KEY_HASH) {
        Some(value) => parse_key_hash(&value)?,
        None if network == Network::Local => [0u8; 32],
        None => return Err(ConfigError::MissingVar(VRF_KEY_HASH)),
    };
    Ok(VrfConfig {
        vrf_coordinator,
        subscription,
        key_hash,
    })
}

pub fn parse_pubkey(name: &'static str, value: &str) -> Result<Pubkey, ConfigError> {
    Pubkey::from_str(value).map_err(|_| ConfigError::InvalidPubkey {
        name,
        value: value.to_string(),
    })
}

/// `0` names the all-zero subscription.
pub fn parse_subscription(value: &str) -> Result<Pubkey, ConfigError> {
    if value == "0" {
        return Ok(Pubkey::default());
    }
    parse_pubkey(VRF_SUBSCRIPTION_ID, value)
}

pub fn parse_key_hash(value: &str) -> Result<[u8; 32], ConfigError> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);
    let bytes = hex::decode(digits).map_err(|_| ConfigError::InvalidKeyHash(value.to_string()))?;
    bytes
        .try_into()
        .map_err(|_| ConfigError::InvalidKeyHash(value.to_string()))
}

pub fn format_key_hash(key_hash: &[u8; 32]) -> String {
    format!("0x{}", hex::encode(key_hash))
}

/// Accepts the JSON byte array written by `solana-keygen` or a base58 string.
pub fn parse_private_key(value: &str) -> Result<Keypair, ConfigError> {
    let value = value.trim();
    let mut bytes = if value.starts_with('[') {
        serde_json::from_str::<Vec<u8>>(value)
            .map_err(|e| ConfigError::InvalidPrivateKey(e.to_string()))?
    } else {
        bs58::decode(value)
            .into_vec()
            .map_err(|e| ConfigError::InvalidPrivateKey(e.to_string()))?
    };
    let keypair =
        Keypair::from_bytes(&bytes).map_err(|e| ConfigError::InvalidPrivateKey(e.to_string()));
    bytes.zeroize();
    keypair
}

pub fn read_keypair(path: &Path) -> Result<Keypair, ConfigError> {
    let mut contents = std::fs::read_to_string(path).map_err(|source| ConfigError::KeypairFile {
        path: path.to_path_buf(),
        source,
    })?;
    let keypair = parse_private_key(&contents);
    contents.zeroize();
    keypair
}
