// Copyright (c) 2022, Mangekyou Network, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Off-chain tooling for the random VRF game: environment driven
//! configuration, deployment and state inspection.

pub mod config;
pub mod deploy;
pub mod logger;
