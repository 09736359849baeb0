// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Session construction: local driver spawn or remote grid negotiation

mod builder;
mod config;
mod provision;
mod session;

pub use builder::SessionBuilder;
pub use config::{build_from_config, DriverConfig};
pub use provision::{BinaryProvisioner, StaticProvisioner};
pub use session::Session;
