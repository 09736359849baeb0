// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # Mustekala - WebDriver Session Factory
//!
//! Builds and configures browser automation sessions from a declarative
//! configuration, abstracting over five browser families (Chrome, Firefox,
//! IE, Opera, Edge) and two execution modes: spawning a local driver
//! process or connecting to a remote grid speaking the WebDriver protocol.
//!
//! ## Features
//!
//! - Uniform configuration: one shape for every browser family
//! - Capability resolution: vendor-prefixed option payloads per family
//! - Default capability baselines for remote sessions, replaced wholesale
//!   by caller-supplied capabilities
//! - Local mode: driver binary provisioning seam, process spawn, session
//!   negotiation against the spawned driver
//! - Remote mode: W3C new-session negotiation against a grid endpoint
//! - Distinct failure kinds for every construction step
//!
//! Downloading driver binaries, sending WebDriver commands after session
//! creation, and parsing configuration files are collaborator concerns;
//! this crate decides what capabilities to send and which construction
//! path to take.
//!
//! ## Example
//!
//! ```rust,no_run
//! use mustekala::{build_from_config, DriverConfig, StaticProvisioner};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DriverConfig::from_json(
//!         r#"{"browser": "chrome", "options": ["headless"]}"#,
//!     )?;
//!
//!     let provisioner = StaticProvisioner::new()
//!         .with_driver("chrome".parse()?, "/usr/bin/chromedriver");
//!
//!     let session = build_from_config(&config, &provisioner).await?;
//!     println!("session {} at {}", session.id(), session.endpoint());
//!
//!     Ok(())
//! }
//! ```

pub mod browser;
pub mod error;
pub mod session;

// Browser identity and options resolution
pub use browser::{defaults_for, BrowserKind, Capability, CapabilitySet, ResolvedOptions};

// Errors
pub use error::{Error, Result, DRIVER_CONFIG_DOCS};

// Session construction
pub use session::{
    build_from_config, BinaryProvisioner, DriverConfig, Session, SessionBuilder, StaticProvisioner,
};

/// Mustekala version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
