// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Driver configuration and the adapter onto session construction
//!
//! [`DriverConfig`] is the external input shape, produced from a JSON
//! configuration file merged with CLI overrides outside this crate. The
//! adapter does field extraction and routing only; all resolution logic
//! lives in the session builder.

use serde::{Deserialize, Serialize};

use super::builder::SessionBuilder;
use super::provision::BinaryProvisioner;
use super::session::Session;
use crate::browser::{BrowserKind, CapabilitySet};
use crate::error::Result;

fn default_version() -> String {
    "latest".to_string()
}

/// Declarative session configuration.
///
/// Read-only once constructed. An empty or absent `remote_url` selects local
/// mode; anything else selects the remote grid at that URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Browser name, matched case-insensitively
    pub browser: String,
    /// Desired browser version, `"latest"` or an explicit tag
    #[serde(default = "default_version")]
    pub version: String,
    /// Grid URL; empty/absent selects local mode
    #[serde(default)]
    pub remote_url: Option<String>,
    /// Launch flag names, without leading dashes
    #[serde(default)]
    pub options: Vec<String>,
    /// Capability entries, one key per entry, applied in order
    #[serde(default)]
    pub capabilities: Option<CapabilitySet>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            browser: "chrome".to_string(),
            version: default_version(),
            remote_url: None,
            options: Vec::new(),
            capabilities: None,
        }
    }
}

impl DriverConfig {
    /// Parse a configuration from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Remote URL, treating the empty string as absent
    pub fn remote_url(&self) -> Option<&str> {
        self.remote_url.as_deref().filter(|url| !url.is_empty())
    }
}

/// Build a session from a [`DriverConfig`].
///
/// Pure pass-through: a configured remote URL routes to the remote path with
/// the raw browser name, otherwise the local path keyed on the normalized
/// kind.
pub async fn build_from_config(
    config: &DriverConfig,
    provisioner: &dyn BinaryProvisioner,
) -> Result<Session> {
    let builder = SessionBuilder::new(provisioner);

    match config.remote_url() {
        Some(remote_url) => {
            builder
                .remote(
                    &config.browser,
                    remote_url,
                    &config.options,
                    config.capabilities.as_ref(),
                )
                .await
        }
        None => {
            let kind = BrowserKind::normalize(&config.browser)?;
            builder.local(kind, &config.version, &config.options).await
        }
    }
}
