// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Driver binary provisioning seam
//!
//! Local sessions need a driver executable on disk before anything can be
//! spawned. Downloading, caching, and version resolution live behind this
//! trait; implementations may block on network I/O. Concurrency safety of an
//! implementation's binary cache is its own responsibility.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;

use crate::browser::BrowserKind;
use crate::error::{Error, Result};

/// Provides driver executables for local session construction.
#[async_trait]
pub trait BinaryProvisioner: Send + Sync {
    /// Obtain a local driver executable for the given browser and version
    /// (e.g. `"latest"` or an explicit tag). May download and cache.
    ///
    /// Failures surface as [`Error::Provisioning`] and are not retried here.
    async fn install(&self, kind: BrowserKind, version: &str) -> Result<PathBuf>;
}

/// Provisioner backed by a fixed set of preinstalled driver paths.
///
/// Useful when drivers are managed outside the test run (CI images, system
/// packages) and no download step is wanted.
#[derive(Debug, Clone, Default)]
pub struct StaticProvisioner {
    paths: HashMap<BrowserKind, PathBuf>,
}

impl StaticProvisioner {
    /// Create an empty provisioner
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a driver executable for a browser kind
    pub fn with_driver(mut self, kind: BrowserKind, path: impl Into<PathBuf>) -> Self {
        self.paths.insert(kind, path.into());
        self
    }
}

#[async_trait]
impl BinaryProvisioner for StaticProvisioner {
    async fn install(&self, kind: BrowserKind, version: &str) -> Result<PathBuf> {
        self.paths.get(&kind).cloned().ok_or_else(|| {
            Error::provisioning(kind, version, "no driver path registered for this browser")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_provisioner_returns_registered_path() {
        let provisioner =
            StaticProvisioner::new().with_driver(BrowserKind::Chrome, "/usr/bin/chromedriver");

        let path = provisioner
            .install(BrowserKind::Chrome, "latest")
            .await
            .unwrap();
        assert_eq!(path, PathBuf::from("/usr/bin/chromedriver"));
    }

    #[tokio::test]
    async fn test_static_provisioner_fails_for_unregistered_kind() {
        let provisioner = StaticProvisioner::new();

        let err = provisioner
            .install(BrowserKind::Firefox, "latest")
            .await
            .unwrap_err();
        assert!(err.is_provisioning());
    }
}
