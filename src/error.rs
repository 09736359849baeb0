// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for Mustekala session construction
//!
//! Every failure surfaces to the caller as a distinct kind so retry/abort
//! policy stays with the caller. Nothing is swallowed or logged-and-continued
//! inside this crate.

use std::path::PathBuf;

use thiserror::Error;

use crate::browser::BrowserKind;

/// Result type alias for Mustekala operations
pub type Result<T> = std::result::Result<T, Error>;

/// Documentation page listing the supported browser names and how to
/// configure them. Included in the unsupported-browser error message.
pub const DRIVER_CONFIG_DOCS: &str = "https://docs.bountyy.fi/mustekala/driver-configuration";

/// Main error type for Mustekala session construction
#[derive(Error, Debug)]
pub enum Error {
    /// Browser name did not match any supported browser
    #[error("'{name}' is not a supported browser. See {DRIVER_CONFIG_DOCS}")]
    UnsupportedBrowser { name: String },

    /// Driver binary download/cache failed
    #[error("Failed to provision {kind} driver (version {version}): {reason}")]
    Provisioning {
        kind: BrowserKind,
        version: String,
        reason: String,
    },

    /// Remote grid endpoint unreachable or capability negotiation rejected
    #[error("Remote session at {url} failed: {reason}")]
    RemoteSession { url: String, reason: String },

    /// Local driver process failed to spawn or become ready
    #[error("Driver process {path} failed: {reason}")]
    DriverProcess { path: PathBuf, reason: String },

    /// Local driver accepted the process spawn but rejected session creation
    #[error("Session creation against local driver at {endpoint} failed: {reason}")]
    SessionStart { endpoint: String, reason: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create an unsupported-browser error
    pub fn unsupported_browser(name: impl Into<String>) -> Self {
        Error::UnsupportedBrowser { name: name.into() }
    }

    /// Create a provisioning error
    pub fn provisioning(
        kind: BrowserKind,
        version: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Error::Provisioning {
            kind,
            version: version.into(),
            reason: reason.into(),
        }
    }

    /// Create a remote session error
    pub fn remote_session(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::RemoteSession {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Create a driver process error
    pub fn driver_process(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Error::DriverProcess {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a session start error
    pub fn session_start(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::SessionStart {
            endpoint: endpoint.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// Check if this is an unsupported-browser error
    pub fn is_unsupported_browser(&self) -> bool {
        matches!(self, Error::UnsupportedBrowser { .. })
    }

    /// Check if this is a provisioning error
    pub fn is_provisioning(&self) -> bool {
        matches!(self, Error::Provisioning { .. })
    }

    /// Check if this is a remote session error
    pub fn is_remote_session(&self) -> bool {
        matches!(self, Error::RemoteSession { .. })
    }

    /// Get the offending browser name if available
    pub fn browser_name(&self) -> Option<&str> {
        match self {
            Error::UnsupportedBrowser { name } => Some(name),
            _ => None,
        }
    }
}
