// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Live session handle and WebDriver new-session wire types

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::process::Child;
use url::Url;

/// A live browser automation session.
///
/// Opaque handle returned by session construction. Subsequent WebDriver
/// commands and session teardown belong to the command client, not this
/// crate. In local mode the handle also owns the spawned driver process.
pub struct Session {
    id: String,
    endpoint: Url,
    capabilities: Map<String, Value>,
    driver: Option<Child>,
}

impl Session {
    /// Session backed by a locally spawned driver process
    pub(crate) fn local(
        id: String,
        endpoint: Url,
        capabilities: Map<String, Value>,
        driver: Child,
    ) -> Self {
        Self {
            id,
            endpoint,
            capabilities,
            driver: Some(driver),
        }
    }

    /// Session negotiated against a remote grid endpoint
    pub(crate) fn remote(id: String, endpoint: Url, capabilities: Map<String, Value>) -> Self {
        Self {
            id,
            endpoint,
            capabilities,
            driver: None,
        }
    }

    /// Session identifier assigned by the driver or grid
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Endpoint subsequent WebDriver commands go to
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Capabilities the server actually negotiated
    pub fn capabilities(&self) -> &Map<String, Value> {
        &self.capabilities
    }

    /// Whether this session owns a locally spawned driver process
    pub fn is_local(&self) -> bool {
        self.driver.is_some()
    }

    /// Hand over ownership of the spawned driver process, if any.
    /// Process lifecycle past session creation belongs to the caller.
    pub fn take_driver_process(&mut self) -> Option<Child> {
        self.driver.take()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("endpoint", &self.endpoint.as_str())
            .field("local", &self.is_local())
            .finish()
    }
}

/// W3C new-session request body
#[derive(Debug, Serialize)]
pub(crate) struct NewSessionRequest {
    capabilities: W3cCapabilities,
}

#[derive(Debug, Serialize)]
struct W3cCapabilities {
    #[serde(rename = "alwaysMatch")]
    always_match: Map<String, Value>,
    #[serde(rename = "firstMatch")]
    first_match: Vec<Map<String, Value>>,
}

impl NewSessionRequest {
    pub(crate) fn with_always_match(always_match: Map<String, Value>) -> Self {
        Self {
            capabilities: W3cCapabilities {
                always_match,
                first_match: vec![Map::new()],
            },
        }
    }
}

/// W3C new-session response body. Success carries `sessionId` and the
/// negotiated capabilities; rejection carries `error` and `message`.
#[derive(Debug, Deserialize)]
pub(crate) struct NewSessionResponse {
    pub(crate) value: NewSessionValue,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NewSessionValue {
    #[serde(rename = "sessionId")]
    pub(crate) session_id: Option<String>,
    #[serde(default)]
    pub(crate) capabilities: Map<String, Value>,
    #[serde(default)]
    pub(crate) error: Option<String>,
    #[serde(default)]
    pub(crate) message: Option<String>,
}
