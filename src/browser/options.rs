// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Options resolution
//!
//! Turns a uniform configuration shape (bare flag names plus a list of
//! single-key capability maps) into the browser-specific option payload that
//! session construction sends over the wire. Resolution is pure: no I/O,
//! deterministic for identical inputs.

use std::fmt;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::kind::BrowserKind;
use crate::error::{Error, Result};

/// A single named capability, declared as a one-entry map in configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Capability {
    /// Capability name (e.g. `acceptInsecureCerts`)
    pub name: String,
    /// Capability value, any JSON scalar or structure
    pub value: Value,
}

/// Ordered sequence of capabilities. Applied in order; a later entry for the
/// same name overwrites an earlier one.
pub type CapabilitySet = Vec<Capability>;

impl Capability {
    /// Create a capability
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Build a capability from a JSON map, enforcing the exactly-one-entry
    /// input shape.
    pub fn from_entry(map: Map<String, Value>) -> Result<Self> {
        let mut entries = map.into_iter();
        match (entries.next(), entries.next()) {
            (Some((name, value)), None) => Ok(Self { name, value }),
            (None, _) => Err(Error::config("capability entry must not be empty")),
            (Some(_), Some(_)) => Err(Error::config(
                "capability entry must contain exactly one key",
            )),
        }
    }
}

impl Serialize for Capability {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.name, &self.value)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for Capability {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct CapabilityVisitor;

        impl<'de> Visitor<'de> for CapabilityVisitor {
            type Value = Capability;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map with exactly one capability entry")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Capability, A::Error> {
                let (name, value): (String, Value) = access
                    .next_entry()?
                    .ok_or_else(|| de::Error::custom("capability entry must not be empty"))?;
                if access.next_entry::<String, Value>()?.is_some() {
                    return Err(de::Error::custom(
                        "capability entry must contain exactly one key",
                    ));
                }
                Ok(Capability { name, value })
            }
        }

        deserializer.deserialize_map(CapabilityVisitor)
    }
}

/// Vendor-prefixed capability key under which each browser family nests its
/// launch options. Opera is Chromium-derived and shares Chrome's key.
fn vendor_key(kind: BrowserKind) -> &'static str {
    match kind {
        BrowserKind::Chrome | BrowserKind::Opera => "goog:chromeOptions",
        BrowserKind::Firefox => "moz:firefoxOptions",
        BrowserKind::Ie => "se:ieOptions",
        BrowserKind::Edge => "ms:edgeOptions",
    }
}

/// Browser-specific options resolved from uniform configuration input.
///
/// Holds the accumulated launch arguments (already `--`-prefixed, in input
/// order, duplicates kept) and any capability overrides after
/// last-write-wins application.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedOptions {
    kind: BrowserKind,
    args: Vec<String>,
    caps: Map<String, Value>,
}

impl ResolvedOptions {
    /// Resolve options for a browser kind.
    ///
    /// Each entry of `args` becomes a `--<token>` launch flag, in input
    /// order. Flag legality is not validated here; an unsupported flag is a
    /// driver-level failure. If `caps` is present its entries are applied in
    /// list order, last write winning on a repeated name.
    pub fn resolve(kind: BrowserKind, args: &[String], caps: Option<&CapabilitySet>) -> Self {
        let args = args.iter().map(|arg| format!("--{arg}")).collect();

        let mut store = Map::new();
        if let Some(caps) = caps {
            for cap in caps {
                store.insert(cap.name.clone(), cap.value.clone());
            }
        }

        Self {
            kind,
            args,
            caps: store,
        }
    }

    /// Browser kind these options were resolved for
    pub fn kind(&self) -> BrowserKind {
        self.kind
    }

    /// Resolved launch arguments, `--`-prefixed
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Look up an applied capability override
    pub fn capability(&self, name: &str) -> Option<&Value> {
        self.caps.get(name)
    }

    /// Applied capability overrides
    pub fn capabilities(&self) -> &Map<String, Value> {
        &self.caps
    }

    /// Lower into a W3C `alwaysMatch` capability map: `browserName`, launch
    /// arguments nested under the vendor options key, capability overrides
    /// applied on top (an override may replace the vendor entry wholesale).
    pub fn to_capabilities(&self) -> Map<String, Value> {
        let mut caps = Map::new();
        caps.insert(
            "browserName".to_string(),
            Value::String(self.kind.wire_name().to_string()),
        );

        if !self.args.is_empty() {
            let mut vendor = Map::new();
            vendor.insert("args".to_string(), Value::from(self.args.clone()));
            caps.insert(vendor_key(self.kind).to_string(), Value::Object(vendor));
        }

        for (name, value) in &self.caps {
            caps.insert(name.clone(), value.clone());
        }

        caps
    }

    /// Lower into a flat capability map with launch arguments hoisted to a
    /// top-level `args` entry instead of nested under the vendor key. The
    /// local Edge driver takes its session request in this shape.
    pub fn to_flattened_capabilities(&self) -> Map<String, Value> {
        let mut caps = Map::new();
        caps.insert(
            "browserName".to_string(),
            Value::String(self.kind.wire_name().to_string()),
        );

        if !self.args.is_empty() {
            caps.insert("args".to_string(), Value::from(self.args.clone()));
        }

        for (name, value) in &self.caps {
            caps.insert(name.clone(), value.clone());
        }

        caps
    }
}
