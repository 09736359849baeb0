// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Default capability table
//!
//! Per-browser baseline capabilities used when a remote session is requested
//! without explicit capabilities. The table is built once and read-only
//! thereafter. If the caller supplies even one capability the whole baseline
//! is discarded, never field-merged.

use std::collections::HashMap;

use lazy_static::lazy_static;
use serde_json::json;

use super::kind::BrowserKind;
use super::options::{Capability, CapabilitySet};

lazy_static! {
    static ref DEFAULT_CAPABILITIES: HashMap<BrowserKind, CapabilitySet> = {
        let mut table = HashMap::new();
        table.insert(
            BrowserKind::Chrome,
            vec![Capability::new("browserName", json!("chrome"))],
        );
        table.insert(
            BrowserKind::Firefox,
            vec![
                Capability::new("browserName", json!("firefox")),
                Capability::new("acceptInsecureCerts", json!(true)),
            ],
        );
        table.insert(
            BrowserKind::Ie,
            vec![
                Capability::new("browserName", json!("internet explorer")),
                Capability::new("platformName", json!("windows")),
            ],
        );
        table.insert(
            BrowserKind::Opera,
            vec![Capability::new("browserName", json!("opera"))],
        );
        table.insert(
            BrowserKind::Edge,
            vec![
                Capability::new("browserName", json!("MicrosoftEdge")),
                Capability::new("platformName", json!("windows")),
            ],
        );
        table
    };
}

/// Baseline capability set for a browser kind.
pub fn defaults_for(kind: BrowserKind) -> CapabilitySet {
    DEFAULT_CAPABILITIES[&kind].clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_has_defaults() {
        for kind in BrowserKind::ALL {
            let defaults = defaults_for(kind);
            assert!(!defaults.is_empty(), "{kind} has no defaults");
        }
    }

    #[test]
    fn test_defaults_carry_wire_browser_name() {
        for kind in BrowserKind::ALL {
            let defaults = defaults_for(kind);
            let name = defaults
                .iter()
                .find(|cap| cap.name == "browserName")
                .expect("browserName present");
            assert_eq!(name.value, json!(kind.wire_name()));
        }
    }

    #[test]
    fn test_defaults_are_stable_copies() {
        let mut first = defaults_for(BrowserKind::Chrome);
        first.push(Capability::new("mutated", json!(true)));

        let second = defaults_for(BrowserKind::Chrome);
        assert!(second.iter().all(|cap| cap.name != "mutated"));
    }
}
