// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Browser identity
//!
//! The closed set of supported browsers and the single normalization point
//! for user-supplied browser names. Every component that needs to know
//! "is this a known browser" goes through [`BrowserKind::normalize`] so
//! rejection behavior stays consistent.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A supported browser family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    /// Google Chrome / Chromium
    Chrome,
    /// Mozilla Firefox
    Firefox,
    /// Internet Explorer
    Ie,
    /// Opera (Chromium-derived, shares Chrome's option semantics)
    Opera,
    /// Microsoft Edge
    Edge,
}

impl BrowserKind {
    /// All supported kinds, in documentation order
    pub const ALL: [BrowserKind; 5] = [
        BrowserKind::Chrome,
        BrowserKind::Firefox,
        BrowserKind::Ie,
        BrowserKind::Opera,
        BrowserKind::Edge,
    ];

    /// Normalize a user-supplied browser name into a kind.
    ///
    /// Matching is case-insensitive. Anything outside the supported set is a
    /// terminal configuration error, never silently defaulted.
    pub fn normalize(input: &str) -> Result<Self> {
        match input.to_ascii_lowercase().as_str() {
            "chrome" => Ok(BrowserKind::Chrome),
            "firefox" => Ok(BrowserKind::Firefox),
            "ie" => Ok(BrowserKind::Ie),
            "opera" => Ok(BrowserKind::Opera),
            "edge" => Ok(BrowserKind::Edge),
            _ => Err(Error::unsupported_browser(input)),
        }
    }

    /// Canonical configuration name
    pub fn as_str(&self) -> &'static str {
        match self {
            BrowserKind::Chrome => "chrome",
            BrowserKind::Firefox => "firefox",
            BrowserKind::Ie => "ie",
            BrowserKind::Opera => "opera",
            BrowserKind::Edge => "edge",
        }
    }

    /// Browser name as negotiated over the WebDriver wire protocol
    /// (the W3C `browserName` capability)
    pub fn wire_name(&self) -> &'static str {
        match self {
            BrowserKind::Chrome => "chrome",
            BrowserKind::Firefox => "firefox",
            BrowserKind::Ie => "internet explorer",
            BrowserKind::Opera => "opera",
            BrowserKind::Edge => "MicrosoftEdge",
        }
    }
}

impl fmt::Display for BrowserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BrowserKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::normalize(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_is_case_insensitive() {
        for input in ["chrome", "Chrome", "CHROME", "cHrOmE"] {
            assert_eq!(BrowserKind::normalize(input).unwrap(), BrowserKind::Chrome);
        }

        for kind in BrowserKind::ALL {
            let upper = kind.as_str().to_uppercase();
            assert_eq!(BrowserKind::normalize(&upper).unwrap(), kind);
            assert_eq!(BrowserKind::normalize(kind.as_str()).unwrap(), kind);
        }
    }

    #[test]
    fn test_normalize_rejects_unknown_names() {
        for input in ["safari", "netscape", "chromium", "", "chrome "] {
            let err = BrowserKind::normalize(input).unwrap_err();
            assert!(err.is_unsupported_browser(), "{input:?} should be rejected");
            assert_eq!(err.browser_name(), Some(input));
        }
    }

    #[test]
    fn test_unsupported_error_points_to_docs() {
        let err = BrowserKind::normalize("safari").unwrap_err();
        let msg = err.to_string();

        assert!(msg.contains("safari"));
        assert!(msg.contains(crate::error::DRIVER_CONFIG_DOCS));
    }

    #[test]
    fn test_from_str_delegates_to_normalize() {
        let kind: BrowserKind = "EDGE".parse().unwrap();
        assert_eq!(kind, BrowserKind::Edge);
        assert!("konqueror".parse::<BrowserKind>().is_err());
    }

    #[test]
    fn test_display_matches_canonical_name() {
        assert_eq!(BrowserKind::Ie.to_string(), "ie");
        assert_eq!(BrowserKind::Edge.to_string(), "edge");
    }
}
