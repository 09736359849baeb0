// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Browser identity, options resolution, and default capabilities

mod capabilities;
mod kind;
mod options;

pub use capabilities::defaults_for;
pub use kind::BrowserKind;
pub use options::{Capability, CapabilitySet, ResolvedOptions};
