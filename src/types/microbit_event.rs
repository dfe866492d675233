// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Message bus events.

use serde::{Deserialize, Serialize};

/// An event on the micro:bit message bus.
///
/// The board raises these for its own components and accepts client events
/// written by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MicrobitEvent {
    /// Event source identifier.
    #[serde(rename = "type")]
    pub event_type: u16,
    /// Event value.
    pub value: u16,
}

impl MicrobitEvent {
    /// Creates a new event.
    #[must_use]
    pub const fn new(event_type: u16, value: u16) -> Self {
        Self { event_type, value }
    }
}
