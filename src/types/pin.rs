// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Edge connector pin types.

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Highest pin number on the edge connector.
pub const MAX_PIN: u8 = 20;

/// The value of a single edge connector pin.
///
/// # Examples
///
/// ```
/// use microbit_sync::types::PinValue;
///
/// let pin = PinValue::new(2, 128).unwrap();
/// assert_eq!(pin.pin(), 2);
/// assert!(PinValue::new(21, 0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PinValue {
    pin: u8,
    value: u8,
}

impl PinValue {
    /// Creates a pin value.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::InvalidPin`] if `pin` is above [`MAX_PIN`].
    pub fn new(pin: u8, value: u8) -> Result<Self, ValueError> {
        if pin > MAX_PIN {
            return Err(ValueError::InvalidPin(pin));
        }
        Ok(Self { pin, value })
    }

    /// Returns the pin number.
    #[must_use]
    pub const fn pin(&self) -> u8 {
        self.pin
    }

    /// Returns the pin value (digital 0/1 or analog 0-255).
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.value
    }
}

/// Edge connector configuration bitmasks, one bit per pin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PinConfiguration {
    /// Bit set means the pin is analog, clear means digital.
    pub analog: u32,
    /// Bit set means the pin is an input, clear means an output.
    pub input: u32,
}

impl PinConfiguration {
    /// Creates a configuration from the two bitmasks.
    #[must_use]
    pub const fn new(analog: u32, input: u32) -> Self {
        Self { analog, input }
    }
}
