// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Button state.

use serde::{Deserialize, Serialize};

/// State of one of the two front buttons.
///
/// # Examples
///
/// ```
/// use microbit_sync::types::ButtonState;
///
/// assert_eq!(ButtonState::from_raw(1), Some(ButtonState::Press));
/// assert!(ButtonState::LongPress.is_down());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ButtonState {
    /// The button is not pressed.
    Release,
    /// The button is pressed.
    Press,
    /// The button has been held for more than two seconds.
    LongPress,
}

impl ButtonState {
    /// Decodes the characteristic byte sent by the board.
    #[must_use]
    pub const fn from_raw(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Release),
            1 => Some(Self::Press),
            2 => Some(Self::LongPress),
            _ => None,
        }
    }

    /// Returns the characteristic byte for this state.
    #[must_use]
    pub const fn as_raw(&self) -> u8 {
        match self {
            Self::Release => 0,
            Self::Press => 1,
            Self::LongPress => 2,
        }
    }

    /// Returns `true` if the button is held down.
    #[must_use]
    pub const fn is_down(&self) -> bool {
        !matches!(self, Self::Release)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_values() {
        for state in [ButtonState::Release, ButtonState::Press, ButtonState::LongPress] {
            assert_eq!(ButtonState::from_raw(state.as_raw()), Some(state));
        }
        assert_eq!(ButtonState::from_raw(3), None);
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(ButtonState::LongPress).unwrap();
        assert_eq!(json, serde_json::json!("longPress"));
    }
}
