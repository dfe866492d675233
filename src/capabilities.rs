// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Capability detection.
//!
//! A micro:bit exposes a subset of nine independent service categories
//! depending on the firmware flashed on it. Which ones exist is discovered
//! when connecting and recorded in the `available` flag of each section of the
//! device tree. [`Capabilities`] is the typed view of those flags.

use std::fmt;

use serde_json::Value;

use crate::tracker::Path;

/// An independently discoverable service category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Capability {
    DeviceInformation,
    Button,
    Led,
    Temperature,
    Accelerometer,
    Magnetometer,
    Uart,
    Event,
    IoPin,
}

impl Capability {
    /// Every capability, in discovery order.
    pub const ALL: [Self; 9] = [
        Self::DeviceInformation,
        Self::Button,
        Self::Led,
        Self::Temperature,
        Self::Accelerometer,
        Self::Magnetometer,
        Self::Uart,
        Self::Event,
        Self::IoPin,
    ];

    /// Name of the capability's section in the device tree.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::DeviceInformation => "deviceInformation",
            Self::Button => "button",
            Self::Led => "led",
            Self::Temperature => "temperature",
            Self::Accelerometer => "accelerometer",
            Self::Magnetometer => "magnetometer",
            Self::Uart => "uart",
            Self::Event => "event",
            Self::IoPin => "ioPin",
        }
    }

    /// Address of the capability's `available` flag.
    #[must_use]
    pub fn available_path(self) -> Path {
        Path::root().child(self.key()).child("available")
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Capabilities confirmed by the transport for one device.
///
/// # Examples
///
/// ```
/// use microbit_sync::{Capabilities, Capability};
/// use serde_json::json;
///
/// let snapshot = json!({
///     "temperature": { "available": true },
///     "led": { "available": false },
/// });
///
/// let caps = Capabilities::from_snapshot(&snapshot);
/// assert!(caps.temperature);
/// assert!(caps.supports(Capability::Temperature));
/// assert!(!caps.led);
/// assert_eq!(caps.count(), 1);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
// Each flag is an independent hardware service.
#[allow(clippy::struct_excessive_bools)]
pub struct Capabilities {
    pub device_information: bool,
    pub button: bool,
    pub led: bool,
    pub temperature: bool,
    pub accelerometer: bool,
    pub magnetometer: bool,
    pub uart: bool,
    pub event: bool,
    pub io_pin: bool,
}

impl Capabilities {
    /// No capability available.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            device_information: false,
            button: false,
            led: false,
            temperature: false,
            accelerometer: false,
            magnetometer: false,
            uart: false,
            event: false,
            io_pin: false,
        }
    }

    /// Every capability available.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            device_information: true,
            button: true,
            led: true,
            temperature: true,
            accelerometer: true,
            magnetometer: true,
            uart: true,
            event: true,
            io_pin: true,
        }
    }

    /// Reads the `available` flags of a device tree snapshot.
    ///
    /// Missing or non-boolean flags count as unavailable.
    #[must_use]
    pub fn from_snapshot(snapshot: &Value) -> Self {
        let mut caps = Self::none();
        for capability in Capability::ALL {
            let available = capability
                .available_path()
                .lookup(snapshot)
                .and_then(Value::as_bool)
                .unwrap_or(false);
            caps.set(capability, available);
        }
        caps
    }

    /// Returns `true` if `capability` is available.
    #[must_use]
    pub const fn supports(&self, capability: Capability) -> bool {
        match capability {
            Capability::DeviceInformation => self.device_information,
            Capability::Button => self.button,
            Capability::Led => self.led,
            Capability::Temperature => self.temperature,
            Capability::Accelerometer => self.accelerometer,
            Capability::Magnetometer => self.magnetometer,
            Capability::Uart => self.uart,
            Capability::Event => self.event,
            Capability::IoPin => self.io_pin,
        }
    }

    /// Marks `capability` as available or not.
    pub fn set(&mut self, capability: Capability, available: bool) {
        let flag = match capability {
            Capability::DeviceInformation => &mut self.device_information,
            Capability::Button => &mut self.button,
            Capability::Led => &mut self.led,
            Capability::Temperature => &mut self.temperature,
            Capability::Accelerometer => &mut self.accelerometer,
            Capability::Magnetometer => &mut self.magnetometer,
            Capability::Uart => &mut self.uart,
            Capability::Event => &mut self.event,
            Capability::IoPin => &mut self.io_pin,
        };
        *flag = available;
    }

    /// Iterates over the available capabilities.
    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        Capability::ALL.into_iter().filter(|c| self.supports(*c))
    }

    /// Number of available capabilities.
    #[must_use]
    pub fn count(&self) -> usize {
        self.iter().count()
    }

    /// Returns `true` if the board has at least one motion sensor.
    #[must_use]
    pub const fn has_motion_sensors(&self) -> bool {
        self.accelerometer || self.magnetometer
    }
}

impl FromIterator<Capability> for Capabilities {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        let mut caps = Self::none();
        for capability in iter {
            caps.set(capability, true);
        }
        caps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::DeviceTree;

    #[test]
    fn keys_match_tree_sections() {
        let value = DeviceTree::default().to_value();
        for capability in Capability::ALL {
            assert_eq!(
                capability.available_path().lookup(&value),
                Some(&Value::Bool(false)),
                "{capability}"
            );
        }
    }

    #[test]
    fn fresh_tree_has_no_capabilities() {
        let caps = Capabilities::from_snapshot(&DeviceTree::default().to_value());
        assert_eq!(caps, Capabilities::none());
        assert_eq!(caps.count(), 0);
    }

    #[test]
    fn collect_from_iterator() {
        let caps: Capabilities = [Capability::Temperature, Capability::Uart].into_iter().collect();

        assert!(caps.temperature);
        assert!(caps.uart);
        assert!(!caps.has_motion_sensors());
        assert_eq!(caps.iter().collect::<Vec<_>>(), vec![Capability::Temperature, Capability::Uart]);
    }

    #[test]
    fn all_supports_everything() {
        let caps = Capabilities::all();
        assert!(Capability::ALL.iter().all(|c| caps.supports(*c)));
        assert_eq!(caps.count(), 9);
    }
}
