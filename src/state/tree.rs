// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed layout of a device tree.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{ButtonState, CalibrationStatus, DeviceInformation, LedMatrix};

/// Complete state of one board.
///
/// The live tree is held as a `serde_json::Value` inside a
/// [`ChangeTracker`](crate::tracker::ChangeTracker); this struct is its typed
/// view. Every field is present from construction; readings start out null
/// and every flag starts out false.
///
/// # Examples
///
/// ```
/// use microbit_sync::state::DeviceTree;
///
/// let tree = DeviceTree::new("abc", "BBC micro:bit [zatig]");
/// let value = tree.to_value();
///
/// assert_eq!(value["connection"]["connected"], false);
/// assert!(value["temperature"]["data"].is_null());
/// assert_eq!(value["led"]["data"][2][3], false);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceTree {
    /// Transport identifier of the board.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Connection lifecycle flags.
    pub connection: Connection,
    /// Device information service.
    pub device_information: DeviceInformationSection,
    /// Buttons A and B.
    pub button: ButtonSection,
    /// LED matrix, scrolling delay and scrolled text.
    pub led: LedSection,
    /// Temperature sensor.
    pub temperature: TemperatureSection,
    /// Accelerometer.
    pub accelerometer: AccelerometerSection,
    /// Magnetometer, bearing and calibration.
    pub magnetometer: MagnetometerSection,
    /// Serial text lines.
    pub uart: UartSection,
    /// Event service.
    pub event: EventSection,
    /// I/O pins.
    pub io_pin: IoPinSection,
}

impl DeviceTree {
    /// Creates the initial tree of a device.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Converts the tree into its untyped form.
    #[must_use]
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_default()
    }

    /// Reads a tree back from its untyped form.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` does not have the shape of a device tree.
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }
}

/// Connection lifecycle flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct Connection {
    /// A `connect()` call is in flight.
    pub connecting: bool,
    /// The board is connected and its services are bound.
    pub connected: bool,
    /// A `disconnect()` call is in flight.
    pub disconnecting: bool,
}

/// A value read on demand, with its loading flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading<T> {
    /// A read is in flight.
    pub loading: bool,
    /// Last known value.
    pub data: Option<T>,
}

impl<T> Default for Reading<T> {
    fn default() -> Self {
        Self {
            loading: false,
            data: None,
        }
    }
}

/// A value that can be both read and written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Setting<T> {
    /// A read is in flight.
    pub loading: bool,
    /// A write is in flight.
    pub updating: bool,
    /// Last known value.
    pub data: Option<T>,
}

impl<T> Default for Setting<T> {
    fn default() -> Self {
        Self {
            loading: false,
            updating: false,
            data: None,
        }
    }
}

/// A value pushed to the board, with its sending flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outgoing<T> {
    /// A send is in flight.
    pub sending: bool,
    /// Last value sent.
    pub data: Option<T>,
}

impl<T> Default for Outgoing<T> {
    fn default() -> Self {
        Self {
            sending: false,
            data: None,
        }
    }
}

/// Three-axis reading where each axis is null until known.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Axes {
    /// X axis.
    pub x: Option<f64>,
    /// Y axis.
    pub y: Option<f64>,
    /// Z axis.
    pub z: Option<f64>,
}

/// Model, serial number and revisions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceInformationSection {
    /// The board exposes the service.
    pub available: bool,
    /// A read is in flight.
    pub loading: bool,
    /// Last read information, each field null until known.
    pub data: DeviceInformation,
}

/// Buttons A and B.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ButtonSection {
    /// The board exposes the service.
    pub available: bool,
    /// Button A.
    pub a: Reading<ButtonState>,
    /// Button B.
    pub b: Reading<ButtonState>,
}

/// LED matrix.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedSection {
    /// The board exposes the service.
    pub available: bool,
    /// A matrix read is in flight.
    pub loading: bool,
    /// A matrix write is in flight.
    pub updating: bool,
    /// Last known 5x5 matrix, row-major.
    pub data: LedMatrix,
    /// Scrolling delay in milliseconds.
    pub scrolling_delay: Setting<u16>,
    /// Last text scrolled across the matrix.
    pub text: Outgoing<String>,
}

/// Temperature sensor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemperatureSection {
    /// The board exposes the service.
    pub available: bool,
    /// A read is in flight.
    pub loading: bool,
    /// Last reading in degrees Celsius.
    pub data: Option<f64>,
    /// Notification period in milliseconds.
    pub period: Setting<u16>,
}

/// Accelerometer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccelerometerSection {
    /// The board exposes the service.
    pub available: bool,
    /// A read is in flight.
    pub loading: bool,
    /// Last reading.
    pub data: Axes,
    /// Notification period in milliseconds.
    pub period: Setting<u16>,
}

/// Magnetometer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MagnetometerSection {
    /// The board exposes the service.
    pub available: bool,
    /// A read is in flight.
    pub loading: bool,
    /// Last reading.
    pub data: Axes,
    /// Compass bearing in degrees.
    pub bearing: Reading<u16>,
    /// Calibration progress.
    pub calibration: Calibration,
    /// Notification period in milliseconds.
    pub period: Setting<u16>,
}

/// Magnetometer calibration progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calibration {
    /// A calibration request is in flight.
    pub doing: bool,
    /// Last reported status.
    pub data: Option<CalibrationStatus>,
}

/// Serial text lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UartSection {
    /// The board exposes the service.
    pub available: bool,
    /// A send is in flight.
    pub sending: bool,
    /// Last line received from the board.
    pub data: Option<String>,
    /// Last line sent to the board.
    pub sent: Option<String>,
}

/// Event record where both fields are null until known.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Event source type.
    #[serde(rename = "type")]
    pub event_type: Option<u16>,
    /// Event value.
    pub value: Option<u16>,
}

/// Event service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct EventSection {
    /// The board exposes the service.
    pub available: bool,
    /// A read is in flight.
    pub loading: bool,
    /// A send is in flight.
    pub sending: bool,
    /// Last event raised by the board.
    pub data: EventRecord,
    /// Last event sent to the board.
    pub sent: EventRecord,
}

/// I/O pins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct IoPinSection {
    /// The board exposes the service.
    pub available: bool,
    /// A read is in flight.
    pub loading: bool,
    /// A write is in flight.
    pub updating: bool,
    /// Last known value of each pin, keyed by pin number.
    pub data: BTreeMap<u8, u8>,
    /// Analog and input configuration.
    pub configuration: PinConfigurationSection,
}

/// Pin configuration with its write flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinConfigurationSection {
    /// A configuration write is in flight.
    pub updating: bool,
    /// Last written configuration.
    pub data: PinConfigurationRecord,
}

/// Pin configuration bitmasks, null until written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinConfigurationRecord {
    /// Bit `n` set: pin `n` is analog.
    pub analog: Option<u32>,
    /// Bit `n` set: pin `n` is an input.
    pub input: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::Path;
    use serde_json::json;

    #[test]
    fn initial_tree_has_every_section() {
        let value = DeviceTree::new("abc", "micro:bit").to_value();

        for section in [
            "connection",
            "deviceInformation",
            "button",
            "led",
            "temperature",
            "accelerometer",
            "magnetometer",
            "uart",
            "event",
            "ioPin",
        ] {
            assert!(value.get(section).is_some(), "missing section {section}");
        }
        assert_eq!(value["id"], json!("abc"));
        assert_eq!(value["name"], json!("micro:bit"));
    }

    #[test]
    fn compound_readings_are_fixed_shape() {
        let value = DeviceTree::default().to_value();

        assert_eq!(value["accelerometer"]["data"], json!({ "x": null, "y": null, "z": null }));
        assert_eq!(value["event"]["data"], json!({ "type": null, "value": null }));
        assert_eq!(
            value["deviceInformation"]["data"],
            json!({
                "modelNumber": null,
                "serialNumber": null,
                "firmwareRevision": null,
                "hardwareRevision": null,
                "manufacturer": null,
            })
        );
        assert_eq!(value["led"]["scrollingDelay"]["data"], Value::Null);
    }

    #[test]
    fn every_flag_starts_false() {
        let value = DeviceTree::default().to_value();

        for (path, leaf) in Path::flatten(&value) {
            let name = path.last().map(ToString::to_string).unwrap_or_default();
            if matches!(
                name.as_str(),
                "available" | "loading" | "updating" | "sending" | "doing" | "connecting"
                    | "connected" | "disconnecting"
            ) {
                assert_eq!(leaf, json!(false), "{path} should start false");
            }
        }
    }

    #[test]
    fn typed_view_round_trips_pin_map() {
        let mut value = DeviceTree::default().to_value();
        value["ioPin"]["data"] = json!({ "0": 1, "2": 255 });

        let tree = DeviceTree::from_value(value).unwrap();

        assert_eq!(tree.io_pin.data.get(&2), Some(&255));
        assert_eq!(tree.io_pin.data.len(), 2);
    }
}
