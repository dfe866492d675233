// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state tree layout.
//!
//! - [`DeviceTree`] - Typed view of one device's tree
//! - [`paths`] - Addresses of its well-known fields

pub mod paths;
mod tree;

pub use tree::{
    AccelerometerSection, Axes, ButtonSection, Calibration, Connection, DeviceInformationSection,
    DeviceTree, EventRecord, EventSection, IoPinSection, LedSection, MagnetometerSection,
    Outgoing, PinConfigurationRecord, PinConfigurationSection, Reading, Setting,
    TemperatureSection, UartSection,
};
