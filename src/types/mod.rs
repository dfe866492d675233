// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types exchanged with a micro:bit board.
//!
//! These are the structured records a device link returns from reads, accepts
//! on writes, and delivers with push notifications.
//!
//! # Types
//!
//! - [`ButtonState`] - Released, pressed or long-pressed
//! - [`LedMatrix`] - The 5x5 LED display
//! - [`Vector3`] - Three-axis accelerometer/magnetometer reading
//! - [`CalibrationStatus`] - Magnetometer calibration progress
//! - [`DeviceInformation`] - Model, serial and revision strings
//! - [`MicrobitEvent`] - A micro:bit message bus event
//! - [`PinValue`] / [`PinConfiguration`] - Edge connector I/O

mod button;
mod device_information;
mod led_matrix;
mod microbit_event;
mod pin;
mod vector;

pub use button::ButtonState;
pub use device_information::DeviceInformation;
pub use led_matrix::{LED_COLUMNS, LED_ROWS, LedMatrix};
pub use microbit_event::MicrobitEvent;
pub use pin::{MAX_PIN, PinConfiguration, PinValue};
pub use vector::{CalibrationStatus, Vector3};
