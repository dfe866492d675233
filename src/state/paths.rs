// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Addresses of the well-known fields of a device tree.

// ========== Identity ==========

pub const ID: &str = "id";
pub const NAME: &str = "name";

// ========== Connection ==========

pub const CONNECTING: &str = "connection.connecting";
pub const CONNECTED: &str = "connection.connected";
pub const DISCONNECTING: &str = "connection.disconnecting";

// ========== Device Information ==========

pub const DEVICE_INFORMATION_LOADING: &str = "deviceInformation.loading";
pub const DEVICE_INFORMATION_DATA: &str = "deviceInformation.data";

// ========== Buttons ==========

pub const BUTTON_A_LOADING: &str = "button.a.loading";
pub const BUTTON_A_DATA: &str = "button.a.data";
pub const BUTTON_B_LOADING: &str = "button.b.loading";
pub const BUTTON_B_DATA: &str = "button.b.data";

// ========== LED ==========

pub const LED_LOADING: &str = "led.loading";
pub const LED_UPDATING: &str = "led.updating";
pub const LED_DATA: &str = "led.data";
pub const LED_SCROLLING_DELAY_LOADING: &str = "led.scrollingDelay.loading";
pub const LED_SCROLLING_DELAY_UPDATING: &str = "led.scrollingDelay.updating";
pub const LED_SCROLLING_DELAY_DATA: &str = "led.scrollingDelay.data";
pub const LED_TEXT_SENDING: &str = "led.text.sending";
pub const LED_TEXT_DATA: &str = "led.text.data";

// ========== Temperature ==========

pub const TEMPERATURE_LOADING: &str = "temperature.loading";
pub const TEMPERATURE_DATA: &str = "temperature.data";
pub const TEMPERATURE_PERIOD_LOADING: &str = "temperature.period.loading";
pub const TEMPERATURE_PERIOD_UPDATING: &str = "temperature.period.updating";
pub const TEMPERATURE_PERIOD_DATA: &str = "temperature.period.data";

// ========== Accelerometer ==========

pub const ACCELEROMETER_LOADING: &str = "accelerometer.loading";
pub const ACCELEROMETER_DATA: &str = "accelerometer.data";
pub const ACCELEROMETER_PERIOD_LOADING: &str = "accelerometer.period.loading";
pub const ACCELEROMETER_PERIOD_UPDATING: &str = "accelerometer.period.updating";
pub const ACCELEROMETER_PERIOD_DATA: &str = "accelerometer.period.data";

// ========== Magnetometer ==========

pub const MAGNETOMETER_LOADING: &str = "magnetometer.loading";
pub const MAGNETOMETER_DATA: &str = "magnetometer.data";
pub const MAGNETOMETER_BEARING_LOADING: &str = "magnetometer.bearing.loading";
pub const MAGNETOMETER_BEARING_DATA: &str = "magnetometer.bearing.data";
pub const MAGNETOMETER_CALIBRATION_DOING: &str = "magnetometer.calibration.doing";
pub const MAGNETOMETER_CALIBRATION_DATA: &str = "magnetometer.calibration.data";
pub const MAGNETOMETER_PERIOD_LOADING: &str = "magnetometer.period.loading";
pub const MAGNETOMETER_PERIOD_UPDATING: &str = "magnetometer.period.updating";
pub const MAGNETOMETER_PERIOD_DATA: &str = "magnetometer.period.data";

// ========== UART ==========

pub const UART_SENDING: &str = "uart.sending";
pub const UART_DATA: &str = "uart.data";
pub const UART_SENT: &str = "uart.sent";

// ========== Event ==========

pub const EVENT_LOADING: &str = "event.loading";
pub const EVENT_SENDING: &str = "event.sending";
pub const EVENT_DATA: &str = "event.data";
pub const EVENT_SENT: &str = "event.sent";

// ========== I/O Pins ==========

pub const IO_PIN_LOADING: &str = "ioPin.loading";
pub const IO_PIN_UPDATING: &str = "ioPin.updating";
pub const IO_PIN_DATA: &str = "ioPin.data";
pub const IO_PIN_CONFIGURATION_UPDATING: &str = "ioPin.configuration.updating";
pub const IO_PIN_CONFIGURATION_DATA: &str = "ioPin.configuration.data";
