// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transport traits for talking to a board.
//!
//! The crate does not speak Bluetooth itself. A transport implements
//! [`DeviceLink`] for the connection and one service trait per capability;
//! [`DeviceState`](crate::DeviceState) drives those traits and mirrors their
//! results into the device tree.
//!
//! # Services
//!
//! - [`DeviceInformationService`]: model, serial and revision strings
//! - [`ButtonService`]: buttons A and B
//! - [`LedService`]: LED matrix, scrolling text
//! - [`TemperatureService`], [`AccelerometerService`], [`MagnetometerService`]: sensors
//! - [`UartService`]: line-based serial
//! - [`EventService`]: micro:bit message bus events
//! - [`IoPinService`]: edge connector pins
//!
//! Push notifications are delivered to [`Handler`]s. Registering a handler
//! returns a [`HandlerId`] that detaches it again through
//! [`Service::remove_handler`].

#[cfg(feature = "memory")]
pub mod memory;

use std::fmt;
use std::sync::Arc;

use crate::error::LinkError;
use crate::event::DeviceId;
use crate::types::{
    ButtonState, CalibrationStatus, DeviceInformation, LedMatrix, MicrobitEvent,
    PinConfiguration, PinValue, Vector3,
};

/// Callback receiving push notifications of type `T`.
pub type Handler<T> = Arc<dyn Fn(T) + Send + Sync>;

/// Identifier of a registered push handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(u64);

impl HandlerId {
    /// Creates a handler ID with the given value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handler({})", self.0)
    }
}

/// Behavior shared by every service handle.
pub trait Service: Clone + Send + Sync + 'static {
    /// Detaches a push handler registered on this service.
    ///
    /// Unknown IDs are ignored.
    fn remove_handler(&self, id: HandlerId) {
        let _ = id;
    }
}

/// Device information service.
#[allow(async_fn_in_trait)]
pub trait DeviceInformationService: Service {
    /// Reads the board's identification strings.
    ///
    /// # Errors
    ///
    /// Returns `LinkError` if the read fails.
    async fn read_device_information(&self) -> Result<DeviceInformation, LinkError>;
}

/// Button service.
#[allow(async_fn_in_trait)]
pub trait ButtonService: Service {
    /// Reads the state of button A.
    ///
    /// # Errors
    ///
    /// Returns `LinkError` if the read fails.
    async fn read_button_a_state(&self) -> Result<ButtonState, LinkError>;

    /// Reads the state of button B.
    ///
    /// # Errors
    ///
    /// Returns `LinkError` if the read fails.
    async fn read_button_b_state(&self) -> Result<ButtonState, LinkError>;

    /// Registers a handler for button A state changes.
    fn on_button_a(&self, handler: Handler<ButtonState>) -> HandlerId;

    /// Registers a handler for button B state changes.
    fn on_button_b(&self, handler: Handler<ButtonState>) -> HandlerId;
}

/// LED matrix service.
#[allow(async_fn_in_trait)]
pub trait LedService: Service {
    /// Reads the LED matrix.
    ///
    /// # Errors
    ///
    /// Returns `LinkError` if the read fails.
    async fn read_matrix_state(&self) -> Result<LedMatrix, LinkError>;

    /// Writes the LED matrix.
    ///
    /// # Errors
    ///
    /// Returns `LinkError` if the write fails.
    async fn write_matrix_state(&self, matrix: &LedMatrix) -> Result<(), LinkError>;

    /// Reads the text scrolling delay in milliseconds.
    ///
    /// # Errors
    ///
    /// Returns `LinkError` if the read fails.
    async fn read_scrolling_delay(&self) -> Result<u16, LinkError>;

    /// Writes the text scrolling delay in milliseconds.
    ///
    /// # Errors
    ///
    /// Returns `LinkError` if the write fails.
    async fn write_scrolling_delay(&self, delay: u16) -> Result<(), LinkError>;

    /// Scrolls `text` across the matrix.
    ///
    /// # Errors
    ///
    /// Returns `LinkError` if the write fails.
    async fn write_text(&self, text: &str) -> Result<(), LinkError>;
}

/// Temperature service.
#[allow(async_fn_in_trait)]
pub trait TemperatureService: Service {
    /// Reads the temperature in degrees Celsius.
    ///
    /// # Errors
    ///
    /// Returns `LinkError` if the read fails.
    async fn read_temperature(&self) -> Result<f64, LinkError>;

    /// Reads the notification period in milliseconds.
    ///
    /// # Errors
    ///
    /// Returns `LinkError` if the read fails.
    async fn read_temperature_period(&self) -> Result<u16, LinkError>;

    /// Writes the notification period in milliseconds.
    ///
    /// # Errors
    ///
    /// Returns `LinkError` if the write fails.
    async fn write_temperature_period(&self, period: u16) -> Result<(), LinkError>;

    /// Registers a handler for temperature notifications.
    fn on_temperature_changed(&self, handler: Handler<f64>) -> HandlerId;
}

/// Accelerometer service.
#[allow(async_fn_in_trait)]
pub trait AccelerometerService: Service {
    /// Reads the acceleration in g.
    ///
    /// # Errors
    ///
    /// Returns `LinkError` if the read fails.
    async fn read_accelerometer_data(&self) -> Result<Vector3, LinkError>;

    /// Reads the notification period in milliseconds.
    ///
    /// # Errors
    ///
    /// Returns `LinkError` if the read fails.
    async fn read_accelerometer_period(&self) -> Result<u16, LinkError>;

    /// Writes the notification period in milliseconds.
    ///
    /// # Errors
    ///
    /// Returns `LinkError` if the write fails.
    async fn write_accelerometer_period(&self, period: u16) -> Result<(), LinkError>;

    /// Registers a handler for acceleration notifications.
    fn on_accelerometer_changed(&self, handler: Handler<Vector3>) -> HandlerId;
}

/// Magnetometer service.
#[allow(async_fn_in_trait)]
pub trait MagnetometerService: Service {
    /// Reads the magnetic field.
    ///
    /// # Errors
    ///
    /// Returns `LinkError` if the read fails.
    async fn read_magnetometer_data(&self) -> Result<Vector3, LinkError>;

    /// Reads the compass bearing in degrees from north.
    ///
    /// # Errors
    ///
    /// Returns `LinkError` if the read fails.
    async fn read_magnetometer_bearing(&self) -> Result<u16, LinkError>;

    /// Reads the notification period in milliseconds.
    ///
    /// # Errors
    ///
    /// Returns `LinkError` if the read fails.
    async fn read_magnetometer_period(&self) -> Result<u16, LinkError>;

    /// Writes the notification period in milliseconds.
    ///
    /// # Errors
    ///
    /// Returns `LinkError` if the write fails.
    async fn write_magnetometer_period(&self, period: u16) -> Result<(), LinkError>;

    /// Runs the on-board calibration and resolves with its outcome.
    ///
    /// # Errors
    ///
    /// Returns `LinkError` if the calibration request fails.
    async fn calibrate(&self) -> Result<CalibrationStatus, LinkError>;

    /// Registers a handler for magnetic field notifications.
    fn on_magnetometer_changed(&self, handler: Handler<Vector3>) -> HandlerId;

    /// Registers a handler for bearing notifications.
    fn on_bearing_changed(&self, handler: Handler<u16>) -> HandlerId;

    /// Registers a handler for calibration progress notifications.
    fn on_calibration_changed(&self, handler: Handler<CalibrationStatus>) -> HandlerId;
}

/// Line-based UART service.
#[allow(async_fn_in_trait)]
pub trait UartService: Service {
    /// Sends a line of text to the board.
    ///
    /// # Errors
    ///
    /// Returns `LinkError` if the write fails.
    async fn send_text(&self, text: &str) -> Result<(), LinkError>;

    /// Registers a handler for lines received from the board.
    fn on_receive_text(&self, handler: Handler<String>) -> HandlerId;
}

/// Message bus event service.
#[allow(async_fn_in_trait)]
pub trait EventService: Service {
    /// Reads the last event raised by the board.
    ///
    /// # Errors
    ///
    /// Returns `LinkError` if the read fails.
    async fn read_microbit_event(&self) -> Result<MicrobitEvent, LinkError>;

    /// Raises an event on the board's message bus.
    ///
    /// # Errors
    ///
    /// Returns `LinkError` if the write fails.
    async fn write_client_event(&self, event: &MicrobitEvent) -> Result<(), LinkError>;

    /// Registers a handler for events raised by the board.
    fn on_microbit_event(&self, handler: Handler<MicrobitEvent>) -> HandlerId;
}

/// Edge connector I/O pin service.
#[allow(async_fn_in_trait)]
pub trait IoPinService: Service {
    /// Reads the value of every input pin.
    ///
    /// # Errors
    ///
    /// Returns `LinkError` if the read fails.
    async fn read_pin_data(&self) -> Result<Vec<PinValue>, LinkError>;

    /// Writes output pin values.
    ///
    /// # Errors
    ///
    /// Returns `LinkError` if the write fails.
    async fn write_pin_data(&self, values: &[PinValue]) -> Result<(), LinkError>;

    /// Writes the analog/digital and input/output configuration bitmasks.
    ///
    /// # Errors
    ///
    /// Returns `LinkError` if the write fails.
    async fn write_pin_configuration(&self, configuration: PinConfiguration)
    -> Result<(), LinkError>;

    /// Registers a handler for input pin changes.
    fn on_pin_data_changed(&self, handler: Handler<Vec<PinValue>>) -> HandlerId;
}

/// Connection to one board.
///
/// Each associated type is the handle for one capability. A transport
/// typically implements them all on one or a few types.
#[allow(async_fn_in_trait)]
pub trait DeviceLink: Send + Sync + Sized + 'static {
    type DeviceInformation: DeviceInformationService;
    type Button: ButtonService;
    type Led: LedService;
    type Temperature: TemperatureService;
    type Accelerometer: AccelerometerService;
    type Magnetometer: MagnetometerService;
    type Uart: UartService;
    type Event: EventService;
    type IoPin: IoPinService;

    /// Stable identifier of the board.
    fn id(&self) -> DeviceId;

    /// Advertised name of the board, if any.
    fn name(&self) -> Option<String>;

    /// Returns `true` while the underlying connection is up.
    fn is_linked(&self) -> bool;

    /// Opens the connection and discovers the board's services.
    ///
    /// Services the board does not expose are `None` in the returned map.
    ///
    /// # Errors
    ///
    /// Returns `LinkError` if the connection cannot be established.
    async fn connect(&self) -> Result<ServiceMap<Self>, LinkError>;

    /// Closes the connection.
    ///
    /// Disconnect handlers fire once the connection is down.
    ///
    /// # Errors
    ///
    /// Returns `LinkError` if the request fails.
    async fn disconnect(&self) -> Result<(), LinkError>;

    /// Registers a handler fired when the connection drops.
    fn on_disconnected(&self, handler: Handler<()>) -> HandlerId;

    /// Detaches a disconnect handler.
    fn remove_disconnect_handler(&self, id: HandlerId);
}

/// Services discovered on a board.
pub struct ServiceMap<L: DeviceLink> {
    pub device_information: Option<L::DeviceInformation>,
    pub button: Option<L::Button>,
    pub led: Option<L::Led>,
    pub temperature: Option<L::Temperature>,
    pub accelerometer: Option<L::Accelerometer>,
    pub magnetometer: Option<L::Magnetometer>,
    pub uart: Option<L::Uart>,
    pub event: Option<L::Event>,
    pub io_pin: Option<L::IoPin>,
}

impl<L: DeviceLink> Default for ServiceMap<L> {
    fn default() -> Self {
        Self {
            device_information: None,
            button: None,
            led: None,
            temperature: None,
            accelerometer: None,
            magnetometer: None,
            uart: None,
            event: None,
            io_pin: None,
        }
    }
}

impl<L: DeviceLink> Clone for ServiceMap<L> {
    fn clone(&self) -> Self {
        Self {
            device_information: self.device_information.clone(),
            button: self.button.clone(),
            led: self.led.clone(),
            temperature: self.temperature.clone(),
            accelerometer: self.accelerometer.clone(),
            magnetometer: self.magnetometer.clone(),
            uart: self.uart.clone(),
            event: self.event.clone(),
            io_pin: self.io_pin.clone(),
        }
    }
}

impl<L: DeviceLink> fmt::Debug for ServiceMap<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceMap")
            .field("device_information", &self.device_information.is_some())
            .field("button", &self.button.is_some())
            .field("led", &self.led.is_some())
            .field("temperature", &self.temperature.is_some())
            .field("accelerometer", &self.accelerometer.is_some())
            .field("magnetometer", &self.magnetometer.is_some())
            .field("uart", &self.uart.is_some())
            .field("event", &self.event.is_some())
            .field("io_pin", &self.io_pin.is_some())
            .finish()
    }
}

/// Source of boards chosen by the user or discovered nearby.
#[allow(async_fn_in_trait)]
pub trait Scanner {
    /// Link type produced by the scanner.
    type Link: DeviceLink;

    /// Requests one board.
    ///
    /// # Errors
    ///
    /// Returns `LinkError` if no board was selected or discovery failed.
    async fn request_device(&self) -> Result<Self::Link, LinkError>;
}
