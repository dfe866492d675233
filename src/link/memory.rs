// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory board for tests and demos.
//!
//! [`MemoryLink`] implements [`DeviceLink`] and every service trait against a
//! scripted board held in memory. Values can be preset, push notifications
//! emitted, failures injected for the next call of an operation, and an
//! artificial latency added to every call.
//!
//! # Examples
//!
//! ```
//! use microbit_sync::Capability;
//! use microbit_sync::link::memory::MemoryLink;
//!
//! let link = MemoryLink::builder("abc")
//!     .name("BBC micro:bit [zatig]")
//!     .with_service(Capability::Temperature)
//!     .build();
//!
//! link.set_temperature(21.5);
//! assert!(!link.is_connected());
//! ```

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{
    AccelerometerService, ButtonService, DeviceInformationService, DeviceLink, EventService,
    Handler, HandlerId, IoPinService, LedService, MagnetometerService, Scanner, Service,
    ServiceMap, TemperatureService, UartService,
};
use crate::capabilities::{Capabilities, Capability};
use crate::error::LinkError;
use crate::event::DeviceId;
use crate::types::{
    ButtonState, CalibrationStatus, DeviceInformation, LedMatrix, MicrobitEvent,
    PinConfiguration, PinValue, Vector3,
};

/// Push notification channels of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Topic {
    ButtonA,
    ButtonB,
    Temperature,
    Accelerometer,
    Magnetometer,
    Bearing,
    Calibration,
    Uart,
    Event,
    Pins,
}

type RawHandler = Arc<dyn Fn(&Value) + Send + Sync>;

/// Values held by the simulated board.
#[derive(Debug, Clone, Default)]
pub struct Board {
    pub device_information: DeviceInformation,
    pub button_a: Option<ButtonState>,
    pub button_b: Option<ButtonState>,
    pub matrix: LedMatrix,
    pub scrolling_delay: u16,
    pub scrolled_text: Vec<String>,
    pub temperature: f64,
    pub temperature_period: u16,
    pub acceleration: Vector3,
    pub accelerometer_period: u16,
    pub magnetic_field: Vector3,
    pub bearing: u16,
    pub magnetometer_period: u16,
    pub calibration: Option<CalibrationStatus>,
    pub uart_received: Vec<String>,
    pub microbit_event: Option<MicrobitEvent>,
    pub client_events: Vec<MicrobitEvent>,
    pub pins: Vec<PinValue>,
    pub pin_configuration: PinConfiguration,
}

struct Shared {
    id: DeviceId,
    name: Option<String>,
    services: Capabilities,
    latency: Duration,
    linked: AtomicBool,
    next_handler: AtomicU64,
    board: Mutex<Board>,
    handlers: RwLock<Vec<(HandlerId, Topic, RawHandler)>>,
    disconnect_handlers: RwLock<Vec<(HandlerId, Handler<()>)>>,
    failures: Mutex<HashSet<String>>,
    calls: Mutex<Vec<String>>,
}

/// Scripted in-memory board.
///
/// Cloning yields another handle to the same board.
#[derive(Clone)]
pub struct MemoryLink {
    shared: Arc<Shared>,
}

/// Builder for [`MemoryLink`].
#[derive(Debug)]
pub struct MemoryLinkBuilder {
    id: DeviceId,
    name: Option<String>,
    services: Capabilities,
    latency: Duration,
    board: Board,
}

impl MemoryLinkBuilder {
    /// Sets the advertised name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Exposes `capability` on the board.
    #[must_use]
    pub fn with_service(mut self, capability: Capability) -> Self {
        self.services.set(capability, true);
        self
    }

    /// Exposes every capability.
    #[must_use]
    pub fn with_all_services(mut self) -> Self {
        self.services = Capabilities::all();
        self
    }

    /// Adds `latency` to every call.
    #[must_use]
    pub fn latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Sets the initial board values.
    #[must_use]
    pub fn board(mut self, board: Board) -> Self {
        self.board = board;
        self
    }

    /// Builds the link.
    #[must_use]
    pub fn build(self) -> MemoryLink {
        MemoryLink {
            shared: Arc::new(Shared {
                id: self.id,
                name: self.name,
                services: self.services,
                latency: self.latency,
                linked: AtomicBool::new(false),
                next_handler: AtomicU64::new(1),
                board: Mutex::new(self.board),
                handlers: RwLock::new(Vec::new()),
                disconnect_handlers: RwLock::new(Vec::new()),
                failures: Mutex::new(HashSet::new()),
                calls: Mutex::new(Vec::new()),
            }),
        }
    }
}

impl MemoryLink {
    /// Starts building a board with identifier `id` and no services.
    #[must_use]
    pub fn builder(id: impl Into<DeviceId>) -> MemoryLinkBuilder {
        MemoryLinkBuilder {
            id: id.into(),
            name: None,
            services: Capabilities::none(),
            latency: Duration::ZERO,
            board: Board::default(),
        }
    }

    /// Returns `true` while connected.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.shared.linked.load(Ordering::SeqCst)
    }

    /// Services the board exposes.
    #[must_use]
    pub fn services(&self) -> Capabilities {
        self.shared.services
    }

    /// Returns a copy of the board values.
    #[must_use]
    pub fn board(&self) -> Board {
        self.shared.board.lock().clone()
    }

    /// Makes the next call of `operation` fail with [`LinkError::Rejected`].
    ///
    /// `operation` is the trait method name, e.g. `"read_temperature"` or
    /// `"connect"`.
    pub fn fail_next(&self, operation: &str) {
        self.shared.failures.lock().insert(operation.to_string());
    }

    /// Names of the operations called so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.shared.calls.lock().clone()
    }

    /// Number of push handlers currently registered.
    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.shared.handlers.read().len() + self.shared.disconnect_handlers.read().len()
    }

    // ========== Board values ==========

    pub fn set_device_information(&self, info: DeviceInformation) {
        self.shared.board.lock().device_information = info;
    }

    pub fn set_button_a(&self, state: ButtonState) {
        self.shared.board.lock().button_a = Some(state);
    }

    pub fn set_button_b(&self, state: ButtonState) {
        self.shared.board.lock().button_b = Some(state);
    }

    pub fn set_matrix(&self, matrix: LedMatrix) {
        self.shared.board.lock().matrix = matrix;
    }

    pub fn set_temperature(&self, celsius: f64) {
        self.shared.board.lock().temperature = celsius;
    }

    pub fn set_acceleration(&self, acceleration: Vector3) {
        self.shared.board.lock().acceleration = acceleration;
    }

    pub fn set_magnetic_field(&self, field: Vector3) {
        self.shared.board.lock().magnetic_field = field;
    }

    pub fn set_bearing(&self, bearing: u16) {
        self.shared.board.lock().bearing = bearing;
    }

    pub fn set_microbit_event(&self, event: MicrobitEvent) {
        self.shared.board.lock().microbit_event = Some(event);
    }

    pub fn set_pins(&self, pins: Vec<PinValue>) {
        self.shared.board.lock().pins = pins;
    }

    // ========== Push notifications ==========

    /// Presses or releases button A and notifies.
    pub fn emit_button_a(&self, state: ButtonState) {
        self.set_button_a(state);
        self.emit(Topic::ButtonA, &state);
    }

    /// Presses or releases button B and notifies.
    pub fn emit_button_b(&self, state: ButtonState) {
        self.set_button_b(state);
        self.emit(Topic::ButtonB, &state);
    }

    pub fn emit_temperature(&self, celsius: f64) {
        self.set_temperature(celsius);
        self.emit(Topic::Temperature, &celsius);
    }

    pub fn emit_acceleration(&self, acceleration: Vector3) {
        self.set_acceleration(acceleration);
        self.emit(Topic::Accelerometer, &acceleration);
    }

    pub fn emit_magnetic_field(&self, field: Vector3) {
        self.set_magnetic_field(field);
        self.emit(Topic::Magnetometer, &field);
    }

    pub fn emit_bearing(&self, bearing: u16) {
        self.set_bearing(bearing);
        self.emit(Topic::Bearing, &bearing);
    }

    pub fn emit_calibration(&self, status: CalibrationStatus) {
        self.shared.board.lock().calibration = Some(status);
        self.emit(Topic::Calibration, &status);
    }

    /// Sends a line from the board over UART.
    pub fn emit_uart(&self, line: &str) {
        self.emit(Topic::Uart, &line);
    }

    pub fn emit_microbit_event(&self, event: MicrobitEvent) {
        self.set_microbit_event(event);
        self.emit(Topic::Event, &event);
    }

    pub fn emit_pins(&self, pins: Vec<PinValue>) {
        self.emit(Topic::Pins, &pins);
        self.set_pins(pins);
    }

    /// Simulates the board going out of range.
    pub fn drop_connection(&self) {
        if self.shared.linked.swap(false, Ordering::SeqCst) {
            self.fire_disconnected();
        }
    }

    // ========== Internals ==========

    async fn call(&self, operation: &str) -> Result<(), LinkError> {
        self.shared.calls.lock().push(operation.to_string());
        if !self.shared.latency.is_zero() {
            tokio::time::sleep(self.shared.latency).await;
        }
        if self.shared.failures.lock().remove(operation) {
            return Err(LinkError::rejected(operation, "injected failure"));
        }
        if operation != "connect" && !self.is_connected() {
            return Err(LinkError::NotConnected);
        }
        Ok(())
    }

    fn next_handler_id(&self) -> HandlerId {
        HandlerId::new(self.shared.next_handler.fetch_add(1, Ordering::Relaxed))
    }

    fn register<T>(&self, topic: Topic, handler: Handler<T>) -> HandlerId
    where
        T: DeserializeOwned + 'static,
    {
        let id = self.next_handler_id();
        let raw: RawHandler = Arc::new(move |value: &Value| {
            match serde_json::from_value::<T>(value.clone()) {
                Ok(payload) => handler(payload),
                Err(e) => tracing::warn!(error = %e, "Dropping malformed notification"),
            }
        });
        self.shared.handlers.write().push((id, topic, raw));
        id
    }

    fn emit<T: Serialize>(&self, topic: Topic, payload: &T) {
        let Ok(value) = serde_json::to_value(payload) else {
            return;
        };
        let targets: Vec<RawHandler> = self
            .shared
            .handlers
            .read()
            .iter()
            .filter(|(_, t, _)| *t == topic)
            .map(|(_, _, h)| Arc::clone(h))
            .collect();
        for handler in targets {
            handler(&value);
        }
    }

    fn fire_disconnected(&self) {
        let targets: Vec<Handler<()>> = self
            .shared
            .disconnect_handlers
            .read()
            .iter()
            .map(|(_, h)| Arc::clone(h))
            .collect();
        tracing::debug!(device_id = %self.shared.id, "Memory link disconnected");
        for handler in targets {
            handler(());
        }
    }

    fn service_map(&self) -> ServiceMap<Self> {
        let has = |capability| self.shared.services.supports(capability).then(|| self.clone());
        ServiceMap {
            device_information: has(Capability::DeviceInformation),
            button: has(Capability::Button),
            led: has(Capability::Led),
            temperature: has(Capability::Temperature),
            accelerometer: has(Capability::Accelerometer),
            magnetometer: has(Capability::Magnetometer),
            uart: has(Capability::Uart),
            event: has(Capability::Event),
            io_pin: has(Capability::IoPin),
        }
    }

    fn board_read<T>(&self, f: impl FnOnce(&Board) -> T) -> T {
        f(&self.shared.board.lock())
    }

    fn board_write(&self, f: impl FnOnce(&mut Board)) {
        f(&mut self.shared.board.lock());
    }
}

impl std::fmt::Debug for MemoryLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryLink")
            .field("id", &self.shared.id)
            .field("connected", &self.is_connected())
            .field("services", &self.shared.services)
            .finish_non_exhaustive()
    }
}

// ========== Trait implementations ==========

impl Service for MemoryLink {
    fn remove_handler(&self, id: HandlerId) {
        self.shared.handlers.write().retain(|(entry, _, _)| *entry != id);
    }
}

impl DeviceLink for MemoryLink {
    type DeviceInformation = Self;
    type Button = Self;
    type Led = Self;
    type Temperature = Self;
    type Accelerometer = Self;
    type Magnetometer = Self;
    type Uart = Self;
    type Event = Self;
    type IoPin = Self;

    fn id(&self) -> DeviceId {
        self.shared.id.clone()
    }

    fn name(&self) -> Option<String> {
        self.shared.name.clone()
    }

    fn is_linked(&self) -> bool {
        self.is_connected()
    }

    async fn connect(&self) -> Result<ServiceMap<Self>, LinkError> {
        self.call("connect").await?;
        self.shared.linked.store(true, Ordering::SeqCst);
        Ok(self.service_map())
    }

    async fn disconnect(&self) -> Result<(), LinkError> {
        self.call("disconnect").await?;
        self.drop_connection();
        Ok(())
    }

    fn on_disconnected(&self, handler: Handler<()>) -> HandlerId {
        let id = self.next_handler_id();
        self.shared.disconnect_handlers.write().push((id, handler));
        id
    }

    fn remove_disconnect_handler(&self, id: HandlerId) {
        self.shared
            .disconnect_handlers
            .write()
            .retain(|(entry, _)| *entry != id);
    }
}

impl DeviceInformationService for MemoryLink {
    async fn read_device_information(&self) -> Result<DeviceInformation, LinkError> {
        self.call("read_device_information").await?;
        Ok(self.board_read(|b| b.device_information.clone()))
    }
}

impl ButtonService for MemoryLink {
    async fn read_button_a_state(&self) -> Result<ButtonState, LinkError> {
        self.call("read_button_a_state").await?;
        Ok(self.board_read(|b| b.button_a.unwrap_or(ButtonState::Release)))
    }

    async fn read_button_b_state(&self) -> Result<ButtonState, LinkError> {
        self.call("read_button_b_state").await?;
        Ok(self.board_read(|b| b.button_b.unwrap_or(ButtonState::Release)))
    }

    fn on_button_a(&self, handler: Handler<ButtonState>) -> HandlerId {
        self.register(Topic::ButtonA, handler)
    }

    fn on_button_b(&self, handler: Handler<ButtonState>) -> HandlerId {
        self.register(Topic::ButtonB, handler)
    }
}

impl LedService for MemoryLink {
    async fn read_matrix_state(&self) -> Result<LedMatrix, LinkError> {
        self.call("read_matrix_state").await?;
        Ok(self.board_read(|b| b.matrix))
    }

    async fn write_matrix_state(&self, matrix: &LedMatrix) -> Result<(), LinkError> {
        self.call("write_matrix_state").await?;
        let matrix = *matrix;
        self.board_write(|b| b.matrix = matrix);
        Ok(())
    }

    async fn read_scrolling_delay(&self) -> Result<u16, LinkError> {
        self.call("read_scrolling_delay").await?;
        Ok(self.board_read(|b| b.scrolling_delay))
    }

    async fn write_scrolling_delay(&self, delay: u16) -> Result<(), LinkError> {
        self.call("write_scrolling_delay").await?;
        self.board_write(|b| b.scrolling_delay = delay);
        Ok(())
    }

    async fn write_text(&self, text: &str) -> Result<(), LinkError> {
        self.call("write_text").await?;
        self.board_write(|b| b.scrolled_text.push(text.to_string()));
        Ok(())
    }
}

impl TemperatureService for MemoryLink {
    async fn read_temperature(&self) -> Result<f64, LinkError> {
        self.call("read_temperature").await?;
        Ok(self.board_read(|b| b.temperature))
    }

    async fn read_temperature_period(&self) -> Result<u16, LinkError> {
        self.call("read_temperature_period").await?;
        Ok(self.board_read(|b| b.temperature_period))
    }

    async fn write_temperature_period(&self, period: u16) -> Result<(), LinkError> {
        self.call("write_temperature_period").await?;
        self.board_write(|b| b.temperature_period = period);
        Ok(())
    }

    fn on_temperature_changed(&self, handler: Handler<f64>) -> HandlerId {
        self.register(Topic::Temperature, handler)
    }
}

impl AccelerometerService for MemoryLink {
    async fn read_accelerometer_data(&self) -> Result<Vector3, LinkError> {
        self.call("read_accelerometer_data").await?;
        Ok(self.board_read(|b| b.acceleration))
    }

    async fn read_accelerometer_period(&self) -> Result<u16, LinkError> {
        self.call("read_accelerometer_period").await?;
        Ok(self.board_read(|b| b.accelerometer_period))
    }

    async fn write_accelerometer_period(&self, period: u16) -> Result<(), LinkError> {
        self.call("write_accelerometer_period").await?;
        self.board_write(|b| b.accelerometer_period = period);
        Ok(())
    }

    fn on_accelerometer_changed(&self, handler: Handler<Vector3>) -> HandlerId {
        self.register(Topic::Accelerometer, handler)
    }
}

impl MagnetometerService for MemoryLink {
    async fn read_magnetometer_data(&self) -> Result<Vector3, LinkError> {
        self.call("read_magnetometer_data").await?;
        Ok(self.board_read(|b| b.magnetic_field))
    }

    async fn read_magnetometer_bearing(&self) -> Result<u16, LinkError> {
        self.call("read_magnetometer_bearing").await?;
        Ok(self.board_read(|b| b.bearing))
    }

    async fn read_magnetometer_period(&self) -> Result<u16, LinkError> {
        self.call("read_magnetometer_period").await?;
        Ok(self.board_read(|b| b.magnetometer_period))
    }

    async fn write_magnetometer_period(&self, period: u16) -> Result<(), LinkError> {
        self.call("write_magnetometer_period").await?;
        self.board_write(|b| b.magnetometer_period = period);
        Ok(())
    }

    async fn calibrate(&self) -> Result<CalibrationStatus, LinkError> {
        self.call("calibrate").await?;
        self.emit_calibration(CalibrationStatus::Requested);
        self.emit_calibration(CalibrationStatus::Completed);
        Ok(CalibrationStatus::Completed)
    }

    fn on_magnetometer_changed(&self, handler: Handler<Vector3>) -> HandlerId {
        self.register(Topic::Magnetometer, handler)
    }

    fn on_bearing_changed(&self, handler: Handler<u16>) -> HandlerId {
        self.register(Topic::Bearing, handler)
    }

    fn on_calibration_changed(&self, handler: Handler<CalibrationStatus>) -> HandlerId {
        self.register(Topic::Calibration, handler)
    }
}

impl UartService for MemoryLink {
    async fn send_text(&self, text: &str) -> Result<(), LinkError> {
        self.call("send_text").await?;
        self.board_write(|b| b.uart_received.push(text.to_string()));
        Ok(())
    }

    fn on_receive_text(&self, handler: Handler<String>) -> HandlerId {
        self.register(Topic::Uart, handler)
    }
}

impl EventService for MemoryLink {
    async fn read_microbit_event(&self) -> Result<MicrobitEvent, LinkError> {
        self.call("read_microbit_event").await?;
        self.board_read(|b| b.microbit_event)
            .ok_or_else(|| LinkError::rejected("read_microbit_event", "no event raised yet"))
    }

    async fn write_client_event(&self, event: &MicrobitEvent) -> Result<(), LinkError> {
        self.call("write_client_event").await?;
        let event = *event;
        self.board_write(|b| b.client_events.push(event));
        Ok(())
    }

    fn on_microbit_event(&self, handler: Handler<MicrobitEvent>) -> HandlerId {
        self.register(Topic::Event, handler)
    }
}

impl IoPinService for MemoryLink {
    async fn read_pin_data(&self) -> Result<Vec<PinValue>, LinkError> {
        self.call("read_pin_data").await?;
        Ok(self.board_read(|b| b.pins.clone()))
    }

    async fn write_pin_data(&self, values: &[PinValue]) -> Result<(), LinkError> {
        self.call("write_pin_data").await?;
        self.board_write(|b| {
            for value in values {
                b.pins.retain(|p| p.pin() != value.pin());
                b.pins.push(*value);
            }
            b.pins.sort_by_key(PinValue::pin);
        });
        Ok(())
    }

    async fn write_pin_configuration(
        &self,
        configuration: PinConfiguration,
    ) -> Result<(), LinkError> {
        self.call("write_pin_configuration").await?;
        self.board_write(|b| b.pin_configuration = configuration);
        Ok(())
    }

    fn on_pin_data_changed(&self, handler: Handler<Vec<PinValue>>) -> HandlerId {
        self.register(Topic::Pins, handler)
    }
}

/// Scanner handing out preloaded [`MemoryLink`]s in order.
#[derive(Debug, Default)]
pub struct MemoryScanner {
    queue: Mutex<VecDeque<MemoryLink>>,
    latency: Duration,
}

impl MemoryScanner {
    /// Creates a scanner that will hand out `links` in order.
    #[must_use]
    pub fn new(links: impl IntoIterator<Item = MemoryLink>) -> Self {
        Self {
            queue: Mutex::new(links.into_iter().collect()),
            latency: Duration::ZERO,
        }
    }

    /// Adds `latency` to every request.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Queues another board.
    pub fn push(&self, link: MemoryLink) {
        self.queue.lock().push_back(link);
    }
}

impl Scanner for MemoryScanner {
    type Link = MemoryLink;

    async fn request_device(&self) -> Result<MemoryLink, LinkError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.queue
            .lock()
            .pop_front()
            .ok_or_else(|| LinkError::rejected("request_device", "no device selected"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_link() -> MemoryLink {
        MemoryLink::builder("abc").name("micro:bit").with_all_services().build()
    }

    #[tokio::test]
    async fn connect_reports_present_services_only() {
        let link = MemoryLink::builder("abc")
            .with_service(Capability::Temperature)
            .build();

        let services = link.connect().await.unwrap();

        assert!(link.is_linked());
        assert!(services.temperature.is_some());
        assert!(services.led.is_none());
        assert!(services.io_pin.is_none());
    }

    #[tokio::test]
    async fn calls_fail_while_disconnected() {
        let link = full_link();
        assert_eq!(link.read_temperature().await, Err(LinkError::NotConnected));
    }

    #[tokio::test]
    async fn injected_failure_applies_once() {
        let link = full_link();
        link.connect().await.unwrap();
        link.set_temperature(19.0);
        link.fail_next("read_temperature");

        assert!(matches!(
            link.read_temperature().await,
            Err(LinkError::Rejected { .. })
        ));
        assert_eq!(link.read_temperature().await, Ok(19.0));
        assert_eq!(link.calls(), vec!["connect", "read_temperature", "read_temperature"]);
    }

    #[tokio::test]
    async fn handlers_receive_typed_notifications() {
        let link = full_link();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let id = link.on_button_a(Arc::new(move |state: ButtonState| sink.lock().push(state)));

        link.emit_button_a(ButtonState::Press);
        link.emit_button_b(ButtonState::Press);
        link.remove_handler(id);
        link.emit_button_a(ButtonState::Release);

        assert_eq!(*seen.lock(), vec![ButtonState::Press]);
        assert_eq!(link.handler_count(), 0);
    }

    #[tokio::test]
    async fn disconnect_fires_handlers_once() {
        let link = full_link();
        link.connect().await.unwrap();
        let fired = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&fired);
        link.on_disconnected(Arc::new(move |()| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        link.disconnect().await.unwrap();
        link.drop_connection();

        assert!(!link.is_linked());
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn pin_writes_replace_by_pin_number() {
        let link = full_link();
        link.connect().await.unwrap();
        link.set_pins(vec![PinValue::new(0, 1).unwrap(), PinValue::new(2, 3).unwrap()]);

        link.write_pin_data(&[PinValue::new(2, 9).unwrap()]).await.unwrap();

        let pins = link.read_pin_data().await.unwrap();
        assert_eq!(pins, vec![PinValue::new(0, 1).unwrap(), PinValue::new(2, 9).unwrap()]);
    }

    #[tokio::test]
    async fn scanner_hands_out_links_in_order() {
        let scanner = MemoryScanner::new([full_link()]);
        assert_eq!(scanner.request_device().await.unwrap().id(), DeviceId::new("abc"));
        assert!(scanner.request_device().await.is_err());
    }
}
