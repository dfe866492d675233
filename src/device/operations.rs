// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Capability operations.
//!
//! Every operation raises its flag, awaits the transport, commits the result
//! and clears the flag, in that order. Reads return `Ok(None)` and writes
//! `Ok(false)` when the capability is not available, without touching the
//! tree. Transport errors are returned unchanged once the flag is cleared.

use super::DeviceState;
use super::notifications::pin_map;
use crate::error::Result;
use crate::link::{
    AccelerometerService, ButtonService, DeviceInformationService, DeviceLink, EventService,
    IoPinService, LedService, MagnetometerService, TemperatureService, UartService,
};
use crate::state::paths;
use crate::types::{
    ButtonState, CalibrationStatus, DeviceInformation, LedMatrix, MicrobitEvent,
    PinConfiguration, PinValue, Vector3,
};

impl<L: DeviceLink> DeviceState<L> {
    // ========== Device Information ==========

    /// Reads the model, serial and revision strings.
    ///
    /// # Errors
    ///
    /// Returns `Error::Destroyed` after `destroy()`, or the transport error.
    pub async fn read_device_information(&self) -> Result<Option<DeviceInformation>> {
        let Some(service) = self.service(|s| s.device_information.clone())? else {
            return Ok(None);
        };
        let _loading = self.raise(paths::DEVICE_INFORMATION_LOADING);
        let info = service.read_device_information().await?;
        self.commit(paths::DEVICE_INFORMATION_DATA, &info)?;
        Ok(Some(info))
    }

    // ========== Buttons ==========

    /// Reads the state of button A.
    ///
    /// # Errors
    ///
    /// Returns `Error::Destroyed` after `destroy()`, or the transport error.
    pub async fn read_button_a(&self) -> Result<Option<ButtonState>> {
        let Some(service) = self.service(|s| s.button.clone())? else {
            return Ok(None);
        };
        let _loading = self.raise(paths::BUTTON_A_LOADING);
        let state = service.read_button_a_state().await?;
        self.commit(paths::BUTTON_A_DATA, &state)?;
        Ok(Some(state))
    }

    /// Reads the state of button B.
    ///
    /// # Errors
    ///
    /// Returns `Error::Destroyed` after `destroy()`, or the transport error.
    pub async fn read_button_b(&self) -> Result<Option<ButtonState>> {
        let Some(service) = self.service(|s| s.button.clone())? else {
            return Ok(None);
        };
        let _loading = self.raise(paths::BUTTON_B_LOADING);
        let state = service.read_button_b_state().await?;
        self.commit(paths::BUTTON_B_DATA, &state)?;
        Ok(Some(state))
    }

    // ========== LED ==========

    /// Reads the LED matrix.
    ///
    /// # Errors
    ///
    /// Returns `Error::Destroyed` after `destroy()`, or the transport error.
    pub async fn read_matrix(&self) -> Result<Option<LedMatrix>> {
        let Some(service) = self.service(|s| s.led.clone())? else {
            return Ok(None);
        };
        let _loading = self.raise(paths::LED_LOADING);
        let matrix = service.read_matrix_state().await?;
        self.commit(paths::LED_DATA, &matrix)?;
        Ok(Some(matrix))
    }

    /// Writes the LED matrix.
    ///
    /// Only cells that differ from the known matrix produce notifications.
    ///
    /// # Errors
    ///
    /// Returns `Error::Destroyed` after `destroy()`, or the transport error.
    pub async fn write_matrix(&self, matrix: &LedMatrix) -> Result<bool> {
        let Some(service) = self.service(|s| s.led.clone())? else {
            return Ok(false);
        };
        let _updating = self.raise(paths::LED_UPDATING);
        service.write_matrix_state(matrix).await?;
        self.commit(paths::LED_DATA, matrix)?;
        Ok(true)
    }

    /// Reads the text scrolling delay in milliseconds.
    ///
    /// # Errors
    ///
    /// Returns `Error::Destroyed` after `destroy()`, or the transport error.
    pub async fn read_scrolling_delay(&self) -> Result<Option<u16>> {
        let Some(service) = self.service(|s| s.led.clone())? else {
            return Ok(None);
        };
        let _loading = self.raise(paths::LED_SCROLLING_DELAY_LOADING);
        let delay = service.read_scrolling_delay().await?;
        self.write(paths::LED_SCROLLING_DELAY_DATA, delay)?;
        Ok(Some(delay))
    }

    /// Writes the text scrolling delay in milliseconds.
    ///
    /// # Errors
    ///
    /// Returns `Error::Destroyed` after `destroy()`, or the transport error.
    pub async fn write_scrolling_delay(&self, delay: u16) -> Result<bool> {
        let Some(service) = self.service(|s| s.led.clone())? else {
            return Ok(false);
        };
        let _updating = self.raise(paths::LED_SCROLLING_DELAY_UPDATING);
        service.write_scrolling_delay(delay).await?;
        self.write(paths::LED_SCROLLING_DELAY_DATA, delay)?;
        Ok(true)
    }

    /// Scrolls `text` across the LED matrix.
    ///
    /// # Errors
    ///
    /// Returns `Error::Destroyed` after `destroy()`, or the transport error.
    pub async fn write_text(&self, text: &str) -> Result<bool> {
        let Some(service) = self.service(|s| s.led.clone())? else {
            return Ok(false);
        };
        let _sending = self.raise(paths::LED_TEXT_SENDING);
        service.write_text(text).await?;
        self.write(paths::LED_TEXT_DATA, text)?;
        Ok(true)
    }

    // ========== Temperature ==========

    /// Reads the temperature in degrees Celsius.
    ///
    /// # Errors
    ///
    /// Returns `Error::Destroyed` after `destroy()`, or the transport error.
    pub async fn read_temperature(&self) -> Result<Option<f64>> {
        let Some(service) = self.service(|s| s.temperature.clone())? else {
            return Ok(None);
        };
        let _loading = self.raise(paths::TEMPERATURE_LOADING);
        let celsius = service.read_temperature().await?;
        self.write(paths::TEMPERATURE_DATA, celsius)?;
        Ok(Some(celsius))
    }

    /// Reads the temperature notification period in milliseconds.
    ///
    /// # Errors
    ///
    /// Returns `Error::Destroyed` after `destroy()`, or the transport error.
    pub async fn read_temperature_period(&self) -> Result<Option<u16>> {
        let Some(service) = self.service(|s| s.temperature.clone())? else {
            return Ok(None);
        };
        let _loading = self.raise(paths::TEMPERATURE_PERIOD_LOADING);
        let period = service.read_temperature_period().await?;
        self.write(paths::TEMPERATURE_PERIOD_DATA, period)?;
        Ok(Some(period))
    }

    /// Writes the temperature notification period in milliseconds.
    ///
    /// # Errors
    ///
    /// Returns `Error::Destroyed` after `destroy()`, or the transport error.
    pub async fn write_temperature_period(&self, period: u16) -> Result<bool> {
        let Some(service) = self.service(|s| s.temperature.clone())? else {
            return Ok(false);
        };
        let _updating = self.raise(paths::TEMPERATURE_PERIOD_UPDATING);
        service.write_temperature_period(period).await?;
        self.write(paths::TEMPERATURE_PERIOD_DATA, period)?;
        Ok(true)
    }

    // ========== Accelerometer ==========

    /// Reads the acceleration in g.
    ///
    /// # Errors
    ///
    /// Returns `Error::Destroyed` after `destroy()`, or the transport error.
    pub async fn read_accelerometer(&self) -> Result<Option<Vector3>> {
        let Some(service) = self.service(|s| s.accelerometer.clone())? else {
            return Ok(None);
        };
        let _loading = self.raise(paths::ACCELEROMETER_LOADING);
        let acceleration = service.read_accelerometer_data().await?;
        self.commit(paths::ACCELEROMETER_DATA, &acceleration)?;
        Ok(Some(acceleration))
    }

    /// Reads the accelerometer notification period in milliseconds.
    ///
    /// # Errors
    ///
    /// Returns `Error::Destroyed` after `destroy()`, or the transport error.
    pub async fn read_accelerometer_period(&self) -> Result<Option<u16>> {
        let Some(service) = self.service(|s| s.accelerometer.clone())? else {
            return Ok(None);
        };
        let _loading = self.raise(paths::ACCELEROMETER_PERIOD_LOADING);
        let period = service.read_accelerometer_period().await?;
        self.write(paths::ACCELEROMETER_PERIOD_DATA, period)?;
        Ok(Some(period))
    }

    /// Writes the accelerometer notification period in milliseconds.
    ///
    /// # Errors
    ///
    /// Returns `Error::Destroyed` after `destroy()`, or the transport error.
    pub async fn write_accelerometer_period(&self, period: u16) -> Result<bool> {
        let Some(service) = self.service(|s| s.accelerometer.clone())? else {
            return Ok(false);
        };
        let _updating = self.raise(paths::ACCELEROMETER_PERIOD_UPDATING);
        service.write_accelerometer_period(period).await?;
        self.write(paths::ACCELEROMETER_PERIOD_DATA, period)?;
        Ok(true)
    }

    // ========== Magnetometer ==========

    /// Reads the magnetic field.
    ///
    /// # Errors
    ///
    /// Returns `Error::Destroyed` after `destroy()`, or the transport error.
    pub async fn read_magnetometer(&self) -> Result<Option<Vector3>> {
        let Some(service) = self.service(|s| s.magnetometer.clone())? else {
            return Ok(None);
        };
        let _loading = self.raise(paths::MAGNETOMETER_LOADING);
        let field = service.read_magnetometer_data().await?;
        self.commit(paths::MAGNETOMETER_DATA, &field)?;
        Ok(Some(field))
    }

    /// Reads the compass bearing in degrees.
    ///
    /// # Errors
    ///
    /// Returns `Error::Destroyed` after `destroy()`, or the transport error.
    pub async fn read_bearing(&self) -> Result<Option<u16>> {
        let Some(service) = self.service(|s| s.magnetometer.clone())? else {
            return Ok(None);
        };
        let _loading = self.raise(paths::MAGNETOMETER_BEARING_LOADING);
        let bearing = service.read_magnetometer_bearing().await?;
        self.write(paths::MAGNETOMETER_BEARING_DATA, bearing)?;
        Ok(Some(bearing))
    }

    /// Runs the on-board compass calibration.
    ///
    /// `magnetometer.calibration.doing` stays true until the board reports
    /// the outcome.
    ///
    /// # Errors
    ///
    /// Returns `Error::Destroyed` after `destroy()`, or the transport error.
    pub async fn calibrate_magnetometer(&self) -> Result<Option<CalibrationStatus>> {
        let Some(service) = self.service(|s| s.magnetometer.clone())? else {
            return Ok(None);
        };
        let _doing = self.raise(paths::MAGNETOMETER_CALIBRATION_DOING);
        let status = service.calibrate().await?;
        self.commit(paths::MAGNETOMETER_CALIBRATION_DATA, &status)?;
        Ok(Some(status))
    }

    /// Reads the magnetometer notification period in milliseconds.
    ///
    /// # Errors
    ///
    /// Returns `Error::Destroyed` after `destroy()`, or the transport error.
    pub async fn read_magnetometer_period(&self) -> Result<Option<u16>> {
        let Some(service) = self.service(|s| s.magnetometer.clone())? else {
            return Ok(None);
        };
        let _loading = self.raise(paths::MAGNETOMETER_PERIOD_LOADING);
        let period = service.read_magnetometer_period().await?;
        self.write(paths::MAGNETOMETER_PERIOD_DATA, period)?;
        Ok(Some(period))
    }

    /// Writes the magnetometer notification period in milliseconds.
    ///
    /// # Errors
    ///
    /// Returns `Error::Destroyed` after `destroy()`, or the transport error.
    pub async fn write_magnetometer_period(&self, period: u16) -> Result<bool> {
        let Some(service) = self.service(|s| s.magnetometer.clone())? else {
            return Ok(false);
        };
        let _updating = self.raise(paths::MAGNETOMETER_PERIOD_UPDATING);
        service.write_magnetometer_period(period).await?;
        self.write(paths::MAGNETOMETER_PERIOD_DATA, period)?;
        Ok(true)
    }

    // ========== UART ==========

    /// Sends a line of text over UART.
    ///
    /// # Errors
    ///
    /// Returns `Error::Destroyed` after `destroy()`, or the transport error.
    pub async fn send_text(&self, text: &str) -> Result<bool> {
        let Some(service) = self.service(|s| s.uart.clone())? else {
            return Ok(false);
        };
        let _sending = self.raise(paths::UART_SENDING);
        service.send_text(text).await?;
        self.write(paths::UART_SENT, text)?;
        Ok(true)
    }

    // ========== Event ==========

    /// Reads the last event the board raised.
    ///
    /// # Errors
    ///
    /// Returns `Error::Destroyed` after `destroy()`, or the transport error.
    pub async fn read_event(&self) -> Result<Option<MicrobitEvent>> {
        let Some(service) = self.service(|s| s.event.clone())? else {
            return Ok(None);
        };
        let _loading = self.raise(paths::EVENT_LOADING);
        let event = service.read_microbit_event().await?;
        self.commit(paths::EVENT_DATA, &event)?;
        Ok(Some(event))
    }

    /// Raises `event` on the board's message bus.
    ///
    /// # Errors
    ///
    /// Returns `Error::Destroyed` after `destroy()`, or the transport error.
    pub async fn write_event(&self, event: &MicrobitEvent) -> Result<bool> {
        let Some(service) = self.service(|s| s.event.clone())? else {
            return Ok(false);
        };
        let _sending = self.raise(paths::EVENT_SENDING);
        service.write_client_event(event).await?;
        self.commit(paths::EVENT_SENT, event)?;
        Ok(true)
    }

    // ========== I/O Pins ==========

    /// Reads every input pin.
    ///
    /// # Errors
    ///
    /// Returns `Error::Destroyed` after `destroy()`, or the transport error.
    pub async fn read_pins(&self) -> Result<Option<Vec<PinValue>>> {
        let Some(service) = self.service(|s| s.io_pin.clone())? else {
            return Ok(None);
        };
        let _loading = self.raise(paths::IO_PIN_LOADING);
        let values = service.read_pin_data().await?;
        self.commit(paths::IO_PIN_DATA, &pin_map(&values))?;
        Ok(Some(values))
    }

    /// Writes output pin values.
    ///
    /// # Errors
    ///
    /// Returns `Error::Destroyed` after `destroy()`, or the transport error.
    pub async fn write_pins(&self, values: &[PinValue]) -> Result<bool> {
        let Some(service) = self.service(|s| s.io_pin.clone())? else {
            return Ok(false);
        };
        let _updating = self.raise(paths::IO_PIN_UPDATING);
        service.write_pin_data(values).await?;
        self.commit(paths::IO_PIN_DATA, &pin_map(values))?;
        Ok(true)
    }

    /// Writes the pin configuration bitmasks.
    ///
    /// # Errors
    ///
    /// Returns `Error::Destroyed` after `destroy()`, or the transport error.
    pub async fn configure_pins(&self, configuration: PinConfiguration) -> Result<bool> {
        let Some(service) = self.service(|s| s.io_pin.clone())? else {
            return Ok(false);
        };
        let _updating = self.raise(paths::IO_PIN_CONFIGURATION_UPDATING);
        service.write_pin_configuration(configuration).await?;
        self.commit(paths::IO_PIN_CONFIGURATION_DATA, &configuration)?;
        Ok(true)
    }
}

#[cfg(all(test, feature = "memory"))]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use parking_lot::Mutex;
    use serde_json::{Value, json};

    use super::*;
    use crate::capabilities::Capability;
    use crate::error::{Error, LinkError};
    use crate::event::DeviceChange;
    use crate::link::memory::MemoryLink;
    use crate::subscription::Subscribable;
    use crate::DeviceConfig;

    async fn connected(link: &MemoryLink) -> DeviceState<MemoryLink> {
        let device = DeviceState::new(link.clone(), DeviceConfig::new());
        device.connect().await.unwrap();
        device
    }

    fn record(device: &DeviceState<MemoryLink>) -> Arc<Mutex<Vec<DeviceChange>>> {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        device.on_change(move |c| sink.lock().push(c.clone()));
        log
    }

    fn trail(log: &Mutex<Vec<DeviceChange>>) -> Vec<(String, Value)> {
        log.lock()
            .iter()
            .map(|c| (c.path.to_string(), c.value.clone()))
            .collect()
    }

    #[tokio::test]
    async fn read_temperature_brackets_the_commit() {
        let link = MemoryLink::builder("abc").with_service(Capability::Temperature).build();
        link.set_temperature(21.5);
        let device = connected(&link).await;
        let log = record(&device);

        assert_eq!(device.read_temperature().await.unwrap(), Some(21.5));

        assert_eq!(
            trail(&log),
            vec![
                ("temperature.loading".to_string(), json!(true)),
                ("temperature.data".to_string(), json!(21.5)),
                ("temperature.loading".to_string(), json!(false)),
            ]
        );
    }

    #[tokio::test]
    async fn failed_read_clears_flag_and_keeps_data() {
        let link = MemoryLink::builder("abc").with_service(Capability::Temperature).build();
        let device = connected(&link).await;
        link.fail_next("read_temperature");
        let log = record(&device);

        let err = device.read_temperature().await.unwrap_err();

        assert!(matches!(err, Error::Link(LinkError::Rejected { .. })));
        assert_eq!(
            trail(&log),
            vec![
                ("temperature.loading".to_string(), json!(true)),
                ("temperature.loading".to_string(), json!(false)),
            ]
        );
        assert_eq!(device.get(paths::TEMPERATURE_DATA), Some(Value::Null));
    }

    #[tokio::test]
    async fn absent_capability_is_a_silent_no_op() {
        let link = MemoryLink::builder("abc").with_service(Capability::Temperature).build();
        let device = connected(&link).await;
        let log = record(&device);

        assert_eq!(device.read_matrix().await.unwrap(), None);
        assert!(!device.write_matrix(&LedMatrix::all_on()).await.unwrap());
        assert!(!device.send_text("hi").await.unwrap());
        assert_eq!(device.read_pins().await.unwrap(), None);

        assert!(log.lock().is_empty());
        assert_eq!(link.calls(), vec!["connect"]);
    }

    #[tokio::test]
    async fn write_matrix_notifies_changed_cells_only() {
        let link = MemoryLink::builder("abc").with_service(Capability::Led).build();
        let device = connected(&link).await;
        let mut matrix = LedMatrix::new();
        matrix.set(2, 3, true);
        let log = record(&device);

        assert!(device.write_matrix(&matrix).await.unwrap());

        assert_eq!(
            trail(&log),
            vec![
                ("led.updating".to_string(), json!(true)),
                ("led.data.2.3".to_string(), json!(true)),
                ("led.updating".to_string(), json!(false)),
            ]
        );
        assert_eq!(link.board().matrix, matrix);
    }

    #[tokio::test]
    async fn compound_readings_commit_field_by_field() {
        let link = MemoryLink::builder("abc")
            .with_service(Capability::Accelerometer)
            .with_service(Capability::DeviceInformation)
            .build();
        link.set_acceleration(Vector3::new(0.0, 0.5, 0.0));
        link.set_device_information(DeviceInformation {
            model_number: Some("BBC micro:bit V2".to_string()),
            ..DeviceInformation::default()
        });
        let device = connected(&link).await;
        let log = record(&device);

        device.read_accelerometer().await.unwrap();
        device.read_device_information().await.unwrap();

        let paths: Vec<String> = trail(&log).into_iter().map(|(p, _)| p).collect();
        assert_eq!(
            paths,
            vec![
                "accelerometer.loading",
                "accelerometer.data.x",
                "accelerometer.data.y",
                "accelerometer.data.z",
                "accelerometer.loading",
                "deviceInformation.loading",
                "deviceInformation.data.modelNumber",
                "deviceInformation.loading",
            ]
        );
    }

    #[tokio::test]
    async fn led_text_and_scrolling_delay() {
        let link = MemoryLink::builder("abc").with_service(Capability::Led).build();
        let device = connected(&link).await;

        assert!(device.write_scrolling_delay(120).await.unwrap());
        assert_eq!(device.read_scrolling_delay().await.unwrap(), Some(120));
        assert!(device.write_text("hello").await.unwrap());

        let tree = device.tree().unwrap();
        assert_eq!(tree.led.scrolling_delay.data, Some(120));
        assert_eq!(tree.led.text.data.as_deref(), Some("hello"));
        assert_eq!(link.board().scrolled_text, vec!["hello".to_string()]);
    }

    #[tokio::test]
    async fn buttons_uart_and_events() {
        let link = MemoryLink::builder("abc")
            .with_service(Capability::Button)
            .with_service(Capability::Uart)
            .with_service(Capability::Event)
            .build();
        link.set_button_b(ButtonState::Press);
        link.set_microbit_event(MicrobitEvent::new(1104, 2));
        let device = connected(&link).await;

        assert_eq!(device.read_button_a().await.unwrap(), Some(ButtonState::Release));
        assert_eq!(device.read_button_b().await.unwrap(), Some(ButtonState::Press));
        assert!(device.send_text("ping").await.unwrap());
        assert_eq!(device.read_event().await.unwrap(), Some(MicrobitEvent::new(1104, 2)));
        assert!(device.write_event(&MicrobitEvent::new(9001, 7)).await.unwrap());

        let tree = device.tree().unwrap();
        assert_eq!(tree.button.b.data, Some(ButtonState::Press));
        assert_eq!(tree.uart.sent.as_deref(), Some("ping"));
        assert_eq!(tree.event.data.value, Some(2));
        assert_eq!(tree.event.sent.event_type, Some(9001));
        assert!(!tree.uart.sending && !tree.event.sending && !tree.event.loading);
    }

    #[tokio::test]
    async fn magnetometer_operations() {
        let link = MemoryLink::builder("abc").with_service(Capability::Magnetometer).build();
        link.set_magnetic_field(Vector3::new(1.0, 2.0, 3.0));
        link.set_bearing(90);
        let device = connected(&link).await;

        assert_eq!(device.read_magnetometer().await.unwrap(), Some(Vector3::new(1.0, 2.0, 3.0)));
        assert_eq!(device.read_bearing().await.unwrap(), Some(90));
        assert_eq!(
            device.calibrate_magnetometer().await.unwrap(),
            Some(CalibrationStatus::Completed)
        );
        assert!(device.write_magnetometer_period(640).await.unwrap());
        assert_eq!(device.read_magnetometer_period().await.unwrap(), Some(640));

        let tree = device.tree().unwrap();
        assert!(!tree.magnetometer.calibration.doing);
        assert_eq!(tree.magnetometer.calibration.data, Some(CalibrationStatus::Completed));
        assert_eq!(tree.magnetometer.period.data, Some(640));
    }

    #[tokio::test]
    async fn pin_operations() {
        let link = MemoryLink::builder("abc").with_service(Capability::IoPin).build();
        link.set_pins(vec![PinValue::new(0, 10).unwrap()]);
        let device = connected(&link).await;

        device.read_pins().await.unwrap();
        assert!(device.write_pins(&[PinValue::new(3, 1).unwrap()]).await.unwrap());
        assert!(device.configure_pins(PinConfiguration::new(0b1, 0b1000)).await.unwrap());

        let tree = device.tree().unwrap();
        assert_eq!(tree.io_pin.data.get(&0), Some(&10));
        assert_eq!(tree.io_pin.data.get(&3), Some(&1));
        assert_eq!(tree.io_pin.configuration.data.input, Some(0b1000));
        assert_eq!(link.board().pin_configuration, PinConfiguration::new(0b1, 0b1000));
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_operation_clears_its_flag() {
        let link = MemoryLink::builder("abc")
            .with_service(Capability::Accelerometer)
            .latency(Duration::from_millis(50))
            .build();
        let device = connected(&link).await;

        let outcome =
            tokio::time::timeout(Duration::from_millis(10), device.read_accelerometer()).await;

        assert!(outcome.is_err());
        assert_eq!(device.get(paths::ACCELEROMETER_LOADING), Some(json!(false)));
    }

    #[tokio::test]
    async fn periods_round_trip_through_the_board() {
        let link = MemoryLink::builder("abc")
            .with_service(Capability::Temperature)
            .with_service(Capability::Accelerometer)
            .build();
        let device = connected(&link).await;

        assert!(device.write_temperature_period(1500).await.unwrap());
        assert_eq!(device.read_temperature_period().await.unwrap(), Some(1500));
        assert!(device.write_accelerometer_period(20).await.unwrap());
        assert_eq!(device.read_accelerometer_period().await.unwrap(), Some(20));
    }
}
