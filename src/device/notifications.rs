// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Capability probing and push notification bindings.
//!
//! Push notifications write straight into `data`, without raising any
//! operation flag. Handlers only hold a weak reference to the device so a
//! dropped device is never kept alive by its transport.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use super::{DeviceState, Unbind};
use crate::capabilities::Capability;
use crate::error::Result;
use crate::link::{
    AccelerometerService, ButtonService, DeviceLink, EventService, Handler, HandlerId,
    IoPinService, MagnetometerService, Service, ServiceMap, TemperatureService, UartService,
};
use crate::state::paths;
use crate::types::PinValue;

/// Converts pin readings into the `ioPin.data` map, keyed by pin number.
pub(super) fn pin_map(values: &[PinValue]) -> Value {
    let map: BTreeMap<String, u8> = values
        .iter()
        .map(|v| (v.pin().to_string(), v.value()))
        .collect();
    serde_json::to_value(map).unwrap_or_default()
}

impl<L: DeviceLink> DeviceState<L> {
    /// Marks every present capability available and binds its notifications.
    pub(super) fn bind_services(&self, services: &ServiceMap<L>) -> Result<()> {
        for capability in Capability::ALL {
            if !Self::present(services, capability) {
                continue;
            }
            tracing::debug!(device_id = %self.inner.id, %capability, "Capability available");
            self.inner.tracker.set(capability.available_path(), true)?;
        }

        if let Some(button) = &services.button {
            let id = button.on_button_a(self.push_handler(paths::BUTTON_A_DATA));
            self.keep(button, id);
            let id = button.on_button_b(self.push_handler(paths::BUTTON_B_DATA));
            self.keep(button, id);
        }
        if let Some(temperature) = &services.temperature {
            let id = temperature.on_temperature_changed(self.push_handler(paths::TEMPERATURE_DATA));
            self.keep(temperature, id);
        }
        if let Some(accelerometer) = &services.accelerometer {
            let id = accelerometer
                .on_accelerometer_changed(self.push_handler(paths::ACCELEROMETER_DATA));
            self.keep(accelerometer, id);
        }
        if let Some(magnetometer) = &services.magnetometer {
            let id = magnetometer.on_magnetometer_changed(self.push_handler(paths::MAGNETOMETER_DATA));
            self.keep(magnetometer, id);
            let id = magnetometer.on_bearing_changed(self.push_handler(paths::MAGNETOMETER_BEARING_DATA));
            self.keep(magnetometer, id);
            let id = magnetometer
                .on_calibration_changed(self.push_handler(paths::MAGNETOMETER_CALIBRATION_DATA));
            self.keep(magnetometer, id);
        }
        if let Some(uart) = &services.uart {
            let id = uart.on_receive_text(self.push_handler(paths::UART_DATA));
            self.keep(uart, id);
        }
        if let Some(event) = &services.event {
            let id = event.on_microbit_event(self.push_handler(paths::EVENT_DATA));
            self.keep(event, id);
        }
        if let Some(io_pin) = &services.io_pin {
            let weak = self.downgrade();
            let id = io_pin.on_pin_data_changed(Arc::new(move |values: Vec<PinValue>| {
                if let Some(device) = Self::from_weak(&weak) {
                    device.apply_notification(paths::IO_PIN_DATA, pin_map(&values));
                }
            }));
            self.keep(io_pin, id);
        }

        Ok(())
    }

    /// Binds the transport's disconnect notification.
    pub(super) fn bind_disconnect(&self, link: &Arc<L>) {
        let weak = self.downgrade();
        let id = link.on_disconnected(Arc::new(move |()| {
            if let Some(device) = Self::from_weak(&weak) {
                tracing::debug!(device_id = %device.inner.id, "Link dropped");
                device.teardown();
            }
        }));
        let link = Arc::clone(link);
        self.inner
            .bindings
            .lock()
            .push(Box::new(move || link.remove_disconnect_handler(id)));
    }

    fn present(services: &ServiceMap<L>, capability: Capability) -> bool {
        match capability {
            Capability::DeviceInformation => services.device_information.is_some(),
            Capability::Button => services.button.is_some(),
            Capability::Led => services.led.is_some(),
            Capability::Temperature => services.temperature.is_some(),
            Capability::Accelerometer => services.accelerometer.is_some(),
            Capability::Magnetometer => services.magnetometer.is_some(),
            Capability::Uart => services.uart.is_some(),
            Capability::Event => services.event.is_some(),
            Capability::IoPin => services.io_pin.is_some(),
        }
    }

    /// Builds a handler committing each payload under `path`.
    fn push_handler<T>(&self, path: &'static str) -> Handler<T>
    where
        T: Serialize + 'static,
    {
        let weak = self.downgrade();
        Arc::new(move |payload: T| {
            if let Some(device) = Self::from_weak(&weak) {
                match serde_json::to_value(&payload) {
                    Ok(value) => device.apply_notification(path, value),
                    Err(e) => tracing::warn!(path, error = %e, "Unserializable notification"),
                }
            }
        })
    }

    fn apply_notification(&self, path: &'static str, value: Value) {
        tracing::trace!(device_id = %self.inner.id, path, "Notification");
        if let Err(e) = self.inner.tracker.merge(path, value) {
            tracing::warn!(device_id = %self.inner.id, path, error = %e, "Failed to apply notification");
        }
    }

    /// Records how to detach handler `id` from `service`.
    fn keep<S: Service>(&self, service: &S, id: HandlerId) {
        let service = service.clone();
        let unbind: Unbind = Box::new(move || service.remove_handler(id));
        self.inner.bindings.lock().push(unbind);
    }
}
