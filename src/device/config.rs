// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-device configuration.

/// Configuration applied to a device.
///
/// Sensor periods are written to the board during
/// [`connect`](crate::DeviceState::connect), for the sensors the board
/// exposes.
///
/// # Examples
///
/// ```
/// use microbit_sync::DeviceConfig;
///
/// let config = DeviceConfig::new()
///     .with_friendly_name("Greenhouse")
///     .with_temperature_period(1000)
///     .with_accelerometer_period(80);
///
/// assert_eq!(config.friendly_name.as_deref(), Some("Greenhouse"));
/// assert_eq!(config.temperature_period, Some(1000));
/// assert!(config.magnetometer_period.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceConfig {
    /// Name to show instead of the one the board advertises.
    pub friendly_name: Option<String>,
    /// Temperature notification period in milliseconds.
    pub temperature_period: Option<u16>,
    /// Accelerometer notification period in milliseconds.
    pub accelerometer_period: Option<u16>,
    /// Magnetometer notification period in milliseconds.
    pub magnetometer_period: Option<u16>,
}

impl DeviceConfig {
    /// Creates an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a friendly name for the device.
    #[must_use]
    pub fn with_friendly_name(mut self, name: impl Into<String>) -> Self {
        self.friendly_name = Some(name.into());
        self
    }

    /// Sets the temperature period to apply on connect.
    #[must_use]
    pub fn with_temperature_period(mut self, period_ms: u16) -> Self {
        self.temperature_period = Some(period_ms);
        self
    }

    /// Sets the accelerometer period to apply on connect.
    #[must_use]
    pub fn with_accelerometer_period(mut self, period_ms: u16) -> Self {
        self.accelerometer_period = Some(period_ms);
        self
    }

    /// Sets the magnetometer period to apply on connect.
    #[must_use]
    pub fn with_magnetometer_period(mut self, period_ms: u16) -> Self {
        self.magnetometer_period = Some(period_ms);
        self
    }

    /// Returns `true` if any sensor period is configured.
    #[must_use]
    pub fn has_periods(&self) -> bool {
        self.temperature_period.is_some()
            || self.accelerometer_period.is_some()
            || self.magnetometer_period.is_some()
    }
}
