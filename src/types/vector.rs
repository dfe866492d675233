// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Three-axis sensor readings.

use serde::{Deserialize, Serialize};

/// A three-axis reading from the accelerometer (in g) or the magnetometer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    /// X axis.
    pub x: f64,
    /// Y axis.
    pub y: f64,
    /// Z axis.
    pub z: f64,
}

impl Vector3 {
    /// Creates a reading from its three components.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Returns the Euclidean length of the vector.
    #[must_use]
    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// Progress of a magnetometer calibration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CalibrationStatus {
    /// No calibration has been requested.
    Unknown,
    /// Calibration was requested and is running on the board.
    Requested,
    /// Calibration finished successfully.
    Completed,
    /// Calibration finished with an error.
    CompletedWithError,
}

impl CalibrationStatus {
    /// Decodes the characteristic byte sent by the board.
    #[must_use]
    pub const fn from_raw(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Unknown),
            1 => Some(Self::Requested),
            2 => Some(Self::Completed),
            3 => Some(Self::CompletedWithError),
            _ => None,
        }
    }

    /// Returns `true` once the board has finished calibrating.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        matches!(self, Self::Completed | Self::CompletedWithError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magnitude() {
        let v = Vector3::new(3.0, 4.0, 0.0);
        assert!((v.magnitude() - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn calibration_status() {
        assert_eq!(CalibrationStatus::from_raw(2), Some(CalibrationStatus::Completed));
        assert_eq!(CalibrationStatus::from_raw(4), None);
        assert!(CalibrationStatus::CompletedWithError.is_finished());
        assert!(!CalibrationStatus::Requested.is_finished());
    }
}
