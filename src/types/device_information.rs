// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device information record.

use serde::{Deserialize, Serialize};

/// Contents of the standard Device Information service.
///
/// Every field is optional because boards only expose a subset of the
/// characteristics. The record always keeps its full shape so a reading
/// replaces all fields at once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInformation {
    /// Model number string.
    pub model_number: Option<String>,
    /// Serial number string.
    pub serial_number: Option<String>,
    /// Firmware revision string.
    pub firmware_revision: Option<String>,
    /// Hardware revision string.
    pub hardware_revision: Option<String>,
    /// Manufacturer name string.
    pub manufacturer: Option<String>,
}
