// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event types for state changes.
//!
//! Devices emit a [`DeviceChange`] for every mutation of their tree. The
//! registry re-emits those as [`RegistryEvent`]s tagged with [`Scope::Device`]
//! and adds [`Scope::Devices`] events when devices come and go. Registry events
//! are also published on an [`EventBus`] for async consumers.
//!
//! # Examples
//!
//! ```
//! use microbit_sync::event::{DeviceId, EventBus, RegistryEvent};
//! use serde_json::json;
//!
//! let bus = EventBus::new();
//! let mut rx = bus.subscribe();
//!
//! let tree = json!({ "id": "abc" });
//! bus.publish(RegistryEvent::device_added(
//!     DeviceId::new("abc"),
//!     tree.clone(),
//!     json!({ "abc": tree }),
//! ));
//! assert!(rx.try_recv().is_ok());
//! ```

mod device_change;
mod device_id;
mod event_bus;
mod registry_event;

pub use device_change::DeviceChange;
pub use device_id::DeviceId;
pub use event_bus::EventBus;
pub use registry_event::{RegistryEvent, Scope};
