// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `microbit_sync` - Mirror the live state of micro:bit boards into an
//! observable state tree.
//!
//! Each board is represented by a [`DeviceState`]: a nested tree holding the
//! board's connection status, which services it exposes, the last known
//! reading of every sensor and the progress flags of every operation in
//! flight. Every mutation of the tree, whether it comes from an explicit
//! read/write or from a hardware push notification, is reported exactly once
//! and in order to every listener, with its path, new value and previous
//! value.
//!
//! # Supported Services
//!
//! - **Device information**: model, serial number, firmware and hardware revisions
//! - **Buttons**: A and B, pressed, long-pressed or released
//! - **LED matrix**: 5x5 display, scrolling text and delay
//! - **Sensors**: temperature, accelerometer, magnetometer with bearing and calibration
//! - **UART**: line-based text exchange
//! - **Events**: micro:bit message bus events
//! - **I/O pins**: edge connector values and configuration
//!
//! # Architecture
//!
//! - [`tracker`]: the [`ChangeTracker`](tracker::ChangeTracker) owning a tree
//!   and reporting every effective mutation
//! - [`device`](DeviceState): operations mapped onto the tree with
//!   loading/updating flags
//! - [`DeviceRegistry`]: process-wide directory re-broadcasting device changes
//! - [`link`]: traits the transport implements; an in-memory board ships
//!   behind the default `memory` feature
//!
//! # Quick Start
//!
//! ```
//! use microbit_sync::{Capability, DeviceConfig, DeviceRegistry};
//! use microbit_sync::event::Scope;
//! use microbit_sync::link::memory::MemoryLink;
//! use microbit_sync::subscription::Subscribable;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> microbit_sync::Result<()> {
//! let registry = DeviceRegistry::new();
//! registry.on_change(|event| {
//!     if event.scope == Scope::Device {
//!         println!("{}: {} = {}", event.device_id, event.path, event.value);
//!     }
//! });
//!
//! let link = MemoryLink::builder("abc")
//!     .with_service(Capability::Temperature)
//!     .build();
//! link.set_temperature(21.5);
//!
//! let device = registry.register(link, DeviceConfig::new());
//! device.connect().await?;
//! device.read_temperature().await?;
//!
//! assert_eq!(device.tree()?.temperature.data, Some(21.5));
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! Operations return [`Result`]. Transport failures surface as
//! [`Error::Link`] after the operation's flag has been cleared. Operations on
//! a capability the board lacks are not errors: reads resolve to `Ok(None)`
//! and writes to `Ok(false)`.

mod capabilities;
mod device;
pub mod error;
pub mod event;
pub mod link;
mod registry;
pub mod state;
pub mod subscription;
pub mod tracker;
pub mod types;

pub use capabilities::{Capabilities, Capability};
pub use device::{DeviceConfig, DeviceState};
pub use error::{Error, LinkError, PathError, Result, ValueError};
pub use event::{DeviceChange, DeviceId, RegistryEvent, Scope};
pub use registry::DeviceRegistry;
pub use subscription::{Subscribable, SubscriptionId};
pub use tracker::{ChangeTracker, Path};
pub use types::{
    ButtonState, CalibrationStatus, DeviceInformation, LedMatrix, MicrobitEvent,
    PinConfiguration, PinValue, Vector3,
};
