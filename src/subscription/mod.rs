// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscription system for state changes.
//!
//! The subscription system consists of:
//!
//! - [`SubscriptionId`] - A unique identifier for a subscription, used to unsubscribe
//! - [`ListenerSet`] - Ordered listener storage with panic-isolated fan-out
//! - [`Subscribable`] - Trait for types that accept listeners
//!
//! # Usage
//!
//! ```
//! use microbit_sync::subscription::ListenerSet;
//!
//! let listeners = ListenerSet::<String>::new();
//! let id = listeners.subscribe(|msg| println!("got {msg}"));
//!
//! let delivery = listeners.notify(&"hello".to_string());
//! assert_eq!(delivery.delivered, 1);
//!
//! listeners.unsubscribe(id);
//! ```

mod listeners;
mod subscribable;

pub use listeners::{Delivery, Listener, ListenerSet, SubscriptionId};
pub use subscribable::Subscribable;
