// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Change tracking for nested state trees.
//!
//! A [`ChangeTracker`] owns a `serde_json::Value` tree and only lets it be
//! mutated through its own setters. Every setter computes the [`Path`] of the
//! field, performs the write, and then reports a [`Change`] to the registered
//! callback. Reads never notify.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use parking_lot::{Mutex, ReentrantMutex};
//! use serde_json::json;
//! use microbit_sync::tracker::ChangeTracker;
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//! let tracker = ChangeTracker::new(json!({ "temperature": { "data": null } }), move |change| {
//!     sink.lock().push(change.path.to_string());
//! });
//!
//! tracker.set("temperature.data", 21.5).unwrap();
//! tracker.set("temperature.data", 21.5).unwrap(); // same value, no notification
//!
//! assert_eq!(*seen.lock(), vec!["temperature.data".to_string()]);
//! ```

mod path;

pub use path::{Path, Segment};

use std::sync::Arc;

use parking_lot::{Mutex, ReentrantMutex};
use serde::Serialize;
use serde_json::Value;

use crate::error::PathError;

/// A single applied mutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Change {
    /// Address of the mutated field.
    pub path: Path,
    /// Value after the mutation.
    pub value: Value,
    /// Value immediately before the mutation (`null` for inserted keys).
    pub previous: Value,
    /// The whole tree right after the mutation.
    pub snapshot: Value,
}

/// Callback invoked after every effective mutation.
pub type ChangeCallback = Arc<dyn Fn(&Change) + Send + Sync>;

struct TrackerState {
    target: Value,
    callback: Option<ChangeCallback>,
}

/// Observable container for a nested value tree.
///
/// Cloning a tracker yields another handle to the same tree. Writes and their
/// notifications are serialized: a write from another thread waits until the
/// previous callback has returned, so callbacks observe changes in the order
/// they were applied. The tree lock itself is released before the callback
/// runs, so the callback may read the tracker freely, and may write to it
/// from the same thread.
#[derive(Clone)]
pub struct ChangeTracker {
    state: Arc<Mutex<TrackerState>>,
    delivery: Arc<ReentrantMutex<()>>,
}

impl ChangeTracker {
    /// Wraps `target`, reporting every effective mutation to `callback`.
    pub fn new<F>(target: Value, callback: F) -> Self
    where
        F: Fn(&Change) + Send + Sync + 'static,
    {
        Self {
            state: Arc::new(Mutex::new(TrackerState {
                target,
                callback: Some(Arc::new(callback)),
            })),
            delivery: Arc::new(ReentrantMutex::new(())),
        }
    }

    /// Wraps `target` without a callback.
    #[must_use]
    pub fn detached(target: Value) -> Self {
        Self {
            state: Arc::new(Mutex::new(TrackerState {
                target,
                callback: None,
            })),
            delivery: Arc::new(ReentrantMutex::new(())),
        }
    }

    /// Returns a copy of the value at `path`, if any.
    #[must_use]
    pub fn get(&self, path: impl Into<Path>) -> Option<Value> {
        let path = path.into();
        path.lookup(&self.state.lock().target).cloned()
    }

    /// Returns a structural copy of the whole tree.
    ///
    /// Later mutations do not affect the returned value.
    #[must_use]
    pub fn target(&self) -> Value {
        self.state.lock().target.clone()
    }

    /// Runs `f` against the tree without copying it.
    ///
    /// The tracker is locked for the duration of `f`, which must not call
    /// back into this tracker.
    pub fn with_target<R>(&self, f: impl FnOnce(&Value) -> R) -> R {
        f(&self.state.lock().target)
    }

    /// Assigns `value` at `path`.
    ///
    /// Returns `Ok(true)` and notifies the callback if the stored value
    /// changed, `Ok(false)` if it was already equal.
    ///
    /// # Errors
    ///
    /// Returns a [`PathError`] if the parent of `path` does not exist, is not
    /// a container, or an array index is out of bounds.
    pub fn set(&self, path: impl Into<Path>, value: impl Into<Value>) -> Result<bool, PathError> {
        let path = path.into();
        let value = value.into();

        let _delivery = self.delivery.lock();
        let notification = {
            let mut state = self.state.lock();
            let slot = slot_mut(&mut state.target, &path)?;
            if *slot == value {
                return Ok(false);
            }
            let previous = std::mem::replace(slot, value.clone());
            state.callback.clone().map(|callback| {
                let change = Change {
                    path,
                    value,
                    previous,
                    snapshot: state.target.clone(),
                };
                (callback, change)
            })
        };

        if let Some((callback, change)) = notification {
            callback(&change);
        }
        Ok(true)
    }

    /// Assigns `value` at `path` leaf by leaf.
    ///
    /// Objects are merged member by member and arrays of equal length element
    /// by element, so only the leaves that actually differ produce
    /// notifications. Anything else is assigned as a whole. Returns the
    /// number of notifications produced.
    ///
    /// # Errors
    ///
    /// Returns a [`PathError`] under the same conditions as [`set`](Self::set).
    pub fn merge(&self, path: impl Into<Path>, value: impl Into<Value>) -> Result<usize, PathError> {
        let path = path.into();
        let value = value.into();

        let _delivery = self.delivery.lock();
        let current = self.get(&path);
        match (current, value) {
            (Some(Value::Object(_)), Value::Object(members)) => {
                let mut changed = 0;
                for (key, member) in members {
                    changed += self.merge(path.child(key), member)?;
                }
                Ok(changed)
            }
            (Some(Value::Array(existing)), Value::Array(items)) if existing.len() == items.len() => {
                let mut changed = 0;
                for (index, item) in items.into_iter().enumerate() {
                    changed += self.merge(path.index(index), item)?;
                }
                Ok(changed)
            }
            (_, value) => Ok(usize::from(self.set(path, value)?)),
        }
    }

    /// Permanently stops notifications.
    ///
    /// Writes after this still apply to the tree but never notify.
    pub fn unsubscribe(&self) {
        self.state.lock().callback = None;
    }

    /// Returns `true` while the callback is still attached.
    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        self.state.lock().callback.is_some()
    }
}

impl std::fmt::Debug for ChangeTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeTracker")
            .field("subscribed", &self.is_subscribed())
            .finish_non_exhaustive()
    }
}

/// Resolves the slot `path` addresses, inserting a missing final object key.
fn slot_mut<'a>(root: &'a mut Value, path: &Path) -> Result<&'a mut Value, PathError> {
    let mut node = root;
    let mut walked = Path::root();
    let depth = path.segments().len();

    for (position, segment) in path.segments().iter().enumerate() {
        let last = position + 1 == depth;
        let here = walked.to_string();
        let key = match segment {
            Segment::Key(key) => key.clone(),
            Segment::Index(index) => index.to_string(),
        };
        node = match (node, segment) {
            (Value::Object(map), _) => {
                if last {
                    map.entry(key).or_insert(Value::Null)
                } else {
                    map.get_mut(&key)
                        .ok_or_else(|| PathError::NotFound(walked.child(key.as_str()).to_string()))?
                }
            }
            (Value::Array(items), Segment::Index(index)) => {
                let len = items.len();
                items.get_mut(*index).ok_or(PathError::IndexOutOfBounds {
                    path: here,
                    index: *index,
                    len,
                })?
            }
            _ => return Err(PathError::NotAContainer(here)),
        };
        walked = match segment {
            Segment::Key(key) => walked.child(key.as_str()),
            Segment::Index(index) => walked.index(*index),
        };
    }

    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn recording(target: Value) -> (ChangeTracker, Arc<Mutex<Vec<Change>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        let tracker = ChangeTracker::new(target, move |change| sink.lock().push(change.clone()));
        (tracker, log)
    }

    #[test]
    fn set_reports_previous_value() {
        let (tracker, log) = recording(json!({ "temperature": { "data": null } }));

        assert!(tracker.set("temperature.data", 20).unwrap());
        assert!(tracker.set("temperature.data", 21).unwrap());

        let log = log.lock();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].previous, Value::Null);
        assert_eq!(log[0].value, json!(20));
        assert_eq!(log[1].previous, json!(20));
        assert_eq!(log[1].value, json!(21));
    }

    #[test]
    fn every_mutation_notifies_exactly_once_in_order() {
        let (tracker, log) = recording(json!({ "n": 0 }));

        for i in 1..=50 {
            tracker.set("n", i).unwrap();
        }

        let log = log.lock();
        assert_eq!(log.len(), 50);
        for (i, change) in log.iter().enumerate() {
            assert_eq!(change.previous, json!(i));
            assert_eq!(change.value, json!(i + 1));
        }
    }

    #[test]
    fn equal_assignment_is_silent() {
        let (tracker, log) = recording(json!({ "flag": false }));
        assert!(!tracker.set("flag", false).unwrap());
        assert!(log.lock().is_empty());
    }

    #[test]
    fn array_indices_address_cells() {
        let (tracker, log) = recording(json!({ "led": { "data": [[false, false], [false, false]] } }));

        tracker.set("led.data.1.0", true).unwrap();

        assert_eq!(tracker.get("led.data.1.0"), Some(json!(true)));
        assert_eq!(log.lock()[0].path.to_string(), "led.data.1.0");
    }

    #[test]
    fn missing_object_key_is_inserted() {
        let (tracker, log) = recording(json!({ "ioPin": { "data": {} } }));

        tracker.set("ioPin.data.4", 1).unwrap();

        assert_eq!(tracker.get("ioPin.data.4"), Some(json!(1)));
        assert_eq!(log.lock()[0].previous, Value::Null);
    }

    #[test]
    fn invalid_paths_are_errors() {
        let tracker = ChangeTracker::detached(json!({ "led": { "data": [false] }, "n": 1 }));

        assert_eq!(
            tracker.set("led.data.3", true),
            Err(PathError::IndexOutOfBounds {
                path: "led.data".to_string(),
                index: 3,
                len: 1,
            })
        );
        assert_eq!(
            tracker.set("n.inner", true),
            Err(PathError::NotAContainer("n".to_string()))
        );
        assert_eq!(
            tracker.set("missing.inner", true),
            Err(PathError::NotFound("missing".to_string()))
        );
        assert_eq!(tracker.get("missing"), None);
    }

    #[test]
    fn merge_notifies_only_changed_leaves() {
        let (tracker, log) = recording(json!({
            "accelerometer": { "data": { "x": 0.0, "y": 0.0, "z": 1.0 } }
        }));

        let changed = tracker
            .merge("accelerometer.data", json!({ "x": 0.5, "y": 0.0, "z": 1.0 }))
            .unwrap();

        assert_eq!(changed, 1);
        assert_eq!(log.lock()[0].path.to_string(), "accelerometer.data.x");
    }

    #[test]
    fn merge_replaces_mismatched_shapes() {
        let (tracker, log) = recording(json!({ "event": { "data": null } }));

        let changed = tracker
            .merge("event.data", json!({ "type": 1, "value": 2 }))
            .unwrap();

        assert_eq!(changed, 1);
        assert_eq!(log.lock()[0].path.to_string(), "event.data");
    }

    #[test]
    fn unsubscribed_tracker_writes_silently() {
        let (tracker, log) = recording(json!({ "n": 0 }));
        tracker.unsubscribe();

        assert!(tracker.set("n", 5).unwrap());
        assert_eq!(tracker.get("n"), Some(json!(5)));
        assert!(log.lock().is_empty());
        assert!(!tracker.is_subscribed());
    }

    #[test]
    fn callback_may_read_the_tracker() {
        let slot: Arc<Mutex<Option<ChangeTracker>>> = Arc::new(Mutex::new(None));
        let seen = Arc::new(Mutex::new(Vec::new()));

        let reader = Arc::clone(&slot);
        let sink = Arc::clone(&seen);
        let tracker = ChangeTracker::new(json!({ "n": 0 }), move |_| {
            if let Some(tracker) = reader.lock().as_ref() {
                sink.lock().push(tracker.get("n"));
            }
        });
        *slot.lock() = Some(tracker.clone());

        tracker.set("n", 3).unwrap();
        assert_eq!(*seen.lock(), vec![Some(json!(3))]);
    }

    #[test]
    fn change_carries_tree_after_the_write() {
        let (tracker, log) = recording(json!({ "a": 0, "b": 0 }));

        tracker.set("a", 1).unwrap();
        tracker.set("b", 2).unwrap();

        let log = log.lock();
        assert_eq!(log[0].snapshot, json!({ "a": 1, "b": 0 }));
        assert_eq!(log[1].snapshot, json!({ "a": 1, "b": 2 }));
    }

    #[test]
    fn concurrent_writers_are_delivered_in_order() {
        let (tracker, log) = recording(json!({ "n": 0 }));

        std::thread::scope(|scope| {
            for thread in 1..=4 {
                let tracker = tracker.clone();
                scope.spawn(move || {
                    for i in 0..200 {
                        tracker.set("n", thread * 1000 + i).unwrap();
                    }
                });
            }
        });

        let log = log.lock();
        assert_eq!(log.len(), 800);
        assert_eq!(log[0].previous, json!(0));
        for pair in log.windows(2) {
            assert_eq!(pair[1].previous, pair[0].value);
        }
        for change in log.iter() {
            assert_eq!(change.snapshot["n"], change.value);
        }
        assert_eq!(tracker.get("n"), Some(log[799].value.clone()));
    }

    #[test]
    fn callback_may_write_back_from_the_same_thread() {
        let slot: Arc<Mutex<Option<ChangeTracker>>> = Arc::new(Mutex::new(None));
        let writer = Arc::clone(&slot);
        let tracker = ChangeTracker::new(json!({ "n": 0, "echo": 0 }), move |change| {
            if change.path.to_string() == "n"
                && let Some(tracker) = writer.lock().clone()
            {
                tracker.set("echo", change.value.clone()).unwrap();
            }
        });
        *slot.lock() = Some(tracker.clone());

        tracker.set("n", 4).unwrap();

        assert_eq!(tracker.get("echo"), Some(json!(4)));
    }

    #[test]
    fn target_is_a_structural_copy() {
        let tracker = ChangeTracker::detached(json!({ "n": 1 }));
        let snapshot = tracker.target();
        tracker.set("n", 2).unwrap();
        assert_eq!(snapshot, json!({ "n": 1 }));
    }
}
