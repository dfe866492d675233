// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scoped operation flags.

use crate::tracker::ChangeTracker;

/// Holds a boolean tree flag at `true` for its lifetime.
///
/// The flag is cleared on drop, so it comes down on success, on error
/// propagation with `?`, and when the owning future is dropped mid-await.
#[must_use = "the flag is cleared as soon as the guard is dropped"]
pub(crate) struct FlagGuard {
    tracker: ChangeTracker,
    path: &'static str,
}

impl FlagGuard {
    pub(crate) fn raise(tracker: &ChangeTracker, path: &'static str) -> Self {
        if let Err(e) = tracker.set(path, true) {
            tracing::warn!(path, error = %e, "Failed to raise operation flag");
        }
        Self {
            tracker: tracker.clone(),
            path,
        }
    }
}

impl Drop for FlagGuard {
    fn drop(&mut self) {
        if let Err(e) = self.tracker.set(self.path, false) {
            tracing::warn!(path = self.path, error = %e, "Failed to clear operation flag");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flag_is_set_while_held() {
        let tracker = ChangeTracker::detached(json!({ "op": { "loading": false } }));

        let guard = FlagGuard::raise(&tracker, "op.loading");
        assert_eq!(tracker.get("op.loading"), Some(json!(true)));

        drop(guard);
        assert_eq!(tracker.get("op.loading"), Some(json!(false)));
    }

    #[test]
    fn flag_clears_on_early_return() {
        fn failing(tracker: &ChangeTracker) -> Result<(), &'static str> {
            let _loading = FlagGuard::raise(tracker, "op.loading");
            Err("boom")
        }

        let tracker = ChangeTracker::detached(json!({ "op": { "loading": false } }));
        assert!(failing(&tracker).is_err());
        assert_eq!(tracker.get("op.loading"), Some(json!(false)));
    }
}
