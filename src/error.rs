// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `microbit_sync` library.
//!
//! This module provides the error hierarchy for the library: transport
//! failures reported by a device link, invalid state tree addresses, value
//! validation, and operations on torn-down devices.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// The device link rejected or failed an operation.
    #[error("link error: {0}")]
    Link(#[from] LinkError),

    /// A state tree path did not address a valid location.
    #[error("path error: {0}")]
    Path(#[from] PathError),

    /// A value failed validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// The state tree could not be decoded into its typed form.
    #[error("state decode error: {0}")]
    Json(#[from] serde_json::Error),

    /// The device was destroyed and can no longer be used.
    #[error("device has been destroyed")]
    Destroyed,
}

/// Errors reported by a device link (the transport collaborator).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LinkError {
    /// The link is not connected to the board.
    #[error("device is not connected")]
    NotConnected,

    /// The board or the transport rejected an operation.
    #[error("{operation} rejected: {reason}")]
    Rejected {
        /// The operation that was rejected.
        operation: String,
        /// Reason given by the transport.
        reason: String,
    },

    /// The operation did not complete in time.
    #[error("operation timed out after {0} ms")]
    Timeout(u64),

    /// A GATT level failure.
    #[error("GATT error: {0}")]
    Gatt(String),
}

impl LinkError {
    /// Creates a rejection error for the named operation.
    #[must_use]
    pub fn rejected(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Rejected {
            operation: operation.into(),
            reason: reason.into(),
        }
    }
}

/// Errors related to addressing the state tree.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    /// A segment of the path does not exist.
    #[error("no value at {0}")]
    NotFound(String),

    /// A segment addresses into a value that is neither an object nor an array.
    #[error("value at {0} is not a container")]
    NotAContainer(String),

    /// An array index is past the end of the array.
    #[error("index {index} out of bounds at {path} (length {len})")]
    IndexOutOfBounds {
        /// Path of the array.
        path: String,
        /// The requested index.
        index: usize,
        /// Length of the array.
        len: usize,
    },
}

/// Errors related to value validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// An LED matrix did not have 5 rows of 5 cells.
    #[error("LED matrix must be 5x5, got {rows} rows with a {columns}-cell row")]
    MatrixShape {
        /// Number of rows provided.
        rows: usize,
        /// Length of the first offending row.
        columns: usize,
    },

    /// A pin number is outside the edge connector range.
    #[error("pin {0} is out of range [0, 20]")]
    InvalidPin(u8),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
