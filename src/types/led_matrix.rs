// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The 5x5 LED display.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Number of LED rows.
pub const LED_ROWS: usize = 5;

/// Number of LED columns.
pub const LED_COLUMNS: usize = 5;

/// State of the 5x5 LED matrix, row-major.
///
/// Serializes as an array of five arrays of five booleans, which is also the
/// shape it takes in the device state tree (`led.data.<row>.<column>`).
///
/// # Examples
///
/// ```
/// use microbit_sync::types::LedMatrix;
///
/// let mut matrix = LedMatrix::new();
/// matrix.set(2, 3, true);
/// assert!(matrix.get(2, 3));
/// assert_eq!(matrix.lit_count(), 1);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LedMatrix([[bool; LED_COLUMNS]; LED_ROWS]);

impl LedMatrix {
    /// Creates a matrix with every LED off.
    #[must_use]
    pub const fn new() -> Self {
        Self([[false; LED_COLUMNS]; LED_ROWS])
    }

    /// Creates a matrix with every LED on.
    #[must_use]
    pub const fn all_on() -> Self {
        Self([[true; LED_COLUMNS]; LED_ROWS])
    }

    /// Creates a matrix from fixed-size rows.
    #[must_use]
    pub const fn from_array(rows: [[bool; LED_COLUMNS]; LED_ROWS]) -> Self {
        Self(rows)
    }

    /// Creates a matrix from dynamically sized rows.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::MatrixShape`] unless there are exactly five rows
    /// of exactly five cells.
    pub fn from_rows(rows: &[Vec<bool>]) -> Result<Self, ValueError> {
        if rows.len() != LED_ROWS {
            return Err(ValueError::MatrixShape {
                rows: rows.len(),
                columns: rows.first().map_or(0, Vec::len),
            });
        }

        let mut matrix = Self::new();
        for (r, row) in rows.iter().enumerate() {
            if row.len() != LED_COLUMNS {
                return Err(ValueError::MatrixShape {
                    rows: rows.len(),
                    columns: row.len(),
                });
            }
            matrix.0[r].copy_from_slice(row);
        }
        Ok(matrix)
    }

    /// Returns whether the LED at `row`, `column` is lit.
    ///
    /// Out-of-range coordinates read as unlit.
    #[must_use]
    pub fn get(&self, row: usize, column: usize) -> bool {
        self.0
            .get(row)
            .and_then(|r| r.get(column))
            .copied()
            .unwrap_or(false)
    }

    /// Lights or clears the LED at `row`, `column`.
    ///
    /// Out-of-range coordinates are ignored.
    pub fn set(&mut self, row: usize, column: usize, lit: bool) {
        if let Some(cell) = self.0.get_mut(row).and_then(|r| r.get_mut(column)) {
            *cell = lit;
        }
    }

    /// Returns the rows of the matrix.
    #[must_use]
    pub const fn rows(&self) -> &[[bool; LED_COLUMNS]; LED_ROWS] {
        &self.0
    }

    /// Returns the number of lit LEDs.
    #[must_use]
    pub fn lit_count(&self) -> usize {
        self.0.iter().flatten().filter(|lit| **lit).count()
    }

    /// Encodes the matrix as five bytes, one per row, most significant
    /// displayed bit on the left.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; LED_ROWS] {
        let mut bytes = [0u8; LED_ROWS];
        for (r, row) in self.0.iter().enumerate() {
            bytes[r] = row
                .iter()
                .fold(0u8, |acc, lit| (acc << 1) | u8::from(*lit));
        }
        bytes
    }

    /// Decodes the five-byte form produced by [`to_bytes`](Self::to_bytes).
    #[must_use]
    pub fn from_bytes(bytes: [u8; LED_ROWS]) -> Self {
        let mut matrix = Self::new();
        for (r, byte) in bytes.iter().enumerate() {
            for c in 0..LED_COLUMNS {
                let shift = LED_COLUMNS - 1 - c;
                matrix.0[r][c] = (byte >> shift) & 1 == 1;
            }
        }
        matrix
    }
}

impl From<[[bool; LED_COLUMNS]; LED_ROWS]> for LedMatrix {
    fn from(rows: [[bool; LED_COLUMNS]; LED_ROWS]) -> Self {
        Self(rows)
    }
}

impl fmt::Display for LedMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (r, row) in self.0.iter().enumerate() {
            if r > 0 {
                writeln!(f)?;
            }
            for lit in row {
                f.write_str(if *lit { "#" } else { "." })?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rows_rejects_wrong_shape() {
        let rows = vec![vec![false; 5]; 4];
        assert_eq!(
            LedMatrix::from_rows(&rows),
            Err(ValueError::MatrixShape { rows: 4, columns: 5 })
        );

        let mut rows = vec![vec![false; 5]; 5];
        rows[3] = vec![true; 6];
        assert_eq!(
            LedMatrix::from_rows(&rows),
            Err(ValueError::MatrixShape { rows: 5, columns: 6 })
        );
    }

    #[test]
    fn from_rows_copies_cells() {
        let mut rows = vec![vec![false; 5]; 5];
        rows[1][4] = true;
        let matrix = LedMatrix::from_rows(&rows).unwrap();
        assert!(matrix.get(1, 4));
        assert_eq!(matrix.lit_count(), 1);
    }

    #[test]
    fn out_of_range_access_is_ignored() {
        let mut matrix = LedMatrix::new();
        matrix.set(9, 9, true);
        assert!(!matrix.get(9, 9));
        assert_eq!(matrix, LedMatrix::new());
    }

    #[test]
    fn byte_encoding() {
        let mut matrix = LedMatrix::new();
        matrix.set(0, 0, true);
        matrix.set(4, 4, true);
        let bytes = matrix.to_bytes();
        assert_eq!(bytes, [0b1_0000, 0, 0, 0, 0b0_0001]);
        assert_eq!(LedMatrix::from_bytes(bytes), matrix);
    }

    #[test]
    fn serializes_as_nested_arrays() {
        let mut matrix = LedMatrix::new();
        matrix.set(2, 3, true);
        let json = serde_json::to_value(matrix).unwrap();
        assert_eq!(json[2][3], serde_json::json!(true));
        assert_eq!(json.as_array().map(Vec::len), Some(5));
    }

    #[test]
    fn display_draws_grid() {
        let matrix = LedMatrix::all_on();
        assert_eq!(matrix.to_string(), "#####\n#####\n#####\n#####\n#####");
    }
}
