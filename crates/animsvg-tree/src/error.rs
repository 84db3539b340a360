// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/// List of all errors.
#[derive(Clone, PartialEq, Debug)]
pub enum Error {
    /// A clock value cannot be parsed.
    ///
    /// Contains the offending text.
    InvalidClockValue(String),

    /// A `repeatCount` is neither a positive number nor `indefinite`.
    InvalidRepeatCount(String),

    /// A mesh stop edge is not a single line or cubic curve segment.
    InvalidMeshEdge(String),

    /// Mesh rows must have the same amount of patches.
    MeshRowMismatch {
        /// Row index.
        row: usize,
        /// Amount of patches in the first row.
        expected: usize,
        /// Amount of patches in this row.
        actual: usize,
    },

    /// A mesh patch has fewer stops than its position requires.
    NotEnoughMeshStops {
        /// Row index.
        row: usize,
        /// Patch index inside the row.
        patch: usize,
        /// Required amount of stops.
        expected: usize,
    },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Error::InvalidClockValue(ref text) => {
                write!(f, "'{}' is not a valid clock value", text)
            }
            Error::InvalidRepeatCount(ref text) => {
                write!(f, "'{}' is not a valid repeat count", text)
            }
            Error::InvalidMeshEdge(ref text) => {
                write!(f, "'{}' is not a valid mesh patch edge", text)
            }
            Error::MeshRowMismatch {
                row,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "mesh row {} has {} patches instead of {}",
                    row, actual, expected
                )
            }
            Error::NotEnoughMeshStops {
                row,
                patch,
                expected,
            } => {
                write!(
                    f,
                    "mesh patch {},{} requires at least {} stops",
                    row, patch, expected
                )
            }
        }
    }
}

impl std::error::Error for Error {}
