//! Vehicle/engine configuration identifiers.
//!
//! Ids arrive as URL path segments. Parsing only checks that the segment is a
//! decimal number that fits in an `i32`; whether a configuration with that id
//! exists is decided by the repository.
//!
//! # Example
//!
//! ```rust
//! use motor_core::id::VehicleToEngineConfigId;
//!
//! let id = VehicleToEngineConfigId::parse("537152").unwrap();
//! assert_eq!(id.get(), 537_152);
//!
//! assert!(VehicleToEngineConfigId::parse("123ABC").is_err());
//! assert!(VehicleToEngineConfigId::parse("17529777777777").is_err());
//! ```

use std::fmt;
use std::num::IntErrorKind;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Identifier of a vehicle-to-engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VehicleToEngineConfigId(i32);

impl VehicleToEngineConfigId {
    /// Wraps a raw id.
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Returns the raw id.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }

    /// Parses a path segment into an id.
    ///
    /// # Errors
    ///
    /// Returns an [`IdParseError`] carrying the raw value if the segment is
    /// empty, not a decimal number, or outside the `i32` range.
    pub fn parse(raw: &str) -> Result<Self, IdParseError> {
        raw.parse::<i32>().map(Self).map_err(|e| {
            let kind = match e.kind() {
                IntErrorKind::Empty => IdParseErrorKind::Empty,
                IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                    IdParseErrorKind::OutOfRange
                }
                _ => IdParseErrorKind::NotNumeric,
            };
            IdParseError {
                raw: raw.to_string(),
                kind,
            }
        })
    }
}

impl fmt::Display for VehicleToEngineConfigId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for VehicleToEngineConfigId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<i32> for VehicleToEngineConfigId {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

/// Why an id segment was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdParseErrorKind {
    /// The segment was empty.
    Empty,
    /// The segment contained something other than an optionally signed decimal number.
    NotNumeric,
    /// The number does not fit in a 32-bit signed integer.
    OutOfRange,
}

/// A path segment that could not be coerced into a [`VehicleToEngineConfigId`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdParseError {
    raw: String,
    kind: IdParseErrorKind,
}

impl IdParseError {
    /// Returns the rejected raw value.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Returns the failure kind.
    #[must_use]
    pub const fn kind(&self) -> IdParseErrorKind {
        self.kind
    }
}

impl fmt::Display for IdParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            IdParseErrorKind::Empty => f.write_str("id must not be empty"),
            IdParseErrorKind::NotNumeric => {
                write!(f, "failed to convert '{}' to an integer id", self.raw)
            }
            IdParseErrorKind::OutOfRange => write!(
                f,
                "id '{}' is out of range (must fit in a 32-bit integer)",
                self.raw
            ),
        }
    }
}

impl std::error::Error for IdParseError {}

impl From<IdParseError> for Error {
    fn from(value: IdParseError) -> Self {
        Self::InvalidId {
            message: value.to_string(),
        }
    }
}
