//! Outcome of a single telemetry read

use serde::{Deserialize, Serialize};

use super::Value;

/// Result of reading one variable across the buffer replicas.
///
/// `NotAvailable` is not an error: no replica held a span the buffer
/// selection policy accepted at the instant of the read. Callers poll again.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum Reading {
    /// Value decoded from the first accepted replica
    Available(Value),
    /// Every replica span was rejected
    NotAvailable,
}

impl Reading {
    /// The decoded value, if any.
    pub fn value(&self) -> Option<Value> {
        match self {
            Reading::Available(value) => Some(*value),
            Reading::NotAvailable => None,
        }
    }

    /// Whether a value was decoded.
    pub fn is_available(&self) -> bool {
        matches!(self, Reading::Available(_))
    }
}

impl From<Reading> for Option<Value> {
    fn from(reading: Reading) -> Self {
        reading.value()
    }
}

impl std::fmt::Display for Reading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Reading::Available(value) => value.fmt(f),
            Reading::NotAvailable => f.write_str("n/a"),
        }
    }
}
