//! Telemetry variable type definitions

use serde::{Deserialize, Serialize};

/// Telemetry data types the producer can declare in a header record.
///
/// The discriminant order matches the wire type codes: a record's leading
/// `i32` is an index into this closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum VariableType {
    /// Single 8-bit character (code 0)
    Char,
    /// Boolean stored as one byte, zero or nonzero (code 1)
    Bool,
    /// 32-bit signed integer (code 2)
    Int32,
    /// 32-bit unsigned integer (code 3)
    UInt32,
    /// 32-bit floating point (code 4)
    Float32,
    /// 64-bit floating point (code 5)
    Float64,
}

impl VariableType {
    /// All types in wire code order.
    pub const ALL: [VariableType; 6] = [
        VariableType::Char,
        VariableType::Bool,
        VariableType::Int32,
        VariableType::UInt32,
        VariableType::Float32,
        VariableType::Float64,
    ];

    /// Map a wire type code to its type, `None` when outside the closed set.
    pub fn from_code(code: i32) -> Option<Self> {
        usize::try_from(code).ok().and_then(|index| Self::ALL.get(index).copied())
    }

    /// Wire type code of this type.
    pub const fn code(&self) -> i32 {
        match self {
            VariableType::Char => 0,
            VariableType::Bool => 1,
            VariableType::Int32 => 2,
            VariableType::UInt32 => 3,
            VariableType::Float32 => 4,
            VariableType::Float64 => 5,
        }
    }

    /// Returns the size in bytes of this data type.
    pub const fn size(&self) -> usize {
        match self {
            VariableType::Char | VariableType::Bool => 1,
            VariableType::Int32 | VariableType::UInt32 | VariableType::Float32 => 4,
            VariableType::Float64 => 8,
        }
    }
}

/// Runtime value decoded from a buffer replica.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum Value {
    Char(u8),
    Bool(bool),
    Int32(i32),
    UInt32(u32),
    Float32(f32),
    Float64(f64),
}

impl Value {
    /// Decode little-endian bytes as `var_type`.
    ///
    /// Only the first `var_type.size()` bytes are used.
    pub fn decode(var_type: VariableType, bytes: &[u8]) -> crate::Result<Self> {
        if bytes.len() < var_type.size() {
            return Err(crate::TelemetryError::TypeConversion {
                details: format!(
                    "{:?} needs {} bytes, got {}",
                    var_type,
                    var_type.size(),
                    bytes.len()
                ),
            });
        }

        let value = match var_type {
            VariableType::Char => Value::Char(bytes[0]),
            VariableType::Bool => Value::Bool(bytes[0] != 0),
            VariableType::Int32 => Value::Int32(i32::from_le_bytes(word(bytes))),
            VariableType::UInt32 => Value::UInt32(u32::from_le_bytes(word(bytes))),
            VariableType::Float32 => Value::Float32(f32::from_le_bytes(word(bytes))),
            VariableType::Float64 => Value::Float64(f64::from_le_bytes([
                bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
            ])),
        };

        Ok(value)
    }

    /// Type this value was decoded as.
    pub fn variable_type(&self) -> VariableType {
        match self {
            Value::Char(_) => VariableType::Char,
            Value::Bool(_) => VariableType::Bool,
            Value::Int32(_) => VariableType::Int32,
            Value::UInt32(_) => VariableType::UInt32,
            Value::Float32(_) => VariableType::Float32,
            Value::Float64(_) => VariableType::Float64,
        }
    }

    /// Little-endian encoding, `variable_type().size()` bytes long.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        match *self {
            Value::Char(c) => vec![c],
            Value::Bool(b) => vec![u8::from(b)],
            Value::Int32(v) => v.to_le_bytes().to_vec(),
            Value::UInt32(v) => v.to_le_bytes().to_vec(),
            Value::Float32(v) => v.to_le_bytes().to_vec(),
            Value::Float64(v) => v.to_le_bytes().to_vec(),
        }
    }

    /// Lossless widening to `f64` for numeric display.
    pub fn as_f64(&self) -> f64 {
        match *self {
            Value::Char(c) => c as f64,
            Value::Bool(b) => u8::from(b) as f64,
            Value::Int32(v) => v as f64,
            Value::UInt32(v) => v as f64,
            Value::Float32(v) => v as f64,
            Value::Float64(v) => v,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Char(c) => write!(f, "{}", *c as char),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int32(v) => write!(f, "{v}"),
            Value::UInt32(v) => write!(f, "{v}"),
            Value::Float32(v) => write!(f, "{v}"),
            Value::Float64(v) => write!(f, "{v}"),
        }
    }
}

fn word(bytes: &[u8]) -> [u8; 4] {
    [bytes[0], bytes[1], bytes[2], bytes[3]]
}
