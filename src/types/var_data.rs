//! Typed access to decoded telemetry values

use super::{Value, VariableType};
use crate::TelemetryError;

/// Trait for Rust types a telemetry variable can be read as.
pub trait VarData: Sized {
    /// The declared variable type this Rust type accepts.
    const VARIABLE_TYPE: VariableType;

    /// Extract this type from a decoded value, rejecting other types.
    fn from_value(value: Value) -> crate::Result<Self>;
}

fn mismatch(expected: VariableType, value: Value) -> TelemetryError {
    TelemetryError::TypeConversion {
        details: format!("Expected {:?}, got {:?}", expected, value.variable_type()),
    }
}

impl VarData for u8 {
    const VARIABLE_TYPE: VariableType = VariableType::Char;

    fn from_value(value: Value) -> crate::Result<Self> {
        match value {
            Value::Char(c) => Ok(c),
            other => Err(mismatch(Self::VARIABLE_TYPE, other)),
        }
    }
}

impl VarData for bool {
    const VARIABLE_TYPE: VariableType = VariableType::Bool;

    fn from_value(value: Value) -> crate::Result<Self> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(mismatch(Self::VARIABLE_TYPE, other)),
        }
    }
}

impl VarData for i32 {
    const VARIABLE_TYPE: VariableType = VariableType::Int32;

    fn from_value(value: Value) -> crate::Result<Self> {
        match value {
            Value::Int32(v) => Ok(v),
            other => Err(mismatch(Self::VARIABLE_TYPE, other)),
        }
    }
}

impl VarData for u32 {
    const VARIABLE_TYPE: VariableType = VariableType::UInt32;

    fn from_value(value: Value) -> crate::Result<Self> {
        match value {
            Value::UInt32(v) => Ok(v),
            other => Err(mismatch(Self::VARIABLE_TYPE, other)),
        }
    }
}

impl VarData for f32 {
    const VARIABLE_TYPE: VariableType = VariableType::Float32;

    fn from_value(value: Value) -> crate::Result<Self> {
        match value {
            Value::Float32(v) => Ok(v),
            other => Err(mismatch(Self::VARIABLE_TYPE, other)),
        }
    }
}

impl VarData for f64 {
    const VARIABLE_TYPE: VariableType = VariableType::Float64;

    fn from_value(value: Value) -> crate::Result<Self> {
        match value {
            Value::Float64(v) => Ok(v),
            other => Err(mismatch(Self::VARIABLE_TYPE, other)),
        }
    }
}
