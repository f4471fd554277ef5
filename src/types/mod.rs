//! Core types for telemetry data representation.
//!
//! ## Architecture
//!
//! - [`VariableType`] is the closed set of declared types, indexed by wire code
//! - [`Value`] holds one decoded little-endian value
//! - [`VariableDescriptor`] / [`DescriptorTable`] describe the variables the
//!   producer declared in its header records
//! - [`Reading`] is the outcome of one read: a value or `NotAvailable`
//! - [`VarData`] provides typed extraction from a [`Value`]
//! - [`BitField`] reads unsigned flag variables
//!
//! ## Usage Example
//!
//! ```rust
//! use paddock::types::{Value, VariableType, VarData};
//!
//! let value = Value::decode(VariableType::Float32, &[0x00, 0x00, 0x80, 0x3F]).unwrap();
//! assert_eq!(f32::from_value(value).unwrap(), 1.0);
//! ```

mod bitfield;
mod reading;
mod schema;
mod var_data;
mod variable_type;

pub use bitfield::{
    BitField, engine_needs_attention, engine_warnings, session_flags, session_under_caution,
};
pub use reading::Reading;
pub use schema::{DescriptorTable, VariableDescriptor};
pub use var_data::VarData;
pub use variable_type::{Value, VariableType};
