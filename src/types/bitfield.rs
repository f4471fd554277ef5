//! BitField view over unsigned flag variables
//!
//! `SessionFlags` and `EngineWarnings` are declared as unsigned 32-bit
//! integers; this wrapper reads them as flag sets.

use serde::{Deserialize, Serialize};

use super::{Value, VarData, VariableType};

/// Flag set read from an unsigned 32-bit variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct BitField(pub u32);

impl BitField {
    /// Create a new BitField from a u32 value.
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    /// Check if a specific bit is set.
    pub fn is_set(&self, bit: u32) -> bool {
        bit < 32 && (self.0 & (1 << bit)) != 0
    }

    /// Check if any bit of `flag` is set.
    pub fn has_flag(&self, flag: u32) -> bool {
        (self.0 & flag) != 0
    }

    /// Get the raw u32 value.
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl VarData for BitField {
    const VARIABLE_TYPE: VariableType = VariableType::UInt32;

    fn from_value(value: Value) -> crate::Result<Self> {
        u32::from_value(value).map(BitField)
    }
}

/// `EngineWarnings` bits.
pub mod engine_warnings {
    pub const WATER_TEMP: u32 = 0x0001;
    pub const FUEL_PRESSURE: u32 = 0x0002;
    pub const OIL_PRESSURE: u32 = 0x0004;
    pub const ENGINE_STALLED: u32 = 0x0008;
    pub const PIT_SPEED_LIMITER: u32 = 0x0010;
    pub const REV_LIMITER_ACTIVE: u32 = 0x0020;
    pub const OIL_TEMP: u32 = 0x0040;
}

/// `SessionFlags` bits (global flags, low 16 bits).
pub mod session_flags {
    pub const CHECKERED: u32 = 0x0000_0001;
    pub const WHITE: u32 = 0x0000_0002;
    pub const GREEN: u32 = 0x0000_0004;
    pub const YELLOW: u32 = 0x0000_0008;
    pub const RED: u32 = 0x0000_0010;
    pub const BLUE: u32 = 0x0000_0020;
    pub const DEBRIS: u32 = 0x0000_0040;
    pub const CROSSED: u32 = 0x0000_0080;
    pub const YELLOW_WAVING: u32 = 0x0000_0100;
    pub const ONE_LAP_TO_GREEN: u32 = 0x0000_0200;
    pub const GREEN_HELD: u32 = 0x0000_0400;
    pub const TEN_TO_GO: u32 = 0x0000_0800;
    pub const FIVE_TO_GO: u32 = 0x0000_1000;
    pub const RANDOM_WAVING: u32 = 0x0000_2000;
    pub const CAUTION: u32 = 0x0000_4000;
    pub const CAUTION_WAVING: u32 = 0x0000_8000;
}

/// Whether `SessionFlags` show any caution (yellow or caution, steady or waving).
pub fn session_under_caution(flags: BitField) -> bool {
    use session_flags::*;
    flags.has_flag(YELLOW | YELLOW_WAVING | CAUTION | CAUTION_WAVING)
}

/// Whether `EngineWarnings` report a temperature or pressure warning.
pub fn engine_needs_attention(bits: BitField) -> bool {
    use engine_warnings::*;
    bits.has_flag(WATER_TEMP | FUEL_PRESSURE | OIL_PRESSURE | OIL_TEMP)
}
