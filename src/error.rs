//! Error types for the telemetry channel.
//!
//! All errors implement `std::error::Error` and carry enough structured context
//! to tell a missing simulator apart from a corrupt layout or a caller mistake.
//!
//! ## Error Categories
//!
//! - **Initialization (region)**: the named region is missing or smaller than
//!   the minimum probe size
//! - **Initialization (layout)**: the metadata block or descriptor table could
//!   not be established
//! - **Per-read**: unknown variable names, out-of-range spans, typed access
//!   with the wrong type
//! - **Configuration**: an inconsistent [`ChannelConfig`](crate::ChannelConfig)
//!
//! A read that cannot confidently observe a value is *not* an error; it yields
//! [`Reading::NotAvailable`](crate::Reading::NotAvailable).
//!
//! ## Recovery and Retry
//!
//! ```rust
//! use paddock::TelemetryError;
//!
//! let error = TelemetryError::region_not_found("Local\\IRSDKMemMapFileName");
//! if error.is_retryable() {
//!     for suggestion in error.recovery_suggestions() {
//!         println!("  - {}", suggestion);
//!     }
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

#[cfg(windows)]
use windows_core as core;

/// Result type alias for telemetry operations.
pub type Result<T, E = TelemetryError> = std::result::Result<T, E>;

/// Main error type for telemetry channel operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TelemetryError {
    #[error("Shared memory region '{name}' not found")]
    RegionNotFound {
        name: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Shared memory region '{name}' cannot be mapped at {min_size} bytes")]
    RegionTooSmall { name: String, min_size: usize },

    #[error("Metadata block has no '...' terminator within {scanned} bytes")]
    MetadataUnterminated { scanned: usize },

    #[error("Metadata parse error: {details}")]
    MetadataParse { details: String },

    #[error("Variable header table corrupt at offset {offset:#x}: {details}")]
    HeaderCorrupt { offset: usize, details: String },

    #[error("Variable '{name}' is unknown: {context}")]
    UnknownVariable { name: String, context: String },

    #[error("Memory access outside region at offset {offset:#x} (capacity {capacity})")]
    Memory { offset: usize, capacity: usize },

    #[error("Type conversion error: {details}")]
    TypeConversion { details: String },

    #[error("Invalid channel configuration: {details}")]
    Config { details: String },

    #[error("I/O error on {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Windows API error: {operation}")]
    #[cfg(windows)]
    WindowsApi {
        operation: String,
        #[source]
        source: core::Error,
    },
}

impl TelemetryError {
    /// Returns whether this error is potentially recoverable through retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            TelemetryError::RegionNotFound { .. } => true,
            TelemetryError::RegionTooSmall { .. } => true,
            TelemetryError::MetadataUnterminated { .. } => true,
            TelemetryError::MetadataParse { .. } => false,
            TelemetryError::HeaderCorrupt { .. } => false,
            TelemetryError::UnknownVariable { .. } => false,
            TelemetryError::Memory { .. } => false,
            TelemetryError::TypeConversion { .. } => false,
            TelemetryError::Config { .. } => false,
            TelemetryError::Io { .. } => false,
            #[cfg(windows)]
            TelemetryError::WindowsApi { .. } => true,
        }
    }

    /// Returns suggested recovery actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            TelemetryError::RegionNotFound { .. } => vec![
                "Ensure the simulator is running",
                "Check the configured region name",
                "Check permissions for shared memory access",
            ],
            TelemetryError::RegionTooSmall { .. } => vec![
                "Wait for the simulator to finish loading a session",
                "Lower the minimum probe size in the channel configuration",
            ],
            TelemetryError::MetadataUnterminated { .. } => vec![
                "Retry once the simulator has published session info",
                "Raise the maximum probe size if the region is truncated",
            ],
            TelemetryError::MetadataParse { .. } => vec![
                "Check the producer's session info output",
                "Verify the region name points at a telemetry region",
            ],
            TelemetryError::HeaderCorrupt { .. } => vec![
                "Verify the header layout in the channel configuration",
                "Check simulator version compatibility",
            ],
            TelemetryError::UnknownVariable { .. } => vec![
                "Check variable name spelling",
                "Verify the variable exists in the current simulator version",
                "Update the static offset table for this producer layout",
            ],
            TelemetryError::Memory { .. } => vec![
                "Check buffer offsets against the region capacity",
                "Verify the static offset table",
            ],
            TelemetryError::TypeConversion { .. } => vec![
                "Check the variable's declared type in the descriptor table",
                "Read through Value for dynamically typed access",
            ],
            TelemetryError::Config { .. } => vec![
                "Fix the reported configuration field",
                "Start from ChannelConfig::default()",
            ],
            TelemetryError::Io { .. } => vec![
                "Check the file exists and is readable",
                "Check file permissions",
            ],
            #[cfg(windows)]
            TelemetryError::WindowsApi { .. } => vec![
                "Check Windows API permissions",
                "Verify the simulator is still running",
            ],
        }
    }

    /// Helper constructor for a missing region.
    pub fn region_not_found(name: impl Into<String>) -> Self {
        TelemetryError::RegionNotFound { name: name.into(), source: None }
    }

    /// Helper constructor for a missing region with the OS error attached.
    pub fn region_not_found_with_source(
        name: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        TelemetryError::RegionNotFound { name: name.into(), source: Some(source) }
    }

    /// Helper constructor for header table corruption.
    pub fn header_corrupt(offset: usize, details: impl Into<String>) -> Self {
        TelemetryError::HeaderCorrupt { offset, details: details.into() }
    }

    /// Helper constructor for unknown variable lookups.
    pub fn unknown_variable(name: impl Into<String>, context: impl Into<String>) -> Self {
        TelemetryError::UnknownVariable { name: name.into(), context: context.into() }
    }

    /// Helper constructor for configuration errors.
    pub fn config(details: impl Into<String>) -> Self {
        TelemetryError::Config { details: details.into() }
    }

    /// Helper constructor for I/O errors with path context.
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TelemetryError::Io { path: path.into(), source }
    }

    /// Helper constructor for Windows API errors.
    #[cfg(windows)]
    pub fn windows_api_error(operation: impl Into<String>, source: core::Error) -> Self {
        TelemetryError::WindowsApi { operation: operation.into(), source }
    }
}

impl From<std::io::Error> for TelemetryError {
    fn from(err: std::io::Error) -> Self {
        TelemetryError::Io { path: PathBuf::from("<unknown>"), source: err }
    }
}

#[cfg(windows)]
impl From<core::Error> for TelemetryError {
    fn from(err: core::Error) -> Self {
        TelemetryError::WindowsApi {
            operation: "Unknown Windows operation".to_string(),
            source: err,
        }
    }
}
