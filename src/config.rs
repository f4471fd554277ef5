//! Channel configuration
//!
//! Defaults describe the producer's documented layout. Every field can be
//! overridden from YAML:
//!
//! ```rust
//! use paddock::ChannelConfig;
//!
//! let config = ChannelConfig::from_yaml_str(
//!     "region_name: /dev/shm/telemetry\nbuffers: [4096, 8192]\n",
//! )
//! .unwrap();
//! assert_eq!(config.buffers, vec![4096, 8192]);
//! assert_eq!(config.layout.record_len, 144);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::{Result, TelemetryError};

/// Name of the simulator's shared memory object
pub const DEFAULT_REGION_NAME: &str = "Local\\IRSDKMemMapFileName";

/// Absolute offsets of the buffer replicas, in read priority order
pub const DEFAULT_BUFFERS: [usize; 3] = [770_160, 721_008, 745_584];

/// Complete configuration for opening a [`TelemetryChannel`](crate::TelemetryChannel).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// Shared memory object name (or file path on non-Windows hosts)
    pub region_name: String,
    /// Capacity probe bounds
    pub probe: ProbeConfig,
    /// Header layout constants
    pub layout: LayoutConfig,
    /// Absolute base offsets of the buffer replicas
    pub buffers: Vec<usize>,
    /// In-buffer offsets by variable name; `None` selects the standard table
    pub offsets: Option<BTreeMap<String, usize>>,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            region_name: DEFAULT_REGION_NAME.to_string(),
            probe: ProbeConfig::default(),
            layout: LayoutConfig::default(),
            buffers: DEFAULT_BUFFERS.to_vec(),
            offsets: None,
        }
    }
}

impl ChannelConfig {
    /// Parse and validate a YAML configuration.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)
            .map_err(|e| TelemetryError::config(format!("YAML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml =
            std::fs::read_to_string(path).map_err(|e| TelemetryError::io_error(path, e))?;
        Self::from_yaml_str(&yaml)
    }

    /// Check the configuration for internal consistency.
    pub fn validate(&self) -> Result<()> {
        if self.region_name.is_empty() {
            return Err(TelemetryError::config("region_name must not be empty"));
        }

        if self.buffers.is_empty() {
            return Err(TelemetryError::config("at least one buffer offset is required"));
        }

        self.probe.validate()?;
        self.layout.validate()
    }
}

/// Bounds for the region capacity probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Smallest size the region must map at
    pub min_size: usize,
    /// Largest size the probe will try
    pub max_size: usize,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self { min_size: 500_000, max_size: 16 * 1024 * 1024 }
    }
}

impl ProbeConfig {
    fn validate(&self) -> Result<()> {
        if self.min_size == 0 {
            return Err(TelemetryError::config("probe.min_size must be positive"));
        }
        if self.min_size > self.max_size {
            return Err(TelemetryError::config(format!(
                "probe.min_size ({}) exceeds probe.max_size ({})",
                self.min_size, self.max_size
            )));
        }
        Ok(())
    }
}

/// Fixed layout constants of the metadata block and header records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Length of one header record
    pub record_len: usize,
    /// Offset of the name field inside a record
    pub name_offset: usize,
    /// Length of the NUL-padded name field
    pub name_max_len: usize,
    /// Bytes added after the metadata block for producer alignment
    pub metadata_pad: usize,
    /// Alignment of the first header record; 1 starts at the first non-NUL byte
    pub record_alignment: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            record_len: 144,
            name_offset: 16,
            name_max_len: 32,
            metadata_pad: 4,
            record_alignment: 1,
        }
    }
}

impl LayoutConfig {
    /// Offset of the description field inside a record.
    pub(crate) const DESC_OFFSET: usize = 48;
    /// Length of the description field.
    pub(crate) const DESC_LEN: usize = 64;
    /// Offset of the unit field inside a record.
    pub(crate) const UNIT_OFFSET: usize = 112;
    /// Length of the unit field.
    pub(crate) const UNIT_LEN: usize = 32;

    pub(crate) fn validate(&self) -> Result<()> {
        if self.record_len < 4 {
            return Err(TelemetryError::config("layout.record_len must hold the 4-byte type code"));
        }
        if self.name_max_len == 0 {
            return Err(TelemetryError::config("layout.name_max_len must be positive"));
        }
        if self.name_offset < 4 || self.name_offset + self.name_max_len > self.record_len {
            return Err(TelemetryError::config(format!(
                "name field {}..{} does not fit a {}-byte record after the type code",
                self.name_offset,
                self.name_offset + self.name_max_len,
                self.record_len
            )));
        }
        if self.record_alignment == 0 {
            return Err(TelemetryError::config("layout.record_alignment must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ChannelConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.region_name, DEFAULT_REGION_NAME);
        assert_eq!(config.buffers, DEFAULT_BUFFERS);
        assert_eq!(config.layout.record_len, 144);
        assert_eq!(config.layout.name_offset, 16);
        assert_eq!(config.layout.name_max_len, 32);
        assert_eq!(config.layout.metadata_pad, 4);
        assert_eq!(config.probe.min_size, 500_000);
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = ChannelConfig::from_yaml_str(
            "probe:\n  max_size: 1048576\noffsets:\n  Speed: 12\n",
        )
        .unwrap();
        assert_eq!(config.probe.min_size, 500_000);
        assert_eq!(config.probe.max_size, 1_048_576);
        assert_eq!(config.offsets.unwrap().get("Speed"), Some(&12));
        assert_eq!(config.buffers, DEFAULT_BUFFERS);
    }

    #[test]
    fn inverted_probe_bounds_are_rejected() {
        let result = ChannelConfig::from_yaml_str("probe:\n  min_size: 10\n  max_size: 5\n");
        assert!(matches!(result, Err(TelemetryError::Config { .. })));
    }

    #[test]
    fn name_field_must_fit_record() {
        let mut config = ChannelConfig::default();
        config.layout.name_offset = 120;
        assert!(matches!(config.validate(), Err(TelemetryError::Config { .. })));
    }

    #[test]
    fn empty_buffer_list_is_rejected() {
        let result = ChannelConfig::from_yaml_str("buffers: []\n");
        assert!(matches!(result, Err(TelemetryError::Config { .. })));
    }

    #[test]
    fn malformed_yaml_is_a_config_error() {
        let result = ChannelConfig::from_yaml_str("probe: [1, 2");
        assert!(matches!(result, Err(TelemetryError::Config { .. })));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = ChannelConfig::from_path("/nonexistent/paddock.yaml");
        assert!(matches!(result, Err(TelemetryError::Io { .. })));
    }
}
