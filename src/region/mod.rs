//! Shared memory region access
//!
//! A [`MappedRegion`] is a fixed-capacity, read-only byte span. Live regions
//! are backed by the OS mapping of the producer's named object; snapshots
//! (replays, tests) are backed by owned bytes. Nothing in this crate ever
//! writes to a region.
//!
//! # Usage
//!
//! ```rust
//! use paddock::MappedRegion;
//!
//! let region = MappedRegion::from_bytes("snapshot", vec![0u8; 64]);
//! assert_eq!(region.capacity(), 64);
//! assert!(region.span(60, 8).is_err());
//! ```

#[cfg(not(windows))]
mod file;
mod probe;
#[cfg(windows)]
mod win32;

use std::path::Path;
use tracing::{debug, warn};

use crate::{ProbeConfig, Result, TelemetryError};

#[cfg(not(windows))]
pub use file::region_path;
pub use probe::{ProbeOutcome, probe_capacity};

enum Backing {
    Owned(Box<[u8]>),
    #[cfg(not(windows))]
    File(memmap2::Mmap),
    #[cfg(windows)]
    View(win32::View),
}

/// Read-only view of the producer's telemetry region.
pub struct MappedRegion {
    name: String,
    backing: Backing,
}

impl MappedRegion {
    /// Map the named shared memory object, probing its capacity within `probe`.
    ///
    /// # Errors
    ///
    /// - [`TelemetryError::RegionNotFound`] if the object does not exist
    /// - [`TelemetryError::RegionTooSmall`] if it cannot be mapped at `probe.min_size`
    pub fn open(name: &str, probe: ProbeConfig) -> Result<Self> {
        #[cfg(windows)]
        let (backing, outcome) = win32::map(name, probe).map(|(v, o)| (Backing::View(v), o))?;
        #[cfg(not(windows))]
        let (backing, outcome) = file::map(name, probe).map(|(m, o)| (Backing::File(m), o))?;

        if outcome.capped {
            warn!(
                name,
                max_size = probe.max_size,
                "Region maps at the probe upper bound; capacity may be truncated"
            );
        }
        debug!(name, capacity = outcome.capacity, attempts = outcome.attempts, "Region opened");

        Ok(Self { name: name.to_string(), backing })
    }

    /// Wrap an owned snapshot of a region.
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self { name: name.into(), backing: Backing::Owned(bytes.into().into_boxed_slice()) }
    }

    /// Load a region snapshot previously dumped to a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| TelemetryError::io_error(path, e))?;
        Ok(Self::from_bytes(path.display().to_string(), bytes))
    }

    /// Name the region was opened under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Usable size in bytes.
    pub fn capacity(&self) -> usize {
        self.as_bytes().len()
    }

    /// Whole region as bytes.
    pub fn as_bytes(&self) -> &[u8] {
        match &self.backing {
            Backing::Owned(bytes) => &bytes[..],
            #[cfg(not(windows))]
            Backing::File(mmap) => &mmap[..],
            #[cfg(windows)]
            Backing::View(view) => view.as_bytes(),
        }
    }

    /// Bounds-checked sub-span.
    pub fn span(&self, offset: usize, len: usize) -> Result<&[u8]> {
        let bytes = self.as_bytes();
        offset
            .checked_add(len)
            .and_then(|end| bytes.get(offset..end))
            .ok_or(TelemetryError::Memory { offset, capacity: bytes.len() })
    }
}

impl std::fmt::Debug for MappedRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappedRegion")
            .field("name", &self.name)
            .field("capacity", &self.capacity())
            .finish()
    }
}
