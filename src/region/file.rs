//! File-backed region mapping for non-Windows hosts
//!
//! The simulator's named object is exposed as a file (typically under
//! `/dev/shm` by a compatibility layer) and mapped read-only.

use memmap2::{Mmap, MmapOptions};
use std::fs::File;
use std::path::PathBuf;
use tracing::{debug, trace};

use super::probe::{ProbeOutcome, probe_capacity};
use crate::{ProbeConfig, Result, TelemetryError};

/// Windows session namespace prefix, meaningless outside Windows
const LOCAL_NAMESPACE: &str = "Local\\";

/// Resolve a region name to the file backing it.
///
/// Names containing `/` are used verbatim; anything else lives in `/dev/shm`.
pub fn region_path(name: &str) -> PathBuf {
    if name.contains('/') {
        return PathBuf::from(name);
    }
    let bare = name.strip_prefix(LOCAL_NAMESPACE).unwrap_or(name);
    PathBuf::from("/dev/shm").join(bare)
}

/// Open and map the named region at its probed capacity.
pub(super) fn map(name: &str, probe: ProbeConfig) -> Result<(Mmap, ProbeOutcome)> {
    let path = region_path(name);
    trace!(name, path = %path.display(), "Opening file-backed region");

    let file = File::open(&path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => {
            TelemetryError::region_not_found_with_source(name, Box::new(e))
        }
        _ => TelemetryError::io_error(&path, e),
    })?;
    let file_len = file.metadata().map_err(|e| TelemetryError::io_error(&path, e))?.len();

    // mmap past EOF succeeds and faults on access, so bound by the file length too.
    let outcome = probe_capacity(probe.min_size, probe.max_size, |size| {
        // SAFETY: the mapping is read-only and dropped immediately.
        size as u64 <= file_len && unsafe { MmapOptions::new().len(size).map(&file) }.is_ok()
    })
    .ok_or_else(|| TelemetryError::RegionTooSmall {
        name: name.to_string(),
        min_size: probe.min_size,
    })?;

    // SAFETY: the region is only ever read; concurrent producer writes are
    // the documented contract of this channel.
    let mmap = unsafe { MmapOptions::new().len(outcome.capacity).map(&file) }
        .map_err(|e| TelemetryError::io_error(&path, e))?;

    debug!(name, file_len, capacity = outcome.capacity, "Mapped file-backed region");
    Ok((mmap, outcome))
}
