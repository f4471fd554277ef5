//! Named file mapping access on Windows
//!
//! Opens the simulator's named mapping read-only and maps a view at the
//! probed capacity. Views past the section size fail to map, which is what
//! the probe relies on.

use std::ptr::NonNull;
use tracing::{debug, trace};
use windows::Win32::Foundation::{CloseHandle, HANDLE};
use windows::Win32::System::Memory::{
    FILE_MAP_READ, MEMORY_MAPPED_VIEW_ADDRESS, MapViewOfFile, OpenFileMappingW, UnmapViewOfFile,
};
use windows::core::PCWSTR;

use super::probe::{ProbeOutcome, probe_capacity};
use crate::{ProbeConfig, Result, TelemetryError};

/// Owned mapping handle, closed on drop
struct MappingHandle(HANDLE);

impl Drop for MappingHandle {
    fn drop(&mut self) {
        unsafe {
            let _ = CloseHandle(self.0);
        }
    }
}

/// Read-only view of a named mapping
pub struct View {
    _mapping: MappingHandle,
    base: NonNull<u8>,
    len: usize,
}

impl View {
    pub fn as_bytes(&self) -> &[u8] {
        // SAFETY: `base` is a live view of `len` readable bytes until drop.
        unsafe { std::slice::from_raw_parts(self.base.as_ptr(), self.len) }
    }
}

impl Drop for View {
    fn drop(&mut self) {
        unsafe {
            let addr = MEMORY_MAPPED_VIEW_ADDRESS { Value: self.base.as_ptr() as *mut _ };
            let _ = UnmapViewOfFile(addr);
        }
    }
}

// SAFETY: the view is never written through and the handle is a kernel object.
unsafe impl Send for View {}
unsafe impl Sync for View {}

/// Open and map the named region at its probed capacity.
pub(super) fn map(name: &str, probe: ProbeConfig) -> Result<(View, ProbeOutcome)> {
    trace!(name, "Opening named file mapping");

    let mapping = unsafe {
        let wide_name = wide_string(name);
        OpenFileMappingW(FILE_MAP_READ.0, false, PCWSTR::from_raw(wide_name.as_ptr()))
            .map(MappingHandle)
            .map_err(|e| TelemetryError::region_not_found_with_source(name, Box::new(e)))?
    };

    let outcome = probe_capacity(probe.min_size, probe.max_size, |size| unsafe {
        let view = MapViewOfFile(mapping.0, FILE_MAP_READ, 0, 0, size);
        if view.Value.is_null() {
            false
        } else {
            let _ = UnmapViewOfFile(view);
            true
        }
    })
    .ok_or_else(|| TelemetryError::RegionTooSmall {
        name: name.to_string(),
        min_size: probe.min_size,
    })?;

    let base = unsafe {
        let view = MapViewOfFile(mapping.0, FILE_MAP_READ, 0, 0, outcome.capacity);
        NonNull::new(view.Value as *mut u8).ok_or_else(|| {
            let win_err = windows::core::Error::from_thread();
            TelemetryError::windows_api_error("MapViewOfFile", win_err)
        })?
    };

    debug!(name, capacity = outcome.capacity, attempts = outcome.attempts, "Mapped named region");
    Ok((View { _mapping: mapping, base, len: outcome.capacity }, outcome))
}

/// Convert string to null-terminated wide string for Windows APIs
fn wide_string(s: &str) -> Vec<u16> {
    use std::ffi::OsStr;
    use std::os::windows::ffi::OsStrExt;
    OsStr::new(s).encode_wide().chain(std::iter::once(0)).collect()
}

#[cfg(all(test, windows))]
mod tests {
    use super::*;

    #[test]
    fn wide_string_is_nul_terminated() {
        let wide = wide_string("Local\\X");
        assert_eq!(wide.last(), Some(&0));
        assert_eq!(wide.len(), "Local\\X".len() + 1);
    }

    #[test]
    fn missing_mapping_is_region_not_found() {
        let result = map("Local\\PaddockDoesNotExist", ProbeConfig::default());
        assert!(matches!(result, Err(TelemetryError::RegionNotFound { .. })));
    }

    #[test]
    #[ignore = "simulator_required"]
    fn maps_live_simulator_region() {
        let (view, outcome) =
            map(crate::config::DEFAULT_REGION_NAME, ProbeConfig::default()).unwrap();
        assert_eq!(view.as_bytes().len(), outcome.capacity);
        assert!(outcome.capacity >= ProbeConfig::default().min_size);
    }
}
