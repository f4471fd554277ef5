//! Descriptor Table Parser
//!
//! After the metadata segment the producer pads with NUL bytes up to the
//! first variable header record, then writes fixed-size records:
//!
//! ```text
//! offset  size  field
//!      0     4  type code (little-endian i32, index into VariableType)
//!     16    32  name, NUL-padded
//!     48    64  description, NUL-padded
//!    112    32  unit, NUL-padded
//! ```
//!
//! A record whose name field is entirely NUL terminates the table. Text
//! fields are decoded with every NUL byte removed, so a name with leading
//! or embedded padding still identifies its variable.
//! Record length and name position come from [`LayoutConfig`].

use tracing::{debug, trace};

use crate::config::LayoutConfig;
use crate::{
    DescriptorTable, MappedRegion, Result, TelemetryError, VariableDescriptor, VariableType,
};

/// Decode a NUL-padded text field, dropping every NUL byte.
fn field_text(bytes: &[u8]) -> String {
    let text: Vec<u8> = bytes.iter().copied().filter(|&b| b != 0).collect();
    String::from_utf8_lossy(&text).into_owned()
}

/// Locate the first header record at or after `start`.
///
/// Skips NUL padding to the first non-NUL byte, then aligns down to
/// `alignment` without moving before `start`.
pub fn find_table_start(bytes: &[u8], start: usize, alignment: usize) -> Result<usize> {
    let first = bytes
        .get(start..)
        .and_then(|rest| rest.iter().position(|&b| b != 0))
        .map(|i| start + i)
        .ok_or_else(|| {
            TelemetryError::header_corrupt(start, "no header records after the metadata block")
        })?;

    let aligned = first - first % alignment.max(1);
    Ok(aligned.max(start))
}

/// Parse the descriptor table starting at `start_offset`.
///
/// # Errors
///
/// [`TelemetryError::HeaderCorrupt`] when a type code is outside the known
/// set, a record runs past the region, the padding never ends, or a name
/// repeats. [`TelemetryError::Config`] when `layout` is inconsistent.
pub fn parse_descriptors(
    region: &MappedRegion,
    start_offset: usize,
    layout: &LayoutConfig,
) -> Result<DescriptorTable> {
    layout.validate()?;
    let bytes = region.as_bytes();
    let table_start = find_table_start(bytes, start_offset, layout.record_alignment)?;
    trace!(start_offset, table_start, "Located descriptor table");

    let name_range = layout.name_offset..layout.name_offset + layout.name_max_len;
    let has_text_fields = name_range.end <= LayoutConfig::DESC_OFFSET
        && layout.record_len >= LayoutConfig::UNIT_OFFSET + LayoutConfig::UNIT_LEN;

    let mut descriptors = Vec::new();
    let mut pos = table_start;

    loop {
        let name_field = bytes
            .get(pos + name_range.start..pos + name_range.end)
            .ok_or_else(|| {
                TelemetryError::header_corrupt(pos, "table runs past the end of the region")
            })?;

        if name_field.iter().all(|&b| b == 0) {
            break;
        }
        let name = field_text(name_field);

        let record = bytes.get(pos..pos + layout.record_len).ok_or_else(|| {
            TelemetryError::header_corrupt(
                pos,
                format!("record for '{}' runs past the end of the region", name),
            )
        })?;

        let code = i32::from_le_bytes([record[0], record[1], record[2], record[3]]);
        let var_type = VariableType::from_code(code).ok_or_else(|| {
            TelemetryError::header_corrupt(
                pos,
                format!("type code {} of '{}' is outside the known set", code, name),
            )
        })?;

        let mut descriptor = VariableDescriptor::new(name, var_type, pos);
        if has_text_fields {
            let desc = LayoutConfig::DESC_OFFSET;
            let unit = LayoutConfig::UNIT_OFFSET;
            descriptor.description = field_text(&record[desc..desc + LayoutConfig::DESC_LEN]);
            descriptor.unit = field_text(&record[unit..unit + LayoutConfig::UNIT_LEN]);
        }

        trace!(name = %descriptor.name, ?var_type, offset = pos, "Parsed variable header");
        descriptors.push(descriptor);
        pos += layout.record_len;
    }

    let table = DescriptorTable::new(descriptors)?;
    debug!(count = table.len(), table_start, table_end = pos, "Parsed descriptor table");
    Ok(table)
}
