//! Synthetic telemetry regions for tests and benchmarks
//!
//! [`SyntheticRegion`] lays out bytes the way the producer does: a header
//! line, the metadata document, the `...` sentinel, NUL padding, 144-byte
//! header records, an empty terminating record, and finally the buffer
//! replicas.

#![cfg(any(test, feature = "benchmark"))]

use crate::{MappedRegion, Value, VariableType};

const RECORD_LEN: usize = 144;

struct Record {
    code: i32,
    name: String,
    description: String,
    unit: String,
}

/// Builder for producer-shaped region bytes.
pub struct SyntheticRegion {
    header: String,
    metadata: String,
    padding: usize,
    records: Vec<Record>,
    variables: Vec<(String, VariableType, usize)>,
    bases: Vec<usize>,
    writes: Vec<(usize, String, Value)>,
    capacity: Option<usize>,
}

impl Default for SyntheticRegion {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntheticRegion {
    pub fn new() -> Self {
        Self {
            header: "paddock synthetic 1".to_string(),
            metadata: String::new(),
            padding: 12,
            records: Vec::new(),
            variables: Vec::new(),
            bases: Vec::new(),
            writes: Vec::new(),
            capacity: None,
        }
    }

    /// Format marker line written before the metadata.
    pub fn header_line(mut self, line: &str) -> Self {
        self.header = line.to_string();
        self
    }

    /// Metadata document text (without the sentinel).
    pub fn metadata(mut self, yaml: &str) -> Self {
        self.metadata = yaml.to_string();
        if !self.metadata.is_empty() && !self.metadata.ends_with('\n') {
            self.metadata.push('\n');
        }
        self
    }

    /// NUL bytes between the metadata block and the first record.
    pub fn padding(mut self, bytes: usize) -> Self {
        self.padding = bytes;
        self
    }

    /// Declare a variable with a header record and an in-buffer offset.
    pub fn variable(self, name: &str, var_type: VariableType, offset: usize) -> Self {
        self.described_variable(name, var_type, offset, "", "")
    }

    /// Declare a variable carrying description and unit text.
    pub fn described_variable(
        mut self,
        name: &str,
        var_type: VariableType,
        offset: usize,
        description: &str,
        unit: &str,
    ) -> Self {
        self = self.raw_record(var_type.code(), name);
        if let Some(record) = self.records.last_mut() {
            record.description = description.to_string();
            record.unit = unit.to_string();
        }
        self.variables.push((name.to_string(), var_type, offset));
        self
    }

    /// Header record with an arbitrary type code and no offset entry.
    pub fn raw_record(mut self, code: i32, name: &str) -> Self {
        self.records.push(Record {
            code,
            name: name.to_string(),
            description: String::new(),
            unit: String::new(),
        });
        self
    }

    /// Buffer replica base offsets in read priority order.
    pub fn buffers(mut self, bases: impl IntoIterator<Item = usize>) -> Self {
        self.bases = bases.into_iter().collect();
        self
    }

    /// Total region size; computed from the layout when unset.
    pub fn capacity(mut self, bytes: usize) -> Self {
        self.capacity = Some(bytes);
        self
    }

    /// Store `value` for `name` in replica `replica`.
    pub fn write(mut self, replica: usize, name: &str, value: Value) -> Self {
        self.writes.push((replica, name.to_string(), value));
        self
    }

    /// Offset table entries for every declared variable.
    pub fn offsets(&self) -> Vec<(String, usize)> {
        self.variables.iter().map(|(name, _, offset)| (name.clone(), *offset)).collect()
    }

    /// Replica base offsets, defaulting to one replica after the table.
    pub fn buffer_bases(&self) -> Vec<usize> {
        if self.bases.is_empty() {
            vec![self.table_end().next_multiple_of(64)]
        } else {
            self.bases.clone()
        }
    }

    /// Offset the metadata reader should report.
    pub fn expected_metadata_end(&self) -> usize {
        self.header.len() + 1 + self.metadata.len() + 4
    }

    /// Offset of the first header record.
    pub fn table_start(&self) -> usize {
        self.header.len() + 1 + self.metadata.len() + "...\n".len() + self.padding
    }

    fn table_end(&self) -> usize {
        self.table_start() + (self.records.len() + 1) * RECORD_LEN
    }

    /// Render the region bytes.
    ///
    /// # Panics
    ///
    /// If a write names an undeclared variable or replica.
    pub fn bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(self.header.as_bytes());
        bytes.push(b'\n');
        bytes.extend_from_slice(self.metadata.as_bytes());
        bytes.extend_from_slice(b"...\n");
        bytes.resize(bytes.len() + self.padding, 0);

        for record in &self.records {
            let mut raw = [0u8; RECORD_LEN];
            raw[0..4].copy_from_slice(&record.code.to_le_bytes());
            put(&mut raw[16..48], &record.name);
            put(&mut raw[48..112], &record.description);
            put(&mut raw[112..144], &record.unit);
            bytes.extend_from_slice(&raw);
        }
        bytes.resize(bytes.len() + RECORD_LEN, 0);

        let bases = self.buffer_bases();
        let buffer_len = self
            .variables
            .iter()
            .map(|(_, var_type, offset)| offset + var_type.size())
            .max()
            .unwrap_or(0);
        let needed = bases.iter().map(|base| base + buffer_len).max().unwrap_or(0);
        let capacity = self.capacity.unwrap_or_else(|| needed.max(bytes.len()) + 64);
        bytes.resize(capacity, 0);

        for (replica, name, value) in &self.writes {
            let (_, _, offset) = self
                .variables
                .iter()
                .find(|(n, _, _)| n == name)
                .unwrap_or_else(|| panic!("write to undeclared variable {name}"));
            let base = bases
                .get(*replica)
                .unwrap_or_else(|| panic!("write to missing replica {replica}"));
            let encoded = value.to_le_bytes();
            bytes[base + offset..base + offset + encoded.len()].copy_from_slice(&encoded);
        }

        bytes
    }

    /// Render into an owned region.
    pub fn build(&self) -> MappedRegion {
        MappedRegion::from_bytes("synthetic", self.bytes())
    }
}

fn put(field: &mut [u8], text: &str) {
    let len = text.len().min(field.len());
    field[..len].copy_from_slice(&text.as_bytes()[..len]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_positions_are_consistent() {
        let region = SyntheticRegion::new()
            .metadata("A: 1")
            .variable("Speed", VariableType::Float32, 0)
            .write(0, "Speed", Value::Float32(1.0));
        let bytes = region.bytes();

        let start = region.table_start();
        assert!(bytes[region.expected_metadata_end()..start].iter().all(|&b| b == 0));
        assert_eq!(&bytes[start..start + 4], &4i32.to_le_bytes());
        assert_eq!(&bytes[start + 16..start + 21], b"Speed");

        let base = region.buffer_bases()[0];
        assert_eq!(&bytes[base..base + 4], &1.0f32.to_le_bytes());
    }
}
