//! Telemetry Decoder
//!
//! The producer keeps several replicas of the live data buffer at fixed
//! offsets and rewrites them in rotation. A read walks the replicas in
//! priority order, hands each candidate span to a [`BufferSelector`], and
//! decodes the first span the selector accepts.
//!
//! The default [`NonZeroSpan`] policy treats an all-zero span as "replica
//! not yet written". A variable whose true value encodes to all zeros (0.0,
//! false, 0) therefore reads as [`Reading::NotAvailable`] under that policy.
//! Snapshots that are known to be consistent can use [`FirstCandidate`].

use tracing::trace;

use crate::config::DEFAULT_BUFFERS;
use crate::schema::VariableOffsetTable;
use crate::{
    DescriptorTable, MappedRegion, Reading, Result, TelemetryError, Value, VariableType,
};

/// Ordered, non-empty list of buffer replica base offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferSet {
    bases: Vec<usize>,
}

impl BufferSet {
    /// Build a set from base offsets in read priority order.
    pub fn new(bases: impl Into<Vec<usize>>) -> Result<Self> {
        let bases = bases.into();
        if bases.is_empty() {
            return Err(TelemetryError::config("at least one buffer offset is required"));
        }
        Ok(Self { bases })
    }

    /// The producer's standard replica offsets.
    pub fn standard() -> Self {
        Self { bases: DEFAULT_BUFFERS.to_vec() }
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.bases
    }

    pub fn len(&self) -> usize {
        self.bases.len()
    }

    /// Whether the set has no replicas.
    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.bases.iter().copied()
    }
}

impl Default for BufferSet {
    fn default() -> Self {
        Self::standard()
    }
}

/// One replica's span for the variable being read.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    /// Variable name
    pub name: &'a str,
    /// Declared type of the variable
    pub var_type: VariableType,
    /// Position of the replica in the buffer set
    pub index: usize,
    /// Absolute base offset of the replica
    pub base: usize,
    /// Raw bytes of the variable in this replica
    pub bytes: &'a [u8],
}

impl Candidate<'_> {
    /// Whether every byte of the span is zero.
    pub fn is_zero(&self) -> bool {
        self.bytes.iter().all(|&b| b == 0)
    }
}

/// Policy deciding which replica a read is served from.
pub trait BufferSelector: Send + Sync {
    /// Whether `candidate` holds a usable value.
    fn accept(&self, candidate: &Candidate<'_>) -> bool;
}

impl<F> BufferSelector for F
where
    F: Fn(&Candidate<'_>) -> bool + Send + Sync,
{
    fn accept(&self, candidate: &Candidate<'_>) -> bool {
        self(candidate)
    }
}

/// Accept the first replica whose span has at least one non-zero byte.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonZeroSpan;

impl BufferSelector for NonZeroSpan {
    fn accept(&self, candidate: &Candidate<'_>) -> bool {
        !candidate.is_zero()
    }
}

/// Accept the first replica unconditionally.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstCandidate;

impl BufferSelector for FirstCandidate {
    fn accept(&self, _candidate: &Candidate<'_>) -> bool {
        true
    }
}

/// Read the current value of `name`.
///
/// # Errors
///
/// - [`TelemetryError::UnknownVariable`] if `name` is missing from either table
/// - [`TelemetryError::Memory`] if a replica span falls outside the region
pub fn read_variable(
    region: &MappedRegion,
    descriptors: &DescriptorTable,
    offsets: &VariableOffsetTable,
    buffers: &BufferSet,
    selector: &dyn BufferSelector,
    name: &str,
) -> Result<Reading> {
    let descriptor = descriptors
        .get(name)
        .ok_or_else(|| TelemetryError::unknown_variable(name, "no header record"))?;
    let offset = offsets
        .get(name)
        .ok_or_else(|| TelemetryError::unknown_variable(name, "no entry in the offset table"))?;

    for (index, base) in buffers.iter().enumerate() {
        let start = base.saturating_add(offset);
        let bytes = region.span(start, descriptor.byte_size)?;
        let candidate = Candidate { name, var_type: descriptor.var_type, index, base, bytes };

        if selector.accept(&candidate) {
            trace!(name, index, base, "Serving read from replica");
            return Value::decode(descriptor.var_type, bytes).map(Reading::Available);
        }
    }

    trace!(name, replicas = buffers.len(), "No replica accepted");
    Ok(Reading::NotAvailable)
}
