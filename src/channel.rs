//! Telemetry channel
//!
//! [`TelemetryChannel`] ties the components together: it maps the region
//! once, derives the metadata document and descriptor table once, checks
//! the static offset table against both, and then serves reads.
//!
//! ```rust
//! use paddock::{FirstCandidate, MappedRegion, TelemetryChannel, Value};
//!
//! # fn region() -> MappedRegion {
//! #     let mut bytes = b"v2\nWeekendInfo:\n  TrackName: test\n...\n".to_vec();
//! #     bytes.resize(64, 0);
//! #     let mut record = [0u8; 144];
//! #     record[0..4].copy_from_slice(&4i32.to_le_bytes());
//! #     record[16..21].copy_from_slice(b"Speed");
//! #     bytes.extend_from_slice(&record);
//! #     bytes.extend_from_slice(&[0u8; 144]);
//! #     bytes.resize(512, 0);
//! #     bytes[400..404].copy_from_slice(&55.5f32.to_le_bytes());
//! #     MappedRegion::from_bytes("doc", bytes)
//! # }
//! let channel = TelemetryChannel::builder(region())
//!     .offsets([("Speed", 0)])
//!     .buffers([400])
//!     .selector(FirstCandidate)
//!     .build()?;
//!
//! assert_eq!(channel.weekend_info()?.track_name, "test");
//! assert_eq!(channel.read_as::<f32>("Speed")?, Some(55.5));
//! # Ok::<(), paddock::TelemetryError>(())
//! ```

use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::decoder::{BufferSelector, BufferSet, NonZeroSpan, read_variable};
use crate::schema::{
    MetadataDocument, VariableOffsetTable, WeekendInfo, parse_descriptors, read_metadata,
};
use crate::{
    ChannelConfig, DescriptorTable, LayoutConfig, MappedRegion, Reading, Result, VarData,
};

/// Initialized, read-only telemetry channel.
pub struct TelemetryChannel {
    region: MappedRegion,
    layout: LayoutConfig,
    metadata_end: usize,
    metadata: MetadataDocument,
    descriptors: DescriptorTable,
    offsets: VariableOffsetTable,
    buffers: BufferSet,
    selector: Box<dyn BufferSelector>,
}

impl TelemetryChannel {
    /// Map the region named by `config` and initialize the channel.
    pub fn open(config: ChannelConfig) -> Result<Self> {
        config.validate()?;
        info!(region = %config.region_name, "Opening telemetry channel");

        let region = MappedRegion::open(&config.region_name, config.probe)?;
        Self::builder(region).config(config).build()
    }

    /// Open the simulator's region with default settings.
    pub fn open_default() -> Result<Self> {
        Self::open(ChannelConfig::default())
    }

    /// Start building a channel over an already mapped region or snapshot.
    pub fn builder(region: MappedRegion) -> ChannelBuilder {
        ChannelBuilder::new(region)
    }

    /// Current value of `name`.
    pub fn read(&self, name: &str) -> Result<Reading> {
        read_variable(
            &self.region,
            &self.descriptors,
            &self.offsets,
            &self.buffers,
            self.selector.as_ref(),
            name,
        )
    }

    /// Current value of `name` as `T`; `None` when not available.
    pub fn read_as<T: VarData>(&self, name: &str) -> Result<Option<T>> {
        self.read(name)?.value().map(T::from_value).transpose()
    }

    /// Read every variable in the offset table.
    pub fn read_all(&self) -> Result<BTreeMap<String, Reading>> {
        self.offsets
            .iter()
            .map(|(name, _)| Ok((name.to_string(), self.read(name)?)))
            .collect()
    }

    /// Metadata document captured at initialization.
    pub fn metadata(&self) -> &MetadataDocument {
        &self.metadata
    }

    /// Parse the metadata block again from the current region contents.
    ///
    /// The cached document and descriptor table are left untouched.
    pub fn reload_metadata(&self) -> Result<MetadataDocument> {
        read_metadata(&self.region, &self.layout)?.document()
    }

    /// Typed weekend section of the cached metadata.
    pub fn weekend_info(&self) -> Result<WeekendInfo> {
        self.metadata.weekend_info()
    }

    pub fn descriptors(&self) -> &DescriptorTable {
        &self.descriptors
    }

    pub fn offsets(&self) -> &VariableOffsetTable {
        &self.offsets
    }

    pub fn buffers(&self) -> &BufferSet {
        &self.buffers
    }

    pub fn region(&self) -> &MappedRegion {
        &self.region
    }

    /// Byte offset where the metadata block ends.
    pub fn metadata_end(&self) -> usize {
        self.metadata_end
    }
}

impl std::fmt::Debug for TelemetryChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelemetryChannel")
            .field("region", &self.region)
            .field("metadata_end", &self.metadata_end)
            .field("variables", &self.descriptors.len())
            .field("offsets", &self.offsets.len())
            .field("buffers", &self.buffers)
            .finish_non_exhaustive()
    }
}

/// Builder for [`TelemetryChannel`].
pub struct ChannelBuilder {
    region: MappedRegion,
    layout: LayoutConfig,
    offsets: VariableOffsetTable,
    buffers: Vec<usize>,
    selector: Box<dyn BufferSelector>,
}

impl ChannelBuilder {
    fn new(region: MappedRegion) -> Self {
        Self {
            region,
            layout: LayoutConfig::default(),
            offsets: VariableOffsetTable::standard(),
            buffers: BufferSet::standard().as_slice().to_vec(),
            selector: Box::new(NonZeroSpan),
        }
    }

    /// Take layout, buffers and offsets from a configuration.
    pub fn config(mut self, config: ChannelConfig) -> Self {
        self.layout = config.layout;
        self.buffers = config.buffers;
        if let Some(offsets) = config.offsets {
            self.offsets = offsets.into();
        }
        self
    }

    pub fn layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    /// Replace the offset table.
    pub fn offsets<S: Into<String>>(
        mut self,
        offsets: impl IntoIterator<Item = (S, usize)>,
    ) -> Self {
        self.offsets = offsets.into_iter().collect();
        self
    }

    /// Replace the buffer replica offsets, in read priority order.
    pub fn buffers(mut self, bases: impl IntoIterator<Item = usize>) -> Self {
        self.buffers = bases.into_iter().collect();
        self
    }

    /// Replace the buffer selection policy.
    pub fn selector(mut self, selector: impl BufferSelector + 'static) -> Self {
        self.selector = Box::new(selector);
        self
    }

    /// Discover the layout and validate the offset table against it.
    ///
    /// # Errors
    ///
    /// [`Config`](crate::TelemetryError::Config) for an inconsistent layout
    /// or empty buffer list, any metadata or descriptor error, plus
    /// [`UnknownVariable`](crate::TelemetryError::UnknownVariable) for offset
    /// entries without a header record and
    /// [`Memory`](crate::TelemetryError::Memory) for entries whose span
    /// leaves the region in any replica.
    pub fn build(self) -> Result<TelemetryChannel> {
        let Self { region, layout, offsets, buffers, selector } = self;
        layout.validate()?;
        let buffers = BufferSet::new(buffers)?;

        let block = read_metadata(&region, &layout)?;
        let metadata = block.document()?;
        let descriptors = parse_descriptors(&region, block.end, &layout)?;
        offsets.validate(&descriptors, buffers.as_slice(), region.capacity())?;

        debug!(
            metadata_end = block.end,
            variables = descriptors.len(),
            offsets = offsets.len(),
            "Validated offset table against descriptors"
        );
        info!(
            region = region.name(),
            capacity = region.capacity(),
            variables = descriptors.len(),
            "Telemetry channel ready"
        );

        Ok(TelemetryChannel {
            region,
            layout,
            metadata_end: block.end,
            metadata,
            descriptors,
            offsets,
            buffers,
            selector,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::SyntheticRegion;
    use crate::{FirstCandidate, TelemetryError, Value, VariableType};

    fn synthetic() -> SyntheticRegion {
        SyntheticRegion::new()
            .metadata("WeekendInfo:\n  TrackName: test\n")
            .variable("Speed", VariableType::Float32, 4)
            .variable("Gear", VariableType::Int32, 8)
            .variable("OnPitRoad", VariableType::Bool, 12)
            .buffers([2048, 1024, 1536])
    }

    fn channel(region: SyntheticRegion) -> TelemetryChannel {
        let offsets = region.offsets();
        let buffers = region.buffer_bases();
        TelemetryChannel::builder(region.build()).offsets(offsets).buffers(buffers).build().unwrap()
    }

    #[test]
    fn reads_first_written_replica() {
        let region = synthetic().write(1, "Speed", Value::Float32(42.5));
        let channel = channel(region);

        assert_eq!(channel.read("Speed").unwrap(), Reading::Available(Value::Float32(42.5)));
        assert_eq!(channel.read_as::<f32>("Speed").unwrap(), Some(42.5));
        assert_eq!(channel.read_as::<i32>("Gear").unwrap(), None);
    }

    #[test]
    fn typed_read_mismatch_is_a_conversion_error() {
        let channel = channel(synthetic().write(0, "Gear", Value::Int32(3)));
        assert!(matches!(
            channel.read_as::<f32>("Gear"),
            Err(TelemetryError::TypeConversion { .. })
        ));
    }

    #[test]
    fn read_all_covers_the_offset_table() {
        let region = synthetic()
            .write(0, "Gear", Value::Int32(-1))
            .write(2, "OnPitRoad", Value::Bool(true));
        let all = channel(region).read_all().unwrap();

        assert_eq!(all.len(), 3);
        assert_eq!(all["Gear"], Reading::Available(Value::Int32(-1)));
        assert_eq!(all["OnPitRoad"], Reading::Available(Value::Bool(true)));
        assert_eq!(all["Speed"], Reading::NotAvailable);
    }

    #[test]
    fn exposes_cached_layout() {
        let region = synthetic();
        let expected_end = region.expected_metadata_end();
        let channel = channel(region);

        assert_eq!(channel.metadata_end(), expected_end);
        assert_eq!(channel.descriptors().len(), 3);
        assert_eq!(channel.buffers().as_slice(), &[2048, 1024, 1536]);
        assert_eq!(channel.weekend_info().unwrap().track_name, "test");
        assert_eq!(channel.reload_metadata().unwrap(), *channel.metadata());
    }

    #[test]
    fn undeclared_offset_entry_fails_init() {
        let region = synthetic().build();
        let result = TelemetryChannel::builder(region)
            .offsets([("Speed", 4), ("RPM", 16)])
            .buffers([1024])
            .build();
        assert!(matches!(
            result,
            Err(TelemetryError::UnknownVariable { ref name, .. }) if name == "RPM"
        ));
    }

    #[test]
    fn out_of_region_span_fails_init() {
        let region = synthetic().build();
        let capacity = region.capacity();
        let result = TelemetryChannel::builder(region)
            .offsets([("Speed", 4)])
            .buffers([capacity - 2])
            .build();
        assert!(matches!(result, Err(TelemetryError::Memory { .. })));
    }

    #[test]
    fn inconsistent_layout_fails_init() {
        for record_len in [0, 2] {
            let layout = LayoutConfig { record_len, ..LayoutConfig::default() };
            let result = TelemetryChannel::builder(synthetic().build())
                .offsets([("Speed", 4)])
                .buffers([1024])
                .layout(layout)
                .build();
            assert!(
                matches!(result, Err(TelemetryError::Config { .. })),
                "record_len {record_len}"
            );
        }
    }

    #[test]
    fn layout_from_config_is_validated() {
        let mut config = ChannelConfig::default();
        config.layout.name_offset = 130;
        config.buffers = vec![1024];
        config.offsets = Some([("Speed".to_string(), 4)].into_iter().collect());

        let result = TelemetryChannel::builder(synthetic().build()).config(config).build();
        assert!(matches!(result, Err(TelemetryError::Config { .. })));
    }

    #[test]
    fn empty_buffer_list_fails_init() {
        let region = synthetic().build();
        let result = TelemetryChannel::builder(region).offsets([("Speed", 4)]).buffers([]).build();
        assert!(matches!(result, Err(TelemetryError::Config { .. })));
    }

    #[test]
    fn selector_is_configurable() {
        let region = synthetic();
        let offsets = region.offsets();
        let channel = TelemetryChannel::builder(region.build())
            .offsets(offsets)
            .buffers([1024])
            .selector(FirstCandidate)
            .build()
            .unwrap();
        assert_eq!(channel.read("Speed").unwrap(), Reading::Available(Value::Float32(0.0)));
    }

    #[test]
    fn channel_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TelemetryChannel>();
    }
}
