//! Layout discovery for the telemetry region
//!
//! The region is self-describing up to the variable offsets:
//!
//! ```text
//! 0                     metadata_end          table start
//! | header | YAML | ... |  NUL padding  | header records | ... | buffers
//! ```
//!
//! - [`metadata`] scans the text segment and parses the session document
//! - [`descriptors`] decodes the header records into a [`DescriptorTable`](crate::DescriptorTable)
//! - [`offsets`] holds the static in-buffer offsets the producer does not publish
//! - [`session`] provides typed views over the session document

pub mod descriptors;
pub mod metadata;
pub mod offsets;
pub mod session;

pub use descriptors::{find_table_start, parse_descriptors};
pub use metadata::{
    METADATA_SENTINEL, MetadataBlock, MetadataDocument, read_metadata, read_metadata_document,
    read_metadata_end, scan_metadata,
};
pub use offsets::VariableOffsetTable;
pub use session::WeekendInfo;
