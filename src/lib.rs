//! Read-only access to a racing simulator's shared-memory telemetry channel.
//!
//! The simulator publishes a named shared memory region containing a YAML
//! session document, a table of variable header records, and several
//! replicas of the live data buffer. Paddock maps that region, discovers
//! its layout once, and decodes individual variables on demand.
//!
//! # Components
//!
//! - [`MappedRegion`]: maps the named object and probes its capacity
//! - [`schema::metadata`]: reads the session document and where it ends
//! - [`schema::descriptors`]: decodes variable names and types
//! - [`decoder`]: picks a buffer replica and decodes a value
//! - [`TelemetryChannel`]: ties the above together
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use paddock::TelemetryChannel;
//!
//! fn main() -> paddock::Result<()> {
//!     let channel = TelemetryChannel::open_default()?;
//!     println!("Track: {}", channel.weekend_info()?.track_name);
//!
//!     match channel.read_as::<f32>("Speed")? {
//!         Some(speed) => println!("Speed: {speed:.1} m/s"),
//!         None => println!("Speed not available yet"),
//!     }
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod config;
pub mod decoder;
mod error;
pub mod region;
pub mod schema;
#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;
pub mod types;
mod yaml_utils;

pub use channel::{ChannelBuilder, TelemetryChannel};
pub use config::{ChannelConfig, DEFAULT_BUFFERS, DEFAULT_REGION_NAME, LayoutConfig, ProbeConfig};
pub use decoder::{BufferSelector, BufferSet, Candidate, FirstCandidate, NonZeroSpan, read_variable};
pub use error::*;
pub use region::{MappedRegion, ProbeOutcome, probe_capacity};
pub use schema::{
    MetadataDocument, VariableOffsetTable, WeekendInfo, parse_descriptors, read_metadata_document,
    read_metadata_end,
};
pub use types::*;
