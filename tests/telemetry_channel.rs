//! End-to-end channel tests over producer-shaped bytes
//!
//! Regions are assembled here byte by byte so the tests exercise the public
//! API exactly as a snapshot or live mapping would.

use paddock::{
    ChannelConfig, FirstCandidate, MappedRegion, Reading, TelemetryChannel, TelemetryError, Value,
};
use proptest::prelude::*;

const HEADER: &[u8] = b"2\n";
const METADATA: &[u8] = b"WeekendInfo:\n  TrackName: test\n  TrackID: 47\n";

/// (name, type code, in-buffer offset)
const VARIABLES: &[(&str, i32, usize)] =
    &[("Speed", 4, 0), ("Gear", 2, 4), ("OnPitRoad", 1, 8), ("SessionTime", 5, 12)];

const BUFFERS: [usize; 3] = [4096, 2048, 3072];

fn producer_bytes() -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(HEADER);
    bytes.extend_from_slice(METADATA);
    bytes.extend_from_slice(b"...\n");
    bytes.resize(bytes.len() + 20, 0);

    for (name, code, _) in VARIABLES {
        let mut record = [0u8; 144];
        record[0..4].copy_from_slice(&code.to_le_bytes());
        record[16..16 + name.len()].copy_from_slice(name.as_bytes());
        bytes.extend_from_slice(&record);
    }
    bytes.resize(5120, 0);
    bytes
}

fn put(bytes: &mut [u8], replica: usize, offset: usize, value: &[u8]) {
    let start = BUFFERS[replica] + offset;
    bytes[start..start + value.len()].copy_from_slice(value);
}

fn channel(bytes: Vec<u8>) -> TelemetryChannel {
    let _ = tracing_subscriber::fmt::try_init();
    TelemetryChannel::builder(MappedRegion::from_bytes("integration", bytes))
        .offsets(VARIABLES.iter().map(|&(name, _, offset)| (name, offset)))
        .buffers(BUFFERS)
        .build()
        .expect("synthetic region should initialize")
}

#[test]
fn metadata_end_and_document() {
    let channel = channel(producer_bytes());

    assert_eq!(channel.metadata_end(), HEADER.len() + METADATA.len() + 4);
    assert_eq!(channel.metadata().get_str("WeekendInfo.TrackName"), Some("test"));

    let weekend = channel.weekend_info().unwrap();
    assert_eq!(weekend.track_id, Some(47));
}

#[test]
fn descriptors_follow_record_order() {
    let channel = channel(producer_bytes());
    let names: Vec<_> = channel.descriptors().iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, ["Speed", "Gear", "OnPitRoad", "SessionTime"]);
}

#[test]
fn reads_fall_back_across_replicas() {
    let mut bytes = producer_bytes();
    put(&mut bytes, 2, 0, &42.5f32.to_le_bytes());
    put(&mut bytes, 0, 4, &4i32.to_le_bytes());
    put(&mut bytes, 1, 4, &3i32.to_le_bytes());
    put(&mut bytes, 1, 12, &1234.5f64.to_le_bytes());
    let channel = channel(bytes);

    assert_eq!(channel.read_as::<f32>("Speed").unwrap(), Some(42.5));
    assert_eq!(channel.read_as::<i32>("Gear").unwrap(), Some(4));
    assert_eq!(channel.read_as::<f64>("SessionTime").unwrap(), Some(1234.5));
    assert_eq!(channel.read("OnPitRoad").unwrap(), Reading::NotAvailable);
}

#[test]
fn unknown_variable_is_an_error() {
    let channel = channel(producer_bytes());
    assert!(matches!(channel.read("Boost"), Err(TelemetryError::UnknownVariable { .. })));
}

#[test]
fn unterminated_metadata_fails_init() {
    let bytes = b"2\nWeekendInfo:\n  TrackName: test\n".to_vec();
    let result = TelemetryChannel::builder(MappedRegion::from_bytes("cut", bytes)).build();
    assert!(matches!(result, Err(TelemetryError::MetadataUnterminated { .. })));
}

#[test]
fn corrupt_type_code_fails_init() {
    let mut bytes = producer_bytes();
    let first_record = HEADER.len() + METADATA.len() + 4 + 20;
    bytes[first_record..first_record + 4].copy_from_slice(&9i32.to_le_bytes());

    let result = TelemetryChannel::builder(MappedRegion::from_bytes("corrupt", bytes))
        .offsets([("Speed", 0)])
        .buffers(BUFFERS)
        .build();
    assert!(matches!(
        result,
        Err(TelemetryError::HeaderCorrupt { offset, .. }) if offset == first_record
    ));
}

#[test]
fn standard_offsets_require_standard_variables() {
    // Default builder uses the full standard offset table, which this region
    // does not declare.
    let result = TelemetryChannel::builder(MappedRegion::from_bytes("partial", producer_bytes()))
        .buffers(BUFFERS)
        .build();
    assert!(matches!(result, Err(TelemetryError::UnknownVariable { .. })));
}

#[test]
fn snapshot_file_initializes_channel() {
    let mut bytes = producer_bytes();
    put(&mut bytes, 0, 0, &12.0f32.to_le_bytes());

    let path = std::env::temp_dir().join(format!("paddock-it-snapshot-{}", std::process::id()));
    std::fs::write(&path, &bytes).unwrap();

    let region = MappedRegion::from_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    let channel = TelemetryChannel::builder(region)
        .offsets(VARIABLES.iter().map(|&(name, _, offset)| (name, offset)))
        .buffers(BUFFERS)
        .selector(FirstCandidate)
        .build()
        .unwrap();
    assert_eq!(channel.read("Speed").unwrap(), Reading::Available(Value::Float32(12.0)));
    assert_eq!(channel.read("Gear").unwrap(), Reading::Available(Value::Int32(0)));
}

#[cfg(not(windows))]
#[test]
fn open_maps_region_file_from_config() {
    let mut bytes = producer_bytes();
    put(&mut bytes, 1, 8, &[1]);

    let path = std::env::temp_dir().join(format!("paddock-it-region-{}", std::process::id()));
    std::fs::write(&path, &bytes).unwrap();

    let yaml = format!(
        "region_name: {}\nprobe:\n  min_size: 1024\n  max_size: 65536\n\
         buffers: [4096, 2048, 3072]\n\
         offsets:\n  Speed: 0\n  Gear: 4\n  OnPitRoad: 8\n  SessionTime: 12\n",
        path.display()
    );
    let config = ChannelConfig::from_yaml_str(&yaml).unwrap();
    let channel = TelemetryChannel::open(config).unwrap();

    assert_eq!(channel.region().capacity(), bytes.len());
    assert_eq!(channel.read_as::<bool>("OnPitRoad").unwrap(), Some(true));

    drop(channel);
    std::fs::remove_file(path).unwrap();
}

#[test]
fn missing_region_is_not_found() {
    let config = ChannelConfig {
        region_name: "/nonexistent/paddock-region".to_string(),
        ..ChannelConfig::default()
    };
    let result = TelemetryChannel::open(config);
    assert!(matches!(result, Err(TelemetryError::RegionNotFound { .. })));
}

proptest! {
    #[test]
    fn first_non_zero_replica_is_served(
        values in prop::collection::vec(prop::option::of(1i32..=i32::MAX), 3)
    ) {
        let mut bytes = producer_bytes();
        for (replica, value) in values.iter().enumerate() {
            if let Some(v) = value {
                put(&mut bytes, replica, 4, &v.to_le_bytes());
            }
        }
        let channel = channel(bytes);

        let expected = values.iter().flatten().next().copied();
        prop_assert_eq!(channel.read_as::<i32>("Gear").unwrap(), expected);
    }
}
