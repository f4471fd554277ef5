//! Static variable offset table
//!
//! The producer does not publish per-variable offsets inside a buffer, so
//! they are supplied as a fixed table keyed by name. Offsets are relative to
//! the start of a buffer replica.

use std::collections::BTreeMap;

use crate::{DescriptorTable, Result, TelemetryError};

/// In-buffer offsets of the producer's standard variable set.
const STANDARD_OFFSETS: &[(&str, usize)] = &[
    ("SessionTime", 0),
    ("SessionNum", 8),
    ("SessionState", 12),
    ("SessionUniqueID", 16),
    ("SessionFlags", 20),
    ("SessionTimeRemain", 24),
    ("SessionLapsRemain", 32),
    ("RadioTransmitCarIdx", 36),
    ("DriverMarker", 40),
    ("IsReplayPlaying", 41),
    ("ReplayFrameNum", 42),
    ("ReplayFrameNumEnd", 46),
    ("CarIdxLap", 50),
    ("CarIdxLapDistPct", 306),
    ("CarIdxTrackSurface", 562),
    ("CarIdxOnPitRoad", 818),
    ("OnPitRoad", 882),
    ("CarIdxSteer", 883),
    ("CarIdxRPM", 1139),
    ("CarIdxGear", 1395),
    ("SteeringWheelAngle", 1651),
    ("Throttle", 1655),
    ("Brake", 1659),
    ("Clutch", 1663),
    ("Gear", 1667),
    ("RPM", 1671),
    ("Lap", 1675),
    ("LapDist", 1679),
    ("LapDistPct", 1683),
    ("RaceLaps", 1687),
    ("LapBestLap", 1691),
    ("LapBestLapTime", 1695),
    ("LapLastLapTime", 1699),
    ("LapCurrentLapTime", 1703),
    ("LapDeltaToBestLap", 1707),
    ("LapDeltaToBestLap_DD", 1711),
    ("LapDeltaToBestLap_OK", 1715),
    ("LapDeltaToOptimalLap", 1716),
    ("LapDeltaToOptimalLap_DD", 1720),
    ("LapDeltaToOptimalLap_OK", 1724),
    ("LapDeltaToSessionBestLap", 1725),
    ("LapDeltaToSessionBestLap_DD", 1729),
    ("LapDeltaToSessionBestLap_OK", 1733),
    ("LapDeltaToSessionOptimalLap", 1734),
    ("LapDeltaToSessionOptimalLap_DD", 1738),
    ("LapDeltaToSessionOptimalLap_OK", 1742),
    ("LongAccel", 1743),
    ("LatAccel", 1747),
    ("VertAccel", 1751),
    ("RollRate", 1755),
    ("PitchRate", 1759),
    ("YawRate", 1763),
    ("Speed", 1767),
    ("VelocityX", 1771),
    ("VelocityY", 1775),
    ("VelocityZ", 1779),
    ("Yaw", 1783),
    ("Pitch", 1787),
    ("Roll", 1791),
    ("PitRepairLeft", 1795),
    ("PitOptRepairLeft", 1799),
    ("CamCarIdx", 1803),
    ("CamCameraNumber", 1807),
    ("CamGroupNumber", 1811),
    ("CamCameraState", 1815),
    ("IsOnTrack", 1819),
    ("IsInGarage", 1820),
    ("SteeringWheelTorque", 1821),
    ("SteeringWheelPctTorque", 1825),
    ("ShiftIndicatorPct", 1829),
    ("ShiftPowerPct", 1833),
    ("ShiftGrindRPM", 1837),
    ("EngineWarnings", 1841),
    ("FuelLevel", 1845),
    ("FuelLevelPct", 1849),
    ("ReplayPlaySpeed", 1853),
    ("ReplayPlaySlowMotion", 1857),
    ("ReplaySessionTime", 1858),
    ("ReplaySessionNum", 1866),
    ("WaterTemp", 1870),
    ("WaterLevel", 1874),
    ("FuelPress", 1878),
    ("OilTemp", 1882),
    ("OilPress", 1886),
    ("OilLevel", 1890),
    ("Voltage", 1894),
    ("ManifoldPress", 1898),
    ("RRshockDefl", 1902),
    ("LRshockDefl", 1906),
    ("RFshockDefl", 1910),
    ("LFshockDefl", 1914),
];

/// Mapping from variable name to its offset within a buffer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VariableOffsetTable {
    offsets: BTreeMap<String, usize>,
}

impl VariableOffsetTable {
    /// Build a table from explicit entries.
    pub fn new(offsets: BTreeMap<String, usize>) -> Self {
        Self { offsets }
    }

    /// The producer's standard offsets.
    pub fn standard() -> Self {
        STANDARD_OFFSETS.iter().copied().collect()
    }

    /// Offset of a variable within a buffer.
    pub fn get(&self, name: &str) -> Option<usize> {
        self.offsets.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.offsets.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Entries sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.offsets.iter().map(|(name, &offset)| (name.as_str(), offset))
    }

    /// Check every entry against the discovered descriptors and the region.
    ///
    /// Each name must be declared, and its declared width read at every
    /// buffer base must stay below `capacity`.
    pub fn validate(
        &self,
        descriptors: &DescriptorTable,
        buffers: &[usize],
        capacity: usize,
    ) -> Result<()> {
        for (name, offset) in self.iter() {
            let descriptor = descriptors.get(name).ok_or_else(|| {
                TelemetryError::unknown_variable(name, "offset table entry has no header record")
            })?;

            for &base in buffers {
                let start = base.saturating_add(offset);
                if start.saturating_add(descriptor.byte_size) > capacity {
                    return Err(TelemetryError::Memory { offset: start, capacity });
                }
            }
        }
        Ok(())
    }
}

impl<S: Into<String>> FromIterator<(S, usize)> for VariableOffsetTable {
    fn from_iter<I: IntoIterator<Item = (S, usize)>>(iter: I) -> Self {
        Self { offsets: iter.into_iter().map(|(name, offset)| (name.into(), offset)).collect() }
    }
}

impl From<BTreeMap<String, usize>> for VariableOffsetTable {
    fn from(offsets: BTreeMap<String, usize>) -> Self {
        Self::new(offsets)
    }
}
