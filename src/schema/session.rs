//! Typed view of the metadata's weekend section
//!
//! The producer stores most numbers as strings with units ("3.70 km"), so
//! those fields stay strings. Every field is optional except the track name.

use serde::{Deserialize, Serialize};

/// Weekend and track information
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(rename_all = "PascalCase")]
#[serde(default)]
pub struct WeekendInfo {
    /// Track name
    pub track_name: String,
    /// Track ID
    #[serde(rename = "TrackID")]
    pub track_id: Option<i32>,
    /// Track length
    pub track_length: Option<String>,
    /// Track display name
    pub track_display_name: Option<String>,
    /// Track configuration name
    pub track_config_name: Option<String>,
    /// Track city
    pub track_city: Option<String>,
    /// Track country
    pub track_country: Option<String>,
    /// Track number of turns
    pub track_num_turns: Option<i32>,
    /// Track pit speed limit
    pub track_pit_speed_limit: Option<String>,
    /// Track type (road course, oval, etc.)
    pub track_type: Option<String>,
    /// Track surface temperature
    pub track_surface_temp: Option<String>,
    /// Track air temperature
    pub track_air_temp: Option<String>,
    /// Series ID
    #[serde(rename = "SeriesID")]
    pub series_id: Option<i32>,
    /// Session ID
    #[serde(rename = "SessionID")]
    pub session_id: Option<i32>,
    /// Sub-session ID (for splits)
    #[serde(rename = "SubSessionID")]
    pub sub_session_id: Option<i32>,
    /// Official session flag
    pub official: Option<i32>,
    /// Event type
    pub event_type: Option<String>,
    /// Category (Road, Oval, etc.)
    pub category: Option<String>,
    /// Simulation mode (full, fixed, open)
    pub sim_mode: Option<String>,
    /// Number of car types
    pub num_car_types: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MetadataDocument;

    #[test]
    fn parses_producer_weekend_section() {
        let doc = MetadataDocument::parse(
            "WeekendInfo:\n TrackName: lagunaseca\n TrackID: 47\n TrackLength: 3.60 km\n \
             TrackDisplayName: WeatherTech Raceway Laguna Seca\n SeriesID: 0\n \
             SessionID: 0\n SimMode: full\n TrackUnknownField: 12\n",
        )
        .unwrap();

        let weekend = doc.weekend_info().unwrap();
        assert_eq!(weekend.track_name, "lagunaseca");
        assert_eq!(weekend.track_id, Some(47));
        assert_eq!(weekend.track_length.as_deref(), Some("3.60 km"));
        assert_eq!(weekend.sim_mode.as_deref(), Some("full"));
        assert_eq!(weekend.num_car_types, None);
    }

    #[test]
    fn missing_section_is_a_parse_error() {
        let doc = MetadataDocument::parse("SessionInfo:\n  Sessions: []\n").unwrap();
        assert!(matches!(doc.weekend_info(), Err(crate::TelemetryError::MetadataParse { .. })));
    }
}
