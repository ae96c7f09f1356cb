use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::constants::STATION_COORDINATES;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct StationMetadata {
    #[validate(length(min = 1))]
    pub name: String,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}

impl StationMetadata {
    pub fn new(name: String, latitude: f64, longitude: f64) -> Self {
        Self {
            name,
            latitude,
            longitude,
        }
    }

    /// Look up a monitoring station in the fixed coordinate table
    pub fn lookup(name: &str) -> Option<Self> {
        STATION_COORDINATES
            .iter()
            .find(|(station, _, _)| *station == name)
            .map(|(station, lat, lon)| Self::new(station.to_string(), *lat, *lon))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_station() {
        let station = StationMetadata::lookup("Huairou").unwrap();
        assert_eq!(station.name, "Huairou");
        assert!((station.latitude - 40.328).abs() < 1e-9);
        assert!((station.longitude - 116.628).abs() < 1e-9);
        assert!(station.validate().is_ok());
    }

    #[test]
    fn test_lookup_is_case_sensitive_and_exact() {
        assert!(StationMetadata::lookup("huairou").is_none());
        assert!(StationMetadata::lookup("Beijing").is_none());
    }

    #[test]
    fn test_known_stations_are_valid() {
        assert_eq!(STATION_COORDINATES.len(), 12);
        for (name, _, _) in STATION_COORDINATES.iter() {
            let station = StationMetadata::lookup(name).unwrap();
            assert!(station.validate().is_ok(), "{} invalid", station.name);
        }
    }

    #[test]
    fn test_invalid_coordinates() {
        let station = StationMetadata::new("Nowhere".to_string(), 91.0, 116.4);
        assert!(station.validate().is_err());
    }
}
