use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashSet;

use crate::models::Reading;

/// Read-only collection of readings, sorted ascending by timestamp.
///
/// Built once at startup and handed by reference to the filter and the
/// aggregators. Readings sharing a timestamp keep their load order.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    readings: Vec<Reading>,
    stations: Vec<String>,
}

impl Dataset {
    pub fn new(mut readings: Vec<Reading>) -> Self {
        // sort_by_key is stable
        readings.sort_by_key(|r| r.datetime);

        let stations = {
            let mut seen = HashSet::new();
            readings
                .iter()
                .filter(|r| seen.insert(r.station.as_str()))
                .map(|r| r.station.clone())
                .collect()
        };

        Self { readings, stations }
    }

    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Distinct station identifiers in order of first appearance
    pub fn stations(&self) -> &[String] {
        &self.stations
    }

    pub fn first_timestamp(&self) -> Option<NaiveDateTime> {
        self.readings.first().map(|r| r.datetime)
    }

    pub fn last_timestamp(&self) -> Option<NaiveDateTime> {
        self.readings.last().map(|r| r.datetime)
    }

    /// Inclusive calendar bounds, used as the default filter window
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((
            self.first_timestamp()?.date(),
            self.last_timestamp()?.date(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(station: &str, day: u32, hour: u32) -> Reading {
        let datetime = NaiveDate::from_ymd_opt(2013, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap();
        Reading::new(station.to_string(), datetime, Some(1.0), None, None, None)
    }

    #[test]
    fn test_readings_sorted_by_timestamp() {
        let dataset = Dataset::new(vec![
            reading("Wanliu", 3, 0),
            reading("Dongsi", 1, 5),
            reading("Wanliu", 1, 5),
            reading("Shunyi", 2, 0),
        ]);

        let order: Vec<(&str, u32)> = dataset
            .readings()
            .iter()
            .map(|r| (r.station.as_str(), chrono::Datelike::day(&r.datetime)))
            .collect();
        assert_eq!(
            order,
            vec![("Dongsi", 1), ("Wanliu", 1), ("Shunyi", 2), ("Wanliu", 3)]
        );
    }

    #[test]
    fn test_distinct_stations_first_seen_order() {
        let dataset = Dataset::new(vec![
            reading("Wanliu", 2, 0),
            reading("Dongsi", 1, 0),
            reading("Wanliu", 1, 0),
        ]);
        assert_eq!(dataset.stations(), &["Dongsi", "Wanliu"]);
    }

    #[test]
    fn test_date_range() {
        let dataset = Dataset::new(vec![reading("Wanliu", 9, 23), reading("Dongsi", 4, 1)]);
        let (start, end) = dataset.date_range().unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2013, 3, 4).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2013, 3, 9).unwrap());
        assert_eq!(dataset.len(), 2);
    }

    #[test]
    fn test_empty_dataset() {
        let dataset = Dataset::new(Vec::new());
        assert!(dataset.is_empty());
        assert!(dataset.date_range().is_none());
        assert!(dataset.stations().is_empty());
    }
}
