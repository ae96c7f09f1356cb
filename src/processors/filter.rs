use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

use crate::models::{Dataset, Reading};

/// Date window and station selection applied before any aggregation.
///
/// Both date bounds are inclusive calendar days. An empty station set
/// places no restriction on stations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub stations: BTreeSet<String>,
}

impl FilterCriteria {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end,
            stations: BTreeSet::new(),
        }
    }

    /// Full date range of the dataset with every station selected
    pub fn for_dataset(dataset: &Dataset) -> Self {
        let (start, end) = dataset
            .date_range()
            .unwrap_or((NaiveDate::MIN, NaiveDate::MAX));
        Self::new(start, end).with_stations(dataset.stations().iter().cloned())
    }

    pub fn with_stations<I, S>(mut self, stations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stations = stations.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }

    pub fn matches(&self, reading: &Reading) -> bool {
        let date = reading.date();
        date >= self.start
            && date <= self.end
            && (self.stations.is_empty() || self.stations.contains(&reading.station))
    }

    /// Readings passing the criteria, in dataset order
    pub fn apply<'a>(&self, dataset: &'a Dataset) -> Vec<&'a Reading> {
        if self.is_inverted() {
            debug!("Inverted date range {} > {}", self.start, self.end);
            return Vec::new();
        }

        let filtered: Vec<&Reading> = dataset
            .readings()
            .iter()
            .filter(|r| self.matches(r))
            .collect();

        debug!(
            "Filter {}..={} ({} stations) kept {}/{} readings",
            self.start,
            self.end,
            self.stations.len(),
            filtered.len(),
            dataset.len()
        );
        filtered
    }
}
