use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::analyzers::Aggregator;
use crate::models::{Dataset, KeyMetrics, StationMean, StationSeverity, TrendRow};
use crate::processors::filter::FilterCriteria;

/// Every summary the dashboard shows for one set of filter criteria
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub criteria: FilterCriteria,
    pub key_metrics: KeyMetrics,
    pub yearly_trend: Vec<TrendRow>,
    pub station_ranking: Vec<StationMean>,
    pub spatial_summary: Vec<StationSeverity>,
}

impl DashboardView {
    pub fn is_empty(&self) -> bool {
        self.key_metrics.total_records == 0
    }
}

/// Holds the current filter criteria over a loaded dataset.
///
/// Each change of criteria is followed by a full, synchronous recomputation
/// through [`DashboardSession::refresh`]; nothing is cached between calls.
pub struct DashboardSession<'a> {
    dataset: &'a Dataset,
    criteria: FilterCriteria,
    aggregator: Aggregator,
}

impl<'a> DashboardSession<'a> {
    pub fn new(dataset: &'a Dataset, aggregator: Aggregator) -> Self {
        Self {
            dataset,
            criteria: FilterCriteria::for_dataset(dataset),
            aggregator,
        }
    }

    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
    }

    pub fn set_date_range(&mut self, start: NaiveDate, end: NaiveDate) {
        self.criteria.start = start;
        self.criteria.end = end;
    }

    pub fn select_stations<I, S>(&mut self, stations: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.criteria.stations = stations.into_iter().map(Into::into).collect();
    }

    /// Back to the full date range with all stations selected
    pub fn reset(&mut self) {
        self.criteria = FilterCriteria::for_dataset(self.dataset);
    }

    pub fn refresh(&self) -> DashboardView {
        let filtered = self.criteria.apply(self.dataset);
        debug!("Recomputing dashboard over {} readings", filtered.len());

        DashboardView {
            criteria: self.criteria.clone(),
            key_metrics: self.aggregator.key_metrics(&filtered),
            yearly_trend: self.aggregator.yearly_trend(&filtered),
            station_ranking: self.aggregator.station_ranking(&filtered),
            spatial_summary: self.aggregator.spatial_summary(&filtered),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Reading;

    fn dataset() -> Dataset {
        let reading = |station: &str, y: i32, m: u32, value: f64| {
            Reading::new(
                station.to_string(),
                NaiveDate::from_ymd_opt(y, m, 1)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap(),
                Some(value),
                None,
                None,
                None,
            )
        };
        Dataset::new(vec![
            reading("Dongsi", 2013, 3, 100.0),
            reading("Wanliu", 2013, 6, 50.0),
            reading("Dongsi", 2014, 3, 80.0),
            reading("Wanliu", 2014, 6, 30.0),
        ])
    }

    #[test]
    fn test_initial_view_covers_whole_dataset() {
        let dataset = dataset();
        let session = DashboardSession::new(&dataset, Aggregator::new());
        let view = session.refresh();

        assert_eq!(view.key_metrics.total_records, 4);
        assert_eq!(view.yearly_trend.len(), 2);
        assert_eq!(view.station_ranking[0].station, "Dongsi");
        assert_eq!(view.spatial_summary.len(), 2);
    }

    #[test]
    fn test_filter_change_recomputes() {
        let dataset = dataset();
        let mut session = DashboardSession::new(&dataset, Aggregator::new());

        session.set_date_range(
            NaiveDate::from_ymd_opt(2014, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2014, 12, 31).unwrap(),
        );
        session.select_stations(["Wanliu"]);
        let view = session.refresh();

        assert_eq!(view.key_metrics.total_records, 1);
        assert_eq!(view.key_metrics.mean_pm25, Some(30.0));
        assert_eq!(view.station_ranking.len(), 1);

        session.reset();
        assert_eq!(session.refresh().key_metrics.total_records, 4);
    }

    #[test]
    fn test_empty_selection_view() {
        let dataset = dataset();
        let mut session = DashboardSession::new(&dataset, Aggregator::new());
        session.set_date_range(
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2020, 12, 31).unwrap(),
        );
        let view = session.refresh();

        assert!(view.is_empty());
        assert!(view.yearly_trend.is_empty());
        assert!(view.station_ranking.is_empty());
        assert!(view.spatial_summary.is_empty());
        assert_eq!(view.key_metrics.mean_pm25, None);
    }
}
