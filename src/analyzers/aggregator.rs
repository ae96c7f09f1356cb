use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

use crate::analyzers::severity::SeverityThresholds;
use crate::models::{
    KeyMetrics, MeanAccumulator, Metric, Reading, StationMean, StationMetadata, StationSeverity,
    TrendPeriod, TrendRow,
};

/// Derives summary tables from filtered readings.
///
/// Every operation is pure: the same input always produces the same table,
/// and an empty input produces an empty table.
#[derive(Debug, Clone, Copy, Default)]
pub struct Aggregator {
    thresholds: SeverityThresholds,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_thresholds(thresholds: SeverityThresholds) -> Self {
        Self { thresholds }
    }

    pub fn daily_trend(&self, readings: &[&Reading]) -> Vec<TrendRow> {
        self.trend(readings, TrendPeriod::Day, false)
    }

    pub fn monthly_trend(&self, readings: &[&Reading], by_station: bool) -> Vec<TrendRow> {
        self.trend(readings, TrendPeriod::Month, by_station)
    }

    pub fn yearly_trend(&self, readings: &[&Reading]) -> Vec<TrendRow> {
        self.trend(readings, TrendPeriod::Year, false)
    }

    /// Per-bucket means of every metric.
    ///
    /// Rows are ascending by bucket. With `by_station`, rows are grouped
    /// contiguously per station (stations in order of first appearance) and
    /// ascending by bucket within each station. Buckets where no metric has
    /// a value are omitted.
    pub fn trend(&self, readings: &[&Reading], period: TrendPeriod, by_station: bool) -> Vec<TrendRow> {
        let order = station_order(readings);
        let mut buckets: BTreeMap<(usize, NaiveDate), MeanAccumulator> = BTreeMap::new();

        for reading in readings {
            let group = if by_station {
                order.index[reading.station.as_str()]
            } else {
                0
            };
            let bucket = period.bucket_start(reading.date());
            buckets.entry((group, bucket)).or_default().add(reading);
        }

        buckets
            .into_iter()
            .filter_map(|((group, bucket_start), acc)| {
                let means = acc.means();
                if means.is_empty() {
                    return None;
                }
                Some(TrendRow {
                    period,
                    bucket_start,
                    station: by_station.then(|| order.names[group].to_string()),
                    means,
                })
            })
            .collect()
    }

    /// Mean PM2.5 per station in order of first appearance.
    ///
    /// Stations without any PM2.5 value are left out.
    pub fn station_means(&self, readings: &[&Reading]) -> Vec<StationMean> {
        let order = station_order(readings);
        let mut accumulators = vec![MeanAccumulator::new(); order.names.len()];

        for reading in readings {
            accumulators[order.index[reading.station.as_str()]].add(reading);
        }

        order
            .names
            .iter()
            .zip(accumulators)
            .filter_map(|(station, acc)| {
                acc.mean(Metric::Pm25).map(|mean_pm25| StationMean {
                    station: station.to_string(),
                    mean_pm25,
                    readings: acc.count(Metric::Pm25),
                })
            })
            .collect()
    }

    /// Stations ordered by mean PM2.5, highest first; ties keep input order
    pub fn station_ranking(&self, readings: &[&Reading]) -> Vec<StationMean> {
        let mut ranking = self.station_means(readings);
        // sort_by is stable
        ranking.sort_by(|a, b| b.mean_pm25.total_cmp(&a.mean_pm25));
        ranking
    }

    /// Severity band per mapped station; stations without coordinates are skipped
    pub fn spatial_summary(&self, readings: &[&Reading]) -> Vec<StationSeverity> {
        self.station_means(readings)
            .into_iter()
            .filter_map(|mean| {
                let metadata = StationMetadata::lookup(&mean.station)?;
                Some(StationSeverity {
                    station: mean.station,
                    latitude: metadata.latitude,
                    longitude: metadata.longitude,
                    mean_pm25: mean.mean_pm25,
                    band: self.thresholds.classify(mean.mean_pm25),
                })
            })
            .collect()
    }

    pub fn key_metrics(&self, readings: &[&Reading]) -> KeyMetrics {
        let mut acc = MeanAccumulator::new();
        let mut max_pm25: Option<f64> = None;

        for reading in readings {
            acc.add(reading);
            if let Some(value) = reading.pm25 {
                max_pm25 = Some(max_pm25.map_or(value, |m| m.max(value)));
            }
        }

        KeyMetrics {
            mean_pm25: acc.mean(Metric::Pm25),
            max_pm25,
            total_records: readings.len(),
        }
    }
}

struct StationOrder<'a> {
    names: Vec<&'a str>,
    index: HashMap<&'a str, usize>,
}

fn station_order<'a>(readings: &[&'a Reading]) -> StationOrder<'a> {
    let mut names = Vec::new();
    let mut index = HashMap::new();
    for reading in readings {
        index.entry(reading.station.as_str()).or_insert_with(|| {
            names.push(reading.station.as_str());
            names.len() - 1
        });
    }
    StationOrder { names, index }
}
