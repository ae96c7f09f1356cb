use crate::error::{ProcessingError, Result};
use crate::models::Reading;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Pollutant concentrations carried by every reading (µg/m³)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Metric {
    Pm25,
    Pm10,
    So2,
    No2,
}

impl Metric {
    pub const ALL: [Metric; 4] = [Metric::Pm25, Metric::Pm10, Metric::So2, Metric::No2];

    /// Column name used in the source CSV
    pub fn column_name(self) -> &'static str {
        match self {
            Metric::Pm25 => "PM2.5",
            Metric::Pm10 => "PM10",
            Metric::So2 => "SO2",
            Metric::No2 => "NO2",
        }
    }

    /// Snake-case field name used in Parquet/JSON output
    pub fn field_name(self) -> &'static str {
        match self {
            Metric::Pm25 => "pm25",
            Metric::Pm10 => "pm10",
            Metric::So2 => "so2",
            Metric::No2 => "no2",
        }
    }

    pub fn accessor(self) -> fn(&Reading) -> Option<f64> {
        match self {
            Metric::Pm25 => |r: &Reading| r.pm25,
            Metric::Pm10 => |r: &Reading| r.pm10,
            Metric::So2 => |r: &Reading| r.so2,
            Metric::No2 => |r: &Reading| r.no2,
        }
    }

    pub fn value(self, reading: &Reading) -> Option<f64> {
        (self.accessor())(reading)
    }

    fn index(self) -> usize {
        match self {
            Metric::Pm25 => 0,
            Metric::Pm10 => 1,
            Metric::So2 => 2,
            Metric::No2 => 3,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

impl FromStr for Metric {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace(['.', '_', '-'], "").as_str() {
            "pm25" => Ok(Metric::Pm25),
            "pm10" => Ok(Metric::Pm10),
            "so2" => Ok(Metric::So2),
            "no2" => Ok(Metric::No2),
            _ => Err(ProcessingError::UnknownMetric(s.to_string())),
        }
    }
}

/// Per-metric means for one summary bucket; `None` where no value contributed
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricMeans {
    pub pm25: Option<f64>,
    pub pm10: Option<f64>,
    pub so2: Option<f64>,
    pub no2: Option<f64>,
}

impl MetricMeans {
    pub fn get(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Pm25 => self.pm25,
            Metric::Pm10 => self.pm10,
            Metric::So2 => self.so2,
            Metric::No2 => self.no2,
        }
    }

    pub fn set(&mut self, metric: Metric, value: Option<f64>) {
        match metric {
            Metric::Pm25 => self.pm25 = value,
            Metric::Pm10 => self.pm10 = value,
            Metric::So2 => self.so2 = value,
            Metric::No2 => self.no2 = value,
        }
    }

    pub fn is_empty(&self) -> bool {
        Metric::ALL.iter().all(|m| self.get(*m).is_none())
    }
}

/// Running sum/count per metric, skipping missing values
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanAccumulator {
    sums: [f64; 4],
    counts: [usize; 4],
}

impl MeanAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, reading: &Reading) {
        for metric in Metric::ALL {
            if let Some(value) = metric.value(reading) {
                self.sums[metric.index()] += value;
                self.counts[metric.index()] += 1;
            }
        }
    }

    pub fn count(&self, metric: Metric) -> usize {
        self.counts[metric.index()]
    }

    pub fn mean(&self, metric: Metric) -> Option<f64> {
        let count = self.counts[metric.index()];
        if count == 0 {
            None
        } else {
            Some(self.sums[metric.index()] / count as f64)
        }
    }

    pub fn means(&self) -> MetricMeans {
        let mut means = MetricMeans::default();
        for metric in Metric::ALL {
            means.set(metric, self.mean(metric));
        }
        means
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn reading(pm25: Option<f64>, no2: Option<f64>) -> Reading {
        let datetime = NaiveDate::from_ymd_opt(2014, 5, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        Reading::new("Dongsi".to_string(), datetime, pm25, None, None, no2)
    }

    #[test]
    fn test_parse_metric_names() {
        assert_eq!("PM2.5".parse::<Metric>().unwrap(), Metric::Pm25);
        assert_eq!("pm_25".parse::<Metric>().unwrap(), Metric::Pm25);
        assert_eq!("PM10".parse::<Metric>().unwrap(), Metric::Pm10);
        assert_eq!("so2".parse::<Metric>().unwrap(), Metric::So2);
        assert_eq!("No2".parse::<Metric>().unwrap(), Metric::No2);
        assert!("CO".parse::<Metric>().is_err());
    }

    #[test]
    fn test_accumulator_skips_missing_values() {
        let mut acc = MeanAccumulator::new();
        acc.add(&reading(Some(10.0), None));
        acc.add(&reading(None, Some(4.0)));
        acc.add(&reading(Some(30.0), Some(8.0)));

        assert_eq!(acc.count(Metric::Pm25), 2);
        assert_eq!(acc.mean(Metric::Pm25), Some(20.0));
        assert_eq!(acc.mean(Metric::No2), Some(6.0));
        assert_eq!(acc.mean(Metric::Pm10), None);

        let means = acc.means();
        assert_eq!(means.pm25, Some(20.0));
        assert!(!means.is_empty());
        assert!(MetricMeans::default().is_empty());
    }
}
