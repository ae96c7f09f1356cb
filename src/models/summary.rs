use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ProcessingError, Result};
use crate::models::MetricMeans;

/// Calendar unit used to bucket readings for trend summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendPeriod {
    Day,
    Month,
    Year,
}

impl TrendPeriod {
    /// First calendar day of the bucket containing `date`
    pub fn bucket_start(self, date: NaiveDate) -> NaiveDate {
        match self {
            TrendPeriod::Day => date,
            TrendPeriod::Month => date.with_day(1).unwrap_or(date),
            TrendPeriod::Year => date.with_ordinal(1).unwrap_or(date),
        }
    }

    pub fn label(self, bucket_start: NaiveDate) -> String {
        match self {
            TrendPeriod::Day => bucket_start.format("%Y-%m-%d").to_string(),
            TrendPeriod::Month => bucket_start.format("%Y-%m").to_string(),
            TrendPeriod::Year => bucket_start.year().to_string(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TrendPeriod::Day => "day",
            TrendPeriod::Month => "month",
            TrendPeriod::Year => "year",
        }
    }
}

impl fmt::Display for TrendPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrendPeriod {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "day" | "daily" | "d" => Ok(TrendPeriod::Day),
            "month" | "monthly" | "m" => Ok(TrendPeriod::Month),
            "year" | "yearly" | "y" => Ok(TrendPeriod::Year),
            _ => Err(ProcessingError::InvalidFormat(format!(
                "Unknown trend period: '{}'",
                s
            ))),
        }
    }
}

/// One row of a day/month/year trend table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendRow {
    pub period: TrendPeriod,
    pub bucket_start: NaiveDate,
    pub station: Option<String>,
    pub means: MetricMeans,
}

impl TrendRow {
    pub fn label(&self) -> String {
        self.period.label(self.bucket_start)
    }
}

/// Mean PM2.5 for one station over the filtered readings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationMean {
    pub station: String,
    pub mean_pm25: f64,
    pub readings: usize,
}

/// Severity classification of a station's mean PM2.5
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityBand {
    Good,
    Moderate,
    Poor,
}

impl SeverityBand {
    /// Marker colour used when the band is drawn on a map
    pub fn color(self) -> &'static str {
        match self {
            SeverityBand::Good => "green",
            SeverityBand::Moderate => "orange",
            SeverityBand::Poor => "red",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SeverityBand::Good => "good",
            SeverityBand::Moderate => "moderate",
            SeverityBand::Poor => "poor",
        }
    }
}

impl fmt::Display for SeverityBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A station placed on the map with its severity band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationSeverity {
    pub station: String,
    pub latitude: f64,
    pub longitude: f64,
    pub mean_pm25: f64,
    pub band: SeverityBand,
}

/// Headline figures shown above the charts
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyMetrics {
    pub mean_pm25: Option<f64>,
    pub max_pm25: Option<f64>,
    pub total_records: usize,
}

impl KeyMetrics {
    pub fn summary(&self) -> String {
        format!(
            "Average PM2.5: {}\n\
            Highest PM2.5: {}\n\
            Total Records: {}",
            format_concentration(self.mean_pm25),
            format_concentration(self.max_pm25),
            self.total_records
        )
    }
}

pub fn format_concentration(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2} µg/m³", v),
        None => "no data".to_string(),
    }
}
