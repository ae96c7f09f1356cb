use crate::error::{ProcessingError, Result};
use crate::models::{Dataset, Metric, Reading};
use crate::utils::constants::{COLUMN_DATETIME, COLUMN_STATION, DEFAULT_BUFFER_SIZE};
use crate::utils::progress::ProgressReporter;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info, warn};

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];
const PROGRESS_INTERVAL: usize = 10_000;

/// Row as it appears in the CSV; unknown columns are ignored
#[derive(Debug, Deserialize)]
struct CsvRow {
    datetime: String,
    station: String,
    #[serde(rename = "PM2.5", deserialize_with = "csv::invalid_option")]
    pm25: Option<f64>,
    #[serde(rename = "PM10", deserialize_with = "csv::invalid_option")]
    pm10: Option<f64>,
    #[serde(rename = "SO2", deserialize_with = "csv::invalid_option")]
    so2: Option<f64>,
    #[serde(rename = "NO2", deserialize_with = "csv::invalid_option")]
    no2: Option<f64>,
}

pub struct DatasetReader {
    silent: bool,
}

impl DatasetReader {
    pub fn new() -> Self {
        Self { silent: false }
    }

    pub fn with_silent(silent: bool) -> Self {
        Self { silent }
    }

    /// Load the whole CSV into a sorted dataset
    pub fn read_dataset(&self, path: &Path) -> Result<Dataset> {
        let file = File::open(path).map_err(|e| {
            ProcessingError::Io(std::io::Error::new(
                e.kind(),
                format!("cannot open {}: {}", path.display(), e),
            ))
        })?;
        let total_bytes = file.metadata().map(|m| m.len()).unwrap_or(0);

        info!("Loading air-quality data from {}", path.display());
        let progress = ProgressReporter::new_bytes(
            total_bytes,
            &format!("Loading {}", path.display()),
            self.silent,
        );

        let reader = BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file);
        let readings = self.read_readings(reader, Some(&progress))?;
        progress.finish_and_clear();

        let dataset = Dataset::new(readings);
        info!(
            "Loaded {} readings from {} stations",
            dataset.len(),
            dataset.stations().len()
        );
        Ok(dataset)
    }

    /// Parse readings from any CSV source, in file order
    pub fn read_readings<R: Read>(
        &self,
        source: R,
        progress: Option<&ProgressReporter>,
    ) -> Result<Vec<Reading>> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(source);

        let headers = reader.headers()?.clone();
        self.check_headers(&headers)?;

        let mut readings = Vec::new();
        for result in reader.records() {
            let record = result?;
            let (line, byte) = record
                .position()
                .map(|p| (p.line(), p.byte()))
                .unwrap_or_default();

            let row: CsvRow = record.deserialize(Some(&headers))?;
            readings.push(self.parse_row(row, line)?);

            if readings.len() % PROGRESS_INTERVAL == 0 {
                if let Some(progress) = progress {
                    progress.update(byte);
                }
            }
        }

        debug!("Parsed {} CSV rows", readings.len());
        Ok(readings)
    }

    fn check_headers(&self, headers: &csv::StringRecord) -> Result<()> {
        let required = [COLUMN_DATETIME, COLUMN_STATION]
            .into_iter()
            .chain(Metric::ALL.iter().map(|m| m.column_name()));

        for column in required {
            if !headers.iter().any(|h| h == column) {
                return Err(ProcessingError::MissingData(format!(
                    "CSV is missing required column '{}'",
                    column
                )));
            }
        }
        Ok(())
    }

    fn parse_row(&self, row: CsvRow, line: u64) -> Result<Reading> {
        let datetime = parse_datetime(&row.datetime).ok_or_else(|| {
            ProcessingError::InvalidFormat(format!(
                "Invalid datetime '{}' on line {}",
                row.datetime, line
            ))
        })?;

        let reading = Reading::new(
            row.station,
            datetime,
            non_negative(row.pm25, Metric::Pm25, line),
            non_negative(row.pm10, Metric::Pm10, line),
            non_negative(row.so2, Metric::So2, line),
            non_negative(row.no2, Metric::No2, line),
        );
        reading.validate_reading().map_err(|e| {
            ProcessingError::InvalidFormat(format!("Invalid reading on line {}: {}", line, e))
        })?;

        Ok(reading)
    }
}

impl Default for DatasetReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a timestamp, accepting date-only values as midnight
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// A negative concentration is a sensor fault; it loads as missing
fn non_negative(value: Option<f64>, metric: Metric, line: u64) -> Option<f64> {
    match value {
        Some(v) if v < 0.0 => {
            warn!("Negative {} value {} on line {} treated as missing", metric, v, line);
            None
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = "\
No,year,month,day,hour,PM2.5,PM10,SO2,NO2,CO,station,datetime
1,2013,3,1,1,8.0,8.0,4.0,7.0,300.0,Aotizhongxin,2013-03-01 01:00:00
2,2013,3,1,0,4.0,4.0,4.0,7.0,300.0,Aotizhongxin,2013-03-01 00:00:00
3,2013,3,1,0,,12.0,NA,NaN,300.0,Changping,2013-03-01 00:00:00
";

    #[test]
    fn test_parse_datetime_formats() {
        let expected = NaiveDate::from_ymd_opt(2014, 2, 3)
            .unwrap()
            .and_hms_opt(4, 5, 0)
            .unwrap();
        assert_eq!(parse_datetime("2014-02-03 04:05:00"), Some(expected));
        assert_eq!(parse_datetime("2014-02-03T04:05:00"), Some(expected));
        assert_eq!(parse_datetime("2014-02-03 04:05"), Some(expected));
        assert_eq!(
            parse_datetime("2014-02-03"),
            NaiveDate::from_ymd_opt(2014, 2, 3).unwrap().and_hms_opt(0, 0, 0)
        );
        assert_eq!(parse_datetime("03/02/2014"), None);
    }

    #[test]
    fn test_read_readings_handles_missing_values() -> Result<()> {
        let reader = DatasetReader::with_silent(true);
        let readings = reader.read_readings(SAMPLE.as_bytes(), None)?;

        assert_eq!(readings.len(), 3);
        assert_eq!(readings[0].station, "Aotizhongxin");
        assert_eq!(readings[0].pm25, Some(8.0));

        let changping = &readings[2];
        assert_eq!(changping.station, "Changping");
        assert_eq!(changping.pm25, None);
        assert_eq!(changping.pm10, Some(12.0));
        assert_eq!(changping.so2, None);
        assert_eq!(changping.no2, None);
        Ok(())
    }

    #[test]
    fn test_read_dataset_sorts_by_timestamp() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        write!(temp_file, "{}", SAMPLE)?;

        let dataset = DatasetReader::with_silent(true).read_dataset(temp_file.path())?;
        assert_eq!(dataset.len(), 3);

        let first = &dataset.readings()[0];
        assert_eq!(first.station, "Aotizhongxin");
        assert_eq!(first.pm25, Some(4.0));
        assert_eq!(dataset.stations(), &["Aotizhongxin", "Changping"]);
        Ok(())
    }

    #[test]
    fn test_missing_column_is_fatal() {
        let csv = "datetime,station,PM2.5,PM10,SO2\n2013-03-01 00:00:00,Dongsi,1,2,3\n";
        let result = DatasetReader::with_silent(true).read_readings(csv.as_bytes(), None);
        assert!(matches!(result, Err(ProcessingError::MissingData(_))));
    }

    #[test]
    fn test_bad_datetime_is_fatal() {
        let csv = "datetime,station,PM2.5,PM10,SO2,NO2\nyesterday,Dongsi,1,2,3,4\n";
        let result = DatasetReader::with_silent(true).read_readings(csv.as_bytes(), None);
        match result {
            Err(ProcessingError::InvalidFormat(msg)) => assert!(msg.contains("line 2")),
            other => panic!("expected InvalidFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_concentration_loads_as_missing() -> Result<()> {
        let csv = "datetime,station,PM2.5,PM10,SO2,NO2\n\
                   2013-03-01 00:00:00,Dongsi,-1,20,3,4\n\
                   2013-03-01 01:00:00,Dongsi,15,20,-0.5,4\n";
        let readings = DatasetReader::with_silent(true).read_readings(csv.as_bytes(), None)?;

        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].pm25, None);
        assert_eq!(readings[0].pm10, Some(20.0));
        assert_eq!(readings[1].pm25, Some(15.0));
        assert_eq!(readings[1].so2, None);
        Ok(())
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let result = DatasetReader::with_silent(true).read_dataset(Path::new("does/not/exist.csv"));
        assert!(matches!(result, Err(ProcessingError::Io(_))));
    }
}
