use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::Result;

/// One timestamped pollutant measurement at one station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Reading {
    #[validate(length(min = 1))]
    pub station: String,

    pub datetime: NaiveDateTime,

    // Concentrations in µg/m³, None when the source value is missing
    #[validate(range(min = 0.0))]
    pub pm25: Option<f64>,

    #[validate(range(min = 0.0))]
    pub pm10: Option<f64>,

    #[validate(range(min = 0.0))]
    pub so2: Option<f64>,

    #[validate(range(min = 0.0))]
    pub no2: Option<f64>,
}

impl Reading {
    pub fn new(
        station: String,
        datetime: NaiveDateTime,
        pm25: Option<f64>,
        pm10: Option<f64>,
        so2: Option<f64>,
        no2: Option<f64>,
    ) -> Self {
        Self {
            station,
            datetime,
            pm25: finite(pm25),
            pm10: finite(pm10),
            so2: finite(so2),
            no2: finite(no2),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.datetime.date()
    }

    pub fn validate_reading(&self) -> Result<()> {
        self.validate()?;
        Ok(())
    }
}

/// NaN in the source is a missing value, not a measurement
fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}
