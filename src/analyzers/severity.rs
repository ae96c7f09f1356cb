use serde::{Deserialize, Serialize};

use crate::error::{ProcessingError, Result};
use crate::models::SeverityBand;
use crate::utils::constants::{MODERATE_PM25_THRESHOLD, POOR_PM25_THRESHOLD};

/// Lower bounds (inclusive) of the moderate and poor bands
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeverityThresholds {
    pub moderate: f64,
    pub poor: f64,
}

impl SeverityThresholds {
    pub fn new(moderate: f64, poor: f64) -> Result<Self> {
        let thresholds = Self { moderate, poor };
        thresholds.validate()?;
        Ok(thresholds)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.moderate.is_finite() || !self.poor.is_finite() {
            return Err(ProcessingError::Config(format!(
                "Severity thresholds must be finite (moderate={}, poor={})",
                self.moderate, self.poor
            )));
        }
        if self.moderate >= self.poor {
            return Err(ProcessingError::Config(format!(
                "Moderate threshold {} must be below poor threshold {}",
                self.moderate, self.poor
            )));
        }
        Ok(())
    }

    pub fn classify(&self, mean_pm25: f64) -> SeverityBand {
        if mean_pm25 < self.moderate {
            SeverityBand::Good
        } else if mean_pm25 < self.poor {
            SeverityBand::Moderate
        } else {
            SeverityBand::Poor
        }
    }
}

impl Default for SeverityThresholds {
    fn default() -> Self {
        Self {
            moderate: MODERATE_PM25_THRESHOLD,
            poor: POOR_PM25_THRESHOLD,
        }
    }
}
