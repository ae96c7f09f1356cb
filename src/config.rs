use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::analyzers::SeverityThresholds;
use crate::error::Result;
use crate::utils::constants::{
    COMPRESSION_SNAPPY, DEFAULT_CONFIG_FILE, DEFAULT_DATA_FILE, DEFAULT_OUTPUT_DIR, ENV_PREFIX,
    MODERATE_PM25_THRESHOLD, POOR_PM25_THRESHOLD,
};

/// Runtime settings: built-in defaults, then a config file, then `AIRQ_*` env vars.
///
/// Nested keys use a double underscore in the environment, e.g.
/// `AIRQ_SEVERITY__MODERATE=70`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    pub output_dir: PathBuf,
    pub compression: String,
    pub severity: SeverityThresholds,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_FILE),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            compression: COMPRESSION_SNAPPY.to_string(),
            severity: SeverityThresholds::default(),
        }
    }
}

impl DashboardConfig {
    /// Load configuration; an explicit `path` must exist, the default file is optional
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env_prefix(path, ENV_PREFIX)
    }

    fn load_with_env_prefix(path: Option<&Path>, env_prefix: &str) -> Result<Self> {
        let builder = config::Config::builder()
            .set_default("data_path", DEFAULT_DATA_FILE)?
            .set_default("output_dir", DEFAULT_OUTPUT_DIR)?
            .set_default("compression", COMPRESSION_SNAPPY)?
            .set_default("severity.moderate", MODERATE_PM25_THRESHOLD)?
            .set_default("severity.poor", POOR_PM25_THRESHOLD)?;

        let builder = match path {
            Some(path) => {
                debug!("Reading configuration from {}", path.display());
                builder.add_source(config::File::from(path))
            }
            None => builder.add_source(config::File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        let settings = builder
            .add_source(
                config::Environment::with_prefix(env_prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.severity.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn toml_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_file_overrides_defaults() -> Result<()> {
        let file = toml_file(
            r#"
data_path = "data/beijing.csv"
compression = "zstd"

[severity]
moderate = 60.0
poor = 90.0
"#,
        );

        let config = DashboardConfig::load(Some(file.path()))?;
        assert_eq!(config.data_path, PathBuf::from("data/beijing.csv"));
        assert_eq!(config.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
        assert_eq!(config.compression, "zstd");
        assert_eq!(config.severity.moderate, 60.0);
        assert_eq!(config.severity.poor, 90.0);
        Ok(())
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let file = toml_file("[severity]\nmoderate = 90.0\npoor = 80.0\n");
        assert!(DashboardConfig::load(Some(file.path())).is_err());
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let result = DashboardConfig::load(Some(Path::new("no/such/air-quality.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_environment_overrides_file() -> Result<()> {
        let file = toml_file("data_path = \"from/file.csv\"\n[severity]\nmoderate = 60.0\n");
        std::env::set_var("AIRQCFGTEST_DATA_PATH", "x/y.csv");
        std::env::set_var("AIRQCFGTEST_SEVERITY__MODERATE", "70");

        let config = DashboardConfig::load_with_env_prefix(Some(file.path()), "AIRQCFGTEST");
        std::env::remove_var("AIRQCFGTEST_DATA_PATH");
        std::env::remove_var("AIRQCFGTEST_SEVERITY__MODERATE");

        let config = config?;
        assert_eq!(config.data_path, PathBuf::from("x/y.csv"));
        assert_eq!(config.severity.moderate, 70.0);
        assert_eq!(config.severity.poor, POOR_PM25_THRESHOLD);
        Ok(())
    }

    #[test]
    fn test_default_matches_builtin_values() {
        let config = DashboardConfig::default();
        assert_eq!(config.data_path, PathBuf::from("main_data.csv"));
        assert_eq!(config.severity, SeverityThresholds::default());
    }
}
