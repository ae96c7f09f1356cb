use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::models::{Metric, TrendPeriod};

#[derive(Parser)]
#[command(name = "air-quality")]
#[command(about = "Air-quality dashboard summaries from station pollutant data")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Input CSV [default: main_data.csv]")]
    pub data: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Configuration file (TOML, YAML or JSON)")]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Hide the loading progress bar")]
    pub quiet: bool,
}

/// Date window and station selection shared by the analytical commands
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    #[arg(long, help = "First day to include (YYYY-MM-DD) [default: dataset start]")]
    pub start: Option<NaiveDate>,

    #[arg(long, help = "Last day to include (YYYY-MM-DD) [default: dataset end]")]
    pub end: Option<NaiveDate>,

    #[arg(
        short,
        long = "station",
        help = "Station to include; repeat for several [default: all]"
    )]
    pub stations: Vec<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show dataset bounds and the stations it contains
    Info,

    /// Headline figures: average and highest PM2.5, record count
    Summary {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Mean concentrations per day, month or year
    Trend {
        #[command(flatten)]
        filter: FilterArgs,

        #[arg(short, long, value_enum, default_value = "year")]
        period: PeriodArg,

        #[arg(long, help = "Split every bucket per station")]
        by_station: bool,

        #[arg(
            short,
            long = "metric",
            value_parser = parse_metric,
            help = "Metric column to show; repeat for several [default: all]"
        )]
        metrics: Vec<Metric>,
    },

    /// Stations ranked by mean PM2.5, highest first
    Ranking {
        #[command(flatten)]
        filter: FilterArgs,

        #[arg(long, help = "Only show the first N stations")]
        top: Option<usize>,
    },

    /// Mean PM2.5 severity band and coordinates per mapped station
    Map {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Full dashboard: headline figures, yearly trend, ranking and map
    Dashboard {
        #[command(flatten)]
        filter: FilterArgs,

        #[arg(long, help = "Print the view as JSON")]
        json: bool,
    },

    /// Write every summary table to files
    Export {
        #[command(flatten)]
        filter: FilterArgs,

        #[arg(short, long, help = "Output directory [default: from config, output/]")]
        output_dir: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value = "parquet")]
        format: ExportFormat,

        #[arg(long, help = "Parquet compression [default: from config, snappy]")]
        compression: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PeriodArg {
    Day,
    Month,
    Year,
}

impl From<PeriodArg> for TrendPeriod {
    fn from(arg: PeriodArg) -> Self {
        match arg {
            PeriodArg::Day => TrendPeriod::Day,
            PeriodArg::Month => TrendPeriod::Month,
            PeriodArg::Year => TrendPeriod::Year,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Parquet,
    Json,
}

fn parse_metric(s: &str) -> std::result::Result<Metric, String> {
    s.parse::<Metric>().map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_trend_command() {
        let cli = Cli::try_parse_from([
            "air-quality",
            "--data",
            "beijing.csv",
            "trend",
            "--period",
            "month",
            "--by-station",
            "--metric",
            "PM2.5",
            "--metric",
            "no2",
            "--station",
            "Dongsi",
            "--start",
            "2014-01-01",
        ])
        .unwrap();

        assert_eq!(cli.data, Some(PathBuf::from("beijing.csv")));
        match cli.command {
            Commands::Trend {
                filter,
                period,
                by_station,
                metrics,
            } => {
                assert_eq!(period, PeriodArg::Month);
                assert!(by_station);
                assert_eq!(metrics, vec![Metric::Pm25, Metric::No2]);
                assert_eq!(filter.stations, vec!["Dongsi".to_string()]);
                assert_eq!(filter.start, NaiveDate::from_ymd_opt(2014, 1, 1));
                assert_eq!(filter.end, None);
            }
            _ => panic!("expected trend command"),
        }
    }

    #[test]
    fn test_rejects_unknown_metric() {
        let result = Cli::try_parse_from(["air-quality", "trend", "--metric", "CO"]);
        assert!(result.is_err());
    }
}
