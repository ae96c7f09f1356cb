use crate::analyzers::Aggregator;
use crate::cli::args::{Cli, Commands, ExportFormat, FilterArgs};
use crate::cli::render;
use crate::config::DashboardConfig;
use crate::error::Result;
use crate::models::{Dataset, Metric, TrendPeriod, TrendRow};
use crate::processors::{DashboardSession, DashboardView, FilterCriteria};
use crate::readers::DatasetReader;
use crate::utils::filename::generate_default_filename;
use crate::writers::{JsonWriter, ParquetWriter};
use serde::Serialize;
use std::fs::OpenOptions;
use std::path::Path;
use tracing::{info, warn, Level};

/// Every table the export command writes
#[derive(Debug, Serialize)]
struct ExportTables {
    view: DashboardView,
    daily_trend: Vec<TrendRow>,
    monthly_trend_by_station: Vec<TrendRow>,
}

pub fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    let config = DashboardConfig::load(cli.config.as_deref())?;
    let data_path = cli.data.clone().unwrap_or_else(|| config.data_path.clone());

    // Loaded once; everything below borrows it
    let dataset = DatasetReader::with_silent(cli.quiet).read_dataset(&data_path)?;
    let aggregator = Aggregator::with_thresholds(config.severity);

    match cli.command {
        Commands::Info => {
            println!("Dataset: {}", data_path.display());
            println!("{}", render::dataset_info(&dataset));
        }

        Commands::Summary { filter } => {
            let criteria = build_criteria(&dataset, &filter);
            let filtered = criteria.apply(&dataset);

            println!("{}", render::criteria_line(&criteria));
            println!("{}", aggregator.key_metrics(&filtered).summary());
        }

        Commands::Trend {
            filter,
            period,
            by_station,
            metrics,
        } => {
            let criteria = build_criteria(&dataset, &filter);
            let filtered = criteria.apply(&dataset);
            let period = TrendPeriod::from(period);
            let metrics = if metrics.is_empty() {
                Metric::ALL.to_vec()
            } else {
                metrics
            };

            println!("{}", render::criteria_line(&criteria));
            println!("Trend by {}:", period);
            let rows = aggregator.trend(&filtered, period, by_station);
            println!("{}", render::trend_table(&rows, &metrics));
        }

        Commands::Ranking { filter, top } => {
            let criteria = build_criteria(&dataset, &filter);
            let filtered = criteria.apply(&dataset);

            let mut ranking = aggregator.station_ranking(&filtered);
            if let Some(n) = top {
                ranking.truncate(n);
            }

            println!("{}", render::criteria_line(&criteria));
            println!("{}", render::ranking_table(&ranking));
        }

        Commands::Map { filter } => {
            let criteria = build_criteria(&dataset, &filter);
            let filtered = criteria.apply(&dataset);

            println!("{}", render::criteria_line(&criteria));
            println!("{}", render::spatial_table(&aggregator.spatial_summary(&filtered)));
        }

        Commands::Dashboard { filter, json } => {
            let mut session = DashboardSession::new(&dataset, aggregator);
            session.set_criteria(build_criteria(&dataset, &filter));
            let view = session.refresh();

            if json {
                println!("{}", JsonWriter::new().to_string(&view)?);
            } else {
                println!("{}", render::dashboard(&view));
            }
        }

        Commands::Export {
            filter,
            output_dir,
            format,
            compression,
        } => {
            let output_dir = output_dir.unwrap_or_else(|| config.output_dir.clone());
            let compression = compression.unwrap_or_else(|| config.compression.clone());
            std::fs::create_dir_all(&output_dir)?;

            let criteria = build_criteria(&dataset, &filter);
            let filtered = criteria.apply(&dataset);

            let mut session = DashboardSession::new(&dataset, aggregator);
            session.set_criteria(criteria);
            let tables = ExportTables {
                view: session.refresh(),
                daily_trend: aggregator.daily_trend(&filtered),
                monthly_trend_by_station: aggregator.monthly_trend(&filtered, true),
            };

            if tables.view.is_empty() {
                warn!("No readings match the filter; nothing to export");
                println!("No records to write");
                return Ok(());
            }

            match format {
                ExportFormat::Parquet => export_parquet(&tables, &output_dir, &compression)?,
                ExportFormat::Json => {
                    let path = generate_default_filename(&output_dir, "dashboard", "json");
                    JsonWriter::new().write(&tables, &path)?;
                    println!("Wrote {}", path.display());
                }
            }
            println!("Export complete!");
        }
    }

    Ok(())
}

fn export_parquet(tables: &ExportTables, output_dir: &Path, compression: &str) -> Result<()> {
    let writer = ParquetWriter::new().with_compression(compression)?;

    let outputs = [
        ("yearly-trend", &tables.view.yearly_trend),
        ("daily-trend", &tables.daily_trend),
        ("monthly-trend", &tables.monthly_trend_by_station),
    ];
    for (kind, rows) in outputs {
        let path = generate_default_filename(output_dir, kind, "parquet");
        writer.write_trend(rows, &path)?;
        print_written(&writer, &path)?;
    }

    let path = generate_default_filename(output_dir, "ranking", "parquet");
    writer.write_ranking(&tables.view.station_ranking, &path)?;
    print_written(&writer, &path)?;

    let path = generate_default_filename(output_dir, "map", "parquet");
    writer.write_spatial(&tables.view.spatial_summary, &path)?;
    print_written(&writer, &path)?;

    Ok(())
}

fn print_written(writer: &ParquetWriter, path: &Path) -> Result<()> {
    if path.exists() {
        let info = writer.get_file_info(path)?;
        println!("\n{}\n{}", path.display(), info.summary());
    }
    Ok(())
}

/// Dataset bounds fill in whatever the user left open
pub fn build_criteria(dataset: &Dataset, filter: &FilterArgs) -> FilterCriteria {
    let defaults = FilterCriteria::for_dataset(dataset);
    let criteria = FilterCriteria::new(
        filter.start.unwrap_or(defaults.start),
        filter.end.unwrap_or(defaults.end),
    )
    .with_stations(filter.stations.iter().cloned());

    for station in &criteria.stations {
        if !dataset.stations().contains(station) {
            warn!("Station '{}' does not occur in the dataset", station);
        }
    }
    if criteria.is_inverted() {
        warn!(
            "Start date {} is after end date {}; no readings will match",
            criteria.start, criteria.end
        );
    }

    info!(
        "Filtering {} to {} over {} station(s)",
        criteria.start,
        criteria.end,
        if criteria.stations.is_empty() {
            dataset.stations().len()
        } else {
            criteria.stations.len()
        }
    );
    criteria
}

fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    // A subscriber may already be installed (tests, embedding); keep it
    match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let _ = tracing_subscriber::fmt()
                .with_max_level(level)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .try_init();
        }
        None => {
            let _ = tracing_subscriber::fmt()
                .with_max_level(level)
                .with_writer(std::io::stderr)
                .try_init();
        }
    }
    Ok(())
}
