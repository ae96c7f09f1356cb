use crate::models::{Dataset, Metric, StationMean, StationMetadata, StationSeverity, TrendRow};
use crate::processors::{DashboardView, FilterCriteria};
use crate::utils::constants::{MAP_CENTER, MAP_ZOOM};

/// Plain-text table of trend rows, one column per requested metric
pub fn trend_table(rows: &[TrendRow], metrics: &[Metric]) -> String {
    if rows.is_empty() {
        return "No readings match the current filter".to_string();
    }

    let with_station = rows.iter().any(|r| r.station.is_some());
    let mut out = String::new();

    out.push_str(&format!("{:<12}", "Period"));
    if with_station {
        out.push_str(&format!("{:<16}", "Station"));
    }
    for metric in metrics {
        out.push_str(&format!("{:>10}", metric.column_name()));
    }
    out.push('\n');

    for row in rows {
        out.push_str(&format!("{:<12}", row.label()));
        if with_station {
            out.push_str(&format!("{:<16}", row.station.as_deref().unwrap_or("-")));
        }
        for metric in metrics {
            match row.means.get(*metric) {
                Some(v) => out.push_str(&format!("{:>10.2}", v)),
                None => out.push_str(&format!("{:>10}", "-")),
            }
        }
        out.push('\n');
    }

    out
}

pub fn ranking_table(ranking: &[StationMean]) -> String {
    if ranking.is_empty() {
        return "No readings match the current filter".to_string();
    }

    let mut out = format!("{:>4}  {:<16}{:>12}{:>10}\n", "#", "Station", "PM2.5", "Readings");
    for (i, entry) in ranking.iter().enumerate() {
        out.push_str(&format!(
            "{:>4}  {:<16}{:>12.2}{:>10}\n",
            i + 1,
            entry.station,
            entry.mean_pm25,
            entry.readings
        ));
    }
    out
}

pub fn spatial_table(stations: &[StationSeverity]) -> String {
    if stations.is_empty() {
        return "No mapped stations match the current filter".to_string();
    }

    let mut out = format!(
        "Map centre {:.1}°N {:.1}°E, zoom {}\n",
        MAP_CENTER.0, MAP_CENTER.1, MAP_ZOOM
    );
    out.push_str(&format!(
        "{:<16}{:>9}{:>10}{:>10}  {:<9}{}\n",
        "Station", "Lat", "Lon", "PM2.5", "Band", "Colour"
    ));
    for s in stations {
        out.push_str(&format!(
            "{:<16}{:>9.3}{:>10.3}{:>10.2}  {:<9}{}\n",
            s.station,
            s.latitude,
            s.longitude,
            s.mean_pm25,
            s.band.as_str(),
            s.band.color()
        ));
    }
    out
}

pub fn criteria_line(criteria: &FilterCriteria) -> String {
    let stations = if criteria.stations.is_empty() {
        "all stations".to_string()
    } else {
        criteria
            .stations
            .iter()
            .cloned()
            .collect::<Vec<_>>()
            .join(", ")
    };
    format!("Filter: {} to {}, {}", criteria.start, criteria.end, stations)
}

pub fn dataset_info(dataset: &Dataset) -> String {
    let range = match (dataset.first_timestamp(), dataset.last_timestamp()) {
        (Some(first), Some(last)) => format!("{} to {}", first, last),
        _ => "empty".to_string(),
    };

    let mut out = format!(
        "Readings: {}\nTime Range: {}\nStations: {}\n",
        dataset.len(),
        range,
        dataset.stations().len()
    );
    for station in dataset.stations() {
        match StationMetadata::lookup(station) {
            Some(meta) => out.push_str(&format!(
                "  - {} ({:.3}, {:.3})\n",
                station, meta.latitude, meta.longitude
            )),
            None => out.push_str(&format!("  - {} (no coordinates, not mapped)\n", station)),
        }
    }
    out
}

pub fn dashboard(view: &DashboardView) -> String {
    format!(
        "=== Air Quality Dashboard ===\n\
        {}\n\n\
        {}\n\n\
        --- Yearly Trend ---\n{}\n\
        --- Station Ranking (mean PM2.5) ---\n{}\n\
        --- Station Map ---\n{}",
        criteria_line(&view.criteria),
        view.key_metrics.summary(),
        trend_table(&view.yearly_trend, &Metric::ALL),
        ranking_table(&view.station_ranking),
        spatial_table(&view.spatial_summary),
    )
}
