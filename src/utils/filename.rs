use chrono::{Datelike, Local};
use std::path::{Path, PathBuf};

/// Generate default output filename with format: air-quality-{kind}-{YYMMDD}.{ext}
pub fn generate_default_filename(output_dir: &Path, kind: &str, extension: &str) -> PathBuf {
    let now = Local::now();
    let year = now.year() % 100; // Get last 2 digits of year
    let month = now.month();
    let day = now.day();

    let filename = format!(
        "air-quality-{}-{:02}{:02}{:02}.{}",
        kind, year, month, day, extension
    );
    output_dir.join(filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_default_filename() {
        let filename = generate_default_filename(Path::new("output"), "ranking", "parquet");
        let filename_str = filename.to_string_lossy();

        assert!(filename_str.starts_with("output/"));
        assert!(filename_str.ends_with(".parquet"));

        let parts: Vec<&str> = filename_str.split('/').collect();
        assert_eq!(parts.len(), 2);

        // "air-quality-ranking-" + YYMMDD + ".parquet"
        let file_part = parts[1];
        assert!(file_part.starts_with("air-quality-ranking-"));
        assert_eq!(file_part.len(), "air-quality-ranking-".len() + 6 + ".parquet".len());
    }

    #[test]
    fn test_generate_default_json_filename() {
        let filename = generate_default_filename(Path::new("out/dash"), "dashboard", "json");
        let filename_str = filename.to_string_lossy();

        assert!(filename_str.starts_with("out/dash/air-quality-dashboard-"));
        assert!(filename_str.ends_with(".json"));
    }
}
