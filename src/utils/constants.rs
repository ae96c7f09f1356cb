/// Default dataset location, relative to the working directory
pub const DEFAULT_DATA_FILE: &str = "main_data.csv";
/// Config file stem; air-quality.toml, .yaml and .json are all picked up
pub const DEFAULT_CONFIG_FILE: &str = "air-quality";
pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const ENV_PREFIX: &str = "AIRQ";

/// Required CSV columns
pub const COLUMN_DATETIME: &str = "datetime";
pub const COLUMN_STATION: &str = "station";

/// Mean PM2.5 thresholds (µg/m³) separating the severity bands
pub const MODERATE_PM25_THRESHOLD: f64 = 75.0;
pub const POOR_PM25_THRESHOLD: f64 = 85.0;

/// Monitoring stations and their coordinates (name, latitude, longitude)
pub const STATION_COORDINATES: [(&str, f64, f64); 12] = [
    ("Aotizhongxin", 39.982, 116.397),
    ("Changping", 40.217, 116.230),
    ("Dingling", 40.292, 116.220),
    ("Dongsi", 39.929, 116.417),
    ("Guanyuan", 39.929, 116.339),
    ("Gucheng", 39.914, 116.184),
    ("Huairou", 40.328, 116.628),
    ("Nongzhanguan", 39.937, 116.461),
    ("Shunyi", 40.127, 116.655),
    ("Tiantan", 39.886, 116.407),
    ("Wanliu", 39.987, 116.287),
    ("Wanshouxigong", 39.878, 116.352),
];

/// Initial map view
pub const MAP_CENTER: (f64, f64) = (40.0, 116.4);
pub const MAP_ZOOM: u8 = 10;

/// Processing defaults
pub const DEFAULT_ROW_GROUP_SIZE: usize = 10000;
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB

/// Parquet compression options
pub const COMPRESSION_SNAPPY: &str = "snappy";
pub const COMPRESSION_GZIP: &str = "gzip";
pub const COMPRESSION_LZ4: &str = "lz4";
pub const COMPRESSION_ZSTD: &str = "zstd";
pub const COMPRESSION_NONE: &str = "none";
