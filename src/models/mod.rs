pub mod dataset;
pub mod metric;
pub mod reading;
pub mod station;
pub mod summary;

pub use dataset::Dataset;
pub use metric::{MeanAccumulator, Metric, MetricMeans};
pub use reading::Reading;
pub use station::StationMetadata;
pub use summary::{
    KeyMetrics, SeverityBand, StationMean, StationSeverity, TrendPeriod, TrendRow,
};
