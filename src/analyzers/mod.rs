pub mod aggregator;
pub mod severity;

pub use aggregator::Aggregator;
pub use severity::SeverityThresholds;
