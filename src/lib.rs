pub mod analyzers;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod processors;
pub mod readers;
pub mod utils;
pub mod writers;

pub use analyzers::{Aggregator, SeverityThresholds};
pub use error::{ProcessingError, Result};
pub use models::{Dataset, Metric, Reading};
pub use processors::{DashboardSession, DashboardView, FilterCriteria};
