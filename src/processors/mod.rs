pub mod filter;
pub mod session;

pub use filter::FilterCriteria;
pub use session::{DashboardSession, DashboardView};
