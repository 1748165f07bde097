//! Report module - console tables, JSON report and chart export

pub mod charts;
pub mod eda_report;
pub mod summary;
pub mod tables;

pub use charts::*;
pub use eda_report::*;
pub use summary::*;
