//! credit-eda: Loan Application EDA Library
//!
//! Loads the application and previous-application tables, cleans them,
//! derives age and credit features, computes descriptive analyses and
//! merges the two tables on the applicant key.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod pipeline;
pub mod report;
pub mod utils;
