//! Utility module - terminal styling, spinners and small statistics helpers

pub mod progress;
pub mod stats;
pub mod styling;

pub use progress::*;
pub use styling::*;
