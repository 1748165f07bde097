//! Pipeline module - loading, cleaning, derivation and merging

pub mod binning;
pub mod clean;
pub mod derive;
pub mod error;
pub mod impute;
pub mod loader;
pub mod merge;
pub mod missing;
pub mod runner;
pub mod signs;

pub use binning::*;
pub use clean::*;
pub use derive::*;
pub use error::*;
pub use impute::*;
pub use loader::*;
pub use merge::*;
pub use missing::*;
pub use runner::*;
pub use signs::*;
