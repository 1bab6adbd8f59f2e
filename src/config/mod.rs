//! Loading of the protection table from a TOML file.
//!
//! The file names which cameras are protected, the cutout path to draw
//! for each, and which client packages never trigger protection. Paths
//! are carried as raw path data and never parsed here.

mod file;
mod region;

pub use file::{ConfigError, FileConfig, LoggingConfig, PackageList, ProtectionEntry};
pub use region::ProtectionRegion;
