//! Region handle forwarded to protection listeners.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A configured cutout region.
///
/// `path` is the raw path description of the protection shape, passed
/// through untouched for the renderer to interpret.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProtectionRegion {
    pub name: String,
    pub path: String,
}

impl ProtectionRegion {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

impl fmt::Display for ProtectionRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
