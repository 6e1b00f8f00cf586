//! Config schema versioning

use anyhow::Result;

/// Versioned configuration files migrate forward on load.
pub trait Migrate {
    fn current_version(&self) -> u32;
    fn target_version() -> u32;
    fn migrate(&mut self) -> Result<()>;
}
