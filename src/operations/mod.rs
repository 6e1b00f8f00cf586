//! Operations: the run lifecycle engine and the administration around it
//!
//! Each area exposes a manager struct owning a database handle. Managers
//! are cheap to construct; all state lives in the store.

pub mod dashboard;
pub mod error;
pub mod runs;
pub mod structure;
pub mod users;

pub use dashboard::Dashboard;
pub use error::{CoreError, CoreResult, ErrorKind};
pub use runs::RunLifecycle;
pub use structure::StructureAdmin;
pub use users::UserAdmin;

use crate::domain::{allows, Action, Principal};

/// Uniform authorization choke point: every operation resolves its access
/// decision here before touching state.
pub(crate) fn require(principal: &Principal, action: Action) -> CoreResult<()> {
    if allows(principal, &action) {
        Ok(())
    } else {
        Err(CoreError::Forbidden)
    }
}
