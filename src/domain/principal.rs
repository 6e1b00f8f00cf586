//! Acting principals and the authorization guard
//!
//! Authentication happens upstream; operations receive an already-resolved
//! `Principal { id, role }`. Every operation routes its access decision
//! through [`allows`], one rule set instead of per-route checks.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Employee,
    Supervisor,
    Admin,
}

impl Role {
    /// Admins and supervisors share review/oversight privileges.
    pub fn is_staff(self) -> bool {
        matches!(self, Role::Admin | Role::Supervisor)
    }
}

/// A resolved, authenticated actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub id: i32,
    pub role: Role,
}

impl Principal {
    pub fn new(id: i32, role: Role) -> Self {
        Self { id, role }
    }

    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }
}

/// Guarded operations. Run-scoped actions carry the owning employee id so
/// ownership is decided alongside role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ViewRun { owner: i32 },
    EditRun { owner: i32 },
    ReviewRun,
    ListRuns,
    ViewDashboard,
    DeleteRun,
    DeleteStructure,
    ManageStructure,
    ManageUsers,
}

/// The single authorization rule set, evaluated per operation.
///
/// Owners mutate and view their own runs; staff may do both on anyone's.
/// Review, listing every run, and deletions are staff operations.
/// Structure and user administration are admin-only.
pub fn allows(principal: &Principal, action: &Action) -> bool {
    match *action {
        Action::ViewRun { owner } | Action::EditRun { owner } => {
            owner == principal.id || principal.role.is_staff()
        }
        Action::ReviewRun
        | Action::ListRuns
        | Action::ViewDashboard
        | Action::DeleteRun
        | Action::DeleteStructure => principal.role.is_staff(),
        Action::ManageStructure | Action::ManageUsers => principal.role == Role::Admin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWNER: i32 = 7;

    fn employee() -> Principal {
        Principal::new(OWNER, Role::Employee)
    }

    fn other_employee() -> Principal {
        Principal::new(99, Role::Employee)
    }

    fn supervisor() -> Principal {
        Principal::new(2, Role::Supervisor)
    }

    fn admin() -> Principal {
        Principal::new(1, Role::Admin)
    }

    #[test]
    fn owner_and_staff_may_edit_a_run() {
        let action = Action::EditRun { owner: OWNER };
        assert!(allows(&employee(), &action));
        assert!(allows(&supervisor(), &action));
        assert!(allows(&admin(), &action));
        assert!(!allows(&other_employee(), &action));
    }

    #[test]
    fn review_and_deletion_are_staff_only() {
        for action in [Action::ReviewRun, Action::ListRuns, Action::DeleteRun, Action::DeleteStructure] {
            assert!(!allows(&employee(), &action));
            assert!(allows(&supervisor(), &action));
            assert!(allows(&admin(), &action));
        }
    }

    #[test]
    fn administration_is_admin_only() {
        for action in [Action::ManageStructure, Action::ManageUsers] {
            assert!(!allows(&employee(), &action));
            assert!(!allows(&supervisor(), &action));
            assert!(allows(&admin(), &action));
        }
    }

    #[test]
    fn role_parsing() {
        assert_eq!("supervisor".parse::<Role>().unwrap(), Role::Supervisor);
        assert!(Role::Supervisor.is_staff());
        assert!(!Role::Employee.is_staff());
    }
}
