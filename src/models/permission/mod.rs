//! Permission evaluator.
//!
//! Single source of truth for who may perform which mutation, consulted by
//! both the client surfaces and the server handlers. Pure, no I/O.

use crate::models::user::{Role, User};

/// A mutating action subject to permission checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    AddEvent,
    EditEvent,
    DeleteEvent,
    ManageCategories,
    ManageUsers,
}

/// Evaluate whether an account with the given role and capability flags may
/// perform `action`.
///
/// Rules, in precedence order:
/// - `ManageUsers`: super_admin only (admins do not see account management).
/// - `ManageCategories`: admin or super_admin.
/// - `AddEvent`: `can_add` flag, or admin tier.
/// - `EditEvent` / `DeleteEvent`: `can_edit` flag, or admin tier.
pub fn can_perform(role: Role, can_edit: bool, can_add: bool, action: Action) -> bool {
    match action {
        Action::ManageUsers => role == Role::SuperAdmin,
        Action::ManageCategories => role.is_admin(),
        Action::AddEvent => can_add || role.is_admin(),
        Action::EditEvent | Action::DeleteEvent => can_edit || role.is_admin(),
    }
}

impl User {
    /// Convenience wrapper over [`can_perform`].
    pub fn can_perform(&self, action: Action) -> bool {
        can_perform(self.role, self.can_edit, self.can_add, action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(role: Role, can_edit: bool, can_add: bool, action: Action) -> bool {
        can_perform(role, can_edit, can_add, action)
    }

    #[test]
    fn test_manage_users_super_admin_only() {
        assert!(check(Role::SuperAdmin, false, false, Action::ManageUsers));
        assert!(!check(Role::Admin, true, true, Action::ManageUsers));
        assert!(!check(Role::User, true, true, Action::ManageUsers));
    }

    #[test]
    fn test_manage_categories_admin_tier() {
        assert!(check(Role::SuperAdmin, false, false, Action::ManageCategories));
        assert!(check(Role::Admin, false, false, Action::ManageCategories));
        assert!(!check(Role::User, true, true, Action::ManageCategories));
    }

    #[test]
    fn test_add_event_flag_or_admin() {
        assert!(check(Role::User, false, true, Action::AddEvent));
        assert!(!check(Role::User, true, false, Action::AddEvent));
        assert!(check(Role::Admin, false, false, Action::AddEvent));
    }

    #[test]
    fn test_edit_delete_share_the_edit_flag() {
        for action in [Action::EditEvent, Action::DeleteEvent] {
            assert!(check(Role::User, true, false, action));
            assert!(!check(Role::User, false, true, action));
            assert!(check(Role::SuperAdmin, false, false, action));
        }
    }

    /// Granting a flag or upgrading the role never revokes an allowed action.
    #[test]
    fn test_monotonic_in_privilege() {
        let actions = [
            Action::AddEvent,
            Action::EditEvent,
            Action::DeleteEvent,
            Action::ManageCategories,
            Action::ManageUsers,
        ];
        let roles = [Role::User, Role::Admin, Role::SuperAdmin];

        for action in actions {
            for (i, &role) in roles.iter().enumerate() {
                for can_edit in [false, true] {
                    for can_add in [false, true] {
                        if !check(role, can_edit, can_add, action) {
                            continue;
                        }
                        // Flag upgrades keep the grant.
                        assert!(check(role, true, can_add, action));
                        assert!(check(role, can_edit, true, action));
                        // Role upgrades keep the grant. ManageUsers is
                        // excluded: it is exclusive to super_admin.
                        if action != Action::ManageUsers {
                            for &higher in &roles[i..] {
                                assert!(check(higher, can_edit, can_add, action));
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_super_admin_implies_admin_gated_actions() {
        for action in [
            Action::AddEvent,
            Action::EditEvent,
            Action::DeleteEvent,
            Action::ManageCategories,
        ] {
            assert!(check(Role::SuperAdmin, false, false, action));
        }
    }

    #[test]
    fn test_user_wrapper() {
        let mut user = User::new("bob", "bob@example.com", "Bob");
        assert!(!user.can_perform(Action::AddEvent));
        user.can_add = true;
        assert!(user.can_perform(Action::AddEvent));
    }
}
