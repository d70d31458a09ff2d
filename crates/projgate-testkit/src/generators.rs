//! Proptest generators for property-based testing.

use proptest::prelude::*;

use projgate_core::Role;

/// A valid project name.
pub fn project_name() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9 _-]{0,31}".prop_map(|s| s.trim().to_string())
}

/// A normalized email address.
pub fn email() -> impl Strategy<Value = String> {
    ("[a-z][a-z0-9]{0,11}", "[a-z]{1,8}").prop_map(|(local, domain)| {
        format!("{}@{}.com", local, domain)
    })
}

/// Any role.
pub fn role() -> impl Strategy<Value = Role> {
    prop_oneof![Just(Role::Admin), Just(Role::User)]
}

/// A sharing layout: for each of `projects` projects, its owner index and the
/// indices of users it is granted to, all below `users`.
pub fn sharing_layout(
    users: usize,
    projects: usize,
) -> impl Strategy<Value = Vec<(usize, Vec<usize>)>> {
    prop::collection::vec(
        (0..users, prop::collection::vec(0..users, 0..users)),
        0..=projects,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use projgate_core::{validate_email, validate_project_name, MAX_PROJECT_NAME_LEN};

    proptest! {
        #[test]
        fn generated_names_are_valid(name in project_name()) {
            prop_assert!(validate_project_name(&name, MAX_PROJECT_NAME_LEN).is_ok());
        }

        #[test]
        fn generated_emails_are_valid(email in email()) {
            prop_assert!(validate_email(&email).is_ok());
        }
    }
}
