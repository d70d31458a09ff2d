//! Strong identifier types.
//!
//! All identifiers are newtypes over the store's `i64` row ids so a grant id
//! can never be passed where a project id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! row_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Get the raw row id.
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

row_id!(
    /// Identifier of a project row.
    ProjectId
);

row_id!(
    /// Identifier of an access grant row.
    GrantId
);

row_id!(
    /// Identifier of a user account, as issued by the identity provider.
    UserId
);

row_id!(
    /// Identifier of a file attached to a project.
    FileId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_bare_number() {
        assert_eq!(ProjectId(42).to_string(), "42");
        assert_eq!(GrantId(10).to_string(), "10");
    }

    #[test]
    fn test_serializes_transparently() {
        let json = serde_json::to_string(&UserId(7)).unwrap();
        assert_eq!(json, "7");
        let back: UserId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, UserId(7));
    }

    #[test]
    fn test_ordering_follows_raw_id() {
        let mut ids = vec![ProjectId(3), ProjectId(1), ProjectId(2)];
        ids.sort();
        assert_eq!(ids, vec![ProjectId(1), ProjectId(2), ProjectId(3)]);
    }
}
