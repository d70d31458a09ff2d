//! Visibility sets: which projects an actor may list.
//!
//! For non-admins the set is the union of two disjoint-by-source lists
//! (owned, granted) that can still overlap by project: an owner may also
//! appear in a grant on their own project. Each project is kept once.

use std::collections::HashSet;

use projgate_core::{Project, ProjectId};

/// Ordered, duplicate-free set of visible projects.
///
/// Order is insertion order: owned projects first, then granted-only ones.
#[derive(Debug, Clone, Default)]
pub struct VisibilitySet {
    projects: Vec<Project>,
    seen: HashSet<ProjectId>,
}

impl VisibilitySet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything, in store order. Used for admins.
    pub fn everything(projects: Vec<Project>) -> Self {
        let mut set = Self::new();
        set.extend(projects);
        set
    }

    /// Owned projects followed by granted projects, deduplicated by id.
    pub fn merge(owned: Vec<Project>, granted: Vec<Project>) -> Self {
        let mut set = Self::new();
        set.extend(owned);
        set.extend(granted);
        set
    }

    /// Add a project. Returns `false` if it was already present.
    pub fn insert(&mut self, project: Project) -> bool {
        if !self.seen.insert(project.id) {
            return false;
        }
        self.projects.push(project);
        true
    }

    pub fn contains(&self, id: ProjectId) -> bool {
        self.seen.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Project> {
        self.projects.iter()
    }

    pub fn into_projects(self) -> Vec<Project> {
        self.projects
    }
}

impl Extend<Project> for VisibilitySet {
    fn extend<I: IntoIterator<Item = Project>>(&mut self, iter: I) {
        for project in iter {
            self.insert(project);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use projgate_core::UserId;

    fn project(id: i64, owner: i64) -> Project {
        Project {
            id: ProjectId(id),
            project_name: format!("p{}", id),
            owner_user_id: UserId(owner),
        }
    }

    #[test]
    fn test_owned_and_granted_merge() {
        let set = VisibilitySet::merge(vec![project(1, 7)], vec![project(2, 8)]);
        let ids: Vec<_> = set.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![ProjectId(1), ProjectId(2)]);
    }

    #[test]
    fn test_owner_also_granted_counted_once() {
        let set = VisibilitySet::merge(
            vec![project(1, 7)],
            vec![project(1, 7), project(2, 8)],
        );
        assert_eq!(set.len(), 2);
        assert!(set.contains(ProjectId(1)));
        assert!(set.contains(ProjectId(2)));
    }

    #[test]
    fn test_owned_order_comes_first() {
        let set = VisibilitySet::merge(vec![project(5, 7)], vec![project(2, 8)]);
        let ids: Vec<_> = set.into_projects().into_iter().map(|p| p.id.get()).collect();
        assert_eq!(ids, vec![5, 2]);
    }

    #[test]
    fn test_empty() {
        let set = VisibilitySet::merge(vec![], vec![]);
        assert!(set.is_empty());
    }

    proptest! {
        #[test]
        fn merge_is_duplicate_free_union(
            owned in prop::collection::vec(1i64..20, 0..10),
            granted in prop::collection::vec(1i64..20, 0..10),
        ) {
            let set = VisibilitySet::merge(
                owned.iter().map(|&id| project(id, 1)).collect(),
                granted.iter().map(|&id| project(id, 2)).collect(),
            );

            let ids: Vec<i64> = set.iter().map(|p| p.id.get()).collect();
            let unique: HashSet<i64> = ids.iter().copied().collect();
            prop_assert_eq!(ids.len(), unique.len());

            let expected: HashSet<i64> = owned.iter().chain(granted.iter()).copied().collect();
            prop_assert_eq!(unique, expected);
        }
    }
}
