//! Property: a user's visibility set is exactly owned ∪ granted, each once.

use std::collections::BTreeSet;

use proptest::prelude::*;

use projgate_core::{ProjectId, Role};
use projgate_testkit::generators::{email, project_name, role, sharing_layout};
use projgate_testkit::TestFixture;

const USERS: usize = 4;
const PROJECTS: usize = 6;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn visible_projects_are_owned_union_granted(
        emails in prop::collection::btree_set(email(), USERS),
        roles in prop::collection::vec(role(), USERS),
        names in prop::collection::btree_set(project_name(), PROJECTS),
        layout in sharing_layout(USERS, PROJECTS),
    ) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        rt.block_on(async {
            let fixture = TestFixture::new();
            let mut users = Vec::with_capacity(USERS);
            for (email, role) in emails.iter().zip(&roles) {
                users.push(fixture.register(email, *role).await);
            }
            // Generated emails all end in ".com".
            let root = fixture.admin("root@admin.example").await;

            let mut expected: Vec<BTreeSet<ProjectId>> = vec![BTreeSet::new(); USERS];
            let mut all = BTreeSet::new();

            for ((owner, grantees), name) in layout.iter().zip(&names) {
                let id = fixture
                    .engine
                    .create_project(name, &users[*owner])
                    .await
                    .unwrap();
                all.insert(id);
                expected[*owner].insert(id);

                let grantees: BTreeSet<usize> = grantees.iter().copied().collect();
                for g in grantees {
                    fixture
                        .engine
                        .grant_access(id, &users[g].email)
                        .await
                        .unwrap();
                    expected[g].insert(id);
                }
            }

            for (i, user) in users.iter().enumerate() {
                let visible = fixture.engine.list_visible_projects(user).await.unwrap();
                let ids: Vec<ProjectId> = visible.iter().map(|p| p.id).collect();
                let unique: BTreeSet<ProjectId> = ids.iter().copied().collect();

                assert_eq!(ids.len(), unique.len(), "duplicates for user {}", i);
                if user.role == Role::Admin {
                    assert_eq!(unique, all, "admin {} must see everything", i);
                } else {
                    assert_eq!(unique, expected[i], "wrong set for user {}", i);
                }
            }

            let root_ids: BTreeSet<ProjectId> = fixture
                .engine
                .list_visible_projects(&root)
                .await
                .unwrap()
                .into_iter()
                .map(|p| p.id)
                .collect();
            assert_eq!(root_ids, all);
        });
    }
}
