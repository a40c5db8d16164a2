//! Property-based tests for catalog seeding order.

use std::collections::HashSet;

use proptest::prelude::*;

use super::catalog::{DEFAULT_ACCOUNTS, DefaultAccount, seed_plan};

/// Strategy producing a subset of catalog codes that already exist.
fn existing_subset() -> impl Strategy<Value = HashSet<String>> {
    proptest::collection::vec(any::<bool>(), DEFAULT_ACCOUNTS.len()).prop_map(|mask| {
        DEFAULT_ACCOUNTS
            .iter()
            .zip(mask)
            .filter(|(_, keep)| *keep)
            .map(|(a, _)| a.code.to_string())
            .collect()
    })
}

/// Strategy producing the catalog in a random order.
fn shuffled_catalog() -> impl Strategy<Value = Vec<DefaultAccount>> {
    Just(DEFAULT_ACCOUNTS.to_vec()).prop_shuffle()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every planned child comes after its planned parent, whatever the
    /// literal order of the catalog.
    #[test]
    fn prop_parents_precede_children(catalog in shuffled_catalog()) {
        let plan = seed_plan(&catalog, &HashSet::new()).unwrap();
        prop_assert_eq!(plan.len(), catalog.len());
        for (i, account) in plan.iter().enumerate() {
            if let Some(parent) = account.parent_code {
                let parent_pos = plan.iter().position(|a| a.code == parent).unwrap();
                prop_assert!(parent_pos < i);
            }
        }
    }

    /// Running the plan for the remaining codes after a partial seed yields
    /// exactly the missing codes, once each.
    #[test]
    fn prop_plan_covers_missing_codes_exactly(existing in existing_subset()) {
        let plan = seed_plan(DEFAULT_ACCOUNTS, &existing).unwrap();
        let planned: HashSet<&str> = plan.iter().map(|a| a.code).collect();
        prop_assert_eq!(planned.len(), plan.len());
        for account in DEFAULT_ACCOUNTS {
            prop_assert_eq!(planned.contains(account.code), !existing.contains(account.code));
        }
    }

    /// Seeding twice plans nothing the second time.
    #[test]
    fn prop_second_seed_is_noop(existing in existing_subset()) {
        let first = seed_plan(DEFAULT_ACCOUNTS, &existing).unwrap();
        let mut after: HashSet<String> = existing.clone();
        after.extend(first.iter().map(|a| a.code.to_string()));
        let second = seed_plan(DEFAULT_ACCOUNTS, &after).unwrap();
        prop_assert!(second.is_empty());
    }
}
