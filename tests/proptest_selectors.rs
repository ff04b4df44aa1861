//! Property-based tests using proptest
//!
//! These tests verify the label-selector grammar and the cache store's
//! filtering behavior using randomized inputs.

use kubegate::cache::ObjectStore;
use kubegate::{Selector, TypedObject};
use proptest::prelude::*;
use serde_json::json;
use std::collections::BTreeMap;

/// Generate a valid label key segment
fn arb_key() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,8}[a-z0-9]"
}

/// Generate a valid label value
fn arb_value() -> impl Strategy<Value = String> {
    "[a-z0-9][a-z0-9._-]{0,8}[a-z0-9]"
}

/// Generate an arbitrary label map
fn arb_labels() -> impl Strategy<Value = BTreeMap<String, String>> {
    prop::collection::btree_map(arb_key(), arb_value(), 0..6)
}

/// Generate a list of label maps (one per fake object)
fn arb_label_sets() -> impl Strategy<Value = Vec<BTreeMap<String, String>>> {
    prop::collection::vec(arb_labels(), 0..30)
}

fn filter_by<'a>(
    sets: &'a [BTreeMap<String, String>],
    selector: &Selector,
) -> Vec<&'a BTreeMap<String, String>> {
    sets.iter().filter(|labels| selector.matches(labels)).collect()
}

proptest! {
    /// Every generated equality requirement parses
    #[test]
    fn generated_equality_selectors_parse(key in arb_key(), value in arb_value()) {
        let selector = Selector::parse(&format!("{key}={value}"));
        prop_assert!(selector.is_ok(), "{:?}", selector);
    }

    /// An equality selector matches exactly the maps carrying the pair
    #[test]
    fn equality_matches_only_the_pair(
        mut labels in arb_labels(),
        key in arb_key(),
        value in arb_value(),
        other in arb_value()
    ) {
        let selector = Selector::parse(&format!("{key}={value}")).unwrap();

        labels.insert(key.clone(), value.clone());
        prop_assert!(selector.matches(&labels));

        if value != other {
            labels.insert(key.clone(), other);
            prop_assert!(!selector.matches(&labels));
        }

        labels.remove(&key);
        prop_assert!(!selector.matches(&labels));
    }

    /// The empty selector matches every label map
    #[test]
    fn empty_selector_matches_all(sets in arb_label_sets()) {
        let selector = Selector::parse("").unwrap();
        prop_assert_eq!(filter_by(&sets, &selector).len(), sets.len());
    }

    /// Filtering never increases the number of items
    #[test]
    fn filter_never_increases_count(
        sets in arb_label_sets(),
        key in arb_key(),
        value in arb_value()
    ) {
        let selector = Selector::parse(&format!("{key}={value}")).unwrap();
        prop_assert!(filter_by(&sets, &selector).len() <= sets.len());
    }

    /// Filtering is idempotent: filtering a filtered set changes nothing
    #[test]
    fn filter_is_idempotent(
        sets in arb_label_sets(),
        key in arb_key(),
        value in arb_value()
    ) {
        let selector = Selector::parse(&format!("{key}={value}")).unwrap();
        let once: Vec<BTreeMap<String, String>> =
            filter_by(&sets, &selector).into_iter().cloned().collect();
        let twice = filter_by(&once, &selector);
        prop_assert_eq!(once.len(), twice.len());
    }

    /// For maps that carry the key, `=` and `!=` partition the space
    #[test]
    fn equality_and_inequality_partition(
        mut labels in arb_labels(),
        key in arb_key(),
        value in arb_value(),
        present in arb_value()
    ) {
        labels.insert(key.clone(), present);
        let equals = Selector::parse(&format!("{key}={value}")).unwrap();
        let not_equals = Selector::parse(&format!("{key}!={value}")).unwrap();
        prop_assert_ne!(equals.matches(&labels), not_equals.matches(&labels));
    }

    /// Set membership matches exactly when the carried value is listed
    #[test]
    fn in_operator_matches_listed_values(
        mut labels in arb_labels(),
        key in arb_key(),
        first in arb_value(),
        second in arb_value(),
        carried in arb_value()
    ) {
        let selector = Selector::parse(&format!("{key} in ({first}, {second})")).unwrap();
        labels.insert(key.clone(), carried.clone());
        let expected = carried == first || carried == second;
        prop_assert_eq!(selector.matches(&labels), expected);
    }

    /// Strings beginning with an operator have no key and never parse
    #[test]
    fn leading_operator_never_parses(rest in "[a-z=!]{0,10}") {
        let input = format!("={rest}");
        prop_assert!(Selector::parse(&input).is_err(), "{:?} parsed", input);
    }
}

/// Tests for cache store listing invariants
mod store_listing_tests {
    use super::*;

    fn object(namespace: &str, name: &str, labels: &BTreeMap<String, String>) -> TypedObject {
        TypedObject::from_value(json!({
            "apiVersion": "v1",
            "kind": "Pod",
            "metadata": {"name": name, "namespace": namespace, "labels": labels}
        }))
        .unwrap()
    }

    proptest! {
        /// Namespace-scoped listings only ever return that namespace
        #[test]
        fn listing_respects_namespace(sets in arb_label_sets()) {
            let store = ObjectStore::new();
            for (i, labels) in sets.iter().enumerate() {
                let namespace = if i % 2 == 0 { "ns-even" } else { "ns-odd" };
                store.insert(object(namespace, &format!("obj-{i}"), labels));
            }

            for listed in store.list(Some("ns-even"), &Selector::everything()) {
                prop_assert_eq!(listed.namespace(), Some("ns-even"));
            }
        }

        /// A selector-filtered listing is a subset of the unfiltered one
        #[test]
        fn filtered_listing_is_subset(
            sets in arb_label_sets(),
            key in arb_key(),
            value in arb_value()
        ) {
            let store = ObjectStore::new();
            for (i, labels) in sets.iter().enumerate() {
                store.insert(object("ns1", &format!("obj-{i}"), labels));
            }

            let selector = Selector::parse(&format!("{key}={value}")).unwrap();
            let filtered = store.list(Some("ns1"), &selector);
            let all = store.list(Some("ns1"), &Selector::everything());
            prop_assert!(filtered.len() <= all.len());
            prop_assert_eq!(all.len(), sets.len());

            for listed in &filtered {
                prop_assert_eq!(listed.labels().get(&key), Some(&value));
            }
        }
    }
}
