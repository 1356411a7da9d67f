//! Property-based tests: for arbitrary key sets, every indexed key must
//! resolve to a distinct ID, every non-member must miss, and the serialized
//! form must reproduce the index exactly.

use std::collections::HashSet;

use proptest::prelude::*;

use fastrie::Trie;

/// Arbitrary keys over non-reserved bytes, deduplicated and sorted.
fn key_set_strategy() -> impl Strategy<Value = Vec<Vec<u8>>> {
    prop::collection::vec(prop::collection::vec(1u8..=255, 0..12), 0..64).prop_map(|mut keys| {
        keys.sort();
        keys.dedup();
        keys
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_members_get_distinct_ids(keys in key_set_strategy()) {
        let trie = Trie::build(&keys).unwrap();
        prop_assert_eq!(trie.num_keys(), keys.len());

        let mut seen = vec![false; keys.len()];
        for key in &keys {
            let id = trie.exact_search(key);
            prop_assert!(id.is_some(), "missing key {:?}", key);
            let id = id.unwrap() as usize;
            prop_assert!(id < keys.len());
            prop_assert!(!seen[id], "id {} reused", id);
            seen[id] = true;
        }
    }

    #[test]
    fn prop_non_members_miss(
        keys in key_set_strategy(),
        probes in prop::collection::vec(prop::collection::vec(1u8..=255, 0..14), 0..32),
    ) {
        let trie = Trie::build(&keys).unwrap();
        let members: HashSet<&[u8]> = keys.iter().map(Vec::as_slice).collect();
        for probe in &probes {
            if !members.contains(probe.as_slice()) {
                prop_assert_eq!(trie.exact_search(probe), None, "phantom member {:?}", probe);
            }
        }
    }

    #[test]
    fn prop_roundtrip_preserves_behavior(keys in key_set_strategy()) {
        let trie = Trie::build(&keys).unwrap();
        let bytes = trie.save_to_vec().unwrap();
        prop_assert_eq!(bytes.len() as u64, trie.serialized_size());

        let loaded = Trie::load_from_slice(&bytes).unwrap();
        for key in &keys {
            prop_assert_eq!(trie.exact_search(key), loaded.exact_search(key));
        }
        prop_assert_eq!(loaded.save_to_vec().unwrap(), bytes);
    }

    #[test]
    fn prop_dense_setting_does_not_change_membership(keys in key_set_strategy()) {
        let with_dense = Trie::build_with(&keys, true, 64).unwrap();
        let without = Trie::build_with(&keys, false, 64).unwrap();
        for key in &keys {
            prop_assert!(with_dense.exact_search(key).is_some());
            prop_assert!(without.exact_search(key).is_some());
        }
        prop_assert_eq!(with_dense.num_keys(), without.num_keys());
    }

    #[test]
    fn prop_extensions_and_truncations_miss(keys in key_set_strategy()) {
        let trie = Trie::build(&keys).unwrap();
        let members: HashSet<&[u8]> = keys.iter().map(Vec::as_slice).collect();
        for key in &keys {
            let mut extended = key.clone();
            extended.push(b'!');
            if !members.contains(extended.as_slice()) {
                prop_assert_eq!(trie.exact_search(&extended), None);
            }
            if !key.is_empty() {
                let truncated = &key[..key.len() - 1];
                if !members.contains(truncated) {
                    prop_assert_eq!(trie.exact_search(truncated), None);
                }
            }
        }
    }
}
