//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the store against a simple reference model of
//! LRU order.

use proptest::prelude::*;

use crate::cache::{normalize_key, CacheEntry, CacheStore};

// == Strategies ==
/// City names drawn from a small alphabet so keys collide often
fn city_strategy() -> impl Strategy<Value = String> {
    "[a-f]{1,2}".prop_map(|s| s)
}

/// The same city spelled with random case and surrounding whitespace
fn spelled_city_strategy() -> impl Strategy<Value = String> {
    (city_strategy(), any::<bool>(), " {0,2}", " {0,2}").prop_map(|(city, upper, pre, post)| {
        let city = if upper { city.to_uppercase() } else { city };
        format!("{pre}{city}{post}")
    })
}

#[derive(Debug, Clone)]
enum CacheOp {
    Put { key: String },
    Lookup { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        spelled_city_strategy().prop_map(|key| CacheOp::Put { key }),
        spelled_city_strategy().prop_map(|key| CacheOp::Lookup { key }),
    ]
}

// == Reference Model ==
/// Keys ordered from least to most recently used.
#[derive(Debug, Default)]
struct ModelLru {
    order: Vec<String>,
}

impl ModelLru {
    fn touch(&mut self, key: &str) {
        self.order.retain(|k| k != key);
        self.order.push(key.to_string());
    }

    fn contains(&self, key: &str) -> bool {
        self.order.iter().any(|k| k == key)
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // For any sequence of puts and lookups, the store never exceeds its
    // capacity, its internal collections never diverge, and every eviction
    // removes the key the model says was least recently accessed.
    #[test]
    fn prop_lru_matches_model(
        capacity in 1usize..6,
        ops in prop::collection::vec(cache_op_strategy(), 1..80)
    ) {
        let mut store = CacheStore::new(capacity);
        let mut model = ModelLru::default();

        for op in ops {
            match op {
                CacheOp::Put { key } => {
                    let normalized = normalize_key(&key);
                    let expected_victim = if !model.contains(&normalized)
                        && model.order.len() >= capacity
                    {
                        Some(model.order.remove(0))
                    } else {
                        None
                    };

                    let evicted = store.put(&key, &key, CacheEntry::fetched_now(normalized.clone()));
                    model.touch(&normalized);

                    prop_assert_eq!(evicted, expected_victim);
                }
                CacheOp::Lookup { key } => {
                    let normalized = normalize_key(&key);
                    let found = store.lookup(&key);

                    prop_assert_eq!(found.is_some(), model.contains(&normalized));
                    if let Some(entry) = found {
                        prop_assert_eq!(entry.payload(), &normalized);
                        model.touch(&normalized);
                    }
                }
            }

            prop_assert!(store.len() <= capacity, "size {} exceeds {}", store.len(), capacity);
            prop_assert_eq!(store.snapshot_keys(), model.order.clone());
            store.assert_consistent();
        }
    }

    // Writing the same city under any spelling occupies a single slot.
    #[test]
    fn prop_spellings_share_a_slot(city in city_strategy(), spellings in prop::collection::vec(" {0,2}", 1..5)) {
        let mut store = CacheStore::new(4);

        for pad in &spellings {
            let key = format!("{pad}{}{pad}", city.to_uppercase());
            store.put(&key, &key, CacheEntry::fetched_now(1u32));
        }

        prop_assert_eq!(store.len(), 1);
        prop_assert!(store.lookup(&city).is_some());
    }
}
