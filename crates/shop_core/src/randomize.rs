//! Rotation randomization for a handful of products.
//!
//! The random source is always passed in, so a seeded generator gives a
//! reproducible layout.

use rand::seq::index;
use rand::Rng;
use shop_math::rotation::{quat_to_wxyz, random_euler_degrees, random_unit_quaternion};

use crate::record::{ProductRecord, ProductTable, RotationKind};

/// Pick `min(count, table.len())` distinct table positions uniformly at
/// random, sorted ascending.
pub fn select_positions<R: Rng + ?Sized>(table: &ProductTable, count: usize, rng: &mut R) -> Vec<usize> {
    let amount = count.min(table.len());
    let mut picked = index::sample(rng, table.len(), amount).into_vec();
    picked.sort_unstable();
    picked
}

/// Pick `min(count, table.len())` distinct product ids uniformly at random.
///
/// Ids come back in table order.
pub fn select_products<R: Rng + ?Sized>(table: &ProductTable, count: usize, rng: &mut R) -> Vec<String> {
    let entries = table.entries();
    select_positions(table, count, rng)
        .into_iter()
        .map(|i| entries[i].0.clone())
        .collect()
}

/// Give one record a fresh random rotation, keeping its representation.
///
/// Records carrying `orient` get a new unit quaternion; everything else
/// (Euler or no rotation at all) gets a new Euler triple. The other
/// representation is cleared so exactly one remains.
pub fn randomize_record<R: Rng + ?Sized>(record: &ProductRecord, rng: &mut R) -> ProductRecord {
    let mut randomized = record.clone();

    match record.rotation_kind() {
        RotationKind::Quaternion => {
            randomized.orient = Some(quat_to_wxyz(random_unit_quaternion(rng)));
            randomized.rotate = None;
        }
        RotationKind::Euler | RotationKind::Missing | RotationKind::Conflicting => {
            randomized.rotate = Some(random_euler_degrees(rng).to_array());
            randomized.orient = None;
        }
    }

    randomized
}

/// Return a copy of the table with `count` randomly chosen products
/// rotated at random.
///
/// The input table is never modified; products that are not selected are
/// cloned unchanged.
pub fn randomize_rotations<R: Rng + ?Sized>(table: &ProductTable, count: usize, rng: &mut R) -> ProductTable {
    let mut randomized = table.clone();
    let selected = select_positions(table, count, rng);

    if selected.is_empty() {
        return randomized;
    }
    let entries = table.entries();
    let ids: Vec<&str> = selected.iter().map(|&i| entries[i].0.as_str()).collect();
    log::info!("Randomizing rotations for products: {:?}", ids);

    for &position in &selected {
        let (id, record) = randomized.record_at_mut(position);
        *record = randomize_record(record, rng);

        if let Some(rotate) = record.rotate {
            log::info!("  {}: new rotation = {:?}", id, rotate);
        } else if let Some(orient) = record.orient {
            log::info!("  {}: new orientation = {:?}", id, orient);
        }
    }

    randomized
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn record(rotate: Option<[f64; 3]>, orient: Option<[f64; 4]>) -> ProductRecord {
        ProductRecord {
            asset: Some("test.usd".to_string()),
            translate: Some([1.0, 2.0, 3.0]),
            rotate,
            orient,
            scale: Some([1.0, 1.0, 1.0]),
            ..Default::default()
        }
    }

    fn sample_table() -> ProductTable {
        vec![
            ("product_1".to_string(), record(Some([90.0, 0.0, 0.0]), None)),
            ("product_2".to_string(), record(None, Some([1.0, 0.0, 0.0, 0.0]))),
            ("product_3".to_string(), record(Some([0.0, 90.0, 0.0]), None)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_sample_scenario_changes_exactly_two() {
        let table = sample_table();
        let mut rng = StdRng::seed_from_u64(42);

        let randomized = randomize_rotations(&table, 2, &mut rng);

        let ids: Vec<&str> = randomized.ids().collect();
        assert_eq!(ids, vec!["product_1", "product_2", "product_3"]);

        let unchanged = table
            .iter()
            .filter(|(id, original)| randomized.get(id) == Some(*original))
            .count();
        assert_eq!(unchanged, 1);

        for (id, original) in table.iter() {
            let after = randomized.get(id).unwrap();
            assert_eq!(after.rotation_kind(), original.rotation_kind());
            assert_eq!(after.translate, original.translate);
            assert_eq!(after.asset, original.asset);
        }
    }

    #[test]
    fn test_input_is_not_mutated() {
        let table = sample_table();
        let snapshot = table.clone();
        let mut rng = StdRng::seed_from_u64(1);

        let mut randomized = randomize_rotations(&table, 3, &mut rng);
        randomized.get_mut("product_1").unwrap().scale = Some([9.0, 9.0, 9.0]);

        assert_eq!(table, snapshot);
    }

    #[test]
    fn test_zero_count_is_identity() {
        let table = sample_table();
        let mut rng = StdRng::seed_from_u64(42);
        assert_eq!(randomize_rotations(&table, 0, &mut rng), table);
    }

    #[test]
    fn test_count_larger_than_table_selects_all_once() {
        let table = sample_table();
        let mut rng = StdRng::seed_from_u64(42);

        let selected = select_products(&table, 10, &mut rng);
        assert_eq!(selected, vec!["product_1", "product_2", "product_3"]);
    }

    #[test]
    fn test_selected_positions_are_sorted_and_in_range() {
        let table = sample_table();
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let positions = select_positions(&table, 2, &mut rng);

            assert_eq!(positions.len(), 2);
            assert!(positions[0] < positions[1]);
            assert!(positions[1] < table.len());
        }
    }

    #[test]
    fn test_sample_scenario_across_seeds() {
        let table = sample_table();

        for seed in 0..200 {
            let two = randomize_rotations(&table, 2, &mut StdRng::seed_from_u64(seed));
            let unchanged = table
                .iter()
                .filter(|(id, original)| two.get(id) == Some(*original))
                .count();
            assert_eq!(unchanged, 1, "seed {}", seed);

            let all = randomize_rotations(&table, 99, &mut StdRng::seed_from_u64(seed));
            assert!(table.iter().all(|(id, original)| all.get(id) != Some(original)));
        }
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let table = sample_table();
        let a = randomize_rotations(&table, 2, &mut StdRng::seed_from_u64(9));
        let b = randomize_rotations(&table, 2, &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }

    #[test]
    fn test_missing_rotation_gets_euler() {
        let mut rng = StdRng::seed_from_u64(42);
        let randomized = randomize_record(&record(None, None), &mut rng);

        assert_eq!(randomized.rotation_kind(), RotationKind::Euler);
    }

    #[test]
    fn test_conflicting_rotation_resolves_to_euler() {
        let mut rng = StdRng::seed_from_u64(42);
        let randomized = randomize_record(&record(Some([0.0; 3]), Some([1.0, 0.0, 0.0, 0.0])), &mut rng);

        assert_eq!(randomized.rotation_kind(), RotationKind::Euler);
        assert!(randomized.orient.is_none());
    }

    #[test]
    fn test_quaternion_record_gets_unit_quaternion() {
        let mut rng = StdRng::seed_from_u64(42);
        let randomized = randomize_record(&record(None, Some([1.0, 0.0, 0.0, 0.0])), &mut rng);

        let [w, x, y, z] = randomized.orient.unwrap();
        let norm = (w * w + x * x + y * y + z * z).sqrt();
        assert!((norm - 1.0).abs() < 1e-6);
        assert!(randomized.rotate.is_none());
    }

    fn arb_record() -> impl Strategy<Value = ProductRecord> {
        (0u8..3, any::<bool>()).prop_map(|(kind, physics)| {
            let mut r = match kind {
                0 => record(Some([10.0, 20.0, 30.0]), None),
                1 => record(None, Some([0.5, -0.5, 0.5, -0.5])),
                _ => record(None, None),
            };
            r.physics_enabled = physics;
            r
        })
    }

    proptest! {
        #[test]
        fn prop_rotation_invariant_holds(
            records in proptest::collection::vec(arb_record(), 0..40),
            count in 0usize..50,
            seed in any::<u64>(),
        ) {
            let table: ProductTable = records
                .into_iter()
                .enumerate()
                .map(|(i, r)| (format!("product_{}", i), r))
                .collect();
            let mut rng = StdRng::seed_from_u64(seed);

            let randomized = randomize_rotations(&table, count, &mut rng);
            prop_assert_eq!(randomized.len(), table.len());

            let mut changed = 0;
            for (id, original) in table.iter() {
                let after = randomized.get(id).unwrap();
                if original.has_valid_rotation() {
                    prop_assert!(after.has_valid_rotation());
                }
                if let Some(rotate) = after.rotate {
                    for angle in rotate {
                        prop_assert!((-180.0..180.0).contains(&angle));
                    }
                }
                if let Some([w, x, y, z]) = after.orient {
                    if after != original {
                        let norm = (w * w + x * x + y * y + z * z).sqrt();
                        prop_assert!((norm - 1.0).abs() < 1e-6);
                    }
                }
                prop_assert_eq!(after.physics_enabled, original.physics_enabled);
                if after != original {
                    changed += 1;
                }
            }
            prop_assert!(changed <= count.min(table.len()));
        }

        #[test]
        fn prop_selection_is_distinct(len in 0usize..40, count in 0usize..50, seed in any::<u64>()) {
            let table: ProductTable = (0..len)
                .map(|i| (format!("p{}", i), ProductRecord::default()))
                .collect();
            let mut rng = StdRng::seed_from_u64(seed);

            let selected = select_products(&table, count, &mut rng);
            prop_assert_eq!(selected.len(), count.min(len));

            let mut deduped = selected.clone();
            deduped.dedup();
            prop_assert_eq!(deduped.len(), selected.len());
        }
    }
}
