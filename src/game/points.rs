//! Point generation.
//!
//! Structure (count, numbering, stack order) is deterministic; ids and
//! positions come from the session's LCG.

use super::state::{LayoutPosition, Point, PointId};

/// Positions are drawn from `[0, POSITION_RANGE_PCT)` percent.
pub const POSITION_RANGE_PCT: f64 = 90.0;

// ── RNG ─────────────────────────────────────────────────────

/// Full-period 64-bit LCG: a stream never repeats a state, which is what
/// makes the ids below unique.
fn next_rng(seed: u64) -> u64 {
    seed.wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407)
}

/// Uniform in `[0, 1)` from the top 53 bits.
fn rng_unit(seed: &mut u64) -> f64 {
    *seed = next_rng(*seed);
    (*seed >> 11) as f64 / (1u64 << 53) as f64
}

fn rng_id(seed: &mut u64) -> PointId {
    *seed = next_rng(*seed);
    PointId::new(format!("id{:016x}", *seed))
}

/// Build `count` points numbered 1..=count. Advances `seed`.
pub fn generate(count: u32, seed: &mut u64) -> Vec<Point> {
    (0..count)
        .map(|i| {
            let id = rng_id(seed);
            let position = LayoutPosition {
                top: rng_unit(seed) * POSITION_RANGE_PCT,
                left: rng_unit(seed) * POSITION_RANGE_PCT,
            };
            Point::new(id, i + 1, position, count - i)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn structure_is_deterministic() {
        let mut seed = 7;
        let points = generate(5, &mut seed);
        let numbers: Vec<u32> = points.iter().map(|p| p.sequence_number).collect();
        let stack: Vec<u32> = points.iter().map(|p| p.stack_order).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
        assert_eq!(stack, vec![5, 4, 3, 2, 1]);
        assert!(points.iter().all(|p| !p.fade_out()));
    }

    #[test]
    fn zero_count_is_empty() {
        let mut seed = 7;
        assert!(generate(0, &mut seed).is_empty());
        assert_eq!(seed, 7);
    }

    #[test]
    fn same_seed_same_layout() {
        let (mut a, mut b) = (99, 99);
        assert_eq!(generate(4, &mut a), generate(4, &mut b));
        assert_eq!(a, b);
    }

    #[test]
    fn consecutive_batches_never_share_ids() {
        let mut seed = 1;
        let first = generate(50, &mut seed);
        let second = generate(50, &mut seed);
        let ids: HashSet<&PointId> = first.iter().chain(&second).map(|p| &p.id).collect();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn unit_draw_stays_below_one() {
        // Seed whose successor has all top bits set would be the worst case;
        // sample a long stretch of the stream instead.
        let mut seed = 0;
        for _ in 0..10_000 {
            let u = rng_unit(&mut seed);
            assert!((0.0..1.0).contains(&u));
        }
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    proptest! {
        #[test]
        fn prop_numbers_are_one_to_n(count in 1u32..300, seed in any::<u64>()) {
            let mut seed = seed;
            let points = generate(count, &mut seed);
            prop_assert_eq!(points.len(), count as usize);
            let numbers: HashSet<u32> = points.iter().map(|p| p.sequence_number).collect();
            prop_assert_eq!(numbers, (1..=count).collect::<HashSet<_>>());
        }

        #[test]
        fn prop_ids_pairwise_distinct(count in 1u32..300, seed in any::<u64>()) {
            let mut seed = seed;
            let points = generate(count, &mut seed);
            let ids: HashSet<&PointId> = points.iter().map(|p| &p.id).collect();
            prop_assert_eq!(ids.len(), points.len());
        }

        #[test]
        fn prop_stack_order_puts_low_numbers_on_top(count in 1u32..300, seed in any::<u64>()) {
            let mut seed = seed;
            for p in generate(count, &mut seed) {
                prop_assert_eq!(p.stack_order, count - (p.sequence_number - 1));
            }
        }

        #[test]
        fn prop_positions_in_range(count in 1u32..100, seed in any::<u64>()) {
            let mut seed = seed;
            for p in generate(count, &mut seed) {
                prop_assert!((0.0..POSITION_RANGE_PCT).contains(&p.position.top));
                prop_assert!((0.0..POSITION_RANGE_PCT).contains(&p.position.left));
            }
        }
    }
}
