use crate::loot::catalog::{Catalog, ItemFilter, ItemKind, ItemTypeId};
use crate::loot::picker::WeightedPicker;
use crate::random::GameRng;

/// One step of a worth decomposition.
#[derive(Debug, Clone, PartialEq)]
pub struct LootDraw {
    pub item_type: ItemTypeId,
    pub value_consumed: f32,
    pub outcome: DrawOutcome,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOutcome {
    /// A single item at the quality/durability that encodes the realized value.
    Instanced { quality: f32, durability: f32 },
    /// A stack of identical units.
    Stacked { count: u32 },
}

/// Hard stop against degenerate content (e.g. near-zero stack values) that would
/// otherwise shrink the balance too slowly.
const MAX_DRAW_STEPS: u32 = 1024;

/// Break a worth budget into concrete item draws.
///
/// Each iteration slices off a randomized fraction of the original budget,
/// biased toward small slices, then picks one eligible type by jittered carry
/// chance. Big budgets therefore tend to produce a few valuable items and a long
/// tail of minor ones. The realized value of every draw is subtracted from the
/// balance, so the total across all draws never exceeds `worth`.
///
/// An empty result is a normal outcome: a sub-1 budget, a filter that matches
/// nothing, or a catalog with no type eligible at the sliced value all decompose
/// to nothing.
pub fn decompose(
    worth: f32,
    filter: Option<&ItemFilter>,
    catalog: &Catalog,
    rng: &mut GameRng,
) -> Vec<LootDraw> {
    let mut draws = Vec::new();
    if !worth.is_finite() || worth < 1.0 {
        return draws;
    }

    let mut balance = worth;
    let mut steps = 0;
    while balance >= 1.0 && steps < MAX_DRAW_STEPS {
        steps += 1;

        // slice off a fraction of the original budget, never more than what is
        // left and never less than one whole unit of worth
        let bias = rng.distributed_pow(0.0, 1.0, 1.5) * rng.unit().powi(2);
        let slice = (1.0 + worth * bias).min(balance);

        let mut picker = WeightedPicker::new();
        for (id, entry) in catalog.entries() {
            if let Some(filter) = filter {
                if !filter.includes(entry) {
                    continue;
                }
            }
            // eligibility is judged on the concrete variant the entry would
            // produce; an abstract entry with no concrete variant in this world
            // is simply never weighed
            let Some(concrete_id) = catalog.resolve_concrete(id) else {
                continue;
            };
            let Some(concrete) = catalog.get(concrete_id) else {
                continue;
            };
            match concrete.kind {
                ItemKind::Instanced {
                    value_min,
                    value_max,
                } => {
                    if concrete.exclusive.is_some() {
                        continue;
                    }
                    if slice < value_min || slice > value_max {
                        continue;
                    }
                }
                ItemKind::Stacked { unit_value, .. } => {
                    if unit_value <= 0.0 {
                        continue;
                    }
                }
            }
            let weight = entry.carry_chance * rng.distributed(0.5, 1.5);
            picker.offer(concrete_id, weight, rng);
        }

        let Some(winner) = picker.finish() else {
            // nothing in the catalog can absorb this slice; later slices only
            // get smaller in expectation, and the filter never changes, so stop
            break;
        };
        let Some(entry) = catalog.get(winner) else {
            break;
        };

        match entry.kind {
            ItemKind::Instanced { value_max, .. } => {
                let value = slice.min(value_max);
                if let Some((quality, durability)) = entry.value_to_quality(value) {
                    draws.push(LootDraw {
                        item_type: winner,
                        value_consumed: value,
                        outcome: DrawOutcome::Instanced {
                            quality,
                            durability,
                        },
                    });
                }
                balance -= value;
            }
            ItemKind::Stacked {
                unit_value,
                stack_limit,
            } => {
                let value = slice.min(unit_value * stack_limit as f32);
                let count = (value / unit_value).floor() as u32;
                if count > 0 {
                    draws.push(LootDraw {
                        item_type: winner,
                        value_consumed: value,
                        outcome: DrawOutcome::Stacked { count },
                    });
                }
                balance -= value;
            }
        }
    }

    draws
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loot::catalog::ItemTypeDescriptor;

    fn stacked(name: &str, unit_value: f32, stack_limit: u32) -> ItemTypeDescriptor {
        ItemTypeDescriptor {
            name: name.to_string(),
            kind: ItemKind::Stacked {
                unit_value,
                stack_limit,
            },
            carry_chance: 1.0,
            exclusive: None,
            concrete: true,
            resolves_to: None,
        }
    }

    fn instanced(name: &str, min: f32, max: f32) -> ItemTypeDescriptor {
        ItemTypeDescriptor {
            name: name.to_string(),
            kind: ItemKind::Instanced {
                value_min: min,
                value_max: max,
            },
            carry_chance: 1.0,
            exclusive: None,
            concrete: true,
            resolves_to: None,
        }
    }

    fn total_consumed(draws: &[LootDraw]) -> f32 {
        draws.iter().map(|draw| draw.value_consumed).sum()
    }

    #[test]
    fn sub_unit_worth_yields_nothing() {
        let catalog = Catalog::new(vec![stacked("coins", 1.0, 100)]);
        let mut rng = GameRng::from_seed(1);
        assert!(decompose(0.0, None, &catalog, &mut rng).is_empty());
        assert!(decompose(0.99, None, &catalog, &mut rng).is_empty());
        assert!(decompose(f32::NAN, None, &catalog, &mut rng).is_empty());
    }

    #[test]
    fn empty_catalog_yields_nothing() {
        let catalog = Catalog::default();
        let mut rng = GameRng::from_seed(2);
        assert!(decompose(100.0, None, &catalog, &mut rng).is_empty());
    }

    #[test]
    fn filter_matching_nothing_yields_nothing() {
        let catalog = Catalog::new(vec![stacked("coins", 1.0, 100)]);
        let filter = ItemFilter {
            allowed: vec!["gems".to_string()],
        };
        let mut rng = GameRng::from_seed(3);
        assert!(decompose(100.0, Some(&filter), &catalog, &mut rng).is_empty());
    }

    #[test]
    fn consumed_value_never_exceeds_worth() {
        let catalog = Catalog::new(vec![
            stacked("coins", 1.0, 50),
            instanced("sword", 1.0, 20.0),
            instanced("crown", 15.0, 80.0),
        ]);
        for seed in 1..40u64 {
            let mut rng = GameRng::from_seed(seed);
            for worth in [1.0f32, 5.0, 17.3, 100.0, 500.0] {
                let draws = decompose(worth, None, &catalog, &mut rng);
                let total = total_consumed(&draws);
                assert!(
                    total <= worth + 1e-3,
                    "seed {} worth {} consumed {}",
                    seed,
                    worth,
                    total
                );
            }
        }
    }

    #[test]
    fn stacked_only_budget_respects_stack_bounds() {
        // worth 5 against a unit-value-1, cap-10 stack: every draw stays within
        // the cap and the combined value stays within the budget
        let catalog = Catalog::new(vec![stacked("rations", 1.0, 10)]);
        for seed in 1..60u64 {
            let mut rng = GameRng::from_seed(seed);
            let draws = decompose(5.0, None, &catalog, &mut rng);
            assert!(!draws.is_empty(), "seed {} produced no draws", seed);
            for draw in &draws {
                assert_eq!(draw.item_type, ItemTypeId(0));
                match draw.outcome {
                    DrawOutcome::Stacked { count } => {
                        assert!(count >= 1 && count <= 10, "count {}", count)
                    }
                    ref other => panic!("unexpected outcome {:?}", other),
                }
            }
            assert!(total_consumed(&draws) <= 5.0 + 1e-3);
        }
    }

    #[test]
    fn instanced_range_gates_eligibility() {
        // slices from a worth-5 budget can never reach the [100, 200] band
        let catalog = Catalog::new(vec![instanced("relic", 100.0, 200.0)]);
        let mut rng = GameRng::from_seed(4);
        assert!(decompose(5.0, None, &catalog, &mut rng).is_empty());
    }

    #[test]
    fn exclusive_types_never_drop() {
        let mut reserved = instanced("royal blade", 1.0, 50.0);
        reserved.exclusive = Some("knight".to_string());
        let catalog = Catalog::new(vec![reserved]);
        let mut rng = GameRng::from_seed(5);
        assert!(decompose(30.0, None, &catalog, &mut rng).is_empty());
    }

    #[test]
    fn abstract_winner_resolves_to_concrete_variant() {
        let mut template = stacked("ore", 1.0, 20);
        template.concrete = false;
        template.resolves_to = Some("iron ore".to_string());
        // give the abstract entry all the pick weight
        template.carry_chance = 100.0;
        let mut concrete = stacked("iron ore", 1.0, 20);
        concrete.carry_chance = 0.0;
        let catalog = Catalog::new(vec![template, concrete]);

        let mut rng = GameRng::from_seed(6);
        let draws = decompose(10.0, None, &catalog, &mut rng);
        assert!(!draws.is_empty());
        let iron = catalog.id_by_name("iron ore").unwrap();
        assert!(draws.iter().all(|draw| draw.item_type == iron));
    }

    #[test]
    fn unresolvable_entries_are_never_weighed() {
        let mut ghost = stacked("ghost ore", 1.0, 20);
        ghost.concrete = false;
        let catalog = Catalog::new(vec![ghost]);
        let mut rng = GameRng::from_seed(7);
        assert!(decompose(50.0, None, &catalog, &mut rng).is_empty());
    }

    #[test]
    fn dominant_unresolvable_entry_does_not_starve_eligible_types() {
        // the unresolvable entry carries nearly all the weight; the budget must
        // still flow to the one eligible type instead of burning on no-ops
        let mut ghost = stacked("ghost ore", 1.0, 20);
        ghost.concrete = false;
        ghost.carry_chance = 1000.0;
        let catalog = Catalog::new(vec![ghost, stacked("coins", 1.0, 50)]);

        for seed in 1..20u64 {
            let mut rng = GameRng::from_seed(seed);
            let draws = decompose(100.0, None, &catalog, &mut rng);
            assert!(!draws.is_empty(), "seed {} realized no loot", seed);
            let coins = catalog.id_by_name("coins").unwrap();
            assert!(draws.iter().all(|draw| draw.item_type == coins));
            let total = total_consumed(&draws);
            assert!(
                total > 50.0 && total <= 100.0 + 1e-3,
                "seed {} realized only {} of the budget",
                seed,
                total
            );
        }
    }

    #[test]
    fn exclusive_stacked_types_still_drop() {
        let mut tokens = stacked("guild tokens", 1.0, 10);
        tokens.exclusive = Some("guild".to_string());
        let catalog = Catalog::new(vec![tokens]);
        let mut rng = GameRng::from_seed(21);
        let draws = decompose(8.0, None, &catalog, &mut rng);
        assert!(!draws.is_empty(), "exclusivity only gates instanced types");
    }

    #[test]
    fn instanced_draws_carry_inverted_quality() {
        let catalog = Catalog::new(vec![instanced("sword", 1.0, 10.0)]);
        let mut rng = GameRng::from_seed(9);
        let draws = decompose(40.0, None, &catalog, &mut rng);
        assert!(!draws.is_empty());
        for draw in &draws {
            match draw.outcome {
                DrawOutcome::Instanced {
                    quality,
                    durability,
                } => {
                    assert!((0.0..=1.0).contains(&quality));
                    assert!((0.0..=1.0).contains(&durability));
                    assert!(draw.value_consumed <= 10.0 + 1e-6);
                }
                ref other => panic!("unexpected outcome {:?}", other),
            }
        }
    }

    #[test]
    fn identical_inputs_with_different_seeds_diverge() {
        let catalog = Catalog::new(vec![stacked("coins", 1.0, 50), instanced("sword", 1.0, 20.0)]);
        let mut a = GameRng::from_seed(100);
        let mut b = GameRng::from_seed(200);
        let draws_a = decompose(80.0, None, &catalog, &mut a);
        let draws_b = decompose(80.0, None, &catalog, &mut b);
        assert_ne!(draws_a, draws_b, "jitter should vary runs across seeds");
    }
}
