//! Enemy pool selection: which types a wave may draw from, and the weighted
//! pick among the ones the budget can still pay for.

use std::collections::BTreeSet;

use rand::distributions::{Distribution, WeightedIndex};
use rand_chacha::ChaCha8Rng;

use arena_core::budget::ThreatBudget;
use arena_core::catalog::{Catalog, EnemySpec, WaveModifier};
use arena_core::enums::{EnemyKind, WaveType};

/// Narrow the catalog to the wave's cognitive pool.
///
/// A lesson wave draws only the type the arena introduces. Other waves get
/// every type introduced so far that has not aged out, unless a modifier
/// forces its own list.
pub fn build_pool(
    catalog: &Catalog,
    arena: u32,
    wave: u32,
    wave_type: WaveType,
    modifier: Option<&WaveModifier>,
) -> Vec<EnemyKind> {
    if wave_type == WaveType::Lesson {
        let lesson: Vec<EnemyKind> = catalog
            .enemies
            .iter()
            .filter(|e| e.intro_arena == arena && e.min_wave <= 1)
            .map(|e| e.kind)
            .collect();
        if !lesson.is_empty() {
            return lesson;
        }
    } else if let Some(forced) = modifier.and_then(|m| m.force_types.as_ref()) {
        let pool: Vec<EnemyKind> = forced
            .iter()
            .copied()
            .filter(|kind| catalog.enemy(*kind).is_some())
            .collect();
        if !pool.is_empty() {
            return pool;
        }
    }

    catalog
        .enemies
        .iter()
        .filter(|e| is_available(e, arena, wave))
        .map(|e| e.kind)
        .collect()
}

fn is_available(spec: &EnemySpec, arena: u32, wave: u32) -> bool {
    let introduced =
        spec.intro_arena < arena || (spec.intro_arena == arena && spec.min_wave <= wave);
    let capped_out = spec.max_arena.is_some_and(|last| arena > last);
    introduced && !capped_out
}

/// Weighted pick among pool members that can pay for `members` spawns and
/// fit the cognitive cap. `None` means nothing is affordable.
pub fn pick<'a>(
    catalog: &'a Catalog,
    pool: &[EnemyKind],
    budget: &ThreatBudget,
    types_spawned: &BTreeSet<EnemyKind>,
    members: u32,
    schoolable_only: bool,
    rng: &mut ChaCha8Rng,
) -> Option<&'a EnemySpec> {
    let candidates: Vec<&EnemySpec> = pool
        .iter()
        .filter_map(|kind| catalog.enemy(*kind))
        .filter(|spec| !schoolable_only || spec.schoolable)
        .filter(|spec| budget.can_afford(spec.cost.total() * members))
        .filter(|spec| {
            types_spawned.contains(&spec.kind) || budget.fits_cognitive(spec.cost.cognitive)
        })
        .collect();

    let dist = WeightedIndex::new(candidates.iter().map(|spec| spec.weight)).ok()?;
    candidates.get(dist.sample(rng)).copied()
}
