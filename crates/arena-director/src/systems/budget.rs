//! Threat budget allocation and modifier rolls for a new wave.

use log::debug;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use arena_boss_ai::ChaseEncounterController;
use arena_core::budget::ThreatBudget;
use arena_core::catalog::{ArenaSpec, Catalog, WaveModifier};
use arena_core::enums::WaveType;

/// Classify a wave. Chase arenas end every segment on an exam wave.
pub fn classify_wave(
    arena: &ArenaSpec,
    chase: Option<&ChaseEncounterController>,
    wave: u32,
) -> WaveType {
    match chase {
        Some(_) if wave <= 1 => WaveType::Lesson,
        Some(chase) if chase.is_segment_exam() => WaveType::Exam,
        Some(_) => WaveType::Integration,
        None => WaveType::classify(wave, arena.waves),
    }
}

/// Roll at most one modifier. Lesson waves never get one.
pub fn roll_modifier(
    catalog: &Catalog,
    wave_type: WaveType,
    chance: f32,
    rng: &mut ChaCha8Rng,
) -> Option<WaveModifier> {
    if wave_type == WaveType::Lesson || catalog.modifiers.is_empty() {
        return None;
    }
    if rng.gen::<f32>() >= chance {
        return None;
    }
    let modifier = &catalog.modifiers[rng.gen_range(0..catalog.modifiers.len())];
    debug!("rolled modifier {}", modifier.id);
    Some(modifier.clone())
}

/// Base template for the wave type, scaled by arena and modifier.
pub fn allocate(
    catalog: &Catalog,
    arena: u32,
    wave_type: WaveType,
    modifier: Option<&WaveModifier>,
) -> ThreatBudget {
    let template = catalog.budget_templates.get(wave_type);
    let mut total = template.total as f32 * catalog.arena_scale(arena);
    let mut cognitive_max = template.cognitive_max;

    if let Some(modifier) = modifier.filter(|_| wave_type != WaveType::Lesson) {
        total *= modifier.budget_mult;
        if let Some(cap) = modifier.cognitive_max {
            cognitive_max = cap;
        }
    }
    ThreatBudget::new(total.round().max(0.0) as u32, cognitive_max)
}
