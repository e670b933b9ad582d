//! Tests for the director: wave flow, spawn pacing, chase encounters and
//! run control.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use glam::Vec2;

use arena_core::catalog::{ArenaSpec, Catalog};
use arena_core::commands::DirectorCommand;
use arena_core::constants::*;
use arena_core::enums::*;
use arena_core::events::DirectorEvent;
use arena_core::state::DirectorSnapshot;
use arena_core::types::Bounds;

use crate::collaborators::{EventSink, StaticLayout};
use crate::config::{ConfigError, DirectorConfig};
use crate::engine::Director;

/// No bursts, schools or modifiers: one spawn per interval.
fn quiet_config() -> DirectorConfig {
    DirectorConfig {
        burst_chance: 0.0,
        school_chance: 0.0,
        modifier_chance: 0.0,
        ..Default::default()
    }
}

fn started(config: DirectorConfig, catalog: Catalog) -> Director {
    let mut director = Director::with_catalog(config, catalog);
    director.queue_command(DirectorCommand::StartRun);
    director
}

fn kill_live_enemies(director: &mut Director) {
    let handles = director.live_enemies();
    director.queue_commands(
        handles
            .into_iter()
            .map(|handle| DirectorCommand::EnemyDied { handle }),
    );
}

/// Tick until `stop` holds, collecting every event on the way.
fn drive(
    director: &mut Director,
    max_ticks: u32,
    kill: bool,
    mut stop: impl FnMut(&DirectorSnapshot) -> bool,
) -> (DirectorSnapshot, Vec<DirectorEvent>) {
    let mut events = Vec::new();
    for _ in 0..max_ticks {
        if kill {
            kill_live_enemies(director);
        }
        let snapshot = director.tick();
        events.extend(snapshot.events.iter().cloned());
        if stop(&snapshot) {
            return (snapshot, events);
        }
    }
    panic!(
        "condition not reached in {} ticks (state {:?}, wave {})",
        max_ticks,
        director.wave_state(),
        director.wave()
    );
}

fn spawned(events: &[DirectorEvent]) -> Vec<EnemyKind> {
    events
        .iter()
        .filter_map(|event| match event {
            DirectorEvent::EnemySpawned { kind, .. } => Some(*kind),
            _ => None,
        })
        .collect()
}

fn spawn_exhausted(snapshot: &DirectorSnapshot) -> bool {
    snapshot
        .spawn
        .as_ref()
        .is_some_and(|wave| wave.budget.is_exhausted())
}

/// A single non-chase arena whose boss follows its only wave.
fn one_arena_catalog() -> Catalog {
    one_arena_catalog_with(BossArchetypeId::Colossus)
}

fn one_arena_catalog_with(boss: BossArchetypeId) -> Catalog {
    let mut catalog = Catalog::builtin();
    catalog.arenas = vec![ArenaSpec {
        id: 1,
        waves: 1,
        half_extent: 24.0,
        boss,
        chase: None,
    }];
    catalog
}

/// Drive to the boss fight and skip its intro.
fn boss_fight(director: &mut Director) -> DirectorSnapshot {
    drive(director, 5000, true, |s| s.wave_state == WaveState::BossIntro);
    director.queue_command(DirectorCommand::SkipCutscene);
    director.tick()
}

fn count(events: &[DirectorEvent], wanted: &DirectorEvent) -> usize {
    events.iter().filter(|e| *e == wanted).count()
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let config = DirectorConfig {
        seed: 12345,
        ..Default::default()
    };
    let mut a = started(config.clone(), Catalog::builtin());
    let mut b = started(config, Catalog::builtin());

    for tick in 0..1500 {
        if tick % 40 == 0 {
            kill_live_enemies(&mut a);
            kill_live_enemies(&mut b);
        }
        let json_a = serde_json::to_string(&a.tick()).unwrap();
        let json_b = serde_json::to_string(&b.tick()).unwrap();
        assert_eq!(json_a, json_b, "snapshots diverged with the same seed");
    }
}

#[test]
fn test_determinism_different_seeds() {
    let mut a = started(
        DirectorConfig {
            seed: 111,
            ..Default::default()
        },
        Catalog::builtin(),
    );
    let mut b = started(
        DirectorConfig {
            seed: 222,
            ..Default::default()
        },
        Catalog::builtin(),
    );

    let mut diverged = false;
    for _ in 0..600 {
        let json_a = serde_json::to_string(&a.tick()).unwrap();
        let json_b = serde_json::to_string(&b.tick()).unwrap();
        if json_a != json_b {
            diverged = true;
            break;
        }
    }
    assert!(diverged, "different seeds should produce divergent output");
}

// ---- Wave flow ----

#[test]
fn test_start_run_enters_lesson_intro() {
    let mut director = started(quiet_config(), Catalog::builtin());
    let snapshot = director.tick();

    assert_eq!(snapshot.run_phase, RunPhase::Running);
    assert_eq!(snapshot.wave_state, WaveState::WaveIntro);
    assert_eq!((snapshot.arena, snapshot.wave), (1, 1));
    assert!(snapshot.events.contains(&DirectorEvent::WaveStarted {
        arena: 1,
        wave: 1,
        wave_type: WaveType::Lesson,
    }));
    let spawn = snapshot.spawn.unwrap();
    assert_eq!(spawn.pool, vec![EnemyKind::Grunt]);
    assert!(snapshot.chase.is_some());
}

#[test]
fn test_intro_lasts_its_frames() {
    let mut director = started(quiet_config(), Catalog::builtin());
    for _ in 0..WAVE_INTRO_FRAMES - 1 {
        assert_eq!(director.tick().wave_state, WaveState::WaveIntro);
    }
    assert_eq!(director.tick().wave_state, WaveState::WaveActive);
}

#[test]
fn test_lesson_budget_spent_in_five_spawns() {
    let mut catalog = Catalog::builtin();
    catalog.budget_templates.lesson.total = 100;
    let mut director = started(quiet_config(), catalog);

    let (snapshot, events) = drive(&mut director, 3000, false, spawn_exhausted);

    // Grunts cost 20 points: 100 buys exactly five.
    assert_eq!(spawned(&events), vec![EnemyKind::Grunt; 5]);
    let budget = snapshot.spawn.unwrap().budget;
    assert_eq!(budget.spawn_count, 5);
    assert_eq!(budget.remaining, 0);
    assert_eq!(budget.cognitive_used, 1);
    assert_eq!(director.live_enemies().len(), 5);
}

#[test]
fn test_wave_clears_only_after_kills() {
    let mut director = started(quiet_config(), Catalog::builtin());
    drive(&mut director, 3000, false, spawn_exhausted);

    for _ in 0..300 {
        assert_eq!(director.tick().wave_state, WaveState::WaveActive);
    }

    kill_live_enemies(&mut director);
    let snapshot = director.tick();
    assert_eq!(snapshot.wave_state, WaveState::WaveClear);
    assert!(snapshot
        .events
        .contains(&DirectorEvent::WaveCleared { arena: 1, wave: 1 }));
    assert!(snapshot.spawn.is_none());
    assert_eq!(snapshot.live_enemies, 0);
}

#[test]
fn test_next_wave_follows_the_clear_beat() {
    let mut director = started(quiet_config(), Catalog::builtin());
    drive(&mut director, 3000, true, |s| s.wave_state == WaveState::WaveClear);

    for _ in 0..WAVE_CLEAR_FRAMES - 1 {
        assert_eq!(director.tick().wave_state, WaveState::WaveClear);
    }
    let snapshot = director.tick();
    assert_eq!(snapshot.wave_state, WaveState::WaveIntro);
    assert_eq!(snapshot.wave, 2);
    assert!(snapshot.events.contains(&DirectorEvent::WaveStarted {
        arena: 1,
        wave: 2,
        wave_type: WaveType::Integration,
    }));
}

#[test]
fn test_stress_pause_halts_and_resumes_spawning() {
    let mut catalog = Catalog::builtin();
    catalog.budget_templates.lesson.total = 100;
    let config = DirectorConfig {
        stress_threshold: 2,
        ..quiet_config()
    };
    let mut director = started(config, catalog);

    let (_, events) = drive(&mut director, 3000, false, |s| {
        s.events.contains(&DirectorEvent::StressPauseStarted { live_enemies: 2 })
    });
    assert_eq!(spawned(&events).len(), 2);

    for _ in 0..400 {
        let snapshot = director.tick();
        assert!(spawned(&snapshot.events).is_empty());
        assert!(snapshot.spawn.unwrap().stress_paused);
    }

    kill_live_enemies(&mut director);
    let snapshot = director.tick();
    assert!(snapshot.events.contains(&DirectorEvent::StressPauseEnded));
    assert!(!snapshot.spawn.unwrap().stress_paused);
}

// ---- Spawn pacing ----

#[test]
fn test_breathers_halt_spawning_and_always_end() {
    let mut catalog = Catalog::builtin();
    catalog.budget_templates.lesson.total = 100;
    let config = DirectorConfig {
        breather_every_spawns: 2,
        breather_frames: 30,
        ..quiet_config()
    };
    let mut director = started(config, catalog);

    let mut open_since = None;
    let (mut started_n, mut ended_n) = (0, 0);
    let mut after_exhaustion = 0;
    for tick in 0..5000u32 {
        let snapshot = director.tick();
        let spawns = spawned(&snapshot.events).len();
        if open_since.is_some() && !snapshot.events.contains(&DirectorEvent::BreatherEnded) {
            assert_eq!(spawns, 0, "spawned during a breather at tick {tick}");
        }
        if snapshot.events.contains(&DirectorEvent::BreatherEnded) {
            let since = open_since.take().expect("breather ended without starting");
            assert_eq!(tick - since, 30);
            assert_eq!(spawns, 0);
            ended_n += 1;
        }
        if snapshot.events.contains(&DirectorEvent::BreatherStarted) {
            assert!(open_since.is_none());
            assert!(spawns > 0);
            open_since = Some(tick);
            started_n += 1;
        }
        if spawn_exhausted(&snapshot) {
            after_exhaustion += 1;
            if after_exhaustion > 500 {
                assert!(!snapshot.spawn.unwrap().in_breather);
                break;
            }
        }
    }

    // Five Grunts: breathers after the second and fourth, none after the last.
    assert_eq!((started_n, ended_n), (2, 2));
    assert_eq!(director.live_enemies().len(), 5);
}

#[test]
fn test_last_spawn_of_the_budget_opens_no_breather() {
    let mut catalog = Catalog::builtin();
    catalog.budget_templates.lesson.total = 100;
    let config = DirectorConfig {
        breather_every_spawns: 5,
        breather_frames: 30,
        ..quiet_config()
    };
    let mut director = started(config, catalog);

    let (_, mut events) = drive(&mut director, 3000, false, spawn_exhausted);
    for _ in 0..500 {
        let snapshot = director.tick();
        assert!(!snapshot.spawn.unwrap().in_breather);
        events.extend(snapshot.events);
    }
    assert_eq!(spawned(&events).len(), 5);
    assert_eq!(
        count(&events, &DirectorEvent::BreatherStarted),
        count(&events, &DirectorEvent::BreatherEnded)
    );
}

#[test]
fn test_bursts_spawn_several_within_budget() {
    let mut catalog = Catalog::builtin();
    catalog.budget_templates.lesson.total = 100;
    let grunt_cost = catalog.enemy(EnemyKind::Grunt).unwrap().cost.total();
    let config = DirectorConfig {
        burst_chance: 1.0,
        ..quiet_config()
    };
    let mut director = started(config, catalog);

    let mut per_tick = Vec::new();
    for _ in 0..3000 {
        let snapshot = director.tick();
        let spawns = spawned(&snapshot.events).len() as u32;
        if spawns > 0 {
            per_tick.push(spawns);
        }
        if let Some(wave) = &snapshot.spawn {
            let budget = wave.budget;
            assert_eq!(budget.remaining, budget.total - grunt_cost * budget.spawn_count);
        }
        if spawn_exhausted(&snapshot) {
            break;
        }
    }

    assert_eq!(per_tick.iter().sum::<u32>(), 5);
    assert!(per_tick.iter().all(|n| *n <= BURST_MAX));
    assert!(per_tick[0] >= BURST_MIN, "first attempt should burst: {per_tick:?}");
}

#[test]
fn test_school_is_charged_as_one_spawn_and_capped() {
    let mut catalog = Catalog::builtin();
    catalog.budget_templates.lesson.total = 400;
    for enemy in &mut catalog.enemies {
        enemy.schoolable = enemy.kind == EnemyKind::Grunt;
    }
    let config = DirectorConfig {
        school_chance: 1.0,
        max_active_schools: 1,
        school_size: 4,
        stress_threshold: 100,
        breather_every_spawns: 0,
        ..quiet_config()
    };
    let mut director = started(config, catalog);

    let mut previous = (0, 400);
    let mut leader = None;
    let mut events = Vec::new();
    for _ in 0..10_000 {
        let snapshot = director.tick();
        let Some(wave) = &snapshot.spawn else {
            continue;
        };
        let budget = wave.budget;
        for event in &snapshot.events {
            if let DirectorEvent::SchoolSpawned {
                leader: handle,
                kind,
                followers,
            } = event
            {
                assert_eq!(*kind, EnemyKind::Grunt);
                assert_eq!(*followers, 3);
                assert_eq!(budget.spawn_count - previous.0, 4);
                assert_eq!(previous.1 - budget.remaining, 80);
                leader = Some(*handle);
            }
        }
        events.extend(snapshot.events.iter().cloned());
        previous = (budget.spawn_count, budget.remaining);
        if budget.is_exhausted() {
            break;
        }
    }

    // The first attempt schools; with the leader alive the cap forces singles.
    let schools = events
        .iter()
        .filter(|e| matches!(e, DirectorEvent::SchoolSpawned { .. }))
        .count();
    assert_eq!(schools, 1);
    assert_eq!(spawned(&events).len(), 20);

    let leader = leader.expect("no school spawned");
    director.queue_command(DirectorCommand::EnemyDied { handle: leader });
    let snapshot = director.tick();
    assert!(snapshot
        .events
        .iter()
        .any(|e| matches!(e, DirectorEvent::SchoolLeaderPromoted { school_id: 0, .. })));
}

#[test]
fn test_cognitive_cap_holds_at_every_commit() {
    let catalog = Catalog::builtin();
    let config = DirectorConfig {
        seed: 9,
        start_arena: 2,
        burst_chance: 0.5,
        school_chance: 0.3,
        modifier_chance: 0.3,
        ..Default::default()
    };
    let mut director = started(config, catalog.clone());

    let mut kinds: BTreeSet<EnemyKind> = BTreeSet::new();
    let mut widest_wave = 0;
    let mut total_spawns = 0;
    for _ in 0..40_000 {
        kill_live_enemies(&mut director);
        let snapshot = director.tick();
        if snapshot
            .events
            .iter()
            .any(|e| matches!(e, DirectorEvent::WaveStarted { .. }))
        {
            kinds.clear();
        }
        let fresh = spawned(&snapshot.events);
        total_spawns += fresh.len();
        kinds.extend(fresh);
        widest_wave = widest_wave.max(kinds.len());

        if let Some(wave) = &snapshot.spawn {
            let budget = wave.budget;
            assert!(budget.cognitive_used <= budget.cognitive_max, "{budget:?}");
            assert!(budget.remaining <= budget.total);
            let charged: u32 = kinds
                .iter()
                .map(|kind| catalog.enemy(*kind).unwrap().cost.cognitive)
                .sum();
            assert_eq!(charged, budget.cognitive_used);
        }
        if snapshot.wave_state == WaveState::BossIntro {
            break;
        }
    }

    assert_eq!(director.wave_state(), WaveState::BossIntro);
    assert!(total_spawns > 0);
    assert!(widest_wave >= 2, "no wave drew from more than one type");
}

#[test]
fn test_static_layout_keeps_spawns_off_obstacles() {
    let obstacles = vec![
        Bounds::new(Vec2::new(-1.0, 17.0), Vec2::new(1.0, 19.0)),
        Bounds::around(Vec2::new(0.0, -18.0), 1.0),
        Bounds::around(Vec2::new(18.0, 0.0), 1.0),
        Bounds::around(Vec2::new(-18.0, 0.0), 1.0),
    ];
    let layout = StaticLayout {
        obstacles: obstacles.clone(),
        pillars: Vec::new(),
    };
    let config = DirectorConfig {
        burst_chance: 0.5,
        ..quiet_config()
    };
    let mut director = Director::with_catalog(config, Catalog::builtin()).with_spatial(layout);
    director.queue_command(DirectorCommand::StartRun);

    let (_, events) = drive(&mut director, 20_000, true, |s| s.wave == 3);
    let positions: Vec<Vec2> = events
        .iter()
        .filter_map(|event| match event {
            DirectorEvent::EnemySpawned { position, .. } => Some(*position),
            _ => None,
        })
        .collect();
    assert!(!positions.is_empty());
    for position in positions {
        assert!(
            !obstacles.iter().any(|b| b.contains(position)),
            "spawn at {position:?} overlaps an obstacle"
        );
    }
}

#[test]
fn test_modifier_announcement_freezes_the_wave() {
    let config = DirectorConfig {
        modifier_chance: 1.0,
        ..quiet_config()
    };
    let mut director = started(config, Catalog::builtin());

    let (snapshot, _) = drive(&mut director, 5000, true, |s| s.wave == 2);
    assert!(snapshot.announcing);
    assert!(snapshot
        .events
        .iter()
        .any(|e| matches!(e, DirectorEvent::ModifierAnnounced { .. })));
    assert!(snapshot.spawn.unwrap().modifier.is_some());

    let intro_left = director.context().state_timer.remaining();
    for _ in 0..ANNOUNCEMENT_FRAMES - 1 {
        let snapshot = director.tick();
        assert!(snapshot.announcing);
    }
    assert_eq!(director.context().state_timer.remaining(), intro_left);

    let snapshot = director.tick();
    assert!(!snapshot.announcing);
    assert_eq!(director.context().state_timer.remaining(), intro_left);
    director.tick();
    assert_eq!(director.context().state_timer.remaining(), intro_left - 1);
}

// ---- Run control ----

/// Shares the events it sees with the test body.
struct SharedSink(Rc<RefCell<Vec<DirectorEvent>>>);

impl EventSink for SharedSink {
    fn emit(&mut self, event: &DirectorEvent) {
        self.0.borrow_mut().push(event.clone());
    }
}

#[test]
fn test_sinks_see_every_snapshot_event() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut director = started(quiet_config(), Catalog::builtin());
    director.add_sink(SharedSink(Rc::clone(&seen)));

    let mut from_snapshots = Vec::new();
    for _ in 0..600 {
        from_snapshots.extend(director.tick().events);
    }
    assert!(!from_snapshots.is_empty());
    assert_eq!(*seen.borrow(), from_snapshots);
}

#[test]
fn test_pause_freezes_everything() {
    let mut director = started(quiet_config(), Catalog::builtin());
    for _ in 0..10 {
        director.tick();
    }
    let time = director.time().tick;
    let timer = director.context().state_timer.remaining();

    director.queue_command(DirectorCommand::Pause);
    for _ in 0..50 {
        let snapshot = director.tick();
        assert!(snapshot.paused);
    }
    assert_eq!(director.time().tick, time);
    assert_eq!(director.context().state_timer.remaining(), timer);

    director.queue_command(DirectorCommand::Resume);
    director.tick();
    assert_eq!(director.time().tick, time + 1);
    assert_eq!(director.context().state_timer.remaining(), timer - 1);
}

#[test]
fn test_commands_before_start_are_ignored() {
    let mut director = Director::new(quiet_config());
    director.queue_commands([
        DirectorCommand::Pause,
        DirectorCommand::RestartArena,
        DirectorCommand::DamageBoss { amount: 100.0 },
    ]);
    let snapshot = director.tick();
    assert_eq!(snapshot.run_phase, RunPhase::NotStarted);
    assert!(!snapshot.paused);
    assert_eq!(snapshot.time.tick, 0);
    assert!(snapshot.events.is_empty());
}

#[test]
fn test_restart_arena_returns_to_lesson() {
    let mut director = started(quiet_config(), Catalog::builtin());
    drive(&mut director, 3000, false, |s| s.live_enemies >= 2);

    director.queue_command(DirectorCommand::RestartArena);
    let snapshot = director.tick();
    assert_eq!(snapshot.wave_state, WaveState::WaveIntro);
    assert_eq!(snapshot.wave, 1);
    assert_eq!(snapshot.live_enemies, 0);
    assert!(director.world().is_empty());
    assert_eq!(snapshot.chase.unwrap().encounter_count, 0);
    assert!(snapshot.events.contains(&DirectorEvent::WaveStarted {
        arena: 1,
        wave: 1,
        wave_type: WaveType::Lesson,
    }));
}

#[test]
fn test_stale_and_repeated_deaths_are_ignored() {
    let mut director = started(quiet_config(), Catalog::builtin());
    drive(&mut director, 3000, false, |s| s.live_enemies == 1);
    let handle = director.live_enemies()[0];

    director.queue_commands([
        DirectorCommand::EnemyDied { handle },
        DirectorCommand::EnemyDied { handle },
    ]);
    director.tick();
    assert!(director.live_enemies().is_empty());

    director.queue_command(DirectorCommand::EnemyDied { handle });
    director.tick();
    assert!(director.live_enemies().is_empty());
}

#[test]
fn test_start_arena_is_clamped_to_the_catalog() {
    let director = Director::new(DirectorConfig {
        start_arena: 99,
        ..Default::default()
    });
    assert_eq!(director.config().start_arena, 4);
}

// ---- Boss flow ----

#[test]
fn test_skip_cutscene_spawns_boss_immediately() {
    let mut director = started(quiet_config(), one_arena_catalog());
    let (_, events) = drive(&mut director, 5000, true, |s| {
        s.wave_state == WaveState::BossIntro
    });
    assert!(events.contains(&DirectorEvent::BossIntroStarted {
        arena: 1,
        boss: BossArchetypeId::Colossus,
    }));

    director.queue_command(DirectorCommand::SkipCutscene);
    let snapshot = director.tick();
    assert_eq!(snapshot.wave_state, WaveState::BossActive);
    assert!(snapshot
        .events
        .iter()
        .any(|e| matches!(e, DirectorEvent::BossSpawned { boss: BossArchetypeId::Colossus, .. })));
    let boss = snapshot.boss.unwrap();
    assert_eq!(boss.phase, BossPhase::One);
    assert_eq!(boss.health, boss.max_health);
}

#[test]
fn test_boss_intro_runs_full_length_without_skip() {
    let mut director = started(quiet_config(), one_arena_catalog());
    drive(&mut director, 5000, true, |s| s.wave_state == WaveState::BossIntro);
    for _ in 0..BOSS_INTRO_FRAMES - 1 {
        assert_eq!(director.tick().wave_state, WaveState::BossIntro);
    }
    assert_eq!(director.tick().wave_state, WaveState::BossActive);
}

#[test]
fn test_defeating_the_last_boss_completes_the_run() {
    let mut director = started(quiet_config(), one_arena_catalog());
    drive(&mut director, 5000, true, |s| s.wave_state == WaveState::BossIntro);
    director.queue_command(DirectorCommand::SkipCutscene);
    director.tick();

    director.queue_command(DirectorCommand::DamageBoss { amount: 5000.0 });
    let snapshot = director.tick();
    assert_eq!(snapshot.wave_state, WaveState::BossDefeated);
    assert!(snapshot.events.contains(&DirectorEvent::BossDefeated {
        boss: BossArchetypeId::Colossus,
    }));

    let (snapshot, events) = drive(&mut director, 1000, false, |s| {
        s.run_phase == RunPhase::Complete
    });
    assert!(events.contains(&DirectorEvent::ArenaCompleted { arena: 1 }));
    assert!(snapshot.events.contains(&DirectorEvent::RunCompleted));
    assert!(snapshot.boss.is_none());

    // A finished run can be started again.
    director.queue_command(DirectorCommand::StartRun);
    let snapshot = director.tick();
    assert_eq!(snapshot.run_phase, RunPhase::Running);
    assert_eq!((snapshot.arena, snapshot.wave), (1, 1));
}

#[test]
fn test_defeat_advances_to_the_next_arena() {
    let config = DirectorConfig {
        start_arena: 2,
        ..quiet_config()
    };
    let mut catalog = Catalog::builtin();
    catalog.arenas[1].waves = 1;
    let mut director = started(config, catalog);

    drive(&mut director, 5000, true, |s| s.wave_state == WaveState::BossIntro);
    director.queue_command(DirectorCommand::SkipCutscene);
    director.tick();
    director.queue_command(DirectorCommand::DamageBoss { amount: 5000.0 });

    let (snapshot, _) = drive(&mut director, 1000, false, |s| s.arena == 3);
    assert_eq!(snapshot.wave, 1);
    assert_eq!(snapshot.wave_state, WaveState::WaveIntro);
    assert!(snapshot.events.contains(&DirectorEvent::WaveStarted {
        arena: 3,
        wave: 1,
        wave_type: WaveType::Lesson,
    }));
    assert_eq!(snapshot.spawn.unwrap().pool, vec![EnemyKind::Tank]);
}

#[test]
fn test_split_boss_falls_only_with_its_fragments() {
    let mut director = started(quiet_config(), one_arena_catalog_with(BossArchetypeId::Hivemind));
    let snapshot = boss_fight(&mut director);
    assert_eq!(snapshot.wave_state, WaveState::BossActive);

    // 500 of 1400 is under the 40% split line.
    director.queue_command(DirectorCommand::DamageBoss { amount: 900.0 });
    let snapshot = director.tick();
    assert!(snapshot
        .events
        .contains(&DirectorEvent::BossFragmented { copies: 3 }));
    let boss = snapshot.boss.unwrap();
    assert_eq!(boss.live_fragments, 3);
    assert!((boss.fragment_health - 450.0).abs() < 1e-3);
    assert_eq!(snapshot.live_enemies, 3);

    director.queue_command(DirectorCommand::DamageBoss { amount: 1000.0 });
    for _ in 0..60 {
        let snapshot = director.tick();
        assert_eq!(snapshot.wave_state, WaveState::BossActive);
        assert_eq!(snapshot.boss.unwrap().health, 0.0);
        assert!(!snapshot
            .events
            .iter()
            .any(|e| matches!(e, DirectorEvent::BossDefeated { .. })));
    }

    kill_live_enemies(&mut director);
    let snapshot = director.tick();
    assert_eq!(snapshot.wave_state, WaveState::BossDefeated);
    assert!(snapshot.events.contains(&DirectorEvent::BossDefeated {
        boss: BossArchetypeId::Hivemind,
    }));
    assert_eq!(snapshot.boss.map_or(0.0, |boss| boss.fragment_health), 0.0);
}

#[test]
fn test_pillar_perch_uses_the_arena_layout() {
    let layout = StaticLayout {
        obstacles: Vec::new(),
        pillars: vec![Vec2::new(-10.0, 4.0), Vec2::new(5.0, 5.0)],
    };
    let mut director = Director::with_catalog(
        quiet_config(),
        one_arena_catalog_with(BossArchetypeId::Warden),
    )
    .with_spatial(layout);
    director.queue_command(DirectorCommand::StartRun);
    boss_fight(&mut director);

    // The Warden appears at (0, 12); (5, 5) is the closer pillar.
    let perch = |event: &DirectorEvent| match event {
        DirectorEvent::BossAbilityExecuted {
            ability: Ability::PillarPerch,
            target,
        } => Some(*target),
        _ => None,
    };
    let (snapshot, _) = drive(&mut director, 20_000, false, |s| {
        s.events.iter().any(|e| perch(e).is_some())
    });
    let target = snapshot.events.iter().find_map(perch).unwrap();
    assert_eq!(target, Vec2::new(5.0, 5.0));
}

#[test]
fn test_damage_outside_the_fight_is_ignored() {
    let mut director = started(quiet_config(), one_arena_catalog());
    drive(&mut director, 5000, true, |s| s.wave_state == WaveState::BossIntro);
    director.queue_command(DirectorCommand::DamageBoss { amount: 5000.0 });
    director.tick();
    assert!(director.boss_state().is_none());
    assert_eq!(director.wave_state(), WaveState::BossIntro);
}

// ---- Chase encounters ----

#[test]
fn test_chase_boss_retreats_and_returns_stronger() {
    let mut director = started(quiet_config(), Catalog::builtin());

    // Segment one: three waves, then the first encounter.
    let (snapshot, events) = drive(&mut director, 20_000, true, |s| {
        s.wave_state == WaveState::BossActive
    });
    assert_eq!(snapshot.wave, 3);
    let exams = events
        .iter()
        .filter(|e| matches!(e, DirectorEvent::WaveStarted { wave_type: WaveType::Exam, .. }))
        .count();
    assert_eq!(exams, 1);
    let boss = snapshot.boss.unwrap();
    assert_eq!(boss.archetype, BossArchetypeId::Warden);
    assert_eq!(boss.phase, BossPhase::One);
    assert_eq!(boss.health, 1200.0);

    // 700 is under the phase-one threshold of 792.
    director.queue_command(DirectorCommand::DamageBoss { amount: 500.0 });
    let snapshot = director.tick();
    assert_eq!(snapshot.wave_state, WaveState::BossRetreat);
    assert!(snapshot.events.contains(&DirectorEvent::BossRetreated {
        health: 700.0,
        waves_until_return: 2,
    }));
    assert!(snapshot.boss.unwrap().invulnerable);
    let chase = snapshot.chase.unwrap();
    assert_eq!(chase.segment, 1);
    assert_eq!(chase.phase_to_spawn, BossPhase::Two);
    assert_eq!(chase.persistent_health, Some(700.0));

    let (snapshot, _) = drive(&mut director, 1000, false, |s| {
        s.wave_state == WaveState::WaveIntro
    });
    assert_eq!(snapshot.wave, 4);
    assert!(snapshot.boss.is_none());

    // Segment two: two waves, then the boss returns locked to phase two.
    let (snapshot, _) = drive(&mut director, 20_000, true, |s| {
        s.wave_state == WaveState::BossActive
    });
    assert_eq!(snapshot.wave, 5);
    let boss = snapshot.boss.unwrap();
    assert_eq!(boss.phase, BossPhase::Two);
    assert_eq!(boss.health, 700.0);
    assert_eq!(snapshot.chase.unwrap().encounter_count, 2);
}

// ---- Configuration ----

#[test]
fn test_partial_config_json_uses_defaults() {
    let config = DirectorConfig::from_json_str(r#"{ "seed": 7, "stress_threshold": 4 }"#).unwrap();
    assert_eq!(config.seed, 7);
    assert_eq!(config.stress_threshold, 4);
    assert_eq!(config.breather_every_spawns, DEFAULT_BREATHER_EVERY_SPAWNS);
    assert_eq!(config.school_policy, SchoolPolicy::Promote);
}

#[test]
fn test_invalid_config_is_rejected() {
    assert!(matches!(
        DirectorConfig::from_json_str(r#"{ "burst_chance": 2.0 }"#),
        Err(ConfigError::InvalidChance {
            name: "burst_chance",
            ..
        })
    ));
    assert!(matches!(
        DirectorConfig::from_json_str(r#"{ "start_arena": 0 }"#),
        Err(ConfigError::ZeroStartArena)
    ));
    assert!(matches!(
        DirectorConfig::from_json_str("{ not json"),
        Err(ConfigError::Parse(_))
    ));
}
