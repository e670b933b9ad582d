//! pacing-report: run the director headless and print the wave/boss timeline.
//!
//! Usage:
//!   pacing-report --seed 7 --arena 2 --ticks 36000 --kill-after 240

use std::collections::BTreeMap;
use std::process;

use arena_core::commands::DirectorCommand;
use arena_core::constants::TICK_RATE;
use arena_core::enums::{RunPhase, WaveState};
use arena_core::events::DirectorEvent;
use arena_core::types::EntityHandle;
use arena_director::{Director, DirectorConfig};

/// Damage the simulated player deals to the boss every tick.
const BOSS_CHIP_PER_TICK: f32 = 2.0;

fn main() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .try_init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "help" || a == "--help" || a == "-h") {
        print_usage();
        return;
    }

    let seed = parse_flag(&args, "--seed", 42u64);
    let arena = parse_flag(&args, "--arena", 1u32);
    let ticks = parse_flag(&args, "--ticks", 60 * 60 * TICK_RATE as u64);
    let kill_after = parse_flag(&args, "--kill-after", 180u64);
    if arena == 0 {
        eprintln!("Error: --arena must be at least 1");
        process::exit(1);
    }

    let config = DirectorConfig {
        seed,
        start_arena: arena,
        ..Default::default()
    };
    run(config, ticks, kill_after);
}

fn print_usage() {
    eprintln!(
        "pacing-report: headless wave/boss timeline for tuning\n\
         \n\
           --seed <N>        RNG seed (default: 42)\n\
           --arena <N>       Starting arena (default: 1)\n\
           --ticks <N>       Maximum ticks to simulate (default: one hour)\n\
           --kill-after <N>  Ticks an enemy survives before the player kills it (default: 180)\n\
         \n\
         Set RUST_LOG=info for the director's own transition log.\n"
    );
}

/// Value following `flag`, or `default` when absent. A malformed value is fatal.
fn parse_flag<T: std::str::FromStr>(args: &[String], flag: &str, default: T) -> T {
    for i in 0..args.len() {
        if args[i] == flag && i + 1 < args.len() {
            match args[i + 1].parse::<T>() {
                Ok(value) => return value,
                Err(_) => {
                    eprintln!("Error: {flag} expects a number, got {}", args[i + 1]);
                    process::exit(1);
                }
            }
        }
    }
    default
}

fn run(config: DirectorConfig, ticks: u64, kill_after: u64) {
    let mut director = Director::new(config);
    director.queue_command(DirectorCommand::StartRun);

    // Tick each live enemy was first seen on.
    let mut first_seen: BTreeMap<EntityHandle, u64> = BTreeMap::new();
    let mut spawns = 0usize;
    let mut peak_live = 0usize;

    for tick in 0..ticks {
        let live = director.live_enemies();
        first_seen.retain(|handle, _| live.contains(handle));
        for handle in &live {
            let seen = *first_seen.entry(*handle).or_insert(tick);
            if tick - seen >= kill_after {
                director.queue_command(DirectorCommand::EnemyDied { handle: *handle });
            }
        }
        if director.wave_state() == WaveState::BossActive {
            director.queue_command(DirectorCommand::DamageBoss {
                amount: BOSS_CHIP_PER_TICK,
            });
        }

        let snapshot = director.tick();
        peak_live = peak_live.max(snapshot.live_enemies);
        for event in &snapshot.events {
            if matches!(event, DirectorEvent::EnemySpawned { .. }) {
                spawns += 1;
            }
            if let Some(line) = describe(event) {
                println!(
                    "[{:>6} {:>7.1}s] a{} w{:<2} {}",
                    snapshot.time.tick,
                    snapshot.time.elapsed_secs,
                    snapshot.arena,
                    snapshot.wave,
                    line
                );
            }
        }
        if snapshot.run_phase == RunPhase::Complete {
            break;
        }
    }

    println!(
        "-- {} ticks, {} spawns, peak {} live enemies, run {:?}",
        director.time().tick,
        spawns,
        peak_live,
        director.run_phase()
    );
}

/// One line for the events that mark a pacing transition.
fn describe(event: &DirectorEvent) -> Option<String> {
    let line = match event {
        DirectorEvent::WaveStarted { wave_type, .. } => format!("wave start ({wave_type:?})"),
        DirectorEvent::WaveCleared { .. } => "wave cleared".to_string(),
        DirectorEvent::ModifierAnnounced { id, text } => format!("modifier {id}: {text}"),
        DirectorEvent::StressPauseStarted { live_enemies } => {
            format!("stress pause at {live_enemies} live")
        }
        DirectorEvent::StressPauseEnded => "stress pause over".to_string(),
        DirectorEvent::SchoolSpawned { kind, followers, .. } => {
            format!("school of {kind:?} (+{followers})")
        }
        DirectorEvent::BossIntroStarted { boss, .. } => format!("boss intro: {boss:?}"),
        DirectorEvent::BossSpawned { boss, phase, health, .. } => {
            format!("{boss:?} spawned in {phase:?} with {health:.0}")
        }
        DirectorEvent::BossComboStarted { abilities } => format!("combo {abilities:?}"),
        DirectorEvent::BossPhaseChanged { phase } => format!("boss phase {phase:?}"),
        DirectorEvent::BossShieldRaised => "boss shielded".to_string(),
        DirectorEvent::BossExposed => "boss exposed".to_string(),
        DirectorEvent::BossFragmented { copies } => format!("boss split into {copies}"),
        DirectorEvent::BossRetreated {
            health,
            waves_until_return,
        } => format!("boss retreated at {health:.0}, back in {waves_until_return} waves"),
        DirectorEvent::BossDefeated { boss } => format!("{boss:?} defeated"),
        DirectorEvent::ArenaCompleted { arena } => format!("arena {arena} complete"),
        DirectorEvent::RunCompleted => "run complete".to_string(),
        _ => return None,
    };
    Some(line)
}
