//! Plays CPU rounds until the first KO and prints the recorded input as JSON.
//!
//! Usage:
//!   cargo run -p footsies-core --example cpu-round -- [seed] > round.json

use footsies_core::*;

fn main() {
    let seed: u32 = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);

    let mut config = default_config(seed);
    config.controllers = [Controller::Cpu, Controller::Cpu];

    let mut battle = Battle::new(config, [standard_fighter(), standard_fighter()]).unwrap();

    // Cap at ten minutes of simulation in case neither side lands a special
    let max_ticks = 60 * 60 * 10;
    let mut hits = 0;
    for _ in 0..max_ticks {
        battle.tick(&NoInput);
        hits += battle
            .drain_events()
            .iter()
            .filter(|e| matches!(e, BattleEvent::Damage(_)))
            .count();
        if battle.round_state() == RoundStateType::KO {
            break;
        }
    }

    eprintln!("=== CPU round (seed {}) ===", seed);
    eprintln!("State: {:?}", battle.round_state());
    eprintln!("Fight frames: {}", battle.frame_count() + 1);
    eprintln!("Hits: {}", hits);
    for side in Side::BOTH {
        let f = battle.fighter(side);
        eprintln!(
            "{:?}: x={:.2} action={} vital={} guard={}",
            side,
            f.position().x,
            f.current_action_id(),
            f.vital_health(),
            f.guard_health()
        );
    }

    // Without a KO the round was never snapshotted; fall back to the live recording
    let round = if battle.round_state() == RoundStateType::KO {
        battle.last_round()
    } else {
        battle.recording()
    };
    let hash = hash_recording(round);
    eprintln!("Recording: {} steps, sha256 {}", round.len(), to_hex(&hash));

    println!("{}", serde_json::to_string(round).unwrap());
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
