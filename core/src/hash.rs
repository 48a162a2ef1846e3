use sha2::{Digest, Sha256};

use crate::fighter::Fighter;
use crate::recording::RecordedRound;
use crate::types::RoundStateType;

/// SHA-256 fingerprint of a recorded round. Equal inputs, equal hash.
pub fn hash_recording(round: &RecordedRound) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update((round.len() as u64).to_le_bytes());
    for (p1, p2) in round.fighter1.iter().zip(&round.fighter2) {
        for sample in [p1, p2] {
            hasher.update([sample.buttons]);
            hasher.update(sample.time.to_le_bytes());
        }
    }
    hasher.finalize().into()
}

/// SHA-256 over the observable simulation state, for determinism checks.
pub fn hash_battle_state(
    round_state: RoundStateType,
    frame_count: i64,
    round_won: [u32; 2],
    fighters: &[Fighter; 2],
) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update([round_state as u8]);
    hasher.update(frame_count.to_le_bytes());
    for won in round_won {
        hasher.update(won.to_le_bytes());
    }
    for f in fighters {
        hasher.update(f.position().x.to_le_bytes());
        hasher.update(f.position().y.to_le_bytes());
        hasher.update([f.is_face_right() as u8]);
        hasher.update(f.current_action_id().to_le_bytes());
        hasher.update(f.current_action_frame().to_le_bytes());
        hasher.update(f.vital_health().to_le_bytes());
        hasher.update(f.guard_health().to_le_bytes());
        hasher.update(f.hit_stun_frame().to_le_bytes());
        hasher.update(f.sprite_shake_position().to_le_bytes());
    }
    hasher.finalize().into()
}
