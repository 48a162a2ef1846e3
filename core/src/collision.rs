use tracing::{debug, warn};

use crate::fighter::Fighter;
use crate::geometry::{overlap_center, overlaps};
use crate::types::*;

/// Landed hit plus the cue the attack plays, if any.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitOutcome {
    pub event: DamageEvent,
    pub sound: Option<SoundCue>,
}

/// Test every hitbox of each fighter against the other's hurtboxes.
/// Fighter 1 attacks first, so its hits land before fighter 2's in the same step.
pub fn resolve_hits(fighters: &mut [Fighter; 2]) -> Vec<HitOutcome> {
    let mut outcomes = Vec::new();
    for (attacker, defender) in [(0, 1), (1, 0)] {
        if let Some(outcome) = resolve_attack(fighters, attacker, defender) {
            outcomes.push(outcome);
        }
    }
    outcomes
}

fn resolve_attack(fighters: &mut [Fighter; 2], attacker: usize, defender: usize) -> Option<HitOutcome> {
    let mut in_proximity = false;
    let mut landed = None;

    {
        let (a, d) = (&fighters[attacker], &fighters[defender]);
        'search: for hitbox in a.hitboxes() {
            if !a.can_attack_hit(hitbox.attack_id) {
                continue;
            }
            for hurtbox in d.hurtboxes() {
                if !overlaps(&hitbox.rect, &hurtbox.rect) {
                    continue;
                }
                if hitbox.proximity {
                    in_proximity = true;
                } else {
                    landed = Some((hitbox.attack_id, overlap_center(&hitbox.rect, &hurtbox.rect)));
                    break 'search;
                }
            }
        }
    }

    let Some((attack_id, position)) = landed else {
        if in_proximity {
            fighters[defender].notify_in_proximity_guard_range();
        }
        return None;
    };

    fighters[attacker].notify_attack_hit();

    let Some(attack) = fighters[attacker].definition().attack(attack_id).copied() else {
        warn!(attack_id, "attack hit but attack is not registered");
        return None;
    };

    let result = fighters[defender].notify_damaged(&attack, position);
    let hit_stun = fighters[attacker].hit_stun_frame_for(result, attack_id);
    fighters[attacker].set_hit_stun(hit_stun);
    fighters[defender].set_hit_stun(hit_stun);
    fighters[defender].set_sprite_shake_frame((hit_stun / 3) as i32);

    let side = if defender == 0 { Side::Fighter1 } else { Side::Fighter2 };
    debug!(?side, attack_id, ?result, hit_stun, "attack landed");

    Some(HitOutcome {
        event: DamageEvent {
            defender: side,
            position,
            result,
        },
        sound: attack.sound,
    })
}

/// Separate overlapping pushboxes, splitting the overlap evenly.
/// Fighters sharing the exact same x are left alone.
pub fn push_fighters_apart(fighters: &mut [Fighter; 2]) {
    let r1 = fighters[0].pushbox().rect;
    let r2 = fighters[1].pushbox().rect;
    if !overlaps(&r1, &r2) {
        return;
    }

    let x1 = fighters[0].position().x;
    let x2 = fighters[1].position().x;
    if x1 < x2 {
        let offset = (r1.x_max() - r2.x_min()) / 2.0;
        fighters[0].apply_position_change(-offset, 0.0);
        fighters[1].apply_position_change(offset, 0.0);
    } else if x1 > x2 {
        let offset = (r2.x_max() - r1.x_min()) / 2.0;
        fighters[0].apply_position_change(offset, 0.0);
        fighters[1].apply_position_change(-offset, 0.0);
    }
}

/// Keep both pushboxes inside `[-width/2, width/2]`.
pub fn push_fighters_into_stage(fighters: &mut [Fighter; 2], battle_area_width: f32) {
    for fighter in fighters.iter_mut() {
        push_into_stage(fighter, battle_area_width);
    }
}

fn push_into_stage(fighter: &mut Fighter, battle_area_width: f32) {
    let rect = fighter.pushbox().rect;
    let half = battle_area_width / 2.0;
    if rect.x_min() < -half {
        fighter.apply_position_change(-half - rect.x_min(), 0.0);
    } else if rect.x_max() > half {
        fighter.apply_position_change(half - rect.x_max(), 0.0);
    }
}
