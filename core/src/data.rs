use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::action::ActionDefinition;
use crate::constants::INPUT_RECORD_FRAME;
use crate::error::DataError;
use crate::geometry::Rect;
use crate::types::*;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttackDefinition {
    pub attack_id: AttackId,
    /// Hits this attack may land during one activation of its action.
    pub number_of_hit: u32,
    pub vital_health_damage: i32,
    pub guard_health_damage: i32,
    pub hit_stun_frame: u32,
    pub guard_stun_frame: u32,
    pub guard_break_stun_frame: u32,
    pub damage_action_id: ActionId,
    pub guard_action_id: ActionId,
    #[serde(default)]
    pub sound: Option<SoundCue>,
}

impl AttackDefinition {
    pub fn stun_frame_for(&self, result: DamageResult) -> u32 {
        match result {
            DamageResult::Guard => self.guard_stun_frame,
            DamageResult::GuardBreak => self.guard_break_stun_frame,
            DamageResult::Damage => self.hit_stun_frame,
        }
    }
}

/// Sprite reference for presentation; the core only passes it through.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MotionDefinition {
    pub motion_id: MotionId,
    pub sprite: String,
}

/// Static per-character bundle, loaded by an external collaborator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FighterDefinition {
    pub name: String,
    pub start_guard_health: i32,
    pub forward_move_speed: f32,
    pub backward_move_speed: f32,
    pub dash_allow_frame: usize,
    pub special_attack_hold_frame: usize,
    pub can_cancel_on_whiff: bool,
    pub base_hurtbox: Rect,
    pub base_pushbox: Rect,
    pub actions: BTreeMap<ActionId, ActionDefinition>,
    pub attacks: BTreeMap<AttackId, AttackDefinition>,
    #[serde(default)]
    pub motions: BTreeMap<MotionId, MotionDefinition>,
}

impl FighterDefinition {
    /// # Panics
    /// If `action_id` is not registered. Requests are a caller contract:
    /// only IDs present in the table (checked by [`validate`](Self::validate)) may be used.
    pub fn action(&self, action_id: ActionId) -> &ActionDefinition {
        &self.actions[&action_id]
    }

    pub fn attack(&self, attack_id: AttackId) -> Option<&AttackDefinition> {
        self.attacks.get(&attack_id)
    }

    pub fn motion(&self, motion_id: MotionId) -> Option<&MotionDefinition> {
        self.motions.get(&motion_id)
    }

    /// Structural checks run once at battle setup.
    pub fn validate(&self) -> Result<(), DataError> {
        if self.actions.is_empty() {
            return Err(DataError::EmptyActionTable);
        }

        for (&key, action) in &self.actions {
            if key != action.action_id {
                return Err(DataError::MismatchedActionKey {
                    key,
                    action_id: action.action_id,
                });
            }
            if action.frame_count == 0 {
                return Err(DataError::ZeroFrameCount { action_id: key });
            }
            if action.is_loop && action.loop_from_frame >= action.frame_count {
                return Err(DataError::LoopFrameOutOfRange {
                    action_id: key,
                    loop_from_frame: action.loop_from_frame,
                    frame_count: action.frame_count,
                });
            }
            for cancel in &action.cancels {
                if let Some(&target) = cancel.action_ids.iter().find(|id| !self.actions.contains_key(id)) {
                    return Err(DataError::UnknownCancelTarget {
                        action_id: key,
                        target,
                    });
                }
            }
            for hitbox in &action.hitboxes {
                if !self.attacks.contains_key(&hitbox.attack_id) {
                    warn!(
                        fighter = %self.name,
                        action_id = key,
                        attack_id = hitbox.attack_id,
                        "hitbox references an unregistered attack"
                    );
                }
            }
        }

        if let Some(&action_id) = action_id::REQUIRED.iter().find(|id| !self.actions.contains_key(id)) {
            return Err(DataError::MissingAction { action_id });
        }

        if self.action(action_id::STAND).pushbox_at(0).is_none() {
            return Err(DataError::MissingStandPushbox);
        }

        // Dash looks back twice its window: the second tap, then the release before it
        if self.dash_allow_frame * 2 > INPUT_RECORD_FRAME {
            return Err(DataError::GestureWindowTooLong {
                gesture: "dash",
                frames: self.dash_allow_frame,
                limit: INPUT_RECORD_FRAME,
            });
        }
        if self.special_attack_hold_frame > INPUT_RECORD_FRAME {
            return Err(DataError::GestureWindowTooLong {
                gesture: "special attack hold",
                frames: self.special_attack_hold_frame,
                limit: INPUT_RECORD_FRAME,
            });
        }

        for attack in self.attacks.values() {
            if attack.number_of_hit == 0 {
                return Err(DataError::ZeroHitCount {
                    attack_id: attack.attack_id,
                });
            }
        }

        Ok(())
    }

    /// Reaction actions of this character's attacks are played by the
    /// opponent, so they must exist in the opponent's table.
    pub fn validate_reactions(&self, opponent: &FighterDefinition) -> Result<(), DataError> {
        for attack in self.attacks.values() {
            for target in [attack.damage_action_id, attack.guard_action_id] {
                if !opponent.actions.contains_key(&target) {
                    return Err(DataError::UnknownReactionAction {
                        attack_id: attack.attack_id,
                        target,
                    });
                }
            }
        }
        Ok(())
    }
}
