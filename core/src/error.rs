use thiserror::Error;

use crate::types::{ActionId, AttackId};

/// Configuration-time problems found while setting up a battle.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    #[error("fighter has no actions")]
    EmptyActionTable,

    #[error("required action {action_id} is not registered")]
    MissingAction { action_id: ActionId },

    #[error("action {action_id} is registered under key {key}")]
    MismatchedActionKey { key: ActionId, action_id: ActionId },

    #[error("action {action_id} has zero frames")]
    ZeroFrameCount { action_id: ActionId },

    #[error("action {action_id} loops from frame {loop_from_frame} but has {frame_count} frames")]
    LoopFrameOutOfRange {
        action_id: ActionId,
        loop_from_frame: u32,
        frame_count: u32,
    },

    #[error("stand action has no pushbox on frame 0")]
    MissingStandPushbox,

    #[error("action {action_id} cancels into unregistered action {target}")]
    UnknownCancelTarget { action_id: ActionId, target: ActionId },

    #[error("attack {attack_id} reacts with unregistered action {target}")]
    UnknownReactionAction { attack_id: AttackId, target: ActionId },

    #[error("attack {attack_id} must hit at least once")]
    ZeroHitCount { attack_id: AttackId },

    #[error("{gesture} window of {frames} frames needs more than the {limit} recorded input frames")]
    GestureWindowTooLong {
        gesture: &'static str,
        frames: usize,
        limit: usize,
    },

    #[error("invalid battle config: {0}")]
    InvalidConfig(String),
}
