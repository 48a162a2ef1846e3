use serde::{Deserialize, Serialize};

use crate::geometry::Rect;
use crate::types::{ActionId, AttackId, MotionId, SoundCue};

/// Closed frame interval `[start, end]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRange {
    pub start: u32,
    pub end: u32,
}

impl FrameRange {
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, frame: u32) -> bool {
        frame >= self.start && frame <= self.end
    }
}

// ── Frame data entries ──────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MotionFrame {
    pub frames: FrameRange,
    pub motion_id: MotionId,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatusFrame {
    pub frames: FrameRange,
    pub counter_hit: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HitboxFrame {
    pub frames: FrameRange,
    pub rect: Rect,
    pub attack_id: AttackId,
    pub proximity: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HurtboxFrame {
    pub frames: FrameRange,
    pub rect: Rect,
    pub use_base_rect: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PushboxFrame {
    pub frames: FrameRange,
    pub rect: Rect,
    pub use_base_rect: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MovementFrame {
    pub frames: FrameRange,
    pub velocity_x: f32,
}

/// Window in which a switch to one of `action_ids` is accepted.
/// `execute` windows honor the switch on the next request pass unconditionally;
/// `buffer` windows only once the character's cancel rule allows it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CancelFrame {
    pub frames: FrameRange,
    pub action_ids: Vec<ActionId>,
    pub buffer: bool,
    pub execute: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    Movement,
    Attack,
    Damage,
    Guard,
}

// ── Action ──────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionDefinition {
    pub action_id: ActionId,
    pub name: String,
    pub kind: ActionKind,
    pub frame_count: u32,
    pub is_loop: bool,
    pub loop_from_frame: u32,
    pub always_cancelable: bool,
    #[serde(default)]
    pub sound: Option<SoundCue>,
    #[serde(default)]
    pub motions: Vec<MotionFrame>,
    #[serde(default)]
    pub status: Vec<StatusFrame>,
    #[serde(default)]
    pub hitboxes: Vec<HitboxFrame>,
    #[serde(default)]
    pub hurtboxes: Vec<HurtboxFrame>,
    #[serde(default)]
    pub pushboxes: Vec<PushboxFrame>,
    #[serde(default)]
    pub movements: Vec<MovementFrame>,
    #[serde(default)]
    pub cancels: Vec<CancelFrame>,
}

impl ActionDefinition {
    /// Bare action with no frame data.
    pub fn new(action_id: ActionId, name: &str, kind: ActionKind, frame_count: u32) -> Self {
        Self {
            action_id,
            name: name.to_string(),
            kind,
            frame_count,
            is_loop: false,
            loop_from_frame: 0,
            always_cancelable: false,
            sound: None,
            motions: Vec::new(),
            status: Vec::new(),
            hitboxes: Vec::new(),
            hurtboxes: Vec::new(),
            pushboxes: Vec::new(),
            movements: Vec::new(),
            cancels: Vec::new(),
        }
    }

    // Single-result lookups: first entry in table order wins.

    pub fn motion_at(&self, frame: u32) -> Option<&MotionFrame> {
        self.motions.iter().find(|m| m.frames.contains(frame))
    }

    pub fn status_at(&self, frame: u32) -> Option<&StatusFrame> {
        self.status.iter().find(|s| s.frames.contains(frame))
    }

    pub fn pushbox_at(&self, frame: u32) -> Option<&PushboxFrame> {
        self.pushboxes.iter().find(|p| p.frames.contains(frame))
    }

    pub fn movement_at(&self, frame: u32) -> Option<&MovementFrame> {
        self.movements.iter().find(|m| m.frames.contains(frame))
    }

    // Multi-result lookups: every active entry, in table order.

    pub fn hitboxes_at(&self, frame: u32) -> impl Iterator<Item = &HitboxFrame> {
        self.hitboxes.iter().filter(move |h| h.frames.contains(frame))
    }

    pub fn hurtboxes_at(&self, frame: u32) -> impl Iterator<Item = &HurtboxFrame> {
        self.hurtboxes.iter().filter(move |h| h.frames.contains(frame))
    }

    pub fn cancels_at(&self, frame: u32) -> impl Iterator<Item = &CancelFrame> {
        self.cancels.iter().filter(move |c| c.frames.contains(frame))
    }

    pub fn is_counter_hit_at(&self, frame: u32) -> bool {
        self.status_at(frame).map_or(false, |s| s.counter_hit)
    }
}
