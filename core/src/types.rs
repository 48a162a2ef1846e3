use serde::{Deserialize, Serialize};

use crate::constants::*;

// ── Primitives ──────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

pub type ActionId = u32;
pub type AttackId = u32;
pub type MotionId = u32;
pub type SoundCue = u32;

/// One of the two fixed fighter slots of a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Fighter1,
    Fighter2,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Fighter1, Side::Fighter2];

    pub fn index(self) -> usize {
        match self {
            Side::Fighter1 => 0,
            Side::Fighter2 => 1,
        }
    }

    pub fn opponent(self) -> Side {
        match self {
            Side::Fighter1 => Side::Fighter2,
            Side::Fighter2 => Side::Fighter1,
        }
    }
}

// ── Input ───────────────────────────────────────────────────

/// Button bitmask constants.
pub mod button {
    pub const NONE: u8 = 0;
    pub const LEFT: u8 = 1;
    pub const RIGHT: u8 = 2;
    pub const ATTACK: u8 = 4;
}

// ── Actions ─────────────────────────────────────────────────

/// Action IDs every character table is expected to share.
pub mod action_id {
    use super::ActionId;

    pub const STAND: ActionId = 0;
    pub const FORWARD: ActionId = 1;
    pub const BACKWARD: ActionId = 2;
    pub const DASH_FORWARD: ActionId = 10;
    pub const DASH_BACKWARD: ActionId = 11;
    pub const N_ATTACK: ActionId = 100;
    pub const B_ATTACK: ActionId = 105;
    pub const N_SPECIAL: ActionId = 110;
    pub const B_SPECIAL: ActionId = 115;
    pub const DAMAGE: ActionId = 200;
    pub const GUARD_M: ActionId = 301;
    pub const GUARD_STAND: ActionId = 305;
    pub const GUARD_CROUCH: ActionId = 306;
    pub const GUARD_BREAK: ActionId = 310;
    pub const GUARD_PROXIMITY: ActionId = 350;
    pub const WIN: ActionId = 510;

    /// Actions the fighter state machine requests on its own.
    pub const REQUIRED: [ActionId; 13] = [
        STAND,
        FORWARD,
        BACKWARD,
        DASH_FORWARD,
        DASH_BACKWARD,
        N_ATTACK,
        B_ATTACK,
        N_SPECIAL,
        B_SPECIAL,
        DAMAGE,
        GUARD_BREAK,
        GUARD_PROXIMITY,
        WIN,
    ];
}

// ── Combat ──────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageResult {
    Damage,
    Guard,
    GuardBreak,
}

/// Emitted once per landed hit for presentation collaborators.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DamageEvent {
    pub defender: Side,
    pub position: Vec2,
    pub result: DamageResult,
}

// ── Round ───────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundStateType {
    Stop,
    Intro,
    Fight,
    KO,
    End,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Controller {
    Human,
    Cpu,
}

// ── Config ──────────────────────────────────────────────────

/// Debug overrides; forced bits are ORed onto the side's sample.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DebugOptions {
    pub p1_attack: bool,
    pub p2_attack: bool,
    pub p1_guard: bool,
    pub p2_guard: bool,
    pub play_last_round_input: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BattleConfig {
    pub tick_rate: u32,
    pub battle_area_width: f32,
    pub battle_area_max_height: f32,
    pub intro_secs: f32,
    pub ko_secs: f32,
    pub end_secs: f32,
    pub end_skippable_secs: f32,
    pub max_round_won: u32,
    pub max_recording_frames: usize,
    pub start_positions: [Vec2; 2],
    pub controllers: [Controller; 2],
    pub ai_seed: u32,
    #[serde(default)]
    pub debug: DebugOptions,
}

impl BattleConfig {
    /// Seconds per simulation tick.
    pub fn dt(&self) -> f32 {
        1.0 / self.tick_rate as f32
    }

    /// Whole ticks covering `secs` at the configured rate.
    pub fn secs_to_ticks(&self, secs: f32) -> u32 {
        (secs * self.tick_rate as f32).round().max(0.0) as u32
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            tick_rate: TICK_RATE,
            battle_area_width: BATTLE_AREA_WIDTH,
            battle_area_max_height: BATTLE_AREA_MAX_HEIGHT,
            intro_secs: INTRO_STATE_SECS,
            ko_secs: KO_STATE_SECS,
            end_secs: END_STATE_SECS,
            end_skippable_secs: END_STATE_SKIPPABLE_SECS,
            max_round_won: MAX_ROUND_WON,
            max_recording_frames: MAX_RECORDING_INPUT_FRAME,
            start_positions: [Vec2::new(FIGHTER1_START_X, 0.0), Vec2::new(FIGHTER2_START_X, 0.0)],
            controllers: [Controller::Human, Controller::Human],
            ai_seed: 0,
            debug: DebugOptions::default(),
        }
    }
}
