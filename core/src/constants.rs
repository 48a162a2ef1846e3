// All frame counts are per simulation tick at TICK_RATE unless noted.

// Tick rate
pub const TICK_RATE: u32 = 60;

// Round timing (seconds)
pub const INTRO_STATE_SECS: f32 = 3.0;
pub const KO_STATE_SECS: f32 = 2.0;
pub const END_STATE_SECS: f32 = 3.0;
pub const END_STATE_SKIPPABLE_SECS: f32 = 1.5;

// Match rules
pub const MAX_ROUND_WON: u32 = 3;

// Input recording: five minutes of fight per side
pub const MAX_RECORDING_INPUT_FRAME: usize = 60 * 60 * 5;

// Battle area
pub const BATTLE_AREA_WIDTH: f32 = 10.0;
pub const BATTLE_AREA_MAX_HEIGHT: f32 = 2.0;
pub const FIGHTER1_START_X: f32 = -2.0;
pub const FIGHTER2_START_X: f32 = 2.0;

// Fighter
pub const INPUT_RECORD_FRAME: usize = 180;
pub const MAX_SPRITE_SHAKE_FRAME: i32 = 6;
pub const START_VITAL_HEALTH: i32 = 1;

// Character defaults
pub const START_GUARD_HEALTH: i32 = 3;
pub const FORWARD_MOVE_SPEED: f32 = 2.2;
pub const BACKWARD_MOVE_SPEED: f32 = 1.8;
pub const DASH_ALLOW_FRAME: usize = 10;
pub const SPECIAL_ATTACK_HOLD_FRAME: usize = 60;

// AI
pub const AI_FIGHT_STATE_RECORD: usize = 10;
pub const AI_REACTION_DELAY_FRAME: usize = 5;
pub const AI_FAR_DISTANCE: f32 = 4.0;
pub const AI_MID_DISTANCE: f32 = 3.0;
pub const AI_CLOSE_DISTANCE: f32 = 2.5;
pub const AI_POKE_DISTANCE: f32 = 2.0;
