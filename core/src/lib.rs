pub mod action;
pub mod ai;
pub mod battle;
pub mod collision;
pub mod constants;
pub mod data;
pub mod error;
pub mod fighter;
pub mod geometry;
pub mod hash;
pub mod init;
pub mod input;
pub mod prng;
pub mod recording;
pub mod types;

pub use action::{ActionDefinition, ActionKind, FrameRange};
pub use ai::{BattleAi, FightSnapshot};
pub use battle::{Battle, BattleEvent, Command, InputSource, NoInput};
pub use collision::{push_fighters_apart, push_fighters_into_stage, resolve_hits};
pub use constants::*;
pub use data::{AttackDefinition, FighterDefinition, MotionDefinition};
pub use error::DataError;
pub use fighter::Fighter;
pub use geometry::{overlap_center, overlaps, Hitbox, Hurtbox, Pushbox, Rect};
pub use hash::*;
pub use init::*;
pub use input::{InputHistory, InputSample};
pub use prng::Prng;
pub use recording::{InputRecorder, RecordedRound};
pub use types::*;
