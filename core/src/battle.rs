use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::ai::BattleAi;
use crate::collision::{push_fighters_apart, push_fighters_into_stage, resolve_hits};
use crate::data::FighterDefinition;
use crate::error::DataError;
use crate::fighter::Fighter;
use crate::hash::hash_battle_state;
use crate::input::InputSample;
use crate::prng::Prng;
use crate::recording::{InputRecorder, RecordedRound};
use crate::types::*;

/// Buttons the human input collaborator answers for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    P1Left,
    P1Right,
    P1Attack,
    P2Left,
    P2Right,
    P2Attack,
    Cancel,
}

/// Per-step snapshot query of device state.
pub trait InputSource {
    fn is_pressed(&self, command: Command) -> bool;
}

impl<F> InputSource for F
where
    F: Fn(Command) -> bool,
{
    fn is_pressed(&self, command: Command) -> bool {
        self(command)
    }
}

/// Nothing pressed, ever. For CPU-only battles and replays.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoInput;

impl InputSource for NoInput {
    fn is_pressed(&self, _command: Command) -> bool {
        false
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum BattleEvent {
    Damage(DamageEvent),
    Sound { side: Side, cue: SoundCue, x: f32 },
    RoundStart,
    RoundEnd,
    RoundWon { side: Side },
    MatchOver { winner: Side },
}

/// Round orchestration for one two-fighter battle. Call [`tick`](Self::tick)
/// once per fixed simulation step.
pub struct Battle {
    config: BattleConfig,
    definitions: [Arc<FighterDefinition>; 2],
    fighters: [Fighter; 2],

    round_state: RoundStateType,
    /// Remaining ticks of the timed states.
    timer: u32,
    frame_count: i64,
    round_won: [u32; 2],
    round_number: u32,

    recorder: InputRecorder,
    ai: [Option<BattleAi>; 2],

    debug_pause: bool,
    debug_step: bool,

    events: Vec<BattleEvent>,
}

impl Battle {
    /// Validates the config and both definitions. Starts in `Stop`.
    pub fn new(config: BattleConfig, definitions: [FighterDefinition; 2]) -> Result<Self, DataError> {
        validate_config(&config)?;
        for def in &definitions {
            def.validate()?;
        }
        definitions[0].validate_reactions(&definitions[1])?;
        definitions[1].validate_reactions(&definitions[0])?;

        let [d1, d2] = definitions;
        let definitions = [Arc::new(d1), Arc::new(d2)];
        let fighters = [
            Fighter::new(Arc::clone(&definitions[0]), config.start_positions[0], true),
            Fighter::new(Arc::clone(&definitions[1]), config.start_positions[1], false),
        ];
        let recorder = InputRecorder::new(config.max_recording_frames);

        Ok(Self {
            config,
            definitions,
            fighters,
            round_state: RoundStateType::Stop,
            timer: 0,
            frame_count: -1,
            round_won: [0, 0],
            round_number: 0,
            recorder,
            ai: [None, None],
            debug_pause: false,
            debug_step: false,
            events: Vec::new(),
        })
    }

    /// Advance the battle by one simulation step.
    pub fn tick(&mut self, input: &dyn InputSource) {
        match self.round_state {
            RoundStateType::Stop => {
                if let Some(winner) = self.match_winner() {
                    info!(?winner, won = ?self.round_won, "match decided");
                    self.events.push(BattleEvent::MatchOver { winner });
                    self.round_won = [0, 0];
                }
                self.change_round_state(RoundStateType::Intro);
            }
            RoundStateType::Intro => {
                self.update_intro_state(input);

                self.timer = self.timer.saturating_sub(1);
                if self.timer == 0 {
                    self.change_round_state(RoundStateType::Fight);
                }

                if self.config.debug.play_last_round_input && !self.recorder.is_replaying() {
                    self.recorder.start_replay();
                }
            }
            RoundStateType::Fight => {
                if self.check_debug_pause() {
                    return;
                }

                self.frame_count += 1;
                self.update_fight_state(input);

                if self.fighters.iter().any(Fighter::is_dead) {
                    self.change_round_state(RoundStateType::KO);
                }
            }
            RoundStateType::KO => {
                self.timer = self.timer.saturating_sub(1);
                if self.timer == 0 {
                    self.change_round_state(RoundStateType::End);
                }
            }
            RoundStateType::End => {
                self.update_end_state();

                self.timer = self.timer.saturating_sub(1);
                let skippable = self.timer <= self.config.secs_to_ticks(self.config.end_skippable_secs);
                if self.timer == 0 || (skippable && is_skip_pressed(input)) {
                    self.change_round_state(RoundStateType::Stop);
                }
            }
        }
    }

    // ── State machine ───────────────────────────────────────

    fn change_round_state(&mut self, state: RoundStateType) {
        debug!(from = ?self.round_state, to = ?state, round = self.round_number, "round state");
        self.round_state = state;

        match state {
            RoundStateType::Stop => {}
            RoundStateType::Intro => {
                self.round_number += 1;
                for side in Side::BOTH {
                    let i = side.index();
                    self.fighters[i].setup_battle_start(
                        Arc::clone(&self.definitions[i]),
                        self.config.start_positions[i],
                        side == Side::Fighter1,
                    );
                    self.ai[i] = match self.config.controllers[i] {
                        Controller::Cpu => Some(BattleAi::new(
                            side,
                            Prng::derive_seed(self.config.ai_seed, i, self.round_number),
                        )),
                        Controller::Human => None,
                    };
                }
                self.timer = self.config.secs_to_ticks(self.config.intro_secs);
                self.frame_count = -1;
                self.events.push(BattleEvent::RoundStart);
                self.collect_sounds();
            }
            RoundStateType::Fight => {
                self.frame_count = -1;
                self.recorder.reset_recording();
                self.recorder.rewind_replay();
            }
            RoundStateType::KO => {
                self.timer = self.config.secs_to_ticks(self.config.ko_secs);
                self.recorder.snapshot_last_round();
                for f in &mut self.fighters {
                    f.clear_input();
                }
                self.ai = [None, None];
                self.events.push(BattleEvent::RoundEnd);
            }
            RoundStateType::End => {
                self.timer = self.config.secs_to_ticks(self.config.end_secs);

                let dead = [self.fighters[0].is_dead(), self.fighters[1].is_dead()];
                let winner = match dead {
                    [true, false] => Some(Side::Fighter2),
                    [false, true] => Some(Side::Fighter1),
                    _ => None,
                };
                if let Some(side) = winner {
                    self.round_won[side.index()] += 1;
                    self.fighters[side.index()].request_win_action();
                    info!(?side, round = self.round_number, won = ?self.round_won, "round won");
                    self.events.push(BattleEvent::RoundWon { side });
                }
            }
        }
    }

    fn update_intro_state(&mut self, input: &dyn InputSource) {
        let samples = self.gather_inputs(input);
        self.recorder.record(samples);
        self.feed_inputs(&samples);

        let dt = self.config.dt();
        for f in &mut self.fighters {
            f.increment_action_frame();
        }
        for f in &mut self.fighters {
            f.update_intro_action();
        }
        self.update_bodies(dt);
        self.collect_sounds();
    }

    fn update_fight_state(&mut self, input: &dyn InputSource) {
        let samples = self.gather_inputs(input);
        self.recorder.record(samples);
        self.recorder.advance_replay();
        self.feed_inputs(&samples);

        let dt = self.config.dt();
        for f in &mut self.fighters {
            f.increment_action_frame();
        }
        for f in &mut self.fighters {
            f.update_action_request();
        }
        self.update_bodies(dt);

        for outcome in resolve_hits(&mut self.fighters) {
            if let Some(cue) = outcome.sound {
                self.events.push(BattleEvent::Sound {
                    side: outcome.event.defender,
                    cue,
                    x: outcome.event.position.x,
                });
            }
            self.events.push(BattleEvent::Damage(outcome.event));
        }
        self.collect_sounds();
    }

    fn update_end_state(&mut self) {
        let dt = self.config.dt();
        for f in &mut self.fighters {
            f.increment_action_frame();
        }
        for f in &mut self.fighters {
            f.update_action_request();
        }
        self.update_bodies(dt);
        self.collect_sounds();
    }

    /// Movement, box rebuild and push resolution for both fighters.
    fn update_bodies(&mut self, dt: f32) {
        for f in &mut self.fighters {
            f.update_movement(dt);
        }
        for f in &mut self.fighters {
            f.update_boxes();
        }
        push_fighters_apart(&mut self.fighters);
        push_fighters_into_stage(&mut self.fighters, self.config.battle_area_width);
    }

    fn collect_sounds(&mut self) {
        for side in Side::BOTH {
            let f = &mut self.fighters[side.index()];
            let x = f.position().x;
            for cue in f.take_sounds() {
                self.events.push(BattleEvent::Sound { side, cue, x });
            }
        }
    }

    fn match_winner(&self) -> Option<Side> {
        let max = self.config.max_round_won;
        Side::BOTH.into_iter().find(|side| self.round_won[side.index()] >= max)
    }

    fn check_debug_pause(&mut self) -> bool {
        if !self.debug_pause {
            return false;
        }
        if self.debug_step {
            self.debug_step = false;
            return false;
        }
        true
    }

    // ── Input ───────────────────────────────────────────────

    fn gather_inputs(&mut self, input: &dyn InputSource) -> [InputSample; 2] {
        Side::BOTH.map(|side| self.input_for(side, input))
    }

    fn input_for(&mut self, side: Side, input: &dyn InputSource) -> InputSample {
        if self.recorder.is_replaying() {
            // Replay lines up with the fight; the intro stays neutral
            if self.round_state == RoundStateType::Fight {
                return self.recorder.replay_sample(side);
            }
            return InputSample::NEUTRAL;
        }

        let mut buttons = match self.ai[side.index()].as_mut() {
            Some(ai) => ai.next_input(&self.fighters),
            None => human_buttons(side, input),
        };

        let debug = &self.config.debug;
        match side {
            Side::Fighter1 => {
                if debug.p1_attack {
                    buttons |= button::ATTACK;
                }
                if debug.p1_guard {
                    buttons |= button::LEFT;
                }
            }
            Side::Fighter2 => {
                if debug.p2_attack {
                    buttons |= button::ATTACK;
                }
                if debug.p2_guard {
                    buttons |= button::RIGHT;
                }
            }
        }

        let time = self.frame_count.max(0) as f32 * self.config.dt();
        InputSample::new(buttons, time)
    }

    fn feed_inputs(&mut self, samples: &[InputSample; 2]) {
        for (f, sample) in self.fighters.iter_mut().zip(samples) {
            f.update_input(sample);
        }
    }

    // ── Debug hooks ─────────────────────────────────────────

    /// Freeze the fight until unpaused; intro, KO and end keep running.
    pub fn toggle_debug_pause(&mut self) {
        self.debug_pause = !self.debug_pause;
        self.debug_step = false;
        debug!(paused = self.debug_pause, "debug pause");
    }

    /// Let exactly one fight step through while paused.
    pub fn step_debug_frame(&mut self) {
        if self.debug_pause {
            self.debug_step = true;
        }
    }

    pub fn is_debug_paused(&self) -> bool {
        self.debug_pause
    }

    pub fn set_debug_options(&mut self, debug: DebugOptions) {
        self.config.debug = debug;
    }

    /// Replace the round that `play_last_round_input` replays.
    pub fn load_last_round(&mut self, round: RecordedRound) {
        self.recorder.load_last_round(round);
    }

    // ── Queries ─────────────────────────────────────────────

    /// Drain the events produced since the last call.
    pub fn drain_events(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn round_state(&self) -> RoundStateType {
        self.round_state
    }

    pub fn timer(&self) -> u32 {
        self.timer
    }

    /// Fight steps elapsed this round, -1 before the first one.
    pub fn frame_count(&self) -> i64 {
        self.frame_count
    }

    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    pub fn round_won(&self, side: Side) -> u32 {
        self.round_won[side.index()]
    }

    pub fn fighter(&self, side: Side) -> &Fighter {
        &self.fighters[side.index()]
    }

    pub fn fighters(&self) -> &[Fighter; 2] {
        &self.fighters
    }

    pub fn is_replaying(&self) -> bool {
        self.recorder.is_replaying()
    }

    pub fn recording(&self) -> &RecordedRound {
        self.recorder.current()
    }

    pub fn last_round(&self) -> &RecordedRound {
        self.recorder.last_round()
    }

    /// Frames `side` recovers before its opponent. Always-cancelable
    /// actions count as already recovered.
    pub fn frame_advantage(&self, side: Side) -> i32 {
        let frames_left = |f: &Fighter| -> i32 {
            if f.is_always_cancelable() {
                0
            } else {
                f.current_action_frame_count() as i32 - f.current_action_frame() as i32
            }
        };
        let mine = frames_left(&self.fighters[side.index()]);
        let theirs = frames_left(&self.fighters[side.opponent().index()]);
        theirs - mine
    }

    pub fn state_hash(&self) -> [u8; 32] {
        hash_battle_state(self.round_state, self.frame_count, self.round_won, &self.fighters)
    }
}

fn human_buttons(side: Side, input: &dyn InputSource) -> u8 {
    let (left, right, attack) = match side {
        Side::Fighter1 => (Command::P1Left, Command::P1Right, Command::P1Attack),
        Side::Fighter2 => (Command::P2Left, Command::P2Right, Command::P2Attack),
    };
    let mut buttons = button::NONE;
    if input.is_pressed(left) {
        buttons |= button::LEFT;
    }
    if input.is_pressed(right) {
        buttons |= button::RIGHT;
    }
    if input.is_pressed(attack) {
        buttons |= button::ATTACK;
    }
    buttons
}

fn is_skip_pressed(input: &dyn InputSource) -> bool {
    input.is_pressed(Command::P1Attack) || input.is_pressed(Command::P2Attack) || input.is_pressed(Command::Cancel)
}

fn validate_config(config: &BattleConfig) -> Result<(), DataError> {
    if config.tick_rate == 0 {
        return Err(DataError::InvalidConfig("tick rate must be positive".into()));
    }
    if config.battle_area_width <= 0.0 {
        return Err(DataError::InvalidConfig("battle area width must be positive".into()));
    }
    if config.max_recording_frames == 0 {
        return Err(DataError::InvalidConfig("recording capacity must be positive".into()));
    }
    if config.max_round_won == 0 {
        return Err(DataError::InvalidConfig("rounds to win must be positive".into()));
    }
    for (name, secs) in [
        ("intro", config.intro_secs),
        ("ko", config.ko_secs),
        ("end", config.end_secs),
        ("end skippable", config.end_skippable_secs),
    ] {
        if !(secs.is_finite() && secs > 0.0) {
            return Err(DataError::InvalidConfig(format!("{name} duration must be positive")));
        }
    }
    if config.end_skippable_secs > config.end_secs {
        return Err(DataError::InvalidConfig(
            "end skippable threshold exceeds end duration".into(),
        ));
    }
    Ok(())
}
