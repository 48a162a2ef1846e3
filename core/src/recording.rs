use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::input::InputSample;
use crate::types::Side;

/// Both sides' samples for one round, one entry per recorded step.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordedRound {
    pub fighter1: Vec<InputSample>,
    pub fighter2: Vec<InputSample>,
}

impl RecordedRound {
    pub fn len(&self) -> usize {
        self.fighter1.len().min(self.fighter2.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn samples(&self, side: Side) -> &[InputSample] {
        match side {
            Side::Fighter1 => &self.fighter1,
            Side::Fighter2 => &self.fighter2,
        }
    }

    /// Sample at `index`, neutral past the recorded length.
    pub fn sample(&self, side: Side, index: usize) -> InputSample {
        self.samples(side).get(index).copied().unwrap_or(InputSample::NEUTRAL)
    }

    fn clear(&mut self) {
        self.fighter1.clear();
        self.fighter2.clear();
    }

    fn push(&mut self, samples: [InputSample; 2]) {
        self.fighter1.push(samples[0]);
        self.fighter2.push(samples[1]);
    }
}

/// Bounded per-round input capture plus replay of the previous round.
#[derive(Clone, Debug)]
pub struct InputRecorder {
    capacity: usize,
    current: RecordedRound,
    last_round: RecordedRound,
    /// Replay cursor into `last_round` while replaying.
    replay_cursor: Option<usize>,
    capacity_reported: bool,
}

impl InputRecorder {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            current: RecordedRound::default(),
            last_round: RecordedRound::default(),
            replay_cursor: None,
            capacity_reported: false,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Restart capture at index 0.
    pub fn reset_recording(&mut self) {
        self.current.clear();
        self.capacity_reported = false;
    }

    /// Append one step. Steps past capacity are dropped.
    pub fn record(&mut self, samples: [InputSample; 2]) {
        if self.current.len() >= self.capacity {
            if !self.capacity_reported {
                warn!(capacity = self.capacity, "input recording full, further steps are not recorded");
                self.capacity_reported = true;
            }
            return;
        }
        self.current.push(samples);
    }

    pub fn recorded_len(&self) -> usize {
        self.current.len()
    }

    pub fn current(&self) -> &RecordedRound {
        &self.current
    }

    /// Keep the round just played for replay and stop any replay in progress.
    pub fn snapshot_last_round(&mut self) {
        self.last_round.clone_from(&self.current);
        self.stop_replay();
    }

    pub fn last_round(&self) -> &RecordedRound {
        &self.last_round
    }

    /// Replace the replay source, truncated to capacity.
    pub fn load_last_round(&mut self, mut round: RecordedRound) {
        round.fighter1.truncate(self.capacity);
        round.fighter2.truncate(self.capacity);
        self.last_round = round;
        self.stop_replay();
    }

    pub fn start_replay(&mut self) {
        debug!(steps = self.last_round.len(), "replaying last round input");
        self.replay_cursor = Some(0);
    }

    pub fn stop_replay(&mut self) {
        if self.replay_cursor.take().is_some() {
            debug!("replay stopped");
        }
    }

    pub fn is_replaying(&self) -> bool {
        self.replay_cursor.is_some()
    }

    pub fn replay_cursor(&self) -> Option<usize> {
        self.replay_cursor
    }

    /// Rewind the cursor without leaving replay mode.
    pub fn rewind_replay(&mut self) {
        if let Some(cursor) = self.replay_cursor.as_mut() {
            *cursor = 0;
        }
    }

    /// Replayed sample for `side` at the cursor; neutral when not replaying.
    pub fn replay_sample(&self, side: Side) -> InputSample {
        match self.replay_cursor {
            Some(cursor) => self.last_round.sample(side, cursor),
            None => InputSample::NEUTRAL,
        }
    }

    /// Move the cursor one step, stopping at the recorded length.
    pub fn advance_replay(&mut self) {
        let len = self.last_round.len();
        if let Some(cursor) = self.replay_cursor.as_mut() {
            if *cursor < len {
                *cursor += 1;
            }
        }
    }
}
