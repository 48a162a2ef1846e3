use serde::{Deserialize, Serialize};

use crate::constants::INPUT_RECORD_FRAME;
use crate::types::button;

/// One side's buttons for one simulation step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InputSample {
    pub buttons: u8,
    /// Seconds since the fight started.
    pub time: f32,
}

impl InputSample {
    pub const NEUTRAL: InputSample = InputSample {
        buttons: button::NONE,
        time: 0.0,
    };

    pub fn new(buttons: u8, time: f32) -> Self {
        Self { buttons, time }
    }
}

/// Fixed look-back of held buttons plus pressed/released edges.
/// Index 0 is the current step, index `n` is `n` steps ago.
#[derive(Clone, Debug)]
pub struct InputHistory {
    held: [u8; INPUT_RECORD_FRAME],
    pressed: [u8; INPUT_RECORD_FRAME],
    released: [u8; INPUT_RECORD_FRAME],
    head: usize,
}

impl Default for InputHistory {
    fn default() -> Self {
        Self {
            held: [0; INPUT_RECORD_FRAME],
            pressed: [0; INPUT_RECORD_FRAME],
            released: [0; INPUT_RECORD_FRAME],
            head: 0,
        }
    }
}

impl InputHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn capacity(&self) -> usize {
        INPUT_RECORD_FRAME
    }

    /// Shift the window by one step, dropping the oldest sample.
    pub fn push(&mut self, buttons: u8) {
        let prev = self.held[self.head];
        self.head = (self.head + INPUT_RECORD_FRAME - 1) % INPUT_RECORD_FRAME;
        self.held[self.head] = buttons;
        self.pressed[self.head] = (buttons ^ prev) & buttons;
        self.released[self.head] = (buttons ^ prev) & !buttons;
    }

    fn slot(&self, steps_ago: usize) -> usize {
        (self.head + steps_ago) % INPUT_RECORD_FRAME
    }

    /// Buttons held `steps_ago` steps back; 0 beyond the window.
    pub fn held(&self, steps_ago: usize) -> u8 {
        if steps_ago >= INPUT_RECORD_FRAME {
            return 0;
        }
        self.held[self.slot(steps_ago)]
    }

    pub fn pressed(&self, steps_ago: usize) -> u8 {
        if steps_ago >= INPUT_RECORD_FRAME {
            return 0;
        }
        self.pressed[self.slot(steps_ago)]
    }

    pub fn released(&self, steps_ago: usize) -> u8 {
        if steps_ago >= INPUT_RECORD_FRAME {
            return 0;
        }
        self.released[self.slot(steps_ago)]
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
