use std::collections::VecDeque;

use tracing::debug;

use crate::constants::*;
use crate::fighter::Fighter;
use crate::prng::Prng;
use crate::types::*;

/// What the CPU sees of the fight on one step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FightSnapshot {
    pub distance_x: f32,
    pub is_opponent_damage: bool,
    pub is_opponent_guard_break: bool,
    pub is_opponent_blocking: bool,
    pub is_opponent_normal_attack: bool,
    pub is_opponent_special_attack: bool,
}

impl FightSnapshot {
    pub fn capture(me: &Fighter, opponent: &Fighter) -> Self {
        let action = opponent.current_action_id();
        Self {
            distance_x: (me.position().x - opponent.position().x).abs(),
            is_opponent_damage: action == action_id::DAMAGE,
            is_opponent_guard_break: action == action_id::GUARD_BREAK,
            is_opponent_blocking: matches!(
                action,
                action_id::GUARD_CROUCH | action_id::GUARD_STAND | action_id::GUARD_M
            ),
            is_opponent_normal_attack: matches!(action, action_id::N_ATTACK | action_id::B_ATTACK),
            is_opponent_special_attack: matches!(action, action_id::N_SPECIAL | action_id::B_SPECIAL),
        }
    }
}

/// Multi-step movement sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Maneuver {
    Neutral,
    FarApproach1,
    FarApproach2,
    MidApproach1,
    MidApproach2,
    FallBack1,
    FallBack2,
}

impl Maneuver {
    /// Button bits, one per step.
    pub fn inputs(self, forward: u8, backward: u8) -> Vec<u8> {
        let mut q = Vec::new();
        let hold = |q: &mut Vec<u8>, bits: u8, steps: usize| q.extend(std::iter::repeat(bits).take(steps));
        let dash = |q: &mut Vec<u8>, bits: u8| q.extend([bits, button::NONE, bits]);

        match self {
            Maneuver::Neutral => hold(&mut q, button::NONE, 30),
            Maneuver::FarApproach1 => {
                hold(&mut q, forward, 40);
                hold(&mut q, backward, 10);
                hold(&mut q, forward, 30);
                hold(&mut q, backward, 10);
            }
            Maneuver::FarApproach2 => {
                dash(&mut q, forward);
                hold(&mut q, backward, 25);
                dash(&mut q, forward);
                hold(&mut q, backward, 25);
            }
            Maneuver::MidApproach1 => {
                hold(&mut q, forward, 30);
                hold(&mut q, backward, 10);
                hold(&mut q, forward, 20);
                hold(&mut q, backward, 10);
            }
            Maneuver::MidApproach2 => {
                dash(&mut q, forward);
                hold(&mut q, backward, 30);
            }
            Maneuver::FallBack1 => hold(&mut q, backward, 60),
            Maneuver::FallBack2 => {
                dash(&mut q, backward);
                hold(&mut q, backward, 60);
            }
        }
        q
    }
}

/// Multi-step attack-button sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttackPlan {
    NoAttack,
    OneHit,
    TwoHit,
    ImmediateSpecial,
    DelaySpecial,
}

impl AttackPlan {
    pub fn inputs(self) -> Vec<u8> {
        let mut q = Vec::new();
        let hold = |q: &mut Vec<u8>, bits: u8, steps: usize| q.extend(std::iter::repeat(bits).take(steps));

        match self {
            AttackPlan::NoAttack => hold(&mut q, button::NONE, 30),
            AttackPlan::OneHit => {
                q.push(button::ATTACK);
                hold(&mut q, button::NONE, 18);
            }
            AttackPlan::TwoHit => {
                q.push(button::ATTACK);
                hold(&mut q, button::NONE, 3);
                q.push(button::ATTACK);
                hold(&mut q, button::NONE, 18);
            }
            AttackPlan::ImmediateSpecial => {
                hold(&mut q, button::ATTACK, 60);
                q.push(button::NONE);
            }
            AttackPlan::DelaySpecial => {
                hold(&mut q, button::ATTACK, 120);
                q.push(button::NONE);
            }
        }
        q
    }
}

pub fn select_maneuver(snapshot: &FightSnapshot, rng: &mut Prng) -> Maneuver {
    use Maneuver::*;

    let d = snapshot.distance_x;
    if d > AI_FAR_DISTANCE {
        [FarApproach1, FarApproach2][rng.weighted(&[1, 1])]
    } else if d > AI_MID_DISTANCE {
        [MidApproach1, MidApproach2, FarApproach1, FarApproach2, Neutral][rng.weighted(&[2, 2, 1, 1, 1])]
    } else if d > AI_CLOSE_DISTANCE {
        [MidApproach1, MidApproach2, FallBack1, FallBack2, Neutral][rng.weighted(&[1, 1, 1, 1, 1])]
    } else if d > AI_POKE_DISTANCE {
        [FallBack1, FallBack2, Neutral][rng.weighted(&[1, 1, 2])]
    } else {
        [FallBack1, FallBack2, Neutral][rng.weighted(&[1, 1, 1])]
    }
}

pub fn select_attack_plan(snapshot: &FightSnapshot, rng: &mut Prng) -> AttackPlan {
    use AttackPlan::*;

    // Punish anything the opponent can't block out of
    if snapshot.is_opponent_damage || snapshot.is_opponent_guard_break || snapshot.is_opponent_special_attack {
        return TwoHit;
    }

    let d = snapshot.distance_x;
    if d > AI_FAR_DISTANCE {
        NoAttack
    } else if d > AI_MID_DISTANCE {
        if snapshot.is_opponent_normal_attack {
            return TwoHit;
        }
        [NoAttack, OneHit, DelaySpecial][rng.weighted(&[2, 2, 1])]
    } else if d > AI_CLOSE_DISTANCE {
        [NoAttack, OneHit, TwoHit][rng.weighted(&[1, 1, 1])]
    } else if d > AI_POKE_DISTANCE {
        [OneHit, TwoHit, ImmediateSpecial, DelaySpecial][rng.weighted(&[2, 2, 1, 1])]
    } else {
        [OneHit, TwoHit][rng.weighted(&[1, 2])]
    }
}

/// Scripted opponent for one side. Reacts to the fight as it was a few
/// steps ago and plays queued movement/attack sequences.
#[derive(Clone, Debug)]
pub struct BattleAi {
    side: Side,
    rng: Prng,
    move_queue: VecDeque<u8>,
    attack_queue: VecDeque<u8>,
    /// Newest first.
    snapshots: VecDeque<FightSnapshot>,
}

impl BattleAi {
    pub fn new(side: Side, seed: u32) -> Self {
        Self {
            side,
            rng: Prng::new(seed),
            move_queue: VecDeque::new(),
            attack_queue: VecDeque::new(),
            snapshots: VecDeque::with_capacity(AI_FIGHT_STATE_RECORD),
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Button bits for this step. Produces nothing until enough history
    /// exists to react to.
    pub fn next_input(&mut self, fighters: &[Fighter; 2]) -> u8 {
        let me = &fighters[self.side.index()];
        let opponent = &fighters[self.side.opponent().index()];

        self.snapshots.push_front(FightSnapshot::capture(me, opponent));
        self.snapshots.truncate(AI_FIGHT_STATE_RECORD);

        let Some(snapshot) = self.snapshots.get(AI_REACTION_DELAY_FRAME).copied() else {
            return button::NONE;
        };

        let mut input = button::NONE;

        if let Some(bits) = self.move_queue.pop_front() {
            input |= bits;
        } else {
            let maneuver = select_maneuver(&snapshot, &mut self.rng);
            debug!(side = ?self.side, ?maneuver, distance = snapshot.distance_x, "ai maneuver");
            let (forward, backward) = if me.is_face_right() {
                (button::RIGHT, button::LEFT)
            } else {
                (button::LEFT, button::RIGHT)
            };
            self.move_queue.extend(maneuver.inputs(forward, backward));
        }

        if let Some(bits) = self.attack_queue.pop_front() {
            input |= bits;
        } else {
            let plan = select_attack_plan(&snapshot, &mut self.rng);
            debug!(side = ?self.side, ?plan, distance = snapshot.distance_x, "ai attack plan");
            self.attack_queue.extend(plan.inputs());
        }

        input
    }

    pub fn queued_moves(&self) -> usize {
        self.move_queue.len()
    }

    pub fn queued_attacks(&self) -> usize {
        self.attack_queue.len()
    }
}
