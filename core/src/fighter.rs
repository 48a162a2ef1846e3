use std::sync::Arc;

use crate::action::{ActionDefinition, ActionKind};
use crate::constants::{MAX_SPRITE_SHAKE_FRAME, START_VITAL_HEALTH};
use crate::data::{AttackDefinition, FighterDefinition, MotionDefinition};
use crate::geometry::{Hitbox, Hurtbox, Pushbox};
use crate::input::{InputHistory, InputSample};
use crate::types::*;

/// Action waiting for the next request pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct BufferedAction {
    action_id: ActionId,
    /// Armed by an execute window: honored without the cancel rule.
    execute: bool,
}

/// Per-combatant runtime state and its per-step state machine.
///
/// The battle calls, once per step and in this order: [`update_input`](Self::update_input),
/// [`increment_action_frame`](Self::increment_action_frame),
/// [`update_action_request`](Self::update_action_request) (or
/// [`update_intro_action`](Self::update_intro_action)),
/// [`update_movement`](Self::update_movement), [`update_boxes`](Self::update_boxes).
#[derive(Clone, Debug)]
pub struct Fighter {
    definition: Arc<FighterDefinition>,
    position: Vec2,
    face_right: bool,

    current_action_id: ActionId,
    current_action_frame: u32,
    current_action_hit_count: u32,

    vital_health: i32,
    guard_health: i32,
    hit_stun_frame: u32,
    sprite_shake_position: i32,

    buffered_action: Option<BufferedAction>,
    reserve_damage_action: Option<ActionId>,
    has_won: bool,
    is_input_backward: bool,
    reserve_proximity_guard: bool,

    input: InputHistory,

    hitboxes: Vec<Hitbox>,
    hurtboxes: Vec<Hurtbox>,
    pushbox: Pushbox,

    sounds: Vec<SoundCue>,
}

impl Fighter {
    /// Definition must already be validated.
    pub fn new(definition: Arc<FighterDefinition>, start_position: Vec2, face_right: bool) -> Self {
        let pushbox = Pushbox {
            rect: definition.base_pushbox.to_world(start_position, face_right),
        };
        let mut fighter = Self {
            definition: Arc::clone(&definition),
            position: start_position,
            face_right,
            current_action_id: action_id::STAND,
            current_action_frame: 0,
            current_action_hit_count: 0,
            vital_health: START_VITAL_HEALTH,
            guard_health: definition.start_guard_health,
            hit_stun_frame: 0,
            sprite_shake_position: 0,
            buffered_action: None,
            reserve_damage_action: None,
            has_won: false,
            is_input_backward: false,
            reserve_proximity_guard: false,
            input: InputHistory::new(),
            hitboxes: Vec::new(),
            hurtboxes: Vec::new(),
            pushbox,
            sounds: Vec::new(),
        };
        fighter.setup_battle_start(definition, start_position, face_right);
        fighter
    }

    /// Reset for a new round.
    pub fn setup_battle_start(&mut self, definition: Arc<FighterDefinition>, start_position: Vec2, face_right: bool) {
        self.definition = definition;
        self.position = start_position;
        self.face_right = face_right;

        self.vital_health = START_VITAL_HEALTH;
        self.guard_health = self.definition.start_guard_health;
        self.hit_stun_frame = 0;
        self.has_won = false;
        self.is_input_backward = false;
        self.reserve_proximity_guard = false;

        self.clear_input();
        self.sounds.clear();
        self.set_current_action(action_id::STAND, 0);
        self.update_boxes();
    }

    // ── Per-step pipeline ───────────────────────────────────

    pub fn update_input(&mut self, sample: &InputSample) {
        self.input.push(sample.buttons);
    }

    pub fn increment_action_frame(&mut self) {
        // Shake alternates sign and shrinks by one each step
        if self.sprite_shake_position != 0 {
            self.sprite_shake_position = -self.sprite_shake_position;
            self.sprite_shake_position += if self.sprite_shake_position > 0 { -1 } else { 1 };
        }

        if self.hit_stun_frame > 0 {
            self.hit_stun_frame -= 1;
            return;
        }

        self.current_action_frame += 1;

        if self.is_action_end() {
            let action = self.definition.action(self.current_action_id);
            if action.is_loop {
                self.current_action_frame = action.loop_from_frame;
            }
        }
    }

    pub fn update_intro_action(&mut self) {
        self.request_action(action_id::STAND, 0);
    }

    pub fn update_action_request(&mut self) {
        // Proximity guard is armed for a single request pass
        let proximity_guard = std::mem::take(&mut self.reserve_proximity_guard);

        if self.has_won {
            self.request_action(action_id::WIN, 0);
            return;
        }

        // Deferred damage motion, played once hit stun ends (guard break)
        if let Some(reserved) = self.reserve_damage_action {
            if self.hit_stun_frame == 0 {
                self.set_current_action(reserved, 0);
                self.reserve_damage_action = None;
                return;
            }
        }

        if let Some(buffered) = self.buffered_action {
            if (buffered.execute || self.can_cancel_attack()) && self.hit_stun_frame == 0 {
                self.set_current_action(buffered.action_id, 0);
                self.buffered_action = None;
                return;
            }
        }

        let held = self.input.held(0);
        let is_forward = self.is_forward_input(held);
        let is_backward = self.is_backward_input(held);
        let is_attack = is_attack_input(self.input.pressed(0));

        if self.check_special_attack_input() {
            if is_forward || is_backward {
                self.request_action(action_id::B_SPECIAL, 0);
            } else {
                self.request_action(action_id::N_SPECIAL, 0);
            }
        } else if is_attack {
            let in_normal = self.current_action_id == action_id::N_ATTACK
                || self.current_action_id == action_id::B_ATTACK;
            if in_normal && !self.is_action_end() {
                self.request_action(action_id::N_SPECIAL, 0);
            } else if is_forward || is_backward {
                self.request_action(action_id::B_ATTACK, 0);
            } else {
                self.request_action(action_id::N_ATTACK, 0);
            }
        }

        if self.check_forward_dash_input() {
            self.request_action(action_id::DASH_FORWARD, 0);
        } else if self.check_backward_dash_input() {
            self.request_action(action_id::DASH_BACKWARD, 0);
        }

        self.is_input_backward = is_backward;

        if is_forward && is_backward {
            self.request_action(action_id::STAND, 0);
        } else if is_forward {
            self.request_action(action_id::FORWARD, 0);
        } else if is_backward {
            if proximity_guard {
                self.request_action(action_id::GUARD_PROXIMITY, 0);
            } else {
                self.request_action(action_id::BACKWARD, 0);
            }
        } else {
            self.request_action(action_id::STAND, 0);
        }
    }

    /// Try to switch action. Returns true when the switch happened or was
    /// armed through an execute window.
    ///
    /// # Panics
    /// If `id` is not in the character's table.
    pub fn request_action(&mut self, id: ActionId, start_frame: u32) -> bool {
        if self.is_action_end() {
            self.set_current_action(id, start_frame);
            return true;
        }

        if self.current_action_id == id {
            return false;
        }

        let current = self.definition.action(self.current_action_id);
        if current.always_cancelable {
            self.set_current_action(id, start_frame);
            return true;
        }

        for cancel in current.cancels_at(self.current_action_frame) {
            if !cancel.action_ids.contains(&id) {
                continue;
            }
            if cancel.execute {
                self.buffered_action = Some(BufferedAction {
                    action_id: id,
                    execute: true,
                });
                return true;
            } else if cancel.buffer {
                self.buffered_action = Some(BufferedAction {
                    action_id: id,
                    execute: false,
                });
            }
        }

        false
    }

    pub fn update_movement(&mut self, dt: f32) {
        if self.is_in_hit_stun() {
            return;
        }

        let sign = self.facing_sign();
        match self.current_action_id {
            action_id::FORWARD => {
                self.position.x += self.definition.forward_move_speed * sign * dt;
                return;
            }
            action_id::BACKWARD => {
                self.position.x -= self.definition.backward_move_speed * sign * dt;
                return;
            }
            _ => {}
        }

        let action = self.definition.action(self.current_action_id);
        if let Some(movement) = action.movement_at(self.current_action_frame) {
            if movement.velocity_x != 0.0 {
                self.position.x += movement.velocity_x * sign * dt;
            }
        }
    }

    /// Rebuild world-space boxes from the current action frame.
    pub fn update_boxes(&mut self) {
        let definition = &self.definition;
        let action = definition.action(self.current_action_id);
        let frame = self.current_action_frame;
        let (position, face_right) = (self.position, self.face_right);

        self.hitboxes.clear();
        self.hitboxes.extend(action.hitboxes_at(frame).map(|h| Hitbox {
            rect: h.rect.to_world(position, face_right),
            attack_id: h.attack_id,
            proximity: h.proximity,
        }));

        self.hurtboxes.clear();
        self.hurtboxes.extend(action.hurtboxes_at(frame).map(|h| {
            let rect = if h.use_base_rect { definition.base_hurtbox } else { h.rect };
            Hurtbox {
                rect: rect.to_world(position, face_right),
            }
        }));

        // Keeps the previous pushbox when the frame has none
        if let Some(p) = action.pushbox_at(frame) {
            let rect = if p.use_base_rect { definition.base_pushbox } else { p.rect };
            self.pushbox = Pushbox {
                rect: rect.to_world(position, face_right),
            };
        }
    }

    /// Shift the fighter and its materialized boxes.
    pub fn apply_position_change(&mut self, dx: f32, dy: f32) {
        self.position.x += dx;
        self.position.y += dy;
        for hitbox in &mut self.hitboxes {
            hitbox.rect.translate(dx, dy);
        }
        for hurtbox in &mut self.hurtboxes {
            hurtbox.rect.translate(dx, dy);
        }
        self.pushbox.rect.translate(dx, dy);
    }

    // ── Damage callbacks ────────────────────────────────────

    /// False once the attack landed its allowed hits this activation.
    /// Unregistered attacks are never gated; the resolver reports them when they land.
    pub fn can_attack_hit(&self, attack_id: AttackId) -> bool {
        self.definition
            .attack(attack_id)
            .map_or(true, |attack| self.current_action_hit_count < attack.number_of_hit)
    }

    pub fn attack_definition(&self, attack_id: AttackId) -> Option<&AttackDefinition> {
        self.definition.attack(attack_id)
    }

    pub fn notify_attack_hit(&mut self) {
        self.current_action_hit_count += 1;
    }

    /// Apply a landed attack. Reaction action IDs must exist in this
    /// fighter's table (checked at battle setup).
    pub fn notify_damaged(&mut self, attack: &AttackDefinition, _position: Vec2) -> DamageResult {
        let defending = self.current_action_id == action_id::BACKWARD
            || self.current_action().kind == ActionKind::Guard;

        if defending {
            let mut is_guard_break = false;
            if attack.guard_health_damage > 0 {
                self.guard_health -= attack.guard_health_damage;
                if self.guard_health < 0 {
                    self.guard_health = 0;
                    is_guard_break = true;
                }
            }

            self.set_current_action(attack.guard_action_id, 0);
            if is_guard_break {
                self.reserve_damage_action = Some(action_id::GUARD_BREAK);
                if let Some(cue) = self.definition.action(action_id::GUARD_BREAK).sound {
                    self.sounds.push(cue);
                }
                return DamageResult::GuardBreak;
            }
            return DamageResult::Guard;
        }

        if attack.vital_health_damage > 0 {
            self.vital_health = (self.vital_health - attack.vital_health_damage).max(0);
        }
        self.set_current_action(attack.damage_action_id, 0);
        DamageResult::Damage
    }

    /// Stun applied to both sides for a hit of `attack_id` with `result`.
    pub fn hit_stun_frame_for(&self, result: DamageResult, attack_id: AttackId) -> u32 {
        self.attack_definition(attack_id)
            .map_or(0, |attack| attack.stun_frame_for(result))
    }

    /// Arms proximity guard for the next request pass if backward was held.
    pub fn notify_in_proximity_guard_range(&mut self) {
        if self.is_input_backward {
            self.reserve_proximity_guard = true;
        }
    }

    pub fn set_hit_stun(&mut self, hit_stun_frame: u32) {
        self.hit_stun_frame = hit_stun_frame;
    }

    pub fn set_sprite_shake_frame(&mut self, sprite_shake_frame: i32) {
        let frame = sprite_shake_frame.min(MAX_SPRITE_SHAKE_FRAME);
        self.sprite_shake_position = if self.face_right { -frame } else { frame };
    }

    pub fn request_win_action(&mut self) {
        self.has_won = true;
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    /// Sound cues emitted since the last call.
    pub fn take_sounds(&mut self) -> Vec<SoundCue> {
        std::mem::take(&mut self.sounds)
    }

    // ── Gestures ────────────────────────────────────────────

    /// Attack released this step after being held for the charge window.
    pub fn check_special_attack_input(&self) -> bool {
        if !is_attack_input(self.input.released(0)) {
            return false;
        }
        (1..self.definition.special_attack_hold_frame).all(|i| is_attack_input(self.input.held(i)))
    }

    pub fn check_forward_dash_input(&self) -> bool {
        self.check_dash_input(true)
    }

    pub fn check_backward_dash_input(&self) -> bool {
        self.check_dash_input(false)
    }

    /// Double tap: pressed now, held once before within the window with no
    /// opposite direction in between, and released before that tap.
    fn check_dash_input(&self, forward: bool) -> bool {
        let toward = |bits: u8| {
            if forward {
                self.is_forward_input(bits)
            } else {
                self.is_backward_input(bits)
            }
        };
        let away = |bits: u8| {
            if forward {
                self.is_backward_input(bits)
            } else {
                self.is_forward_input(bits)
            }
        };

        if !toward(self.input.pressed(0)) {
            return false;
        }

        let window = self.definition.dash_allow_frame;
        for i in 1..window {
            let held = self.input.held(i);
            if away(held) {
                return false;
            }
            if toward(held) {
                return (i + 1..i + window).any(|j| {
                    let earlier = self.input.held(j);
                    !self.is_forward_input(earlier) && !self.is_backward_input(earlier)
                });
            }
        }

        false
    }

    fn is_forward_input(&self, bits: u8) -> bool {
        if self.face_right {
            bits & button::RIGHT != 0
        } else {
            bits & button::LEFT != 0
        }
    }

    fn is_backward_input(&self, bits: u8) -> bool {
        if self.face_right {
            bits & button::LEFT != 0
        } else {
            bits & button::RIGHT != 0
        }
    }

    // ── Internals ───────────────────────────────────────────

    fn set_current_action(&mut self, id: ActionId, start_frame: u32) {
        self.current_action_id = id;
        self.current_action_frame = start_frame;

        self.current_action_hit_count = 0;
        self.buffered_action = None;
        self.reserve_damage_action = None;
        self.sprite_shake_position = 0;

        // Guard break cue already played when the guard broke
        if id != action_id::GUARD_BREAK {
            if let Some(cue) = self.definition.action(id).sound {
                self.sounds.push(cue);
            }
        }
    }

    fn can_cancel_attack(&self) -> bool {
        self.definition.can_cancel_on_whiff || self.current_action_hit_count > 0
    }

    fn current_action(&self) -> &ActionDefinition {
        self.definition.action(self.current_action_id)
    }

    fn facing_sign(&self) -> f32 {
        if self.face_right {
            1.0
        } else {
            -1.0
        }
    }

    // ── Read-only state ─────────────────────────────────────

    pub fn definition(&self) -> &FighterDefinition {
        &self.definition
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn is_face_right(&self) -> bool {
        self.face_right
    }

    pub fn current_action_id(&self) -> ActionId {
        self.current_action_id
    }

    pub fn current_action_frame(&self) -> u32 {
        self.current_action_frame
    }

    pub fn current_action_frame_count(&self) -> u32 {
        self.current_action().frame_count
    }

    pub fn current_action_hit_count(&self) -> u32 {
        self.current_action_hit_count
    }

    pub fn is_always_cancelable(&self) -> bool {
        self.current_action().always_cancelable
    }

    pub fn is_action_end(&self) -> bool {
        self.current_action_frame >= self.current_action().frame_count
    }

    pub fn hit_stun_frame(&self) -> u32 {
        self.hit_stun_frame
    }

    pub fn is_in_hit_stun(&self) -> bool {
        self.hit_stun_frame > 0
    }

    pub fn sprite_shake_position(&self) -> i32 {
        self.sprite_shake_position
    }

    pub fn vital_health(&self) -> i32 {
        self.vital_health
    }

    pub fn guard_health(&self) -> i32 {
        self.guard_health
    }

    pub fn is_dead(&self) -> bool {
        self.vital_health <= 0
    }

    pub fn has_won(&self) -> bool {
        self.has_won
    }

    /// Proximity guard armed for the next request pass.
    pub fn is_proximity_guard_reserved(&self) -> bool {
        self.reserve_proximity_guard
    }

    pub fn input_history(&self) -> &InputHistory {
        &self.input
    }

    pub fn hitboxes(&self) -> &[Hitbox] {
        &self.hitboxes
    }

    pub fn hurtboxes(&self) -> &[Hurtbox] {
        &self.hurtboxes
    }

    pub fn pushbox(&self) -> &Pushbox {
        &self.pushbox
    }

    pub fn current_motion(&self) -> Option<&MotionDefinition> {
        let frame = self.current_action().motion_at(self.current_action_frame)?;
        self.definition.motion(frame.motion_id)
    }

    pub fn is_counter_hit_frame(&self) -> bool {
        self.current_action().is_counter_hit_at(self.current_action_frame)
    }
}

fn is_attack_input(bits: u8) -> bool {
    bits & button::ATTACK != 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{CancelFrame, FrameRange};
    use crate::init::{sound, standard_fighter};
    use proptest::prelude::*;

    const LOOP_ACTION: ActionId = 900;
    const EXECUTE_ACTION: ActionId = 901;

    fn definition() -> FighterDefinition {
        let mut def = standard_fighter();

        let mut looped = ActionDefinition::new(LOOP_ACTION, "Loop", ActionKind::Movement, 10);
        looped.is_loop = true;
        looped.loop_from_frame = 3;
        def.actions.insert(LOOP_ACTION, looped);

        let mut execute = ActionDefinition::new(EXECUTE_ACTION, "Execute", ActionKind::Attack, 20);
        execute.cancels = vec![CancelFrame {
            frames: FrameRange::new(2, 4),
            action_ids: vec![action_id::N_SPECIAL],
            buffer: false,
            execute: true,
        }];
        def.actions.insert(EXECUTE_ACTION, execute);
        def
    }

    fn fighter_with(def: FighterDefinition) -> Fighter {
        Fighter::new(Arc::new(def), Vec2::new(0.0, 0.0), true)
    }

    fn fighter() -> Fighter {
        fighter_with(definition())
    }

    /// One step of the fight pipeline without collision.
    fn step(f: &mut Fighter, buttons: u8) {
        f.update_input(&InputSample::new(buttons, 0.0));
        f.increment_action_frame();
        f.update_action_request();
        f.update_movement(1.0 / 60.0);
        f.update_boxes();
    }

    fn attack(vital: i32, guard: i32) -> AttackDefinition {
        AttackDefinition {
            attack_id: 77,
            number_of_hit: 1,
            vital_health_damage: vital,
            guard_health_damage: guard,
            hit_stun_frame: 12,
            guard_stun_frame: 8,
            guard_break_stun_frame: 20,
            damage_action_id: action_id::DAMAGE,
            guard_action_id: action_id::GUARD_M,
            sound: None,
        }
    }

    #[test]
    fn starts_standing_with_boxes() {
        let f = fighter();
        assert_eq!(f.current_action_id(), action_id::STAND);
        assert_eq!(f.current_action_frame(), 0);
        assert_eq!(f.vital_health(), START_VITAL_HEALTH);
        assert_eq!(f.guard_health(), f.definition().start_guard_health);
        assert_eq!(f.hurtboxes().len(), 1);
        assert!(f.hitboxes().is_empty());
        assert_eq!(f.pushbox().rect, f.definition().base_pushbox);
        assert_eq!(f.current_motion().map(|m| m.sprite.as_str()), Some("stand"));
    }

    #[test]
    fn hit_stun_freezes_action_frame() {
        let mut f = fighter();
        f.increment_action_frame();
        f.increment_action_frame();
        assert_eq!(f.current_action_frame(), 2);

        f.set_hit_stun(5);
        for remaining in (0..5).rev() {
            f.increment_action_frame();
            assert_eq!(f.current_action_frame(), 2);
            assert_eq!(f.hit_stun_frame(), remaining);
        }
        f.increment_action_frame();
        assert_eq!(f.current_action_frame(), 3);
    }

    #[test]
    fn loop_action_wraps_to_loop_frame() {
        let mut f = fighter();
        assert!(f.request_action(LOOP_ACTION, 0));
        for _ in 0..9 {
            f.increment_action_frame();
        }
        assert_eq!(f.current_action_frame(), 9);
        f.increment_action_frame();
        assert_eq!(f.current_action_frame(), 3);

        for _ in 0..100 {
            f.increment_action_frame();
            assert!(f.current_action_frame() >= 3 && f.current_action_frame() < 10);
            assert!(!f.is_action_end());
        }
    }

    #[test]
    fn always_cancelable_switches_on_the_same_call() {
        let mut f = fighter();
        assert!(f.is_always_cancelable());
        assert!(f.request_action(action_id::N_ATTACK, 0));
        assert_eq!(f.current_action_id(), action_id::N_ATTACK);
        assert_eq!(f.current_action_frame(), 0);
    }

    #[test]
    fn same_action_request_is_rejected() {
        let mut f = fighter();
        f.request_action(action_id::N_ATTACK, 0);
        f.increment_action_frame();
        assert!(!f.request_action(action_id::N_ATTACK, 0));
        assert_eq!(f.current_action_frame(), 1);
    }

    #[test]
    fn request_outside_cancel_window_is_dropped() {
        let mut f = fighter();
        f.request_action(action_id::N_ATTACK, 0);
        f.increment_action_frame();
        assert!(!f.request_action(action_id::FORWARD, 0));
        assert!(!f.request_action(action_id::N_SPECIAL, 0));
        assert_eq!(f.current_action_id(), action_id::N_ATTACK);
        f.update_action_request();
        assert_eq!(f.current_action_id(), action_id::N_ATTACK);
    }

    #[test]
    fn ended_action_accepts_any_request() {
        let mut f = fighter();
        f.request_action(action_id::DAMAGE, 0);
        for _ in 0..20 {
            f.increment_action_frame();
        }
        assert!(f.is_action_end());
        assert!(f.request_action(action_id::FORWARD, 0));
        assert_eq!(f.current_action_id(), action_id::FORWARD);
    }

    #[test]
    fn execute_window_is_honored_next_pass_even_on_whiff() {
        let mut f = fighter();
        assert!(!f.definition().can_cancel_on_whiff);
        f.request_action(EXECUTE_ACTION, 0);
        f.increment_action_frame();
        f.increment_action_frame();
        assert_eq!(f.current_action_frame(), 2);

        assert!(f.request_action(action_id::N_SPECIAL, 0));
        assert_eq!(f.current_action_id(), EXECUTE_ACTION);
        assert_eq!(f.current_action_hit_count(), 0);

        f.update_action_request();
        assert_eq!(f.current_action_id(), action_id::N_SPECIAL);
        assert_eq!(f.current_action_frame(), 0);
    }

    #[test]
    fn buffer_window_waits_for_a_landed_hit() {
        let mut f = fighter();
        f.request_action(action_id::N_ATTACK, 0);
        for _ in 0..5 {
            f.increment_action_frame();
        }
        assert!(!f.request_action(action_id::N_SPECIAL, 0));

        f.update_action_request();
        assert_eq!(f.current_action_id(), action_id::N_ATTACK);

        f.notify_attack_hit();
        f.update_action_request();
        assert_eq!(f.current_action_id(), action_id::N_SPECIAL);
    }

    #[test]
    fn buffered_action_waits_for_hit_stun() {
        let mut f = fighter();
        f.request_action(EXECUTE_ACTION, 0);
        f.increment_action_frame();
        f.increment_action_frame();
        f.request_action(action_id::N_SPECIAL, 0);
        f.set_hit_stun(2);
        f.update_action_request();
        assert_eq!(f.current_action_id(), EXECUTE_ACTION);
        f.increment_action_frame();
        f.increment_action_frame();
        f.update_action_request();
        assert_eq!(f.current_action_id(), action_id::N_SPECIAL);
    }

    #[test]
    fn attack_press_during_normal_escalates_to_special() {
        let mut def = definition();
        def.can_cancel_on_whiff = true;
        let mut f = fighter_with(def);

        step(&mut f, button::ATTACK);
        assert_eq!(f.current_action_id(), action_id::N_ATTACK);
        for _ in 0..4 {
            step(&mut f, button::NONE);
        }
        assert_eq!(f.current_action_frame(), 4);

        step(&mut f, button::ATTACK);
        assert_eq!(f.current_action_id(), action_id::N_ATTACK);
        step(&mut f, button::NONE);
        assert_eq!(f.current_action_id(), action_id::N_SPECIAL);
    }

    #[test]
    fn attack_with_direction_requests_back_attack() {
        let mut f = fighter();
        step(&mut f, button::RIGHT | button::ATTACK);
        assert_eq!(f.current_action_id(), action_id::B_ATTACK);
    }

    #[test]
    fn walking_follows_held_direction() {
        let mut f = fighter();
        step(&mut f, button::RIGHT);
        assert_eq!(f.current_action_id(), action_id::FORWARD);
        assert!(f.position().x > 0.0);

        step(&mut f, button::LEFT);
        assert_eq!(f.current_action_id(), action_id::BACKWARD);

        step(&mut f, button::LEFT | button::RIGHT);
        assert_eq!(f.current_action_id(), action_id::STAND);
    }

    #[test]
    fn walk_speed_mirrors_with_facing() {
        let def = Arc::new(definition());
        let mut left_facing = Fighter::new(Arc::clone(&def), Vec2::new(0.0, 0.0), false);
        step(&mut left_facing, button::LEFT);
        assert_eq!(left_facing.current_action_id(), action_id::FORWARD);
        let expected = -def.forward_move_speed / 60.0;
        assert!((left_facing.position().x - expected).abs() < 1e-6);
    }

    #[test]
    fn forward_dash_on_double_tap() {
        let mut f = fighter();
        step(&mut f, button::RIGHT);
        step(&mut f, button::NONE);
        f.update_input(&InputSample::new(button::RIGHT, 0.0));
        assert!(f.check_forward_dash_input());
        assert!(!f.check_backward_dash_input());
        f.increment_action_frame();
        f.update_action_request();
        assert_eq!(f.current_action_id(), action_id::DASH_FORWARD);
    }

    #[test]
    fn dash_is_cancelled_by_opposite_direction() {
        let mut f = fighter();
        step(&mut f, button::RIGHT);
        step(&mut f, button::LEFT);
        f.update_input(&InputSample::new(button::RIGHT, 0.0));
        assert!(!f.check_forward_dash_input());
    }

    #[test]
    fn dash_requires_second_tap_within_window() {
        let mut f = fighter();
        step(&mut f, button::RIGHT);
        for _ in 0..f.definition().dash_allow_frame {
            step(&mut f, button::NONE);
        }
        f.update_input(&InputSample::new(button::RIGHT, 0.0));
        assert!(!f.check_forward_dash_input());
    }

    #[test]
    fn backward_dash_on_double_tap() {
        let mut f = fighter();
        step(&mut f, button::LEFT);
        step(&mut f, button::NONE);
        step(&mut f, button::LEFT);
        assert_eq!(f.current_action_id(), action_id::DASH_BACKWARD);
    }

    #[test]
    fn charge_release_requests_special() {
        let mut f = fighter();
        let hold = f.definition().special_attack_hold_frame;
        for _ in 0..hold {
            step(&mut f, button::ATTACK);
        }
        assert_eq!(f.current_action_id(), action_id::STAND);
        f.update_input(&InputSample::new(button::NONE, 0.0));
        assert!(f.check_special_attack_input());
        f.increment_action_frame();
        f.update_action_request();
        assert_eq!(f.current_action_id(), action_id::N_SPECIAL);
    }

    #[test]
    fn short_charge_does_not_request_special() {
        let mut f = fighter();
        for _ in 0..10 {
            step(&mut f, button::ATTACK);
        }
        f.update_input(&InputSample::new(button::NONE, 0.0));
        assert!(!f.check_special_attack_input());
    }

    #[test]
    fn charge_release_with_direction_requests_back_special() {
        let mut f = fighter();
        let hold = f.definition().special_attack_hold_frame;
        for _ in 0..hold {
            step(&mut f, button::ATTACK);
        }
        step(&mut f, button::RIGHT);
        assert_eq!(f.current_action_id(), action_id::B_SPECIAL);
    }

    #[test]
    fn damage_when_not_defending() {
        let mut f = fighter();
        let result = f.notify_damaged(&attack(1, 1), Vec2::ZERO);
        assert_eq!(result, DamageResult::Damage);
        assert_eq!(f.vital_health(), 0);
        assert!(f.is_dead());
        assert_eq!(f.guard_health(), f.definition().start_guard_health);
        assert_eq!(f.current_action_id(), action_id::DAMAGE);

        f.notify_damaged(&attack(1, 0), Vec2::ZERO);
        assert_eq!(f.vital_health(), 0);
    }

    #[test]
    fn guard_while_walking_backward() {
        let mut f = fighter();
        step(&mut f, button::LEFT);
        assert_eq!(f.current_action_id(), action_id::BACKWARD);
        let result = f.notify_damaged(&attack(1, 1), Vec2::ZERO);
        assert_eq!(result, DamageResult::Guard);
        assert_eq!(f.vital_health(), START_VITAL_HEALTH);
        assert_eq!(f.guard_health(), f.definition().start_guard_health - 1);
        assert_eq!(f.current_action_id(), action_id::GUARD_M);
    }

    #[test]
    fn guard_break_plays_reserved_action_once() {
        let mut f = fighter();
        step(&mut f, button::LEFT);
        f.guard_health = 1;

        let result = f.notify_damaged(&attack(1, 2), Vec2::ZERO);
        assert_eq!(result, DamageResult::GuardBreak);
        assert_eq!(f.guard_health(), 0);
        assert_eq!(f.current_action_id(), action_id::GUARD_M);
        assert_eq!(f.take_sounds(), vec![sound::GUARD_BREAK]);

        f.set_hit_stun(3);
        f.update_action_request();
        assert_eq!(f.current_action_id(), action_id::GUARD_M);

        for _ in 0..3 {
            f.increment_action_frame();
        }
        assert_eq!(f.hit_stun_frame(), 0);
        f.update_action_request();
        assert_eq!(f.current_action_id(), action_id::GUARD_BREAK);
        assert_eq!(f.current_action_frame(), 0);
        assert!(f.take_sounds().is_empty());

        f.increment_action_frame();
        f.update_action_request();
        assert_eq!(f.current_action_id(), action_id::GUARD_BREAK);
        assert_eq!(f.current_action_frame(), 1);
    }

    #[test]
    fn guard_exactly_to_zero_is_not_a_break() {
        let mut f = fighter();
        step(&mut f, button::LEFT);
        f.guard_health = 1;
        let result = f.notify_damaged(&attack(1, 1), Vec2::ZERO);
        assert_eq!(result, DamageResult::Guard);
        assert_eq!(f.guard_health(), 0);
    }

    #[test]
    fn attack_hit_count_gates_further_hits() {
        let mut f = fighter();
        f.request_action(action_id::N_ATTACK, 0);
        assert!(f.can_attack_hit(action_id::N_ATTACK));
        f.notify_attack_hit();
        assert!(!f.can_attack_hit(action_id::N_ATTACK));
        assert!(f.can_attack_hit(12345));
    }

    #[test]
    fn hit_stun_follows_damage_result() {
        let f = fighter();
        let special = *f.definition().attack(action_id::N_SPECIAL).unwrap();
        assert_eq!(
            f.hit_stun_frame_for(DamageResult::Damage, action_id::N_SPECIAL),
            special.hit_stun_frame
        );
        assert_eq!(
            f.hit_stun_frame_for(DamageResult::Guard, action_id::N_SPECIAL),
            special.guard_stun_frame
        );
        assert_eq!(
            f.hit_stun_frame_for(DamageResult::GuardBreak, action_id::N_SPECIAL),
            special.guard_break_stun_frame
        );
        assert_eq!(f.hit_stun_frame_for(DamageResult::Damage, 12345), 0);
    }

    #[test]
    fn proximity_guard_needs_backward_input() {
        let mut f = fighter();
        step(&mut f, button::LEFT);
        f.notify_in_proximity_guard_range();
        step(&mut f, button::LEFT);
        assert_eq!(f.current_action_id(), action_id::GUARD_PROXIMITY);

        // Consumed: without a new notification the fighter walks back again
        step(&mut f, button::LEFT);
        assert_eq!(f.current_action_id(), action_id::BACKWARD);

        let mut idle = fighter();
        step(&mut idle, button::NONE);
        idle.notify_in_proximity_guard_range();
        step(&mut idle, button::LEFT);
        assert_eq!(idle.current_action_id(), action_id::BACKWARD);
    }

    #[test]
    fn proximity_guard_is_consumed_on_early_return() {
        let mut f = fighter();
        step(&mut f, button::LEFT);
        f.request_win_action();
        f.notify_in_proximity_guard_range();
        assert!(f.is_proximity_guard_reserved());

        step(&mut f, button::LEFT);
        assert_eq!(f.current_action_id(), action_id::WIN);
        assert!(!f.is_proximity_guard_reserved());
    }

    #[test]
    fn unregistered_attack_is_never_gated() {
        let mut f = fighter();
        f.notify_attack_hit();
        f.notify_attack_hit();
        assert!(f.can_attack_hit(12345));
        assert!(f.attack_definition(12345).is_none());
    }

    #[test]
    fn sprite_shake_decays_with_alternating_sign() {
        let mut f = fighter();
        f.set_sprite_shake_frame(10);
        assert_eq!(f.sprite_shake_position(), -MAX_SPRITE_SHAKE_FRAME);
        let mut seen = Vec::new();
        for _ in 0..7 {
            f.increment_action_frame();
            seen.push(f.sprite_shake_position());
        }
        assert_eq!(seen, vec![5, -4, 3, -2, 1, 0, 0]);
    }

    #[test]
    fn win_request_overrides_input() {
        let mut f = fighter();
        f.request_win_action();
        step(&mut f, button::ATTACK | button::RIGHT);
        assert_eq!(f.current_action_id(), action_id::WIN);
    }

    #[test]
    fn boxes_follow_position_changes() {
        let mut f = fighter();
        f.request_action(action_id::N_ATTACK, 4);
        f.update_boxes();
        assert_eq!(f.hitboxes().len(), 2);
        let before = f.hitboxes()[0].rect;
        f.apply_position_change(0.5, 0.0);
        assert_eq!(f.hitboxes()[0].rect.x, before.x + 0.5);
        assert_eq!(f.position().x, 0.5);
        assert_eq!(f.pushbox().rect.x, 0.5);
    }

    #[test]
    fn action_sounds_are_collected() {
        let mut f = fighter();
        f.take_sounds();
        f.request_action(action_id::N_ATTACK, 0);
        assert_eq!(f.take_sounds(), vec![sound::ATTACK]);
        assert!(f.take_sounds().is_empty());
    }

    proptest! {
        #[test]
        fn prop_hit_stun_never_advances_frame(stun in 1u32..60, advance in 0u32..10) {
            let mut f = fighter();
            for _ in 0..advance {
                f.increment_action_frame();
            }
            let frame = f.current_action_frame();
            f.set_hit_stun(stun);
            for i in 0..stun {
                f.increment_action_frame();
                prop_assert_eq!(f.current_action_frame(), frame);
                prop_assert_eq!(f.hit_stun_frame(), stun - i - 1);
            }
        }
    }
}
