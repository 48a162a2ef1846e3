use std::collections::BTreeMap;

use crate::action::*;
use crate::constants::*;
use crate::data::{AttackDefinition, FighterDefinition, MotionDefinition};
use crate::geometry::Rect;
use crate::types::*;

// Sound cue IDs referenced by the standard character.
pub mod sound {
    use crate::types::SoundCue;

    pub const DASH: SoundCue = 1;
    pub const ATTACK: SoundCue = 2;
    pub const SPECIAL: SoundCue = 3;
    pub const GUARD_BREAK: SoundCue = 4;
    pub const HIT: SoundCue = 5;
}

const BASE_HURTBOX: Rect = Rect::new(0.0, 0.0, 0.6, 1.6);
const BASE_PUSHBOX: Rect = Rect::new(0.0, 0.0, 0.5, 1.4);

fn base_hurtbox(start: u32, end: u32) -> HurtboxFrame {
    HurtboxFrame {
        frames: FrameRange::new(start, end),
        rect: Rect::default(),
        use_base_rect: true,
    }
}

fn extended_hurtbox(start: u32, end: u32, rect: Rect) -> HurtboxFrame {
    HurtboxFrame {
        frames: FrameRange::new(start, end),
        rect,
        use_base_rect: false,
    }
}

fn base_pushbox(start: u32, end: u32) -> PushboxFrame {
    PushboxFrame {
        frames: FrameRange::new(start, end),
        rect: Rect::default(),
        use_base_rect: true,
    }
}

fn hitbox(start: u32, end: u32, rect: Rect, attack_id: AttackId) -> HitboxFrame {
    HitboxFrame {
        frames: FrameRange::new(start, end),
        rect,
        attack_id,
        proximity: false,
    }
}

fn proximity(start: u32, end: u32, rect: Rect, attack_id: AttackId) -> HitboxFrame {
    HitboxFrame {
        proximity: true,
        ..hitbox(start, end, rect, attack_id)
    }
}

fn movement(start: u32, end: u32, velocity_x: f32) -> MovementFrame {
    MovementFrame {
        frames: FrameRange::new(start, end),
        velocity_x,
    }
}

fn cancel_into_specials(start: u32, end: u32) -> CancelFrame {
    CancelFrame {
        frames: FrameRange::new(start, end),
        action_ids: vec![action_id::N_SPECIAL, action_id::B_SPECIAL],
        buffer: true,
        execute: false,
    }
}

fn counter_hit(start: u32, end: u32) -> StatusFrame {
    StatusFrame {
        frames: FrameRange::new(start, end),
        counter_hit: true,
    }
}

/// Action with base hurt/push boxes and one motion covering every frame.
fn body_action(id: ActionId, name: &str, kind: ActionKind, frame_count: u32) -> ActionDefinition {
    let last = frame_count - 1;
    let mut action = ActionDefinition::new(id, name, kind, frame_count);
    action.motions = vec![MotionFrame {
        frames: FrameRange::new(0, last),
        motion_id: id,
    }];
    action.hurtboxes = vec![base_hurtbox(0, last)];
    action.pushboxes = vec![base_pushbox(0, last)];
    action
}

fn looping(mut action: ActionDefinition, loop_from_frame: u32, always_cancelable: bool) -> ActionDefinition {
    action.is_loop = true;
    action.loop_from_frame = loop_from_frame;
    action.always_cancelable = always_cancelable;
    action
}

fn standard_actions() -> Vec<ActionDefinition> {
    let stand = looping(body_action(action_id::STAND, "Stand", ActionKind::Movement, 60), 0, true);
    let forward = looping(body_action(action_id::FORWARD, "Forward", ActionKind::Movement, 16), 0, true);
    let backward = looping(body_action(action_id::BACKWARD, "Backward", ActionKind::Movement, 16), 0, true);

    let mut dash_forward = body_action(action_id::DASH_FORWARD, "DashForward", ActionKind::Movement, 18);
    dash_forward.movements = vec![movement(0, 9, 5.0)];
    dash_forward.sound = Some(sound::DASH);

    let mut dash_backward = body_action(action_id::DASH_BACKWARD, "DashBackward", ActionKind::Movement, 22);
    dash_backward.movements = vec![movement(0, 11, -4.0)];
    dash_backward.sound = Some(sound::DASH);

    let mut n_attack = body_action(action_id::N_ATTACK, "NAttack", ActionKind::Attack, 22);
    n_attack.hitboxes = vec![
        hitbox(4, 6, Rect::new(0.75, 0.8, 0.7, 0.3), action_id::N_ATTACK),
        proximity(0, 6, Rect::new(1.0, 0.0, 1.6, 1.6), action_id::N_ATTACK),
    ];
    n_attack.hurtboxes.push(extended_hurtbox(4, 12, Rect::new(0.55, 0.7, 0.6, 0.4)));
    n_attack.cancels = vec![cancel_into_specials(4, 12)];
    n_attack.status = vec![counter_hit(0, 3)];
    n_attack.sound = Some(sound::ATTACK);

    let mut b_attack = body_action(action_id::B_ATTACK, "BAttack", ActionKind::Attack, 24);
    b_attack.hitboxes = vec![
        hitbox(5, 8, Rect::new(0.85, 1.0, 0.9, 0.3), action_id::B_ATTACK),
        proximity(0, 8, Rect::new(1.1, 0.0, 1.8, 1.6), action_id::B_ATTACK),
    ];
    b_attack.hurtboxes.push(extended_hurtbox(5, 14, Rect::new(0.6, 0.9, 0.7, 0.4)));
    b_attack.cancels = vec![cancel_into_specials(5, 14)];
    b_attack.status = vec![counter_hit(0, 4)];
    b_attack.sound = Some(sound::ATTACK);

    let mut n_special = body_action(action_id::N_SPECIAL, "NSpecial", ActionKind::Attack, 40);
    n_special.movements = vec![movement(0, 8, 2.0)];
    n_special.hitboxes = vec![
        hitbox(8, 12, Rect::new(0.9, 0.5, 1.0, 0.6), action_id::N_SPECIAL),
        proximity(0, 12, Rect::new(1.2, 0.0, 2.0, 1.6), action_id::N_SPECIAL),
    ];
    n_special.hurtboxes.push(extended_hurtbox(8, 24, Rect::new(0.7, 0.5, 0.8, 0.6)));
    n_special.status = vec![counter_hit(0, 7)];
    n_special.sound = Some(sound::SPECIAL);

    let mut b_special = body_action(action_id::B_SPECIAL, "BSpecial", ActionKind::Attack, 44);
    b_special.movements = vec![movement(2, 12, 5.0)];
    b_special.hitboxes = vec![
        hitbox(10, 14, Rect::new(0.9, 0.6, 1.0, 0.5), action_id::B_SPECIAL),
        proximity(0, 14, Rect::new(1.4, 0.0, 2.4, 1.6), action_id::B_SPECIAL),
    ];
    b_special.hurtboxes.push(extended_hurtbox(10, 28, Rect::new(0.7, 0.6, 0.8, 0.5)));
    b_special.status = vec![counter_hit(0, 9)];
    b_special.sound = Some(sound::SPECIAL);

    let damage = body_action(action_id::DAMAGE, "Damage", ActionKind::Damage, 20);
    let guard_m = body_action(action_id::GUARD_M, "GuardM", ActionKind::Guard, 16);
    let guard_stand = body_action(action_id::GUARD_STAND, "GuardStand", ActionKind::Guard, 16);
    let guard_crouch = body_action(action_id::GUARD_CROUCH, "GuardCrouch", ActionKind::Guard, 16);

    let mut guard_break = body_action(action_id::GUARD_BREAK, "GuardBreak", ActionKind::Damage, 40);
    guard_break.sound = Some(sound::GUARD_BREAK);

    let guard_proximity = looping(
        body_action(action_id::GUARD_PROXIMITY, "GuardProximity", ActionKind::Guard, 8),
        0,
        true,
    );
    let win = looping(body_action(action_id::WIN, "Win", ActionKind::Movement, 60), 30, false);

    vec![
        stand,
        forward,
        backward,
        dash_forward,
        dash_backward,
        n_attack,
        b_attack,
        n_special,
        b_special,
        damage,
        guard_m,
        guard_stand,
        guard_crouch,
        guard_break,
        guard_proximity,
        win,
    ]
}

// Normals never KO; a special has to connect.
fn standard_attacks() -> Vec<AttackDefinition> {
    vec![
        AttackDefinition {
            attack_id: action_id::N_ATTACK,
            number_of_hit: 1,
            vital_health_damage: 0,
            guard_health_damage: 0,
            hit_stun_frame: 14,
            guard_stun_frame: 10,
            guard_break_stun_frame: 30,
            damage_action_id: action_id::DAMAGE,
            guard_action_id: action_id::GUARD_M,
            sound: Some(sound::HIT),
        },
        AttackDefinition {
            attack_id: action_id::B_ATTACK,
            number_of_hit: 1,
            vital_health_damage: 0,
            guard_health_damage: 0,
            hit_stun_frame: 16,
            guard_stun_frame: 12,
            guard_break_stun_frame: 30,
            damage_action_id: action_id::DAMAGE,
            guard_action_id: action_id::GUARD_STAND,
            sound: Some(sound::HIT),
        },
        AttackDefinition {
            attack_id: action_id::N_SPECIAL,
            number_of_hit: 1,
            vital_health_damage: 1,
            guard_health_damage: 1,
            hit_stun_frame: 30,
            guard_stun_frame: 18,
            guard_break_stun_frame: 40,
            damage_action_id: action_id::DAMAGE,
            guard_action_id: action_id::GUARD_M,
            sound: Some(sound::HIT),
        },
        AttackDefinition {
            attack_id: action_id::B_SPECIAL,
            number_of_hit: 1,
            vital_health_damage: 1,
            guard_health_damage: 1,
            hit_stun_frame: 30,
            guard_stun_frame: 20,
            guard_break_stun_frame: 40,
            damage_action_id: action_id::DAMAGE,
            guard_action_id: action_id::GUARD_CROUCH,
            sound: Some(sound::HIT),
        },
    ]
}

/// The built-in character. Attack IDs share the numbering of the action
/// that owns the hitbox; motion IDs share the action's ID.
pub fn standard_fighter() -> FighterDefinition {
    let actions: BTreeMap<ActionId, ActionDefinition> =
        standard_actions().into_iter().map(|a| (a.action_id, a)).collect();
    let motions = actions
        .values()
        .map(|a| {
            (
                a.action_id,
                MotionDefinition {
                    motion_id: a.action_id,
                    sprite: a.name.to_lowercase(),
                },
            )
        })
        .collect();
    let attacks = standard_attacks().into_iter().map(|a| (a.attack_id, a)).collect();

    FighterDefinition {
        name: "standard".to_string(),
        start_guard_health: START_GUARD_HEALTH,
        forward_move_speed: FORWARD_MOVE_SPEED,
        backward_move_speed: BACKWARD_MOVE_SPEED,
        dash_allow_frame: DASH_ALLOW_FRAME,
        special_attack_hold_frame: SPECIAL_ATTACK_HOLD_FRAME,
        can_cancel_on_whiff: false,
        base_hurtbox: BASE_HURTBOX,
        base_pushbox: BASE_PUSHBOX,
        actions,
        attacks,
        motions,
    }
}

/// Default battle config: two human sides, standard timings.
pub fn default_config(seed: u32) -> BattleConfig {
    BattleConfig {
        ai_seed: seed,
        ..BattleConfig::default()
    }
}
