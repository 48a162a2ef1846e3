use serde::{Deserialize, Serialize};

use crate::types::Vec2;

/// Box data as authored in action tables: `x` is the horizontal centre,
/// `y` the bottom edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn x_min(&self) -> f32 {
        self.x - self.width / 2.0
    }

    pub fn x_max(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn y_min(&self) -> f32 {
        self.y
    }

    pub fn y_max(&self) -> f32 {
        self.y + self.height
    }

    /// Place an authored rect in the battle area. X offsets mirror with facing.
    pub fn to_world(&self, base: Vec2, face_right: bool) -> Rect {
        let sign = if face_right { 1.0 } else { -1.0 };
        Rect {
            x: base.x + self.x * sign,
            y: base.y + self.y,
            width: self.width,
            height: self.height,
        }
    }

    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.x += dx;
        self.y += dy;
    }
}

/// Inclusive AABB test: rects touching at an edge overlap.
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    b.x_max() >= a.x_min() && b.x_min() <= a.x_max() && b.y_max() >= a.y_min() && b.y_min() <= a.y_max()
}

/// Centre of the overlapping region of two rects.
pub fn overlap_center(a: &Rect, b: &Rect) -> Vec2 {
    let x1 = a.x_max().min(b.x_max());
    let x2 = a.x_min().max(b.x_min());
    let y1 = a.y_max().min(b.y_max());
    let y2 = a.y_min().max(b.y_min());
    Vec2 {
        x: (x1 + x2) / 2.0,
        y: (y1 + y2) / 2.0,
    }
}

// ── Materialized boxes ──────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hitbox {
    pub rect: Rect,
    pub attack_id: crate::types::AttackId,
    pub proximity: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hurtbox {
    pub rect: Rect,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pushbox {
    pub rect: Rect,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn edges_are_centre_based() {
        let r = Rect::new(1.0, 0.5, 2.0, 3.0);
        assert_eq!(r.x_min(), 0.0);
        assert_eq!(r.x_max(), 2.0);
        assert_eq!(r.y_min(), 0.5);
        assert_eq!(r.y_max(), 3.5);
    }

    #[test]
    fn touching_edges_overlap() {
        let a = Rect::new(0.0, 0.0, 2.0, 2.0);
        let b = Rect::new(2.0, 0.0, 2.0, 2.0);
        assert!(overlaps(&a, &b));
        let c = Rect::new(0.0, 2.0, 2.0, 2.0);
        assert!(overlaps(&a, &c));
    }

    #[test]
    fn separated_rects_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 2.0, 2.0);
        let b = Rect::new(2.5, 0.0, 2.0, 2.0);
        assert!(!overlaps(&a, &b));
        let c = Rect::new(0.0, 2.01, 2.0, 2.0);
        assert!(!overlaps(&a, &c));
    }

    #[test]
    fn overlap_center_uses_min_max_midpoint() {
        // x ranges [-1,1] and [0,2] share [0,1]; y ranges both [0,2]
        let attacker = Rect::new(0.0, 0.0, 2.0, 2.0);
        let defender = Rect::new(1.0, 0.0, 2.0, 2.0);
        assert!(overlaps(&attacker, &defender));
        let p = overlap_center(&attacker, &defender);
        assert_eq!(p, Vec2::new(0.5, 1.0));
    }

    #[test]
    fn to_world_mirrors_x_offset_only() {
        let r = Rect::new(0.5, 0.25, 1.0, 1.0);
        let right = r.to_world(Vec2::new(2.0, 0.0), true);
        assert_eq!(right, Rect::new(2.5, 0.25, 1.0, 1.0));
        let left = r.to_world(Vec2::new(2.0, 0.0), false);
        assert_eq!(left, Rect::new(1.5, 0.25, 1.0, 1.0));
    }

    fn rect_strategy() -> impl Strategy<Value = Rect> {
        (-10.0f32..10.0, -10.0f32..10.0, 0.0f32..5.0, 0.0f32..5.0)
            .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
    }

    proptest! {
        #[test]
        fn prop_overlap_is_symmetric(a in rect_strategy(), b in rect_strategy()) {
            prop_assert_eq!(overlaps(&a, &b), overlaps(&b, &a));
        }

        #[test]
        fn prop_rect_overlaps_itself(a in rect_strategy()) {
            prop_assert!(overlaps(&a, &a));
        }

        #[test]
        fn prop_overlap_center_lies_inside_both(
            a in rect_strategy(),
            tx in 0.0f32..=1.0,
            ty in 0.0f32..=1.0,
            w in 0.0f32..5.0,
            h in 0.0f32..5.0,
        ) {
            // Anchor b on a point inside a so the two always overlap
            let px = (a.x_min() + (a.x_max() - a.x_min()) * tx).clamp(a.x_min(), a.x_max());
            let py = (a.y_min() + (a.y_max() - a.y_min()) * ty).clamp(a.y_min(), a.y_max());
            let b = Rect::new(px, py, w, h);
            prop_assert!(overlaps(&a, &b));
            let p = overlap_center(&a, &b);
            let eps = 1e-4;
            prop_assert!(p.x >= a.x_min() - eps && p.x <= a.x_max() + eps);
            prop_assert!(p.x >= b.x_min() - eps && p.x <= b.x_max() + eps);
            prop_assert!(p.y >= a.y_min() - eps && p.y <= a.y_max() + eps);
            prop_assert!(p.y >= b.y_min() - eps && p.y <= b.y_max() + eps);
        }
    }
}
