// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Swept axis-aligned box tests
//!
//! Continuous collision detection is reduced to a ray cast: the target box
//! is grown by the moving box's size (a Minkowski sum) and a ray is cast
//! from the moving box's center along its per-tick displacement using the
//! slab method. The parameter `t` along the ray is the fraction of this
//! tick's displacement at which the boxes first touch.

use crate::math::Vec2;

/// Result of a slab ray cast against a box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Entry parameter per axis, after near/far swapping
    pub t_near: Vec2,
    /// Exit parameter per axis, after near/far swapping
    pub t_far: Vec2,
    /// First contact, `max(t_near.x, t_near.y)`
    pub t_hit: f32,
    /// Last contact, `min(t_far.x, t_far.y)`
    pub t_exit: f32,
    /// Point on the ray at `t_hit`
    pub point: Vec2,
    /// Axis-aligned unit normal of the face that was hit
    pub normal: Vec2,
}

/// Cast a ray against an axis-aligned box
///
/// `direction` is not normalized; `t = 1` is the end of the ray. Returns
/// `None` when the ray misses the box's slabs, when the box lies entirely
/// behind the origin, or when a slab parameter is NaN (a zero direction
/// component with the origin exactly on that slab's boundary).
///
/// When both axes are entered at the same instant the X-axis normal is
/// reported.
pub fn ray_vs_box(origin: Vec2, direction: Vec2, center: Vec2, size: Vec2) -> Option<RayHit> {
    let min = center - size / 2.0;
    let max = center + size / 2.0;

    let mut t_near = (min - origin).div_elem(direction);
    let mut t_far = (max - origin).div_elem(direction);
    if t_near.has_nan() || t_far.has_nan() {
        return None;
    }

    if t_near.x > t_far.x {
        std::mem::swap(&mut t_near.x, &mut t_far.x);
    }
    if t_near.y > t_far.y {
        std::mem::swap(&mut t_near.y, &mut t_far.y);
    }

    if t_near.x > t_far.y || t_near.y > t_far.x {
        return None;
    }

    let t_hit = t_near.x.max(t_near.y);
    let t_exit = t_far.x.min(t_far.y);
    if t_exit < 0.0 {
        return None;
    }

    let normal = if t_near.x >= t_near.y {
        if direction.x < 0.0 {
            Vec2::new(1.0, 0.0)
        } else {
            Vec2::new(-1.0, 0.0)
        }
    } else if direction.y < 0.0 {
        Vec2::new(0.0, 1.0)
    } else {
        Vec2::new(0.0, -1.0)
    };

    Some(RayHit {
        t_near,
        t_far,
        t_hit,
        t_exit,
        point: origin + direction * t_hit,
        normal,
    })
}

/// Sweep a moving box against a static box over one tick
///
/// Returns a hit only if the boxes first touch within this tick's
/// displacement, i.e. `0 <= t_hit < 1`. A zero velocity never hits.
///
/// # Examples
///
/// ```
/// use ecs_physics2d::math::Vec2;
/// use ecs_physics2d::physics::sweep::sweep_box;
///
/// let size = Vec2::splat(10.0);
/// let hit = sweep_box(Vec2::ZERO, size, Vec2::new(20.0, 0.0), Vec2::new(20.0, 0.0), size)
///     .expect("halfway contact");
/// assert_eq!(hit.t_hit, 0.5);
/// assert_eq!(hit.normal, Vec2::new(-1.0, 0.0));
///
/// // Touching exactly at the end of the tick is not a hit.
/// assert!(sweep_box(Vec2::ZERO, size, Vec2::new(10.0, 0.0), Vec2::new(20.0, 0.0), size).is_none());
/// ```
pub fn sweep_box(
    center: Vec2,
    size: Vec2,
    velocity: Vec2,
    target_center: Vec2,
    target_size: Vec2,
) -> Option<RayHit> {
    if velocity.is_zero() {
        return None;
    }
    let hit = ray_vs_box(center, velocity, target_center, target_size + size)?;
    if hit.t_hit >= 0.0 && hit.t_hit < 1.0 {
        Some(hit)
    } else {
        None
    }
}

/// Velocity correction that stops a body at the contact described by `hit`
///
/// Adds `|velocity| * (1 - t_hit)` along the contact normal, cancelling the
/// part of the displacement that would carry the body through the face.
pub fn resolve(velocity: Vec2, hit: &RayHit) -> Vec2 {
    velocity + velocity.abs().mul_elem(hit.normal) * (1.0 - hit.t_hit)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_exact_touch_at_end_of_tick_is_not_a_hit() {
        let size = Vec2::splat(10.0);
        let hit = ray_vs_box(Vec2::ZERO, Vec2::new(10.0, 0.0), Vec2::new(20.0, 0.0), size * 2.0)
            .unwrap();
        assert_eq!(hit.t_hit, 1.0);
        assert!(sweep_box(Vec2::ZERO, size, Vec2::new(10.0, 0.0), Vec2::new(20.0, 0.0), size).is_none());
    }

    #[test]
    fn test_hit_just_before_end_of_tick() {
        let size = Vec2::splat(10.0);
        let hit = sweep_box(Vec2::ZERO, size, Vec2::new(10.5, 0.0), Vec2::new(20.0, 0.0), size)
            .unwrap();
        assert!(hit.t_hit < 1.0);
        assert!(approx(hit.t_hit, 10.0 / 10.5));
    }

    #[test]
    fn test_normals_oppose_motion() {
        let size = Vec2::splat(2.0);
        let cases = [
            (Vec2::new(4.0, 0.0), Vec2::new(3.0, 0.0), Vec2::new(-1.0, 0.0)),
            (Vec2::new(-4.0, 0.0), Vec2::new(-3.0, 0.0), Vec2::new(1.0, 0.0)),
            (Vec2::new(0.0, 4.0), Vec2::new(0.0, 3.0), Vec2::new(0.0, -1.0)),
            (Vec2::new(0.0, -4.0), Vec2::new(0.0, -3.0), Vec2::new(0.0, 1.0)),
        ];
        for (velocity, target, normal) in cases {
            let hit = sweep_box(Vec2::ZERO, size, velocity, target, size).unwrap();
            assert_eq!(hit.normal, normal, "velocity {}", velocity);
            assert!(approx(hit.t_hit, 0.25));
        }
    }

    #[test]
    fn test_corner_tie_prefers_x_axis() {
        let size = Vec2::splat(2.0);
        let hit = sweep_box(Vec2::ZERO, size, Vec2::new(4.0, 4.0), Vec2::new(3.0, 3.0), size)
            .unwrap();
        assert_eq!(hit.t_near.x, hit.t_near.y);
        assert_eq!(hit.normal, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_misses() {
        let size = Vec2::splat(2.0);
        // passes above the target
        assert!(sweep_box(Vec2::ZERO, size, Vec2::new(10.0, 0.0), Vec2::new(5.0, 5.0), size).is_none());
        // target behind the body
        assert!(sweep_box(Vec2::ZERO, size, Vec2::new(10.0, 0.0), Vec2::new(-5.0, 0.0), size).is_none());
        // too far to reach this tick
        assert!(sweep_box(Vec2::ZERO, size, Vec2::new(1.0, 0.0), Vec2::new(5.0, 0.0), size).is_none());
        // not moving
        assert!(sweep_box(Vec2::ZERO, size, Vec2::ZERO, Vec2::new(1.0, 0.0), size).is_none());
    }

    #[test]
    fn test_degenerate_slab_is_a_miss() {
        // zero y direction with the origin exactly on the expanded box's top edge
        let hit = ray_vs_box(Vec2::ZERO, Vec2::new(5.0, 0.0), Vec2::new(3.0, 1.0), Vec2::splat(2.0));
        assert!(hit.is_none());
    }

    #[test]
    fn test_resolve_stops_at_face() {
        let size = Vec2::splat(2.0);
        let velocity = Vec2::new(4.0, 1.0);
        let hit = sweep_box(Vec2::ZERO, size, velocity, Vec2::new(3.0, 0.0), size).unwrap();
        let corrected = resolve(velocity, &hit);
        assert!(approx(corrected.x, 1.0));
        assert!(approx(corrected.y, 1.0));
    }
}
