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
//! Axis-aligned box colliders

use crate::ecs::{Component, EntityId, Transform};
use crate::math::Vec2;
use std::fmt;

/// Identifies one collider: its entity and its ordinal among that entity's
/// colliders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColliderHandle {
    /// Owning entity
    pub entity: EntityId,
    /// Zero-based index among the entity's colliders
    pub index: usize,
}

impl ColliderHandle {
    /// Create a handle
    pub fn new(entity: EntityId, index: usize) -> Self {
        ColliderHandle { entity, index }
    }
}

impl fmt::Display for ColliderHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Collider({}#{})", self.entity, self.index)
    }
}

/// A trigger collider started or stopped overlapping another collider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerEvent {
    /// The trigger side receiving the event
    pub trigger: ColliderHandle,
    /// The collider it touched
    pub other: ColliderHandle,
}

/// Box collider attached to an entity
///
/// The box is centered on the entity's transform position plus `offset`.
/// Triggers report enter/exit events and never block movement.
///
/// # Examples
///
/// ```
/// use ecs_physics2d::ecs::Transform;
/// use ecs_physics2d::math::Vec2;
/// use ecs_physics2d::physics::Collider;
///
/// let collider = Collider::new(Vec2::new(2.0, 4.0)).with_offset(Vec2::new(1.0, 0.0));
/// let transform = Transform::at(10.0, 10.0);
/// assert_eq!(collider.world_center(&transform), Vec2::new(11.0, 10.0));
/// assert_eq!(collider.min(&transform), Vec2::new(10.0, 8.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Collider {
    size: Vec2,
    offset: Vec2,
    trigger: bool,
    colliding: Vec<ColliderHandle>,
}

impl Collider {
    /// Create a solid box collider of the given size
    ///
    /// # Panics
    ///
    /// Panics if either dimension is negative or not finite.
    pub fn new(size: Vec2) -> Self {
        assert!(
            size.is_finite() && size.x >= 0.0 && size.y >= 0.0,
            "Collider size must be non-negative and finite"
        );
        Collider {
            size,
            offset: Vec2::ZERO,
            trigger: false,
            colliding: Vec::new(),
        }
    }

    /// Square collider with side length `side`
    pub fn square(side: f32) -> Self {
        Collider::new(Vec2::splat(side))
    }

    /// Builder form of [`set_offset`](Self::set_offset)
    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    /// Builder form of [`set_trigger`](Self::set_trigger)
    pub fn with_trigger(mut self, trigger: bool) -> Self {
        self.trigger = trigger;
        self
    }

    /// Full width and height of the box
    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Resize the box
    pub fn set_size(&mut self, size: Vec2) {
        self.size = size;
    }

    /// Offset of the box center from the transform position
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Move the box relative to the transform
    pub fn set_offset(&mut self, offset: Vec2) {
        self.offset = offset;
    }

    /// Whether this collider is a trigger
    pub fn is_trigger(&self) -> bool {
        self.trigger
    }

    /// Turn trigger behaviour on or off
    pub fn set_trigger(&mut self, trigger: bool) {
        self.trigger = trigger;
    }

    /// World-space center of the box
    pub fn world_center(&self, transform: &Transform) -> Vec2 {
        transform.position + self.offset
    }

    /// World-space minimum corner
    pub fn min(&self, transform: &Transform) -> Vec2 {
        self.world_center(transform) - self.size / 2.0
    }

    /// World-space maximum corner
    pub fn max(&self, transform: &Transform) -> Vec2 {
        self.world_center(transform) + self.size / 2.0
    }

    /// Colliders this one is currently overlapping through a trigger pair
    pub fn currently_colliding(&self) -> &[ColliderHandle] {
        &self.colliding
    }

    /// Whether this collider is currently overlapping `other`
    pub fn is_colliding_with(&self, other: ColliderHandle) -> bool {
        self.colliding.contains(&other)
    }

    /// Whether this collider is overlapping anything
    pub fn is_colliding_with_anything(&self) -> bool {
        !self.colliding.is_empty()
    }

    pub(crate) fn begin_contact(&mut self, other: ColliderHandle) {
        if !self.colliding.contains(&other) {
            self.colliding.push(other);
        }
    }

    pub(crate) fn end_contact(&mut self, other: ColliderHandle) {
        self.colliding.retain(|handle| *handle != other);
    }
}

impl Component for Collider {
    fn on_deactivate(&mut self) {
        self.colliding.clear();
    }
}
