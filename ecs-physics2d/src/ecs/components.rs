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
//! Spatial and dynamics components
//!
//! [`Transform`] places an entity in the world; [`RigidBody`] carries the
//! state integrated by the physics system each fixed tick. A rigid body is
//! paired with the first [`Collider`](crate::physics::Collider) on the same
//! entity, which supplies its swept box.

use crate::ecs::Component;
use crate::math::Vec2;
use log::warn;

/// Position, scale and rotation of an entity
///
/// # Examples
///
/// ```
/// use ecs_physics2d::ecs::Transform;
/// use ecs_physics2d::math::Vec2;
///
/// let mut transform = Transform::at(1.0, 2.0);
/// transform.translate(Vec2::new(0.5, -1.0));
/// assert_eq!(transform.position, Vec2::new(1.5, 1.0));
/// assert_eq!(transform.scale, Vec2::ONE);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// World position of the entity's center
    pub position: Vec2,
    /// Render scale, (1, 1) by default
    pub scale: Vec2,
    /// Rotation in radians
    pub rotation: f32,
}

impl Transform {
    /// Create a transform at `position`
    pub fn new(position: Vec2) -> Self {
        Transform {
            position,
            scale: Vec2::ONE,
            rotation: 0.0,
        }
    }

    /// Create a transform at `(x, y)`
    pub fn at(x: f32, y: f32) -> Self {
        Transform::new(Vec2::new(x, y))
    }

    /// Move by `delta`
    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }
}

impl Default for Transform {
    fn default() -> Self {
        Transform::new(Vec2::ZERO)
    }
}

impl Component for Transform {}

/// Dynamics state of a body
///
/// `linear_velocity` is the displacement applied to the transform per fixed
/// tick. Forces applied during a frame are integrated on the next fixed tick
/// and cleared by the physics system's variable pass.
///
/// # Examples
///
/// ```
/// use ecs_physics2d::ecs::RigidBody;
/// use ecs_physics2d::math::Vec2;
///
/// let mut body = RigidBody::new(2.0);
/// assert!(body.apply_force(Vec2::new(4.0, 0.0)));
/// assert_eq!(body.force(), Vec2::new(4.0, 0.0));
///
/// let mut platform = RigidBody::kinematic();
/// assert!(!platform.apply_force(Vec2::new(4.0, 0.0)));
/// assert!(!platform.simulates_gravity());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RigidBody {
    linear_velocity: Vec2,
    force: Vec2,
    mass: f32,
    kinematic: bool,
    simulate_gravity: bool,
    physics_updating: bool,
}

impl RigidBody {
    /// Create a dynamic body with gravity enabled
    ///
    /// # Panics
    ///
    /// Panics if the mass is not positive and finite. Use `try_new` for
    /// fallible construction.
    pub fn new(mass: f32) -> Self {
        assert!(mass > 0.0 && mass.is_finite(), "Mass must be positive and finite");
        RigidBody {
            linear_velocity: Vec2::ZERO,
            force: Vec2::ZERO,
            mass,
            kinematic: false,
            simulate_gravity: true,
            physics_updating: false,
        }
    }

    /// Try to create a dynamic body
    ///
    /// Returns `None` if the mass is not positive and finite.
    pub fn try_new(mass: f32) -> Option<Self> {
        if mass > 0.0 && mass.is_finite() {
            Some(RigidBody::new(mass))
        } else {
            None
        }
    }

    /// Create a kinematic body of unit mass
    pub fn kinematic() -> Self {
        let mut body = RigidBody::new(1.0);
        body.set_kinematic(true);
        body
    }

    /// Builder form of [`set_linear_velocity`](Self::set_linear_velocity)
    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.linear_velocity = velocity;
        self
    }

    /// Builder form of [`set_simulate_gravity`](Self::set_simulate_gravity)
    pub fn with_gravity(mut self, enabled: bool) -> Self {
        self.set_simulate_gravity(enabled);
        self
    }

    /// Per-tick displacement
    pub fn linear_velocity(&self) -> Vec2 {
        self.linear_velocity
    }

    /// Overwrite the per-tick displacement
    pub fn set_linear_velocity(&mut self, velocity: Vec2) {
        self.linear_velocity = velocity;
    }

    /// Force accumulated since the last reset
    pub fn force(&self) -> Vec2 {
        self.force
    }

    /// Get the mass
    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Set the mass
    ///
    /// # Panics
    ///
    /// Panics if the mass is not positive and finite.
    pub fn set_mass(&mut self, mass: f32) {
        assert!(mass > 0.0 && mass.is_finite(), "Mass must be positive and finite");
        self.mass = mass;
    }

    /// Whether the body ignores forces and gravity
    pub fn is_kinematic(&self) -> bool {
        self.kinematic
    }

    /// Make the body kinematic; this also switches gravity off
    pub fn set_kinematic(&mut self, kinematic: bool) {
        self.kinematic = kinematic;
        if kinematic {
            self.simulate_gravity = false;
        }
    }

    /// Whether gravity is integrated for this body
    pub fn simulates_gravity(&self) -> bool {
        self.simulate_gravity
    }

    /// Enable or disable gravity; kinematic bodies stay gravity-free
    pub fn set_simulate_gravity(&mut self, enabled: bool) {
        if enabled && self.kinematic {
            warn!("ignoring gravity on a kinematic body");
            return;
        }
        self.simulate_gravity = enabled;
    }

    /// Whether the body has been integrated since its last force reset
    pub fn is_physics_updating(&self) -> bool {
        self.physics_updating
    }

    /// Accumulate a force for the next integration
    ///
    /// Ignored (returns `false`) for kinematic bodies and while the body is
    /// between its integration and the next force reset.
    pub fn apply_force(&mut self, force: Vec2) -> bool {
        if self.kinematic || self.physics_updating {
            return false;
        }
        self.force += force;
        true
    }

    pub(crate) fn reset_force(&mut self) {
        self.force = Vec2::ZERO;
        self.physics_updating = false;
    }

    pub(crate) fn add_world_force(&mut self, force: Vec2) {
        if !self.kinematic {
            self.force += force;
        }
    }

    /// Fold force and gravity into the velocity for one tick of `dt`
    pub(crate) fn integrate(&mut self, gravity: Vec2, dt: f32) {
        self.physics_updating = true;
        if self.kinematic {
            return;
        }
        let mut acceleration = Vec2::ZERO;
        if !self.force.is_zero() {
            acceleration += self.force / self.mass * dt;
        }
        if self.simulate_gravity {
            acceleration += gravity * dt;
        }
        self.linear_velocity += acceleration;
    }
}

impl Default for RigidBody {
    fn default() -> Self {
        RigidBody::new(1.0)
    }
}

impl Component for RigidBody {}
