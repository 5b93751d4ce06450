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
//! Rigid body integration with continuous collision response
//!
//! Each fixed tick, every body (an entity with a [`Transform`], a
//! [`RigidBody`] and a [`Collider`]) is processed in view order:
//!
//! 1. force and gravity are folded into its per-tick velocity;
//! 2. if it is moving, its first collider is swept against every other
//!    collider in the world, raising trigger enter/exit events;
//! 3. contacts are sorted by time of impact and resolved nearest first,
//!    each one re-swept against the velocity corrected so far (kinematic
//!    and trigger bodies skip this step);
//! 4. the transform moves by the final velocity.
//!
//! The variable pass clears accumulated forces and applies world forces.

use super::collider::{Collider, ColliderHandle, TriggerEvent};
use super::collider_system::{collect_boxes, ColliderBox};
use super::forces::{ConstantForce, ForceRegistry};
use super::sweep::{resolve, sweep_box};
use crate::config::PhysicsConfig;
use crate::ecs::{Engine, EntityFamily, EntityId, RigidBody, System, Transform};
use crate::error::{EngineError, EngineResult};
use crate::family;
use crate::math::Vec2;
use log::trace;

/// Moves rigid bodies and resolves their collisions
pub struct PhysicsSystem {
    config: PhysicsConfig,
    forces: ForceRegistry,
    bodies: EntityFamily,
    colliders: EntityFamily,
}

impl PhysicsSystem {
    /// Create the system from a configuration
    pub fn new(config: PhysicsConfig) -> Self {
        let mut forces = ForceRegistry::new();
        forces.max_force_magnitude = config.max_force_magnitude;
        PhysicsSystem {
            config,
            forces,
            bodies: family!(Transform, RigidBody, Collider),
            colliders: family!(Transform, Collider),
        }
    }

    /// Current configuration
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Gravity applied to bodies that simulate it
    pub fn gravity(&self) -> Vec2 {
        self.config.gravity
    }

    /// Change gravity
    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.config.gravity = gravity;
    }

    /// Duration of one fixed tick in seconds
    pub fn fixed_timestep(&self) -> f32 {
        self.config.fixed_timestep
    }

    /// World force providers
    pub fn forces(&self) -> &ForceRegistry {
        &self.forces
    }

    /// World force providers, mutably
    pub fn forces_mut(&mut self) -> &mut ForceRegistry {
        &mut self.forces
    }

    /// Register a constant world force, such as wind
    pub fn add_world_force(&mut self, name: impl Into<String>, force: Vec2) {
        self.forces
            .register_provider(Box::new(ConstantForce::new(name, force)));
    }

    fn step_body(&self, engine: &mut Engine, id: EntityId) -> EngineResult<()> {
        let own = ColliderHandle::new(id, 0);
        let (origin, size, velocity, own_trigger, kinematic) = {
            let entity = engine.entity_mut(id).ok_or(EngineError::UnknownEntity(id))?;
            let body = entity.get_component_mut::<RigidBody>()?;
            body.integrate(self.config.gravity, self.config.fixed_timestep);
            let velocity = body.linear_velocity();
            let kinematic = body.is_kinematic();
            let transform = entity.get_component::<Transform>()?;
            let collider = entity.get_component::<Collider>()?;
            (
                collider.world_center(transform),
                collider.size(),
                velocity,
                collider.is_trigger(),
                kinematic,
            )
        };
        if velocity.is_zero() {
            return Ok(());
        }

        let mut first_error = None;
        let mut contacts: Vec<(ColliderBox, f32)> = Vec::new();
        for target in collect_boxes(engine, &self.colliders)? {
            if target.handle == own {
                continue;
            }
            let hit = sweep_box(origin, size, velocity, target.center, target.size);
            if let Some(hit) = &hit {
                contacts.push((target, hit.t_hit));
            }
            if !own_trigger && !target.trigger {
                continue;
            }

            let was_touching = engine
                .entity(id)
                .and_then(|entity| entity.nth_component::<Collider>(0))
                .map_or(false, |collider| collider.is_colliding_with(target.handle));
            let entered = match (hit.is_some(), was_touching) {
                (true, false) => true,
                (false, true) => false,
                _ => continue,
            };
            set_touching(engine, own, target.handle, entered);

            let sides = [
                (own, target.handle, own_trigger),
                (target.handle, own, target.trigger),
            ];
            for (trigger, other, is_trigger) in sides {
                if !is_trigger {
                    continue;
                }
                let event = TriggerEvent { trigger, other };
                trace!("trigger {} {} {}", trigger, if entered { "entered" } else { "exited" }, other);
                let dispatched = if entered {
                    engine.dispatch_trigger_enter(event)
                } else {
                    engine.dispatch_trigger_exit(event)
                };
                if let Err(err) = dispatched {
                    first_error.get_or_insert(err);
                }
            }
        }

        contacts.sort_by(|a, b| a.1.total_cmp(&b.1));

        let entity = engine.entity_mut(id).ok_or(EngineError::UnknownEntity(id))?;
        let mut velocity = entity.get_component::<RigidBody>()?.linear_velocity();
        if !own_trigger && !kinematic {
            for (target, _) in contacts.iter().filter(|(target, _)| !target.trigger) {
                if let Some(hit) = sweep_box(origin, size, velocity, target.center, target.size) {
                    trace!("{} hits {} at t={}", id, target.handle, hit.t_hit);
                    velocity = resolve(velocity, &hit);
                }
            }
        }
        entity.get_component_mut::<RigidBody>()?.set_linear_velocity(velocity);
        entity.get_component_mut::<Transform>()?.translate(velocity);

        first_error.map_or(Ok(()), Err)
    }
}

fn set_touching(engine: &mut Engine, a: ColliderHandle, b: ColliderHandle, touching: bool) {
    for (this, other) in [(a, b), (b, a)] {
        let collider = engine
            .entity_mut(this.entity)
            .and_then(|entity| entity.nth_component_mut::<Collider>(this.index));
        if let Some(collider) = collider {
            if touching {
                collider.begin_contact(other);
            } else {
                collider.end_contact(other);
            }
        }
    }
}

impl Default for PhysicsSystem {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}

impl System for PhysicsSystem {
    fn name(&self) -> &str {
        "PhysicsSystem"
    }

    fn fixed_update(&mut self, engine: &mut Engine) -> EngineResult<()> {
        let mut first_error = None;
        for id in engine.entities(&self.bodies).to_vec() {
            if let Err(err) = self.step_body(engine, id) {
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn update(&mut self, engine: &mut Engine) -> EngineResult<()> {
        for id in engine.entities(&self.bodies).to_vec() {
            let world_force = match engine.entity(id) {
                Some(entity) => self.forces.total_force(entity),
                None => continue,
            };
            let body = engine.component_mut::<RigidBody>(id)?;
            body.reset_force();
            if let Some(force) = world_force {
                body.add_world_force(force);
            }
        }
        Ok(())
    }
}
