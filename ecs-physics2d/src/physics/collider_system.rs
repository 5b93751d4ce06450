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
//! Collider bookkeeping and queries

use super::collider::{Collider, ColliderHandle};
use super::sweep::sweep_box;
use crate::ecs::{Engine, EntityFamily, EntityId, RigidBody, System, Transform};
use crate::error::{EngineError, EngineResult};
use crate::family;
use crate::math::Vec2;
use log::trace;

/// World-space snapshot of one collider
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColliderBox {
    /// Which collider this is
    pub handle: ColliderHandle,
    /// Center of the box in world space
    pub center: Vec2,
    /// Full width and height
    pub size: Vec2,
    /// Whether the collider is a trigger
    pub trigger: bool,
}

/// A collider a body will reach during the current tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// The collider that would be hit
    pub other: ColliderHandle,
    /// Fraction of the tick's displacement at first touch
    pub t_hit: f32,
    /// Normal of the face that would be hit
    pub normal: Vec2,
    /// Whether the other collider is a trigger
    pub trigger: bool,
}

/// Snapshot every collider on the entities of `family`, in view order
pub(crate) fn collect_boxes(engine: &mut Engine, family: &EntityFamily) -> EngineResult<Vec<ColliderBox>> {
    let ids = engine.entities(family).to_vec();
    let mut boxes = Vec::with_capacity(ids.len());
    for id in ids {
        let entity = engine.entity(id).ok_or(EngineError::UnknownEntity(id))?;
        let transform = entity.get_component::<Transform>()?;
        for (index, collider) in entity.get_all_components::<Collider>().enumerate() {
            boxes.push(ColliderBox {
                handle: ColliderHandle::new(id, index),
                center: collider.world_center(transform),
                size: collider.size(),
                trigger: collider.is_trigger(),
            });
        }
    }
    Ok(boxes)
}

/// Tracks every collider in the engine
///
/// On each fixed tick it drops contact-set entries that point at entities
/// which have left the engine. It also answers time-of-impact queries and
/// exposes world-space boxes for a debug renderer.
pub struct ColliderSystem {
    family: EntityFamily,
    debug: bool,
}

impl ColliderSystem {
    /// Create the system with debug output off
    pub fn new() -> Self {
        ColliderSystem {
            family: family!(Transform, Collider),
            debug: false,
        }
    }

    /// Builder form of [`set_debug`](Self::set_debug)
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Whether debug boxes are produced
    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// Turn debug boxes on or off
    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    /// Handles of every collider in the world
    pub fn colliders(&self, engine: &mut Engine) -> EngineResult<Vec<ColliderHandle>> {
        Ok(collect_boxes(engine, &self.family)?
            .into_iter()
            .map(|collider| collider.handle)
            .collect())
    }

    /// World-space boxes of every collider
    pub fn boxes(&self, engine: &mut Engine) -> EngineResult<Vec<ColliderBox>> {
        collect_boxes(engine, &self.family)
    }

    /// World-space boxes for drawing, empty unless debug is on
    pub fn debug_boxes(&self, engine: &mut Engine) -> EngineResult<Vec<ColliderBox>> {
        if !self.debug {
            return Ok(Vec::new());
        }
        self.boxes(engine)
    }

    /// Colliders the body will touch this tick, nearest first
    ///
    /// The body's first collider is swept along its current velocity against
    /// every other collider; ties keep world order.
    pub fn ordered_contacts(&self, engine: &mut Engine, body: EntityId) -> EngineResult<Vec<Contact>> {
        let (origin, size, velocity) = {
            let entity = engine.entity(body).ok_or(EngineError::UnknownEntity(body))?;
            let transform = entity.get_component::<Transform>()?;
            let collider = entity.get_component::<Collider>()?;
            let velocity = entity.get_component::<RigidBody>()?.linear_velocity();
            (collider.world_center(transform), collider.size(), velocity)
        };
        let own = ColliderHandle::new(body, 0);

        let mut contacts: Vec<Contact> = collect_boxes(engine, &self.family)?
            .into_iter()
            .filter(|target| target.handle != own)
            .filter_map(|target| {
                sweep_box(origin, size, velocity, target.center, target.size).map(|hit| Contact {
                    other: target.handle,
                    t_hit: hit.t_hit,
                    normal: hit.normal,
                    trigger: target.trigger,
                })
            })
            .collect();
        contacts.sort_by(|a, b| a.t_hit.total_cmp(&b.t_hit));
        Ok(contacts)
    }

    fn prune_stale_contacts(&self, engine: &mut Engine) -> EngineResult<()> {
        for id in engine.entities(&self.family).to_vec() {
            let mut stale = Vec::new();
            {
                let view: &Engine = engine;
                let entity = view.entity(id).ok_or(EngineError::UnknownEntity(id))?;
                for (index, collider) in entity.get_all_components::<Collider>().enumerate() {
                    for other in collider.currently_colliding() {
                        if !view.contains(other.entity) {
                            stale.push((index, *other));
                        }
                    }
                }
            }
            for (index, other) in stale {
                trace!("dropping stale contact {} on {}", other, id);
                if let Some(collider) = engine
                    .entity_mut(id)
                    .and_then(|entity| entity.nth_component_mut::<Collider>(index))
                {
                    collider.end_contact(other);
                }
            }
        }
        Ok(())
    }
}

impl Default for ColliderSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for ColliderSystem {
    fn name(&self) -> &str {
        "ColliderSystem"
    }

    fn fixed_update(&mut self, engine: &mut Engine) -> EngineResult<()> {
        self.prune_stale_contacts(engine)
    }
}
