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
//! # ECS Physics 2D
//!
//! An entity-component-system registry with continuous (swept) axis-aligned
//! box collision for 2D games.
//!
//! ## Features
//!
//! - **Entities as containers**: ordered components with first-of-type
//!   lookup, tags, layers and names
//! - **Cached views**: family, tag and layer queries maintained
//!   incrementally as entities come and go
//! - **Deferred mutation**: adds and removes issued mid-update apply once
//!   the pass completes
//! - **Swept AABB collision**: bodies are swept against every collider
//!   each fixed tick, so fast movers cannot tunnel through thin walls
//! - **Triggers and scripts**: per-entity behaviours receive lifecycle,
//!   update and trigger callbacks
//! - **Extensibility**: plugins bundle systems and world forces
//!
//! ## Example
//!
//! ```rust
//! use ecs_physics2d::config::PhysicsConfig;
//! use ecs_physics2d::ecs::{Engine, Entity, RigidBody, Transform};
//! use ecs_physics2d::math::Vec2;
//! use ecs_physics2d::physics::Collider;
//!
//! let mut engine = Engine::with_default_systems(
//!     PhysicsConfig::default().with_gravity(Vec2::ZERO),
//! ).unwrap();
//!
//! let ball = engine.add_entity(
//!     Entity::named("ball")
//!         .with(Transform::at(0.0, 0.0))
//!         .with(RigidBody::new(1.0).with_velocity(Vec2::new(1.0, 0.0)))
//!         .with(Collider::square(1.0)),
//! ).unwrap();
//!
//! engine.fixed_update().unwrap();
//! engine.update().unwrap();
//!
//! let position = engine.component::<Transform>(ball).unwrap().position;
//! assert_eq!(position, Vec2::new(1.0, 0.0));
//! ```

#![warn(missing_docs)]

/// Fixed-timestep pacing for game loops
pub mod clock;

/// Physics and loop configuration with environment overrides
pub mod config;

/// Entity Component System implementation
pub mod ecs;

/// Error types
pub mod error;

/// 2D vector math
pub mod math;

/// Swept collision detection and rigid body response
pub mod physics;

/// Plugin system for extensibility
pub mod plugins;

pub use ecs::{Engine, Entity, EntityId};
pub use error::{EngineError, EngineResult};
pub use math::Vec2;
