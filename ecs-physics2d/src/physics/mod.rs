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
//! 2D collision detection and response
//!
//! Colliders are axis-aligned boxes. Moving bodies are swept against every
//! other collider each fixed tick, so fast bodies cannot tunnel through thin
//! obstacles within a tick.

mod collider;
mod collider_system;
pub mod forces;
pub mod sweep;
mod system;

pub use collider::{Collider, ColliderHandle, TriggerEvent};
pub use collider_system::{ColliderBox, ColliderSystem, Contact};
pub use forces::{ConstantForce, ForceProvider, ForceRegistry};
pub use sweep::{ray_vs_box, sweep_box, RayHit};
pub use system::PhysicsSystem;
