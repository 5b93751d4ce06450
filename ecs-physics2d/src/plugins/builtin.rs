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
//! Built-in plugins
//!
//! [`CorePlugin`] installs the stock systems and [`WorldForcePlugin`] adds
//! constant world forces to the installed [`PhysicsSystem`].

use super::api::Plugin;
use crate::config::PhysicsConfig;
use crate::ecs::{Engine, ScriptSystem};
use crate::error::EngineResult;
use crate::math::Vec2;
use crate::physics::{ColliderSystem, PhysicsSystem};

/// Installs the collider, script and physics systems, in that order
///
/// # Examples
///
/// ```
/// use ecs_physics2d::config::PhysicsConfig;
/// use ecs_physics2d::ecs::Engine;
/// use ecs_physics2d::physics::PhysicsSystem;
/// use ecs_physics2d::plugins::{CorePlugin, PluginRegistry};
///
/// let mut engine = Engine::new();
/// let mut registry = PluginRegistry::new();
/// registry.register(Box::new(CorePlugin::new(PhysicsConfig::default()))).unwrap();
/// registry.install_all(&mut engine).unwrap();
///
/// assert!(engine.has_system::<PhysicsSystem>());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CorePlugin {
    config: PhysicsConfig,
}

impl CorePlugin {
    /// Name other plugins use to depend on this one
    pub const NAME: &'static str = "core";

    /// Create the plugin with the physics configuration to install
    pub fn new(config: PhysicsConfig) -> Self {
        CorePlugin { config }
    }

    /// Configuration passed to the physics system
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }
}

impl Plugin for CorePlugin {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }

    fn build(&mut self, engine: &mut Engine) -> EngineResult<()> {
        engine.add_system(ColliderSystem::new())?;
        engine.add_system(ScriptSystem::new())?;
        engine.add_system(PhysicsSystem::new(self.config))
    }

    fn shutdown(&mut self, engine: &mut Engine) -> EngineResult<()> {
        engine.remove_system::<PhysicsSystem>()?;
        engine.remove_system::<ScriptSystem>()?;
        engine.remove_system::<ColliderSystem>()?;
        Ok(())
    }
}

/// Registers named constant forces, such as wind, with the physics system
///
/// Depends on [`CorePlugin`].
#[derive(Debug, Clone, Default)]
pub struct WorldForcePlugin {
    forces: Vec<(String, Vec2)>,
}

impl WorldForcePlugin {
    /// Create an empty plugin
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named force applied to every non-kinematic body each frame
    pub fn with_force(mut self, name: impl Into<String>, force: Vec2) -> Self {
        self.forces.push((name.into(), force));
        self
    }

    /// Number of forces this plugin installs
    pub fn force_count(&self) -> usize {
        self.forces.len()
    }
}

impl Plugin for WorldForcePlugin {
    fn name(&self) -> &str {
        "world_forces"
    }

    fn version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }

    fn dependencies(&self) -> Vec<&str> {
        vec![CorePlugin::NAME]
    }

    fn build(&mut self, engine: &mut Engine) -> EngineResult<()> {
        let physics = engine.get_system_mut::<PhysicsSystem>()?;
        for (name, force) in &self.forces {
            physics.add_world_force(name.clone(), *force);
        }
        Ok(())
    }

    fn shutdown(&mut self, engine: &mut Engine) -> EngineResult<()> {
        if let Ok(physics) = engine.get_system_mut::<PhysicsSystem>() {
            for (name, _) in &self.forces {
                physics.forces_mut().remove_provider(name);
            }
        }
        Ok(())
    }
}
