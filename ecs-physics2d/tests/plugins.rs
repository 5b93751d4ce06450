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
//! Plugin installation against a live engine

use ecs_physics2d::config::PhysicsConfig;
use ecs_physics2d::ecs::{Engine, Entity, EntityId, RigidBody, Tag, Transform};
use ecs_physics2d::error::{EngineError, EngineResult};
use ecs_physics2d::math::Vec2;
use ecs_physics2d::physics::{Collider, PhysicsSystem};
use ecs_physics2d::plugins::{CorePlugin, Plugin, PluginRegistry, WorldForcePlugin};
use ecs_physics2d::register_plugin;

/// Spawns a player standing on a floor
#[derive(Default)]
struct LevelPlugin {
    spawned: Vec<EntityId>,
}

impl Plugin for LevelPlugin {
    fn name(&self) -> &str {
        "level"
    }

    fn version(&self) -> &str {
        "1.0.0"
    }

    fn dependencies(&self) -> Vec<&str> {
        vec!["world_forces", "core"]
    }

    fn build(&mut self, engine: &mut Engine) -> EngineResult<()> {
        let floor = engine.add_entity(
            Entity::named("floor")
                .with(Transform::at(0.0, 10.0))
                .with(Collider::new(Vec2::new(1000.0, 2.0))),
        )?;
        let player = engine.add_entity(
            Entity::named("player")
                .with_tag(Tag::Player)
                .with(Transform::at(0.0, 0.0))
                .with(Collider::square(2.0))
                .with(RigidBody::new(1.0)),
        )?;
        self.spawned = vec![floor, player];
        Ok(())
    }

    fn shutdown(&mut self, engine: &mut Engine) -> EngineResult<()> {
        for id in self.spawned.drain(..) {
            engine.remove_entity(id)?;
        }
        Ok(())
    }
}

fn install() -> EngineResult<(Engine, PluginRegistry)> {
    let mut engine = Engine::new();
    let mut registry = PluginRegistry::new();
    register_plugin!(registry, LevelPlugin::default());
    register_plugin!(
        registry,
        WorldForcePlugin::new().with_force("wind", Vec2::new(50.0, 0.0))
    );
    register_plugin!(
        registry,
        CorePlugin::new(
            PhysicsConfig::new()
                .with_gravity(Vec2::new(0.0, 160.0))
                .with_fixed_timestep(0.1)
        )
    );
    registry.install_all(&mut engine)?;
    Ok((engine, registry))
}

#[test]
fn test_plugins_install_in_dependency_order() {
    let (engine, registry) = install().unwrap();
    assert_eq!(registry.load_order(), vec!["core", "world_forces", "level"]);
    assert_eq!(engine.system_count(), 3);
    assert_eq!(engine.entity_count(), 2);
}

#[test]
fn test_installed_world_runs() {
    let (mut engine, _registry) = install().unwrap();
    let player = engine.find_entity("player").unwrap();

    for _ in 0..5 {
        engine.update().unwrap();
        engine.fixed_update().unwrap();
    }

    let transform = engine.component::<Transform>(player).unwrap();
    assert!(transform.position.x > 0.0, "wind should push the player");
    // Bottom face stays on the floor's top face at y = 9.
    assert!(transform.position.y <= 8.0 + 1e-4);
    assert_eq!(
        engine
            .get_system::<PhysicsSystem>()
            .unwrap()
            .forces()
            .provider_count(),
        1
    );
}

#[test]
fn test_shutdown_reverses_installation() {
    let (mut engine, mut registry) = install().unwrap();
    registry.shutdown_all(&mut engine).unwrap();

    assert_eq!(engine.entity_count(), 0);
    assert_eq!(engine.system_count(), 0);
    assert!(!registry.is_installed());
}

#[test]
fn test_plugin_errors_surface_as_engine_errors() {
    let mut registry = PluginRegistry::new();
    registry.register(Box::new(LevelPlugin::default())).unwrap();

    let mut engine = Engine::new();
    match registry.install_all(&mut engine) {
        Err(EngineError::Plugin(message)) => assert!(message.contains("world_forces")),
        other => panic!("unexpected result: {:?}", other),
    }
}
