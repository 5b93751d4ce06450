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
//! Falling boxes example
//!
//! Drops a column of boxes onto a floor, blows a gust of wind across them
//! and counts the boxes passing through a trigger zone on the right. Frames
//! are simulated at 60 Hz and paced onto the fixed physics rate with
//! `FixedTimestep`.
//!
//! Run with `RUST_LOG=debug` to see engine activity.

use ecs_physics2d::clock::FixedTimestep;
use ecs_physics2d::config::LoopConfig;
use ecs_physics2d::ecs::script::ScriptContext;
use ecs_physics2d::ecs::{Engine, Entity, EntityScript, RigidBody, Script, Tag, Transform};
use ecs_physics2d::error::EngineResult;
use ecs_physics2d::math::Vec2;
use ecs_physics2d::physics::{Collider, ColliderHandle};
use ecs_physics2d::plugins::{CorePlugin, PluginRegistry, WorldForcePlugin};
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

/// Counts every collider that enters the goal zone
struct Goal {
    scored: Rc<Cell<u32>>,
}

impl EntityScript for Goal {
    fn on_trigger_enter(
        &mut self,
        _ctx: &mut ScriptContext<'_>,
        other: ColliderHandle,
    ) -> EngineResult<()> {
        self.scored.set(self.scored.get() + 1);
        println!("  goal! {} entered the zone", other);
        Ok(())
    }
}

fn main() -> EngineResult<()> {
    env_logger::init();

    println!("ECS Physics 2D - Falling Boxes Example");
    println!("======================================\n");

    let loop_config = LoopConfig::from_env();
    let physics_config = loop_config.physics().with_gravity(Vec2::new(0.0, 30.0));

    let mut engine = Engine::new();
    let mut registry = PluginRegistry::new();
    registry.register(Box::new(CorePlugin::new(physics_config)))?;
    registry.register(Box::new(
        WorldForcePlugin::new().with_force("wind", Vec2::new(40.0, 0.0)),
    ))?;
    registry.install_all(&mut engine)?;
    println!("Installed plugins: {:?}", registry.load_order());

    engine.add_entity(
        Entity::named("floor")
            .with(Transform::at(0.0, 20.0))
            .with(Collider::new(Vec2::new(200.0, 2.0))),
    )?;

    let scored = Rc::new(Cell::new(0));
    engine.add_entity(
        Entity::named("goal")
            .with_tag(Tag::Finish)
            .with(Transform::at(12.0, 10.0))
            .with(Collider::new(Vec2::new(2.0, 20.0)).with_trigger(true))
            .with(Script::new(Goal {
                scored: Rc::clone(&scored),
            })),
    )?;

    for i in 0..5 {
        engine.add_entity(
            Entity::named(format!("box{}", i))
                .with(Transform::at(i as f32 * 0.1, -(i as f32) * 3.0))
                .with(Collider::square(1.0))
                .with(RigidBody::new(1.0 + i as f32)),
        )?;
    }
    println!("Spawned {} entities\n", engine.entity_count());

    let mut clock = FixedTimestep::new(loop_config);
    let frame = Duration::from_micros(16_667);
    let mut fixed_ticks = 0;

    for frame_index in 0..180 {
        let ticks = clock.advance(frame);
        for _ in 0..ticks.fixed_updates {
            engine.fixed_update()?;
        }
        fixed_ticks += ticks.fixed_updates;
        engine.update()?;

        if frame_index % 60 == 59 {
            println!("After {} frames ({} fixed ticks):", frame_index + 1, fixed_ticks);
            for i in 0..5 {
                let name = format!("box{}", i);
                if let Some(id) = engine.find_entity(&name) {
                    let position = engine.component::<Transform>(id)?.position;
                    println!("  {} at ({:.2}, {:.2})", name, position.x, position.y);
                }
            }
        }
    }

    println!("\nBoxes through the goal: {}", scored.get());

    registry.shutdown_all(&mut engine)?;
    engine.dispose()?;
    println!("Engine disposed");
    Ok(())
}
