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
//! Swept collision scenarios
//!
//! Bodies are driven through the full engine with the stock systems so
//! integration, sweeping, contact ordering and resolution are exercised
//! together.

use ecs_physics2d::config::PhysicsConfig;
use ecs_physics2d::ecs::{Engine, Entity, EntityId, RigidBody, Transform};
use ecs_physics2d::math::Vec2;
use ecs_physics2d::physics::{sweep_box, Collider, ColliderSystem, PhysicsSystem};

const EPSILON: f32 = 1e-4;

fn assert_close(actual: Vec2, expected: Vec2) {
    assert!(
        (actual.x - expected.x).abs() < EPSILON && (actual.y - expected.y).abs() < EPSILON,
        "expected {}, got {}",
        expected,
        actual
    );
}

fn weightless_engine() -> Engine {
    Engine::with_default_systems(PhysicsConfig::new().with_gravity(Vec2::ZERO)).unwrap()
}

fn add_body(engine: &mut Engine, position: Vec2, side: f32, velocity: Vec2) -> EntityId {
    engine
        .add_entity(
            Entity::named("body")
                .with(Transform::new(position))
                .with(Collider::square(side))
                .with(RigidBody::new(1.0).with_velocity(velocity)),
        )
        .unwrap()
}

fn add_block(engine: &mut Engine, position: Vec2, side: f32) -> EntityId {
    engine
        .add_entity(
            Entity::named("block")
                .with(Transform::new(position))
                .with(Collider::square(side)),
        )
        .unwrap()
}

fn position(engine: &Engine, id: EntityId) -> Vec2 {
    engine.component::<Transform>(id).unwrap().position
}

fn velocity(engine: &Engine, id: EntityId) -> Vec2 {
    engine.component::<RigidBody>(id).unwrap().linear_velocity()
}

#[test]
fn test_gravity_accumulates_per_tick() {
    let config = PhysicsConfig::new()
        .with_gravity(Vec2::new(0.0, 2.0))
        .with_fixed_timestep(0.5);
    let mut engine = Engine::with_default_systems(config).unwrap();
    let id = add_body(&mut engine, Vec2::ZERO, 1.0, Vec2::ZERO);

    for _ in 0..4 {
        engine.fixed_update().unwrap();
    }

    assert_close(velocity(&engine, id), Vec2::new(0.0, 4.0));
    assert_close(position(&engine, id), Vec2::new(0.0, 10.0));
}

#[test]
fn test_fast_body_does_not_tunnel_through_thin_wall() {
    let mut engine = weightless_engine();
    let id = add_body(&mut engine, Vec2::ZERO, 2.0, Vec2::new(400.0, 0.0));
    engine
        .add_entity(
            Entity::named("wall")
                .with(Transform::at(101.25, 0.0))
                .with(Collider::new(Vec2::new(0.5, 50.0))),
        )
        .unwrap();

    engine.fixed_update().unwrap();

    // Right face of the body rests on the wall's left face at x = 101.
    assert_close(position(&engine, id), Vec2::new(100.0, 0.0));
}

#[test]
fn test_touching_exactly_at_end_of_tick_does_not_resolve() {
    let mut engine = weightless_engine();
    let id = add_body(&mut engine, Vec2::ZERO, 10.0, Vec2::new(10.0, 0.0));
    add_block(&mut engine, Vec2::new(20.0, 0.0), 10.0);

    engine.fixed_update().unwrap();
    assert_close(position(&engine, id), Vec2::new(10.0, 0.0));
    assert_close(velocity(&engine, id), Vec2::new(10.0, 0.0));
}

#[test]
fn test_contacts_are_ordered_by_time_of_impact() {
    let mut engine = weightless_engine();
    let id = add_body(&mut engine, Vec2::ZERO, 10.0, Vec2::new(100.0, 0.0));
    let far = add_block(&mut engine, Vec2::new(80.0, 0.0), 10.0);
    let near = add_block(&mut engine, Vec2::new(40.0, 0.0), 10.0);

    let contacts = ColliderSystem::new().ordered_contacts(&mut engine, id).unwrap();
    let order: Vec<EntityId> = contacts.iter().map(|c| c.other.entity).collect();
    assert_eq!(order, vec![near, far]);
    assert!((contacts[0].t_hit - 0.3).abs() < EPSILON);
    assert!((contacts[1].t_hit - 0.7).abs() < EPSILON);

    engine.fixed_update().unwrap();
    assert_close(position(&engine, id), Vec2::new(30.0, 0.0));
}

#[test]
fn test_corner_hit_resolves_along_x() {
    let mut engine = weightless_engine();
    let id = add_body(&mut engine, Vec2::ZERO, 2.0, Vec2::new(4.0, 4.0));
    add_block(&mut engine, Vec2::new(3.0, 3.0), 2.0);

    engine.fixed_update().unwrap();

    assert_close(velocity(&engine, id), Vec2::new(1.0, 4.0));
    assert_close(position(&engine, id), Vec2::new(1.0, 4.0));
}

#[test]
fn test_body_slides_along_floor() {
    let mut engine = weightless_engine();
    let id = add_body(&mut engine, Vec2::new(0.0, 0.0), 2.0, Vec2::new(3.0, 4.0));
    engine
        .add_entity(
            Entity::named("floor")
                .with(Transform::at(0.0, 3.0))
                .with(Collider::new(Vec2::new(100.0, 2.0))),
        )
        .unwrap();

    engine.fixed_update().unwrap();

    // Reaches the floor a quarter of the way through the tick.
    assert_close(velocity(&engine, id), Vec2::new(3.0, 1.0));
    assert_close(position(&engine, id), Vec2::new(3.0, 1.0));

    engine.fixed_update().unwrap();
    assert_close(position(&engine, id), Vec2::new(6.0, 1.0));
}

#[test]
fn test_kinematic_body_moves_but_ignores_gravity() {
    let mut engine = Engine::with_default_systems(PhysicsConfig::new()).unwrap();
    let platform = engine
        .add_entity(
            Entity::named("platform")
                .with(Transform::default())
                .with(Collider::new(Vec2::new(4.0, 1.0)))
                .with(RigidBody::kinematic().with_velocity(Vec2::new(0.5, 0.0))),
        )
        .unwrap();

    for _ in 0..4 {
        engine.fixed_update().unwrap();
        engine.update().unwrap();
    }

    assert_close(position(&engine, platform), Vec2::new(2.0, 0.0));
    assert_close(velocity(&engine, platform), Vec2::new(0.5, 0.0));
}

#[test]
fn test_kinematic_body_pushes_through_solid_blocks() {
    let mut engine = weightless_engine();
    let platform = engine
        .add_entity(
            Entity::named("platform")
                .with(Transform::default())
                .with(Collider::square(10.0))
                .with(RigidBody::kinematic().with_velocity(Vec2::new(20.0, 0.0))),
        )
        .unwrap();
    add_block(&mut engine, Vec2::new(25.0, 0.0), 10.0);

    engine.fixed_update().unwrap();

    assert_close(position(&engine, platform), Vec2::new(20.0, 0.0));
    assert_close(velocity(&engine, platform), Vec2::new(20.0, 0.0));
}

#[test]
fn test_world_force_accelerates_bodies() {
    let mut engine = weightless_engine();
    engine
        .get_system_mut::<PhysicsSystem>()
        .unwrap()
        .add_world_force("wind", Vec2::new(100.0, 0.0));
    let id = add_body(&mut engine, Vec2::ZERO, 1.0, Vec2::ZERO);

    // Forces are applied by the frame pass and integrated by the next fixed tick.
    engine.fixed_update().unwrap();
    assert_close(position(&engine, id), Vec2::ZERO);

    engine.update().unwrap();
    engine.fixed_update().unwrap();
    assert_close(velocity(&engine, id), Vec2::new(1.0, 0.0));
}

#[test]
fn test_sweep_matches_engine_resolution() {
    let size = Vec2::splat(10.0);
    let hit = sweep_box(Vec2::ZERO, size, Vec2::new(20.0, 0.0), Vec2::new(25.0, 0.0), size).unwrap();
    assert!((hit.t_hit - 0.75).abs() < EPSILON);

    let mut engine = weightless_engine();
    let id = add_body(&mut engine, Vec2::ZERO, 10.0, Vec2::new(20.0, 0.0));
    add_block(&mut engine, Vec2::new(25.0, 0.0), 10.0);
    engine.fixed_update().unwrap();
    assert_close(position(&engine, id), Vec2::new(15.0, 0.0));
}
