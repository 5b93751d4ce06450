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
//! Trigger enter/exit events
//!
//! A trigger collider never blocks movement. Each side of a touching pair
//! that is a trigger receives its own event, through the engine's trigger
//! signals and through the scripts on its entity.

use ecs_physics2d::config::PhysicsConfig;
use ecs_physics2d::ecs::script::ScriptContext;
use ecs_physics2d::ecs::{Engine, Entity, EntityId, EntityScript, RigidBody, Script, Transform};
use ecs_physics2d::error::EngineResult;
use ecs_physics2d::math::Vec2;
use ecs_physics2d::physics::{Collider, ColliderHandle, TriggerEvent};
use std::cell::RefCell;
use std::rc::Rc;

type Events = Rc<RefCell<Vec<TriggerEvent>>>;

struct Harness {
    engine: Engine,
    entered: Events,
    exited: Events,
}

impl Harness {
    fn new() -> Self {
        let mut engine =
            Engine::with_default_systems(PhysicsConfig::new().with_gravity(Vec2::ZERO)).unwrap();
        let entered: Events = Rc::new(RefCell::new(Vec::new()));
        let exited: Events = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&entered);
        engine
            .trigger_enter_signal()
            .connect(move |event: &TriggerEvent| sink.borrow_mut().push(*event));
        let sink = Rc::clone(&exited);
        engine
            .trigger_exit_signal()
            .connect(move |event: &TriggerEvent| sink.borrow_mut().push(*event));

        Harness {
            engine,
            entered,
            exited,
        }
    }

    fn mover(&mut self, trigger: bool) -> EntityId {
        self.engine
            .add_entity(
                Entity::named("mover")
                    .with(Transform::at(0.0, 0.0))
                    .with(Collider::square(10.0).with_trigger(trigger))
                    .with(RigidBody::new(1.0).with_velocity(Vec2::new(20.0, 0.0))),
            )
            .unwrap()
    }

    fn zone(&mut self, trigger: bool) -> EntityId {
        self.engine
            .add_entity(
                Entity::named("zone")
                    .with(Transform::at(25.0, 0.0))
                    .with(Collider::square(10.0).with_trigger(trigger)),
            )
            .unwrap()
    }

    fn x(&self, id: EntityId) -> f32 {
        self.engine.component::<Transform>(id).unwrap().position.x
    }
}

fn handle(id: EntityId) -> ColliderHandle {
    ColliderHandle::new(id, 0)
}

#[test]
fn test_solid_body_entering_trigger_raises_one_event() {
    let mut harness = Harness::new();
    let mover = harness.mover(false);
    let zone = harness.zone(true);

    harness.engine.fixed_update().unwrap();

    assert_eq!(
        *harness.entered.borrow(),
        vec![TriggerEvent {
            trigger: handle(zone),
            other: handle(mover),
        }]
    );
    assert_eq!(harness.x(mover), 20.0);

    let collider = harness.engine.component::<Collider>(mover).unwrap();
    assert!(collider.is_colliding_with(handle(zone)));
    let collider = harness.engine.component::<Collider>(zone).unwrap();
    assert!(collider.is_colliding_with(handle(mover)));
}

#[test]
fn test_exit_follows_when_sweep_no_longer_hits() {
    let mut harness = Harness::new();
    let mover = harness.mover(false);
    let zone = harness.zone(true);

    harness.engine.fixed_update().unwrap();
    assert!(harness.exited.borrow().is_empty());

    harness.engine.fixed_update().unwrap();
    assert_eq!(harness.entered.borrow().len(), 1);
    assert_eq!(
        *harness.exited.borrow(),
        vec![TriggerEvent {
            trigger: handle(zone),
            other: handle(mover),
        }]
    );
    assert!(!harness
        .engine
        .component::<Collider>(mover)
        .unwrap()
        .is_colliding_with_anything());
}

#[test]
fn test_two_triggers_raise_an_event_each() {
    let mut harness = Harness::new();
    let mover = harness.mover(true);
    let zone = harness.zone(true);

    harness.engine.fixed_update().unwrap();

    assert_eq!(
        *harness.entered.borrow(),
        vec![
            TriggerEvent {
                trigger: handle(mover),
                other: handle(zone),
            },
            TriggerEvent {
                trigger: handle(zone),
                other: handle(mover),
            },
        ]
    );
}

#[test]
fn test_trigger_body_passes_through_solid() {
    let mut harness = Harness::new();
    let mover = harness.mover(true);
    let wall = harness.zone(false);

    harness.engine.fixed_update().unwrap();

    assert_eq!(harness.x(mover), 20.0);
    assert_eq!(
        *harness.entered.borrow(),
        vec![TriggerEvent {
            trigger: handle(mover),
            other: handle(wall),
        }]
    );
}

#[test]
fn test_solid_pair_raises_no_events() {
    let mut harness = Harness::new();
    let mover = harness.mover(false);
    harness.zone(false);

    harness.engine.fixed_update().unwrap();

    assert!(harness.entered.borrow().is_empty());
    assert_eq!(harness.x(mover), 15.0);
}

/// Counts pickups and removes its own entity when touched
struct Coin {
    collected_by: Rc<RefCell<Vec<ColliderHandle>>>,
}

impl EntityScript for Coin {
    fn on_trigger_enter(
        &mut self,
        ctx: &mut ScriptContext<'_>,
        other: ColliderHandle,
    ) -> EngineResult<()> {
        self.collected_by.borrow_mut().push(other);
        ctx.destroy()
    }
}

#[test]
fn test_script_collects_coin_and_destroys_it_after_the_pass() {
    let mut harness = Harness::new();
    let collected = Rc::new(RefCell::new(Vec::new()));
    let mover = harness.mover(false);
    let coin = harness
        .engine
        .add_entity(
            Entity::named("coin")
                .with(Transform::at(25.0, 0.0))
                .with(Collider::square(10.0).with_trigger(true))
                .with(Script::new(Coin {
                    collected_by: Rc::clone(&collected),
                })),
        )
        .unwrap();

    harness.engine.fixed_update().unwrap();
    assert!(!harness.engine.contains(coin));
    assert_eq!(*collected.borrow(), vec![handle(mover)]);

    // The stale contact is pruned without an exit event.
    harness.engine.fixed_update().unwrap();
    assert!(harness.exited.borrow().is_empty());
    assert!(!harness
        .engine
        .component::<Collider>(mover)
        .unwrap()
        .is_colliding_with_anything());
}
