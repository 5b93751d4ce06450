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
//! Benchmarks for full engine ticks
//!
//! These benchmarks measure:
//! - A fixed tick of N falling bodies above a floor
//! - Attaching and detaching entities with cached views in place

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use ecs_physics2d::config::PhysicsConfig;
use ecs_physics2d::ecs::{Engine, Entity, RigidBody, Tag, Transform};
use ecs_physics2d::family;
use ecs_physics2d::math::Vec2;
use ecs_physics2d::physics::Collider;

fn populated_engine(body_count: usize) -> Engine {
    let mut engine = Engine::with_default_systems(PhysicsConfig::default())
        .expect("fresh engine accepts stock systems");
    engine
        .add_entity(
            Entity::named("floor")
                .with(Transform::at(0.0, 100.0))
                .with(Collider::new(Vec2::new(10_000.0, 4.0))),
        )
        .expect("floor attaches");
    for i in 0..body_count {
        engine
            .add_entity(
                Entity::new()
                    .with(Transform::at(i as f32 * 3.0, (i % 10) as f32 * 4.0))
                    .with(Collider::square(2.0))
                    .with(RigidBody::new(1.0)),
            )
            .expect("body attaches");
    }
    engine
}

/// Benchmark: one fixed and one variable pass over N bodies
fn bench_engine_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_tick");

    for body_count in [10, 100, 500].iter() {
        group.throughput(Throughput::Elements(*body_count as u64));
        group.bench_with_input(
            BenchmarkId::new("fixed_and_variable", body_count),
            body_count,
            |b, &count| {
                b.iter_batched(
                    || populated_engine(count),
                    |mut engine| {
                        engine.fixed_update().expect("fixed pass succeeds");
                        engine.update().expect("variable pass succeeds");
                        black_box(engine);
                    },
                    BatchSize::SmallInput,
                );
            },
        );
    }

    group.finish();
}

/// Benchmark: attach then detach N entities while views are cached
fn bench_attach_detach(c: &mut Criterion) {
    let mut group = c.benchmark_group("attach_detach");

    for entity_count in [100, 1000].iter() {
        group.throughput(Throughput::Elements(*entity_count as u64));
        group.bench_with_input(
            BenchmarkId::new("with_views", entity_count),
            entity_count,
            |b, &count| {
                b.iter(|| {
                    let mut engine = Engine::new();
                    let positioned = family!(Transform);
                    engine.entities(&positioned);
                    engine.entities_with_tag(Tag::Enemy);

                    let ids: Vec<_> = (0..count)
                        .map(|i| {
                            engine
                                .add_entity(
                                    Entity::new()
                                        .with(Transform::at(i as f32, 0.0))
                                        .with_tag(Tag::Enemy),
                                )
                                .expect("entity attaches")
                        })
                        .collect();
                    for id in ids {
                        engine.remove_entity(id).expect("entity detaches");
                    }
                    black_box(engine.entity_count());
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_engine_tick, bench_attach_detach);
criterion_main!(benches);
