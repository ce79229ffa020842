//! # World Benchmarks
//!
//! 1. Entity pool churn (create + destroy at full capacity)
//! 2. One frame over a full pool of moving actors

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use keel_core::{
    BackendError, Capability, Dependencies, EntityPool, Environment, RenderBackend,
    RenderObjectDesc, RenderObjectId, SceneHandle, Transform, World, WorldConfig,
};

const ENTITY_COUNT: usize = 256;

struct CountingRender {
    next: u32,
}

impl RenderBackend for CountingRender {
    fn create_scene(&mut self) -> Result<SceneHandle, BackendError> {
        Ok(SceneHandle(0))
    }

    fn destroy_all_cameras(&mut self, _scene: SceneHandle) {}

    fn clear_scene(&mut self, _scene: SceneHandle) {}

    fn destroy_scene(&mut self, _scene: SceneHandle) {}

    fn create_object(
        &mut self,
        _scene: SceneHandle,
        _desc: &RenderObjectDesc,
    ) -> Result<RenderObjectId, BackendError> {
        self.next += 1;
        Ok(RenderObjectId(self.next))
    }

    fn destroy_object(&mut self, _object: RenderObjectId) {}

    fn attach_object(
        &mut self,
        _child: RenderObjectId,
        _parent: RenderObjectId,
    ) -> Result<(), BackendError> {
        Ok(())
    }

    fn set_transform(&mut self, node: RenderObjectId, transform: &Transform) {
        black_box((node, transform));
    }

    fn bind_viewport_camera(&mut self, _camera: RenderObjectId) -> Result<(), BackendError> {
        Ok(())
    }
}

struct StillEnvironment;

impl Environment for StillEnvironment {
    fn init(&mut self, _: &mut dyn RenderBackend, _: SceneHandle) -> Result<(), BackendError> {
        Ok(())
    }

    fn destroy(&mut self, _: &mut dyn RenderBackend) {}

    fn pause(&mut self) {}

    fn resume(&mut self) {}

    fn update(&mut self, _: &mut dyn RenderBackend, _: f32) -> Result<(), BackendError> {
        Ok(())
    }
}

fn bench_entity_churn(c: &mut Criterion) {
    let mut pool = EntityPool::new(ENTITY_COUNT);

    c.bench_function("entity_pool_churn_256", |b| {
        b.iter(|| {
            let handles: Vec<_> = (0..ENTITY_COUNT).filter_map(|_| pool.create().ok()).collect();
            for handle in handles {
                let _ = pool.destroy(handle.id(), |_| {});
            }
            black_box(pool.active_count())
        });
    });
}

fn bench_frame_update(c: &mut Criterion) {
    let deps = Dependencies::new(
        Box::new(CountingRender { next: 0 }),
        Box::new(StillEnvironment),
    );
    let mut world = World::new(
        WorldConfig::with_capacity(ENTITY_COUNT, ENTITY_COUNT),
        deps,
    );
    world.init(false).expect("init");

    let mut ids = Vec::with_capacity(ENTITY_COUNT);
    for _ in 0..ENTITY_COUNT {
        let id = world.create_entity().expect("capacity");
        world.attach_component(id, Capability::Scene).expect("scene");
        world.attach_component(id, Capability::Actor).expect("actor");
        ids.push(id);
    }
    world.setup_entities().expect("setup");
    for id in ids {
        if let Some(actor) = world.component_mut::<keel_core::ActorComponent>(id) {
            actor.set_moving_forward(true);
        }
    }

    c.bench_function("world_update_256_actors", |b| {
        b.iter(|| {
            world.update().expect("frame");
            black_box(world.frame())
        });
    });
}

criterion_group!(benches, bench_entity_churn, bench_frame_update);
criterion_main!(benches);
