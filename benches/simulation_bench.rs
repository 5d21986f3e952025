use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use physics2d::{
    BoxShape, BroadphaseMode, Circle, Collider, Material, PhysicsWorld, RigidBody, Shape, Transform, Vec2,
    WorldConfig,
};

fn world_with(mode: BroadphaseMode) -> PhysicsWorld {
    let config = WorldConfig { broadphase: mode, solver_iterations: 4, ..WorldConfig::default() };
    let mut world = PhysicsWorld::with_config(config).expect("valid config");
    let ground = Collider::new(Shape::Box(BoxShape::new(200.0, 1.0).expect("ground")));
    let ground = RigidBody::new_static(ground, Material::default(), Transform::new(Vec2::new(0.0, -0.5), 0.0));
    world.add_body(ground.expect("ground body"));
    world
}

fn simulate(world: &mut PhysicsWorld) {
    let dt = 1.0 / 60.0;
    for _ in 0..30 {
        world.step(black_box(dt)).expect("step");
    }
}

// --- Helper for creating stack benchmarks ---
fn run_circle_stack_bench(world: &mut PhysicsWorld, num_circles: usize) {
    let radius = 0.5;
    let shape = Shape::Circle(Circle::new(radius).expect("circle"));

    for i in 0..num_circles {
        // Columns of ten, stacked with a slight gap
        let x = (i / 10) as f64 * (radius * 2.5);
        let y = radius + (i % 10) as f64 * (radius * 2.1);
        let body = RigidBody::new(Collider::new(shape.clone()), Material::default(), Transform::new(Vec2::new(x, y), 0.0));
        world.add_body(body.expect("circle body"));
    }
    simulate(world);
}

fn run_pyramid_bench(world: &mut PhysicsWorld, base: usize) {
    let shape = Shape::Box(BoxShape::new(1.0, 1.0).expect("box"));
    for row in 0..base {
        for col in 0..(base - row) {
            let x = (col as f64 - (base - row) as f64 * 0.5) * 1.05;
            let y = 0.5 + row as f64 * 1.0;
            let body = RigidBody::new(Collider::new(shape.clone()), Material::default(), Transform::new(Vec2::new(x, y), 0.0));
            world.add_body(body.expect("box body"));
        }
    }
    simulate(world);
}

fn bench_circle_stack(c: &mut Criterion) {
    let mut group = c.benchmark_group("circle_stack");

    for mode in [BroadphaseMode::SpatialHash, BroadphaseMode::BruteForce] {
        for num_circles in [10, 100, 500] {
            group.bench_with_input(BenchmarkId::new(format!("{mode:?}"), num_circles), &num_circles, |b, &n| {
                b.iter(|| {
                    let mut world = world_with(mode);
                    run_circle_stack_bench(&mut world, black_box(n));
                });
            });
        }
    }
    group.finish();
}

fn bench_box_pyramid(c: &mut Criterion) {
    let mut group = c.benchmark_group("box_pyramid");

    for mode in [BroadphaseMode::SpatialHash, BroadphaseMode::BruteForce] {
        for base in [5, 10, 20] {
            group.bench_with_input(BenchmarkId::new(format!("{mode:?}"), base), &base, |b, &n| {
                b.iter(|| {
                    let mut world = world_with(mode);
                    run_pyramid_bench(&mut world, black_box(n));
                });
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_circle_stack, bench_box_pyramid);
criterion_main!(benches);
