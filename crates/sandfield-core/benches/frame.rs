use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::Vec2;
use sandfield_core::{FieldConfig, ParticleField, RecordingSurface};
use sandfield_platform::SurfaceSize;

fn full_frame(c: &mut Criterion) {
    let size = SurfaceSize::new(1920.0, 1080.0);
    let mut field = ParticleField::with_seed(FieldConfig::default(), 1).unwrap();
    field.configure(size.width, size.height, false);
    let mut surface = RecordingSurface::new(size);

    c.bench_function("frame_150_particles", |b| {
        b.iter(|| field.frame(black_box(Vec2::new(960.0, 540.0)), &mut surface))
    });

    c.bench_function("step_150_particles", |b| {
        b.iter(|| field.step(black_box(Vec2::new(960.0, 540.0))))
    });
}

criterion_group!(benches, full_frame);
criterion_main!(benches);
