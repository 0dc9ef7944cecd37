use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;
use retina::{Image, Schedule, Simulation, SimulationConfig};

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");
    let mut rng = StdRng::seed_from_u64(42);

    for size in [28usize, 64, 128] {
        let image = Image::noise(size, size, &mut rng);
        for schedule in [Schedule::Sequential, Schedule::RowParallel] {
            let mut sim = Simulation::new(SimulationConfig {
                rows: size,
                cols: size,
                schedule,
                ..Default::default()
            })
            .expect("valid config");

            group.bench_with_input(
                BenchmarkId::new(format!("{schedule:?}"), size),
                &image,
                |b, image| b.iter(|| sim.tick(Some(black_box(image)))),
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_tick);
criterion_main!(benches);
