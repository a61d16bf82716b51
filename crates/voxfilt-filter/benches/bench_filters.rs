use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use voxfilt_filter::{kernels, ExecutionStrategy, SeparableVolumeFilter};
use voxfilt_volume::Volume;

fn bench_filters(c: &mut Criterion) {
    let mut group = c.benchmark_group("Separable Gaussian");

    for side in [16, 32, 64, 96].iter() {
        let volume = Volume::from_size_fn([*side, *side, *side].into(), |y, x, z| {
            ((y * 7 + x * 13 + z * 29) % 17) as f64
        });
        let radius = kernels::min_kernel_len(*side) / 2;
        let kernel = kernels::gaussian_kernel_1d(radius, radius as f64 / 3.0);

        group.throughput(criterion::Throughput::Elements(
            (volume.numel() * kernel.len()) as u64,
        ));

        let parameter_string = format!("{side}x{side}x{side}x{}", kernel.len());

        for (name, strategy) in [
            ("serial", ExecutionStrategy::Serial),
            ("parallel", ExecutionStrategy::Parallel),
        ] {
            let filter = SeparableVolumeFilter::new(kernel.clone()).with_strategy(strategy);
            group.bench_with_input(
                BenchmarkId::new(name, &parameter_string),
                &volume,
                |b, v| b.iter(|| black_box(filter.apply(v))),
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_filters);
criterion_main!(benches);
