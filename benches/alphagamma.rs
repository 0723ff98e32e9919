use alphagamma::lowlevel::hamming_distance;
use alphagamma::{
    pack_descriptor_set, DescriptorLayout, DistanceConfig, DistanceEngine, OwnedDescriptorSet,
};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

fn make_descriptors(rows: usize, cols: usize, seed: usize) -> OwnedDescriptorSet {
    let data = (0..rows * cols)
        .map(|i| (((i * 13) ^ (i / 7) ^ seed) & 1) as u8)
        .collect();
    OwnedDescriptorSet::new(data, rows, cols).unwrap()
}

fn bench_distances(c: &mut Criterion) {
    let layout = DescriptorLayout::new(16, 64).unwrap();
    let size = layout.descriptor_size();

    let set1 = make_descriptors(size, 256, 0x5a);
    let set2 = make_descriptors(size, 256, 0x13);
    let packed1 = pack_descriptor_set(set1.view(), &layout).unwrap();
    let packed2 = pack_descriptor_set(set2.view(), &layout).unwrap();

    let ext1 = make_descriptors(2 * size, 256, 0x21);
    let ext2 = make_descriptors(2 * size, 256, 0x77);
    let packed_ext1 = pack_descriptor_set(ext1.view(), &layout).unwrap();
    let packed_ext2 = pack_descriptor_set(ext2.view(), &layout).unwrap();

    let engine = DistanceEngine::new(layout);

    c.bench_function("reference_base_256x256", |b| {
        b.iter(|| {
            black_box(
                engine
                    .reference_distances(set1.view(), set2.view())
                    .unwrap(),
            )
        });
    });

    c.bench_function("packed_base_256x256", |b| {
        b.iter(|| {
            black_box(
                engine
                    .packed_distances(packed1.view(), packed2.view())
                    .unwrap(),
            )
        });
    });

    c.bench_function("reference_extended_256x256", |b| {
        b.iter(|| black_box(engine.reference_distances(ext1.view(), ext2.view()).unwrap()));
    });

    c.bench_function("packed_extended_256x256", |b| {
        b.iter(|| {
            black_box(
                engine
                    .packed_distances(packed_ext1.view(), packed_ext2.view())
                    .unwrap(),
            )
        });
    });

    if cfg!(feature = "rayon") {
        let parallel = DistanceEngine::new(layout).with_config(DistanceConfig {
            parallel: true,
            ..DistanceConfig::default()
        });
        c.bench_function("packed_extended_256x256_parallel", |b| {
            b.iter(|| {
                black_box(
                    parallel
                        .packed_distances(packed_ext1.view(), packed_ext2.view())
                        .unwrap(),
                )
            });
        });
    }

    let a = packed1.view().get(0).unwrap();
    let b_row = packed2.view().get(0).unwrap();
    let bits = layout.descriptor_size() - 3;
    c.bench_function("hamming_unaligned_span", |b| {
        b.iter(|| black_box(hamming_distance(black_box(a), black_box(b_row), 3, bits).unwrap()));
    });
}

criterion_group!(benches, bench_distances);
criterion_main!(benches);
