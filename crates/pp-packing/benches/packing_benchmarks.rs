//! Benchmarks for WGDOS and RLE packing.
//!
//! Run with: cargo bench --package pp-packing
//! Or: cargo bench --package pp-packing --bench packing_benchmarks -- wgdos

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pp_packing::{
    pack_field, rle_decode, wgdos_unpack, PACKING_TYPE_NONE, PACKING_TYPE_RLE, PACKING_TYPE_WGDOS,
    RMDI,
};
use rand::Rng;

const SIZES: [usize; 2] = [256, 1024];

/// Generate a temperature field with noise. Values are in Kelvin.
fn generate_temperature_field(size: usize) -> Vec<f32> {
    let mut rng = rand::thread_rng();
    let mut data = vec![0.0f32; size * size];

    for y in 0..size {
        for x in 0..size {
            let lat_factor = (y as f32 / size as f32 - 0.5) * 60.0;
            let lon_factor = ((x as f32 / size as f32) * std::f32::consts::PI * 4.0).sin() * 5.0;
            let noise = rng.gen_range(-3.0..3.0);
            data[y * size + x] = 273.15 + lat_factor + lon_factor + noise;
        }
    }
    data
}

/// Generate an ocean field with a land mask covering roughly a third of it.
fn generate_masked_field(size: usize) -> Vec<f32> {
    let mut data = generate_temperature_field(size);
    for y in 0..size {
        let coast = size / 3 + (y * 7) % (size / 8).max(1);
        for value in &mut data[y * size..y * size + coast] {
            *value = RMDI;
        }
    }
    data
}

// =============================================================================
// WGDOS BENCHMARKS
// =============================================================================

fn bench_wgdos(c: &mut Criterion) {
    let mut group = c.benchmark_group("wgdos");

    for size in SIZES {
        let data = generate_masked_field(size);
        let dim = size as i32;
        let label = format!("{}x{}", size, size);
        group.throughput(Throughput::Elements((size * size) as u64));

        group.bench_with_input(BenchmarkId::new("pack", &label), &data, |b, data| {
            b.iter(|| pack_field(PACKING_TYPE_WGDOS, black_box(data), dim, dim, RMDI, -6, 0))
        });

        let packed = pack_field(PACKING_TYPE_WGDOS, &data, dim, dim, RMDI, -6, 0)
            .expect("benchmark field packs");
        group.bench_with_input(
            BenchmarkId::new("unpack", &label),
            packed.as_bytes(),
            |b, bytes| b.iter(|| wgdos_unpack(black_box(bytes), dim, dim, RMDI)),
        );
    }

    group.finish();
}

// =============================================================================
// RLE BENCHMARKS
// =============================================================================

fn bench_rle(c: &mut Criterion) {
    let mut group = c.benchmark_group("rle");

    for size in SIZES {
        let data = generate_masked_field(size);
        let dim = size as i32;
        let label = format!("{}x{}", size, size);
        group.throughput(Throughput::Elements((size * size) as u64));

        group.bench_with_input(BenchmarkId::new("encode", &label), &data, |b, data| {
            b.iter(|| pack_field(PACKING_TYPE_RLE, black_box(data), dim, dim, RMDI, 0, 0))
        });

        let packed = pack_field(PACKING_TYPE_RLE, &data, dim, dim, RMDI, 0, 0)
            .expect("benchmark field encodes");
        group.bench_with_input(
            BenchmarkId::new("decode", &label),
            packed.as_bytes(),
            |b, bytes| b.iter(|| rle_decode(black_box(bytes), dim, dim, RMDI)),
        );
    }

    group.finish();
}

// =============================================================================
// UNPACKED BASELINE
// =============================================================================

fn bench_unpacked(c: &mut Criterion) {
    let mut group = c.benchmark_group("none");

    for size in SIZES {
        let data = generate_temperature_field(size);
        let dim = size as i32;
        group.throughput(Throughput::Elements((size * size) as u64));
        group.bench_with_input(
            BenchmarkId::new("pack", format!("{}x{}", size, size)),
            &data,
            |b, data| b.iter(|| pack_field(PACKING_TYPE_NONE, black_box(data), dim, dim, RMDI, 0, 0)),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_wgdos, bench_rle, bench_unpacked);
criterion_main!(benches);
