use std::hint::black_box;
use std::time::Instant;

use surfaces_surface::{InstanceTransform, SurfaceKind, SurfaceSampler};

fn bench_sample(kind: SurfaceKind, iterations: usize) {
    let sampler = SurfaceSampler::new(kind, 400);
    let start = Instant::now();
    for n in 0..iterations {
        let i = (n % 400) as i32 - 200;
        let _ = black_box(sampler.sample(black_box(i), black_box(-i), black_box(0.5)));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  sample ({kind}, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}");
}

fn bench_fill(kind: SurfaceKind, resolution: u32, frames: usize) {
    let sampler = SurfaceSampler::new(kind, resolution).with_cube_size(Some(0.5));
    let mut out: Vec<InstanceTransform> = Vec::new();

    let start = Instant::now();
    for frame in 0..frames {
        sampler.fill_transforms(black_box(frame as f32 / 60.0), &mut out);
        black_box(&out);
    }
    let elapsed = start.elapsed();
    let per_frame = elapsed / frames as u32;
    println!(
        "  fill ({kind}, {resolution}x{resolution}, {frames} frames): {per_frame:?}/frame, total {elapsed:?}"
    );
}

fn main() {
    println!("=== Surface Sampling Benchmarks ===\n");

    println!("Single sample:");
    for kind in SurfaceKind::ALL {
        bench_sample(kind, 1_000_000);
    }

    println!("\nFull frame fill:");
    bench_fill(SurfaceKind::Plane, 400, 20);
    bench_fill(SurfaceKind::Wave, 400, 20);
    bench_fill(SurfaceKind::Torus, 100, 200);
    bench_fill(SurfaceKind::Torus, 400, 20);

    println!("\n=== Done ===");
}
