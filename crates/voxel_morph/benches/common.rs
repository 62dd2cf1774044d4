#![allow(dead_code)]

use std::time::Duration;

use criterion::{Criterion, Throughput};
use glam::{IVec3, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use voxel_morph::prelude::Grid;

pub const SAMPLE_SIZE: usize = 20;
pub const WARM_UP: Duration = Duration::from_secs(1);
pub const MEASUREMENT_TIME: Duration = Duration::from_secs(2);

pub fn default_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASUREMENT_TIME)
}

pub fn elements_throughput(elements: usize) -> Throughput {
    Throughput::Elements(elements.max(1) as u64)
}

fn unit(rng: &mut StdRng) -> f32 {
    (rng.next_u32() as f64 / u32::MAX as f64) as f32
}

/// Solid ball of `radius` voxels with values in `[0.5, 1.0)`.
pub fn noisy_ball(radius: i32, seed: u64) -> Grid<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut grid = Grid::new("ball", 0.0_f32);
    let r2 = radius * radius;
    for z in -radius..=radius {
        for y in -radius..=radius {
            for x in -radius..=radius {
                let c = IVec3::new(x, y, z);
                if c.length_squared() <= r2 {
                    let v = 0.5 + 0.5 * unit(&mut rng);
                    grid.set_value(c, v).expect("live grid");
                }
            }
        }
    }
    grid
}

/// Ball of random unit-ish vectors.
pub fn vector_ball(radius: i32, seed: u64) -> Grid<Vec3> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut grid = Grid::new("flow", Vec3::ZERO);
    let r2 = radius * radius;
    for z in -radius..=radius {
        for y in -radius..=radius {
            for x in -radius..=radius {
                let c = IVec3::new(x, y, z);
                if c.length_squared() <= r2 {
                    let v = Vec3::new(
                        unit(&mut rng) * 2.0 - 1.0,
                        unit(&mut rng) * 2.0 - 1.0,
                        unit(&mut rng) * 2.0 - 1.0,
                    );
                    grid.set_value(c, v).expect("live grid");
                }
            }
        }
    }
    grid
}
