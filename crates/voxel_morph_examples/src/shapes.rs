use glam::{IVec3, Vec3};
use rand::Rng;
use voxel_morph::prelude::*;

/// Solid ball of `value` centred on the index origin.
pub fn ball(name: &str, radius: i32, value: f32) -> Result<Grid<f32>> {
    let mut grid = Grid::new(name, 0.0_f32);
    let r2 = radius * radius;
    for z in -radius..=radius {
        for y in -radius..=radius {
            for x in -radius..=radius {
                let c = IVec3::new(x, y, z);
                if c.length_squared() <= r2 {
                    grid.set_value(c, value)?;
                }
            }
        }
    }
    Ok(grid)
}

/// Adds isolated specks around a shape and punches single-voxel holes into it.
///
/// Specks are scattered in the cube of half-extent `reach`; a candidate that
/// lands on an active voxel becomes a hole instead.
pub fn sprinkle_specks<R: Rng>(
    grid: &mut Grid<f32>,
    count: usize,
    reach: i32,
    value: f32,
    rng: &mut R,
) -> Result<()> {
    let span = (2 * reach + 1).max(1) as u32;
    for _ in 0..count {
        let mut pick = || (rng.next_u32() % span) as i32 - reach;
        let c = IVec3::new(pick(), pick(), pick());
        if grid.is_active(c)? {
            grid.set_active_state(c, false)?;
        } else {
            grid.set_value(c, value)?;
        }
    }
    Ok(())
}

/// Rotational vector field over a ball: `(-y, x, z / 2) / radius`.
///
/// Components take both signs, which makes channel-wise behaviour visible.
pub fn swirl_field(name: &str, radius: i32) -> Result<Grid<Vec3>> {
    let mut grid = Grid::new(name, Vec3::ZERO);
    let r2 = radius * radius;
    let scale = 1.0 / radius.max(1) as f32;
    for z in -radius..=radius {
        for y in -radius..=radius {
            for x in -radius..=radius {
                let c = IVec3::new(x, y, z);
                if c.length_squared() <= r2 {
                    let v = Vec3::new(-(y as f32), x as f32, z as f32 * 0.5) * scale;
                    grid.set_value(c, v)?;
                }
            }
        }
    }
    Ok(grid)
}

/// Narrow-band signed distance to a sphere, negative inside.
///
/// The interior and a shell of width `band` outside the surface are active.
/// The background is `band`, so inactive voxels read as outside.
pub fn level_set_sphere(name: &str, center: Vec3, radius: f32, band: f32) -> Result<Grid<f32>> {
    let mut grid = Grid::new(name, band);
    let lo = (center - Vec3::splat(radius + band)).floor().as_ivec3();
    let hi = (center + Vec3::splat(radius + band)).ceil().as_ivec3();
    for z in lo.z..=hi.z {
        for y in lo.y..=hi.y {
            for x in lo.x..=hi.x {
                let c = IVec3::new(x, y, z);
                let d = c.as_vec3().distance(center) - radius;
                if d <= band {
                    grid.set_value(c, d.max(-band))?;
                }
            }
        }
    }
    Ok(grid)
}
