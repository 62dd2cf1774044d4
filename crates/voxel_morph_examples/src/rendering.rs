use std::path::Path;

use glam::{IVec2, IVec3, Vec3};
use image::{Rgb, RgbImage};
use tracing_subscriber::EnvFilter;
use voxel_morph::prelude::*;

const BACKGROUND: [u8; 3] = [26, 26, 26];
const GUTTER: u32 = 8;

/// Installs a formatting subscriber honouring `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // A second call keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Axis held fixed when cutting a slice out of a grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SliceAxis {
    X,
    Y,
    Z,
}

impl SliceAxis {
    /// Maps a 2D image position (u right, v up) and the slice index to a voxel.
    fn voxel(self, uv: IVec2, index: i32) -> IVec3 {
        match self {
            SliceAxis::X => IVec3::new(index, uv.x, uv.y),
            SliceAxis::Y => IVec3::new(uv.x, index, uv.y),
            SliceAxis::Z => IVec3::new(uv.x, uv.y, index),
        }
    }

    fn plane(self, c: IVec3) -> IVec2 {
        match self {
            SliceAxis::X => IVec2::new(c.y, c.z),
            SliceAxis::Y => IVec2::new(c.x, c.z),
            SliceAxis::Z => IVec2::new(c.x, c.y),
        }
    }
}

fn union_bounds(boxes: impl Iterator<Item = Option<(IVec3, IVec3)>>) -> Option<(IVec3, IVec3)> {
    boxes.flatten().reduce(|(lo, hi), (l, h)| (lo.min(l), hi.max(h)))
}

fn ramp(t: f32) -> [u8; 3] {
    let t = t.clamp(0.0, 1.0);
    let cold = Vec3::new(40.0, 70.0, 160.0);
    let warm = Vec3::new(250.0, 220.0, 120.0);
    let c = cold.lerp(warm, t);
    [c.x as u8, c.y as u8, c.z as u8]
}

/// Renders one slice per grid side by side into a PNG.
///
/// All panels share the union bounding box so they line up. Active voxels are
/// coloured by value over `range`, inactive ones are left dark.
pub fn render_slices_to_png(
    grids: &[&Grid<f32>],
    axis: SliceAxis,
    index: i32,
    range: (f32, f32),
    cell: u32,
    path: impl AsRef<Path>,
) -> anyhow::Result<()> {
    let mut boxes = Vec::with_capacity(grids.len());
    for grid in grids {
        boxes.push(grid.bounding_box()?);
    }
    let Some((lo, hi)) = union_bounds(boxes.into_iter()) else {
        anyhow::bail!("nothing to render: every grid is empty");
    };
    let (lo, hi) = (axis.plane(lo), axis.plane(hi));
    let extent = (hi - lo + IVec2::ONE).as_uvec2() * cell;
    let panels = grids.len() as u32;
    let width = extent.x * panels + GUTTER * panels.saturating_sub(1);

    let mut img = RgbImage::from_pixel(width, extent.y, Rgb(BACKGROUND));
    let span = (range.1 - range.0).max(f32::EPSILON);
    for (panel, grid) in grids.iter().enumerate() {
        let x0 = panel as u32 * (extent.x + GUTTER);
        for v in lo.y..=hi.y {
            for u in lo.x..=hi.x {
                let c = axis.voxel(IVec2::new(u, v), index);
                if !grid.is_active(c)? {
                    continue;
                }
                let color = ramp((grid.value(c)? - range.0) / span);
                let px = x0 + (u - lo.x) as u32 * cell;
                // Image rows grow downwards.
                let py = (hi.y - v) as u32 * cell;
                fill_cell(&mut img, px, py, cell, color);
            }
        }
    }
    img.save(path.as_ref())?;
    tracing::info!(path = %path.as_ref().display(), panels, "wrote slice image");
    Ok(())
}

/// Renders a slice of a vector grid with `|x|, |y|, |z|` mapped to red, green, blue.
pub fn render_vector_slice_to_png(
    grid: &Grid<Vec3>,
    axis: SliceAxis,
    index: i32,
    cell: u32,
    path: impl AsRef<Path>,
) -> anyhow::Result<()> {
    let Some((lo, hi)) = grid.bounding_box()? else {
        anyhow::bail!("nothing to render: grid '{}' is empty", grid.name());
    };
    let coords = grid.active_coordinates()?;
    let peak = grid
        .values_at(&coords)?
        .iter()
        .map(|v| v.abs().max_element())
        .fold(f32::EPSILON, f32::max);
    let (lo, hi) = (axis.plane(lo), axis.plane(hi));
    let extent = (hi - lo + IVec2::ONE).as_uvec2() * cell;

    let mut img = RgbImage::from_pixel(extent.x, extent.y, Rgb(BACKGROUND));
    for v in lo.y..=hi.y {
        for u in lo.x..=hi.x {
            let c = axis.voxel(IVec2::new(u, v), index);
            if !grid.is_active(c)? {
                continue;
            }
            let rgb = (grid.value(c)?.abs() / peak * 255.0).clamp(Vec3::ZERO, Vec3::splat(255.0));
            let px = (u - lo.x) as u32 * cell;
            let py = (hi.y - v) as u32 * cell;
            fill_cell(&mut img, px, py, cell, [rgb.x as u8, rgb.y as u8, rgb.z as u8]);
        }
    }
    img.save(path.as_ref())?;
    tracing::info!(path = %path.as_ref().display(), "wrote vector slice image");
    Ok(())
}

fn fill_cell(img: &mut RgbImage, x: u32, y: u32, cell: u32, color: [u8; 3]) {
    for dy in 0..cell {
        for dx in 0..cell {
            img.put_pixel(x + dx, y + dy, Rgb(color));
        }
    }
}
