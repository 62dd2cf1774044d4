use glam::Vec3;
use voxel_morph::prelude::*;
use voxel_morph_examples::{init_tracing, level_set_sphere, render_slices_to_png, SliceAxis};

const BAND: f32 = 3.0;

fn main() -> anyhow::Result<()> {
    init_tracing();
    let a = level_set_sphere("a", Vec3::new(-4.0, 0.0, 0.0), 9.0, BAND)?;
    let b = level_set_sphere("b", Vec3::new(5.0, 0.0, 0.0), 7.0, BAND)?;
    let c = level_set_sphere("c", Vec3::new(0.0, 7.0, 0.0), 5.0, BAND)?;

    let union = combine(&a, &b, CombineOp::CsgUnion)?;
    let intersection = combine(&a, &b, CombineOp::CsgIntersection)?;
    let difference = combine(&a, &b, CombineOp::CsgDifference)?;
    let all = combine_all(&a, &[b.duplicate()?, c], CombineOp::CsgUnion)?;

    // Keep only the inside of each result: negate, then drop non-positive voxels
    let mut solids = Vec::new();
    for (label, grid) in [
        ("union", &union),
        ("intersection", &intersection),
        ("difference", &difference),
        ("union of three", &all),
    ] {
        let flipped = combine_scalar(grid, -1.0, ScalarOp::Mul)?;
        let inside = threshold(&flipped, 0.0)?;
        tracing::info!(case = label, inside = inside.active_voxel_count()?, "csg");
        solids.push(inside);
    }

    let panels: Vec<&Grid<f32>> = solids.iter().collect();
    render_slices_to_png(
        &panels,
        SliceAxis::Z,
        0,
        (0.0, BAND),
        8,
        "combine-csg-spheres.png",
    )?;
    Ok(())
}
