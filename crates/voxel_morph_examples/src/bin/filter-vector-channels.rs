use voxel_morph::prelude::*;
use voxel_morph_examples::{
    init_tracing, render_slices_to_png, render_vector_slice_to_png, swirl_field, SliceAxis,
};

fn main() -> anyhow::Result<()> {
    init_tracing();
    let field = swirl_field("swirl", 12)?;

    // Channel-wise smoothing works on squared components and loses their sign
    let smoothed = smooth_vector(&field, 1, 2, FilterKind::Gaussian)?;

    // Smoothing the split channels directly keeps the sign
    let [x, y, z] = split_channels(&field)?;
    let signed = [
        smooth(&x, 1, 2, FilterKind::Gaussian)?,
        smooth(&y, 1, 2, FilterKind::Gaussian)?,
        smooth(&z, 1, 2, FilterKind::Gaussian)?,
    ];
    let merged = merge_channels(&signed[0], &signed[1], &signed[2])?;

    let probe = glam::IVec3::new(0, 6, 0);
    tracing::info!(
        original = ?field.value(probe)?,
        magnitude_smoothed = ?smoothed.value(probe)?,
        signed_smoothed = ?merged.value(probe)?,
        "x channel at +y is negative before filtering"
    );

    // Coarser copy of the field at twice the voxel size
    let coarse = resample_vector(&field, 2.0)?;
    tracing::info!(
        fine = field.active_voxel_count()?,
        coarse = coarse.active_voxel_count()?,
        "resampled"
    );

    render_vector_slice_to_png(&field, SliceAxis::Z, 0, 8, "filter-vector-channels-input.png")?;
    render_vector_slice_to_png(
        &smoothed,
        SliceAxis::Z,
        0,
        8,
        "filter-vector-channels-smoothed.png",
    )?;
    render_slices_to_png(
        &[&x, &signed[0]],
        SliceAxis::Z,
        0,
        (-1.0, 1.0),
        8,
        "filter-vector-channels-x.png",
    )?;
    Ok(())
}
