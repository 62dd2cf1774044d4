use rand::rngs::StdRng;
use rand::SeedableRng;
use voxel_morph::prelude::*;
use voxel_morph_examples::{ball, init_tracing, render_slices_to_png, sprinkle_specks, SliceAxis};

fn main() -> anyhow::Result<()> {
    init_tracing();
    let mut rng = StdRng::seed_from_u64(4242);

    // A ball with salt-and-pepper noise: stray voxels outside, pin holes inside
    let mut noisy = ball("noisy", 12, 1.0)?;
    sprinkle_specks(&mut noisy, 4000, 16, 1.0, &mut rng)?;
    tracing::info!(active = noisy.active_voxel_count()?, "noisy input");

    let mut panels = vec![noisy.duplicate()?];
    for op in [MorphOp::Open, MorphOp::Close, MorphOp::ProperOpen, MorphOp::AutoMedian] {
        let cleaned = morph(&noisy, op, 1)?;
        tracing::info!(op = op.name(), active = cleaned.active_voxel_count()?, "filtered");
        panels.push(cleaned);
    }

    let refs: Vec<&Grid<f32>> = panels.iter().collect();
    render_slices_to_png(
        &refs,
        SliceAxis::Z,
        0,
        (0.0, 1.0),
        6,
        "morphology-auto-median.png",
    )?;
    Ok(())
}
