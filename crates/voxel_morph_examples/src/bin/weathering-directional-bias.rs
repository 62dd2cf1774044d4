use anyhow::Context;
use glam::IVec3;
use voxel_morph::prelude::*;
use voxel_morph_examples::{ball, init_tracing, render_slices_to_png, SliceAxis};

fn main() -> anyhow::Result<()> {
    init_tracing();
    let source = ball("rock", 14, 1.0)?;
    let steps = 12;

    // Same rock weathered under four settings
    let base = ErosionParams::new(0.12).with_threshold(0.1);
    let cases = [
        ("isotropic", base),
        (
            "wind from -x",
            base.with_weight(3.0)
                .with_bias(ErosionBias::direction([1.0, 0.0, 0.0])),
        ),
        (
            "undercut below z=-4",
            base.with_weight(1.5)
                .with_bias(ErosionBias::plane([0.0, 0.0, -4.0], [0.0, 0.0, 1.0])),
        ),
        ("snapshot traversal", base.with_traversal(Traversal::Snapshot)),
    ];

    let mut results = Vec::with_capacity(cases.len());
    for (label, params) in cases {
        let mut sim = ErosionSimulator::from_grid(&source)?;
        let reports = sim.run(&params, steps)?;
        let removed: usize = reports.iter().map(|r| r.deactivated).sum();
        let last = reports.last().context("no steps were run")?;
        tracing::info!(
            case = label,
            removed,
            remaining = last.visited - last.deactivated,
            mean_exposure = last.mean_exposure,
            "weathered"
        );
        results.push(sim.into_grid().context("simulator lost its grid")?);
    }

    // Side view through the centre, +z up
    let panels: Vec<&Grid<f32>> = results.iter().collect();
    render_slices_to_png(
        &panels,
        SliceAxis::Y,
        0,
        (0.0, 1.0),
        8,
        "weathering-directional-bias.png",
    )?;

    // The windward face should have retreated further than the lee side
    let eroded = &results[1];
    let probe = |x: i32| eroded.is_active(IVec3::new(x, 0, 0));
    tracing::info!(
        windward_13 = probe(-13)?,
        leeward_13 = probe(13)?,
        "wind asymmetry"
    );
    Ok(())
}
