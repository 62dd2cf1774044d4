//! Stateful exposure-driven erosion.
//!
//! [`ErosionSimulator`] keeps its working grid between steps so erosion can be
//! advanced one step at a time. Each step visits the active voxels captured at
//! its start and lowers every value by `rate * exposure + bias decay`. A voxel
//! that drops below zero is written as 0 at once and deactivated after the whole
//! pass, so neighbours visited later in the same step still see it as present.
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::grid::{AnyGrid, Grid, CENTER_INDEX, NEIGHBORHOOD_SIZE};
use crate::weathering::exposure::exposure;
use crate::weathering::params::{ErosionParams, Traversal};

/// Summary of one erosion step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepReport {
    /// Iteration counter after the step (1 for the first step after a reset).
    pub iteration: u64,
    /// Active voxels visited.
    pub visited: usize,
    /// Voxels deactivated at the end of the step.
    pub deactivated: usize,
    /// Mean isotropic exposure over the visited voxels.
    pub mean_exposure: f32,
}

/// Erosion state carried across steps.
#[derive(Debug, Default)]
pub struct ErosionSimulator {
    grid: Option<Grid<f32>>,
    iterations: u64,
}

impl ErosionSimulator {
    /// Creates a simulator without a working grid. Call [`Self::reset`] before stepping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a simulator working on a copy of `source`.
    pub fn from_grid(source: &Grid<f32>) -> Result<Self> {
        let mut sim = Self::new();
        sim.reset(source)?;
        Ok(sim)
    }

    /// Replaces the working grid with a copy of `source` and zeroes the counter.
    pub fn reset(&mut self, source: &Grid<f32>) -> Result<()> {
        let grid = source.duplicate()?;
        info!(
            "erosion reset from '{}' ({} active voxels)",
            grid.name(),
            grid.active_voxel_count()?
        );
        self.grid = Some(grid);
        self.iterations = 0;
        Ok(())
    }

    /// Kind-erased [`Self::reset`]; only float grids can be eroded.
    pub fn reset_from(&mut self, source: &AnyGrid) -> Result<()> {
        let grid = source
            .as_float()
            .ok_or_else(|| Error::unsupported("erosion", source.kind()))?;
        self.reset(grid)
    }

    /// Runs one erosion step on the working grid.
    pub fn step(&mut self, params: &ErosionParams) -> Result<StepReport> {
        params.validate()?;
        let grid = self
            .grid
            .as_mut()
            .ok_or(Error::Uninitialized("erosion simulator"))?;
        let mut report = erode_step(grid, params)?;
        self.iterations += 1;
        report.iteration = self.iterations;
        info!(
            "erosion step {}: visited {}, deactivated {}, mean exposure {:.3}",
            report.iteration, report.visited, report.deactivated, report.mean_exposure
        );
        Ok(report)
    }

    /// Runs `steps` erosion steps and returns their reports.
    pub fn run(&mut self, params: &ErosionParams, steps: usize) -> Result<Vec<StepReport>> {
        params.validate()?;
        (0..steps).map(|_| self.step(params)).collect()
    }

    /// Current working grid, if the simulator has been reset.
    pub fn grid(&self) -> Option<&Grid<f32>> {
        self.grid.as_ref()
    }

    pub fn into_grid(self) -> Option<Grid<f32>> {
        self.grid
    }

    /// Steps completed since the last reset.
    pub fn iterations(&self) -> u64 {
        self.iterations
    }
}

fn erode_step(grid: &mut Grid<f32>, params: &ErosionParams) -> Result<StepReport> {
    let transform = grid.transform();
    let coords = grid.active_coordinates()?;
    let snapshot: Option<Vec<[f32; NEIGHBORHOOD_SIZE]>> = match params.traversal {
        Traversal::InPlace => None,
        Traversal::Snapshot => Some(
            coords
                .iter()
                .map(|c| grid.neighborhood(*c))
                .collect::<Result<_>>()?,
        ),
    };

    let mut kill = Vec::new();
    let mut exposure_sum = 0.0_f64;
    for (i, c) in coords.iter().enumerate() {
        let n = match &snapshot {
            Some(all) => all[i],
            None => grid.neighborhood(*c)?,
        };
        let exp = exposure(&n, params.threshold);
        exposure_sum += exp as f64;

        let world = transform.index_to_world(c.as_vec3());
        let decay = params
            .bias
            .decay(&n, world, exp, params.threshold, params.weight);
        let v = n[CENTER_INDEX] - params.rate * exp - decay;
        if v < 0.0 {
            grid.set_value(*c, 0.0)?;
            kill.push(*c);
        } else {
            grid.set_value(*c, v)?;
        }
    }

    let flags = vec![false; kill.len()];
    grid.set_active_states(&kill, &flags)?;
    debug!(
        "erosion pass over '{}' ({:?}): {} voxels left",
        grid.name(),
        params.traversal,
        grid.active_voxel_count()?
    );

    Ok(StepReport {
        iteration: 0,
        visited: coords.len(),
        deactivated: kill.len(),
        mean_exposure: if coords.is_empty() {
            0.0
        } else {
            (exposure_sum / coords.len() as f64) as f32
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::ValueKind;
    use crate::weathering::bias::ErosionBias;
    use glam::{IVec3, Vec3};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn rand01(rng: &mut StdRng) -> f32 {
        (rng.next_u32() as f64 / u32::MAX as f64) as f32
    }

    fn block(lo: i32, hi: i32, value: f32) -> Grid<f32> {
        let mut grid = Grid::new("stone", 0.0_f32);
        grid.dense_fill(IVec3::splat(lo), IVec3::splat(hi), value, true)
            .expect("valid box");
        grid
    }

    #[test]
    fn stepping_before_reset_is_an_error() {
        let mut sim = ErosionSimulator::new();
        assert!(matches!(
            sim.step(&ErosionParams::default()),
            Err(Error::Uninitialized(_))
        ));
        assert!(sim.grid().is_none());
    }

    #[test]
    fn only_float_grids_can_be_eroded() {
        let mut sim = ErosionSimulator::new();
        let err = sim
            .reset_from(&AnyGrid::new("v", ValueKind::Vec3f))
            .expect_err("vector grid");
        assert!(matches!(err, Error::Unsupported { .. }));
        sim.reset_from(&AnyGrid::new("f", ValueKind::Float))
            .expect("float grid");
        assert!(sim.grid().is_some());
    }

    #[test]
    fn reset_copies_source_and_zeroes_counter() {
        let source = block(0, 2, 1.0);
        let mut sim = ErosionSimulator::from_grid(&source).expect("live grid");
        sim.run(&ErosionParams::new(0.5), 3).expect("valid params");
        assert_eq!(sim.iterations(), 3);
        assert_eq!(source.value(IVec3::ZERO).expect("live grid"), 1.0);

        sim.reset(&source).expect("live grid");
        assert_eq!(sim.iterations(), 0);
        assert_eq!(sim.grid(), Some(&source));
    }

    #[test]
    fn weightless_step_never_raises_values() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut source = Grid::new("noise", 0.0_f32);
        for _ in 0..400 {
            let c = IVec3::new(
                (rng.next_u32() % 10) as i32,
                (rng.next_u32() % 10) as i32,
                (rng.next_u32() % 10) as i32,
            );
            source.set_value(c, rand01(&mut rng)).expect("live grid");
        }
        let coords = source.active_coordinates().expect("live grid");
        let before = source.values_at(&coords).expect("live grid");

        let mut sim = ErosionSimulator::from_grid(&source).expect("live grid");
        let params = ErosionParams::new(0.2).with_threshold(0.3);
        let report = sim.step(&params).expect("valid params");
        assert_eq!(report.iteration, 1);
        assert_eq!(report.visited, coords.len());
        assert!((0.0..=1.0).contains(&report.mean_exposure));

        let grid = sim.grid().expect("reset");
        let mut dead = 0;
        for (c, b) in coords.iter().zip(before) {
            if grid.is_active(*c).expect("live grid") {
                assert!(grid.value(*c).expect("live grid") <= b);
            } else {
                dead += 1;
                let mut probe = grid.duplicate().expect("live grid");
                probe.set_active_state(*c, true).expect("live grid");
                assert_eq!(probe.value(*c).expect("live grid"), 0.0);
            }
        }
        assert_eq!(dead, report.deactivated);
    }

    #[test]
    fn isolated_voxel_is_zeroed_and_deactivated() {
        let mut source = Grid::new("dust", 0.0_f32);
        source.set_value(IVec3::ZERO, 0.05).expect("live grid");
        let mut sim = ErosionSimulator::from_grid(&source).expect("live grid");
        let report = sim.step(&ErosionParams::new(0.1)).expect("valid params");
        assert_eq!(report.deactivated, 1);
        assert_eq!(report.mean_exposure, 1.0);
        assert_eq!(sim.grid().map(|g| g.active_voxel_count().ok()), Some(Some(0)));
    }

    #[test]
    fn interior_voxels_are_untouched_without_bias() {
        let source = block(0, 4, 1.0);
        let mut sim = ErosionSimulator::from_grid(&source).expect("live grid");
        sim.step(&ErosionParams::new(0.1)).expect("valid params");
        let grid = sim.grid().expect("reset");
        assert_eq!(grid.value(IVec3::splat(2)).expect("live grid"), 1.0);
        assert!(grid.value(IVec3::ZERO).expect("live grid") < 1.0);
    }

    #[test]
    fn in_place_and_snapshot_traversals_differ_on_order_sensitive_input() {
        let mut source = Grid::new("pair", 0.0_f32);
        source.set_value(IVec3::new(0, 0, 0), 0.15).expect("live grid");
        source.set_value(IVec3::new(1, 0, 0), 1.0).expect("live grid");
        let params = ErosionParams::new(0.1).with_threshold(0.1);

        let mut in_place = ErosionSimulator::from_grid(&source).expect("live grid");
        in_place.step(&params).expect("valid params");
        let mut snapshot = ErosionSimulator::from_grid(&source).expect("live grid");
        snapshot
            .step(&params.with_traversal(Traversal::Snapshot))
            .expect("valid params");

        let second = IVec3::new(1, 0, 0);
        let a = in_place.grid().expect("reset").value(second).expect("live grid");
        let b = snapshot.grid().expect("reset").value(second).expect("live grid");
        // The first voxel drops to ~0.054 before the second one is visited.
        assert!((a - 0.9).abs() < 1e-6);
        assert!((b - (1.0 - 0.1 * 25.0 / 26.0)).abs() < 1e-6);
    }

    #[test]
    fn directional_bias_erodes_faces_against_the_direction() {
        let source = block(0, 2, 1.0);
        let params = ErosionParams::new(0.0)
            .with_weight(1.0)
            .with_bias(ErosionBias::direction([0.0, 0.0, -1.0]));
        let mut sim = ErosionSimulator::from_grid(&source).expect("live grid");
        sim.step(&params).expect("valid params");
        let grid = sim.grid().expect("reset");
        assert!(grid.value(IVec3::new(1, 1, 2)).expect("live grid") < 1.0);
        assert_eq!(grid.value(IVec3::new(1, 1, 0)).expect("live grid"), 1.0);
    }

    #[test]
    fn plane_bias_only_affects_voxels_below() {
        let mut source = Grid::new("slab", 0.0_f32);
        source
            .dense_fill(IVec3::ZERO, IVec3::new(4, 4, 1), 1.0, true)
            .expect("valid box");
        let params = ErosionParams::new(0.0)
            .with_weight(1.0)
            .with_bias(ErosionBias::plane([0.0, 0.0, 0.5], [0.0, 0.0, 1.0]));
        let mut sim = ErosionSimulator::from_grid(&source).expect("live grid");
        sim.step(&params).expect("valid params");
        let grid = sim.grid().expect("reset");
        assert!(grid.value(IVec3::new(2, 2, 0)).expect("live grid") < 1.0);
        assert_eq!(grid.value(IVec3::new(2, 2, 1)).expect("live grid"), 1.0);
    }

    #[test]
    fn plane_bias_uses_world_position() {
        let mut source = Grid::new("slab", 0.0_f32);
        source
            .dense_fill(IVec3::ZERO, IVec3::new(2, 2, 1), 1.0, true)
            .expect("valid box");
        source.set_transform(crate::grid::GridTransform::uniform(10.0));
        let params = ErosionParams::new(0.0)
            .with_weight(1.0)
            .with_bias(ErosionBias::plane(Vec3::new(0.0, 0.0, 5.0), Vec3::Z));
        let mut sim = ErosionSimulator::from_grid(&source).expect("live grid");
        sim.step(&params).expect("valid params");
        let grid = sim.grid().expect("reset");
        assert!(grid.value(IVec3::new(1, 1, 0)).expect("live grid") < 1.0);
        assert_eq!(grid.value(IVec3::new(1, 1, 1)).expect("live grid"), 1.0);
    }

    #[test]
    fn invalid_parameters_leave_state_untouched() {
        let source = block(0, 2, 1.0);
        let mut sim = ErosionSimulator::from_grid(&source).expect("live grid");
        assert!(matches!(
            sim.step(&ErosionParams::new(-1.0)),
            Err(Error::InvalidParameter(_))
        ));
        assert_eq!(sim.iterations(), 0);
        assert_eq!(sim.grid(), Some(&source));
    }
}
