//! Sparse voxel grids.
//!
//! A [`Grid`] owns a name, an index-to-world [`GridTransform`], a background value
//! and a sparse mapping from [`Coord`] to `(value, active)`. Activation and value
//! are independent: reading a coordinate that is not active always yields the
//! background, while the value stored there is kept and reappears when the voxel
//! is activated again.
//!
//! Grids are exclusively owned. [`Grid::duplicate`] is a deep copy with its own
//! lifetime; [`Grid::dispose`] releases the storage early (dropping the grid does
//! the same). Every accessor on a disposed grid fails with
//! [`Error::Disposed`](crate::error::Error::Disposed).
use glam::{IVec3, Vec3};
use tracing::debug;

use crate::error::{Error, Result};

pub mod any;
pub mod coord;
pub mod sample;
pub mod transform;
pub(crate) mod tree;
pub mod value;

pub use any::AnyGrid;
pub use coord::{
    coords_from_flat, flatten_coords, offset_coord, Coord, CENTER_INDEX, NEIGHBORHOOD_OFFSETS,
    NEIGHBORHOOD_SIZE, NEIGHBOR_COUNT,
};
pub use sample::SampleMode;
pub use transform::GridTransform;
pub use value::{ScalarValue, ValueKind, VoxelValue};

use tree::SparseTree;

/// Sparse voxel grid storing values of type `T`.
#[derive(Debug, PartialEq)]
pub struct Grid<T: VoxelValue> {
    name: String,
    transform: GridTransform,
    tree: Option<SparseTree<T>>,
}

impl<T: VoxelValue> Grid<T> {
    /// Creates an empty grid with an identity transform.
    pub fn new(name: impl Into<String>, background: T) -> Self {
        Self {
            name: name.into(),
            transform: GridTransform::IDENTITY,
            tree: Some(SparseTree::new(background)),
        }
    }

    /// Sets the index-to-world transform.
    pub fn with_transform(mut self, transform: GridTransform) -> Self {
        self.transform = transform;
        self
    }

    /// Empty grid sharing name, background and transform with `self`.
    pub(crate) fn empty_like(&self) -> Result<Self> {
        Ok(Self::new(self.name.clone(), self.background()?).with_transform(self.transform))
    }

    pub(crate) fn tree(&self) -> Result<&SparseTree<T>> {
        self.tree.as_ref().ok_or_else(|| Error::Disposed {
            name: self.name.clone(),
        })
    }

    pub(crate) fn tree_mut(&mut self) -> Result<&mut SparseTree<T>> {
        match self.tree.as_mut() {
            Some(tree) => Ok(tree),
            None => Err(Error::Disposed {
                name: self.name.clone(),
            }),
        }
    }

    #[inline]
    pub fn kind(&self) -> ValueKind {
        T::KIND
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    #[inline]
    pub fn transform(&self) -> GridTransform {
        self.transform
    }

    pub fn set_transform(&mut self, transform: GridTransform) {
        self.transform = transform;
    }

    /// Transform as 16 row-major floats (translation in elements 3, 7, 11).
    pub fn transform_row_major(&self) -> [f32; 16] {
        self.transform.to_row_major()
    }

    pub fn set_transform_row_major(&mut self, values: &[f32]) -> Result<()> {
        self.transform = GridTransform::from_row_major(values)?;
        Ok(())
    }

    /// `false` once the grid has been disposed.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.tree.is_some()
    }

    /// Releases the voxel storage. Calling it again is a no-op.
    pub fn dispose(&mut self) {
        if self.tree.take().is_some() {
            debug!("disposed grid '{}'", self.name);
        }
    }

    pub fn background(&self) -> Result<T> {
        Ok(self.tree()?.background())
    }

    /// Deep copy with its own lifetime.
    pub fn duplicate(&self) -> Result<Self> {
        Ok(Self {
            name: self.name.clone(),
            transform: self.transform,
            tree: Some(self.tree()?.clone()),
        })
    }

    pub fn active_voxel_count(&self) -> Result<usize> {
        Ok(self.tree()?.active_count())
    }

    /// Inclusive index-space bounds of the active voxels, `None` when empty.
    pub fn bounding_box(&self) -> Result<Option<(Coord, Coord)>> {
        Ok(self.tree()?.active_bounds())
    }

    /// Drops inactive voxels whose value is within `tolerance` of background.
    /// Returns the number of removed entries.
    pub fn prune(&mut self, tolerance: f32) -> Result<usize> {
        Ok(self.tree_mut()?.prune(tolerance))
    }

    /// Active coordinates in lexicographic `(x, y, z)` order.
    pub fn active_coordinates(&self) -> Result<Vec<Coord>> {
        Ok(self.tree()?.active_coords())
    }

    pub fn active_coordinates_flat(&self) -> Result<Vec<i32>> {
        Ok(flatten_coords(&self.active_coordinates()?))
    }

    /// Observable value at `c`: background unless the voxel is active.
    pub fn value(&self, c: Coord) -> Result<T> {
        Ok(self.tree()?.value(c))
    }

    pub fn is_active(&self, c: Coord) -> Result<bool> {
        Ok(self.tree()?.is_active(c))
    }

    /// Writes a value and activates the voxel.
    pub fn set_value(&mut self, c: Coord, value: T) -> Result<()> {
        self.tree_mut()?.set_value_on(c, value);
        Ok(())
    }

    /// Writes a value without changing the activation state.
    pub fn set_value_only(&mut self, c: Coord, value: T) -> Result<()> {
        self.tree_mut()?.set_value_only(c, value);
        Ok(())
    }

    pub fn set_active_state(&mut self, c: Coord, active: bool) -> Result<()> {
        self.tree_mut()?.set_active(c, active);
        Ok(())
    }

    pub fn values_at(&self, coords: &[Coord]) -> Result<Vec<T>> {
        let tree = self.tree()?;
        Ok(coords.iter().map(|c| tree.value(*c)).collect())
    }

    pub fn values_at_flat(&self, coords: &[i32]) -> Result<Vec<T>> {
        self.values_at(&coords_from_flat(coords)?)
    }

    /// Writes and activates `values[i]` at `coords[i]`.
    pub fn set_values(&mut self, coords: &[Coord], values: &[T]) -> Result<()> {
        check_len("values", coords.len(), values.len())?;
        let tree = self.tree_mut()?;
        for (c, v) in coords.iter().zip(values) {
            tree.set_value_on(*c, *v);
        }
        Ok(())
    }

    /// Flat form of [`Self::set_values`]; requires `values.len() * 3 == coords.len()`.
    pub fn set_values_flat(&mut self, coords: &[i32], values: &[T]) -> Result<()> {
        check_len("values", coords.len(), values.len() * 3)?;
        self.set_values(&coords_from_flat(coords)?, values)
    }

    pub fn set_active_states(&mut self, coords: &[Coord], flags: &[bool]) -> Result<()> {
        check_len("activation flags", coords.len(), flags.len())?;
        let tree = self.tree_mut()?;
        for (c, on) in coords.iter().zip(flags) {
            tree.set_active(*c, *on);
        }
        Ok(())
    }

    /// Flat form of [`Self::set_active_states`]; requires `flags.len() * 3 == coords.len()`.
    pub fn set_active_states_flat(&mut self, coords: &[i32], flags: &[bool]) -> Result<()> {
        check_len("activation flags", coords.len(), flags.len() * 3)?;
        self.set_active_states(&coords_from_flat(coords)?, flags)
    }

    /// The 27 values around `c` (centre at [`CENTER_INDEX`]), background where inactive.
    ///
    /// Neighbours past the `i32` coordinate range read as background.
    pub fn neighborhood(&self, c: Coord) -> Result<[T; NEIGHBORHOOD_SIZE]> {
        let tree = self.tree()?;
        Ok(NEIGHBORHOOD_OFFSETS.map(|o| tree.value_at_offset(c, o)))
    }

    /// Removes every voxel outside the inclusive index box `[min, max]`.
    pub fn clip_index(&mut self, min: Coord, max: Coord) -> Result<()> {
        check_box(min, max)?;
        self.tree_mut()?
            .retain(|c| c.cmpge(min).all() && c.cmple(max).all());
        Ok(())
    }

    /// Removes every voxel whose centre lies outside the world-space box `[min, max]`.
    pub fn clip_world(
        &mut self,
        min: impl Into<mint::Vector3<f32>>,
        max: impl Into<mint::Vector3<f32>>,
    ) -> Result<()> {
        let (lo, hi) = (Vec3::from(min.into()), Vec3::from(max.into()));
        let mut idx_lo = Vec3::splat(f32::INFINITY);
        let mut idx_hi = Vec3::splat(f32::NEG_INFINITY);
        for i in 0..8 {
            let corner = Vec3::new(
                if i & 1 == 0 { lo.x } else { hi.x },
                if i & 2 == 0 { lo.y } else { hi.y },
                if i & 4 == 0 { lo.z } else { hi.z },
            );
            let p = self.transform.world_to_index(corner)?;
            idx_lo = idx_lo.min(p);
            idx_hi = idx_hi.max(p);
        }
        let (min_c, max_c) = (idx_lo.ceil().as_ivec3(), idx_hi.floor().as_ivec3());
        if min_c.cmpgt(max_c).any() {
            self.tree_mut()?.retain(|_| false);
            return Ok(());
        }
        self.clip_index(min_c, max_c)
    }

    /// Sets every voxel of the inclusive box `[min, max]` to `value` with the given state.
    pub fn dense_fill(&mut self, min: Coord, max: Coord, value: T, active: bool) -> Result<()> {
        check_box(min, max)?;
        let tree = self.tree_mut()?;
        for z in min.z..=max.z {
            for y in min.y..=max.y {
                for x in min.x..=max.x {
                    let c = IVec3::new(x, y, z);
                    tree.set_value_only(c, value);
                    tree.set_active(c, active);
                }
            }
        }
        Ok(())
    }
}

fn check_len(what: &'static str, expected: usize, found: usize) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(Error::LengthMismatch {
            what,
            expected,
            found,
        })
    }
}

fn check_box(min: Coord, max: Coord) -> Result<()> {
    if min.cmpgt(max).any() {
        return Err(Error::InvalidParameter(format!(
            "box minimum {min} exceeds maximum {max}"
        )));
    }
    Ok(())
}
