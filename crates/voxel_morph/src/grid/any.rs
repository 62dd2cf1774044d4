//! Kind-erased grid handle.
//!
//! [`AnyGrid`] is the closed set of grid kinds. Operations that work for every
//! kind dispatch through it; operations a kind cannot support surface as
//! [`Error::Unsupported`].
use glam::Vec3;

use crate::error::{Error, Result};
use crate::grid::{Coord, Grid, GridTransform, ValueKind};

/// A grid of any supported value kind.
#[derive(Debug, PartialEq)]
pub enum AnyGrid {
    Float(Grid<f32>),
    Double(Grid<f64>),
    Int32(Grid<i32>),
    Vec3(Grid<Vec3>),
}

macro_rules! dispatch {
    ($self:expr, $g:ident => $body:expr) => {
        match $self {
            AnyGrid::Float($g) => $body,
            AnyGrid::Double($g) => $body,
            AnyGrid::Int32($g) => $body,
            AnyGrid::Vec3($g) => $body,
        }
    };
}

macro_rules! dispatch_map {
    ($self:expr, $g:ident => $body:expr) => {
        match $self {
            AnyGrid::Float($g) => AnyGrid::Float($body),
            AnyGrid::Double($g) => AnyGrid::Double($body),
            AnyGrid::Int32($g) => AnyGrid::Int32($body),
            AnyGrid::Vec3($g) => AnyGrid::Vec3($body),
        }
    };
}

impl AnyGrid {
    /// Creates an empty grid of `kind` with a zero background.
    pub fn new(name: impl Into<String>, kind: ValueKind) -> Self {
        let name = name.into();
        match kind {
            ValueKind::Float => AnyGrid::Float(Grid::new(name, 0.0)),
            ValueKind::Double => AnyGrid::Double(Grid::new(name, 0.0)),
            ValueKind::Int32 => AnyGrid::Int32(Grid::new(name, 0)),
            ValueKind::Vec3f => AnyGrid::Vec3(Grid::new(name, Vec3::ZERO)),
        }
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            AnyGrid::Float(_) => ValueKind::Float,
            AnyGrid::Double(_) => ValueKind::Double,
            AnyGrid::Int32(_) => ValueKind::Int32,
            AnyGrid::Vec3(_) => ValueKind::Vec3f,
        }
    }

    pub fn name(&self) -> &str {
        dispatch!(self, g => g.name())
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        dispatch!(self, g => g.set_name(name))
    }

    pub fn transform(&self) -> GridTransform {
        dispatch!(self, g => g.transform())
    }

    pub fn set_transform(&mut self, transform: GridTransform) {
        dispatch!(self, g => g.set_transform(transform))
    }

    pub fn transform_row_major(&self) -> [f32; 16] {
        dispatch!(self, g => g.transform_row_major())
    }

    pub fn set_transform_row_major(&mut self, values: &[f32]) -> Result<()> {
        dispatch!(self, g => g.set_transform_row_major(values))
    }

    pub fn is_valid(&self) -> bool {
        dispatch!(self, g => g.is_valid())
    }

    pub fn dispose(&mut self) {
        dispatch!(self, g => g.dispose())
    }

    pub fn duplicate(&self) -> Result<Self> {
        Ok(dispatch_map!(self, g => g.duplicate()?))
    }

    pub fn active_voxel_count(&self) -> Result<usize> {
        dispatch!(self, g => g.active_voxel_count())
    }

    pub fn active_coordinates(&self) -> Result<Vec<Coord>> {
        dispatch!(self, g => g.active_coordinates())
    }

    pub fn bounding_box(&self) -> Result<Option<(Coord, Coord)>> {
        dispatch!(self, g => g.bounding_box())
    }

    pub fn prune(&mut self, tolerance: f32) -> Result<usize> {
        dispatch!(self, g => g.prune(tolerance))
    }

    pub fn set_active_states(&mut self, coords: &[Coord], flags: &[bool]) -> Result<()> {
        dispatch!(self, g => g.set_active_states(coords, flags))
    }

    pub fn clip_index(&mut self, min: Coord, max: Coord) -> Result<()> {
        dispatch!(self, g => g.clip_index(min, max))
    }

    pub fn as_float(&self) -> Option<&Grid<f32>> {
        match self {
            AnyGrid::Float(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<&Grid<f64>> {
        match self {
            AnyGrid::Double(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_int32(&self) -> Option<&Grid<i32>> {
        match self {
            AnyGrid::Int32(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_vec3(&self) -> Option<&Grid<Vec3>> {
        match self {
            AnyGrid::Vec3(g) => Some(g),
            _ => None,
        }
    }

    /// Returns the float grid or an [`Error::Unsupported`] naming `op`.
    pub fn into_float(self, op: &str) -> Result<Grid<f32>> {
        match self {
            AnyGrid::Float(g) => Ok(g),
            other => Err(Error::unsupported(op, other.kind())),
        }
    }
}

impl From<Grid<f32>> for AnyGrid {
    fn from(g: Grid<f32>) -> Self {
        AnyGrid::Float(g)
    }
}

impl From<Grid<f64>> for AnyGrid {
    fn from(g: Grid<f64>) -> Self {
        AnyGrid::Double(g)
    }
}

impl From<Grid<i32>> for AnyGrid {
    fn from(g: Grid<i32>) -> Self {
        AnyGrid::Int32(g)
    }
}

impl From<Grid<Vec3>> for AnyGrid {
    fn from(g: Grid<Vec3>) -> Self {
        AnyGrid::Vec3(g)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec3;

    #[test]
    fn new_grids_report_their_kind() {
        for kind in [
            ValueKind::Float,
            ValueKind::Double,
            ValueKind::Int32,
            ValueKind::Vec3f,
        ] {
            let grid = AnyGrid::new("g", kind);
            assert_eq!(grid.kind(), kind);
            assert_eq!(grid.active_voxel_count().expect("live grid"), 0);
        }
    }

    #[test]
    fn duplicate_keeps_variant() {
        let mut g = Grid::new("ints", 0_i32);
        g.set_value(IVec3::ONE, 3).expect("live grid");
        let any = AnyGrid::from(g);
        let copy = any.duplicate().expect("live grid");
        assert_eq!(copy, any);
        assert_eq!(copy.as_int32().map(|g| g.value(IVec3::ONE).ok()), Some(Some(3)));
    }

    #[test]
    fn into_float_rejects_other_kinds() {
        let any = AnyGrid::new("v", ValueKind::Vec3f);
        let err = any.into_float("erosion").expect_err("vector grid");
        assert!(matches!(
            err,
            Error::Unsupported {
                kind: ValueKind::Vec3f,
                ..
            }
        ));
    }

    #[test]
    fn dispose_dispatches() {
        let mut any = AnyGrid::new("d", ValueKind::Double);
        any.set_name("renamed");
        any.dispose();
        assert!(!any.is_valid());
        assert!(matches!(any.duplicate(), Err(Error::Disposed { .. })));
    }
}
