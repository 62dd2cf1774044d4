//! Ordered sparse voxel storage.
//!
//! [`SparseTree`] keeps one [`Cell`] per touched coordinate in a `BTreeMap` keyed
//! by `(x, y, z)`, so active enumeration is deterministic and lexicographic.
//! Activation and value are stored separately: an inactive cell still remembers
//! its value, which becomes visible again when the cell is reactivated.
use std::collections::BTreeMap;

use glam::IVec3;

use crate::grid::coord::{offset_coord, Coord};
use crate::grid::value::VoxelValue;

type Key = (i32, i32, i32);

#[inline]
fn key(c: Coord) -> Key {
    (c.x, c.y, c.z)
}

#[inline]
fn coord((x, y, z): Key) -> Coord {
    IVec3::new(x, y, z)
}

/// Stored state of a single voxel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Cell<T> {
    pub value: T,
    pub active: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct SparseTree<T: VoxelValue> {
    background: T,
    cells: BTreeMap<Key, Cell<T>>,
}

impl<T: VoxelValue> SparseTree<T> {
    pub fn new(background: T) -> Self {
        Self {
            background,
            cells: BTreeMap::new(),
        }
    }

    #[inline]
    pub fn background(&self) -> T {
        self.background
    }

    /// Observable value: the stored value when active, background otherwise.
    #[inline]
    pub fn value(&self, c: Coord) -> T {
        match self.cells.get(&key(c)) {
            Some(cell) if cell.active => cell.value,
            _ => self.background,
        }
    }

    /// Observable value at `c + o`; background when the sum leaves the `i32` range.
    #[inline]
    pub fn value_at_offset(&self, c: Coord, o: IVec3) -> T {
        offset_coord(c, o).map_or(self.background, |n| self.value(n))
    }

    #[inline]
    pub fn is_active(&self, c: Coord) -> bool {
        self.cells.get(&key(c)).is_some_and(|cell| cell.active)
    }

    /// Writes a value without touching the activation flag.
    pub fn set_value_only(&mut self, c: Coord, value: T) {
        self.cells
            .entry(key(c))
            .and_modify(|cell| cell.value = value)
            .or_insert(Cell {
                value,
                active: false,
            });
    }

    /// Writes a value and activates the voxel.
    pub fn set_value_on(&mut self, c: Coord, value: T) {
        self.cells
            .insert(key(c), Cell { value, active: true });
    }

    pub fn set_active(&mut self, c: Coord, on: bool) {
        let background = self.background;
        match self.cells.get_mut(&key(c)) {
            Some(cell) => cell.active = on,
            None if on => {
                self.cells.insert(
                    key(c),
                    Cell {
                        value: background,
                        active: true,
                    },
                );
            }
            None => {}
        }
    }

    pub fn active_count(&self) -> usize {
        self.cells.values().filter(|c| c.active).count()
    }

    pub fn active_coords(&self) -> Vec<Coord> {
        self.iter_active().map(|(c, _)| c).collect()
    }

    pub fn iter_active(&self) -> impl Iterator<Item = (Coord, T)> + '_ {
        self.cells
            .iter()
            .filter(|(_, cell)| cell.active)
            .map(|(k, cell)| (coord(*k), cell.value))
    }

    /// Removes inactive cells whose stored value is within `tolerance` of background.
    pub fn prune(&mut self, tolerance: f32) -> usize {
        let before = self.cells.len();
        let background = self.background;
        self.cells
            .retain(|_, cell| cell.active || !cell.value.within(background, tolerance));
        before - self.cells.len()
    }

    /// Drops every cell for which `keep` returns false.
    pub fn retain(&mut self, mut keep: impl FnMut(Coord) -> bool) {
        self.cells.retain(|k, _| keep(coord(*k)));
    }

    /// Inclusive index-space bounds of the active voxels.
    pub fn active_bounds(&self) -> Option<(Coord, Coord)> {
        self.iter_active().fold(None, |acc, (c, _)| match acc {
            None => Some((c, c)),
            Some((lo, hi)) => Some((lo.min(c), hi.max(c))),
        })
    }
}
