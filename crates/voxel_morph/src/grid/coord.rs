//! Integer voxel coordinates and the 3×3×3 neighbourhood layout.
use glam::{IVec3, Vec3};

use crate::error::{Error, Result};

/// Index-space voxel coordinate.
pub type Coord = IVec3;

/// Number of values in a neighbourhood sample (centre included).
pub const NEIGHBORHOOD_SIZE: usize = 27;
/// Position of the centre voxel inside a neighbourhood sample.
pub const CENTER_INDEX: usize = 13;
/// Number of neighbours around the centre.
pub const NEIGHBOR_COUNT: usize = 26;

/// Offsets of a neighbourhood sample: `dz` outermost, `dx` fastest.
pub const NEIGHBORHOOD_OFFSETS: [IVec3; NEIGHBORHOOD_SIZE] = build_offsets();

const fn build_offsets() -> [IVec3; NEIGHBORHOOD_SIZE] {
    let mut out = [IVec3::ZERO; NEIGHBORHOOD_SIZE];
    let mut i = 0;
    while i < NEIGHBORHOOD_SIZE {
        let dx = (i % 3) as i32 - 1;
        let dy = ((i / 3) % 3) as i32 - 1;
        let dz = (i / 9) as i32 - 1;
        out[i] = IVec3::new(dx, dy, dz);
        i += 1;
    }
    out
}

/// Unit-length direction of every neighbourhood offset (zero for the centre).
pub fn unit_offsets() -> [Vec3; NEIGHBORHOOD_SIZE] {
    NEIGHBORHOOD_OFFSETS.map(|o| o.as_vec3().normalize_or_zero())
}

/// `c + o`, or `None` when a component leaves the `i32` range.
///
/// Coordinates past the range are never stored, so callers treat them as inactive.
#[inline]
pub fn offset_coord(c: Coord, o: IVec3) -> Option<Coord> {
    Some(IVec3::new(
        c.x.checked_add(o.x)?,
        c.y.checked_add(o.y)?,
        c.z.checked_add(o.z)?,
    ))
}

/// Parses a flat `[x0, y0, z0, x1, ...]` buffer into coordinates.
pub fn coords_from_flat(flat: &[i32]) -> Result<Vec<Coord>> {
    if flat.len() % 3 != 0 {
        return Err(Error::LengthMismatch {
            what: "flat coordinates",
            expected: flat.len() - flat.len() % 3,
            found: flat.len(),
        });
    }
    Ok(flat
        .chunks_exact(3)
        .map(|c| IVec3::new(c[0], c[1], c[2]))
        .collect())
}

/// Flattens coordinates into repeating `x, y, z` triplets.
pub fn flatten_coords(coords: &[Coord]) -> Vec<i32> {
    coords.iter().flat_map(|c| [c.x, c.y, c.z]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_coord_stops_at_the_i32_range() {
        assert_eq!(
            offset_coord(IVec3::new(1, 2, 3), IVec3::new(-1, 0, 1)),
            Some(IVec3::new(0, 2, 4))
        );
        assert_eq!(offset_coord(IVec3::splat(i32::MAX), IVec3::X), None);
        assert_eq!(offset_coord(IVec3::splat(i32::MIN), IVec3::NEG_Z), None);
        assert_eq!(
            offset_coord(IVec3::splat(i32::MAX), IVec3::NEG_ONE),
            Some(IVec3::splat(i32::MAX - 1))
        );
    }

    #[test]
    fn centre_offset_is_zero() {
        assert_eq!(NEIGHBORHOOD_OFFSETS[CENTER_INDEX], IVec3::ZERO);
    }

    #[test]
    fn x_varies_fastest() {
        assert_eq!(NEIGHBORHOOD_OFFSETS[0], IVec3::new(-1, -1, -1));
        assert_eq!(NEIGHBORHOOD_OFFSETS[1], IVec3::new(0, -1, -1));
        assert_eq!(NEIGHBORHOOD_OFFSETS[3], IVec3::new(-1, 0, -1));
        assert_eq!(NEIGHBORHOOD_OFFSETS[9], IVec3::new(-1, -1, 0));
        assert_eq!(NEIGHBORHOOD_OFFSETS[26], IVec3::new(1, 1, 1));
    }

    #[test]
    fn unit_offsets_are_normalized() {
        let units = unit_offsets();
        assert_eq!(units[CENTER_INDEX], Vec3::ZERO);
        for (i, u) in units.iter().enumerate() {
            if i != CENTER_INDEX {
                assert!((u.length() - 1.0).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn flat_coordinates_must_be_triplets() {
        let err = coords_from_flat(&[1, 2, 3, 4]).expect_err("four ints are not triplets");
        assert!(matches!(err, Error::LengthMismatch { found: 4, .. }));

        let coords = coords_from_flat(&[1, 2, 3, -4, 5, -6]).expect("valid triplets");
        assert_eq!(coords, vec![IVec3::new(1, 2, 3), IVec3::new(-4, 5, -6)]);
        assert_eq!(flatten_coords(&coords), vec![1, 2, 3, -4, 5, -6]);
    }
}
