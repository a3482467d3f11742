//! Closed-form shapes. All are immutable once built.

use chisel_geom::Vector3i;

use super::{ShapeError, check_extent};

/// Axis aligned box filling its whole local frame. Origin defaults to the
/// minimum corner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cuboid {
    pub(crate) size: Vector3i,
    pub(crate) origin: Vector3i,
}

impl Cuboid {
    pub fn new(width: i32, height: i32, length: i32) -> Result<Self, ShapeError> {
        check_extent("width", width)?;
        check_extent("height", height)?;
        check_extent("length", length)?;
        Ok(Self {
            size: Vector3i::new(width, height, length),
            origin: Vector3i::ZERO,
        })
    }
}

fn check_radius(what: &str, r: f64) -> Result<(), ShapeError> {
    if !r.is_finite() || r < 0.0 {
        return Err(ShapeError::InvalidDimensions(format!(
            "{what} must be a finite non-negative radius, got {r}"
        )));
    }
    Ok(())
}

// Radii are padded by half a voxel so integer radii give round lattice shapes
// and a zero radius still covers the centre cell.
#[inline]
fn axis_term(d: i32, r: f64) -> f64 {
    let q = d as f64 / (r + 0.5);
    q * q
}

// Largest |d| with axis_term(d, r) <= 1.
#[inline]
fn half_extent(r: f64) -> i32 {
    (r + 0.5).floor() as i32
}

/// Ellipsoid centred in a `2*floor(r+0.5)+1` box per axis, the smallest box
/// holding every cell the membership test accepts. The default origin puts
/// the centre cell at relative `(0, 0, 0)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Ellipsoid {
    radii: [f64; 3],
    half: Vector3i,
    pub(crate) origin: Vector3i,
}

impl Ellipsoid {
    pub fn new(rx: f64, ry: f64, rz: f64) -> Result<Self, ShapeError> {
        check_radius("rx", rx)?;
        check_radius("ry", ry)?;
        check_radius("rz", rz)?;
        let half = Vector3i::new(half_extent(rx), half_extent(ry), half_extent(rz));
        Ok(Self {
            radii: [rx, ry, rz],
            half,
            origin: -half,
        })
    }

    #[inline]
    pub fn radii(&self) -> [f64; 3] {
        self.radii
    }

    #[inline]
    pub(crate) fn size(&self) -> Vector3i {
        self.half + self.half + Vector3i::ONE
    }

    pub(crate) fn contains_local(&self, p: Vector3i) -> bool {
        let d = p - self.half;
        axis_term(d.x, self.radii[0]) + axis_term(d.y, self.radii[1]) + axis_term(d.z, self.radii[2])
            <= 1.0
    }
}

/// Vertical elliptic cylinder; y is the axis. The default origin puts the
/// centre of the bottom disc at relative `(0, 0, 0)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Cylinder {
    rx: f64,
    rz: f64,
    height: i32,
    half: Vector3i,
    pub(crate) origin: Vector3i,
}

impl Cylinder {
    pub fn new(rx: f64, rz: f64, height: i32) -> Result<Self, ShapeError> {
        check_radius("rx", rx)?;
        check_radius("rz", rz)?;
        check_extent("height", height)?;
        let half = Vector3i::new(half_extent(rx), 0, half_extent(rz));
        Ok(Self {
            rx,
            rz,
            height,
            half,
            origin: -half,
        })
    }

    #[inline]
    pub(crate) fn size(&self) -> Vector3i {
        Vector3i::new(2 * self.half.x + 1, self.height, 2 * self.half.z + 1)
    }

    pub(crate) fn contains_local(&self, p: Vector3i) -> bool {
        let d = p - self.half;
        axis_term(d.x, self.rx) + axis_term(d.z, self.rz) <= 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::axis_term;
    use crate::Shape;

    #[test]
    fn zero_radius_sphere_is_one_cell() {
        let s = Shape::sphere(0.0).unwrap();
        assert_eq!(s.size(), chisel_geom::Vector3i::ONE);
        assert_eq!(s.volume(), 1);
        assert!(s.get(0, 0, 0, true));
    }

    #[test]
    fn sphere_is_symmetric_about_origin() {
        let s = Shape::sphere(3.0).unwrap();
        assert_eq!(s.size(), chisel_geom::Vector3i::splat(7));
        for p in s.covered() {
            let q = p + s.origin();
            assert!(s.get(-q.x, -q.y, -q.z, true));
        }
        assert!(s.get(3, 0, 0, true));
        assert!(!s.get(3, 3, 0, true));
    }

    #[test]
    fn half_integer_radius_keeps_its_poles() {
        let s = Shape::sphere(2.5).unwrap();
        assert_eq!(s.size(), chisel_geom::Vector3i::splat(7));
        for (x, y, z) in [(3, 0, 0), (-3, 0, 0), (0, 3, 0), (0, -3, 0), (0, 0, 3), (0, 0, -3)] {
            assert!(s.get(x, y, z, true), "({x}, {y}, {z})");
        }
        let c = Shape::cylinder(1.5, 1.5, 2).unwrap();
        assert_eq!(c.size(), chisel_geom::Vector3i::new(5, 2, 5));
        assert!(c.get(2, 1, 0, true));
        assert!(c.get(0, 0, -2, true));
    }

    #[test]
    fn box_holds_every_accepted_cell() {
        for step in 0..=8 {
            let r = step as f64 * 0.5;
            let s = Shape::sphere(r).unwrap();
            let mut accepted = 0u64;
            for z in -6..=6 {
                for y in -6..=6 {
                    for x in -6..=6 {
                        let inside = axis_term(x, r) + axis_term(y, r) + axis_term(z, r) <= 1.0;
                        assert_eq!(s.get(x, y, z, true), inside, "r={r} ({x}, {y}, {z})");
                        accepted += inside as u64;
                    }
                }
            }
            assert_eq!(s.volume(), accepted);
        }
    }

    #[test]
    fn cylinder_spans_full_height() {
        let c = Shape::cylinder(2.0, 2.0, 5).unwrap();
        assert_eq!(c.size(), chisel_geom::Vector3i::new(5, 5, 5));
        for y in 0..5 {
            assert!(c.get(0, y, 0, true));
            assert!(c.get(2, y, 0, true));
            assert!(!c.get(2, y, 2, true));
        }
        assert!(!c.get(0, 5, 0, true));
        assert!(!c.get(0, -1, 0, true));
    }

    #[test]
    fn rejects_bad_dimensions() {
        assert!(Shape::cuboid(0, 1, 1).is_err());
        assert!(Shape::cylinder(1.0, 1.0, 0).is_err());
        assert!(Shape::ellipsoid(-1.0, 1.0, 1.0).is_err());
        assert!(Shape::sphere(f64::NAN).is_err());
    }
}
