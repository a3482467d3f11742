//! Bounded voxel membership predicates and lazy CSG over them.
//!
//! Every shape owns a local box `[0,width) x [0,height) x [0,length)` and an
//! `origin` that places that box in a relative frame. Queries come in two
//! frames: `relative == false` means the coordinates are already local, while
//! `relative == true` means they are relative-frame coordinates and the
//! origin is subtracted before the local test.
#![forbid(unsafe_code)]

pub mod csg;
pub mod freeform;
mod iter;
pub mod primitive;

use core::fmt;

use chisel_geom::{Bounds, Vector3i, delinearize, linear_index};
use thiserror::Error;

pub use csg::{Compound, CsgOp};
pub use freeform::Freeform;
pub use iter::Covered;
pub use primitive::{Cuboid, Cylinder, Ellipsoid};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Cuboid,
    Ellipsoid,
    Cylinder,
    Freeform,
    Compound,
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ShapeKind::Cuboid => "cuboid",
            ShapeKind::Ellipsoid => "ellipsoid",
            ShapeKind::Cylinder => "cylinder",
            ShapeKind::Freeform => "freeform",
            ShapeKind::Compound => "compound",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShapeError {
    #[error("{kind} shapes are immutable; only freeform shapes support set/unset")]
    UnsupportedMutation { kind: ShapeKind },
    #[error("local position {pos} is outside a shape of size {size}")]
    OutOfBounds { pos: Vector3i, size: Vector3i },
    #[error("invalid shape dimensions: {0}")]
    InvalidDimensions(String),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Cuboid(Cuboid),
    Ellipsoid(Ellipsoid),
    Cylinder(Cylinder),
    Freeform(Freeform),
    Compound(Compound),
}

impl Shape {
    pub fn cuboid(width: i32, height: i32, length: i32) -> Result<Shape, ShapeError> {
        Cuboid::new(width, height, length).map(Shape::Cuboid)
    }

    pub fn ellipsoid(rx: f64, ry: f64, rz: f64) -> Result<Shape, ShapeError> {
        Ellipsoid::new(rx, ry, rz).map(Shape::Ellipsoid)
    }

    pub fn sphere(radius: f64) -> Result<Shape, ShapeError> {
        Self::ellipsoid(radius, radius, radius)
    }

    pub fn cylinder(rx: f64, rz: f64, height: i32) -> Result<Shape, ShapeError> {
        Cylinder::new(rx, rz, height).map(Shape::Cylinder)
    }

    pub fn freeform(width: i32, height: i32, length: i32) -> Result<Shape, ShapeError> {
        Freeform::new(width, height, length).map(Shape::Freeform)
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Cuboid(_) => ShapeKind::Cuboid,
            Shape::Ellipsoid(_) => ShapeKind::Ellipsoid,
            Shape::Cylinder(_) => ShapeKind::Cylinder,
            Shape::Freeform(_) => ShapeKind::Freeform,
            Shape::Compound(_) => ShapeKind::Compound,
        }
    }

    /// Whether [`set`](Self::set) and [`unset`](Self::unset) can succeed.
    #[inline]
    pub fn is_mutable(&self) -> bool {
        matches!(self, Shape::Freeform(_))
    }

    pub fn size(&self) -> Vector3i {
        match self {
            Shape::Cuboid(s) => s.size,
            Shape::Ellipsoid(s) => s.size(),
            Shape::Cylinder(s) => s.size(),
            Shape::Freeform(s) => s.size(),
            Shape::Compound(s) => s.size(),
        }
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.size().x
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.size().y
    }

    #[inline]
    pub fn length(&self) -> i32 {
        self.size().z
    }

    pub fn origin(&self) -> Vector3i {
        match self {
            Shape::Cuboid(s) => s.origin,
            Shape::Ellipsoid(s) => s.origin,
            Shape::Cylinder(s) => s.origin,
            Shape::Freeform(s) => s.origin,
            Shape::Compound(s) => s.origin,
        }
    }

    pub fn set_origin(&mut self, origin: Vector3i) {
        match self {
            Shape::Cuboid(s) => s.origin = origin,
            Shape::Ellipsoid(s) => s.origin = origin,
            Shape::Cylinder(s) => s.origin = origin,
            Shape::Freeform(s) => s.origin = origin,
            Shape::Compound(s) => s.origin = origin,
        }
    }

    pub fn with_origin(mut self, origin: Vector3i) -> Shape {
        self.set_origin(origin);
        self
    }

    #[inline]
    pub fn local_bounds(&self) -> Bounds {
        Bounds::from_min_size(Vector3i::ZERO, self.size())
    }

    /// Local box expressed in relative-frame coordinates.
    #[inline]
    pub fn relative_bounds(&self) -> Bounds {
        self.local_bounds().translated(self.origin())
    }

    /// Number of cells in the local box, covered or not.
    #[inline]
    pub fn box_len(&self) -> usize {
        self.size().volume() as usize
    }

    /// `None` when the relative-to-local shift overflows, which can only
    /// happen far outside the box.
    #[inline]
    fn to_local(&self, x: i32, y: i32, z: i32, relative: bool) -> Option<Vector3i> {
        let p = Vector3i::new(x, y, z);
        if relative { p.checked_sub(self.origin()) } else { Some(p) }
    }

    pub fn get(&self, x: i32, y: i32, z: i32, relative: bool) -> bool {
        self.to_local(x, y, z, relative)
            .is_some_and(|p| self.contains_local(p))
    }

    #[inline]
    pub fn contains_relative(&self, p: Vector3i) -> bool {
        p.checked_sub(self.origin())
            .is_some_and(|p| self.contains_local(p))
    }

    pub fn contains_local(&self, p: Vector3i) -> bool {
        if !self.local_bounds().contains(p) {
            return false;
        }
        match self {
            Shape::Cuboid(_) => true,
            Shape::Ellipsoid(s) => s.contains_local(p),
            Shape::Cylinder(s) => s.contains_local(p),
            Shape::Freeform(s) => s.contains_local(p),
            Shape::Compound(s) => s.contains_local(p),
        }
    }

    pub fn set(&mut self, x: i32, y: i32, z: i32, relative: bool) -> Result<(), ShapeError> {
        self.mutate(x, y, z, relative, true)
    }

    pub fn unset(&mut self, x: i32, y: i32, z: i32, relative: bool) -> Result<(), ShapeError> {
        self.mutate(x, y, z, relative, false)
    }

    fn mutate(&mut self, x: i32, y: i32, z: i32, relative: bool, on: bool) -> Result<(), ShapeError> {
        let Some(p) = self.to_local(x, y, z, relative) else {
            return Err(ShapeError::OutOfBounds {
                pos: Vector3i::new(x, y, z),
                size: self.size(),
            });
        };
        match self {
            Shape::Freeform(s) => s.assign(p, on),
            other => Err(ShapeError::UnsupportedMutation { kind: other.kind() }),
        }
    }

    /// Count of covered positions.
    pub fn volume(&self) -> u64 {
        match self {
            Shape::Cuboid(s) => s.size.volume(),
            Shape::Freeform(s) => s.count(),
            _ => self.covered().count() as u64,
        }
    }

    /// Linear index of a local position, or `None` outside the box.
    #[inline]
    pub fn index_of(&self, p: Vector3i) -> Option<usize> {
        self.local_bounds()
            .contains(p)
            .then(|| linear_index(self.size(), p))
    }

    #[inline]
    pub fn position_of(&self, idx: usize) -> Vector3i {
        delinearize(self.size(), idx)
    }

    /// Covered local positions in linear index order.
    pub fn covered(&self) -> Covered<'_> {
        Covered::new(self)
    }

    /// Editable copy with the same box, origin and coverage.
    pub fn to_freeform(&self) -> Freeform {
        if let Shape::Freeform(f) = self {
            return f.clone();
        }
        let size = self.size();
        let mut out = Freeform::empty(size);
        out.origin = self.origin();
        for p in self.covered() {
            out.insert(p);
        }
        out
    }

    pub fn union(&self, other: &Shape) -> Shape {
        self.union_at(other, Vector3i::ZERO)
    }

    pub fn subtract(&self, other: &Shape) -> Shape {
        self.subtract_at(other, Vector3i::ZERO)
    }

    pub fn xor(&self, other: &Shape) -> Shape {
        self.xor_at(other, Vector3i::ZERO)
    }

    /// Union with `other`'s relative frame shifted by `offset`.
    pub fn union_at(&self, other: &Shape, offset: Vector3i) -> Shape {
        Shape::Compound(Compound::combine(CsgOp::Union, self.clone(), other.clone(), offset))
    }

    pub fn subtract_at(&self, other: &Shape, offset: Vector3i) -> Shape {
        Shape::Compound(Compound::combine(CsgOp::Subtract, self.clone(), other.clone(), offset))
    }

    pub fn xor_at(&self, other: &Shape, offset: Vector3i) -> Shape {
        Shape::Compound(Compound::combine(CsgOp::Xor, self.clone(), other.clone(), offset))
    }

    /// Same coverage shifted by `delta` in the relative frame.
    pub fn offset(&self, delta: Vector3i) -> Shape {
        Shape::Compound(Compound::offset(self.clone(), delta))
    }
}

impl From<Freeform> for Shape {
    fn from(f: Freeform) -> Self {
        Shape::Freeform(f)
    }
}

/// Union: `&a | &b`
impl core::ops::BitOr for &Shape {
    type Output = Shape;
    fn bitor(self, rhs: &Shape) -> Shape {
        self.union(rhs)
    }
}

/// Difference: `&a - &b`
impl core::ops::Sub for &Shape {
    type Output = Shape;
    fn sub(self, rhs: &Shape) -> Shape {
        self.subtract(rhs)
    }
}

/// Symmetric difference: `&a ^ &b`
impl core::ops::BitXor for &Shape {
    type Output = Shape;
    fn bitxor(self, rhs: &Shape) -> Shape {
        self.xor(rhs)
    }
}

pub(crate) fn check_extent(what: &str, v: i32) -> Result<(), ShapeError> {
    if v <= 0 {
        return Err(ShapeError::InvalidDimensions(format!(
            "{what} must be positive, got {v}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_freeform_is_mutable() {
        let mut cube = Shape::cuboid(2, 2, 2).unwrap();
        assert!(!cube.is_mutable());
        assert_eq!(
            cube.set(0, 0, 0, false),
            Err(ShapeError::UnsupportedMutation {
                kind: ShapeKind::Cuboid
            })
        );
        let mut combo = cube.union(&Shape::sphere(1.0).unwrap());
        assert!(matches!(
            combo.unset(0, 0, 0, false),
            Err(ShapeError::UnsupportedMutation {
                kind: ShapeKind::Compound
            })
        ));

        let mut free = Shape::freeform(2, 2, 2).unwrap();
        assert!(free.is_mutable());
        free.set(1, 1, 1, false).unwrap();
        assert!(free.get(1, 1, 1, false));
        assert_eq!(free.volume(), 1);
    }

    #[test]
    fn relative_queries_subtract_origin() {
        let cube = Shape::cuboid(4, 4, 4)
            .unwrap()
            .with_origin(Vector3i::new(2, 2, 2));
        assert!(cube.get(2, 2, 2, true));
        assert!(cube.get(5, 5, 5, true));
        assert!(!cube.get(1, 2, 2, true));
        assert!(!cube.get(6, 2, 2, true));
        assert!(cube.get(0, 0, 0, false));
        assert!(!cube.get(4, 0, 0, false));
    }

    #[test]
    fn extreme_relative_queries_are_uncovered() {
        let sphere = Shape::sphere(2.0).unwrap();
        assert!(!sphere.get(i32::MAX, 0, 0, true));
        assert!(!sphere.get(i32::MIN, 0, 0, true));
        assert!(!sphere.contains_relative(Vector3i::new(0, i32::MAX, 0)));
        let cube = Shape::cuboid(2, 2, 2)
            .unwrap()
            .with_origin(Vector3i::new(5, 5, 5));
        assert!(!cube.get(i32::MIN, 0, 0, true));
        assert!(!cube.contains_relative(Vector3i::splat(i32::MIN)));

        let mut free = Shape::freeform(2, 2, 2)
            .unwrap()
            .with_origin(Vector3i::new(1, 0, 0));
        assert!(matches!(
            free.set(i32::MIN, 0, 0, true),
            Err(ShapeError::OutOfBounds { .. })
        ));
        assert_eq!(free.volume(), 0);
    }

    #[test]
    fn clone_keeps_variant_and_mutability() {
        let mut free = Shape::freeform(3, 1, 1).unwrap();
        free.set(2, 0, 0, false).unwrap();
        let mut copy = free.clone();
        copy.unset(2, 0, 0, false).unwrap();
        assert!(free.get(2, 0, 0, false));
        assert!(!copy.get(2, 0, 0, false));
        assert_eq!(copy.kind(), ShapeKind::Freeform);
    }

    #[test]
    fn to_freeform_matches_source() {
        let s = Shape::sphere(2.0).unwrap();
        let f: Shape = s.to_freeform().into();
        assert_eq!(f.size(), s.size());
        assert_eq!(f.origin(), s.origin());
        assert_eq!(f.volume(), s.volume());
        for p in s.covered() {
            assert!(f.contains_local(p));
        }
    }
}
