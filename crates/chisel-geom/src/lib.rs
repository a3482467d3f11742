//! Integer lattice geometry shared by the editing crates.
#![forbid(unsafe_code)]

use core::fmt;
use core::ops::{Add, AddAssign, Neg, Sub, SubAssign};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct Vector3i {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Vector3i {
    pub const ZERO: Vector3i = Vector3i { x: 0, y: 0, z: 0 };
    pub const ONE: Vector3i = Vector3i { x: 1, y: 1, z: 1 };

    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub const fn splat(v: i32) -> Self {
        Self { x: v, y: v, z: v }
    }

    #[inline]
    pub fn min(self, rhs: Vector3i) -> Vector3i {
        Vector3i::new(self.x.min(rhs.x), self.y.min(rhs.y), self.z.min(rhs.z))
    }

    #[inline]
    pub fn max(self, rhs: Vector3i) -> Vector3i {
        Vector3i::new(self.x.max(rhs.x), self.y.max(rhs.y), self.z.max(rhs.z))
    }

    /// Product of the components, or 0 if any component is not positive.
    /// Component-wise `self + rhs`, `None` if any component overflows.
    #[inline]
    pub fn checked_add(self, rhs: Vector3i) -> Option<Vector3i> {
        Some(Vector3i::new(
            self.x.checked_add(rhs.x)?,
            self.y.checked_add(rhs.y)?,
            self.z.checked_add(rhs.z)?,
        ))
    }

    /// Component-wise `self - rhs`, `None` if any component overflows.
    #[inline]
    pub fn checked_sub(self, rhs: Vector3i) -> Option<Vector3i> {
        Some(Vector3i::new(
            self.x.checked_sub(rhs.x)?,
            self.y.checked_sub(rhs.y)?,
            self.z.checked_sub(rhs.z)?,
        ))
    }

    #[inline]
    pub fn volume(self) -> u64 {
        if self.x <= 0 || self.y <= 0 || self.z <= 0 {
            return 0;
        }
        self.x as u64 * self.y as u64 * self.z as u64
    }
}

impl fmt::Display for Vector3i {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl From<(i32, i32, i32)> for Vector3i {
    #[inline]
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        Vector3i::new(x, y, z)
    }
}

impl Add for Vector3i {
    type Output = Vector3i;
    #[inline]
    fn add(self, rhs: Vector3i) -> Vector3i {
        Vector3i::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vector3i {
    #[inline]
    fn add_assign(&mut self, rhs: Vector3i) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl Sub for Vector3i {
    type Output = Vector3i;
    #[inline]
    fn sub(self, rhs: Vector3i) -> Vector3i {
        Vector3i::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl SubAssign for Vector3i {
    #[inline]
    fn sub_assign(&mut self, rhs: Vector3i) {
        self.x -= rhs.x;
        self.y -= rhs.y;
        self.z -= rhs.z;
    }
}

impl Neg for Vector3i {
    type Output = Vector3i;
    #[inline]
    fn neg(self) -> Vector3i {
        Vector3i::new(-self.x, -self.y, -self.z)
    }
}

/// Half-open integer box `[min, max)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Bounds {
    pub min: Vector3i,
    pub max: Vector3i,
}

impl Bounds {
    #[inline]
    pub const fn new(min: Vector3i, max: Vector3i) -> Self {
        Self { min, max }
    }

    /// Box of the given size whose minimum corner sits at `min`.
    #[inline]
    pub fn from_min_size(min: Vector3i, size: Vector3i) -> Self {
        Self::new(min, min + size)
    }

    #[inline]
    pub fn size(&self) -> Vector3i {
        (self.max - self.min).max(Vector3i::ZERO)
    }

    #[inline]
    pub fn volume(&self) -> u64 {
        self.size().volume()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.volume() == 0
    }

    #[inline]
    pub fn contains(&self, p: Vector3i) -> bool {
        p.x >= self.min.x
            && p.y >= self.min.y
            && p.z >= self.min.z
            && p.x < self.max.x
            && p.y < self.max.y
            && p.z < self.max.z
    }

    /// Smallest box containing both. An empty side is ignored.
    pub fn union(&self, other: &Bounds) -> Bounds {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Bounds::new(self.min.min(other.min), self.max.max(other.max))
    }

    #[inline]
    pub fn translated(&self, by: Vector3i) -> Bounds {
        Bounds::new(self.min + by, self.max + by)
    }
}

/// Linear index of `p` inside a box of `size`: `(y * length + z) * width + x`.
/// Caller guarantees `p` lies in `[0, size)`.
#[inline]
pub fn linear_index(size: Vector3i, p: Vector3i) -> usize {
    ((p.y as usize * size.z as usize) + p.z as usize) * size.x as usize + p.x as usize
}

/// Inverse of [`linear_index`].
#[inline]
pub fn delinearize(size: Vector3i, idx: usize) -> Vector3i {
    let w = size.x as usize;
    let l = size.z as usize;
    let x = idx % w;
    let z = (idx / w) % l;
    let y = idx / (w * l);
    Vector3i::new(x as i32, y as i32, z as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn linear_index_walks_x_fastest() {
        let size = Vector3i::new(3, 2, 4);
        assert_eq!(linear_index(size, Vector3i::new(1, 0, 0)), 1);
        assert_eq!(linear_index(size, Vector3i::new(0, 0, 1)), 3);
        assert_eq!(linear_index(size, Vector3i::new(0, 1, 0)), 12);
        for i in 0..size.volume() as usize {
            assert_eq!(linear_index(size, delinearize(size, i)), i);
        }
    }

    proptest! {
        #[test]
        fn add_then_sub_is_identity(a in any::<Vector3i>().prop_map(clamp), b in any::<Vector3i>().prop_map(clamp)) {
            prop_assert_eq!((a + b) - b, a);
            prop_assert_eq!(-(-a), a);
        }
    }

    fn clamp(v: Vector3i) -> Vector3i {
        Vector3i::new(v.x % 1_000_000, v.y % 1_000_000, v.z % 1_000_000)
    }

    #[test]
    fn checked_ops_report_overflow() {
        let a = Vector3i::new(i32::MAX, 0, 0);
        assert_eq!(a.checked_add(Vector3i::new(1, 0, 0)), None);
        assert_eq!(a.checked_sub(Vector3i::new(0, 0, -1)), Some(Vector3i::new(i32::MAX, 0, 1)));
        assert_eq!(Vector3i::new(0, i32::MIN, 0).checked_sub(Vector3i::new(0, 1, 0)), None);
    }

    #[test]
    fn negative_size_has_zero_volume() {
        assert_eq!(Vector3i::new(3, -1, 2).volume(), 0);
        assert_eq!(Vector3i::new(3, 4, 2).volume(), 24);
    }
}
