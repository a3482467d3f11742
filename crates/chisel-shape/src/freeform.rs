use chisel_geom::{Vector3i, linear_index};

use super::{ShapeError, check_extent};

/// Editable bitset shape; the only variant that accepts `set`/`unset`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Freeform {
    size: Vector3i,
    pub(crate) origin: Vector3i,
    bits: Vec<u64>,
    count: u64,
}

impl Freeform {
    pub fn new(width: i32, height: i32, length: i32) -> Result<Self, ShapeError> {
        check_extent("width", width)?;
        check_extent("height", height)?;
        check_extent("length", length)?;
        Ok(Self::empty(Vector3i::new(width, height, length)))
    }

    pub(crate) fn empty(size: Vector3i) -> Self {
        let words = (size.volume() as usize).div_ceil(64);
        Self {
            size,
            origin: Vector3i::ZERO,
            bits: vec![0; words],
            count: 0,
        }
    }

    #[inline]
    pub(crate) fn size(&self) -> Vector3i {
        self.size
    }

    #[inline]
    pub(crate) fn count(&self) -> u64 {
        self.count
    }

    #[inline]
    fn in_box(&self, p: Vector3i) -> bool {
        p.x >= 0 && p.y >= 0 && p.z >= 0 && p.x < self.size.x && p.y < self.size.y && p.z < self.size.z
    }

    #[inline]
    pub(crate) fn contains_local(&self, p: Vector3i) -> bool {
        if !self.in_box(p) {
            return false;
        }
        let i = linear_index(self.size, p);
        self.bits[i >> 6] & (1u64 << (i & 63)) != 0
    }

    pub(crate) fn insert(&mut self, p: Vector3i) {
        let i = linear_index(self.size, p);
        let (w, m) = (i >> 6, 1u64 << (i & 63));
        if self.bits[w] & m == 0 {
            self.bits[w] |= m;
            self.count += 1;
        }
    }

    pub(crate) fn assign(&mut self, p: Vector3i, on: bool) -> Result<(), ShapeError> {
        if !self.in_box(p) {
            return Err(ShapeError::OutOfBounds {
                pos: p,
                size: self.size,
            });
        }
        if on {
            self.insert(p);
            return Ok(());
        }
        let i = linear_index(self.size, p);
        let (w, m) = (i >> 6, 1u64 << (i & 63));
        if self.bits[w] & m != 0 {
            self.bits[w] &= !m;
            self.count -= 1;
        }
        Ok(())
    }

    /// Clears every cell.
    pub fn clear(&mut self) {
        self.bits.iter_mut().for_each(|w| *w = 0);
        self.count = 0;
    }
}

#[cfg(test)]
mod tests {
    use crate::{Shape, ShapeError};
    use chisel_geom::Vector3i;

    #[test]
    fn set_and_unset_track_volume() {
        let mut s = Shape::freeform(4, 4, 4).unwrap();
        s.set(0, 0, 0, false).unwrap();
        s.set(0, 0, 0, false).unwrap();
        s.set(3, 3, 3, false).unwrap();
        assert_eq!(s.volume(), 2);
        s.unset(0, 0, 0, false).unwrap();
        s.unset(0, 0, 0, false).unwrap();
        assert_eq!(s.volume(), 1);
        assert!(!s.get(0, 0, 0, false));
    }

    #[test]
    fn relative_mutation_subtracts_origin() {
        let mut s = Shape::freeform(2, 2, 2)
            .unwrap()
            .with_origin(Vector3i::new(10, 0, 0));
        s.set(11, 1, 1, true).unwrap();
        assert!(s.get(1, 1, 1, false));
        assert!(matches!(
            s.set(0, 0, 0, true),
            Err(ShapeError::OutOfBounds { .. })
        ));
    }
}
