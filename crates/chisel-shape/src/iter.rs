use chisel_geom::Vector3i;

use super::Shape;

/// Covered local positions of a shape, walking the linear index.
pub struct Covered<'a> {
    shape: &'a Shape,
    next: usize,
    len: usize,
}

impl<'a> Covered<'a> {
    pub(crate) fn new(shape: &'a Shape) -> Self {
        Self {
            shape,
            next: 0,
            len: shape.box_len(),
        }
    }
}

impl Iterator for Covered<'_> {
    type Item = Vector3i;

    fn next(&mut self) -> Option<Vector3i> {
        while self.next < self.len {
            let p = self.shape.position_of(self.next);
            self.next += 1;
            if self.shape.contains_local(p) {
                return Some(p);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.len - self.next))
    }
}
