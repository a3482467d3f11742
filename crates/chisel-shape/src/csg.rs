//! Lazy boolean combination of shapes.
//!
//! Nothing is materialized: every membership query walks the operand tree,
//! so a query costs O(depth) and memory stays at the size of the tree.
//!
//! Bounding box policy: operands are laid out in the left operand's relative
//! frame and the compound's box is the union of their boxes (for `Subtract`
//! only the left box, since nothing outside it can be covered). The compound's
//! origin starts at the minimum corner of that box, so relative queries on the
//! compound use the same frame as relative queries on the left operand.

use chisel_geom::{Bounds, Vector3i};

use super::Shape;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CsgOp {
    Union,
    Subtract,
    Xor,
}

impl CsgOp {
    #[inline]
    pub fn apply(self, a: bool, b: bool) -> bool {
        match self {
            CsgOp::Union => a || b,
            CsgOp::Subtract => a && !b,
            CsgOp::Xor => a ^ b,
        }
    }
}

/// A child shape displaced within the compound's shared frame.
#[derive(Clone, Debug, PartialEq)]
struct Operand {
    shape: Box<Shape>,
    offset: Vector3i,
}

impl Operand {
    #[inline]
    fn contains(&self, p: Vector3i) -> bool {
        p.checked_sub(self.offset)
            .is_some_and(|q| self.shape.contains_relative(q))
    }

    fn bounds(&self) -> Bounds {
        self.shape.relative_bounds().translated(self.offset)
    }

    fn depth(&self) -> usize {
        match self.shape.as_ref() {
            Shape::Compound(c) => c.depth(),
            _ => 1,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Node {
    Offset(Operand),
    Binary {
        op: CsgOp,
        left: Operand,
        right: Operand,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Compound {
    node: Node,
    // Shared-frame position of the local box's minimum corner.
    anchor: Vector3i,
    size: Vector3i,
    pub(crate) origin: Vector3i,
}

impl Compound {
    /// Combine `left` and `right`, with `right` shifted by `right_offset`
    /// inside `left`'s relative frame.
    pub fn combine(op: CsgOp, left: Shape, right: Shape, right_offset: Vector3i) -> Self {
        let left = Operand {
            shape: Box::new(left),
            offset: Vector3i::ZERO,
        };
        let right = Operand {
            shape: Box::new(right),
            offset: right_offset,
        };
        let bounds = match op {
            CsgOp::Subtract => left.bounds(),
            CsgOp::Union | CsgOp::Xor => left.bounds().union(&right.bounds()),
        };
        Self::with_bounds(Node::Binary { op, left, right }, bounds)
    }

    pub fn offset(shape: Shape, delta: Vector3i) -> Self {
        let operand = Operand {
            shape: Box::new(shape),
            offset: delta,
        };
        let bounds = operand.bounds();
        Self::with_bounds(Node::Offset(operand), bounds)
    }

    fn with_bounds(node: Node, bounds: Bounds) -> Self {
        Self {
            node,
            anchor: bounds.min,
            size: bounds.size(),
            origin: bounds.min,
        }
    }

    #[inline]
    pub(crate) fn size(&self) -> Vector3i {
        self.size
    }

    /// Operator of a binary compound; `None` for an offset wrapper.
    pub fn op(&self) -> Option<CsgOp> {
        match &self.node {
            Node::Offset(_) => None,
            Node::Binary { op, .. } => Some(*op),
        }
    }

    /// Longest chain of nested compounds, counting leaves as 1.
    pub fn depth(&self) -> usize {
        1 + match &self.node {
            Node::Offset(a) => a.depth(),
            Node::Binary { left, right, .. } => left.depth().max(right.depth()),
        }
    }

    pub(crate) fn contains_local(&self, p: Vector3i) -> bool {
        let Some(q) = p.checked_add(self.anchor) else {
            return false;
        };
        match &self.node {
            Node::Offset(a) => a.contains(q),
            Node::Binary { op, left, right } => op.apply(left.contains(q), right.contains(q)),
        }
    }
}
