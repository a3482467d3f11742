use clap::ValueEnum;

use chisel_blocks::Block;
use chisel_edit::{ChangeQueue, Location, ShapeChangeQueue};
use chisel_shape::{Shape, ShapeError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum BrushKind {
    Cuboid,
    Ellipsoid,
    Cylinder,
}

/// Builds a brush fitting a `[width, height, length]` box. Round brushes have
/// odd extents, so even sizes shrink by one voxel on that axis.
pub fn build_shape(kind: BrushKind, size: [i32; 3]) -> Result<Shape, ShapeError> {
    let [w, h, l] = size;
    let radius = |d: i32| ((d - 1).max(0) / 2) as f64;
    match kind {
        BrushKind::Cuboid => Shape::cuboid(w, h, l),
        BrushKind::Ellipsoid => {
            if w <= 0 || h <= 0 || l <= 0 {
                return Err(ShapeError::InvalidDimensions(format!(
                    "brush size must be positive, got {}x{}x{}",
                    w, h, l
                )));
            }
            Shape::ellipsoid(radius(w), radius(h), radius(l))
        }
        BrushKind::Cylinder => {
            if w <= 0 || l <= 0 {
                return Err(ShapeError::InvalidDimensions(format!(
                    "brush size must be positive, got {}x{}x{}",
                    w, h, l
                )));
            }
            Shape::cylinder(radius(w), radius(l), h)
        }
    }
}

/// Solid block of `material` around the brush with the brush itself hollowed
/// out, placed so the brush keeps its own relative frame.
pub fn carve(brush: &Shape) -> Result<Shape, ShapeError> {
    let b = brush.relative_bounds();
    let size = b.size();
    let block = Shape::cuboid(size.x, size.y, size.z)?.with_origin(b.min);
    Ok(&block - brush)
}

/// Forward edit for one stroke.
pub fn stroke(
    brush: &Shape,
    material: Block,
    carve_out: bool,
    at: Location,
) -> Result<Box<dyn ChangeQueue>, ShapeError> {
    let shape = if carve_out { carve(brush)? } else { brush.clone() };
    log::debug!(
        "{} stroke of {} voxels at {}",
        if carve_out { "carve" } else { "fill" },
        shape.volume(),
        at
    );
    Ok(Box::new(ShapeChangeQueue::new(shape, material, at)))
}
