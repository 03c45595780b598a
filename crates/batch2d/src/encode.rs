//! Instance builders for each draw call.
//!
//! Primitives use a unit quad centered on the origin, so every transform here scales
//! that quad to the shape's full extent. Sprites are pre-multiplied by the projection;
//! primitives stay in pixel space and are projected by the shading stage.

use glam::{Mat4, Vec3};

use crate::{
    translate_rotate_scale, Color, PrimitiveInstance, SegmentFrame, ShapeKind, SpriteInstance,
    UvRect,
};

/// Softness of circle edges in pixels, fixed for all circles.
pub const CIRCLE_EDGE_SOFTNESS: f32 = 0.5;

/// Sprite centered on `(x, y)`, rotated by `rotation` radians.
#[allow(clippy::too_many_arguments)]
pub fn sprite(
    uv: UvRect,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    rotation: f32,
    color: Color,
    projection: &Mat4,
) -> SpriteInstance {
    let transform = *projection * translate_rotate_scale(x, y, rotation, width, height);
    SpriteInstance::new(transform, color.to_array(), uv.min, uv.max)
}

fn centered_square(x: f32, y: f32, side: f32) -> Mat4 {
    Mat4::from_translation(Vec3::new(x, y, 0.0)) * Mat4::from_scale(Vec3::new(side, side, 1.0))
}

/// Axis-aligned quad whose lower-left corner is `(x, y)`.
fn corner_rect(x: f32, y: f32, width: f32, height: f32) -> Mat4 {
    translate_rotate_scale(x + width * 0.5, y + height * 0.5, 0.0, width, height)
}

pub fn circle(x: f32, y: f32, radius: f32, color: Color) -> PrimitiveInstance {
    PrimitiveInstance::new(
        centered_square(x, y, radius * 2.0),
        color.to_array(),
        ShapeKind::Circle,
        [radius, CIRCLE_EDGE_SOFTNESS, 0.0, 0.0],
    )
}

pub fn circle_outline(x: f32, y: f32, radius: f32, thickness: f32, color: Color) -> PrimitiveInstance {
    PrimitiveInstance::new(
        centered_square(x, y, radius * 2.0),
        color.to_array(),
        ShapeKind::CircleOutline,
        [radius, CIRCLE_EDGE_SOFTNESS, thickness * 0.5, 0.0],
    )
}

/// Segment from `(x1, y1)` to `(x2, y2)`, drawn as a rotated rectangle `thickness` wide.
pub fn line(x1: f32, y1: f32, x2: f32, y2: f32, thickness: f32, color: Color) -> PrimitiveInstance {
    PrimitiveInstance::new(
        SegmentFrame::new(x1, y1, x2, y2).transform(thickness),
        color.to_array(),
        ShapeKind::Rect,
        [0.0; 4],
    )
}

pub fn rect(x: f32, y: f32, width: f32, height: f32, color: Color) -> PrimitiveInstance {
    PrimitiveInstance::new(
        corner_rect(x, y, width, height),
        color.to_array(),
        ShapeKind::Rect,
        [0.0; 4],
    )
}

pub fn rounded_rect(
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    corner_radius: f32,
    color: Color,
) -> PrimitiveInstance {
    PrimitiveInstance::new(
        corner_rect(x, y, width, height),
        color.to_array(),
        ShapeKind::RoundedRect,
        [width * 0.5, height * 0.5, corner_radius, 0.0],
    )
}

pub fn rect_outline(
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    thickness: f32,
    color: Color,
) -> PrimitiveInstance {
    PrimitiveInstance::new(
        corner_rect(x, y, width, height),
        color.to_array(),
        ShapeKind::RectOutline,
        [width * 0.5, height * 0.5, thickness, 0.0],
    )
}
