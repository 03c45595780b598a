use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::{Category, TextVertex};

/// Per-instance data for a textured atlas quad.
///
/// The transform already includes the projection, so the vertex stage only has to
/// multiply the unit quad by it.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SpriteInstance {
    pub transform: [[f32; 4]; 4],
    /// Linear RGBA in [0, 1]
    pub color: [f32; 4],
    pub uv_min: [f32; 2],
    pub uv_max: [f32; 2],
    /// Pads the record to 128 bytes so two records span one 256-byte binding step
    pub _padding: [f32; 8],
}

/// SDF shape selector read by the primitive fragment stage.
#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeKind {
    Rect = 1,
    RoundedRect = 2,
    Circle = 3,
    CircleOutline = 4,
    RectOutline = 5,
}

impl ShapeKind {
    pub const fn from_u32(value: u32) -> Option<Self> {
        match value {
            1 => Some(Self::Rect),
            2 => Some(Self::RoundedRect),
            3 => Some(Self::Circle),
            4 => Some(Self::CircleOutline),
            5 => Some(Self::RectOutline),
            _ => None,
        }
    }
}

/// Per-instance data for an SDF primitive, placed in world (pixel) space.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct PrimitiveInstance {
    pub transform: [[f32; 4]; 4],
    pub color: [f32; 4],
    /// Shape parameters, meaning depends on `shape_kind`
    pub sdf_params: [f32; 4],
    /// [`ShapeKind`] discriminant
    pub shape_kind: u32,
    pub _padding: [u32; 7],
}

impl SpriteInstance {
    pub fn new(transform: Mat4, color: [f32; 4], uv_min: [f32; 2], uv_max: [f32; 2]) -> Self {
        Self {
            transform: transform.to_cols_array_2d(),
            color,
            uv_min,
            uv_max,
            _padding: [0.0; 8],
        }
    }

    pub fn transform(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.transform)
    }
}

impl PrimitiveInstance {
    pub fn new(transform: Mat4, color: [f32; 4], shape: ShapeKind, sdf_params: [f32; 4]) -> Self {
        Self {
            transform: transform.to_cols_array_2d(),
            color,
            sdf_params,
            shape_kind: shape as u32,
            _padding: [0; 7],
        }
    }

    pub fn transform(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.transform)
    }

    pub fn shape(&self) -> Option<ShapeKind> {
        ShapeKind::from_u32(self.shape_kind)
    }
}

/// A fixed-size record stored in one category's arena.
pub trait InstanceRecord: Pod {
    const CATEGORY: Category;
}

impl InstanceRecord for SpriteInstance {
    const CATEGORY: Category = Category::Sprite;
}

impl InstanceRecord for PrimitiveInstance {
    const CATEGORY: Category = Category::ShapePrimitive;
}

impl InstanceRecord for TextVertex {
    const CATEGORY: Category = Category::Text;
}

const _: () = assert!(std::mem::size_of::<SpriteInstance>() == 128);
const _: () = assert!(std::mem::size_of::<PrimitiveInstance>() == 128);
