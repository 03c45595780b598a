use bytemuck::{Pod, Zeroable};

/// Vertex format for text glyph quads.
///
/// Text is expanded on the CPU: every glyph contributes six of these (two triangles),
/// so the text category has no per-instance data. UVs address the SDF atlas with
/// `v = 0` at the top of the image.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct TextVertex {
    pub pos: [f32; 2],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

impl TextVertex {
    pub const fn new(pos: [f32; 2], uv: [f32; 2], color: [f32; 4]) -> Self {
        Self { pos, uv, color }
    }
}

const _: () = assert!(std::mem::size_of::<TextVertex>() == 32);
