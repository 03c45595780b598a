use batch2d::{PrimitiveInstance, SpriteInstance, TextVertex};

/// Vertex buffer layout of a record type, as seen by the vertex stage.
pub trait VertexLayout {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

/// Corner of the unit quad shared by sprites and primitives, in `[-0.5, 0.5]`.
pub type QuadVertex = [f32; 2];

pub const QUAD_VERTICES: [QuadVertex; 4] = [
    [-0.5, -0.5], // bottom-left
    [0.5, -0.5],  // bottom-right
    [0.5, 0.5],   // top-right
    [-0.5, 0.5],  // top-left
];
pub const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

impl VertexLayout for QuadVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: &[wgpu::VertexAttribute] = &wgpu::vertex_attr_array![0 => Float32x2];

        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: ATTRIBUTES,
        }
    }
}

impl VertexLayout for SpriteInstance {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        // transform columns, color, uv_min, uv_max
        const ATTRIBUTES: &[wgpu::VertexAttribute] = &wgpu::vertex_attr_array![
            1 => Float32x4,
            2 => Float32x4,
            3 => Float32x4,
            4 => Float32x4,
            5 => Float32x4,
            6 => Float32x2,
            7 => Float32x2,
        ];

        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: ATTRIBUTES,
        }
    }
}

impl VertexLayout for PrimitiveInstance {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        // transform columns, color, sdf_params, shape_kind
        const ATTRIBUTES: &[wgpu::VertexAttribute] = &wgpu::vertex_attr_array![
            1 => Float32x4,
            2 => Float32x4,
            3 => Float32x4,
            4 => Float32x4,
            5 => Float32x4,
            6 => Float32x4,
            7 => Uint32,
        ];

        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PrimitiveInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: ATTRIBUTES,
        }
    }
}

impl VertexLayout for TextVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        // pos, uv, color
        const ATTRIBUTES: &[wgpu::VertexAttribute] = &wgpu::vertex_attr_array![
            0 => Float32x2,
            1 => Float32x2,
            2 => Float32x4,
        ];

        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<TextVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: ATTRIBUTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::offset_of;

    fn offsets(layout: &wgpu::VertexBufferLayout<'_>) -> Vec<u64> {
        layout.attributes.iter().map(|a| a.offset).collect()
    }

    #[test]
    fn test_sprite_layout_matches_record() {
        let layout = SpriteInstance::desc();
        assert_eq!(layout.array_stride, 128);
        assert_eq!(layout.step_mode, wgpu::VertexStepMode::Instance);
        assert_eq!(
            offsets(&layout),
            vec![
                0,
                16,
                32,
                48,
                offset_of!(SpriteInstance, color) as u64,
                offset_of!(SpriteInstance, uv_min) as u64,
                offset_of!(SpriteInstance, uv_max) as u64,
            ]
        );
    }

    #[test]
    fn test_primitive_layout_matches_record() {
        let layout = PrimitiveInstance::desc();
        assert_eq!(layout.array_stride, 128);
        let offsets = offsets(&layout);
        assert_eq!(offsets[5], offset_of!(PrimitiveInstance, sdf_params) as u64);
        assert_eq!(offsets[6], offset_of!(PrimitiveInstance, shape_kind) as u64);
    }

    #[test]
    fn test_text_layout_matches_record() {
        let layout = TextVertex::desc();
        assert_eq!(layout.array_stride, 32);
        assert_eq!(layout.step_mode, wgpu::VertexStepMode::Vertex);
        assert_eq!(offsets(&layout), vec![0, 8, 16]);
    }

    #[test]
    fn test_quad_indices_cover_both_triangles() {
        let mut used = QUAD_INDICES.to_vec();
        used.sort_unstable();
        used.dedup();
        assert_eq!(used, vec![0, 1, 2, 3]);
        assert_eq!(QuadVertex::desc().array_stride, 8);
    }
}
