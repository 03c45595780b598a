use std::ops::Range;

use batch2d::{Category, CategoryMap, DrawBatch, FrameSubmission, RendererConfig, SlotToken};
use batch2d_text::FontAtlas;
use bytemuck::{Pod, Zeroable};

use crate::{QuadVertex, QUAD_INDICES, QUAD_VERTICES};

/// Per-slot stride of the globals uniform buffer. Matches the default
/// `min_uniform_buffer_offset_alignment`.
pub const GLOBALS_STRIDE: u64 = 256;

/// Uniform block shared by primitive and text draws.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Globals {
    pub projection: [[f32; 4]; 4],
    /// SDF distance range of the font atlas, in atlas pixels
    pub distance_range: f32,
    pub _padding: [f32; 3],
}

/// Dynamic offset selecting `slot`'s globals.
pub const fn globals_offset(slot: usize) -> u32 {
    (slot as u64 * GLOBALS_STRIDE) as u32
}

/// Layout entry the caller's group-0 layout must use for [`WgpuBackend::globals_binding`].
pub const fn globals_layout_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: true,
            min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<Globals>() as u64),
        },
        count: None,
    }
}

/// Pipeline plus optional group-1 resources for one category.
#[derive(Clone, Copy, Debug)]
pub struct CategoryState<'a> {
    pub pipeline: &'a wgpu::RenderPipeline,
    pub bind_group: Option<&'a wgpu::BindGroup>,
}

/// Everything the caller provides to draw a frame.
#[derive(Clone, Copy, Debug)]
pub struct CategoryPipelines<'a> {
    /// Group 0, built over [`WgpuBackend::globals_binding`]
    pub globals: &'a wgpu::BindGroup,
    pub sprite: CategoryState<'a>,
    pub primitive: CategoryState<'a>,
    pub text: CategoryState<'a>,
}

impl<'a> CategoryPipelines<'a> {
    fn state(&self, category: Category) -> CategoryState<'a> {
        match category {
            Category::Sprite => self.sprite,
            Category::ShapePrimitive => self.primitive,
            Category::Text => self.text,
        }
    }
}

/// The draw issued for one batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawCall {
    /// Unit quad drawn once per record in the bound range
    Instanced { instances: u32 },
    /// Pre-expanded vertices read straight from the bound range
    Vertices { count: u32 },
}

/// One batch resolved against its ring buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchDraw {
    pub category: Category,
    /// Byte range of the category's ring buffer bound as the record source
    pub bytes: Range<u64>,
    pub call: DrawCall,
}

/// Resolves every batch of `submission` to the buffer range it binds and the draw it
/// issues, in batch order.
pub fn batch_draws(submission: &FrameSubmission<'_>) -> Vec<BatchDraw> {
    submission
        .batches
        .iter()
        .map(|batch| {
            let category = batch.category();
            let start = submission.bind_offset(batch);
            let count = batch.range().count;
            let call = match batch {
                DrawBatch::Sprites(_) | DrawBatch::Primitives(_) => {
                    DrawCall::Instanced { instances: count }
                }
                DrawBatch::TextVertices(_) => DrawCall::Vertices { count },
            };
            BatchDraw {
                category,
                bytes: start..start + count as u64 * category.stride() as u64,
                call,
            }
        })
        .collect()
}

/// GPU side of the frame ring.
pub struct WgpuBackend {
    ring_buffers: CategoryMap<wgpu::Buffer>,
    quad_vertices: wgpu::Buffer,
    quad_indices: wgpu::Buffer,
    globals: wgpu::Buffer,
    distance_range: f32,
}

impl WgpuBackend {
    pub fn new(device: &wgpu::Device, config: &RendererConfig, font: &FontAtlas) -> Self {
        let ring_buffers = CategoryMap::from_fn(|category| {
            let size = config.ring_bytes(category);
            log::info!(
                "Creating {} ring buffer: {} slots x {} bytes",
                category.label(),
                config.frames_in_flight,
                config.slot_bytes(category)
            );
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(match category {
                    Category::Sprite => "Batch2d Sprite Ring Buffer",
                    Category::ShapePrimitive => "Batch2d Primitive Ring Buffer",
                    Category::Text => "Batch2d Text Ring Buffer",
                }),
                size,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        });

        let quad_vertices = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Batch2d Quad Vertex Buffer"),
            size: std::mem::size_of_val(&QUAD_VERTICES) as u64,
            usage: wgpu::BufferUsages::VERTEX,
            mapped_at_creation: true,
        });
        quad_vertices
            .slice(..)
            .get_mapped_range_mut()
            .copy_from_slice(bytemuck::cast_slice::<QuadVertex, u8>(&QUAD_VERTICES));
        quad_vertices.unmap();

        // Six u16 indices are 12 bytes, already a multiple of the copy alignment.
        let quad_indices = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Batch2d Quad Index Buffer"),
            size: std::mem::size_of_val(&QUAD_INDICES) as u64,
            usage: wgpu::BufferUsages::INDEX,
            mapped_at_creation: true,
        });
        quad_indices
            .slice(..)
            .get_mapped_range_mut()
            .copy_from_slice(bytemuck::cast_slice(&QUAD_INDICES));
        quad_indices.unmap();

        let globals = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Batch2d Globals Buffer"),
            size: GLOBALS_STRIDE * config.frames_in_flight as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            ring_buffers,
            quad_vertices,
            quad_indices,
            globals,
            distance_range: font.distance_range(),
        }
    }

    pub fn ring_buffer(&self, category: Category) -> &wgpu::Buffer {
        &self.ring_buffers[category]
    }

    /// One `Globals` window of the uniform buffer; select the slot with a dynamic offset.
    pub fn globals_binding(&self) -> wgpu::BindingResource<'_> {
        wgpu::BindingResource::Buffer(wgpu::BufferBinding {
            buffer: &self.globals,
            offset: 0,
            size: wgpu::BufferSize::new(std::mem::size_of::<Globals>() as u64),
        })
    }

    /// Copies the frame's records and globals into its slot.
    pub fn upload(&self, queue: &wgpu::Queue, submission: &FrameSubmission<'_>) {
        for category in Category::ALL {
            let bytes = submission.bytes(category);
            if bytes.is_empty() {
                continue;
            }
            queue.write_buffer(
                &self.ring_buffers[category],
                submission.base_offsets[category],
                bytes,
            );
        }

        let globals = Globals {
            projection: submission.projection.to_cols_array_2d(),
            distance_range: self.distance_range,
            _padding: [0.0; 3],
        };
        queue.write_buffer(
            &self.globals,
            globals_offset(submission.slot()) as u64,
            bytemuck::bytes_of(&globals),
        );
    }

    /// Records one draw per batch, in batch order.
    pub fn encode(
        &self,
        pass: &mut wgpu::RenderPass<'_>,
        pipelines: &CategoryPipelines<'_>,
        submission: &FrameSubmission<'_>,
    ) {
        let dynamic_offset = globals_offset(submission.slot());

        for draw in batch_draws(submission) {
            let records = self.ring_buffers[draw.category].slice(draw.bytes.clone());

            let state = pipelines.state(draw.category);
            pass.set_pipeline(state.pipeline);
            pass.set_bind_group(0, pipelines.globals, &[dynamic_offset]);
            if let Some(bind_group) = state.bind_group {
                pass.set_bind_group(1, bind_group, &[]);
            }

            match draw.call {
                DrawCall::Instanced { instances } => {
                    pass.set_vertex_buffer(0, self.quad_vertices.slice(..));
                    pass.set_vertex_buffer(1, records);
                    pass.set_index_buffer(self.quad_indices.slice(..), wgpu::IndexFormat::Uint16);
                    pass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..instances);
                }
                DrawCall::Vertices { count } => {
                    pass.set_vertex_buffer(0, records);
                    pass.draw(0..count, 0..1);
                }
            }
        }
    }

    /// Releases `token` once all work submitted to `queue` so far has finished.
    /// Call after `Queue::submit` for the frame.
    pub fn release_on_completion(queue: &wgpu::Queue, token: SlotToken) {
        queue.on_submitted_work_done(move || token.release());
    }
}
