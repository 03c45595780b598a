//! Minimal pipelines for drawing frames into an offscreen target.

use batch2d::{PrimitiveInstance, SpriteInstance, TextVertex};
use batch2d_wgpu::{
    globals_layout_entry, CategoryPipelines, CategoryState, QuadVertex, VertexLayout, WgpuBackend,
};

pub const TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

/// Flat-colored sprite, primitive and text pipelines sharing the backend's globals.
pub struct PassthroughPipelines {
    globals: wgpu::BindGroup,
    sprite: wgpu::RenderPipeline,
    primitive: wgpu::RenderPipeline,
    text: wgpu::RenderPipeline,
}

impl PassthroughPipelines {
    pub fn new(device: &wgpu::Device, backend: &WgpuBackend) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Batch2d Passthrough Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/passthrough.wgsl").into()),
        });

        let globals_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Batch2d Globals Bind Group Layout"),
            entries: &[globals_layout_entry(0)],
        });

        let globals = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Batch2d Globals Bind Group"),
            layout: &globals_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: backend.globals_binding(),
            }],
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Batch2d Passthrough Pipeline Layout"),
            bind_group_layouts: &[&globals_layout],
            push_constant_ranges: &[],
        });

        let sprite = create_pipeline(
            device,
            &layout,
            &shader,
            "Batch2d Sprite Pipeline",
            "vs_sprite",
            &[QuadVertex::desc(), SpriteInstance::desc()],
        );
        let primitive = create_pipeline(
            device,
            &layout,
            &shader,
            "Batch2d Primitive Pipeline",
            "vs_primitive",
            &[QuadVertex::desc(), PrimitiveInstance::desc()],
        );
        let text = create_pipeline(
            device,
            &layout,
            &shader,
            "Batch2d Text Pipeline",
            "vs_text",
            &[TextVertex::desc()],
        );

        Self {
            globals,
            sprite,
            primitive,
            text,
        }
    }

    pub fn category_pipelines(&self) -> CategoryPipelines<'_> {
        CategoryPipelines {
            globals: &self.globals,
            sprite: CategoryState {
                pipeline: &self.sprite,
                bind_group: None,
            },
            primitive: CategoryState {
                pipeline: &self.primitive,
                bind_group: None,
            },
            text: CategoryState {
                pipeline: &self.text,
                bind_group: None,
            },
        }
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    label: &str,
    vertex_entry: &str,
    buffers: &[wgpu::VertexBufferLayout<'_>],
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some(vertex_entry),
            buffers,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: TARGET_FORMAT,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}
