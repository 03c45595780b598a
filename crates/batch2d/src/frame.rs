use batch2d_text::{build_mesh, measure_text_bounds, vertex_capacity_hint, FontAtlas, TextBounds};
use glam::Mat4;

use crate::{
    encode, pixel_space_projection, BatchCoalescer, Category, CategoryMap, Color, DrawBatch,
    FrameArenas, FrameRing, FrameStats, InstanceHandle, PrimitiveInstance, RendererConfig, Result,
    SlotToken, SpriteAtlas, SpriteInstance, TextVertex, UvRect,
};

/// Owns everything that lives across frames: the ring, the staging arenas and the
/// immutable sprite and font atlases.
#[derive(Debug)]
pub struct Renderer {
    config: RendererConfig,
    ring: FrameRing,
    coalescer: BatchCoalescer,
    arenas: FrameArenas,
    sprites: SpriteAtlas,
    font: FontAtlas,
    projection: Mat4,
    text_scratch: Vec<TextVertex>,
}

impl Renderer {
    pub fn new(config: RendererConfig, sprites: SpriteAtlas, font: FontAtlas) -> Result<Self> {
        config.validate()?;

        log::info!(
            "Renderer initialized: {} frames in flight, capacities sprite={} primitive={} text={}",
            config.frames_in_flight,
            config.capacities[Category::Sprite],
            config.capacities[Category::ShapePrimitive],
            config.capacities[Category::Text]
        );

        Ok(Self {
            ring: FrameRing::new(config.frames_in_flight),
            coalescer: BatchCoalescer::new(&config),
            arenas: FrameArenas::new(&config),
            sprites,
            font,
            projection: Mat4::IDENTITY,
            text_scratch: Vec::new(),
            config,
        })
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Sets the projection used from the next frame on.
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        log::debug!("Viewport resized to {}x{}", width, height);
        self.projection = pixel_space_projection(width, height);
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn sprites(&self) -> &SpriteAtlas {
        &self.sprites
    }

    pub fn font(&self) -> &FontAtlas {
        &self.font
    }

    /// Frames recorded but not yet released by the GPU.
    pub fn pending_frames(&self) -> usize {
        self.ring.in_flight()
    }

    pub fn measure_text(&self, text: &str, font_size: f32) -> TextBounds {
        measure_text_bounds(&self.font, text, font_size)
    }

    /// Opens the next frame, blocking while every ring slot is still owned by the GPU.
    pub fn begin_frame(&mut self) -> Frame<'_> {
        let token = self.ring.advance();
        self.coalescer.reset();

        Frame {
            token,
            config: &self.config,
            coalescer: &mut self.coalescer,
            arenas: &mut self.arenas,
            sprites: &self.sprites,
            font: &self.font,
            text_scratch: &mut self.text_scratch,
            projection: self.projection,
            stats: FrameStats::default(),
        }
    }
}

/// Recording context of one frame. All draw calls go through here.
///
/// Holding a `Frame` borrows the [`Renderer`], so records can only be written into the
/// slot that was acquired for it.
pub struct Frame<'r> {
    token: SlotToken,
    config: &'r RendererConfig,
    coalescer: &'r mut BatchCoalescer,
    arenas: &'r mut FrameArenas,
    sprites: &'r SpriteAtlas,
    font: &'r FontAtlas,
    text_scratch: &'r mut Vec<TextVertex>,
    projection: Mat4,
    stats: FrameStats,
}

impl<'r> Frame<'r> {
    pub fn slot(&self) -> usize {
        self.token.slot()
    }

    pub fn frame_number(&self) -> u64 {
        self.token.frame()
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    pub fn batches(&self) -> &[DrawBatch] {
        self.coalescer.batches()
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    fn push_sprite(&mut self, instance: SpriteInstance) {
        let index = self.coalescer.append(Category::Sprite, 1);
        self.arenas
            .sprites
            .write(InstanceHandle::new(self.token.slot(), index), instance);
        self.stats.sprite_instances += 1;
    }

    fn push_primitive(&mut self, instance: PrimitiveInstance) {
        let index = self.coalescer.append(Category::ShapePrimitive, 1);
        self.arenas
            .primitives
            .write(InstanceHandle::new(self.token.slot(), index), instance);
        self.stats.primitive_instances += 1;
    }

    #[allow(clippy::too_many_arguments)]
    pub fn draw_sprite(
        &mut self,
        uv: UvRect,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        rotation: f32,
        color: impl Into<Color>,
    ) {
        let instance = encode::sprite(
            uv,
            x,
            y,
            width,
            height,
            rotation,
            color.into(),
            &self.projection,
        );
        self.push_sprite(instance);
    }

    /// Draws a sprite by atlas name. Unknown names draw nothing and return an error.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_sprite_named(
        &mut self,
        name: &str,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        rotation: f32,
        color: impl Into<Color>,
    ) -> Result<()> {
        let uv = self.sprites.uv(name)?;
        self.draw_sprite(uv, x, y, width, height, rotation, color);
        Ok(())
    }

    pub fn draw_circle(&mut self, x: f32, y: f32, radius: f32, color: impl Into<Color>) {
        self.push_primitive(encode::circle(x, y, radius, color.into()));
    }

    pub fn draw_circle_outline(
        &mut self,
        x: f32,
        y: f32,
        radius: f32,
        thickness: f32,
        color: impl Into<Color>,
    ) {
        self.push_primitive(encode::circle_outline(x, y, radius, thickness, color.into()));
    }

    pub fn draw_line(
        &mut self,
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        thickness: f32,
        color: impl Into<Color>,
    ) {
        self.push_primitive(encode::line(x1, y1, x2, y2, thickness, color.into()));
    }

    pub fn draw_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: impl Into<Color>) {
        self.push_primitive(encode::rect(x, y, width, height, color.into()));
    }

    pub fn draw_rounded_rect(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        corner_radius: f32,
        color: impl Into<Color>,
    ) {
        self.push_primitive(encode::rounded_rect(
            x,
            y,
            width,
            height,
            corner_radius,
            color.into(),
        ));
    }

    pub fn draw_rect_outline(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        thickness: f32,
        color: impl Into<Color>,
    ) {
        self.push_primitive(encode::rect_outline(
            x,
            y,
            width,
            height,
            thickness,
            color.into(),
        ));
    }

    /// Shapes `text` with its first line's top-left at `(x, y)` and queues the vertices.
    pub fn draw_text(&mut self, text: &str, x: f32, y: f32, font_size: f32, color: impl Into<Color>) {
        self.text_scratch.clear();
        let mesh = build_mesh(
            self.font,
            text,
            [x, y],
            font_size,
            color.into().to_array(),
            self.text_scratch,
            vertex_capacity_hint(text),
        );
        self.stats.missing_glyphs += mesh.missing_glyphs;
        if mesh.vertex_count == 0 {
            return;
        }

        let count = u32::try_from(mesh.vertex_count).unwrap_or(u32::MAX);
        let start = self.coalescer.append(Category::Text, count);
        self.arenas.text.write_run(
            InstanceHandle::new(self.token.slot(), start),
            self.text_scratch.as_slice(),
        );
        self.stats.text_vertices += count;
    }

    pub fn measure_text(&self, text: &str, font_size: f32) -> TextBounds {
        measure_text_bounds(self.font, text, font_size)
    }

    /// Closes the frame and hands out everything needed to submit it.
    pub fn finish(self) -> FrameSubmission<'r> {
        let Frame {
            token,
            config,
            coalescer,
            arenas,
            projection,
            mut stats,
            ..
        } = self;
        let coalescer: &'r BatchCoalescer = coalescer;
        let arenas: &'r FrameArenas = arenas;
        let slot = token.slot();

        stats.batches = coalescer.batches().len() as u32;
        log::debug!(
            "Frame {} (slot {}): {} batches, {} sprites, {} primitives, {} text vertices",
            token.frame(),
            slot,
            stats.batches,
            stats.sprite_instances,
            stats.primitive_instances,
            stats.text_vertices
        );

        FrameSubmission {
            batches: coalescer.batches(),
            sprites: arenas
                .sprites
                .slot_records(slot, coalescer.next_start(Category::Sprite)),
            primitives: arenas
                .primitives
                .slot_records(slot, coalescer.next_start(Category::ShapePrimitive)),
            text: arenas
                .text
                .slot_records(slot, coalescer.next_start(Category::Text)),
            base_offsets: CategoryMap::from_fn(|category| config.slot_base_offset(category, slot)),
            projection,
            stats,
            token,
        }
    }

    /// Shorthand for `submitter.submit(frame.finish())`.
    pub fn submit<S: FrameSubmitter + ?Sized>(self, submitter: &mut S) {
        submitter.submit(self.finish());
    }
}

/// One recorded frame, ready for the GPU.
///
/// Record slices cover the slot from index 0 up to the last used index, alignment gaps
/// included, so they can be uploaded as-is at `base_offsets`.
#[derive(Debug)]
pub struct FrameSubmission<'f> {
    pub batches: &'f [DrawBatch],
    pub sprites: &'f [SpriteInstance],
    pub primitives: &'f [PrimitiveInstance],
    pub text: &'f [TextVertex],
    /// Byte offset of this frame's slot in each category's ring buffer
    pub base_offsets: CategoryMap<u64>,
    /// Uniform for primitives and text; sprites already include it
    pub projection: Mat4,
    pub stats: FrameStats,
    /// Release once the GPU is done reading this frame
    pub token: SlotToken,
}

impl FrameSubmission<'_> {
    pub fn slot(&self) -> usize {
        self.token.slot()
    }

    /// Byte offset to bind `batch`'s first record at.
    pub fn bind_offset(&self, batch: &DrawBatch) -> u64 {
        let category = batch.category();
        self.base_offsets[category] + batch.range().start as u64 * category.stride() as u64
    }

    /// Raw bytes to upload at `base_offsets[category]`.
    pub fn bytes(&self, category: Category) -> &[u8] {
        match category {
            Category::Sprite => bytemuck::cast_slice(self.sprites),
            Category::ShapePrimitive => bytemuck::cast_slice(self.primitives),
            Category::Text => bytemuck::cast_slice(self.text),
        }
    }
}

/// Receives finished frames. Implementations own GPU submission and must release the
/// frame's [`SlotToken`] once the GPU has consumed it.
pub trait FrameSubmitter {
    fn submit(&mut self, submission: FrameSubmission<'_>);
}
