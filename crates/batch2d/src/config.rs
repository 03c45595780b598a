use crate::{Category, CategoryMap, RenderError, Result};

/// Frames that may be recorded ahead of the GPU.
pub const MAX_FRAMES_IN_FLIGHT: usize = 3;
pub const SPRITE_CAPACITY: u32 = 50_000;
pub const PRIMITIVE_CAPACITY: u32 = 50_000;
/// 4096 glyph quads, six vertices each.
pub const TEXT_VERTEX_CAPACITY: u32 = 4096 * 6;
pub const MAX_BATCHES_PER_FRAME: usize = 1024;
/// Granularity required for buffer binding offsets.
pub const BUFFER_OFFSET_ALIGNMENT: u32 = 256;

/// Sizes fixed for the lifetime of a [`crate::Renderer`].
#[derive(Clone, Debug, PartialEq)]
pub struct RendererConfig {
    pub frames_in_flight: usize,
    /// Per-frame record capacity of each category (instances, or vertices for text)
    pub capacities: CategoryMap<u32>,
    pub max_batches: usize,
    pub alignment_bytes: u32,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            frames_in_flight: MAX_FRAMES_IN_FLIGHT,
            capacities: CategoryMap::new(SPRITE_CAPACITY, PRIMITIVE_CAPACITY, TEXT_VERTEX_CAPACITY),
            max_batches: MAX_BATCHES_PER_FRAME,
            alignment_bytes: BUFFER_OFFSET_ALIGNMENT,
        }
    }
}

impl RendererConfig {
    pub fn validate(&self) -> Result<()> {
        if self.frames_in_flight == 0 {
            return Err(RenderError::InvalidConfig(
                "at least one frame must be allowed in flight".into(),
            ));
        }
        if self.max_batches == 0 {
            return Err(RenderError::InvalidConfig(
                "max batches per frame must be positive".into(),
            ));
        }
        if self.alignment_bytes == 0 {
            return Err(RenderError::InvalidConfig(
                "buffer offset alignment must be positive".into(),
            ));
        }
        for category in Category::ALL {
            let stride = category.stride() as u32;
            if self.alignment_bytes % stride != 0 && stride % self.alignment_bytes != 0 {
                return Err(RenderError::InvalidConfig(format!(
                    "alignment of {} bytes does not fit the {} stride of {} bytes",
                    self.alignment_bytes,
                    category.label(),
                    stride
                )));
            }
            if self.capacities[category] == 0 {
                return Err(RenderError::InvalidConfig(format!(
                    "{} capacity must be positive",
                    category.label()
                )));
            }
        }
        Ok(())
    }

    /// Bytes one frame slot occupies in a category's buffer.
    pub fn slot_bytes(&self, category: Category) -> u64 {
        category.stride() as u64 * self.capacities[category] as u64
    }

    /// Bytes of a category's whole ring buffer.
    pub fn ring_bytes(&self, category: Category) -> u64 {
        self.slot_bytes(category) * self.frames_in_flight as u64
    }

    /// Byte offset of `slot`'s region in a category's ring buffer.
    pub fn slot_base_offset(&self, category: Category, slot: usize) -> u64 {
        self.slot_bytes(category) * slot as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = RendererConfig::default();
        config.validate().unwrap();
        assert_eq!(config.frames_in_flight, 3);
        assert_eq!(config.capacities[Category::Text], 24_576);
    }

    #[test]
    fn test_ring_slots_do_not_overlap() {
        let config = RendererConfig::default();
        for category in Category::ALL {
            let slot_bytes = category.stride() as u64 * config.capacities[category] as u64;
            for i in 0..config.frames_in_flight {
                for j in 0..config.frames_in_flight {
                    if i == j {
                        continue;
                    }
                    let a = config.slot_base_offset(category, i);
                    let b = config.slot_base_offset(category, j);
                    assert!(a.abs_diff(b) >= slot_bytes);
                }
            }
            assert_eq!(
                config.slot_base_offset(category, config.frames_in_flight - 1) + slot_bytes,
                config.ring_bytes(category)
            );
        }
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut config = RendererConfig::default();
        config.frames_in_flight = 0;
        assert!(config.validate().is_err());

        let mut config = RendererConfig::default();
        config.alignment_bytes = 48;
        assert!(config.validate().is_err());

        let mut config = RendererConfig::default();
        config.capacities[Category::Sprite] = 0;
        assert!(config.validate().is_err());
    }
}
