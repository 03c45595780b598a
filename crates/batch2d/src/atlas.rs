use std::collections::HashMap;
use std::path::Path;

use crate::{RenderError, Result};

/// Normalized texture rectangle of a sprite inside a shared atlas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UvRect {
    pub min: [f32; 2],
    pub max: [f32; 2],
}

/// Sprite name to UV rectangle lookup, loaded once per atlas image.
///
/// The source is line oriented: a count on the first line (skipped), then one
/// `name x y w h` pixel rectangle per line.
#[derive(Clone, Debug, Default)]
pub struct SpriteAtlas {
    sprites: HashMap<String, UvRect>,
}

impl SpriteAtlas {
    pub fn parse(source: &str, atlas_width: u32, atlas_height: u32) -> Result<Self> {
        if atlas_width == 0 || atlas_height == 0 {
            return Err(RenderError::InvalidAtlasSize {
                width: atlas_width,
                height: atlas_height,
            });
        }
        let width = atlas_width as f32;
        let height = atlas_height as f32;

        let mut sprites = HashMap::new();
        for (number, line) in source.lines().enumerate().skip(1) {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let malformed = || RenderError::MalformedUvLine {
                line: number + 1,
                content: line.to_string(),
            };

            let mut parts = line.split_whitespace();
            let name = parts.next().ok_or_else(malformed)?;
            let numbers = parts
                .map(|part| part.parse::<f32>().map_err(|_| malformed()))
                .collect::<Result<Vec<_>>>()?;
            let [x, y, w, h] = numbers[..] else {
                return Err(malformed());
            };

            sprites.insert(
                name.to_string(),
                UvRect {
                    min: [x / width, y / height],
                    max: [(x + w) / width, (y + h) / height],
                },
            );
        }

        Ok(Self { sprites })
    }

    pub fn load(path: impl AsRef<Path>, atlas_width: u32, atlas_height: u32) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| RenderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let atlas = Self::parse(&source, atlas_width, atlas_height)?;
        log::info!("Loaded {} sprites from {}", atlas.len(), path.display());
        Ok(atlas)
    }

    pub fn get(&self, name: &str) -> Option<UvRect> {
        self.sprites.get(name).copied()
    }

    /// Like [`SpriteAtlas::get`], but an unknown name is an error.
    pub fn uv(&self, name: &str) -> Result<UvRect> {
        self.get(name)
            .ok_or_else(|| RenderError::UnknownSprite(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }
}
