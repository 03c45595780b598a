use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::{FontError, Result};

/// Rectangle in either em units (plane bounds) or atlas pixels (atlas bounds).
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct Bounds {
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
    pub top: f32,
}

/// Which edge of the atlas image pixel `y = 0` refers to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YOrigin {
    #[default]
    Bottom,
    Top,
}

/// Atlas image properties. The distance range is forwarded to the fragment stage untouched.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtlasMetrics {
    #[serde(rename = "type")]
    pub kind: String,
    pub distance_range: f32,
    pub size: f32,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub y_origin: YOrigin,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontMetrics {
    pub em_size: f32,
    pub line_height: f32,
    pub ascender: f32,
    pub descender: f32,
    #[serde(default)]
    pub underline_y: f32,
    #[serde(default)]
    pub underline_thickness: f32,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlyphDescription {
    pub unicode: u32,
    pub advance: f32,
    #[serde(default)]
    pub plane_bounds: Option<Bounds>,
    #[serde(default)]
    pub atlas_bounds: Option<Bounds>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct KerningPair {
    pub unicode1: u32,
    pub unicode2: u32,
    pub advance: f32,
}

/// Font description as written by `msdf-atlas-gen --json`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct FontDescription {
    pub atlas: AtlasMetrics,
    pub metrics: FontMetrics,
    pub glyphs: Vec<GlyphDescription>,
    #[serde(default)]
    pub kerning: Vec<KerningPair>,
}

/// A glyph without plane or atlas bounds has no ink (space, tab) but still advances the pen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glyph {
    pub advance: f32,
    pub plane_bounds: Option<Bounds>,
    pub atlas_bounds: Option<Bounds>,
}

impl Glyph {
    /// Both bounds are needed to emit a quad.
    pub fn quad_bounds(&self) -> Option<(Bounds, Bounds)> {
        self.plane_bounds.zip(self.atlas_bounds)
    }
}

/// Immutable font atlas: metrics plus glyph and kerning tables keyed by Unicode scalar.
#[derive(Clone, Debug)]
pub struct FontAtlas {
    atlas: AtlasMetrics,
    metrics: FontMetrics,
    glyphs: HashMap<u32, Glyph>,
    kerning: HashMap<(u32, u32), f32>,
}

impl FontAtlas {
    pub fn from_description(description: FontDescription) -> Result<Self> {
        let FontDescription {
            atlas,
            metrics,
            glyphs,
            kerning,
        } = description;

        if metrics.em_size.is_nan() || metrics.em_size <= 0.0 {
            return Err(FontError::InvalidMetrics(format!(
                "em size must be positive, got {}",
                metrics.em_size
            )));
        }
        if atlas.width == 0 || atlas.height == 0 {
            return Err(FontError::InvalidMetrics(format!(
                "atlas dimensions must be non-zero, got {}x{}",
                atlas.width, atlas.height
            )));
        }

        let glyphs = glyphs
            .into_iter()
            .map(|glyph| {
                (
                    glyph.unicode,
                    Glyph {
                        advance: glyph.advance,
                        plane_bounds: glyph.plane_bounds,
                        atlas_bounds: glyph.atlas_bounds,
                    },
                )
            })
            .collect::<HashMap<_, _>>();

        let kerning = kerning
            .into_iter()
            .map(|pair| ((pair.unicode1, pair.unicode2), pair.advance))
            .collect::<HashMap<_, _>>();

        Ok(Self {
            atlas,
            metrics,
            glyphs,
            kerning,
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let description: FontDescription = serde_json::from_str(json)?;
        Self::from_description(description)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| FontError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let font = Self::from_json_str(&json)?;
        log::info!(
            "Loaded font {} ({} glyphs, {} kerning pairs, atlas {}x{})",
            path.display(),
            font.glyphs.len(),
            font.kerning.len(),
            font.atlas.width,
            font.atlas.height
        );
        Ok(font)
    }

    pub fn atlas(&self) -> &AtlasMetrics {
        &self.atlas
    }

    pub fn metrics(&self) -> &FontMetrics {
        &self.metrics
    }

    pub fn distance_range(&self) -> f32 {
        self.atlas.distance_range
    }

    pub fn glyph(&self, unicode: u32) -> Option<&Glyph> {
        self.glyphs.get(&unicode)
    }

    /// Advance adjustment (em units) applied between `left` and `right`.
    pub fn kerning(&self, left: u32, right: u32) -> Option<f32> {
        self.kerning.get(&(left, right)).copied()
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    /// Pixel-to-em scale for a given font size.
    pub fn scale_for(&self, font_size: f32) -> f32 {
        font_size / self.metrics.em_size
    }

    /// Normalized `(u, v)` for an atlas pixel position, with `v = 0` at the top of the image.
    pub(crate) fn atlas_uv(&self, x: f32, y: f32) -> [f32; 2] {
        let width = self.atlas.width as f32;
        let height = self.atlas.height as f32;
        let v = match self.atlas.y_origin {
            YOrigin::Bottom => (height - y) / height,
            YOrigin::Top => y / height,
        };
        [x / width, v]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FONT_JSON: &str = r#"{
        "atlas": {"type": "msdf", "distanceRange": 4, "size": 48, "width": 256, "height": 128, "yOrigin": "bottom"},
        "metrics": {"emSize": 1, "lineHeight": 1.2, "ascender": 0.9, "descender": -0.3, "underlineY": -0.1, "underlineThickness": 0.05},
        "glyphs": [
            {"unicode": 32, "advance": 0.25},
            {"unicode": 65, "advance": 0.6,
             "planeBounds": {"left": 0.0, "bottom": -0.1, "right": 0.6, "top": 0.8},
             "atlasBounds": {"left": 10.5, "bottom": 20.5, "right": 40.5, "top": 60.5}}
        ],
        "kerning": [{"unicode1": 65, "unicode2": 86, "advance": -0.05}]
    }"#;

    #[test]
    fn test_decodes_msdf_layout() {
        let font = FontAtlas::from_json_str(FONT_JSON).unwrap();
        assert_eq!(font.atlas().kind, "msdf");
        assert_eq!(font.atlas().width, 256);
        assert_eq!(font.atlas().y_origin, YOrigin::Bottom);
        assert_eq!(font.distance_range(), 4.0);
        assert_eq!(font.metrics().line_height, 1.2);
        assert_eq!(font.glyph_count(), 2);
        assert_eq!(font.kerning('A' as u32, 'V' as u32), Some(-0.05));
        assert_eq!(font.kerning('V' as u32, 'A' as u32), None);
    }

    #[test]
    fn test_space_has_no_ink() {
        let font = FontAtlas::from_json_str(FONT_JSON).unwrap();
        let space = font.glyph(' ' as u32).unwrap();
        assert_eq!(space.advance, 0.25);
        assert!(space.quad_bounds().is_none());
        assert!(font.glyph('A' as u32).unwrap().quad_bounds().is_some());
    }

    #[test]
    fn test_kerning_is_optional() {
        let json = r#"{
            "atlas": {"type": "sdf", "distanceRange": 2, "size": 32, "width": 64, "height": 64},
            "metrics": {"emSize": 1, "lineHeight": 1, "ascender": 1, "descender": 0},
            "glyphs": []
        }"#;
        let font = FontAtlas::from_json_str(json).unwrap();
        assert_eq!(font.glyph_count(), 0);
        assert_eq!(font.atlas().y_origin, YOrigin::Bottom);
    }

    #[test]
    fn test_rejects_zero_em_size() {
        let json = FONT_JSON.replace("\"emSize\": 1", "\"emSize\": 0");
        assert!(matches!(
            FontAtlas::from_json_str(&json),
            Err(FontError::InvalidMetrics(_))
        ));
    }

    #[test]
    fn test_rejects_negative_and_nan_em_size() {
        let description: FontDescription = serde_json::from_str(FONT_JSON).unwrap();
        for em_size in [-1.0, f32::NAN] {
            let mut description = description.clone();
            description.metrics.em_size = em_size;
            assert!(matches!(
                FontAtlas::from_description(description),
                Err(FontError::InvalidMetrics(_))
            ));
        }
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            FontAtlas::from_json_str("{\"atlas\": 3}"),
            Err(FontError::Json(_))
        ));
    }

    #[test]
    fn test_atlas_uv_flips_bottom_origin() {
        let font = FontAtlas::from_json_str(FONT_JSON).unwrap();
        assert_eq!(font.atlas_uv(64.0, 32.0), [0.25, 0.75]);

        let top = FontAtlas::from_json_str(&FONT_JSON.replace("\"bottom\"}", "\"top\"}")).unwrap();
        assert_eq!(top.atlas().y_origin, YOrigin::Top);
        assert_eq!(top.atlas_uv(64.0, 32.0), [0.25, 0.25]);
    }

    #[test]
    fn test_load_reports_missing_file() {
        let err = FontAtlas::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, FontError::Io { .. }));
    }
}
