use crate::{FontAtlas, Glyph, TextVertex};

/// Width and height of a shaped string, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextBounds {
    pub width: f32,
    pub height: f32,
    pub line_count: u32,
}

/// What a call to [`build_mesh`] produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MeshStats {
    pub vertex_count: usize,
    /// Characters with no entry in the glyph table.
    pub missing_glyphs: u32,
}

/// Scratch size that always fits the mesh of `text`: at most one quad per character.
pub fn vertex_capacity_hint(text: &str) -> usize {
    text.chars().count() * 6
}

enum PenEvent<'f> {
    Glyph {
        /// Pen x relative to the line start, kerning already applied.
        pen_x: f32,
        line: u32,
        glyph: &'f Glyph,
    },
    LineBreak,
}

/// Walks `text` the same way for meshing and measuring. Returns the number of missing glyphs.
fn walk<'f>(
    font: &'f FontAtlas,
    text: &str,
    scale: f32,
    mut visit: impl FnMut(PenEvent<'f>),
) -> u32 {
    let mut pen_x = 0.0;
    let mut line = 0;
    let mut previous: Option<u32> = None;
    let mut missing = 0;

    for ch in text.chars() {
        let code = ch as u32;
        if code > 127 {
            continue;
        }

        if ch == '\n' {
            visit(PenEvent::LineBreak);
            pen_x = 0.0;
            line += 1;
            previous = None;
            continue;
        }

        if let Some(kern) = previous.and_then(|prev| font.kerning(prev, code)) {
            pen_x += kern * scale;
        }

        match font.glyph(code) {
            Some(glyph) => {
                visit(PenEvent::Glyph { pen_x, line, glyph });
                pen_x += glyph.advance * scale;
            }
            None => {
                log::trace!("No glyph for {:?}", ch);
                missing += 1;
            }
        }

        previous = Some(code);
    }

    missing
}

/// Appends two triangles per inked glyph of `text` to `out`.
///
/// `origin` is the top-left of the first line; the first baseline sits `ascender`
/// below it and each newline moves down by the font's line height. Y grows upward.
///
/// # Panics
///
/// If the mesh would grow `out` beyond `capacity` vertices. Size the scratch buffer
/// with [`vertex_capacity_hint`].
pub fn build_mesh(
    font: &FontAtlas,
    text: &str,
    origin: [f32; 2],
    font_size: f32,
    color: [f32; 4],
    out: &mut Vec<TextVertex>,
    capacity: usize,
) -> MeshStats {
    let scale = font.scale_for(font_size);
    let metrics = font.metrics();
    let first_baseline = origin[1] - metrics.ascender * scale;
    let line_advance = metrics.line_height * scale;
    let start_len = out.len();

    let missing_glyphs = walk(font, text, scale, |event| {
        let PenEvent::Glyph { pen_x, line, glyph } = event else {
            return;
        };
        let Some((plane, atlas)) = glyph.quad_bounds() else {
            return;
        };

        assert!(
            out.len() + 6 <= capacity,
            "text scratch capacity exceeded: {} vertices allowed, shaping {:?}",
            capacity,
            text
        );

        let cursor_x = origin[0] + pen_x;
        let cursor_y = first_baseline - line as f32 * line_advance;

        let x0 = cursor_x + plane.left * scale;
        let x1 = cursor_x + plane.right * scale;
        let y0 = cursor_y + plane.bottom * scale;
        let y1 = cursor_y + plane.top * scale;

        let [u0, v0] = font.atlas_uv(atlas.left, atlas.bottom);
        let [u1, v1] = font.atlas_uv(atlas.right, atlas.top);

        let bottom_left = TextVertex::new([x0, y0], [u0, v0], color);
        let bottom_right = TextVertex::new([x1, y0], [u1, v0], color);
        let top_right = TextVertex::new([x1, y1], [u1, v1], color);
        let top_left = TextVertex::new([x0, y1], [u0, v1], color);

        out.extend_from_slice(&[
            bottom_left,
            bottom_right,
            top_right,
            bottom_left,
            top_right,
            top_left,
        ]);
    });

    MeshStats {
        vertex_count: out.len() - start_len,
        missing_glyphs,
    }
}

/// Tight bounds of `text` at `font_size`, using the same pen walk as [`build_mesh`].
///
/// The width is the furthest right edge of any quad [`build_mesh`] would emit, so glyphs
/// without ink (a trailing space) add nothing. The height is `line_count * line_height`.
pub fn measure_text_bounds(font: &FontAtlas, text: &str, font_size: f32) -> TextBounds {
    let scale = font.scale_for(font_size);
    let mut max_line_width = 0.0f32;
    let mut max_x_in_line = 0.0f32;
    let mut line_count = 1;

    walk(font, text, scale, |event| match event {
        PenEvent::Glyph { pen_x, glyph, .. } => {
            if let Some((plane, _)) = glyph.quad_bounds() {
                max_x_in_line = max_x_in_line.max(pen_x + plane.right * scale);
            }
        }
        PenEvent::LineBreak => {
            max_line_width = max_line_width.max(max_x_in_line);
            max_x_in_line = 0.0;
            line_count += 1;
        }
    });

    TextBounds {
        width: max_line_width.max(max_x_in_line),
        height: line_count as f32 * font.metrics().line_height * scale,
        line_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FontAtlas;

    const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

    /// Every lowercase letter plus 'A' and 'V': advance 10, a 10x10 quad, em size 1.
    /// Space and '#' advance without ink.
    fn test_font(kerning: &str) -> FontAtlas {
        let glyphs = ('a'..='z')
            .chain(['A', 'V'])
            .enumerate()
            .map(|(i, ch)| {
                let left = (i % 8) as f32 * 16.0;
                let bottom = (i / 8) as f32 * 16.0;
                format!(
                    r#"{{"unicode": {}, "advance": 10,
                        "planeBounds": {{"left": 0, "bottom": 0, "right": 10, "top": 10}},
                        "atlasBounds": {{"left": {}, "bottom": {}, "right": {}, "top": {}}}}}"#,
                    ch as u32,
                    left,
                    bottom,
                    left + 10.0,
                    bottom + 10.0
                )
            })
            .chain([
                r#"{"unicode": 32, "advance": 5}"#.to_string(),
                // '#' has geometry but no atlas cell, so it draws nothing.
                r#"{"unicode": 35, "advance": 10,
                    "planeBounds": {"left": 0, "bottom": 0, "right": 10, "top": 10}}"#
                    .to_string(),
            ])
            .collect::<Vec<_>>()
            .join(",");

        let json = format!(
            r#"{{
                "atlas": {{"type": "msdf", "distanceRange": 4, "size": 32, "width": 128, "height": 64, "yOrigin": "bottom"}},
                "metrics": {{"emSize": 1, "lineHeight": 12, "ascender": 8, "descender": -2}},
                "glyphs": [{}],
                "kerning": [{}]
            }}"#,
            glyphs, kerning
        );
        FontAtlas::from_json_str(&json).unwrap()
    }

    fn mesh(font: &FontAtlas, text: &str, origin: [f32; 2]) -> (Vec<TextVertex>, MeshStats) {
        let mut out = Vec::new();
        let stats = build_mesh(
            font,
            text,
            origin,
            1.0,
            WHITE,
            &mut out,
            vertex_capacity_hint(text),
        );
        (out, stats)
    }

    #[test]
    fn test_kerning_applied_before_second_glyph() {
        let font = test_font(r#"{"unicode1": 65, "unicode2": 86, "advance": -2.0}"#);
        let (vertices, _) = mesh(&font, "AV", [0.0, 0.0]);

        assert_eq!(vertices.len(), 12);
        assert_eq!(vertices[0].pos[0], 0.0);
        assert_eq!(vertices[6].pos[0], 8.0);
    }

    #[test]
    fn test_kerning_is_ordered() {
        let font = test_font(r#"{"unicode1": 65, "unicode2": 86, "advance": -2.0}"#);
        let (vertices, _) = mesh(&font, "VA", [0.0, 0.0]);
        assert_eq!(vertices[6].pos[0], 10.0);
    }

    #[test]
    fn test_newline_width_takes_longest_line() {
        let font = test_font("");
        let bounds = measure_text_bounds(&font, "ab\nabc", 1.0);

        assert_eq!(bounds.width, 30.0);
        assert_eq!(bounds.height, 24.0);
        assert_eq!(bounds.line_count, 2);
    }

    #[test]
    fn test_newline_moves_down_and_resets_pen() {
        let font = test_font("");
        let (vertices, _) = mesh(&font, "ab\nc", [100.0, 50.0]);

        assert_eq!(vertices.len(), 18);
        // First baseline is the origin minus the ascender.
        assert_eq!(vertices[0].pos, [100.0, 42.0]);
        assert_eq!(vertices[12].pos, [100.0, 30.0]);
    }

    #[test]
    fn test_newline_clears_kerning_context() {
        let font = test_font(r#"{"unicode1": 65, "unicode2": 86, "advance": -2.0}"#);
        let (vertices, _) = mesh(&font, "A\nV", [0.0, 0.0]);
        assert_eq!(vertices[6].pos[0], 0.0);
    }

    #[test]
    fn test_quad_winding_and_uvs() {
        let font = test_font("");
        let (vertices, _) = mesh(&font, "a", [0.0, 10.0]);

        let positions: Vec<[f32; 2]> = vertices.iter().map(|v| v.pos).collect();
        assert_eq!(
            positions,
            vec![
                [0.0, 2.0],
                [10.0, 2.0],
                [10.0, 12.0],
                [0.0, 2.0],
                [10.0, 12.0],
                [0.0, 12.0],
            ]
        );

        // 'a' sits at atlas pixels (0, 0)..(10, 10) in a 128x64 image, origin at the bottom.
        assert_eq!(vertices[0].uv, [0.0, 1.0]);
        assert_eq!(vertices[2].uv, [10.0 / 128.0, 54.0 / 64.0]);
        assert!(vertices.iter().all(|v| v.color == WHITE));
    }

    #[test]
    fn test_space_advances_without_ink() {
        let font = test_font("");
        let (vertices, _) = mesh(&font, "a b", [0.0, 0.0]);

        assert_eq!(vertices.len(), 12);
        assert_eq!(vertices[6].pos[0], 15.0);
    }

    #[test]
    fn test_missing_glyph_is_skipped_but_kerns() {
        // '?' has no glyph; the pair ('?', 'a') still kerns because the previous
        // character is updated on a miss.
        let font = test_font(r#"{"unicode1": 63, "unicode2": 97, "advance": 3.0}"#);
        let (vertices, stats) = mesh(&font, "?a", [0.0, 0.0]);

        assert_eq!(stats.missing_glyphs, 1);
        assert_eq!(stats.vertex_count, 6);
        assert_eq!(vertices[0].pos[0], 3.0);
    }

    #[test]
    fn test_non_ascii_is_dropped() {
        let font = test_font(r#"{"unicode1": 65, "unicode2": 86, "advance": -2.0}"#);
        let (vertices, stats) = mesh(&font, "A\u{e9}V", [0.0, 0.0]);

        assert_eq!(stats.missing_glyphs, 0);
        assert_eq!(vertices.len(), 12);
        assert_eq!(vertices[6].pos[0], 8.0);
        assert_eq!(measure_text_bounds(&font, "\u{1f600}", 1.0).width, 0.0);
    }

    #[test]
    fn test_font_size_scales_layout() {
        let font = test_font("");
        let bounds = measure_text_bounds(&font, "ab", 2.0);
        assert_eq!(bounds.width, 40.0);
        assert_eq!(bounds.height, 24.0);
    }

    #[test]
    fn test_inkless_glyphs_add_no_width() {
        let font = test_font("");
        assert_eq!(measure_text_bounds(&font, "a ", 1.0).width, 10.0);
        assert_eq!(measure_text_bounds(&font, "a#", 1.0).width, 10.0);
        assert_eq!(measure_text_bounds(&font, "   ", 1.0).width, 0.0);

        // Both still advance the pen for whatever follows.
        assert_eq!(measure_text_bounds(&font, "a b", 1.0).width, 25.0);
        assert_eq!(measure_text_bounds(&font, "a#b", 1.0).width, 30.0);
    }

    #[test]
    fn test_bounds_agree_with_mesh() {
        let font = test_font(r#"{"unicode1": 65, "unicode2": 86, "advance": -2.0}"#);
        for text in [
            "AV",
            "hello\nworld",
            "AVAV\nab\n\nxyzzy",
            "quick brown fox",
            "a ",
            "trailing  \nspaces ",
            "a#",
            "ab#\n#",
        ] {
            let (vertices, _) = mesh(&font, text, [0.0, 0.0]);
            let max_x = vertices
                .iter()
                .map(|v| v.pos[0])
                .fold(0.0f32, f32::max);
            let bounds = measure_text_bounds(&font, text, 1.0);
            assert!(
                (bounds.width - max_x).abs() < 1e-4,
                "{:?}: bounds {} vs mesh {}",
                text,
                bounds.width,
                max_x
            );
        }
    }

    #[test]
    fn test_empty_text() {
        let font = test_font("");
        let (vertices, stats) = mesh(&font, "", [0.0, 0.0]);
        assert!(vertices.is_empty());
        assert_eq!(stats, MeshStats::default());

        let bounds = measure_text_bounds(&font, "", 1.0);
        assert_eq!(bounds.width, 0.0);
        assert_eq!(bounds.line_count, 1);
    }

    #[test]
    #[should_panic(expected = "text scratch capacity exceeded")]
    fn test_scratch_overflow_is_fatal() {
        let font = test_font("");
        let mut out = Vec::new();
        build_mesh(&font, "abc", [0.0, 0.0], 1.0, WHITE, &mut out, 12);
    }
}
