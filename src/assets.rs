use batch2d::{Result, SpriteAtlas};
use batch2d_text::FontAtlas;

const SPRITE_UVS: &str = include_str!("../assets/sprites.txt");
const SPRITE_ATLAS_SIZE: u32 = 256;
const FONT_DESCRIPTION: &str = include_str!("../assets/fonts/mono.json");

/// Sprite rectangles and font metrics bundled with the playground.
pub fn load() -> Result<(SpriteAtlas, FontAtlas)> {
    let sprites = SpriteAtlas::parse(SPRITE_UVS, SPRITE_ATLAS_SIZE, SPRITE_ATLAS_SIZE)?;
    let font = FontAtlas::from_json_str(FONT_DESCRIPTION)?;
    log::info!(
        "✓ Assets loaded: {} sprites, {} glyphs",
        sprites.len(),
        font.glyph_count()
    );
    Ok((sprites, font))
}
