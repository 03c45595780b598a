//! # batch2d-text
//!
//! Text shaping against a signed-distance-field font atlas.
//!
//! The font is described by the JSON layout that `msdf-atlas-gen` writes next to its
//! atlas image: atlas metrics, font metrics, per-glyph plane/atlas bounds and kerning
//! pairs. [`FontAtlas`] holds that description in lookup-friendly form, and the
//! shaping functions turn strings into flat triangle lists of [`TextVertex`] or into
//! tight [`TextBounds`].
//!
//! Mesh building and bounds measurement share one pen walk, so a measured box always
//! matches the glyphs that were emitted for the same string and size.
//!
//! Only ASCII is shaped. Code points above 127 are dropped without affecting kerning.

mod error;
mod font;
mod shaper;
mod vertex;

pub use error::*;
pub use font::*;
pub use shaper::*;
pub use vertex::*;
