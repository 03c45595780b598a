//! # batch2d
//!
//! Per-frame draw batching for an immediate-mode 2D renderer.
//!
//! Callers open a [`Frame`] on a [`Renderer`], issue sprite, SDF primitive and text
//! draw calls in any order, then [`Frame::finish`] it. Each draw call encodes one
//! instance record (or a run of text vertices), asks the [`BatchCoalescer`] where to
//! put it, and writes it into the frame's private slot of an [`InstanceArena`].
//! The finished [`FrameSubmission`] carries the ordered [`DrawBatch`] list, the slot's
//! records and their byte offsets, and the [`SlotToken`] that a GPU backend releases
//! once it has consumed the frame.
//!
//! Up to [`MAX_FRAMES_IN_FLIGHT`] frames can be outstanding; opening another one blocks
//! until a token comes back.

mod arena;
mod atlas;
mod batch;
mod category;
mod color;
mod config;
pub mod encode;
mod error;
mod frame;
mod instance;
mod math;
mod ring;
mod stats;

pub use arena::*;
pub use atlas::*;
pub use batch::*;
pub use category::*;
pub use color::*;
pub use config::*;
pub use error::*;
pub use frame::*;
pub use instance::*;
pub use math::*;
pub use ring::*;
pub use stats::*;

pub use batch2d_text::TextVertex;
