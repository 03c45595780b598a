//! # batch2d-wgpu
//!
//! WGPU backend for `batch2d` frames.
//!
//! [`WgpuBackend`] owns one ring buffer per category, each `frames_in_flight` slots of
//! `capacity * stride` bytes, plus a shared unit quad and a per-slot globals uniform.
//! For every [`batch2d::FrameSubmission`] it:
//!
//! 1. uploads the slot's records at the slot's base offset ([`WgpuBackend::upload`]),
//! 2. records one draw per batch into a caller-provided render pass
//!    ([`WgpuBackend::encode`]), binding the instance range at
//!    `base + start * stride` as resolved by [`batch_draws`],
//! 3. releases the frame's slot token from `Queue::on_submitted_work_done`
//!    ([`WgpuBackend::release_on_completion`]).
//!
//! Pipelines and shaders are supplied by the caller through [`CategoryPipelines`].
//! Bind group 0 must be built from [`WgpuBackend::globals_binding`] with a dynamically
//! offset uniform ([`globals_layout_entry`]); group 1 is the category's own resources.

mod backend;
mod layout;

pub use backend::*;
pub use layout::*;
