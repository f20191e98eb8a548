//! softraster: a CPU software rasterizer.
//!
//! Draws primitives, composites colors with alpha blending, samples
//! textures with configurable wrap/filter behavior, and renders bitmap-font
//! text — all into an in-memory pixel buffer, no GPU involved.
//!
//! The [`Framebuffer`] owns the destination pixels; every drawing operation
//! takes an explicit [`Color`] and composites through one fixed-point blend
//! law. Decoded [`Image`]s are sampled via [`SamplerOptions`] or blitted
//! directly; a [`Font`] slices a monospace glyph atlas into recolorable
//! text. [`RenderContext`] bundles a framebuffer with per-context draw
//! state for the single-threaded frame loop, and [`ThreadedRenderer`] runs
//! the same loop on a dedicated render thread behind one mutex.
//!
//! Windowing, input polling and image decoding are the host's business:
//! the host hands in decoded images, drives the frame loop, and presents
//! [`Framebuffer::as_bytes`] however it likes.

mod blit;
mod color;
mod context;
mod font;
mod framebuffer;
mod primitives;
mod texture;
mod triangle;

pub use color::{blend, blend_color, Color};
pub use context::{DrawState, RenderContext, ThreadedRenderer};
pub use font::Font;
pub use framebuffer::Framebuffer;
pub use texture::{FilterMode, Image, SamplerOptions, WrapMode};
