//! Draw state and the two execution modes.
//!
//! A [`RenderContext`] owns one framebuffer plus the per-context draw
//! state, and runs the per-frame callback synchronously on the caller's
//! thread. [`ThreadedRenderer`] moves the same loop onto a dedicated render
//! thread: one mutex guards the context, taken once per frame around
//! update + present and by [`ThreadedRenderer::resize`], so reallocating
//! the buffer can never race a present in progress.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::font::Font;
use crate::framebuffer::Framebuffer;

/// Per-context drawing state: the current draw color and the clear color.
///
/// Passed-through defaults only; every framebuffer operation also accepts
/// an explicit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawState {
    pub color: Color,
    pub background: Color,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            background: Color::BLACK,
        }
    }
}

// ============================================================================
// RenderContext (single-threaded mode)
// ============================================================================

/// A framebuffer with its draw state and frame bookkeeping.
///
/// The forwarding methods below mirror the framebuffer API using the
/// current color, so call sites stay terse; the explicit-color API on
/// [`Framebuffer`] is always available through `framebuffer_mut`.
pub struct RenderContext {
    fb: Framebuffer,
    state: DrawState,
    frame_count: u64,
    started: Instant,
    last_frame: Instant,
    total_time: f32,
}

impl RenderContext {
    pub fn new(width: u32, height: u32) -> Self {
        let now = Instant::now();
        Self {
            fb: Framebuffer::with_size(width, height),
            state: DrawState::default(),
            frame_count: 0,
            started: now,
            last_frame: now,
            total_time: 0.0,
        }
    }

    #[inline]
    pub fn framebuffer(&self) -> &Framebuffer {
        &self.fb
    }

    #[inline]
    pub fn framebuffer_mut(&mut self) -> &mut Framebuffer {
        &mut self.fb
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.fb.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.fb.height()
    }

    pub fn set_color(&mut self, color: Color) {
        self.state.color = color;
    }

    pub fn color(&self) -> Color {
        self.state.color
    }

    pub fn set_background(&mut self, color: Color) {
        self.state.background = color;
    }

    pub fn draw_state(&self) -> DrawState {
        self.state
    }

    /// Reallocate the framebuffer
    pub fn resize(&mut self, width: u32, height: u32) {
        self.fb.resize(width, height);
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Seconds since the context was created, as of the last frame
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Run one frame synchronously: the callback receives the context and
    /// the seconds elapsed since the previous frame.
    pub fn update<F>(&mut self, f: F)
    where
        F: FnOnce(&mut RenderContext, f32),
    {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.total_time = now.duration_since(self.started).as_secs_f32();

        f(self, dt);
        self.frame_count += 1;
    }

    // ------------------------------------------------------------------
    // Forwarding draw API using the current draw state
    // ------------------------------------------------------------------

    /// Clear the whole buffer to the background color
    pub fn clear(&mut self) {
        let bg = self.state.background;
        self.fb.clear(bg);
    }

    pub fn point(&mut self, x: i32, y: i32) {
        let c = self.state.color;
        self.fb.point(x, y, c);
    }

    pub fn line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        let c = self.state.color;
        self.fb.line(x1, y1, x2, y2, c);
    }

    pub fn triangle(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, x3: i32, y3: i32) {
        let c = self.state.color;
        self.fb.triangle(x1, y1, x2, y2, x3, y3, c);
    }

    pub fn rect(&mut self, x: i32, y: i32, w: i32, h: i32) {
        let c = self.state.color;
        self.fb.rect(x, y, w, h, c);
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32) {
        let c = self.state.color;
        self.fb.fill_rect(x, y, w, h, c);
    }

    pub fn circle(&mut self, x: i32, y: i32, r: i32) {
        let c = self.state.color;
        self.fb.circle(x, y, r, c);
    }

    pub fn fill_circle(&mut self, x: i32, y: i32, r: i32) {
        let c = self.state.color;
        self.fb.fill_circle(x, y, r, c);
    }

    pub fn fill_triangle(&mut self, v0: (f32, f32), v1: (f32, f32), v2: (f32, f32)) {
        let c = self.state.color;
        self.fb.fill_triangle(v0, v1, v2, c);
    }

    pub fn draw_string(&mut self, font: &Font, text: &str, x: i32, y: i32, height: i32) {
        let c = self.state.color;
        font.draw_string(&mut self.fb, text, x, y, height, c);
    }
}

// ============================================================================
// ThreadedRenderer (threaded mode)
// ============================================================================

struct Shared {
    ctx: Mutex<RenderContext>,
    running: AtomicBool,
}

/// Runs the frame loop on a dedicated render thread.
///
/// Each frame takes the context mutex once, runs the update callback, then
/// hands the framebuffer to the present callback before releasing the
/// lock. `resize` takes the same mutex, so "allocate new buffer" and "read
/// current buffer for present" are serialized. `shutdown` lets the current
/// frame finish, then joins the thread.
pub struct ThreadedRenderer {
    shared: Arc<Shared>,
    handle: Option<JoinHandle<()>>,
}

impl ThreadedRenderer {
    pub fn spawn<U, P>(ctx: RenderContext, mut update: U, mut present: P) -> Result<Self, String>
    where
        U: FnMut(&mut RenderContext, f32) + Send + 'static,
        P: FnMut(&Framebuffer) + Send + 'static,
    {
        let shared = Arc::new(Shared {
            ctx: Mutex::new(ctx),
            running: AtomicBool::new(true),
        });

        let thread_shared = Arc::clone(&shared);
        let handle = thread::Builder::new()
            .name("render".to_string())
            .spawn(move || {
                debug!("render thread started");
                while thread_shared.running.load(Ordering::Acquire) {
                    let Ok(mut ctx) = thread_shared.ctx.lock() else {
                        // poisoned by a panicking host callback
                        break;
                    };
                    ctx.update(&mut update);
                    present(ctx.framebuffer());
                    drop(ctx);
                    // give resize callers a chance at the lock
                    thread::yield_now();
                }
                debug!("render thread stopped");
            })
            .map_err(|e| e.to_string())?;

        Ok(Self {
            shared,
            handle: Some(handle),
        })
    }

    /// Whether the render thread is still running
    pub fn is_running(&self) -> bool {
        self.handle.is_some() && self.shared.running.load(Ordering::Acquire)
    }

    /// Reallocate the framebuffer from any thread. Serialized against the
    /// render thread's current frame by the shared mutex.
    pub fn resize(&self, width: u32, height: u32) -> Result<(), String> {
        let mut ctx = self.shared.ctx.lock().map_err(|e| e.to_string())?;
        ctx.resize(width, height);
        Ok(())
    }

    /// Run a closure against the context under the lock (state changes,
    /// inspection from the host thread)
    pub fn with_context<R>(&self, f: impl FnOnce(&mut RenderContext) -> R) -> Result<R, String> {
        let mut ctx = self.shared.ctx.lock().map_err(|e| e.to_string())?;
        Ok(f(&mut ctx))
    }

    /// Signal the render thread to stop after its current frame, then join
    /// it. Idempotent.
    pub fn shutdown(&mut self) -> Result<(), String> {
        self.shared.running.store(false, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            debug!("joining render thread");
            handle.join().map_err(|_| "render thread panicked".to_string())?;
        }
        Ok(())
    }
}

impl Drop for ThreadedRenderer {
    fn drop(&mut self) {
        let _ = self.shutdown();
    }
}
