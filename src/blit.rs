//! Image blits: 1:1 copies, scaled draws with flips, partial-rect draws,
//! and texture-mapped rectangles.
//!
//! Source images store rows bottom-to-top, so every blit inverts the
//! vertical axis while copying. Scaling is nearest-neighbor by fractional
//! step accumulation: the source coordinate advances by `src_dim / dst_dim`
//! per destination pixel, which handles up- and downscaling alike and lets
//! negative destination extents run the accumulator backward for exact
//! mirrors.

use std::mem;

use crate::color::Color;
use crate::framebuffer::Framebuffer;
use crate::texture::{Image, SamplerOptions};

impl Framebuffer {
    /// Copy an image 1:1 with (x, y) at its top-left corner.
    /// Pixels composite through the blend law, so image alpha applies.
    pub fn draw_image(&mut self, img: &Image, x: i32, y: i32) {
        let iw = img.width() as i32;
        let ih = img.height() as i32;

        for iy in (0..ih).rev() {
            for ix in 0..iw {
                let c = img.texel(ix, iy);
                self.point(x + ix, y + (ih - iy) - 1, c);
            }
        }
    }

    /// Draw an image scaled to `w` x `h` destination pixels.
    ///
    /// Negative `w`/`h` flip horizontally/vertically; zero extent is a
    /// no-op. Exactly `|w| * |h|` destination pixels are written.
    pub fn draw_image_scaled(&mut self, img: &Image, x: i32, y: i32, w: i32, h: i32) {
        if w == 0 || h == 0 {
            return;
        }

        let iw = img.width() as f32;
        let ih = img.height() as f32;
        let x_fac = iw / w as f32;
        let y_fac = ih / h as f32;

        // a flipped axis starts one step in from the far edge so the output
        // is a pixel-for-pixel mirror of the forward draw
        let sx0 = if w > 0 { 0.0 } else { iw + x_fac };
        let sy0 = if h > 0 { 0.0 } else { ih + y_fac };

        let ih_i = img.height() as i32;
        let mut sy = sy0;
        for yo in 0..h.abs() {
            let mut sx = sx0;
            for xo in 0..w.abs() {
                let fx = sx.clamp(0.0, iw - 1.0);
                let fy = sy.clamp(0.0, ih - 1.0);
                let c = img.texel(fx as i32, ih_i - 1 - fy as i32);
                self.point(x + xo, y + yo, c);
                sx += x_fac;
            }
            sy += y_fac;
        }
    }

    /// Draw the image sub-rectangle `[s, s+|tw|) x [t, t+|th|)` (top-down
    /// image coordinates, clamped to the image) scaled to `w` x `h`.
    pub fn draw_partial_image(
        &mut self,
        img: &Image,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        s: i32,
        t: i32,
        tw: i32,
        th: i32,
    ) {
        self.partial_blit(img, x, y, w, h, s, t, tw, th, None);
    }

    /// Masked partial blit for glyph rendering: each source pixel is OR'ed
    /// with the tint before the blended write
    pub(crate) fn draw_masked_glyph(
        &mut self,
        img: &Image,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        s: i32,
        t: i32,
        tw: i32,
        th: i32,
        tint: Color,
    ) {
        self.partial_blit(img, x, y, w, h, s, t, tw, th, Some(tint));
    }

    fn partial_blit(
        &mut self,
        img: &Image,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        s: i32,
        t: i32,
        tw: i32,
        th: i32,
        tint: Option<Color>,
    ) {
        if w == 0 || h == 0 || tw == 0 || th == 0 {
            return;
        }

        let iw = img.width() as i32;
        let ih = img.height() as i32;
        let s = s.clamp(0, iw - 1);
        let t = t.clamp(0, ih - 1);
        let s_max = (s + tw.abs()).clamp(0, iw);
        let t_max = (t + th.abs()).clamp(0, ih);

        let x_fac = (s_max - s) as f32 / w as f32;
        let y_fac = (t_max - t) as f32 / h as f32;

        let sx0 = if w > 0 { s as f32 } else { s_max as f32 + x_fac };
        let sy0 = if h > 0 { t as f32 } else { t_max as f32 + y_fac };

        let mut sy = sy0;
        for yo in 0..h.abs() {
            let mut sx = sx0;
            for xo in 0..w.abs() {
                let fx = sx.clamp(s as f32, (s_max - 1) as f32);
                let fy = sy.clamp(t as f32, (t_max - 1) as f32);
                let mut c = img.texel(fx as i32, ih - 1 - fy as i32);
                if let Some(tint) = tint {
                    c = c.mask_or(tint);
                }
                self.point(x + xo, y + yo, c);
                sx += x_fac;
            }
            sy += y_fac;
        }
    }

    /// Texture-map the destination rectangle onto the UV rectangle with
    /// opposite corners `(s, t)` and `(p, q)`.
    ///
    /// Inverted corners (or negative `w`/`h`, which swap the matching UV
    /// pair) flip the mapping. Zero destination extent or a zero-extent UV
    /// rectangle is a no-op. Samples the image per destination pixel; a
    /// blank-wrap miss leaves the destination pixel untouched.
    pub fn draw_texture(
        &mut self,
        img: &Image,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        s: f32,
        t: f32,
        p: f32,
        q: f32,
        opts: SamplerOptions,
    ) {
        if w == 0 || h == 0 || s == p || t == q {
            return;
        }

        let (mut w, mut h) = (w, h);
        let (mut s, mut t, mut p, mut q) = (s, t, p, q);
        if w < 0 {
            mem::swap(&mut s, &mut p);
            w = -w;
        }
        if h < 0 {
            mem::swap(&mut t, &mut q);
            h = -h;
        }

        let u_fac = (p - s) / w as f32;
        let v_fac = (q - t) / h as f32;

        let mut v = t;
        for yo in 0..h {
            let mut u = s;
            for xo in 0..w {
                // storage is bottom-to-top, so v is flipped for sampling
                if let Some(c) = img.sample(u, 1.0 - v, opts) {
                    self.point(x + xo, y + yo, c);
                }
                u += u_fac;
            }
            v += v_fac;
        }
    }
}
