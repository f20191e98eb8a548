//! Bitmap text from a monospace glyph atlas.
//!
//! The atlas carries its own geometry: its bottom row and rightmost column
//! form an opaque-black border band, and the first pixel in each that
//! differs from opaque black marks the glyph cell width and height. Glyph
//! ink is stored as black pixels whose alpha channel is the coverage shape,
//! so an OR against the requested tint recolors the glyph without touching
//! its mask.

use log::debug;

use crate::color::Color;
use crate::framebuffer::Framebuffer;
use crate::texture::Image;

/// First printable ASCII code in the atlas
const FIRST_GLYPH: i32 = 32;

/// A glyph atlas with its derived cell geometry.
///
/// Metrics are computed once from the border markers and cached for the
/// lifetime of the binding.
pub struct Font {
    atlas: Image,
    glyph_w: i32,
    glyph_h: i32,
    columns: i32,
    aspect: f32,
}

impl Font {
    /// Bind an atlas image, deriving the glyph cell size from its
    /// border-pixel markers.
    pub fn from_atlas(atlas: Image) -> Result<Self, String> {
        let w = atlas.width() as i32;
        let h = atlas.height() as i32;
        if w == 0 || h == 0 {
            return Err("font atlas is empty".to_string());
        }

        // cell height: first non-black pixel up the rightmost column
        let mut glyph_h = 0;
        for y in 0..h {
            if atlas.texel(w - 1, y) != Color::BLACK {
                glyph_h = y;
                break;
            }
        }

        // cell width: first non-black pixel right-to-left along the bottom row
        let mut glyph_w = 0;
        for x in (0..w).rev() {
            if atlas.texel(x, 0) != Color::BLACK {
                glyph_w = w - x - 1;
                break;
            }
        }

        if glyph_w <= 0 || glyph_h <= 0 {
            return Err("font atlas has no border markers".to_string());
        }

        let columns = w / glyph_w;
        let aspect = glyph_w as f32 / glyph_h as f32;
        debug!(
            "font atlas {}x{}: glyph cell {}x{}, {} columns",
            w, h, glyph_w, glyph_h, columns
        );

        Ok(Self {
            atlas,
            glyph_w,
            glyph_h,
            columns,
            aspect,
        })
    }

    #[inline]
    pub fn glyph_width(&self) -> i32 {
        self.glyph_w
    }

    #[inline]
    pub fn glyph_height(&self) -> i32 {
        self.glyph_h
    }

    #[inline]
    pub fn columns(&self) -> i32 {
        self.columns
    }

    /// Width/height ratio of a glyph cell
    #[inline]
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Advance width of one character drawn at the given height
    #[inline]
    pub fn char_width(&self, height: i32) -> i32 {
        (height as f32 * self.aspect) as i32
    }

    /// Draw a string with its top-left corner at (x, y), glyphs scaled to
    /// the given pixel height.
    ///
    /// `'\n'` advances to the next line and resets the cursor; printable
    /// ASCII (32..=126) draws a recolored glyph; anything else advances the
    /// cursor by one glyph width without drawing. The tint's alpha is
    /// forced to zero so the atlas alpha alone shapes the glyph.
    pub fn draw_string(
        &self,
        fb: &mut Framebuffer,
        text: &str,
        x: i32,
        y: i32,
        height: i32,
        color: Color,
    ) {
        let mut line_x = x;
        let mut y = y;
        let width = self.char_width(height);
        let tint = color.with_alpha(0);

        for ch in text.chars() {
            if ch == '\n' {
                y += height;
                line_x = x;
            } else if (' '..='~').contains(&ch) {
                let idx = ch as i32 - FIRST_GLYPH;
                // one border row trimmed from the top and bottom of the cell
                fb.draw_masked_glyph(
                    &self.atlas,
                    line_x,
                    y,
                    width,
                    height,
                    (idx % self.columns) * self.glyph_w,
                    (idx / self.columns) * self.glyph_h + 1,
                    self.glyph_w,
                    self.glyph_h - 2,
                    tint,
                );
                line_x += width;
            } else {
                line_x += width;
            }
        }
    }
}
