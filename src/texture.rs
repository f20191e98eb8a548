//! Images and texture sampling.
//!
//! An [`Image`] is a decoded, read-only texture: dimensions, an alpha flag,
//! and row-major pixels stored bottom-to-top (row 0 is the bottom of the
//! picture, the convention of the decoding collaborator). Sampling resolves
//! a normalized `(u, v)` coordinate to a color under a wrap policy and a
//! filter policy.

use serde::{Deserialize, Serialize};

use crate::color::{blend_color, Color};

// ============================================================================
// Image
// ============================================================================

/// A decoded RGBA image. The rasterizer only ever reads it.
#[derive(Clone)]
pub struct Image {
    width: u32,
    height: u32,
    alpha: bool,
    pixels: Vec<Color>,
}

impl Image {
    /// Create a blank opaque-black image
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            alpha: false,
            pixels: vec![Color::BLACK; (width * height) as usize],
        }
    }

    /// Build from a row-major pixel array (bottom row first).
    /// Returns None if the pixel count does not match the dimensions.
    pub fn from_pixels(width: u32, height: u32, alpha: bool, pixels: Vec<Color>) -> Option<Self> {
        if pixels.len() == (width * height) as usize {
            Some(Self {
                width,
                height,
                alpha,
                pixels,
            })
        } else {
            None
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether the image carries meaningful per-pixel alpha
    #[inline]
    pub fn has_alpha(&self) -> bool {
        self.alpha
    }

    /// Set a pixel (bounds checked no-op outside). For building images
    /// procedurally; decoded images should not be mutated afterwards.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        if x < self.width && y < self.height {
            self.pixels[(y * self.width + x) as usize] = color;
        }
    }

    /// Read a pixel (bounds checked)
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x < self.width && y < self.height {
            Some(self.pixels[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    /// Unchecked storage lookup; callers clamp to the image bounds first
    #[inline]
    pub(crate) fn texel(&self, x: i32, y: i32) -> Color {
        self.pixels[(y as u32 * self.width + x as u32) as usize]
    }
}

// ============================================================================
// Sampler configuration
// ============================================================================

/// Policy for texture coordinates outside `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WrapMode {
    /// Out-of-range samples are not computed; the destination pixel is
    /// left untouched
    #[default]
    Blank,
    /// Coordinates clamp to the edge
    Clamp,
    /// Fractional part tiles the texture; exact non-zero integers map to
    /// the far edge of the tile rather than wrapping to the next one
    Repeat,
    /// Like repeat, but negative coordinates mirror the tile
    RepeatMirror,
}

/// Texel interpolation policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterMode {
    /// Floor-indexed lookup
    #[default]
    Nearest,
    /// Four-texel interpolation with the alpha-aware lerp
    Bilinear,
}

/// Wrap and filter for one sampling operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SamplerOptions {
    pub wrap: WrapMode,
    pub filter: FilterMode,
}

impl SamplerOptions {
    pub const fn new(wrap: WrapMode, filter: FilterMode) -> Self {
        Self { wrap, filter }
    }
}

// ============================================================================
// Sampling
// ============================================================================

/// Fractional part for repeat tiling; exact non-zero integers stay at the
/// tile's far edge (1.0) so a seam never pulls texels from the next tile
#[inline]
fn wrap_repeat(c: f32) -> f32 {
    let f = c.floor();
    if f == c {
        if c != 0.0 {
            1.0
        } else {
            0.0
        }
    } else {
        c - f
    }
}

/// Repeat with the fraction mirrored on the negative side
#[inline]
fn wrap_mirror(c: f32) -> f32 {
    let f = c.floor();
    let t = if f == c { 1.0 } else { c - f };
    if c < 0.0 {
        1.0 - t
    } else {
        t
    }
}

impl Image {
    /// Resolve a normalized texture coordinate to a color.
    ///
    /// Returns None only under [`WrapMode::Blank`] when `(u, v)` falls
    /// outside the unit square; callers skip the destination pixel.
    pub fn sample(&self, u: f32, v: f32, opts: SamplerOptions) -> Option<Color> {
        let w = self.width as f32;
        let h = self.height as f32;

        match opts.wrap {
            WrapMode::Blank => {
                let tx = u * w;
                let ty = v * h;
                if tx >= 0.0 && ty >= 0.0 && tx <= w && ty <= h {
                    Some(self.filtered(tx, ty, opts.filter))
                } else {
                    None
                }
            }
            WrapMode::Clamp => {
                Some(self.filtered((u * w).clamp(0.0, w), (v * h).clamp(0.0, h), opts.filter))
            }
            WrapMode::Repeat => {
                Some(self.filtered(wrap_repeat(u) * w, wrap_repeat(v) * h, opts.filter))
            }
            WrapMode::RepeatMirror => {
                Some(self.filtered(wrap_mirror(u) * w, wrap_mirror(v) * h, opts.filter))
            }
        }
    }

    /// Look up a wrapped texel-space coordinate under the filter policy.
    /// Inputs are non-negative and at most one texel past the far edge.
    fn filtered(&self, tx: f32, ty: f32, filter: FilterMode) -> Color {
        let x_max = self.width as f32 - 1.0;
        let y_max = self.height as f32 - 1.0;

        match filter {
            FilterMode::Nearest => {
                let x = tx.min(x_max);
                let y = ty.min(y_max);
                self.texel(x as i32, y as i32)
            }
            FilterMode::Bilinear => {
                // half-texel offset, then interpolate the four neighbors
                let x = (tx - 0.5).clamp(0.0, x_max);
                let y = (ty - 0.5).clamp(0.0, y_max);

                let (x0, x1) = (x.floor(), x.ceil());
                let (y0, y1) = (y.floor(), y.ceil());
                let xt = x - x0;
                let yt = y - y0;

                let lo = blend_color(
                    self.texel(x0 as i32, y0 as i32),
                    self.texel(x1 as i32, y0 as i32),
                    xt,
                );
                let hi = blend_color(
                    self.texel(x0 as i32, y1 as i32),
                    self.texel(x1 as i32, y1 as i32),
                    xt,
                );

                blend_color(lo, hi, yt)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::rgb(255, 0, 0);
    const GREEN: Color = Color::rgb(0, 255, 0);
    const BLUE: Color = Color::rgb(0, 0, 255);

    fn two_by_two() -> Image {
        // storage rows bottom-to-top: row 0 = [red, green], row 1 = [blue, white]
        Image::from_pixels(2, 2, false, vec![RED, GREEN, BLUE, Color::WHITE])
            .expect("pixel count matches")
    }

    fn strip() -> Image {
        Image::from_pixels(2, 1, false, vec![RED, GREEN]).expect("pixel count matches")
    }

    #[test]
    fn test_nearest_quarter_sample_hits_bottom_left_slot() {
        let img = two_by_two();
        let c = img.sample(0.25, 0.25, SamplerOptions::default());
        assert_eq!(c, Some(RED));
    }

    #[test]
    fn test_blank_skips_outside_unit_square() {
        let img = two_by_two();
        let opts = SamplerOptions::default();
        assert_eq!(img.sample(1.2, 0.5, opts), None);
        assert_eq!(img.sample(0.5, -0.1, opts), None);
        assert!(img.sample(0.5, 0.5, opts).is_some());
        // the closed edge is still inside
        assert!(img.sample(1.0, 1.0, opts).is_some());
    }

    #[test]
    fn test_clamp_pins_to_edges() {
        let img = strip();
        let opts = SamplerOptions::new(WrapMode::Clamp, FilterMode::Nearest);
        assert_eq!(img.sample(1.7, 0.0, opts), Some(GREEN));
        assert_eq!(img.sample(-0.3, 0.0, opts), Some(RED));
    }

    #[test]
    fn test_repeat_tiles_fraction() {
        let img = strip();
        let opts = SamplerOptions::new(WrapMode::Repeat, FilterMode::Nearest);
        assert_eq!(img.sample(1.25, 0.0, opts), Some(RED));
        assert_eq!(img.sample(-0.25, 0.0, opts), Some(GREEN));
        // an exact integer stays at the far edge of its tile
        assert_eq!(img.sample(1.0, 0.0, opts), Some(GREEN));
        assert_eq!(img.sample(0.0, 0.0, opts), Some(RED));
    }

    #[test]
    fn test_repeat_mirror_flips_negative_tiles() {
        let img = strip();
        let opts = SamplerOptions::new(WrapMode::RepeatMirror, FilterMode::Nearest);
        assert_eq!(img.sample(-0.25, 0.0, opts), Some(RED));
        assert_eq!(img.sample(0.25, 0.0, opts), Some(RED));
        assert_eq!(img.sample(-0.75, 0.0, opts), Some(GREEN));
        assert_eq!(img.sample(0.75, 0.0, opts), Some(GREEN));
    }

    #[test]
    fn test_bilinear_center_blend() {
        let img = Image::from_pixels(
            2,
            2,
            false,
            vec![Color::BLACK, Color::WHITE, Color::BLACK, Color::WHITE],
        )
        .expect("pixel count matches");
        let opts = SamplerOptions::new(WrapMode::Clamp, FilterMode::Bilinear);
        let c = img.sample(0.5, 0.5, opts).expect("clamp always samples");
        assert_eq!((c.r, c.g, c.b), (127, 127, 127));
    }

    #[test]
    fn test_bilinear_transparent_neighbors_stay_transparent() {
        // garbage channels behind zero alpha must not produce a color
        let garbage = Color::rgba(200, 50, 99, 0);
        let img = Image::from_pixels(2, 2, true, vec![garbage; 4]).expect("pixel count matches");
        let opts = SamplerOptions::new(WrapMode::Clamp, FilterMode::Bilinear);
        let c = img.sample(0.5, 0.5, opts).expect("clamp always samples");
        assert_eq!(c, Color::TRANSPARENT);
    }

    #[test]
    fn test_sampler_options_json_roundtrip() {
        let opts = SamplerOptions::new(WrapMode::RepeatMirror, FilterMode::Bilinear);
        let json = serde_json::to_string(&opts).expect("serialize");
        let back: SamplerOptions = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, opts);
    }
}
