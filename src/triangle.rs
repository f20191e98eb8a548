//! Scanline triangle fill with flat-top/flat-bottom decomposition.
//!
//! Row and column bounds use `ceil(b - 0.5)` on both axes (the top-left,
//! half-open rule), so two triangles sharing an edge each own exactly one
//! side of it: tiling a surface with triangles never double-blends nor
//! leaves seams.

use std::mem;

use crate::color::Color;
use crate::framebuffer::Framebuffer;

impl Framebuffer {
    /// Fill the triangle spanned by three `(x, y)` vertices.
    ///
    /// Vertices are sorted by ascending y; a general triangle is split at
    /// the middle vertex's scanline into a flat-bottom and a flat-top half.
    /// A zero-height triangle draws nothing.
    pub fn fill_triangle(
        &mut self,
        v0: (f32, f32),
        v1: (f32, f32),
        v2: (f32, f32),
        color: Color,
    ) {
        let (mut p0, mut p1, mut p2) = (v0, v1, v2);

        // sort by y
        if p1.1 < p0.1 {
            mem::swap(&mut p0, &mut p1);
        }
        if p2.1 < p0.1 {
            mem::swap(&mut p0, &mut p2);
        }
        if p2.1 < p1.1 {
            mem::swap(&mut p1, &mut p2);
        }

        if p0.1 == p2.1 {
            return;
        }

        if p0.1 == p1.1 {
            // flat top
            if p1.0 < p0.0 {
                mem::swap(&mut p0, &mut p1);
            }
            self.flat_top(p0, p1, p2, color);
        } else if p1.1 == p2.1 {
            // flat bottom
            if p2.0 < p1.0 {
                mem::swap(&mut p1, &mut p2);
            }
            self.flat_bottom(p0, p1, p2, color);
        } else {
            // split on the long edge at the middle vertex's y
            let t = (p1.1 - p0.1) / (p2.1 - p0.1);
            let split = (p0.0 + (p2.0 - p0.0) * t, p0.1 + (p2.1 - p0.1) * t);

            // which of {p1, split} is left decides who owns the shared edge
            if p1.0 < split.0 {
                self.flat_bottom(p0, p1, split, color);
                self.flat_top(p1, split, p2, color);
            } else {
                self.flat_bottom(p0, split, p1, color);
                self.flat_top(split, p1, p2, color);
            }
        }
    }

    /// v0/v1 share the top edge (v0 left), v2 is the apex below
    fn flat_top(&mut self, v0: (f32, f32), v1: (f32, f32), v2: (f32, f32), color: Color) {
        let slp02 = (v2.0 - v0.0) / (v2.1 - v0.1);
        let slp12 = (v2.0 - v1.0) / (v2.1 - v1.1);

        let y_start = (v0.1 - 0.5).ceil() as i32;
        let y_end = (v2.1 - 0.5).ceil() as i32; // row after the last drawn

        for y in y_start..y_end {
            let px0 = slp02 * (y as f32 + 0.5 - v0.1) + v0.0;
            let px1 = slp12 * (y as f32 + 0.5 - v1.1) + v1.0;

            let x_start = (px0 - 0.5).ceil() as i32;
            let x_end = (px1 - 0.5).ceil() as i32;

            for x in x_start..x_end {
                self.point(x, y, color);
            }
        }
    }

    /// v0 is the apex above, v1/v2 share the bottom edge (v1 left)
    fn flat_bottom(&mut self, v0: (f32, f32), v1: (f32, f32), v2: (f32, f32), color: Color) {
        let slp01 = (v1.0 - v0.0) / (v1.1 - v0.1);
        let slp02 = (v2.0 - v0.0) / (v2.1 - v0.1);

        let y_start = (v0.1 - 0.5).ceil() as i32;
        let y_end = (v2.1 - 0.5).ceil() as i32;

        for y in y_start..y_end {
            let px0 = slp01 * (y as f32 + 0.5 - v0.1) + v0.0;
            let px1 = slp02 * (y as f32 + 0.5 - v0.1) + v0.0;

            let x_start = (px0 - 0.5).ceil() as i32;
            let x_end = (px1 - 0.5).ceil() as i32;

            for x in x_start..x_end {
                self.point(x, y, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HALF: Color = Color::rgba(255, 255, 255, 128);
    const ONE_BLEND: (u8, u8, u8) = (128, 128, 128);

    #[test]
    fn test_shared_edge_tiles_without_overlap_or_gap() {
        // two triangles tiling the rect [0,8) x [0,6): with a half-alpha
        // color, a double-filled pixel would blend twice and read brighter,
        // a missed pixel stays black
        let mut fb = Framebuffer::with_size(10, 8);
        fb.fill_triangle((0.0, 0.0), (8.0, 0.0), (0.0, 6.0), HALF);
        fb.fill_triangle((8.0, 0.0), (8.0, 6.0), (0.0, 6.0), HALF);

        for y in 0..8 {
            for x in 0..10 {
                let expect = if x < 8 && y < 6 { ONE_BLEND } else { (0, 0, 0) };
                assert_eq!(fb.get_pixel(x, y), Some(expect), "at {:?}", (x, y));
            }
        }
    }

    #[test]
    fn test_general_triangle_split_edge_fills_once() {
        let mut fb = Framebuffer::with_size(16, 16);
        fb.fill_triangle((2.0, 1.0), (12.0, 5.0), (5.0, 13.0), HALF);

        let mut filled = 0;
        for y in 0..16 {
            for x in 0..16 {
                match fb.get_pixel(x, y) {
                    Some((0, 0, 0)) => {}
                    Some(px) => {
                        assert_eq!(px, ONE_BLEND, "double fill at {:?}", (x, y));
                        filled += 1;
                    }
                    None => unreachable!(),
                }
            }
        }
        assert!(filled > 0);
    }

    #[test]
    fn test_zero_height_triangle_draws_nothing() {
        let mut fb = Framebuffer::with_size(8, 8);
        fb.fill_triangle((1.0, 3.0), (6.0, 3.0), (4.0, 3.0), Color::WHITE);
        for y in 0..8 {
            for x in 0..8 {
                assert_eq!(fb.get_pixel(x, y), Some((0, 0, 0)));
            }
        }
    }

    #[test]
    fn test_vertex_order_does_not_change_coverage() {
        let verts = [(1.0, 2.0), (9.0, 4.0), (3.0, 9.0)];
        let mut reference = Framebuffer::with_size(12, 12);
        reference.fill_triangle(verts[0], verts[1], verts[2], Color::WHITE);

        for perm in [[1, 0, 2], [2, 1, 0], [1, 2, 0], [2, 0, 1], [0, 2, 1]] {
            let mut fb = Framebuffer::with_size(12, 12);
            fb.fill_triangle(verts[perm[0]], verts[perm[1]], verts[perm[2]], Color::WHITE);
            assert_eq!(fb.as_bytes(), reference.as_bytes(), "perm {:?}", perm);
        }
    }
}
