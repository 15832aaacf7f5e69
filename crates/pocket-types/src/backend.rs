//! Backend trait definitions.
//!
//! The UI never touches a video or input API directly. Every target
//! implements [`RenderBackend`] for drawing and [`PadSource`] for raw
//! controller samples.
//!
//! Text always uses the stock 8x8 font from [`crate::bitmap_font`], scaled by
//! an integer factor chosen by the backend, so `measure_text` and
//! `line_height` agree across targets.

use crate::color::Color;
use crate::error::Result;
use crate::input::PadState;

/// Opaque handle to a texture loaded into a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u64);

/// Source of raw controller samples.
pub trait PadSource {
    /// Read the current pad state without blocking. `None` when the device
    /// did not answer.
    fn peek(&mut self) -> Option<PadState>;
}

/// Rendering backend.
///
/// # Required methods
///
/// `init`, `screen_size`, `clear`, `fill_rect`, `draw_text`, `blit`,
/// `load_texture`, `destroy_texture`, `set_clip_rect`, `reset_clip_rect`,
/// `measure_text`, `line_height`, `read_pixels`, `swap_buffers` and
/// `shutdown`.
///
/// # Provided methods
///
/// Outline, glow and shadow helpers built on `fill_rect`, plus text layout
/// helpers built on `measure_text`. Backends may override any of them.
pub trait RenderBackend {
    /// Initialize the rendering subsystem.
    fn init(&mut self, width: u32, height: u32) -> Result<()>;

    /// Size of the drawable area in pixels.
    fn screen_size(&self) -> (u32, u32);

    /// Clear the whole screen to a solid color.
    fn clear(&mut self, color: Color) -> Result<()>;

    /// Fill a rectangle, alpha-blending over what is already there.
    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color) -> Result<()>;

    /// Draw text with its top-left corner at `(x, y)`.
    fn draw_text(&mut self, text: &str, x: i32, y: i32, color: Color) -> Result<()>;

    /// Blit a texture scaled to `w` x `h`.
    fn blit(&mut self, tex: TextureId, x: i32, y: i32, w: u32, h: u32) -> Result<()>;

    /// Load raw RGBA pixel data as a texture.
    fn load_texture(&mut self, width: u32, height: u32, rgba_data: &[u8]) -> Result<TextureId>;

    /// Release a previously loaded texture.
    fn destroy_texture(&mut self, tex: TextureId) -> Result<()>;

    /// Restrict drawing to a rectangle.
    fn set_clip_rect(&mut self, x: i32, y: i32, w: u32, h: u32) -> Result<()>;

    /// Reset clipping to the full screen.
    fn reset_clip_rect(&mut self) -> Result<()>;

    /// Width in pixels of the widest line of `text`.
    fn measure_text(&self, text: &str) -> u32;

    /// Height in pixels of one text line, spacing included.
    fn line_height(&self) -> u32;

    /// Read a region of the back buffer as RGBA pixel data.
    fn read_pixels(&self, x: i32, y: i32, w: u32, h: u32) -> Result<Vec<u8>>;

    /// Present the current frame.
    fn swap_buffers(&mut self) -> Result<()>;

    /// Shut down the rendering subsystem and release resources.
    fn shutdown(&mut self) -> Result<()>;

    /// One pixel wide rectangle outline.
    fn stroke_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color) -> Result<()> {
        if w == 0 || h == 0 {
            return Ok(());
        }
        self.fill_rect(x, y, w, 1, color)?;
        if h > 1 {
            self.fill_rect(x, y + h as i32 - 1, w, 1, color)?;
        }
        if h > 2 {
            self.fill_rect(x, y + 1, 1, h - 2, color)?;
            if w > 1 {
                self.fill_rect(x + w as i32 - 1, y + 1, 1, h - 2, color)?;
            }
        }
        Ok(())
    }

    /// One pixel wide line, both endpoints included.
    fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, color: Color) -> Result<()> {
        if y1 == y2 {
            let w = (x1 - x2).unsigned_abs() + 1;
            return self.fill_rect(x1.min(x2), y1, w, 1, color);
        }
        if x1 == x2 {
            let h = (y1 - y2).unsigned_abs() + 1;
            return self.fill_rect(x1, y1.min(y2), 1, h, color);
        }
        // Bresenham
        let (dx, dy) = ((x2 - x1).abs(), -(y2 - y1).abs());
        let (step_x, step_y) = ((x2 - x1).signum(), (y2 - y1).signum());
        let (mut x, mut y, mut err) = (x1, y1, dx + dy);
        loop {
            self.fill_rect(x, y, 1, 1, color)?;
            if x == x2 && y == y2 {
                return Ok(());
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += step_x;
            }
            if e2 <= dx {
                err += dx;
                y += step_y;
            }
        }
    }

    /// Concentric outlines around a rectangle, fading outward.
    ///
    /// The innermost ring is the most opaque; the outermost starts at alpha
    /// `0x30` and each ring inward adds `0x20`.
    fn glow_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color, radius: u32) -> Result<()> {
        for (n, i) in (1..=radius).rev().enumerate() {
            let alpha = (0x30 + 0x20 * n as u32).min(0xff) as u8;
            let off = i as i32;
            self.stroke_rect(x - off, y - off, w + 2 * i, h + 2 * i, color.with_alpha(alpha))?;
        }
        Ok(())
    }

    /// Drop shadow along the bottom and right edges of a rectangle.
    fn shadow_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color, depth: u32) -> Result<()> {
        if w == 0 || h == 0 {
            return Ok(());
        }
        let right = x + w as i32 - 1;
        let bottom = y + h as i32 - 1;
        for (n, i) in (1..=depth as i32).rev().enumerate() {
            let shade = color.with_alpha((0x30 + 0x20 * n as u32).min(0xff) as u8);
            self.draw_line(x + i, bottom + i, right + i, bottom + i, shade)?;
            self.draw_line(right + i, y + i, right + i, bottom + i - 1, shade)?;
        }
        Ok(())
    }

    /// Cover the whole screen with a (usually translucent) color.
    fn dim_screen(&mut self, color: Color) -> Result<()> {
        let (w, h) = self.screen_size();
        self.fill_rect(0, 0, w, h, color)
    }

    /// Height of `text` counting every line.
    fn text_height(&self, text: &str) -> u32 {
        let lines = text.chars().filter(|&c| c == '\n').count() as u32 + 1;
        lines * self.line_height()
    }

    /// Distance from the top of a line to its baseline.
    fn font_ascent(&self) -> u32 {
        self.line_height() * 4 / 5
    }

    /// Draw `text` horizontally centered in the span `x..x + w`.
    fn draw_text_centered(&mut self, text: &str, x: i32, y: i32, w: u32, color: Color) -> Result<()> {
        let tw = self.measure_text(text);
        let left = x + (w as i32 - tw as i32) / 2;
        self.draw_text(text, left, y, color)
    }

    /// Draw `text` truncated with `"..."` so that it fits in `max_w` pixels.
    fn draw_text_clipped(&mut self, text: &str, x: i32, y: i32, max_w: u32, color: Color) -> Result<()> {
        if self.measure_text(text) <= max_w {
            return self.draw_text(text, x, y, color);
        }
        let mut cut: String = text.to_string();
        while !cut.is_empty() {
            cut.pop();
            let candidate = format!("{cut}...");
            if self.measure_text(&candidate) <= max_w {
                return self.draw_text(&candidate, x, y, color);
            }
        }
        Ok(())
    }

    /// Prepare a new frame. Backends with batched command lists override this.
    fn begin_frame(&mut self) -> Result<()> {
        Ok(())
    }

    /// Finish the frame started by `begin_frame`.
    fn end_frame(&mut self) -> Result<()> {
        Ok(())
    }

    /// Block until the next vertical blank when the target has one.
    fn wait_vsync(&mut self) -> Result<()> {
        Ok(())
    }
}
