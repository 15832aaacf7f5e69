//! Software RGBA framebuffer renderer.
//!
//! Implements `RenderBackend` by drawing into a `Vec<u8>` RGBA buffer.
//! Text comes from the stock bitmap font at an integer scale; textures are
//! blitted with nearest-neighbour scaling and source-over blending.

use std::rc::Rc;

use pocket_types::backend::{RenderBackend, TextureId};
use pocket_types::bitmap_font;
use pocket_types::color::Color;
use pocket_types::error::{PocketError, Result};

/// A stored texture for later blitting.
struct Texture {
    width: u32,
    height: u32,
    data: Rc<Vec<u8>>,
}

#[derive(Clone, Copy)]
struct ClipRect {
    x: i32,
    y: i32,
    w: u32,
    h: u32,
}

/// Software RGBA framebuffer renderer.
///
/// All drawing writes straight into the pixel buffer, which hosts read
/// through [`SoftBackend::buffer`]. A dirty flag tracks whether the buffer
/// changed since the host last looked.
pub struct SoftBackend {
    width: u32,
    height: u32,
    font_scale: u32,
    buffer: Vec<u8>,
    dirty: bool,
    frames: u64,
    textures: Vec<Option<Texture>>,
    clip: Option<ClipRect>,
}

impl SoftBackend {
    /// Create a backend with the given resolution and font scale.
    pub fn new(width: u32, height: u32, font_scale: u32) -> Self {
        Self {
            width,
            height,
            font_scale: font_scale.max(1),
            buffer: vec![0; (width * height * 4) as usize],
            dirty: true,
            frames: 0,
            textures: Vec::new(),
            clip: None,
        }
    }

    /// Read-only view of the RGBA pixel buffer.
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Number of `swap_buffers` calls so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Color at `(x, y)`, or `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let o = ((y * self.width + x) * 4) as usize;
        let p = self.buffer.get(o..o + 4)?;
        Some(Color::rgba(p[0], p[1], p[2], p[3]))
    }

    /// Set a single pixel. Performs bounds and clip checking.
    fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if x < 0 || y < 0 {
            return;
        }
        let (ux, uy) = (x as u32, y as u32);
        if ux >= self.width || uy >= self.height {
            return;
        }
        if let Some(clip) = &self.clip
            && (x < clip.x
                || y < clip.y
                || ux >= (clip.x.max(0) as u32).saturating_add(clip.w)
                || uy >= (clip.y.max(0) as u32).saturating_add(clip.h))
        {
            return;
        }
        let offset = ((uy * self.width + ux) * 4) as usize;
        let px = &mut self.buffer[offset..offset + 4];
        // Source-over blending.
        if color.a == 255 {
            px.copy_from_slice(&[color.r, color.g, color.b, 255]);
        } else if color.a > 0 {
            let sa = color.a as u16;
            let da = 255 - sa;
            let mix = |s: u8, d: u8| ((s as u16 * sa + d as u16 * da + 127) / 255) as u8;
            px[0] = mix(color.r, px[0]);
            px[1] = mix(color.g, px[1]);
            px[2] = mix(color.b, px[2]);
            px[3] = 255;
        }
    }

    /// Look up a texture; cloning the `Rc` lets the caller draw while
    /// holding the pixels.
    fn texture(&self, tex: TextureId) -> Result<(u32, u32, Rc<Vec<u8>>)> {
        let texture = self
            .textures
            .get(tex.0 as usize)
            .and_then(|t| t.as_ref())
            .ok_or_else(|| PocketError::Backend(format!("invalid texture id: {}", tex.0)))?;
        Ok((texture.width, texture.height, Rc::clone(&texture.data)))
    }
}

impl RenderBackend for SoftBackend {
    fn init(&mut self, width: u32, height: u32) -> Result<()> {
        self.width = width;
        self.height = height;
        self.buffer = vec![0; (width * height * 4) as usize];
        self.dirty = true;
        log::info!("software backend initialized at {width}x{height}");
        Ok(())
    }

    fn screen_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self, color: Color) -> Result<()> {
        for pixel in self.buffer.chunks_exact_mut(4) {
            pixel.copy_from_slice(&[color.r, color.g, color.b, color.a]);
        }
        self.dirty = true;
        Ok(())
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color) -> Result<()> {
        for dy in 0..h as i32 {
            for dx in 0..w as i32 {
                self.set_pixel(x + dx, y + dy, color);
            }
        }
        self.dirty = true;
        Ok(())
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, color: Color) -> Result<()> {
        let scale = self.font_scale;
        let s = scale as i32;
        let mut blocks = Vec::new();
        bitmap_font::rasterize(text, x, y, scale, color, |px, py, ink| {
            blocks.push((px, py, ink));
        });
        for (px, py, ink) in blocks {
            for sy in 0..s {
                for sx in 0..s {
                    self.set_pixel(px + sx, py + sy, ink);
                }
            }
        }
        self.dirty = true;
        Ok(())
    }

    fn blit(&mut self, tex: TextureId, x: i32, y: i32, w: u32, h: u32) -> Result<()> {
        let (tex_w, tex_h, data) = self.texture(tex)?;
        for dy in 0..h {
            for dx in 0..w {
                let src_x = (dx * tex_w / w) as usize;
                let src_y = (dy * tex_h / h) as usize;
                let o = (src_y * tex_w as usize + src_x) * 4;
                if let Some(p) = data.get(o..o + 4) {
                    self.set_pixel(x + dx as i32, y + dy as i32, Color::rgba(p[0], p[1], p[2], p[3]));
                }
            }
        }
        self.dirty = true;
        Ok(())
    }

    fn load_texture(&mut self, width: u32, height: u32, rgba_data: &[u8]) -> Result<TextureId> {
        let expected = (width * height * 4) as usize;
        if rgba_data.len() != expected {
            return Err(PocketError::Backend(format!(
                "texture data size mismatch: expected {expected}, got {}",
                rgba_data.len()
            )));
        }

        let texture = Texture {
            width,
            height,
            data: Rc::new(rgba_data.to_vec()),
        };

        if let Some(i) = self.textures.iter().position(Option::is_none) {
            self.textures[i] = Some(texture);
            return Ok(TextureId(i as u64));
        }
        self.textures.push(Some(texture));
        Ok(TextureId(self.textures.len() as u64 - 1))
    }

    fn destroy_texture(&mut self, tex: TextureId) -> Result<()> {
        if let Some(slot) = self.textures.get_mut(tex.0 as usize) {
            *slot = None;
        }
        Ok(())
    }

    fn set_clip_rect(&mut self, x: i32, y: i32, w: u32, h: u32) -> Result<()> {
        self.clip = Some(ClipRect { x, y, w, h });
        Ok(())
    }

    fn reset_clip_rect(&mut self) -> Result<()> {
        self.clip = None;
        Ok(())
    }

    fn measure_text(&self, text: &str) -> u32 {
        bitmap_font::measure_text(text, self.font_scale)
    }

    fn line_height(&self) -> u32 {
        bitmap_font::line_height(self.font_scale)
    }

    fn read_pixels(&self, x: i32, y: i32, w: u32, h: u32) -> Result<Vec<u8>> {
        let mut out = vec![0u8; (w * h * 4) as usize];
        for row in 0..h as i32 {
            let sy = y + row;
            if sy < 0 || sy >= self.height as i32 {
                continue;
            }
            for col in 0..w as i32 {
                let sx = x + col;
                if sx < 0 || sx >= self.width as i32 {
                    continue;
                }
                let src = ((sy as u32 * self.width + sx as u32) * 4) as usize;
                let dst = ((row as u32 * w + col as u32) * 4) as usize;
                out[dst..dst + 4].copy_from_slice(&self.buffer[src..src + 4]);
            }
        }
        Ok(out)
    }

    fn swap_buffers(&mut self) -> Result<()> {
        self.frames += 1;
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        self.buffer.clear();
        self.textures.clear();
        self.clip = None;
        log::info!("software backend shut down after {} frames", self.frames);
        Ok(())
    }
}
