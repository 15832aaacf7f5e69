//! SDL2 backend for pocket.
//!
//! [`SdlBackend`] implements `RenderBackend` on an SDL2 window canvas and
//! [`SdlPad`] turns keyboard state into pad samples. Both come out of
//! [`open`], which owns the SDL context setup.

mod keymap;

use std::collections::HashMap;

use sdl2::EventPump;
use sdl2::event::Event;
use sdl2::pixels::PixelFormatEnum;
use sdl2::rect::Rect;
use sdl2::render::{BlendMode, Canvas, Texture, TextureCreator};
use sdl2::video::{Window, WindowContext};

use pocket_platform::ExitFlag;
use pocket_types::backend::{PadSource, RenderBackend, TextureId};
use pocket_types::bitmap_font;
use pocket_types::color::Color;
use pocket_types::error::{PocketError, Result};
use pocket_types::input::{Buttons, PadState};

pub use keymap::button_for;

fn backend_err(e: impl ToString) -> PocketError {
    PocketError::Backend(e.to_string())
}

/// Create the window and the keyboard pad. Closing the window raises `exit`.
pub fn open(
    title: &str,
    width: u32,
    height: u32,
    font_scale: u32,
    exit: &ExitFlag,
) -> Result<(SdlBackend, SdlPad)> {
    let sdl = sdl2::init().map_err(backend_err)?;
    let video = sdl.video().map_err(backend_err)?;
    let window = video
        .window(title, width, height)
        .position_centered()
        .build()
        .map_err(backend_err)?;
    let canvas = window
        .into_canvas()
        .accelerated()
        .present_vsync()
        .build()
        .map_err(backend_err)?;
    let texture_creator = canvas.texture_creator();
    let event_pump = sdl.event_pump().map_err(backend_err)?;

    log::info!("SDL2 backend initialized: {width}x{height}");

    let backend = SdlBackend {
        canvas,
        textures: HashMap::new(),
        texture_creator,
        next_texture_id: 1,
        width,
        height,
        font_scale: font_scale.max(1),
    };
    let pad = SdlPad {
        event_pump,
        held: Buttons::empty(),
        exit: exit.clone(),
    };
    Ok((backend, pad))
}

/// SDL2 rendering backend.
///
/// # Safety
///
/// `textures` is declared before `texture_creator` so that Rust's drop order
/// (declaration order) destroys all textures before the creator they borrow from.
/// The `Texture<'static>` lifetime is erased via transmute in `load_texture()`;
/// this is sound because the `TextureCreator` always outlives the textures.
pub struct SdlBackend {
    canvas: Canvas<Window>,
    textures: HashMap<u64, Texture<'static>>,
    texture_creator: TextureCreator<WindowContext>,
    next_texture_id: u64,
    width: u32,
    height: u32,
    font_scale: u32,
}

impl SdlBackend {
    /// Set the SDL draw color, blending only when the color is translucent.
    fn set_color(&mut self, color: Color) {
        let mode = if color.a < 255 { BlendMode::Blend } else { BlendMode::None };
        self.canvas.set_blend_mode(mode);
        self.canvas
            .set_draw_color(sdl2::pixels::Color::RGBA(color.r, color.g, color.b, color.a));
    }
}

impl RenderBackend for SdlBackend {
    fn init(&mut self, width: u32, height: u32) -> Result<()> {
        self.canvas
            .set_logical_size(width, height)
            .map_err(backend_err)?;
        self.width = width;
        self.height = height;
        Ok(())
    }

    fn screen_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self, color: Color) -> Result<()> {
        self.canvas
            .set_draw_color(sdl2::pixels::Color::RGBA(color.r, color.g, color.b, color.a));
        self.canvas.clear();
        Ok(())
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color) -> Result<()> {
        if w == 0 || h == 0 {
            return Ok(());
        }
        self.set_color(color);
        self.canvas
            .fill_rect(Rect::new(x, y, w, h))
            .map_err(backend_err)
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, color: Color) -> Result<()> {
        let scale = self.font_scale;
        let mut blocks = Vec::new();
        bitmap_font::rasterize(text, x, y, scale, color, |px, py, ink| {
            blocks.push((px, py, ink));
        });
        let mut current = None;
        for (px, py, ink) in blocks {
            if current != Some(ink) {
                self.set_color(ink);
                current = Some(ink);
            }
            self.canvas
                .fill_rect(Rect::new(px, py, scale, scale))
                .map_err(backend_err)?;
        }
        Ok(())
    }

    fn blit(&mut self, tex: TextureId, x: i32, y: i32, w: u32, h: u32) -> Result<()> {
        if w == 0 || h == 0 {
            return Ok(());
        }
        let texture = self
            .textures
            .get(&tex.0)
            .ok_or_else(|| PocketError::Backend(format!("texture not found: {}", tex.0)))?;
        self.canvas
            .copy(texture, None, Rect::new(x, y, w, h))
            .map_err(backend_err)
    }

    fn load_texture(&mut self, width: u32, height: u32, rgba_data: &[u8]) -> Result<TextureId> {
        let expected = (width * height * 4) as usize;
        if rgba_data.len() != expected {
            return Err(PocketError::Backend(format!(
                "texture data size mismatch: expected {expected}, got {}",
                rgba_data.len()
            )));
        }

        let mut texture = self
            .texture_creator
            .create_texture_streaming(PixelFormatEnum::ABGR8888, width, height)
            .map_err(backend_err)?;

        let row = (width * 4) as usize;
        texture
            .with_lock(None, |buffer: &mut [u8], pitch: usize| {
                for (y, src) in rgba_data.chunks_exact(row).enumerate() {
                    buffer[y * pitch..y * pitch + row].copy_from_slice(src);
                }
            })
            .map_err(backend_err)?;
        texture.set_blend_mode(BlendMode::Blend);

        // SAFETY: The texture borrows from self.texture_creator which lives in the
        // same struct. `textures` is declared before `texture_creator`, so Rust drops
        // textures first. The erased lifetime is therefore always valid.
        let texture: Texture<'static> = unsafe { std::mem::transmute(texture) };

        let id = self.next_texture_id;
        self.next_texture_id += 1;
        self.textures.insert(id, texture);
        log::debug!("loaded texture {id} ({width}x{height})");
        Ok(TextureId(id))
    }

    fn destroy_texture(&mut self, tex: TextureId) -> Result<()> {
        self.textures.remove(&tex.0);
        Ok(())
    }

    fn set_clip_rect(&mut self, x: i32, y: i32, w: u32, h: u32) -> Result<()> {
        self.canvas.set_clip_rect(Rect::new(x, y, w.max(1), h.max(1)));
        Ok(())
    }

    fn reset_clip_rect(&mut self) -> Result<()> {
        self.canvas.set_clip_rect(None);
        Ok(())
    }

    fn measure_text(&self, text: &str) -> u32 {
        bitmap_font::measure_text(text, self.font_scale)
    }

    fn line_height(&self) -> u32 {
        bitmap_font::line_height(self.font_scale)
    }

    fn read_pixels(&self, x: i32, y: i32, w: u32, h: u32) -> Result<Vec<u8>> {
        self.canvas
            .read_pixels(Rect::new(x, y, w, h), PixelFormatEnum::ABGR8888)
            .map_err(backend_err)
    }

    fn swap_buffers(&mut self) -> Result<()> {
        self.canvas.present();
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        self.textures.clear();
        log::info!("SDL2 backend shut down");
        Ok(())
    }
}

/// Keyboard-driven pad. Every sample drains the SDL event queue and
/// reports the keys currently held.
pub struct SdlPad {
    event_pump: EventPump,
    held: Buttons,
    exit: ExitFlag,
}

impl SdlPad {
    pub fn held(&self) -> Buttons {
        self.held
    }
}

impl PadSource for SdlPad {
    fn peek(&mut self) -> Option<PadState> {
        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => {
                    log::info!("window closed");
                    self.exit.request();
                },
                Event::KeyDown {
                    keycode: Some(key), ..
                } => {
                    if let Some(b) = button_for(key) {
                        self.held.insert(b);
                    }
                },
                Event::KeyUp {
                    keycode: Some(key), ..
                } => {
                    if let Some(b) = button_for(key) {
                        self.held.remove(b);
                    }
                },
                _ => {},
            }
        }
        Some(PadState::new(self.held))
    }
}
