//! The context every UI loop runs in.

use pocket_platform::{ExitFlag, InputSource, Platform};
use pocket_types::backend::{RenderBackend, TextureId};
use pocket_types::color::Color;
use pocket_types::error::Result;
use pocket_types::input::PadState;

use crate::metrics::UiMetrics;
use crate::status;

/// Frames in the open/close animations of dialogs and option boxes.
pub const ANIM_FRAMES: u32 = 8;
/// Fog alpha added per animation frame.
pub const ANIM_FOG_STEP: u8 = 0x0f;

/// Fog alpha once an overlay is fully open.
pub const FOG_ALPHA: u8 = ANIM_FOG_STEP * ANIM_FRAMES as u8;
/// Frames spent sliding the highlight to a new row.
pub const MOVE_FRAMES: i32 = 4;

/// Intermediate highlight positions when the selection moves from `from`
/// to `to`, the last one being `to` up to integer rounding.
pub(crate) fn move_steps(from: i32, to: i32) -> impl Iterator<Item = i32> {
    let step = (from - to) / MOVE_FRAMES;
    (1..=MOVE_FRAMES).map(move |f| from - step * f)
}

/// Bobbing offset for the scroll arrows: 0, 1, 2, 3, 2, 1, 0, -1, 0 ...
#[derive(Debug, Clone, Copy)]
pub(crate) struct ArrowBob {
    frame: i32,
    incr: i32,
}

impl ArrowBob {
    pub(crate) fn new() -> Self {
        Self { frame: 0, incr: 1 }
    }

    pub(crate) fn tick(&mut self, animate: bool) -> i32 {
        if animate {
            self.frame += self.incr;
        }
        if self.frame > 2 || self.frame < 0 {
            self.incr = -self.incr;
        }
        self.frame
    }

    pub(crate) fn frame(&self) -> i32 {
        self.frame
    }
}

/// Borrowed handles a loop needs: where to draw, where to read input,
/// the clock and power services, the style, and the exit flag.
pub struct Ui<'a> {
    pub backend: &'a mut dyn RenderBackend,
    pub input: &'a mut dyn InputSource,
    pub platform: &'a dyn Platform,
    pub metrics: &'a UiMetrics,
    pub exit: &'a ExitFlag,
}

/// A copy of the screen kept as a texture so animations can redraw what
/// was underneath.
#[derive(Debug)]
pub struct ScreenCopy {
    texture: TextureId,
    width: u32,
    height: u32,
}

impl<'a> Ui<'a> {
    pub fn new(
        backend: &'a mut dyn RenderBackend,
        input: &'a mut dyn InputSource,
        platform: &'a dyn Platform,
        metrics: &'a UiMetrics,
        exit: &'a ExitFlag,
    ) -> Self {
        Self {
            backend,
            input,
            platform,
            metrics,
            exit,
        }
    }

    pub fn exit_requested(&self) -> bool {
        self.exit.is_requested()
    }

    /// Sample the pad at the current time.
    pub fn poll(&mut self) -> Option<PadState> {
        let now = self.platform.ticks_ms();
        self.input.poll(now)
    }

    /// Screen size as signed pixel coordinates.
    pub fn screen(&self) -> (i32, i32) {
        let (w, h) = self.backend.screen_size();
        (w as i32, h as i32)
    }

    pub fn line_height(&self) -> i32 {
        self.backend.line_height() as i32
    }

    pub fn text_width(&self, text: &str) -> i32 {
        self.backend.measure_text(text) as i32
    }

    /// Substitute the OK/Cancel placeholders for this style's buttons.
    pub fn replace_icons(&self, text: &str) -> String {
        status::replace_icons(text, self.metrics.ok_button, self.metrics.cancel_button)
    }

    /// Start a frame with the background image, or black without one.
    pub fn clear_screen(&mut self) -> Result<()> {
        self.backend.begin_frame()?;
        match self.metrics.background {
            Some(bg) => {
                self.backend.clear(Color::BLACK)?;
                self.backend.blit(bg.texture, 0, 0, bg.width, bg.height)
            },
            None => self.backend.clear(Color::BLACK),
        }
    }

    /// Finish the frame and show it.
    pub fn present(&mut self) -> Result<()> {
        self.backend.end_frame()?;
        self.backend.wait_vsync()?;
        self.backend.swap_buffers()
    }

    /// Title text at the top of the content area, underlined across `w`.
    pub fn draw_title(&mut self, title: &str, w: i32) -> Result<()> {
        let m = self.metrics;
        let fh = self.line_height();
        self.backend.draw_text(title, m.left, m.top, m.title_color)?;
        self.backend
            .draw_line(m.left, m.top + fh - 1, m.left + w, m.top + fh - 1, m.title_color)
    }

    /// Help line centered at the bottom of the screen, icons substituted.
    pub fn draw_instructions(&mut self, text: &str) -> Result<()> {
        let (sw, sh) = self.screen();
        let fh = self.line_height();
        let text = self.replace_icons(text);
        self.backend
            .draw_text_centered(&text, 0, sh - fh, sw as u32, self.metrics.status_bar_color)
    }

    /// Clock and battery, right-aligned on the top line.
    pub fn draw_status(&mut self) -> Result<()> {
        let time = self.platform.now()?;
        let power = self.platform.power_info()?;
        let text = status::status_string(&time, &power);
        let (sw, _) = self.screen();
        let x = sw - self.text_width(&text);
        self.backend.draw_text(&text, x, 0, Color::WHITE)
    }

    /// Vertical scrollbar at the right edge of the content area.
    pub fn draw_scrollbar(&mut self, top: i32, height: i32, thumb_y: i32, thumb_h: i32) -> Result<()> {
        let m = self.metrics;
        let x = m.right - m.scrollbar_width;
        let w = m.scrollbar_width.max(0) as u32;
        self.backend
            .fill_rect(x, top, w, height.max(0) as u32, m.scrollbar_bg_color)?;
        self.backend
            .fill_rect(x, thumb_y, w, thumb_h.max(0) as u32, m.scrollbar_color)
    }

    /// Grab the current screen contents.
    pub fn capture(&mut self) -> Result<ScreenCopy> {
        let (width, height) = self.backend.screen_size();
        let pixels = self.backend.read_pixels(0, 0, width, height)?;
        let texture = self.backend.load_texture(width, height, &pixels)?;
        Ok(ScreenCopy {
            texture,
            width,
            height,
        })
    }

    /// Start a frame showing a captured screen.
    pub fn restore(&mut self, copy: &ScreenCopy) -> Result<()> {
        self.backend.begin_frame()?;
        self.backend
            .blit(copy.texture, 0, 0, copy.width, copy.height)
    }

    /// Free a captured screen.
    pub fn release(&mut self, copy: ScreenCopy) -> Result<()> {
        self.backend.destroy_texture(copy.texture)
    }
}
