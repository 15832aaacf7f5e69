//! Shared test utilities for pocket-ui loop tests.
//!
//! [`MockBackend`] records draw calls for assertion, [`MockPlatform`] has a
//! clock that only moves when slept on, and [`Harness`] wires both to a
//! scripted pad that raises the exit flag once it runs dry.

use std::cell::Cell;
use std::collections::HashSet;

use pocket_platform::{
    BatteryState, Clock, Controller, ExitFlag, Platform, PowerInfo, PowerService, ScriptedPad,
    SystemTime, TimeService,
};
use pocket_types::backend::{RenderBackend, TextureId};
use pocket_types::bitmap_font;
use pocket_types::color::Color;
use pocket_types::error::Result;

use crate::context::Ui;
use crate::metrics::UiMetrics;

/// A recorded draw call from the mock backend.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    FillRect {
        x: i32,
        y: i32,
        w: u32,
        h: u32,
        color: Color,
    },
    DrawText {
        text: String,
        x: i32,
        y: i32,
        color: Color,
    },
    Blit {
        tex: TextureId,
        x: i32,
        y: i32,
        w: u32,
        h: u32,
    },
    Swap,
}

/// A 480x272 backend that records everything drawn.
pub struct MockBackend {
    pub calls: Vec<DrawCall>,
    next_texture: u64,
    live: HashSet<u64>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            next_texture: 1,
            live: HashSet::new(),
        }
    }

    /// `(text, x, y)` of every text draw, in call order.
    pub fn texts(&self) -> Vec<(String, i32, i32)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::DrawText { text, x, y, .. } => Some((text.clone(), *x, *y)),
                _ => None,
            })
            .collect()
    }

    /// Check if any `DrawText` call contains the given substring.
    pub fn has_text(&self, needle: &str) -> bool {
        self.calls.iter().any(|c| match c {
            DrawCall::DrawText { text, .. } => text.contains(needle),
            _ => false,
        })
    }

    /// Color of the last draw of exactly `needle`.
    pub fn text_color(&self, needle: &str) -> Option<Color> {
        self.calls.iter().rev().find_map(|c| match c {
            DrawCall::DrawText { text, color, .. } if text == needle => Some(*color),
            _ => None,
        })
    }

    /// Number of presented frames.
    pub fn frames(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Swap))
            .count()
    }

    /// Calls recorded since the last presented frame before the final one,
    /// i.e. the contents of the last frame.
    pub fn last_frame(&self) -> &[DrawCall] {
        let end = self
            .calls
            .iter()
            .rposition(|c| matches!(c, DrawCall::Swap))
            .unwrap_or(self.calls.len());
        let start = self.calls[..end]
            .iter()
            .rposition(|c| matches!(c, DrawCall::Swap))
            .map_or(0, |i| i + 1);
        &self.calls[start..end]
    }

    /// Fill rects of the last frame with the given color.
    pub fn fills_in_last_frame(&self, color: Color) -> Vec<(i32, i32, u32, u32)> {
        self.last_frame()
            .iter()
            .filter_map(|c| match c {
                DrawCall::FillRect { x, y, w, h, color: c } if *c == color => Some((*x, *y, *w, *h)),
                _ => None,
            })
            .collect()
    }

    pub fn live_textures(&self) -> usize {
        self.live.len()
    }
}

impl RenderBackend for MockBackend {
    fn init(&mut self, _width: u32, _height: u32) -> Result<()> {
        Ok(())
    }

    fn screen_size(&self) -> (u32, u32) {
        (480, 272)
    }

    fn clear(&mut self, _color: Color) -> Result<()> {
        Ok(())
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color) -> Result<()> {
        self.calls.push(DrawCall::FillRect { x, y, w, h, color });
        Ok(())
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, color: Color) -> Result<()> {
        self.calls.push(DrawCall::DrawText {
            text: text.to_string(),
            x,
            y,
            color,
        });
        Ok(())
    }

    fn blit(&mut self, tex: TextureId, x: i32, y: i32, w: u32, h: u32) -> Result<()> {
        self.calls.push(DrawCall::Blit { tex, x, y, w, h });
        Ok(())
    }

    fn load_texture(&mut self, _width: u32, _height: u32, _rgba_data: &[u8]) -> Result<TextureId> {
        let id = self.next_texture;
        self.next_texture += 1;
        self.live.insert(id);
        Ok(TextureId(id))
    }

    fn destroy_texture(&mut self, tex: TextureId) -> Result<()> {
        self.live.remove(&tex.0);
        Ok(())
    }

    fn set_clip_rect(&mut self, _x: i32, _y: i32, _w: u32, _h: u32) -> Result<()> {
        Ok(())
    }

    fn reset_clip_rect(&mut self) -> Result<()> {
        Ok(())
    }

    fn measure_text(&self, text: &str) -> u32 {
        bitmap_font::measure_text(text, 1)
    }

    fn line_height(&self) -> u32 {
        bitmap_font::line_height(1)
    }

    fn read_pixels(&self, _x: i32, _y: i32, w: u32, h: u32) -> Result<Vec<u8>> {
        Ok(vec![0; (w * h * 4) as usize])
    }

    fn swap_buffers(&mut self) -> Result<()> {
        self.calls.push(DrawCall::Swap);
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Platform with a manual clock and a fixed wall time.
pub struct MockPlatform {
    pub ticks: Cell<u64>,
    pub power: PowerInfo,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self {
            ticks: Cell::new(0),
            power: PowerInfo::NO_BATTERY,
        }
    }
}

impl PowerService for MockPlatform {
    fn power_info(&self) -> Result<PowerInfo> {
        Ok(self.power)
    }
}

impl TimeService for MockPlatform {
    fn now(&self) -> Result<SystemTime> {
        Ok(SystemTime {
            year: 2008,
            month: 6,
            day: 21,
            hour: 12,
            minute: 30,
            second: 0,
            millisecond: 0,
        })
    }

    fn uptime_secs(&self) -> Result<u64> {
        Ok(self.ticks.get() / 1000)
    }
}

impl Clock for MockPlatform {
    fn ticks_ms(&self) -> u64 {
        self.ticks.get()
    }

    fn sleep_ms(&self, ms: u64) {
        self.ticks.set(self.ticks.get() + ms);
    }
}

impl Platform for MockPlatform {}

/// Owns everything a [`Ui`] borrows.
pub struct Harness {
    pub backend: MockBackend,
    pub pad: Controller<ScriptedPad>,
    pub platform: MockPlatform,
    pub metrics: UiMetrics,
    pub exit: ExitFlag,
}

impl Harness {
    /// A harness whose pad is already exhausted.
    pub fn new() -> Self {
        Self::with_script(|s| s)
    }

    /// A harness driven by the script built in `build`. Animations are off
    /// so frame counts stay small.
    pub fn with_script(build: impl FnOnce(ScriptedPad) -> ScriptedPad) -> Self {
        let exit = ExitFlag::new();
        let script = build(ScriptedPad::new()).then_exit(&exit);
        let mut metrics = UiMetrics::for_screen(480, 272);
        metrics.animate = false;
        Self {
            backend: MockBackend::new(),
            pad: Controller::new(script),
            platform: MockPlatform::new(),
            metrics,
            exit,
        }
    }

    pub fn discharging(mut self, percent: u8) -> Self {
        self.platform.power = PowerInfo {
            battery_percent: Some(percent),
            battery_minutes: Some(90),
            state: BatteryState::Discharging,
        };
        self
    }

    pub fn ui(&mut self) -> Ui<'_> {
        Ui::new(
            &mut self.backend,
            &mut self.pad,
            &self.platform,
            &self.metrics,
            &self.exit,
        )
    }
}
