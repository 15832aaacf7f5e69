//! Layout, colors and behaviour shared by every UI loop.
//!
//! [`UiMetrics`] is what the loops read. [`UiStyle`] is its TOML form:
//! every field is optional and colors are `"#RRGGBB"` / `"#RRGGBBAA"`
//! strings, so a style file only lists what it changes.

use std::path::Path;

use serde::Deserialize;

use pocket_types::color::{Color, parse_hex_color};
use pocket_types::error::{PocketError, Result};
use pocket_types::input::Buttons;

use crate::image::Icon;

/// Resolved UI metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct UiMetrics {
    /// Optional image drawn instead of clearing the screen.
    pub background: Option<Icon>,
    pub ok_button: Buttons,
    pub cancel_button: Buttons,

    /// Content area, in screen pixels.
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,

    pub scrollbar_color: Color,
    pub scrollbar_bg_color: Color,
    pub scrollbar_width: i32,

    pub text_color: Color,
    pub selected_color: Color,
    pub selected_bg_color: Color,
    pub status_bar_color: Color,
    /// Redraw rate of the menu, browser, gallery and selector loops.
    pub menu_fps: u32,

    pub browser_file_color: Color,
    pub browser_directory_color: Color,

    pub gallery_icons_per_row: u32,
    pub gallery_icon_margin_width: i32,

    /// Gap between the widest caption and the option column.
    pub menu_item_margin: i32,
    pub menu_sel_option_bg: Color,
    pub menu_option_box_color: Color,
    pub menu_option_box_bg: Color,
    pub menu_decor_color: Color,

    pub title_padding: i32,
    pub title_color: Color,
    pub animate: bool,
}

impl UiMetrics {
    /// Defaults for a screen of the given size.
    pub fn for_screen(width: u32, height: u32) -> Self {
        Self {
            background: None,
            ok_button: Buttons::CROSS,
            cancel_button: Buttons::CIRCLE,
            left: 16,
            top: 32,
            right: width as i32 - 16,
            bottom: height as i32 - 32,
            scrollbar_color: Color::rgb(0x66, 0x66, 0x66),
            scrollbar_bg_color: Color::rgba(0x44, 0x44, 0x44, 0x66),
            scrollbar_width: 6,
            text_color: Color::GRAY,
            selected_color: Color::WHITE,
            selected_bg_color: Color::rgba(0x2d, 0x6c, 0xdf, 0x99),
            status_bar_color: Color::WHITE,
            menu_fps: 30,
            browser_file_color: Color::GRAY,
            browser_directory_color: Color::YELLOW,
            gallery_icons_per_row: 4,
            gallery_icon_margin_width: 16,
            menu_item_margin: 20,
            menu_sel_option_bg: Color::rgba(0x2d, 0x6c, 0xdf, 0xcc),
            menu_option_box_color: Color::GRAY,
            menu_option_box_bg: Color::rgba(0x10, 0x10, 0x18, 0xee),
            menu_decor_color: Color::YELLOW,
            title_padding: 4,
            title_color: Color::rgb(0x5f, 0xa8, 0xff),
            animate: true,
        }
    }
}

impl Default for UiMetrics {
    fn default() -> Self {
        Self::for_screen(960, 544)
    }
}

/// TOML overlay for [`UiMetrics`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UiStyle {
    pub ok_button: Option<Buttons>,
    pub cancel_button: Option<Buttons>,
    pub left: Option<i32>,
    pub top: Option<i32>,
    pub right: Option<i32>,
    pub bottom: Option<i32>,
    pub scrollbar_color: Option<String>,
    pub scrollbar_bg_color: Option<String>,
    pub scrollbar_width: Option<i32>,
    pub text_color: Option<String>,
    pub selected_color: Option<String>,
    pub selected_bg_color: Option<String>,
    pub status_bar_color: Option<String>,
    pub menu_fps: Option<u32>,
    pub browser_file_color: Option<String>,
    pub browser_directory_color: Option<String>,
    pub gallery_icons_per_row: Option<u32>,
    pub gallery_icon_margin_width: Option<i32>,
    pub menu_item_margin: Option<i32>,
    pub menu_sel_option_bg: Option<String>,
    pub menu_option_box_color: Option<String>,
    pub menu_option_box_bg: Option<String>,
    pub menu_decor_color: Option<String>,
    pub title_padding: Option<i32>,
    pub title_color: Option<String>,
    pub animate: Option<bool>,
}

/// Parse an optional hex color, keeping `base` when absent or malformed.
fn color(value: &Option<String>, base: Color, field: &str) -> Color {
    match value.as_deref() {
        None => base,
        Some(s) => parse_hex_color(s).unwrap_or_else(|| {
            log::warn!("style: ignoring malformed color {s:?} for {field}");
            base
        }),
    }
}

impl UiStyle {
    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Overlay this style on `base`.
    ///
    /// Fails when the resulting content area is empty or the OK and Cancel
    /// buttons are not two distinct face buttons.
    pub fn apply(&self, base: UiMetrics) -> Result<UiMetrics> {
        let m = UiMetrics {
            background: base.background,
            ok_button: self.ok_button.unwrap_or(base.ok_button),
            cancel_button: self.cancel_button.unwrap_or(base.cancel_button),
            left: self.left.unwrap_or(base.left),
            top: self.top.unwrap_or(base.top),
            right: self.right.unwrap_or(base.right),
            bottom: self.bottom.unwrap_or(base.bottom),
            scrollbar_color: color(&self.scrollbar_color, base.scrollbar_color, "scrollbar_color"),
            scrollbar_bg_color: color(
                &self.scrollbar_bg_color,
                base.scrollbar_bg_color,
                "scrollbar_bg_color",
            ),
            scrollbar_width: self.scrollbar_width.unwrap_or(base.scrollbar_width),
            text_color: color(&self.text_color, base.text_color, "text_color"),
            selected_color: color(&self.selected_color, base.selected_color, "selected_color"),
            selected_bg_color: color(
                &self.selected_bg_color,
                base.selected_bg_color,
                "selected_bg_color",
            ),
            status_bar_color: color(&self.status_bar_color, base.status_bar_color, "status_bar_color"),
            menu_fps: self.menu_fps.unwrap_or(base.menu_fps),
            browser_file_color: color(
                &self.browser_file_color,
                base.browser_file_color,
                "browser_file_color",
            ),
            browser_directory_color: color(
                &self.browser_directory_color,
                base.browser_directory_color,
                "browser_directory_color",
            ),
            gallery_icons_per_row: self.gallery_icons_per_row.unwrap_or(base.gallery_icons_per_row),
            gallery_icon_margin_width: self
                .gallery_icon_margin_width
                .unwrap_or(base.gallery_icon_margin_width),
            menu_item_margin: self.menu_item_margin.unwrap_or(base.menu_item_margin),
            menu_sel_option_bg: color(
                &self.menu_sel_option_bg,
                base.menu_sel_option_bg,
                "menu_sel_option_bg",
            ),
            menu_option_box_color: color(
                &self.menu_option_box_color,
                base.menu_option_box_color,
                "menu_option_box_color",
            ),
            menu_option_box_bg: color(
                &self.menu_option_box_bg,
                base.menu_option_box_bg,
                "menu_option_box_bg",
            ),
            menu_decor_color: color(&self.menu_decor_color, base.menu_decor_color, "menu_decor_color"),
            title_padding: self.title_padding.unwrap_or(base.title_padding),
            title_color: color(&self.title_color, base.title_color, "title_color"),
            animate: self.animate.unwrap_or(base.animate),
        };

        if m.right <= m.left || m.bottom <= m.top {
            return Err(PocketError::Config(format!(
                "empty content area ({}, {}) - ({}, {})",
                m.left, m.top, m.right, m.bottom
            )));
        }
        let per_row = m.gallery_icons_per_row as i32;
        let margin = m.gallery_icon_margin_width;
        let grid_w = m.right - m.left - m.scrollbar_width;
        if per_row < 1 || margin < 0 || grid_w - margin * (per_row - 1) < per_row {
            return Err(PocketError::Config(format!(
                "{per_row} gallery icons with margin {margin} do not fit in {grid_w} pixels"
            )));
        }
        let face = Buttons::CROSS | Buttons::CIRCLE | Buttons::SQUARE | Buttons::TRIANGLE;
        let single_face = |b: Buttons| b.bits().count_ones() == 1 && face.contains(b);
        if !single_face(m.ok_button) || !single_face(m.cancel_button) || m.ok_button == m.cancel_button {
            return Err(PocketError::Config(format!(
                "ok/cancel must be two distinct face buttons, got {:?} / {:?}",
                m.ok_button, m.cancel_button
            )));
        }
        Ok(m)
    }
}
