//! Icon grid loop.
//!
//! Items of a [`Menu`] are laid out as icons, `gallery_icons_per_row` to a
//! row, one screen at a time. The selected icon is drawn enlarged on top of
//! the grid with its caption underneath.

use pocket_platform::FrameLimiter;
use pocket_types::color::Color;
use pocket_types::error::Result;
use pocket_types::input::Buttons;

use crate::context::{FOG_ALPHA, Ui};
use crate::cursor::GridCursor;
use crate::menu::{Menu, MenuItem};

/// Icon size assumed when no item carries an icon.
const DEFAULT_ICON_SIZE: (u32, u32) = (272, 228);

/// Callbacks of [`open_gallery`].
pub trait GalleryHandler {
    fn on_render(&mut self, _ui: &mut Ui<'_>, _item: Option<&MenuItem>) -> Result<()> {
        Ok(())
    }

    /// OK pressed on the icon at `index`. Return true to close the gallery.
    fn on_ok(&mut self, _ui: &mut Ui<'_>, _menu: &mut Menu, _index: usize) -> Result<bool> {
        Ok(true)
    }

    /// Cancel pressed; the gallery closes afterwards.
    fn on_cancel(&mut self, _ui: &mut Ui<'_>, _item: Option<&MenuItem>) -> Result<()> {
        Ok(())
    }

    /// Another control button pressed. Return true to close the gallery.
    fn on_button_press(
        &mut self,
        _ui: &mut Ui<'_>,
        _menu: &mut Menu,
        _index: Option<usize>,
        _buttons: Buttons,
    ) -> Result<bool> {
        Ok(false)
    }
}

impl GalleryHandler for () {}

/// Grid geometry for one menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Layout {
    sx: i32,
    sy: i32,
    dx: i32,
    dy: i32,
    w: i32,
    h: i32,
    fh: i32,
    per_row: usize,
    icon_w: i32,
    icon_h: i32,
    grid_w: i32,
    grid_h: i32,
    rows: usize,
    vis_v: usize,
    vis_s: usize,
    max_w: i32,
    max_h: i32,
}

impl Layout {
    fn new(ui: &Ui<'_>, menu: &Menu, title: Option<&str>) -> Self {
        let m = ui.metrics;
        let fh = ui.line_height();
        let (orig_w, orig_h) = menu
            .iter()
            .find_map(|i| i.icon)
            .map(|icon| (icon.width, icon.height))
            .filter(|&(w, h)| w > 0 && h > 0)
            .unwrap_or(DEFAULT_ICON_SIZE);

        let sx = m.left;
        let sy = m.top + if title.is_some() { fh + m.title_padding } else { 0 };
        let dx = m.right;
        let dy = m.bottom;
        let w = dx - sx - m.scrollbar_width;
        let h = dy - sy;

        let per_row = m.gallery_icons_per_row.max(1) as usize;
        let margin = m.gallery_icon_margin_width;
        let icon_w = ((w - margin * (per_row as i32 - 1)) / per_row as i32).max(1);
        let icon_h = ((icon_w as f32 / (orig_w as f32 / orig_h as f32)) as i32).max(1);
        let grid_h = icon_h + fh * 2;
        let vis_v = if grid_h > 0 { (h / grid_h).max(1) as usize } else { 1 };

        Self {
            sx,
            sy,
            dx,
            dy,
            w,
            h,
            fh,
            per_row,
            icon_w,
            icon_h,
            grid_w: icon_w + margin,
            grid_h,
            rows: menu.len().div_ceil(per_row),
            vis_v,
            vis_s: per_row * vis_v,
            max_w: (icon_w as f32 * 1.5) as i32,
            max_h: (icon_h as f32 * 1.5) as i32,
        }
    }

    /// Row count the scrollbar is scaled against.
    fn scroll_rows(&self) -> i32 {
        ((self.rows + self.rows % self.vis_v) as i32).max(1)
    }

    /// Height of the scrollbar thumb. The bar is hidden when this reaches `h`.
    fn thumb_height(&self) -> i32 {
        self.vis_v as i32 * self.h / self.scroll_rows()
    }

    fn thumb_y(&self, offset: usize) -> i32 {
        self.sy + (offset / self.per_row) as i32 * self.h / self.scroll_rows()
    }

    /// Top-left corner of the `cell`-th icon on the screen.
    fn cell_origin(&self, cell: usize) -> (i32, i32) {
        let col = (cell % self.per_row) as i32;
        let row = (cell / self.per_row) as i32;
        (self.sx + col * self.grid_w, self.sy + row * self.grid_h)
    }

    /// Center of the enlarged icon for `cell`, kept inside the content area.
    fn enlarged_center(&self, ui: &Ui<'_>, cell: usize) -> (i32, i32) {
        let (x, y) = self.cell_origin(cell);
        let (half_w, half_h) = (self.max_w / 2, self.max_h / 2);
        let mut left = x + self.icon_w / 2;
        let mut top = y + self.icon_h / 2;
        if left - half_w < self.sx {
            left = self.sx + half_w;
        }
        if top - half_h < ui.metrics.top {
            top = ui.metrics.top + half_h;
        }
        if left + half_w > self.dx {
            left = self.dx - half_w;
        }
        if top + half_h > self.dy {
            top = self.dy - half_h;
        }
        (left, top)
    }
}

/// Background plus the plain icons of the current screen, except `skip`.
fn draw_icons(ui: &mut Ui<'_>, menu: &Menu, layout: &Layout, cursor: &GridCursor, skip: Option<usize>) -> Result<()> {
    ui.clear_screen()?;
    for (cell, pos) in cursor.visible().enumerate() {
        if Some(pos) == skip {
            continue;
        }
        if let Some(icon) = menu.item(pos).and_then(|i| i.icon) {
            let (x, y) = layout.cell_origin(cell);
            ui.backend
                .blit(icon.texture, x, y, layout.icon_w as u32, layout.icon_h as u32)?;
        }
    }
    Ok(())
}

/// One frame of an icon growing or shrinking between grid and enlarged size.
fn draw_transition(
    ui: &mut Ui<'_>,
    menu: &Menu,
    layout: &Layout,
    cursor: &GridCursor,
    pos: usize,
    center: (i32, i32),
) -> Result<()> {
    let Some(icon) = menu.item(pos).and_then(|i| i.icon) else {
        return Ok(());
    };
    draw_icons(ui, menu, layout, cursor, Some(pos))?;
    let w = layout.icon_w + (layout.max_w - layout.icon_w) / 2;
    let h = layout.icon_h + (layout.max_h - layout.icon_h) / 2;
    ui.backend
        .blit(icon.texture, center.0 - w / 2, center.1 - h / 2, w as u32, h as u32)?;
    ui.present()
}

fn draw_gallery(
    ui: &mut Ui<'_>,
    menu: &Menu,
    title: Option<&str>,
    layout: &Layout,
    cursor: &GridCursor,
    sel: Option<usize>,
    center: (i32, i32),
) -> Result<()> {
    let m = ui.metrics;
    let l = layout;
    draw_icons(ui, menu, l, cursor, sel)?;

    if let Some(title) = title {
        ui.draw_title(title, l.w)?;
    }

    let thumb_h = l.thumb_height();
    if thumb_h < l.h {
        ui.draw_scrollbar(l.sy, l.h, l.thumb_y(cursor.offset()), thumb_h)?;
    }

    if let Some(help) = sel.and_then(|i| menu.item(i)).and_then(|i| i.help_text.as_deref()) {
        ui.draw_instructions(help)?;
    }

    for (cell, pos) in cursor.visible().enumerate() {
        if Some(pos) == sel {
            continue;
        }
        let Some(item) = menu.item(pos) else {
            continue;
        };
        let (x, y) = l.cell_origin(cell);
        let (fw, fh) = ((l.icon_w + 1) as u32, (l.icon_h + 1) as u32);
        ui.backend.shadow_rect(x - 1, y - 1, fw, fh, Color::BLACK, 3)?;
        ui.backend.stroke_rect(x - 1, y - 1, fw, fh, m.text_color)?;
        if let Some(caption) = item.display_caption() {
            let cx = x + l.icon_w / 2 - ui.text_width(caption) / 2;
            ui.backend
                .draw_text(caption, cx, y + l.icon_h + l.fh / 2, m.text_color)?;
        }
    }

    if let Some(item) = sel.and_then(|i| menu.item(i)) {
        let (left, top) = center;
        let (x, y) = (left - l.max_w / 2, top - l.max_h / 2);
        if let Some(icon) = item.icon {
            ui.backend
                .blit(icon.texture, x, y, l.max_w as u32, l.max_h as u32)?;
            ui.backend.glow_rect(
                x,
                y,
                l.max_w as u32,
                l.max_h as u32,
                Color::WHITE.with_alpha(FOG_ALPHA),
                2,
            )?;
        }
        if let Some(caption) = item.display_caption() {
            let ascent = ui.backend.font_ascent() as i32;
            let cx = left - ui.text_width(caption) / 2;
            let cy = top + l.max_h / 2 - (l.fh + (l.fh - ascent));
            ui.backend.draw_text(caption, cx, cy, m.text_color)?;
        }
    }

    ui.draw_status()
}

/// Show `menu` as an icon grid until OK is accepted, Cancel is pressed, a
/// button callback asks to close or the exit flag is raised.
///
/// Starts on `menu.selected` and stores the final selection back there.
pub fn open_gallery(
    ui: &mut Ui<'_>,
    menu: &mut Menu,
    title: Option<&str>,
    handler: &mut dyn GalleryHandler,
) -> Result<()> {
    let m = ui.metrics;
    let mut layout = Layout::new(ui, menu, title);
    let start = menu.selected.filter(|&i| i < menu.len()).unwrap_or(0);
    let mut cursor = GridCursor::place(layout.per_row, layout.vis_s, menu.len(), start);
    let mut limiter = FrameLimiter::new(m.menu_fps);
    let mut last: Option<(usize, (i32, i32))> = None;

    log::debug!(
        "gallery: {} icons, {}x{} per screen",
        menu.len(),
        layout.per_row,
        layout.vis_v
    );

    while !ui.exit_requested() {
        let Some(pad) = ui.poll() else {
            continue;
        };
        let mut b = pad.buttons;

        if let Some(sel) = cursor.current() {
            if b.contains(Buttons::RIGHT) {
                cursor.next();
            } else if b.contains(Buttons::LEFT) {
                cursor.prev();
            } else if b.contains(Buttons::DOWN) {
                cursor.down();
            } else if b.contains(Buttons::UP) {
                cursor.up();
            }

            if b.intersects(m.ok_button) {
                b.remove(m.ok_button);
                let sel = cursor.current().unwrap_or(sel);
                log::debug!("gallery: ok on {sel}");
                if handler.on_ok(ui, menu, sel)? {
                    break;
                }
            }
        }

        if b.intersects(m.cancel_button) {
            handler.on_cancel(ui, cursor.current().and_then(|i| menu.item(i)))?;
            break;
        }
        let pressed = b & Buttons::CONTROL_MASK;
        if !pressed.is_empty() && handler.on_button_press(ui, menu, cursor.current(), pressed)? {
            break;
        }

        // callbacks may have rebuilt the menu
        if menu.len() != cursor.len() {
            layout = Layout::new(ui, menu, title);
            cursor = GridCursor::place(layout.per_row, layout.vis_s, menu.len(), cursor.selected());
            last = None;
        }

        let sel = cursor.current();
        let center = layout.enlarged_center(ui, cursor.index());

        if m.animate {
            if let (Some((prev, prev_center)), Some(pos)) = (last, sel) {
                if prev != pos && menu.item(pos).is_some_and(|i| i.icon.is_some()) {
                    draw_transition(ui, menu, &layout, &cursor, prev, prev_center)?;
                    draw_transition(ui, menu, &layout, &cursor, pos, center)?;
                }
            }
        }

        draw_gallery(ui, menu, title, &layout, &cursor, sel, center)?;
        handler.on_render(ui, sel.and_then(|i| menu.item(i)))?;
        limiter.wait(ui.platform);
        ui.present()?;

        last = sel.map(|pos| (pos, center));
    }

    menu.selected = cursor.current();
    Ok(())
}
