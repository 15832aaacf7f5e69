//! The paginated menu loop.
//!
//! Items are listed one per row with their current option in a second
//! column. Pressing Right on an item with several options expands an option
//! box over that column; Up/Down then browse the options and Right/OK
//! commits, Left/Cancel backs out.

use pocket_platform::FrameLimiter;
use pocket_types::bitmap_font::{COLOR_RESTORE, COLOR_YELLOW, glyphs};
use pocket_types::color::Color;
use pocket_types::error::Result;
use pocket_types::input::Buttons;

use crate::context::{ANIM_FRAMES, ArrowBob, Ui, move_steps};
use crate::cursor::ListCursor;
use crate::menu::{Menu, MenuItem};
use crate::status::{CANCEL_PLACEHOLDER, OK_PLACEHOLDER};

/// Callbacks of [`open_menu`]. Every method has a default, so a handler only
/// overrides what it cares about.
pub trait MenuHandler {
    /// Extra drawing on top of the menu, once per frame.
    fn on_render(&mut self, _ui: &mut Ui<'_>, _item: Option<&MenuItem>) -> Result<()> {
        Ok(())
    }

    /// OK pressed on the item at `index`. Return true to close the menu.
    fn on_ok(&mut self, _ui: &mut Ui<'_>, _menu: &mut Menu, _index: usize) -> Result<bool> {
        Ok(true)
    }

    /// Cancel pressed; the menu closes afterwards.
    fn on_cancel(&mut self, _ui: &mut Ui<'_>, _item: Option<&MenuItem>) -> Result<()> {
        Ok(())
    }

    /// A control button other than Cancel pressed, including an OK that
    /// `on_ok` refused. Return true to close the menu.
    fn on_button_press(
        &mut self,
        _ui: &mut Ui<'_>,
        _menu: &mut Menu,
        _index: Option<usize>,
        _buttons: Buttons,
    ) -> Result<bool> {
        Ok(false)
    }

    /// The user picked option `option` of `item`. Return false to keep the
    /// previous choice.
    fn on_item_changed(&mut self, _ui: &mut Ui<'_>, _item: &MenuItem, _option: usize) -> Result<bool> {
        Ok(true)
    }
}

/// Handler that accepts every default.
impl MenuHandler for () {}

fn option_mode_template() -> String {
    format!(
        "{y}{}{r}/{y}{}{r} Select\t{y}{}{r}/{y}{CANCEL_PLACEHOLDER}{r} Cancel\t{y}{}{r}/{y}{OK_PLACEHOLDER}{r} Confirm",
        glyphs::UP,
        glyphs::DOWN,
        glyphs::LEFT,
        glyphs::RIGHT,
        y = COLOR_YELLOW,
        r = COLOR_RESTORE,
    )
}

/// Geometry shared by every frame of one menu invocation.
struct Layout {
    sx: i32,
    sy: i32,
    dy: i32,
    /// Row width, scrollbar excluded.
    w: i32,
    h: i32,
    fh: i32,
    lines: usize,
    /// x of the option column.
    option_x: i32,
    arrow_w: i32,
}

impl Layout {
    fn new(ui: &Ui<'_>, menu: &Menu, title: Option<&str>) -> Self {
        let m = ui.metrics;
        let fh = ui.line_height();
        let sx = m.left;
        let sy = m.top + if title.is_some() { fh + m.title_padding } else { 0 };
        let max_item_w = menu
            .iter()
            .filter_map(MenuItem::display_caption)
            .map(|c| ui.text_width(c))
            .max()
            .unwrap_or(0);
        Self {
            sx,
            sy,
            dy: m.bottom,
            w: m.right - sx - m.scrollbar_width,
            h: m.bottom - sy,
            fh,
            lines: ((m.bottom - sy) / fh).max(1) as usize,
            option_x: sx + max_item_w + m.menu_item_margin + 10,
            arrow_w: ui.text_width(&glyphs::DOWN_ARROW.to_string()),
        }
    }

    fn row_y(&self, cursor: &ListCursor) -> i32 {
        self.sy + cursor.index() as i32 * self.fh
    }
}

/// The expanded option list of the selected item.
#[derive(Debug, Clone, Copy)]
struct OptionBox {
    /// Option under the option cursor, not yet committed.
    temp: usize,
    min_x: i32,
    max_x: i32,
    min_y: i32,
    max_y: i32,
    /// Point the box grows out of.
    cur_x: i32,
    cur_y: i32,
}

impl OptionBox {
    fn new(ui: &Ui<'_>, layout: &Layout, item: &MenuItem, row_y: i32, temp: usize) -> Self {
        let margin = ui.metrics.menu_item_margin;
        let fh = layout.fh;
        let max_option_w = item
            .options
            .iter()
            .map(|o| ui.text_width(&o.text))
            .max()
            .unwrap_or(0);
        let mut cur_x = layout.option_x + ui.text_width(" >");
        if let Some(selected) = item.selected_option() {
            cur_x += ui.text_width(&selected.text);
        }

        let mut min_y = row_y;
        let mut above = temp + 1;
        while above > 0 && min_y >= layout.sy {
            min_y -= fh;
            above -= 1;
        }
        let mut max_y = row_y + fh;
        let mut below = item.options.len().saturating_sub(temp + 1);
        while below > 0 && max_y < layout.dy {
            max_y += fh;
            below -= 1;
        }
        max_y += fh;

        Self {
            temp,
            min_x: layout.option_x - margin,
            max_x: layout.option_x + max_option_w + margin,
            min_y,
            max_y,
            cur_x,
            cur_y: row_y + fh / 2,
        }
    }

    /// Rectangle at step `i` of the expansion animation.
    fn grow_rect(&self, i: i32) -> (i32, i32, u32, u32) {
        let n = ANIM_FRAMES as i32;
        let x1 = self.cur_x - ((self.cur_x - self.min_x) / n) * i;
        let y1 = self.cur_y - ((self.cur_y - self.min_y) / n) * i;
        let x2 = self.cur_x + ((self.max_x - self.cur_x) / n) * i;
        let y2 = self.cur_y + ((self.max_y - self.cur_y) / n) * i;
        (x1, y1, (x2 - x1).max(0) as u32, (y2 - y1).max(0) as u32)
    }
}

/// Per-frame state handed to the drawing helpers.
struct FrameState<'s> {
    sel: Option<usize>,
    option: Option<&'s OptionBox>,
    bob: i32,
}

fn draw_body(
    ui: &mut Ui<'_>,
    menu: &Menu,
    title: Option<&str>,
    layout: &Layout,
    cursor: &ListCursor,
    state: &FrameState<'_>,
) -> Result<()> {
    let m = ui.metrics;
    let fh = layout.fh;

    if let Some(item) = state.sel.and_then(|i| menu.item(i)) {
        if state.option.is_some() {
            ui.draw_instructions(&option_mode_template())?;
        } else if let Some(help) = item.help_text.as_deref() {
            ui.draw_instructions(help)?;
        }
    }

    if let Some(title) = title {
        ui.draw_title(title, layout.w)?;
    }

    for (row, pos) in cursor.visible().enumerate() {
        let Some(item) = menu.item(pos) else {
            continue;
        };
        let Some(caption) = item.display_caption() else {
            continue;
        };
        let j = layout.sy + row as i32 * fh;
        if item.is_header() {
            ui.backend.draw_text(caption, layout.sx, j, m.title_color)?;
            ui.backend.draw_line(
                layout.sx,
                j + fh - 1,
                layout.sx + layout.w,
                j + fh - 1,
                m.title_color,
            )?;
            continue;
        }

        let is_sel = state.sel == Some(pos);
        let color = if is_sel { m.selected_color } else { m.text_color };
        ui.backend.draw_text(caption, layout.sx + 10, j, color)?;

        if state.option.is_some() && is_sel {
            continue;
        }
        if let Some(option) = item.selected_option() {
            ui.backend.draw_text(&option.text, layout.option_x, j, color)?;
            if state.option.is_none() && is_sel && item.has_choices() {
                let k = layout.option_x + ui.text_width(&option.text);
                ui.backend
                    .draw_text(" >", k + state.bob, j, m.menu_decor_color)?;
            }
        }
    }

    ui.draw_status()?;

    let count = menu.len();
    if count > layout.lines {
        let h = layout.h;
        let sbh = h * layout.lines as i32 / count as i32;
        let sby = layout.sy + (h - sbh) * cursor.selected() as i32 / count as i32;
        ui.draw_scrollbar(layout.sy, h, sby, sbh)?;
    }
    Ok(())
}

fn draw_option_box(
    ui: &mut Ui<'_>,
    item: &MenuItem,
    layout: &Layout,
    row_y: i32,
    ob: &OptionBox,
    bob: i32,
) -> Result<()> {
    let m = ui.metrics;
    let fh = layout.fh;
    let bw = (ob.max_x - ob.min_x).max(0) as u32;
    let bh = (ob.max_y - ob.min_y).max(0) as u32;
    let arrow_x = ob.min_x + (m.menu_item_margin / 2 - layout.arrow_w / 2);

    ui.backend
        .fill_rect(ob.min_x, ob.min_y, bw, bh, m.menu_option_box_bg)?;
    ui.backend
        .fill_rect(ob.min_x, row_y, bw, fh as u32, m.menu_sel_option_bg)?;
    ui.backend
        .glow_rect(ob.min_x, ob.min_y, bw, bh, Color::WHITE, 2)?;

    // current option and the ones before it, upwards
    let mut y = row_y;
    let mut next = Some(ob.temp);
    while let Some(o) = next {
        if y < layout.sy {
            break;
        }
        let color = if o == ob.temp {
            m.selected_color
        } else {
            m.menu_option_box_color
        };
        ui.backend
            .draw_text(&item.options[o].text, layout.option_x, y, color)?;
        y -= fh;
        next = o.checked_sub(1);
    }
    if next.is_some() {
        ui.backend.draw_text(
            &glyphs::UP_ARROW.to_string(),
            arrow_x,
            y + fh + bob,
            m.menu_decor_color,
        )?;
    }

    let mut y = row_y + fh;
    let mut o = ob.temp + 1;
    while o < item.options.len() && y < layout.dy {
        ui.backend.draw_text(
            &item.options[o].text,
            layout.option_x,
            y,
            m.menu_option_box_color,
        )?;
        y += fh;
        o += 1;
    }
    if o < item.options.len() {
        ui.backend.draw_text(
            &glyphs::DOWN_ARROW.to_string(),
            arrow_x,
            y - fh - bob,
            m.menu_decor_color,
        )?;
    }
    Ok(())
}

/// Grow (`expand`) or shrink the option box of the selected item.
#[allow(clippy::too_many_arguments)]
fn animate_option_box(
    ui: &mut Ui<'_>,
    menu: &Menu,
    title: Option<&str>,
    layout: &Layout,
    cursor: &ListCursor,
    sel: usize,
    ob: &OptionBox,
    handler: &mut dyn MenuHandler,
    expand: bool,
) -> Result<()> {
    let steps: Vec<i32> = if expand {
        (0..=ANIM_FRAMES as i32).collect()
    } else {
        (0..ANIM_FRAMES as i32).rev().collect()
    };
    let item = menu.item(sel);
    let row_y = layout.row_y(cursor);
    let state = FrameState {
        sel: Some(sel),
        option: None,
        bob: 0,
    };
    for i in steps {
        ui.clear_screen()?;
        draw_body(ui, menu, title, layout, cursor, &state)?;
        handler.on_render(ui, item)?;
        let (x, y, w, h) = ob.grow_rect(i);
        ui.backend
            .fill_rect(x, y, w, h, ui.metrics.menu_option_box_bg)?;
        if !expand {
            if let Some(option) = item.and_then(MenuItem::selected_option) {
                ui.backend
                    .draw_text(&option.text, layout.option_x, row_y, ui.metrics.selected_color)?;
            }
        }
        ui.present()?;
    }
    Ok(())
}

/// Run the menu until the user leaves it.
///
/// The cursor starts on `menu.selected` when it names a selectable item,
/// else on the first selectable one. On exit `menu.selected` holds the item
/// under the cursor.
pub fn open_menu(
    ui: &mut Ui<'_>,
    menu: &mut Menu,
    title: Option<&str>,
    handler: &mut dyn MenuHandler,
) -> Result<()> {
    let m = ui.metrics;
    let mut layout = Layout::new(ui, menu, title);

    let start = menu
        .selected
        .filter(|&i| menu.item(i).is_some_and(MenuItem::is_selectable))
        .or_else(|| menu.first_selectable());
    let mut cursor = ListCursor::place(layout.lines, menu.len(), start.unwrap_or(0));
    let mut sel = start;

    let mut option_box: Option<OptionBox> = None;
    let mut bob = ArrowBob::new();
    let mut limiter = FrameLimiter::new(m.menu_fps);
    let mut last_sel: Option<usize> = None;
    let mut last_top = 0;

    log::debug!("menu: open with {} items, cursor on {sel:?}", menu.len());

    while !ui.exit_requested() {
        let Some(pad) = ui.poll() else {
            continue;
        };
        let mut b = pad.buttons;
        let frame = bob.tick(m.animate);
        let mut fast_scroll = false;

        if let Some(current) = sel {
            let selectable = |i: usize| menu.item(i).is_some_and(MenuItem::is_selectable);
            let option_count = menu.item(current).map_or(0, |i| i.options.len());

            if b.down() {
                fast_scroll = b.contains(Buttons::ANALOG_DOWN);
                match option_box.as_mut() {
                    Some(ob) if ob.temp + 1 < option_count => ob.temp += 1,
                    Some(_) => {},
                    None => {
                        cursor.next_selectable(selectable);
                    },
                }
            } else if b.up() {
                fast_scroll = b.contains(Buttons::ANALOG_UP);
                match option_box.as_mut() {
                    Some(ob) if ob.temp > 0 => ob.temp -= 1,
                    Some(_) => {},
                    None => {
                        cursor.prev_selectable(selectable);
                    },
                }
            }
            let current = cursor.selected();
            sel = Some(current);

            if let Some(ob) = option_box {
                if b.up() || b.down() {
                    if let Some(item) = menu.item(current) {
                        option_box = Some(OptionBox::new(ui, &layout, item, layout.row_y(&cursor), ob.temp));
                    }
                }
            }

            if let Some(ob) = option_box {
                let mut closed = false;
                if b.contains(Buttons::RIGHT) || b.intersects(m.ok_button) {
                    closed = true;
                    let accepted = match menu.item(current) {
                        Some(item) => handler.on_item_changed(ui, item, ob.temp)?,
                        None => false,
                    };
                    if accepted {
                        if let Some(item) = menu.item_mut(current) {
                            item.select_option_by_index(ob.temp);
                        }
                    }
                    log::debug!("menu: item {current} option {} accepted={accepted}", ob.temp);
                } else if b.contains(Buttons::LEFT) || b.intersects(m.cancel_button) {
                    closed = true;
                    b.remove(m.cancel_button);
                }
                if closed {
                    option_box = None;
                    if m.animate {
                        animate_option_box(ui, menu, title, &layout, &cursor, current, &ob, handler, false)?;
                    }
                }
            } else if b.contains(Buttons::RIGHT)
                && menu.item(current).is_some_and(MenuItem::has_choices)
            {
                if let Some(item) = menu.item(current) {
                    let temp = item.selected_option.unwrap_or(0);
                    let ob = OptionBox::new(ui, &layout, item, layout.row_y(&cursor), temp);
                    option_box = Some(ob);
                    if m.animate {
                        animate_option_box(ui, menu, title, &layout, &cursor, current, &ob, handler, true)?;
                    }
                }
            } else if b.intersects(m.ok_button) {
                // a refused OK still reaches on_button_press below
                if handler.on_ok(ui, menu, current)? {
                    break;
                }
            }
        }

        if option_box.is_none() {
            if b.intersects(m.cancel_button) {
                handler.on_cancel(ui, sel.and_then(|i| menu.item(i)))?;
                break;
            }
            let pressed = b & Buttons::CONTROL_MASK;
            if !pressed.is_empty() && handler.on_button_press(ui, menu, sel, pressed)? {
                break;
            }
        }

        // callbacks may have rebuilt the menu
        if menu.len() != cursor.len() {
            layout = Layout::new(ui, menu, title);
            let target = sel.unwrap_or(0);
            cursor = ListCursor::place(layout.lines, menu.len(), target);
            sel = sel.and(cursor.current());
        }

        let row_y = layout.row_y(&cursor);
        let state = FrameState {
            sel,
            option: option_box.as_ref(),
            bob: frame,
        };

        if option_box.is_none() && !fast_scroll && m.animate && sel.is_some() && last_sel.is_some() && last_sel != sel {
            for top in move_steps(last_top, row_y) {
                ui.clear_screen()?;
                ui.backend
                    .fill_rect(layout.sx, top, layout.w as u32, layout.fh as u32, m.selected_bg_color)?;
                draw_body(ui, menu, title, &layout, &cursor, &state)?;
                handler.on_render(ui, sel.and_then(|i| menu.item(i)))?;
                ui.present()?;
            }
        }

        ui.clear_screen()?;
        if option_box.is_none() && sel.is_some() {
            ui.backend
                .fill_rect(layout.sx, row_y, layout.w as u32, layout.fh as u32, m.selected_bg_color)?;
        }
        draw_body(ui, menu, title, &layout, &cursor, &state)?;
        handler.on_render(ui, sel.and_then(|i| menu.item(i)))?;
        if let (Some(ob), Some(item)) = (option_box.as_ref(), sel.and_then(|i| menu.item(i))) {
            draw_option_box(ui, item, &layout, row_y, ob, frame)?;
        }
        limiter.wait(ui.platform);
        ui.present()?;

        last_sel = sel;
        last_top = row_y;
    }

    menu.selected = sel;
    Ok(())
}
