//! Modal dialogs: alert, confirm, yes/no/cancel, flash message, the
//! side-panel selector and the fade to black.
//!
//! Every dialog draws over a copy of the screen it was opened on. With
//! animation enabled the box grows out of the screen centre and shrinks
//! back when dismissed; the exit animation is skipped when the exit flag
//! was raised.

use pocket_platform::FrameLimiter;
use pocket_types::bitmap_font::{COLOR_RESTORE, COLOR_YELLOW, glyphs};
use pocket_types::color::Color;
use pocket_types::error::Result;
use pocket_types::input::Buttons;

use crate::context::{
    ANIM_FOG_STEP, ANIM_FRAMES, ArrowBob, FOG_ALPHA, ScreenCopy, Ui, move_steps,
};
use crate::cursor::ListCursor;
use crate::menu::{Menu, MenuItem};
use crate::status::{CANCEL_PLACEHOLDER, OK_PLACEHOLDER};

/// Answer from [`yes_no_cancel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogResult {
    Yes,
    No,
    Cancel,
}

fn alert_template() -> String {
    format!(
        "{COLOR_YELLOW}{OK_PLACEHOLDER}{COLOR_RESTORE}/{COLOR_YELLOW}{CANCEL_PLACEHOLDER}{COLOR_RESTORE} Close"
    )
}

fn confirm_template() -> String {
    format!(
        "{COLOR_YELLOW}{OK_PLACEHOLDER}{COLOR_RESTORE} Confirm\t{COLOR_YELLOW}{CANCEL_PLACEHOLDER}{COLOR_RESTORE} Cancel"
    )
}

fn yes_no_cancel_template() -> String {
    format!(
        "{COLOR_YELLOW}{OK_PLACEHOLDER}{COLOR_RESTORE} Yes\t{COLOR_YELLOW}{}{COLOR_RESTORE} No\t{COLOR_YELLOW}{CANCEL_PLACEHOLDER}{COLOR_RESTORE} Cancel",
        glyphs::SQUARE
    )
}

/// Placement of a centered message box.
#[derive(Debug, Clone, Copy)]
struct MessageBox {
    x: i32,
    y: i32,
    w: i32,
    h: i32,
}

impl MessageBox {
    fn centered(ui: &Ui<'_>, w: i32, h: i32) -> Self {
        let (sw, sh) = ui.screen();
        Self {
            x: sw / 2 - w / 2,
            y: sh / 2 - h / 2,
            w,
            h,
        }
    }

    /// One frame of the grow/shrink animation at step `i` of
    /// [`ANIM_FRAMES`].
    fn draw_step(&self, ui: &mut Ui<'_>, copy: &ScreenCopy, i: u32) -> Result<()> {
        let (sw, sh) = ui.screen();
        let n = ANIM_FRAMES as i32;
        let bw = (self.w / n) * i as i32;
        let bh = (self.h / n) * i as i32;
        let bg = ui.metrics.menu_option_box_bg;
        ui.restore(copy)?;
        ui.backend
            .dim_screen(Color::BLACK.with_alpha(ANIM_FOG_STEP * i as u8))?;
        ui.backend.fill_rect(
            sw / 2 - bw / 2,
            sh / 2 - bh / 2,
            bw as u32,
            bh as u32,
            bg.with_alpha(((0xff / ANIM_FRAMES) * i) as u8),
        )?;
        ui.present()
    }

    /// Fogged screen plus the empty box, ready for text.
    fn draw_frame(&self, ui: &mut Ui<'_>, copy: Option<&ScreenCopy>) -> Result<()> {
        match copy {
            Some(copy) => ui.restore(copy)?,
            None => ui.backend.begin_frame()?,
        }
        ui.backend.dim_screen(Color::BLACK.with_alpha(FOG_ALPHA))?;
        ui.backend.fill_rect(
            self.x,
            self.y,
            self.w as u32,
            self.h as u32,
            ui.metrics.menu_option_box_bg,
        )
    }

    fn draw_glow(&self, ui: &mut Ui<'_>) -> Result<()> {
        ui.backend
            .glow_rect(self.x, self.y, self.w as u32, self.h as u32, Color::WHITE, 2)
    }
}

/// Capture the screen and play the intro when animation is on.
fn open(ui: &mut Ui<'_>, mbox: &MessageBox) -> Result<Option<ScreenCopy>> {
    if !ui.metrics.animate {
        return Ok(None);
    }
    let copy = ui.capture()?;
    for i in 0..ANIM_FRAMES {
        mbox.draw_step(ui, &copy, i)?;
    }
    Ok(Some(copy))
}

/// Play the exit animation unless exiting, then free the copy.
fn close(ui: &mut Ui<'_>, mbox: &MessageBox, copy: Option<ScreenCopy>) -> Result<()> {
    let Some(copy) = copy else {
        return Ok(());
    };
    if !ui.exit_requested() {
        for i in (0..ANIM_FRAMES).rev() {
            mbox.draw_step(ui, &copy, i)?;
        }
    }
    ui.release(copy)
}

/// Block until one of `accept` is pressed. `None` when exiting.
fn wait_for(ui: &mut Ui<'_>, accept: Buttons) -> Option<Buttons> {
    while !ui.exit_requested() {
        let Some(pad) = ui.poll() else {
            continue;
        };
        if pad.buttons.intersects(accept) {
            return Some(pad.buttons);
        }
    }
    None
}

/// Show `message` with a button legend, wait for one of `accept`.
fn run_message_dialog(
    ui: &mut Ui<'_>,
    message: &str,
    template: &str,
    accept: Buttons,
) -> Result<Option<Buttons>> {
    let instr = ui.replace_icons(template);
    let fh = ui.line_height();
    let mw = ui.text_width(message);
    let cw = ui.text_width(&instr);
    let th = ui.backend.text_height(message) as i32;
    let mbox = MessageBox::centered(ui, mw.max(cw) + 50, th + fh * 3);

    let copy = open(ui, &mbox)?;

    let (sw, _) = ui.screen();
    let text_color = ui.metrics.text_color;
    mbox.draw_frame(ui, copy.as_ref())?;
    ui.backend
        .draw_text(message, sw / 2 - mw / 2, mbox.y + fh / 2, text_color)?;
    ui.backend.draw_text(
        &instr,
        sw / 2 - cw / 2,
        mbox.y + mbox.h - fh * 3 / 2,
        text_color,
    )?;
    mbox.draw_glow(ui)?;
    ui.present()?;

    let pressed = wait_for(ui, accept);
    close(ui, &mbox, copy)?;
    Ok(pressed)
}

/// Show `message` until OK or Cancel is pressed.
pub fn alert(ui: &mut Ui<'_>, message: &str) -> Result<()> {
    let accept = ui.metrics.ok_button | ui.metrics.cancel_button;
    run_message_dialog(ui, message, &alert_template(), accept)?;
    Ok(())
}

/// Ask for confirmation. True only when OK was pressed.
pub fn confirm(ui: &mut Ui<'_>, message: &str) -> Result<bool> {
    let ok = ui.metrics.ok_button;
    let accept = ok | ui.metrics.cancel_button;
    let pressed = run_message_dialog(ui, message, &confirm_template(), accept)?;
    Ok(pressed.is_some_and(|b| b.intersects(ok)))
}

/// Ask a yes/no question that can also be cancelled. Square answers No.
///
/// Cancel wins when several accepted buttons arrive together, then No.
pub fn yes_no_cancel(ui: &mut Ui<'_>, message: &str) -> Result<DialogResult> {
    let cancel = ui.metrics.cancel_button;
    let accept = ui.metrics.ok_button | cancel | Buttons::SQUARE;
    let pressed = run_message_dialog(ui, message, &yes_no_cancel_template(), accept)?;
    Ok(match pressed {
        None => DialogResult::Cancel,
        Some(b) if b.intersects(cancel) => DialogResult::Cancel,
        Some(b) if b.contains(Buttons::SQUARE) => DialogResult::No,
        Some(_) => DialogResult::Yes,
    })
}

/// Show `message` in a box and return immediately, leaving it on screen.
pub fn flash_message(ui: &mut Ui<'_>, message: &str) -> Result<()> {
    let fh = ui.line_height();
    let mw = ui.text_width(message);
    let mh = ui.backend.text_height(message) as i32;
    let mbox = MessageBox::centered(ui, mw + 50, mh + fh * 2);

    let copy = open(ui, &mbox)?;
    let text_color = ui.metrics.text_color;
    mbox.draw_frame(ui, copy.as_ref())?;
    ui.backend
        .draw_text_centered(message, mbox.x, mbox.y + fh, mbox.w as u32, text_color)?;
    mbox.draw_glow(ui)?;
    ui.present()?;

    if let Some(copy) = copy {
        ui.release(copy)?;
    }
    Ok(())
}

/// Fade the current screen to black.
pub fn fadeout(ui: &mut Ui<'_>) -> Result<()> {
    let copy = ui.capture()?;
    for i in 0..ANIM_FRAMES as i32 {
        ui.restore(&copy)?;
        let alpha = (0x100 / ANIM_FRAMES as i32) * i - 1;
        if alpha > 0 {
            ui.backend.dim_screen(Color::BLACK.with_alpha(alpha as u8))?;
        }
        ui.present()?;
    }
    ui.release(copy)
}

fn selector_template() -> String {
    confirm_template()
}

/// Layout of the selector side panel.
struct SelectPanel<'t> {
    title: Option<&'t str>,
    help: String,
    /// Panel width.
    widest: i32,
    sx: i32,
    sy: i32,
    dy: i32,
    arrow_w: i32,
}

impl SelectPanel<'_> {
    fn slide(&self, ui: &mut Ui<'_>, copy: &ScreenCopy, i: u32) -> Result<()> {
        let (sw, sh) = ui.screen();
        let x = sw - i as i32 * (self.widest / ANIM_FRAMES as i32);
        ui.restore(copy)?;
        ui.backend
            .dim_screen(Color::BLACK.with_alpha(ANIM_FOG_STEP * i as u8))?;
        ui.backend.fill_rect(
            x,
            0,
            (sw - x) as u32,
            sh as u32,
            ui.metrics.menu_option_box_bg,
        )?;
        ui.present()
    }

    fn draw(
        &self,
        ui: &mut Ui<'_>,
        copy: &ScreenCopy,
        menu: &Menu,
        cursor: &ListCursor,
        highlight_top: Option<i32>,
        bob: i32,
    ) -> Result<()> {
        let m = ui.metrics;
        let (sw, sh) = ui.screen();
        let fh = ui.line_height();
        let w = self.widest;

        ui.restore(copy)?;
        ui.backend.dim_screen(Color::BLACK.with_alpha(FOG_ALPHA))?;
        ui.backend
            .fill_rect(self.sx, 0, w as u32, sh as u32, m.menu_option_box_bg)?;
        if let Some(top) = highlight_top {
            ui.backend
                .fill_rect(self.sx, top, w as u32, fh as u32, m.selected_bg_color)?;
        }
        ui.backend
            .glow_rect(self.sx, 0, w as u32, sh as u32, Color::WHITE, 2)?;

        if let Some(title) = self.title {
            ui.backend
                .draw_text_centered(title, self.sx, 0, w as u32, m.title_color)?;
        }

        let selected = cursor.current();
        let visible = cursor.visible();
        let more_below = visible.end < menu.len();
        for (row, pos) in visible.enumerate() {
            let Some(caption) = menu.item(pos).and_then(MenuItem::display_caption) else {
                continue;
            };
            let color = if Some(pos) == selected {
                m.selected_color
            } else {
                m.text_color
            };
            let y = self.sy + row as i32 * fh;
            ui.backend
                .draw_text_clipped(caption, self.sx + 10, y, (w - 10) as u32, color)?;
        }

        let arrow_x = sw - self.arrow_w * 2;
        if cursor.offset() > 0 {
            ui.backend.draw_text(
                &glyphs::UP_ARROW.to_string(),
                arrow_x,
                self.sy + bob,
                m.menu_decor_color,
            )?;
        }
        if more_below {
            ui.backend.draw_text(
                &glyphs::DOWN_ARROW.to_string(),
                arrow_x,
                self.dy - fh - bob,
                m.menu_decor_color,
            )?;
        }

        ui.backend
            .draw_text_centered(&self.help, self.sx, sh - fh, w as u32, m.status_bar_color)
    }
}

/// Pick an item from `menu` in a panel sliding in from the right.
///
/// Returns the position of the chosen item, `None` on Cancel or exit.
/// The cursor starts on the first item; headers are listed like any other
/// item.
pub fn select(ui: &mut Ui<'_>, title: Option<&str>, menu: &Menu) -> Result<Option<usize>> {
    let m = ui.metrics;
    let (sw, _) = ui.screen();
    let fh = ui.line_height();

    let widest = menu
        .iter()
        .filter_map(MenuItem::display_caption)
        .map(|c| ui.text_width(c))
        .fold(100, i32::max)
        + m.menu_item_margin * 2;
    let panel = SelectPanel {
        title,
        help: ui.replace_icons(&selector_template()),
        widest,
        sx: sw - widest,
        sy: m.top,
        dy: m.bottom,
        arrow_w: ui.text_width(&glyphs::DOWN_ARROW.to_string()),
    };
    let lines = ((panel.dy - panel.sy) / fh).max(1) as usize;
    let mut cursor = ListCursor::new(lines, menu.len());
    let mut bob = ArrowBob::new();
    let mut limiter = FrameLimiter::new(m.menu_fps);
    let mut last_top: Option<i32> = None;
    let mut chosen = None;

    let copy = ui.capture()?;
    if m.animate {
        for i in 0..ANIM_FRAMES {
            panel.slide(ui, &copy, i)?;
        }
    }

    while !ui.exit_requested() {
        let Some(pad) = ui.poll() else {
            continue;
        };
        let b = pad.buttons;
        let frame = bob.tick(m.animate);
        let mut fast_scroll = false;

        if !cursor.is_empty() {
            if b.down() && cursor.step_next() {
                fast_scroll = b.contains(Buttons::ANALOG_DOWN);
            } else if b.up() && cursor.step_prev() {
                fast_scroll = b.contains(Buttons::ANALOG_UP);
            } else if b.contains(Buttons::LEFT) {
                cursor.page_prev();
            } else if b.contains(Buttons::RIGHT) {
                cursor.page_next();
            }
            if b.intersects(m.ok_button) {
                chosen = cursor.current();
                break;
            }
        }
        if b.intersects(m.cancel_button) {
            break;
        }

        let sel_top = cursor
            .current()
            .map(|_| panel.sy + cursor.index() as i32 * fh);
        if let (Some(from), Some(to)) = (last_top, sel_top) {
            if from != to && !fast_scroll && m.animate {
                for top in move_steps(from, to) {
                    panel.draw(ui, &copy, menu, &cursor, Some(top), frame)?;
                    ui.present()?;
                }
            }
        }
        panel.draw(ui, &copy, menu, &cursor, sel_top, frame)?;
        limiter.wait(ui.platform);
        ui.present()?;
        last_top = sel_top;
    }

    if m.animate {
        for i in (0..ANIM_FRAMES).rev() {
            panel.slide(ui, &copy, i)?;
        }
    }
    ui.release(copy)?;

    if let Some(pos) = chosen {
        log::debug!("selector: picked item {pos}");
    }
    Ok(chosen)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::MenuItemDef;
    use crate::test_utils::{DrawCall, Harness};

    fn fruit() -> Menu {
        Menu::from_defs(&[
            MenuItemDef::item("Apple", 1, &[], None, None),
            MenuItemDef::item("Banana", 2, &[], None, None),
            MenuItemDef::item("Cherry", 3, &[], None, None),
        ])
    }

    #[test]
    fn confirm_ok_is_true() {
        let mut h = Harness::with_script(|s| s.press(Buttons::CROSS));
        assert!(confirm(&mut h.ui(), "Overwrite?").unwrap());
        assert!(h.backend.has_text("Overwrite?"));
        assert!(h.backend.has_text("Confirm"));
    }

    #[test]
    fn confirm_cancel_is_false() {
        let mut h = Harness::with_script(|s| s.idle(3).press(Buttons::CIRCLE));
        assert!(!confirm(&mut h.ui(), "Overwrite?").unwrap());
    }

    #[test]
    fn confirm_ignores_other_buttons() {
        let mut h = Harness::with_script(|s| s.press(Buttons::SQUARE).press(Buttons::CROSS));
        assert!(confirm(&mut h.ui(), "Sure?").unwrap());
    }

    #[test]
    fn confirm_on_exit_is_false() {
        let mut h = Harness::with_script(|s| s.idle(2));
        assert!(!confirm(&mut h.ui(), "Sure?").unwrap());
        assert!(h.exit.is_requested());
    }

    #[test]
    fn yes_no_cancel_maps_buttons() {
        let mut h = Harness::with_script(|s| s.press(Buttons::CROSS));
        assert_eq!(yes_no_cancel(&mut h.ui(), "Save?").unwrap(), DialogResult::Yes);
        let mut h = Harness::with_script(|s| s.press(Buttons::SQUARE));
        assert_eq!(yes_no_cancel(&mut h.ui(), "Save?").unwrap(), DialogResult::No);
        let mut h = Harness::with_script(|s| s.press(Buttons::CIRCLE));
        assert_eq!(yes_no_cancel(&mut h.ui(), "Save?").unwrap(), DialogResult::Cancel);
        let mut h = Harness::with_script(|s| s.press(Buttons::CIRCLE | Buttons::SQUARE));
        assert_eq!(yes_no_cancel(&mut h.ui(), "Save?").unwrap(), DialogResult::Cancel);
        let mut h = Harness::new();
        assert_eq!(yes_no_cancel(&mut h.ui(), "Save?").unwrap(), DialogResult::Cancel);
    }

    #[test]
    fn swapped_buttons_swap_legend_and_meaning() {
        let mut h = Harness::with_script(|s| s.press(Buttons::CIRCLE));
        h.metrics.ok_button = Buttons::CIRCLE;
        h.metrics.cancel_button = Buttons::CROSS;
        assert!(confirm(&mut h.ui(), "Sure?").unwrap());
        let legend = format!("{COLOR_YELLOW}{}{COLOR_RESTORE} Confirm", glyphs::CIRCLE);
        assert!(h.backend.has_text(&legend));
    }

    #[test]
    fn alert_box_geometry() {
        let mut h = Harness::with_script(|s| s.press(Buttons::CROSS));
        alert(&mut h.ui(), "Disk full").unwrap();
        let texts = h.backend.texts();
        let (_, x, y) = texts.iter().find(|t| t.0 == "Disk full").unwrap().clone();
        // 9 chars of 8px, centered on a 480 wide screen
        assert_eq!(x, 240 - 36);
        // box height is 4 lines of 10px, message half a line below its top
        assert_eq!(y, 136 - 20 + 5);
        let bg = h.metrics.menu_option_box_bg;
        assert!(h.backend.calls.iter().any(|c| matches!(
            c,
            DrawCall::FillRect { y: 116, h: 40, color, .. } if *color == bg
        )));
    }

    #[test]
    fn animated_dialog_plays_both_animations() {
        let mut h = Harness::with_script(|s| s.press(Buttons::CROSS));
        h.metrics.animate = true;
        alert(&mut h.ui(), "Hi").unwrap();
        // intro, final frame, exit
        assert_eq!(h.backend.frames(), 8 + 1 + 8);
        assert_eq!(h.backend.live_textures(), 0);
    }

    #[test]
    fn exit_skips_close_animation() {
        let mut h = Harness::new();
        h.metrics.animate = true;
        alert(&mut h.ui(), "Hi").unwrap();
        assert_eq!(h.backend.frames(), 8 + 1);
        assert_eq!(h.backend.live_textures(), 0);
    }

    #[test]
    fn flash_message_returns_without_input() {
        let mut h = Harness::with_script(|s| s.press(Buttons::CROSS));
        flash_message(&mut h.ui(), "Saving...").unwrap();
        assert!(h.backend.has_text("Saving..."));
        assert_eq!(h.backend.frames(), 1);
        assert_eq!(h.pad.source_mut().remaining(), 2);
    }

    #[test]
    fn fadeout_darkens_progressively() {
        let mut h = Harness::new();
        fadeout(&mut h.ui()).unwrap();
        assert_eq!(h.backend.frames(), 8);
        let alphas: Vec<u8> = h
            .backend
            .calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::FillRect { color, .. } => Some(color.a),
                _ => None,
            })
            .collect();
        assert_eq!(alphas, vec![31, 63, 95, 127, 159, 191, 223]);
        assert_eq!(h.backend.live_textures(), 0);
    }

    #[test]
    fn select_returns_chosen_position() {
        let mut h = Harness::with_script(|s| s.press(Buttons::DOWN).press(Buttons::DOWN).press(Buttons::CROSS));
        let menu = fruit();
        assert_eq!(select(&mut h.ui(), Some("Fruit"), &menu).unwrap(), Some(2));
        assert!(h.backend.has_text("Fruit"));
    }

    #[test]
    fn select_stops_at_ends() {
        let mut h = Harness::with_script(|s| {
            s.press(Buttons::UP)
                .press(Buttons::DOWN)
                .press(Buttons::DOWN)
                .press(Buttons::DOWN)
                .press(Buttons::DOWN)
                .press(Buttons::CROSS)
        });
        assert_eq!(select(&mut h.ui(), None, &fruit()).unwrap(), Some(2));
    }

    #[test]
    fn select_cancel_and_exit_give_none() {
        let mut h = Harness::with_script(|s| s.press(Buttons::DOWN).press(Buttons::CIRCLE));
        assert_eq!(select(&mut h.ui(), None, &fruit()).unwrap(), None);
        let mut h = Harness::with_script(|s| s.idle(1));
        assert_eq!(select(&mut h.ui(), None, &fruit()).unwrap(), None);
        assert_eq!(h.backend.live_textures(), 0);
    }

    #[test]
    fn select_on_empty_menu_only_cancels() {
        let mut h = Harness::with_script(|s| s.press(Buttons::CROSS).press(Buttons::CIRCLE));
        assert_eq!(select(&mut h.ui(), None, &Menu::new()).unwrap(), None);
        // the OK press did not end the loop
        assert!(!h.exit.is_requested());
    }

    #[test]
    fn select_panel_hugs_right_edge() {
        let mut h = Harness::with_script(|s| s.idle(1).press(Buttons::CIRCLE));
        select(&mut h.ui(), None, &fruit()).unwrap();
        let bg = h.metrics.menu_option_box_bg;
        // captions are narrower than the 100px minimum, plus two 20px margins
        assert!(h.backend.calls.iter().any(|c| matches!(
            c,
            DrawCall::FillRect { x: 340, y: 0, w: 140, h: 272, color } if *color == bg
        )));
        let texts = h.backend.texts();
        assert!(texts.iter().any(|(t, x, y)| t == "Apple" && *x == 350 && *y == 32));
        assert_eq!(h.backend.text_color("Apple"), Some(h.metrics.selected_color));
        assert_eq!(h.backend.text_color("Banana"), Some(h.metrics.text_color));
    }

    #[test]
    fn select_pages_long_lists() {
        let mut menu = Menu::new();
        for i in 0..50 {
            menu.append_item(Some(&format!("Item {i}")), i);
        }
        // 208px tall list area holds 20 rows; a page step is 10
        let mut h = Harness::with_script(|s| s.press(Buttons::RIGHT).press(Buttons::RIGHT).press(Buttons::LEFT).press(Buttons::CROSS));
        assert_eq!(select(&mut h.ui(), None, &menu).unwrap(), Some(10));
        let mut h = Harness::with_script(|s| s.hold(Buttons::DOWN, 25).press(Buttons::CROSS));
        assert_eq!(select(&mut h.ui(), None, &menu).unwrap(), Some(25));
        assert!(h.backend.has_text(&glyphs::UP_ARROW.to_string()));
    }
}
