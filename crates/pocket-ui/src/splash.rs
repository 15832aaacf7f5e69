//! Full-screen splash loop. The caller draws everything in `on_render`;
//! the loop only supplies the background, the status line and input.

use pocket_types::bitmap_font::{COLOR_RESTORE, COLOR_YELLOW, glyphs};
use pocket_types::error::Result;
use pocket_types::input::Buttons;

use crate::context::Ui;

pub trait SplashHandler {
    fn on_render(&mut self, _ui: &mut Ui<'_>) -> Result<()> {
        Ok(())
    }

    /// Cancel pressed; the splash closes afterwards.
    fn on_cancel(&mut self, _ui: &mut Ui<'_>) -> Result<()> {
        Ok(())
    }

    /// A control button other than Cancel. Return true to close.
    fn on_button_press(&mut self, _ui: &mut Ui<'_>, _buttons: Buttons) -> Result<bool> {
        Ok(false)
    }

    /// Text of the bottom line; `None` keeps the tab switching hint.
    fn status_bar_text(&self) -> Option<String> {
        None
    }
}

impl SplashHandler for () {}

fn default_status() -> String {
    let (y, r) = (COLOR_YELLOW, COLOR_RESTORE);
    format!("{y}{}{r}/{y}{}{r} Switch tabs", glyphs::LTRIGGER, glyphs::RTRIGGER)
}

/// Run the splash loop until Cancel, a closing button callback or exit.
pub fn splash_screen(ui: &mut Ui<'_>, handler: &mut dyn SplashHandler) -> Result<()> {
    let m = ui.metrics;
    let fh = ui.line_height();
    let (_, sh) = ui.screen();

    while !ui.exit_requested() {
        let Some(pad) = ui.poll() else {
            continue;
        };
        let b = pad.buttons;

        if b.intersects(m.cancel_button) {
            log::debug!("splash: cancelled");
            handler.on_cancel(ui)?;
            break;
        }
        let pressed = b & Buttons::CONTROL_MASK;
        if !pressed.is_empty() && handler.on_button_press(ui, pressed)? {
            break;
        }

        ui.clear_screen()?;
        let text = handler.status_bar_text().unwrap_or_else(default_status);
        ui.backend.draw_text_centered(
            &text,
            m.left,
            sh - fh,
            (m.right - m.left).max(0) as u32,
            m.status_bar_color,
        )?;
        ui.draw_status()?;
        handler.on_render(ui)?;
        ui.present()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::Harness;

    #[derive(Default)]
    struct Tabs {
        tab: usize,
        renders: usize,
        cancelled: bool,
        label: Option<String>,
    }

    impl SplashHandler for Tabs {
        fn on_render(&mut self, ui: &mut Ui<'_>) -> Result<()> {
            self.renders += 1;
            ui.backend
                .draw_text(&format!("tab {}", self.tab), 100, 100, ui.metrics.text_color)
        }

        fn on_cancel(&mut self, _ui: &mut Ui<'_>) -> Result<()> {
            self.cancelled = true;
            Ok(())
        }

        fn on_button_press(&mut self, _ui: &mut Ui<'_>, buttons: Buttons) -> Result<bool> {
            if buttons.contains(Buttons::RTRIGGER) {
                self.tab += 1;
            }
            Ok(buttons.contains(Buttons::START))
        }

        fn status_bar_text(&self) -> Option<String> {
            self.label.clone()
        }
    }

    #[test]
    fn default_hint_and_custom_drawing() {
        let mut h = Harness::with_script(|s| s.press(Buttons::RTRIGGER));
        let mut tabs = Tabs::default();
        splash_screen(&mut h.ui(), &mut tabs).unwrap();
        assert!(h.backend.has_text("Switch tabs"));
        assert!(h.backend.has_text(&glyphs::LTRIGGER.to_string()));
        assert!(h.backend.has_text("tab 1"));
        assert_eq!(tabs.renders, 2);
        assert!(!tabs.cancelled);
    }

    #[test]
    fn cancel_closes_without_drawing() {
        let mut h = Harness::with_script(|s| s.press(Buttons::CIRCLE).idle(2));
        let mut tabs = Tabs::default();
        splash_screen(&mut h.ui(), &mut tabs).unwrap();
        assert!(tabs.cancelled);
        assert_eq!(h.backend.frames(), 0);
        assert!(!h.exit.is_requested());
    }

    #[test]
    fn button_callback_closes() {
        let mut h = Harness::with_script(|s| s.idle(1).press(Buttons::START).idle(2));
        let mut tabs = Tabs {
            label: Some("Press START".to_string()),
            ..Tabs::default()
        };
        splash_screen(&mut h.ui(), &mut tabs).unwrap();
        assert_eq!(h.backend.frames(), 1);
        assert!(h.backend.has_text("Press START"));
        assert!(!h.backend.has_text("Switch tabs"));
    }
}
