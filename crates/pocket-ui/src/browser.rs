//! File browser loop over a [`Vfs`].

use pocket_fs::path::{enter_directory, file_name, is_root_directory, parent_directory};
use pocket_fs::{Vfs, list_files};
use pocket_platform::FrameLimiter;
use pocket_types::bitmap_font::{COLOR_RESTORE, COLOR_YELLOW, glyphs};
use pocket_types::error::Result;
use pocket_types::input::Buttons;

use crate::context::{Ui, move_steps};
use crate::cursor::ListCursor;
use crate::menu::Menu;
use crate::status::{CANCEL_PLACEHOLDER, OK_PLACEHOLDER};

/// `MenuItem::param` flag marking a directory entry.
pub const PARAM_DIRECTORY: u32 = 0x10;

/// Callbacks of [`FileBrowser::open`].
pub trait BrowserHandler {
    /// Extra drawing on top of the listing of `dir`.
    fn on_render(&mut self, _ui: &mut Ui<'_>, _dir: &str) -> Result<()> {
        Ok(())
    }

    /// A file was opened. Return true to close the browser.
    fn on_ok(&mut self, _ui: &mut Ui<'_>, _file: &str) -> Result<bool> {
        Ok(true)
    }

    /// Cancel pressed in `dir`; the browser closes afterwards.
    fn on_cancel(&mut self, _ui: &mut Ui<'_>, _dir: &str) -> Result<()> {
        Ok(())
    }

    /// Another control button pressed with `path` under the cursor. Return
    /// true to close the browser.
    fn on_button_press(
        &mut self,
        _ui: &mut Ui<'_>,
        _path: Option<&str>,
        _buttons: Buttons,
    ) -> Result<bool> {
        Ok(false)
    }
}

impl BrowserHandler for () {}

/// Instruction line for the entry under the cursor.
fn instructions(has_parent: bool, is_dir: bool) -> String {
    let (y, r) = (COLOR_YELLOW, COLOR_RESTORE);
    let action = if is_dir { "Enter directory" } else { "Open" };
    let mut text = format!("{y}{CANCEL_PLACEHOLDER}{r} Cancel\t{y}{OK_PLACEHOLDER}{r} {action}");
    if has_parent {
        text.push_str(&format!("\t{y}{}{r} Parent directory", glyphs::TRIANGLE));
    }
    text
}

/// Contents of one directory as shown by the browser.
struct Listing {
    menu: Menu,
    has_parent: bool,
    /// Entry the cursor starts on.
    selected: usize,
}

/// A file browser rooted in a [`Vfs`], optionally restricted to some file
/// extensions. Directories are always listed.
pub struct FileBrowser<'a> {
    vfs: &'a dyn Vfs,
    filter: Option<&'a [&'a str]>,
    default_path: &'a str,
}

impl<'a> FileBrowser<'a> {
    /// Browser that opens in `default_path` (a directory, with trailing `/`)
    /// when no start path is given.
    pub fn new(vfs: &'a dyn Vfs, default_path: &'a str) -> Self {
        Self {
            vfs,
            filter: None,
            default_path,
        }
    }

    /// Only list files with one of these extensions.
    pub fn with_filter(mut self, extensions: &'a [&'a str]) -> Self {
        self.filter = Some(extensions);
        self
    }

    pub fn filter(&self) -> Option<&'a [&'a str]> {
        self.filter
    }

    fn load(&self, dir: &str, preselect: Option<&str>) -> Listing {
        let mut menu = Menu::new();
        let has_parent = !is_root_directory(dir);
        if has_parent {
            menu.append_item(Some(".."), 0).param = PARAM_DIRECTORY;
        }

        let mut preselected = None;
        match list_files(self.vfs, dir, self.filter) {
            Ok(entries) => {
                for entry in entries.iter().filter(|e| !e.name.starts_with('.')) {
                    let item = menu.append_item(Some(&entry.name), 0);
                    if entry.is_dir() {
                        item.param = PARAM_DIRECTORY;
                    }
                    if preselect == Some(entry.name.as_str()) {
                        preselected = Some(menu.len() - 1);
                    }
                }
            },
            Err(e) => log::warn!("browser: cannot list {dir}: {e}"),
        }

        let selected = preselected.unwrap_or(if menu.len() > 1 { 1 } else { 0 });
        log::debug!("browser: {dir} has {} entries", menu.len());
        Listing {
            menu,
            has_parent,
            selected,
        }
    }

    /// Browse until a file is accepted, Cancel is pressed or the exit flag
    /// is raised.
    ///
    /// Starts in the directory part of `start_path` (the default path when
    /// `None`) with its file part preselected.
    pub fn open(
        &self,
        ui: &mut Ui<'_>,
        start_path: Option<&str>,
        handler: &mut dyn BrowserHandler,
    ) -> Result<()> {
        let m = ui.metrics;
        let fh = ui.line_height();
        let sx = m.left;
        let sy = m.top + fh + m.title_padding;
        let dx = m.right;
        let dy = m.bottom;
        let w = dx - sx - m.scrollbar_width;
        let h = dy - sy;
        let lines = (h / fh).max(1) as usize;
        let (_, sh) = ui.screen();

        let start = start_path.unwrap_or(self.default_path);
        let mut cur_path = parent_directory(start).unwrap_or("/").to_string();
        let mut cur_file = Some(file_name(start).to_string()).filter(|f| !f.is_empty());
        let mut limiter = FrameLimiter::new(m.menu_fps);

        'browse: while !ui.exit_requested() {
            let listing = self.load(&cur_path, cur_file.take().as_deref());
            let menu = &listing.menu;
            let mut cursor = ListCursor::place(lines, menu.len(), listing.selected);
            let mut last_top: Option<i32> = None;

            while !ui.exit_requested() {
                let Some(pad) = ui.poll() else {
                    continue;
                };
                let b = pad.buttons;
                let mut fast_scroll = false;

                if let Some(sel) = cursor.current() {
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
                        let sel = cursor.current().unwrap_or(sel);
                        if let Some(item) = menu.item(sel) {
                            let name = item.caption.as_deref().unwrap_or_default();
                            if item.param & PARAM_DIRECTORY != 0 {
                                cur_path = enter_directory(&cur_path, name);
                                log::debug!("browser: enter {cur_path}");
                                continue 'browse;
                            }
                            let file = format!("{cur_path}{name}");
                            log::debug!("browser: open {file}");
                            if handler.on_ok(ui, &file)? {
                                break 'browse;
                            }
                            continue;
                        }
                    }
                }

                if b.contains(Buttons::TRIANGLE) {
                    if !is_root_directory(&cur_path) {
                        cur_path = enter_directory(&cur_path, "..");
                        continue 'browse;
                    }
                } else if b.intersects(m.cancel_button) {
                    handler.on_cancel(ui, &cur_path)?;
                    break 'browse;
                } else if b.intersects(Buttons::CONTROL_MASK) {
                    let path = cursor
                        .current()
                        .and_then(|i| menu.item(i))
                        .and_then(|i| i.caption.as_deref())
                        .map(|name| format!("{cur_path}{name}"));
                    if handler.on_button_press(ui, path.as_deref(), b & Buttons::CONTROL_MASK)? {
                        break 'browse;
                    }
                }

                let sel = cursor.current();
                let sel_top = sel.map(|_| sy + cursor.index() as i32 * fh);
                let is_dir = sel
                    .and_then(|i| menu.item(i))
                    .is_some_and(|i| i.param & PARAM_DIRECTORY != 0);
                let help = ui.replace_icons(&instructions(listing.has_parent, is_dir));

                let mut draw = |ui: &mut Ui<'_>, highlight: Option<i32>| -> Result<()> {
                    ui.clear_screen()?;
                    if let Some(top) = highlight {
                        ui.backend
                            .fill_rect(sx, top, w as u32, fh as u32, m.selected_bg_color)?;
                    }
                    ui.draw_title(&cur_path, w)?;
                    ui.backend.draw_text_centered(
                        &help,
                        sx,
                        sh - fh,
                        (dx - sx) as u32,
                        m.status_bar_color,
                    )?;
                    if menu.len() > lines {
                        let sbh = h * lines as i32 / menu.len() as i32;
                        let sby = sy + (h - sbh) * cursor.selected() as i32 / menu.len() as i32;
                        ui.draw_scrollbar(sy, h, sby, sbh)?;
                    }
                    for (row, pos) in cursor.visible().enumerate() {
                        let Some(item) = menu.item(pos) else {
                            continue;
                        };
                        let color = if Some(pos) == sel {
                            m.selected_color
                        } else if item.param & PARAM_DIRECTORY != 0 {
                            m.browser_directory_color
                        } else {
                            m.browser_file_color
                        };
                        ui.backend.draw_text_clipped(
                            item.caption.as_deref().unwrap_or_default(),
                            sx + 10,
                            sy + row as i32 * fh,
                            (w - 10) as u32,
                            color,
                        )?;
                    }
                    ui.draw_status()?;
                    handler.on_render(ui, &cur_path)
                };

                if let (Some(from), Some(to)) = (last_top, sel_top) {
                    if from != to && !fast_scroll && m.animate {
                        for top in move_steps(from, to) {
                            draw(ui, Some(top))?;
                            ui.present()?;
                        }
                    }
                }
                draw(ui, sel_top)?;
                limiter.wait(ui.platform);
                ui.present()?;
                last_top = sel_top;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::Harness;
    use pocket_fs::MemoryVfs;

    fn tree() -> MemoryVfs {
        MemoryVfs::with_tree(&[
            ("/roms/", ""),
            ("/roms/snes/", ""),
            ("/roms/zelda.smc", "z"),
            ("/roms/mario.smc", "m"),
            ("/roms/.hidden.smc", "h"),
            ("/roms/notes.txt", "n"),
            ("/saves/", ""),
            ("/readme.txt", "r"),
        ])
        .unwrap()
    }

    #[derive(Default)]
    struct Recorder {
        opened: Vec<String>,
        cancelled_in: Option<String>,
        pressed: Vec<(Option<String>, Buttons)>,
        accept: bool,
        rendered_dirs: Vec<String>,
    }

    impl BrowserHandler for Recorder {
        fn on_render(&mut self, _ui: &mut Ui<'_>, dir: &str) -> Result<()> {
            if self.rendered_dirs.last().map(String::as_str) != Some(dir) {
                self.rendered_dirs.push(dir.to_string());
            }
            Ok(())
        }

        fn on_ok(&mut self, _ui: &mut Ui<'_>, file: &str) -> Result<bool> {
            self.opened.push(file.to_string());
            Ok(self.accept)
        }

        fn on_cancel(&mut self, _ui: &mut Ui<'_>, dir: &str) -> Result<()> {
            self.cancelled_in = Some(dir.to_string());
            Ok(())
        }

        fn on_button_press(&mut self, _ui: &mut Ui<'_>, path: Option<&str>, buttons: Buttons) -> Result<bool> {
            self.pressed.push((path.map(str::to_string), buttons));
            Ok(false)
        }
    }

    #[test]
    fn preselects_start_file_and_opens_it() {
        let vfs = tree();
        let browser = FileBrowser::new(&vfs, "/").with_filter(&["smc"]);
        let mut h = Harness::with_script(|s| s.press(Buttons::CROSS));
        let mut rec = Recorder {
            accept: true,
            ..Recorder::default()
        };
        browser
            .open(&mut h.ui(), Some("/roms/zelda.smc"), &mut rec)
            .unwrap();
        assert_eq!(rec.opened, vec!["/roms/zelda.smc"]);
    }

    #[test]
    fn listing_order_filter_and_hidden_files() {
        let vfs = tree();
        let browser = FileBrowser::new(&vfs, "/").with_filter(&["smc"]);
        let listing = browser.load("/roms/", None);
        let names: Vec<&str> = listing
            .menu
            .iter()
            .filter_map(|i| i.caption.as_deref())
            .collect();
        assert_eq!(names, vec!["..", "snes", "mario.smc", "zelda.smc"]);
        assert!(listing.has_parent);
        // first real entry after ".."
        assert_eq!(listing.selected, 1);
        assert_eq!(listing.menu.item(1).unwrap().param, PARAM_DIRECTORY);
        assert_eq!(listing.menu.item(2).unwrap().param, 0);
    }

    #[test]
    fn root_has_no_parent_entry() {
        let vfs = tree();
        let listing = FileBrowser::new(&vfs, "/").load("/", None);
        let names: Vec<&str> = listing
            .menu
            .iter()
            .filter_map(|i| i.caption.as_deref())
            .collect();
        assert_eq!(names, vec!["roms", "saves", "readme.txt"]);
        assert!(!listing.has_parent);
    }

    #[test]
    fn unreadable_directory_shows_only_parent() {
        let vfs = tree();
        let listing = FileBrowser::new(&vfs, "/").load("/missing/", None);
        assert_eq!(listing.menu.len(), 1);
        assert_eq!(listing.selected, 0);
    }

    #[test]
    fn enter_directory_then_ascend_with_triangle() {
        let vfs = tree();
        let browser = FileBrowser::new(&vfs, "/");
        // start in /, cursor on "saves"; up to "roms", enter, triangle back
        let mut h = Harness::with_script(|s| {
            s.press(Buttons::UP)
                .press(Buttons::CROSS)
                .press(Buttons::TRIANGLE)
                .press(Buttons::CIRCLE)
        });
        let mut rec = Recorder::default();
        browser.open(&mut h.ui(), None, &mut rec).unwrap();
        assert_eq!(rec.rendered_dirs, vec!["/", "/roms/", "/"]);
        assert_eq!(rec.cancelled_in.as_deref(), Some("/"));
    }

    #[test]
    fn ok_on_parent_entry_ascends() {
        let vfs = tree();
        let browser = FileBrowser::new(&vfs, "/");
        // "/roms/snes/" is empty, so ".." is the only entry
        let mut h = Harness::with_script(|s| s.press(Buttons::CROSS).press(Buttons::CIRCLE));
        let mut rec = Recorder::default();
        browser.open(&mut h.ui(), Some("/roms/snes/"), &mut rec).unwrap();
        assert_eq!(rec.cancelled_in.as_deref(), Some("/roms/"));
    }

    #[test]
    fn refused_file_keeps_browsing() {
        let vfs = tree();
        let browser = FileBrowser::new(&vfs, "/roms/");
        let mut h = Harness::with_script(|s| s.press(Buttons::DOWN).press(Buttons::CROSS).press(Buttons::DOWN).press(Buttons::CROSS));
        let mut rec = Recorder::default();
        browser.open(&mut h.ui(), None, &mut rec).unwrap();
        // ".." snes mario notes zelda; starts on snes
        assert_eq!(rec.opened, vec!["/roms/mario.smc", "/roms/notes.txt"]);
        assert!(h.exit.is_requested());
    }

    #[test]
    fn other_buttons_report_selected_path() {
        let vfs = tree();
        let browser = FileBrowser::new(&vfs, "/");
        let mut h = Harness::with_script(|s| s.press(Buttons::DOWN).press(Buttons::DOWN).press(Buttons::SQUARE));
        let mut rec = Recorder::default();
        browser.open(&mut h.ui(), None, &mut rec).unwrap();
        assert_eq!(rec.pressed, vec![(Some("/readme.txt".to_string()), Buttons::SQUARE)]);
    }

    #[test]
    fn draws_path_colors_and_instructions() {
        let vfs = tree();
        let browser = FileBrowser::new(&vfs, "/");
        let mut h = Harness::with_script(|s| s.idle(1));
        browser.open(&mut h.ui(), Some("/roms/mario.smc"), &mut ()).unwrap();
        let m = &h.metrics;
        assert_eq!(h.backend.text_color("/roms/"), Some(m.title_color));
        assert_eq!(h.backend.text_color("mario.smc"), Some(m.selected_color));
        assert_eq!(h.backend.text_color("snes"), Some(m.browser_directory_color));
        assert_eq!(h.backend.text_color("notes.txt"), Some(m.browser_file_color));
        assert!(h.backend.has_text("Open"));
        assert!(h.backend.has_text("Parent directory"));

        let mut h = Harness::with_script(|s| s.idle(1));
        browser.open(&mut h.ui(), Some("/roms"), &mut ()).unwrap();
        assert!(h.backend.has_text("Enter directory"));
        assert!(!h.backend.has_text("Parent directory"));
    }

    #[test]
    fn long_names_are_clipped() {
        let name = format!("/{}.txt", "x".repeat(80));
        let vfs = MemoryVfs::with_tree(&[(name.as_str(), "")]).unwrap();
        let browser = FileBrowser::new(&vfs, "/");
        let mut h = Harness::with_script(|s| s.idle(1));
        browser.open(&mut h.ui(), None, &mut ()).unwrap();
        assert!(h.backend.has_text("..."));
        assert!(!h.backend.has_text(&name[1..]));
    }
}
