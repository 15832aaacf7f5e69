//! Demo content shared by the desktop app and the screenshot tool: the
//! main menu, persisted settings, a sample file tree and save-slot icons.

use std::path::{Path, PathBuf};

use pocket_fs::path::file_name;
use pocket_fs::{MemoryVfs, Vfs};
use pocket_ini::IniDocument;
use pocket_types::backend::RenderBackend;
use pocket_types::color::Color;
use pocket_types::error::Result;
use pocket_types::input::Buttons;
use pocket_ui::dialog::{self, DialogResult};
use pocket_ui::gallery::open_gallery;
use pocket_ui::image::save_screen_sequence;
use pocket_ui::splash::splash_screen;
use pocket_ui::{
    BrowserHandler, FileBrowser, GalleryHandler, Image, Menu, MenuHandler, MenuItem, MenuItemDef,
    MenuOptionDef, SplashHandler, Ui, UiMetrics,
};

pub const SETTINGS_FILE: &str = "pocket.ini";
const SETTINGS_SECTION: &str = "ui";

pub const ID_BROWSE: u32 = 1;
pub const ID_GALLERY: u32 = 2;
pub const ID_ANIMATE: u32 = 3;
pub const ID_CONFIRM: u32 = 4;
pub const ID_CLOCK: u32 = 5;
pub const ID_ABOUT: u32 = 6;
pub const ID_QUIT: u32 = 7;

const TOGGLE: &[MenuOptionDef<'static>] = &[MenuOptionDef::new("Off", 0), MenuOptionDef::new("On", 1)];
const CONFIRM_BUTTONS: &[MenuOptionDef<'static>] = &[
    MenuOptionDef::new("\u{E0A1} Cross", 0),
    MenuOptionDef::new("\u{E0A2} Circle", 1),
];
const CLOCKS: &[MenuOptionDef<'static>] = &[
    MenuOptionDef::new("222 MHz", 222),
    MenuOptionDef::new("266 MHz", 266),
    MenuOptionDef::new("300 MHz", 300),
    MenuOptionDef::new("333 MHz", 333),
];

const MAIN_MENU: &[MenuItemDef<'static>] = &[
    MenuItemDef::header("Files"),
    MenuItemDef::item("Browse", ID_BROWSE, &[], None, Some("\u{1} Open browser\t\u{E0AF} Screenshot")),
    MenuItemDef::item("Save slots", ID_GALLERY, &[], None, Some("\u{1} Show slots")),
    MenuItemDef::header("Options"),
    MenuItemDef::item("Animations", ID_ANIMATE, TOGGLE, Some(1), Some("\u{E0A8} Change (applies on restart)")),
    MenuItemDef::item(
        "Confirm button",
        ID_CONFIRM,
        CONFIRM_BUTTONS,
        Some(0),
        Some("\u{E0A8} Change (applies on restart)"),
    ),
    MenuItemDef::item("CPU clock", ID_CLOCK, CLOCKS, Some(3), Some("\u{E0A8} Change")),
    MenuItemDef::header("System"),
    MenuItemDef::item("About", ID_ABOUT, &[], None, Some("\u{1} Show\t\u{E0B1} Save settings")),
    MenuItemDef::item("Quit", ID_QUIT, &[], None, None),
];

/// INI key and default for a settings item.
fn setting_key(id: u32) -> Option<(&'static str, i32)> {
    match id {
        ID_ANIMATE => Some(("animate", 1)),
        ID_CONFIRM => Some(("confirm_button", 0)),
        ID_CLOCK => Some(("clock", 333)),
        _ => None,
    }
}

/// User settings stored in an INI file next to the executable.
#[derive(Debug, Default)]
pub struct Settings {
    doc: IniDocument,
    path: Option<PathBuf>,
}

impl Settings {
    /// Read `path`, or start from defaults when it does not exist yet.
    pub fn load(path: &Path) -> Result<Self> {
        let doc = if path.exists() {
            IniDocument::load(path)?
        } else {
            log::info!("no settings at {}, using defaults", path.display());
            IniDocument::new()
        };
        Ok(Self {
            doc,
            path: Some(path.to_path_buf()),
        })
    }

    pub fn save(&self) -> Result<()> {
        if let Some(path) = &self.path {
            self.doc.save(path)?;
            log::info!("settings saved to {}", path.display());
        }
        Ok(())
    }

    pub fn get(&self, id: u32) -> i64 {
        setting_key(id).map_or(0, |(key, default)| {
            self.doc.get_int(SETTINGS_SECTION, key, default) as i64
        })
    }

    pub fn set(&mut self, id: u32, value: i64) {
        if let Some((key, _)) = setting_key(id) {
            self.doc.set_int(SETTINGS_SECTION, key, value as i32);
        }
    }

    pub fn clock_mhz(&self) -> u32 {
        self.get(ID_CLOCK).max(0) as u32
    }

    /// Fold the visual settings into `metrics`.
    pub fn apply(&self, metrics: &mut UiMetrics) {
        metrics.animate = self.get(ID_ANIMATE) != 0;
        if self.get(ID_CONFIRM) == 1 {
            metrics.ok_button = Buttons::CIRCLE;
            metrics.cancel_button = Buttons::CROSS;
        }
    }
}

/// The main menu with its options reflecting `settings`.
pub fn main_menu(settings: &Settings) -> Menu {
    let mut menu = Menu::from_defs(MAIN_MENU);
    for id in [ID_ANIMATE, ID_CONFIRM, ID_CLOCK] {
        if let Some(item) = menu.find_item_by_id_mut(id) {
            item.select_option_by_value(settings.get(id));
        }
    }
    menu
}

/// A small tree to browse when no host directory is wanted.
pub fn demo_tree() -> Result<MemoryVfs> {
    MemoryVfs::with_tree(&[
        ("/roms/arcade/", ""),
        ("/roms/homebrew/", ""),
        ("/roms/puzzle.bin", "PZL"),
        ("/roms/racer.bin", "RCR"),
        ("/roms/shooter.bin", "SHT"),
        ("/roms/readme.txt", "Put your games here."),
        ("/roms/.cache", ""),
        ("/saves/", ""),
        ("/pocket.ini", "[ui]\nanimate=1\n"),
    ])
}

const SLOT_COLORS: [Color; 5] = [
    Color::rgb(0x2d, 0x6c, 0xdf),
    Color::rgb(0xdf, 0x6c, 0x2d),
    Color::rgb(0x3c, 0xa0, 0x50),
    Color::rgb(0x90, 0x40, 0xb0),
    Color::rgb(0xb0, 0xa0, 0x30),
];

/// Ten save slots, each with a generated thumbnail.
pub fn gallery_menu(backend: &mut dyn RenderBackend) -> Result<Menu> {
    let mut menu = Menu::new();
    for n in 0..10u32 {
        let mut img = Image::new(68, 57)?;
        img.clear(SLOT_COLORS[n as usize % SLOT_COLORS.len()]);
        for x in 0..img.width() {
            let y = x * img.height() / img.width();
            img.set_pixel(x, y, Color::WHITE);
        }
        if n % 2 == 1 {
            img.discard_colors();
        }
        let icon = img.upload(backend)?;
        let item = menu.append_item(Some(&format!("Slot {}", n + 1)), n + 1);
        item.icon = Some(icon);
        item.set_help_text(Some("\u{1} Load\t\u{2} Back"));
    }
    Ok(menu)
}

const ABOUT_TABS: &[(&str, &[&str])] = &[
    ("About", &["pocket", "", "Menus, dialogs, a file browser", "and a gallery for handhelds."]),
    (
        "Controls",
        &[
            "Arrows      move",
            "Return / X  confirm",
            "Escape / C  cancel",
            "Space / V   parent directory",
            "Q / E       switch tabs",
        ],
    ),
];

/// Tabbed about screen.
#[derive(Debug, Default)]
pub struct About {
    tab: usize,
}

impl SplashHandler for About {
    fn on_render(&mut self, ui: &mut Ui<'_>) -> Result<()> {
        let (title, lines) = ABOUT_TABS[self.tab];
        let width = ui.metrics.right - ui.metrics.left;
        ui.draw_title(title, width)?;
        let fh = ui.line_height();
        let (sw, _) = ui.screen();
        let color = ui.metrics.text_color;
        for (n, line) in lines.iter().enumerate() {
            let y = ui.metrics.top + fh * (n as i32 + 2);
            ui.backend.draw_text_centered(line, 0, y, sw as u32, color)?;
        }
        Ok(())
    }

    fn on_button_press(&mut self, _ui: &mut Ui<'_>, buttons: Buttons) -> Result<bool> {
        let n = ABOUT_TABS.len();
        if buttons.contains(Buttons::LTRIGGER) {
            self.tab = (self.tab + n - 1) % n;
        } else if buttons.contains(Buttons::RTRIGGER) {
            self.tab = (self.tab + 1) % n;
        }
        Ok(false)
    }
}

/// Remembers the file picked in the browser.
#[derive(Debug, Default)]
struct Opener {
    picked: Option<String>,
}

impl BrowserHandler for Opener {
    fn on_ok(&mut self, ui: &mut Ui<'_>, file: &str) -> Result<bool> {
        dialog::alert(ui, &format!("Opened {}", file_name(file)))?;
        self.picked = Some(file.to_string());
        Ok(true)
    }
}

struct SlotPicker;

impl GalleryHandler for SlotPicker {
    fn on_ok(&mut self, ui: &mut Ui<'_>, menu: &mut Menu, index: usize) -> Result<bool> {
        let caption = menu
            .item(index)
            .and_then(|i| i.caption.clone())
            .unwrap_or_default();
        dialog::confirm(ui, &format!("Load {caption}?"))
    }
}

/// Main menu actions.
pub struct DemoMenu<'a> {
    vfs: &'a mut dyn Vfs,
    settings: &'a mut Settings,
    slots: Menu,
    last_file: String,
}

impl<'a> DemoMenu<'a> {
    pub fn new(vfs: &'a mut dyn Vfs, settings: &'a mut Settings, slots: Menu) -> Self {
        Self {
            vfs,
            settings,
            slots,
            last_file: "/".to_string(),
        }
    }

    /// Last file opened in the browser.
    pub fn last_file(&self) -> &str {
        &self.last_file
    }
}

impl MenuHandler for DemoMenu<'_> {
    fn on_ok(&mut self, ui: &mut Ui<'_>, menu: &mut Menu, index: usize) -> Result<bool> {
        let Some(id) = menu.item(index).map(|i| i.id) else {
            return Ok(false);
        };
        match id {
            ID_BROWSE => {
                let mut opener = Opener::default();
                FileBrowser::new(&*self.vfs, "/").open(ui, Some(self.last_file.as_str()), &mut opener)?;
                if let Some(file) = opener.picked {
                    self.last_file = file;
                }
            },
            ID_GALLERY => open_gallery(ui, &mut self.slots, Some("Save slots"), &mut SlotPicker)?,
            ID_ABOUT => splash_screen(ui, &mut About::default())?,
            ID_QUIT => return dialog::confirm(ui, "Quit pocket?"),
            _ => {},
        }
        Ok(false)
    }

    fn on_item_changed(&mut self, _ui: &mut Ui<'_>, item: &MenuItem, option: usize) -> Result<bool> {
        if let Some(opt) = item.options.get(option) {
            log::debug!("setting {} -> {}", item.id, opt.value);
            self.settings.set(item.id, opt.value);
        }
        Ok(true)
    }

    fn on_button_press(
        &mut self,
        ui: &mut Ui<'_>,
        _menu: &mut Menu,
        _index: Option<usize>,
        buttons: Buttons,
    ) -> Result<bool> {
        if buttons.contains(Buttons::SELECT) {
            let path = save_screen_sequence(&*ui.backend, self.vfs, "/", "screen")?;
            dialog::alert(ui, &format!("Saved {path}"))?;
        } else if buttons.contains(Buttons::START) {
            if dialog::yes_no_cancel(ui, "Save settings now?")? == DialogResult::Yes {
                self.settings.save()?;
            }
        }
        Ok(false)
    }
}
