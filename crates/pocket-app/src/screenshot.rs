//! Headless screenshot tool.
//!
//! Drives every UI loop with a scripted pad on the software renderer and
//! saves one PNG per scene, so layout changes can be reviewed without a
//! window.
//!
//! Usage:
//!   cargo run -p pocket-app --bin pocket-screenshot [out_dir]
//!
//! Output (default `screenshots/`):
//!   01_menu-00.png      main menu
//!   02_options-00.png   option box expanded on "Animations"
//!   03_browser-00.png   file browser in /roms/
//!   04_gallery-00.png   save slot gallery
//!   05_alert-00.png     alert dialog
//!   06_question-00.png  yes/no/cancel dialog
//!   07_select-00.png    selection list dialog
//!   08_about-00.png     splash screen

use std::path::PathBuf;

use anyhow::Result;

use pocket_app::demo::{About, Settings, demo_tree, gallery_menu, main_menu};
use pocket_backend_soft::SoftBackend;
use pocket_fs::HostVfs;
use pocket_platform::{Controller, DesktopPlatform, ExitFlag, ScriptedPad};
use pocket_types::input::Buttons;
use pocket_ui::gallery::open_gallery;
use pocket_ui::image::save_screen_sequence;
use pocket_ui::menu_view::open_menu;
use pocket_ui::splash::splash_screen;
use pocket_ui::{FileBrowser, Menu, Ui, UiMetrics, dialog};

const WIDTH: u32 = 480;
const HEIGHT: u32 = 272;

/// Run `scene` against `script` and save whatever is on screen afterwards.
fn capture<F>(
    backend: &mut SoftBackend,
    out: &mut HostVfs,
    metrics: &UiMetrics,
    name: &str,
    script: ScriptedPad,
    scene: F,
) -> Result<String>
where
    F: FnOnce(&mut Ui<'_>) -> pocket_types::error::Result<()>,
{
    let exit = ExitFlag::new();
    // One idle frame so list loops draw before the script runs dry.
    let mut input = Controller::new(script.idle(1).then_exit(&exit));
    let platform = DesktopPlatform::new();
    {
        let mut ui = Ui::new(&mut *backend, &mut input, &platform, metrics, &exit);
        scene(&mut ui)?;
    }
    Ok(save_screen_sequence(&*backend, out, "/", name)?)
}

fn clock_list() -> Menu {
    let mut menu = Menu::new();
    for (n, mhz) in [222, 266, 300, 333].into_iter().enumerate() {
        menu.append_item(Some(&format!("{mhz} MHz")), n as u32);
    }
    menu
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("screenshots"));
    std::fs::create_dir_all(&out_dir)?;
    let mut out = HostVfs::new(out_dir.clone());

    let mut backend = SoftBackend::new(WIDTH, HEIGHT, 1);
    let mut metrics = UiMetrics::for_screen(WIDTH, HEIGHT);
    metrics.animate = false;

    let settings = Settings::default();
    let tree = demo_tree()?;
    let idle = ScriptedPad::new;

    let mut saved = Vec::new();
    saved.push(capture(&mut backend, &mut out, &metrics, "01_menu", idle(), |ui| {
        open_menu(ui, &mut main_menu(&settings), Some("pocket"), &mut ())
    })?);

    let script = ScriptedPad::new()
        .press(Buttons::DOWN)
        .press(Buttons::DOWN)
        .press(Buttons::RIGHT);
    saved.push(capture(&mut backend, &mut out, &metrics, "02_options", script, |ui| {
        open_menu(ui, &mut main_menu(&settings), Some("pocket"), &mut ())
    })?);

    saved.push(capture(&mut backend, &mut out, &metrics, "03_browser", idle(), |ui| {
        FileBrowser::new(&tree, "/").open(ui, Some("/roms/puzzle.bin"), &mut ())
    })?);

    let script = ScriptedPad::new().press(Buttons::RIGHT);
    saved.push(capture(&mut backend, &mut out, &metrics, "04_gallery", script, |ui| {
        let mut slots = gallery_menu(&mut *ui.backend)?;
        open_gallery(ui, &mut slots, Some("Save slots"), &mut ())
    })?);

    saved.push(capture(&mut backend, &mut out, &metrics, "05_alert", idle(), |ui| {
        dialog::alert(ui, "Settings saved.")
    })?);

    saved.push(capture(&mut backend, &mut out, &metrics, "06_question", idle(), |ui| {
        dialog::yes_no_cancel(ui, "Save settings now?").map(drop)
    })?);

    saved.push(capture(&mut backend, &mut out, &metrics, "07_select", idle(), |ui| {
        dialog::select(ui, Some("CPU clock"), &clock_list()).map(drop)
    })?);

    saved.push(capture(&mut backend, &mut out, &metrics, "08_about", idle(), |ui| {
        splash_screen(ui, &mut About::default())
    })?);

    log::info!("{} screenshots written to {}", saved.len(), out_dir.display());
    Ok(())
}
