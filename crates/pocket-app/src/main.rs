//! pocket desktop demo.
//!
//! Opens an SDL2 window and runs the demo main menu: a file browser over
//! the application directory, a save-slot gallery, persisted options and a
//! tabbed about screen. Select saves a screenshot, Start saves settings.
//!
//! Usage:
//!   cargo run -p pocket-app -- [pocket.toml]

use std::path::PathBuf;

use anyhow::{Context, Result};

use pocket_app::demo::{DemoMenu, SETTINGS_FILE, Settings, gallery_menu, main_menu};
use pocket_fs::HostVfs;
use pocket_platform::{Controller, DesktopPlatform, System};
use pocket_types::backend::RenderBackend;
use pocket_types::config::PocketConfig;
use pocket_ui::dialog;
use pocket_ui::menu_view::open_menu;
use pocket_ui::{Ui, UiMetrics, UiStyle};

fn load_config() -> Result<PocketConfig> {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("pocket.toml"));
    if path.exists() {
        PocketConfig::load(&path).with_context(|| format!("reading {}", path.display()))
    } else {
        log::info!("{} not found, using default config", path.display());
        Ok(PocketConfig::default())
    }
}

fn load_metrics(config: &PocketConfig, settings: &Settings) -> Result<UiMetrics> {
    let mut metrics = UiMetrics::for_screen(config.screen_width, config.screen_height);
    if let Some(style) = &config.style_path {
        metrics = UiStyle::load(style)?.apply(metrics)?;
        log::info!("applied style {}", style.display());
    }
    settings.apply(&mut metrics);
    Ok(metrics)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = load_config()?;
    let exe = std::env::current_exe().unwrap_or_else(|_| PathBuf::from("pocket"));
    let mut system = System::new(&exe);
    system.on_exit(|| log::debug!("exit callback: closing window"));
    let app_dir: PathBuf = config
        .app_dir
        .clone()
        .unwrap_or_else(|| system.app_dir().to_path_buf());
    log::info!(
        "pocket starting: {}x{}, app dir {}",
        config.screen_width,
        config.screen_height,
        app_dir.display()
    );

    let exit = system.exit_flag();
    let (mut backend, pad) = pocket_backend_sdl::open(
        &config.window_title,
        config.screen_width,
        config.screen_height,
        config.font_scale,
        &exit,
    )?;
    backend.init(config.screen_width, config.screen_height)?;
    let mut input = Controller::new(pad);
    let platform = DesktopPlatform::new();

    let mut settings = Settings::load(&app_dir.join(SETTINGS_FILE))?;
    let mhz = system.set_clock_frequency(settings.clock_mhz());
    log::info!("clock set to {mhz} MHz");
    let metrics = load_metrics(&config, &settings)?;

    let mut vfs = HostVfs::new(app_dir.clone());
    let slots = gallery_menu(&mut backend)?;
    let mut menu = main_menu(&settings);
    {
        let mut handler = DemoMenu::new(&mut vfs, &mut settings, slots);
        let mut ui = Ui::new(&mut backend, &mut input, &platform, &metrics, &exit);
        open_menu(&mut ui, &mut menu, Some("pocket"), &mut handler)?;
        dialog::fadeout(&mut ui)?;
        log::info!("last opened file: {}", handler.last_file());
    }

    settings.save()?;
    backend.shutdown()?;
    system.request_exit();
    log::info!("pocket shut down cleanly");
    Ok(())
}
