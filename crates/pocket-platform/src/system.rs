//! Application-wide context: app directory, exit handling, CPU clock.

use std::path::{Path, PathBuf};

use crate::exit::ExitFlag;

/// Lowest CPU clock the console accepts, in MHz.
pub const MIN_CLOCK_MHZ: u32 = 222;
/// Highest CPU clock the console accepts, in MHz.
pub const MAX_CLOCK_MHZ: u32 = 333;

type ExitCallback = Box<dyn FnMut() + Send>;

/// Process context created once at startup.
pub struct System {
    app_dir: PathBuf,
    exit: ExitFlag,
    exit_callback: Option<ExitCallback>,
    clock_mhz: u32,
}

impl System {
    /// Create the context from the executable path (usually `argv[0]`).
    pub fn new(app_path: &Path) -> Self {
        let app_dir = app_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        log::info!("app directory: {}", app_dir.display());
        Self {
            app_dir,
            exit: ExitFlag::new(),
            exit_callback: None,
            clock_mhz: MAX_CLOCK_MHZ,
        }
    }

    pub fn app_dir(&self) -> &Path {
        &self.app_dir
    }

    /// Handle to the exit flag, for UI loops and event pumps.
    pub fn exit_flag(&self) -> ExitFlag {
        self.exit.clone()
    }

    pub fn exit_requested(&self) -> bool {
        self.exit.is_requested()
    }

    /// Register the handler run by [`System::request_exit`], replacing any
    /// previous one.
    pub fn on_exit(&mut self, callback: impl FnMut() + Send + 'static) {
        self.exit_callback = Some(Box::new(callback));
    }

    /// Run the exit handler (if any) and raise the exit flag.
    pub fn request_exit(&mut self) {
        log::info!("exit requested");
        if let Some(cb) = self.exit_callback.as_mut() {
            cb();
        }
        self.exit.request();
    }

    /// Set the CPU clock, clamped to the supported range. Returns the
    /// frequency actually applied.
    pub fn set_clock_frequency(&mut self, mhz: u32) -> u32 {
        self.clock_mhz = mhz.clamp(MIN_CLOCK_MHZ, MAX_CLOCK_MHZ);
        log::debug!("cpu clock set to {} MHz (requested {mhz})", self.clock_mhz);
        self.clock_mhz
    }

    pub fn clock_frequency(&self) -> u32 {
        self.clock_mhz
    }
}
