//! pocket-ui: modal interaction loops built on `RenderBackend`.
//!
//! Every loop here blocks the caller: it polls the pad once per iteration,
//! redraws the whole screen and returns when the user confirms, cancels or
//! a callback asks it to stop. Layout and colors come from [`UiMetrics`];
//! the backends, input, platform services and exit flag are bundled in a
//! [`Ui`] context that callers build once and pass down.

pub mod browser;
pub mod context;
pub mod cursor;
pub mod dialog;
pub mod gallery;
pub mod image;
pub mod menu;
pub mod menu_view;
pub mod metrics;
pub mod splash;
pub mod status;

#[cfg(test)]
pub(crate) mod test_utils;

pub use browser::{BrowserHandler, FileBrowser};
pub use context::{ScreenCopy, Ui};
pub use cursor::{GridCursor, ListCursor};
pub use dialog::DialogResult;
pub use gallery::GalleryHandler;
pub use image::{Icon, Image};
pub use menu::{Menu, MenuItem, MenuItemDef, MenuOption, MenuOptionDef};
pub use menu_view::MenuHandler;
pub use metrics::{UiMetrics, UiStyle};
pub use splash::SplashHandler;
