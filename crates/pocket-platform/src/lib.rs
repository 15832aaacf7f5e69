//! Platform services for pocket.
//!
//! Power and wall-clock queries, a millisecond clock, controller polling
//! with autorepeat, the process-wide exit flag and frame pacing helpers.

pub mod ctrl;
pub mod exit;
pub mod perf;
pub mod services;
pub mod system;

pub use ctrl::{Controller, InputSource, PollingMode, ScriptedPad};
pub use exit::ExitFlag;
pub use perf::{FpsCounter, FrameLimiter};
pub use services::{
    BatteryState, Clock, DesktopPlatform, Platform, PowerInfo, PowerService, SystemTime,
    TimeService,
};
pub use system::System;
