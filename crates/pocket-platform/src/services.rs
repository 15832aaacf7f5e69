//! Platform service traits and desktop implementation.

use std::time::{Duration, Instant};

use pocket_types::error::Result;

// ---------------------------------------------------------------------------
// Power service
// ---------------------------------------------------------------------------

/// Battery / power state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatteryState {
    /// Running on battery.
    Discharging,
    /// Plugged in and charging.
    Charging,
    /// Fully charged, on external power.
    Full,
    /// No battery present (desktop / wall power).
    NoBattery,
}

/// Snapshot of power-related information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerInfo {
    /// Battery charge percentage (0-100), or `None` if no battery.
    pub battery_percent: Option<u8>,
    /// Estimated minutes remaining, or `None` if unknown/charging.
    pub battery_minutes: Option<u32>,
    pub state: BatteryState,
}

impl PowerInfo {
    /// Wall power, no battery.
    pub const NO_BATTERY: Self = Self {
        battery_percent: None,
        battery_minutes: None,
        state: BatteryState::NoBattery,
    };
}

pub trait PowerService {
    fn power_info(&self) -> Result<PowerInfo>;
}

// ---------------------------------------------------------------------------
// Time service
// ---------------------------------------------------------------------------

/// A wall-clock timestamp with millisecond resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SystemTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub millisecond: u16,
}

impl std::fmt::Display for SystemTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second,
        )
    }
}

pub trait TimeService {
    /// Current wall-clock time.
    fn now(&self) -> Result<SystemTime>;

    /// Seconds since the platform booted (or the process started).
    fn uptime_secs(&self) -> Result<u64>;
}

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Monotonic millisecond clock used for input timing and frame pacing.
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin.
    fn ticks_ms(&self) -> u64;

    /// Block the calling thread.
    fn sleep_ms(&self, ms: u64) {
        std::thread::sleep(Duration::from_millis(ms));
    }
}

// ---------------------------------------------------------------------------
// Unified platform trait
// ---------------------------------------------------------------------------

/// Everything the UI loops query from the host.
pub trait Platform: PowerService + TimeService + Clock {}

// ---------------------------------------------------------------------------
// Desktop implementation
// ---------------------------------------------------------------------------

/// Platform implementation for desktop hosts using `std` facilities.
pub struct DesktopPlatform {
    start_time: Instant,
}

impl DesktopPlatform {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
        }
    }
}

impl Default for DesktopPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl PowerService for DesktopPlatform {
    fn power_info(&self) -> Result<PowerInfo> {
        Ok(PowerInfo::NO_BATTERY)
    }
}

impl TimeService for DesktopPlatform {
    fn now(&self) -> Result<SystemTime> {
        let dur = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default();
        Ok(time_from_unix(dur.as_secs(), dur.subsec_millis() as u16))
    }

    fn uptime_secs(&self) -> Result<u64> {
        Ok(self.start_time.elapsed().as_secs())
    }
}

impl Clock for DesktopPlatform {
    fn ticks_ms(&self) -> u64 {
        self.start_time.elapsed().as_millis() as u64
    }
}

impl Platform for DesktopPlatform {}

// ---------------------------------------------------------------------------
// Date helpers
// ---------------------------------------------------------------------------

/// UTC breakdown of a Unix timestamp.
pub fn time_from_unix(secs: u64, millisecond: u16) -> SystemTime {
    let time_of_day = secs % 86400;
    let (year, month, day) = days_to_ymd(secs / 86400);
    SystemTime {
        year,
        month,
        day,
        hour: (time_of_day / 3600) as u8,
        minute: ((time_of_day % 3600) / 60) as u8,
        second: (time_of_day % 60) as u8,
        millisecond,
    }
}

/// Convert days since Unix epoch to (year, month, day).
pub(crate) fn days_to_ymd(mut days: u64) -> (u16, u8, u8) {
    let mut year = 1970u16;
    loop {
        let year_days = if is_leap(year) { 366 } else { 365 };
        if days < year_days {
            break;
        }
        days -= year_days;
        year += 1;
    }
    let feb = if is_leap(year) { 29 } else { 28 };
    let month_days: [u64; 12] = [31, feb, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
    let mut month = 12u8;
    for (i, &md) in month_days.iter().enumerate() {
        if days < md {
            month = (i + 1) as u8;
            break;
        }
        days -= md;
    }
    (year, month, (days + 1) as u8)
}

pub(crate) fn is_leap(y: u16) -> bool {
    (y.is_multiple_of(4) && !y.is_multiple_of(100)) || y.is_multiple_of(400)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn desktop_has_no_battery() {
        let p = DesktopPlatform::new();
        let info = p.power_info().unwrap();
        assert_eq!(info.state, BatteryState::NoBattery);
        assert!(info.battery_percent.is_none());
    }

    #[test]
    fn desktop_time_is_plausible() {
        let p = DesktopPlatform::new();
        let t = p.now().unwrap();
        assert!(t.year >= 2024);
        assert!((1..=12).contains(&t.month));
        assert!(t.millisecond < 1000);
    }

    #[test]
    fn desktop_clock_is_monotonic() {
        let p = DesktopPlatform::new();
        let a = p.ticks_ms();
        p.sleep_ms(2);
        assert!(p.ticks_ms() >= a + 2);
    }

    #[test]
    fn system_time_display_zero_padding() {
        let t = SystemTime {
            year: 2007,
            month: 3,
            day: 9,
            hour: 4,
            minute: 5,
            second: 6,
            millisecond: 700,
        };
        assert_eq!(t.to_string(), "2007-03-09 04:05:06");
    }

    #[test]
    fn unix_breakdown() {
        // 2009-02-13 23:31:30 UTC
        let t = time_from_unix(1_234_567_890, 250);
        assert_eq!((t.year, t.month, t.day), (2009, 2, 13));
        assert_eq!((t.hour, t.minute, t.second, t.millisecond), (23, 31, 30, 250));
    }

    #[test]
    fn days_to_ymd_epoch() {
        assert_eq!(days_to_ymd(0), (1970, 1, 1));
        assert_eq!(days_to_ymd(31), (1970, 2, 1));
        assert_eq!(days_to_ymd(364), (1970, 12, 31));
    }

    #[test]
    fn days_to_ymd_leap_day() {
        // 2000-02-29 is day 11016
        assert_eq!(days_to_ymd(11_016), (2000, 2, 29));
        assert_eq!(days_to_ymd(11_017), (2000, 3, 1));
    }

    #[test]
    fn leap_years() {
        assert!(is_leap(2024));
        assert!(!is_leap(2023));
        assert!(!is_leap(1900));
        assert!(is_leap(2000));
    }
}
