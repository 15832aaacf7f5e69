//! Status line and button glyph substitution.

use pocket_platform::{BatteryState, PowerInfo, SystemTime};
use pocket_types::bitmap_font::glyphs;
use pocket_types::input::Buttons;

/// Placeholder replaced by the OK button glyph.
pub const OK_PLACEHOLDER: char = '\u{1}';
/// Placeholder replaced by the Cancel button glyph.
pub const CANCEL_PLACEHOLDER: char = '\u{2}';

/// Battery charge thresholds for the full .. empty glyphs.
const BATTERY_PERCENTILES: [u8; 4] = [60, 30, 12, 0];

/// Glyph for a face button, `'?'` for anything else.
pub fn button_icon(button: Buttons) -> char {
    if button == Buttons::CROSS {
        glyphs::CROSS
    } else if button == Buttons::CIRCLE {
        glyphs::CIRCLE
    } else if button == Buttons::TRIANGLE {
        glyphs::TRIANGLE
    } else if button == Buttons::SQUARE {
        glyphs::SQUARE
    } else {
        '?'
    }
}

/// Swap the OK/Cancel placeholders in `text` for the configured glyphs.
pub fn replace_icons(text: &str, ok: Buttons, cancel: Buttons) -> String {
    text.chars()
        .map(|c| match c {
            OK_PLACEHOLDER => button_icon(ok),
            CANCEL_PLACEHOLDER => button_icon(cancel),
            c => c,
        })
        .collect()
}

/// Battery glyph for the current charge; the power plug while charging.
pub fn battery_glyph(power: &PowerInfo) -> char {
    match power.state {
        BatteryState::Charging | BatteryState::NoBattery => glyphs::POWER,
        BatteryState::Discharging | BatteryState::Full => {
            let percent = power.battery_percent.unwrap_or(0);
            let level = BATTERY_PERCENTILES
                .iter()
                .position(|&p| percent >= p)
                .unwrap_or(BATTERY_PERCENTILES.len() - 1);
            glyphs::battery(level as u8)
        },
    }
}

/// `"<clock>MM/DD HH:MM <battery> "`, right-aligned by the caller.
///
/// The colon blinks with the half second. Without a battery only the power
/// glyph is shown.
pub fn status_string(time: &SystemTime, power: &PowerInfo) -> String {
    let sep = if time.millisecond > 500 { ':' } else { ' ' };
    let battery = match power.state {
        BatteryState::NoBattery => glyphs::POWER.to_string(),
        _ => {
            let minutes = power.battery_minutes.unwrap_or(0);
            format!(
                "{}{:>3}% ({:02}:{:02})",
                battery_glyph(power),
                power.battery_percent.unwrap_or(0),
                minutes / 60,
                minutes % 60
            )
        },
    };
    format!(
        "{}{:>2}/{:>2} {:02}{sep}{:02} {battery} ",
        glyphs::CLOCK,
        time.month,
        time.day,
        time.hour,
        time.minute
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ms: u16) -> SystemTime {
        SystemTime {
            year: 2007,
            month: 3,
            day: 9,
            hour: 4,
            minute: 5,
            second: 6,
            millisecond: ms,
        }
    }

    fn battery(percent: u8, state: BatteryState) -> PowerInfo {
        PowerInfo {
            battery_percent: Some(percent),
            battery_minutes: Some(125),
            state,
        }
    }

    #[test]
    fn icons_follow_button_mapping() {
        let s = replace_icons("\u{1} Confirm\t\u{2} Cancel", Buttons::CROSS, Buttons::CIRCLE);
        assert_eq!(s, format!("{} Confirm\t{} Cancel", glyphs::CROSS, glyphs::CIRCLE));
        let swapped = replace_icons("\u{1}", Buttons::CIRCLE, Buttons::CROSS);
        assert_eq!(swapped, glyphs::CIRCLE.to_string());
        assert_eq!(button_icon(Buttons::START), '?');
        assert_eq!(button_icon(Buttons::CROSS | Buttons::SQUARE), '?');
    }

    #[test]
    fn battery_levels_by_percentile() {
        let d = BatteryState::Discharging;
        assert_eq!(battery_glyph(&battery(100, d)), glyphs::FULL_BATT);
        assert_eq!(battery_glyph(&battery(60, d)), glyphs::FULL_BATT);
        assert_eq!(battery_glyph(&battery(59, d)), glyphs::battery(1));
        assert_eq!(battery_glyph(&battery(12, d)), glyphs::battery(2));
        assert_eq!(battery_glyph(&battery(11, d)), glyphs::EMPTY_BATT);
        assert_eq!(battery_glyph(&battery(40, BatteryState::Charging)), glyphs::POWER);
    }

    #[test]
    fn full_battery_shows_level_not_power() {
        assert_eq!(battery_glyph(&battery(100, BatteryState::Full)), glyphs::FULL_BATT);
        let s = status_string(&at(0), &battery(100, BatteryState::Full));
        assert!(s.contains(&format!("{}100%", glyphs::FULL_BATT)));
        assert!(!s.contains(glyphs::POWER));
    }

    #[test]
    fn status_with_battery() {
        let s = status_string(&at(700), &battery(57, BatteryState::Discharging));
        let expected = format!(
            "{} 3/ 9 04:05 {} 57% (02:05) ",
            glyphs::CLOCK,
            glyphs::battery(1)
        );
        assert_eq!(s, expected);
    }

    #[test]
    fn colon_blinks_on_half_second() {
        let s = status_string(&at(200), &PowerInfo::NO_BATTERY);
        assert_eq!(s, format!("{} 3/ 9 04 05 {} ", glyphs::CLOCK, glyphs::POWER));
    }
}
