//! Controller state.
//!
//! Every pad backend reports a [`PadState`] snapshot: the mask of held
//! buttons plus the raw analog stick position. The bit values follow the
//! console's controller register so a native backend can copy them through.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Mask of held controller buttons.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Buttons: u32 {
        const SELECT = 0x0000_0001;
        const ANALOG_UP = 0x0000_0002;
        const ANALOG_DOWN = 0x0000_0004;
        const START = 0x0000_0008;
        const UP = 0x0000_0010;
        const RIGHT = 0x0000_0020;
        const DOWN = 0x0000_0040;
        const LEFT = 0x0000_0080;
        const LTRIGGER = 0x0000_0100;
        const RTRIGGER = 0x0000_0200;
        const ANALOG_LEFT = 0x0000_0400;
        const ANALOG_RIGHT = 0x0000_0800;
        const TRIANGLE = 0x0000_1000;
        const CIRCLE = 0x0000_2000;
        const CROSS = 0x0000_4000;
        const SQUARE = 0x0000_8000;
    }
}

impl Default for Buttons {
    fn default() -> Self {
        Self::empty()
    }
}

impl Buttons {
    /// Buttons that are reported to `on_button_press` style callbacks.
    pub const CONTROL_MASK: Self = Self::CIRCLE
        .union(Self::TRIANGLE)
        .union(Self::CROSS)
        .union(Self::SQUARE)
        .union(Self::LTRIGGER)
        .union(Self::RTRIGGER)
        .union(Self::SELECT)
        .union(Self::START);

    /// Direction bits synthesized from the analog stick.
    pub const ANALOG_MASK: Self = Self::ANALOG_UP
        .union(Self::ANALOG_DOWN)
        .union(Self::ANALOG_LEFT)
        .union(Self::ANALOG_RIGHT);

    /// Buttons that take part in autorepeat, in scan order.
    pub const REPEATABLE: [Self; 12] = [
        Self::UP,
        Self::DOWN,
        Self::LEFT,
        Self::RIGHT,
        Self::CROSS,
        Self::CIRCLE,
        Self::SQUARE,
        Self::TRIANGLE,
        Self::LTRIGGER,
        Self::RTRIGGER,
        Self::SELECT,
        Self::START,
    ];

    /// D-pad or analog "down".
    pub fn down(self) -> bool {
        self.intersects(Self::DOWN | Self::ANALOG_DOWN)
    }

    /// D-pad or analog "up".
    pub fn up(self) -> bool {
        self.intersects(Self::UP | Self::ANALOG_UP)
    }
}

/// Analog values below this count as fully pushed up/left.
pub const ANALOG_LOW: u8 = 32;
/// Analog values at or above this count as fully pushed down/right.
pub const ANALOG_HIGH: u8 = 224;
/// Resting analog stick position.
pub const ANALOG_CENTER: u8 = 128;

/// One controller sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PadState {
    pub buttons: Buttons,
    /// Analog stick X (0 = left, 255 = right).
    pub lx: u8,
    /// Analog stick Y (0 = up, 255 = down).
    pub ly: u8,
}

impl Default for PadState {
    fn default() -> Self {
        Self::new(Buttons::empty())
    }
}

impl PadState {
    /// A sample with the given buttons and the stick at rest.
    pub const fn new(buttons: Buttons) -> Self {
        Self {
            buttons,
            lx: ANALOG_CENTER,
            ly: ANALOG_CENTER,
        }
    }

    /// A sample with the stick at `(lx, ly)` and no buttons held.
    pub const fn analog(lx: u8, ly: u8) -> Self {
        Self {
            buttons: Buttons::empty(),
            lx,
            ly,
        }
    }

    /// Replace the analog direction bits with ones derived from the stick.
    pub fn with_analog_bits(mut self) -> Self {
        self.buttons.remove(Buttons::ANALOG_MASK);
        if self.ly < ANALOG_LOW {
            self.buttons |= Buttons::ANALOG_UP;
        } else if self.ly >= ANALOG_HIGH {
            self.buttons |= Buttons::ANALOG_DOWN;
        }
        if self.lx < ANALOG_LOW {
            self.buttons |= Buttons::ANALOG_LEFT;
        } else if self.lx >= ANALOG_HIGH {
            self.buttons |= Buttons::ANALOG_RIGHT;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_mask_excludes_directions() {
        assert!(Buttons::CONTROL_MASK.contains(Buttons::CROSS));
        assert!(Buttons::CONTROL_MASK.contains(Buttons::START));
        assert!(!Buttons::CONTROL_MASK.intersects(Buttons::UP | Buttons::DOWN));
        assert!(!Buttons::CONTROL_MASK.intersects(Buttons::ANALOG_MASK));
    }

    #[test]
    fn analog_bits_from_stick() {
        let s = PadState::analog(10, 250).with_analog_bits();
        assert!(s.buttons.contains(Buttons::ANALOG_LEFT));
        assert!(s.buttons.contains(Buttons::ANALOG_DOWN));
        assert!(!s.buttons.contains(Buttons::ANALOG_UP));
    }

    #[test]
    fn analog_thresholds_are_exact() {
        assert!(PadState::analog(128, 31).with_analog_bits().buttons.contains(Buttons::ANALOG_UP));
        assert!(PadState::analog(128, 32).with_analog_bits().buttons.is_empty());
        assert!(PadState::analog(223, 128).with_analog_bits().buttons.is_empty());
        assert!(PadState::analog(224, 128).with_analog_bits().buttons.contains(Buttons::ANALOG_RIGHT));
    }

    #[test]
    fn stale_analog_bits_are_cleared() {
        let s = PadState::new(Buttons::ANALOG_UP | Buttons::CROSS).with_analog_bits();
        assert_eq!(s.buttons, Buttons::CROSS);
    }

    #[test]
    fn up_down_accept_dpad_or_analog() {
        assert!(Buttons::DOWN.down());
        assert!(Buttons::ANALOG_DOWN.down());
        assert!(Buttons::UP.up());
        assert!(!Buttons::LEFT.up());
    }

    #[test]
    fn default_pad_is_centered() {
        let s = PadState::default();
        assert_eq!((s.lx, s.ly), (ANALOG_CENTER, ANALOG_CENTER));
        assert!(s.buttons.is_empty());
    }

    #[test]
    fn buttons_deserialize_from_names() {
        #[derive(Deserialize)]
        struct Keys {
            ok: Buttons,
        }
        let keys: Keys = toml::from_str(r#"ok = "CROSS""#).unwrap();
        assert_eq!(keys.ok, Buttons::CROSS);
    }
}
