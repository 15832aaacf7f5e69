//! Keyboard layout of the desktop pad.
//!
//! | key            | button   |
//! |----------------|----------|
//! | arrows         | d-pad    |
//! | Return / X     | Cross    |
//! | Escape / C     | Circle   |
//! | Space / V      | Triangle |
//! | Tab / Z        | Square   |
//! | Q / E          | L / R    |
//! | F1 / F2        | Start / Select |

use pocket_types::input::Buttons;
use sdl2::keyboard::Keycode;

pub fn button_for(key: Keycode) -> Option<Buttons> {
    Some(match key {
        Keycode::Up => Buttons::UP,
        Keycode::Down => Buttons::DOWN,
        Keycode::Left => Buttons::LEFT,
        Keycode::Right => Buttons::RIGHT,
        Keycode::Return | Keycode::X => Buttons::CROSS,
        Keycode::Escape | Keycode::C => Buttons::CIRCLE,
        Keycode::Space | Keycode::V => Buttons::TRIANGLE,
        Keycode::Tab | Keycode::Z => Buttons::SQUARE,
        Keycode::Q => Buttons::LTRIGGER,
        Keycode::E => Buttons::RTRIGGER,
        Keycode::F1 => Buttons::START,
        Keycode::F2 => Buttons::SELECT,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_buttons_have_two_keys() {
        assert_eq!(button_for(Keycode::Return), Some(Buttons::CROSS));
        assert_eq!(button_for(Keycode::X), Some(Buttons::CROSS));
        assert_eq!(button_for(Keycode::Escape), button_for(Keycode::C));
        assert_eq!(button_for(Keycode::Tab), Some(Buttons::SQUARE));
    }

    #[test]
    fn unmapped_keys_are_ignored() {
        assert_eq!(button_for(Keycode::F12), None);
        assert_eq!(button_for(Keycode::A), None);
    }

    #[test]
    fn every_mapped_button_is_distinct_per_key() {
        let keys = [
            Keycode::Up,
            Keycode::Down,
            Keycode::Left,
            Keycode::Right,
            Keycode::Return,
            Keycode::Escape,
            Keycode::Space,
            Keycode::Tab,
            Keycode::Q,
            Keycode::E,
            Keycode::F1,
            Keycode::F2,
        ];
        let all = keys
            .iter()
            .filter_map(|&k| button_for(k))
            .fold(Buttons::empty(), |acc, b| {
                assert!(!acc.intersects(b));
                acc | b
            });
        assert!(all.contains(Buttons::CONTROL_MASK));
    }
}
