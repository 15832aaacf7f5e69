//! Controller polling with optional button autorepeat.
//!
//! In [`PollingMode::Normal`] every poll reports the buttons currently held.
//! In [`PollingMode::Autorepeat`] a held button is reported once when first
//! pressed, again after [`REPEAT_DELAY_MS`], then every
//! [`REPEAT_INTERVAL_MS`] until released. Either way the analog direction
//! bits are rebuilt from the stick position.

use std::collections::VecDeque;

use pocket_types::backend::PadSource;
use pocket_types::input::{Buttons, PadState};

use crate::exit::ExitFlag;
use crate::services::Clock;

/// Delay before a held button starts repeating.
pub const REPEAT_DELAY_MS: u64 = 400;
/// Interval between repeats once repeating.
pub const REPEAT_INTERVAL_MS: u64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollingMode {
    #[default]
    Normal,
    Autorepeat,
}

/// Something the UI loops can poll once per frame.
pub trait InputSource {
    /// Sample the controller at time `now_ms`. `None` when the device did
    /// not answer this frame.
    fn poll(&mut self, now_ms: u64) -> Option<PadState>;
}

/// Wraps a raw [`PadSource`] and applies the polling mode.
pub struct Controller<S> {
    source: S,
    mode: PollingMode,
    /// Next time each repeatable button fires; `None` while released.
    next_fire: [Option<u64>; 12],
}

impl<S: PadSource> Controller<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            mode: PollingMode::Normal,
            next_fire: [None; 12],
        }
    }

    pub fn mode(&self) -> PollingMode {
        self.mode
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Switch polling mode.
    ///
    /// Leaving autorepeat blocks until no held button is still inside its
    /// repeat delay, so a press that is about to repeat is not lost into
    /// the next screen. Entering autorepeat arms every button held right
    /// now with the full delay.
    pub fn set_mode<C: Clock + ?Sized>(&mut self, mode: PollingMode, clock: &C) {
        if self.mode == PollingMode::Autorepeat {
            while let Some(pad) = self.source.peek() {
                let now = clock.ticks_ms();
                if !self.any_pending(pad.buttons, now) {
                    break;
                }
                clock.sleep_ms(1);
            }
        }

        log::debug!("controller polling mode {:?} -> {mode:?}", self.mode);
        self.mode = mode;

        if mode == PollingMode::Autorepeat {
            self.next_fire = [None; 12];
            if let Some(pad) = self.source.peek() {
                let now = clock.ticks_ms();
                for (slot, button) in self.next_fire.iter_mut().zip(Buttons::REPEATABLE) {
                    if pad.buttons.contains(button) {
                        *slot = Some(now + REPEAT_DELAY_MS);
                    }
                }
            }
        }
    }

    fn any_pending(&self, held: Buttons, now: u64) -> bool {
        self.next_fire
            .iter()
            .zip(Buttons::REPEATABLE)
            .any(|(slot, button)| held.contains(button) && slot.is_some_and(|t| now < t))
    }

    fn apply_autorepeat(&mut self, raw: PadState, now: u64) -> PadState {
        let mut out = raw;
        for (slot, button) in self.next_fire.iter_mut().zip(Buttons::REPEATABLE) {
            if !raw.buttons.contains(button) {
                out.buttons.remove(button);
                *slot = None;
                continue;
            }
            match *slot {
                None => {
                    out.buttons.insert(button);
                    *slot = Some(now + REPEAT_DELAY_MS);
                },
                Some(t) if now >= t => {
                    out.buttons.insert(button);
                    *slot = Some(now + REPEAT_INTERVAL_MS);
                },
                Some(_) => out.buttons.remove(button),
            }
        }
        out
    }
}

impl<S: PadSource> InputSource for Controller<S> {
    fn poll(&mut self, now_ms: u64) -> Option<PadState> {
        let raw = self.source.peek()?;
        let pad = match self.mode {
            PollingMode::Normal => raw,
            PollingMode::Autorepeat => self.apply_autorepeat(raw, now_ms),
        };
        Some(pad.with_analog_bits())
    }
}

/// Pad that replays a fixed list of samples, one per poll.
///
/// Once the script runs out it raises the attached exit flag (if any) and
/// stops answering, which ends any UI loop driven by it.
#[derive(Debug, Default)]
pub struct ScriptedPad {
    frames: VecDeque<PadState>,
    exit: Option<ExitFlag>,
}

impl ScriptedPad {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold `buttons` for one frame, then release for one frame.
    pub fn press(mut self, buttons: Buttons) -> Self {
        self.frames.push_back(PadState::new(buttons));
        self.frames.push_back(PadState::default());
        self
    }

    /// Hold `buttons` for `frames` consecutive polls.
    pub fn hold(mut self, buttons: Buttons, frames: usize) -> Self {
        self.frames
            .extend(std::iter::repeat_n(PadState::new(buttons), frames));
        self
    }

    /// Push the analog stick for one frame.
    pub fn stick(mut self, lx: u8, ly: u8) -> Self {
        self.frames.push_back(PadState::analog(lx, ly));
        self
    }

    /// Idle polls with nothing pressed.
    pub fn idle(self, frames: usize) -> Self {
        self.hold(Buttons::empty(), frames)
    }

    /// Raise `flag` once the script is exhausted.
    pub fn then_exit(mut self, flag: &ExitFlag) -> Self {
        self.exit = Some(flag.clone());
        self
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl PadSource for ScriptedPad {
    fn peek(&mut self) -> Option<PadState> {
        let next = self.frames.pop_front();
        if next.is_none() {
            if let Some(flag) = &self.exit {
                flag.request();
            }
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Raw source reporting a fixed state.
    struct Held(Option<PadState>);

    impl PadSource for Held {
        fn peek(&mut self) -> Option<PadState> {
            self.0
        }
    }

    struct ManualClock(Cell<u64>);

    impl Clock for ManualClock {
        fn ticks_ms(&self) -> u64 {
            self.0.get()
        }
        fn sleep_ms(&self, ms: u64) {
            self.0.set(self.0.get() + ms);
        }
    }

    fn held(b: Buttons) -> Held {
        Held(Some(PadState::new(b)))
    }

    #[test]
    fn normal_mode_reports_raw_state() {
        let mut c = Controller::new(held(Buttons::CROSS | Buttons::UP));
        let pad = c.poll(0).unwrap();
        assert_eq!(pad.buttons, Buttons::CROSS | Buttons::UP);
        assert_eq!(c.poll(1).unwrap().buttons, Buttons::CROSS | Buttons::UP);
    }

    #[test]
    fn normal_mode_synthesizes_analog_bits() {
        let mut c = Controller::new(Held(Some(PadState::analog(0, 255))));
        let pad = c.poll(0).unwrap();
        assert_eq!(pad.buttons, Buttons::ANALOG_LEFT | Buttons::ANALOG_DOWN);
    }

    #[test]
    fn silent_source_yields_none() {
        let mut c = Controller::new(Held(None));
        assert!(c.poll(0).is_none());
    }

    #[test]
    fn autorepeat_timeline() {
        let clock = ManualClock(Cell::new(0));
        let mut c = Controller::new(held(Buttons::empty()));
        c.set_mode(PollingMode::Autorepeat, &clock);

        *c.source_mut() = held(Buttons::DOWN);
        assert!(c.poll(1000).unwrap().buttons.contains(Buttons::DOWN), "first press");
        assert!(!c.poll(1001).unwrap().buttons.contains(Buttons::DOWN));
        assert!(!c.poll(1399).unwrap().buttons.contains(Buttons::DOWN));
        assert!(c.poll(1400).unwrap().buttons.contains(Buttons::DOWN), "after delay");
        assert!(!c.poll(1449).unwrap().buttons.contains(Buttons::DOWN));
        assert!(c.poll(1450).unwrap().buttons.contains(Buttons::DOWN), "repeat");

        *c.source_mut() = held(Buttons::empty());
        assert!(c.poll(1460).unwrap().buttons.is_empty());
        *c.source_mut() = held(Buttons::DOWN);
        assert!(c.poll(1461).unwrap().buttons.contains(Buttons::DOWN), "release resets");
    }

    #[test]
    fn entering_autorepeat_arms_held_buttons() {
        let clock = ManualClock(Cell::new(500));
        let mut c = Controller::new(held(Buttons::CROSS));
        c.set_mode(PollingMode::Autorepeat, &clock);
        assert!(!c.poll(500).unwrap().buttons.contains(Buttons::CROSS));
        assert!(c.poll(900).unwrap().buttons.contains(Buttons::CROSS));
    }

    #[test]
    fn leaving_autorepeat_waits_for_pending_repeat() {
        let clock = ManualClock(Cell::new(0));
        let mut c = Controller::new(held(Buttons::CROSS));
        c.set_mode(PollingMode::Autorepeat, &clock);
        c.set_mode(PollingMode::Normal, &clock);
        assert_eq!(c.mode(), PollingMode::Normal);
        assert!(clock.ticks_ms() >= REPEAT_DELAY_MS);
    }

    #[test]
    fn leaving_autorepeat_with_nothing_held_is_immediate() {
        let clock = ManualClock(Cell::new(0));
        let mut c = Controller::new(held(Buttons::empty()));
        c.set_mode(PollingMode::Autorepeat, &clock);
        c.set_mode(PollingMode::Normal, &clock);
        assert_eq!(clock.ticks_ms(), 0);
    }

    #[test]
    fn non_repeatable_bits_pass_through() {
        let clock = ManualClock(Cell::new(0));
        let mut c = Controller::new(Held(Some(PadState::analog(128, 0))));
        c.set_mode(PollingMode::Autorepeat, &clock);
        assert!(c.poll(10).unwrap().buttons.contains(Buttons::ANALOG_UP));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn autorepeat_respects_delay_and_interval(
                schedule in prop::collection::vec((any::<bool>(), 1u64..120), 1..80)
            ) {
                let clock = ManualClock(Cell::new(0));
                let mut c = Controller::new(held(Buttons::empty()));
                c.set_mode(PollingMode::Autorepeat, &clock);

                let mut now = 1000;
                let mut was_held = false;
                let mut pressed_at = 0;
                let mut last_report: Option<u64> = None;
                for (down, dt) in schedule {
                    now += dt;
                    *c.source_mut() = held(if down { Buttons::DOWN } else { Buttons::empty() });
                    let reported = c.poll(now).unwrap().buttons.contains(Buttons::DOWN);

                    if !down {
                        prop_assert!(!reported);
                        last_report = None;
                    } else if !was_held {
                        prop_assert!(reported, "first press at {} not reported", now);
                        pressed_at = now;
                        last_report = Some(now);
                    } else if reported {
                        match last_report {
                            Some(t) if t == pressed_at => {
                                prop_assert!(now - pressed_at >= REPEAT_DELAY_MS);
                            },
                            Some(t) => prop_assert!(now - t >= REPEAT_INTERVAL_MS),
                            None => prop_assert!(false, "report without a press"),
                        }
                        last_report = Some(now);
                    }
                    was_held = down;
                }
            }
        }
    }

    #[test]
    fn scripted_pad_replays_then_exits() {
        let flag = ExitFlag::new();
        let mut pad = ScriptedPad::new()
            .press(Buttons::CROSS)
            .idle(1)
            .then_exit(&flag);
        assert_eq!(pad.remaining(), 3);
        assert_eq!(pad.peek().unwrap().buttons, Buttons::CROSS);
        assert!(pad.peek().unwrap().buttons.is_empty());
        assert!(pad.peek().is_some());
        assert!(!flag.is_requested());
        assert!(pad.peek().is_none());
        assert!(flag.is_requested());
    }
}
