//! Turns debounced press/release edges into logical clicks.
//!
//! ```text
//! UP / DOWN  short press            -> Single (on release)
//!            held >= LONG_CLICK_MS  -> Long   (while still held)
//! SELECT     short press            -> Single (once DOUBLE_CLICK_MS passes)
//!            second press in window -> Double (on that press)
//!            held >= LONG_CLICK_MS  -> Long   (while still held)
//! ```
//!
//! Timeouts are driven by [`ClickRecognizer::poll`]; the caller sleeps
//! until [`ClickRecognizer::next_deadline`].

use crate::config::{DOUBLE_CLICK_MS, LONG_CLICK_MS};
use crate::ui::{Button, ButtonEvent, Edge};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Click {
    Single,
    Double,
    Long,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Gesture {
    pub button: Button,
    pub click: Click,
}

impl Gesture {
    pub const fn new(button: Button, click: Click) -> Self {
        Self { button, click }
    }
}

#[derive(Clone, Copy, Debug)]
struct Held {
    button: Button,
    since_ms: u64,
    /// Long click already emitted, or the press completed a double click.
    consumed: bool,
}

#[derive(Clone, Debug)]
pub struct ClickRecognizer {
    held: Option<Held>,
    /// SELECT released at this time, waiting for a possible second click.
    pending_select: Option<u64>,
    long_ms: u64,
    double_ms: u64,
}

impl ClickRecognizer {
    pub const fn new() -> Self {
        Self::with_timing(LONG_CLICK_MS, DOUBLE_CLICK_MS)
    }

    pub const fn with_timing(long_ms: u64, double_ms: u64) -> Self {
        Self {
            held: None,
            pending_select: None,
            long_ms,
            double_ms,
        }
    }

    /// Feed one debounced edge.
    pub fn on_event(&mut self, ev: ButtonEvent) -> Option<Gesture> {
        match ev.edge {
            Edge::Pressed => self.on_press(ev.button, ev.at_ms),
            Edge::Released => self.on_release(ev.button, ev.at_ms),
        }
    }

    /// Emit time-driven clicks (long holds, expired single SELECT clicks).
    pub fn poll(&mut self, now_ms: u64) -> Option<Gesture> {
        if let Some(released) = self.pending_select {
            if now_ms.saturating_sub(released) >= self.double_ms {
                self.pending_select = None;
                return Some(Gesture::new(Button::Select, Click::Single));
            }
        }

        if let Some(held) = self.held.as_mut() {
            if !held.consumed && now_ms.saturating_sub(held.since_ms) >= self.long_ms {
                held.consumed = true;
                return Some(Gesture::new(held.button, Click::Long));
            }
        }

        None
    }

    /// Earliest time at which [`poll`](Self::poll) may emit a click.
    pub fn next_deadline(&self) -> Option<u64> {
        let single = self.pending_select.map(|t| t + self.double_ms);
        let long = self
            .held
            .filter(|h| !h.consumed)
            .map(|h| h.since_ms + self.long_ms);
        match (single, long) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn on_press(&mut self, button: Button, at_ms: u64) -> Option<Gesture> {
        let mut consumed = false;
        let mut out = None;

        if let Some(released) = self.pending_select.take() {
            if button == Button::Select && at_ms.saturating_sub(released) < self.double_ms {
                consumed = true;
                out = Some(Gesture::new(Button::Select, Click::Double));
            } else {
                // Another button (or a late press) settles the first click.
                out = Some(Gesture::new(Button::Select, Click::Single));
            }
        }

        self.held = Some(Held {
            button,
            since_ms: at_ms,
            consumed,
        });
        out
    }

    fn on_release(&mut self, button: Button, at_ms: u64) -> Option<Gesture> {
        let held = match self.held {
            Some(h) if h.button == button => h,
            // Release without a matching press (e.g. held across boot).
            _ => return None,
        };
        self.held = None;

        if held.consumed {
            return None;
        }
        if at_ms.saturating_sub(held.since_ms) >= self.long_ms {
            // poll() was late; the hold still counts as long.
            return Some(Gesture::new(button, Click::Long));
        }

        match button {
            Button::Select => {
                self.pending_select = Some(at_ms);
                None
            }
            _ => Some(Gesture::new(button, Click::Single)),
        }
    }
}

impl Default for ClickRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(button: Button, at_ms: u64) -> ButtonEvent {
        ButtonEvent {
            button,
            edge: Edge::Pressed,
            at_ms,
        }
    }

    fn release(button: Button, at_ms: u64) -> ButtonEvent {
        ButtonEvent {
            button,
            edge: Edge::Released,
            at_ms,
        }
    }

    #[test]
    fn up_click_fires_on_release() {
        let mut r = ClickRecognizer::new();
        assert_eq!(r.on_event(press(Button::Up, 0)), None);
        assert_eq!(
            r.on_event(release(Button::Up, 120)),
            Some(Gesture::new(Button::Up, Click::Single))
        );
        assert_eq!(r.next_deadline(), None);
    }

    #[test]
    fn down_hold_fires_long_once() {
        let mut r = ClickRecognizer::new();
        r.on_event(press(Button::Down, 1_000));
        assert_eq!(r.next_deadline(), Some(2_000));
        assert_eq!(r.poll(1_999), None);
        assert_eq!(r.poll(2_000), Some(Gesture::new(Button::Down, Click::Long)));
        assert_eq!(r.poll(2_500), None);
        assert_eq!(r.on_event(release(Button::Down, 2_600)), None);
    }

    #[test]
    fn late_poll_still_reports_long_on_release() {
        let mut r = ClickRecognizer::new();
        r.on_event(press(Button::Up, 0));
        assert_eq!(
            r.on_event(release(Button::Up, 1_500)),
            Some(Gesture::new(Button::Up, Click::Long))
        );
    }

    #[test]
    fn select_single_waits_for_double_window() {
        let mut r = ClickRecognizer::new();
        r.on_event(press(Button::Select, 0));
        assert_eq!(r.on_event(release(Button::Select, 80)), None);
        assert_eq!(r.next_deadline(), Some(380));
        assert_eq!(r.poll(300), None);
        assert_eq!(
            r.poll(380),
            Some(Gesture::new(Button::Select, Click::Single))
        );
        assert_eq!(r.poll(1_000), None);
    }

    #[test]
    fn select_double_fires_on_second_press() {
        let mut r = ClickRecognizer::new();
        r.on_event(press(Button::Select, 0));
        r.on_event(release(Button::Select, 80));
        assert_eq!(
            r.on_event(press(Button::Select, 200)),
            Some(Gesture::new(Button::Select, Click::Double))
        );
        // Neither the release nor a long hold adds anything.
        assert_eq!(r.poll(1_500), None);
        assert_eq!(r.on_event(release(Button::Select, 1_600)), None);
        assert_eq!(r.next_deadline(), None);
    }

    #[test]
    fn other_button_settles_pending_select() {
        let mut r = ClickRecognizer::new();
        r.on_event(press(Button::Select, 0));
        r.on_event(release(Button::Select, 50));
        assert_eq!(
            r.on_event(press(Button::Up, 100)),
            Some(Gesture::new(Button::Select, Click::Single))
        );
        assert_eq!(
            r.on_event(release(Button::Up, 150)),
            Some(Gesture::new(Button::Up, Click::Single))
        );
    }

    #[test]
    fn select_hold_opens_long() {
        let mut r = ClickRecognizer::new();
        r.on_event(press(Button::Select, 10));
        assert_eq!(
            r.poll(1_010),
            Some(Gesture::new(Button::Select, Click::Long))
        );
        assert_eq!(r.on_event(release(Button::Select, 1_200)), None);
        assert_eq!(r.next_deadline(), None);
    }

    #[test]
    fn stray_release_is_ignored() {
        let mut r = ClickRecognizer::new();
        assert_eq!(r.on_event(release(Button::Select, 5)), None);
        assert_eq!(r.next_deadline(), None);
    }
}
