//! Logging session - the single owner of all runtime state.
//!
//! The app task creates one [`Session`] at boot (fresh or restored from a
//! [`Snapshot`]) and calls its handlers from the tick, button and compass
//! events. Handlers run to completion and report side effects for the
//! runtime to actuate through [`Effects`].

use heapless::Vec;

use crate::compass::CompassSample;
use crate::config::{RestartClock, SessionConfig, CLOCK_SAVE_SECS};
use crate::log::{ReadingLog, RecordOutcome};
use crate::persist::Snapshot;
use crate::reading::Reading;
use crate::ui::gesture::{Click, Gesture};
use crate::ui::{Button, Screen};

#[cfg(test)]
mod tests;

/// Vibration pulse requested by a handler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Vibe {
    /// A reading was stored.
    Short,
    /// Reminder is due.
    Long,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Up,
    Down,
}

/// Side effects of one handler call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Effects {
    /// Pulses to play, in order. A capture and a due reminder on the
    /// same tick give `[Short, Long]`.
    pub vibes: Vec<Vibe, 2>,
    /// Set when the handler tried to store a reading.
    pub recorded: Option<RecordOutcome>,
}

impl Effects {
    const NONE: Self = Self {
        vibes: Vec::new(),
        recorded: None,
    };

    fn recorded(outcome: RecordOutcome) -> Self {
        let mut effects = Self {
            recorded: Some(outcome),
            ..Self::NONE
        };
        if outcome.is_written() {
            effects.pulse(Vibe::Short);
        }
        effects
    }

    fn pulse(&mut self, vibe: Vibe) {
        // At most one capture pulse and one reminder per handler call.
        let _ = self.vibes.push(vibe);
    }
}

pub struct Session<const N: usize> {
    config: SessionConfig,
    log: ReadingLog<N>,
    elapsed_seconds: i32,
    bar_value: i32,
    /// Monotonic second of the last unlogged pressure change.
    changed_at: Option<u64>,
    next_vibration_seconds: i32,
    screen: Screen,
    compass: Option<CompassSample>,
    dirty: bool,
    /// Clock value in the last snapshot handed out for saving.
    saved_elapsed: i32,
}

impl<const N: usize> Session<N> {
    /// Start a fresh session.
    ///
    /// Panics unless `1 <= config.capacity <= N`.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            log: ReadingLog::new(config.policy, config.capacity),
            elapsed_seconds: 0,
            bar_value: config.initial_bar,
            changed_at: None,
            next_vibration_seconds: config.vibration_interval_secs,
            screen: Screen::Main,
            compass: None,
            dirty: false,
            saved_elapsed: 0,
        }
    }

    /// Continue a saved session.
    ///
    /// The log keeps its saved layout when policy and capacity still match
    /// `config`; otherwise the saved readings are replayed oldest first
    /// under the new policy. `wall_now` is the current wall-clock time in
    /// seconds, when the device knows it.
    pub fn restore(config: SessionConfig, snapshot: &Snapshot<N>, wall_now: Option<u64>) -> Self {
        let saved = &snapshot.log;
        let log = if saved.policy() == config.policy && saved.capacity() == config.capacity {
            saved.clone()
        } else {
            ReadingLog::replay(config.policy, config.capacity, saved.all())
        };

        let mut elapsed = snapshot.elapsed_seconds;
        if config.restart_clock == RestartClock::AdvanceByWallGap {
            if let (Some(saved_at), Some(now)) = (snapshot.saved_at, wall_now) {
                if now >= saved_at {
                    let gap = i32::try_from(now - saved_at).unwrap_or(i32::MAX);
                    elapsed = elapsed.saturating_add(gap);
                }
            }
        }

        Self {
            config,
            log,
            elapsed_seconds: elapsed,
            bar_value: snapshot.bar_value,
            changed_at: None,
            next_vibration_seconds: snapshot.next_vibration_seconds,
            screen: Screen::Main,
            compass: None,
            dirty: false,
            saved_elapsed: snapshot.elapsed_seconds,
        }
    }

    /// Structured copy of everything worth keeping across a restart.
    pub fn snapshot(&self, saved_at: Option<u64>) -> Snapshot<N> {
        Snapshot {
            log: self.log.clone(),
            elapsed_seconds: self.elapsed_seconds,
            bar_value: self.bar_value,
            next_vibration_seconds: self.next_vibration_seconds,
            saved_at,
        }
    }

    // ════════════════════════════════════════════════════════════════════
    // Handlers
    // ════════════════════════════════════════════════════════════════════

    /// Once-per-second tick. `now_secs` is monotonic time in seconds.
    pub fn tick(&mut self, now_secs: u64) -> Effects {
        // The clock alone does not set `dirty`; `take_dirty` reports it
        // once it has drifted `CLOCK_SAVE_SECS` from the saved value.
        self.elapsed_seconds = self.elapsed_seconds.saturating_add(1);
        let mut effects = Effects::NONE;

        if let Some(changed_at) = self.changed_at {
            if self.config.auto_capture
                && now_secs.saturating_sub(changed_at) > self.config.quiet_period_secs
            {
                self.advance_vibration_schedule();
                self.changed_at = None;
                effects = Effects::recorded(self.record());
            }
        }

        if self.reminder_due() {
            effects.pulse(Vibe::Long);
        }
        effects
    }

    /// Store a reading right now (SELECT click).
    pub fn record_manual(&mut self) -> Effects {
        Effects::recorded(self.record())
    }

    /// Clear the log and restart the clock (SELECT double click).
    pub fn reset(&mut self) -> Effects {
        self.log.reset();
        self.elapsed_seconds = 0;
        self.bar_value = self.config.initial_bar;
        self.changed_at = None;
        self.next_vibration_seconds = self.config.vibration_interval_secs;
        self.dirty = true;
        Effects::NONE
    }

    /// Step the pressure value; logging waits for the quiet period.
    pub fn adjust_bar(&mut self, direction: Direction, now_secs: u64) -> Effects {
        let step = self.config.bar_step;
        self.bar_value = match direction {
            Direction::Up => self.bar_value.saturating_add(step),
            Direction::Down => self.bar_value.saturating_sub(step),
        };
        self.changed_at = Some(now_secs);
        self.dirty = true;
        Effects::NONE
    }

    pub fn open_history(&mut self) {
        self.screen = Screen::History { scroll: 0 };
    }

    pub fn close_history(&mut self) {
        self.screen = Screen::Main;
    }

    /// Move the history view by one row, keeping the last page full.
    pub fn scroll_history(&mut self, direction: Direction, rows: usize) {
        if let Screen::History { scroll } = self.screen {
            let top = crate::projector::clamp_scroll(self.log.len(), scroll, rows);
            let scroll = match direction {
                Direction::Up => top.saturating_sub(1),
                Direction::Down => crate::projector::clamp_scroll(self.log.len(), top + 1, rows),
            };
            self.screen = Screen::History { scroll };
        }
    }

    /// Dispatch a recognised click according to the current screen.
    pub fn on_gesture(&mut self, gesture: Gesture, now_secs: u64, history_rows: usize) -> Effects {
        match (self.screen, gesture.button, gesture.click) {
            (Screen::Main, Button::Select, Click::Single) => self.record_manual(),
            (Screen::Main, Button::Select, Click::Double) => self.reset(),
            (Screen::Main, Button::Select, Click::Long) => {
                self.open_history();
                Effects::NONE
            }
            (Screen::Main, Button::Up, Click::Single) => self.adjust_bar(Direction::Up, now_secs),
            (Screen::Main, Button::Down, Click::Single) => {
                self.adjust_bar(Direction::Down, now_secs)
            }
            // Long UP/DOWN is a shortcut for a manual reading.
            (Screen::Main, Button::Up | Button::Down, Click::Long) => self.record_manual(),
            (Screen::Main, _, Click::Double) => Effects::NONE,
            (Screen::History { .. }, Button::Up, _) => {
                self.scroll_history(Direction::Up, history_rows);
                Effects::NONE
            }
            (Screen::History { .. }, Button::Down, _) => {
                self.scroll_history(Direction::Down, history_rows);
                Effects::NONE
            }
            (Screen::History { .. }, Button::Select, _) => {
                self.close_history();
                Effects::NONE
            }
        }
    }

    /// Latest compass sample, kept only when the compass is enabled.
    pub fn on_compass(&mut self, sample: CompassSample) {
        if self.config.compass {
            self.compass = Some(sample);
        }
    }

    // ════════════════════════════════════════════════════════════════════
    // Accessors
    // ════════════════════════════════════════════════════════════════════

    pub fn log(&self) -> &ReadingLog<N> {
        &self.log
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn elapsed_seconds(&self) -> i32 {
        self.elapsed_seconds
    }

    pub fn bar_value(&self) -> i32 {
        self.bar_value
    }

    pub fn next_vibration_seconds(&self) -> i32 {
        self.next_vibration_seconds
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn compass(&self) -> Option<&CompassSample> {
        self.compass.as_ref()
    }

    /// True while a pressure change waits for its quiet period.
    pub fn change_pending(&self) -> bool {
        self.changed_at.is_some()
    }

    /// Returns and clears the "state changed since last save" flag.
    ///
    /// Also true once the running clock is `CLOCK_SAVE_SECS` away from the
    /// last saved value, so an idle device still persists its clock.
    pub fn take_dirty(&mut self) -> bool {
        let drift = u64::from(self.elapsed_seconds.abs_diff(self.saved_elapsed));
        let due = self.dirty || drift >= CLOCK_SAVE_SECS;
        if due {
            self.dirty = false;
            self.saved_elapsed = self.elapsed_seconds;
        }
        due
    }

    /// Flag the session for saving again, e.g. after a failed write.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    // ════════════════════════════════════════════════════════════════════

    fn record(&mut self) -> RecordOutcome {
        let outcome = self
            .log
            .record(Reading::new(self.elapsed_seconds, self.bar_value));
        if outcome.is_written() {
            self.dirty = true;
        }
        outcome
    }

    fn advance_vibration_schedule(&mut self) {
        if !self.config.vibration_reminder {
            return;
        }
        let step = self.config.vibration_interval_secs.max(1);
        while self.next_vibration_seconds < self.elapsed_seconds {
            self.next_vibration_seconds = self.next_vibration_seconds.saturating_add(step);
        }
    }

    fn reminder_due(&self) -> bool {
        self.config.vibration_reminder
            && self.screen == Screen::Main
            && self.next_vibration_seconds <= self.elapsed_seconds
    }
}
