use super::*;
use crate::config::{RestartClock, SessionConfig};
use crate::log::CapacityPolicy;
use crate::ui::gesture::{Click, Gesture};
use crate::ui::{Button, Screen};

const ROWS: usize = 4;

fn ticks<const N: usize>(session: &mut Session<N>, from: u64, to: u64) -> std::vec::Vec<Effects> {
    (from..=to).map(|now| session.tick(now)).collect()
}

fn quiet_config() -> SessionConfig {
    SessionConfig {
        vibration_reminder: false,
        ..SessionConfig::compass_logger()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Debounced auto-capture
// ════════════════════════════════════════════════════════════════════════════

#[test]
fn pressure_change_is_logged_after_quiet_period() {
    let mut s: Session<50> = Session::new(quiet_config());
    s.adjust_bar(Direction::Up, 100);
    assert_eq!(s.bar_value(), 205);

    // now - changed_at must exceed 3 s.
    for effects in ticks(&mut s, 100, 103) {
        assert_eq!(effects.recorded, None);
    }
    assert!(s.log().is_empty());
    assert!(s.change_pending());

    let effects = s.tick(104);
    assert_eq!(effects.recorded, Some(RecordOutcome::Written { index: 0 }));
    assert_eq!(effects.vibes, [Vibe::Short]);
    assert_eq!(s.log().latest(), Some(Reading::new(5, 205)));
    assert!(!s.change_pending());
}

#[test]
fn one_capture_per_quiet_interval() {
    let mut s: Session<50> = Session::new(quiet_config());
    s.adjust_bar(Direction::Down, 10);
    let captures = ticks(&mut s, 11, 40)
        .iter()
        .filter(|e| e.recorded.is_some())
        .count();
    assert_eq!(captures, 1);
    assert_eq!(s.log().len(), 1);
}

#[test]
fn repeated_changes_restart_quiet_period() {
    let mut s: Session<50> = Session::new(quiet_config());
    s.adjust_bar(Direction::Up, 0);
    s.tick(1);
    s.tick(2);
    s.adjust_bar(Direction::Up, 3);
    assert_eq!(s.tick(4).recorded, None);
    assert_eq!(s.tick(6).recorded, None);
    assert!(s.tick(7).recorded.is_some());
    assert_eq!(s.log().latest().unwrap().bar_value(), 210);
}

#[test]
fn auto_capture_can_be_disabled() {
    let mut s: Session<50> = Session::new(SessionConfig {
        auto_capture: false,
        ..quiet_config()
    });
    s.adjust_bar(Direction::Up, 0);
    ticks(&mut s, 1, 20);
    assert!(s.log().is_empty());
}

#[test]
fn auto_capture_on_full_log_is_silent() {
    let mut s: Session<50> = Session::new(SessionConfig {
        capacity: 1,
        ..quiet_config()
    });
    s.record_manual();
    s.adjust_bar(Direction::Up, 0);
    let effects = s.tick(4);
    assert_eq!(effects.recorded, Some(RecordOutcome::Dropped));
    assert!(effects.vibes.is_empty());
    assert!(!s.change_pending());
}

// ════════════════════════════════════════════════════════════════════════════
// Vibration reminder
// ════════════════════════════════════════════════════════════════════════════

#[test]
fn reminder_repeats_until_capture_moves_threshold() {
    let mut s: Session<50> = Session::new(SessionConfig::compass_logger());
    for now in 1..300 {
        assert!(s.tick(now).vibes.is_empty(), "no reminder at {}", now);
    }
    // elapsed reaches 300.
    assert_eq!(s.tick(300).vibes, [Vibe::Long]);
    assert_eq!(s.tick(301).vibes, [Vibe::Long]);

    s.adjust_bar(Direction::Up, 301);
    ticks(&mut s, 302, 304);
    // Capture at elapsed 305 moves the threshold to 600.
    let effects = s.tick(305);
    assert!(effects.recorded.is_some());
    assert_eq!(s.next_vibration_seconds(), 600);
    assert_eq!(effects.vibes, [Vibe::Short]);

    for now in 306..600 {
        assert!(s.tick(now).vibes.is_empty(), "no reminder at {}", now);
    }
    assert_eq!(s.tick(600).vibes, [Vibe::Long]);
}

#[test]
fn late_capture_skips_missed_intervals() {
    let mut s: Session<50> = Session::new(SessionConfig::compass_logger());
    ticks(&mut s, 1, 950);
    s.adjust_bar(Direction::Up, 950);
    ticks(&mut s, 951, 954);
    assert_eq!(s.elapsed_seconds(), 954);
    assert_eq!(s.next_vibration_seconds(), 1200);
}

#[test]
fn manual_record_does_not_move_threshold() {
    let mut s: Session<50> = Session::new(SessionConfig::compass_logger());
    ticks(&mut s, 1, 400);
    s.record_manual();
    assert_eq!(s.next_vibration_seconds(), 300);
    assert_eq!(s.tick(401).vibes, [Vibe::Long]);
}

#[test]
fn capture_and_reminder_on_same_tick_give_both_pulses() {
    let mut s: Session<50> = Session::new(SessionConfig::compass_logger());
    ticks(&mut s, 1, 295);
    s.adjust_bar(Direction::Up, 296);
    for now in 296..300 {
        assert!(s.tick(now).recorded.is_none());
    }
    // elapsed 300: capture and the due reminder coincide.
    let effects = s.tick(300);
    assert_eq!(s.elapsed_seconds(), 300);
    assert_eq!(effects.recorded, Some(RecordOutcome::Written { index: 0 }));
    assert_eq!(effects.vibes, [Vibe::Short, Vibe::Long]);
}

#[test]
fn reminder_is_silent_in_history_view() {
    let mut s: Session<50> = Session::new(SessionConfig::compass_logger());
    ticks(&mut s, 1, 299);
    s.open_history();
    assert!(s.tick(300).vibes.is_empty());
    s.close_history();
    assert_eq!(s.tick(301).vibes, [Vibe::Long]);
}

// ════════════════════════════════════════════════════════════════════════════
// Reset and gestures
// ════════════════════════════════════════════════════════════════════════════

#[test]
fn reset_clears_log_clock_and_pressure() {
    let mut s: Session<10> = Session::new(SessionConfig::rolling(10));
    ticks(&mut s, 1, 12);
    s.adjust_bar(Direction::Up, 12);
    s.record_manual();
    s.reset();
    assert_eq!(s.elapsed_seconds(), 0);
    assert_eq!(s.bar_value(), 200);
    assert!(s.log().is_empty());
    assert_eq!(s.log().window(3).count(), 0);
    assert!(!s.change_pending());
    assert_eq!(s.log().capacity(), 10);
    assert_eq!(s.log().policy(), CapacityPolicy::Circular);
}

#[test]
fn main_screen_gestures() {
    let mut s: Session<50> = Session::new(quiet_config());
    let up = Gesture::new(Button::Up, Click::Single);
    let down = Gesture::new(Button::Down, Click::Single);

    s.on_gesture(up, 0, ROWS);
    s.on_gesture(up, 0, ROWS);
    s.on_gesture(down, 0, ROWS);
    assert_eq!(s.bar_value(), 205);

    let e = s.on_gesture(Gesture::new(Button::Select, Click::Single), 0, ROWS);
    assert_eq!(e.vibes, [Vibe::Short]);
    let e = s.on_gesture(Gesture::new(Button::Up, Click::Long), 0, ROWS);
    assert_eq!(e.recorded, Some(RecordOutcome::Written { index: 1 }));

    s.on_gesture(Gesture::new(Button::Select, Click::Double), 0, ROWS);
    assert!(s.log().is_empty());

    s.on_gesture(Gesture::new(Button::Select, Click::Long), 0, ROWS);
    assert_eq!(s.screen(), Screen::History { scroll: 0 });
}

#[test]
fn history_screen_gestures_scroll_and_close() {
    let mut s: Session<50> = Session::new(quiet_config());
    for _ in 0..6 {
        s.record_manual();
    }
    s.open_history();
    let up = Gesture::new(Button::Up, Click::Single);
    let down = Gesture::new(Button::Down, Click::Single);

    s.on_gesture(up, 0, ROWS);
    assert_eq!(s.screen(), Screen::History { scroll: 0 });
    s.on_gesture(down, 0, ROWS);
    s.on_gesture(down, 0, ROWS);
    s.on_gesture(down, 0, ROWS);
    // 6 readings, 4 rows: top row stops at 2.
    assert_eq!(s.screen(), Screen::History { scroll: 2 });
    s.on_gesture(up, 0, ROWS);
    assert_eq!(s.screen(), Screen::History { scroll: 1 });

    // Buttons do not touch pressure or log while browsing.
    assert_eq!(s.bar_value(), 200);
    assert_eq!(s.log().len(), 6);

    s.on_gesture(Gesture::new(Button::Select, Click::Single), 0, ROWS);
    assert_eq!(s.screen(), Screen::Main);
}

#[test]
fn compass_samples_ignored_when_disabled() {
    let mut s: Session<10> = Session::new(SessionConfig::rolling(10));
    s.on_compass(crate::compass::CompassSample {
        angle: 0,
        status: crate::compass::CompassStatus::Calibrated,
    });
    assert!(s.compass().is_none());
}

// ════════════════════════════════════════════════════════════════════════════
// Dirty tracking and restore
// ════════════════════════════════════════════════════════════════════════════

#[test]
fn dirty_flag_tracks_saved_state() {
    let mut s: Session<10> = Session::new(SessionConfig::rolling(10));
    assert!(!s.take_dirty());
    s.tick(1);
    assert!(!s.take_dirty());
    s.record_manual();
    assert!(s.take_dirty());
    assert!(!s.take_dirty());
    s.adjust_bar(Direction::Up, 2);
    assert!(s.take_dirty());
    s.mark_dirty();
    assert!(s.take_dirty());
}

#[test]
fn idle_clock_is_marked_for_saving() {
    let config = SessionConfig::rolling(10);
    let mut s: Session<10> = Session::new(config);
    s.record_manual();
    assert!(s.take_dirty());

    ticks(&mut s, 1, 3600);
    assert_eq!(s.elapsed_seconds(), 3600);
    assert!(s.take_dirty());
    let snap = s.snapshot(None);
    assert!(!s.take_dirty());

    let back: Session<10> = Session::restore(config, &snap, None);
    assert_eq!(back.elapsed_seconds(), 3600);
    assert_eq!(back.log().len(), 1);
}

#[test]
fn clock_drift_below_threshold_is_not_saved() {
    let mut s: Session<10> = Session::new(SessionConfig::rolling(10));
    let below = crate::config::CLOCK_SAVE_SECS - 1;
    ticks(&mut s, 1, below);
    assert!(!s.take_dirty());
    s.tick(below + 1);
    assert!(s.take_dirty());
    assert!(!s.take_dirty());
}

#[test]
fn restore_resumes_saved_state() {
    let mut s: Session<10> = Session::new(SessionConfig::rolling(5));
    for now in 1..=8 {
        s.tick(now);
        s.record_manual();
    }
    s.adjust_bar(Direction::Down, 8);
    let snap = s.snapshot(Some(1_000));

    let back: Session<10> = Session::restore(SessionConfig::rolling(5), &snap, Some(1_060));
    assert_eq!(back.elapsed_seconds(), 8);
    assert_eq!(back.bar_value(), 195);
    let times: std::vec::Vec<i32> = back.log().all().map(|r| r.elapsed_seconds()).collect();
    assert_eq!(times, [4, 5, 6, 7, 8]);
    assert_eq!(back.log().cursor(), s.log().cursor());
    assert!(!back.change_pending());
}

#[test]
fn restore_can_advance_clock_by_wall_gap() {
    let config = SessionConfig::compass_logger();
    assert_eq!(config.restart_clock, RestartClock::AdvanceByWallGap);
    let mut s: Session<50> = Session::new(config);
    ticks(&mut s, 1, 100);
    let snap = s.snapshot(Some(5_000));

    let back: Session<50> = Session::restore(config, &snap, Some(5_042));
    assert_eq!(back.elapsed_seconds(), 142);

    // Unknown or backwards wall clock leaves the clock as saved.
    let back: Session<50> = Session::restore(config, &snap, None);
    assert_eq!(back.elapsed_seconds(), 100);
    let back: Session<50> = Session::restore(config, &snap, Some(4_000));
    assert_eq!(back.elapsed_seconds(), 100);
}

#[test]
fn restore_replays_under_new_policy() {
    let mut s: Session<20> = Session::new(SessionConfig::capped(20));
    for now in 1..=12 {
        s.tick(now);
        s.record_manual();
    }
    let snap = s.snapshot(None);

    let back: Session<20> = Session::restore(SessionConfig::rolling(4), &snap, None);
    assert_eq!(back.log().policy(), CapacityPolicy::Circular);
    let times: std::vec::Vec<i32> = back.log().all().map(|r| r.elapsed_seconds()).collect();
    assert_eq!(times, [9, 10, 11, 12]);
}
