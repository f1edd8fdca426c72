//! GPIO button input with async debouncing.
//!
//! Three physical buttons (active-low with internal pull-up):
//!   - UP     - raise pressure / scroll history up
//!   - DOWN   - lower pressure / scroll history down
//!   - SELECT - record, reset (double), history (long)
//!
//! Each button is handled by an async task that waits for a GPIO edge,
//! debounces it, and sends a timestamped `ButtonEvent` to the app task.
//! Click timing (long, double) is decided there, not here.

use barlog::config::BUTTON_DEBOUNCE_MS;
use barlog::ui::{Button, ButtonEvent, Edge};
use defmt::debug;
use embassy_nrf::gpio::{AnyPin, Input, Pull};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_time::{Duration, Instant, Timer};

/// Button edges waiting for the app task.
pub static BUTTON_EVENTS: Channel<CriticalSectionRawMutex, ButtonEvent, 8> = Channel::new();

/// Run a single button polling loop.
///
/// Waits for the pin to go low (pressed), debounces, sends the press,
/// then waits for release and sends that too.
#[embassy_executor::task(pool_size = 3)]
pub async fn button_task(pin: AnyPin, button: Button) -> ! {
    let mut btn = Input::new(pin, Pull::Up);

    loop {
        // Wait for falling edge (button press, active-low).
        btn.wait_for_falling_edge().await;
        let pressed_at = Instant::now();

        // Debounce: wait and re-check.
        Timer::after(Duration::from_millis(BUTTON_DEBOUNCE_MS)).await;
        if !btn.is_low() {
            continue;
        }
        send(button, Edge::Pressed, pressed_at).await;

        btn.wait_for_rising_edge().await;
        let released_at = Instant::now();
        Timer::after(Duration::from_millis(BUTTON_DEBOUNCE_MS)).await;
        send(button, Edge::Released, released_at).await;
    }
}

async fn send(button: Button, edge: Edge, at: Instant) {
    debug!("Button: {} {}", button, edge);
    BUTTON_EVENTS
        .send(ButtonEvent {
            button,
            edge,
            at_ms: at.as_millis(),
        })
        .await;
}
