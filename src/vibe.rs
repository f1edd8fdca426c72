//! Vibration motor driver.
//!
//! The motor hangs off a GPIO through a transistor. Handlers never touch
//! it directly: the app task queues a [`Vibe`] and this task plays the
//! pulses one after another.

use barlog::config::{VIBE_LONG_MS, VIBE_SHORT_MS};
use barlog::Vibe;
use defmt::debug;
use embassy_nrf::gpio::{AnyPin, Level, Output, OutputDrive};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_time::{Duration, Timer};

/// Pulses waiting to be played.
pub static VIBE_REQUESTS: Channel<CriticalSectionRawMutex, Vibe, 4> = Channel::new();

/// Gap between queued pulses so two of them read as two.
const PULSE_GAP_MS: u64 = 150;

#[embassy_executor::task]
pub async fn vibe_task(pin: AnyPin) -> ! {
    let mut motor = Output::new(pin, Level::Low, OutputDrive::Standard);

    loop {
        let vibe = VIBE_REQUESTS.receive().await;
        let on_ms = match vibe {
            Vibe::Short => VIBE_SHORT_MS,
            Vibe::Long => VIBE_LONG_MS,
        };
        debug!("Vibe: {} ({} ms)", vibe, on_ms);

        motor.set_high();
        Timer::after(Duration::from_millis(on_ms)).await;
        motor.set_low();
        Timer::after(Duration::from_millis(PULSE_GAP_MS)).await;
    }
}
