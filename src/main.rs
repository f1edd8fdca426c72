//! barlog firmware entry point (nRF52840).
//!
//! Task layout:
//!   - `button_task` ×3 - debounced edges into `BUTTON_EVENTS`
//!   - `vibe_task`      - plays pulses queued on `VIBE_REQUESTS`
//!   - `main`           - owns the session, display and flash; runs the
//!                        1 s tick, click recognition and snapshot flushes

#![no_std]
#![no_main]

#[path = "ui/buttons.rs"]
mod buttons;
#[path = "ui/display.rs"]
mod display;
mod storage;
mod vibe;

use barlog::config::{
    RestartClock, SessionConfig, COMPASS_FITTED, HISTORY_ROWS, LOG_SLOTS, SNAPSHOT_FLUSH_SECS,
    VISIBLE_SLOTS,
};
use barlog::projector::{history_page, project};
use barlog::ui::gesture::{ClickRecognizer, Gesture};
use barlog::ui::{Button, Screen};
use barlog::{Effects, RecordOutcome, Session};
use defmt::{info, unwrap, warn};
use embassy_embedded_hal::adapter::BlockingAsync;
use embassy_executor::Spawner;
use embassy_futures::select::{select4, Either4};
use embassy_nrf::gpio::Pin;
use embassy_nrf::nvmc::Nvmc;
use embassy_nrf::twim::{self, Twim};
use embassy_nrf::{bind_interrupts, peripherals};
use embassy_time::{Duration, Instant, Ticker, Timer};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use buttons::BUTTON_EVENTS;
use display::Display;
use vibe::VIBE_REQUESTS;

bind_interrupts!(struct Irqs {
    TWISPI0 => twim::InterruptHandler<peripherals::TWISPI0>;
});

/// Session state lives in a static so the log is not part of the
/// main future.
static SESSION: StaticCell<Session<LOG_SLOTS>> = StaticCell::new();

/// No RTC backup on this board, so a restored clock simply resumes.
const CONFIG: SessionConfig = SessionConfig {
    compass: COMPASS_FITTED,
    restart_clock: RestartClock::Resume,
    ..SessionConfig::compass_logger()
};

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_nrf::init(Default::default());
    info!("barlog starting");

    let i2c = Twim::new(p.TWISPI0, Irqs, p.P0_26, p.P0_27, twim::Config::default());
    let mut display = display::init(i2c);

    let mut flash = BlockingAsync::new(Nvmc::new(p.NVMC));
    let session = SESSION.init(match storage::load(&mut flash).await {
        Some(snapshot) => Session::restore(CONFIG, &snapshot, None),
        None => Session::new(CONFIG),
    });

    unwrap!(spawner.spawn(buttons::button_task(p.P0_11.degrade(), Button::Up)));
    unwrap!(spawner.spawn(buttons::button_task(p.P0_12.degrade(), Button::Down)));
    unwrap!(spawner.spawn(buttons::button_task(p.P0_24.degrade(), Button::Select)));
    unwrap!(spawner.spawn(vibe::vibe_task(p.P0_13.degrade())));

    let mut tick = Ticker::every(Duration::from_secs(1));
    let mut flush = Ticker::every(Duration::from_secs(SNAPSHOT_FLUSH_SECS));
    let mut recognizer = ClickRecognizer::new();

    render(&mut display, session);

    loop {
        let deadline = recognizer
            .next_deadline()
            .map(Instant::from_millis)
            .unwrap_or(Instant::MAX);

        let effects = match select4(
            tick.next(),
            BUTTON_EVENTS.receive(),
            Timer::at(deadline),
            flush.next(),
        )
        .await
        {
            Either4::First(()) => Some(session.tick(Instant::now().as_secs())),
            Either4::Second(event) => recognizer
                .on_event(event)
                .map(|gesture| dispatch(session, gesture, event.at_ms / 1000)),
            Either4::Third(()) => recognizer
                .poll(Instant::now().as_millis())
                .map(|gesture| dispatch(session, gesture, Instant::now().as_secs())),
            Either4::Fourth(()) => {
                if session.take_dirty() {
                    if let Err(e) = storage::save(&mut flash, &session.snapshot(None)).await {
                        warn!("Session not saved, retrying next flush: {}", e);
                        session.mark_dirty();
                    }
                }
                None
            }
        };

        if let Some(effects) = effects {
            actuate(effects);
            render(&mut display, session);
        }
    }
}

fn dispatch(session: &mut Session<LOG_SLOTS>, gesture: Gesture, now_secs: u64) -> Effects {
    info!("Click: {} on {}", gesture, session.screen());
    session.on_gesture(gesture, now_secs, HISTORY_ROWS)
}

fn actuate(effects: Effects) {
    match effects.recorded {
        Some(RecordOutcome::Written { index }) => info!("Reading stored in slot {}", index),
        Some(RecordOutcome::Dropped) => warn!("Log full, reading dropped"),
        None => {}
    }
    for vibe in effects.vibes {
        if VIBE_REQUESTS.try_send(vibe).is_err() {
            warn!("Vibe queue full, {} dropped", vibe);
        }
    }
}

fn render<I2C>(display: &mut Display<I2C>, session: &Session<LOG_SLOTS>)
where
    I2C: embedded_hal::i2c::I2c,
{
    let drawn = match session.screen() {
        Screen::Main => display::draw_main(display, &project::<LOG_SLOTS, VISIBLE_SLOTS>(session)),
        Screen::History { scroll } => {
            display::draw_history(display, history_page(session.log(), scroll, HISTORY_ROWS))
        }
    };
    if let Err(e) = drawn {
        warn!("Display update failed: {}", e);
    }
}
