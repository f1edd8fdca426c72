//! Persistent storage for the logging session.
//!
//! Uses the nRF52840's internal flash via the `sequential-storage` crate
//! to keep the latest session snapshot, so readings survive a reset or
//! battery swap.
//!
//! Storage layout:
//!   - One key-value item under [`KEY_SESSION`] holding an encoded
//!     [`Snapshot`] (see `barlog::persist` for the byte layout).
//!   - Every save appends a new item; `sequential-storage` handles
//!     wear levelling and reclaims pages holding stale copies.

use barlog::config::{LOG_SLOTS, STORAGE_FLASH_PAGE_COUNT, STORAGE_FLASH_PAGE_START};
use barlog::persist::{encoded_size, Snapshot};
use barlog::Error;
use defmt::{error, info, warn};
use embedded_storage_async::nor_flash::NorFlash;

/// Flash page size for nRF52840 (4 KB).
const FLASH_PAGE_SIZE: u32 = 4096;

/// Start address of our storage region.
const STORAGE_START: u32 = STORAGE_FLASH_PAGE_START * FLASH_PAGE_SIZE;

/// End address (exclusive) of our storage region.
const STORAGE_END: u32 = (STORAGE_FLASH_PAGE_START + STORAGE_FLASH_PAGE_COUNT) * FLASH_PAGE_SIZE;

/// Key for the session snapshot in the map storage.
const KEY_SESSION: u8 = 0x01;

/// Encoded snapshot of a full log.
/// 28 header + 50 × 8 readings = 428 bytes.
const MAX_RECORD_SIZE: usize = encoded_size(LOG_SLOTS);

/// Work buffer for `sequential-storage`: the item plus its key and
/// item header, rounded up to a word multiple.
const WORK_BUF_SIZE: usize = (MAX_RECORD_SIZE + 32 + 3) & !3;

/// Load the last saved session, if any.
///
/// A missing, unreadable or undecodable snapshot all come back as
/// `None`; the caller then starts a fresh session.
pub async fn load(flash: &mut impl NorFlash) -> Option<Snapshot<LOG_SLOTS>> {
    let mut buf = [0u8; WORK_BUF_SIZE];

    match sequential_storage::map::fetch_item::<u8, &[u8], _>(
        flash,
        STORAGE_START..STORAGE_END,
        &mut sequential_storage::cache::NoCache::new(),
        &mut buf,
        &KEY_SESSION,
    )
    .await
    {
        Ok(Some(data)) => match Snapshot::decode(data) {
            Ok(snapshot) => {
                info!(
                    "Loaded session from flash: {} readings, t={}s",
                    snapshot.log.len(),
                    snapshot.elapsed_seconds
                );
                Some(snapshot)
            }
            Err(e) => {
                warn!("Discarding stored session: {}", e);
                None
            }
        },
        Ok(None) => {
            info!("No session in flash");
            None
        }
        Err(e) => {
            error!("Flash read error: {:?}", defmt::Debug2Format(&e));
            None
        }
    }
}

/// Persist a session snapshot to flash.
pub async fn save(
    flash: &mut impl NorFlash,
    snapshot: &Snapshot<LOG_SLOTS>,
) -> Result<(), Error> {
    let mut buf = [0u8; WORK_BUF_SIZE];
    let mut data_buf = [0u8; MAX_RECORD_SIZE];

    let len = snapshot.encode(&mut data_buf)?;
    let item = &data_buf[..len];

    match sequential_storage::map::store_item::<u8, &[u8], _>(
        flash,
        STORAGE_START..STORAGE_END,
        &mut sequential_storage::cache::NoCache::new(),
        &mut buf,
        &KEY_SESSION,
        &item,
    )
    .await
    {
        Ok(()) => {
            info!("Saved session to flash ({} bytes)", len);
            Ok(())
        }
        Err(e) => {
            error!("Flash write error: {:?}", defmt::Debug2Format(&e));
            Err(Error::Storage)
        }
    }
}
