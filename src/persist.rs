//! Structured session snapshot and its flash encoding.
//!
//! Layout (little-endian, version 1):
//! ```text
//! Byte  0      : format version (1)
//! Byte  1      : capacity policy tag
//! Bytes 2..4   : capacity  (u16)
//! Bytes 4..6   : cursor    (u16)
//! Bytes 6..8   : count     (u16)
//! Bytes 8..12  : elapsed seconds          (i32)
//! Bytes 12..16 : bar value                (i32)
//! Bytes 16..20 : next vibration seconds   (i32)
//! Bytes 20..28 : saved-at wall clock, u64::MAX = unknown
//! Then count × [elapsed i32][bar i32] in physical slot order
//! ```

use heapless::Vec;

use crate::error::CodecError;
use crate::log::{CapacityPolicy, ReadingLog};
use crate::reading::Reading;

/// Current encoding version.
pub const SNAPSHOT_VERSION: u8 = 1;

/// Header size in bytes.
pub const HEADER_SIZE: usize = 28;

/// Bytes per stored reading.
pub const READING_SIZE: usize = 8;

const NO_WALL_CLOCK: u64 = u64::MAX;

/// Worst-case encoded size for a log of `n` slots.
pub const fn encoded_size(n: usize) -> usize {
    HEADER_SIZE + n * READING_SIZE
}

/// Everything needed to rebuild a session after a restart.
#[derive(Clone, Debug)]
pub struct Snapshot<const N: usize> {
    pub log: ReadingLog<N>,
    pub elapsed_seconds: i32,
    pub bar_value: i32,
    pub next_vibration_seconds: i32,
    /// Wall-clock seconds at save time, when known.
    pub saved_at: Option<u64>,
}

impl<const N: usize> Snapshot<N> {
    /// Serialise into `buf`. Returns the number of bytes written.
    pub fn encode(&self, buf: &mut [u8]) -> Result<usize, CodecError> {
        let slots = self.log.slots();
        let total = encoded_size(slots.len());
        if buf.len() < total {
            return Err(CodecError::BufferTooSmall);
        }
        let capacity = u16::try_from(self.log.capacity()).map_err(|_| CodecError::InvalidLayout)?;

        buf[0] = SNAPSHOT_VERSION;
        buf[1] = self.log.policy().tag();
        buf[2..4].copy_from_slice(&capacity.to_le_bytes());
        buf[4..6].copy_from_slice(&(self.log.cursor() as u16).to_le_bytes());
        buf[6..8].copy_from_slice(&(slots.len() as u16).to_le_bytes());
        buf[8..12].copy_from_slice(&self.elapsed_seconds.to_le_bytes());
        buf[12..16].copy_from_slice(&self.bar_value.to_le_bytes());
        buf[16..20].copy_from_slice(&self.next_vibration_seconds.to_le_bytes());
        buf[20..28].copy_from_slice(&self.saved_at.unwrap_or(NO_WALL_CLOCK).to_le_bytes());

        for (chunk, reading) in buf[HEADER_SIZE..total]
            .chunks_exact_mut(READING_SIZE)
            .zip(slots)
        {
            chunk[0..4].copy_from_slice(&reading.elapsed_seconds().to_le_bytes());
            chunk[4..8].copy_from_slice(&reading.bar_value().to_le_bytes());
        }

        Ok(total)
    }

    /// Parse a snapshot written by [`encode`](Self::encode).
    pub fn decode(data: &[u8]) -> Result<Self, CodecError> {
        if data.len() < HEADER_SIZE {
            return Err(CodecError::Truncated);
        }
        if data[0] != SNAPSHOT_VERSION {
            return Err(CodecError::UnsupportedVersion(data[0]));
        }
        let policy = CapacityPolicy::from_tag(data[1]).ok_or(CodecError::InvalidPolicy(data[1]))?;
        let capacity = read_u16(data, 2) as usize;
        let cursor = read_u16(data, 4) as usize;
        let count = read_u16(data, 6) as usize;

        if count > N {
            return Err(CodecError::InvalidLayout);
        }
        if data.len() < encoded_size(count) {
            return Err(CodecError::Truncated);
        }

        let mut slots: Vec<Reading, N> = Vec::new();
        for chunk in data[HEADER_SIZE..encoded_size(count)].chunks_exact(READING_SIZE) {
            let reading = Reading::new(read_i32(chunk, 0), read_i32(chunk, 4));
            // count <= N was checked above.
            let _ = slots.push(reading);
        }

        let log = ReadingLog::from_parts(policy, capacity, cursor, &slots)
            .ok_or(CodecError::InvalidLayout)?;

        let saved_at = match read_u64(data, 20) {
            NO_WALL_CLOCK => None,
            t => Some(t),
        };

        Ok(Self {
            log,
            elapsed_seconds: read_i32(data, 8),
            bar_value: read_i32(data, 12),
            next_vibration_seconds: read_i32(data, 16),
            saved_at,
        })
    }
}

fn read_u16(data: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([data[at], data[at + 1]])
}

fn read_i32(data: &[u8], at: usize) -> i32 {
    i32::from_le_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]])
}

fn read_u64(data: &[u8], at: usize) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&data[at..at + 8]);
    u64::from_le_bytes(bytes)
}
