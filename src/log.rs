//! Bounded reading log with a configurable capacity policy.
//!
//! Readings live in a fixed `heapless::Vec<Reading, N>`; the runtime
//! `capacity` may be smaller than `N`. Three policies decide what happens
//! once the log is full:
//!
//! ```text
//! StopAtCapacity   [r1 r2 r3]  + r4  -> [r1 r2 r3]       (dropped)
//! Circular         [r1 r2 r3]  + r4  -> [r4 r2 r3]       (cursor 1)
//! CapAndFreeze     [r1 r2 r3]  + r4  -> [r1 r2 r4]       (slot 2 reused)
//! ```

use heapless::Vec;

use crate::reading::Reading;

/// What a full log does with the next reading.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CapacityPolicy {
    /// Further records are dropped.
    StopAtCapacity,
    /// Oldest entry is overwritten, write cursor advances modulo capacity.
    Circular,
    /// Last slot is overwritten on every record.
    CapAndFreeze,
}

impl CapacityPolicy {
    /// Stable tag used by the snapshot codec.
    pub const fn tag(self) -> u8 {
        match self {
            CapacityPolicy::StopAtCapacity => 0,
            CapacityPolicy::Circular => 1,
            CapacityPolicy::CapAndFreeze => 2,
        }
    }

    pub const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(CapacityPolicy::StopAtCapacity),
            1 => Some(CapacityPolicy::Circular),
            2 => Some(CapacityPolicy::CapAndFreeze),
            _ => None,
        }
    }
}

/// Result of [`ReadingLog::record`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RecordOutcome {
    /// The reading was stored in this physical slot.
    Written { index: usize },
    /// The log was full under [`CapacityPolicy::StopAtCapacity`].
    Dropped,
}

impl RecordOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, RecordOutcome::Written { .. })
    }
}

/// Ordered, bounded collection of readings.
#[derive(Clone, Debug)]
pub struct ReadingLog<const N: usize> {
    slots: Vec<Reading, N>,
    capacity: usize,
    policy: CapacityPolicy,
    /// Next slot to overwrite once a circular log is full.
    cursor: usize,
    /// Slot touched by the latest record.
    last: Option<usize>,
}

impl<const N: usize> ReadingLog<N> {
    /// Create an empty log.
    ///
    /// Panics unless `1 <= capacity <= N`.
    pub fn new(policy: CapacityPolicy, capacity: usize) -> Self {
        assert!(
            capacity >= 1 && capacity <= N,
            "log capacity must be within 1..=N"
        );
        Self {
            slots: Vec::new(),
            capacity,
            policy,
            cursor: 0,
            last: None,
        }
    }

    /// Rebuild an exact physical layout, as saved by a snapshot.
    ///
    /// Returns `None` when the parts cannot describe a log built by
    /// [`record`](Self::record) under the given policy.
    pub fn from_parts(
        policy: CapacityPolicy,
        capacity: usize,
        cursor: usize,
        slots: &[Reading],
    ) -> Option<Self> {
        if capacity == 0 || capacity > N || slots.len() > capacity {
            return None;
        }
        let full = slots.len() == capacity;
        let cursor_ok = match policy {
            CapacityPolicy::Circular if full => cursor < capacity,
            _ => cursor == 0,
        };
        if !cursor_ok {
            return None;
        }

        let mut log = Self::new(policy, capacity);
        // capacity <= N was checked above.
        log.slots.extend_from_slice(slots).ok()?;
        log.cursor = cursor;
        log.last = match slots.len() {
            0 => None,
            _ if policy == CapacityPolicy::Circular && full => {
                Some((cursor + capacity - 1) % capacity)
            }
            len => Some(len - 1),
        };
        Some(log)
    }

    /// Rebuild by recording `readings` (oldest first) into a fresh log.
    pub fn replay<I>(policy: CapacityPolicy, capacity: usize, readings: I) -> Self
    where
        I: IntoIterator<Item = Reading>,
    {
        let mut log = Self::new(policy, capacity);
        for reading in readings {
            log.record(reading);
        }
        log
    }

    /// Append a reading according to the active policy.
    pub fn record(&mut self, reading: Reading) -> RecordOutcome {
        let len = self.slots.len();
        let index = match self.policy {
            CapacityPolicy::StopAtCapacity if len >= self.capacity => {
                return RecordOutcome::Dropped;
            }
            CapacityPolicy::Circular if len >= self.capacity => {
                let index = self.cursor;
                self.slots[index] = reading;
                self.cursor = (index + 1) % self.capacity;
                index
            }
            CapacityPolicy::CapAndFreeze if len >= self.capacity => {
                let index = self.capacity - 1;
                self.slots[index] = reading;
                index
            }
            _ => {
                // len < capacity <= N
                let _ = self.slots.push(reading);
                len
            }
        };
        self.last = Some(index);
        RecordOutcome::Written { index }
    }

    /// Remove every entry. Capacity and policy are kept.
    pub fn reset(&mut self) {
        self.slots.clear();
        self.cursor = 0;
        self.last = None;
    }

    /// The most recent `min(n, len)` readings, oldest first.
    pub fn window(&self, n: usize) -> Window<'_, N> {
        let len = self.slots.len();
        let take = n.min(len);
        Window {
            log: self,
            front: len - take,
            back: len,
        }
    }

    /// Every reading, oldest first.
    pub fn all(&self) -> Window<'_, N> {
        self.window(self.slots.len())
    }

    /// Most recently recorded reading.
    pub fn latest(&self) -> Option<Reading> {
        self.last.map(|i| self.slots[i])
    }

    /// Physical slot written by the latest record.
    pub fn last_index(&self) -> Option<usize> {
        self.last
    }

    /// Populated entries.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn policy(&self) -> CapacityPolicy {
        self.policy
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Entries in physical slot order.
    pub fn slots(&self) -> &[Reading] {
        &self.slots
    }

    /// Map a chronological position (0 = oldest) to a physical slot.
    fn physical(&self, pos: usize) -> usize {
        let len = self.slots.len();
        if self.policy == CapacityPolicy::Circular && len == self.capacity {
            (self.cursor + pos) % len
        } else {
            pos
        }
    }
}

/// Lazy chronological view over a [`ReadingLog`].
///
/// Borrows the log, so it cannot outlive or observe a later `record`.
/// A clone continues independently from the same position.
#[derive(Clone, Debug)]
pub struct Window<'a, const N: usize> {
    log: &'a ReadingLog<N>,
    front: usize,
    back: usize,
}

impl<const N: usize> Iterator for Window<'_, N> {
    type Item = Reading;

    fn next(&mut self) -> Option<Reading> {
        if self.front >= self.back {
            return None;
        }
        let reading = self.log.slots[self.log.physical(self.front)];
        self.front += 1;
        Some(reading)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.back - self.front;
        (left, Some(left))
    }
}

impl<const N: usize> DoubleEndedIterator for Window<'_, N> {
    fn next_back(&mut self) -> Option<Reading> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        Some(self.log.slots[self.log.physical(self.back)])
    }
}

impl<const N: usize> ExactSizeIterator for Window<'_, N> {}
