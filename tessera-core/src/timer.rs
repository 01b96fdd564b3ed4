//! Software timer pool
//!
//! Fixed-capacity deadline registry used to replace blocking delays in the
//! link state machines (ack timeouts, heartbeat retry). Callers request a
//! timer, poll it, and drive time forward from a periodic tick source,
//! typically a 1 ms timer interrupt.

use heapless::Vec;

/// Opaque token identifying one allocated timer slot
///
/// Handles are never zero and are single-use: the poll that observes
/// expiry releases the slot, after which the handle is unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerHandle(u16);

/// Result of polling an active timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerStatus {
    /// Still counting
    Pending,
    /// Deadline reached; the slot has been released
    Expired,
}

/// Timer pool errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerError {
    /// Handle does not match any active timer
    UnknownHandle,
}

/// One allocated timer
#[derive(Debug, Clone, Copy)]
struct TimerSlot {
    handle: u16,
    start: u32,
    delay: u32,
}

/// Fixed-capacity pool of one-shot software timers
///
/// All lookups are linear scans; `N` is expected to stay small, on the
/// order of twenty slots per unit. The pool does not own a clock: whoever
/// services the hardware tick calls [`TimerPool::tick`].
#[derive(Debug)]
pub struct TimerPool<const N: usize> {
    slots: Vec<TimerSlot, N>,
    now: u32,
    last_handle: u16,
}

impl<const N: usize> TimerPool<N> {
    /// Create an empty pool
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            now: 0,
            last_handle: 0,
        }
    }

    /// Advance the pool clock by one tick (call from the periodic timer ISR)
    pub fn tick(&mut self) {
        self.advance(1);
    }

    /// Advance the pool clock by `ticks`
    pub fn advance(&mut self, ticks: u32) {
        self.now = self.now.wrapping_add(ticks);
    }

    /// Current tick count
    pub fn now(&self) -> u32 {
        self.now
    }

    /// Allocate a timer expiring `delay` ticks from now
    ///
    /// Returns `None` when every slot is in use.
    pub fn request(&mut self, delay: u32) -> Option<TimerHandle> {
        if self.slots.is_full() {
            return None;
        }

        // Handles are never zero
        self.last_handle = self.last_handle.wrapping_add(1);
        if self.last_handle == 0 {
            self.last_handle = 1;
        }

        let slot = TimerSlot {
            handle: self.last_handle,
            start: self.now,
            delay,
        };
        // Cannot fail: fullness checked above
        let _ = self.slots.push(slot);

        Some(TimerHandle(self.last_handle))
    }

    /// Check a timer, releasing its slot once expiry is observed
    ///
    /// The deadline comparison uses wrapping arithmetic, so it stays
    /// correct across tick-counter wraparound.
    pub fn poll(&mut self, handle: TimerHandle) -> Result<TimerStatus, TimerError> {
        let index = self
            .slots
            .iter()
            .position(|slot| slot.handle == handle.0)
            .ok_or(TimerError::UnknownHandle)?;

        let slot = self.slots[index];
        if self.now.wrapping_sub(slot.start) >= slot.delay {
            self.slots.swap_remove(index);
            Ok(TimerStatus::Expired)
        } else {
            Ok(TimerStatus::Pending)
        }
    }

    /// Release a timer before it expires
    ///
    /// Returns true if the handle matched an active timer.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        match self.slots.iter().position(|slot| slot.handle == handle.0) {
            Some(index) => {
                self.slots.swap_remove(index);
                true
            }
            None => false,
        }
    }

    /// Number of active timers
    pub fn active(&self) -> usize {
        self.slots.len()
    }

    /// Total slot count
    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<const N: usize> Default for TimerPool<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_request_and_poll() {
        let mut pool = TimerPool::<4>::new();
        let handle = pool.request(10).unwrap();

        assert_eq!(pool.poll(handle), Ok(TimerStatus::Pending));
        pool.advance(9);
        assert_eq!(pool.poll(handle), Ok(TimerStatus::Pending));
        pool.tick();
        assert_eq!(pool.poll(handle), Ok(TimerStatus::Expired));
    }

    #[test]
    fn test_poll_releases_expired_slot() {
        let mut pool = TimerPool::<1>::new();
        let handle = pool.request(5).unwrap();

        pool.advance(5);
        assert_eq!(pool.poll(handle), Ok(TimerStatus::Expired));
        assert_eq!(pool.poll(handle), Err(TimerError::UnknownHandle));

        // Slot recycles after the expiry was observed
        assert!(pool.request(5).is_some());
    }

    #[test]
    fn test_zero_delay_expires_immediately() {
        let mut pool = TimerPool::<4>::new();
        let handle = pool.request(0).unwrap();
        assert_eq!(pool.poll(handle), Ok(TimerStatus::Expired));
    }

    #[test]
    fn test_cancel() {
        let mut pool = TimerPool::<1>::new();
        let handle = pool.request(100).unwrap();

        assert!(pool.cancel(handle));
        assert!(!pool.cancel(handle));
        assert_eq!(pool.poll(handle), Err(TimerError::UnknownHandle));
        assert!(pool.request(100).is_some());
    }

    #[test]
    fn test_pool_exhaustion() {
        let mut pool = TimerPool::<2>::new();
        let first = pool.request(10).unwrap();
        let _second = pool.request(10).unwrap();

        assert_eq!(pool.active(), 2);
        assert!(pool.request(10).is_none());

        assert!(pool.cancel(first));
        assert!(pool.request(10).is_some());
    }

    #[test]
    fn test_handles_unique_and_nonzero() {
        let mut pool = TimerPool::<2>::new();
        let first = pool.request(1).unwrap();
        let second = pool.request(1).unwrap();
        assert_ne!(first, second);
        assert!(pool.cancel(first));
        assert!(pool.cancel(second));

        // Run the generator through a full wrap of the handle space
        for _ in 0..70_000u32 {
            let handle = pool.request(1).unwrap();
            assert_ne!(handle.0, 0);
            assert!(pool.cancel(handle));
        }
    }

    #[test]
    fn test_tick_counter_wraparound() {
        let mut pool = TimerPool::<4>::new();
        pool.advance(u32::MAX - 5);

        let handle = pool.request(10).unwrap();
        pool.advance(9);
        assert_eq!(pool.poll(handle), Ok(TimerStatus::Pending));
        pool.tick();
        assert_eq!(pool.poll(handle), Ok(TimerStatus::Expired));
    }

    proptest! {
        #[test]
        fn prop_expires_exactly_on_deadline(delay in 1u32..100_000) {
            let mut pool = TimerPool::<4>::new();
            let handle = pool.request(delay).unwrap();

            pool.advance(delay - 1);
            prop_assert_eq!(pool.poll(handle), Ok(TimerStatus::Pending));
            pool.tick();
            prop_assert_eq!(pool.poll(handle), Ok(TimerStatus::Expired));
        }
    }
}
