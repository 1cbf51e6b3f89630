use std::sync::atomic::{AtomicU64, Ordering};

use crate::input::first_pressed;

const CODE_BITS: u32 = 8;
const CODE_MASK: u64 = 0xFF;
const EMPTY: u64 = 0;

/// One key press and the tick at which it was observed.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct KeyEvent {
    pub code: u8,
    pub at: u64,
}

/// Single-slot, last-writer-wins hand-off from the keyboard callback to the
/// frame driver.
///
/// The code and timestamp share one atomic word (timestamp in the upper 56
/// bits), so a reader never observes a code paired with another press's
/// timestamp. Code 0 means "no key" and is never stored.
///
/// With a debounce interval, posts arriving within the interval of the last
/// stored one are refused on the producer side, so a second quick press
/// cannot overwrite the first before the driver drains the slot. There is a
/// single producer; the gate itself is not contended.
#[derive(Debug, Default)]
pub struct KeyMailbox {
    slot: AtomicU64,
    /// Timestamp of the last stored post plus one; zero before the first.
    last_posted: AtomicU64,
    debounce_ms: Option<u64>,
}

impl KeyMailbox {
    /// A mailbox that stores every non-zero post.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slot: AtomicU64::new(EMPTY),
            last_posted: AtomicU64::new(0),
            debounce_ms: None,
        }
    }

    /// A mailbox that refuses posts until more than `interval_ms` has passed
    /// since the last stored one.
    #[must_use]
    pub const fn with_debounce(interval_ms: u64) -> Self {
        Self {
            slot: AtomicU64::new(EMPTY),
            last_posted: AtomicU64::new(0),
            debounce_ms: Some(interval_ms),
        }
    }

    /// Overwrites any pending key. Returns whether the post was stored.
    pub fn post(&self, code: u8, at: u64) -> bool {
        if code == 0 {
            return false;
        }

        if let Some(interval) = self.debounce_ms {
            let last = self.last_posted.load(Ordering::Relaxed);
            if last != 0 && at.saturating_sub(last - 1) <= interval {
                return false;
            }
            self.last_posted.store(at.saturating_add(1), Ordering::Relaxed);
        }

        let packed = (at << CODE_BITS) | u64::from(code);
        self.slot.store(packed, Ordering::Release);
        true
    }

    /// Posts the first pressed key of a keyboard report, if any. This is the
    /// keyboard callback entry point.
    pub fn post_report(&self, keys: &[u8], at: u64) -> bool {
        first_pressed(keys).is_some_and(|code| self.post(code, at))
    }

    /// Removes and returns the pending key.
    pub fn take(&self) -> Option<KeyEvent> {
        let packed = self.slot.swap(EMPTY, Ordering::Acquire);
        if packed == EMPTY {
            return None;
        }

        Some(KeyEvent {
            code: (packed & CODE_MASK) as u8,
            at: packed >> CODE_BITS,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::{KeyEvent, KeyMailbox};

    #[test]
    fn empty_mailbox_yields_nothing() {
        let mailbox = KeyMailbox::new();
        assert_eq!(mailbox.take(), None);
    }

    #[test]
    fn take_empties_the_slot() {
        let mailbox = KeyMailbox::new();

        mailbox.post(0x1A, 42);

        assert_eq!(mailbox.take(), Some(KeyEvent { code: 0x1A, at: 42 }));
        assert_eq!(mailbox.take(), None);
    }

    #[test]
    fn last_writer_wins() {
        let mailbox = KeyMailbox::new();

        mailbox.post(0x1A, 10);
        mailbox.post(0x16, 11);

        assert_eq!(mailbox.take(), Some(KeyEvent { code: 0x16, at: 11 }));
    }

    #[test]
    fn zero_codes_are_not_stored() {
        let mailbox = KeyMailbox::new();

        mailbox.post(0x04, 5);
        mailbox.post(0, 6);
        mailbox.post_report(&[0, 0, 0], 7);

        assert_eq!(mailbox.take(), Some(KeyEvent { code: 0x04, at: 5 }));
    }

    #[test]
    fn report_posts_its_first_pressed_key() {
        let mailbox = KeyMailbox::new();

        mailbox.post_report(&[0, 0x07, 0x04], 3);

        assert_eq!(mailbox.take(), Some(KeyEvent { code: 0x07, at: 3 }));
    }

    #[test]
    fn debounced_mailbox_keeps_the_first_of_two_quick_presses() {
        let mailbox = KeyMailbox::with_debounce(150);

        assert!(mailbox.post(0x1A, 1_000));
        assert!(!mailbox.post(0x16, 1_010));
        assert!(!mailbox.post(0x16, 1_150));

        assert_eq!(mailbox.take(), Some(KeyEvent { code: 0x1A, at: 1_000 }));
        assert!(mailbox.post(0x16, 1_151));
        assert_eq!(mailbox.take(), Some(KeyEvent { code: 0x16, at: 1_151 }));
    }

    #[test]
    fn first_post_at_tick_zero_passes_the_gate() {
        let mailbox = KeyMailbox::with_debounce(150);

        assert!(mailbox.post_report(&[0, 0x2C], 0));
        assert!(!mailbox.post_report(&[0x13], 100));
        assert!(!mailbox.post_report(&[0, 0], 500));

        assert_eq!(mailbox.take(), Some(KeyEvent { code: 0x2C, at: 0 }));
    }

    #[test]
    fn posts_from_another_thread_are_visible() {
        let mailbox = Arc::new(KeyMailbox::new());
        let producer = Arc::clone(&mailbox);

        thread::spawn(move || {
            producer.post(0x2C, 1_000);
        })
            .join()
            .expect("producer thread should not panic");

        assert_eq!(mailbox.take(), Some(KeyEvent { code: 0x2C, at: 1_000 }));
    }
}
