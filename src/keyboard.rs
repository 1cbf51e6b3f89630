use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::debug;

use crate::clock::Clock;
use crate::input::keys;
use crate::mailbox::KeyMailbox;

const POLL_TIMEOUT: Duration = Duration::from_millis(25);

/// HID usage ID of the first letter key (`A`).
const HID_LETTER_BASE: u8 = keys::A;
/// HID usage IDs for `1`..`9`, then `0`.
const HID_DIGIT_ONE: u8 = 0x1E;
const HID_DIGIT_ZERO: u8 = 0x27;
const HID_ENTER: u8 = 0x28;
/// Key slots in a USB boot keyboard report.
const REPORT_KEYS: usize = 6;

/// Translates a terminal key event into the HID usage ID a USB keyboard
/// would report. Ctrl+C maps to Escape so it quits like on hardware.
#[must_use]
pub fn hid_usage(key: &KeyEvent) -> Option<u8> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(keys::ESCAPE);
    }

    match key.code {
        KeyCode::Up => Some(keys::ARROW_UP),
        KeyCode::Down => Some(keys::ARROW_DOWN),
        KeyCode::Left => Some(keys::ARROW_LEFT),
        KeyCode::Right => Some(keys::ARROW_RIGHT),
        KeyCode::Esc => Some(keys::ESCAPE),
        KeyCode::Enter => Some(HID_ENTER),
        KeyCode::Char(' ') => Some(keys::SPACE),
        KeyCode::Char(c) if c.is_ascii_alphabetic() => {
            let offset = c.to_ascii_lowercase() as u8 - b'a';
            Some(HID_LETTER_BASE + offset)
        }
        KeyCode::Char('0') => Some(HID_DIGIT_ZERO),
        KeyCode::Char(c @ '1'..='9') => Some(HID_DIGIT_ONE + (c as u8 - b'1')),
        _ => None,
    }
}

/// Builds the boot-protocol key array a keyboard would send for one press.
#[must_use]
pub fn boot_report(key: &KeyEvent) -> Option<[u8; REPORT_KEYS]> {
    let mut report = [0; REPORT_KEYS];
    report[0] = hid_usage(key)?;
    Some(report)
}

/// Background thread standing in for the USB keyboard callback: it posts
/// every key press into the mailbox with the current tick.
pub struct KeyboardThread {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<io::Result<()>>>,
}

impl KeyboardThread {
    pub fn spawn<C>(mailbox: Arc<KeyMailbox>, clock: C) -> io::Result<Self>
    where
        C: Clock + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);

        let handle = thread::Builder::new()
            .name("keyboard".to_owned())
            .spawn(move || pump_events(&mailbox, &clock, &thread_stop))?;

        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }

    /// Signals the thread to exit and waits for it.
    pub fn stop(mut self) -> io::Result<()> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> io::Result<()> {
        self.stop.store(true, Ordering::Relaxed);
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };

        match handle.join() {
            Ok(result) => result,
            Err(_) => Err(io::Error::other("keyboard thread panicked")),
        }
    }
}

impl Drop for KeyboardThread {
    fn drop(&mut self) {
        let _ = self.shutdown();
    }
}

fn pump_events<C: Clock>(mailbox: &KeyMailbox, clock: &C, stop: &AtomicBool) -> io::Result<()> {
    while !stop.load(Ordering::Relaxed) {
        if !event::poll(POLL_TIMEOUT)? {
            continue;
        }

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind == KeyEventKind::Release {
            continue;
        }

        let Some(report) = boot_report(&key) else {
            debug!(code = ?key.code, "key has no HID mapping");
            continue;
        };

        let now = clock.now();
        if mailbox.post_report(&report, now) {
            debug!(code = report[0], now, "key posted");
        } else {
            debug!(code = report[0], now, "key debounced");
        }
    }

    Ok(())
}
