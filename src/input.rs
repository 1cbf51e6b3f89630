use crate::mailbox::KeyEvent;

/// Canonical movement directions for snake input.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns the opposite direction.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// High-level input events consumed by the game loop.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameInput {
    Direction(Direction),
    Pause,
    Restart,
    Quit,
}

/// USB HID keyboard usage IDs understood by the game.
pub mod keys {
    pub const A: u8 = 0x04;
    pub const D: u8 = 0x07;
    pub const F: u8 = 0x09;
    pub const P: u8 = 0x13;
    pub const Q: u8 = 0x14;
    pub const R: u8 = 0x15;
    pub const S: u8 = 0x16;
    pub const W: u8 = 0x1A;
    pub const ESCAPE: u8 = 0x29;
    pub const SPACE: u8 = 0x2C;
    pub const ARROW_RIGHT: u8 = 0x4F;
    pub const ARROW_LEFT: u8 = 0x50;
    pub const ARROW_DOWN: u8 = 0x51;
    pub const ARROW_UP: u8 = 0x52;
}

/// Two aliases per intent: a navigation key and a letter key.
const KEY_BINDINGS: [(u8, GameInput); 14] = [
    (keys::ARROW_UP, GameInput::Direction(Direction::Up)),
    (keys::W, GameInput::Direction(Direction::Up)),
    (keys::ARROW_DOWN, GameInput::Direction(Direction::Down)),
    (keys::S, GameInput::Direction(Direction::Down)),
    (keys::ARROW_LEFT, GameInput::Direction(Direction::Left)),
    (keys::A, GameInput::Direction(Direction::Left)),
    (keys::ARROW_RIGHT, GameInput::Direction(Direction::Right)),
    (keys::D, GameInput::Direction(Direction::Right)),
    (keys::R, GameInput::Restart),
    (keys::F, GameInput::Restart),
    (keys::ESCAPE, GameInput::Quit),
    (keys::Q, GameInput::Quit),
    (keys::SPACE, GameInput::Pause),
    (keys::P, GameInput::Pause),
];

/// Maps a raw key code to its intent. Unmapped codes yield `None`.
#[must_use]
pub fn map_key(code: u8) -> Option<GameInput> {
    KEY_BINDINGS
        .iter()
        .find(|(key, _)| *key == code)
        .map(|(_, input)| *input)
}

/// Returns the first pressed key of a keyboard report (0 means "no key").
#[must_use]
pub fn first_pressed(keys: &[u8]) -> Option<u8> {
    keys.iter().copied().find(|code| *code != 0)
}

/// Returns whether a direction change is legal (no immediate 180° turns).
#[must_use]
pub fn direction_change_is_valid(current: Direction, next: Direction) -> bool {
    next != current.opposite()
}

/// Drops key events that arrive too soon after the last accepted one.
#[derive(Debug, Clone)]
pub struct Debouncer {
    interval_ms: u64,
    last_accepted: Option<u64>,
}

impl Debouncer {
    #[must_use]
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_accepted: None,
        }
    }

    /// Gates one key event. An event passes when nothing was accepted yet or
    /// more than the interval has elapsed; a passing event restarts the
    /// interval even if its code maps to no intent.
    pub fn accept(&mut self, event: KeyEvent) -> Option<GameInput> {
        if event.code == 0 {
            return None;
        }

        if let Some(last) = self.last_accepted {
            if event.at.saturating_sub(last) <= self.interval_ms {
                return None;
            }
        }

        self.last_accepted = Some(event.at);
        map_key(event.code)
    }

    #[must_use]
    pub fn last_accepted(&self) -> Option<u64> {
        self.last_accepted
    }
}
