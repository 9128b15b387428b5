//! Translation of raw key and pointer events into engine commands.

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::game::Game;

pub const DEFAULT_KEY_REPEAT_MS: u64 = 100;

/// The closed set of things a player can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    MoveLeft,
    MoveRight,
    SoftDrop,
    Rotate,
    HardDrop,
    Quit,
}

impl Command {
    /// Applies the command to the engine. `Quit` is a session concern and
    /// leaves the game untouched.
    pub fn apply(self, game: &mut Game) {
        match self {
            Command::MoveLeft => {
                game.move_piece(-1, 0);
            }
            Command::MoveRight => {
                game.move_piece(1, 0);
            }
            Command::SoftDrop => game.soft_drop(),
            Command::Rotate => {
                game.rotate_piece();
            }
            Command::HardDrop => game.hard_drop(),
            Command::Quit => {}
        }
    }
}

pub fn key_to_command(key: KeyEvent) -> Option<Command> {
    let KeyEvent {
        code, modifiers, ..
    } = key;
    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') => Some(Command::Quit),
            _ => None,
        };
    }
    match code {
        KeyCode::Left | KeyCode::Char('h') => Some(Command::MoveLeft),
        KeyCode::Right | KeyCode::Char('l') => Some(Command::MoveRight),
        KeyCode::Down | KeyCode::Char('j') => Some(Command::SoftDrop),
        KeyCode::Up | KeyCode::Char('k') => Some(Command::Rotate),
        KeyCode::Char(' ') => Some(Command::HardDrop),
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => Some(Command::Quit),
        _ => None,
    }
}

// ============================================================================
// Held-key repeat
// ============================================================================

/// Throttles left, right and soft drop while their key is held.
///
/// A `Press` always goes through and marks the key held. A `Repeat` goes
/// through only once more than `delay` has passed since the last accepted
/// event for that key. A `Release` clears the held state. Terminals without
/// event-type reporting send every auto-repeat as a `Press`, so there every
/// event counts as a fresh tap. Other commands are never throttled.
#[derive(Debug, Clone)]
pub struct KeyRepeat {
    delay: Duration,
    held_since: [Option<Instant>; 3],
}

impl KeyRepeat {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            held_since: [None; 3],
        }
    }

    fn slot(command: Command) -> Option<usize> {
        match command {
            Command::MoveLeft => Some(0),
            Command::MoveRight => Some(1),
            Command::SoftDrop => Some(2),
            _ => None,
        }
    }

    pub fn accept(&mut self, command: Command, kind: KeyEventKind, now: Instant) -> bool {
        let Some(slot) = Self::slot(command) else {
            return kind != KeyEventKind::Release;
        };
        let accepted = match kind {
            KeyEventKind::Release => {
                self.held_since[slot] = None;
                return false;
            }
            KeyEventKind::Press => true,
            KeyEventKind::Repeat => match self.held_since[slot] {
                None => true,
                Some(last) => now.saturating_duration_since(last) > self.delay,
            },
        };
        if accepted {
            self.held_since[slot] = Some(now);
        }
        accepted
    }
}

impl Default for KeyRepeat {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_KEY_REPEAT_MS))
    }
}

// ============================================================================
// Swipe
// ============================================================================

/// Maps a pointer displacement to a command by its dominant axis.
pub fn swipe_to_command(dx: i32, dy: i32) -> Option<Command> {
    if dx == 0 && dy == 0 {
        return None;
    }
    if dx.abs() > dy.abs() {
        if dx > 0 {
            Some(Command::MoveRight)
        } else {
            Some(Command::MoveLeft)
        }
    } else if dy > 0 {
        Some(Command::SoftDrop)
    } else {
        Some(Command::Rotate)
    }
}

/// Turns a stream of drag positions into commands. The reference point
/// follows the pointer after every drag.
#[derive(Debug, Clone, Default)]
pub struct SwipeTracker {
    anchor: Option<(i32, i32)>,
}

impl SwipeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, x: i32, y: i32) {
        self.anchor = Some((x, y));
    }

    pub fn drag(&mut self, x: i32, y: i32) -> Option<Command> {
        let (ax, ay) = self.anchor.replace((x, y))?;
        swipe_to_command(x - ax, y - ay)
    }

    pub fn end(&mut self) {
        self.anchor = None;
    }
}
