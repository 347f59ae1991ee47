//! Keyboard input mapping
//!
//! Hosts translate their key events into [`Intent`]s. Movement intents are
//! held (press/release); the rest are commands handled on press.

use crate::sim::TickInput;

/// What a key means to the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    Left,
    Right,
    Up,
    Down,
    /// Kill velocity while held
    Stop,
    Pause,
    /// Start, resume or continue to the next level
    Continue,
    Exit,
}

impl Intent {
    /// Map a browser `KeyboardEvent.key` value
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(Intent::Left),
            "ArrowRight" => Some(Intent::Right),
            "ArrowUp" => Some(Intent::Up),
            "ArrowDown" => Some(Intent::Down),
            "Shift" => Some(Intent::Stop),
            " " | "Spacebar" => Some(Intent::Continue),
            "Escape" => Some(Intent::Exit),
            "p" | "P" => Some(Intent::Pause),
            _ => None,
        }
    }
}

/// Which movement keys are down right now
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    held: TickInput,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false for command intents, which are not held
    pub fn press(&mut self, intent: Intent) -> bool {
        self.set(intent, true)
    }

    pub fn release(&mut self, intent: Intent) -> bool {
        self.set(intent, false)
    }

    /// Drop every held key (focus loss)
    pub fn clear(&mut self) {
        self.held = TickInput::default();
    }

    pub fn snapshot(&self) -> TickInput {
        self.held
    }

    fn set(&mut self, intent: Intent, down: bool) -> bool {
        let slot = match intent {
            Intent::Left => &mut self.held.left,
            Intent::Right => &mut self.held.right,
            Intent::Up => &mut self.held.up,
            Intent::Down => &mut self.held.down,
            Intent::Stop => &mut self.held.stop,
            _ => return false,
        };
        *slot = down;
        true
    }
}
