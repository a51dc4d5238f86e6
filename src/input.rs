use std::collections::vec_deque::Drain;
use std::collections::VecDeque;

use macroquad::prelude::{is_key_down, is_key_pressed, is_key_released, KeyCode};

const INITIAL_HORIZONTAL_DELAY: f32 = 0.2;
const HORIZONTAL_REPEAT_DELAY: f32 = 0.1;

/// Keys handled on press (or release) only; left/right auto-repeat instead.
const SINGLE_SHOT_KEYS: [KeyCode; 5] = [KeyCode::Up, KeyCode::Z, KeyCode::X, KeyCode::Down, KeyCode::Space];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    MoveLeft,
    MoveRight,
    RotateLeft,
    RotateRight,
    SoftDropStart,
    SoftDropEnd,
    HardDrop,
}

/// Maps a key edge to a game command. `pressed` is false for a release.
pub fn command_for_key(key: KeyCode, pressed: bool) -> Option<Command> {
    if !pressed {
        return match key {
            KeyCode::Down => Some(Command::SoftDropEnd),
            _ => None,
        };
    }
    match key {
        KeyCode::Left => Some(Command::MoveLeft),
        KeyCode::Right => Some(Command::MoveRight),
        KeyCode::Up | KeyCode::Z => Some(Command::RotateLeft),
        KeyCode::X => Some(Command::RotateRight),
        KeyCode::Down => Some(Command::SoftDropStart),
        KeyCode::Space => Some(Command::HardDrop),
        _ => None,
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct KeyState {
    /// Went down this frame.
    pub pressed: bool,
    /// Is held.
    pub down: bool,
}

impl KeyState {
    fn of(key: KeyCode) -> Self {
        KeyState {
            pressed: is_key_pressed(key),
            down: is_key_down(key),
        }
    }
}

/// Delayed auto shift for a held direction key.
#[derive(Clone, Copy, Debug, Default)]
struct AutoRepeat {
    timer: f32,
}

impl AutoRepeat {
    fn step(&mut self, key: KeyState, dt: f32) -> bool {
        if key.pressed {
            self.timer = INITIAL_HORIZONTAL_DELAY;
            true
        } else if key.down {
            self.timer -= dt;
            if self.timer <= 0.0 {
                self.timer = HORIZONTAL_REPEAT_DELAY;
                true
            } else {
                false
            }
        } else {
            self.timer = 0.0;
            false
        }
    }
}

/// Commands collected between simulation steps, applied in arrival order.
#[derive(Debug, Default)]
pub struct InputQueue {
    pending: VecDeque<Command>,
    left: AutoRepeat,
    right: AutoRepeat,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: Command) {
        self.pending.push_back(command);
    }

    /// Samples the keyboard for this frame.
    pub fn poll_keyboard(&mut self, dt: f32) {
        self.feed_horizontal(KeyState::of(KeyCode::Left), KeyState::of(KeyCode::Right), dt);
        for key in SINGLE_SHOT_KEYS {
            if is_key_pressed(key) {
                self.pending.extend(command_for_key(key, true));
            }
            if is_key_released(key) {
                self.pending.extend(command_for_key(key, false));
            }
        }
    }

    pub fn feed_horizontal(&mut self, left: KeyState, right: KeyState, dt: f32) {
        if self.left.step(left, dt) {
            self.push(Command::MoveLeft);
        }
        if self.right.step(right, dt) {
            self.push(Command::MoveRight);
        }
    }

    pub fn drain(&mut self) -> Drain<'_, Command> {
        self.pending.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
