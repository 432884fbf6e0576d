use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use labyrinth_common::InputIntent;

use crate::action::Action;

/// Physical keys the game listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    Q,
    N,
    Up,
    Down,
    Left,
    Right,
    Space,
}

/// A key name that does not match any `Key`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown key: {0:?}")]
pub struct UnknownKey(pub String);

impl FromStr for Key {
    type Err = UnknownKey;

    /// Case-insensitive key names as used in input scripts: letters,
    /// `up`/`down`/`left`/`right` and `space`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = match s.to_ascii_lowercase().as_str() {
            "w" => Key::W,
            "a" => Key::A,
            "s" => Key::S,
            "d" => Key::D,
            "q" => Key::Q,
            "n" => Key::N,
            "up" => Key::Up,
            "down" => Key::Down,
            "left" => Key::Left,
            "right" => Key::Right,
            "space" => Key::Space,
            _ => return Err(UnknownKey(s.to_string())),
        };
        Ok(key)
    }
}

/// What a held key contributes to the intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Binding {
    RotateLeft,
    RotateRight,
    Forward,
    Backward,
    Jump,
    /// Fires an action when the key is released.
    Trigger(Action),
}

/// Key to binding table.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    map: HashMap<Key, Binding>,
}

impl Default for KeyBindings {
    /// WASD and arrows to move, space to jump, Q for the minimap, N for a
    /// new game.
    fn default() -> Self {
        let map = HashMap::from([
            (Key::A, Binding::RotateLeft),
            (Key::Left, Binding::RotateLeft),
            (Key::D, Binding::RotateRight),
            (Key::Right, Binding::RotateRight),
            (Key::W, Binding::Forward),
            (Key::Up, Binding::Forward),
            (Key::S, Binding::Backward),
            (Key::Down, Binding::Backward),
            (Key::Space, Binding::Jump),
            (Key::Q, Binding::Trigger(Action::ToggleMiniMap)),
            (Key::N, Binding::Trigger(Action::NewGame)),
        ]);
        Self { map }
    }
}

impl KeyBindings {
    pub fn get(&self, key: Key) -> Option<Binding> {
        self.map.get(&key).copied()
    }

    pub fn bind(&mut self, key: Key, binding: Binding) {
        self.map.insert(key, binding);
    }

    pub fn unbind(&mut self, key: Key) {
        self.map.remove(&key);
    }
}

/// Tracks which keys are physically held.
///
/// Feed it key-down and key-up events from the host; sample `intent()` once
/// per tick.
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    bindings: KeyBindings,
    held: HashSet<Key>,
}

impl KeyboardState {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            held: HashSet::new(),
        }
    }

    /// Record a key press. Auto-repeat presses are ignored.
    pub fn key_down(&mut self, key: Key, repeat: bool) {
        if repeat {
            return;
        }
        self.held.insert(key);
    }

    /// Record a key release. Returns the bound action for trigger keys that
    /// were actually held, so one physical press fires exactly once.
    pub fn key_up(&mut self, key: Key) -> Option<Action> {
        let was_held = self.held.remove(&key);
        match self.bindings.get(key) {
            Some(Binding::Trigger(action)) if was_held => {
                tracing::debug!(?key, ?action, "action triggered");
                Some(action)
            }
            _ => None,
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    /// Release everything, e.g. when the window loses focus.
    pub fn clear(&mut self) {
        self.held.clear();
    }

    /// Snapshot of the movement keys currently held.
    pub fn intent(&self) -> InputIntent {
        let mut intent = InputIntent::IDLE;
        for key in &self.held {
            match self.bindings.get(*key) {
                Some(Binding::RotateLeft) => intent.rotate_left = true,
                Some(Binding::RotateRight) => intent.rotate_right = true,
                Some(Binding::Forward) => intent.forward = true,
                Some(Binding::Backward) => intent.backward = true,
                Some(Binding::Jump) => intent.jump = true,
                Some(Binding::Trigger(_)) | None => {}
            }
        }
        intent
    }
}
