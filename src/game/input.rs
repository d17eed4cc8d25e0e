//! Keyboard edge handling and the latched input state

use serde::{Deserialize, Serialize};

/// Logical movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Order in which held directions are applied each tick. The last held
    /// one in this order becomes the facing direction.
    pub const TICK_ORDER: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    const fn index(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }
}

/// What a raw key identifier means to the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyBinding {
    Move(Direction),
    DropBomb,
}

impl KeyBinding {
    /// Static key table; unmapped keys return `None` and are ignored.
    pub fn lookup(key: &str) -> Option<Self> {
        let binding = match key {
            "ArrowUp" | "w" => KeyBinding::Move(Direction::Up),
            "ArrowDown" | "s" => KeyBinding::Move(Direction::Down),
            "ArrowLeft" | "a" => KeyBinding::Move(Direction::Left),
            "ArrowRight" | "d" => KeyBinding::Move(Direction::Right),
            "Shift" | " " => KeyBinding::DropBomb,
            _ => return None,
        };
        Some(binding)
    }
}

/// Currently held directions plus the lock imposed by the authority.
///
/// Only edge handlers and lock messages write here; the controller tick
/// reads it.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputState {
    held: [bool; 4],
    last_pressed: Option<Direction>,
    locked: bool,
}

impl InputState {
    /// Latch a direction press. Returns false when the lock swallowed it.
    pub fn press(&mut self, direction: Direction) -> bool {
        if self.locked {
            return false;
        }
        self.held[direction.index()] = true;
        self.last_pressed = Some(direction);
        true
    }

    /// Releases are honoured even while locked so the flags stay truthful.
    pub fn release(&mut self, direction: Direction) {
        self.held[direction.index()] = false;
        if self.last_pressed == Some(direction) {
            self.last_pressed = None;
        }
    }

    pub fn is_held(&self, direction: Direction) -> bool {
        self.held[direction.index()]
    }

    pub fn any_held(&self) -> bool {
        self.held.iter().any(|held| *held)
    }

    pub fn held(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::TICK_ORDER
            .into_iter()
            .filter(|direction| self.is_held(*direction))
    }

    pub fn last_pressed(&self) -> Option<Direction> {
        self.last_pressed
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_table_maps_arrows_wasd_and_bomb_keys() {
        assert_eq!(
            KeyBinding::lookup("ArrowUp"),
            Some(KeyBinding::Move(Direction::Up))
        );
        assert_eq!(KeyBinding::lookup("a"), Some(KeyBinding::Move(Direction::Left)));
        assert_eq!(KeyBinding::lookup(" "), Some(KeyBinding::DropBomb));
        assert_eq!(KeyBinding::lookup("Shift"), Some(KeyBinding::DropBomb));
        assert_eq!(KeyBinding::lookup("q"), None);
        assert_eq!(KeyBinding::lookup("W"), None);
    }

    #[test]
    fn release_of_other_direction_keeps_last_pressed() {
        let mut input = InputState::default();
        input.press(Direction::Up);
        input.press(Direction::Right);
        input.release(Direction::Up);

        assert_eq!(input.last_pressed(), Some(Direction::Right));
        assert!(input.is_held(Direction::Right));
        assert!(!input.is_held(Direction::Up));

        input.release(Direction::Right);
        assert_eq!(input.last_pressed(), None);
        assert!(!input.any_held());
    }

    #[test]
    fn lock_swallows_presses_but_not_releases() {
        let mut input = InputState::default();
        input.press(Direction::Left);
        input.set_locked(true);

        assert!(!input.press(Direction::Down));
        assert!(!input.is_held(Direction::Down));
        // flags set before the lock survive it
        assert!(input.is_held(Direction::Left));

        input.release(Direction::Left);
        assert!(!input.any_held());

        input.set_locked(false);
        assert!(input.press(Direction::Down));
    }

    #[test]
    fn held_iterates_in_tick_order() {
        let mut input = InputState::default();
        input.press(Direction::Right);
        input.press(Direction::Up);

        let held: Vec<_> = input.held().collect();
        assert_eq!(held, vec![Direction::Up, Direction::Right]);
    }
}
