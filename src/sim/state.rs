//! Shared simulation vocabulary
//!
//! Direction/facing types, per-tick input, and entity id allocation used by
//! every entity module.

use serde::{Deserialize, Serialize};

/// Movement direction bookkeeping shared by player and enemies.
///
/// `None` is a valid resting value (a ground collision clears the player's
/// direction); enemies always hold a cardinal value while wandering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    None,
}

impl Direction {
    /// Bounce-off-wall helper: left<->right, up<->down
    pub fn opposite(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::None => Direction::None,
        }
    }

    /// The four cardinal directions, in draw order for the wander re-roll
    pub const CARDINAL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];
}

/// Key-down state for a single tick, polled by the host engine
#[derive(Debug, Clone, Copy, Default)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Weapon trigger (space)
    pub fire: bool,
}

/// Unique id for a live entity within a scene
pub type EntityId = u32;

/// Monotone entity id allocator owned by the scene
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IdAlloc {
    next: EntityId,
}

impl Default for IdAlloc {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdAlloc {
    pub fn next_id(&mut self) -> EntityId {
        let id = self.next;
        self.next += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_direction() {
        assert_eq!(Direction::Left.opposite(), Direction::Right);
        assert_eq!(Direction::Right.opposite(), Direction::Left);
        assert_eq!(Direction::Up.opposite(), Direction::Down);
        assert_eq!(Direction::Down.opposite(), Direction::Up);
        assert_eq!(Direction::None.opposite(), Direction::None);
    }

    #[test]
    fn test_id_alloc_monotone() {
        let mut ids = IdAlloc::default();
        let a = ids.next_id();
        let b = ids.next_id();
        assert!(b > a);
    }
}
