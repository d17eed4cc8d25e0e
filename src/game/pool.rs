//! Recycled storage for per-tick move records

use std::sync::Arc;

use super::input::Direction;
use crate::ws::protocol::{ClientMsg, Position};

/// A proposed move produced by one tick.
///
/// Holds the owner's name, never the actor itself.
#[derive(Debug, Default)]
pub struct MoveRecord {
    owner: Option<Arc<str>>,
    direction: Option<Direction>,
    position: Option<Position>,
}

impl MoveRecord {
    fn set(&mut self, owner: Arc<str>, direction: Direction, position: Position) {
        self.owner = Some(owner);
        self.direction = Some(direction);
        self.position = Some(position);
    }

    fn reset(&mut self) {
        self.owner = None;
        self.direction = None;
        self.position = None;
    }

    pub fn owner(&self) -> Option<&Arc<str>> {
        self.owner.as_ref()
    }

    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    pub fn position(&self) -> Option<Position> {
        self.position
    }

    /// The `move` intent this record stands for; `None` once released.
    pub fn to_intent(&self) -> Option<ClientMsg> {
        Some(ClientMsg::Move {
            sender: self.owner.as_deref()?.to_string(),
            direction: self.direction?,
            position: self.position?,
        })
    }
}

/// Unbounded free list of `MoveRecord`s
#[derive(Debug, Default)]
pub struct MoveObjectPool {
    free: Vec<MoveRecord>,
}

impl MoveObjectPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reuse a free record if there is one; every field is overwritten.
    pub fn acquire(
        &mut self,
        owner: Arc<str>,
        direction: Direction,
        position: Position,
    ) -> MoveRecord {
        let mut record = self.free.pop().unwrap_or_default();
        record.set(owner, direction, position);
        record
    }

    /// Takes the record by value, so a released record cannot be read again.
    pub fn release(&mut self, mut record: MoveRecord) {
        record.reset();
        self.free.push(record);
    }

    pub fn available(&self) -> usize {
        self.free.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn released_records_are_reused_and_overwritten() {
        let mut pool = MoveObjectPool::new();
        let owner: Arc<str> = Arc::from("alice");

        let first = pool.acquire(owner.clone(), Direction::Up, Position { x: 1.0, y: 2.0 });
        assert_eq!(pool.available(), 0);
        pool.release(first);
        assert_eq!(pool.available(), 1);

        let second = pool.acquire(owner, Direction::Left, Position { x: 5.0, y: 6.0 });
        assert_eq!(pool.available(), 0);
        assert_eq!(second.direction(), Some(Direction::Left));
        assert_eq!(second.position(), Some(Position { x: 5.0, y: 6.0 }));
        assert_eq!(second.owner().map(|o| &**o), Some("alice"));
    }

    #[test]
    fn record_becomes_a_move_intent() {
        let mut pool = MoveObjectPool::new();
        let position = Position { x: 3.0, y: 4.0 };
        let record = pool.acquire(Arc::from("alice"), Direction::Right, position);

        assert_eq!(
            record.to_intent(),
            Some(ClientMsg::Move {
                sender: "alice".into(),
                direction: Direction::Right,
                position: Position { x: 3.0, y: 4.0 },
            })
        );
        assert_eq!(MoveRecord::default().to_intent(), None);
    }

    #[test]
    fn pool_grows_with_concurrent_records() {
        let mut pool = MoveObjectPool::new();
        let owner: Arc<str> = Arc::from("bob");
        let records: Vec<_> = (0..3)
            .map(|i| pool.acquire(owner.clone(), Direction::Down, Position { x: i as f32, y: 0.0 }))
            .collect();

        for record in records {
            pool.release(record);
        }
        assert_eq!(pool.available(), 3);
    }
}
