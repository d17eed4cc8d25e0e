//! Playback-only view of players simulated elsewhere

use super::actor::{Actor, ActorView};
use super::animation::AnimationState;
use super::pool::MoveRecord;
use super::tuning::PlayerTuning;

/// Replays authoritative updates for a remote player. No prediction, no
/// collision checks, unaffected by the local input lock.
#[derive(Debug, Clone)]
pub struct RemotePlayerView {
    actor: Actor,
    animation: AnimationState,
}

impl RemotePlayerView {
    pub fn new(actor: Actor, tuning: &PlayerTuning) -> Self {
        Self {
            actor,
            animation: AnimationState::new(tuning.animation_cadence),
        }
    }

    /// Apply a `{direction, position}` broadcast held in `record`. An empty
    /// record changes nothing.
    pub fn apply_move(&mut self, record: &MoveRecord) -> bool {
        let (Some(direction), Some(position)) = (record.direction(), record.position()) else {
            return false;
        };
        self.actor.x = position.x;
        self.actor.y = position.y;
        self.actor.sprite.direction = Some(direction);
        self.actor.sprite.offset = self.animation.advance(direction);
        true
    }

    pub fn die(&mut self) {
        self.actor.alive = false;
    }
}

impl ActorView for RemotePlayerView {
    fn actor(&self) -> &Actor {
        &self.actor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::animation::SpriteOffset;
    use crate::game::input::Direction;
    use crate::game::pool::MoveObjectPool;
    use crate::ws::protocol::Position;

    fn replay(remote: &mut RemotePlayerView, direction: Direction, position: Position) -> bool {
        let mut pool = MoveObjectPool::new();
        let record = pool.acquire(remote.actor().name.clone(), direction, position);
        remote.apply_move(&record)
    }

    fn view() -> RemotePlayerView {
        let tuning = PlayerTuning::default();
        RemotePlayerView::new(
            Actor::new("bob", 1, Position { x: 0.0, y: 0.0 }, &tuning),
            &tuning,
        )
    }

    #[test]
    fn broadcast_sets_position_verbatim_and_animates() {
        let mut remote = view();
        // inside what would be a wall locally; playback does not care
        assert!(replay(&mut remote, Direction::Left, Position { x: -5.0, y: 7.5 }));

        assert_eq!(remote.actor().position(), Position { x: -5.0, y: 7.5 });
        assert_eq!(remote.actor().sprite.offset, SpriteOffset { x: 96.0, y: 32.0 });
    }

    #[test]
    fn remote_animation_matches_local_cadence() {
        let tuning = PlayerTuning::default();
        let mut remote = view();
        let mut reference = AnimationState::new(tuning.animation_cadence);

        for i in 0..20 {
            let direction = if i < 10 { Direction::Down } else { Direction::Up };
            replay(&mut remote, direction, Position { x: i as f32, y: 0.0 });
            assert_eq!(remote.actor().sprite.offset, reference.advance(direction));
        }
    }

    #[test]
    fn empty_record_changes_nothing() {
        let mut remote = view();
        assert!(!remote.apply_move(&MoveRecord::default()));
        assert_eq!(remote.actor().position(), Position { x: 0.0, y: 0.0 });
        assert_eq!(remote.actor().sprite.direction, None);
    }

    #[test]
    fn dead_remote_is_dimmed() {
        let mut remote = view();
        remote.die();
        assert!(remote.style().contains("opacity: 0.4"));
    }
}
