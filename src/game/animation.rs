//! Walk-cycle animation state

use super::input::Direction;
use super::tuning::{FRAME_COUNT, FRAME_WIDTH};

/// Back-and-forth walk cadence over the three sheet frames
pub const FRAME_CYCLE: [usize; 4] = [0, 1, 0, 2];

/// Sprite sheet offset in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpriteOffset {
    pub x: f32,
    pub y: f32,
}

/// Offset for a direction/frame pair. Down and up share the left half of the
/// sheet; right and left use the right half.
pub fn frame_offset(direction: Direction, frame: usize) -> SpriteOffset {
    let frame = frame.min(FRAME_COUNT - 1) as f32;
    let (column, row) = match direction {
        Direction::Down => (frame, 0.0),
        Direction::Up => (frame, 1.0),
        Direction::Right => (frame + FRAME_COUNT as f32, 0.0),
        Direction::Left => (frame + FRAME_COUNT as f32, 1.0),
    };
    SpriteOffset {
        x: column * FRAME_WIDTH,
        y: row * FRAME_WIDTH,
    }
}

/// Per-actor frame stepping.
///
/// The frame only changes on a cadence boundary or when the direction
/// changes, so output depends on the tick count and direction sequence only.
#[derive(Debug, Clone)]
pub struct AnimationState {
    cadence: u32,
    ticks: u32,
    cycle_position: usize,
    frame: usize,
    last_direction: Option<Direction>,
}

impl AnimationState {
    pub fn new(cadence: u32) -> Self {
        Self {
            cadence: cadence.max(1),
            ticks: 0,
            cycle_position: 0,
            frame: 0,
            last_direction: None,
        }
    }

    pub fn advance(&mut self, direction: Direction) -> SpriteOffset {
        self.ticks = self.ticks.wrapping_add(1);
        if self.ticks % self.cadence == 0 || self.last_direction != Some(direction) {
            self.last_direction = Some(direction);
            self.frame = FRAME_CYCLE[self.cycle_position];
            self.cycle_position = (self.cycle_position + 1) % FRAME_CYCLE.len();
        }
        frame_offset(direction, self.frame)
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn last_direction(&self) -> Option<Direction> {
        self.last_direction
    }
}
