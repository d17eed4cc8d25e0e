//! Gameplay tuning for the local player.
//!
//! Keep this separate from runtime configuration (frame pacing, names, seeds).

use std::time::Duration;

/// Sprite sheet geometry
pub const FRAME_WIDTH: f32 = 32.0;
pub const FRAME_COUNT: usize = 3;

/// Number of player sprite sheets (player1.png ..= player4.png)
pub const SPRITE_SHEETS: usize = 4;

#[derive(Debug, Clone, Copy)]
pub struct PlayerTuning {
    /// Base movement per tick in pixels
    pub speed: f32,
    /// Speed added by each speed pickup
    pub speed_step: f32,
    /// Lives at spawn
    pub initial_life: u32,
    /// Concurrent bombs allowed at spawn
    pub initial_max_bombs: u32,
    /// Minimum time between two bomb drops
    pub bomb_cooldown: Duration,
    /// Minimum time between two damage ticks
    pub damage_cooldown: Duration,
    /// Delay before a pickup is reported upstream
    pub bonus_notice_delay: Duration,
    /// Vertical offset between the sprite origin and the bomb layer
    pub bomb_offset_y: f32,
    /// Ticks between two walk frames
    pub animation_cadence: u32,
    /// Hitbox inset from the sprite origin, and its size
    pub hitbox_inset: f32,
    pub hitbox_size: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            speed: 2.0,
            speed_step: 0.2,
            initial_life: 3,
            initial_max_bombs: 1,
            bomb_cooldown: Duration::from_millis(1_500),
            damage_cooldown: Duration::from_millis(1_500),
            bonus_notice_delay: Duration::from_millis(100),
            bomb_offset_y: 608.0,
            animation_cadence: 8,
            hitbox_inset: 4.0,
            hitbox_size: 24.0,
        }
    }
}
