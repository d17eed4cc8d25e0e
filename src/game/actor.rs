//! Actors and the render-surface contract

use std::fmt::Write as _;
use std::sync::Arc;

use super::animation::SpriteOffset;
use super::collision::Aabb;
use super::input::Direction;
use super::tuning::{PlayerTuning, SPRITE_SHEETS};
use crate::ws::protocol::Position;

/// Opacity applied to dead actors
const DEAD_OPACITY: f32 = 0.4;

/// Current sprite selection
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpriteDescriptor {
    pub direction: Option<Direction>,
    pub offset: SpriteOffset,
}

/// A player in the arena
#[derive(Debug, Clone)]
pub struct Actor {
    pub name: Arc<str>,
    /// Sprite sheet index (player{index + 1}.png), below `SPRITE_SHEETS`
    pub sheet_index: usize,
    pub x: f32,
    pub y: f32,
    pub speed: f32,
    pub life: u32,
    pub alive: bool,
    pub sprite: SpriteDescriptor,
}

impl Actor {
    /// Out-of-range sheet indices fall back to the last sheet.
    pub fn new(
        name: impl Into<Arc<str>>,
        sheet_index: usize,
        spawn: Position,
        tuning: &PlayerTuning,
    ) -> Self {
        Self {
            name: name.into(),
            sheet_index: sheet_index.min(SPRITE_SHEETS - 1),
            x: spawn.x,
            y: spawn.y,
            speed: tuning.speed,
            life: tuning.initial_life,
            alive: true,
            sprite: SpriteDescriptor::default(),
        }
    }

    pub fn position(&self) -> Position {
        Position {
            x: self.x,
            y: self.y,
        }
    }

    /// Hitbox used for collision and trigger queries
    pub fn bounds(&self, tuning: &PlayerTuning) -> Aabb {
        Aabb {
            x: self.x + tuning.hitbox_inset,
            y: self.y + tuning.hitbox_inset,
            w: tuning.hitbox_size,
            h: tuning.hitbox_size,
        }
    }
}

/// Compose the style descriptor the render surface turns into pixels
pub fn compose_style(actor: &Actor) -> String {
    let mut style = format!(
        "background-image: url(./media/player{}.png); background-position: -{}px -{}px; transform: translate({}px, {}px);",
        actor.sheet_index.saturating_add(1),
        actor.sprite.offset.x,
        actor.sprite.offset.y,
        actor.x,
        actor.y,
    );
    if !actor.alive {
        let _ = write!(style, " opacity: {DEAD_OPACITY};");
    }
    style
}

/// Read access shared by locally simulated and replayed actors
pub trait ActorView {
    fn actor(&self) -> &Actor;

    fn name(&self) -> &str {
        &self.actor().name
    }

    fn style(&self) -> String {
        compose_style(self.actor())
    }
}

/// External collaborator that draws actors
pub trait RenderSurface: Send {
    fn update_style(&mut self, owner: &str, style: &str);

    fn remove(&mut self, owner: &str);
}

/// Push an actor's current look to the surface
pub fn present(view: &dyn ActorView, surface: &mut dyn RenderSurface) {
    surface.update_style(view.name(), &view.style());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor() -> Actor {
        Actor::new("alice", 1, Position { x: 100.0, y: 64.0 }, &PlayerTuning::default())
    }

    #[test]
    fn style_encodes_sheet_offset_and_translation() {
        let mut a = actor();
        a.sprite.offset = SpriteOffset { x: 96.0, y: 32.0 };

        assert_eq!(
            compose_style(&a),
            "background-image: url(./media/player2.png); background-position: -96px -32px; transform: translate(100px, 64px);"
        );
    }

    #[test]
    fn dead_actor_is_dimmed() {
        let mut a = actor();
        a.alive = false;
        assert!(compose_style(&a).ends_with(" opacity: 0.4;"));
    }

    #[test]
    fn oversized_sheet_index_is_clamped() {
        let a = Actor::new("bob", usize::MAX, Position::default(), &PlayerTuning::default());
        assert_eq!(a.sheet_index, SPRITE_SHEETS - 1);
        assert!(compose_style(&a).starts_with("background-image: url(./media/player4.png);"));

        let mut raw = a.clone();
        raw.sheet_index = usize::MAX;
        assert!(compose_style(&raw).contains(&format!("player{}.png", usize::MAX)));
    }

    #[test]
    fn bounds_are_inset_from_sprite_origin() {
        let a = actor();
        let b = a.bounds(&PlayerTuning::default());
        assert_eq!(b, Aabb { x: 104.0, y: 68.0, w: 24.0, h: 24.0 });
    }
}
