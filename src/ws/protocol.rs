//! WebSocket protocol message definitions
//! These are the wire types exchanged with the remote authority

use serde::{Deserialize, Serialize};

use crate::game::bonus::{BonusKind, BonusPickup, GridCell};
use crate::game::input::Direction;

/// Screen position in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

/// Pickup identity as carried on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BonusData {
    /// Pickup kind ("bomb", "blast", "speed", "escape", "life", ...)
    pub bonus: BonusKind,
    pub index_x: i32,
    pub index_y: i32,
}

impl BonusData {
    pub fn cell(&self) -> GridCell {
        GridCell::new(self.index_x, self.index_y)
    }
}

impl From<&BonusPickup> for BonusData {
    fn from(pickup: &BonusPickup) -> Self {
        Self {
            bonus: pickup.kind.clone(),
            index_x: pickup.cell.x,
            index_y: pickup.cell.y,
        }
    }
}

/// Intents sent from this client to the authority
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMsg {
    /// Local position changed this tick
    Move {
        sender: String,
        direction: Direction,
        position: Position,
    },

    /// Bomb drop accepted locally
    #[serde(rename_all = "camelCase")]
    Bomb {
        sender: String,
        bomb_type: u32,
        /// Sprite position shifted onto the bomb layer
        position: Position,
        /// Unix millis at drop time
        date: u64,
        blast_range_bonus: u32,
    },

    /// Pickup consumed locally (sent after a short delay)
    Bonus { sender: String, data: BonusData },

    /// Damage tick registered
    Degats { sender: String, nb: u32 },

    /// Death acknowledged
    Death { sender: String },
}

impl ClientMsg {
    pub fn kind(&self) -> &'static str {
        match self {
            ClientMsg::Move { .. } => "move",
            ClientMsg::Bomb { .. } => "bomb",
            ClientMsg::Bonus { .. } => "bonus",
            ClientMsg::Degats { .. } => "degats",
            ClientMsg::Death { .. } => "death",
        }
    }
}

/// Messages pushed by the authority to this client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMsg {
    /// Suspend local input capture
    Lock,

    /// Resume local input capture
    Unlock,

    /// A player entered the arena at its spawn assignment
    Join {
        sender: String,
        index: usize,
        position: Position,
    },

    /// A player left the arena
    Leave { sender: String },

    /// Authoritative position/animation broadcast
    Move {
        sender: String,
        direction: Direction,
        position: Position,
    },

    /// One of `sender`'s bombs went off
    BombExploded { sender: String },

    /// A pickup was consumed (by anyone) and is no longer available
    Bonus { sender: String, data: BonusData },

    /// A pickup appeared on the map
    SpawnBonus { data: BonusData },

    /// `target` stands in a blast
    Blast { target: String },

    /// `sender` is dead
    Death { sender: String },

    /// Anything this client does not understand yet
    #[serde(other)]
    Unknown,
}
