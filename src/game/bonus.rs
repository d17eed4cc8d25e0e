//! Map pickups and the local working set of live pickups

use std::fmt;

use serde::{Deserialize, Serialize};

/// Grid indices of a map cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCell {
    pub x: i32,
    pub y: i32,
}

impl GridCell {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Pickup kind. Kinds this client does not know are kept verbatim so they
/// can still be reported upstream.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BonusKind {
    /// One more concurrent bomb
    Bomb,
    /// One more blast range
    Blast,
    Speed,
    /// One-shot escape capability
    Escape,
    Life,
    Other(String),
}

impl BonusKind {
    pub fn as_str(&self) -> &str {
        match self {
            BonusKind::Bomb => "bomb",
            BonusKind::Blast => "blast",
            BonusKind::Speed => "speed",
            BonusKind::Escape => "escape",
            BonusKind::Life => "life",
            BonusKind::Other(name) => name,
        }
    }
}

impl From<String> for BonusKind {
    fn from(name: String) -> Self {
        match name.as_str() {
            "bomb" => BonusKind::Bomb,
            "blast" => BonusKind::Blast,
            "speed" => BonusKind::Speed,
            "escape" => BonusKind::Escape,
            "life" => BonusKind::Life,
            _ => BonusKind::Other(name),
        }
    }
}

impl From<BonusKind> for String {
    fn from(kind: BonusKind) -> Self {
        match kind {
            BonusKind::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for BonusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BonusPickup {
    pub kind: BonusKind,
    pub cell: GridCell,
    pub remaining_uses: u32,
}

impl BonusPickup {
    pub fn new(kind: BonusKind, cell: GridCell) -> Self {
        Self {
            kind,
            cell,
            remaining_uses: 1,
        }
    }
}

/// Live pickups known to this client, grouped by cell in the order the
/// cells first appeared.
///
/// A pickup is only claimable while its cell holds exactly one candidate;
/// claiming removes it in the same call, so the same pickup can never be
/// claimed twice.
#[derive(Debug, Default)]
pub struct BonusSet {
    slots: Vec<(GridCell, Vec<BonusPickup>)>,
}

impl BonusSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spent pickups are not admitted.
    pub fn insert(&mut self, pickup: BonusPickup) -> bool {
        if pickup.remaining_uses == 0 {
            return false;
        }
        match self.slots.iter_mut().find(|(cell, _)| *cell == pickup.cell) {
            Some((_, slot)) => slot.push(pickup),
            None => self.slots.push((pickup.cell, vec![pickup])),
        }
        true
    }

    /// Authoritative removal of everything in `cell`
    pub fn invalidate(&mut self, cell: GridCell) -> usize {
        match self.slots.iter().position(|(c, _)| *c == cell) {
            Some(i) => self.slots.remove(i).1.len(),
            None => 0,
        }
    }

    /// Claim every uncontested pickup whose cell satisfies `touches`, in
    /// insertion order.
    pub fn claim_where<F>(&mut self, mut touches: F) -> Vec<BonusPickup>
    where
        F: FnMut(GridCell) -> bool,
    {
        let mut claimed = Vec::new();
        self.slots.retain_mut(|(cell, slot)| {
            if slot.len() == 1 && touches(*cell) {
                claimed.append(slot);
                false
            } else {
                true
            }
        });
        claimed
    }

    pub fn contains(&self, cell: GridCell) -> bool {
        self.slots.iter().any(|(c, _)| *c == cell)
    }

    pub fn len(&self) -> usize {
        self.slots.iter().map(|(_, slot)| slot.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_unknown_names() {
        assert_eq!(BonusKind::from("life".to_string()), BonusKind::Life);
        let shield = BonusKind::from("shield".to_string());
        assert_eq!(shield, BonusKind::Other("shield".into()));
        assert_eq!(String::from(shield), "shield");
    }

    #[test]
    fn claim_removes_pickup_so_second_claim_finds_nothing() {
        let mut set = BonusSet::new();
        let cell = GridCell::new(3, 4);
        set.insert(BonusPickup::new(BonusKind::Life, cell));

        let first = set.claim_where(|c| c == cell);
        let second = set.claim_where(|c| c == cell);

        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
        assert!(!set.contains(cell));
    }

    #[test]
    fn contested_slot_is_not_claimable() {
        let mut set = BonusSet::new();
        let cell = GridCell::new(1, 1);
        set.insert(BonusPickup::new(BonusKind::Bomb, cell));
        set.insert(BonusPickup::new(BonusKind::Speed, cell));

        assert!(set.claim_where(|_| true).is_empty());
        assert_eq!(set.len(), 2);

        assert_eq!(set.invalidate(cell), 2);
        assert!(set.is_empty());
    }

    #[test]
    fn spent_pickups_are_rejected() {
        let mut set = BonusSet::new();
        let mut pickup = BonusPickup::new(BonusKind::Blast, GridCell::new(0, 0));
        pickup.remaining_uses = 0;

        assert!(!set.insert(pickup));
        assert!(set.is_empty());
    }

    #[test]
    fn claims_come_back_in_insertion_order() {
        let cells = [
            GridCell::new(9, 0),
            GridCell::new(2, 7),
            GridCell::new(5, 5),
            GridCell::new(0, 3),
            GridCell::new(4, 1),
        ];
        let mut set = BonusSet::new();
        for cell in cells {
            set.insert(BonusPickup::new(BonusKind::Speed, cell));
        }

        let claimed: Vec<GridCell> = set
            .claim_where(|_| true)
            .into_iter()
            .map(|p| p.cell)
            .collect();
        assert_eq!(claimed, cells);
        assert!(set.is_empty());
    }

    #[test]
    fn claim_only_takes_touched_cells() {
        let mut set = BonusSet::new();
        set.insert(BonusPickup::new(BonusKind::Bomb, GridCell::new(1, 1)));
        set.insert(BonusPickup::new(BonusKind::Life, GridCell::new(5, 5)));

        let claimed = set.claim_where(|c| c.x == 5);
        assert_eq!(claimed.len(), 1);
        assert_eq!(claimed[0].kind, BonusKind::Life);
        assert!(set.contains(GridCell::new(1, 1)));
    }
}
