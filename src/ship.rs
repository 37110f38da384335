//! Ship classes, segments and the per-ship placement/damage logic.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::common::{GameError, PlayerId, ShipId};
use crate::geometry::{neighbors_in_direction, Angle, Position};

/// Type of ship: a name with a fixed segment count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShipClass {
    Default,
    AircraftCarrier,
    Battleship,
    Cruiser,
    Destroyer,
    Submarine,
}

impl ShipClass {
    /// Number of segments every ship of this class has.
    pub const fn segment_count(self) -> usize {
        match self {
            ShipClass::Default => 3,
            ShipClass::AircraftCarrier => 5,
            ShipClass::Battleship => 4,
            ShipClass::Cruiser => 3,
            ShipClass::Destroyer => 2,
            ShipClass::Submarine => 3,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            ShipClass::Default => "DEFAULT",
            ShipClass::AircraftCarrier => "AIRCRAFT_CARRIER",
            ShipClass::Battleship => "BATTLESHIP",
            ShipClass::Cruiser => "CRUISER",
            ShipClass::Destroyer => "DESTROYER",
            ShipClass::Submarine => "SUBMARINE",
        }
    }
}

impl fmt::Display for ShipClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One hit-point-bearing cell of a ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub hp: i32,
    pub position: Option<Position>,
}

impl Segment {
    const fn fresh() -> Self {
        Segment {
            hp: 1,
            position: None,
        }
    }
}

/// Overlap between two ships.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    pub ship: ShipId,
    pub collisions: Vec<Position>,
}

/// A ship assigned to one board. `owner` is the owning player's id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ship {
    id: ShipId,
    class: ShipClass,
    owner: PlayerId,
    angle: Option<Angle>,
    segments: Vec<Segment>,
}

impl Ship {
    /// Build an unpositioned ship with every segment at 1 hp.
    pub fn new(class: ShipClass, id: ShipId, owner: PlayerId) -> Self {
        Ship {
            id,
            class,
            owner,
            angle: None,
            segments: vec![Segment::fresh(); class.segment_count()],
        }
    }

    pub fn id(&self) -> &ShipId {
        &self.id
    }

    pub fn class(&self) -> ShipClass {
        self.class
    }

    pub fn owner(&self) -> &PlayerId {
        &self.owner
    }

    pub fn angle(&self) -> Option<Angle> {
        self.angle
    }

    /// Anchor of the ship: the first segment's position.
    pub fn position(&self) -> Option<Position> {
        self.segments.first().and_then(|s| s.position)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Positions of all segments, or `None` while the ship is unpositioned.
    pub fn positions(&self) -> Option<Vec<Position>> {
        self.segments.iter().map(|s| s.position).collect()
    }

    /// Cells this ship would cover if anchored at `position` facing `angle`.
    pub fn footprint(&self, position: Position, angle: Angle) -> Result<Vec<Position>, GameError> {
        neighbors_in_direction(position, angle, self.segments.len())
    }

    /// Move every segment onto the line starting at `position` facing `angle`.
    /// Hit points are kept; board legality is not checked here. On error the
    /// ship keeps its previous position.
    pub fn set_positions(
        &mut self,
        position: Position,
        angle: Angle,
    ) -> Result<&[Segment], GameError> {
        let cells = self.footprint(position, angle)?;
        for (segment, cell) in self.segments.iter_mut().zip(cells) {
            segment.position = Some(cell);
        }
        self.angle = Some(angle);
        Ok(&self.segments)
    }

    /// The subset of `positions` that this ship occupies.
    pub fn collides_with(&self, positions: &[Position]) -> Vec<Position> {
        positions
            .iter()
            .copied()
            .filter(|p| self.segments.iter().any(|s| s.position == Some(*p)))
            .collect()
    }

    /// Overlap with another ship's full footprint, if any.
    pub fn collides_with_ship(&self, other: &Ship) -> Option<Collision> {
        let theirs: Vec<Position> = other.segments.iter().filter_map(|s| s.position).collect();
        let collisions = self.collides_with(&theirs);
        if collisions.is_empty() {
            None
        } else {
            Some(Collision {
                ship: other.id.clone(),
                collisions,
            })
        }
    }

    /// The segment sitting on `position`.
    pub fn segment_at(&self, position: Position) -> Result<Option<&Segment>, GameError> {
        let mut found = self
            .segments
            .iter()
            .filter(|s| s.position == Some(position));
        let first = found.next();
        if found.next().is_some() {
            return Err(GameError::InternalConsistency(format!(
                "ship {} has more than one segment at {}",
                self.id, position
            )));
        }
        Ok(first)
    }

    /// Sum of segment hit points; may be negative after overkill.
    pub fn total_hp(&self) -> i32 {
        self.segments.iter().map(|s| s.hp).sum()
    }

    /// Spread `total` hit points round-robin, earlier segments taking the remainder.
    pub fn set_total_hp(&mut self, total: i32) -> Result<(), GameError> {
        if total < 0 {
            return Err(GameError::InvalidArgument(format!(
                "total hp must be a non-negative integer, got {total}"
            )));
        }
        let count = self.segments.len() as i32;
        for (i, segment) in self.segments.iter_mut().enumerate() {
            let i = i as i32;
            segment.hp = total / count + i32::from(i < total % count);
        }
        Ok(())
    }

    /// Subtract `amount` hp from every segment on one of `positions`.
    pub fn damage_segments(&mut self, positions: &[Position], amount: i32) {
        for segment in self.segments.iter_mut() {
            if segment.position.is_some_and(|p| positions.contains(&p)) {
                segment.hp -= amount;
            }
        }
    }

    pub fn is_destroyed(&self) -> bool {
        self.total_hp() <= 0
    }

    pub fn is_alive(&self) -> bool {
        !self.is_destroyed()
    }
}

/// Public view of a ship inside a game snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipState {
    pub id: ShipId,
    #[serde(rename = "type")]
    pub class: ShipClass,
    pub owner: PlayerId,
    pub angle: Option<Angle>,
    pub position: Option<Position>,
    pub segments: Vec<Segment>,
    #[serde(rename = "totalHP")]
    pub total_hp: i32,
    pub destroyed: bool,
}

impl From<&Ship> for ShipState {
    fn from(ship: &Ship) -> Self {
        ShipState {
            id: ship.id.clone(),
            class: ship.class,
            owner: ship.owner.clone(),
            angle: ship.angle,
            position: ship.position(),
            segments: ship.segments.clone(),
            total_hp: ship.total_hp(),
            destroyed: ship.is_destroyed(),
        }
    }
}
