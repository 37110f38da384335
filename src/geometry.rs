//! Positions and facings on the odd-column-shifted grid.
//!
//! Columns with an odd `x` sit half a cell lower than even columns, so the
//! diagonal neighbours of a cell depend on the parity of its column. Nothing
//! here checks board bounds; negative coordinates are ordinary results.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::common::GameError;

/// A grid cell as `(x, y)`; `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    fn odd_column(&self) -> bool {
        self.x.rem_euclid(2) == 1
    }

    fn offset(self, (dx, dy): (i32, i32)) -> Option<Self> {
        Some(Self::new(self.x.checked_add(dx)?, self.y.checked_add(dy)?))
    }
}

impl From<[i32; 2]> for Position {
    fn from([x, y]: [i32; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<Position> for [i32; 2] {
    fn from(p: Position) -> Self {
        [p.x, p.y]
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}

/// One of the six facings, in degrees clockwise from "up".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum Angle {
    Deg0,
    Deg60,
    Deg120,
    Deg180,
    Deg240,
    Deg300,
}

impl Angle {
    /// All facings in table order.
    pub const ALL: [Angle; 6] = [
        Angle::Deg0,
        Angle::Deg60,
        Angle::Deg120,
        Angle::Deg180,
        Angle::Deg240,
        Angle::Deg300,
    ];

    pub fn degrees(self) -> i32 {
        self.index() as i32 * 60
    }

    /// The facing rotated by 180 degrees.
    pub fn opposite(self) -> Angle {
        Angle::ALL[(self.index() + 3) % 6]
    }

    fn index(self) -> usize {
        match self {
            Angle::Deg0 => 0,
            Angle::Deg60 => 1,
            Angle::Deg120 => 2,
            Angle::Deg180 => 3,
            Angle::Deg240 => 4,
            Angle::Deg300 => 5,
        }
    }
}

impl TryFrom<i32> for Angle {
    type Error = GameError;

    fn try_from(degrees: i32) -> Result<Self, Self::Error> {
        match degrees {
            0 => Ok(Angle::Deg0),
            60 => Ok(Angle::Deg60),
            120 => Ok(Angle::Deg120),
            180 => Ok(Angle::Deg180),
            240 => Ok(Angle::Deg240),
            300 => Ok(Angle::Deg300),
            other => Err(GameError::InvalidArgument(format!(
                "angle must be one of 0, 60, 120, 180, 240, 300; got {other}"
            ))),
        }
    }
}

impl From<Angle> for i32 {
    fn from(angle: Angle) -> Self {
        angle.degrees()
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.degrees())
    }
}

// Offsets indexed by `Angle::index`.
const EVEN_COLUMN_OFFSETS: [(i32, i32); 6] = [(0, -1), (1, -1), (1, 0), (0, 1), (-1, 0), (-1, -1)];
const ODD_COLUMN_OFFSETS: [(i32, i32); 6] = [(0, -1), (1, 0), (1, 1), (0, 1), (-1, 1), (-1, 0)];

/// The cell adjacent to `position` in direction `angle`.
/// Fails when the step would leave the `i32` coordinate range.
pub fn neighbor(position: Position, angle: Angle) -> Result<Position, GameError> {
    let table = if position.odd_column() {
        &ODD_COLUMN_OFFSETS
    } else {
        &EVEN_COLUMN_OFFSETS
    };
    position.offset(table[angle.index()]).ok_or_else(|| {
        GameError::InvalidArgument(format!(
            "no neighbour of {position} at angle {angle}: coordinate out of range"
        ))
    })
}

/// `length` cells in a straight line, starting at `position` itself.
pub fn neighbors_in_direction(
    position: Position,
    angle: Angle,
    length: usize,
) -> Result<Vec<Position>, GameError> {
    if length == 0 {
        return Err(GameError::InvalidArgument(
            "neighbors_in_direction needs a length of at least 1".to_string(),
        ));
    }
    let mut cells = Vec::with_capacity(length);
    let mut current = position;
    cells.push(current);
    for _ in 1..length {
        current = neighbor(current, angle)?;
        cells.push(current);
    }
    Ok(cells)
}

/// The six neighbours of `position`, ordered as `Angle::ALL`.
pub fn all_neighbors(position: Position) -> Result<[Position; 6], GameError> {
    let mut cells = [position; 6];
    for (cell, angle) in cells.iter_mut().zip(Angle::ALL) {
        *cell = neighbor(position, angle)?;
    }
    Ok(cells)
}
