use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the four axis-aligned unit moves a block can make.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    pub const UP: Direction = Direction::Up;
    pub const DOWN: Direction = Direction::Down;
    pub const LEFT: Direction = Direction::Left;
    pub const RIGHT: Direction = Direction::Right;

    const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    pub fn all() -> Vec<Direction> {
        Self::ALL.to_vec()
    }

    pub fn vertical() -> Vec<Direction> {
        vec![Direction::Up, Direction::Down]
    }

    pub fn horizontal() -> Vec<Direction> {
        vec![Direction::Left, Direction::Right]
    }

    pub fn none() -> Vec<Direction> {
        Vec::new()
    }

    pub fn dx(self) -> i32 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
            Direction::Up | Direction::Down => 0,
        }
    }

    pub fn dy(self) -> i32 {
        match self {
            Direction::Up => -1,
            Direction::Down => 1,
            Direction::Left | Direction::Right => 0,
        }
    }

    pub fn delta(self) -> (i32, i32) {
        (self.dx(), self.dy())
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Canonical direction for a unit delta. Zero and diagonal deltas have none.
    pub fn from(dx: i32, dy: i32) -> Option<Direction> {
        Self::ALL.into_iter().find(|d| d.delta() == (dx, dy))
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Right => "right",
            Direction::Down => "down",
            Direction::Left => "left",
        };
        f.write_str(name)
    }
}
