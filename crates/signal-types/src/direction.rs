//! Approach directions and the fixed intersection topology.
//!
//! The intersection has exactly four approaches. North and south share the
//! north-south axis and are each other's axis-opposite; east and west share
//! the east-west axis. Every north/south approach is perpendicular to both
//! east/west approaches and vice versa.
//!
//! Per-direction data is stored in [`PerDirection`], a four-field struct
//! rather than a string-keyed map, so a lookup can never miss.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypesError;

/// One of the four intersection approaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Traffic approaching from the north.
    North,
    /// Traffic approaching from the south.
    South,
    /// Traffic approaching from the east.
    East,
    /// Traffic approaching from the west.
    West,
}

impl Direction {
    /// All four directions in canonical order (N, S, E, W).
    pub const ALL: [Self; 4] = [Self::North, Self::South, Self::East, Self::West];

    /// Lowercase name used in rule labels, config keys and logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::North => "north",
            Self::South => "south",
            Self::East => "east",
            Self::West => "west",
        }
    }

    /// The axis-opposite direction (north <-> south, east <-> west).
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::East => Self::West,
            Self::West => Self::East,
        }
    }

    /// The two perpendicular directions, in canonical order.
    ///
    /// North and south see `[East, West]`; east and west see
    /// `[North, South]`.
    pub const fn perpendicular(self) -> [Self; 2] {
        match self {
            Self::North | Self::South => [Self::East, Self::West],
            Self::East | Self::West => [Self::North, Self::South],
        }
    }

    /// The axis this direction belongs to.
    pub const fn axis(self) -> Axis {
        match self {
            Self::North | Self::South => Axis::NorthSouth,
            Self::East | Self::West => Axis::EastWest,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "north" | "n" => Ok(Self::North),
            "south" | "s" => Ok(Self::South),
            "east" | "e" => Ok(Self::East),
            "west" | "w" => Ok(Self::West),
            _ => Err(TypesError::InvalidDirection {
                name: s.to_owned(),
            }),
        }
    }
}

/// One of the two signal axes. Both directions of an axis share a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// North and south approaches.
    NorthSouth,
    /// East and west approaches.
    EastWest,
}

impl Axis {
    /// The two directions on this axis. The first one is the "lead"
    /// direction used when a single direction must represent the axis.
    pub const fn directions(self) -> [Direction; 2] {
        match self {
            Self::NorthSouth => [Direction::North, Direction::South],
            Self::EastWest => [Direction::East, Direction::West],
        }
    }

    /// The other axis.
    pub const fn other(self) -> Self {
        match self {
            Self::NorthSouth => Self::EastWest,
            Self::EastWest => Self::NorthSouth,
        }
    }
}

/// A value for each of the four directions.
///
/// Serializes as a map keyed by direction name, which is the shape the
/// reporting side expects for per-direction breakdowns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PerDirection<T> {
    /// Value for the north approach.
    pub north: T,
    /// Value for the south approach.
    pub south: T,
    /// Value for the east approach.
    pub east: T,
    /// Value for the west approach.
    pub west: T,
}

impl<T> PerDirection<T> {
    /// Build from explicit per-direction values.
    pub const fn new(north: T, south: T, east: T, west: T) -> Self {
        Self {
            north,
            south,
            east,
            west,
        }
    }

    /// Build by calling `f` once per direction in canonical order.
    pub fn from_fn(mut f: impl FnMut(Direction) -> T) -> Self {
        Self {
            north: f(Direction::North),
            south: f(Direction::South),
            east: f(Direction::East),
            west: f(Direction::West),
        }
    }

    /// Borrow the value for `direction`.
    pub const fn get(&self, direction: Direction) -> &T {
        match direction {
            Direction::North => &self.north,
            Direction::South => &self.south,
            Direction::East => &self.east,
            Direction::West => &self.west,
        }
    }

    /// Mutably borrow the value for `direction`.
    pub const fn get_mut(&mut self, direction: Direction) -> &mut T {
        match direction {
            Direction::North => &mut self.north,
            Direction::South => &mut self.south,
            Direction::East => &mut self.east,
            Direction::West => &mut self.west,
        }
    }

    /// Replace the value for `direction`, returning the old one.
    pub const fn replace(&mut self, direction: Direction, value: T) -> T {
        std::mem::replace(self.get_mut(direction), value)
    }

    /// Iterate `(direction, &value)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Direction, &T)> {
        Direction::ALL.into_iter().map(move |d| (d, self.get(d)))
    }

    /// Apply `f` to every value, keeping the direction layout.
    pub fn map<U>(&self, mut f: impl FnMut(Direction, &T) -> U) -> PerDirection<U> {
        PerDirection::from_fn(|d| f(d, self.get(d)))
    }
}

impl<T: Copy> PerDirection<T> {
    /// The same value for all four directions.
    pub const fn splat(value: T) -> Self {
        Self::new(value, value, value, value)
    }
}
