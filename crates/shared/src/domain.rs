use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::CoordinateParseError;

/// Grid cell address. Two delivery points with the same coordinate are the
/// same point as far as the remote service is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: u32,
    pub y: u32,
}

impl Coordinate {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    pub fn manhattan_distance(&self, other: &Coordinate) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.x, self.y)
    }
}

/// Parses the `"x, y"` form used by `visit_order` entries.
impl FromStr for Coordinate {
    type Err = CoordinateParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (raw_x, raw_y) = raw
            .split_once(',')
            .ok_or_else(|| CoordinateParseError::MissingSeparator(raw.to_string()))?;
        let parse = |part: &str| {
            part.trim()
                .parse::<u32>()
                .map_err(|_| CoordinateParseError::InvalidComponent {
                    raw: raw.to_string(),
                    component: part.trim().to_string(),
                })
        };
        Ok(Self::new(parse(raw_x)?, parse(raw_y)?))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeliveryPoint {
    pub x: u32,
    pub y: u32,
    pub speed_limit: f64,
}

impl DeliveryPoint {
    pub const fn new(x: u32, y: u32, speed_limit: f64) -> Self {
        Self { x, y, speed_limit }
    }

    pub const fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.x, self.y)
    }

    pub fn is_at(&self, coordinate: Coordinate) -> bool {
        self.coordinate() == coordinate
    }
}

/// Side length of the square delivery grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridSize(u32);

impl GridSize {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 20;
    pub const DEFAULT: GridSize = GridSize(5);

    /// Returns `None` when `size` is outside `MIN..=MAX`.
    pub const fn new(size: u32) -> Option<Self> {
        if size >= Self::MIN && size <= Self::MAX {
            Some(Self(size))
        } else {
            None
        }
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    pub fn contains(self, coordinate: Coordinate) -> bool {
        coordinate.x < self.0 && coordinate.y < self.0
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{0}x{0}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteResult {
    pub visit_order: Vec<Coordinate>,
    pub total_distance: f64,
    pub total_time: f64,
}

impl RouteResult {
    pub fn starts_at(&self, coordinate: Coordinate) -> bool {
        self.visit_order.first() == Some(&coordinate)
    }

    /// Consecutive pairs of the visit order, one per drawn segment.
    pub fn legs(&self) -> impl Iterator<Item = (Coordinate, Coordinate)> + '_ {
        self.visit_order
            .windows(2)
            .map(|pair| (pair[0], pair[1]))
    }
}
