//! Per-cell classification of a session, for whatever draws the grid.

use shared::domain::{Coordinate, GridSize};

use crate::controller::SessionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    pub coordinate: Coordinate,
    pub is_start: bool,
    pub is_location: bool,
    pub is_route: bool,
}

impl GridCell {
    pub fn is_empty(&self) -> bool {
        !(self.is_start || self.is_location || self.is_route)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridView {
    size: GridSize,
    cells: Vec<GridCell>,
}

impl GridView {
    /// Rows are indexed by `x`, columns by `y`. Points outside the current
    /// grid are not shown.
    pub fn from_session(session: &SessionState) -> Self {
        let size = session.grid();
        let start = session.start().map(|point| point.coordinate());
        let route = session.route_points();
        let cells = (0..size.get())
            .flat_map(|x| (0..size.get()).map(move |y| Coordinate::new(x, y)))
            .map(|coordinate| GridCell {
                coordinate,
                is_start: start == Some(coordinate),
                is_location: session.points().iter().any(|point| point.is_at(coordinate)),
                is_route: route.contains(&coordinate),
            })
            .collect();
        Self { size, cells }
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    pub fn cell(&self, coordinate: Coordinate) -> Option<&GridCell> {
        if !self.size.contains(coordinate) {
            return None;
        }
        let side = self.size.get() as usize;
        self.cells
            .get(coordinate.x as usize * side + coordinate.y as usize)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[GridCell]> {
        self.cells.chunks(self.size.get() as usize)
    }
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
