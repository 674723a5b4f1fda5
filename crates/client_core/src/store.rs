use shared::domain::{Coordinate, DeliveryPoint};

/// Local copy of the delivery points known to the session.
///
/// Order is the order of the last remote fetch followed by local additions.
/// Duplicate coordinates are kept as-is; the remote service decides whether
/// they are allowed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeliveryPointStore {
    points: Vec<DeliveryPoint>,
}

impl DeliveryPointStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_points(points: Vec<DeliveryPoint>) -> Self {
        Self { points }
    }

    pub fn list(&self) -> &[DeliveryPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn contains(&self, coordinate: Coordinate) -> bool {
        self.points.iter().any(|point| point.is_at(coordinate))
    }

    pub fn add(&mut self, point: DeliveryPoint) {
        self.points.push(point);
    }

    /// Drops every entry at `coordinate` and returns how many were removed.
    pub fn remove(&mut self, coordinate: Coordinate) -> usize {
        let before = self.points.len();
        self.points.retain(|point| !point.is_at(coordinate));
        before - self.points.len()
    }

    pub fn replace_all(&mut self, points: Vec<DeliveryPoint>) {
        self.points = points;
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
