//! Pure input checks. Nothing here clamps: out-of-range input is rejected and
//! the caller keeps whatever valid value it already had.

use shared::domain::{Coordinate, DeliveryPoint, GridSize};

use crate::error::RouteError;

pub fn validate_grid_size(candidate: i64) -> Result<GridSize, RouteError> {
    u32::try_from(candidate)
        .ok()
        .and_then(GridSize::new)
        .ok_or_else(|| RouteError::InvalidGridSize(candidate.to_string()))
}

fn coerce_axis(axis: &str, raw: &str, grid: GridSize) -> Result<u32, RouteError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(RouteError::InvalidCoordinate(format!("{axis} is empty")));
    }
    let value = trimmed.parse::<i64>().map_err(|_| {
        RouteError::InvalidCoordinate(format!("{axis} '{trimmed}' is not a whole number"))
    })?;
    if value < 0 || value >= i64::from(grid.get()) {
        return Err(RouteError::InvalidCoordinate(format!(
            "{axis} {value} is outside the {grid} grid"
        )));
    }
    Ok(value as u32)
}

pub fn coerce_coordinate(raw_x: &str, raw_y: &str, grid: GridSize) -> Result<Coordinate, RouteError> {
    Ok(Coordinate::new(
        coerce_axis("x", raw_x, grid)?,
        coerce_axis("y", raw_y, grid)?,
    ))
}

pub fn validate_speed_limit(speed_limit: f64) -> Result<f64, RouteError> {
    if speed_limit.is_finite() && speed_limit > 0.0 {
        Ok(speed_limit)
    } else {
        Err(RouteError::InvalidSpeedLimit(speed_limit))
    }
}

pub fn coerce_point(
    raw_x: &str,
    raw_y: &str,
    speed_limit: f64,
    grid: GridSize,
) -> Result<DeliveryPoint, RouteError> {
    let coordinate = coerce_coordinate(raw_x, raw_y, grid)?;
    let speed_limit = validate_speed_limit(speed_limit)?;
    Ok(DeliveryPoint::new(coordinate.x, coordinate.y, speed_limit))
}

/// A start is only valid when it is one of the registered delivery points.
pub fn validate_start(
    candidate: Coordinate,
    known_points: &[DeliveryPoint],
) -> Result<DeliveryPoint, RouteError> {
    known_points
        .iter()
        .find(|point| point.is_at(candidate))
        .copied()
        .ok_or(RouteError::UnknownStartPoint {
            x: candidate.x,
            y: candidate.y,
        })
}

#[cfg(test)]
#[path = "tests/validator_tests.rs"]
mod tests;
