//! Wire shapes of the delivery service HTTP contract.

use serde::{Deserialize, Serialize};

use crate::{
    domain::{Coordinate, DeliveryPoint, RouteResult},
    error::CoordinateParseError,
};

pub const POINTS_PATH: &str = "delivery/points";
pub const POINT_PATH: &str = "delivery/point";
pub const ALL_POINTS_PATH: &str = "delivery/all-points";
pub const ROUTE_PATH: &str = "delivery/route";

/// Body of `POST /delivery/point` and element of `GET /delivery/points`.
pub type PointPayload = DeliveryPoint;

/// Body of `DELETE /delivery/point`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletePointRequest {
    pub x: u32,
    pub y: u32,
}

impl From<Coordinate> for DeletePointRequest {
    fn from(value: Coordinate) -> Self {
        Self {
            x: value.x,
            y: value.y,
        }
    }
}

impl From<DeletePointRequest> for Coordinate {
    fn from(value: DeletePointRequest) -> Self {
        Coordinate::new(value.x, value.y)
    }
}

/// Query string of `GET /delivery/route`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteQuery {
    #[serde(rename = "startX")]
    pub start_x: u32,
    #[serde(rename = "startY")]
    pub start_y: u32,
}

impl From<Coordinate> for RouteQuery {
    fn from(value: Coordinate) -> Self {
        Self {
            start_x: value.x,
            start_y: value.y,
        }
    }
}

impl RouteQuery {
    pub fn start(&self) -> Coordinate {
        Coordinate::new(self.start_x, self.start_y)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResponse {
    pub visit_order: Vec<String>,
    pub total_time: f64,
    pub total_distance: f64,
}

impl From<&RouteResult> for RouteResponse {
    fn from(value: &RouteResult) -> Self {
        Self {
            visit_order: value
                .visit_order
                .iter()
                .map(Coordinate::to_string)
                .collect(),
            total_time: value.total_time,
            total_distance: value.total_distance,
        }
    }
}

impl TryFrom<RouteResponse> for RouteResult {
    type Error = CoordinateParseError;

    fn try_from(value: RouteResponse) -> Result<Self, Self::Error> {
        let visit_order = value
            .visit_order
            .iter()
            .map(|entry| entry.parse::<Coordinate>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            visit_order,
            total_distance: value.total_distance,
            total_time: value.total_time,
        })
    }
}
