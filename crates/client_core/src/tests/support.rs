//! In-memory stand-in for the delivery service.

use async_trait::async_trait;
use shared::domain::{Coordinate, DeliveryPoint, RouteResult};
use tokio::sync::Mutex;

use crate::{error::RouteError, route_client::RouteClient};

#[derive(Default)]
pub struct FakeRouteClient {
    pub points: Mutex<Vec<DeliveryPoint>>,
    pub fail_with: Mutex<Option<RouteError>>,
    pub calls: Mutex<Vec<&'static str>>,
}

impl FakeRouteClient {
    pub fn with_points(points: Vec<DeliveryPoint>) -> Self {
        Self {
            points: Mutex::new(points),
            ..Self::default()
        }
    }

    pub async fn fail_next_calls(&self, error: RouteError) {
        *self.fail_with.lock().await = Some(error);
    }

    pub async fn recover(&self) {
        *self.fail_with.lock().await = None;
    }

    async fn enter(&self, call: &'static str) -> Result<(), RouteError> {
        self.calls.lock().await.push(call);
        match self.fail_with.lock().await.clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RouteClient for FakeRouteClient {
    async fn fetch_all(&self) -> Result<Vec<DeliveryPoint>, RouteError> {
        self.enter("fetch_all").await?;
        Ok(self.points.lock().await.clone())
    }

    async fn create(&self, point: DeliveryPoint) -> Result<DeliveryPoint, RouteError> {
        self.enter("create").await?;
        self.points.lock().await.push(point);
        Ok(point)
    }

    async fn delete_one(&self, coordinate: Coordinate) -> Result<(), RouteError> {
        self.enter("delete_one").await?;
        let mut points = self.points.lock().await;
        let before = points.len();
        points.retain(|point| !point.is_at(coordinate));
        if points.len() == before {
            return Err(RouteError::RemoteRejected {
                status: 404,
                message: format!("no delivery point at {coordinate}"),
            });
        }
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), RouteError> {
        self.enter("delete_all").await?;
        self.points.lock().await.clear();
        Ok(())
    }

    /// Visits the start, then every other point in registration order.
    async fn compute_route(&self, start: Coordinate) -> Result<RouteResult, RouteError> {
        self.enter("compute_route").await?;
        let points = self.points.lock().await;
        let others: Vec<&DeliveryPoint> = points.iter().filter(|point| !point.is_at(start)).collect();
        if others.is_empty() {
            return Err(RouteError::RouteUnreachable(
                "no other delivery points registered".to_string(),
            ));
        }

        let mut visit_order = vec![start];
        let mut total_distance = 0.0;
        let mut total_time = 0.0;
        for point in others {
            let from = visit_order[visit_order.len() - 1];
            let leg = f64::from(from.manhattan_distance(&point.coordinate()));
            total_distance += leg;
            total_time += leg / point.speed_limit;
            visit_order.push(point.coordinate());
        }
        Ok(RouteResult {
            visit_order,
            total_distance,
            total_time,
        })
    }
}
