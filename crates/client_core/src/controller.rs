use std::sync::Arc;

use shared::domain::{Coordinate, DeliveryPoint, GridSize, RouteResult};
use tracing::{debug, info, warn};

use crate::{
    error::RouteError,
    route_client::RouteClient,
    store::DeliveryPointStore,
    validator::{coerce_point, validate_grid_size, validate_start},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Idle,
    Validating,
    Requesting,
    Displaying,
    Failed,
}

/// Everything a planning session knows. Only [`RouteSessionController`]
/// mutates it; renderers get shared references.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    points: DeliveryPointStore,
    start: Option<DeliveryPoint>,
    route: Option<RouteResult>,
    grid: GridSize,
    phase: SessionPhase,
    last_error: Option<String>,
}

impl SessionState {
    pub fn new(grid: GridSize, points: Vec<DeliveryPoint>) -> Self {
        Self {
            points: DeliveryPointStore::from_points(points),
            grid,
            ..Self::default()
        }
    }

    pub fn points(&self) -> &[DeliveryPoint] {
        self.points.list()
    }

    pub fn start(&self) -> Option<&DeliveryPoint> {
        self.start.as_ref()
    }

    pub fn route(&self) -> Option<&RouteResult> {
        self.route.as_ref()
    }

    /// Stops of the displayed route, in visiting order.
    pub fn route_points(&self) -> &[Coordinate] {
        self.route
            .as_ref()
            .map(|route| route.visit_order.as_slice())
            .unwrap_or_default()
    }

    pub fn grid(&self) -> GridSize {
        self.grid
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn transition(&mut self, next: SessionPhase) {
        debug!(from = ?self.phase, to = ?next, "session phase change");
        self.phase = next;
    }

    fn record_failure(&mut self, error: RouteError) -> RouteError {
        if error.is_remote() {
            warn!(%error, "delivery operation failed");
        } else {
            info!(%error, "input rejected");
        }
        self.last_error = Some(error.to_string());
        error
    }

    /// Route-request failure. The session stays `Failed` until the next
    /// operation starts.
    fn fail(&mut self, error: RouteError) -> RouteError {
        self.transition(SessionPhase::Failed);
        self.record_failure(error)
    }

    /// Leaves `Failed` for `Idle`; every controller operation starts here.
    fn settle(&mut self) {
        if self.phase == SessionPhase::Failed {
            self.transition(SessionPhase::Idle);
        }
    }

    /// A route computed against an older point set must not stay on screen.
    fn points_changed(&mut self) {
        self.last_error = None;
        if self.route.take().is_some() {
            debug!("displayed route invalidated by point change");
        }
        if self.phase == SessionPhase::Displaying {
            self.transition(SessionPhase::Idle);
        }
    }
}

/// Sequences user actions against the remote service and reconciles the
/// results into a [`SessionState`].
///
/// Every operation takes the session by `&mut`, so operations on one session
/// run strictly in the order they are issued.
pub struct RouteSessionController {
    client: Arc<dyn RouteClient>,
}

impl RouteSessionController {
    pub fn new(client: Arc<dyn RouteClient>) -> Self {
        Self { client }
    }

    /// Starts a session with the points currently registered remotely.
    pub async fn open_session(&self, grid: GridSize) -> Result<SessionState, RouteError> {
        let points = self.client.fetch_all().await?;
        info!(count = points.len(), grid = %grid, "session opened");
        Ok(SessionState::new(grid, points))
    }

    /// Like [`Self::open_session`], but an unreachable service yields an empty
    /// session carrying the error instead of failing. A later
    /// [`Self::refresh`] fills it in.
    pub async fn open_session_or_empty(&self, grid: GridSize) -> SessionState {
        match self.open_session(grid).await {
            Ok(session) => session,
            Err(error) => {
                warn!(%error, grid = %grid, "session opened without delivery points");
                let mut session = SessionState::new(grid, Vec::new());
                session.last_error = Some(error.to_string());
                session
            }
        }
    }

    /// Re-reads the remote point set. On failure the local set is left as-is.
    pub async fn refresh(&self, session: &mut SessionState) -> Result<(), RouteError> {
        session.settle();
        match self.client.fetch_all().await {
            Ok(points) => {
                session.points.replace_all(points);
                if let Some(start) = session.start {
                    if !session.points.contains(start.coordinate()) {
                        session.start = None;
                    }
                }
                session.points_changed();
                Ok(())
            }
            Err(error) => Err(session.record_failure(error)),
        }
    }

    pub fn set_grid_size(
        &self,
        session: &mut SessionState,
        candidate: i64,
    ) -> Result<GridSize, RouteError> {
        session.settle();
        match validate_grid_size(candidate) {
            Ok(grid) => {
                session.grid = grid;
                session.last_error = None;
                info!(grid = %grid, "grid resized");
                Ok(grid)
            }
            Err(error) => Err(session.record_failure(error)),
        }
    }

    pub async fn add_point(
        &self,
        session: &mut SessionState,
        raw_x: &str,
        raw_y: &str,
        speed_limit: f64,
    ) -> Result<DeliveryPoint, RouteError> {
        session.settle();
        let point = match coerce_point(raw_x, raw_y, speed_limit, session.grid) {
            Ok(point) => point,
            Err(error) => return Err(session.record_failure(error)),
        };
        let confirmed = match self.client.create(point).await {
            Ok(confirmed) => confirmed,
            Err(error) => return Err(session.record_failure(error)),
        };
        session.points.add(confirmed);
        session.points_changed();
        Ok(confirmed)
    }

    /// Deletes remotely first; the local entry only goes once the service
    /// has acknowledged.
    pub async fn remove_point(
        &self,
        session: &mut SessionState,
        coordinate: Coordinate,
    ) -> Result<usize, RouteError> {
        session.settle();
        if let Err(error) = self.client.delete_one(coordinate).await {
            return Err(session.record_failure(error));
        }
        let removed = session.points.remove(coordinate);
        if session.start.is_some_and(|start| start.is_at(coordinate)) {
            session.start = None;
        }
        session.points_changed();
        Ok(removed)
    }

    pub async fn clear_points(&self, session: &mut SessionState) -> Result<(), RouteError> {
        session.settle();
        if let Err(error) = self.client.delete_all().await {
            return Err(session.record_failure(error));
        }
        session.points.clear();
        session.start = None;
        session.points_changed();
        Ok(())
    }

    /// Validates `candidate` as the start, asks the service for a route and
    /// stores it for display.
    pub async fn find_route(
        &self,
        session: &mut SessionState,
        candidate: Coordinate,
    ) -> Result<RouteResult, RouteError> {
        session.settle();
        session.transition(SessionPhase::Validating);
        let start = match validate_start(candidate, session.points.list()) {
            Ok(start) => start,
            Err(error) => {
                session.start = None;
                session.route = None;
                return Err(session.fail(error));
            }
        };
        session.start = Some(start);

        session.transition(SessionPhase::Requesting);
        let route = match self.client.compute_route(candidate).await {
            Ok(route) => route,
            Err(error) => {
                session.route = None;
                return Err(session.fail(error));
            }
        };

        if !route.starts_at(candidate) {
            warn!(start = %candidate, "route returned by service does not begin at the start point");
        }
        session.route = Some(route.clone());
        session.last_error = None;
        session.transition(SessionPhase::Displaying);
        Ok(route)
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
