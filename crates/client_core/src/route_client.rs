use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use shared::{
    domain::{Coordinate, DeliveryPoint, RouteResult},
    error::ServiceErrorBody,
    protocol::{
        DeletePointRequest, RouteQuery, RouteResponse, ALL_POINTS_PATH, POINTS_PATH, POINT_PATH,
        ROUTE_PATH,
    },
};
use tracing::{debug, info, warn};
use url::Url;

use crate::error::RouteError;

/// Remote delivery service, one call per verb. Implementations perform exactly
/// one request/response exchange per call: no retries, no batching.
#[async_trait]
pub trait RouteClient: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<DeliveryPoint>, RouteError>;
    async fn create(&self, point: DeliveryPoint) -> Result<DeliveryPoint, RouteError>;
    async fn delete_one(&self, coordinate: Coordinate) -> Result<(), RouteError>;
    async fn delete_all(&self) -> Result<(), RouteError>;
    async fn compute_route(&self, start: Coordinate) -> Result<RouteResult, RouteError>;
}

pub struct HttpRouteClient {
    http: Client,
    base_url: Url,
}

impl HttpRouteClient {
    pub fn new(base_url: Url) -> Self {
        Self::with_http_client(Client::new(), base_url)
    }

    pub fn with_http_client(http: Client, mut base_url: Url) -> Self {
        // `Url::join` replaces the last path segment unless the base ends in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self { http, base_url }
    }

    pub fn from_base_url(base_url: &str) -> Result<Self, url::ParseError> {
        Ok(Self::new(Url::parse(base_url)?))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, RouteError> {
        self.base_url.join(path).map_err(|error| {
            RouteError::RemoteUnavailable(format!("cannot build url for '{path}': {error}"))
        })
    }

    async fn send(&self, operation: &'static str, request: RequestBuilder) -> Result<Response, RouteError> {
        let response = request.send().await.map_err(|error| {
            warn!(operation, %error, "delivery service request failed");
            RouteError::RemoteUnavailable(error.to_string())
        })?;
        debug!(operation, status = %response.status(), "delivery service responded");
        Ok(response)
    }
}

async fn rejection_message(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let body = body.trim();
    serde_json::from_str::<ServiceErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.text().map(str::to_string))
        .or_else(|| (!body.is_empty()).then(|| body.to_string()))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        })
}

/// 4xx responses are the service refusing this request; anything else that is
/// not a success means the service could not be used.
async fn failure(
    operation: &'static str,
    response: Response,
    on_client_error: impl FnOnce(StatusCode, String) -> RouteError,
) -> RouteError {
    let status = response.status();
    let message = rejection_message(response).await;
    warn!(operation, %status, %message, "delivery service returned an error");
    if status.is_client_error() {
        on_client_error(status, message)
    } else {
        RouteError::RemoteUnavailable(format!("status {status}: {message}"))
    }
}

fn unavailable(status: StatusCode, message: String) -> RouteError {
    RouteError::RemoteUnavailable(format!("status {status}: {message}"))
}

fn rejected(status: StatusCode, message: String) -> RouteError {
    RouteError::RemoteRejected {
        status: status.as_u16(),
        message,
    }
}

fn check_route_totals(route: &RouteResult) -> Result<(), RouteError> {
    for (name, value) in [
        ("total_distance", route.total_distance),
        ("total_time", route.total_time),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(RouteError::MalformedResponse(format!(
                "{name} must be a non-negative number, got {value}"
            )));
        }
    }
    Ok(())
}

#[async_trait]
impl RouteClient for HttpRouteClient {
    async fn fetch_all(&self) -> Result<Vec<DeliveryPoint>, RouteError> {
        let url = self.endpoint(POINTS_PATH)?;
        let response = self.send("fetch_all", self.http.get(url)).await?;
        if !response.status().is_success() {
            return Err(failure("fetch_all", response, unavailable).await);
        }
        let points: Vec<DeliveryPoint> = response.json().await?;
        info!(count = points.len(), "fetched delivery points");
        Ok(points)
    }

    async fn create(&self, point: DeliveryPoint) -> Result<DeliveryPoint, RouteError> {
        let url = self.endpoint(POINT_PATH)?;
        let response = self
            .send("create", self.http.post(url).json(&point))
            .await?;
        if !response.status().is_success() {
            return Err(failure("create", response, rejected).await);
        }

        let body = response.text().await?;
        // Some deployments acknowledge with an empty body or a status message
        // instead of echoing the point; the 2xx status is the confirmation then.
        let confirmed = match serde_json::from_str::<DeliveryPoint>(&body) {
            Ok(created) => created,
            Err(error) => {
                debug!(%error, "create response carried no point, using submitted point");
                point
            }
        };
        info!(x = confirmed.x, y = confirmed.y, speed_limit = confirmed.speed_limit, "created delivery point");
        Ok(confirmed)
    }

    async fn delete_one(&self, coordinate: Coordinate) -> Result<(), RouteError> {
        let url = self.endpoint(POINT_PATH)?;
        let response = self
            .send(
                "delete_one",
                self.http.delete(url).json(&DeletePointRequest::from(coordinate)),
            )
            .await?;
        if !response.status().is_success() {
            return Err(failure("delete_one", response, rejected).await);
        }
        info!(x = coordinate.x, y = coordinate.y, "deleted delivery point");
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), RouteError> {
        let url = self.endpoint(ALL_POINTS_PATH)?;
        let response = self.send("delete_all", self.http.delete(url)).await?;
        if !response.status().is_success() {
            return Err(failure("delete_all", response, unavailable).await);
        }
        info!("deleted all delivery points");
        Ok(())
    }

    async fn compute_route(&self, start: Coordinate) -> Result<RouteResult, RouteError> {
        let url = self.endpoint(ROUTE_PATH)?;
        let response = self
            .send(
                "compute_route",
                self.http.get(url).query(&RouteQuery::from(start)),
            )
            .await?;
        if !response.status().is_success() {
            return Err(failure("compute_route", response, |_, message| {
                RouteError::RouteUnreachable(message)
            })
            .await);
        }

        let wire: RouteResponse = response.json().await?;
        let route = RouteResult::try_from(wire)?;
        check_route_totals(&route)?;
        info!(
            start = %start,
            stops = route.visit_order.len(),
            total_distance = route.total_distance,
            total_time = route.total_time,
            "computed route"
        );
        Ok(route)
    }
}

#[cfg(test)]
#[path = "tests/route_client_tests.rs"]
mod tests;
