use super::*;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Clone, Default)]
struct ServiceState {
    points: Arc<Mutex<Vec<DeliveryPoint>>>,
    fail_with: Arc<Mutex<Option<StatusCode>>>,
    echo_created: Arc<Mutex<bool>>,
    route_override: Arc<Mutex<Option<RouteResponse>>>,
}

type Rejection = (StatusCode, Json<ServiceErrorBody>);

async fn injected_failure(state: &ServiceState) -> Result<(), Rejection> {
    match *state.fail_with.lock().await {
        Some(status) => Err((status, Json(ServiceErrorBody::new("injected failure")))),
        None => Ok(()),
    }
}

async fn list_points(
    State(state): State<ServiceState>,
) -> Result<Json<Vec<DeliveryPoint>>, Rejection> {
    injected_failure(&state).await?;
    Ok(Json(state.points.lock().await.clone()))
}

async fn create_point(
    State(state): State<ServiceState>,
    Json(point): Json<DeliveryPoint>,
) -> Result<(StatusCode, String), Rejection> {
    injected_failure(&state).await?;
    if point.speed_limit <= 0.0 {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ServiceErrorBody::new("speed_limit must be positive")),
        ));
    }
    state.points.lock().await.push(point);
    let body = if *state.echo_created.lock().await {
        serde_json::to_string(&point).unwrap_or_default()
    } else {
        String::new()
    };
    Ok((StatusCode::CREATED, body))
}

async fn delete_point(
    State(state): State<ServiceState>,
    Json(request): Json<DeletePointRequest>,
) -> Result<StatusCode, Rejection> {
    injected_failure(&state).await?;
    let target = Coordinate::from(request);
    let mut points = state.points.lock().await;
    let before = points.len();
    points.retain(|point| !point.is_at(target));
    if points.len() == before {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ServiceErrorBody {
                detail: Some(format!("no delivery point at {target}")),
                ..ServiceErrorBody::default()
            }),
        ));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_all_points(State(state): State<ServiceState>) -> Result<StatusCode, Rejection> {
    injected_failure(&state).await?;
    state.points.lock().await.clear();
    Ok(StatusCode::NO_CONTENT)
}

async fn route_from(
    State(state): State<ServiceState>,
    Query(query): Query<RouteQuery>,
) -> Result<Json<RouteResponse>, Rejection> {
    injected_failure(&state).await?;
    if let Some(route) = state.route_override.lock().await.clone() {
        return Ok(Json(route));
    }
    let points = state.points.lock().await;
    if !points.iter().any(|point| point.is_at(query.start())) {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ServiceErrorBody::new("start point is not registered")),
        ));
    }
    let mut visit_order = vec![query.start().to_string()];
    visit_order.extend(
        points
            .iter()
            .filter(|point| !point.is_at(query.start()))
            .map(|point| point.coordinate().to_string()),
    );
    Ok(Json(RouteResponse {
        visit_order,
        total_time: 0.5,
        total_distance: 4.0,
    }))
}

async fn spawn_delivery_service() -> Result<(String, ServiceState)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = ServiceState::default();
    let app = Router::new()
        .route("/delivery/points", get(list_points))
        .route("/delivery/point", post(create_point).delete(delete_point))
        .route("/delivery/all-points", delete(delete_all_points))
        .route("/delivery/route", get(route_from))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}"), state))
}

fn client_for(server_url: &str) -> HttpRouteClient {
    HttpRouteClient::from_base_url(server_url).expect("valid base url")
}

#[test]
fn base_url_gets_trailing_slash_so_paths_join_below_it() {
    let client = client_for("http://example.test/api");
    assert_eq!(client.base_url().as_str(), "http://example.test/api/");
    assert_eq!(
        client.endpoint(POINTS_PATH).expect("join").as_str(),
        "http://example.test/api/delivery/points"
    );
}

#[tokio::test]
async fn fetch_all_returns_points_in_service_order() {
    let (server_url, state) = spawn_delivery_service().await.expect("spawn service");
    *state.points.lock().await = vec![
        DeliveryPoint::new(3, 3, 50.0),
        DeliveryPoint::new(1, 1, 30.0),
    ];

    let points = client_for(&server_url).fetch_all().await.expect("fetch");

    assert_eq!(
        points,
        vec![DeliveryPoint::new(3, 3, 50.0), DeliveryPoint::new(1, 1, 30.0)]
    );
}

#[tokio::test]
async fn fetch_all_maps_server_errors_to_remote_unavailable() {
    let (server_url, state) = spawn_delivery_service().await.expect("spawn service");
    *state.fail_with.lock().await = Some(StatusCode::INTERNAL_SERVER_ERROR);

    let err = client_for(&server_url)
        .fetch_all()
        .await
        .expect_err("must fail");

    match err {
        RouteError::RemoteUnavailable(message) => {
            assert!(message.contains("injected failure"), "unexpected: {message}")
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_service_is_remote_unavailable() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let err = client_for(&format!("http://{addr}"))
        .delete_all()
        .await
        .expect_err("nothing listening");
    assert!(matches!(err, RouteError::RemoteUnavailable(_)));
    assert!(err.is_remote());
}

#[tokio::test]
async fn create_accepts_empty_and_echoed_confirmations() {
    let (server_url, state) = spawn_delivery_service().await.expect("spawn service");
    let client = client_for(&server_url);

    let confirmed = client
        .create(DeliveryPoint::new(1, 2, 30.0))
        .await
        .expect("empty body confirmation");
    assert_eq!(confirmed, DeliveryPoint::new(1, 2, 30.0));

    *state.echo_created.lock().await = true;
    let confirmed = client
        .create(DeliveryPoint::new(4, 0, 15.0))
        .await
        .expect("echoed confirmation");
    assert_eq!(confirmed, DeliveryPoint::new(4, 0, 15.0));

    assert_eq!(state.points.lock().await.len(), 2);
}

#[tokio::test]
async fn create_rejection_carries_service_message() {
    let (server_url, _state) = spawn_delivery_service().await.expect("spawn service");

    let err = client_for(&server_url)
        .create(DeliveryPoint::new(1, 2, -5.0))
        .await
        .expect_err("must be rejected");

    assert_eq!(
        err,
        RouteError::RemoteRejected {
            status: 400,
            message: "speed_limit must be positive".to_string(),
        }
    );
}

#[tokio::test]
async fn delete_one_sends_coordinate_body() {
    let (server_url, state) = spawn_delivery_service().await.expect("spawn service");
    *state.points.lock().await = vec![
        DeliveryPoint::new(1, 1, 30.0),
        DeliveryPoint::new(3, 3, 50.0),
    ];

    client_for(&server_url)
        .delete_one(Coordinate::new(1, 1))
        .await
        .expect("delete");

    assert_eq!(*state.points.lock().await, vec![DeliveryPoint::new(3, 3, 50.0)]);
}

#[tokio::test]
async fn delete_one_of_missing_point_is_rejected() {
    let (server_url, _state) = spawn_delivery_service().await.expect("spawn service");

    let err = client_for(&server_url)
        .delete_one(Coordinate::new(2, 2))
        .await
        .expect_err("nothing to delete");

    match err {
        RouteError::RemoteRejected { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "no delivery point at 2, 2");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn delete_all_then_fetch_all_is_empty() {
    let (server_url, state) = spawn_delivery_service().await.expect("spawn service");
    *state.points.lock().await = vec![DeliveryPoint::new(0, 0, 10.0)];
    let client = client_for(&server_url);

    client.delete_all().await.expect("delete all");

    assert!(client.fetch_all().await.expect("fetch").is_empty());
}

#[tokio::test]
async fn compute_route_parses_visit_order_strings() {
    let (server_url, state) = spawn_delivery_service().await.expect("spawn service");
    *state.points.lock().await = vec![
        DeliveryPoint::new(1, 1, 30.0),
        DeliveryPoint::new(3, 3, 50.0),
    ];

    let route = client_for(&server_url)
        .compute_route(Coordinate::new(1, 1))
        .await
        .expect("route");

    assert_eq!(
        route.visit_order,
        vec![Coordinate::new(1, 1), Coordinate::new(3, 3)]
    );
    assert_eq!(route.total_distance, 4.0);
    assert_eq!(route.total_time, 0.5);
}

#[tokio::test]
async fn compute_route_client_error_is_route_unreachable() {
    let (server_url, _state) = spawn_delivery_service().await.expect("spawn service");

    let err = client_for(&server_url)
        .compute_route(Coordinate::new(0, 0))
        .await
        .expect_err("no points registered");

    assert_eq!(
        err,
        RouteError::RouteUnreachable("start point is not registered".to_string())
    );
}

#[tokio::test]
async fn compute_route_rejects_unparseable_or_negative_payloads() {
    let (server_url, state) = spawn_delivery_service().await.expect("spawn service");
    let client = client_for(&server_url);

    *state.route_override.lock().await = Some(RouteResponse {
        visit_order: vec!["1; 1".to_string()],
        total_time: 1.0,
        total_distance: 1.0,
    });
    assert!(matches!(
        client.compute_route(Coordinate::new(1, 1)).await,
        Err(RouteError::MalformedResponse(_))
    ));

    *state.route_override.lock().await = Some(RouteResponse {
        visit_order: vec!["1, 1".to_string()],
        total_time: -1.0,
        total_distance: 1.0,
    });
    assert!(matches!(
        client.compute_route(Coordinate::new(1, 1)).await,
        Err(RouteError::MalformedResponse(_))
    ));
}
