//! Client side of the delivery route planner: local point/grid state, the
//! remote delivery service contract, and the session controller tying them
//! together.

pub mod controller;
pub mod error;
pub mod route_client;
pub mod store;
pub mod validator;
pub mod view;

pub use controller::{RouteSessionController, SessionPhase, SessionState};
pub use error::{ErrorClass, RouteError};
pub use route_client::{HttpRouteClient, RouteClient};
pub use store::DeliveryPointStore;
pub use view::{GridCell, GridView};

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
