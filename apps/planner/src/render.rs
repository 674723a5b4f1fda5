//! Plain-text drawing of a planning session.

use client_core::{GridCell, GridView, SessionState};
use shared::domain::{DeliveryPoint, RouteResult};

const CELL_WIDTH: usize = 4;

/// `S` start, `L` delivery point, `R` on the route; `.` for an empty cell.
pub fn cell_label(cell: &GridCell) -> String {
    if cell.is_empty() {
        return ".".to_string();
    }
    let mut label = String::new();
    if cell.is_start {
        label.push('S');
    }
    if cell.is_location {
        label.push('L');
    }
    if cell.is_route {
        label.push('R');
    }
    label
}

pub fn render_grid(view: &GridView) -> String {
    let size = view.size().get();
    let mut out = format!("{:>w$}", "x\\y", w = CELL_WIDTH);
    for y in 0..size {
        out.push_str(&format!("{y:>w$}", w = CELL_WIDTH));
    }
    out.push('\n');
    for (x, row) in view.rows().enumerate() {
        out.push_str(&format!("{x:>w$}", w = CELL_WIDTH));
        for cell in row {
            out.push_str(&format!("{:>w$}", cell_label(cell), w = CELL_WIDTH));
        }
        out.push('\n');
    }
    out
}

pub fn render_points(points: &[DeliveryPoint]) -> String {
    if points.is_empty() {
        return "no delivery points registered\n".to_string();
    }
    points
        .iter()
        .map(|point| {
            format!(
                "({}) speed limit {}\n",
                point.coordinate(),
                point.speed_limit
            )
        })
        .collect()
}

/// Stop chain, one line per leg with its grid distance, then the totals.
pub fn render_route(route: &RouteResult) -> String {
    let stops = route
        .visit_order
        .iter()
        .map(|stop| format!("({stop})"))
        .collect::<Vec<_>>()
        .join(" -> ");
    let mut out = format!("{stops}\n");
    for (from, to) in route.legs() {
        out.push_str(&format!(
            "  ({from}) -> ({to}): {} blocks\n",
            from.manhattan_distance(&to)
        ));
    }
    out.push_str(&format!(
        "total distance {:.2}, total time {:.2}\n",
        route.total_distance, route.total_time
    ));
    out
}

pub fn render_session(session: &SessionState) -> String {
    let mut out = format!("grid {}", session.grid());
    if let Some(start) = session.start() {
        out.push_str(&format!(", start ({})", start.coordinate()));
    }
    out.push('\n');
    out.push_str(&render_grid(&GridView::from_session(session)));
    if let Some(route) = session.route() {
        out.push_str(&render_route(route));
    }
    if let Some(error) = session.last_error() {
        out.push_str(&format!("last error: {error}\n"));
    }
    out
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
