mod config;
mod render;
mod shell;

use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::{Parser, Subcommand};
use client_core::{HttpRouteClient, RouteSessionController};
use shared::domain::Coordinate;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::render::{render_points, render_session};

#[derive(Parser, Debug)]
#[command(about = "Plan delivery routes against a route service")]
struct Cli {
    /// Path to a TOML config file (defaults to ./planner.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Overrides the configured service base URL.
    #[arg(long)]
    service_url: Option<String>,
    /// Overrides the configured grid size.
    #[arg(long)]
    grid_size: Option<i64>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the registered delivery points.
    Points,
    /// Register a delivery point.
    Add {
        x: String,
        y: String,
        #[arg(long)]
        speed_limit: Option<f64>,
    },
    /// Delete the delivery point at (x, y).
    Delete { x: u32, y: u32 },
    /// Delete every delivery point.
    Clear,
    /// Compute a route starting at (x, y).
    Route { x: u32, y: u32 },
    /// Draw the grid.
    Show,
    /// Interactive session (the default).
    Shell,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = config::load_settings(cli.config.as_deref())?;
    if let Some(service_url) = cli.service_url {
        settings.service_url = service_url;
    }
    if let Some(grid_size) = cli.grid_size {
        settings.grid_size = grid_size;
    }
    let settings = settings.resolve()?;
    info!(service_url = %settings.service_url, grid = %settings.grid, "planner starting");

    let controller =
        RouteSessionController::new(Arc::new(HttpRouteClient::new(settings.service_url)));
    let command = cli.command.unwrap_or(Command::Shell);
    // The shell can `refresh` once the service is back; one-shot commands cannot.
    let mut session = match command {
        Command::Shell => controller.open_session_or_empty(settings.grid).await,
        _ => controller.open_session(settings.grid).await?,
    };

    match command {
        Command::Points => print!("{}", render_points(session.points())),
        Command::Add { x, y, speed_limit } => {
            let point = controller
                .add_point(
                    &mut session,
                    &x,
                    &y,
                    speed_limit.unwrap_or(settings.default_speed_limit),
                )
                .await?;
            println!("added ({}) speed limit {}", point.coordinate(), point.speed_limit);
        }
        Command::Delete { x, y } => {
            let coordinate = Coordinate::new(x, y);
            controller.remove_point(&mut session, coordinate).await?;
            println!("deleted ({coordinate})");
        }
        Command::Clear => {
            controller.clear_points(&mut session).await?;
            println!("all delivery points deleted");
        }
        Command::Route { x, y } => {
            controller
                .find_route(&mut session, Coordinate::new(x, y))
                .await?;
            print!("{}", render_session(&session));
        }
        Command::Show => print!("{}", render_session(&session)),
        Command::Shell => {
            shell::run(&controller, &mut session, settings.default_speed_limit).await?
        }
    }

    Ok(())
}
