//! Interactive session: one `SessionState` lives for the whole shell, and
//! each line is run to completion before the next one is read.

use anyhow::Result;
use client_core::{RouteSessionController, SessionState};
use shared::domain::Coordinate;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::render::{render_points, render_session};

pub const HELP: &str = "\
commands:
  list                     list delivery points
  show                     draw the grid
  grid <size>              set the grid size (1-20)
  add <x> <y> [speed]      register a delivery point
  delete <x> <y>           remove the delivery point at (x, y)
  clear                    remove every delivery point
  route <x> <y>            compute a route starting at (x, y)
  refresh                  reload points from the service
  help                     show this text
  quit                     leave the shell
";

#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    List,
    Show,
    Grid(i64),
    Add {
        x: String,
        y: String,
        speed_limit: Option<f64>,
    },
    Delete(Coordinate),
    Clear,
    Route(Coordinate),
    Refresh,
    Help,
    Quit,
}

fn coordinate_args(command: &str, args: &[&str]) -> Result<Coordinate, String> {
    match args {
        [x, y] => {
            let x = x
                .parse::<u32>()
                .map_err(|_| format!("{command}: x '{x}' is not a grid index"))?;
            let y = y
                .parse::<u32>()
                .map_err(|_| format!("{command}: y '{y}' is not a grid index"))?;
            Ok(Coordinate::new(x, y))
        }
        _ => Err(format!("usage: {command} <x> <y>")),
    }
}

/// Returns `Ok(None)` for blank lines.
pub fn parse_line(line: &str) -> Result<Option<ShellCommand>, String> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((command, args)) = words.split_first() else {
        return Ok(None);
    };
    let command = command.to_ascii_lowercase();
    let parsed = match (command.as_str(), args) {
        ("list" | "ls", []) => ShellCommand::List,
        ("show", []) => ShellCommand::Show,
        ("grid", [size]) => ShellCommand::Grid(
            size.parse()
                .map_err(|_| format!("grid: size '{size}' is not a whole number"))?,
        ),
        ("grid", _) => return Err("usage: grid <size>".to_string()),
        ("add", [x, y]) => ShellCommand::Add {
            x: x.to_string(),
            y: y.to_string(),
            speed_limit: None,
        },
        ("add", [x, y, speed]) => ShellCommand::Add {
            x: x.to_string(),
            y: y.to_string(),
            speed_limit: Some(
                speed
                    .parse()
                    .map_err(|_| format!("add: speed '{speed}' is not a number"))?,
            ),
        },
        ("add", _) => return Err("usage: add <x> <y> [speed]".to_string()),
        ("delete" | "del" | "rm", args) => ShellCommand::Delete(coordinate_args("delete", args)?),
        ("clear", []) => ShellCommand::Clear,
        ("route", args) => ShellCommand::Route(coordinate_args("route", args)?),
        ("refresh", []) => ShellCommand::Refresh,
        ("help" | "?", _) => ShellCommand::Help,
        ("quit" | "exit", _) => ShellCommand::Quit,
        (other, _) => return Err(format!("unknown command '{other}', try 'help'")),
    };
    Ok(Some(parsed))
}

/// Runs one command and returns what to print. Session-level failures are
/// reported in the output; they never end the shell.
pub async fn execute(
    controller: &RouteSessionController,
    session: &mut SessionState,
    command: ShellCommand,
    default_speed_limit: f64,
) -> String {
    debug!(?command, "shell command");
    let outcome = match command {
        ShellCommand::List => Ok(render_points(session.points())),
        ShellCommand::Show => Ok(render_session(session)),
        ShellCommand::Grid(candidate) => controller
            .set_grid_size(session, candidate)
            .map(|grid| format!("grid is now {grid}\n")),
        ShellCommand::Add { x, y, speed_limit } => controller
            .add_point(session, &x, &y, speed_limit.unwrap_or(default_speed_limit))
            .await
            .map(|point| format!("added ({})\n", point.coordinate())),
        ShellCommand::Delete(coordinate) => controller
            .remove_point(session, coordinate)
            .await
            .map(|removed| format!("deleted ({coordinate}), {removed} local entries removed\n")),
        ShellCommand::Clear => controller
            .clear_points(session)
            .await
            .map(|()| "all delivery points deleted\n".to_string()),
        ShellCommand::Route(start) => controller
            .find_route(session, start)
            .await
            .map(|_| render_session(session)),
        ShellCommand::Refresh => controller
            .refresh(session)
            .await
            .map(|()| render_points(session.points())),
        ShellCommand::Help => Ok(HELP.to_string()),
        ShellCommand::Quit => Ok(String::new()),
    };
    match outcome {
        Ok(text) => text,
        Err(error) => format!("error: {error}\n"),
    }
}

pub async fn run(
    controller: &RouteSessionController,
    session: &mut SessionState,
    default_speed_limit: f64,
) -> Result<()> {
    println!("{}", render_session(session));
    println!("type 'help' for commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };
        if command == ShellCommand::Quit {
            break;
        }
        print!("{}", execute(controller, session, command, default_speed_limit).await);
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/shell_tests.rs"]
mod tests;
