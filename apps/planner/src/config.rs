use std::{fs, io::ErrorKind, path::Path};

use anyhow::{bail, Context};
use client_core::validator::{validate_grid_size, validate_speed_limit};
use serde::Deserialize;
use shared::domain::GridSize;
use url::Url;

pub const DEFAULT_CONFIG_PATH: &str = "planner.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub service_url: String,
    pub grid_size: i64,
    pub default_speed_limit: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            service_url: "http://127.0.0.1:8080".into(),
            grid_size: i64::from(GridSize::DEFAULT.get()),
            default_speed_limit: 30.0,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    service_url: Option<String>,
    grid_size: Option<i64>,
    default_speed_limit: Option<f64>,
}

/// Settings after every value has been checked.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSettings {
    pub service_url: Url,
    pub grid: GridSize,
    pub default_speed_limit: f64,
}

impl Settings {
    pub fn apply_file(&mut self, raw: &str) -> anyhow::Result<()> {
        let file_cfg: FileSettings = toml::from_str(raw).context("invalid planner config")?;
        if let Some(v) = file_cfg.service_url {
            self.service_url = v;
        }
        if let Some(v) = file_cfg.grid_size {
            self.grid_size = v;
        }
        if let Some(v) = file_cfg.default_speed_limit {
            self.default_speed_limit = v;
        }
        Ok(())
    }

    /// Later names win, so `APP__*` overrides the short form.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<()> {
        for key in ["ROUTE_SERVICE_URL", "APP__SERVICE_URL"] {
            if let Some(v) = lookup(key) {
                self.service_url = v;
            }
        }
        if let Some(v) = lookup("APP__GRID_SIZE") {
            self.grid_size = v
                .trim()
                .parse()
                .with_context(|| format!("APP__GRID_SIZE '{v}' is not a whole number"))?;
        }
        if let Some(v) = lookup("APP__DEFAULT_SPEED_LIMIT") {
            self.default_speed_limit = v
                .trim()
                .parse()
                .with_context(|| format!("APP__DEFAULT_SPEED_LIMIT '{v}' is not a number"))?;
        }
        Ok(())
    }

    pub fn resolve(&self) -> anyhow::Result<ResolvedSettings> {
        let service_url = Url::parse(self.service_url.trim())
            .with_context(|| format!("invalid service url '{}'", self.service_url))?;
        if !matches!(service_url.scheme(), "http" | "https") {
            bail!("service url '{service_url}' must use http or https");
        }
        Ok(ResolvedSettings {
            service_url,
            grid: validate_grid_size(self.grid_size)?,
            default_speed_limit: validate_speed_limit(self.default_speed_limit)?,
        })
    }
}

/// Defaults, then the config file (a missing file is fine), then environment.
pub fn load_settings(config_path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let path = config_path.unwrap_or(Path::new(DEFAULT_CONFIG_PATH));
    match fs::read_to_string(path) {
        Ok(raw) => settings
            .apply_file(&raw)
            .with_context(|| format!("failed to load '{}'", path.display()))?,
        Err(error) if error.kind() == ErrorKind::NotFound && config_path.is_none() => {}
        Err(error) => {
            return Err(error).with_context(|| format!("failed to read '{}'", path.display()))
        }
    }

    settings.apply_env(|key| std::env::var(key).ok())?;
    Ok(settings)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
