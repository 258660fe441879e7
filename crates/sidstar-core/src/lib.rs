// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

pub mod config;
pub mod labels;
pub mod nav_data;
pub mod planner;
pub mod procedures;
pub mod render;
pub mod route;
pub mod state;
pub mod transform;
pub mod transition;

use std::path::PathBuf;
use thiserror::Error;

pub use config::ConfigError;
pub use nav_data::{NavData, NavDataError};
pub use planner::Planner;
pub use state::{AppState, Event, Side};

#[derive(Error, Debug)]
pub enum SidStarError {
    #[error("Navigation data unavailable: {0}")]
    NavData(#[from] NavDataError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Directory holding `sidstar.json`. Falls back to the working directory when
/// the platform has no config location.
pub fn get_config_root() -> PathBuf {
    directories::ProjectDirs::from("org", "sidstar", "sidstar")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}
