// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::transform::{Calibration, ScaleLimits};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILE: &str = "sidstar.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Calibration reference points coincide on the {0} axis")]
    DegenerateCalibration(char),
    #[error("Invalid scale limits: min={min} max={max}")]
    InvalidScaleLimits { min: f64, max: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: f64,
    pub height: f64,
    /// Background map image, relative to the working directory.
    pub background: PathBuf,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 2200.0,
            height: 1700.0,
            background: PathBuf::from("assets/map.png"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    #[serde(flatten)]
    pub limits: ScaleLimits,
    /// Multiplier applied per zoom step (wheel notch or `+`/`-`).
    pub zoom_step: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            limits: ScaleLimits::default(),
            zoom_step: 1.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    pub font_size: f64,
    /// Glyph advance as a fraction of the font size (monospace).
    pub advance_ratio: f64,
    pub line_height: f64,
    /// Candidate anchors relative to the marker, tried in order.
    pub offsets: Vec<[f64; 2]>,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            font_size: 25.0,
            advance_ratio: 0.6,
            line_height: 25.0,
            // above, right, below, left
            offsets: vec![[0.0, -10.0], [12.0, 0.0], [0.0, 12.0], [-12.0, 0.0]],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum TransitionPolicy {
    #[default]
    First,
    Random {
        #[serde(default)]
        seed: Option<u64>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::from_rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::from_rgb(1.0, 1.0, 1.0);

    pub const fn from_rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub marker_radius: f64,
    pub route_vertex_radius: f64,
    pub route_line_width: f64,
    pub route_marker: Color,
    pub marker: Color,
    pub route_label: Color,
    pub label: Color,
    pub route_line: Color,
    /// Vertical offset of the text drawn at each route vertex.
    pub vertex_label_dy: f64,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            marker_radius: 3.0,
            route_vertex_radius: 10.0,
            route_line_width: 8.0,
            route_marker: Color::BLACK,
            marker: Color::from_rgb(0.533, 0.533, 0.533), // #888
            route_label: Color::BLACK,
            label: Color::from_rgb(0.4, 0.4, 0.4), // #666
            route_line: Color::WHITE,
            vertex_label_dy: -8.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PlannerConfig {
    pub canvas: CanvasConfig,
    pub calibration: Calibration,
    pub viewport: ViewportConfig,
    pub labels: LabelConfig,
    pub transitions: TransitionPolicy,
    pub style: StyleConfig,
}

impl PlannerConfig {
    pub fn default_path() -> PathBuf {
        crate::get_config_root().join(CONFIG_FILE)
    }

    /// Loads the config at `path`, or defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::debug!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        log::debug!("Loading config from {:?}", path);
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: PlannerConfig =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load(&Self::default_path())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let ScaleLimits {
            min_scale,
            max_scale,
        } = self.viewport.limits;
        if !(min_scale > 0.0 && min_scale <= max_scale) {
            return Err(ConfigError::InvalidScaleLimits {
                min: min_scale,
                max: max_scale,
            });
        }
        if let Calibration::Fixed {
            source_a, source_b, ..
        } = &self.calibration
        {
            if source_a[0] == source_b[0] {
                return Err(ConfigError::DegenerateCalibration('x'));
            }
            if source_a[1] == source_b[1] {
                return Err(ConfigError::DegenerateCalibration('y'));
            }
        }
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let content = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, content).map_err(io_err)
    }
}
