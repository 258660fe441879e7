// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::config::{CanvasConfig, Color, ConfigError, PlannerConfig, StyleConfig};
use crate::labels::{self, LabelLayout, LabelRequest, LabelState, MonospaceMetrics, TextMetrics};
use crate::nav_data::NavData;
use crate::route::{resolvable_points, RouteSummary};
use crate::state::AppState;
use crate::transform::{CanvasTransform, ScreenTransform};
use serde::Serialize;
use std::collections::HashSet;
use std::path::PathBuf;

/// One draw call, in screen pixels.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Clear {
        width: f64,
        height: f64,
    },
    Image {
        source: PathBuf,
        x: f64,
        y: f64,
        scale: f64,
    },
    /// Filled circle.
    Marker {
        x: f64,
        y: f64,
        radius: f64,
        color: Color,
    },
    /// Centre-aligned text, middle baseline.
    Text {
        text: String,
        x: f64,
        y: f64,
        color: Color,
    },
    Polyline {
        points: Vec<(f64, f64)>,
        width: f64,
        color: Color,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreenWaypoint {
    pub identifier: String,
    pub x: f64,
    pub y: f64,
    pub route_member: bool,
}

/// Output of one render pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub route: RouteSummary,
    /// Waypoints drawn this frame (after the route-only filter).
    pub waypoints: Vec<ScreenWaypoint>,
    pub labels: LabelLayout,
    pub commands: Vec<DrawCommand>,
}

impl Frame {
    pub fn polyline(&self) -> Option<&[(f64, f64)]> {
        self.commands.iter().find_map(|c| match c {
            DrawCommand::Polyline { points, .. } => Some(points.as_slice()),
            _ => None,
        })
    }
}

pub struct Renderer {
    canvas: CanvasTransform,
    canvas_config: CanvasConfig,
    style: StyleConfig,
    label_offsets: Vec<[f64; 2]>,
    metrics: Box<dyn TextMetrics>,
}

impl Renderer {
    /// Calibrates against the loaded waypoints; fails only on an invalid
    /// fixed calibration.
    pub fn new(config: &PlannerConfig, data: &NavData) -> Result<Self, ConfigError> {
        let canvas = CanvasTransform::from_calibration(
            &config.calibration,
            &data.waypoints,
            config.canvas.width,
            config.canvas.height,
        )?;
        log::debug!("Canvas calibration {:?}", canvas);
        Ok(Self {
            canvas,
            canvas_config: config.canvas.clone(),
            style: config.style.clone(),
            label_offsets: config.labels.offsets.clone(),
            metrics: Box::new(MonospaceMetrics::from(&config.labels)),
        })
    }

    pub fn with_metrics(mut self, metrics: Box<dyn TextMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn canvas_transform(&self) -> CanvasTransform {
        self.canvas
    }

    pub fn render(&self, state: &AppState, data: &NavData) -> Frame {
        let transform = ScreenTransform::new(self.canvas, state.viewport);
        let route = RouteSummary::compute(state, data);
        let route_set: HashSet<&str> = route.fixes.iter().map(String::as_str).collect();
        let style = &self.style;

        let mut commands = vec![
            DrawCommand::Clear {
                width: self.canvas_config.width,
                height: self.canvas_config.height,
            },
            DrawCommand::Image {
                source: self.canvas_config.background.clone(),
                x: state.viewport.offset_x,
                y: state.viewport.offset_y,
                scale: state.viewport.scale,
            },
        ];

        // --- Waypoint layer ---
        let waypoints: Vec<ScreenWaypoint> = data
            .waypoints
            .iter()
            .filter_map(|w| {
                let route_member = route_set.contains(w.identifier.as_str());
                if state.route_only && !route_member {
                    return None;
                }
                let (x, y) = transform.to_screen(w.x, w.y);
                Some(ScreenWaypoint {
                    identifier: w.identifier.clone(),
                    x,
                    y,
                    route_member,
                })
            })
            .collect();

        commands.extend(waypoints.iter().map(|w| DrawCommand::Marker {
            x: w.x,
            y: w.y,
            radius: style.marker_radius,
            color: if w.route_member {
                style.route_marker
            } else {
                style.marker
            },
        }));

        // --- Label layer ---
        let requests: Vec<LabelRequest<'_>> = waypoints
            .iter()
            .map(|w| LabelRequest {
                identifier: &w.identifier,
                x: w.x,
                y: w.y,
            })
            .collect();
        let labels = labels::place(
            &requests,
            &route_set,
            self.metrics.as_ref(),
            &self.label_offsets,
        );
        commands.extend(labels.labels.iter().filter_map(|l| match l.state {
            LabelState::Shown { x, y, .. } => Some(DrawCommand::Text {
                text: l.identifier.clone(),
                x,
                y,
                color: if l.route_member {
                    style.route_label
                } else {
                    style.label
                },
            }),
            LabelState::Suppressed => None,
        }));

        // --- Route layer ---
        if route.drawable {
            let vertices: Vec<(&str, (f64, f64))> = resolvable_points(&route.fixes, data)
                .into_iter()
                .map(|w| (w.identifier.as_str(), transform.to_screen(w.x, w.y)))
                .collect();

            commands.push(DrawCommand::Polyline {
                points: vertices.iter().map(|(_, p)| *p).collect(),
                width: style.route_line_width,
                color: style.route_line,
            });
            for (ident, (x, y)) in &vertices {
                commands.push(DrawCommand::Marker {
                    x: *x,
                    y: *y,
                    radius: style.route_vertex_radius,
                    color: style.route_line,
                });
                commands.push(DrawCommand::Text {
                    text: ident.to_string(),
                    x: *x,
                    y: *y + style.vertex_label_dy,
                    color: style.route_label,
                });
            }
        }

        log::debug!(
            "Rendered frame: waypoints={} commands={} route=[{}] drawable={}",
            waypoints.len(),
            commands.len(),
            route.fixes.join(" "),
            route.drawable
        );

        Frame {
            route,
            waypoints,
            labels,
            commands,
        }
    }
}
