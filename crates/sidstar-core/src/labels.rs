// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Waypoint label placement with collision avoidance.
//!
//! Every frame starts from an empty set of accepted boxes. Route fixes are
//! placed first and always shown; the remaining fixes take the first free
//! candidate anchor around their marker or are suppressed.

use crate::config::LabelConfig;
use serde::Serialize;
use std::collections::HashSet;

/// Axis-aligned screen rectangle, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LabelBox {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl LabelBox {
    /// Box centred on the text anchor, matching centre-aligned text on a
    /// middle baseline. This differs from a box that sits wholly above the
    /// anchor (`y - h` to `y`), so collisions are tested half a line lower.
    pub fn centered_at(cx: f64, cy: f64, w: f64, h: f64) -> Self {
        Self {
            x: cx - w / 2.0,
            y: cy - h / 2.0,
            w,
            h,
        }
    }

    /// Touching edges count as overlap.
    pub fn overlaps(&self, other: &LabelBox) -> bool {
        !(self.x + self.w < other.x
            || self.x > other.x + other.w
            || self.y + self.h < other.y
            || self.y > other.y + other.h)
    }
}

pub trait TextMetrics {
    fn text_width(&self, text: &str) -> f64;
    fn line_height(&self) -> f64;
}

/// Fixed-advance font measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMetrics {
    pub font_size: f64,
    pub advance_ratio: f64,
    pub line_height: f64,
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self::from(&LabelConfig::default())
    }
}

impl From<&LabelConfig> for MonospaceMetrics {
    fn from(config: &LabelConfig) -> Self {
        Self {
            font_size: config.font_size,
            advance_ratio: config.advance_ratio,
            line_height: config.line_height,
        }
    }
}

impl TextMetrics for MonospaceMetrics {
    fn text_width(&self, text: &str) -> f64 {
        text.chars().count() as f64 * self.font_size * self.advance_ratio
    }

    fn line_height(&self) -> f64 {
        self.line_height
    }
}

/// A waypoint marker that wants a label, in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelRequest<'a> {
    pub identifier: &'a str,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LabelState {
    /// Text anchor (centre) and the box it occupies.
    Shown { x: f64, y: f64, bounds: LabelBox },
    Suppressed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedLabel {
    pub identifier: String,
    pub marker: (f64, f64),
    pub route_member: bool,
    pub state: LabelState,
}

impl PlacedLabel {
    pub fn is_shown(&self) -> bool {
        matches!(self.state, LabelState::Shown { .. })
    }

    pub fn bounds(&self) -> Option<LabelBox> {
        match self.state {
            LabelState::Shown { bounds, .. } => Some(bounds),
            LabelState::Suppressed => None,
        }
    }
}

/// Labels for one frame, in request order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LabelLayout {
    pub labels: Vec<PlacedLabel>,
}

impl LabelLayout {
    pub fn get(&self, identifier: &str) -> Option<&PlacedLabel> {
        self.labels.iter().find(|l| l.identifier == identifier)
    }

    pub fn shown(&self) -> impl Iterator<Item = &PlacedLabel> {
        self.labels.iter().filter(|l| l.is_shown())
    }

    pub fn suppressed_count(&self) -> usize {
        self.labels.len() - self.shown().count()
    }
}

pub fn place(
    requests: &[LabelRequest<'_>],
    route_fixes: &HashSet<&str>,
    metrics: &dyn TextMetrics,
    offsets: &[[f64; 2]],
) -> LabelLayout {
    let mut accepted: Vec<LabelBox> = Vec::new();
    let mut states: Vec<Option<LabelState>> = vec![None; requests.len()];
    let height = metrics.line_height();

    let candidates = |req: &LabelRequest<'_>| -> Vec<(f64, f64, LabelBox)> {
        let width = metrics.text_width(req.identifier);
        let anchors: Vec<(f64, f64)> = if offsets.is_empty() {
            vec![(req.x, req.y)]
        } else {
            offsets.iter().map(|[dx, dy]| (req.x + dx, req.y + dy)).collect()
        };
        anchors
            .into_iter()
            .map(|(x, y)| (x, y, LabelBox::centered_at(x, y, width, height)))
            .collect()
    };

    // Route fixes claim space first and are never dropped.
    let mut route_boxes: Vec<LabelBox> = Vec::new();
    for (i, req) in requests.iter().enumerate() {
        if !route_fixes.contains(req.identifier) {
            continue;
        }
        let options = candidates(req);
        let (x, y, bounds) = options
            .iter()
            .find(|(_, _, b)| !route_boxes.iter().any(|r| r.overlaps(b)))
            .or_else(|| options.first())
            .copied()
            .unwrap_or((req.x, req.y, LabelBox::centered_at(req.x, req.y, 0.0, height)));
        route_boxes.push(bounds);
        states[i] = Some(LabelState::Shown { x, y, bounds });
    }
    accepted.extend(route_boxes);

    for (i, req) in requests.iter().enumerate() {
        if states[i].is_some() {
            continue;
        }
        let free = candidates(req)
            .into_iter()
            .find(|(_, _, b)| !accepted.iter().any(|a| a.overlaps(b)));
        states[i] = Some(match free {
            Some((x, y, bounds)) => {
                accepted.push(bounds);
                LabelState::Shown { x, y, bounds }
            }
            None => LabelState::Suppressed,
        });
    }

    let layout = LabelLayout {
        labels: requests
            .iter()
            .zip(states)
            .map(|(req, state)| PlacedLabel {
                identifier: req.identifier.to_string(),
                marker: (req.x, req.y),
                route_member: route_fixes.contains(req.identifier),
                state: state.unwrap_or(LabelState::Suppressed),
            })
            .collect(),
    };
    log::debug!(
        "Placed {} labels, {} suppressed",
        layout.labels.len(),
        layout.suppressed_count()
    );
    layout
}
