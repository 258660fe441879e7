// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Source-space to screen-space mapping.
//!
//! A [`CanvasTransform`] calibrates raw fix coordinates onto the canvas, and a
//! [`Viewport`] applies the user's pan/zoom on top:
//! `screen = canvas(x, y) * scale + offset`.

use crate::config::ConfigError;
use crate::nav_data::Waypoint;
use serde::{Deserialize, Serialize};

/// How raw coordinates are fitted onto the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Calibration {
    /// Fit the bounding box of all waypoints into the canvas with one
    /// isotropic scale factor.
    BoundsFit { padding: f64 },
    /// Two source reference points mapped onto two canvas reference points,
    /// independently per axis.
    Fixed {
        source_a: [f64; 2],
        source_b: [f64; 2],
        canvas_a: [f64; 2],
        canvas_b: [f64; 2],
    },
}

impl Default for Calibration {
    fn default() -> Self {
        Calibration::BoundsFit { padding: 60.0 }
    }
}

impl Calibration {
    /// Reference points of the stock 2200x1700 map image.
    pub fn stock_map() -> Self {
        Calibration::Fixed {
            source_a: [-50265.0, 40611.0],
            source_b: [54840.0, -40395.0],
            canvas_a: [159.0, 1541.0],
            canvas_b: [2146.0, 113.0],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasTransform {
    pub scale_x: f64,
    pub scale_y: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}

impl CanvasTransform {
    pub fn from_calibration(
        calibration: &Calibration,
        waypoints: &[Waypoint],
        canvas_width: f64,
        canvas_height: f64,
    ) -> Result<Self, ConfigError> {
        match calibration {
            Calibration::BoundsFit { padding } => Ok(Self::fit_bounds(
                waypoints.iter().map(|w| (w.x, w.y)),
                canvas_width,
                canvas_height,
                *padding,
            )),
            Calibration::Fixed {
                source_a,
                source_b,
                canvas_a,
                canvas_b,
            } => Self::fixed(*source_a, *source_b, *canvas_a, *canvas_b),
        }
    }

    pub fn fixed(
        source_a: [f64; 2],
        source_b: [f64; 2],
        canvas_a: [f64; 2],
        canvas_b: [f64; 2],
    ) -> Result<Self, ConfigError> {
        let span_x = source_b[0] - source_a[0];
        let span_y = source_b[1] - source_a[1];
        if span_x == 0.0 {
            return Err(ConfigError::DegenerateCalibration('x'));
        }
        if span_y == 0.0 {
            return Err(ConfigError::DegenerateCalibration('y'));
        }

        let scale_x = (canvas_b[0] - canvas_a[0]) / span_x;
        let scale_y = (canvas_b[1] - canvas_a[1]) / span_y;
        Ok(Self {
            scale_x,
            scale_y,
            translate_x: canvas_a[0] - source_a[0] * scale_x,
            translate_y: canvas_a[1] - source_a[1] * scale_y,
        })
    }

    /// One scale factor for both axes so relative geometry is not distorted.
    pub fn fit_bounds<I>(points: I, canvas_width: f64, canvas_height: f64, padding: f64) -> Self
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for (x, y) in points {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
        if !min_x.is_finite() {
            min_x = 0.0;
            min_y = 0.0;
            max_x = 0.0;
            max_y = 0.0;
        }

        let width = max_x - min_x;
        let height = max_y - min_y;
        let fit_x = (width > 0.0).then(|| (canvas_width - 2.0 * padding) / width);
        let fit_y = (height > 0.0).then(|| (canvas_height - 2.0 * padding) / height);
        let scale = match (fit_x, fit_y) {
            (Some(sx), Some(sy)) => sx.min(sy),
            (Some(s), None) | (None, Some(s)) => s,
            (None, None) => 1.0,
        };

        Self {
            scale_x: scale,
            scale_y: scale,
            translate_x: padding - min_x * scale,
            translate_y: padding - min_y * scale,
        }
    }

    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            x * self.scale_x + self.translate_x,
            y * self.scale_y + self.translate_y,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleLimits {
    pub min_scale: f64,
    pub max_scale: f64,
}

impl Default for ScaleLimits {
    fn default() -> Self {
        Self {
            min_scale: 0.25,
            max_scale: 8.0,
        }
    }
}

impl ScaleLimits {
    pub fn clamp(&self, scale: f64) -> f64 {
        scale.clamp(self.min_scale, self.max_scale)
    }
}

/// User pan/zoom. Every operation returns a new value so a redraw never sees
/// a half-updated transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

impl Viewport {
    pub fn apply(&self, cx: f64, cy: f64) -> (f64, f64) {
        (
            cx * self.scale + self.offset_x,
            cy * self.scale + self.offset_y,
        )
    }

    /// Screen point back to canvas space.
    pub fn to_canvas(&self, sx: f64, sy: f64) -> (f64, f64) {
        (
            (sx - self.offset_x) / self.scale,
            (sy - self.offset_y) / self.scale,
        )
    }

    pub fn pan(self, dx: f64, dy: f64) -> Self {
        Self {
            offset_x: self.offset_x + dx,
            offset_y: self.offset_y + dy,
            ..self
        }
    }

    /// Factors that are not finite and positive leave the viewport as is.
    pub fn zoom(self, factor: f64, limits: &ScaleLimits) -> Self {
        if !valid_factor(factor) {
            return self;
        }
        Self {
            scale: limits.clamp(self.scale * factor),
            ..self
        }
    }

    /// Zooms while keeping the canvas point under `(anchor_x, anchor_y)` fixed
    /// on screen.
    pub fn zoom_at(self, factor: f64, anchor_x: f64, anchor_y: f64, limits: &ScaleLimits) -> Self {
        if !valid_factor(factor) {
            return self;
        }
        let new_scale = limits.clamp(self.scale * factor);
        if (new_scale - self.scale).abs() < f64::EPSILON {
            return self;
        }
        let (cx, cy) = self.to_canvas(anchor_x, anchor_y);
        Self {
            scale: new_scale,
            offset_x: anchor_x - cx * new_scale,
            offset_y: anchor_y - cy * new_scale,
        }
    }

    pub fn reset(self) -> Self {
        Self::default()
    }
}

fn valid_factor(factor: f64) -> bool {
    factor.is_finite() && factor > 0.0
}

/// Calibration composed with the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenTransform {
    pub canvas: CanvasTransform,
    pub viewport: Viewport,
}

impl ScreenTransform {
    pub fn new(canvas: CanvasTransform, viewport: Viewport) -> Self {
        Self { canvas, viewport }
    }

    pub fn to_screen(&self, x: f64, y: f64) -> (f64, f64) {
        let (cx, cy) = self.canvas.apply(x, y);
        self.viewport.apply(cx, cy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: (f64, f64), b: (f64, f64)) -> bool {
        (a.0 - b.0).abs() < 1e-6 && (a.1 - b.1).abs() < 1e-6
    }

    #[test]
    fn test_stock_calibration_hits_reference_points() {
        let t = CanvasTransform::from_calibration(&Calibration::stock_map(), &[], 2200.0, 1700.0)
            .unwrap();
        assert!(approx(t.apply(-50265.0, 40611.0), (159.0, 1541.0)));
        assert!(approx(t.apply(54840.0, -40395.0), (2146.0, 113.0)));
    }

    #[test]
    fn test_fixed_rejects_coincident_reference_axis() {
        let err = CanvasTransform::fixed([0.0, 0.0], [0.0, 10.0], [0.0, 0.0], [5.0, 5.0]);
        assert!(matches!(err, Err(ConfigError::DegenerateCalibration('x'))));
    }

    #[test]
    fn test_fit_bounds_is_isotropic_and_padded() {
        // 100 wide, 50 tall into 1000x1000 minus 100 padding: limited by width.
        let pts = vec![(0.0, 0.0), (100.0, 50.0)];
        let t = CanvasTransform::fit_bounds(pts, 1000.0, 1000.0, 100.0);
        assert_eq!(t.scale_x, t.scale_y);
        assert!(approx(t.apply(0.0, 0.0), (100.0, 100.0)));
        assert!(approx(t.apply(100.0, 50.0), (900.0, 500.0)));
    }

    #[test]
    fn test_fit_bounds_degenerate_extent() {
        let single = CanvasTransform::fit_bounds(vec![(5.0, 5.0)], 800.0, 600.0, 10.0);
        assert_eq!(single.scale_x, 1.0);
        assert!(approx(single.apply(5.0, 5.0), (10.0, 10.0)));

        // Horizontal line only: scale from the x axis.
        let line = CanvasTransform::fit_bounds(vec![(0.0, 3.0), (10.0, 3.0)], 120.0, 600.0, 10.0);
        assert_eq!(line.scale_x, 10.0);
    }

    #[test]
    fn test_zoom_clamps_to_limits() {
        let limits = ScaleLimits::default();
        let vp = Viewport::default().zoom(1000.0, &limits);
        assert_eq!(vp.scale, limits.max_scale);
        let vp = vp.zoom(1e-9, &limits);
        assert_eq!(vp.scale, limits.min_scale);
    }

    #[test]
    fn test_invalid_zoom_factor_is_ignored() {
        let limits = ScaleLimits::default();
        let vp = Viewport::default().pan(4.0, 2.0).zoom(2.0, &limits);
        for factor in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY, 0.0, -2.0] {
            assert_eq!(vp.zoom(factor, &limits), vp);
            assert_eq!(vp.zoom_at(factor, 10.0, 10.0, &limits), vp);
        }
        assert_eq!(vp.scale, 2.0);
    }

    #[test]
    fn test_zoom_at_keeps_anchor_fixed() {
        let limits = ScaleLimits::default();
        let vp = Viewport::default().pan(30.0, -20.0);
        let before = vp.to_canvas(400.0, 300.0);
        let zoomed = vp.zoom_at(2.0, 400.0, 300.0, &limits);
        assert_eq!(zoomed.scale, 2.0);
        assert!(approx(zoomed.to_canvas(400.0, 300.0), before));
    }

    #[test]
    fn test_zoom_at_bound_leaves_offsets() {
        let limits = ScaleLimits::default();
        let vp = Viewport {
            scale: limits.max_scale,
            offset_x: 12.0,
            offset_y: 7.0,
        };
        assert_eq!(vp.zoom_at(1.5, 100.0, 100.0, &limits), vp);
    }

    #[test]
    fn test_screen_transform_composes_viewport() {
        let canvas = CanvasTransform::fit_bounds(vec![(0.0, 0.0), (10.0, 10.0)], 120.0, 120.0, 10.0);
        let viewport = Viewport {
            scale: 2.0,
            offset_x: 5.0,
            offset_y: -5.0,
        };
        let st = ScreenTransform::new(canvas, viewport);
        // canvas(10,10) = (110,110) -> *2 + offset
        assert!(approx(st.to_screen(10.0, 10.0), (225.0, 215.0)));
    }
}
