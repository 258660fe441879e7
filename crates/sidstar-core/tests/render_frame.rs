// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz
//
// Frame output: layer order, route polyline, route-only filter, styling.

use indexmap::IndexMap;
use sidstar_core::config::{ConfigError, PlannerConfig, StyleConfig};
use sidstar_core::nav_data::{FixRef, NavData, Procedure, Waypoint};
use sidstar_core::render::{DrawCommand, Frame};
use sidstar_core::transform::Calibration;
use sidstar_core::{Event, Planner, SidStarError};

fn wp(id: &str, x: f64, y: f64) -> Waypoint {
    Waypoint {
        identifier: id.to_string(),
        x,
        y,
    }
}

fn procedure(id: &str, airport: &str, runway: &str, fixes: &[&str]) -> Procedure {
    let mut runway_routes = IndexMap::new();
    runway_routes.insert(
        runway.to_string(),
        fixes.iter().map(|f| FixRef::new(*f)).collect(),
    );
    Procedure {
        id: id.to_string(),
        airport: airport.to_string(),
        applicable_runways: vec![runway.to_string()],
        runway_routes,
        common_route: None,
        transitions: Vec::new(),
    }
}

/// Source coordinates map 1:1 onto the canvas.
fn identity_config() -> PlannerConfig {
    PlannerConfig {
        calibration: Calibration::Fixed {
            source_a: [0.0, 0.0],
            source_b: [1.0, 1.0],
            canvas_a: [0.0, 0.0],
            canvas_b: [1.0, 1.0],
        },
        ..PlannerConfig::default()
    }
}

fn planner(sid_fixes: &[&str], star_fixes: &[&str]) -> Planner {
    let data = NavData::new(
        vec![
            wp("AAA", 100.0, 100.0),
            wp("BBB", 400.0, 120.0),
            wp("CCC", 700.0, 300.0),
            wp("DDD", 900.0, 600.0),
            wp("FAR", 1800.0, 1500.0),
        ],
        vec![procedure("ALPHA1", "ABCD", "09", sid_fixes)],
        vec![procedure("WXYZ1A", "WXYZ", "27", star_fixes)],
    );
    let mut planner = Planner::new(data, identity_config()).unwrap();
    planner.apply(&Event::SelectAirport {
        side: sidstar_core::Side::Arrival,
        airport: "WXYZ".to_string(),
    });
    planner
}

fn markers(frame: &Frame) -> Vec<&DrawCommand> {
    frame
        .commands
        .iter()
        .filter(|c| matches!(c, DrawCommand::Marker { .. }))
        .collect()
}

#[test]
fn test_layers_start_with_clear_and_background() {
    let frame = planner(&["AAA", "BBB"], &["DDD"]).frame();
    assert!(matches!(
        frame.commands[0],
        DrawCommand::Clear {
            width: 2200.0,
            height: 1700.0
        }
    ));
    assert!(matches!(
        frame.commands[1],
        DrawCommand::Image { x, y, scale, .. } if x == 0.0 && y == 0.0 && scale == 1.0
    ));
}

#[test]
fn test_polyline_follows_route_order() {
    let frame = planner(&["AAA", "BBB", "CCC"], &["DDD"]).frame();
    assert_eq!(frame.route.fixes, vec!["AAA", "BBB", "CCC", "DDD"]);
    assert_eq!(
        frame.polyline(),
        Some(&[(100.0, 100.0), (400.0, 120.0), (700.0, 300.0), (900.0, 600.0)][..])
    );

    // The route layer is drawn after every waypoint marker.
    let polyline_at = frame
        .commands
        .iter()
        .position(|c| matches!(c, DrawCommand::Polyline { .. }))
        .unwrap();
    let waypoint_markers = frame.waypoints.len();
    assert!(polyline_at >= 2 + waypoint_markers);
}

#[test]
fn test_unknown_fix_is_skipped_in_polyline() {
    let frame = planner(&["AAA", "GHOST", "CCC"], &["DDD"]).frame();
    assert_eq!(frame.route.fixes, vec!["AAA", "GHOST", "CCC", "DDD"]);
    assert!(frame.route.drawable);
    assert_eq!(
        frame.polyline(),
        Some(&[(100.0, 100.0), (700.0, 300.0), (900.0, 600.0)][..])
    );
    // No marker or label is produced for the unknown identifier.
    assert!(frame.labels.get("GHOST").is_none());
    assert!(!frame.commands.iter().any(
        |c| matches!(c, DrawCommand::Text { text, .. } if text == "GHOST")
    ));
}

#[test]
fn test_single_known_fix_draws_no_polyline() {
    let frame = planner(&["GHOST"], &["DDD"]).frame();
    assert!(!frame.route.drawable);
    assert!(frame.polyline().is_none());
    // Waypoints are still drawn.
    assert_eq!(frame.waypoints.len(), 5);
}

#[test]
fn test_route_members_are_styled_apart() {
    let frame = planner(&["AAA", "BBB"], &["DDD"]).frame();
    let style = StyleConfig::default();

    let on_route = frame.waypoints.iter().filter(|w| w.route_member).count();
    assert_eq!(on_route, 3);

    let first_markers = &markers(&frame)[..frame.waypoints.len()];
    for (marker, waypoint) in first_markers.iter().zip(&frame.waypoints) {
        match marker {
            DrawCommand::Marker { color, radius, .. } => {
                let expected = if waypoint.route_member {
                    style.route_marker
                } else {
                    style.marker
                };
                assert_eq!(*color, expected);
                assert_eq!(*radius, style.marker_radius);
            }
            _ => unreachable!(),
        }
    }

    // Route vertices get the larger marker and a label above them.
    let vertex_markers = markers(&frame)
        .into_iter()
        .filter(|c| matches!(c, DrawCommand::Marker { radius, .. } if *radius == style.route_vertex_radius))
        .count();
    assert_eq!(vertex_markers, 3);
    assert!(frame.commands.iter().any(|c| matches!(
        c,
        DrawCommand::Text { text, x, y, .. } if text == "BBB" && *x == 400.0 && *y == 120.0 + style.vertex_label_dy
    )));
}

#[test]
fn test_route_only_hides_other_waypoints() {
    let mut p = planner(&["AAA", "BBB"], &["DDD"]);
    let frame = p.handle(&Event::ToggleRouteOnly);
    let ids: Vec<&str> = frame.waypoints.iter().map(|w| w.identifier.as_str()).collect();
    assert_eq!(ids, vec!["AAA", "BBB", "DDD"]);
    assert!(frame.labels.get("FAR").is_none());
    assert!(frame.polyline().is_some());
}

#[test]
fn test_zoom_and_pan_move_everything_together() {
    let mut p = planner(&["AAA", "BBB"], &["DDD"]);
    p.apply(&Event::Pan { dx: 10.0, dy: 20.0 });
    let frame = p.handle(&Event::Zoom {
        factor: 2.0,
        anchor: None,
    });

    let aaa = frame
        .waypoints
        .iter()
        .find(|w| w.identifier == "AAA")
        .unwrap();
    assert_eq!((aaa.x, aaa.y), (210.0, 220.0));
    assert_eq!(frame.polyline().map(|p| p[0]), Some((210.0, 220.0)));
    assert!(matches!(
        frame.commands[1],
        DrawCommand::Image { x, y, scale, .. } if x == 10.0 && y == 20.0 && scale == 2.0
    ));
}

#[test]
fn test_stock_map_calibration() {
    let data = NavData::new(
        vec![wp("REF1", -50265.0, 40611.0), wp("REF2", 54840.0, -40395.0)],
        vec![],
        vec![],
    );
    let config = PlannerConfig {
        calibration: Calibration::stock_map(),
        ..PlannerConfig::default()
    };
    let frame = Planner::new(data, config).unwrap().frame();
    let positions: Vec<(f64, f64)> = frame
        .waypoints
        .iter()
        .map(|w| (w.x.round(), w.y.round()))
        .collect();
    assert_eq!(positions, vec![(159.0, 1541.0), (2146.0, 113.0)]);
}

#[test]
fn test_degenerate_calibration_is_rejected() {
    let config = PlannerConfig {
        calibration: Calibration::Fixed {
            source_a: [5.0, 0.0],
            source_b: [5.0, 10.0],
            canvas_a: [0.0, 0.0],
            canvas_b: [100.0, 100.0],
        },
        ..PlannerConfig::default()
    };
    let result = Planner::new(NavData::default(), config);
    assert!(matches!(
        result,
        Err(SidStarError::Config(ConfigError::DegenerateCalibration('x')))
    ));
}

#[test]
fn test_frame_serializes_to_json() {
    let frame = planner(&["AAA", "BBB"], &["DDD"]).frame();
    let json = serde_json::to_value(&frame).unwrap();
    assert_eq!(json["commands"][0]["op"], "clear");
    assert_eq!(json["route"]["text"], "ABCD/09 ALPHA1 WXYZ1A 27/WXYZ");
}
