// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Turns the current selection into the ordered list of fixes to fly and the
//! route string handed to the user.

use crate::nav_data::{FixRef, NavData, Waypoint};
use crate::procedures::ProcedureIndex;
use crate::state::{AppState, Side};
use serde::Serialize;
use std::collections::HashSet;

/// Token used between the endpoints of a direct route.
pub const DIRECT: &str = "DCT";

/// Ordered, duplicate-free fixes of the planned route.
///
/// Empty when either side has no eligible procedure.
pub fn resolve_route(state: &AppState, data: &NavData) -> Vec<String> {
    if !state.departure.has_procedure() || !state.arrival.has_procedure() {
        return Vec::new();
    }

    if state.direct_mode {
        let dep = state
            .departure
            .airport
            .as_deref()
            .and_then(|a| find_airport_fix(a, Side::Departure, data));
        let arr = state
            .arrival
            .airport
            .as_deref()
            .and_then(|a| find_airport_fix(a, Side::Arrival, data));
        return dedup(dep.into_iter().chain(arr));
    }

    let mut fixes: Vec<&FixRef> = Vec::new();

    if let (Some(sid), Some(runway)) = (
        state.departure.procedure(data, Side::Departure),
        state.departure.runway.as_deref(),
    ) {
        fixes.extend(sid.leg_for(runway));
    }
    if let Some(t) = state.departure.transition(data, Side::Departure) {
        fixes.extend(&t.waypoints);
    }
    if let Some(t) = state.arrival.transition(data, Side::Arrival) {
        fixes.extend(&t.waypoints);
    }
    if let (Some(star), Some(runway)) = (
        state.arrival.procedure(data, Side::Arrival),
        state.arrival.runway.as_deref(),
    ) {
        fixes.extend(star.leg_for(runway));
    }

    dedup(fixes.into_iter().map(|f| f.fix.as_str()))
}

/// A fix near the runway end of `airport`'s procedures, for direct routing.
///
/// SIDs run runway → exit, so departures take the first known fix of a list;
/// STARs run entry → runway, so arrivals take the last one. Lists are scanned
/// in procedure listing order, runway routes before the common route.
pub fn find_airport_fix<'a>(airport: &str, side: Side, data: &'a NavData) -> Option<&'a str> {
    for procedure in ProcedureIndex::new(data).at_airport(airport, side) {
        for list in procedure.fix_lists() {
            let found = match side {
                Side::Departure => list.iter().find(|f| data.has_fix(&f.fix)),
                Side::Arrival => list.iter().rev().find(|f| data.has_fix(&f.fix)),
            };
            if let Some(f) = found {
                return Some(f.fix.as_str());
            }
        }
    }
    None
}

fn dedup<'a>(fixes: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    fixes
        .into_iter()
        .filter(|f| seen.insert(*f))
        .map(str::to_string)
        .collect()
}

/// Route fixes that have a waypoint record, in route order. Unknown
/// identifiers are skipped.
pub fn resolvable_points<'a>(route: &'a [String], data: &'a NavData) -> Vec<&'a Waypoint> {
    route.iter().filter_map(|id| data.waypoint(id)).collect()
}

pub fn is_drawable(route: &[String], data: &NavData) -> bool {
    route.iter().filter(|id| data.has_fix(id)).take(2).count() == 2
}

/// Human-readable route, departure to arrival, e.g.
/// `ABCD/09 ALPHA1 T1 BRAVO2 27/WXYZ`.
pub fn route_string(state: &AppState, data: &NavData) -> String {
    let dep = &state.departure;
    let arr = &state.arrival;

    let origin = endpoint(dep.airport.as_deref(), dep.runway.as_deref(), Side::Departure);
    let destination = endpoint(arr.airport.as_deref(), arr.runway.as_deref(), Side::Arrival);

    let middle: Vec<Option<&str>> = if state.direct_mode {
        vec![Some(DIRECT)]
    } else {
        vec![
            dep.procedure(data, Side::Departure).map(|p| p.id.as_str()),
            dep.transition(data, Side::Departure).map(|t| t.name.as_str()),
            arr.procedure(data, Side::Arrival).map(|p| p.id.as_str()),
            arr.transition(data, Side::Arrival).map(|t| t.name.as_str()),
        ]
    };

    std::iter::once(origin)
        .chain(middle.into_iter().map(|t| t.map(str::to_string)))
        .chain(std::iter::once(destination))
        .flatten()
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// `AIRPORT/RWY` on departure, `RWY/AIRPORT` on arrival.
fn endpoint(airport: Option<&str>, runway: Option<&str>, side: Side) -> Option<String> {
    let airport = airport.filter(|a| !a.is_empty())?;
    Some(match (runway.filter(|r| !r.is_empty()), side) {
        (None, _) => airport.to_string(),
        (Some(rwy), Side::Departure) => format!("{airport}/{rwy}"),
        (Some(rwy), Side::Arrival) => format!("{rwy}/{airport}"),
    })
}

/// Everything the UI shows about the route for one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteSummary {
    pub fixes: Vec<String>,
    pub text: String,
    pub drawable: bool,
    pub sid: String,
    pub star: String,
}

impl RouteSummary {
    pub fn compute(state: &AppState, data: &NavData) -> Self {
        let fixes = resolve_route(state, data);
        let drawable = is_drawable(&fixes, data);
        Self {
            text: route_string(state, data),
            sid: state.departure.display_name(data, Side::Departure).to_string(),
            star: state.arrival.display_name(data, Side::Arrival).to_string(),
            fixes,
            drawable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let out = dedup(["A", "B", "A", "C", "B"]);
        assert_eq!(out, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_endpoint_tokens() {
        assert_eq!(
            endpoint(Some("ABCD"), Some("09"), Side::Departure).as_deref(),
            Some("ABCD/09")
        );
        assert_eq!(
            endpoint(Some("WXYZ"), Some("27"), Side::Arrival).as_deref(),
            Some("27/WXYZ")
        );
        assert_eq!(
            endpoint(Some("WXYZ"), None, Side::Arrival).as_deref(),
            Some("WXYZ")
        );
        assert_eq!(endpoint(None, Some("27"), Side::Arrival), None);
    }
}
