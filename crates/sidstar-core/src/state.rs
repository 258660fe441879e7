// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Selection and viewport state, and the events that change them.

use crate::nav_data::{NavData, Procedure, Transition};
use crate::procedures::ProcedureIndex;
use crate::transform::{ScaleLimits, Viewport};
use crate::transition::TransitionSelector;
use serde::{Deserialize, Serialize};

pub use crate::procedures::Side;

/// Shown in place of a procedure name when none is eligible.
pub const NO_PROCEDURE: &str = "—";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideSelection {
    pub airport: Option<String>,
    pub runway: Option<String>,
    /// Positions in the SID (or STAR) list flyable from `airport`/`runway`.
    pub eligible: Vec<usize>,
    /// Position in `eligible` of the current procedure.
    pub current: usize,
    /// Chosen transition of the current procedure.
    pub transition: Option<usize>,
}

impl SideSelection {
    pub fn has_procedure(&self) -> bool {
        !self.eligible.is_empty()
    }

    pub fn procedure<'a>(&self, data: &'a NavData, side: Side) -> Option<&'a Procedure> {
        let &i = self.eligible.get(self.current)?;
        ProcedureIndex::new(data).all(side).get(i)
    }

    pub fn transition<'a>(&self, data: &'a NavData, side: Side) -> Option<&'a Transition> {
        self.procedure(data, side)?.transition(self.transition?)
    }

    /// Current procedure id, or [`NO_PROCEDURE`].
    pub fn display_name<'a>(&self, data: &'a NavData, side: Side) -> &'a str {
        self.procedure(data, side)
            .map(|p| p.id.as_str())
            .unwrap_or(NO_PROCEDURE)
    }
}

/// User input, one variant per UI signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    SelectAirport { side: Side, airport: String },
    SelectRunway { side: Side, runway: String },
    SetDirectMode(bool),
    ToggleRouteOnly,
    NextProcedure(Side),
    PreviousProcedure(Side),
    NextTransition(Side),
    PreviousTransition(Side),
    Pan { dx: f64, dy: f64 },
    Zoom { factor: f64, anchor: Option<(f64, f64)> },
    ResetView,
}

/// What [`AppState::apply`] needs besides the state itself.
pub struct EventContext<'a> {
    pub data: &'a NavData,
    pub selector: &'a mut dyn TransitionSelector,
    pub limits: ScaleLimits,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    pub departure: SideSelection,
    pub arrival: SideSelection,
    pub direct_mode: bool,
    /// Hide waypoints that are not on the route.
    pub route_only: bool,
    pub viewport: Viewport,
}

impl AppState {
    pub fn side(&self, side: Side) -> &SideSelection {
        match side {
            Side::Departure => &self.departure,
            Side::Arrival => &self.arrival,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut SideSelection {
        match side {
            Side::Departure => &mut self.departure,
            Side::Arrival => &mut self.arrival,
        }
    }

    pub fn apply(mut self, event: &Event, ctx: &mut EventContext<'_>) -> Self {
        log::debug!("Applying {:?}", event);
        match event {
            Event::SelectAirport { side, airport } => {
                let first_runway = ProcedureIndex::new(ctx.data)
                    .runways_for(airport, *side)
                    .into_iter()
                    .next()
                    .map(str::to_string);
                let sel = self.side_mut(*side);
                sel.airport = Some(airport.clone());
                sel.runway = first_runway;
                self.refresh_procedures(*side, ctx);
            }
            Event::SelectRunway { side, runway } => {
                self.side_mut(*side).runway = Some(runway.clone());
                self.refresh_procedures(*side, ctx);
            }
            Event::SetDirectMode(direct) => self.direct_mode = *direct,
            Event::ToggleRouteOnly => self.route_only = !self.route_only,
            Event::NextProcedure(side) => self.step_procedure(*side, 1, ctx),
            Event::PreviousProcedure(side) => self.step_procedure(*side, -1, ctx),
            Event::NextTransition(side) => self.step_transition(*side, 1, ctx.data),
            Event::PreviousTransition(side) => self.step_transition(*side, -1, ctx.data),
            Event::Pan { dx, dy } => self.viewport = self.viewport.pan(*dx, *dy),
            Event::Zoom { factor, anchor } => {
                self.viewport = match anchor {
                    Some((ax, ay)) => self.viewport.zoom_at(*factor, *ax, *ay, &ctx.limits),
                    None => self.viewport.zoom(*factor, &ctx.limits),
                };
            }
            Event::ResetView => self.viewport = self.viewport.reset(),
        }
        self
    }

    /// Recomputes the eligible procedures after an airport or runway change
    /// and starts over at the first one.
    fn refresh_procedures(&mut self, side: Side, ctx: &mut EventContext<'_>) {
        let sel = self.side_mut(side);
        sel.eligible = match (&sel.airport, &sel.runway) {
            (Some(airport), Some(runway)) => {
                ProcedureIndex::new(ctx.data).eligible(airport, runway, side)
            }
            _ => Vec::new(),
        };
        sel.current = 0;
        self.repick_transition(side, ctx);

        let sel = self.side(side);
        log::debug!(
            "{} selection {:?}/{:?}: {} eligible, current={}",
            side,
            sel.airport,
            sel.runway,
            sel.eligible.len(),
            sel.display_name(ctx.data, side)
        );
    }

    fn step_procedure(&mut self, side: Side, step: isize, ctx: &mut EventContext<'_>) {
        let sel = self.side_mut(side);
        let len = sel.eligible.len();
        if len == 0 {
            return;
        }
        sel.current = wrap(sel.current, step, len);
        self.repick_transition(side, ctx);
    }

    fn repick_transition(&mut self, side: Side, ctx: &mut EventContext<'_>) {
        let sel = self.side(side);
        let transition = sel
            .procedure(ctx.data, side)
            .and_then(|p| ctx.selector.pick(p));
        self.side_mut(side).transition = transition;
    }

    fn step_transition(&mut self, side: Side, step: isize, data: &NavData) {
        let count = self
            .side(side)
            .procedure(data, side)
            .map_or(0, |p| p.transitions.len());
        let sel = self.side_mut(side);
        sel.transition = match (count, sel.transition) {
            (0, _) => None,
            (n, Some(i)) => Some(wrap(i, step, n)),
            (_, None) if step >= 0 => Some(0),
            (n, None) => Some(n - 1),
        };
    }
}

fn wrap(index: usize, step: isize, len: usize) -> usize {
    (index as isize + step).rem_euclid(len as isize) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_both_directions() {
        assert_eq!(wrap(0, -1, 3), 2);
        assert_eq!(wrap(2, 1, 3), 0);
        assert_eq!(wrap(1, 1, 3), 2);
    }

    #[test]
    fn test_empty_side_has_placeholder_name() {
        let data = NavData::default();
        let sel = SideSelection::default();
        assert!(!sel.has_procedure());
        assert_eq!(sel.display_name(&data, Side::Departure), NO_PROCEDURE);
        assert!(sel.transition(&data, Side::Departure).is_none());
    }
}
