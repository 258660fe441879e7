// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::config::PlannerConfig;
use crate::nav_data::NavData;
use crate::procedures::ProcedureIndex;
use crate::render::{Frame, Renderer};
use crate::route::RouteSummary;
use crate::state::{AppState, Event, EventContext, Side};
use crate::transition::{selector_for, TransitionSelector};
use crate::SidStarError;
use std::path::Path;

/// Owns the loaded data and the mutable session state. Each event is applied
/// in full before the next frame is rendered.
pub struct Planner {
    data: NavData,
    config: PlannerConfig,
    state: AppState,
    selector: Box<dyn TransitionSelector>,
    renderer: Renderer,
}

impl Planner {
    /// Starts a session with both airport selectors on the first known
    /// airport, as the selection lists would show them.
    pub fn new(data: NavData, config: PlannerConfig) -> Result<Self, SidStarError> {
        config.validate()?;
        let renderer = Renderer::new(&config, &data)?;
        let selector = selector_for(&config.transitions);
        let mut planner = Self {
            data,
            config,
            state: AppState::default(),
            selector,
            renderer,
        };

        let first_airport = ProcedureIndex::new(&planner.data)
            .airports()
            .into_iter()
            .next()
            .map(str::to_string);
        if let Some(airport) = first_airport {
            for side in [Side::Departure, Side::Arrival] {
                planner.apply(&Event::SelectAirport {
                    side,
                    airport: airport.clone(),
                });
            }
        }
        Ok(planner)
    }

    /// Loads the data directory in full; any failure ends the session before
    /// anything is rendered.
    pub fn load<P: AsRef<Path>>(data_dir: P, config: PlannerConfig) -> Result<Self, SidStarError> {
        let data = NavData::load_dir(data_dir)?;
        Self::new(data, config)
    }

    /// Replaces the transition policy from the config. The current
    /// selections keep their transitions until their procedure changes.
    pub fn with_selector(mut self, selector: Box<dyn TransitionSelector>) -> Self {
        self.selector = selector;
        self
    }

    pub fn apply(&mut self, event: &Event) {
        let mut ctx = EventContext {
            data: &self.data,
            selector: self.selector.as_mut(),
            limits: self.config.viewport.limits,
        };
        let state = std::mem::take(&mut self.state);
        self.state = state.apply(event, &mut ctx);
    }

    pub fn handle(&mut self, event: &Event) -> Frame {
        self.apply(event);
        self.frame()
    }

    /// `steps` zoom notches (negative zooms out) around an optional anchor.
    pub fn zoom_steps(&mut self, steps: f64, anchor: Option<(f64, f64)>) -> Frame {
        let factor = self.config.viewport.zoom_step.powf(steps);
        self.handle(&Event::Zoom { factor, anchor })
    }

    pub fn frame(&self) -> Frame {
        self.renderer.render(&self.state, &self.data)
    }

    pub fn route(&self) -> RouteSummary {
        RouteSummary::compute(&self.state, &self.data)
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn data(&self) -> &NavData {
        &self.data
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn procedures(&self) -> ProcedureIndex<'_> {
        ProcedureIndex::new(&self.data)
    }
}
