// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::config::TransitionPolicy;
use crate::nav_data::Procedure;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Chooses which transition of a procedure to fly.
///
/// Called once each time the selected procedure changes; the result is kept
/// in the selection state so re-renders never re-roll it.
pub trait TransitionSelector {
    /// Index into `procedure.transitions`, or `None` when it has none.
    fn pick(&mut self, procedure: &Procedure) -> Option<usize>;
}

/// Always the first published transition.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstTransition;

impl TransitionSelector for FirstTransition {
    fn pick(&mut self, procedure: &Procedure) -> Option<usize> {
        (!procedure.transitions.is_empty()).then_some(0)
    }
}

/// Uniform choice among all transitions.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl TransitionSelector for SeededRandom {
    fn pick(&mut self, procedure: &Procedure) -> Option<usize> {
        match procedure.transitions.len() {
            0 => None,
            n => Some(self.rng.gen_range(0..n)),
        }
    }
}

pub fn selector_for(policy: &TransitionPolicy) -> Box<dyn TransitionSelector> {
    match policy {
        TransitionPolicy::First => Box::new(FirstTransition),
        TransitionPolicy::Random { seed: Some(seed) } => Box::new(SeededRandom::new(*seed)),
        TransitionPolicy::Random { seed: None } => Box::new(SeededRandom::from_entropy()),
    }
}
