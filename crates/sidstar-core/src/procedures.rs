// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::nav_data::{NavData, Procedure};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Which end of the flight a selection belongs to. Departures use SIDs,
/// arrivals use STARs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Departure,
    Arrival,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Departure => write!(f, "SID"),
            Side::Arrival => write!(f, "STAR"),
        }
    }
}

/// Read-only lookups over the loaded procedures.
#[derive(Debug, Clone, Copy)]
pub struct ProcedureIndex<'a> {
    data: &'a NavData,
}

impl<'a> ProcedureIndex<'a> {
    pub fn new(data: &'a NavData) -> Self {
        Self { data }
    }

    pub fn all(&self, side: Side) -> &'a [Procedure] {
        match side {
            Side::Departure => &self.data.sids,
            Side::Arrival => &self.data.stars,
        }
    }

    pub fn at_airport<'s>(
        &self,
        airport: &'s str,
        side: Side,
    ) -> impl Iterator<Item = &'a Procedure> + 's
    where
        'a: 's,
    {
        self.all(side).iter().filter(move |p| p.airport == airport)
    }

    /// Positions (into [`Self::all`]) of the procedures flyable from
    /// `airport`/`runway`, in listing order.
    pub fn eligible(&self, airport: &str, runway: &str, side: Side) -> Vec<usize> {
        self.all(side)
            .iter()
            .enumerate()
            .filter(|(_, p)| p.airport == airport && p.applies_to(runway))
            .map(|(i, _)| i)
            .collect()
    }

    pub fn procedures_for(&self, airport: &str, runway: &str, side: Side) -> Vec<&'a Procedure> {
        let all = self.all(side);
        self.eligible(airport, runway, side)
            .into_iter()
            .map(|i| &all[i])
            .collect()
    }

    pub fn runways_for(&self, airport: &str, side: Side) -> BTreeSet<&'a str> {
        self.all(side)
            .iter()
            .filter(|p| p.airport == airport)
            .flat_map(|p| p.applicable_runways.iter().map(String::as_str))
            .collect()
    }

    /// Every airport with at least one SID or STAR.
    pub fn airports(&self) -> BTreeSet<&'a str> {
        self.data
            .sids
            .iter()
            .chain(self.data.stars.iter())
            .map(|p| p.airport.as_str())
            .collect()
    }
}
