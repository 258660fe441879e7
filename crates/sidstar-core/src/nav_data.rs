// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const WAYPOINTS_FILE: &str = "waypoints.json";
pub const SIDS_FILE: &str = "sids.json";
pub const STARS_FILE: &str = "stars.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub identifier: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FixRef {
    pub fix: String,
}

impl FixRef {
    pub fn new(fix: impl Into<String>) -> Self {
        Self { fix: fix.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub waypoints: Vec<FixRef>,
}

/// A SID or STAR as published in the data supply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Procedure {
    pub id: String,
    pub airport: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub applicable_runways: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    /// Keeps the order the data lists runways in.
    pub runway_routes: IndexMap<String, Vec<FixRef>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub common_route: Option<Vec<FixRef>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub transitions: Vec<Transition>,
}

impl Procedure {
    pub fn applies_to(&self, runway: &str) -> bool {
        self.applicable_runways.iter().any(|r| r == runway)
    }

    /// Fixes this procedure flies for `runway`.
    ///
    /// Procedures that publish runway routes contribute only the entry for the
    /// requested runway (possibly nothing). Procedures without any runway
    /// routes fall back to their common route.
    pub fn leg_for(&self, runway: &str) -> &[FixRef] {
        if self.runway_routes.is_empty() {
            return self.common_route.as_deref().unwrap_or(&[]);
        }
        self.runway_routes
            .get(runway)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every fix list this procedure publishes: runway routes in listing
    /// order, then the common route.
    pub fn fix_lists(&self) -> impl Iterator<Item = &[FixRef]> {
        self.runway_routes
            .values()
            .map(Vec::as_slice)
            .chain(self.common_route.as_deref())
    }

    pub fn transition(&self, index: usize) -> Option<&Transition> {
        self.transitions.get(index)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
struct WaypointsFile {
    fixes: Vec<Waypoint>,
}

#[derive(Deserialize)]
struct SidsFile {
    sids: Vec<Procedure>,
}

#[derive(Deserialize)]
struct StarsFile {
    stars: Vec<Procedure>,
}

#[derive(Error, Debug)]
pub enum NavDataError {
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
}

/// The three record collections of the data supply, read-only after load.
#[derive(Debug, Clone, Default)]
pub struct NavData {
    pub waypoints: Vec<Waypoint>,
    pub sids: Vec<Procedure>,
    pub stars: Vec<Procedure>,
    by_ident: HashMap<String, usize>,
}

impl NavData {
    pub fn new(waypoints: Vec<Waypoint>, sids: Vec<Procedure>, stars: Vec<Procedure>) -> Self {
        let mut by_ident = HashMap::with_capacity(waypoints.len());
        for (i, wp) in waypoints.iter().enumerate() {
            // First record wins for duplicate identifiers.
            by_ident.entry(wp.identifier.clone()).or_insert(i);
        }
        Self {
            waypoints,
            sids,
            stars,
            by_ident,
        }
    }

    /// Loads `waypoints.json`, `sids.json` and `stars.json` from `dir`.
    /// All three must be present and well-formed.
    pub fn load_dir<P: AsRef<Path>>(dir: P) -> Result<Self, NavDataError> {
        let dir = dir.as_ref();
        log::debug!("Loading nav data from {}", dir.display());

        let waypoints: WaypointsFile = read_json(&dir.join(WAYPOINTS_FILE))?;
        let sids: SidsFile = read_json(&dir.join(SIDS_FILE))?;
        let stars: StarsFile = read_json(&dir.join(STARS_FILE))?;

        let data = Self::new(waypoints.fixes, sids.sids, stars.stars);
        log::info!(
            "Loaded nav data: fixes={} sids={} stars={}",
            data.waypoints.len(),
            data.sids.len(),
            data.stars.len()
        );
        Ok(data)
    }

    /// Parses the three documents from in-memory JSON.
    pub fn from_json(waypoints: &str, sids: &str, stars: &str) -> Result<Self, NavDataError> {
        let waypoints: WaypointsFile = parse_json(Path::new(WAYPOINTS_FILE), waypoints)?;
        let sids: SidsFile = parse_json(Path::new(SIDS_FILE), sids)?;
        let stars: StarsFile = parse_json(Path::new(STARS_FILE), stars)?;
        Ok(Self::new(waypoints.fixes, sids.sids, stars.stars))
    }

    pub fn waypoint(&self, identifier: &str) -> Option<&Waypoint> {
        self.by_ident.get(identifier).map(|&i| &self.waypoints[i])
    }

    pub fn has_fix(&self, identifier: &str) -> bool {
        self.by_ident.contains_key(identifier)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, NavDataError> {
    let content = fs::read_to_string(path).map_err(|source| NavDataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_json(path, &content)
}

fn parse_json<T: DeserializeOwned>(path: &Path, content: &str) -> Result<T, NavDataError> {
    serde_json::from_str(content).map_err(|source| {
        log::error!("JSON parse error for {}: {}", path.display(), source);
        NavDataError::Parse {
            path: path.to_path_buf(),
            source,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const WAYPOINTS: &str = r#"{ "fixes": [
        { "identifier": "AAA", "x": 1.0, "y": 2.0 },
        { "identifier": "BBB", "x": 3.5, "y": -4.0 },
        { "identifier": "AAA", "x": 99.0, "y": 99.0 }
    ] }"#;

    #[test]
    fn test_parse_procedures_with_optional_fields() {
        let sids = r#"{ "sids": [
            {
                "id": "ALPHA1",
                "airport": "ABCD",
                "applicableRunways": ["09", "27"],
                "runwayRoutes": { "09": [{ "fix": "AAA" }] },
                "transitions": [{ "name": "T1", "waypoints": [{ "fix": "BBB" }] }]
            },
            {
                "id": "BRAVO1",
                "airport": "ABCD",
                "applicableRunways": ["09"],
                "runwayRoutes": null,
                "commonRoute": [{ "fix": "BBB" }]
            }
        ] }"#;
        let data = NavData::from_json(WAYPOINTS, sids, r#"{ "stars": [] }"#).unwrap();

        assert_eq!(data.sids.len(), 2);
        let alpha = &data.sids[0];
        assert!(alpha.applies_to("27"));
        assert_eq!(alpha.leg_for("09"), &[FixRef::new("AAA")]);
        // Has runway routes, none for 27: contributes nothing.
        assert!(alpha.leg_for("27").is_empty());

        let bravo = &data.sids[1];
        assert!(bravo.runway_routes.is_empty());
        assert!(bravo.transitions.is_empty());
        assert_eq!(bravo.leg_for("09"), &[FixRef::new("BBB")]);
    }

    #[test]
    fn test_duplicate_identifier_resolves_to_first_record() {
        let data =
            NavData::from_json(WAYPOINTS, r#"{ "sids": [] }"#, r#"{ "stars": [] }"#).unwrap();
        let wp = data.waypoint("AAA").unwrap();
        assert_eq!((wp.x, wp.y), (1.0, 2.0));
        assert!(data.has_fix("BBB"));
        assert!(!data.has_fix("ZZZ"));
    }

    #[test]
    fn test_malformed_document_is_reported_with_file_name() {
        let err = NavData::from_json(r#"{ "fixes": "nope" }"#, "{}", "{}").unwrap_err();
        match err {
            NavDataError::Parse { path, .. } => assert_eq!(path, Path::new(WAYPOINTS_FILE)),
            other => panic!("unexpected error: {other}"),
        }
    }
}
