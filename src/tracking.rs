//! # Tracked object positions
//!
//! The scene can also show artificial satellites. Their positions come from a
//! **tracking-data collaborator** behind [`TrackingSource`], which returns a map from object
//! identifier to Cartesian position (km) at the requested instant:
//!
//! - [`JsonTracking`] – an already decoded `{ "id": [x, y, z], … }` map.
//! - [`TleTracking`] – a CelesTrak TLE group fetched over HTTP and propagated with SGP4.
//!   Positions are geocentric TEME, reported as delivered.
//!
//! Every failure is returned to the caller; a satellite that cannot be decoded or propagated
//! fails the whole request.

use std::collections::BTreeMap;

use chrono::DateTime;
use hifitime::Epoch;
use log::{debug, info};
use nalgebra::Vector3;
use sgp4::{Constants, Elements};

use crate::{env_state::NeoEnv, neo_errors::NeoError};

/// Tracked object identifier → position (km).
pub type TrackedPositions = BTreeMap<String, Vector3<f64>>;

/// Provider of tracked object positions at a given instant.
pub trait TrackingSource {
    fn tracked_positions(&self, epoch: Epoch) -> Result<TrackedPositions, NeoError>;
}

/// Positions decoded from a JSON object mapping identifiers to `[x, y, z]` triples.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonTracking {
    positions: TrackedPositions,
}

impl JsonTracking {
    pub fn new(positions: TrackedPositions) -> Self {
        JsonTracking { positions }
    }

    /// Decode `{ "ISS (ZARYA)": [x, y, z], … }`.
    pub fn from_json(payload: &str) -> Result<Self, NeoError> {
        let raw: BTreeMap<String, [f64; 3]> = serde_json::from_str(payload)?;
        let positions = raw
            .into_iter()
            .map(|(id, [x, y, z])| (id, Vector3::new(x, y, z)))
            .collect();
        Ok(JsonTracking { positions })
    }
}

impl TrackingSource for JsonTracking {
    fn tracked_positions(&self, _epoch: Epoch) -> Result<TrackedPositions, NeoError> {
        Ok(self.positions.clone())
    }
}

/// Parse a 3-line (name + two element lines) TLE listing.
///
/// Blank lines are ignored. A trailing incomplete group is an error.
pub fn parse_tle_group(text: &str) -> Result<Vec<Elements>, NeoError> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim_end)
        .filter(|l| !l.trim().is_empty())
        .collect();

    lines
        .chunks(3)
        .map(|chunk| match chunk {
            [name, line1, line2] => {
                let name = name.trim().trim_start_matches("0 ").to_string();
                Elements::from_tle(Some(name.clone()), line1.as_bytes(), line2.as_bytes())
                    .map_err(|e| NeoError::TleError {
                        name,
                        reason: format!("{e:?}"),
                    })
            }
            incomplete => Err(NeoError::TleError {
                name: incomplete
                    .first()
                    .map(|l| l.trim().to_string())
                    .unwrap_or_default(),
                reason: "incomplete TLE group".into(),
            }),
        })
        .collect()
}

fn object_label(elements: &Elements) -> String {
    elements
        .object_name
        .clone()
        .unwrap_or_else(|| elements.norad_id.to_string())
}

/// Propagate every element set to `epoch` with SGP4.
pub fn propagate_tles(elements: &[Elements], epoch: Epoch) -> Result<TrackedPositions, NeoError> {
    let unix = epoch.to_unix_seconds();
    let secs = unix.floor();
    let nanos = ((unix - secs) * 1e9) as u32;
    let datetime = DateTime::from_timestamp(secs as i64, nanos)
        .ok_or_else(|| NeoError::TleError {
            name: "epoch".into(),
            reason: format!("{epoch} is outside the supported date range"),
        })?
        .naive_utc();

    let mut positions = TrackedPositions::new();
    for element in elements {
        let label = object_label(element);
        let tle_error = |reason: String| NeoError::TleError {
            name: label.clone(),
            reason,
        };

        let constants = Constants::from_elements(element).map_err(|e| tle_error(format!("{e:?}")))?;
        let minutes = element
            .datetime_to_minutes_since_epoch(&datetime)
            .map_err(|e| tle_error(format!("{e:?}")))?;
        let prediction = constants
            .propagate(minutes)
            .map_err(|e| tle_error(format!("{e:?}")))?;

        let [x, y, z] = prediction.position;
        debug!("{label}: TEME position ({x:.1}, {y:.1}, {z:.1}) km");
        positions.insert(label, Vector3::new(x, y, z));
    }
    Ok(positions)
}

/// Tracking source reading a CelesTrak TLE group.
#[derive(Debug, Clone)]
pub struct TleTracking {
    env: NeoEnv,
    url: String,
}

impl TleTracking {
    /// Source reading `env.config.celestrak_url`.
    pub fn new(env: NeoEnv) -> Self {
        let url = env.config.celestrak_url.clone();
        TleTracking { env, url }
    }

    pub fn with_url(env: NeoEnv, url: impl Into<String>) -> Self {
        TleTracking {
            env,
            url: url.into(),
        }
    }
}

impl TrackingSource for TleTracking {
    fn tracked_positions(&self, epoch: Epoch) -> Result<TrackedPositions, NeoError> {
        let text = self.env.get_from_url(self.url.as_str())?;
        let elements = parse_tle_group(&text)?;
        info!("Propagating {} tracked objects", elements.len());
        propagate_tles(&elements, epoch)
    }
}
