//! NeoWs object lookup (`/neo/{id}`).
//!
//! The lookup payload carries the orbital data of the object along with the full list of its
//! close approaches. [`ObjectDetail`] keeps the orbital record untouched (it feeds the plot
//! stage) and sorts the approaches chronologically for the approach chart.

use serde::{Deserialize, Serialize};

use crate::{neo_errors::NeoError, neows::feed::RawApproach, orbital_elements::OrbitalRecord};

#[derive(Debug, Clone, Deserialize)]
pub struct RawObject {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub orbital_data: Option<OrbitalRecord>,
    #[serde(default)]
    pub close_approach_data: Vec<RawApproach>,
}

/// One close approach, as shown on the approach chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApproachSummary {
    pub date: String,
    pub date_full: Option<String>,
    /// Epoch of the approach, Unix milliseconds.
    pub epoch_ms: Option<i64>,
    pub miss_distance_km: Option<String>,
    pub velocity_kmph: Option<String>,
    pub orbiting_body: Option<String>,
}

impl From<&RawApproach> for ApproachSummary {
    fn from(raw: &RawApproach) -> Self {
        ApproachSummary {
            date: raw.close_approach_date.clone(),
            date_full: raw.close_approach_date_full.clone(),
            epoch_ms: raw.epoch_date_close_approach,
            miss_distance_km: raw.miss_distance.as_ref().and_then(|m| m.kilometers.clone()),
            velocity_kmph: raw
                .relative_velocity
                .as_ref()
                .and_then(|v| v.kilometers_per_hour.clone()),
            orbiting_body: raw.orbiting_body.clone(),
        }
    }
}

/// Reshaped lookup result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectDetail {
    pub object_id: String,
    pub name: String,
    pub orbital_data: Vec<OrbitalRecord>,
    pub sorted_approaches: Vec<ApproachSummary>,
}

impl TryFrom<RawObject> for ObjectDetail {
    type Error = NeoError;

    fn try_from(raw: RawObject) -> Result<Self, Self::Error> {
        let orbital = raw.orbital_data.ok_or_else(|| {
            NeoError::MalformedNeoPayload(format!(
                "{} ({}) has no orbital_data",
                raw.name, raw.id
            ))
        })?;

        let mut sorted_approaches: Vec<ApproachSummary> = raw
            .close_approach_data
            .iter()
            .map(ApproachSummary::from)
            .collect();
        // YYYY-MM-DD dates sort chronologically; approaches without an epoch come first.
        sorted_approaches.sort_by(|a, b| {
            a.epoch_ms
                .cmp(&b.epoch_ms)
                .then_with(|| a.date.cmp(&b.date))
        });

        Ok(ObjectDetail {
            object_id: raw.id,
            name: raw.name,
            orbital_data: vec![orbital],
            sorted_approaches,
        })
    }
}

impl ObjectDetail {
    /// Calendar dates of all approaches, in chronological order.
    pub fn approach_dates(&self) -> Vec<String> {
        self.sorted_approaches.iter().map(|a| a.date.clone()).collect()
    }
}
