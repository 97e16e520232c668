//! NeoWs `feed` payload and its flattened summary.
//!
//! The raw feed groups objects by close-approach date:
//!
//! ```text
//! { "element_count": 2,
//!   "near_earth_objects": {
//!       "2024-01-01": [ { "id": …, "name": …, "estimated_diameter": {…},
//!                         "close_approach_data": [ {…}, … ], … } ],
//!       "2024-01-02": [ … ] } }
//! ```
//!
//! [`simplify_feed`] turns it into one [`NeoSummary`] per object, using the first close
//! approach listed for each object. Date groups are kept in payload order (NeoWs does not sort
//! them).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use log::debug;

use crate::neo_errors::NeoError;

pub const FEED_DATE_FORMAT: &str = "%Y-%m-%d";

/// Which date groups of the feed are summarized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedTraversal {
    /// Only the first date group of the payload is summarized.
    #[default]
    FirstDateOnly,
    /// Every date group is summarized, in payload order.
    AllDates,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawFeed {
    #[serde(default)]
    pub element_count: Option<u64>,
    /// Date → list of objects, decoded lazily by [`simplify_feed`].
    pub near_earth_objects: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawNeo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub nasa_jpl_url: Option<String>,
    #[serde(default)]
    pub absolute_magnitude_h: Option<f64>,
    #[serde(default)]
    pub estimated_diameter: Option<RawDiameters>,
    #[serde(default)]
    pub is_potentially_hazardous_asteroid: Option<bool>,
    #[serde(default)]
    pub close_approach_data: Vec<RawApproach>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawDiameters {
    pub kilometers: RawDiameterRange,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawDiameterRange {
    pub estimated_diameter_min: f64,
    pub estimated_diameter_max: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawApproach {
    pub close_approach_date: String,
    #[serde(default)]
    pub close_approach_date_full: Option<String>,
    #[serde(default)]
    pub epoch_date_close_approach: Option<i64>,
    #[serde(default)]
    pub relative_velocity: Option<RawVelocity>,
    #[serde(default)]
    pub miss_distance: Option<RawMissDistance>,
    #[serde(default)]
    pub orbiting_body: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawVelocity {
    #[serde(default)]
    pub kilometers_per_hour: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMissDistance {
    #[serde(default)]
    pub kilometers: Option<String>,
}

/// One row of the NEO list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeoSummary {
    pub name: String,
    pub id: String,
    pub absolute_magnitude_h: Option<f64>,
    pub diameter_min_km: f64,
    pub diameter_max_km: f64,
    pub approach_date: String,
    pub miss_distance_km: Option<String>,
    pub velocity_kmph: Option<String>,
    pub is_hazardous: Option<bool>,
    pub nasa_jpl_url: Option<String>,
}

impl TryFrom<&RawNeo> for NeoSummary {
    type Error = NeoError;

    fn try_from(neo: &RawNeo) -> Result<Self, Self::Error> {
        let diameters = neo.estimated_diameter.as_ref().ok_or_else(|| {
            NeoError::MalformedNeoPayload(format!(
                "{} ({}) has no estimated_diameter",
                neo.name, neo.id
            ))
        })?;
        let approach = neo.close_approach_data.first().ok_or_else(|| {
            NeoError::MalformedNeoPayload(format!(
                "{} ({}) has no close approach",
                neo.name, neo.id
            ))
        })?;

        Ok(NeoSummary {
            name: neo.name.clone(),
            id: neo.id.clone(),
            absolute_magnitude_h: neo.absolute_magnitude_h,
            diameter_min_km: diameters.kilometers.estimated_diameter_min,
            diameter_max_km: diameters.kilometers.estimated_diameter_max,
            approach_date: approach.close_approach_date.clone(),
            miss_distance_km: approach
                .miss_distance
                .as_ref()
                .and_then(|m| m.kilometers.clone()),
            velocity_kmph: approach
                .relative_velocity
                .as_ref()
                .and_then(|v| v.kilometers_per_hour.clone()),
            is_hazardous: neo.is_potentially_hazardous_asteroid,
            nasa_jpl_url: neo.nasa_jpl_url.clone(),
        })
    }
}

/// Flatten a feed into summaries.
///
/// Date groups are visited in payload order. With [`FeedTraversal::FirstDateOnly`] the
/// traversal stops after the first group.
pub fn simplify_feed(raw: &RawFeed, traversal: FeedTraversal) -> Result<Vec<NeoSummary>, NeoError> {
    let take = match traversal {
        FeedTraversal::FirstDateOnly => 1,
        FeedTraversal::AllDates => usize::MAX,
    };

    let mut summaries = Vec::new();
    for (date, objects) in raw.near_earth_objects.iter().take(take) {
        let objects = Vec::<RawNeo>::deserialize(objects)?;
        debug!("feed date {date}: {} objects", objects.len());
        for neo in &objects {
            summaries.push(NeoSummary::try_from(neo)?);
        }
    }
    Ok(summaries)
}

/// Parse a `YYYY-MM-DD` feed date.
pub fn parse_feed_date(date: &str) -> Result<NaiveDate, NeoError> {
    NaiveDate::parse_from_str(date.trim(), FEED_DATE_FORMAT)
        .map_err(|e| NeoError::InvalidDate(format!("{date}: {e}")))
}

/// Parse and order-check a feed date range.
pub fn parse_date_range(start: &str, end: &str) -> Result<(NaiveDate, NaiveDate), NeoError> {
    let start_date = parse_feed_date(start)?;
    let end_date = parse_feed_date(end)?;
    if start_date > end_date {
        return Err(NeoError::InvalidDateRange {
            start: start.to_string(),
            end: end.to_string(),
        });
    }
    Ok((start_date, end_date))
}
