//! # Orbit plot stage
//!
//! Integration point of the crate: it takes the orbital records of a previously looked-up
//! object, propagates them, queries the two position collaborators and assembles the
//! [`Scene`].
//!
//! ```text
//! PlotRequest ──► most_frequent(selected_dates) ──► title label
//!      │
//!      └─► propagate_batch(orbital_data) ──► trajectories ─┐
//! EphemerisSource::body_positions(epoch) ──► bodies ───────┼──► Scene::assemble
//! TrackingSource::tracked_positions(epoch) ──► tracked ────┘
//! ```
//!
//! Input and numerical failures follow the [`BatchPolicy`]. Collaborator failures are always
//! fatal: a scene is never returned with a body missing.

use hifitime::Epoch;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::{
    ephemeris::EphemerisSource,
    mode_selector::most_frequent,
    neo_errors::NeoError,
    neows::ObjectDetail,
    orbital_elements::OrbitalRecord,
    propagation::{propagate_batch, BatchPolicy, PropagationFailure, PropagationSettings},
    scene::Scene,
    tracking::TrackingSource,
};

/// Everything the plot stage needs from the caller.
///
/// `orbital_data` is the object detail kept by the caller between the lookup and the plot
/// requests. `selected_dates` is the date selection signal of the frontend, possibly repeated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlotRequest {
    pub orbital_data: Vec<OrbitalRecord>,
    #[serde(default)]
    pub selected_dates: Vec<String>,
}

impl PlotRequest {
    pub fn new(orbital_data: Vec<OrbitalRecord>, selected_dates: Vec<String>) -> Self {
        PlotRequest {
            orbital_data,
            selected_dates,
        }
    }

    /// Request plotting the orbit of a looked-up object.
    pub fn from_detail(detail: &ObjectDetail, selected_dates: Vec<String>) -> Self {
        PlotRequest::new(detail.orbital_data.clone(), selected_dates)
    }

    /// Display label: the most frequent selected date.
    pub fn label(&self) -> Option<&str> {
        most_frequent(&self.selected_dates).map(String::as_str)
    }
}

/// Scene plus the records skipped under [`BatchPolicy::SkipFailed`].
#[derive(Debug)]
pub struct PlotOutcome {
    pub scene: Scene,
    pub failures: Vec<PropagationFailure>,
}

/// Build the scene of `request` with body and tracked positions taken at `epoch`.
///
/// Arguments
/// ---------
/// * `request`: orbital records and date selection.
/// * `epoch`: instant at which the collaborators are queried.
/// * `ephemeris`: reference body positions provider.
/// * `tracking`: tracked object positions provider.
/// * `settings`: sampling parameters.
/// * `policy`: handling of records that cannot be propagated.
///
/// Return
/// ------
/// * The assembled scene, or the first error of the propagation (under
///   [`BatchPolicy::AbortOnError`]) or of a collaborator.
pub fn plot_orbit_at(
    request: &PlotRequest,
    epoch: Epoch,
    ephemeris: &dyn EphemerisSource,
    tracking: &dyn TrackingSource,
    settings: &PropagationSettings,
    policy: BatchPolicy,
) -> Result<PlotOutcome, NeoError> {
    let label = request.label();
    info!(
        "Plotting {} orbit(s) at {epoch}, label {label:?}",
        request.orbital_data.len()
    );

    let batch = propagate_batch(&request.orbital_data, settings, policy)?;
    if !batch.failures.is_empty() {
        warn!("Orbits not plotted: {:?}", batch.failed_orbit_ids());
    }

    let bodies = ephemeris.body_positions(epoch)?;
    let tracked = tracking.tracked_positions(epoch)?;

    let scene = Scene::assemble(&batch.trajectories, &bodies, &tracked, label);
    Ok(PlotOutcome {
        scene,
        failures: batch.failures,
    })
}

/// [`plot_orbit_at`] with the collaborators queried at the current instant.
pub fn plot_orbit(
    request: &PlotRequest,
    ephemeris: &dyn EphemerisSource,
    tracking: &dyn TrackingSource,
    settings: &PropagationSettings,
    policy: BatchPolicy,
) -> Result<PlotOutcome, NeoError> {
    let now = Epoch::now()?;
    plot_orbit_at(request, now, ephemeris, tracking, settings, policy)
}

#[cfg(test)]
mod orbit_plot_test {
    use super::*;
    use crate::{
        ephemeris::{BodyPosition, FixedEphemeris, LengthUnit},
        neows::lookup::lookup_test::apophis_detail,
        orbital_elements::orbital_elements_test::apophis_record,
        scene::TraceMode,
        tracking::{JsonTracking, TrackedPositions},
    };
    use nalgebra::Vector3;

    struct Unreachable;

    impl EphemerisSource for Unreachable {
        fn body_positions(&self, _epoch: Epoch) -> Result<Vec<BodyPosition>, NeoError> {
            Err(NeoError::MissingBody("Earth".into()))
        }
    }

    impl TrackingSource for Unreachable {
        fn tracked_positions(&self, _epoch: Epoch) -> Result<TrackedPositions, NeoError> {
            Err(NeoError::MalformedNeoPayload("tracking feed down".into()))
        }
    }

    fn planets() -> FixedEphemeris {
        FixedEphemeris::new(vec![
            BodyPosition::new("Earth", Vector3::x(), LengthUnit::AstronomicalUnit),
            BodyPosition::new("Venus", Vector3::y() * 0.72, LengthUnit::AstronomicalUnit),
            BodyPosition::new("Mars", Vector3::x() * -1.52, LengthUnit::AstronomicalUnit),
        ])
    }

    fn satellites() -> JsonTracking {
        JsonTracking::from_json(r#"{"ISS (ZARYA)": [6778.0, 0.0, 0.0]}"#).unwrap()
    }

    fn epoch() -> Epoch {
        Epoch::from_gregorian_utc_hms(2024, 1, 1, 0, 0, 0)
    }

    #[test]
    fn test_plot_from_detail() {
        let request = PlotRequest::from_detail(
            &apophis_detail(),
            vec!["2029-04-13".into(), "2013-01-09".into(), "2029-04-13".into()],
        );
        let outcome = plot_orbit_at(
            &request,
            epoch(),
            &planets(),
            &satellites(),
            &PropagationSettings::default(),
            BatchPolicy::default(),
        )
        .unwrap();

        let scene = outcome.scene;
        assert!(outcome.failures.is_empty());
        assert_eq!(scene.traces.len(), 1 + 1 + 3 + 1);

        let orbit = scene.trace("Orbit Path 223").unwrap();
        assert_eq!(orbit.mode, TraceMode::Lines);
        assert_eq!(orbit.len(), 500);
        assert!(scene.trace("ISS (ZARYA)").is_some());
        assert_eq!(
            scene.layout.title.as_deref(),
            Some("Close approach 2029-04-13")
        );
    }

    #[test]
    fn test_bad_record_aborts_by_default() {
        let mut broken = apophis_record();
        broken.orbit_id = Some("broken".into());
        broken.eccentricity = None;
        let request = PlotRequest::new(vec![apophis_record(), broken], vec![]);

        let result = plot_orbit_at(
            &request,
            epoch(),
            &planets(),
            &satellites(),
            &PropagationSettings::default(),
            BatchPolicy::AbortOnError,
        );
        assert_eq!(
            result.unwrap_err(),
            NeoError::MissingElement {
                orbit_id: "broken".into(),
                element: "eccentricity".into()
            }
        );
    }

    #[test]
    fn test_bad_record_skipped() {
        let mut broken = apophis_record();
        broken.orbit_id = Some("broken".into());
        broken.eccentricity = None;
        let request = PlotRequest::new(vec![broken, apophis_record()], vec![]);

        let outcome = plot_orbit_at(
            &request,
            epoch(),
            &planets(),
            &satellites(),
            &PropagationSettings::default(),
            BatchPolicy::SkipFailed,
        )
        .unwrap();
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].orbit_id, "broken");
        assert_eq!(outcome.scene.orbit_traces().count(), 1);
        assert!(outcome.scene.layout.title.is_none());
    }

    #[test]
    fn test_collaborator_failures_are_fatal() {
        let request = PlotRequest::new(vec![apophis_record()], vec![]);
        let settings = PropagationSettings::default();

        assert_eq!(
            plot_orbit_at(
                &request,
                epoch(),
                &Unreachable,
                &satellites(),
                &settings,
                BatchPolicy::SkipFailed
            )
            .unwrap_err(),
            NeoError::MissingBody("Earth".into())
        );
        assert!(matches!(
            plot_orbit_at(
                &request,
                epoch(),
                &planets(),
                &Unreachable,
                &settings,
                BatchPolicy::SkipFailed
            ),
            Err(NeoError::MalformedNeoPayload(_))
        ));
    }

    #[test]
    fn test_request_label() {
        let request = PlotRequest::new(
            vec![],
            vec!["2024-01-01".into(), "2024-01-02".into(), "2024-01-01".into()],
        );
        assert_eq!(request.label(), Some("2024-01-01"));
        assert_eq!(PlotRequest::default().label(), None);
    }
}
