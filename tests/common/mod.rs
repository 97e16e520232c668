#![allow(dead_code)]

use approx::assert_relative_eq;
use nalgebra::Vector3;
use neo_orbit::constants::{AU, DPI, MU_SUN, RADEG};
use neo_orbit::orbital_elements::{ElementValue, OrbitalElementSet, OrbitalRecord};
use serde_json::json;

/// NeoWs orbital data of (99942) Apophis, orbit 223.
pub fn apophis_record() -> OrbitalRecord {
    serde_json::from_value(json!({
        "orbit_id": "223",
        "orbit_determination_date": "2024-06-13 06:07:20",
        "first_observation_date": "2004-03-15",
        "last_observation_date": "2024-04-25",
        "data_arc_in_days": 7346,
        "observations_used": 7854,
        "orbit_uncertainty": "0",
        "semi_major_axis": ".9227334294393402",
        "eccentricity": ".1911485633086034",
        "inclination": "3.336821441227358",
        "ascending_node_longitude": "203.9566430023637",
        "orbital_period": "323.7427604339693",
        "perihelion_distance": ".746355178854848",
        "perihelion_argument": "126.6746082296423",
        "aphelion_distance": "1.099111680023832",
        "mean_anomaly": "338.5537082349557",
        "mean_motion": "1.111997627809043",
        "equinox": "J2000",
        "orbit_class": {
            "orbit_class_type": "ATE",
            "orbit_class_description": "Near-Earth asteroid orbits similar to that of 2062 Aten",
            "orbit_class_range": "a (semi-major axis) < 1.0 AU; q (perihelion) > 0.983 AU"
        }
    }))
    .unwrap()
}

/// Record whose period is consistent with its semi-major axis under μ☉.
pub fn keplerian_record(
    orbit_id: &str,
    a_au: f64,
    e: f64,
    i: f64,
    node: f64,
    peri: f64,
) -> OrbitalRecord {
    let a_km = a_au * AU;
    let period_days = DPI * (a_km.powi(3) / MU_SUN).sqrt() / 86_400.0;
    OrbitalRecord {
        orbit_id: Some(orbit_id.to_string()),
        semi_major_axis: Some(ElementValue::Number(a_au)),
        eccentricity: Some(ElementValue::Number(e)),
        inclination: Some(ElementValue::Number(i)),
        ascending_node_longitude: Some(ElementValue::Number(node)),
        perihelion_argument: Some(ElementValue::Number(peri)),
        mean_anomaly: Some(ElementValue::Number(0.0)),
        orbital_period: Some(ElementValue::Text(period_days.to_string())),
        ..OrbitalRecord::default()
    }
}

pub fn assert_vector_close(actual: &Vector3<f64>, expected: &Vector3<f64>, max_relative: f64) {
    assert_relative_eq!(actual.x, expected.x, max_relative = max_relative);
    assert_relative_eq!(actual.y, expected.y, max_relative = max_relative);
    assert_relative_eq!(actual.z, expected.z, max_relative = max_relative);
}

pub fn assert_elements_close(
    actual: &OrbitalElementSet,
    expected: &OrbitalElementSet,
    epsilon: f64,
) {
    assert_eq!(actual.orbit_id, expected.orbit_id);
    assert_relative_eq!(
        actual.semi_major_axis,
        expected.semi_major_axis,
        max_relative = epsilon
    );
    assert_relative_eq!(actual.eccentricity, expected.eccentricity, epsilon = epsilon);
    assert_relative_eq!(actual.inclination, expected.inclination, epsilon = epsilon);
    assert_relative_eq!(
        actual.ascending_node_longitude,
        expected.ascending_node_longitude,
        epsilon = epsilon
    );
    assert_relative_eq!(
        actual.perihelion_argument,
        expected.perihelion_argument,
        epsilon = epsilon
    );
    assert_relative_eq!(actual.mean_anomaly, expected.mean_anomaly, epsilon = epsilon);
    assert_relative_eq!(
        actual.orbital_period,
        expected.orbital_period,
        max_relative = epsilon
    );
}

pub fn degrees(value: f64) -> f64 {
    value * RADEG
}
