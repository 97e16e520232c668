//! # Renderable 3D scene
//!
//! The [`Scene`] is the structured output handed to the rendering collaborator. Its shape mirrors
//! a 3D scatter figure description:
//!
//! ```text
//! Scene
//! ├── traces: [Trace]
//! │     ├── "Orbit Path <orbit_id>"  mode = lines,   500 samples
//! │     ├── "Sun"                    mode = markers, origin, size 8, red
//! │     ├── "Earth" / "Venus" / …    mode = markers, size 5, orange
//! │     └── tracked objects          mode = markers, size 3, blue
//! └── layout
//!       ├── title        (selected close-approach date, optional)
//!       └── scene axes   X (km) / Y (km) / Z (km), aspectmode = "data"
//! ```
//!
//! Everything is plain serde data: [`Scene::to_value`] produces the nested map/array form and
//! [`Scene::from_value`] reads it back without loss.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    ephemeris::BodyPosition, neo_errors::NeoError, propagation::Trajectory,
    tracking::TrackedPositions,
};

pub const SUN_NAME: &str = "Sun";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceMode {
    Lines,
    Markers,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub size: u32,
    pub color: String,
}

/// One named series of 3D points, stored column-wise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub name: String,
    pub mode: TraceMode,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
}

impl Trace {
    /// Line trace of a propagated orbit.
    pub fn orbit_path(trajectory: &Trajectory) -> Self {
        let (x, y, z) = trajectory.columns();
        Trace {
            name: format!("Orbit Path {}", trajectory.orbit_id),
            mode: TraceMode::Lines,
            x,
            y,
            z,
            marker: None,
        }
    }

    /// Single-point marker trace.
    pub fn marker(name: impl Into<String>, position: Vector3<f64>, size: u32, color: &str) -> Self {
        Trace {
            name: name.into(),
            mode: TraceMode::Markers,
            x: vec![position.x],
            y: vec![position.y],
            z: vec![position.z],
            marker: Some(Marker {
                size,
                color: color.to_string(),
            }),
        }
    }

    /// Number of points of the trace.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneAxes {
    pub xaxis_title: String,
    pub yaxis_title: String,
    pub zaxis_title: String,
    pub aspectmode: String,
}

impl Default for SceneAxes {
    fn default() -> Self {
        SceneAxes {
            xaxis_title: "X (km)".into(),
            yaxis_title: "Y (km)".into(),
            zaxis_title: "Z (km)".into(),
            aspectmode: "data".into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub scene: SceneAxes,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub traces: Vec<Trace>,
    pub layout: Layout,
}

impl Scene {
    /// Assemble the scene from already computed and fetched data.
    ///
    /// Trace order: orbit paths (input order), the Sun at the origin, reference bodies
    /// (source order, converted to km), tracked objects (identifier order).
    ///
    /// Arguments
    /// ---------
    /// * `trajectories`: propagated orbits, km.
    /// * `bodies`: reference body positions from the ephemeris source.
    /// * `tracked`: tracked object positions from the tracking source.
    /// * `label`: optional display label, becomes the layout title.
    pub fn assemble(
        trajectories: &[Trajectory],
        bodies: &[BodyPosition],
        tracked: &TrackedPositions,
        label: Option<&str>,
    ) -> Self {
        let mut traces: Vec<Trace> = trajectories.iter().map(Trace::orbit_path).collect();

        traces.push(Trace::marker(SUN_NAME, Vector3::zeros(), 8, "red"));
        traces.extend(
            bodies
                .iter()
                .filter(|b| b.name != SUN_NAME)
                .map(|b| Trace::marker(b.name.clone(), b.to_km(), 5, "orange")),
        );
        traces.extend(
            tracked
                .iter()
                .map(|(id, position)| Trace::marker(id.clone(), *position, 3, "blue")),
        );

        Scene {
            traces,
            layout: Layout {
                title: label.map(|date| format!("Close approach {date}")),
                scene: SceneAxes::default(),
            },
        }
    }

    /// Traces drawn as lines, i.e. the propagated orbits.
    pub fn orbit_traces(&self) -> impl Iterator<Item = &Trace> {
        self.traces.iter().filter(|t| t.mode == TraceMode::Lines)
    }

    pub fn trace(&self, name: &str) -> Option<&Trace> {
        self.traces.iter().find(|t| t.name == name)
    }

    /// Plain nested map/array representation.
    pub fn to_value(&self) -> Result<Value, NeoError> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn from_value(value: Value) -> Result<Self, NeoError> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_json_string(&self) -> Result<String, NeoError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod scene_test {
    use super::*;
    use crate::ephemeris::LengthUnit;
    use crate::constants::AU;

    fn sample_scene() -> Scene {
        let trajectory = Trajectory {
            orbit_id: "42".into(),
            points: vec![
                Vector3::new(1.0e8, 2.5e7, -3.0e6),
                Vector3::new(0.1 + 0.2, -1.0 / 3.0, 6.02e23),
            ],
        };
        let bodies = vec![BodyPosition::new(
            "Earth",
            Vector3::new(1.0, 0.0, 0.0),
            LengthUnit::AstronomicalUnit,
        )];
        let mut tracked = TrackedPositions::new();
        tracked.insert("ISS".into(), Vector3::new(6778.0, 0.0, 0.0));
        Scene::assemble(&[trajectory], &bodies, &tracked, Some("2024-01-01"))
    }

    #[test]
    fn test_assemble() {
        let scene = sample_scene();
        let names: Vec<&str> = scene.traces.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Orbit Path 42", "Sun", "Earth", "ISS"]);

        let sun = scene.trace("Sun").unwrap();
        assert_eq!((sun.x[0], sun.y[0], sun.z[0]), (0.0, 0.0, 0.0));
        assert_eq!(sun.marker.as_ref().unwrap().size, 8);

        let earth = scene.trace("Earth").unwrap();
        assert_eq!(earth.x, vec![AU]);
        assert_eq!(earth.marker.as_ref().unwrap().color, "orange");

        assert_eq!(scene.orbit_traces().count(), 1);
        assert_eq!(scene.layout.title.as_deref(), Some("Close approach 2024-01-01"));
        assert_eq!(scene.layout.scene.aspectmode, "data");
    }

    #[test]
    fn test_value_round_trip() {
        let scene = sample_scene();
        let value = scene.to_value().unwrap();
        assert_eq!(value["traces"][0]["mode"], "lines");
        assert_eq!(value["layout"]["scene"]["xaxis_title"], "X (km)");

        let back = Scene::from_value(value).unwrap();
        assert_eq!(back, scene);
    }

    #[test]
    fn test_string_round_trip_is_bit_exact() {
        let scene = sample_scene();
        let text = scene.to_json_string().unwrap();
        let back: Scene = serde_json::from_str(&text).unwrap();
        for (a, b) in scene.traces[0].x.iter().zip(&back.traces[0].x) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
        assert_eq!(back, scene);
    }

    #[test]
    fn test_no_title_without_label() {
        let scene = Scene::assemble(&[], &[], &TrackedPositions::new(), None);
        assert_eq!(scene.traces.len(), 1);
        assert!(scene.layout.title.is_none());
        assert!(scene.to_value().unwrap()["layout"].get("title").is_none());
    }
}
