//! # JPL Horizons ephemeris source
//!
//! Queries the Horizons file API for the heliocentric state of each reference planet at the
//! requested instant and extracts the position from the CSV vector table.
//!
//! Request shape (one request per body):
//!
//! ```text
//! COMMAND='399'  CENTER='500@10'  TABLE_TYPE='VECTORS'  VEC_TABLE=1
//! TLIST_TYPE=JD  TLIST=<JD TDB>   CSV_FORMAT=YES        OUT_UNITS=AU-D
//! REF_SYSTEM=ICRF  REF_PLANE=FRAME
//! ```
//!
//! The HTTP calls use the async `reqwest` client driven by a private current-thread `tokio`
//! runtime, so [`HorizonsEphemeris::body_positions`] must not be called from inside another
//! tokio runtime.
use std::sync::LazyLock;

use hifitime::Epoch;
use itertools::Itertools;
use log::{debug, info};
use nalgebra::Vector3;
use regex::Regex;
use reqwest::Client;

use crate::{
    config::NeoConfig,
    ephemeris::{BodyPosition, EphemerisSource, LengthUnit, REFERENCE_PLANETS},
    neo_errors::NeoError,
};

static DATA_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\$\$SOE\r?\n(.*?)\$\$EOE").expect("Horizons data regex is valid")
});

static HEADER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*(JDTDB\s*,.*?)\r?$").expect("Horizons header regex is valid")
});

/// One row of the Horizons vector table. Positions are in AU with `OUT_UNITS=AU-D`.
#[derive(Debug, serde::Deserialize, PartialEq)]
pub struct PosRecord {
    #[serde(rename = "JDTDB")]
    pub jd: f64,
    #[serde(rename = "CalendarDate(TDB)")]
    pub date: String,
    #[serde(rename = "X")]
    pub x: f64,
    #[serde(rename = "Y")]
    pub y: f64,
    #[serde(rename = "Z")]
    pub z: f64,
}

impl PosRecord {
    pub fn pos_vector(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }
}

fn jd_tlist(jd_list: &[f64]) -> String {
    jd_list.iter().join(",")
}

fn request_params(command: i32, jd_list: &[f64]) -> String {
    format!(
        "
!$$SOF
COMMAND='{command}'
OBJ_DATA='NO'
MAKE_EPHEM='YES'
TABLE_TYPE='VECTORS'
CENTER='500@10'
TLIST_TYPE=JD
TLIST={}
CSV_FORMAT=YES
REF_SYSTEM=ICRF
OUT_UNITS=AU-D
REF_PLANE=FRAME
VEC_TABLE=1
",
        jd_tlist(jd_list)
    )
}

fn malformed(reason: &str, response: &str) -> NeoError {
    let excerpt: String = response.chars().take(200).collect();
    NeoError::MalformedHorizonsResponse(format!("{reason}; response starts with: {excerpt}"))
}

/// Extract the vector table of a Horizons text response.
///
/// The header line (`JDTDB, Calendar Date (TDB), X, Y, Z,`) and the rows between `$$SOE` and
/// `$$EOE` are stripped of blanks and trailing commas, then decoded as CSV.
pub fn parse_vector_table(response: &str) -> Result<Vec<PosRecord>, NeoError> {
    let data = DATA_REGEX
        .captures(response)
        .and_then(|c| c.get(1))
        .ok_or_else(|| malformed("no $$SOE/$$EOE block", response))?
        .as_str();

    let header = HEADER_REGEX
        .captures(response)
        .and_then(|c| c.get(1))
        .ok_or_else(|| malformed("no JDTDB header line", response))?
        .as_str();

    let clean = |line: &str| line.replace([' ', '\r'], "").trim_end_matches(',').to_string();

    let csv_text = std::iter::once(clean(header))
        .chain(data.lines().map(clean).filter(|l| !l.is_empty()))
        .join("\n");

    let mut csv_reader = csv::Reader::from_reader(csv_text.as_bytes());
    let records = csv_reader
        .deserialize::<PosRecord>()
        .collect::<Result<Vec<_>, _>>()?;
    Ok(records)
}

/// Ephemeris source backed by the JPL Horizons API.
#[derive(Debug, Clone)]
pub struct HorizonsEphemeris {
    client: Client,
    url: String,
    bodies: Vec<(String, i32)>,
}

impl HorizonsEphemeris {
    /// Source for Earth, Venus and Mars using the endpoint and timeout of `config`.
    pub fn new(config: &NeoConfig) -> Result<Self, NeoError> {
        let client = Client::builder().timeout(config.http_timeout).build()?;
        Ok(HorizonsEphemeris {
            client,
            url: config.horizons_url.clone(),
            bodies: REFERENCE_PLANETS
                .iter()
                .map(|(name, id)| (name.to_string(), *id))
                .collect(),
        })
    }

    /// Replace the list of `(display name, NAIF id)` bodies to query.
    pub fn with_bodies(mut self, bodies: Vec<(String, i32)>) -> Self {
        self.bodies = bodies;
        self
    }

    async fn request_vector(&self, command: i32, jd_list: &[f64]) -> Result<String, NeoError> {
        let params = request_params(command, jd_list);
        let response = self
            .client
            .post(&self.url)
            .form(&[("format", "text"), ("input", params.as_str())])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(response)
    }

    async fn fetch_all(&self, jd: f64) -> Result<Vec<BodyPosition>, NeoError> {
        let mut positions = Vec::with_capacity(self.bodies.len());
        for (name, command) in &self.bodies {
            debug!("Horizons request for {name} ({command}) at JD {jd}");
            let response = self.request_vector(*command, &[jd]).await?;
            let record = parse_vector_table(&response)?
                .into_iter()
                .next()
                .ok_or_else(|| NeoError::MissingBody(name.clone()))?;
            positions.push(BodyPosition::new(
                name.clone(),
                record.pos_vector(),
                LengthUnit::AstronomicalUnit,
            ));
        }
        Ok(positions)
    }
}

impl EphemerisSource for HorizonsEphemeris {
    fn body_positions(&self, epoch: Epoch) -> Result<Vec<BodyPosition>, NeoError> {
        let jd = epoch.to_jde_tdb_days();
        info!("Fetching {} body positions from Horizons", self.bodies.len());

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(self.fetch_all(jd))
    }
}

#[cfg(test)]
mod horizons_test {
    use super::*;

    const FAKE_RESPONSE: &str = "
Target body name: Earth (399)                     {source: DE441}
Center body name: Sun (10)                        {source: DE441}
Reference frame : ICRF
            JDTDB,            Calendar Date (TDB),                      X,                      Y,                      Z,
**************************************************************************************************************************
$$SOE
2460310.500000000, A.D. 2024-Jan-01 00:00:00.0000, -1.756637922977121E-01,  8.877445521292818E-01,  3.848354498283767E-01,
2460311.500000000, A.D. 2024-Jan-02 00:00:00.0000, -1.928431227565136E-01,  8.847143210562270E-01,  3.835220125379081E-01,
$$EOE
**************************************************************************************************************************
";

    #[test]
    fn test_jd_list() {
        assert_eq!(jd_tlist(&[0.0, 1.5, 2.6]), "0,1.5,2.6");
    }

    #[test]
    fn test_request_params() {
        let params = request_params(499, &[2460672.5]);
        assert!(params.contains("COMMAND='499'"));
        assert!(params.contains("TLIST=2460672.5"));
        assert!(params.contains("CENTER='500@10'"));
        assert!(params.contains("OUT_UNITS=AU-D"));
    }

    #[test]
    fn test_parse_vector_table() {
        let records = parse_vector_table(FAKE_RESPONSE).unwrap();
        assert_eq!(
            records,
            vec![
                PosRecord {
                    jd: 2460310.5,
                    date: "A.D.2024-Jan-0100:00:00.0000".into(),
                    x: -0.1756637922977121,
                    y: 0.8877445521292818,
                    z: 0.3848354498283767
                },
                PosRecord {
                    jd: 2460311.5,
                    date: "A.D.2024-Jan-0200:00:00.0000".into(),
                    x: -0.1928431227565136,
                    y: 0.884714321056227,
                    z: 0.3835220125379081
                }
            ]
        );
        assert_eq!(
            records[0].pos_vector(),
            Vector3::new(-0.1756637922977121, 0.8877445521292818, 0.3848354498283767)
        );
    }

    #[test]
    fn test_error_response() {
        let response = "API ERROR: No ephemeris for target \"Foo\"";
        assert!(matches!(
            parse_vector_table(response),
            Err(NeoError::MalformedHorizonsResponse(_))
        ));
    }

    #[test]
    fn test_empty_table() {
        let response = "
            JDTDB,            Calendar Date (TDB),                      X,                      Y,                      Z,
$$SOE
$$EOE
";
        assert!(parse_vector_table(response).unwrap().is_empty());
    }

    #[test]
    fn test_default_bodies() {
        let source = HorizonsEphemeris::new(&NeoConfig::default()).unwrap();
        let names: Vec<&str> = source.bodies.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["Earth", "Venus", "Mars"]);
    }
}
