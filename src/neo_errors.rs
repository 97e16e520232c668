use thiserror::Error;

#[derive(Error, Debug)]
pub enum NeoError {
    #[error("Orbit {orbit_id}: missing orbital element '{element}'")]
    MissingElement { orbit_id: String, element: String },

    #[error("Orbit {orbit_id}: orbital element '{element}' is not numeric: {value}")]
    NonNumericElement {
        orbit_id: String,
        element: String,
        value: String,
    },

    #[error("Orbit {orbit_id}: orbital element '{element}' out of range: {reason}")]
    InvalidElement {
        orbit_id: String,
        element: String,
        reason: String,
    },

    #[error("Orbit {orbit_id}: non-finite position at sample {sample}")]
    NonFiniteState { orbit_id: String, sample: usize },

    #[error("Invalid configuration value for {key}: {value}")]
    InvalidConfig { key: String, value: String },

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: String, end: String },

    #[error("HTTP ureq error: {0}")]
    UreqHttpError(#[from] ureq::Error),

    #[error("HTTP reqwest error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("Unable to perform I/O operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON decoding error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("CSV decoding error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Time scale error: {0}")]
    TimeError(#[from] hifitime::HifitimeError),

    #[error("Malformed JPL Horizons response: {0}")]
    MalformedHorizonsResponse(String),

    #[error("Malformed NeoWs payload: {0}")]
    MalformedNeoPayload(String),

    #[error("TLE error for {name}: {reason}")]
    TleError { name: String, reason: String },

    #[error("Ephemeris source returned no position for body {0}")]
    MissingBody(String),
}

impl PartialEq for NeoError {
    fn eq(&self, other: &Self) -> bool {
        use NeoError::*;
        match (self, other) {
            (
                MissingElement {
                    orbit_id: a,
                    element: b,
                },
                MissingElement {
                    orbit_id: c,
                    element: d,
                },
            ) => a == c && b == d,
            (
                NonNumericElement {
                    orbit_id: a,
                    element: b,
                    value: v1,
                },
                NonNumericElement {
                    orbit_id: c,
                    element: d,
                    value: v2,
                },
            ) => a == c && b == d && v1 == v2,
            (
                InvalidElement {
                    orbit_id: a,
                    element: b,
                    ..
                },
                InvalidElement {
                    orbit_id: c,
                    element: d,
                    ..
                },
            ) => a == c && b == d,
            (
                NonFiniteState {
                    orbit_id: a,
                    sample: s1,
                },
                NonFiniteState {
                    orbit_id: b,
                    sample: s2,
                },
            ) => a == b && s1 == s2,
            (InvalidConfig { key: a, value: b }, InvalidConfig { key: c, value: d }) => {
                a == c && b == d
            }
            (InvalidDate(a), InvalidDate(b)) => a == b,
            (
                InvalidDateRange { start: a, end: b },
                InvalidDateRange { start: c, end: d },
            ) => a == c && b == d,

            // Not comparable: equal when the variant matches
            (UreqHttpError(_), UreqHttpError(_)) => true,
            (ReqwestError(_), ReqwestError(_)) => true,
            (IoError(_), IoError(_)) => true,
            (JsonError(_), JsonError(_)) => true,
            (CsvError(_), CsvError(_)) => true,
            (TimeError(_), TimeError(_)) => true,

            (MalformedHorizonsResponse(a), MalformedHorizonsResponse(b)) => a == b,
            (MalformedNeoPayload(a), MalformedNeoPayload(b)) => a == b,
            (TleError { name: a, .. }, TleError { name: b, .. }) => a == b,
            (MissingBody(a), MissingBody(b)) => a == b,

            _ => false,
        }
    }
}
