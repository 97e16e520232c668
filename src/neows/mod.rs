//! # NASA NeoWs client
//!
//! Thin blocking client over the two NeoWs endpoints used by the application:
//!
//! | Operation                   | Endpoint                        | Result                    |
//! |-----------------------------|---------------------------------|---------------------------|
//! | [`NeoWsClient::feed`]       | `GET {base}/feed`               | `Vec<`[`NeoSummary`]`>`   |
//! | [`NeoWsClient::lookup`]     | `GET {base}/neo/{id}`           | [`ObjectDetail`]          |
//!
//! Requests go through the shared [`NeoEnv`] HTTP agent; the API key and base URL come from its
//! [`NeoConfig`](crate::config::NeoConfig). Payload reshaping lives in [`feed`] and [`lookup`]
//! and does not touch the network, so it is tested on recorded payloads.

pub mod feed;
pub mod lookup;

use log::info;

use crate::{env_state::NeoEnv, neo_errors::NeoError};

pub use feed::{FeedTraversal, NeoSummary};
pub use lookup::{ApproachSummary, ObjectDetail};

#[derive(Debug, Clone)]
pub struct NeoWsClient {
    env: NeoEnv,
    traversal: FeedTraversal,
}

impl NeoWsClient {
    pub fn new(env: NeoEnv) -> Self {
        NeoWsClient {
            env,
            traversal: FeedTraversal::default(),
        }
    }

    /// Choose how many date groups of a feed are summarized.
    pub fn with_traversal(mut self, traversal: FeedTraversal) -> Self {
        self.traversal = traversal;
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.env.config.neows_base_url)
    }

    /// Close approaches between `start` and `end` (inclusive, `YYYY-MM-DD`).
    ///
    /// The dates are validated before any request is sent.
    pub fn feed(&self, start: &str, end: &str) -> Result<Vec<NeoSummary>, NeoError> {
        let (start_date, end_date) = feed::parse_date_range(start, end)?;
        let start = start_date.format(feed::FEED_DATE_FORMAT).to_string();
        let end = end_date.format(feed::FEED_DATE_FORMAT).to_string();

        let body = self.env.get_with_query(
            &self.endpoint("feed"),
            &[
                ("start_date", start.as_str()),
                ("end_date", end.as_str()),
                ("api_key", self.env.config.api_key.as_str()),
            ],
        )?;
        let raw: feed::RawFeed = serde_json::from_str(&body)?;
        let summaries = feed::simplify_feed(&raw, self.traversal)?;
        info!(
            "NeoWs feed {start} → {end}: {} objects summarized",
            summaries.len()
        );
        Ok(summaries)
    }

    /// Orbital data and close approaches of one object.
    pub fn lookup(&self, object_id: &str) -> Result<ObjectDetail, NeoError> {
        let object_id = object_id.trim();
        if object_id.is_empty() {
            return Err(NeoError::MalformedNeoPayload(
                "an object identifier is required".into(),
            ));
        }

        let body = self.env.get_with_query(
            &self.endpoint(&format!("neo/{object_id}")),
            &[("api_key", self.env.config.api_key.as_str())],
        )?;
        let raw: lookup::RawObject = serde_json::from_str(&body)?;
        let detail = ObjectDetail::try_from(raw)?;
        info!(
            "NeoWs lookup {object_id}: {} close approaches",
            detail.sorted_approaches.len()
        );
        Ok(detail)
    }
}

#[cfg(test)]
mod neows_test {
    use super::*;
    use crate::config::NeoConfig;

    fn client() -> NeoWsClient {
        let config = NeoConfig {
            neows_base_url: "http://127.0.0.1:9/neo/rest/v1".into(),
            ..NeoConfig::default()
        };
        NeoWsClient::new(NeoEnv::new(config))
    }

    #[test]
    fn test_endpoint() {
        assert_eq!(
            client().endpoint("neo/2099942"),
            "http://127.0.0.1:9/neo/rest/v1/neo/2099942"
        );
    }

    #[test]
    fn test_feed_rejects_dates_before_request() {
        assert!(matches!(
            client().feed("2024-13-01", "2024-01-02"),
            Err(NeoError::InvalidDate(_))
        ));
        assert!(matches!(
            client().feed("2024-01-05", "2024-01-02"),
            Err(NeoError::InvalidDateRange { .. })
        ));
    }

    #[test]
    fn test_lookup_requires_id() {
        assert!(matches!(
            client().lookup("  "),
            Err(NeoError::MalformedNeoPayload(_))
        ));
    }

    #[test]
    fn test_default_traversal() {
        assert_eq!(client().traversal, FeedTraversal::FirstDateOnly);
        let all = client().with_traversal(FeedTraversal::AllDates);
        assert_eq!(all.traversal, FeedTraversal::AllDates);
    }
}
