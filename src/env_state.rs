//! # Network environment state
//!
//! This module defines [`NeoEnv`], the **shared environment object** handed to every network
//! collaborator of the crate. It bundles:
//!
//! - A persistent blocking **HTTP client** ([`ureq::Agent`]) with a global timeout.
//! - The [`NeoConfig`] holding endpoints and the NASA API key.
//!
//! ```text
//! NeoEnv
//! ├── http_client (ureq::Agent)
//! └── config      (NeoConfig)
//! ```
//!
//! The pure orbit math never sees this object: only the NeoWs client and the collaborator
//! sources in [`crate::ephemeris`] and [`crate::tracking`] take it. Cloning is cheap, the agent
//! shares its connection pool between clones.
use std::convert::TryFrom;
use std::fmt::Debug;

use log::debug;
use ureq::{
    http::{self, Uri},
    Agent,
};

use crate::{config::NeoConfig, neo_errors::NeoError};

#[derive(Debug, Clone)]
pub struct NeoEnv {
    pub http_client: Agent,
    pub config: NeoConfig,
}

impl Default for NeoEnv {
    fn default() -> Self {
        Self::new(NeoConfig::default())
    }
}

impl NeoEnv {
    /// Create a new environment with an HTTP agent honouring `config.http_timeout`.
    pub fn new(config: NeoConfig) -> Self {
        let agent_config = Agent::config_builder()
            .timeout_global(Some(config.http_timeout))
            .build();
        let agent: Agent = agent_config.into();

        NeoEnv {
            http_client: agent,
            config,
        }
    }

    /// Environment configured from the process environment variables.
    pub fn from_env() -> Result<Self, NeoError> {
        Ok(Self::new(NeoConfig::from_env()?))
    }

    /// GET a URL and return the response body as text.
    ///
    /// Non-2xx statuses, transport failures and body read failures all surface as
    /// [`NeoError::UreqHttpError`].
    pub(crate) fn get_from_url<U>(&self, url: U) -> Result<String, NeoError>
    where
        U: Debug,
        Uri: TryFrom<U>,
        <Uri as TryFrom<U>>::Error: Into<http::Error>,
    {
        debug!("GET {url:?}");
        let body = self
            .http_client
            .get(url)
            .call()?
            .body_mut()
            .read_to_string()?;
        Ok(body)
    }

    /// GET a URL with query parameters and return the response body as text.
    pub(crate) fn get_with_query(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<String, NeoError> {
        debug!("GET {url} ({} query parameters)", query.len());
        let mut request = self
            .http_client
            .get(url)
            .header("accept", "application/json");
        for (key, value) in query {
            request = request.query(*key, *value);
        }
        let body = request.call()?.body_mut().read_to_string()?;
        Ok(body)
    }
}
