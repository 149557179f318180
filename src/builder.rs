use std::time::Duration;

use reqwest::Client as ReqwestClient;

use crate::client::NickClient;
use crate::errors::{NickError, Result};
use crate::fetch::HttpFetcher;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Linux; Android 10; SM-G973F) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/138.0.0.0 Mobile Safari/537.36";

pub struct NickBuilder {
    user_agent: String,
    timeout: Option<Duration>,
}

impl Default for NickBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl NickBuilder {
    /// creates a builder with an android user agent and no request timeout.
    pub fn new() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: None,
        }
    }

    pub fn user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = user_agent.to_string();
        self
    }

    /// sets a per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// builds a [`NickClient`] backed by reqwest.
    pub fn build(&self) -> Result<NickClient> {
        let mut builder = ReqwestClient::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(NickError::BuildClient)?;
        Ok(NickClient::with_fetcher(HttpFetcher::new(
            client,
            self.user_agent.clone(),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_with_custom_options() {
        let client = NickBuilder::new()
            .user_agent("nickdl-test")
            .timeout(Duration::from_secs(5))
            .build();
        assert!(client.is_ok());
    }
}
