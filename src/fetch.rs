use reqwest::Client as ReqwestClient;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, REFERER, USER_AGENT};
use tracing::debug;

use crate::errors::{NickError, Result};

/// a GET request against one of the catalog endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: String,
    pub query: Vec<(String, String)>,
    pub referer: Option<String>,
    /// what the request is for, used in error messages.
    pub context: String,
}

impl FetchRequest {
    pub fn new(url: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            query: Vec::new(),
            referer: None,
            context: context.into(),
        }
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = Some(referer.into());
        self
    }

    /// value of the first query pair named `key`.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// the transport seam of the catalog client.
///
/// bodies are returned as text so JSON and XML decoding stay with the caller.
pub trait Fetch {
    async fn get_text(&self, request: &FetchRequest) -> Result<String>;
}

pub struct HttpFetcher {
    client: ReqwestClient,
    user_agent: String,
}

impl HttpFetcher {
    pub fn new(client: ReqwestClient, user_agent: impl Into<String>) -> Self {
        Self {
            client,
            user_agent: user_agent.into(),
        }
    }

    fn headers(&self, referer: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/json, application/xml;q=0.9, */*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        if let Ok(v) = HeaderValue::from_str(&self.user_agent) {
            headers.insert(USER_AGENT, v);
        }

        if let Some(referer) = referer
            && let Ok(v) = HeaderValue::from_str(referer)
        {
            headers.insert(REFERER, v);
        }

        headers
    }

    async fn ensure_success(response: reqwest::Response, context: &str) -> Result<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<failed to read error body>".to_string());

        Err(NickError::HttpStatus {
            context: context.to_string(),
            status,
            body,
        })
    }
}

impl Fetch for HttpFetcher {
    async fn get_text(&self, request: &FetchRequest) -> Result<String> {
        debug!(url = %request.url, query = ?request.query, "GET");

        let resp = self
            .client
            .get(&request.url)
            .query(&request.query)
            .headers(self.headers(request.referer.as_deref()))
            .send()
            .await
            .map_err(|source| NickError::Request {
                context: request.context.clone(),
                source,
            })?;

        let resp = Self::ensure_success(resp, &request.context).await?;

        resp.text().await.map_err(|source| NickError::ResponseBody {
            context: request.context.clone(),
            source,
        })
    }
}
