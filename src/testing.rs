//! in-memory stand-ins for the network and ffmpeg, used by unit tests.

use std::cell::RefCell;
use std::collections::HashMap;

use nickdl_downloader::{RemuxEvent, RemuxRequest, Transcoder};

use crate::errors::{NickError, Result};
use crate::fetch::{Fetch, FetchRequest};

/// answers requests from a url → body map and records every request.
#[derive(Default)]
pub struct StubFetcher {
    bodies: HashMap<String, String>,
    requests: RefCell<Vec<FetchRequest>>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.bodies.insert(url.into(), body.into());
        self
    }

    pub fn requests(&self) -> Vec<FetchRequest> {
        self.requests.borrow().clone()
    }

    /// number of requests made to `url`.
    pub fn hits(&self, url: &str) -> usize {
        self.requests.borrow().iter().filter(|r| r.url == url).count()
    }
}

impl Fetch for StubFetcher {
    async fn get_text(&self, request: &FetchRequest) -> Result<String> {
        self.requests.borrow_mut().push(request.clone());

        self.bodies
            .get(&request.url)
            .cloned()
            .ok_or_else(|| NickError::HttpStatus {
                context: request.context.clone(),
                status: reqwest::StatusCode::NOT_FOUND,
                body: String::new(),
            })
    }
}

/// writes an empty output file instead of running ffmpeg.
#[derive(Default)]
pub struct StubTranscoder {
    requests: RefCell<Vec<RemuxRequest>>,
    fail_at: Option<usize>,
}

impl StubTranscoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// exits non-zero on the `n`th request (1-based) without writing output.
    pub fn failing_at(n: usize) -> Self {
        Self {
            fail_at: Some(n),
            ..Self::default()
        }
    }

    pub fn requests(&self) -> Vec<RemuxRequest> {
        self.requests.borrow().clone()
    }
}

impl Transcoder for StubTranscoder {
    async fn remux<F>(&self, request: &RemuxRequest, mut on_event: F) -> nickdl_downloader::Result<()>
    where
        F: FnMut(RemuxEvent),
    {
        self.requests.borrow_mut().push(request.clone());
        on_event(RemuxEvent::Started {
            input: request.input.clone(),
            output: request.output.clone(),
        });

        if self.fail_at == Some(self.requests.borrow().len()) {
            return Err(nickdl_downloader::DownloaderError::TranscodeFailed {
                program: "ffmpeg".to_string(),
                status: "exit status: 1".to_string(),
                output: request.output.display().to_string(),
                stderr: "Server returned 403 Forbidden".to_string(),
            });
        }

        tokio::fs::write(&request.output, b"")
            .await
            .map_err(|source| nickdl_downloader::DownloaderError::Io {
                context: format!("writing {}", request.output.display()),
                source,
            })?;

        on_event(RemuxEvent::Finished {
            elapsed: std::time::Duration::ZERO,
        });
        Ok(())
    }
}
