use thiserror::Error;

use nickdl_core::CoreError;
use nickdl_downloader::DownloaderError;

pub type Result<T> = std::result::Result<T, NickError>;

#[derive(Debug, Error)]
pub enum NickError {
    #[error("failed building reqwest client: {0}")]
    BuildClient(#[source] reqwest::Error),

    #[error("HTTP request failed while {context}: {source}")]
    Request {
        context: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to read response body while {context}: {source}")]
    ResponseBody {
        context: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{context} returned {status}\nresponse text:\n{body}")]
    HttpStatus {
        context: String,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("failed to decode JSON while {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to parse XML while {context}: {source}")]
    Xml {
        context: String,
        #[source]
        source: quick_xml::Error,
    },

    #[error("{context}: response has no {field}")]
    MissingField {
        context: String,
        field: &'static str,
    },

    #[error("no episodes available for {series}")]
    NoEpisodesAvailable { series: String },

    #[error(transparent)]
    Stream(#[from] CoreError),

    #[error(transparent)]
    Download(#[from] DownloaderError),

    #[error("{0}")]
    Message(String),
}

impl NickError {
    /// conditions that are a normal outcome of browsing the catalog rather than a failure.
    pub fn is_expected(&self) -> bool {
        matches!(self, Self::NoEpisodesAvailable { .. })
    }

    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Request { .. } | Self::ResponseBody { .. } | Self::HttpStatus { .. }
        )
    }

    pub fn is_decode(&self) -> bool {
        matches!(
            self,
            Self::Json { .. } | Self::Xml { .. } | Self::MissingField { .. }
        )
    }

    pub fn is_no_rendition(&self) -> bool {
        matches!(self, Self::Stream(err) if err.is_no_rendition())
    }

    pub fn is_transcode_failure(&self) -> bool {
        matches!(
            self,
            Self::Download(DownloaderError::TranscodeFailed { .. } | DownloaderError::Spawn { .. })
        )
    }
}
