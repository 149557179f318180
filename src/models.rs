use std::fmt;

use serde::{Deserialize, Serialize};

pub use nickdl_core::Renditions;

use crate::fetch::FetchRequest;

/// the only transcript format that is downloaded.
pub const ACCEPTED_CAPTION_FORMAT: &str = "ttml";
pub const CAPTION_EXTENSION: &str = "ttml";
pub const VIDEO_EXTENSION: &str = "mp4";

/// which family of catalog endpoints serves a region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogFamily {
    /// the international editorial api with its access/config indirection.
    #[default]
    Intl,
    /// the us promo-list feed.
    Playplex,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub name: String,
    pub lang: String,
    pub locale: String,
    #[serde(default)]
    pub family: CatalogFamily,
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// where a series' episode collection is fetched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EpisodesLink {
    /// absolute url of a playplex episode feed.
    Feed(String),
    /// intl series key for the content-collection endpoint.
    UrlKey(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Series {
    pub title: String,
    pub region: Region,
    /// `None` when the catalog exposes no episode collection for this series.
    pub episodes: Option<EpisodesLink>,
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Episode {
    pub title: String,
    /// opaque catalog identifier: an mgid for playplex, a content id for intl.
    pub id: String,
}

impl fmt::Display for Episode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// one playable segment of an episode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaItem {
    pub title: String,
    /// request for the item's mediagen descriptor.
    pub mediagen: FetchRequest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptDescriptor {
    pub format: String,
    pub src: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaDescriptor {
    pub renditions: Renditions,
    pub transcripts: Vec<TranscriptDescriptor>,
}

impl MediaDescriptor {
    /// first transcript in the accepted captioning format.
    pub fn caption(&self) -> Option<&TranscriptDescriptor> {
        self.transcripts
            .iter()
            .find(|t| t.format == ACCEPTED_CAPTION_FORMAT)
    }
}
