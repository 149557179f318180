use std::sync::LazyLock;

use regex::{NoExpand, Regex};
use tracing::debug;

use crate::errors::{CoreError, Result};

/// a single `,stream_<width>x<height>[_<bitrate>...]` tier token.
static TIER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r",stream_(\d+)x(\d+)(?:_\d+)*").expect("tier regex must compile")
});

/// the whole multiplexed tier segment, up to the next path separator.
static MULTI_TIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",stream_[^/]+").expect("multi-tier regex must compile"));

/// the renditions a media descriptor offers for one playable item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Renditions {
    /// one manifest url multiplexing several quality tiers.
    EncodedMultiTier(String),
    /// explicit rendition urls, ordered from lowest to highest quality.
    ExplicitList(Vec<String>),
}

impl Renditions {
    /// picks the encoding by looking for tier tokens in the last source.
    pub fn from_sources(sources: Vec<String>) -> Self {
        match sources.last() {
            Some(last) if TIER_RE.is_match(last) => Self::EncodedMultiTier(last.clone()),
            _ => Self::ExplicitList(sources),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamTier {
    pub width: u32,
    pub height: u32,
    /// the raw token, leading comma included.
    pub token: String,
}

/// lists every tier token embedded in `url`, in order of appearance.
pub fn stream_tiers(url: &str) -> Vec<StreamTier> {
    TIER_RE
        .captures_iter(url)
        .filter_map(|caps| {
            let width = caps.get(1)?.as_str().parse().ok()?;
            let height = caps.get(2)?.as_str().parse().ok()?;
            Some(StreamTier {
                width,
                height,
                token: caps.get(0)?.as_str().to_string(),
            })
        })
        .collect()
}

/// returns the source reference of the best available rendition.
///
/// multi-tier urls are rewritten to reference only the tallest tier (the first
/// one wins a tie); explicit lists yield their last entry.
pub fn resolve_best_rendition(renditions: &Renditions) -> Result<String> {
    match renditions {
        Renditions::EncodedMultiTier(url) => {
            let tiers = stream_tiers(url);
            let count = tiers.len();
            let best = tiers
                .into_iter()
                .reduce(|best, tier| if tier.height > best.height { tier } else { best })
                .ok_or_else(|| CoreError::NoStreamTier { url: url.clone() })?;

            debug!(
                tiers = count,
                width = best.width,
                height = best.height,
                "selected stream tier"
            );

            Ok(MULTI_TIER_RE
                .replace_all(url, NoExpand(&best.token))
                .into_owned())
        }
        Renditions::ExplicitList(urls) => {
            debug!(renditions = urls.len(), "selecting last rendition");
            urls.last().cloned().ok_or(CoreError::NoRenditionAvailable)
        }
    }
}
