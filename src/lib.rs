pub mod builder;
pub mod client;
pub mod errors;
pub mod feed;
pub mod fetch;
pub mod models;
pub mod pipeline;

#[cfg(test)]
pub(crate) mod testing;

pub use builder::*;
pub use client::*;
pub use errors::*;
pub use fetch::{Fetch, FetchRequest, HttpFetcher};
pub use models::*;
pub use pipeline::*;

pub mod prelude {
    pub use crate::builder::NickBuilder;
    pub use crate::client::NickClient;
    pub use crate::errors::{NickError, Result};
    pub use crate::fetch::Fetch;
    pub use crate::models::{CatalogFamily, Episode, MediaItem, Region, Series};
    pub use crate::pipeline::{
        DownloadEvent, DownloadOptions, DownloadSummary, download_episode, episode_directory,
        item_base,
    };
    pub use nickdl_downloader::{FfmpegTranscoder, Transcoder};
}
