//! per-episode download workflow: directory, items, captions, remux.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use nickdl_core::{resolve_best_rendition, sanitize, strip_invalid};
use nickdl_downloader::{RemuxEvent, RemuxRequest, Transcoder, ensure_dir, file_exists, save_text};

use crate::client::NickClient;
use crate::errors::Result;
use crate::fetch::Fetch;
use crate::models::{CAPTION_EXTENSION, Episode, Series, VIDEO_EXTENSION};

#[derive(Debug, Clone)]
pub struct DownloadOptions {
    /// directory the `{series}/{episode}` tree is created under.
    pub root: PathBuf,
    /// re-download items whose video file already exists.
    pub overwrite: bool,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            overwrite: false,
        }
    }
}

/// progress of [`download_episode`]; `index` is 1-based.
#[derive(Debug, Clone, PartialEq)]
pub enum DownloadEvent {
    DirectoryCreated {
        path: PathBuf,
    },
    ItemsResolved {
        count: usize,
    },
    ItemSkipped {
        index: usize,
        total: usize,
        output: PathBuf,
    },
    SubtitleSaved {
        path: PathBuf,
    },
    ItemStarted {
        index: usize,
        total: usize,
        title: String,
        output: PathBuf,
    },
    Remux(RemuxEvent),
    ItemFinished {
        index: usize,
        total: usize,
        output: PathBuf,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadSummary {
    pub directory: PathBuf,
    pub downloaded: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

/// `{root}/{series}/{episode}` with both titles made filesystem safe.
pub fn episode_directory(root: &Path, series: &Series, episode: &Episode) -> PathBuf {
    root.join(strip_invalid(&series.title))
        .join(sanitize(&episode.title, false))
}

/// output path of an item without extension.
pub fn item_base(directory: &Path, title: &str) -> PathBuf {
    directory.join(sanitize(title, true))
}

/// appends `.ext`; titles may contain dots that `set_extension` would eat.
fn with_extension(base: &Path, ext: &str) -> PathBuf {
    let mut path = base.as_os_str().to_os_string();
    path.push(".");
    path.push(ext);
    PathBuf::from(path)
}

/// first of `base`, `base (2)`, `base (3)`, ... not claimed yet.
fn claim_base(base: PathBuf, claimed: &mut HashSet<PathBuf>) -> PathBuf {
    let mut candidate = base.clone();
    let mut n = 2;
    while claimed.contains(&candidate) {
        let mut name = base.as_os_str().to_os_string();
        name.push(format!(" ({n})"));
        candidate = PathBuf::from(name);
        n += 1;
    }
    claimed.insert(candidate.clone());
    candidate
}

/// downloads every playable item of `episode`.
///
/// items run one after another and the first failure aborts the rest;
/// files written for earlier items stay on disk. items whose names collide
/// within the episode get ` (2)`, ` (3)`, ... appended.
pub async fn download_episode<F, T, E>(
    client: &NickClient<F>,
    transcoder: &T,
    series: &Series,
    episode: &Episode,
    options: &DownloadOptions,
    mut on_event: E,
) -> Result<DownloadSummary>
where
    F: Fetch,
    T: Transcoder,
    E: FnMut(DownloadEvent),
{
    let directory = episode_directory(&options.root, series, episode);
    if ensure_dir(&directory).await? {
        debug!(path = %directory.display(), "created episode directory");
        on_event(DownloadEvent::DirectoryCreated {
            path: directory.clone(),
        });
    }

    let items = client.media_items(series, episode).await?;
    let total = items.len();
    on_event(DownloadEvent::ItemsResolved { count: total });

    let mut summary = DownloadSummary {
        directory: directory.clone(),
        ..DownloadSummary::default()
    };

    let mut claimed = HashSet::new();

    for (i, item) in items.iter().enumerate() {
        let index = i + 1;
        let wanted = item_base(&directory, &item.title);
        let base = claim_base(wanted.clone(), &mut claimed);
        if base != wanted {
            warn!(title = %item.title, output = %base.display(), "item name already used in this episode");
        }
        let output = with_extension(&base, VIDEO_EXTENSION);

        if !options.overwrite && file_exists(&output).await? {
            info!(output = %output.display(), "already downloaded, skipping");
            on_event(DownloadEvent::ItemSkipped {
                index,
                total,
                output: output.clone(),
            });
            summary.skipped.push(output);
            continue;
        }

        let descriptor = client.media_descriptor(item).await?;
        // resolve before writing anything so an unusable item leaves no files
        let source = resolve_best_rendition(&descriptor.renditions)?;

        if let Some(text) = client.fetch_subtitle(&descriptor).await? {
            let path = with_extension(&base, CAPTION_EXTENSION);
            save_text(&path, &text).await?;
            on_event(DownloadEvent::SubtitleSaved { path });
        }

        debug!(index, total, title = %item.title, "starting item");
        on_event(DownloadEvent::ItemStarted {
            index,
            total,
            title: item.title.clone(),
            output: output.clone(),
        });

        let request = RemuxRequest::new(source, output.clone()).overwrite(true);
        transcoder
            .remux(&request, |event| on_event(DownloadEvent::Remux(event)))
            .await?;

        on_event(DownloadEvent::ItemFinished {
            index,
            total,
            output: output.clone(),
        });
        summary.downloaded.push(output);
    }

    Ok(summary)
}
