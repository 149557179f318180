use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;

use nickdl::prelude::*;

use crate::args::*;
use crate::logger::*;
use crate::progress::*;
use crate::prompt::*;
use crate::regions::*;

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub download_args: DownloadArgs,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the series of a region, the episodes of a series or the items of an episode
    List(SelectArgs),
    /// Download every item of one episode (default)
    Download(DownloadArgs),
}

impl Cli {
    fn app_args(&self) -> &AppArgs {
        match &self.command {
            Some(Commands::List(args)) => &args.app_args,
            Some(Commands::Download(args)) => &args.select.app_args,
            None => &self.download_args.select.app_args,
        }
    }
}

pub struct App {
    cli: Cli,
    logger: Arc<CliLogger>,
}

impl App {
    pub fn new() -> Self {
        let cli = Cli::parse();
        let logger = Arc::new(CliLogger::new(&cli.app_args().log_level));
        init_tracing(Arc::clone(&logger));
        Self { cli, logger }
    }

    pub async fn run(&self) -> ExitCode {
        let result = match &self.cli.command {
            Some(Commands::List(args)) => self.list(args).await,
            Some(Commands::Download(args)) => self.download(args).await,
            None => self.download(&self.cli.download_args).await,
        };

        match result {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) if err.is_expected() => {
                self.logger.notice(format!("{err}"));
                ExitCode::SUCCESS
            }
            Err(err) => {
                self.logger.failed(format!("{err}"));
                ExitCode::FAILURE
            }
        }
    }

    async fn list(&self, args: &SelectArgs) -> Result<()> {
        let logger = &self.logger;
        let client = NickBuilder::new().build()?;
        let region = self.select_region(args)?;

        let series = logger
            .while_loading(
                format!("fetching series for {}", region.name),
                client.list_series(&region),
            )
            .await?;

        if args.series.is_none() && !args.app_args.interactive {
            logger.success(format!("{} series in {}", series.len(), region.name.yellow()));
            for (i, s) in series.iter().enumerate() {
                println!("{:>4}. {s}", i + 1);
            }
            return Ok(());
        }

        let series = select("series", &series, args.series.as_deref(), args.app_args.interactive, |s| {
            &s.title
        })?;
        let episodes = self.fetch_episodes(&client, &series).await?;

        if args.episode.is_none() && !args.app_args.interactive {
            logger.success(format!("{} episodes of {}", episodes.len(), series.title.yellow()));
            for (i, e) in episodes.iter().enumerate() {
                println!("{:>4}. {e}", i + 1);
            }
            return Ok(());
        }

        let episode = select(
            "episode",
            &episodes,
            args.episode.as_deref(),
            args.app_args.interactive,
            |e| &e.title,
        )?;

        let items: Vec<MediaItem> = logger
            .while_loading(
                format!("resolving items of {}", episode.title),
                client.media_items(&series, &episode),
            )
            .await?;

        let directory = episode_directory(std::path::Path::new("."), &series, &episode);
        logger.success(format!("{} items of {}", items.len(), episode.title.yellow()));
        for (i, item) in items.iter().enumerate() {
            let base = item_base(&directory, &item.title);
            println!("{:>4}. {} -> {}", i + 1, item.title, base.display().dimmed());
        }

        Ok(())
    }

    async fn download(&self, args: &DownloadArgs) -> Result<()> {
        let logger = &self.logger;
        let select_args = &args.select;
        let interactive = select_args.app_args.interactive;

        let transcoder = FfmpegTranscoder::with_program(&args.ffmpeg);
        if !transcoder.is_available().await {
            return Err(NickError::Message(format!(
                "{} was not found; install ffmpeg or point --ffmpeg / NICKDL_FFMPEG at it",
                args.ffmpeg.display()
            )));
        }

        let client = NickBuilder::new().build()?;
        let region = self.select_region(select_args)?;

        let series = logger
            .while_loading(
                format!("fetching series for {}", region.name),
                client.list_series(&region),
            )
            .await?;
        let series = select("series", &series, select_args.series.as_deref(), interactive, |s| {
            &s.title
        })?;

        let episodes = self.fetch_episodes(&client, &series).await?;
        let episode = select(
            "episode",
            &episodes,
            select_args.episode.as_deref(),
            interactive,
            |e| &e.title,
        )?;

        logger.notice(format!(
            "downloading {} / {}",
            series.title.yellow(),
            episode.title.yellow()
        ));

        let options = DownloadOptions {
            root: args.dir.clone(),
            overwrite: args.force,
        };

        let mut renderer = RemuxProgressRenderer::new(logger.animated());
        let (events_tx, mut events_rx) = tokio::sync::mpsc::unbounded_channel();
        let mut tick = tokio::time::interval(Duration::from_millis(80));
        let mut download_fut = std::pin::pin!(download_episode(
            &client,
            &transcoder,
            &series,
            &episode,
            &options,
            move |event| {
                let _ = events_tx.send(event);
            },
        ));

        let download_result = loop {
            tokio::select! {
                result = &mut download_fut => break result,
                maybe_event = events_rx.recv() => {
                    if let Some(event) = maybe_event {
                        self.handle_event(event, &mut renderer);
                    }
                }
                _ = tick.tick() => {
                    renderer.tick();
                }
            }
        };

        while let Ok(event) = events_rx.try_recv() {
            self.handle_event(event, &mut renderer);
        }

        let summary = download_result?;
        logger.success(format!(
            "{} downloaded, {} skipped in {}",
            summary.downloaded.len(),
            summary.skipped.len(),
            summary.directory.display().yellow()
        ));

        Ok(())
    }

    fn handle_event(&self, event: DownloadEvent, renderer: &mut RemuxProgressRenderer) {
        let logger = &self.logger;

        match event {
            DownloadEvent::DirectoryCreated { path } => {
                logger.debug("download", format!("created {}", path.display()));
            }
            DownloadEvent::ItemsResolved { count } => {
                logger.notice(format!("episode has {} item(s)", count.yellow()));
            }
            DownloadEvent::ItemSkipped {
                index,
                total,
                output,
            } => {
                logger.notice(format!(
                    "[{index}/{total}] {} already exists, skipping",
                    output.display().dimmed()
                ));
            }
            DownloadEvent::SubtitleSaved { path } => {
                logger.success(format!("saved captions {}", path.display().yellow()));
            }
            DownloadEvent::ItemStarted {
                index,
                total,
                title,
                ..
            } => {
                renderer.start(index, total, &title);
            }
            DownloadEvent::Remux(event) => renderer.handle(event),
            DownloadEvent::ItemFinished { output, .. } => {
                renderer.finish();
                logger.success(format!("done {}", output.display().yellow()));
            }
        }
    }

    fn select_region(&self, args: &SelectArgs) -> Result<Region> {
        let regions = load_regions(args.regions.as_deref())?;

        match args.region.as_deref() {
            Some(query) if !args.app_args.interactive => find_region(&regions, query)
                .cloned()
                .ok_or_else(|| NickError::Message(format!("unknown region: {query}"))),
            _ => choose("region", &regions),
        }
    }

    async fn fetch_episodes<F: Fetch>(
        &self,
        client: &NickClient<F>,
        series: &Series,
    ) -> Result<Vec<Episode>> {
        let episodes = self
            .logger
            .while_loading(
                format!("fetching episodes of {}", series.title),
                client.list_episodes(series),
            )
            .await?;

        if episodes.is_empty() {
            return Err(NickError::NoEpisodesAvailable {
                series: series.title.clone(),
            });
        }

        Ok(episodes)
    }
}

/// resolves a catalog entry from a command line value, prompting when none is usable.
fn select<T: std::fmt::Display + Clone>(
    name: &str,
    items: &[T],
    given: Option<&str>,
    interactive: bool,
    title: impl Fn(&T) -> &str,
) -> Result<T> {
    match given {
        Some(raw) if !interactive => Choice::parse(raw)
            .pick(items, title)
            .cloned()
            .ok_or_else(|| NickError::Message(format!("no {name} matches {raw:?}"))),
        _ => choose(name, items),
    }
}
