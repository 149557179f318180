use std::path::PathBuf;

use clap::Args;

#[derive(Debug, Clone, Args)]
pub struct AppArgs {
    /// Logging verbosity (error, warn, info, debug)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Use interactive prompts for every selection, ignoring given values
    #[arg(short, long)]
    pub interactive: bool,
}

#[derive(Debug, Clone, Args)]
pub struct SelectArgs {
    /// Region display name or locale (e.g. Deutsch, en-gb)
    #[arg(short, long)]
    pub region: Option<String>,

    /// Series title (case-insensitive)
    #[arg(short, long)]
    pub series: Option<String>,

    /// Episode title (case-insensitive) or 1-based position
    #[arg(short, long)]
    pub episode: Option<String>,

    /// Region list to use instead of the bundled one
    #[arg(long, env = "NICKDL_REGIONS")]
    pub regions: Option<PathBuf>,

    #[command(flatten)]
    pub app_args: AppArgs,
}

#[derive(Debug, Clone, Args)]
pub struct DownloadArgs {
    /// Directory the series/episode tree is written under
    #[arg(short, long, default_value = ".")]
    pub dir: PathBuf,

    /// Download items again even if their video file already exists
    #[arg(short, long)]
    pub force: bool,

    /// ffmpeg binary used for remuxing
    #[arg(long, env = "NICKDL_FFMPEG", default_value = "ffmpeg")]
    pub ffmpeg: PathBuf,

    #[command(flatten)]
    pub select: SelectArgs,
}

/// a selection given on the command line, matched against catalog entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice {
    Position(usize),
    Title(String),
}

impl Choice {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match raw.parse::<usize>() {
            Ok(n) if n > 0 => Self::Position(n),
            _ => Self::Title(raw.to_string()),
        }
    }

    /// first entry matching this choice.
    pub fn pick<'a, T>(&self, items: &'a [T], title: impl Fn(&T) -> &str) -> Option<&'a T> {
        match self {
            Self::Position(n) => items.get(n - 1),
            Self::Title(query) => items
                .iter()
                .find(|item| title(*item).trim().eq_ignore_ascii_case(query)),
        }
    }
}
