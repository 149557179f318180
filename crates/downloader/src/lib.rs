mod errors;

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

pub use errors::{DownloaderError, Result};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct RemuxRequest {
    /// resolved source reference, usually an hls manifest url.
    pub input: String,
    pub output: PathBuf,
    pub overwrite: bool,
}

impl RemuxRequest {
    pub fn new(input: impl Into<String>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            overwrite: true,
        }
    }

    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RemuxEvent {
    Started {
        input: String,
        output: PathBuf,
    },
    Progress {
        out_time: Duration,
        total_size: Option<u64>,
        speed: Option<String>,
    },
    Finished {
        elapsed: Duration,
    },
}

/// produces a container file from a source reference without re-encoding video.
pub trait Transcoder {
    async fn remux<F>(&self, request: &RemuxRequest, on_event: F) -> Result<()>
    where
        F: FnMut(RemuxEvent);
}

/// remuxes through an external `ffmpeg` binary.
#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    program: PathBuf,
}

impl Default for FfmpegTranscoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FfmpegTranscoder {
    /// uses `ffmpeg` from `PATH`.
    pub fn new() -> Self {
        Self::with_program("ffmpeg")
    }

    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// checks that the binary can be spawned and exits cleanly for `-version`.
    pub async fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }
}

impl Transcoder for FfmpegTranscoder {
    async fn remux<F>(&self, request: &RemuxRequest, mut on_event: F) -> Result<()>
    where
        F: FnMut(RemuxEvent),
    {
        let program = self.program.display().to_string();
        let started_at = Instant::now();

        info!(output = %request.output.display(), "remuxing");
        on_event(RemuxEvent::Started {
            input: request.input.clone(),
            output: request.output.clone(),
        });

        let mut child = Command::new(&self.program)
            .args(remux_args(request))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| DownloaderError::Spawn {
                program: program.clone(),
                source,
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or(DownloaderError::MissingPipe("stdout"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or(DownloaderError::MissingPipe("stderr"))?;

        let read_progress = async {
            let mut lines = BufReader::new(stdout).lines();
            let mut block = ProgressBlock::default();

            while let Some(line) =
                lines
                    .next_line()
                    .await
                    .map_err(|source| DownloaderError::Io {
                        context: "reading transcoder progress".to_string(),
                        source,
                    })?
            {
                if let Some(event) = block.feed(&line) {
                    on_event(event);
                }
            }

            Ok::<(), DownloaderError>(())
        };

        let read_errors = async {
            let mut text = String::new();
            BufReader::new(stderr)
                .read_to_string(&mut text)
                .await
                .map(|_| text)
        };

        let (progress, stderr_text) = tokio::join!(read_progress, read_errors);

        let status = child.wait().await.map_err(|source| DownloaderError::Io {
            context: format!("waiting for {program}"),
            source,
        })?;
        progress?;

        if !status.success() {
            return Err(DownloaderError::TranscodeFailed {
                program,
                status: status.to_string(),
                output: request.output.display().to_string(),
                stderr: stderr_text.unwrap_or_default().trim().to_string(),
            });
        }

        let elapsed = started_at.elapsed();
        debug!(elapsed_ms = elapsed.as_millis() as u64, "remux finished");
        on_event(RemuxEvent::Finished { elapsed });

        Ok(())
    }
}

fn remux_args(request: &RemuxRequest) -> Vec<OsString> {
    let mut args: Vec<OsString> = [
        "-hide_banner",
        "-nostdin",
        "-loglevel",
        "error",
        "-nostats",
        "-progress",
        "pipe:1",
    ]
    .into_iter()
    .map(OsString::from)
    .collect();

    args.push(if request.overwrite { "-y" } else { "-n" }.into());
    args.push("-i".into());
    args.push(request.input.as_str().into());
    args.push("-c:v".into());
    args.push("copy".into());
    args.push(request.output.clone().into_os_string());
    args
}

/// accumulates one `key=value` block of ffmpeg's `-progress` output.
#[derive(Debug, Default)]
struct ProgressBlock {
    out_time: Option<Duration>,
    total_size: Option<u64>,
    speed: Option<String>,
}

impl ProgressBlock {
    fn feed(&mut self, line: &str) -> Option<RemuxEvent> {
        let (key, value) = line.trim().split_once('=')?;
        let value = value.trim();

        match key {
            "out_time_us" => self.out_time = value.parse().ok().map(Duration::from_micros),
            "total_size" => self.total_size = value.parse().ok(),
            "speed" => self.speed = Some(value.to_string()).filter(|s| s != "N/A"),
            "progress" => {
                let block = std::mem::take(self);
                return Some(RemuxEvent::Progress {
                    out_time: block.out_time.unwrap_or_default(),
                    total_size: block.total_size,
                    speed: block.speed,
                });
            }
            _ => {}
        }

        None
    }
}

/// creates `dir` and its parents, returning whether it had to be created.
pub async fn ensure_dir(dir: &Path) -> Result<bool> {
    if tokio::fs::metadata(dir)
        .await
        .is_ok_and(|metadata| metadata.is_dir())
    {
        return Ok(false);
    }

    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|source| DownloaderError::Io {
            context: format!("creating directory {}", dir.display()),
            source,
        })?;

    Ok(true)
}

/// whether `path` exists; errors other than "not found" are reported.
pub async fn file_exists(path: &Path) -> Result<bool> {
    tokio::fs::try_exists(path)
        .await
        .map_err(|source| DownloaderError::Io {
            context: format!("checking {}", path.display()),
            source,
        })
}

/// writes `text` verbatim to `path`, replacing any previous file.
pub async fn save_text(path: &Path, text: &str) -> Result<()> {
    tokio::fs::write(path, text)
        .await
        .map_err(|source| DownloaderError::Io {
            context: format!("writing {}", path.display()),
            source,
        })
}
