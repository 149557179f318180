use std::fmt::Write as _;
use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use std::time::Duration;

use crossterm::terminal::{Clear, ClearType};
use crossterm::{cursor, execute};
use owo_colors::OwoColorize;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::Registry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
}

impl LogLevel {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "error" => Some(Self::Error),
            "warn" | "warning" => Some(Self::Warn),
            "info" => Some(Self::Info),
            "debug" => Some(Self::Debug),
            _ => None,
        }
    }
}

/// terminal output of the cli: one icon-prefixed line per message plus a
/// single-line spinner while catalog requests are pending.
#[derive(Debug)]
pub struct CliLogger {
    pub level: LogLevel,
    spinner_step: AtomicUsize,
    spinner_drawn: AtomicBool,
}

impl CliLogger {
    /// unknown levels fall back to info.
    pub fn new(level: &str) -> Self {
        Self::with_level(LogLevel::parse(level).unwrap_or(LogLevel::Info))
    }

    pub fn with_level(level: LogLevel) -> Self {
        Self {
            level,
            spinner_step: AtomicUsize::new(0),
            spinner_drawn: AtomicBool::new(false),
        }
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        level <= self.level
    }

    /// whether spinners and progress frames should be drawn.
    pub fn animated(&self) -> bool {
        self.enabled(LogLevel::Info)
    }

    fn line(&self, level: LogLevel, icon: impl std::fmt::Display, message: &str) {
        if !self.enabled(level) {
            return;
        }

        self.clear_spinner();
        println!("{icon} {message}");
    }

    pub fn success(&self, message: impl AsRef<str>) {
        self.line(LogLevel::Info, "✓".green(), message.as_ref());
    }

    /// an informational line that is not a completed step.
    pub fn notice(&self, message: impl AsRef<str>) {
        self.line(LogLevel::Info, "•".blue(), message.as_ref());
    }

    pub fn warn(&self, message: impl AsRef<str>) {
        self.line(LogLevel::Warn, "!".yellow(), message.as_ref());
    }

    pub fn failed(&self, message: impl AsRef<str>) {
        self.line(LogLevel::Error, "✗".red(), message.as_ref());
    }

    pub fn debug(&self, context: impl AsRef<str>, message: impl AsRef<str>) {
        if !self.enabled(LogLevel::Debug) {
            return;
        }

        let context = context.as_ref();
        let message = format!("{:>15} {}", context.bold().bright_purple(), message.as_ref());
        self.line(LogLevel::Debug, "λ".cyan(), &message);
    }

    /// awaits `future` with a spinner next to `message`.
    pub async fn while_loading<F, T>(&self, message: impl Into<String>, future: F) -> T
    where
        F: Future<Output = T>,
    {
        if !self.animated() {
            return future.await;
        }

        let message = message.into();
        let mut ticker = tokio::time::interval(Duration::from_millis(120));
        let mut future = std::pin::pin!(future);

        let result = loop {
            tokio::select! {
                result = &mut future => break result,
                _ = ticker.tick() => self.draw_spinner(&message),
            }
        };

        self.clear_spinner();
        result
    }

    fn draw_spinner(&self, message: &str) {
        const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
        let step = self.spinner_step.fetch_add(1, Ordering::Relaxed);
        let frame = FRAMES[step % FRAMES.len()];

        let mut stdout = std::io::stdout();
        let _ = execute!(stdout, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine));
        let _ = write!(stdout, "{} {message}", frame.yellow());
        let _ = stdout.flush();
        self.spinner_drawn.store(true, Ordering::Relaxed);
    }

    fn clear_spinner(&self) {
        if !self.spinner_drawn.swap(false, Ordering::Relaxed) {
            return;
        }

        let mut stdout = std::io::stdout();
        let _ = execute!(stdout, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine));
        let _ = stdout.flush();
    }
}

/// renders an event as `message key=value ...`.
#[derive(Default)]
struct EventLine(String);

impl Visit for EventLine {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.0.insert_str(0, value);
        } else {
            let _ = write!(self.0, " {}={value}", field.name());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0.insert_str(0, &format!("{value:?}"));
        } else {
            let _ = write!(self.0, " {}={value:?}", field.name());
        }
    }
}

/// forwards library events to the [`CliLogger`]: warnings and errors as
/// warnings, everything else as debug lines.
struct CliTracingLayer {
    logger: Arc<CliLogger>,
}

impl<S: Subscriber> Layer<S> for CliTracingLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let target = metadata.target();
        let level = match *metadata.level() {
            Level::ERROR | Level::WARN => LogLevel::Warn,
            _ => LogLevel::Debug,
        };
        if !is_library_target(target) || !self.logger.enabled(level) {
            return;
        }

        let mut line = EventLine::default();
        event.record(&mut line);

        match level {
            LogLevel::Debug => self.logger.debug(target, line.0.trim_start()),
            _ => self.logger.warn(format!("{target}: {}", line.0.trim_start())),
        }
    }
}

/// events from the nickdl library crates; everything else is dropped.
fn is_library_target(target: &str) -> bool {
    ["nickdl", "nickdl_core", "nickdl_downloader"].iter().any(|krate| {
        target
            .strip_prefix(krate)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
    })
}

pub fn init_tracing(logger: Arc<CliLogger>) {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let subscriber = Registry::default().with(CliTracingLayer {
            logger: Arc::clone(&logger),
        });

        if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
            logger.debug("logger", format!("tracing subscriber not installed: {err}"));
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_log_levels() {
        assert_eq!(LogLevel::parse(" WARNING "), Some(LogLevel::Warn));
        assert_eq!(LogLevel::parse("debug"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::parse("trace"), None);
    }

    #[test]
    fn invalid_level_falls_back_to_info() {
        assert_eq!(CliLogger::new("loud").level, LogLevel::Info);
        assert_eq!(CliLogger::new("error").level, LogLevel::Error);
    }

    #[test]
    fn filtered_lines_leave_the_spinner_alone() {
        let logger = CliLogger::with_level(LogLevel::Info);
        logger.spinner_drawn.store(true, Ordering::Relaxed);

        logger.debug("nickdl::client", "fetching feed");
        assert!(logger.spinner_drawn.load(Ordering::Relaxed));

        logger.notice("episode has 2 item(s)");
        assert!(!logger.spinner_drawn.load(Ordering::Relaxed));
    }

    #[test]
    fn library_debug_events_respect_the_level() {
        let logger = Arc::new(CliLogger::with_level(LogLevel::Info));
        logger.spinner_drawn.store(true, Ordering::Relaxed);
        let subscriber = Registry::default().with(CliTracingLayer {
            logger: Arc::clone(&logger),
        });

        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!(target: "nickdl::client", url = "http://x", "fetching");
            tracing::info!(target: "nickdl::pipeline", "already downloaded, skipping");
        });

        assert!(logger.spinner_drawn.load(Ordering::Relaxed));
    }

    #[test]
    fn forwards_only_library_targets() {
        assert!(is_library_target("nickdl::client"));
        assert!(is_library_target("nickdl_core::rendition"));
        assert!(is_library_target("nickdl_downloader"));
        assert!(!is_library_target("nickdl_cli::app"));
        assert!(!is_library_target("reqwest::connect"));
        assert!(!is_library_target("nickdlx::client"));
    }
}
