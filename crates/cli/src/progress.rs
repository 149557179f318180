use std::io::Write;
use std::time::{Duration, Instant};

use crossterm::{cursor::*, execute, terminal::*};
use owo_colors::OwoColorize;

use nickdl_downloader::RemuxEvent;

use crate::utils::*;

/// draws a two line frame for the item currently being remuxed.
pub struct RemuxProgressRenderer {
    enabled: bool,
    initialized: bool,
    spinner_step: usize,
    item: Option<ItemProgress>,
}

struct ItemProgress {
    label: String,
    started_at: Instant,
    out_time: Duration,
    size: Option<u64>,
    speed: Option<String>,
    status: RemuxStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RemuxStatus {
    Waiting,
    Remuxing,
    Done,
}

impl RemuxProgressRenderer {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            initialized: false,
            spinner_step: 0,
            item: None,
        }
    }

    /// starts a fresh frame for item `index` of `total`.
    pub fn start(&mut self, index: usize, total: usize, title: &str) {
        self.initialized = false;
        self.item = Some(ItemProgress {
            label: format!("[{index}/{total}] {title}"),
            started_at: Instant::now(),
            out_time: Duration::ZERO,
            size: None,
            speed: None,
            status: RemuxStatus::Waiting,
        });
    }

    pub fn handle(&mut self, event: RemuxEvent) {
        let Some(item) = self.item.as_mut() else {
            return;
        };

        match event {
            RemuxEvent::Started { .. } => {
                item.started_at = Instant::now();
                item.status = RemuxStatus::Waiting;
            }
            RemuxEvent::Progress {
                out_time,
                total_size,
                speed,
            } => {
                item.out_time = out_time;
                item.size = total_size.or(item.size);
                item.speed = speed.or(item.speed.take());
                item.status = RemuxStatus::Remuxing;
            }
            RemuxEvent::Finished { .. } => {
                item.status = RemuxStatus::Done;
            }
        }

        self.draw_current();
    }

    pub fn tick(&mut self) {
        if self
            .item
            .as_ref()
            .is_some_and(|item| item.status != RemuxStatus::Done)
        {
            self.draw_current();
        }
    }

    /// drops the frame state so the next log line is printed below it.
    pub fn finish(&mut self) {
        self.item = None;
    }

    fn draw_current(&mut self) {
        if !self.enabled {
            return;
        }

        let Some(item) = self.item.as_ref() else {
            return;
        };

        let spinner = if item.status == RemuxStatus::Done {
            "✓"
        } else {
            const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
            let frame = FRAMES[self.spinner_step % FRAMES.len()];
            self.spinner_step = self.spinner_step.wrapping_add(1);
            frame
        };

        let status_text = match item.status {
            RemuxStatus::Waiting => "waiting",
            RemuxStatus::Remuxing => "remuxing",
            RemuxStatus::Done => "done",
        };
        let size_text = item
            .size
            .map(format_bytes)
            .unwrap_or_else(|| "--".to_string());
        let speed_text = item.speed.clone().unwrap_or_else(|| "--".to_string());
        let elapsed_text = format_duration(item.started_at.elapsed());

        let spinner = format!("[{spinner}]");
        let label = fit_cell(&item.label, 60, false);
        let status_cell = fit_cell(status_text, 10, false);
        let position_cell = fit_cell(&format_duration(item.out_time), 9, true);
        let size_cell = fit_cell(&size_text, 12, true);
        let speed_cell = fit_cell(&speed_text, 8, true);

        let spinner = spinner.cyan();
        let label = label.bold();
        let status_cell = status_cell.blue();
        let position_cell = position_cell.yellow();
        let size_cell = size_cell.dimmed();
        let speed_cell = speed_cell.cyan();
        let elapsed_text = elapsed_text.magenta();

        let mut stdout = std::io::stdout();

        if !self.initialized {
            let _ = writeln!(stdout);
            let _ = writeln!(stdout);
            self.initialized = true;
        }

        let _ = execute!(stdout, MoveUp(2), Clear(ClearType::FromCursorDown));
        let _ = writeln!(stdout, "{spinner} {label}");
        let _ = writeln!(
            stdout,
            "    {status_cell} {position_cell} {size_cell} {speed_cell}  took {elapsed_text}"
        );
        let _ = stdout.flush();
    }
}
