//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Every entity (post, pack, slot) leads with its positional index or folder
//! name; file paths come second as context. The output reads as an inventory
//! of what was planned or produced.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Captions (captions.ods, sheet Sheet1)
//! 001 post_1 (2 captions)
//!     001 Hello world
//!     002 Second line
//! 003 post_3 (1 caption)
//!     001 Another post
//!
//! Backgrounds (backgrounds)
//!     001 beach.png
//!     002 city.png
//!
//! Font
//!     font.ttf at 80px
//!
//! Plan
//!     2 posts x 3 repeats = 6 packs, 9 images
//! ```
//!
//! ## Run
//!
//! ```text
//! Found 2 background images in backgrounds
//! post_1_repeat_1 (2 captions)
//!     001 city.png → 1.png
//!     002 beach.png → 2.png
//! post_3_repeat_1 (3 captions)
//!     001 beach.png → 1.png
//!     002 city.png → 2.png
//!     No more background images available for post 3, repeat 1 (2 of 3 rendered)
//! Done in 0.42 seconds
//!
//! Generated 4 images in 2 packs → output
//! 1 pack ran short of backgrounds:
//!     post_3_repeat_1 (2 of 3)
//! Manifest: output/manifest.json
//! ```
//!
//! While a run is in progress the stopwatch line `Elapsed Time: N.NN seconds`
//! is redrawn in place below the last event line.
//!
//! # Architecture
//!
//! Each output has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects. [`ProgressPrinter`] is the
//! one stateful piece, since in-place redraw depends on what was printed
//! last.

use crate::backgrounds::BackgroundPool;
use crate::captions::CaptionTable;
use crate::config::PackConfig;
use crate::run::{RunEvent, RunSummary, pack_dir_name};
use crate::stopwatch::format_seconds;
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// `1 caption`, `2 captions`.
fn count_noun(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("{n} {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_text(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let head: String = text.chars().take(max).collect();
        format!("{head}...")
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ============================================================================
// Check output
// ============================================================================

/// Format the inventory shown by `check`: captions, backgrounds, font and
/// what a run would produce.
pub fn format_check_output(
    table: &CaptionTable,
    pool: &BackgroundPool,
    config: &PackConfig,
) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push(format!(
        "Captions ({}, sheet {})",
        config.input.captions.display(),
        config.input.sheet
    ));
    for row in table.non_empty_rows() {
        lines.push(format!(
            "{} post_{} ({})",
            format_index(row.post_number()),
            row.post_number(),
            count_noun(row.captions.len(), "caption")
        ));
        for (i, caption) in row.captions.iter().enumerate() {
            let shown = if caption.trim().is_empty() {
                "(empty)".to_string()
            } else {
                truncate_text(&caption.replace('\n', " "), 60)
            };
            lines.push(format!("    {} {}", format_index(i + 1), shown));
        }
    }

    lines.push(String::new());
    lines.push(format!("Backgrounds ({})", pool.dir().display()));
    if pool.is_empty() {
        lines.push("    none found".to_string());
    }
    for (i, image) in pool.images().iter().enumerate() {
        lines.push(format!("    {} {}", format_index(i + 1), file_name(image)));
    }

    lines.push(String::new());
    lines.push("Font".to_string());
    lines.push(format!(
        "    {} at {}px",
        config.input.font.display(),
        config.render.font_size
    ));

    lines.push(String::new());
    lines.push("Plan".to_string());
    let posts = table.non_empty_rows().count();
    lines.push(format!(
        "    {} x {} = {}, {}",
        count_noun(posts, "post"),
        count_noun(config.repeat_count, "repeat"),
        count_noun(posts * config.repeat_count, "pack"),
        count_noun(table.slot_count() * config.repeat_count, "image")
    ));
    for row in table.non_empty_rows() {
        if row.captions.len() > pool.len() {
            lines.push(format!(
                "    post_{} needs {}, only {} available: its packs will stop short",
                row.post_number(),
                count_noun(row.captions.len(), "background"),
                pool.len()
            ));
        }
    }

    lines
}

/// Print check output to stdout.
pub fn print_check_output(table: &CaptionTable, pool: &BackgroundPool, config: &PackConfig) {
    for line in format_check_output(table, pool, config) {
        println!("{}", line);
    }
}

// ============================================================================
// Run progress
// ============================================================================

pub fn format_elapsed(elapsed: Duration) -> String {
    format!("Elapsed Time: {} seconds", format_seconds(elapsed))
}

pub fn format_done(elapsed: Duration) -> String {
    format!("Done in {} seconds", format_seconds(elapsed))
}

/// Format a single run progress event as display lines.
pub fn format_run_event(event: &RunEvent) -> Vec<String> {
    match event {
        RunEvent::PoolLoaded { count, dir } => vec![format!(
            "Found {} in {}",
            count_noun(*count, "background image"),
            dir.display()
        )],
        RunEvent::PackStarted {
            post,
            repeat,
            captions,
            ..
        } => vec![format!(
            "{} ({})",
            pack_dir_name(*post, *repeat),
            count_noun(*captions, "caption")
        )],
        RunEvent::SlotRendered {
            slot,
            background,
            output,
            ..
        } => vec![format!(
            "    {} {} → {}",
            format_index(*slot),
            file_name(background),
            file_name(output)
        )],
        RunEvent::PackExhausted {
            post,
            repeat,
            rendered,
            requested,
        } => vec![format!(
            "    No more background images available for post {post}, repeat {repeat} ({rendered} of {requested} rendered)"
        )],
        RunEvent::Elapsed(elapsed) => vec![format_elapsed(*elapsed)],
        RunEvent::Done(elapsed) => vec![format_done(*elapsed)],
    }
}

/// Writes run events, keeping the stopwatch line redrawn in place.
///
/// An `Elapsed` event overwrites the previous one with `\r`. Any other event
/// first blanks the pending stopwatch line so event lines never end up glued
/// to it.
pub struct ProgressPrinter<W: Write> {
    out: W,
    ticker_width: usize,
}

impl<W: Write> ProgressPrinter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            ticker_width: 0,
        }
    }

    pub fn print(&mut self, event: &RunEvent) -> io::Result<()> {
        if let RunEvent::Elapsed(elapsed) = event {
            let line = format_elapsed(*elapsed);
            let pad = self.ticker_width.saturating_sub(line.len());
            write!(self.out, "\r{line}{}", " ".repeat(pad))?;
            self.ticker_width = line.len();
        } else {
            self.clear_ticker()?;
            for line in format_run_event(event) {
                writeln!(self.out, "{}", line)?;
            }
        }
        self.out.flush()
    }

    fn clear_ticker(&mut self) -> io::Result<()> {
        if self.ticker_width > 0 {
            write!(self.out, "\r{}\r", " ".repeat(self.ticker_width))?;
            self.ticker_width = 0;
        }
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

// ============================================================================
// Run summary
// ============================================================================

/// Format the end-of-run summary.
pub fn format_run_summary(summary: &RunSummary) -> Vec<String> {
    let mut lines = vec![format!(
        "Generated {} in {} → {}",
        count_noun(summary.image_count(), "image"),
        count_noun(summary.packs.len(), "pack"),
        summary.output_root.display()
    )];

    let short: Vec<_> = summary.exhausted_packs().collect();
    if !short.is_empty() {
        lines.push(format!(
            "{} short of backgrounds:",
            if short.len() == 1 {
                "1 pack ran".to_string()
            } else {
                format!("{} packs ran", short.len())
            }
        ));
        for pack in short {
            if let Some(exhausted) = pack.exhausted {
                lines.push(format!(
                    "    {} ({} of {})",
                    pack_dir_name(pack.post, pack.repeat),
                    exhausted.rendered,
                    exhausted.requested
                ));
            }
        }
    }

    if let Some(path) = &summary.manifest {
        lines.push(format!("Manifest: {}", path.display()));
    }
    lines
}

/// Print the end-of-run summary to stdout.
pub fn print_run_summary(summary: &RunSummary) {
    for line in format_run_summary(summary) {
        println!("{}", line);
    }
}
