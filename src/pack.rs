//! Pack assembly: one caption row rendered into one folder.
//!
//! A pack is the set of images for one post in one repeat:
//!
//! ```text
//! output/post_3_repeat_2/
//! ├── 1.png      caption 1 over a random background
//! ├── 2.png      caption 2 over a different background
//! └── 3.png
//! ```
//!
//! ## Drawing Without Replacement
//!
//! Each pack gets its own [`PackPool`], an owned list of the backgrounds it
//! has not used yet. Every slot removes one entry uniformly at random, so no
//! background appears twice in a pack while every pack starts from the full
//! pool again. When the pack pool runs dry before the row does, the pack
//! stops short and reports an [`Exhaustion`]; this is a warning, not an
//! error.

use crate::backgrounds::BackgroundPool;
use crate::imaging::{GlyphSource, RenderError, RenderParams, render_caption_file};
use crate::run::RunEvent;
use rand::Rng;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

/// Backgrounds not yet used by the current pack.
#[derive(Debug, Clone)]
pub struct PackPool<'a> {
    remaining: Vec<&'a Path>,
}

impl<'a> PackPool<'a> {
    pub fn new(pool: &'a BackgroundPool) -> Self {
        Self {
            remaining: pool.images().iter().map(PathBuf::as_path).collect(),
        }
    }

    /// Remove and return one background, chosen uniformly at random.
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<&'a Path> {
        if self.remaining.is_empty() {
            return None;
        }
        let i = rng.random_range(0..self.remaining.len());
        Some(self.remaining.swap_remove(i))
    }

    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }
}

/// What to build: one row of captions for one repeat, into `dir`.
#[derive(Debug, Clone)]
pub struct PackJob<'a> {
    pub post: usize,
    pub repeat: usize,
    pub captions: &'a [String],
    pub dir: PathBuf,
}

/// How to draw: glyphs, look and output file extension shared by every pack.
pub struct PackRenderer<'a, G> {
    pub glyphs: &'a G,
    pub params: &'a RenderParams,
    pub extension: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotReport {
    /// 1-based slot, also the output file stem.
    pub slot: usize,
    pub caption: String,
    pub background: PathBuf,
    pub output: PathBuf,
}

/// A pack that ran out of backgrounds before its row ran out of captions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Exhaustion {
    pub rendered: usize,
    pub requested: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackReport {
    pub post: usize,
    pub repeat: usize,
    pub dir: PathBuf,
    pub slots: Vec<SlotReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exhausted: Option<Exhaustion>,
}

/// Render every caption of `job` into `job.dir`, which must already exist.
///
/// Stops early (without error) when the pack runs out of backgrounds. Any
/// render failure aborts the pack and is returned as is.
pub fn assemble_pack<G, R>(
    job: &PackJob<'_>,
    pool: &BackgroundPool,
    renderer: &PackRenderer<'_, G>,
    rng: &mut R,
    events: Option<&Sender<RunEvent>>,
) -> Result<PackReport, RenderError>
where
    G: GlyphSource,
    R: Rng + ?Sized,
{
    let mut available = PackPool::new(pool);
    let mut slots = Vec::with_capacity(job.captions.len());
    let mut exhausted = None;

    for (i, caption) in job.captions.iter().enumerate() {
        let slot = i + 1;
        let Some(background) = available.draw(rng) else {
            let shortfall = Exhaustion {
                rendered: slots.len(),
                requested: job.captions.len(),
            };
            emit(
                events,
                RunEvent::PackExhausted {
                    post: job.post,
                    repeat: job.repeat,
                    rendered: shortfall.rendered,
                    requested: shortfall.requested,
                },
            );
            exhausted = Some(shortfall);
            break;
        };

        let output = job.dir.join(format!("{slot}.{}", renderer.extension));
        render_caption_file(
            background,
            caption,
            &output,
            renderer.glyphs,
            renderer.params,
        )?;

        emit(
            events,
            RunEvent::SlotRendered {
                post: job.post,
                repeat: job.repeat,
                slot,
                background: background.to_path_buf(),
                output: output.clone(),
            },
        );
        slots.push(SlotReport {
            slot,
            caption: caption.clone(),
            background: background.to_path_buf(),
            output,
        });
    }

    Ok(PackReport {
        post: job.post,
        repeat: job.repeat,
        dir: job.dir.clone(),
        slots,
        exhausted,
    })
}

pub(crate) fn emit(events: Option<&Sender<RunEvent>>, event: RunEvent) {
    if let Some(tx) = events {
        // A dropped receiver only means nobody is watching progress.
        tx.send(event).ok();
    }
}
