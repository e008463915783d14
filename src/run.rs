//! Run orchestration: every row, every repeat.
//!
//! ```text
//! config ──► scan backgrounds ──► empty? ──► NoBackgrounds (nothing written)
//!                                   │
//!                                   ▼
//!            load captions + font ──► for repeat in 1..=N
//!                                        for row in non-empty rows
//!                                          mkdir post_<row>_repeat_<repeat>
//!                                          assemble_pack
//!                                   │
//!                                   ▼
//!                              manifest.json (optional)
//! ```
//!
//! Generation is sequential on the calling thread. Progress goes out as
//! [`RunEvent`]s on an optional channel; the stopwatch thread shares that
//! channel for its elapsed-time ticks and is joined before [`run`] returns.

use crate::backgrounds::{BackgroundPool, ScanError, scan_backgrounds};
use crate::captions::{CaptionError, CaptionTable, load_captions};
use crate::config::{ConfigError, PackConfig};
use crate::imaging::{GlyphSource, RenderError, TrueTypeFont};
use crate::pack::{PackJob, PackRenderer, PackReport, assemble_pack, emit};
use crate::stopwatch::{Lap, Stopwatch};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunError {
    #[error("No valid background images found in {0}")]
    NoBackgrounds(PathBuf),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Caption error: {0}")]
    Captions(#[from] CaptionError),
    #[error("Background scan error: {0}")]
    Scan(#[from] ScanError),
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Progress events emitted during a run.
#[derive(Debug, Clone, PartialEq)]
pub enum RunEvent {
    PoolLoaded {
        count: usize,
        dir: PathBuf,
    },
    PackStarted {
        post: usize,
        repeat: usize,
        captions: usize,
        dir: PathBuf,
    },
    SlotRendered {
        post: usize,
        repeat: usize,
        slot: usize,
        background: PathBuf,
        output: PathBuf,
    },
    /// The pack ran out of backgrounds; the run goes on.
    PackExhausted {
        post: usize,
        repeat: usize,
        rendered: usize,
        requested: usize,
    },
    Elapsed(Duration),
    Done(Duration),
}

impl From<Lap> for RunEvent {
    fn from(lap: Lap) -> Self {
        match lap {
            Lap::Running(elapsed) => RunEvent::Elapsed(elapsed),
            Lap::Done(elapsed) => RunEvent::Done(elapsed),
        }
    }
}

/// What a finished run produced. Written as `manifest.json`.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub output_root: PathBuf,
    pub backgrounds: PathBuf,
    pub background_count: usize,
    pub repeat_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub packs: Vec<PackReport>,
    /// Where `manifest.json` was written, if it was.
    #[serde(skip)]
    pub manifest: Option<PathBuf>,
}

impl RunSummary {
    pub fn image_count(&self) -> usize {
        self.packs.iter().map(|p| p.slots.len()).sum()
    }

    /// Packs that stopped short for lack of backgrounds.
    pub fn exhausted_packs(&self) -> impl Iterator<Item = &PackReport> {
        self.packs.iter().filter(|p| p.exhausted.is_some())
    }
}

/// Folder name for one pack, e.g. `post_3_repeat_2`.
pub fn pack_dir_name(post: usize, repeat: usize) -> String {
    format!("post_{post}_repeat_{repeat}")
}

/// The inputs of a run, already loaded.
pub struct RunPlan<'a> {
    pub table: &'a CaptionTable,
    pub pool: &'a BackgroundPool,
    pub output_root: &'a Path,
    pub repeat_count: usize,
}

/// Render every non-empty row `repeat_count` times under `output_root`.
///
/// Fails with [`RunError::NoBackgrounds`] before touching the filesystem
/// when the pool is empty.
pub fn generate<G, R>(
    plan: &RunPlan<'_>,
    renderer: &PackRenderer<'_, G>,
    rng: &mut R,
    events: Option<&Sender<RunEvent>>,
) -> Result<RunSummary, RunError>
where
    G: GlyphSource,
    R: Rng + ?Sized,
{
    if plan.pool.is_empty() {
        return Err(RunError::NoBackgrounds(plan.pool.dir().to_path_buf()));
    }
    emit(
        events,
        RunEvent::PoolLoaded {
            count: plan.pool.len(),
            dir: plan.pool.dir().to_path_buf(),
        },
    );

    let mut packs = Vec::new();
    for repeat in 1..=plan.repeat_count {
        for row in plan.table.non_empty_rows() {
            let post = row.post_number();
            let dir = plan.output_root.join(pack_dir_name(post, repeat));
            fs::create_dir_all(&dir)?;
            emit(
                events,
                RunEvent::PackStarted {
                    post,
                    repeat,
                    captions: row.captions.len(),
                    dir: dir.clone(),
                },
            );

            let job = PackJob {
                post,
                repeat,
                captions: &row.captions,
                dir,
            };
            packs.push(assemble_pack(&job, plan.pool, renderer, rng, events)?);
        }
    }

    Ok(RunSummary {
        output_root: plan.output_root.to_path_buf(),
        backgrounds: plan.pool.dir().to_path_buf(),
        background_count: plan.pool.len(),
        repeat_count: plan.repeat_count,
        seed: None,
        packs,
        manifest: None,
    })
}

/// Run a full generation from config.
///
/// When `events` is given, a stopwatch reports elapsed time on the same
/// channel and is stopped (with its final `Done` event sent) before this
/// returns, on success and on error alike.
pub fn run(config: &PackConfig, events: Option<Sender<RunEvent>>) -> Result<RunSummary, RunError> {
    let stopwatch = events.clone().map(|tx| {
        Stopwatch::start(config.progress.interval(), move |lap| {
            tx.send(RunEvent::from(lap)).ok();
        })
    });

    let result = run_inner(config, events.as_ref());

    if let Some(stopwatch) = stopwatch {
        stopwatch.stop();
    }
    result
}

fn run_inner(
    config: &PackConfig,
    events: Option<&Sender<RunEvent>>,
) -> Result<RunSummary, RunError> {
    // The pool is checked first so a run with no backgrounds creates nothing.
    let pool = scan_backgrounds(&config.input.backgrounds, &config.input.extensions)?;
    if pool.is_empty() {
        return Err(RunError::NoBackgrounds(pool.dir().to_path_buf()));
    }

    let table = load_captions(&config.input.captions, &config.input.sheet)?;
    let font = TrueTypeFont::load(&config.input.font, config.render.font_size)?;
    let params = config.render.params()?;
    let renderer = PackRenderer {
        glyphs: &font,
        params: &params,
        extension: config.output_extension(),
    };
    let mut rng = seeded_rng(config.random.seed);

    let plan = RunPlan {
        table: &table,
        pool: &pool,
        output_root: &config.output.root,
        repeat_count: config.repeat_count,
    };
    let mut summary = generate(&plan, &renderer, &mut rng, events)?;
    summary.seed = config.random.seed;

    if config.output.manifest {
        summary.manifest = Some(write_manifest(&summary, &config.output.root)?);
    }
    Ok(summary)
}

/// A seeded generator when `seed` is set, otherwise one seeded by the OS.
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// Write `manifest.json` into `root` and return its path.
pub fn write_manifest(summary: &RunSummary, root: &Path) -> Result<PathBuf, RunError> {
    fs::create_dir_all(root)?;
    let path = root.join("manifest.json");
    let json = serde_json::to_string_pretty(summary)?;
    fs::write(&path, json)?;
    Ok(path)
}
