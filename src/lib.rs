//! # Caption Pack
//!
//! Batch generator for captioned social-media image packs. Captions come from
//! a spreadsheet, backgrounds from a flat folder of images; every caption row
//! becomes a folder of images with the caption drawn over a randomly chosen
//! background, and the whole pass is repeated a configurable number of times.
//!
//! # Architecture: One Linear Run
//!
//! ```text
//! captions.ods ─┐
//!               ├─→ run ─→ pack (per row × repeat) ─→ render ─→ layout
//! backgrounds/ ─┘          post_1_repeat_1/1.png, 2.png, ...
//! ```
//!
//! Everything happens sequentially on the calling thread. The only other
//! thread is the [`stopwatch`], which ticks elapsed time over a channel and
//! is stopped by a message, never by shared mutable state.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`captions`] | Spreadsheet loading into a [`captions::CaptionTable`] |
//! | [`backgrounds`] | Flat directory scan producing the [`backgrounds::BackgroundPool`] |
//! | [`imaging`] | Word wrap, outlined caption rendering, font and image I/O |
//! | [`pack`] | One pack: draws backgrounds without replacement, renders each slot |
//! | [`run`] | Repeats packs over all rows, writes the run manifest, emits [`run::RunEvent`]s |
//! | [`stopwatch`] | Background elapsed-time ticker |
//! | [`config`] | `caption-pack.toml` loading, merging over stock defaults, validation |
//! | [`output`] | CLI output formatting for run events and `check` inventories |
//!
//! # Design Decisions
//!
//! ## Words Are Never Split
//!
//! Wrapping is greedy and word-based. A single word wider than the budget is
//! emitted as its own over-width line and overflows the frame. There is no
//! hyphenation.
//!
//! ## Injected Randomness
//!
//! Background selection takes any [`rand::Rng`]. Runs use an OS-seeded
//! generator unless `random.seed` is configured, in which case the same
//! inputs produce the same packs. Tests drive packs with seeded generators.
//!
//! ## Glyph Sources Behind a Trait
//!
//! Rendering talks to a [`imaging::GlyphSource`], not to a font directly. The
//! production implementation wraps `ab_glyph` + `imageproc`; tests use a
//! block-glyph mock, so layout and pack logic are exercised without shipping
//! font files.

pub mod backgrounds;
pub mod captions;
pub mod config;
pub mod imaging;
pub mod output;
pub mod pack;
pub mod run;
pub mod stopwatch;

#[cfg(test)]
pub(crate) mod test_helpers;
