//! # zimpack
//!
//! A Rust library for extracting articles from Kiwix ZIM archives into
//! numbered, length-prefixed gzip batch files.
//!
//! ## Overview
//!
//! zimpack reads an offline Wikipedia dump once, from the first entry to the
//! last, and keeps only genuine content articles:
//! - records outside the article namespace (`A`) are dropped
//! - redirects and deleted records are dropped
//! - disambiguation pages, recognized by a language-specific title marker
//!   such as `(disambiguation)` or `(egyértelműsítő lap)`, are dropped
//!
//! Every admitted payload becomes one frame (`[u32 big-endian length][bytes]`)
//! in a gzip file. Files are rotated every N frames and named `0001.htmls.gz`,
//! `0002.htmls.gz` and so on, ready for bulk corpus-building pipelines.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use zimpack::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let config = ExtractConfig::new("wikipedia_hu_all.zim", "corpus")
//!         .with_language("hu")
//!         .with_documents_per_file(2500);
//!
//!     let stats = extract(&config, &DisambiguationTable::default(), tracing_events())?;
//!     println!("{} articles in {} files", stats.admitted, stats.files.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Reading Batch Files Back
//!
//! ```rust,no_run
//! use zimpack::core::batch::read_batch_file;
//!
//! for payload in read_batch_file("corpus/0001.htmls.gz".as_ref())? {
//!     println!("{} bytes", payload.len());
//! }
//! # Ok::<(), zimpack::ZimpackError>(())
//! ```
//!
//! ## Module Structure
//!
//! - [`archive`] - Record sources
//!   - [`ZimArchive`](archive::ZimArchive) - ZIM file reader
//!   - [`MemoryArchive`](archive::MemoryArchive) - In-memory source for tests and embedding
//!   - [`ZimBuilder`](archive::ZimBuilder) - Small ZIM writer for fixtures
//! - [`core`] - Filtering and batching
//!   - [`core::filter`] - [`classify`](core::classify), [`RecordFilter`](core::RecordFilter)
//!   - [`core::batch`] - [`BatchWriter`](core::BatchWriter), [`FrameReader`](core::FrameReader)
//!   - [`core::pipeline`] - [`extract`](core::extract), [`run_pipeline`](core::run_pipeline)
//! - [`config`] - [`ExtractConfig`](config::ExtractConfig)
//! - [`events`] - Structured per-record events
//! - [`error`] - Unified error types ([`ZimpackError`], [`Result`])
//! - `cli` - Command-line arguments (feature `cli`)
//! - [`prelude`] - Convenient re-exports

pub mod archive;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod events;

// Re-export the main types at the crate root for convenience
pub use error::{Result, ZimpackError};

/// Convenient re-exports for common usage.
///
/// ```rust
/// use zimpack::prelude::*;
/// ```
pub mod prelude {
    // Error types
    pub use crate::error::{Result, ZimpackError};

    // Configuration
    pub use crate::config::ExtractConfig;

    // Sources
    pub use crate::archive::{MemoryArchive, RecordSource, ZimArchive};

    // Filtering
    pub use crate::core::filter::{FilterConfig, RecordFilter, classify};
    pub use crate::core::language::DisambiguationTable;
    pub use crate::core::models::{Decision, Record};

    // Batching
    pub use crate::core::batch::{BatchWriter, read_batch_file};

    // Running
    pub use crate::core::pipeline::{ExtractionStats, extract, run_pipeline};

    // Events
    pub use crate::events::{EventCallback, FilterEvent, no_events, tracing_events};
}
