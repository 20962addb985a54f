//! Core extraction logic.
//!
//! This module contains:
//! - [`models`] - Records and filter decisions
//! - [`language`] - Disambiguation markers per language
//! - [`filter`] - The admission policy and per-run counters
//! - [`batch`] - Framing, naming and the rotating batch writer
//! - [`pipeline`] - Wiring an archive, a filter and a writer together
//!
//! # Quick Start
//!
//! ```rust
//! use zimpack::core::{
//!     BatchWriter, DisambiguationTable, FilterConfig, RecordFilter, run_pipeline,
//! };
//! use zimpack::archive::MemoryArchive;
//!
//! # fn main() -> zimpack::Result<()> {
//! let dir = tempfile::tempdir()?;
//! let marker = DisambiguationTable::default().marker("en")?.to_string();
//! let mut filter = RecordFilter::new(FilterConfig::new(marker));
//! let mut archive = MemoryArchive::new().with_article("Foo", b"<p>foo</p>".to_vec());
//!
//! let stats = run_pipeline(&mut archive, &mut filter, BatchWriter::new(dir.path(), 100, 4)?)?;
//! assert_eq!(stats.admitted, 1);
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod filter;
pub mod language;
pub mod models;
pub mod pipeline;

pub use batch::{BatchSummary, BatchWriter, FrameReader, GzipCodec, read_batch_file};
pub use filter::{FilterConfig, FilterStats, RecordFilter, admitted, classify};
pub use language::DisambiguationTable;
pub use models::{Decision, Record};
pub use pipeline::{ExtractionStats, extract, run_pipeline};
