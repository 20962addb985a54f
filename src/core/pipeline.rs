//! Extraction pipeline: archive → filter → batch writer.

use std::collections::BTreeMap;
use std::fs;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::archive::{RecordSource, ZimArchive};
use crate::config::ExtractConfig;
use crate::core::batch::{BatchFile, BatchWriter, Codec, GzipCodec};
use crate::core::filter::{RecordFilter, admitted};
use crate::core::language::DisambiguationTable;
use crate::core::models::Decision;
use crate::error::Result;
use crate::events::EventCallback;

/// Statistics about a finished extraction.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtractionStats {
    /// Records read from the source.
    pub records_seen: usize,
    /// Records written to batch files.
    pub admitted: usize,
    /// Dropped records by reason.
    pub dropped: BTreeMap<Decision, usize>,
    /// Payload bytes written, excluding length prefixes.
    pub payload_bytes: u64,
    /// Batch files in the order they were written.
    pub files: Vec<BatchFile>,
    /// Wall-clock time of the run.
    #[serde(skip)]
    pub elapsed: Duration,
}

impl ExtractionStats {
    /// Total number of dropped records.
    pub fn dropped_total(&self) -> usize {
        self.dropped.values().sum()
    }

    /// Number of records dropped for `decision`.
    pub fn dropped_for(&self, decision: Decision) -> usize {
        self.dropped.get(&decision).copied().unwrap_or(0)
    }

    /// Share of records admitted, in percent.
    pub fn admission_ratio(&self) -> f64 {
        if self.records_seen == 0 {
            return 0.0;
        }
        self.admitted as f64 / self.records_seen as f64 * 100.0
    }

    /// Records per second over the whole run.
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs <= 0.0 {
            return 0.0;
        }
        self.records_seen as f64 / secs
    }
}

/// Streams every admitted payload of `source` into `writer`.
///
/// The writer is finished on success. On error it is dropped, which
/// releases the open batch file with whatever was written so far.
///
/// # Example
///
/// ```rust
/// use zimpack::archive::MemoryArchive;
/// use zimpack::core::batch::BatchWriter;
/// use zimpack::core::filter::{FilterConfig, RecordFilter};
/// use zimpack::core::pipeline::run_pipeline;
///
/// # fn main() -> zimpack::Result<()> {
/// let dir = tempfile::tempdir()?;
/// let mut source = MemoryArchive::new()
///     .with_article("A", b"a".to_vec())
///     .with_redirect("B")
///     .with_article("C", b"c".to_vec());
/// let mut filter = RecordFilter::new(FilterConfig::new("(disambiguation)"));
/// let writer = BatchWriter::new(dir.path(), 2500, 4)?;
///
/// let stats = run_pipeline(&mut source, &mut filter, writer)?;
/// assert_eq!(stats.admitted, 2);
/// assert_eq!(stats.files.len(), 1);
/// # Ok(())
/// # }
/// ```
pub fn run_pipeline<S, C>(
    source: &mut S,
    filter: &mut RecordFilter,
    mut writer: BatchWriter<C>,
) -> Result<ExtractionStats>
where
    S: RecordSource + ?Sized,
    C: Codec,
{
    let start = Instant::now();
    let mut payload_bytes = 0u64;

    for item in admitted(source, filter) {
        let item = item?;
        writer.write(&item.payload)?;
        payload_bytes += item.payload.len() as u64;
    }

    let summary = writer.finish()?;
    let filter_stats = filter.stats();
    Ok(ExtractionStats {
        records_seen: filter_stats.seen,
        admitted: filter_stats.admitted,
        dropped: filter_stats.dropped.clone(),
        payload_bytes,
        files: summary.files,
        elapsed: start.elapsed(),
    })
}

/// Runs a complete extraction as described by `config`.
///
/// Steps, each fatal on failure:
/// 1. validate `config` and resolve its language against `table`
/// 2. open the archive
/// 3. create the output directory
/// 4. stream admitted records into batch files
///
/// Nothing is written before step 3, so configuration and archive errors
/// leave the filesystem untouched.
pub fn extract(
    config: &ExtractConfig,
    table: &DisambiguationTable,
    events: EventCallback,
) -> Result<ExtractionStats> {
    config.validate()?;
    let filter_config = config.filter_config(table)?;

    let mut archive = ZimArchive::open(&config.input_path)?;
    tracing::info!(
        input = %config.input_path.display(),
        entries = archive.len(),
        language = %config.language,
        "Opened archive"
    );

    fs::create_dir_all(&config.output_dir)?;
    let writer = BatchWriter::with_codec(
        &config.output_dir,
        config.documents_per_file,
        config.filename_digit_width,
        GzipCodec::new(config.compression_level),
    )?;

    let mut filter = RecordFilter::new(filter_config)
        .with_events(events)
        .with_progress_interval(config.progress_interval);

    let stats = run_pipeline(&mut archive, &mut filter, writer)?;
    tracing::info!(
        seen = stats.records_seen,
        admitted = stats.admitted,
        dropped = stats.dropped_total(),
        files = stats.files.len(),
        elapsed_ms = stats.elapsed.as_millis() as u64,
        "Extraction finished"
    );
    Ok(stats)
}
