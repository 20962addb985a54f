//! Admission policy for archive records.
//!
//! This module provides [`classify`], the pure decision function,
//! [`RecordFilter`], which adds per-run counters and event reporting, and
//! [`admitted`], a lazy iterator over the payloads of admitted records.
//!
//! # Rules
//!
//! Evaluated in this order, the first match wins:
//!
//! | # | Condition | Decision |
//! |---|-----------|----------|
//! | 1 | namespace is not the article namespace | [`DropNotArticleNamespace`](Decision::DropNotArticleNamespace) |
//! | 2 | record is a redirect | [`DropRedirect`](Decision::DropRedirect) |
//! | 3 | record is deleted | [`DropDeleted`](Decision::DropDeleted) |
//! | 4 | title contains the disambiguation marker | [`DropDisambiguation`](Decision::DropDisambiguation) |
//! | 5 | otherwise | [`Admit`](Decision::Admit) |
//!
//! # Example
//!
//! ```
//! use zimpack::core::filter::{FilterConfig, classify};
//! use zimpack::core::models::{Decision, Record};
//!
//! let config = FilterConfig::new("(disambiguation)");
//!
//! let article = Record::new(0, "Mercury (planet)");
//! assert_eq!(classify(&article, &config), Decision::Admit);
//!
//! let disambiguation = Record::new(1, "Mercury (disambiguation)");
//! assert_eq!(classify(&disambiguation, &config), Decision::DropDisambiguation);
//!
//! // Redirect wins over the title rule.
//! let redirect = Record::new(2, "Mercury (disambiguation)").redirect();
//! assert_eq!(classify(&redirect, &config), Decision::DropRedirect);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::archive::RecordSource;
use crate::core::models::{ARTICLE_NAMESPACE, Decision, Record};
use crate::error::Result;
use crate::events::{EventCallback, FilterEvent, no_events};

/// Default number of admissions between two progress events.
pub const DEFAULT_PROGRESS_INTERVAL: usize = 1000;

/// Configuration of the admission rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Title substring marking disambiguation pages.
    ///
    /// An empty marker disables rule 4 instead of matching every title.
    pub disambiguation_marker: String,

    /// Namespace of genuine articles (default: `'A'`).
    pub article_namespace: char,
}

impl FilterConfig {
    /// Creates a configuration with the given marker and the default
    /// article namespace.
    pub fn new(disambiguation_marker: impl Into<String>) -> Self {
        Self {
            disambiguation_marker: disambiguation_marker.into(),
            article_namespace: ARTICLE_NAMESPACE,
        }
    }

    /// Sets the article namespace.
    #[must_use]
    pub fn with_article_namespace(mut self, namespace: char) -> Self {
        self.article_namespace = namespace;
        self
    }

    /// Returns `true` if the title rule is active.
    pub fn has_disambiguation_rule(&self) -> bool {
        !self.disambiguation_marker.is_empty()
    }
}

/// Classifies one record.
///
/// Pure and total: the same record and configuration always produce the
/// same decision.
pub fn classify(record: &Record, config: &FilterConfig) -> Decision {
    if record.namespace != config.article_namespace {
        Decision::DropNotArticleNamespace
    } else if record.is_redirect {
        Decision::DropRedirect
    } else if record.is_deleted {
        Decision::DropDeleted
    } else if config.has_disambiguation_rule()
        && record.title.contains(config.disambiguation_marker.as_str())
    {
        Decision::DropDisambiguation
    } else {
        Decision::Admit
    }
}

/// Per-run filter statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterStats {
    /// Number of records classified.
    pub seen: usize,
    /// Number of admitted records.
    pub admitted: usize,
    /// Number of dropped records, by decision.
    pub dropped: BTreeMap<Decision, usize>,
}

impl FilterStats {
    /// Total number of dropped records.
    pub fn dropped_total(&self) -> usize {
        self.dropped.values().sum()
    }

    /// Number of records dropped for `decision`.
    pub fn dropped_for(&self, decision: Decision) -> usize {
        self.dropped.get(&decision).copied().unwrap_or(0)
    }
}

/// Stateful wrapper around [`classify`] for one extraction run.
///
/// Publishes a [`FilterEvent::Decided`] for every record and a
/// [`FilterEvent::Progress`] every `progress_interval` admissions.
pub struct RecordFilter {
    config: FilterConfig,
    events: EventCallback,
    progress_interval: usize,
    stats: FilterStats,
}

impl RecordFilter {
    /// Creates a filter that doesn't report events.
    pub fn new(config: FilterConfig) -> Self {
        Self {
            config,
            events: no_events(),
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            stats: FilterStats::default(),
        }
    }

    /// Sets the event callback.
    #[must_use]
    pub fn with_events(mut self, events: EventCallback) -> Self {
        self.events = events;
        self
    }

    /// Sets the progress interval. Zero disables progress events.
    #[must_use]
    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Classifies `record`, updates the counters and publishes events.
    pub fn evaluate(&mut self, record: &Record) -> Decision {
        let decision = classify(record, &self.config);
        self.stats.seen += 1;

        (self.events)(&FilterEvent::Decided {
            title: &record.title,
            decision,
        });

        if decision.is_admit() {
            self.stats.admitted += 1;
            if self.progress_interval > 0 && self.stats.admitted % self.progress_interval == 0 {
                (self.events)(&FilterEvent::Progress {
                    admitted: self.stats.admitted,
                });
            }
        } else {
            *self.stats.dropped.entry(decision).or_insert(0) += 1;
        }

        decision
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Counters accumulated so far.
    pub fn stats(&self) -> &FilterStats {
        &self.stats
    }

    /// Consumes the filter and returns its counters.
    pub fn into_stats(self) -> FilterStats {
        self.stats
    }
}

impl std::fmt::Debug for RecordFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordFilter")
            .field("config", &self.config)
            .field("progress_interval", &self.progress_interval)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

/// Payload of an admitted record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admitted {
    pub title: String,
    pub payload: Vec<u8>,
}

/// Lazy iterator over admitted payloads, see [`admitted`].
pub struct AdmittedPayloads<'a, S: RecordSource + ?Sized> {
    source: &'a mut S,
    filter: &'a mut RecordFilter,
    next: usize,
    failed: bool,
}

/// Walks `source` once, classifying every record with `filter` and yielding
/// the payloads of admitted records in order.
///
/// Payloads are only read for admitted records. The iterator stops after the
/// first error.
///
/// # Example
///
/// ```
/// use zimpack::archive::MemoryArchive;
/// use zimpack::core::filter::{FilterConfig, RecordFilter, admitted};
///
/// # fn main() -> zimpack::Result<()> {
/// let mut archive = MemoryArchive::new()
///     .with_article("Foo", b"foo".to_vec())
///     .with_redirect("Bar");
/// let mut filter = RecordFilter::new(FilterConfig::new("(disambiguation)"));
///
/// let payloads: Vec<_> = admitted(&mut archive, &mut filter).collect::<Result<_, _>>()?;
/// assert_eq!(payloads.len(), 1);
/// assert_eq!(filter.stats().seen, 2);
/// # Ok(())
/// # }
/// ```
pub fn admitted<'a, S: RecordSource + ?Sized>(
    source: &'a mut S,
    filter: &'a mut RecordFilter,
) -> AdmittedPayloads<'a, S> {
    AdmittedPayloads {
        source,
        filter,
        next: 0,
        failed: false,
    }
}

impl<S: RecordSource + ?Sized> Iterator for AdmittedPayloads<'_, S> {
    type Item = Result<Admitted>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        while self.next < self.source.len() {
            let index = self.next;
            self.next += 1;

            let result = self.source.record(index).and_then(|record| {
                if self.filter.evaluate(&record).is_admit() {
                    let payload = self.source.payload(index)?;
                    Ok(Some(Admitted {
                        title: record.title,
                        payload,
                    }))
                } else {
                    Ok(None)
                }
            });

            match result {
                Ok(Some(admitted)) => return Some(Ok(admitted)),
                Ok(None) => {}
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::MemoryArchive;
    use std::sync::{Arc, Mutex};

    const EN: &str = "(disambiguation)";

    fn config() -> FilterConfig {
        FilterConfig::new(EN)
    }

    #[test]
    fn test_rule_order() {
        let config = config();
        let everything = Record::new(0, "X (disambiguation)")
            .namespace('M')
            .redirect()
            .deleted();
        assert_eq!(classify(&everything, &config), Decision::DropNotArticleNamespace);

        let everything_in_a = Record::new(0, "X (disambiguation)").redirect().deleted();
        assert_eq!(classify(&everything_in_a, &config), Decision::DropRedirect);

        let deleted = Record::new(0, "X (disambiguation)").deleted();
        assert_eq!(classify(&deleted, &config), Decision::DropDeleted);

        let disambiguation = Record::new(0, "X (disambiguation)");
        assert_eq!(classify(&disambiguation, &config), Decision::DropDisambiguation);

        assert_eq!(classify(&Record::new(0, "X"), &config), Decision::Admit);
    }

    #[test]
    fn test_marker_anywhere_in_title() {
        let config = config();
        for title in ["(disambiguation)", "Foo (disambiguation)", "(disambiguation) Foo", "a(disambiguation)b"] {
            assert_eq!(
                classify(&Record::new(0, title), &config),
                Decision::DropDisambiguation,
                "{title}"
            );
        }
        assert_eq!(
            classify(&Record::new(0, "Foo (Disambiguation)"), &config),
            Decision::Admit
        );
    }

    #[test]
    fn test_hungarian_marker() {
        let config = FilterConfig::new("(egyértelműsítő lap)");
        let record = Record::new(0, "Mátra (egyértelműsítő lap)");
        assert_eq!(classify(&record, &config), Decision::DropDisambiguation);
        assert_eq!(classify(&Record::new(0, "Mátra"), &config), Decision::Admit);
    }

    #[test]
    fn test_empty_marker_matches_nothing() {
        let config = FilterConfig::new("");
        assert!(!config.has_disambiguation_rule());
        assert_eq!(
            classify(&Record::new(0, "Foo (disambiguation)"), &config),
            Decision::Admit
        );
    }

    #[test]
    fn test_custom_article_namespace() {
        let config = config().with_article_namespace('C');
        assert_eq!(classify(&Record::new(0, "Foo").namespace('C'), &config), Decision::Admit);
        assert_eq!(
            classify(&Record::new(0, "Foo"), &config),
            Decision::DropNotArticleNamespace
        );
    }

    #[test]
    fn test_record_filter_counts() {
        let mut filter = RecordFilter::new(config());
        filter.evaluate(&Record::new(0, "A"));
        filter.evaluate(&Record::new(1, "B").redirect());
        filter.evaluate(&Record::new(2, "C").redirect());
        filter.evaluate(&Record::new(3, "D").namespace('M'));

        let stats = filter.stats();
        assert_eq!(stats.seen, 4);
        assert_eq!(stats.admitted, 1);
        assert_eq!(stats.dropped_for(Decision::DropRedirect), 2);
        assert_eq!(stats.dropped_for(Decision::DropNotArticleNamespace), 1);
        assert_eq!(stats.dropped_for(Decision::DropDeleted), 0);
        assert_eq!(stats.dropped_total(), 3);
    }

    #[test]
    fn test_progress_every_interval() {
        let progress = Arc::new(Mutex::new(Vec::new()));
        let sink = progress.clone();
        let mut filter = RecordFilter::new(config())
            .with_progress_interval(3)
            .with_events(Arc::new(move |event| {
                if let FilterEvent::Progress { admitted } = event {
                    sink.lock().unwrap().push(*admitted);
                }
            }));

        for i in 0..10 {
            filter.evaluate(&Record::new(i, format!("Article {i}")));
            filter.evaluate(&Record::new(i, "Redirect").redirect());
        }

        assert_eq!(*progress.lock().unwrap(), vec![3, 6, 9]);
    }

    #[test]
    fn test_every_decision_is_reported() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let mut filter = RecordFilter::new(config()).with_events(Arc::new(move |event| {
            if let FilterEvent::Decided { title, decision } = event {
                sink.lock().unwrap().push((title.to_string(), *decision));
            }
        }));

        filter.evaluate(&Record::new(0, "Foo"));
        filter.evaluate(&Record::new(1, "Bar").deleted());

        assert_eq!(
            *events.lock().unwrap(),
            vec![
                ("Foo".to_string(), Decision::Admit),
                ("Bar".to_string(), Decision::DropDeleted),
            ]
        );
    }

    #[test]
    fn test_admitted_iterator() {
        let mut archive = MemoryArchive::new()
            .with_article("A", b"a".to_vec())
            .with_redirect("B")
            .with_article("C (disambiguation)", b"c".to_vec())
            .with_article("D", b"d".to_vec());
        let mut filter = RecordFilter::new(config());

        let titles: Vec<_> = admitted(&mut archive, &mut filter)
            .map(|a| a.unwrap().title)
            .collect();

        assert_eq!(titles, vec!["A", "D"]);
        assert_eq!(filter.stats().seen, 4);
    }

    struct FailingSource;

    impl RecordSource for FailingSource {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn len(&self) -> usize {
            3
        }

        fn record(&mut self, index: usize) -> Result<Record> {
            Ok(Record::new(index, format!("R{index}")))
        }

        fn payload(&mut self, _index: usize) -> Result<Vec<u8>> {
            Err(crate::ZimpackError::invalid_archive("broken cluster"))
        }
    }

    #[test]
    fn test_admitted_stops_after_error() {
        let mut source = FailingSource;
        let mut filter = RecordFilter::new(config());
        let results: Vec<_> = admitted(&mut source, &mut filter).collect();
        assert_eq!(results.len(), 1);
        assert!(results[0].is_err());
    }
}
