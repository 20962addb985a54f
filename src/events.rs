//! Structured filter events.
//!
//! Every decision made by [`RecordFilter`](crate::core::filter::RecordFilter)
//! is published as a [`FilterEvent`] to an [`EventCallback`]. Consumers such
//! as a logger, a metrics exporter or a test harness subscribe by passing a
//! callback; none of them influence the filtering itself.
//!
//! # Example
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use zimpack::events::{EventCallback, FilterEvent};
//!
//! let dropped = Arc::new(Mutex::new(Vec::new()));
//! let sink = dropped.clone();
//! let callback: EventCallback = Arc::new(move |event| {
//!     if let FilterEvent::Decided { title, decision } = event {
//!         if !decision.is_admit() {
//!             sink.lock().unwrap().push(title.to_string());
//!         }
//!     }
//! });
//! # let _ = callback;
//! ```

use std::sync::Arc;

use crate::core::models::Decision;

/// One observable step of a filtering run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterEvent<'a> {
    /// A record was classified.
    Decided {
        /// Title of the classified record.
        title: &'a str,
        /// The decision taken.
        decision: Decision,
    },

    /// The admitted count reached a multiple of the progress interval.
    Progress {
        /// Number of records admitted so far in this run.
        admitted: usize,
    },
}

/// Callback type for receiving filter events.
pub type EventCallback = Arc<dyn Fn(&FilterEvent<'_>) + Send + Sync>;

/// Creates a callback that ignores every event.
///
/// # Example
///
/// ```rust
/// use zimpack::events::{FilterEvent, no_events};
///
/// let callback = no_events();
/// callback(&FilterEvent::Progress { admitted: 1000 }); // Does nothing
/// ```
pub fn no_events() -> EventCallback {
    Arc::new(|_| {})
}

/// Creates a callback that reports events through `tracing`.
///
/// Per-record decisions and progress are logged at `info`.
pub fn tracing_events() -> EventCallback {
    Arc::new(|event| match *event {
        FilterEvent::Decided { title, decision } if decision.is_admit() => {
            tracing::info!(title, "{decision}");
        }
        FilterEvent::Decided { title, decision } => {
            tracing::info!(title, reason = decision.reason(), "{decision}");
        }
        FilterEvent::Progress { admitted } => {
            tracing::info!(admitted, "At the {admitted}th document");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_no_events_callback() {
        let callback = no_events();
        callback(&FilterEvent::Progress { admitted: 1 });
    }

    #[test]
    fn test_tracing_events_callback() {
        let callback = tracing_events();
        callback(&FilterEvent::Decided {
            title: "Foo",
            decision: Decision::DropRedirect,
        });
        callback(&FilterEvent::Progress { admitted: 1000 });
    }

    #[test]
    fn test_callback_receives_borrowed_titles() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let callback: EventCallback = Arc::new(move |event| {
            if let FilterEvent::Decided { title, decision } = event {
                sink.lock().unwrap().push((title.to_string(), *decision));
            }
        });

        let title = String::from("Budapest");
        callback(&FilterEvent::Decided {
            title: &title,
            decision: Decision::Admit,
        });

        let seen = seen.lock().unwrap();
        assert_eq!(seen.as_slice(), &[("Budapest".to_string(), Decision::Admit)]);
    }
}
