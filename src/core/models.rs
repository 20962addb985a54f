//! Core data models for archive records and filter decisions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Namespace marker of genuine textual articles in a ZIM archive.
pub const ARTICLE_NAMESPACE: char = 'A';

/// One candidate article read from an archive.
///
/// Only metadata lives here; the payload is fetched on demand through
/// [`RecordSource::payload`](crate::archive::RecordSource::payload) using
/// [`index`](Self::index), so dropped records never touch their content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Position of the record in its source.
    pub index: usize,
    /// Article title (the URL when the archive stores no title).
    pub title: String,
    /// Single-character namespace marker.
    pub namespace: char,
    /// Whether the record redirects to another entry.
    pub is_redirect: bool,
    /// Whether the record has been deleted from the archive.
    pub is_deleted: bool,
}

impl Record {
    /// Creates a plain article record in the article namespace.
    pub fn new(index: usize, title: impl Into<String>) -> Self {
        Self {
            index,
            title: title.into(),
            namespace: ARTICLE_NAMESPACE,
            is_redirect: false,
            is_deleted: false,
        }
    }

    /// Builder-style method to set the namespace.
    #[must_use]
    pub fn namespace(mut self, namespace: char) -> Self {
        self.namespace = namespace;
        self
    }

    /// Builder-style method to mark the record as a redirect.
    #[must_use]
    pub fn redirect(mut self) -> Self {
        self.is_redirect = true;
        self
    }

    /// Builder-style method to mark the record as deleted.
    #[must_use]
    pub fn deleted(mut self) -> Self {
        self.is_deleted = true;
        self
    }
}

/// Outcome of classifying one record.
///
/// Exactly one decision is produced per record; see
/// [`classify`](crate::core::filter::classify) for the rule order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// The record is written to a batch file.
    Admit,
    /// The record is outside the article namespace.
    DropNotArticleNamespace,
    /// The record is a redirect.
    DropRedirect,
    /// The record is deleted.
    DropDeleted,
    /// The title carries the disambiguation marker.
    DropDisambiguation,
}

impl Decision {
    /// Returns `true` for [`Decision::Admit`].
    pub fn is_admit(self) -> bool {
        self == Decision::Admit
    }

    /// Short machine-friendly reason tag.
    pub fn reason(self) -> &'static str {
        match self {
            Decision::Admit => "admitted",
            Decision::DropNotArticleNamespace => "not_article_namespace",
            Decision::DropRedirect => "redirect",
            Decision::DropDeleted => "deleted",
            Decision::DropDisambiguation => "disambiguation",
        }
    }

    /// All decisions, admit first.
    pub fn all() -> &'static [Decision] {
        &[
            Decision::Admit,
            Decision::DropNotArticleNamespace,
            Decision::DropRedirect,
            Decision::DropDeleted,
            Decision::DropDisambiguation,
        ]
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Admit => write!(f, "Writing article"),
            Decision::DropNotArticleNamespace => write!(f, "Dropping article not in article namespace"),
            Decision::DropRedirect => write!(f, "Dropping redirect article"),
            Decision::DropDeleted => write!(f, "Dropping deleted article"),
            Decision::DropDisambiguation => write!(f, "Dropping disambiguation article"),
        }
    }
}
