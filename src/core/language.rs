//! Language-specific disambiguation markers.
//!
//! Wikipedia disambiguation pages carry a localized parenthetical in their
//! title, e.g. `Mercury (disambiguation)`. [`DisambiguationTable`] maps a
//! two-letter language code to that marker. The table is built once at
//! startup and handed to the run as configuration.
//!
//! # Example
//!
//! ```
//! use zimpack::core::language::DisambiguationTable;
//!
//! # fn main() -> zimpack::Result<()> {
//! let table = DisambiguationTable::default().with_language("de", "(Begriffsklärung)");
//! assert_eq!(table.marker("de")?, "(Begriffsklärung)");
//! assert!(table.marker("xx").is_err());
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ZimpackError};

/// Mapping from language code to disambiguation title marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisambiguationTable {
    markers: BTreeMap<String, String>,
}

impl Default for DisambiguationTable {
    /// The languages supported out of the box: English and Hungarian.
    fn default() -> Self {
        Self::empty()
            .with_language("en", "(disambiguation)")
            .with_language("hu", "(egyértelműsítő lap)")
    }
}

impl DisambiguationTable {
    /// Creates a table without any language.
    pub fn empty() -> Self {
        Self {
            markers: BTreeMap::new(),
        }
    }

    /// Adds or replaces the marker for a language.
    #[must_use]
    pub fn with_language(mut self, code: impl Into<String>, marker: impl Into<String>) -> Self {
        self.markers.insert(code.into(), marker.into());
        self
    }

    /// Looks up the marker for `code`.
    ///
    /// # Errors
    ///
    /// Returns [`ZimpackError::UnsupportedLanguage`] if the code is unknown.
    pub fn marker(&self, code: &str) -> Result<&str> {
        self.markers
            .get(code)
            .map(String::as_str)
            .ok_or_else(|| ZimpackError::UnsupportedLanguage {
                code: code.to_string(),
                supported: self.languages().collect::<Vec<_>>().join(", "),
            })
    }

    /// Returns `true` if a marker is registered for `code`.
    pub fn supports(&self, code: &str) -> bool {
        self.markers.contains_key(code)
    }

    /// Supported language codes in sorted order.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.markers.keys().map(String::as_str)
    }
}
