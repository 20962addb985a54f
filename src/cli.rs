//! Command-line interface definition using clap.
//!
//! This module defines [`Args`], the `zimpack` binary's arguments, and
//! the conversion into a library [`ExtractConfig`].
//!
//! ```rust
//! use clap::Parser;
//! use zimpack::cli::Args;
//!
//! let args = Args::parse_from(["zimpack", "-i", "wiki.zim", "-o", "out", "-l", "en"]);
//! let config = args.to_config();
//! assert_eq!(config.language, "en");
//! assert_eq!(config.documents_per_file, 2500);
//! ```

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::config::{DEFAULT_LANGUAGE, ExtractConfig};
use crate::core::batch::{DEFAULT_COMPRESSION_LEVEL, DEFAULT_DOCUMENTS_PER_FILE, DEFAULT_NAME_WIDTH};
use crate::core::models::ARTICLE_NAMESPACE;

/// Extract articles from a ZIM archive into numbered, length-prefixed
/// gzip batch files.
#[derive(Parser, Debug, Clone)]
#[command(name = "zimpack")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    zimpack -i wikipedia_hu_all.zim -o corpus
    zimpack -i wikipedia_en_all.zim -o corpus -l en -d 10000 -Z 6
    RUST_LOG=debug zimpack -i wiki.zim -o out")]
pub struct Args {
    /// ZIM archive to read
    #[arg(short = 'i', long = "input-file", value_name = "FILE")]
    pub input_file: PathBuf,

    /// Directory for the batch files (created if missing)
    #[arg(short = 'o', long = "output-dir", value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Language of the archive, selects the disambiguation marker
    #[arg(short = 'l', long, default_value = DEFAULT_LANGUAGE)]
    pub language: String,

    /// Number of documents per batch file
    #[arg(short = 'd', long, default_value_t = DEFAULT_DOCUMENTS_PER_FILE)]
    pub documents: usize,

    /// Number of digits in batch file names
    #[arg(short = 'Z', long, default_value_t = DEFAULT_NAME_WIDTH)]
    pub zeroes: usize,

    /// Gzip compression level (0-9)
    #[arg(long, value_name = "LEVEL", default_value_t = DEFAULT_COMPRESSION_LEVEL)]
    pub compression_level: u32,

    /// Namespace of the entries to extract
    #[arg(long, default_value_t = ARTICLE_NAMESPACE)]
    pub namespace: char,

    /// Log every record decision (-vv for trace output)
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Builds the library configuration from the parsed arguments.
    pub fn to_config(&self) -> ExtractConfig {
        ExtractConfig::new(&self.input_file, &self.output_dir)
            .with_language(self.language.clone())
            .with_documents_per_file(self.documents)
            .with_filename_digit_width(self.zeroes)
            .with_compression_level(self.compression_level)
            .with_article_namespace(self.namespace)
    }

    /// Default log filter when `RUST_LOG` is not set.
    pub fn log_filter(&self) -> &'static str {
        if self.quiet {
            return "warn";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_defaults_match_config() {
        let args = Args::parse_from(["zimpack", "-i", "in.zim", "-o", "out"]);
        let config = args.to_config();
        assert_eq!(config, ExtractConfig::new("in.zim", "out"));
        assert_eq!(args.log_filter(), "info");
    }

    #[test]
    fn test_short_flags() {
        let args = Args::parse_from([
            "zimpack", "-i", "in.zim", "-o", "out", "-l", "en", "-d", "10", "-Z", "2", "-vv",
        ]);
        assert_eq!(args.language, "en");
        assert_eq!(args.documents, 10);
        assert_eq!(args.zeroes, 2);
        assert_eq!(args.log_filter(), "trace");
    }

    #[test]
    fn test_long_flags() {
        let args = Args::parse_from([
            "zimpack",
            "--input-file",
            "in.zim",
            "--output-dir",
            "out",
            "--compression-level",
            "1",
            "--namespace",
            "C",
            "--quiet",
        ]);
        let config = args.to_config();
        assert_eq!(config.compression_level, 1);
        assert_eq!(config.article_namespace, 'C');
        assert_eq!(args.log_filter(), "warn");
    }

    #[test]
    fn test_missing_required_args() {
        assert!(Args::try_parse_from(["zimpack", "-o", "out"]).is_err());
        assert!(Args::try_parse_from(["zimpack", "-i", "in.zim"]).is_err());
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Args::try_parse_from(["zimpack", "-i", "a", "-o", "b", "-v", "-q"]).is_err());
    }
}
