//! Sample inputs
//!
//! Curated pastes live under `samples/` at the crate root, one file per input. The extension
//! picks the format: `.md` is Markdown, anything else is plain text.

use crate::statblock::building::InputFormat;
use crate::statblock::diagnostics::Diagnostics;
use crate::statblock::pipeline::{Conversion, ConvertOptions, Converter};
use crate::statblock::vocabulary::Vocabulary;
use std::fs;
use std::path::PathBuf;

pub struct Samples;

impl Samples {
    pub fn dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("samples")
    }

    pub fn path(name: &str) -> PathBuf {
        Self::dir().join(name)
    }

    /// Read a sample. Panics with the path when it is missing.
    pub fn source(name: &str) -> String {
        let path = Self::path(name);
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("Failed to read sample {}: {}", path.display(), e))
    }

    pub fn format(name: &str) -> InputFormat {
        if name.ends_with(".md") {
            InputFormat::Markdown
        } else {
            InputFormat::PlainText
        }
    }

    /// All sample names under a subdirectory, sorted.
    pub fn list(subdir: &str) -> Vec<String> {
        let dir = Self::dir().join(subdir);
        let mut names: Vec<String> = fs::read_dir(&dir)
            .unwrap_or_else(|e| panic!("Failed to list samples in {}: {}", dir.display(), e))
            .filter_map(Result::ok)
            .filter(|entry| entry.path().is_file())
            .map(|entry| format!("{}/{}", subdir, entry.file_name().to_string_lossy()))
            .collect();
        names.sort();
        names
    }

    /// Convert a sample with default options and the built-in vocabulary.
    pub fn convert(name: &str) -> (Conversion, Diagnostics) {
        let converter = Converter::new(Vocabulary::builtin())
            .unwrap_or_else(|e| panic!("Failed to build converter: {}", e));
        let mut options = ConvertOptions::default();
        let mut diagnostics = Diagnostics::new();
        let conversion = converter
            .convert(
                &Self::source(name),
                Self::format(name),
                &mut options,
                &mut diagnostics,
            )
            .unwrap_or_else(|e| panic!("Failed to convert sample {}: {}", name, e));
        (conversion, diagnostics)
    }
}
