//! Conversion pipeline
//!
//!     One pasted block of text becomes one entity record:
//!
//!         raw text
//!           -> normalize      (repair line-wrapping artifacts, read PAGE=)
//!           -> build          (name + DocumentNode tree, plain text or Markdown)
//!           -> extract        (promote typed fields, drop redundant prose)
//!           -> tag            (wrap vocabulary mentions in {@tag ...})
//!           -> cleanup        (hanging lists, re-applied after extraction)
//!
//!     A [`Converter`] holds everything that is compiled once (vocabulary, taggers, inflicted
//!     condition scanner) and is immutable afterwards, so one converter can serve any number of
//!     conversions, including from several threads. All per-call state lives in the call.
//!
//!     Two kinds of failure exist. Ambiguous prose is reported through the [`DiagnosticSink`]
//!     and never stops the conversion. A [`ConvertError`] is reserved for calls that cannot
//!     produce an entity at all.

use crate::statblock::ast::{map_text, DocumentNode};
use crate::statblock::building::{self, convert_hanging_lists, InputFormat};
use crate::statblock::diagnostics::DiagnosticSink;
use crate::statblock::entity::Race;
use crate::statblock::extraction::extract_race;
use crate::statblock::lexing::ContinuationRules;
use crate::statblock::normalizing::normalize;
use crate::statblock::tagging::inflicted::InflictedScanner;
use crate::statblock::tagging::{Tagger, TaggingOptions};
use crate::statblock::text::to_title_case;
use crate::statblock::vocabulary::Vocabulary;
use std::collections::BTreeSet;
use std::fmt;

/// Source abbreviation used when none is configured.
pub const DEFAULT_SOURCE: &str = "Homebrew";

/// Per-call conversion options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    pub source: String,
    /// Set by the caller, or by a `PAGE=<n>` directive in the input.
    pub page: Option<u32>,
    /// Fields to lower-case and then title-case. Only `"name"` is recognized.
    pub title_case_fields: Vec<String>,
    /// Title-case the name as written.
    pub is_title_case: bool,
    /// Passed through to [`Conversion::is_append`].
    pub is_append: bool,
    pub continuation: ContinuationRules,
    pub tagging: TaggingOptions,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE.to_string(),
            page: None,
            title_case_fields: Vec::new(),
            is_title_case: false,
            is_append: false,
            continuation: ContinuationRules::default(),
            tagging: TaggingOptions::default(),
        }
    }
}

/// A finished conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub entity: Race,
    /// Whether the caller asked to append to, rather than replace, its current output.
    pub is_append: bool,
}

/// Errors that prevent a conversion from producing an entity.
#[derive(Debug)]
pub enum ConvertError {
    /// The input holds no text.
    NoInput,
    /// A vocabulary-derived pattern failed to compile.
    Vocabulary(regex::Error),
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::NoInput => write!(f, "No input: nothing to convert"),
            ConvertError::Vocabulary(e) => write!(f, "Invalid vocabulary entry: {}", e),
        }
    }
}

impl std::error::Error for ConvertError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConvertError::NoInput => None,
            ConvertError::Vocabulary(e) => Some(e),
        }
    }
}

impl From<regex::Error> for ConvertError {
    fn from(e: regex::Error) -> Self {
        ConvertError::Vocabulary(e)
    }
}

/// Compiled conversion context.
pub struct Converter {
    vocabulary: Vocabulary,
    tagger: Tagger,
    inflicted: InflictedScanner,
}

impl Converter {
    pub fn new(vocabulary: Vocabulary) -> Result<Self, ConvertError> {
        let tagger = Tagger::new(&vocabulary)?;
        let inflicted = InflictedScanner::new(&vocabulary)?;
        Ok(Self {
            vocabulary,
            tagger,
            inflicted,
        })
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Convert plain-text input.
    pub fn parse_text(
        &self,
        raw: &str,
        options: &mut ConvertOptions,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Conversion, ConvertError> {
        self.convert(raw, InputFormat::PlainText, options, sink)
    }

    /// Convert Markdown input.
    pub fn parse_markdown(
        &self,
        raw: &str,
        options: &mut ConvertOptions,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Conversion, ConvertError> {
        self.convert(raw, InputFormat::Markdown, options, sink)
    }

    pub fn convert(
        &self,
        raw: &str,
        format: InputFormat,
        options: &mut ConvertOptions,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Conversion, ConvertError> {
        if raw.trim().is_empty() {
            return Err(ConvertError::NoInput);
        }

        let text = normalize(raw, Some(&mut *options));
        let built = building::build(&text, format, &options.continuation, sink);
        let name = built.name.ok_or(ConvertError::NoInput)?;

        let mut race = Race::new(title_case_name(&name, options), options.source.clone());
        race.page = options.page;
        race.entries = built.entries;

        extract_race(&mut race, sink);
        self.tag_entries(&mut race.entries, &options.tagging);
        let converted = convert_hanging_lists(&mut race.entries);
        log::debug!(
            "converted {:?} ({} hanging lists after extraction)",
            race.name,
            converted
        );

        Ok(Conversion {
            entity: race,
            is_append: options.is_append,
        })
    }

    /// Tag every prose string in place.
    pub fn tag_entries(&self, entries: &mut [DocumentNode], options: &TaggingOptions) {
        map_text(entries, &mut |text: &str| self.tagger.tag(text, options));
    }

    /// Tag one string.
    pub fn tag(&self, text: &str, options: &TaggingOptions) -> String {
        self.tagger.tag(text, options)
    }

    /// Conditions the entries inflict on others, limited to `allow` when given.
    pub fn inflicted_conditions(
        &self,
        entries: &[DocumentNode],
        allow: Option<&BTreeSet<String>>,
    ) -> BTreeSet<String> {
        self.inflicted.scan_nodes(entries, allow)
    }
}

fn title_case_name(name: &str, options: &ConvertOptions) -> String {
    let name = name.trim();
    if options
        .title_case_fields
        .iter()
        .any(|field| field.eq_ignore_ascii_case("name"))
    {
        to_title_case(&name.to_lowercase())
    } else if options.is_title_case {
        to_title_case(name)
    } else {
        name.to_string()
    }
}
