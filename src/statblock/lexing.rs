//! Line Classification
//!
//!     Pasted stat blocks have no grammar to tokenize against. Instead of a lexer producing
//!     tokens, this stage is a set of yes/no questions asked of one trimmed line at a time:
//!     is it blank, is it a list item, is it a title, does it open with an inline heading,
//!     does it continue the previous line. The document builders call these in a fixed
//!     priority order.
//!
//!     Every predicate is a pure function. Each heuristic rule is kept separate so it can be
//!     tested on its own and, for the continuation rules, switched off through
//!     [`ContinuationRules`].
//!
//! Modules:
//!     - line_classification: blank / list item / title predicates
//!     - name_line: the "Name. Rest of sentence" inline heading splitter
//!     - continuation: the continuation-line rules

pub mod continuation;
pub mod line_classification;
pub mod name_line;

pub use continuation::{is_continuation_line, ContinuationRules};
pub use line_classification::{is_blank, is_list_item, is_title_line, strip_list_marker};
pub use name_line::{is_name_line, split_name_line, NameLine};
