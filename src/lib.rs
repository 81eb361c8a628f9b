#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! # marcline: MARC records in line format
//!
//! An in-memory MARC record model with a line-oriented text format,
//! matcher-driven traversal and MarcXchange conversion.
//!
//! ## Quick Start
//!
//! ### Building and printing a record
//!
//! ```
//! use marcline::{Field, Record};
//!
//! let mut record = Record::new();
//! record.append(
//!     Field::builder("245", "00")
//!         .subfield("a", "Something's goin' on")
//!         .subfield("e", "Cliff Richard")
//!         .build(),
//! );
//! assert_eq!(record.to_string(), "245 00 *a Something's goin' on *e Cliff Richard \n");
//! ```
//!
//! ### Parsing and querying
//!
//! ```
//! use marcline::{MatchField, Record, RecordHelpers};
//! use regex::Regex;
//!
//! let record: Record = "700 00 *a Marvin *h Hank\n700 00 *a Richard *h Cliff\n"
//!     .parse()
//!     .unwrap();
//!
//! let second = MatchField::field("700").unwrap().bounds(Some(2), None);
//! assert_eq!(record.get_first_value(second, Regex::new("h").unwrap()), "Cliff");
//! ```
//!
//! ## Modules
//!
//! - [`record`] - Core structures (`Record`, `Field`, `Subfield`)
//! - [`line_format`] - Line format reading and writing
//! - [`matchers`] - Field and subfield matchers
//! - [`sorters`] - Field orderings for traversals
//! - [`traversal`] - `EachFactory`, handlers and result folding
//! - [`record_helpers`] - Value extraction and removal helpers
//! - [`marcxchange`] - MarcXchange XML and flat field conversion
//! - [`recovery`] - Lenient parsing support
//! - [`error`] - Error types and result type

pub mod error;
pub mod line_format;
pub mod marcxchange;
pub mod matchers;
/// Core MARC record structures (`Record`, `Field`, `Subfield`)
pub mod record;
pub mod record_helpers;
pub mod recovery;
pub mod sorters;
pub mod traversal;

pub use error::{MarcError, Result};
pub use line_format::{EscapeMode, LineFormatOptions};
pub use marcxchange::{FlatField, MarcFormat, RecordType};
pub use matchers::{
    DbcMatchField, FieldMatcher, MatchAll, MatchField, MatchFunc, MatchSubField, SubfieldMatcher,
};
pub use record::{Field, FieldBuilder, FieldKind, Record, RecordBuilder, Subfield};
pub use record_helpers::{FieldHelpers, RecordHelpers};
pub use recovery::{RecoveryContext, RecoveryMode};
pub use sorters::{FieldSorter, SortBySubfields, SortChain, SortDirection, SortWith};
pub use traversal::{
    Combine, EachFactory, FieldHandler, Handler, MatchMap, SubfieldHandler, SubfieldMap,
};
