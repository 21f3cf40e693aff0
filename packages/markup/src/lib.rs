//! # Braid Markup
//!
//! The textual representation of a Braid document and the pure conversion
//! functions around it:
//!
//! - [`serialize`]: node dictionary + schema set → text lines
//! - [`parse`]: text + schema set + previous dictionary → node dictionary
//! - [`position_of`]: node id → line/column in the serialized text
//!
//! All three are synchronous pure functions over their inputs. The position
//! mapper re-derives offsets from the serializer's own traversal instead of
//! re-scanning the text, so the two can never disagree about layout.

pub mod error;
pub mod parser;
pub mod position;
pub mod serializer;
pub mod tokenizer;

pub use error::{ParseError, ParseResult};
pub use parser::{parse, Parser};
pub use position::{position_of, Position};
pub use serializer::{serialize, Serializer};
pub use tokenizer::{tokenize, Token};
