//! tagstream core parser
//!
//! Lazy, pull-based XML tokenizer with two consumers built on its token
//! stream: a recursive tree builder and a stack-based streaming walker.
//! Input is any random-access sequence of already decoded code points.
//!
//! # Architecture
//!
//! - **chars.rs** - Code point classes (letters, identifiers, whitespace)
//! - **entity.rs** - Predefined and numeric entity references
//! - **source.rs** - Random-access input trait
//! - **tokenizer.rs** - The state machine, an `Iterator` of tokens
//! - **token.rs** - Token/Attribute types and decoding helpers
//! - **tree.rs** - Node tree and the recursive tree builder
//! - **walker.rs** - SAX-style walker over an explicit open-tag stack
//! - **error.rs** - Error and position types
//! - **options.rs** - Parser configuration
//!
//! ```
//! use tagstream_core::{parse, Node};
//!
//! let nodes = parse("<parent><child>some text</child></parent>").unwrap();
//! let child = nodes[0].as_element().unwrap().find("child").unwrap();
//! assert_eq!(child.children().next(), Some(&Node::Text("some text".into())));
//! ```

pub mod chars;
pub mod entity;
pub mod error;
pub mod options;
pub mod source;
pub mod token;
pub mod tokenizer;
pub mod tree;
pub mod walker;

pub use error::{Error, ErrorKind, Position, Result, SyntaxError};
pub use options::ParseOptions;
pub use source::Source;
pub use token::{attributes_to_map, decode, AttrMap, Attribute, TagCategory, Token, TokenKind};
pub use tokenizer::{ScanState, TagState, Tokenizer};
pub use tree::{parse, parse_with, Element, ElementKind, Node, TreeBuilder};
pub use walker::{walk, walk_str, OpenTag, WalkOutcome, Walker};

/// Tokenize a string with default options.
pub fn tokenize(input: &str) -> Tokenizer<Vec<char>> {
    Tokenizer::new(input.chars().collect())
}
