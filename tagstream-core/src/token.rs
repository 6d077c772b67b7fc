//! Tokens - the output of the tokenizer.
//!
//! A token is one structural unit of the input: a text run, an opening or
//! closing tag, a self-closing tag, a comment, a CDATA section or a
//! declaration. Tokens own their content as code points; use [`decode`] or
//! [`Token::text`] for a `String`.
//!
//! ## Token Shapes
//!
//! `<a href="x">hi &amp; bye</a><br/><!--c-->` yields:
//! ```text
//! TagOpen      Arbitrary  "a"   [href="x"]
//! Text         None       "hi & bye"
//! TagClose     Arbitrary  "a"
//! TagSelfClose Arbitrary  "br"
//! TagSelfClose Comment    "c"
//! ```
//!
//! Comments, CDATA sections and declarations are always `TagSelfClose`.

use std::ops::RangeInclusive;

use indexmap::IndexMap;

/// Syntactic shape of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum TokenKind {
    Text,
    /// `<name ...>`
    TagOpen,
    /// `</name>`
    TagClose,
    /// `<name .../>`, and every comment, CDATA section and declaration.
    TagSelfClose,
}

/// Semantic category of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum TagCategory {
    /// Plain text.
    None,
    /// `<?name ...?>`
    Declaration,
    /// `<!--...-->`
    Comment,
    /// `<![CDATA[...]]>`
    Cdata,
    /// Any element tag.
    Arbitrary,
}

/// One `key="value"` pair from an opening tag.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Attribute {
    pub key: Vec<char>,
    pub value: Vec<char>,
    /// The quote character that delimited the value, `"` or `'`.
    pub quote: char,
    /// Offset of the first key character.
    pub start: usize,
    /// Offset of the closing quote.
    pub end: usize,
}

impl Attribute {
    pub fn key_str(&self) -> String {
        decode(&self.key)
    }

    pub fn value_str(&self) -> String {
        decode(&self.value)
    }
}

/// A recognized structural unit of the input.
///
/// Tokens are only ever handed out complete; there is no way to observe or
/// modify one while the tokenizer is still filling it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Token {
    pub kind: TokenKind,
    pub tag: TagCategory,
    /// Offset of the first code point (inclusive).
    pub start: usize,
    /// Offset of the last code point (inclusive).
    pub end: usize,
    /// Text payload, or the tag name for elements and declarations.
    pub content: Vec<char>,
    /// Attributes in source order; empty unless the tag had any.
    pub attributes: Vec<Attribute>,
}

impl Token {
    /// `content` as a `String`.
    pub fn text(&self) -> String {
        decode(&self.content)
    }

    /// The tag name, for element and declaration tokens.
    pub fn name(&self) -> Option<String> {
        match self.tag {
            TagCategory::Arbitrary | TagCategory::Declaration => Some(self.text()),
            _ => None,
        }
    }

    /// Source range covered by this token.
    pub fn span(&self) -> RangeInclusive<usize> {
        self.start..=self.end
    }

    pub fn has_attributes(&self) -> bool {
        !self.attributes.is_empty()
    }

    /// Attributes decoded into a key/value map, or `None` if there are none.
    pub fn attribute_map(&self) -> Option<AttrMap> {
        self.has_attributes().then(|| attributes_to_map(&self.attributes))
    }

    pub fn is_element(&self) -> bool {
        matches!(self.tag, TagCategory::Arbitrary | TagCategory::Declaration)
    }
}

/// Decoded attributes, in the order their keys first appeared.
pub type AttrMap = IndexMap<String, String>;

/// Turn a code point sequence into a `String`.
pub fn decode(content: &[char]) -> String {
    content.iter().collect()
}

/// Decode an attribute list into a key/value map.
///
/// A key that appears more than once keeps its first position and takes the
/// last value.
pub fn attributes_to_map(attributes: &[Attribute]) -> AttrMap {
    attributes
        .iter()
        .map(|attr| (attr.key_str(), attr.value_str()))
        .collect()
}
