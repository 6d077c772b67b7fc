//! Tree representation for XML documents.
//!
//! This module assembles the tokenizer's output into an owned forest of
//! [`Node`]s. Closing tags are checked against the element they close; any
//! mismatch aborts the build.
//!
//! # Example
//!
//! ```
//! use tagstream_core::tree::{parse, Node};
//!
//! let nodes = parse("<feed><title>News</title><link href='/x'/></feed>").unwrap();
//! let feed = nodes[0].as_element().unwrap();
//! assert_eq!(feed.name, "feed");
//!
//! for child in feed.children() {
//!     if let Some(el) = child.as_element() {
//!         println!("{} {:?}", el.name, el.attr("href"));
//!     }
//! }
//! assert_eq!(nodes[0].all_text(), "News");
//! ```

use tracing::trace;

use crate::error::{Error, Result};
use crate::options::ParseOptions;
use crate::source::Source;
use crate::token::{AttrMap, TagCategory, Token, TokenKind};
use crate::tokenizer::Tokenizer;

// ============================================================================
// Core Types
// ============================================================================

/// One entry in the assembled tree.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Node {
    Element(Element),
    Text(String),
    Cdata(String),
    Comment(String),
}

/// Whether an element came from an ordinary tag or a `<?...?>` declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ElementKind {
    Arbitrary,
    Declaration,
}

/// An element or declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Element {
    pub kind: ElementKind,
    pub name: String,
    /// `None` when the tag carried no attributes.
    pub attributes: Option<AttrMap>,
    /// `None` for self-closing tags and declarations, which cannot have
    /// children; `Some(vec![])` for an element that was opened and closed
    /// with nothing in between.
    pub children: Option<Vec<Node>>,
}

impl Element {
    /// Build a childless element from an element or declaration token.
    ///
    /// Returns `None` for text, comment and CDATA tokens.
    pub fn from_token(token: &Token) -> Option<Self> {
        let kind = match token.tag {
            TagCategory::Arbitrary => ElementKind::Arbitrary,
            TagCategory::Declaration => ElementKind::Declaration,
            _ => return None,
        };
        Some(Element {
            kind,
            name: token.text(),
            attributes: token.attribute_map(),
            children: None,
        })
    }

    /// Get an attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.as_ref()?.get(name).map(String::as_str)
    }

    /// Iterate over all attributes in source order.
    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .flatten()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Iterate over child nodes; empty for self-closing elements.
    pub fn children(&self) -> std::slice::Iter<'_, Node> {
        self.children.as_deref().unwrap_or(&[]).iter()
    }

    pub fn is_self_closing(&self) -> bool {
        self.children.is_none()
    }

    pub fn is_declaration(&self) -> bool {
        self.kind == ElementKind::Declaration
    }

    /// First child element with the given name.
    pub fn find(&self, name: &str) -> Option<&Element> {
        self.children()
            .filter_map(Node::as_element)
            .find(|el| el.name == name)
    }
}

impl Node {
    /// Build a childless node from any token except a closing tag.
    pub fn from_token(token: &Token) -> Option<Self> {
        match token.tag {
            TagCategory::None => Some(Node::Text(token.text())),
            TagCategory::Cdata => Some(Node::Cdata(token.text())),
            TagCategory::Comment => Some(Node::Comment(token.text())),
            TagCategory::Arbitrary | TagCategory::Declaration => {
                if token.kind == TokenKind::TagClose {
                    return None;
                }
                Element::from_token(token).map(Node::Element)
            }
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self, Node::Element(_))
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Node::Text(_))
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Content of a text, CDATA or comment node.
    pub fn text(&self) -> Option<&str> {
        match self {
            Node::Text(s) | Node::Cdata(s) | Node::Comment(s) => Some(s),
            Node::Element(_) => None,
        }
    }

    /// Recursively collect all text and CDATA content under this node.
    pub fn all_text(&self) -> String {
        let mut result = String::new();
        self.collect_text(&mut result);
        result
    }

    fn collect_text(&self, buf: &mut String) {
        match self {
            Node::Text(s) | Node::Cdata(s) => buf.push_str(s),
            Node::Comment(_) => {}
            Node::Element(el) => {
                for child in el.children() {
                    child.collect_text(buf);
                }
            }
        }
    }
}

// ============================================================================
// Entry points
// ============================================================================

/// Parse a string into a forest with default options.
///
/// A closing tag at the top level, with no element open, ends the parse:
/// the nodes before it are returned and everything after it is ignored.
/// `parse("<a/></x><b/>")` yields only `<a/>`. Drive a [`TreeBuilder`]
/// directly to resume after such a tag.
pub fn parse(input: &str) -> Result<Vec<Node>> {
    let chars: Vec<char> = input.chars().collect();
    parse_with(chars, ParseOptions::default())
}

/// Parse any source into a forest.
///
/// A stray closing tag at the top level ends the parse the same way as in
/// [`parse`]; the tokens after it are not read.
pub fn parse_with<S: Source>(source: S, options: ParseOptions) -> Result<Vec<Node>> {
    let mut tokens = Tokenizer::with_options(source, options);
    TreeBuilder::new(options.max_depth).build(&mut tokens, None)
}

// ============================================================================
// TreeBuilder (token consumer)
// ============================================================================

/// Recursive tree assembler.
///
/// Every level of the recursion pulls from the same token iterator, so a
/// nested call leaves the cursor just past the closing tag it consumed.
#[derive(Debug, Clone, Copy)]
pub struct TreeBuilder {
    max_depth: usize,
    depth: usize,
    /// End offset of the last token pulled, for errors at end of input.
    last_end: usize,
}

impl TreeBuilder {
    pub fn new(max_depth: usize) -> Self {
        TreeBuilder {
            max_depth,
            depth: 0,
            last_end: 0,
        }
    }

    /// Build sibling nodes until the stream ends or a closing tag ends this
    /// level.
    ///
    /// With `expected_close` set, the closing tag must carry that name; the
    /// stream running dry first is an error. Without it, the first closing
    /// tag of any name ends the level, as does the end of the stream.
    pub fn build<I>(&mut self, tokens: &mut I, expected_close: Option<&str>) -> Result<Vec<Node>>
    where
        I: Iterator<Item = Result<Token>>,
    {
        let mut nodes = Vec::new();

        while let Some(token) = tokens.next() {
            let token = token?;
            self.last_end = token.end;

            if token.kind == TokenKind::TagClose {
                let name = token.text();
                return match expected_close {
                    Some(expected) if expected != name => Err(Error::TagMismatch {
                        expected: Some(expected.to_string()),
                        found: Some(name),
                        offset: token.start,
                    }),
                    _ => {
                        trace!(name = %name, depth = self.depth, "element closed");
                        Ok(nodes)
                    }
                };
            }

            match Element::from_token(&token) {
                Some(mut element) => {
                    if token.kind != TokenKind::TagSelfClose {
                        element.children = Some(self.nested(tokens, &element.name, token.start)?);
                    }
                    nodes.push(Node::Element(element));
                }
                None => {
                    if let Some(leaf) = Node::from_token(&token) {
                        nodes.push(leaf);
                    }
                }
            }
        }

        match expected_close {
            Some(open) => Err(Error::TagMismatch {
                expected: Some(open.to_string()),
                found: None,
                offset: self.last_end,
            }),
            None => Ok(nodes),
        }
    }

    fn nested<I>(&mut self, tokens: &mut I, name: &str, offset: usize) -> Result<Vec<Node>>
    where
        I: Iterator<Item = Result<Token>>,
    {
        if self.depth >= self.max_depth {
            return Err(Error::NestingTooDeep {
                depth: self.depth + 1,
                limit: self.max_depth,
            });
        }
        trace!(name, offset, depth = self.depth, "element opened");
        self.depth += 1;
        let children = self.build(tokens, Some(name));
        self.depth -= 1;
        children
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new(crate::options::DEFAULT_MAX_DEPTH)
    }
}

// ============================================================================
// Tests
// ============================================================================
