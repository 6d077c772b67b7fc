//! Streaming (SAX-style) traversal.
//!
//! The walker consumes tokens one at a time and keeps only the stack of
//! currently open tags. Every complete node (text, comment, CDATA,
//! self-closing element, declaration) is handed to a visitor together with
//! its dotted path and the open ancestors; opening tags are never visited
//! themselves because their content has not been seen yet.
//!
//! ```
//! use std::ops::ControlFlow;
//! use tagstream_core::walker::walk_str;
//!
//! let mut titles = Vec::new();
//! walk_str("<rss><item><title>A</title></item><item><title>B</title></item></rss>",
//!     |path, node, _ancestors| {
//!         if path == "rss.item.title" {
//!             titles.push(node.text().unwrap_or_default().to_string());
//!         }
//!         ControlFlow::Continue(())
//!     },
//! )
//! .unwrap();
//! assert_eq!(titles, ["A", "B"]);
//! ```

use std::ops::ControlFlow;

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::options::ParseOptions;
use crate::token::{AttrMap, Token, TokenKind};
use crate::tokenizer::Tokenizer;
use crate::tree::Node;

/// An element whose closing tag has not been reached yet.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct OpenTag {
    pub name: String,
    pub attributes: Option<AttrMap>,
}

impl OpenTag {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.as_ref()?.get(name).map(String::as_str)
    }
}

/// How a walk that did not fail ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkOutcome {
    /// Every token was consumed.
    Completed,
    /// The visitor returned `ControlFlow::Break`.
    Stopped,
}

/// Stack-based token consumer.
#[derive(Debug)]
pub struct Walker {
    stack: Vec<OpenTag>,
    /// Length of `path` before each open tag's name was appended.
    path_marks: Vec<usize>,
    path: String,
    max_depth: usize,
}

impl Walker {
    pub fn new(max_depth: usize) -> Self {
        Walker {
            stack: Vec::new(),
            path_marks: Vec::new(),
            path: String::new(),
            max_depth,
        }
    }

    /// Drive `visitor` over every complete node in `tokens`.
    ///
    /// Fails on the first tokenizer error, on a closing tag that does not
    /// match the innermost open tag, and on input that ends with tags still
    /// open. Returns [`WalkOutcome::Stopped`] as soon as the visitor breaks;
    /// tags still open at that point are left unchecked.
    ///
    /// Each walk starts from an empty stack. After a walk that stopped or
    /// failed, [`path`](Self::path) and [`depth`](Self::depth) describe the
    /// tags that were open at that point, until the next walk begins.
    pub fn walk<I, V>(&mut self, tokens: I, mut visitor: V) -> Result<WalkOutcome>
    where
        I: IntoIterator<Item = Result<Token>>,
        V: FnMut(&str, &Node, &[OpenTag]) -> ControlFlow<()>,
    {
        self.reset();
        let mut last_end = 0;

        for token in tokens {
            let token = token?;
            last_end = token.end;

            match token.kind {
                TokenKind::TagOpen => self.push(&token)?,
                TokenKind::TagClose => self.pop(&token)?,
                TokenKind::Text | TokenKind::TagSelfClose => {
                    let Some(node) = Node::from_token(&token) else {
                        continue;
                    };
                    if visitor(&self.path, &node, &self.stack).is_break() {
                        debug!(path = %self.path, offset = token.start, "walk stopped by visitor");
                        return Ok(WalkOutcome::Stopped);
                    }
                }
            }
        }

        match self.stack.last() {
            Some(open) => Err(Error::TagMismatch {
                expected: Some(open.name.clone()),
                found: None,
                offset: last_end,
            }),
            None => Ok(WalkOutcome::Completed),
        }
    }

    /// Names of the currently open tags joined with `.`.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    fn reset(&mut self) {
        self.stack.clear();
        self.path_marks.clear();
        self.path.clear();
    }

    fn push(&mut self, token: &Token) -> Result<()> {
        if self.stack.len() >= self.max_depth {
            return Err(Error::NestingTooDeep {
                depth: self.stack.len() + 1,
                limit: self.max_depth,
            });
        }
        let name = token.text();
        self.path_marks.push(self.path.len());
        if !self.path.is_empty() {
            self.path.push('.');
        }
        self.path.push_str(&name);
        trace!(name = %name, depth = self.stack.len() + 1, "push");
        self.stack.push(OpenTag {
            name,
            attributes: token.attribute_map(),
        });
        Ok(())
    }

    fn pop(&mut self, token: &Token) -> Result<()> {
        let name = token.text();
        match self.stack.last() {
            Some(open) if open.name == name => {
                self.stack.pop();
                if let Some(mark) = self.path_marks.pop() {
                    self.path.truncate(mark);
                }
                trace!(name = %name, depth = self.stack.len(), "pop");
                Ok(())
            }
            open => Err(Error::TagMismatch {
                expected: open.map(|o| o.name.clone()),
                found: Some(name),
                offset: token.start,
            }),
        }
    }
}

impl Default for Walker {
    fn default() -> Self {
        Self::new(crate::options::DEFAULT_MAX_DEPTH)
    }
}

/// Walk a token stream with a fresh [`Walker`].
pub fn walk<I, V>(tokens: I, visitor: V) -> Result<WalkOutcome>
where
    I: IntoIterator<Item = Result<Token>>,
    V: FnMut(&str, &Node, &[OpenTag]) -> ControlFlow<()>,
{
    Walker::default().walk(tokens, visitor)
}

/// Tokenize `input` with default options and walk it.
pub fn walk_str<V>(input: &str, visitor: V) -> Result<WalkOutcome>
where
    V: FnMut(&str, &Node, &[OpenTag]) -> ControlFlow<()>,
{
    let chars: Vec<char> = input.chars().collect();
    let options = ParseOptions::default();
    Walker::new(options.max_depth).walk(Tokenizer::with_options(chars, options), visitor)
}
