//! The tokenizing state machine.
//!
//! [`Tokenizer`] walks a [`Source`] once, front to back, and hands out one
//! [`Token`] per call to `next()`. Nothing is buffered beyond the token being
//! assembled, so a caller that stops pulling simply drops the tokenizer.
//!
//! # States
//!
//! ```text
//!            '<'+name / '</' / '<?'            '>' '/>' '?>'
//!   None ─────────────────────────▶ Tag ─────────────────────▶ None
//!    │  '<!--'  ▶ Comment ── '-->' ───────────────────────────▶ None
//!    │  '<![CDATA[' ▶ Cdata ── ']]>' ─────────────────────────▶ None
//!    └─ other ▶ Text ── '<' (left unread) ─────────────────────▶ None
//! ```
//!
//! Inside a tag the machine moves through [`TagState`]: the tag name, then
//! any number of `key="value"` attributes.

use std::fmt;
use std::iter::FusedIterator;
use std::mem;

use tracing::{debug, trace};

use crate::chars::{is_alpha, is_identifier, is_whitespace};
use crate::entity;
use crate::error::{Error, ErrorKind, Position, Result, SyntaxError};
use crate::options::ParseOptions;
use crate::source::Source;
use crate::token::{Attribute, TagCategory, Token, TokenKind};

const CDATA_OPEN: &str = "<![CDATA[";
const CDATA_CLOSE: &str = "]]>";
const COMMENT_OPEN: &str = "<!--";
const COMMENT_CLOSE: &str = "-->";

/// Where the tokenizer is in the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ScanState {
    /// Between tokens, deciding what comes next.
    None,
    ReadingTextNode,
    ReadingTagUntilClose(TagState),
    ReadingComment,
    ReadingCdata,
}

/// Position inside a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum TagState {
    TagName,
    AttrName,
    ExpectingEqualSign,
    AttrValue,
}

impl fmt::Display for ScanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScanState::None => "between tokens",
            ScanState::ReadingTextNode => "reading text",
            ScanState::ReadingTagUntilClose(TagState::TagName) => "reading a tag name",
            ScanState::ReadingTagUntilClose(TagState::AttrName) => "reading an attribute name",
            ScanState::ReadingTagUntilClose(TagState::ExpectingEqualSign) => "expecting `=`",
            ScanState::ReadingTagUntilClose(TagState::AttrValue) => "reading an attribute value",
            ScanState::ReadingComment => "reading a comment",
            ScanState::ReadingCdata => "reading a CDATA section",
        })
    }
}

/// Token under construction. Never leaves the tokenizer.
#[derive(Debug)]
struct PendingToken {
    kind: TokenKind,
    tag: TagCategory,
    start: usize,
    content: Vec<char>,
    attributes: Vec<Attribute>,
}

impl PendingToken {
    fn new(kind: TokenKind, tag: TagCategory, start: usize) -> Self {
        Self {
            kind,
            tag,
            start,
            content: Vec::new(),
            attributes: Vec::new(),
        }
    }

    fn finish(self, end: usize) -> Token {
        Token {
            kind: self.kind,
            tag: self.tag,
            start: self.start,
            end,
            content: self.content,
            attributes: self.attributes,
        }
    }
}

impl Default for PendingToken {
    fn default() -> Self {
        Self::new(TokenKind::Text, TagCategory::None, 0)
    }
}

/// Attribute under construction.
#[derive(Debug, Default)]
struct PendingAttribute {
    key: Vec<char>,
    value: Vec<char>,
    quote: Option<char>,
    start: usize,
}

impl PendingAttribute {
    fn finish(self, quote: char, end: usize) -> Attribute {
        Attribute {
            key: self.key,
            value: self.value,
            quote,
            start: self.start,
            end,
        }
    }
}

/// Pull-based XML tokenizer.
///
/// Yields `Ok(Token)` until the input is exhausted, or a single `Err` for the
/// first malformed construct. Either way the iterator is finished afterwards.
///
/// ```
/// use tagstream_core::{Tokenizer, TokenKind};
///
/// let tokens: Vec<_> = Tokenizer::new(&b"<p>hi</p>"[..])
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(tokens.len(), 3);
/// assert_eq!(tokens[1].kind, TokenKind::Text);
/// assert_eq!(tokens[1].text(), "hi");
/// ```
#[derive(Debug)]
pub struct Tokenizer<S> {
    source: S,
    options: ParseOptions,
    state: ScanState,
    skip_whitespace: bool,
    offset: usize,
    line: usize,
    column: usize,
    token: PendingToken,
    attr: PendingAttribute,
    done: bool,
}

impl<S: Source> Tokenizer<S> {
    pub fn new(source: S) -> Self {
        Self::with_options(source, ParseOptions::default())
    }

    pub fn with_options(source: S, options: ParseOptions) -> Self {
        debug!(len = source.len(), skip_whitespace = options.skip_whitespace, "tokenizer created");
        Self {
            source,
            options,
            state: ScanState::None,
            skip_whitespace: options.skip_whitespace,
            offset: 0,
            line: 1,
            column: 1,
            token: PendingToken::default(),
            attr: PendingAttribute::default(),
            done: false,
        }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Current scan position: the next code point to be read.
    pub fn location(&self) -> Position {
        Position {
            offset: self.offset,
            line: self.line,
            column: self.column,
        }
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    fn next_token(&mut self) -> Result<Option<Token>> {
        loop {
            let Some(c) = self.current()? else {
                return self.finish_input();
            };
            if self.skip_whitespace && is_whitespace(c) {
                self.advance(c);
                continue;
            }
            let token = match self.state {
                ScanState::None => {
                    self.begin(c)?;
                    None
                }
                ScanState::ReadingTextNode => self.text(c)?,
                ScanState::ReadingComment => self.raw_block(c, COMMENT_CLOSE),
                ScanState::ReadingCdata => self.raw_block(c, CDATA_CLOSE),
                ScanState::ReadingTagUntilClose(tag) => self.tag(c, tag)?,
            };
            if token.is_some() {
                return Ok(token);
            }
        }
    }

    /// Decide what starts at `c`.
    fn begin(&mut self, c: char) -> Result<()> {
        let start = self.offset;
        if c != '<' {
            self.open(TokenKind::Text, TagCategory::None, ScanState::ReadingTextNode);
            return Ok(());
        }

        match self.peek(1) {
            Some('?') => {
                self.open(TokenKind::TagSelfClose, TagCategory::Declaration, tag_state(TagState::TagName));
                self.advance_ascii(2);
            }
            Some('/') => {
                self.open(TokenKind::TagClose, TagCategory::Arbitrary, tag_state(TagState::TagName));
                self.advance_ascii(2);
            }
            Some(next) if is_alpha(next) => {
                self.open(TokenKind::TagOpen, TagCategory::Arbitrary, tag_state(TagState::TagName));
                self.advance_ascii(1);
            }
            _ if self.looking_at(CDATA_OPEN) => {
                self.open(TokenKind::TagSelfClose, TagCategory::Cdata, ScanState::ReadingCdata);
                self.advance_ascii(CDATA_OPEN.len());
            }
            _ if self.looking_at(COMMENT_OPEN) => {
                self.open(TokenKind::TagSelfClose, TagCategory::Comment, ScanState::ReadingComment);
                self.advance_ascii(COMMENT_OPEN.len());
            }
            None => return Err(self.error(ErrorKind::UnexpectedEof, Some(c))),
            Some(_) if self.cut_short(CDATA_OPEN) || self.cut_short(COMMENT_OPEN) => {
                return Err(self.error(ErrorKind::UnexpectedEof, Some(c)));
            }
            Some(next) => return Err(self.error(ErrorKind::MalformedMarkup, Some(next))),
        }
        trace!(start, state = ?self.state, "markup opened");
        Ok(())
    }

    fn open(&mut self, kind: TokenKind, tag: TagCategory, state: ScanState) {
        self.token = PendingToken::new(kind, tag, self.offset);
        self.state = state;
        self.skip_whitespace = false;
    }

    fn text(&mut self, c: char) -> Result<Option<Token>> {
        match c {
            // the '<' stays unread for the None state
            '<' => Ok(Some(self.finish_token(self.offset - 1))),
            '&' => {
                self.entity()?;
                Ok(None)
            }
            _ => {
                self.token.content.push(c);
                self.advance(c);
                let plain_until = self.source.find_markup(self.offset);
                while self.offset < plain_until {
                    let Some(c) = self.current()? else { break };
                    self.token.content.push(c);
                    self.advance(c);
                }
                Ok(None)
            }
        }
    }

    /// Decode `&name;` at the cursor into the current text token.
    fn entity(&mut self) -> Result<()> {
        let at = self.location();
        self.advance('&');
        let mut name = String::new();
        loop {
            match self.current()? {
                Some(';') => {
                    self.advance(';');
                    break;
                }
                Some(c) => {
                    name.push(c);
                    self.advance(c);
                }
                None => return Err(self.error(ErrorKind::UnexpectedEof, None)),
            }
        }
        match entity::translate(&name) {
            Some(decoded) => {
                self.token.content.push(decoded);
                Ok(())
            }
            None => Err(SyntaxError {
                kind: ErrorKind::UnknownEntity(name),
                position: at,
                found: Some('&'),
                state: self.state,
            }
            .into()),
        }
    }

    /// Comment and CDATA bodies: copy verbatim up to `closer`.
    fn raw_block(&mut self, c: char, closer: &str) -> Option<Token> {
        if self.looking_at(closer) {
            let end = self.offset + closer.len() - 1;
            self.advance_ascii(closer.len());
            return Some(self.finish_token(end));
        }
        self.token.content.push(c);
        self.advance(c);
        None
    }

    fn tag(&mut self, c: char, state: TagState) -> Result<Option<Token>> {
        if matches!(state, TagState::TagName | TagState::AttrName) {
            if let Some(token) = self.tag_end(c)? {
                return Ok(Some(token));
            }
        }

        match state {
            TagState::TagName => {
                if is_identifier(c) {
                    self.token.content.push(c);
                } else if is_whitespace(c) {
                    self.state = tag_state(TagState::AttrName);
                    self.skip_whitespace = true;
                } else {
                    return Err(self.error(ErrorKind::UnexpectedChar, Some(c)));
                }
                self.advance(c);
            }
            TagState::AttrName => {
                if self.attr.key.is_empty() {
                    if !is_alpha(c) {
                        return Err(self.error(ErrorKind::UnexpectedChar, Some(c)));
                    }
                    self.attr.start = self.offset;
                } else if is_whitespace(c) {
                    self.state = tag_state(TagState::ExpectingEqualSign);
                    self.skip_whitespace = true;
                    self.advance(c);
                    return Ok(None);
                } else if !is_identifier(c) {
                    return Err(self.error(ErrorKind::UnexpectedChar, Some(c)));
                }
                self.attr.key.push(c);
                self.skip_whitespace = false;
                self.advance(c);
                if self.peek(0) == Some('=') {
                    self.state = tag_state(TagState::ExpectingEqualSign);
                }
            }
            TagState::ExpectingEqualSign => {
                if c != '=' {
                    return Err(self.error(ErrorKind::ExpectedEquals, Some(c)));
                }
                self.advance(c);
                self.state = tag_state(TagState::AttrValue);
                self.skip_whitespace = true;
            }
            TagState::AttrValue => self.attr_value(c)?,
        }
        Ok(None)
    }

    fn attr_value(&mut self, c: char) -> Result<()> {
        let Some(quote) = self.attr.quote else {
            if c != '"' && c != '\'' {
                return Err(self.error(ErrorKind::ExpectedQuote, Some(c)));
            }
            self.attr.quote = Some(c);
            self.skip_whitespace = false;
            self.advance(c);
            return Ok(());
        };

        if c == '\\' && self.peek(1) == Some(quote) {
            self.attr.value.push(quote);
            self.advance_ascii(2);
        } else if c == quote {
            let attr = mem::take(&mut self.attr).finish(quote, self.offset);
            trace!(key = ?attr.key, start = attr.start, "attribute");
            self.token.attributes.push(attr);
            self.advance(c);
            self.state = tag_state(TagState::AttrName);
            self.skip_whitespace = true;
        } else {
            self.attr.value.push(c);
            self.advance(c);
        }
        Ok(())
    }

    /// Recognize `>`, `/>` or `?>` at the cursor and finish the tag.
    fn tag_end(&mut self, c: char) -> Result<Option<Token>> {
        let width = match c {
            '>' => 1,
            '/' if self.peek(1) == Some('>') => {
                self.token.kind = TokenKind::TagSelfClose;
                2
            }
            '?' if self.peek(1) == Some('>') => {
                if self.token.tag != TagCategory::Declaration {
                    return Err(self.error(ErrorKind::DeclarationEndOnElement, Some(c)));
                }
                2
            }
            '/' | '?' if self.offset + 1 == self.source.len() => {
                return Err(self.error(ErrorKind::UnexpectedEof, Some(c)));
            }
            _ => return Ok(None),
        };
        if !self.attr.key.is_empty() {
            return Err(self.error(ErrorKind::ExpectedEquals, Some(c)));
        }
        let end = self.offset + width - 1;
        self.advance_ascii(width);
        Ok(Some(self.finish_token(end)))
    }

    fn finish_token(&mut self, end: usize) -> Token {
        let token = mem::take(&mut self.token).finish(end);
        self.state = ScanState::None;
        self.skip_whitespace = self.options.skip_whitespace;
        trace!(kind = ?token.kind, tag = ?token.tag, start = token.start, end, "token");
        token
    }

    fn finish_input(&mut self) -> Result<Option<Token>> {
        match self.state {
            ScanState::None => Ok(None),
            ScanState::ReadingTextNode => Ok(Some(self.finish_token(self.offset - 1))),
            _ => Err(self.error(ErrorKind::UnexpectedEof, None)),
        }
    }

    /// The validated code point under the cursor, `None` at end of input.
    fn current(&self) -> Result<Option<char>> {
        let len = self.source.len();
        if self.offset >= len {
            return Ok(None);
        }
        let code = self
            .source
            .code_point(self.offset)
            .ok_or(Error::InvalidInput { index: self.offset, len })?;
        match char::from_u32(code) {
            Some(c) if c != '\0' => Ok(Some(c)),
            _ => Err(self.error(ErrorKind::InvalidCodepoint(code), None)),
        }
    }

    /// Unvalidated lookahead; anything unreadable is simply no match.
    fn peek(&self, ahead: usize) -> Option<char> {
        self.source.code_point(self.offset + ahead).and_then(char::from_u32)
    }

    fn looking_at(&self, literal: &str) -> bool {
        literal
            .chars()
            .enumerate()
            .all(|(i, expected)| self.peek(i) == Some(expected))
    }

    /// The input ends partway through `literal`.
    fn cut_short(&self, literal: &str) -> bool {
        let remaining = self.source.len().saturating_sub(self.offset);
        remaining < literal.len()
            && literal
                .chars()
                .take(remaining)
                .enumerate()
                .all(|(i, expected)| self.peek(i) == Some(expected))
    }

    fn advance(&mut self, c: char) {
        self.offset += 1;
        match c {
            '\n' => {
                self.line += 1;
                self.column = 1;
            }
            '\t' => self.column += 4,
            _ => self.column += 1,
        }
    }

    /// Skip `n` code points already known to be ASCII and not line breaks.
    fn advance_ascii(&mut self, n: usize) {
        self.offset += n;
        self.column += n;
    }

    fn error(&self, kind: ErrorKind, found: Option<char>) -> Error {
        SyntaxError {
            kind,
            position: self.location(),
            found,
            state: self.state,
        }
        .into()
    }
}

fn tag_state(state: TagState) -> ScanState {
    ScanState::ReadingTagUntilClose(state)
}

impl<S: Source> Iterator for Tokenizer<S> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_token() {
            Ok(Some(token)) => Some(Ok(token)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                debug!(error = %err, "tokenizer stopped");
                Some(Err(err))
            }
        }
    }
}

impl<S: Source> FusedIterator for Tokenizer<S> {}
