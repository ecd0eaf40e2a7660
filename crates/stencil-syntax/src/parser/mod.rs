//! # Parser - Event-Based Tree Construction
//!
//! This module implements the core parsing logic, transforming a token stream
//! into a syntax tree using the **event-based** architecture from rust-analyzer.
//!
//! ## Accepting and Flushing
//!
//! Markup is mostly runs of literal text punctuated by structure. The parser
//! therefore works in two steps:
//!
//! 1. Tokens are **read** (the cursor moves past them) and then **accepted**
//!    (they are claimed for output). A token can be read, inspected and put
//!    back with [`Parser::rewind`] as long as it has not been accepted.
//! 2. Accepted tokens are **flushed** into a node of the caller's choosing:
//!    a literal, an ephemeral literal, metacode or a transition.
//!
//! Accepted tokens always form one contiguous run directly after the last
//! flushed token, so the event stream stays in source order.
//!
//! ```text
//! Start(MARKUP_TAG_BLOCK)
//!   Start(MARKUP_TEXT_LITERAL)
//!     Token(OPEN_ANGLE) Token(TEXT) Token(CLOSE_ANGLE)
//!   Finish
//! Finish
//! ```
//!
//! ## The Marker System
//!
//! When you call `parser.start()`, you get a [`Marker`]. This marker **must**
//! be either completed with `marker.complete(parser, KIND)` or abandoned with
//! `marker.abandon(parser)`. Dropping one without doing either **panics**.
//! Open elements on the tag stack own their marker, so a stack that is not
//! drained is caught the same way.
//!
//! ## Module Structure
//!
//! - [`event`] - The Event enum
//! - [`sink`] - Converts events to a Rowan tree
//! - [`tag_stack`] - Open-tag bookkeeping with diagnostics
//! - [`code`] - The seam to the embedded-code parser
//! - `grammar` - The markup grammar
//!
//! ## Public API
//!
//! ```
//! use stencil_syntax::parse;
//!
//! let parse = parse("<p>Hello</p>");
//! assert!(parse.errors().is_empty());
//! assert_eq!(parse.syntax().text().to_string(), "<p>Hello</p>");
//! ```

pub mod code;
pub mod event;
pub mod sink;
pub mod tag_stack;

mod grammar;

use rowan::{GreenNode, TextRange, TextSize};

use crate::context::{NestingSequences, ParseContext, ParseOptions};
use crate::diagnostics::{Diagnostic, DiagnosticKind, ParserError};
use crate::lexer::{Token, lex};
use crate::syntax_kind::{SyntaxKind, SyntaxNode};
use code::{EmbeddedCode, ImplicitExpression};
use event::Event;
use sink::Sink;

/// The parser state machine.
///
/// Holds the token stream, the cursor, the accepted and flushed frontiers,
/// the accumulated events and the diagnostics. Grammar functions receive
/// `&mut Parser` and use its methods to:
///
/// - Inspect tokens: `current()`, `nth()`, `at()`, `at_end()`
/// - Consume tokens: `bump()`, `eat()`, or `advance()` then `accept_read()`
/// - Build structure: `flush()`, `start()` → `Marker` → `complete()`
pub struct Parser<'c, 'input> {
    tokens: Vec<Token<'input>>,
    /// Start offset of each token, plus the end of input.
    offsets: Vec<TextSize>,
    /// Next token to read.
    pos: usize,
    /// Tokens before this index are claimed for output.
    accepted: usize,
    /// Tokens before this index are already in `events`.
    emitted: usize,
    events: Vec<Event>,
    errors: Vec<Diagnostic>,
    last_node: Option<SyntaxKind>,
    context: ParseContext,
    code: &'c dyn EmbeddedCode,
}

impl<'c, 'input> Parser<'c, 'input> {
    /// Create a new parser over a token stream.
    pub fn new(tokens: Vec<Token<'input>>, context: ParseContext, code: &'c dyn EmbeddedCode) -> Self {
        let mut offsets = Vec::with_capacity(tokens.len() + 1);
        let mut offset = TextSize::from(0);
        for token in &tokens {
            offsets.push(offset);
            offset += TextSize::of(token.text);
        }
        offsets.push(offset);

        Self {
            tokens,
            offsets,
            pos: 0,
            accepted: 0,
            emitted: 0,
            events: Vec::new(),
            errors: Vec::new(),
            last_node: None,
            context,
            code,
        }
    }

    /// Parse one markup block starting at the first token.
    pub fn parse_block(self) -> Parse {
        self.finish(grammar::block)
    }

    /// Parse a region that ends when `sequences` balance back to zero.
    pub fn parse_nested(mut self, sequences: &NestingSequences) -> Parse {
        self.context.case_sensitive = sequences.case_sensitive;
        self.finish(|p| grammar::nested(p, sequences))
    }

    fn finish(mut self, entry: impl FnOnce(&mut Self)) -> Parse {
        let root = self.start();
        entry(&mut self);
        self.flush(SyntaxKind::MARKUP_TEXT_LITERAL);

        // Anything the block did not claim goes back to the host.
        self.pos = self.accepted;
        if !self.at_end() {
            let rest = self.start();
            while !self.at_end() {
                self.bump();
            }
            self.flush_raw();
            rest.complete(&mut self, SyntaxKind::UNPARSED);
        }
        root.complete(&mut self, SyntaxKind::ROOT);

        let green = Sink::new(&self.tokens, self.events).finish();
        Parse {
            green,
            errors: self.errors,
        }
    }

    /// Start a new node and return a marker.
    ///
    /// Pending accepted tokens are flushed as a literal first, so they land
    /// before the new node rather than inside it.
    pub fn start(&mut self) -> Marker {
        self.flush(SyntaxKind::MARKUP_TEXT_LITERAL);
        let pos = self.events.len();
        self.events.push(Event::Placeholder);
        Marker {
            pos,
            completed: false,
        }
    }

    /// Current token kind, or EOF if past end.
    pub fn current(&self) -> SyntaxKind {
        self.nth(0)
    }

    /// Look ahead n tokens.
    pub fn nth(&self, n: usize) -> SyntaxKind {
        self.kind_at(self.pos + n)
    }

    /// Kind of the token at an absolute index.
    pub fn kind_at(&self, index: usize) -> SyntaxKind {
        self.tokens
            .get(index)
            .map(|t| t.kind)
            .unwrap_or(SyntaxKind::EOF)
    }

    /// Check if at end of input.
    pub fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Check if current token is of given kind.
    pub fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    /// Accept the current token if it matches.
    pub fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Accept the current token unconditionally, along with any tokens read
    /// before it.
    pub fn bump(&mut self) {
        if !self.at_end() {
            self.pos += 1;
            self.accepted = self.pos;
        }
    }

    /// Move past the current token without accepting it.
    pub fn advance(&mut self) {
        if !self.at_end() {
            self.pos += 1;
        }
    }

    /// Accept every token read so far.
    pub fn accept_read(&mut self) {
        self.accepted = self.pos;
    }

    /// Bookmark for [`Parser::rewind`].
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Put back read tokens. Accepted tokens cannot be put back.
    pub fn rewind(&mut self, position: usize) {
        self.pos = position.max(self.accepted);
    }

    /// Get the text of the current token.
    pub fn current_text(&self) -> &'input str {
        self.nth_text(0)
    }

    /// Text of the token n ahead, empty past the end.
    pub fn nth_text(&self, n: usize) -> &'input str {
        self.tokens.get(self.pos + n).map(|t| t.text).unwrap_or("")
    }

    /// Source offset of the current token.
    pub fn current_start(&self) -> TextSize {
        self.nth_start(0)
    }

    /// Source offset of the token n ahead, clamped to the end of input.
    pub fn nth_start(&self, n: usize) -> TextSize {
        let index = (self.pos + n).min(self.tokens.len());
        self.offsets[index]
    }

    /// Concatenated text of the tokens in `from..to`.
    pub fn text_between(&self, from: usize, to: usize) -> String {
        let to = to.min(self.tokens.len());
        if from >= to {
            return String::new();
        }
        self.tokens[from..to].iter().map(|t| t.text).collect()
    }

    /// Split the current token at byte `mid`, keeping its kind for both
    /// halves. Returns false when `mid` is not strictly inside the token.
    pub fn split_current(&mut self, mid: usize) -> bool {
        let Some(token) = self.tokens.get(self.pos) else {
            return false;
        };
        let (kind, text) = (token.kind, token.text);
        if mid == 0 || mid >= text.len() || !text.is_char_boundary(mid) {
            return false;
        }

        let (head, tail) = text.split_at(mid);
        let start = self.offsets[self.pos];
        self.tokens[self.pos] = Token { kind, text: head };
        self.tokens.insert(self.pos + 1, Token { kind, text: tail });
        self.offsets.insert(self.pos + 1, start + TextSize::of(head));
        true
    }

    /// Whether accepted tokens are waiting to be flushed.
    pub fn has_pending(&self) -> bool {
        self.accepted > self.emitted
    }

    /// Wrap pending accepted tokens into a node of `kind`. Does nothing when
    /// nothing is pending.
    pub fn flush(&mut self, kind: SyntaxKind) {
        if !self.has_pending() {
            return;
        }
        self.events.push(Event::start(kind));
        self.push_pending_tokens();
        self.events.push(Event::Finish);
        self.last_node = Some(kind);
    }

    /// Emit pending accepted tokens directly into the current node.
    pub fn flush_raw(&mut self) {
        self.push_pending_tokens();
    }

    fn push_pending_tokens(&mut self) {
        for index in self.emitted..self.accepted {
            self.events.push(Event::token(self.tokens[index].kind));
        }
        self.emitted = self.accepted;
    }

    /// Emit an empty token standing in for one the source left out.
    pub fn missing(&mut self, kind: SyntaxKind) {
        self.flush(SyntaxKind::MARKUP_TEXT_LITERAL);
        self.events.push(Event::missing(kind));
    }

    /// Kind of the most recently finished node.
    pub fn last_node(&self) -> Option<SyntaxKind> {
        self.last_node
    }

    /// Record a diagnostic.
    pub fn error(&mut self, kind: DiagnosticKind, range: TextRange) {
        log::debug!("diagnostic at {range:?}: {kind}");
        self.errors.push(Diagnostic::new(kind, range));
    }

    pub fn context(&self) -> &ParseContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut ParseContext {
        &mut self.context
    }

    pub fn options(&self) -> &ParseOptions {
        &self.context.options
    }

    /// Hand one embedded-code block to the code parser.
    ///
    /// If the code parser claims nothing, the current token is emitted as
    /// metacode so scanning always moves forward.
    pub fn parse_embedded_code(&mut self) {
        let code = self.code;
        let before = self.pos;
        log::trace!("embedded code at {:?}", self.current_start());
        code.parse_block(self);
        self.ensure_progress(before);
    }

    /// Hand one inline `@* ... *@` comment to the code parser.
    pub fn parse_inline_comment(&mut self) {
        let code = self.code;
        let before = self.pos;
        log::trace!("inline comment at {:?}", self.current_start());
        code.parse_comment(self);
        self.ensure_progress(before);
    }

    fn ensure_progress(&mut self, before: usize) {
        if self.pos == before && !self.at_end() {
            self.bump();
            self.flush(SyntaxKind::META_CODE);
        }
    }
}

/// A marker for a node being constructed.
///
/// The `#[must_use]` attribute and the `Drop` impl together enforce that
/// every marker is either completed or abandoned.
#[must_use = "Markers must be completed or abandoned, dropping them is a bug"]
pub struct Marker {
    /// Position in the events vector where our Placeholder lives
    pos: usize,
    /// Tracks whether complete() or abandon() was called
    completed: bool,
}

impl Marker {
    /// Complete this marker, creating a node of the given kind.
    ///
    /// Pending accepted tokens are flushed as a literal inside the node
    /// before it is closed.
    pub fn complete(mut self, p: &mut Parser<'_, '_>, kind: SyntaxKind) {
        self.completed = true;
        p.flush(SyntaxKind::MARKUP_TEXT_LITERAL);
        let event_at_pos = &mut p.events[self.pos];
        assert!(matches!(event_at_pos, Event::Placeholder));
        *event_at_pos = Event::start(kind);
        p.events.push(Event::Finish);
        p.last_node = Some(kind);
    }

    /// Abandon this marker without creating a node.
    ///
    /// **Note**: This only removes the placeholder if it's the last event.
    /// Otherwise the placeholder becomes inert and is ignored by the Sink.
    pub fn abandon(mut self, p: &mut Parser<'_, '_>) {
        self.completed = true;
        if self.pos == p.events.len() - 1 {
            match p.events.pop() {
                Some(Event::Placeholder) => {}
                _ => unreachable!(),
            }
        }
    }
}

impl Drop for Marker {
    fn drop(&mut self) {
        if !self.completed && !std::thread::panicking() {
            panic!("Marker must be either completed or abandoned");
        }
    }
}

/// The result of a parse: a green tree plus the diagnostics reported while
/// building it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parse {
    green: GreenNode,
    errors: Vec<Diagnostic>,
}

impl Parse {
    /// The root node. Its first child is the `MARKUP_BLOCK`; an `UNPARSED`
    /// node follows when input remained after the block ended.
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    pub fn markup_block(&self) -> Option<SyntaxNode> {
        self.syntax()
            .children()
            .find(|n| n.kind() == SyntaxKind::MARKUP_BLOCK)
    }

    /// Source text the markup block left to the host.
    pub fn unparsed(&self) -> Option<String> {
        self.syntax()
            .children()
            .find(|n| n.kind() == SyntaxKind::UNPARSED)
            .map(|n| n.text().to_string())
    }
}

/// A configured markup parser.
///
/// Holds the options every parse starts from and the embedded-code parser
/// that transitions are handed to. Parsing before options are set is a usage
/// error, reported as [`ParserError::ContextNotSet`].
pub struct MarkupParser<'c> {
    options: Option<ParseOptions>,
    code: &'c dyn EmbeddedCode,
}

impl MarkupParser<'static> {
    pub fn new() -> Self {
        Self {
            options: None,
            code: &ImplicitExpression,
        }
    }
}

impl Default for MarkupParser<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'c> MarkupParser<'c> {
    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = Some(options);
        self
    }

    pub fn with_code_parser<'d>(self, code: &'d dyn EmbeddedCode) -> MarkupParser<'d> {
        MarkupParser {
            options: self.options,
            code,
        }
    }

    /// Parse one implicit (`<tag>...`) or explicit (`@<tag>`, `@:line`)
    /// markup block.
    pub fn parse_block(&self, source: &str) -> Result<Parse, ParserError> {
        Ok(self.parser(source)?.parse_block())
    }

    /// Parse markup until the `sequences` balance back to zero. The closing
    /// sequence is left unparsed.
    pub fn parse_nested(
        &self,
        source: &str,
        sequences: &NestingSequences,
    ) -> Result<Parse, ParserError> {
        Ok(self.parser(source)?.parse_nested(sequences))
    }

    fn parser<'input>(&self, source: &'input str) -> Result<Parser<'c, 'input>, ParserError> {
        let options = self.options.clone().ok_or(ParserError::ContextNotSet)?;
        Ok(Parser::new(lex(source), ParseContext::new(options), self.code))
    }
}

/// Parse one markup block with default options.
pub fn parse(source: &str) -> Parse {
    Parser::new(lex(source), ParseContext::default(), &ImplicitExpression).parse_block()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parser(source: &str) -> Parser<'static, '_> {
        Parser::new(lex(source), ParseContext::default(), &ImplicitExpression)
    }

    #[test]
    fn parse_empty_input() {
        let parse = parse("");
        let tree = parse.syntax();
        assert_eq!(tree.kind(), SyntaxKind::ROOT);
        assert_eq!(parse.markup_block().map(|b| b.text().to_string()), Some(String::new()));
        assert!(parse.errors().is_empty());
    }

    #[test]
    fn parse_preserves_all_text() {
        let input = "<p>Hello, world!</p> trailing";
        let parse = parse(input);
        assert_eq!(parse.syntax().text().to_string(), input);
    }

    #[test]
    fn parse_leaves_trailing_input_unparsed() {
        let parse = parse("<p></p>\nrest");
        assert_eq!(parse.unparsed(), Some("rest".to_string()));
    }

    #[test]
    fn parser_without_context_is_a_usage_error() {
        let result = MarkupParser::new().parse_block("<p></p>");
        assert!(matches!(result, Err(ParserError::ContextNotSet)));
    }

    #[test]
    fn parser_with_context_parses() {
        let parse = MarkupParser::new()
            .with_options(ParseOptions::default())
            .parse_block("<p></p>")
            .unwrap();
        assert!(parse.errors().is_empty());
    }

    #[test]
    fn rewind_cannot_cross_accepted_tokens() {
        let mut p = parser("<p>");
        p.bump();
        p.advance();
        p.advance();
        assert_eq!(p.position(), 3);
        p.rewind(0);
        assert_eq!(p.position(), 1);
        assert_eq!(p.current(), SyntaxKind::TEXT);
    }

    #[test]
    fn split_current_keeps_offsets() {
        let mut p = parser("abc>");
        assert!(p.split_current(1));
        assert_eq!(p.current_text(), "a");
        assert_eq!(p.nth_text(1), "bc");
        assert_eq!(p.nth_start(1), TextSize::from(1));
        assert_eq!(p.nth_start(2), TextSize::from(3));
        assert!(!p.split_current(1));
    }

    #[test]
    fn flush_groups_pending_tokens() {
        let mut p = parser("a b");
        p.bump();
        p.bump();
        p.bump();
        assert!(p.has_pending());
        p.flush(SyntaxKind::MARKUP_TEXT_LITERAL);
        assert!(!p.has_pending());
        assert_eq!(p.last_node(), Some(SyntaxKind::MARKUP_TEXT_LITERAL));
    }

    #[test]
    fn marker_must_be_completed() {
        let result = std::panic::catch_unwind(|| {
            let mut parser = parser("test");
            let _marker = parser.start();
            // Marker dropped without completion - should panic
        });
        assert!(result.is_err());
    }

    #[test]
    fn marker_can_be_abandoned() {
        let mut parser = parser("test");
        let marker = parser.start();
        marker.abandon(&mut parser);
        // Should not panic
    }
}
