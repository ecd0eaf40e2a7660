//! # Parser Events
//!
//! Events are the intermediate representation between parsing and tree building.
//! Instead of building the tree directly, the parser emits a **flat sequence**
//! of events that describe the tree structure.
//!
//! ```text
//! Start(MARKUP_TAG_BLOCK)      ← Begin a tag block
//!   Start(MARKUP_TEXT_LITERAL)
//!     Token(OPEN_ANGLE)
//!     Token(TEXT)
//!     Token(CLOSE_ANGLE)
//!   Finish
//! Finish                       ← End the tag block
//! ```
//!
//! The Sink processes these in order, maintaining a stack of open nodes.
//! Start pushes, Finish pops.
//!
//! ## Synthesized Tokens
//!
//! A `Token` event that covers zero raw tokens produces an empty token in the
//! tree. The parser uses this for a `>` that was required but never written,
//! so the tree keeps its shape while the text still round-trips.

use crate::syntax_kind::SyntaxKind;

/// An event emitted by the parser during tree construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Begin a new composite node.
    Start { kind: SyntaxKind },

    /// Add a token to the current node, built from `n_raw_tokens` lexer
    /// tokens. Zero means a synthesized, empty token.
    Token { kind: SyntaxKind, n_raw_tokens: u8 },

    /// Finish the current node.
    Finish,

    /// A placeholder that will be replaced, or ignored if abandoned.
    Placeholder,
}

impl Event {
    /// Create a start event.
    pub fn start(kind: SyntaxKind) -> Self {
        Event::Start { kind }
    }

    /// Create a token event for a single raw token.
    pub fn token(kind: SyntaxKind) -> Self {
        Event::Token {
            kind,
            n_raw_tokens: 1,
        }
    }

    /// Create a token event that consumes no input.
    pub fn missing(kind: SyntaxKind) -> Self {
        Event::Token {
            kind,
            n_raw_tokens: 0,
        }
    }
}
