//! # Lexer - Tokenizing Template Source
//!
//! This module provides the first stage of parsing: breaking source text into
//! tokens using the [Logos] lexer generator.
//!
//! [Logos]: https://docs.rs/logos
//!
//! ## The Lossless Guarantee
//!
//! The most important property of this lexer is that **every byte in the input
//! appears in exactly one token**. We never skip or discard characters. This
//! is what makes round-tripping possible:
//!
//! ```
//! use stencil_syntax::lexer::lex;
//!
//! let input = "<p class=\"lead\">Hi @name</p>\n";
//! let tokens = lex(input);
//!
//! // Concatenating all token texts gives back the original
//! let reconstructed: String = tokens.iter().map(|t| t.text).collect();
//! assert_eq!(input, reconstructed);
//! ```
//!
//! ## Why Two Token Enums?
//!
//! You'll notice we have both [`TokenKind`] (in this module) and [`SyntaxKind`]
//! (in the syntax_kind module). This is because:
//!
//! 1. **Logos requires its own enum** for the `#[derive(Logos)]` macro
//! 2. **Rowan uses our SyntaxKind** for the final tree
//!
//! The [`TokenKind::to_syntax_kind`] method converts between them.
//!
//! ## Token Design
//!
//! Tokens are kept **minimal and context-free**. The lexer doesn't know whether
//! `<` opens a tag, a comment or a processing instruction, or whether `@`
//! starts code or is half of an `@@` escape. That's the parser's job.
//!
//! Characters with markup meaning get their own token types:
//! - `<`, `>`, `/`, `!`, `?` → tag punctuation
//! - `@` → `TRANSITION`; `@*` and `*@` → inline comment delimiters
//! - `--` → `DOUBLE_HYPHEN` (comment open/close)
//! - `[`, `]` → CDATA brackets
//! - `=`, `"`, `'`, `:` → attribute punctuation
//!
//! Everything else becomes `TEXT` tokens, grouped into runs of consecutive
//! characters. A single `-` or `*` is its own one-character `TEXT` token so
//! the parser can see comment endings like `--->` and `*@`.
//!
//! [`SyntaxKind`]: crate::syntax_kind::SyntaxKind

use logos::Logos;

use crate::syntax_kind::SyntaxKind;

/// Token kinds produced by the Logos lexer.
///
/// This enum exists separately from [`SyntaxKind`] because Logos needs to
/// derive on it. Each variant maps to a corresponding `SyntaxKind` token.
///
/// The `#[logos(skip r"")]` attribute means "skip nothing" - we explicitly
/// handle all input rather than letting Logos skip anything.
///
/// [`SyntaxKind`]: crate::syntax_kind::SyntaxKind
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"")]
pub enum TokenKind {
    /// Horizontal whitespace (spaces, tabs)
    #[regex(r"[ \t]+")]
    Whitespace,

    /// Line ending (LF, CRLF or a bare CR)
    #[regex(r"\r\n|\n|\r")]
    Newline,

    #[token("<")]
    OpenAngle,

    #[token(">")]
    CloseAngle,

    #[token("/")]
    ForwardSlash,

    #[token("!")]
    Bang,

    #[token("?")]
    QuestionMark,

    /// `@` - switches to embedded code
    #[token("@")]
    Transition,

    #[token("@*")]
    RazorCommentOpen,

    #[token("*@")]
    RazorCommentClose,

    #[token("--")]
    DoubleHyphen,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("=")]
    Equals,

    #[token("\"")]
    DoubleQuote,

    #[token("'")]
    SingleQuote,

    #[token(":")]
    Colon,

    /// Plain text - anything not matched by other rules
    #[regex(r#"[^ \t\r\n<>/!?@*\-\[\]=:"']+"#)]
    #[token("-")]
    #[token("*")]
    Text,
}

impl TokenKind {
    /// Convert to the corresponding SyntaxKind.
    pub fn to_syntax_kind(self) -> SyntaxKind {
        match self {
            TokenKind::Whitespace => SyntaxKind::WHITESPACE,
            TokenKind::Newline => SyntaxKind::NEWLINE,
            TokenKind::OpenAngle => SyntaxKind::OPEN_ANGLE,
            TokenKind::CloseAngle => SyntaxKind::CLOSE_ANGLE,
            TokenKind::ForwardSlash => SyntaxKind::FORWARD_SLASH,
            TokenKind::Bang => SyntaxKind::BANG,
            TokenKind::QuestionMark => SyntaxKind::QUESTION_MARK,
            TokenKind::Transition => SyntaxKind::TRANSITION,
            TokenKind::RazorCommentOpen => SyntaxKind::RAZOR_COMMENT_OPEN,
            TokenKind::RazorCommentClose => SyntaxKind::RAZOR_COMMENT_CLOSE,
            TokenKind::DoubleHyphen => SyntaxKind::DOUBLE_HYPHEN,
            TokenKind::LBracket => SyntaxKind::LBRACKET,
            TokenKind::RBracket => SyntaxKind::RBRACKET,
            TokenKind::Equals => SyntaxKind::EQUALS,
            TokenKind::DoubleQuote => SyntaxKind::DOUBLE_QUOTE,
            TokenKind::SingleQuote => SyntaxKind::SINGLE_QUOTE,
            TokenKind::Colon => SyntaxKind::COLON,
            TokenKind::Text => SyntaxKind::TEXT,
        }
    }
}

/// A lexed token with its kind and text slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
}

/// Lex the input into a sequence of tokens.
///
/// Guarantees that all bytes from the input appear in the output tokens.
pub fn lex(input: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(input);

    while let Some(result) = lexer.next() {
        let text = lexer.slice();
        let kind = match result {
            Ok(token_kind) => token_kind.to_syntax_kind(),
            Err(()) => {
                // Logos error means unrecognized character - treat as TEXT
                SyntaxKind::TEXT
            }
        };
        tokens.push(Token { kind, text });
    }

    tokens
}
