//! # stencil-syntax
//!
//! A lossless syntax tree for the markup side of stencil templates, built
//! with [Rowan] + [Logos] and following the [rust-analyzer] architecture
//! model.
//!
//! [Rowan]: https://docs.rs/rowan
//! [Logos]: https://docs.rs/logos
//! [rust-analyzer]: https://rust-analyzer.github.io/book/contributing/syntax.html
//!
//! ## What Gets Parsed
//!
//! A stencil template interleaves markup (`<tag>`-structured text) with code
//! introduced by `@`. This crate parses the markup: tag nesting, attributes,
//! comments, CDATA, processing instructions, the opaque body of `<script>`
//! and the `<text>` pseudo-tag. Code is handed to a pluggable
//! [`EmbeddedCode`] parser whenever a transition is seen, and markup
//! scanning resumes when it returns.
//!
//! Malformed input never stops the parser. It produces a tree anyway and
//! reports [`Diagnostic`]s next to it.
//!
//! ## Architecture Overview
//!
//! ```text
//! Source Text → Lexer → Tokens → Parser → Events → Sink → Rowan Tree
//!               (Logos)          (Grammar)        (GreenNodeBuilder)
//! ```
//!
//! ### 1. Lexer ([`lexer`] module)
//!
//! Every character becomes part of some token; nothing is discarded.
//!
//! ```text
//! "<p>@x</p>" → [OPEN_ANGLE, TEXT, CLOSE_ANGLE, TRANSITION, TEXT,
//!                OPEN_ANGLE, FORWARD_SLASH, TEXT, CLOSE_ANGLE]
//! ```
//!
//! ### 2. Parser ([`parser`] module)
//!
//! The parser reads tokens, accepts them and flushes accepted runs into
//! literal nodes, while markers build the composite nodes around them. The
//! result is a flat list of events.
//!
//! ### 3. Sink ([`parser::sink`] module)
//!
//! The sink replays the events into a `GreenNodeBuilder`.
//!
//! ## Module Structure
//!
//! ```text
//! stencil-syntax/
//! ├── lib.rs             # This file - public API and tree dump
//! ├── syntax_kind.rs     # SyntaxKind enum (tokens + nodes) and Rowan integration
//! ├── lexer.rs           # Logos-based tokenizer
//! ├── context.rs         # Parse options and per-parse context
//! ├── diagnostics.rs     # Diagnostics and usage errors
//! └── parser/
//!     ├── mod.rs         # Parser cursor, Marker, MarkupParser entry points
//!     ├── event.rs       # Event enum (Start, Token, Finish, Placeholder)
//!     ├── sink.rs        # Converts events to Rowan GreenNode
//!     ├── tag_stack.rs   # Open tags awaiting their end tag
//!     ├── code.rs        # Embedded-code seam and default expression parser
//!     └── grammar/
//!         ├── mod.rs     # Markup block and nested-region entry points
//!         ├── scan.rs    # Skip-and-emit scanning
//!         ├── tag.rs     # Tag-block state machine
//!         ├── special.rs # Comments, CDATA, bang tags, processing instructions
//!         ├── attributes.rs
//!         └── nesting.rs # Sequence-bounded regions
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use stencil_syntax::{parse, SyntaxKind};
//!
//! let parse = parse("<ul><li>@item</li></ul>");
//! let tree = parse.syntax();
//!
//! // The tree preserves all text
//! assert_eq!(tree.text().to_string(), "<ul><li>@item</li></ul>");
//! assert!(parse.errors().is_empty());
//!
//! // Navigate the tree structure
//! let block = tree.first_child().unwrap();
//! assert_eq!(block.kind(), SyntaxKind::MARKUP_BLOCK);
//! ```

pub mod context;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod syntax_kind;

pub use context::{NestingSequences, ParseContext, ParseOptions};
pub use diagnostics::{Diagnostic, DiagnosticKind, ParserError};
pub use parser::code::{EmbeddedCode, ImplicitExpression};
pub use parser::{MarkupParser, Parse, Parser, parse};
pub use syntax_kind::{StencilLang, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};

/// Render a tree as indented `KIND@range` lines, with token text quoted.
pub fn debug_tree(node: &SyntaxNode) -> String {
    let mut lines = Vec::new();
    format_tree(node, 0, &mut lines);
    lines.join("\n")
}

fn format_tree(node: &SyntaxNode, indent: usize, lines: &mut Vec<String>) {
    let prefix = "  ".repeat(indent);
    lines.push(format!("{}{:?}@{:?}", prefix, node.kind(), node.text_range()));

    for child in node.children_with_tokens() {
        match child {
            rowan::NodeOrToken::Node(n) => format_tree(&n, indent + 1, lines),
            rowan::NodeOrToken::Token(t) => {
                lines.push(format!(
                    "{}  {:?}@{:?} {:?}",
                    prefix,
                    t.kind(),
                    t.text_range(),
                    t.text()
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    #[test]
    fn snapshot_element_with_text() {
        let parse = parse("<p>Hi</p>");
        assert_snapshot!(debug_tree(&parse.syntax()), @r#"
        ROOT@0..9
          MARKUP_BLOCK@0..9
            MARKUP_TAG_BLOCK@0..9
              MARKUP_TEXT_LITERAL@0..3
                OPEN_ANGLE@0..1 "<"
                TEXT@1..2 "p"
                CLOSE_ANGLE@2..3 ">"
              MARKUP_TEXT_LITERAL@3..5
                TEXT@3..5 "Hi"
              MARKUP_TAG_BLOCK@5..9
                MARKUP_TEXT_LITERAL@5..9
                  OPEN_ANGLE@5..6 "<"
                  FORWARD_SLASH@6..7 "/"
                  TEXT@7..8 "p"
                  CLOSE_ANGLE@8..9 ">"
        "#);
    }

    #[test]
    fn snapshot_text_pseudo_tag() {
        let parse = parse("<text>hi</text>");
        assert_snapshot!(debug_tree(&parse.syntax()), @r#"
        ROOT@0..15
          MARKUP_BLOCK@0..15
            MARKUP_TRANSITION@0..6
              OPEN_ANGLE@0..1 "<"
              TEXT@1..5 "text"
              CLOSE_ANGLE@5..6 ">"
            MARKUP_TEXT_LITERAL@6..8
              TEXT@6..8 "hi"
            MARKUP_TRANSITION@8..15
              OPEN_ANGLE@8..9 "<"
              FORWARD_SLASH@9..10 "/"
              TEXT@10..14 "text"
              CLOSE_ANGLE@14..15 ">"
        "#);
    }

    #[test]
    fn snapshot_single_line_markup() {
        let parse = parse("@:hi @x\nrest");
        assert_snapshot!(debug_tree(&parse.syntax()), @r#"
        ROOT@0..12
          MARKUP_BLOCK@0..8
            MARKUP_TRANSITION@0..1
              TRANSITION@0..1 "@"
            META_CODE@1..2
              COLON@1..2 ":"
            MARKUP_TEXT_LITERAL@2..5
              TEXT@2..4 "hi"
              WHITESPACE@4..5 " "
            CODE_BLOCK@5..7
              TRANSITION@5..6 "@"
              TEXT@6..7 "x"
            MARKUP_TEXT_LITERAL@7..8
              NEWLINE@7..8 "\n"
          UNPARSED@8..12
            TEXT@8..12 "rest"
        "#);
    }

    #[test]
    fn block_must_start_with_tag() {
        let parse = parse("  hello");
        assert_eq!(parse.errors().len(), 1);
        assert_eq!(
            parse.errors()[0].kind,
            DiagnosticKind::MarkupBlockMustStartWithTag
        );
        assert_eq!(parse.unparsed().as_deref(), Some("hello"));
    }

    #[test]
    fn roundtrip_preserves_text() {
        let inputs = [
            "<p>Hello</p>\n",
            "<div class=\"a\"><span>@x</span></div>",
            "<!-- c --><p></p>",
            "<script>if (a < b) {}</script>",
            "<text>@@ literal</text>",
            "@:line @item.Name\n",
            "<p",
            "</",
            "<",
        ];

        for input in inputs {
            let parse = parse(input);
            assert_eq!(
                parse.syntax().text().to_string(),
                input,
                "Roundtrip failed for: {:?}",
                input
            );
        }
    }
}
