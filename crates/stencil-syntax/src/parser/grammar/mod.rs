//! # Grammar Rules
//!
//! This module contains the markup grammar. Each function takes a
//! `&mut Parser` and uses its methods to:
//!
//! 1. Inspect the current token (`p.current()`, `p.at()`, `p.nth()`)
//! 2. Read and accept tokens (`p.bump()`, `p.eat()`, the [`scan`] helpers)
//! 3. Build tree structure (`p.flush()` for literal runs, `p.start()` →
//!    marker → `complete()`/`abandon()` for composite nodes)
//!
//! ## Module Structure
//!
//! - [`scan`] - Skip-and-emit scanning with embedded-code hand-off
//! - [`tag`] - The tag-block state machine
//! - [`special`] - Comments, CDATA, bang tags and processing instructions
//! - [`attributes`] - Attributes inside a start tag
//! - [`nesting`] - Markup bounded by host-supplied sequences
//!
//! ## Error Recovery
//!
//! Grammar functions never fail. Malformed input is reported through
//! `p.error()` and parsed as far as it goes: a missing `>` becomes an empty
//! token, an unclosed element is closed where its enclosing scope ends, and
//! every byte of input still ends up in the tree.

mod attributes;
mod nesting;
mod scan;
mod special;
mod tag;

use rowan::{TextRange, TextSize};

use crate::context::NestingSequences;
use crate::diagnostics::DiagnosticKind;
use crate::parser::Parser;
use crate::syntax_kind::SyntaxKind;

/// Parse one markup block: a tag block, `@<tag>` or `@:` single-line markup.
pub fn block(p: &mut Parser<'_, '_>) {
    let m = p.start();

    while matches!(p.current(), SyntaxKind::WHITESPACE | SyntaxKind::NEWLINE) {
        p.bump();
    }

    match p.current() {
        SyntaxKind::OPEN_ANGLE => tag::tag_block(p),
        SyntaxKind::TRANSITION => {
            p.flush(SyntaxKind::MARKUP_TEXT_LITERAL);
            p.bump();
            p.flush(SyntaxKind::MARKUP_TRANSITION);
            if p.eat(SyntaxKind::TRANSITION) {
                p.flush(SyntaxKind::META_CODE);
            }
            after_transition(p);
        }
        SyntaxKind::EOF => {}
        _ => {
            let range = TextRange::at(p.current_start(), TextSize::of(p.current_text()));
            p.error(DiagnosticKind::MarkupBlockMustStartWithTag, range);
        }
    }

    m.complete(p, SyntaxKind::MARKUP_BLOCK);
}

fn after_transition(p: &mut Parser<'_, '_>) {
    match p.current() {
        SyntaxKind::COLON => {
            p.bump();
            p.flush(SyntaxKind::META_CODE);
            single_line_markup(p);
        }
        SyntaxKind::OPEN_ANGLE => tag::tag_block(p),
        _ => {}
    }
}

/// Markup to the end of the line, newline included.
fn single_line_markup(p: &mut Parser<'_, '_>) {
    let outer = p.context().whitespace_significant_to_ancestor;
    p.context_mut().whitespace_significant_to_ancestor = true;

    scan::skip_to(p, SyntaxKind::NEWLINE);
    p.eat(SyntaxKind::NEWLINE);

    p.context_mut().whitespace_significant_to_ancestor = outer;
    p.flush(SyntaxKind::MARKUP_TEXT_LITERAL);
}

/// Parse markup bounded by `sequences`.
pub fn nested(p: &mut Parser<'_, '_>, sequences: &NestingSequences) {
    let m = p.start();
    nesting::nesting_block(p, sequences);
    m.complete(p, SyntaxKind::MARKUP_BLOCK);
}
