//! The seam between markup and the embedded code language.
//!
//! The markup grammar never parses code itself. Whenever the scanner meets a
//! transition (`@`) or an inline comment (`@* ... *@`) it hands the parser to
//! an [`EmbeddedCode`] implementation and resumes once that returns. Hosts
//! plug in their own code grammar; [`ImplicitExpression`] is a small default
//! good enough for `@name`, `@name.member(args)`, `@(expr)` and `@{ block }`.

use super::Parser;
use crate::syntax_kind::SyntaxKind;

/// A parser for code embedded in markup.
///
/// Implementations are called with the cursor on the transition, possibly
/// preceded by line-leading whitespace the markup scanner left for them.
/// They must not hold on to anything from the parser after returning. If an
/// implementation consumes nothing, the parser emits the current token as
/// metacode so scanning still moves forward.
///
/// An implementation that ends its block at a line end may set
/// [`ParseContext::ephemeral_line_ending`](crate::context::ParseContext) so
/// that the markup scanner marks the following whitespace and newline as
/// ephemeral.
pub trait EmbeddedCode {
    /// Parse one embedded block.
    fn parse_block(&self, p: &mut Parser<'_, '_>);

    /// Parse one inline comment. The cursor is on the `@*`.
    fn parse_comment(&self, p: &mut Parser<'_, '_>) {
        inline_comment(p);
    }
}

/// Parse `@* ... *@` into a `RAZOR_COMMENT` node. An unterminated comment
/// runs to the end of input.
pub fn inline_comment(p: &mut Parser<'_, '_>) {
    if !p.at(SyntaxKind::RAZOR_COMMENT_OPEN) {
        return;
    }

    let m = p.start();
    p.bump();
    while !p.at_end() && !p.at(SyntaxKind::RAZOR_COMMENT_CLOSE) {
        p.bump();
    }
    p.eat(SyntaxKind::RAZOR_COMMENT_CLOSE);
    p.flush_raw();
    m.complete(p, SyntaxKind::RAZOR_COMMENT);
}

/// Default code parser for implicit and explicit expressions.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImplicitExpression;

impl EmbeddedCode for ImplicitExpression {
    fn parse_block(&self, p: &mut Parser<'_, '_>) {
        let mut n = 0;
        while p.nth(n) == SyntaxKind::WHITESPACE {
            n += 1;
        }
        if p.nth(n) != SyntaxKind::TRANSITION {
            return;
        }

        let m = p.start();
        for _ in 0..=n {
            p.bump();
        }

        if p.at(SyntaxKind::TEXT) {
            let text = p.current_text();
            if text.starts_with('(') {
                balanced(p, '(', ')');
            } else if text.starts_with('{') {
                balanced(p, '{', '}');
            } else if identifier(p) {
                member_access(p);
            }
        }

        p.flush_raw();
        m.complete(p, SyntaxKind::CODE_BLOCK);
    }
}

/// Accept a leading identifier, splitting it off the current token. Trailing
/// dots stay behind as text.
fn identifier(p: &mut Parser<'_, '_>) -> bool {
    let text = p.current_text();
    let starts_well = text
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_');
    if !starts_well {
        return false;
    }

    let end = text
        .char_indices()
        .find(|&(_, c)| !(c.is_alphanumeric() || c == '_' || c == '.'))
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    let len = text[..end].trim_end_matches('.').len();

    p.split_current(len);
    p.bump();
    true
}

/// Calls and indexers directly after an identifier: `name(args)[0]`.
fn member_access(p: &mut Parser<'_, '_>) {
    loop {
        if p.at(SyntaxKind::TEXT) && p.current_text().starts_with('(') {
            balanced(p, '(', ')');
        } else if p.at(SyntaxKind::LBRACKET) {
            balanced(p, '[', ']');
        } else {
            break;
        }
    }
}

/// Accept tokens up to and including the character that balances the opener
/// at the cursor. The closing token is split when more text follows it.
fn balanced(p: &mut Parser<'_, '_>, open: char, close: char) {
    let mut depth = 0usize;
    while !p.at_end() {
        let mut end = None;
        for (i, c) in p.current_text().char_indices() {
            if c == open {
                depth += 1;
            } else if c == close {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    end = Some(i + c.len_utf8());
                    break;
                }
            }
        }

        if let Some(end) = end {
            p.split_current(end);
            p.bump();
            return;
        }
        p.bump();
    }
}
