//! Attributes inside a start tag.

use super::scan;
use crate::parser::Parser;
use crate::syntax_kind::SyntaxKind;

/// An attribute as seen by the tag grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    /// Raw value text between the quotes, `None` for a bare attribute.
    pub value: Option<String>,
}

/// Parse attributes up to the tag's `>`, `/>`, an interrupting `<` or the
/// end of input. The terminator is left at the cursor.
pub fn attributes(p: &mut Parser<'_, '_>) -> Vec<Attribute> {
    let mut attrs = Vec::new();
    loop {
        while matches!(p.current(), SyntaxKind::WHITESPACE | SyntaxKind::NEWLINE) {
            p.bump();
        }

        match p.current() {
            SyntaxKind::EOF | SyntaxKind::CLOSE_ANGLE | SyntaxKind::OPEN_ANGLE => break,
            SyntaxKind::FORWARD_SLASH
                if matches!(p.nth(1), SyntaxKind::CLOSE_ANGLE | SyntaxKind::EOF) =>
            {
                break;
            }
            SyntaxKind::TRANSITION => {
                p.flush(SyntaxKind::MARKUP_TEXT_LITERAL);
                p.parse_embedded_code();
            }
            SyntaxKind::RAZOR_COMMENT_OPEN => {
                p.flush(SyntaxKind::MARKUP_TEXT_LITERAL);
                p.parse_inline_comment();
            }
            SyntaxKind::EQUALS
            | SyntaxKind::DOUBLE_QUOTE
            | SyntaxKind::SINGLE_QUOTE
            | SyntaxKind::FORWARD_SLASH => p.bump(),
            _ => attrs.push(attribute(p)),
        }
    }
    attrs
}

fn is_name_end(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::WHITESPACE
            | SyntaxKind::NEWLINE
            | SyntaxKind::EQUALS
            | SyntaxKind::CLOSE_ANGLE
            | SyntaxKind::OPEN_ANGLE
            | SyntaxKind::FORWARD_SLASH
            | SyntaxKind::DOUBLE_QUOTE
            | SyntaxKind::SINGLE_QUOTE
            | SyntaxKind::TRANSITION
            | SyntaxKind::RAZOR_COMMENT_OPEN
            | SyntaxKind::EOF
    )
}

fn attribute(p: &mut Parser<'_, '_>) -> Attribute {
    let m = p.start();
    let name_start = p.position();
    while !is_name_end(p.current()) {
        p.bump();
    }
    let name = p.text_between(name_start, p.position());

    let mut value = None;
    let mut n = 0;
    while p.nth(n) == SyntaxKind::WHITESPACE {
        n += 1;
    }
    if p.nth(n) == SyntaxKind::EQUALS {
        for _ in 0..=n {
            p.bump();
        }
        while p.at(SyntaxKind::WHITESPACE) {
            p.bump();
        }
        value = Some(attribute_value(p));
    }

    m.complete(p, SyntaxKind::ATTRIBUTE_BLOCK);
    Attribute { name, value }
}

fn attribute_value(p: &mut Parser<'_, '_>) -> String {
    let quote = match p.current() {
        kind @ (SyntaxKind::DOUBLE_QUOTE | SyntaxKind::SINGLE_QUOTE) => {
            p.bump();
            Some(kind)
        }
        _ => None,
    };

    let m = p.start();
    let value_start = p.position();
    match quote {
        Some(quote) => scan::skip_to(p, quote),
        None => scan::skip_until(p, |p| {
            matches!(
                p.current(),
                SyntaxKind::WHITESPACE
                    | SyntaxKind::NEWLINE
                    | SyntaxKind::CLOSE_ANGLE
                    | SyntaxKind::OPEN_ANGLE
            ) || (p.at(SyntaxKind::FORWARD_SLASH) && p.nth(1) == SyntaxKind::CLOSE_ANGLE)
        }),
    }
    let value = p.text_between(value_start, p.position());
    m.complete(p, SyntaxKind::ATTRIBUTE_VALUE);

    if let Some(quote) = quote {
        p.eat(quote);
    }
    value
}
