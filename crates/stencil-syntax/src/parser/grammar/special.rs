//! Special tags: markup comments, CDATA sections, DOCTYPE-like bang tags and
//! processing instructions.
//!
//! Each one has its own terminator and none of them takes part in tag
//! nesting. They return whether the terminator was found; running out of
//! input still produces a node.

use super::scan;
use crate::parser::Parser;
use crate::syntax_kind::SyntaxKind;

/// Whether the `<` at the cursor opens `<!...>` or `<?...?>` rather than a
/// tag.
pub fn at_special_tag(p: &Parser<'_, '_>) -> bool {
    match p.nth(1) {
        SyntaxKind::BANG => !is_bang_escape(p, 1),
        SyntaxKind::QUESTION_MARK => true,
        _ => false,
    }
}

/// A `!` directly before a tag name makes the tag literal text. `<!DOCTYPE`
/// is the exception.
pub fn is_bang_escape(p: &Parser<'_, '_>, n: usize) -> bool {
    p.nth(n) == SyntaxKind::BANG
        && p.nth(n + 1) == SyntaxKind::TEXT
        && !p.nth_text(n + 1).eq_ignore_ascii_case("DOCTYPE")
}

/// Emit an escaping `!` as metacode.
pub fn bang_escape(p: &mut Parser<'_, '_>) {
    if is_bang_escape(p, 0) {
        p.flush(SyntaxKind::MARKUP_TEXT_LITERAL);
        p.bump();
        p.flush(SyntaxKind::META_CODE);
    }
}

/// Parse `<!...`. The cursor is on the `<`.
///
/// Only HTML comments get a comment block. CDATA sections and other bang
/// tags are flat markup literals.
pub fn bang_tag(p: &mut Parser<'_, '_>) -> bool {
    if is_html_comment_ahead(p) {
        return html_comment(p);
    }

    p.bump();
    p.bump();
    if is_cdata_ahead(p) {
        for _ in 0..3 {
            p.bump();
        }
        let found = scan::accept_until_all(
            p,
            &[
                SyntaxKind::RBRACKET,
                SyntaxKind::RBRACKET,
                SyntaxKind::CLOSE_ANGLE,
            ],
        );
        p.flush(SyntaxKind::MARKUP_TEXT_LITERAL);
        return found;
    }

    let found = scan::accept_until_all(p, &[SyntaxKind::CLOSE_ANGLE]);
    p.flush(SyntaxKind::MARKUP_TEXT_LITERAL);
    found
}

/// Parse `<?...?>`. The cursor is on the `<`.
pub fn xml_pi(p: &mut Parser<'_, '_>) -> bool {
    p.bump();
    p.bump();
    let found = scan::accept_until_all(p, &[SyntaxKind::QUESTION_MARK, SyntaxKind::CLOSE_ANGLE]);
    p.flush(SyntaxKind::MARKUP_TEXT_LITERAL);
    found
}

fn is_cdata_ahead(p: &Parser<'_, '_>) -> bool {
    p.at(SyntaxKind::LBRACKET)
        && p.nth(1) == SyntaxKind::TEXT
        && p.nth_text(1).eq_ignore_ascii_case("cdata")
        && p.nth(2) == SyntaxKind::LBRACKET
}

/// Parse a comment already known to be well formed.
fn html_comment(p: &mut Parser<'_, '_>) -> bool {
    let m = p.start();
    for _ in 0..3 {
        p.bump();
    }
    p.flush(SyntaxKind::MARKUP_TEXT_LITERAL);

    loop {
        scan::skip_to(p, SyntaxKind::DOUBLE_HYPHEN);
        if p.at_end() {
            break;
        }

        // Only the last pair of a hyphen run can start the closer.
        while p.at(SyntaxKind::DOUBLE_HYPHEN) && p.nth(1) == SyntaxKind::DOUBLE_HYPHEN {
            p.bump();
        }

        if let Some(len) = comment_closer_len(p, 0) {
            p.flush(SyntaxKind::MARKUP_TEXT_LITERAL);
            for _ in 0..len {
                p.bump();
            }
            p.flush(SyntaxKind::MARKUP_TEXT_LITERAL);
            m.complete(p, SyntaxKind::MARKUP_COMMENT_BLOCK);
            return true;
        }
        p.bump();
    }

    m.complete(p, SyntaxKind::MARKUP_COMMENT_BLOCK);
    false
}

/// Token length of `-->` or `--->` at `n`.
fn comment_closer_len(p: &Parser<'_, '_>, n: usize) -> Option<usize> {
    if p.nth(n) != SyntaxKind::DOUBLE_HYPHEN {
        return None;
    }
    match p.nth(n + 1) {
        SyntaxKind::CLOSE_ANGLE => Some(2),
        SyntaxKind::TEXT if p.nth_text(n + 1) == "-" && p.nth(n + 2) == SyntaxKind::CLOSE_ANGLE => {
            Some(3)
        }
        _ => None,
    }
}

/// Check that `<!--` at the cursor starts a comment the HTML grammar accepts.
///
/// The body must not start with `>` or `->`, must not contain `<!--` or
/// `--!>`, and must not end with `<!-`. The lexer turns `<!-` followed by the
/// closer into `<!--`, so the last rule falls out of the second. A comment
/// that never closes is not a comment either.
pub fn is_html_comment_ahead(p: &Parser<'_, '_>) -> bool {
    if p.nth(1) != SyntaxKind::BANG || p.nth(2) != SyntaxKind::DOUBLE_HYPHEN {
        return false;
    }

    const BODY: usize = 3;
    match p.nth(BODY) {
        SyntaxKind::CLOSE_ANGLE => return false,
        SyntaxKind::TEXT if p.nth_text(BODY) == "-" && p.nth(BODY + 1) == SyntaxKind::CLOSE_ANGLE => {
            return false;
        }
        _ => {}
    }

    let mut n = BODY;
    loop {
        match p.nth(n) {
            SyntaxKind::EOF => return false,
            SyntaxKind::OPEN_ANGLE
                if p.nth(n + 1) == SyntaxKind::BANG
                    && p.nth(n + 2) == SyntaxKind::DOUBLE_HYPHEN =>
            {
                return false;
            }
            SyntaxKind::DOUBLE_HYPHEN => {
                while p.nth(n + 1) == SyntaxKind::DOUBLE_HYPHEN {
                    n += 1;
                }
                if comment_closer_len(p, n).is_some() {
                    return true;
                }
                if p.nth(n + 1) == SyntaxKind::BANG && p.nth(n + 2) == SyntaxKind::CLOSE_ANGLE {
                    return false;
                }
            }
            _ => {}
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ParseContext;
    use crate::lexer::lex;
    use crate::parser::code::ImplicitExpression;
    use rstest::rstest;

    fn comment_ahead(source: &str) -> bool {
        let p = Parser::new(lex(source), ParseContext::default(), &ImplicitExpression);
        is_html_comment_ahead(&p)
    }

    #[rstest]
    #[case("<!-- ok -->", true)]
    #[case("<!---->", true)]
    #[case("<!-- a -- b -->", true)]
    #[case("<!-- dashes ---->", true)]
    #[case("<!-- x --->", true)]
    #[case("<!--->", false)]
    #[case("<!-->", false)]
    #[case("<!-- a<!-- -->", false)]
    #[case("<!-- a --!> -->", false)]
    #[case("<!-- a <!--->", false)]
    #[case("<!-- never closed", false)]
    #[case("<!DOCTYPE html>", false)]
    fn html_comment_lookahead(#[case] source: &str, #[case] expected: bool) {
        assert_eq!(comment_ahead(source), expected);
    }

    #[rstest]
    #[case("<!p>", 1, true)]
    #[case("<!DOCTYPE html>", 1, false)]
    #[case("<!doctype html>", 1, false)]
    #[case("<!-- c -->", 1, false)]
    #[case("<![CDATA[", 1, false)]
    fn bang_escape_detection(#[case] source: &str, #[case] n: usize, #[case] expected: bool) {
        let p = Parser::new(lex(source), ParseContext::default(), &ImplicitExpression);
        assert_eq!(is_bang_escape(&p, n), expected);
    }
}
