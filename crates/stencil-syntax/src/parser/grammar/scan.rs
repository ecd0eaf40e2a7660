//! Skip-and-emit scanning.
//!
//! Markup text is mostly literal, but any run of it may contain embedded code
//! or inline comments. [`skip_until`] walks such a run, hands transitions to
//! the code parser as it meets them and leaves everything else accepted for
//! the caller to flush.

use crate::parser::Parser;
use crate::syntax_kind::SyntaxKind;

/// Scan to the next token of `kind`, or to the end of input.
pub fn skip_to(p: &mut Parser<'_, '_>, kind: SyntaxKind) {
    skip_until(p, |p| p.at(kind));
}

/// Scan until `stop` holds at the cursor, or to the end of input.
///
/// The token before the cursor is held back (read but not accepted) so that
/// line-leading whitespace can still be given to the code parser or marked
/// ephemeral when a transition or comment follows it. Everything read is
/// accepted on return; the stop token itself is not.
pub fn skip_until(p: &mut Parser<'_, '_>, stop: impl Fn(&Parser<'_, '_>) -> bool) {
    let mut deferred: Option<usize> = None;
    let mut start_of_line = false;

    while !p.at_end() && !stop(p) {
        if p.context().ephemeral_line_ending {
            p.context_mut().ephemeral_line_ending = false;
            p.accept_read();
            p.flush(SyntaxKind::MARKUP_TEXT_LITERAL);
            start_of_line = ephemeral_line_end(p);
            deferred = None;
            continue;
        }

        match p.current() {
            SyntaxKind::NEWLINE => {
                p.bump();
                deferred = None;
                start_of_line = true;
            }
            SyntaxKind::TRANSITION if p.nth(1) == SyntaxKind::TRANSITION => {
                // `@@` renders as a single `@`.
                p.accept_read();
                p.flush(SyntaxKind::MARKUP_TEXT_LITERAL);
                p.bump();
                p.flush(SyntaxKind::MARKUP_EPHEMERAL_LITERAL);
                p.bump();
                deferred = None;
                start_of_line = false;
            }
            SyntaxKind::TRANSITION => {
                match deferred {
                    // Indentation before a code line belongs to the code.
                    Some(index)
                        if start_of_line
                            && !p.options().design_time
                            && p.kind_at(index) == SyntaxKind::WHITESPACE =>
                    {
                        p.rewind(index)
                    }
                    _ => p.accept_read(),
                }
                p.flush(SyntaxKind::MARKUP_TEXT_LITERAL);
                p.parse_embedded_code();
                deferred = None;
                start_of_line = false;
            }
            SyntaxKind::RAZOR_COMMENT_OPEN => {
                let leading = matches!(
                    deferred,
                    Some(index) if start_of_line && p.kind_at(index) == SyntaxKind::WHITESPACE
                );
                p.flush(SyntaxKind::MARKUP_TEXT_LITERAL);
                p.accept_read();
                if leading {
                    p.flush(SyntaxKind::MARKUP_EPHEMERAL_LITERAL);
                } else {
                    p.flush(SyntaxKind::MARKUP_TEXT_LITERAL);
                }

                let was_start_of_line = start_of_line || deferred.is_none() && at_line_start(p);
                p.parse_inline_comment();
                start_of_line = was_start_of_line && ephemeral_line_end(p);
                deferred = None;
            }
            kind => {
                start_of_line &= kind == SyntaxKind::WHITESPACE;
                p.accept_read();
                deferred = Some(p.position());
                p.advance();
            }
        }
    }

    p.accept_read();
}

/// Accept tokens until one of `kinds`, without handing anything to the code
/// parser.
pub fn accept_until(p: &mut Parser<'_, '_>, kinds: &[SyntaxKind]) {
    while !p.at_end() && !kinds.contains(&p.current()) {
        p.bump();
    }
}

/// Scan to the first occurrence of the token sequence `kinds` and accept it.
/// Returns false when the input ran out first.
pub fn accept_until_all(p: &mut Parser<'_, '_>, kinds: &[SyntaxKind]) -> bool {
    let Some(&first) = kinds.first() else {
        return true;
    };
    loop {
        skip_to(p, first);
        if p.at_end() {
            return false;
        }
        if kinds.iter().enumerate().all(|(i, &kind)| p.nth(i) == kind) {
            for _ in kinds {
                p.bump();
            }
            return true;
        }
        p.bump();
    }
}

/// Number of whitespace and newline tokens from `n` on.
pub fn spacing_len(p: &Parser<'_, '_>, n: usize) -> usize {
    let mut len = 0;
    while matches!(
        p.nth(n + len),
        SyntaxKind::WHITESPACE | SyntaxKind::NEWLINE
    ) {
        len += 1;
    }
    len
}

/// Emit trailing whitespace and a newline as an ephemeral literal. Returns
/// true when a newline was taken.
fn ephemeral_line_end(p: &mut Parser<'_, '_>) -> bool {
    let n = usize::from(p.at(SyntaxKind::WHITESPACE));
    if p.nth(n) != SyntaxKind::NEWLINE {
        return false;
    }
    for _ in 0..=n {
        p.bump();
    }
    p.flush(SyntaxKind::MARKUP_EPHEMERAL_LITERAL);
    true
}

/// Whether the cursor sits at the first token of a line.
fn at_line_start(p: &Parser<'_, '_>) -> bool {
    let pos = p.position();
    pos == 0 || p.kind_at(pos - 1) == SyntaxKind::NEWLINE
}
