//! Markup nested inside host code, bounded by a pair of text sequences.

use super::attributes;
use super::tag::{eat_name, script_content, script_expects_html, tag_name_at};
use super::{scan, special};
use crate::context::NestingSequences;
use crate::parser::Parser;
use crate::syntax_kind::SyntaxKind;

/// Scan until the end sequence balances the start sequences seen so far.
/// The closing end sequence is left at the cursor.
pub fn nesting_block(p: &mut Parser<'_, '_>, sequences: &NestingSequences) {
    let mut depth = 1usize;
    loop {
        scan::skip_until(p, |p| p.at(SyntaxKind::TEXT) || p.at(SyntaxKind::OPEN_ANGLE));
        if p.at_end() {
            break;
        }
        if p.at(SyntaxKind::OPEN_ANGLE) {
            p.flush(SyntaxKind::MARKUP_TEXT_LITERAL);
            tag_in_document_context(p);
            continue;
        }
        if text_token(p, sequences, &mut depth) {
            break;
        }
    }
    p.flush(SyntaxKind::MARKUP_TEXT_LITERAL);
}

/// Look for either sequence inside the text token at the cursor and accept
/// text up to the first match. Returns true once depth reaches zero.
fn text_token(p: &mut Parser<'_, '_>, sequences: &NestingSequences, depth: &mut usize) -> bool {
    let case_sensitive = p.context().case_sensitive;
    let text = p.current_text();

    for (i, _) in text.char_indices() {
        let rest = &text[i..];
        if matches_at(rest, &sequences.start, case_sensitive) {
            *depth += 1;
            p.split_current(i + sequences.start.len());
            p.bump();
            return false;
        }
        if matches_at(rest, &sequences.end, case_sensitive) {
            *depth -= 1;
            if *depth == 0 {
                if i > 0 {
                    p.split_current(i);
                    p.bump();
                }
                return true;
            }
            p.split_current(i + sequences.end.len());
            p.bump();
            return false;
        }
    }

    p.bump();
    false
}

fn matches_at(text: &str, sequence: &str, case_sensitive: bool) -> bool {
    if sequence.is_empty() {
        return false;
    }
    match text.get(..sequence.len()) {
        Some(head) if case_sensitive => head == sequence,
        Some(head) => head.eq_ignore_ascii_case(sequence),
        None => false,
    }
}

/// Recognise one tag with no nesting bookkeeping.
fn tag_in_document_context(p: &mut Parser<'_, '_>) {
    if special::at_special_tag(p) {
        if p.nth(1) == SyntaxKind::BANG {
            special::bang_tag(p);
        } else {
            special::xml_pi(p);
        }
        return;
    }

    let block = p.start();
    p.bump();
    if p.eat(SyntaxKind::FORWARD_SLASH) {
        special::bang_escape(p);
        eat_name(p);
        while p.at(SyntaxKind::WHITESPACE) {
            p.bump();
        }
        p.eat(SyntaxKind::CLOSE_ANGLE);
        block.complete(p, SyntaxKind::MARKUP_TAG_BLOCK);
        return;
    }

    let name = tag_name_at(p, 0);
    special::bang_escape(p);
    eat_name(p);
    let attrs = attributes::attributes(p);
    let self_closing = p.eat(SyntaxKind::FORWARD_SLASH);
    if p.eat(SyntaxKind::CLOSE_ANGLE) {
        p.flush(SyntaxKind::MARKUP_TEXT_LITERAL);
        if !self_closing && p.options().is_script_tag(&name) && !script_expects_html(p, &attrs) {
            script_content(p, &name);
        }
    }
    block.complete(p, SyntaxKind::MARKUP_TAG_BLOCK);
}
