//! The tag-block state machine.
//!
//! [`tag_block`] parses one markup subtree: tags are read one at a time and
//! start tags are pushed onto a [`TagStack`] until the outermost one is
//! closed again. Content between tags goes through the skip-and-emit scanner
//! so embedded code is still recognised.

use rowan::{TextRange, TextSize};

use super::attributes::{self, Attribute};
use super::{scan, special};
use crate::diagnostics::DiagnosticKind;
use crate::parser::tag_stack::{OpenTag, TagStack};
use crate::parser::{Marker, Parser};
use crate::syntax_kind::SyntaxKind;

/// Outcome of parsing one tag.
enum TagStep {
    /// The tag produced its own nodes.
    Emitted { complete: bool },
    /// A start tag was pushed; its block stays open on the stack.
    Opened,
    /// A tag block that ends here.
    Pending { block: Marker, complete: bool },
    /// A tag cut short by another `<` or the end of input.
    Aborted { block: Marker },
}

impl TagStep {
    fn finish(self, p: &mut Parser<'_, '_>) -> bool {
        match self {
            TagStep::Emitted { complete } => complete,
            TagStep::Opened => true,
            TagStep::Pending { block, complete } => {
                block.complete(p, SyntaxKind::MARKUP_TAG_BLOCK);
                complete
            }
            TagStep::Aborted { block } => {
                block.complete(p, SyntaxKind::MARKUP_TAG_BLOCK);
                false
            }
        }
    }
}

/// Parse tags until the tag stack is empty again. The cursor is on a `<`.
pub fn tag_block(p: &mut Parser<'_, '_>) {
    let mut stack = TagStack::new();
    let mut complete = false;
    loop {
        scan::skip_to(p, SyntaxKind::OPEN_ANGLE);
        p.flush(SyntaxKind::MARKUP_TEXT_LITERAL);
        if p.at_end() {
            break;
        }
        complete = tag(p, &mut stack);
        if stack.is_empty() {
            break;
        }
    }
    end_tag_block(p, &mut stack, complete);
}

fn tag(p: &mut Parser<'_, '_>, stack: &mut TagStack) -> bool {
    let tag_start = p.current_start();
    let step = if p.nth(1) == SyntaxKind::EOF {
        let block = p.start();
        p.bump();
        if stack.is_empty() {
            p.error(
                DiagnosticKind::OuterTagMissingName,
                TextRange::empty(p.current_start()),
            );
        }
        TagStep::Aborted { block }
    } else if special::at_special_tag(p) {
        let complete = if p.nth(1) == SyntaxKind::BANG {
            special::bang_tag(p)
        } else {
            special::xml_pi(p)
        };
        TagStep::Emitted { complete }
    } else if p.nth(1) == SyntaxKind::FORWARD_SLASH {
        end_tag(p, stack, tag_start)
    } else {
        start_tag(p, stack, tag_start)
    };
    step.finish(p)
}

/// The tag name starting `n` tokens ahead. A bang escape is part of the
/// name, so `<!p>` is named `!p`.
pub fn tag_name_at(p: &Parser<'_, '_>, n: usize) -> String {
    let (mut n, mut name) = if special::is_bang_escape(p, n) {
        (n + 1, String::from("!"))
    } else {
        (n, String::new())
    };
    while p.nth(n) == SyntaxKind::TEXT {
        name.push_str(p.nth_text(n));
        n += 1;
    }
    name
}

/// Accept the name tokens at the cursor.
pub fn eat_name(p: &mut Parser<'_, '_>) {
    while p.at(SyntaxKind::TEXT) {
        p.bump();
    }
}

fn name_range(start: TextSize, name: &str) -> TextRange {
    TextRange::at(start, TextSize::of(name))
}

fn start_tag(p: &mut Parser<'_, '_>, stack: &mut TagStack, tag_start: TextSize) -> TagStep {
    let name = tag_name_at(p, 1);
    if stack.is_empty() && p.options().is_text_tag(&name) {
        return text_tag(p, stack, tag_start, name);
    }

    let block = p.start();
    p.bump();
    special::bang_escape(p);
    eat_name(p);
    rest_of_tag(p, stack, block, name, tag_start)
}

/// Everything after the tag name: attributes and the closer.
fn rest_of_tag(
    p: &mut Parser<'_, '_>,
    stack: &mut TagStack,
    block: Marker,
    name: String,
    tag_start: TextSize,
) -> TagStep {
    let attrs = attributes::attributes(p);
    if p.at(SyntaxKind::OPEN_ANGLE) {
        return TagStep::Aborted { block };
    }

    let self_closing = p.eat(SyntaxKind::FORWARD_SLASH);
    if !p.eat(SyntaxKind::CLOSE_ANGLE) {
        let range = TextRange::at(
            tag_start + TextSize::from(1),
            TextSize::of(name.as_str()).max(TextSize::from(1)),
        );
        p.error(DiagnosticKind::UnfinishedTag { name }, range);
        p.missing(SyntaxKind::CLOSE_ANGLE);
        return TagStep::Pending {
            block,
            complete: false,
        };
    }
    p.flush(SyntaxKind::MARKUP_TEXT_LITERAL);

    if self_closing {
        return TagStep::Pending {
            block,
            complete: true,
        };
    }
    if p.options().is_void_element(&name) {
        void_end_tag(p, &name);
        return TagStep::Pending {
            block,
            complete: true,
        };
    }
    if p.options().is_script_tag(&name) && !script_expects_html(p, &attrs) {
        script_content(p, &name);
        return TagStep::Pending {
            block,
            complete: true,
        };
    }

    stack.push(OpenTag::new(name, tag_start, Some(block)));
    TagStep::Opened
}

/// Fold a redundant `</name>` after a void tag into the void tag's block.
/// Nothing is consumed when it is absent.
fn void_end_tag(p: &mut Parser<'_, '_>, name: &str) {
    let n = scan::spacing_len(p, 0);
    if p.nth(n) != SyntaxKind::OPEN_ANGLE
        || p.nth(n + 1) != SyntaxKind::FORWARD_SLASH
        || !tag_name_at(p, n + 2).eq_ignore_ascii_case(name)
    {
        return;
    }

    for _ in 0..n + 2 {
        p.bump();
    }
    eat_name(p);
    scan::accept_until(p, &[SyntaxKind::CLOSE_ANGLE, SyntaxKind::OPEN_ANGLE]);
    p.eat(SyntaxKind::CLOSE_ANGLE);
    p.flush(SyntaxKind::MARKUP_TEXT_LITERAL);
}

/// A script tag holds markup only when its first `type` attribute names the
/// HTML script type.
pub fn script_expects_html(p: &Parser<'_, '_>, attrs: &[Attribute]) -> bool {
    attrs
        .iter()
        .find(|attr| attr.name.eq_ignore_ascii_case("type"))
        .and_then(|attr| attr.value.as_deref())
        .is_some_and(|value| {
            value
                .trim()
                .eq_ignore_ascii_case(&p.options().html_script_type)
        })
}

/// Opaque script content up to and including `</name>`.
pub fn script_content(p: &mut Parser<'_, '_>, name: &str) {
    loop {
        scan::skip_to(p, SyntaxKind::OPEN_ANGLE);
        if p.at_end() {
            return;
        }
        if p.nth(1) != SyntaxKind::FORWARD_SLASH || !tag_name_at(p, 2).eq_ignore_ascii_case(name) {
            p.bump();
            continue;
        }

        let tag_start = p.current_start();
        let block = p.start();
        p.bump();
        p.bump();
        eat_name(p);
        scan::skip_to(p, SyntaxKind::CLOSE_ANGLE);
        if !p.eat(SyntaxKind::CLOSE_ANGLE) {
            p.error(
                DiagnosticKind::UnfinishedTag {
                    name: name.to_string(),
                },
                name_range(tag_start + TextSize::from(2), name),
            );
            p.missing(SyntaxKind::CLOSE_ANGLE);
        }
        block.complete(p, SyntaxKind::MARKUP_TAG_BLOCK);
        return;
    }
}

fn end_tag(p: &mut Parser<'_, '_>, stack: &mut TagStack, tag_start: TextSize) -> TagStep {
    if p.nth(2) == SyntaxKind::EOF {
        let block = p.start();
        p.bump();
        p.bump();
        return TagStep::Pending {
            block,
            complete: false,
        };
    }

    let name = tag_name_at(p, 2);
    match stack.remove_matching(p, &name, tag_start) {
        Some(open) if stack.is_empty() && p.options().is_text_tag(&name) => {
            open.close(p);
            text_end_tag(p, tag_start, &name)
        }
        Some(open) => {
            let complete = close_tag(p, tag_start, &name);
            open.close(p);
            TagStep::Emitted { complete }
        }
        None => TagStep::Emitted {
            complete: close_tag(p, tag_start, &name),
        },
    }
}

/// Emit `</name ...>` as its own tag block.
fn close_tag(p: &mut Parser<'_, '_>, tag_start: TextSize, name: &str) -> bool {
    let block = p.start();
    p.bump();
    p.bump();
    special::bang_escape(p);
    eat_name(p);
    scan::accept_until(p, &[SyntaxKind::CLOSE_ANGLE, SyntaxKind::OPEN_ANGLE]);

    let complete = p.eat(SyntaxKind::CLOSE_ANGLE);
    if !complete {
        p.error(
            DiagnosticKind::UnfinishedTag {
                name: name.to_string(),
            },
            name_range(tag_start + TextSize::from(2), name),
        );
        p.missing(SyntaxKind::CLOSE_ANGLE);
    }
    block.complete(p, SyntaxKind::MARKUP_TAG_BLOCK);
    complete
}

/// The document-text pseudo-tag. Its start tag becomes a transition and
/// takes no attributes.
fn text_tag(p: &mut Parser<'_, '_>, stack: &mut TagStack, tag_start: TextSize, name: String) -> TagStep {
    p.bump();
    eat_name(p);

    // Spacing may surround the `/`; a tag that had one never opens.
    let mut n = scan::spacing_len(p, 0);
    let self_closing = p.nth(n) == SyntaxKind::FORWARD_SLASH;
    if self_closing {
        for _ in 0..=n {
            p.bump();
        }
        n = scan::spacing_len(p, 0);
    }

    if p.nth(n) == SyntaxKind::CLOSE_ANGLE {
        for _ in 0..=n {
            p.bump();
        }
    } else {
        p.error(
            DiagnosticKind::TextTagCannotContainAttributes,
            name_range(tag_start + TextSize::from(1), &name),
        );
        recover_text_tag(p);
    }

    if !self_closing {
        stack.push(OpenTag::new(name, tag_start, None));
    }
    p.flush(SyntaxKind::MARKUP_TRANSITION);
    TagStep::Emitted { complete: true }
}

fn text_end_tag(p: &mut Parser<'_, '_>, tag_start: TextSize, name: &str) -> TagStep {
    p.bump();
    p.bump();
    eat_name(p);
    if !p.eat(SyntaxKind::CLOSE_ANGLE) {
        p.error(
            DiagnosticKind::TextTagCannotContainAttributes,
            name_range(tag_start + TextSize::from(2), name),
        );
        recover_text_tag(p);
    }
    p.flush(SyntaxKind::MARKUP_TRANSITION);
    TagStep::Emitted { complete: true }
}

/// Skip to the next `>` or line end.
fn recover_text_tag(p: &mut Parser<'_, '_>) {
    scan::accept_until(p, &[SyntaxKind::CLOSE_ANGLE, SyntaxKind::NEWLINE]);
    p.eat(SyntaxKind::CLOSE_ANGLE);
}

/// Close whatever is still open and claim trailing whitespace.
fn end_tag_block(p: &mut Parser<'_, '_>, stack: &mut TagStack, complete: bool) {
    let complete = stack.drain(p) && complete;

    let claim = if p.options().design_time {
        !complete
    } else {
        p.last_node() != Some(SyntaxKind::MARKUP_TRANSITION) || markup_follows(p)
    };
    if claim {
        p.eat(SyntaxKind::WHITESPACE);
        p.eat(SyntaxKind::NEWLINE);
    }
    p.flush(SyntaxKind::MARKUP_TEXT_LITERAL);
}

/// Whether the next non-space token starts more markup: a tag or `@:`.
fn markup_follows(p: &Parser<'_, '_>) -> bool {
    let n = scan::spacing_len(p, 0);
    match p.nth(n) {
        SyntaxKind::OPEN_ANGLE => true,
        SyntaxKind::TRANSITION => p.nth(n + 1) == SyntaxKind::COLON,
        _ => false,
    }
}
