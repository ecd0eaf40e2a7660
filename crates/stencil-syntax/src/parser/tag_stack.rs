//! Stack of start tags that are still waiting for their end tag.
//!
//! Each entry owns the marker of its tag block, so content parsed while the
//! entry is open lands inside that block. Closing an entry completes the
//! marker; every entry must be closed before the parse ends.

use rowan::{TextRange, TextSize};

use super::{Marker, Parser};
use crate::diagnostics::DiagnosticKind;
use crate::syntax_kind::SyntaxKind;

/// A start tag whose end tag has not been seen yet.
pub struct OpenTag {
    name: String,
    /// Offset of the `<` that opened the tag.
    start: TextSize,
    /// `None` for the text pseudo-tag, which has no tag block.
    block: Option<Marker>,
}

impl OpenTag {
    pub fn new(name: impl Into<String>, start: TextSize, block: Option<Marker>) -> Self {
        Self {
            name: name.into(),
            start,
            block,
        }
    }

    #[cfg(test)]
    fn name(&self) -> &str {
        &self.name
    }

    /// Range of the tag name, just after the `<`.
    pub fn name_range(&self) -> TextRange {
        TextRange::at(self.start + TextSize::from(1), TextSize::of(self.name.as_str()))
    }

    /// Close the tag's block.
    pub fn close(self, p: &mut Parser<'_, '_>) {
        if let Some(block) = self.block {
            block.complete(p, SyntaxKind::MARKUP_TAG_BLOCK);
        }
    }
}

#[derive(Default)]
pub struct TagStack {
    entries: Vec<OpenTag>,
}

impl TagStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, tag: OpenTag) {
        log::trace!("open <{}>", tag.name);
        self.entries.push(tag);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Pop entries until one named `name` is found, and hand it back still
    /// open.
    ///
    /// Every entry popped on the way is closed and reported as missing its
    /// end tag. If the stack runs out, the end tag starting at `tag_start`
    /// is reported as unexpected, unless entries were already reported.
    pub fn remove_matching(
        &mut self,
        p: &mut Parser<'_, '_>,
        name: &str,
        tag_start: TextSize,
    ) -> Option<OpenTag> {
        let mut popped_any = false;
        while let Some(top) = self.entries.pop() {
            if top.name.eq_ignore_ascii_case(name) {
                return Some(top);
            }
            p.error(
                DiagnosticKind::MissingEndTag {
                    name: top.name.clone(),
                },
                top.name_range(),
            );
            top.close(p);
            popped_any = true;
        }

        if !popped_any {
            let range = TextRange::at(tag_start + TextSize::from(2), TextSize::of(name));
            p.error(
                DiagnosticKind::UnexpectedEndTag {
                    name: name.to_string(),
                },
                range,
            );
        }
        None
    }

    /// Close everything still open at the end of the block.
    ///
    /// Only the innermost entry is reported; its ancestors are closed
    /// silently. Returns true when nothing was left open.
    pub fn drain(&mut self, p: &mut Parser<'_, '_>) -> bool {
        let Some(top) = self.entries.pop() else {
            return true;
        };
        p.error(
            DiagnosticKind::MissingEndTag {
                name: top.name.clone(),
            },
            top.name_range(),
        );
        top.close(p);
        while let Some(entry) = self.entries.pop() {
            entry.close(p);
        }
        false
    }
}
