//! Parse diagnostics and usage errors.
//!
//! Diagnostics never stop the parser. They are collected in source order and
//! handed back next to the tree; the caller decides whether any of them should
//! fail a build.

use rowan::TextRange;
use thiserror::Error;

/// What went wrong, with the message shown to users.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiagnosticKind {
    #[error(
        "End of file or an unexpected character was reached before the \"{name}\" tag could be parsed. \
         Elements inside markup blocks must be complete. They must either be self-closing (\"<br />\") \
         or have matching end tags (\"<p>Hello</p>\")."
    )]
    UnfinishedTag { name: String },

    #[error(
        "The \"{name}\" element was not closed. All elements must be either self-closing or have a matching end tag."
    )]
    MissingEndTag { name: String },

    #[error(
        "Encountered end tag \"{name}\" with no matching start tag. Are your start/end tags properly balanced?"
    )]
    UnexpectedEndTag { name: String },

    #[error("\"<text>\" and \"</text>\" tags cannot contain attributes.")]
    TextTagCannotContainAttributes,

    #[error(
        "Outer tag is missing a name. The first character of a markup block must be an HTML tag with a valid name."
    )]
    OuterTagMissingName,

    #[error(
        "Markup in a code block must start with a tag and all start tags must be matched with end tags. \
         Do not use unclosed tags like \"<br>\". Instead use self-closing tags like \"<br/>\"."
    )]
    MarkupBlockMustStartWithTag,
}

/// A diagnostic attached to a source range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{range:?}: {kind}")]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub range: TextRange,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, range: TextRange) -> Self {
        Self { kind, range }
    }
}

/// Errors in how the parser was called, as opposed to what it was given.
#[derive(Debug, Error)]
pub enum ParserError {
    #[error("The parser context has not been set. Configure parse options before parsing.")]
    ContextNotSet,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowan::TextSize;

    #[test]
    fn missing_end_tag_message_names_the_tag() {
        let kind = DiagnosticKind::MissingEndTag {
            name: "span".to_string(),
        };
        assert!(kind.to_string().starts_with("The \"span\" element was not closed."));
    }

    #[test]
    fn diagnostic_display_includes_range() {
        let diagnostic = Diagnostic::new(
            DiagnosticKind::TextTagCannotContainAttributes,
            TextRange::at(TextSize::from(1), TextSize::from(4)),
        );
        assert_eq!(
            diagnostic.to_string(),
            "1..5: \"<text>\" and \"</text>\" tags cannot contain attributes."
        );
    }
}
