//! Sink for converting parser events into a Rowan green tree.

use rowan::{GreenNode, GreenNodeBuilder};

use crate::lexer::Token;
use crate::parser::event::Event;
use crate::syntax_kind::SyntaxKind;

/// Converts parser events and tokens into a Rowan green tree.
pub struct Sink<'t, 'input> {
    builder: GreenNodeBuilder<'static>,
    tokens: &'t [Token<'input>],
    cursor: usize,
    events: Vec<Event>,
}

impl<'t, 'input> Sink<'t, 'input> {
    /// Create a new sink.
    pub fn new(tokens: &'t [Token<'input>], events: Vec<Event>) -> Self {
        Self {
            builder: GreenNodeBuilder::new(),
            tokens,
            cursor: 0,
            events,
        }
    }

    /// Consume the sink and build the green tree.
    pub fn finish(mut self) -> GreenNode {
        for event in std::mem::take(&mut self.events) {
            match event {
                Event::Start { kind } => self.builder.start_node(kind.into()),
                Event::Token { kind, n_raw_tokens } => {
                    self.token(kind, n_raw_tokens as usize);
                }
                Event::Finish => self.builder.finish_node(),
                Event::Placeholder => {}
            }
        }

        self.builder.finish()
    }

    fn token(&mut self, kind: SyntaxKind, n_raw_tokens: usize) {
        let start = self.cursor;
        self.cursor += n_raw_tokens;
        let text: String = self.tokens[start..self.cursor]
            .iter()
            .map(|t| t.text)
            .collect();
        self.builder.token(kind.into(), &text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;
    use crate::syntax_kind::SyntaxNode;

    #[test]
    fn sink_builds_simple_tree() {
        let tokens = lex("<p>");

        let events = vec![
            Event::start(SyntaxKind::ROOT),
            Event::start(SyntaxKind::MARKUP_TAG_BLOCK),
            Event::token(SyntaxKind::OPEN_ANGLE),
            Event::token(SyntaxKind::TEXT),
            Event::token(SyntaxKind::CLOSE_ANGLE),
            Event::Finish,
            Event::Finish,
        ];

        let tree = SyntaxNode::new_root(Sink::new(&tokens, events).finish());

        assert_eq!(tree.kind(), SyntaxKind::ROOT);
        assert_eq!(tree.children().count(), 1);
        assert_eq!(tree.text().to_string(), "<p>");
    }

    #[test]
    fn sink_emits_empty_missing_token() {
        let tokens = lex("<p");

        let events = vec![
            Event::start(SyntaxKind::ROOT),
            Event::token(SyntaxKind::OPEN_ANGLE),
            Event::token(SyntaxKind::TEXT),
            Event::missing(SyntaxKind::CLOSE_ANGLE),
            Event::Finish,
        ];

        let tree = SyntaxNode::new_root(Sink::new(&tokens, events).finish());
        let last = tree.last_token().map(|t| (t.kind(), t.text().to_string()));

        assert_eq!(last, Some((SyntaxKind::CLOSE_ANGLE, String::new())));
        assert_eq!(tree.text().to_string(), "<p");
    }
}
