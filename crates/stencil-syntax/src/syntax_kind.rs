//! SyntaxKind enum for all tokens and nodes in the markup CST.
//!
//! Following the rust-analyzer model, all tokens and nodes share a single enum.
//! Every byte in the source must appear as a token in the tree.

/// All syntax kinds for the markup CST.
///
/// This enum represents both tokens (lexer output) and composite nodes (parser output).
/// The `repr(u16)` ensures efficient storage in rowan's green tree.
///
/// We use SCREAMING_CASE following the rust-analyzer convention for SyntaxKind.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // === Tokens (lexer output) ===
    /// Horizontal whitespace (spaces, tabs)
    WHITESPACE,
    /// Line ending
    NEWLINE,
    /// Plain text content
    TEXT,
    /// `<`
    OPEN_ANGLE,
    /// `>`
    CLOSE_ANGLE,
    /// `/`
    FORWARD_SLASH,
    /// `!`
    BANG,
    /// `?`
    QUESTION_MARK,
    /// `@`, the switch into embedded code
    TRANSITION,
    /// `@*` opening an inline comment
    RAZOR_COMMENT_OPEN,
    /// `*@` closing an inline comment
    RAZOR_COMMENT_CLOSE,
    /// `--`
    DOUBLE_HYPHEN,
    /// `[`
    LBRACKET,
    /// `]`
    RBRACKET,
    /// `=`
    EQUALS,
    /// `"`
    DOUBLE_QUOTE,
    /// `'`
    SINGLE_QUOTE,
    /// `:`
    COLON,
    /// End of file marker
    EOF,

    // === Composite Nodes (parser output) ===
    /// Root node returned by the entry points
    ROOT,
    /// One markup block, the unit a host parser asks for
    MARKUP_BLOCK,
    /// A start tag (with its element content while open), an end tag, or a
    /// self-closing tag
    MARKUP_TAG_BLOCK,
    /// `<!-- ... -->`
    MARKUP_COMMENT_BLOCK,
    /// A run of literal markup
    MARKUP_TEXT_LITERAL,
    /// Literal kept for position but never rendered
    MARKUP_EPHEMERAL_LITERAL,
    /// Boundary between markup and embedded code or the text pseudo-tag
    MARKUP_TRANSITION,
    /// Syntax that only steers the parser (`@@`, `:`, `!` escapes)
    META_CODE,
    /// One attribute inside a start tag
    ATTRIBUTE_BLOCK,
    /// The value part of an attribute
    ATTRIBUTE_VALUE,
    /// Embedded code claimed by the code parser
    CODE_BLOCK,
    /// `@* ... *@`
    RAZOR_COMMENT,
    /// Tokens after the markup block that belong to the host
    UNPARSED,
}

impl SyntaxKind {
    /// Returns true if this kind represents a token (lexer output).
    pub fn is_token(self) -> bool {
        (self as u16) <= (Self::EOF as u16)
    }

    /// Returns true if this kind represents a composite node.
    pub fn is_node(self) -> bool {
        !self.is_token()
    }

    /// Returns true if this kind is trivia (whitespace/newlines).
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::WHITESPACE | Self::NEWLINE)
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

/// Language definition for rowan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StencilLang {}

impl rowan::Language for StencilLang {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 <= SyntaxKind::UNPARSED as u16);
        // SAFETY: We check bounds above and SyntaxKind is repr(u16)
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type alias for our syntax nodes.
pub type SyntaxNode = rowan::SyntaxNode<StencilLang>;
/// Type alias for our syntax tokens.
pub type SyntaxToken = rowan::SyntaxToken<StencilLang>;
/// Type alias for syntax elements (node or token).
pub type SyntaxElement = rowan::SyntaxElement<StencilLang>;
