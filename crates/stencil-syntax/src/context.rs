//! Parse options and the per-parse context built from them.

/// Tag names that never have content or an end tag.
pub const DEFAULT_VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "command", "embed", "hr", "img", "input", "keygen", "link",
    "meta", "param", "source", "track", "wbr",
];

/// Settings a host configures once per parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Editor mode: whitespace after a cleanly closed block stays with the host.
    pub design_time: bool,
    /// Name of the document-text pseudo-tag whose body is always literal.
    pub text_tag_name: String,
    /// Name of the tag whose body is opaque content.
    pub script_tag_name: String,
    /// `type` attribute value that makes the script tag ordinary markup.
    pub html_script_type: String,
    pub void_elements: Vec<String>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            design_time: false,
            text_tag_name: "text".to_string(),
            script_tag_name: "script".to_string(),
            html_script_type: "text/html".to_string(),
            void_elements: DEFAULT_VOID_ELEMENTS
                .iter()
                .map(|name| name.to_string())
                .collect(),
        }
    }
}

impl ParseOptions {
    pub fn is_void_element(&self, name: &str) -> bool {
        self.void_elements
            .iter()
            .any(|void| void.eq_ignore_ascii_case(name))
    }

    pub fn is_text_tag(&self, name: &str) -> bool {
        name.eq_ignore_ascii_case(&self.text_tag_name)
    }

    pub fn is_script_tag(&self, name: &str) -> bool {
        name.eq_ignore_ascii_case(&self.script_tag_name)
    }
}

/// State for a single parse call.
///
/// A fresh context is built for every call, so nothing leaks from one parse
/// into the next.
#[derive(Debug, Clone)]
pub struct ParseContext {
    pub options: ParseOptions,
    /// Whether nesting sequences match case-sensitively.
    pub case_sensitive: bool,
    /// Set while single-line markup runs, for the embedded-code parser to read.
    pub whitespace_significant_to_ancestor: bool,
    /// Set by an embedded-code parser: the next whitespace and newline the
    /// markup scanner meets are emitted as an ephemeral literal.
    pub ephemeral_line_ending: bool,
}

impl ParseContext {
    pub fn new(options: ParseOptions) -> Self {
        Self {
            options,
            case_sensitive: false,
            whitespace_significant_to_ancestor: false,
            ephemeral_line_ending: false,
        }
    }
}

impl Default for ParseContext {
    fn default() -> Self {
        Self::new(ParseOptions::default())
    }
}

/// Open and close sequences that bound a nested markup region, such as the
/// braces of a host code block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestingSequences {
    pub start: String,
    pub end: String,
    pub case_sensitive: bool,
}

impl NestingSequences {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            case_sensitive: false,
        }
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("br", true)]
    #[case("BR", true)]
    #[case("Img", true)]
    #[case("div", false)]
    #[case("script", false)]
    fn void_elements_ignore_case(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(ParseOptions::default().is_void_element(name), expected);
    }

    #[test]
    fn escaped_text_tag_is_not_the_pseudo_tag() {
        let options = ParseOptions::default();
        assert!(options.is_text_tag("TEXT"));
        assert!(!options.is_text_tag("!text"));
    }

    #[test]
    fn fresh_context_has_no_flags_set() {
        let context = ParseContext::default();
        assert!(!context.case_sensitive);
        assert!(!context.whitespace_significant_to_ancestor);
        assert!(!context.ephemeral_line_ending);
    }

    #[test]
    fn nesting_sequences_default_to_ignoring_case() {
        let sequences = NestingSequences::new("{", "}");
        assert!(!sequences.case_sensitive);
        assert!(sequences.case_sensitive(true).case_sensitive);
    }
}
