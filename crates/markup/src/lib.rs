//! Rich-text (HTML subset) front end: normalization, tokenization and the
//! empty-paragraph pass that both document emitters rely on.
pub mod attributes;
pub mod entities;
pub mod token;
pub mod tokenizer;

pub use entities::normalize;
pub use token::{Token, TokenKind, mark_empty_paragraphs};
pub use tokenizer::{escape_text, tokenize};

/// Runs the full front end over one HTML value.
pub fn parse_html(raw: &str) -> Vec<Token> {
    let mut tokens = tokenize(&normalize(raw));
    mark_empty_paragraphs(&mut tokens);
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_html_pipeline() {
        let tokens = parse_html("<p>\n</p><p>caf&eacute;</p>");
        assert_eq!(tokens[0].kind, TokenKind::ParagraphBegin);
        assert_eq!(tokens[0].skip_to, Some(2));
        assert_eq!(tokens[3].content, "café");
    }

    #[test]
    fn test_escaped_markup_stays_text() {
        let tokens = parse_html("&lt;b&gt;not bold&lt;/b&gt;");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].content, "&lt;b&gt;not bold&lt;/b&gt;");
        assert!(tokens[0].tags.is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_html("").is_empty());
    }
}
