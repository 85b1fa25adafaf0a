//! Descriptor tokens produced by the tokenizer and consumed by the schema emitters.

/// The structural meaning of a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Literal text (already XML-escaped) styled by the token's tag stack.
    Text,
    ParagraphBegin,
    ParagraphEnd,
    ListBegin { ordered: bool },
    ListEnd { ordered: bool },
    ListItemBegin,
    ListItemEnd,
    /// Opening anchor. The target is raw and validated later.
    AnchorBegin { href: String },
    AnchorEnd,
    /// Inline image. `width`/`height` are pixels or `PX_UNSET`.
    Image { src: String, width: i32, height: i32 },
    Break,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub content: String,
    pub kind: TokenKind,
    /// Active tag names, outermost first.
    pub tags: Vec<String>,
    /// Set on an empty `ParagraphBegin`: index of the token to resume at.
    pub skip_to: Option<usize>,
}

impl Token {
    pub fn text(content: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            content: content.into(),
            kind: TokenKind::Text,
            tags,
            skip_to: None,
        }
    }

    pub fn structural(kind: TokenKind, tags: Vec<String>) -> Self {
        Self {
            content: String::new(),
            kind,
            tags,
            skip_to: None,
        }
    }

    pub fn is_text(&self) -> bool {
        self.kind == TokenKind::Text
    }

    pub fn is_list_begin(&self) -> bool {
        matches!(self.kind, TokenKind::ListBegin { .. })
    }

    pub fn is_list_end(&self) -> bool {
        matches!(self.kind, TokenKind::ListEnd { .. })
    }

    /// Inline content that opens a paragraph by itself when found outside one.
    pub fn is_inline(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Text | TokenKind::AnchorBegin { .. } | TokenKind::Image { .. }
        )
    }

    /// Whether this token makes the enclosing paragraph worth rendering.
    fn is_meaningful(&self) -> bool {
        match &self.kind {
            TokenKind::Image { .. } | TokenKind::AnchorBegin { .. } => true,
            TokenKind::Text => {
                self.content.contains('\u{a0}') || !self.content.trim().is_empty()
            }
            _ => false,
        }
    }
}

/// Marks paragraphs that contain nothing visible before the next paragraph or list.
///
/// Each such `ParagraphBegin` gets `skip_to` set to the index of that next block,
/// so the emitters jump over it instead of producing a blank line. A skip never
/// crosses a list item or list boundary.
pub fn mark_empty_paragraphs(tokens: &mut [Token]) {
    let mut open: Option<usize> = None;
    let mut empty = true;
    for index in 0..tokens.len() {
        if matches!(
            tokens[index].kind,
            TokenKind::ListItemBegin | TokenKind::ListItemEnd | TokenKind::ListEnd { .. }
        ) {
            open = None;
            continue;
        }
        let starts_block =
            tokens[index].kind == TokenKind::ParagraphBegin || tokens[index].is_list_begin();
        if empty
            && starts_block
            && let Some(begin) = open
        {
            tokens[begin].skip_to = Some(index);
            open = None;
        }
        if tokens[index].kind == TokenKind::ParagraphBegin {
            open = Some(index);
            empty = true;
        }
        if tokens[index].is_meaningful() {
            empty = false;
            open = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn begin() -> Token {
        Token::structural(TokenKind::ParagraphBegin, vec![])
    }

    fn end() -> Token {
        Token::structural(TokenKind::ParagraphEnd, vec![])
    }

    #[test]
    fn test_empty_paragraph_is_marked() {
        let mut tokens = vec![begin(), end(), begin(), Token::text("x", vec![]), end()];
        mark_empty_paragraphs(&mut tokens);
        assert_eq!(tokens[0].skip_to, Some(2));
        assert_eq!(tokens[2].skip_to, None);
    }

    #[test]
    fn test_whitespace_only_paragraph_is_empty() {
        let mut tokens = vec![
            begin(),
            Token::text("   ", vec![]),
            end(),
            Token::structural(TokenKind::ListBegin { ordered: false }, vec![]),
        ];
        mark_empty_paragraphs(&mut tokens);
        assert_eq!(tokens[0].skip_to, Some(3));
    }

    #[test]
    fn test_non_breaking_space_is_content() {
        let mut tokens = vec![begin(), Token::text("\u{a0}", vec![]), end(), begin(), end()];
        mark_empty_paragraphs(&mut tokens);
        assert_eq!(tokens[0].skip_to, None);
    }

    #[test]
    fn test_image_is_content() {
        let image = Token::structural(
            TokenKind::Image {
                src: "a.png".into(),
                width: -1,
                height: -1,
            },
            vec![],
        );
        let mut tokens = vec![begin(), image, end(), begin(), end()];
        mark_empty_paragraphs(&mut tokens);
        assert_eq!(tokens[0].skip_to, None);
    }

    #[test]
    fn test_skip_stops_at_list_boundaries() {
        let mut tokens = vec![
            Token::structural(TokenKind::ListBegin { ordered: false }, vec![]),
            Token::structural(TokenKind::ListItemBegin, vec![]),
            begin(),
            end(),
            Token::structural(TokenKind::ListItemEnd, vec![]),
            Token::structural(TokenKind::ListEnd { ordered: false }, vec![]),
            begin(),
            Token::text("after", vec![]),
            end(),
        ];
        mark_empty_paragraphs(&mut tokens);
        assert!(tokens.iter().all(|token| token.skip_to.is_none()));
    }

    #[test]
    fn test_last_paragraph_is_never_marked() {
        let mut tokens = vec![begin(), end()];
        mark_empty_paragraphs(&mut tokens);
        assert_eq!(tokens[0].skip_to, None);
    }
}
