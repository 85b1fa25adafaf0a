//! Single-pass tokenizer turning a normalized HTML fragment into descriptor tokens.
//!
//! The tokenizer never fails. Angle brackets that do not form a tag are kept
//! as escaped text, unterminated comments swallow the rest of the input, and
//! tags left open at the end are closed implicitly.

use crate::attributes::{RawTag, parse_pixels, parse_tag};
use crate::entities::{COMMENT_CLOSE, COMMENT_OPEN, reference_at};
use crate::token::{Token, TokenKind};
use pressmark_types::PX_UNSET;

/// Tokenizes an HTML fragment.
///
/// Runs in time linear to the input: every `<` is only examined up to the next
/// `<` or `>`, and scanning always resumes after the examined region.
pub fn tokenize(html: &str) -> Vec<Token> {
    Tokenizer::new(html).run()
}

/// Escapes literal text for XML, leaving existing character references alone.
pub fn escape_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(offset) = rest.find(['&', '\'', '"', '<', '>']) {
        out.push_str(&rest[..offset]);
        let tail = &rest[offset..];
        match tail.as_bytes()[0] {
            b'&' => match reference_at(tail) {
                Some(reference) => {
                    out.push_str(reference);
                    rest = &tail[reference.len()..];
                    continue;
                }
                None => out.push_str("&amp;"),
            },
            b'\'' => out.push_str("&apos;"),
            b'"' => out.push_str("&quot;"),
            b'<' => out.push_str("&lt;"),
            _ => out.push_str("&gt;"),
        }
        rest = &tail[1..];
    }
    out.push_str(rest);
    out
}

struct Tokenizer<'a> {
    input: &'a str,
    tokens: Vec<Token>,
    stack: Vec<String>,
}

impl<'a> Tokenizer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            tokens: Vec::new(),
            stack: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<Token> {
        let input = self.input;
        let bytes = input.as_bytes();
        let mut pos = 0;
        let mut text_start = 0;

        while let Some(offset) = input[pos..].find('<') {
            let open = pos + offset;

            if input[open..].starts_with(COMMENT_OPEN) {
                self.push_text(&input[text_start..open]);
                let body = open + COMMENT_OPEN.len();
                pos = match input[body..].find(COMMENT_CLOSE) {
                    Some(end) => body + end + COMMENT_CLOSE.len(),
                    None => input.len(),
                };
                text_start = pos;
                continue;
            }

            match input[open + 1..].find(['<', '>']) {
                Some(delta) if bytes[open + 1 + delta] == b'>' => {
                    let close = open + 1 + delta;
                    if let Some(tag) = parse_tag(&input[open + 1..close]) {
                        self.push_text(&input[text_start..open]);
                        self.handle_tag(tag);
                        text_start = close + 1;
                    }
                    pos = close + 1;
                }
                // another `<` comes first: this one is literal
                Some(delta) => pos = open + 1 + delta,
                None => break,
            }
        }

        self.push_text(&input[text_start..]);
        if !self.stack.is_empty() {
            log::debug!("closing unterminated tags {:?} at end of input", self.stack);
        }
        self.tokens
    }

    fn push_text(&mut self, raw: &str) {
        if !raw.is_empty() {
            self.tokens
                .push(Token::text(escape_text(raw), self.stack.clone()));
        }
    }

    fn push(&mut self, kind: TokenKind) {
        self.tokens
            .push(Token::structural(kind, self.stack.clone()));
    }

    fn handle_tag(&mut self, tag: RawTag<'_>) {
        match (tag.closing, tag.name.as_str()) {
            (_, "br") => self.push(TokenKind::Break),
            (false, "img") => match tag.attribute("src").filter(|src| !src.is_empty()) {
                Some(src) => {
                    let dimension =
                        |name: &str| tag.attribute(name).and_then(parse_pixels).unwrap_or(PX_UNSET);
                    let kind = TokenKind::Image {
                        src: src.to_string(),
                        width: dimension("width"),
                        height: dimension("height"),
                    };
                    self.push(kind);
                }
                None => log::debug!("dropping <img> without a source"),
            },
            (true, "img") => {}
            (false, "p") => self.push(TokenKind::ParagraphBegin),
            (true, "p") => self.push(TokenKind::ParagraphEnd),
            (false, "ol") => self.push(TokenKind::ListBegin { ordered: true }),
            (true, "ol") => self.push(TokenKind::ListEnd { ordered: true }),
            (false, "ul") => self.push(TokenKind::ListBegin { ordered: false }),
            (true, "ul") => self.push(TokenKind::ListEnd { ordered: false }),
            (false, "li") => self.push(TokenKind::ListItemBegin),
            (true, "li") => self.push(TokenKind::ListItemEnd),
            (false, "a") => {
                let href = tag.attribute("href").unwrap_or_default().to_string();
                self.push(TokenKind::AnchorBegin { href });
            }
            (true, "a") => self.push(TokenKind::AnchorEnd),
            (true, name) => match self.stack.pop() {
                Some(open) if open != name => {
                    log::debug!("</{}> closes <{}>", name, open);
                }
                Some(_) => {}
                None => log::debug!("ignoring </{}> without an open tag", name),
            },
            (false, _) if tag.self_closing => {}
            (false, name) => self.stack.push(name.to_string()),
        }
    }
}
