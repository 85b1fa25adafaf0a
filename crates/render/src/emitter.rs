//! The seam between the token stream and the two document schemas.
use crate::builder::ContentBuilder;
use pressmark_markup::Token;
use pressmark_registry::JobState;

/// Turns descriptor tokens into schema markup, registering styles, lists,
/// hyperlinks and images in the job as it goes.
pub trait Emitter {
    fn emit(&mut self, tokens: &[Token], job: &mut JobState, out: &mut ContentBuilder);
}

/// Whether `tokens[index]` opens a list that is closed right away.
pub(crate) fn starts_empty_list(tokens: &[Token], index: usize) -> bool {
    tokens[index].is_list_begin() && tokens.get(index + 1).is_some_and(Token::is_list_end)
}
