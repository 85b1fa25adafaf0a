//! A `nom`-based parser for the inside of one markup tag (`/name attr="v" ...`).
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_till, take_while, take_while1},
    character::complete::{char, multispace0, multispace1, satisfy},
    combinator::{map, opt, recognize},
    multi::many0,
    sequence::{delimited, pair, preceded},
};

/// A tag as written in the source, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTag<'a> {
    pub closing: bool,
    /// Lower-cased tag name.
    pub name: String,
    pub attributes: Vec<(&'a str, &'a str)>,
    pub self_closing: bool,
}

impl<'a> RawTag<'a> {
    /// Value of the first attribute called `name` (case-insensitive).
    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        self.attributes
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| *value)
    }
}

/// Parses the text between `<` and `>`.
///
/// Returns `None` when the text does not start like a tag (`/`? then a letter),
/// in which case the angle brackets are literal text. Attributes are read
/// best-effort: anything after the last well-formed attribute is ignored.
pub fn parse_tag(inner: &str) -> Option<RawTag<'_>> {
    let (_, (closing, name, attributes)) = (
        map(opt(char('/')), |slash| slash.is_some()),
        tag_name,
        many0(preceded(multispace1, attribute)),
    )
        .parse(inner)
        .ok()?;
    Some(RawTag {
        closing,
        name: name.to_ascii_lowercase(),
        attributes,
        self_closing: !closing && inner.trim_end().ends_with('/'),
    })
}

/// Parses the leading integer of a pixel length (`"120"`, `"120px"`).
pub fn parse_pixels(value: &str) -> Option<i32> {
    let digits: IResult<&str, &str> =
        preceded(multispace0, take_while1(|c: char| c.is_ascii_digit())).parse(value);
    digits.ok().and_then(|(_, n)| n.parse().ok())
}

fn tag_name(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(|c| c.is_ascii_alphabetic()),
        take_while(|c: char| c.is_ascii_alphanumeric() || matches!(c, ':' | '-' | '_')),
    ))
    .parse(input)
}

fn attribute_name(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !c.is_whitespace() && !matches!(c, '=' | '/' | '"' | '\'' | '<'))
        .parse(input)
}

fn attribute_value(input: &str) -> IResult<&str, &str> {
    alt((
        delimited(char('"'), take_till(|c: char| c == '"'), char('"')),
        delimited(char('\''), take_till(|c: char| c == '\''), char('\'')),
        take_while1(|c: char| !c.is_whitespace() && c != '"' && c != '\''),
    ))
    .parse(input)
}

fn attribute(input: &str) -> IResult<&str, (&str, &str)> {
    (
        attribute_name,
        map(
            opt(preceded(delimited(multispace0, tag("="), multispace0), attribute_value)),
            |value| value.unwrap_or(""),
        ),
    )
        .parse(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_tags() {
        let open = parse_tag("b").unwrap();
        assert!(!open.closing);
        assert_eq!(open.name, "b");

        let close = parse_tag("/STRONG").unwrap();
        assert!(close.closing);
        assert_eq!(close.name, "strong");
    }

    #[test]
    fn test_parse_attributes() {
        let img = parse_tag(r#"img src="https://x.test/a.png" width='120' alt=logo"#).unwrap();
        assert_eq!(img.name, "img");
        assert_eq!(img.attribute("src"), Some("https://x.test/a.png"));
        assert_eq!(img.attribute("WIDTH"), Some("120"));
        assert_eq!(img.attribute("alt"), Some("logo"));
        assert_eq!(img.attribute("height"), None);
    }

    #[test]
    fn test_self_closing() {
        assert!(parse_tag("br/").unwrap().self_closing);
        assert!(parse_tag("span /").unwrap().self_closing);
        assert!(!parse_tag("span").unwrap().self_closing);
    }

    #[test]
    fn test_not_a_tag() {
        assert!(parse_tag(" b").is_none());
        assert!(parse_tag("3").is_none());
        assert!(parse_tag("").is_none());
        assert!(parse_tag("/").is_none());
    }

    #[test]
    fn test_best_effort_attributes() {
        let tag = parse_tag(r#"a href="https://x.test" =broken"#).unwrap();
        assert_eq!(tag.attribute("href"), Some("https://x.test"));
    }

    #[test]
    fn test_parse_pixels() {
        assert_eq!(parse_pixels("120"), Some(120));
        assert_eq!(parse_pixels(" 64px"), Some(64));
        assert_eq!(parse_pixels("auto"), None);
        assert_eq!(parse_pixels(""), None);
    }
}
