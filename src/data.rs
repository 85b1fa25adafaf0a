//! Dotted data paths of placeholders, e.g. `d.items[2].body`.
//!
//! `d` is the root of the render data. Only keys and array indexes are
//! supported; formatters and expressions belong to the template engine.
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{char, u64 as nom_u64},
    combinator::{all_consuming, map},
    multi::many0,
    sequence::{delimited, preceded},
};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

fn identifier(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_' || c == '-').parse(input)
}

fn key_segment(input: &str) -> IResult<&str, PathSegment> {
    map(preceded(char('.'), identifier), |s: &str| {
        PathSegment::Key(s.to_string())
    })
    .parse(input)
}

fn index_segment(input: &str) -> IResult<&str, PathSegment> {
    map(delimited(char('['), nom_u64, char(']')), |i| {
        PathSegment::Index(i as usize)
    })
    .parse(input)
}

fn data_path(input: &str) -> IResult<&str, Vec<PathSegment>> {
    preceded(tag("d"), many0(alt((key_segment, index_segment)))).parse(input)
}

/// Parses a data path; `None` when it does not start at the data root.
pub fn parse_path(path: &str) -> Option<Vec<PathSegment>> {
    all_consuming(data_path)
        .parse(path.trim())
        .ok()
        .map(|(_, segments)| segments)
}

/// Selects the value a path points at.
pub fn select<'a>(data: &'a Value, segments: &[PathSegment]) -> Option<&'a Value> {
    segments.iter().try_fold(data, |value, segment| match segment {
        PathSegment::Key(key) => value.get(key.as_str()),
        PathSegment::Index(index) => value.get(*index),
    })
}

/// Resolves a path to the string handed to the compiler.
///
/// Strings are used as they are, numbers and booleans are printed, anything
/// missing or structured yields `None`.
pub fn resolve_string(data: &Value, path: &str) -> Option<String> {
    let segments = parse_path(path)?;
    match select(data, &segments)? {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_path() {
        assert_eq!(
            parse_path("d.items[1].body"),
            Some(vec![
                PathSegment::Key("items".into()),
                PathSegment::Index(1),
                PathSegment::Key("body".into()),
            ])
        );
        assert_eq!(parse_path("d"), Some(vec![]));
        assert_eq!(parse_path("c.now"), None);
        assert_eq!(parse_path("d.items["), None);
    }

    #[test]
    fn test_resolve_string() {
        let data = json!({ "body": "<b>x</b>", "items": [{ "n": 4 }], "flag": true, "obj": {} });
        assert_eq!(resolve_string(&data, "d.body").as_deref(), Some("<b>x</b>"));
        assert_eq!(resolve_string(&data, "d.items[0].n").as_deref(), Some("4"));
        assert_eq!(resolve_string(&data, "d.flag").as_deref(), Some("true"));
        assert_eq!(resolve_string(&data, "d.obj"), None);
        assert_eq!(resolve_string(&data, "d.missing"), None);
        assert_eq!(resolve_string(&data, "d.items[3].n"), None);
    }
}
