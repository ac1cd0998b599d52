//! Theme path parsing.

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{take_till, take_while1},
    character::complete::char,
    combinator::{all_consuming, map},
    multi::many0,
    sequence::{delimited, preceded},
};

fn ident(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !matches!(c, '.' | '[' | ']' | '/') && !c.is_whitespace())(input)
}

/// `[key]`, where the key may contain dots and slashes and may be quoted.
fn bracket(input: &str) -> IResult<&str, &str> {
    map(delimited(char('['), take_till(|c| c == ']'), char(']')), |key: &str| {
        let key = key.trim();
        key.strip_prefix(['\'', '"'])
            .and_then(|k| k.strip_suffix(['\'', '"']))
            .unwrap_or(key)
    })(input)
}

fn segments(input: &str) -> IResult<&str, Vec<&str>> {
    let (input, first) = alt((ident, bracket))(input)?;
    let (input, rest) = many0(alt((preceded(char('.'), ident), bracket)))(input)?;
    let mut all = Vec::with_capacity(rest.len() + 1);
    all.push(first);
    all.extend(rest);
    Ok((input, all))
}

/// Splits a theme path into its segments.
///
/// Returns `None` unless the whole (trimmed) input is a path.
///
/// ```
/// use twcss::theme::parse_path;
///
/// assert_eq!(
///     parse_path("colors.red[500]").unwrap(),
///     ["colors", "red", "500"]
/// );
/// assert_eq!(parse_path("spacing['2.5']").unwrap(), ["spacing", "2.5"]);
/// assert_eq!(parse_path("colors.red/50"), None);
/// ```
pub fn parse_path(input: &str) -> Option<Vec<String>> {
    all_consuming(segments)(input.trim())
        .ok()
        .map(|(_, segments)| segments.into_iter().map(str::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_bracket_segment() {
        assert_eq!(parse_path("[a.b].c").unwrap(), ["a.b", "c"]);
    }

    #[test]
    fn rejects_malformed_paths() {
        assert_eq!(parse_path(""), None);
        assert_eq!(parse_path("colors..red"), None);
        assert_eq!(parse_path("colors[red"), None);
        assert_eq!(parse_path("colors red"), None);
    }
}
