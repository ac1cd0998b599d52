//! Numbers, dimensions and math functions.
//!
//! These parsers classify the leaf values that the value kinds are built
//! from, and implement sign flipping for negative utilities.

use nom::{
    IResult,
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{char, digit0, digit1, one_of},
    combinator::{all_consuming, opt, recognize},
    sequence::{pair, tuple},
};

const LENGTH_UNITS: &[&str] = &[
    "px", "rem", "em", "ex", "ch", "vw", "vh", "vmin", "vmax", "cm", "mm", "in", "pt", "pc", "q",
    "lh", "rlh", "cap", "ic", "dvw", "dvh", "svw", "svh", "lvw", "lvh", "cqw", "cqh", "cqi",
    "cqb", "cqmin", "cqmax", "vi", "vb",
];

const ANGLE_UNITS: &[&str] = &["deg", "rad", "grad", "turn"];

/// Functions whose arguments are arithmetic expressions.
pub const MATH_FUNCTIONS: &[&str] = &["calc", "min", "max", "clamp"];

/// What a number's unit says about it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnitClass {
    /// No unit at all.
    Unitless,
    Length,
    Percentage,
    Angle,
    /// Some unit that is none of the above (`s`, `fr`, `dpi`, ...).
    Other,
}

impl UnitClass {
    fn of(unit: &str) -> Self {
        let unit = unit.to_ascii_lowercase();
        match unit.as_str() {
            "" => UnitClass::Unitless,
            "%" => UnitClass::Percentage,
            u if LENGTH_UNITS.contains(&u) => UnitClass::Length,
            u if ANGLE_UNITS.contains(&u) => UnitClass::Angle,
            _ => UnitClass::Other,
        }
    }
}

/// Recognizes a signed decimal number with optional exponent.
fn number(input: &str) -> IResult<&str, &str> {
    recognize(tuple((
        opt(one_of("+-")),
        alt((
            recognize(tuple((digit1, opt(pair(char('.'), digit0))))),
            recognize(pair(char('.'), digit1)),
        )),
        opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
    )))(input)
}

fn unit(input: &str) -> IResult<&str, &str> {
    alt((
        recognize(char('%')),
        take_while1(|c: char| c.is_ascii_alphabetic()),
    ))(input)
}

/// Splits a dimension into its number and unit.
///
/// Returns `None` unless the whole input is a number with an optional unit.
///
/// ```
/// use twcss::types::units::parse_dimension;
///
/// assert_eq!(parse_dimension("-1.5rem"), Some(("-1.5", "rem")));
/// assert_eq!(parse_dimension("50%"), Some(("50", "%")));
/// assert_eq!(parse_dimension("12"), Some(("12", "")));
/// assert_eq!(parse_dimension("1px solid"), None);
/// ```
pub fn parse_dimension(input: &str) -> Option<(&str, &str)> {
    all_consuming(pair(number, opt(unit)))(input)
        .ok()
        .map(|(_, (num, unit))| (num, unit.unwrap_or("")))
}

/// Classifies a plain dimension.
pub fn dimension_class(input: &str) -> Option<UnitClass> {
    parse_dimension(input).map(|(_, unit)| UnitClass::of(unit))
}

pub fn is_number(input: &str) -> bool {
    dimension_class(input) == Some(UnitClass::Unitless)
}

/// Returns `true` for zero without a unit, which is a valid length.
pub fn is_zero(input: &str) -> bool {
    parse_dimension(input).is_some_and(|(num, unit)| {
        unit.is_empty() && num.parse::<f64>().is_ok_and(|n| n == 0.0)
    })
}

/// Returns the function name when `input` is a single call such as
/// `calc(...)` or `var(--x)`.
pub fn function_name(input: &str) -> Option<&str> {
    let open = input.find('(')?;
    let name = &input[..open];
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    (valid && input.ends_with(')')).then_some(name)
}

pub fn is_math_function(input: &str) -> bool {
    function_name(input).is_some_and(|name| MATH_FUNCTIONS.contains(&name))
}

/// Returns `true` for `var(...)` and `env(...)` references, whose type
/// cannot be known.
pub fn is_reference(input: &str) -> bool {
    matches!(function_name(input), Some("var" | "env"))
}

/// Finds the unit of the first number inside a function expression.
///
/// This is a heuristic: `calc(1px + 50%)` is classified as a length, and an
/// expression made only of `var()` references yields `None`.
pub fn first_unit(expr: &str) -> Option<UnitClass> {
    let bytes = expr.as_bytes();
    let mut pos = 0;
    let mut in_reference = 0usize;
    let mut depth = 0usize;

    while pos < bytes.len() {
        let b = bytes[pos];
        match b {
            b'(' => {
                depth += 1;
                pos += 1;
                continue;
            }
            b')' => {
                if in_reference == depth {
                    in_reference = 0;
                }
                depth = depth.saturating_sub(1);
                pos += 1;
                continue;
            }
            _ => {}
        }

        if in_reference == 0 && b.is_ascii_alphabetic() {
            let start = pos;
            while pos < bytes.len() && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'-') {
                pos += 1;
            }
            if matches!(&expr[start..pos], "var" | "env") && bytes.get(pos) == Some(&b'(') {
                in_reference = depth + 1;
            }
            continue;
        }

        let starts_number = b.is_ascii_digit()
            || (b == b'.' && bytes.get(pos + 1).is_some_and(u8::is_ascii_digit));
        let after_word = pos > 0 && (bytes[pos - 1].is_ascii_alphabetic() || bytes[pos - 1] == b'-');
        if in_reference == 0 && starts_number && !after_word {
            let rest = &expr[pos..];
            if let Ok((after, _)) = number(rest) {
                let unit = unit(after).map(|(_, u)| u).unwrap_or("");
                return Some(UnitClass::of(unit));
            }
        }
        pos += 1;
    }
    None
}

/// Flips the sign of a value.
///
/// Plain numbers and dimensions are negated textually; `0` stays `0`.
/// Anything else is wrapped as `calc(<value> * -1)`.
///
/// ```
/// use twcss::types::units::negate;
///
/// assert_eq!(negate("1rem"), "-1rem");
/// assert_eq!(negate("-2px"), "2px");
/// assert_eq!(negate("0"), "0");
/// assert_eq!(negate("var(--x)"), "calc(var(--x) * -1)");
/// ```
pub fn negate(value: &str) -> String {
    if let Some((num, _)) = parse_dimension(value) {
        if num.trim_start_matches(['+', '-']).chars().all(|c| c == '0' || c == '.') {
            return value.trim_start_matches(['+', '-']).to_string();
        }
        return match value.strip_prefix('-') {
            Some(positive) => positive.to_string(),
            None => format!("-{}", value.trim_start_matches('+')),
        };
    }
    format!("calc({value} * -1)")
}

/// Puts spaces around binary `+` and `-` inside math functions.
///
/// `calc(100%-1rem)` becomes `calc(100% - 1rem)`. Signs that start an
/// operand and hyphens inside `var()`/`env()` names are left alone.
pub fn normalize_math(value: &str) -> String {
    if !MATH_FUNCTIONS.iter().any(|f| value.contains(&format!("{f}("))) {
        return value.to_string();
    }

    let chars: Vec<char> = value.chars().collect();
    let mut out = String::with_capacity(value.len() + 8);
    // One entry per open paren: is this level a math context?
    let mut stack: Vec<bool> = Vec::new();
    let mut word = String::new();

    for (i, &c) in chars.iter().enumerate() {
        match c {
            '(' => {
                let math = MATH_FUNCTIONS.contains(&word.as_str())
                    || (word.is_empty() && stack.last().copied().unwrap_or(false));
                stack.push(math);
                word.clear();
                out.push(c);
            }
            ')' => {
                stack.pop();
                word.clear();
                out.push(c);
            }
            '+' | '-' if stack.last().copied().unwrap_or(false) => {
                let prev = out.chars().last();
                let next = chars.get(i + 1).copied();
                let ends_operand =
                    prev.is_some_and(|p| p.is_ascii_alphanumeric() || p == '%' || p == ')');
                let starts_operand = next.is_some_and(|n| {
                    n.is_ascii_alphanumeric() || n == '.' || n == '('
                });
                let exponent = c == '-'
                    && prev.is_some_and(|p| p == 'e' || p == 'E')
                    && out.chars().rev().nth(1).is_some_and(|p| p.is_ascii_digit())
                    && next.is_some_and(|n| n.is_ascii_digit());
                let in_word = c == '-' && !word.is_empty() && next.is_some_and(|n| n.is_ascii_alphabetic());
                if ends_operand && starts_operand && !exponent && !in_word {
                    out.push(' ');
                    out.push(c);
                    out.push(' ');
                } else {
                    out.push(c);
                }
                if c == '-' && in_word {
                    word.push(c);
                } else {
                    word.clear();
                }
            }
            c if c.is_ascii_alphanumeric() || c == '_' => {
                if c.is_ascii_alphabetic() || !word.is_empty() {
                    word.push(c);
                }
                out.push(c);
            }
            c => {
                word.clear();
                out.push(c);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_dimensions() {
        assert_eq!(dimension_class("12px"), Some(UnitClass::Length));
        assert_eq!(dimension_class("1.5"), Some(UnitClass::Unitless));
        assert_eq!(dimension_class(".5turn"), Some(UnitClass::Angle));
        assert_eq!(dimension_class("10%"), Some(UnitClass::Percentage));
        assert_eq!(dimension_class("2fr"), Some(UnitClass::Other));
        assert_eq!(dimension_class("1e3"), Some(UnitClass::Unitless));
        assert_eq!(dimension_class("px"), None);
        assert!(is_zero("0"));
        assert!(!is_zero("0px"));
    }

    #[test]
    fn first_unit_skips_references() {
        assert_eq!(first_unit("calc(var(--a-1) + 2rem)"), Some(UnitClass::Length));
        assert_eq!(first_unit("min(50%, 10px)"), Some(UnitClass::Percentage));
        assert_eq!(first_unit("calc(var(--x) * 2)"), Some(UnitClass::Unitless));
        assert_eq!(first_unit("var(--x)"), None);
    }

    #[test]
    fn math_spacing() {
        assert_eq!(normalize_math("calc(100%-1rem)"), "calc(100% - 1rem)");
        assert_eq!(normalize_math("calc(1px+2px)"), "calc(1px + 2px)");
        assert_eq!(
            normalize_math("calc(100%-var(--header-height))"),
            "calc(100% - var(--header-height))"
        );
        assert_eq!(normalize_math("calc(-1*var(--x))"), "calc(-1*var(--x))");
        assert_eq!(normalize_math("calc(1e-3*1px)"), "calc(1e-3*1px)");
        assert_eq!(normalize_math("clamp(1rem,2vw+1rem,3rem)"), "clamp(1rem,2vw + 1rem,3rem)");
        assert_eq!(normalize_math("var(--a-b)"), "var(--a-b)");
    }

    #[test]
    fn negate_values() {
        assert_eq!(negate("+3px"), "-3px");
        assert_eq!(negate("0.0"), "0.0");
        assert_eq!(negate("calc(1px + 2px)"), "calc(calc(1px + 2px) * -1)");
    }
}
