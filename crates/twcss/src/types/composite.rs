//! Multi-term value kinds.
//!
//! Each validator splits a value into comma separated layers and then into
//! whitespace separated terms, and checks the terms against the grammar of
//! the corresponding CSS property.

use phf::phf_set;

use super::color::is_color;
use super::units::{UnitClass, dimension_class, first_unit, is_math_function, is_reference, is_zero};
use super::{split_top_level, split_top_level_whitespace};

static IMAGE_FUNCTIONS: phf::Set<&'static str> = phf_set! {
    "url", "image", "image-set", "cross-fade", "element",
    "linear-gradient", "radial-gradient", "conic-gradient",
    "repeating-linear-gradient", "repeating-radial-gradient", "repeating-conic-gradient",
};

static GENERIC_FAMILIES: phf::Set<&'static str> = phf_set! {
    "serif", "sans-serif", "monospace", "cursive", "fantasy", "system-ui",
    "ui-serif", "ui-sans-serif", "ui-monospace", "ui-rounded", "math", "emoji", "fangsong",
};

fn layers(value: &str) -> Option<Vec<&str>> {
    let layers: Vec<&str> = split_top_level(value, ',').into_iter().map(str::trim).collect();
    layers.iter().all(|l| !l.is_empty()).then_some(layers)
}

/// A length, `0`, or a math function whose first unit is a length.
pub fn is_length(term: &str) -> bool {
    dimension_class(term) == Some(UnitClass::Length)
        || is_zero(term)
        || (is_math_function(term) && matches!(first_unit(term), Some(UnitClass::Length) | None))
}

pub fn is_percentage(term: &str) -> bool {
    dimension_class(term) == Some(UnitClass::Percentage)
        || (is_math_function(term) && first_unit(term) == Some(UnitClass::Percentage))
}

fn is_length_percentage(term: &str) -> bool {
    is_length(term) || is_percentage(term) || is_reference(term)
}

pub fn is_generic_family(term: &str) -> bool {
    GENERIC_FAMILIES.contains(term)
}

/// `box-shadow`: `none`, or layers of 2 to 4 lengths with an optional
/// `inset` and an optional color.
pub fn is_shadow(value: &str) -> bool {
    if value.trim() == "none" {
        return true;
    }
    let Some(layers) = layers(value) else {
        return false;
    };
    layers.iter().all(|layer| {
        let mut lengths = 0;
        let mut inset = 0;
        let mut colors = 0;
        for term in split_top_level_whitespace(layer) {
            if term == "inset" {
                inset += 1;
            } else if is_length(term) {
                lengths += 1;
            } else if is_color(term) || is_reference(term) {
                colors += 1;
            } else {
                return false;
            }
        }
        (2..=4).contains(&lengths) && inset <= 1 && colors <= 1
    })
}

/// `background-image` style values: urls, gradients and image functions.
pub fn is_image(value: &str) -> bool {
    let Some(layers) = layers(value) else {
        return false;
    };
    layers.iter().all(|layer| {
        layer
            .find('(')
            .is_some_and(|open| layer.ends_with(')') && IMAGE_FUNCTIONS.contains(&layer[..open]))
    })
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
    Either,
}

#[derive(Clone, Copy)]
enum PositionTerm {
    Edge(Axis),
    Center,
    Offset,
}

fn position_term(term: &str) -> Option<PositionTerm> {
    match term {
        "left" | "right" => Some(PositionTerm::Edge(Axis::Horizontal)),
        "top" | "bottom" => Some(PositionTerm::Edge(Axis::Vertical)),
        "center" => Some(PositionTerm::Center),
        t if is_length_percentage(t) => Some(PositionTerm::Offset),
        _ => None,
    }
}

fn axis(term: PositionTerm) -> Axis {
    match term {
        PositionTerm::Edge(axis) => axis,
        PositionTerm::Center | PositionTerm::Offset => Axis::Either,
    }
}

fn compatible(a: Axis, b: Axis) -> bool {
    a == Axis::Either || b == Axis::Either || a != b
}

fn is_position_layer(layer: &str) -> bool {
    let Some(terms) = split_top_level_whitespace(layer)
        .into_iter()
        .map(position_term)
        .collect::<Option<Vec<_>>>()
    else {
        return false;
    };

    match terms.as_slice() {
        [_] => true,
        [first, second] => {
            let (a, b) = (axis(*first), axis(*second));
            // An offset pins its term to the x axis when first, y when second.
            let a = if matches!(first, PositionTerm::Offset) { Axis::Horizontal } else { a };
            let b = if matches!(second, PositionTerm::Offset) { Axis::Vertical } else { b };
            compatible(a, b)
        }
        [_, _, _] | [_, _, _, _] => {
            // Edge keywords each followed by an optional offset.
            let mut groups = Vec::new();
            let mut iter = terms.iter().peekable();
            while let Some(term) = iter.next() {
                match term {
                    PositionTerm::Offset => return false,
                    PositionTerm::Center => groups.push(Axis::Either),
                    PositionTerm::Edge(axis) => {
                        if matches!(iter.peek(), Some(PositionTerm::Offset)) {
                            iter.next();
                        }
                        groups.push(*axis);
                    }
                }
            }
            groups.len() == 2 && compatible(groups[0], groups[1])
        }
        _ => false,
    }
}

/// `background-position`: layers of 1 to 4 terms.
pub fn is_background_position(value: &str) -> bool {
    layers(value).is_some_and(|layers| layers.iter().all(|l| is_position_layer(l)))
}

/// `background-size`: `cover`, `contain`, or one or two sizes per layer.
pub fn is_background_size(value: &str) -> bool {
    let Some(layers) = layers(value) else {
        return false;
    };
    layers.iter().all(|layer| {
        if matches!(*layer, "cover" | "contain") {
            return true;
        }
        let terms = split_top_level_whitespace(layer);
        (1..=2).contains(&terms.len())
            && terms.iter().all(|t| *t == "auto" || is_length_percentage(t))
    })
}

/// A comma separated list of font family names.
pub fn is_family_list(value: &str) -> bool {
    let Some(layers) = layers(value) else {
        return false;
    };
    layers.iter().all(|family| {
        let quoted = |q: char| family.len() >= 2 && family.starts_with(q) && family.ends_with(q);
        if quoted('"') || quoted('\'') {
            return true;
        }
        family.split_whitespace().all(|word| {
            !word.starts_with(|c: char| c.is_ascii_digit())
                && !word.starts_with("--")
                && word
                    .chars()
                    .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shadows() {
        assert!(is_shadow("0 1px 2px rgb(0 0 0 / 0.05)"));
        assert!(is_shadow("inset 0 2px 4px 0 #000, 0 0 0 1px red"));
        assert!(is_shadow("none"));
        assert!(!is_shadow("1px"));
        assert!(!is_shadow("0 0 1px 2px 3px"));
        assert!(!is_shadow("0 0 red blue"));
        assert!(!is_shadow("inset inset 0 0"));
    }

    #[test]
    fn images() {
        assert!(is_image("url(/a.png)"));
        assert!(is_image("linear-gradient(to right, red, blue), url(x.svg)"));
        assert!(!is_image("red"));
        assert!(!is_image("calc(1px)"));
    }

    #[test]
    fn background_positions() {
        assert!(is_background_position("center"));
        assert!(is_background_position("left top"));
        assert!(is_background_position("top left"));
        assert!(is_background_position("10% 20px"));
        assert!(is_background_position("right 10px bottom 5%"));
        assert!(is_background_position("center bottom 10px"));
        assert!(!is_background_position("left right"));
        assert!(!is_background_position("top 10px"));
        assert!(!is_background_position("10px 10px 10px"));
        assert!(!is_background_position("red"));
    }

    #[test]
    fn background_sizes() {
        assert!(is_background_size("cover"));
        assert!(is_background_size("auto 50%"));
        assert!(is_background_size("10px, contain"));
        assert!(!is_background_size("cover auto"));
        assert!(!is_background_size("1px 2px 3px"));
    }

    #[test]
    fn family_lists() {
        assert!(is_family_list("Inter, sans-serif"));
        assert!(is_family_list("'Open Sans', \"Fira Code\""));
        assert!(!is_family_list("1px"));
        assert!(!is_family_list("a,,b"));
    }
}
