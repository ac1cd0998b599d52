//! Integration tests for the utility string parser.

use pretty_assertions::assert_eq;
use twparse::{NodeKind, Separator, parse};

fn dump(input: &str) -> String {
    parse(input, &Separator::default()).dump()
}

// ============================================================================
// Classnames
// ============================================================================

#[test]
fn parse_mixed_program() {
    insta::assert_snapshot!(
        dump("flex -mt-2 w-1/2 bg-red-500/50"),
        @"(program (class flex) (class -mt-2) (class w-1/2 /2) (class bg-red-500/50 /50))"
    );
}

#[test]
fn parse_arbitrary_values_with_nested_functions() {
    insta::assert_snapshot!(
        dump("w-[calc(100%-theme(spacing[2.5]))] bg-[url(//cdn/a.png)]"),
        @"(program (arbitrary w [calc(100%-theme(spacing[2.5]))]) (arbitrary bg [url(//cdn/a.png)]))"
    );
}

#[test]
fn parse_tagged_arbitrary_value() {
    insta::assert_snapshot!(
        dump("text-[length:var(--size)]"),
        @"(program (arbitrary text [length:var(--size)]))"
    );
}

#[test]
fn parse_unicode_identifiers() {
    insta::assert_snapshot!(dump("content-[日本] 日本"), @"(program (arbitrary content [日本]) (class 日本))");
}

// ============================================================================
// Variants
// ============================================================================

#[test]
fn parse_stacked_variants_on_group() {
    insta::assert_snapshot!(
        dump("dark:hover:(bg-black text-white)"),
        @"(program (span (variant dark) (span (variant hover) (group (class bg-black) (class text-white)))))"
    );
}

#[test]
fn parse_arbitrary_selector_media() {
    insta::assert_snapshot!(
        dump("[@media(print)]:hidden"),
        @"(program (span (selector [@media(print)]) (class hidden)))"
    );
}

#[test]
fn parse_arbitrary_variant_with_modifier() {
    insta::assert_snapshot!(
        dump("group-[.is-open]/menu:block"),
        @"(program (span (arbitrary-variant group [.is-open] /menu) (class block)))"
    );
}

#[test]
fn parse_nested_group_variant() {
    insta::assert_snapshot!(
        dump("((a: b:): c:):x"),
        @"(program (span (group-variant (group-variant (variant a) (variant b)) (variant c)) (class x)))"
    );
}

#[test]
fn group_variant_members_are_variant_nodes() {
    let ast = parse("(first: last:):p-2", &Separator::default());
    let NodeKind::VariantSpan { variant, child } = ast.kind(ast.exprs()[0]) else {
        panic!("expected variant span");
    };
    let NodeKind::GroupVariant { members, closed } = ast.kind(*variant) else {
        panic!("expected group variant");
    };
    assert!(*closed);
    assert_eq!(members.len(), 2);
    assert!(members.iter().flatten().all(|id| ast.node(*id).is_variant()));
    assert_eq!(ast.node_text(child.unwrap()), "p-2");
}

// ============================================================================
// Important flags
// ============================================================================

#[test]
fn important_is_symmetric() {
    assert_eq!(dump("!text-black"), dump("text-black!"));
    assert_eq!(dump("!(a b)"), dump("(a b)!"));
    assert_eq!(dump("![a:b]"), dump("[a:b]!"));
}

#[test]
fn important_arbitrary_classname() {
    insta::assert_snapshot!(dump("!p-[3px] m-[1px]!"), @"(program (arbitrary! p [3px]) (arbitrary! m [1px]))");
}

// ============================================================================
// Partial input
// ============================================================================

#[test]
fn partial_inputs_never_fail() {
    for input in [
        "(", "[", "hover:", "hover:(", "bg-[", "bg-[red]/[", "(a:", "!(", "![", "!", ":", "]]",
    ] {
        let ast = parse(input, &Separator::default());
        assert!(!ast.is_empty(), "{input:?} should produce a program");
    }
}

#[test]
fn unclosed_modifier_marks_node_unclosed() {
    let ast = parse("bg-[red]/[50", &Separator::default());
    let id = ast.exprs()[0];
    assert!(!ast.node(id).is_closed());
    insta::assert_snapshot!(ast.dump(), @"(program (arbitrary bg [red] /[50))");
}

#[test]
fn unclosed_group_variant_falls_back_to_group() {
    insta::assert_snapshot!(dump("(a: b:"), @"(program (group? (span (variant a)) (span (variant b))))");
}

// ============================================================================
// Separators
// ============================================================================

#[test]
fn colon_is_plain_text_with_other_separator() {
    let sep = Separator::new("|").unwrap();
    insta::assert_snapshot!(
        parse("hover|[color:red] a:b", &sep).dump(),
        @"(program (span (variant hover) (property [color:red])) (class a:b))"
    );
}
