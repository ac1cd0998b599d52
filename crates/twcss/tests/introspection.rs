//! Lookups and listings on a built context.

use pretty_assertions::assert_eq;
use twcss::config::{Config, resolve_config};
use twcss::context::{Context, Plugin, create_context};
use twcss::{StyleTree, style_tree};

fn context() -> Context {
    create_context(&resolve_config(&Config::new())).unwrap()
}

#[test]
fn wrap_composes_variants() {
    let ctx = context();
    let wrapper = ctx.wrap("md:focus").unwrap();
    assert_eq!(
        wrapper.apply(style_tree! { "display" => "flex" }),
        style_tree! {
            "@media (min-width: 768px)" => style_tree! {
                "&:focus" => style_tree! { "display" => "flex" },
            },
        }
    );
    assert!(ctx.wrap("").unwrap().is_identity());
}

#[test]
fn wrapped_empty_trees_stay_empty() {
    let wrapper = context().wrap("hover:").unwrap();
    assert_eq!(wrapper.apply(StyleTree::new()), StyleTree::new());
}

#[test]
fn resolve_utility_reports_the_prefix() {
    let ctx = context();
    let found = ctx.resolve_utility("mt-4").unwrap();
    assert_eq!(found.key, "mt");
    assert!(found.spec.is_lookup());
    assert_eq!(found.tree, style_tree! { "margin-top" => "1rem" });

    let found = ctx.resolve_utility("text-[22px]").unwrap();
    assert_eq!(found.key, "text");
    assert_eq!(found.tree, style_tree! { "font-size" => "22px" });

    assert!(ctx.resolve_utility("nope").is_none());
    assert!(ctx.resolve_utility("flex p-4").is_none());
}

#[test]
fn resolve_variant_with_and_without_separator() {
    let ctx = context();
    let found = ctx.resolve_variant("md").unwrap();
    assert_eq!(found.key, "md");
    assert!(found.spec.is_some());

    let found = ctx.resolve_variant("group-hover:").unwrap();
    assert_eq!(found.key, "group");
    assert_eq!(
        found.wrapper.apply(style_tree! { "color" => "red" }),
        style_tree! { ".group:hover &" => style_tree! { "color" => "red" } }
    );

    let found = ctx.resolve_variant("[&_p]").unwrap();
    assert_eq!(found.key, "");
    assert!(found.spec.is_none());
    assert_eq!(
        found.wrapper.apply(style_tree! { "color" => "red" }),
        style_tree! { "& p" => style_tree! { "color" => "red" } }
    );

    assert!(ctx.resolve_variant("nope").is_none());
}

#[test]
fn theme_rendering() {
    let ctx = context();
    assert_eq!(ctx.render_theme("spacing.4"), "1rem");
    assert_eq!(ctx.render_theme("colors.red.500 / 50"), "rgb(239 68 68 / 0.5)");
    assert_eq!(ctx.render_theme("colors.black/31"), "rgb(0 0 0 / 0.31)");
    assert_eq!(ctx.render_theme("colors.nope"), "");
    assert_eq!(
        ctx.render_theme_func("calc(theme(spacing.4) * 2)"),
        "calc(1rem * 2)"
    );
    assert_eq!(
        ctx.render_theme_func("theme(colors.nope, red)"),
        "red"
    );
}

#[test]
fn listings_follow_registration_order() {
    let ctx = create_context(&resolve_config(&Config::new().plugin(Plugin::new(
        "late",
        |api| {
            api.add_utilities(style_tree! { ".zzz" => style_tree! { "order" => "1" } });
            api.add_variant("late", "&.late");
        },
    ))))
    .unwrap();

    let utilities = ctx.get_utilities();
    let position = |name: &str| utilities.iter().position(|u| *u == name);
    assert!(position("container") < position("flex"));
    assert!(position("flex") < position("p"));
    assert_eq!(utilities.last(), Some(&"zzz"));

    let variants = ctx.get_variants();
    assert!(variants.contains(&"hover"));
    assert!(variants.contains(&"md"));
    assert_eq!(variants.last(), Some(&"late"));
}

#[test]
fn color_and_ambiguous_listings() {
    let ctx = context();
    let colors = ctx.get_color_utilities();
    for name in ["bg", "text", "border", "placeholder"] {
        assert!(colors.contains(&name), "{name} should take colors");
    }
    assert!(!colors.contains(&"p"));

    let ambiguous = ctx.get_ambiguous();
    assert!(ambiguous.contains(&"bg"));
    assert!(ambiguous.contains(&"text"));
    assert!(!ambiguous.contains(&"p"));
}
