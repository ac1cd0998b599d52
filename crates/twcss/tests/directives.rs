//! `@apply`, `@screen`, `theme()` and strict mode.

use pretty_assertions::assert_eq;
use twcss::config::{Config, CorePlugins, resolve_config};
use twcss::context::{Context, ContextOptions, Plugin, create_context};
use twcss::error::{DiagnosticKind, TwError};
use twcss::{StyleTree, style_tree};

fn with_plugin(plugin: Plugin) -> Context {
    create_context(&resolve_config(&Config::new().plugin(plugin))).unwrap()
}

fn strict(config: Config) -> twcss::Result<Context> {
    Context::with_options(
        &resolve_config(&config),
        ContextOptions { throw_error: true },
    )
}

// ============================================================================
// @apply
// ============================================================================

#[test]
fn apply_in_a_component() {
    let ctx = with_plugin(Plugin::new("buttons", |api| {
        api.add_components(style_tree! {
            ".btn" => style_tree! { "@apply" => "px-4 py-2", "cursor" => "pointer" },
        });
    }));
    assert_eq!(
        ctx.css("btn").unwrap(),
        style_tree! {
            "paddingLeft" => "1rem",
            "paddingRight" => "1rem",
            "paddingTop" => "0.5rem",
            "paddingBottom" => "0.5rem",
            "cursor" => "pointer",
        }
    );
}

#[test]
fn apply_keeps_variants_of_the_applied_classes() {
    let ctx = with_plugin(Plugin::new("links", |api| {
        api.add_components(style_tree! {
            ".link" => style_tree! { "@apply" => "text-black hover:text-red-500" },
        });
    }));
    assert_eq!(
        ctx.css("link").unwrap(),
        style_tree! {
            "color" => "#000",
            "@media (hover: hover) and (pointer: fine)" => style_tree! {
                "&:hover" => style_tree! { "color" => "#ef4444" },
            },
        }
    );
}

#[test]
fn apply_in_the_key_with_important() {
    let ctx = with_plugin(Plugin::new("strong", |api| {
        api.add_utilities(style_tree! {
            ".strong" => style_tree! { "@apply font-bold !important" => StyleTree::new() },
        });
    }));
    assert_eq!(
        ctx.css("strong").unwrap(),
        style_tree! { "fontWeight" => "700 !important" }
    );
}

#[test]
fn applied_utilities_take_outer_variants() {
    let ctx = with_plugin(Plugin::new("buttons", |api| {
        api.add_components(style_tree! { ".btn" => style_tree! { "@apply" => "flex" } });
    }));
    assert_eq!(
        ctx.css("md:btn").unwrap(),
        style_tree! { "@media (min-width: 768px)" => style_tree! { "display" => "flex" } }
    );
}

#[test]
fn self_referencing_apply_terminates() {
    let ctx = with_plugin(Plugin::new("loop", |api| {
        api.add_utilities(style_tree! { ".loop" => style_tree! { "@apply" => "loop flex" } });
    }));
    assert_eq!(ctx.css("loop").unwrap(), style_tree! { "display" => "flex" });
}

// ============================================================================
// @screen and theme()
// ============================================================================

#[test]
fn screen_wraps_its_body() {
    let ctx = with_plugin(Plugin::new("cards", |api| {
        api.add_components(style_tree! {
            ".card" => style_tree! {
                "padding" => "theme(spacing.2)",
                "@screen md" => style_tree! { "@apply" => "p-4" },
            },
        });
    }));
    assert_eq!(
        ctx.css("card").unwrap(),
        style_tree! {
            "padding" => "0.5rem",
            "@media (min-width: 768px)" => style_tree! { "padding" => "1rem" },
        }
    );
}

#[test]
fn theme_function_in_arbitrary_values() {
    let ctx = create_context(&resolve_config(&Config::new())).unwrap();
    assert_eq!(
        ctx.css("w-[calc(100%-theme(spacing.4))]").unwrap(),
        style_tree! { "width" => "calc(100% - 1rem)" }
    );
    assert_eq!(
        ctx.css("bg-[theme(colors.red.500/50)]").unwrap(),
        style_tree! { "backgroundColor" => "rgb(239 68 68 / 0.5)" }
    );
}

#[test]
fn theme_function_after_an_operator() {
    let ctx = create_context(&resolve_config(&Config::new())).unwrap();
    assert_eq!(
        ctx.css("mt-[calc(theme(spacing.4)-theme(spacing.2))]").unwrap(),
        style_tree! { "marginTop" => "calc(1rem - 0.5rem)" }
    );
    assert_eq!(
        ctx.css("w-[calc(theme(spacing.4)+theme(spacing.2))]").unwrap(),
        style_tree! { "width" => "calc(1rem + 0.5rem)" }
    );
    assert_eq!(
        ctx.render_theme_func("calc(100%-theme(spacing.4))"),
        "calc(100%-1rem)"
    );
}

#[test]
fn base_styles_render_theme_calls() {
    let ctx = create_context(&resolve_config(&Config::new())).unwrap();
    let global = ctx.global_styles();
    let html = global.get("html").and_then(|v| v.as_tree()).unwrap();
    assert_eq!(
        html.get("font-family").and_then(|v| v.as_scalar()),
        Some("ui-sans-serif, system-ui, sans-serif")
    );
    let backdrop = global.get("::backdrop").and_then(|v| v.as_tree()).unwrap();
    assert_eq!(backdrop.get("--tw-rotate").and_then(|v| v.as_scalar()), Some("0"));
}

// ============================================================================
// Strict mode
// ============================================================================

#[test]
fn strict_mode_rejects_duplicate_registrations() {
    let config = Config::new()
        .core_plugins(CorePlugins::All(false))
        .plugin(Plugin::new("one", |api| {
            api.add_utilities(style_tree! { ".btn" => style_tree! { "display" => "block" } });
        }))
        .plugin(Plugin::new("two", |api| {
            api.add_utilities(style_tree! { ".btn" => style_tree! { "color" => "red" } });
        }));

    let err = strict(config.clone()).unwrap_err();
    assert!(matches!(
        err,
        TwError::DuplicateRegistration { table: "utility", ref key } if key == "btn"
    ));

    // Lenient contexts keep both registrations.
    let ctx = create_context(&resolve_config(&config)).unwrap();
    assert_eq!(
        ctx.css("btn").unwrap(),
        style_tree! { "display" => "block", "color" => "red" }
    );
}

#[test]
fn core_plugins_register_without_duplicates() {
    assert!(strict(Config::new()).is_ok());
}

#[test]
fn strict_mode_reports_every_failing_node() {
    let ctx = strict(Config::new()).unwrap();
    let Err(TwError::Compile { input, diagnostics }) = ctx.css("flex nope nah:flex") else {
        panic!("expected a compile error");
    };
    assert_eq!(input, "flex nope nah:flex");
    let kinds: Vec<_> = diagnostics.iter().map(|d| d.kind).collect();
    assert_eq!(
        kinds,
        [DiagnosticKind::UtilityNotFound, DiagnosticKind::VariantNotFound]
    );
    assert_eq!(diagnostics[0].text, "nope");
}

#[test]
fn strict_mode_reports_unclosed_input() {
    let ctx = strict(Config::new()).unwrap();
    let Err(TwError::Compile { diagnostics, .. }) = ctx.css("w-[10px") else {
        panic!("expected a compile error");
    };
    assert_eq!(diagnostics[0].kind, DiagnosticKind::ParseIncomplete);
}

#[test]
fn strict_mode_reports_ambiguity() {
    let ctx = strict(Config::new()).unwrap();
    let Err(TwError::Compile { diagnostics, .. }) = ctx.css("bg-[10px]") else {
        panic!("expected a compile error");
    };
    assert_eq!(diagnostics[0].kind, DiagnosticKind::AmbiguousMatch);
}
