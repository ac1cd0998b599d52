use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use twcss::config::{Config, resolve_config};
use twcss::context::create_context;
use twparse::{Separator, parse};

const CASES: &[(&str, &str)] = &[
    ("static", "flex"),
    ("lookup", "p-4"),
    ("opacity", "bg-black/50"),
    ("arbitrary", "text-[22px]"),
    ("variants", "md:hover:focus:bg-red-500/50"),
    ("group", "sm:(flex p-4 -mt-2) lg:(grid gap-x-6)"),
    (
        "mixed",
        "relative flex w-1/2 rounded-lg bg-white p-6 shadow-md group-hover:bg-blue-500 [mask-type:luminance]",
    ),
];

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    let separator = Separator::default();

    for (name, input) in CASES {
        group.bench_with_input(BenchmarkId::new("parse", name), input, |b, input| {
            b.iter(|| parse(black_box(input), &separator))
        });
    }
    group.finish();
}

fn bench_css(c: &mut Criterion) {
    let mut group = c.benchmark_group("css");
    let ctx = create_context(&resolve_config(&Config::new())).expect("default context");

    for (name, input) in CASES {
        group.bench_with_input(BenchmarkId::new("css", name), input, |b, input| {
            b.iter(|| ctx.css(black_box(input)))
        });
    }
    group.finish();
}

fn bench_context(c: &mut Criterion) {
    let config = resolve_config(&Config::new());

    c.bench_function("resolve_config", |b| {
        b.iter(|| resolve_config(black_box(&Config::new())))
    });

    c.bench_function("create_context", |b| {
        b.iter(|| create_context(black_box(&config)))
    });
}

criterion_group!(benches, bench_parse, bench_css, bench_context);
criterion_main!(benches);
