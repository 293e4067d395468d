//! Formatting benchmarks: native renderer vs the host C library.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use typefmt_core::{ArgValue, Formatter, NativeBackend, args, format_strict_with};
use typefmt_harness::HostBackend;

fn cases() -> Vec<(&'static str, &'static str, Vec<ArgValue<'static>>)> {
    vec![
        ("literal", "no specifiers at all, just text", args![]),
        ("int", "%d", args![123_456_i64]),
        ("int_padded", "[%-8d|%08x]", args![-42, 0xbeef_u32]),
        ("float_fixed", "%.3f", args![3.141_592_653_5_f64]),
        ("float_exp", "%e", args![6.022e23_f64]),
        ("float_general", "%g", args![0.000_123_4_f64]),
        ("string", "%10.4s|", args!["formatting"]),
        (
            "mixed",
            "%s=%d (%.2f%%) at %p",
            args!["ratio", 7, 12.5_f64, ArgValue::Pointer(0x7fff_0000)],
        ),
        ("indexed", "%2$s %1$s %2$s", args!["world", "hello"]),
    ]
}

fn bench_backends(c: &mut Criterion) {
    let mut group = c.benchmark_group("format");

    for (name, fmt, args) in cases() {
        group.bench_with_input(BenchmarkId::new("native", name), &args, |b, args| {
            b.iter(|| black_box(format_strict_with(NativeBackend, black_box(fmt), args)));
        });
        group.bench_with_input(BenchmarkId::new("host", name), &args, |b, args| {
            b.iter(|| black_box(format_strict_with(HostBackend, black_box(fmt), args)));
        });
    }
    group.finish();
}

fn bench_reused_formatter(c: &mut Criterion) {
    let counts: &[usize] = &[1, 8, 64];
    let mut group = c.benchmark_group("formatter_reuse");

    for &count in counts {
        let fmt = "%d,".repeat(count);
        let args: Vec<ArgValue<'static>> = (0..count as i64).map(ArgValue::from).collect();
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("fresh", count), &count, |b, _| {
            b.iter(|| black_box(typefmt_core::format(&fmt, &args)));
        });
        group.bench_with_input(BenchmarkId::new("reused", count), &count, |b, _| {
            let mut formatter = Formatter::new(&fmt);
            b.iter(|| {
                let _ = black_box(formatter.parse(&args));
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_backends, bench_reused_formatter);
criterion_main!(benches);
