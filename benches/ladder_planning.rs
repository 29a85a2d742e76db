//! Benchmarks for ladder planning
//!
//! Covers format parsing, probe output parsing, rendition planning and
//! master playlist rendering.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tohls_ladder::{plan_ladder, FormatDescriptor, MasterPlaylist, SourceMetadata, Stream};

/// A typical five-rung ladder
const LADDER: &[&str] = &[
    "240p::0.07",
    "360p::",
    "720p:30:",
    "960x540:60:0.13",
    "1920x1080:30:0.15",
];

const PROBE_OUTPUTS: &[(&str, &str)] = &[
    ("integer", "1920,1080,30/1"),
    ("ntsc", "3840,2160,24000/1001"),
    ("portrait", "1080,1920,60/1"),
];

fn formats() -> Vec<FormatDescriptor> {
    LADDER.iter().filter_map(|s| s.parse().ok()).collect()
}

fn bench_format_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("format_parsing");

    for spec in LADDER {
        group.throughput(Throughput::Bytes(spec.len() as u64));
        group.bench_with_input(BenchmarkId::new("parse", spec), spec, |b, spec| {
            b.iter(|| FormatDescriptor::parse(black_box(spec)));
        });
    }

    group.bench_function("parse/malformed", |b| {
        b.iter(|| FormatDescriptor::parse(black_box("1080p:30")));
    });

    group.finish();
}

fn bench_probe_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("probe_parsing");

    for (name, output) in PROBE_OUTPUTS {
        group.bench_with_input(BenchmarkId::new("csv", name), output, |b, output| {
            b.iter(|| SourceMetadata::parse_probe_output(black_box(output)));
        });
    }

    group.finish();
}

fn bench_plan_ladder(c: &mut Criterion) {
    let mut group = c.benchmark_group("plan_ladder");
    let formats = formats();

    for (name, output) in PROBE_OUTPUTS {
        let source = match SourceMetadata::parse_probe_output(output) {
            Ok(source) => source,
            Err(_) => continue,
        };
        group.throughput(Throughput::Elements(formats.len() as u64));
        group.bench_with_input(BenchmarkId::new("five_rungs", name), &source, |b, source| {
            b.iter(|| plan_ladder(black_box(&formats), black_box(source)));
        });
    }

    group.finish();
}

fn bench_master_playlist(c: &mut Criterion) {
    let mut group = c.benchmark_group("master_playlist");

    let Ok(source) = SourceMetadata::parse_probe_output("3840,2160,30/1") else {
        return;
    };
    let Ok(ladder) = plan_ladder(&formats(), &source) else {
        return;
    };
    let playlist: MasterPlaylist = ladder
        .iter()
        .map(|r| Stream::from_rendition(r, r.playlist_name()))
        .collect();

    group.bench_function("render/five_rungs", |b| {
        b.iter(|| black_box(&playlist).render());
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_format_parsing,
    bench_probe_parsing,
    bench_plan_ladder,
    bench_master_playlist
);
criterion_main!(benches);
