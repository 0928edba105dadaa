use std::hint::black_box;
use std::io::Write;

use artifact_extractor::output::{OutputFormat, render_session_log};
use artifact_extractor::parse_session_file;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use tempfile::NamedTempFile;

/// Generate a synthetic session log with N entries mixing turns and auxiliary lines
fn generate_session_file(num_entries: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();

    for i in 0..num_entries {
        let entry = match i % 4 {
            0 => format!(
                r#"{{"type":"user","message":{{"role":"user","content":"Test prompt {}"}},"timestamp":"2024-01-{:02}T12:00:00Z","sessionId":"550e8400-e29b-41d4-a716-446655440000","cwd":"/Users/test/project"}}"#,
                i,
                (i % 28) + 1
            ),
            1 => format!(
                r#"{{"type":"assistant","message":{{"role":"assistant","model":"claude-sonnet-4-5","content":[{{"type":"thinking","thinking":"Step {}"}},{{"type":"text","text":"Answer {}"}},{{"type":"tool_use","id":"t{}","name":"Read","input":{{"file_path":"/src/lib.rs"}}}}]}},"timestamp":"2024-01-01T12:00:01Z"}}"#,
                i, i, i
            ),
            2 => format!(
                r#"{{"type":"user","message":{{"role":"user","content":[{{"type":"tool_result","tool_use_id":"t{}","content":"fn main() {{}}"}}]}},"timestamp":"2024-01-01T12:00:02Z"}}"#,
                i - 1
            ),
            _ => r#"{"type":"file-history-snapshot","messageId":"m","snapshot":{"trackedFileBackups":{}}}"#
                .to_string(),
        };
        writeln!(file, "{}", entry).unwrap();
    }

    file.flush().unwrap();
    file
}

fn bench_parse_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_session_file");

    for size in [100, 1_000, 10_000].iter() {
        let file = generate_session_file(*size);

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| parse_session_file(black_box(file.path())).unwrap());
        });
    }

    group.finish();
}

fn bench_render_text(c: &mut Criterion) {
    let file = generate_session_file(1_000);
    let log = parse_session_file(file.path()).unwrap();

    c.bench_function("render_session_text_1000", |b| {
        b.iter(|| render_session_log(black_box(&log), OutputFormat::Text).unwrap());
    });
}

criterion_group!(benches, bench_parse_session, bench_render_text);
criterion_main!(benches);
