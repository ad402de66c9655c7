use criterion::{black_box, criterion_group, criterion_main, Criterion};

use drillbook_core::classify::Classifier;
use drillbook_core::normalize::normalize;
use drillbook_core::options::parse_options;

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");

    group.bench_function("boolean_synonym", |b| {
        b.iter(|| normalize(black_box("  正确 ")))
    });

    group.bench_function("choice_label", |b| {
        b.iter(|| normalize(black_box("(B) London")))
    });

    group.bench_function("free_text", |b| {
        b.iter(|| normalize(black_box("光合作用是植物利用光能合成有机物的过程")))
    });

    group.finish();
}

fn bench_parse_options(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_options");

    let lines = "A. Paris\nB. London\nC. Rome\nD. Berlin";
    let semicolons = "选项A：北京；选项B：上海；选项C：广州；选项D：深圳";
    let circled = "①红色\n②绿色\n③蓝色";
    let unlabeled = "Atlantic, Pacific, Indian, Arctic, Southern";

    group.bench_function("letter_lines", |b| {
        b.iter(|| parse_options(black_box(lines)))
    });

    group.bench_function("word_labels", |b| {
        b.iter(|| parse_options(black_box(semicolons)))
    });

    group.bench_function("circled", |b| {
        b.iter(|| parse_options(black_box(circled)))
    });

    group.bench_function("unlabeled", |b| {
        b.iter(|| parse_options(black_box(unlabeled)))
    });

    group.finish();
}

fn bench_toml_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("toml_parsing");
    let classifier = Classifier::default();

    // Generate bank TOML strings of various sizes
    let small_toml = generate_bank_toml(5);
    let medium_toml = generate_bank_toml(50);
    let large_toml = generate_bank_toml(200);

    group.bench_function("5_questions", |b| {
        b.iter(|| {
            drillbook_core::parser::parse_bank_str(
                black_box(&small_toml),
                black_box("bench.toml".as_ref()),
                &classifier,
            )
        })
    });

    group.bench_function("50_questions", |b| {
        b.iter(|| {
            drillbook_core::parser::parse_bank_str(
                black_box(&medium_toml),
                black_box("bench.toml".as_ref()),
                &classifier,
            )
        })
    });

    group.bench_function("200_questions", |b| {
        b.iter(|| {
            drillbook_core::parser::parse_bank_str(
                black_box(&large_toml),
                black_box("bench.toml".as_ref()),
                &classifier,
            )
        })
    });

    group.finish();
}

fn generate_bank_toml(n: usize) -> String {
    let mut s = String::new();
    s.push_str(
        r#"[bank]
id = "bench"
section = "Bench"
"#,
    );
    for i in 0..n {
        let entry = match i % 4 {
            0 => format!(
                r#"
[[questions]]
question = "Statement {i} is correct"
answer = "对"
"#
            ),
            1 => format!(
                r#"
[[questions]]
question = "Pick option {i}"
answer = "B"
options = "A. one\nB. two\nC. three\nD. four"
"#
            ),
            2 => format!(
                r#"
[[questions]]
question = "Value {i} is ____"
answer = "{i}"
"#
            ),
            _ => format!(
                r#"
[[questions]]
question = "Explain concept {i}"
answer = "A long explanation of concept number {i} that keeps going past the fill limit"
"#
            ),
        };
        s.push_str(&entry);
    }
    s
}

criterion_group!(benches, bench_normalize, bench_parse_options, bench_toml_parsing);
criterion_main!(benches);
