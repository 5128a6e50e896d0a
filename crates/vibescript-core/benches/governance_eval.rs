use std::path::Path;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use vibescript_core::{classify, guard, parse_directives, MemoryFs};
use vibescript_policies::parse_ownership_config;

const OWNERSHIP: &str = r#"{
    "ai_owned_globs": ["src/**/*.vibe.ts", "src/**"],
    "human_owned_globs": ["**/*.human.ts"],
    "contract_owned_globs": ["**/*.lock.ts"],
    "blocked_globs": ["dist/**", "node_modules/**"],
    "require_manifest_for_globs": ["src/api/**"],
    "guard_exempt_globs": ["*.md"]
}"#;

const TASK_FILE: &str = "// @vibe:goal add pagination\n// @vibe:touch src/api/**/*.ts, tests/**\n// @vibe:inputs request params\n// @vibe:outputs paged list\n// @vibe:risk medium\n// @vibe:allowHumanEdits false\nexport const page = 1;\n";

fn bench_classify(c: &mut Criterion) {
    let config = parse_ownership_config(OWNERSHIP).expect("config");
    let files: Vec<String> = (0..64)
        .map(|i| match i % 4 {
            0 => format!("src/mod{i}/file.ts"),
            1 => format!("dist/chunk{i}.js"),
            2 => format!("lib/contract{i}.lock.ts"),
            _ => format!("docs/page{i}.md"),
        })
        .collect();

    c.bench_function("classify_64_files", |b| {
        b.iter(|| {
            for file in &files {
                black_box(classify(black_box(file), &config));
            }
        })
    });

    let fs = MemoryFs::new();
    c.bench_function("guard_64_files", |b| {
        b.iter(|| guard(&fs, Path::new("."), black_box(&files), &config))
    });
}

fn bench_parse_directives(c: &mut Criterion) {
    c.bench_function("parse_task_file_directives", |b| {
        b.iter(|| parse_directives(black_box(TASK_FILE), Some("src/api/page.vibe.ts")))
    });
}

criterion_group!(benches, bench_classify, bench_parse_directives);
criterion_main!(benches);
