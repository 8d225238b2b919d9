use criterion::{black_box, criterion_group, criterion_main, Criterion};
use shirushi_core::{TextPreprocessor, TokenizerConfig};

fn bench_encode(c: &mut Criterion) {
    let preprocessor = TextPreprocessor::new().unwrap();

    let inputs = vec![
        "EU rejects German call to boycott British lamb.",
        "Peter Blackburn's report, isn't it?",
        "BRUSSELS 1996-08-22 (Reuters) - The European Commission said on Thursday.",
        "Germany's representative to the EU veterinary committee Werner Zwingmann said.",
        "Only France and Britain backed Fischler's proposal.",
    ];

    c.bench_function("preprocess_single", |b| {
        b.iter(|| preprocessor.apply(black_box(inputs[0])));
    });

    let processed = preprocessor.apply_batch(&inputs);
    let tokenizer = TokenizerConfig::new().fit(&processed, 32, 16);

    c.bench_function("transform_batch_5", |b| {
        b.iter(|| tokenizer.transform(black_box(&processed)));
    });

    c.bench_function("transform_word_and_char_single", |b| {
        b.iter(|| tokenizer.transform_text(black_box(&processed[0])));
    });
}

criterion_group!(benches, bench_encode);
criterion_main!(benches);
