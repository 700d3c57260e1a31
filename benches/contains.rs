use criterion::{black_box, criterion_group, criterion_main, Criterion};

use helpers::documents::{TestCorpus, ID_FIELD};
use rand::{rngs::StdRng, Rng, SeedableRng};
use roaring_skiplist::{script::SkipListEngine, RoaringBitmap};
use serde_json::json;

fn criterion_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(1);

    const NUM_DOCS: usize = 100_000;
    let corpus = TestCorpus::new(NUM_DOCS, NUM_DOCS / 4, 1 << 24, &mut rng);
    let payload = corpus.bitmap.serialize();

    c.bench_function("deserialize", |b| {
        b.iter(|| RoaringBitmap::deserialize(black_box(&payload)))
    });

    let bitmap = RoaringBitmap::deserialize(&payload).expect("Error while decoding the bitmap");
    let queries: Vec<u32> = (0..1024).map(|_| rng.gen_range(0..1 << 24)).collect();
    c.bench_function("contains", |b| {
        b.iter(|| queries.iter().filter(|&&id| bitmap.contains(id)).count())
    });

    let factory = SkipListEngine::new()
        .compile_json(
            SkipListEngine::ROARING,
            &json!({
                "field": ID_FIELD,
                "data": corpus.bitmap.to_base64(),
                "score": 0.
            }),
        )
        .expect("Error while compiling the script");
    let scorer = factory.new_leaf();
    c.bench_function("score", |b| {
        b.iter(|| {
            corpus
                .documents
                .iter()
                .take(1024)
                .map(|(_, doc)| scorer.score(doc, 1.))
                .sum::<f64>()
        })
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().significance_level(0.1).sample_size(500);
    targets = criterion_benchmark
}
criterion_main!(benches);
