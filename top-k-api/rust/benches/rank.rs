use std::num::NonZeroUsize;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use top_k_api::top_k::{rank, Value};

const SIZE: usize = 1024 * 64;

fn get_values(distinct: i64) -> Vec<Value> {
    (0..SIZE as i64)
        .map(|i| (i * 7919 + i / 7) % distinct)
        .map(|n| if n % 2 == 0 { Value::Int(n) } else { Value::Str(format!("v{n}")) })
        .collect()
}

fn criterion_benchmark(c: &mut Criterion) {
    for distinct in [16, 1024, 16 * 1024] {
        let values = get_values(distinct);
        for k in [1, 10, 100].into_iter().filter(|&k| k as i64 <= distinct) {
            let k = NonZeroUsize::new(k).unwrap();
            c.bench_function(&format!("rank {} distinct={} k={}", SIZE, distinct, k), |b| {
                b.iter(|| rank(black_box(&values), k))
            });
        }
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
