use criterion::{black_box, criterion_group, criterion_main, Criterion};

use shadow_crypto::{FieldElement, HashEngine};
use shadow_types::AccountId;

fn poseidon_pair_bench(c: &mut Criterion) {
    let engine = HashEngine::new().unwrap();
    let left = FieldElement::from_u64(1);
    let right = FieldElement::from_u64(2);

    c.bench_function("poseidon_hash_pair", |b| {
        b.iter(|| engine.hash_pair(black_box(&left), black_box(&right)))
    });
}

fn poseidon_leaf_bench(c: &mut Criterion) {
    let engine = HashEngine::new().unwrap();
    let account =
        AccountId::new("aleo1dv6fre2y82gzw58aqga20v8mkjcjm8dj77s8fjfnnflcuhhx6y8qp9ml66").unwrap();
    let salt = FieldElement::from_u64(12345);

    c.bench_function("poseidon_hash_leaf", |b| {
        b.iter(|| engine.hash_leaf(black_box(&account), black_box(100), black_box(&salt)))
    });
}

fn field_decimal_bench(c: &mut Criterion) {
    let s = "7853200120776062878684798364095072458815029376092732009249414926327459813530";

    c.bench_function("field_from_decimal", |b| {
        b.iter(|| FieldElement::from_decimal(black_box(s)))
    });
}

criterion_group!(benches, poseidon_pair_bench, poseidon_leaf_bench, field_decimal_bench);
criterion_main!(benches);
