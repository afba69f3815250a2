//! Benchmarks building a tree and checking every leaf's proof against it, for
//! the one-byte configuration used against the root chain and for full-width
//! digests.

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use ethereum_types::U256;
use plasma_smt::{config::SmtConfig, db::MemoryDb, smt::Smt};

fn leaves(n: u64, stride: u64) -> Vec<(U256, Vec<u8>)> {
    (0..n)
        .map(|i| (U256::from(i * stride), i.to_be_bytes().to_vec()))
        .collect()
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("Sparse Merkle tree");

    for (name, config, leaves) in [
        ("width 1, 256 leaves", SmtConfig::new(1), leaves(256, 1)),
        ("width 32, 256 leaves", SmtConfig::new(32), leaves(256, 1 << 40)),
    ] {
        group.bench_function(format!("build, {name}"), |b| {
            b.iter_batched(
                || leaves.clone(),
                |leaves| Smt::<MemoryDb>::new(config, leaves).unwrap(),
                BatchSize::SmallInput,
            )
        });

        let smt = Smt::<MemoryDb>::new(config, leaves.clone()).unwrap();
        group.bench_function(format!("prove and verify, {name}"), |b| {
            b.iter(|| {
                for (index, leaf) in &leaves {
                    let proof = smt.prove(*index).unwrap();
                    assert!(proof.verify(&config, &smt.root(), leaf));
                }
            })
        });
    }

    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
