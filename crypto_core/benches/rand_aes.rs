use criterion::{criterion_group, criterion_main, Criterion};
use rand::{Rng, RngCore};
use std::time::Duration;

use crypto_core::{AesRng, Block};

fn bench_rand_block(c: &mut Criterion) {
    c.bench_function("aes rng block", |b| {
        let mut rng = AesRng::new();
        b.iter(|| criterion::black_box(rng.gen::<Block>()));
    });
}

fn bench_rand_1kib(c: &mut Criterion) {
    c.bench_function("aes rng 1KiB", |b| {
        let mut rng = AesRng::new();
        let mut buf = [0u8; 1024];
        b.iter(|| {
            rng.fill_bytes(&mut buf);
            criterion::black_box(buf);
        });
    });
}

criterion_group! {
    name = rand_aes;
    config = Criterion::default().warm_up_time(Duration::from_millis(100));
    targets = bench_rand_block, bench_rand_1kib
}
criterion_main!(rand_aes);
