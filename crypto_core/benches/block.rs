use criterion::{criterion_group, criterion_main, Criterion};
use std::time::Duration;

use crypto_core::{Block, Label, LabelCipher};

fn bench_block_xor(c: &mut Criterion) {
    c.bench_function("block xor", |b| {
        let x = rand::random::<Block>();
        let y = rand::random::<Block>();
        b.iter(|| criterion::black_box(x ^ y));
    });
}

fn bench_label_cipher(c: &mut Criterion) {
    c.bench_function("label cipher encrypt", |b| {
        let key = rand::random::<Label>();
        let cipher = LabelCipher::new(&key);
        let blk = rand::random::<Block>();
        b.iter(|| criterion::black_box(cipher.encrypt_block(blk)));
    });
}

fn bench_label_cipher_keyed(c: &mut Criterion) {
    c.bench_function("label cipher schedule + encrypt", |b| {
        let key = rand::random::<Label>();
        let blk = rand::random::<Block>();
        b.iter(|| {
            let cipher = LabelCipher::new(&key);
            criterion::black_box(cipher.encrypt_block(blk))
        });
    });
}

criterion_group! {
    name = block;
    config = Criterion::default().warm_up_time(Duration::from_millis(100));
    targets = bench_block_xor, bench_label_cipher, bench_label_cipher_keyed
}
criterion_main!(block);
