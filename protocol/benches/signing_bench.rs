// Signing & verification benchmarks for ripple-sign.
//
// Covers key derivation, canonical encoding, single-signer signing and
// verification on both curves, and multi-signer merges at various sizes.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use ripple_sign::crypto::keys::{KeyType, MasterKey};
use ripple_sign::identity::AccountId;
use ripple_sign::transaction::builder::payment;
use ripple_sign::transaction::{
    merge_signatures, multi_sign, sign_transaction, verify_transaction, SignableTransaction,
    TransactionBuilder,
};

fn key(key_type: KeyType) -> MasterKey {
    MasterKey::from_passphrase("bench", key_type).unwrap()
}

fn sequence(key_type: KeyType) -> Option<u32> {
    match key_type {
        KeyType::Secp256k1 => Some(0),
        KeyType::Ed25519 => None,
    }
}

fn bench_key_derivation(c: &mut Criterion) {
    let master = key(KeyType::Secp256k1);
    c.bench_function("secp256k1/derive_account_key", |b| {
        b.iter(|| master.derive(Some(0)).unwrap());
    });
}

fn bench_encode(c: &mut Criterion) {
    let tx = TransactionBuilder::new(AccountId::from_bytes([1; 20]), 1, 12)
        .payment(AccountId::from_bytes([2; 20]), 1_000_000)
        .unwrap();
    c.bench_function("codec/encode_payment", |b| {
        b.iter(|| tx.encode().unwrap());
    });
}

fn bench_sign_and_verify(c: &mut Criterion) {
    for key_type in [KeyType::Secp256k1, KeyType::Ed25519] {
        let master = key(key_type);
        let seq = sequence(key_type);
        let account = master.account_id(seq).unwrap();
        let unsigned = TransactionBuilder::new(account, 1, 12)
            .payment(AccountId::from_bytes([2; 20]), 1_000_000)
            .unwrap();

        c.bench_function(&format!("{:?}/sign_transaction", key_type), |b| {
            b.iter(|| {
                let mut tx = unsigned.clone();
                sign_transaction(&mut tx, &master, seq).unwrap();
                tx
            });
        });

        let mut signed = unsigned.clone();
        sign_transaction(&mut signed, &master, seq).unwrap();
        c.bench_function(&format!("{:?}/verify_transaction", key_type), |b| {
            b.iter(|| verify_transaction(&signed).unwrap());
        });
    }
}

fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("multisign/merge");

    for size in [2usize, 4, 8] {
        let base = TransactionBuilder::new(AccountId::from_bytes([1; 20]), 1, 100)
            .build_multi_signed(payment(AccountId::from_bytes([2; 20]), 10).unwrap())
            .unwrap();
        let entries: Vec<_> = (0..size)
            .map(|i| {
                let master = MasterKey::from_passphrase(&format!("signer-{}", i), KeyType::Ed25519)
                    .unwrap();
                multi_sign(&base, &master, None).unwrap()
            })
            .collect();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &entries, |b, entries| {
            b.iter(|| {
                let mut tx = base.clone();
                merge_signatures(&mut tx, entries.clone()).unwrap();
                tx
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_key_derivation,
    bench_encode,
    bench_sign_and_verify,
    bench_merge,
);
criterion_main!(benches);
