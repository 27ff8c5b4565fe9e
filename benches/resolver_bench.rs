//! Verifier Benchmarks - Block Search and Address Encoding
//!
//! Measures the CPU side of the hot paths against an in-memory chain,
//! so the numbers exclude network latency.
//!
//! Run with: cargo bench --bench resolver_bench

use std::sync::Arc;

use alloy::primitives::{address, Address, Bytes, B256};
use async_trait::async_trait;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tokio::runtime::Runtime;

use deposit_verifier::adapters::chain::BlockTimestampResolver;
use deposit_verifier::adapters::retry::RetryPolicy;
use deposit_verifier::domain::address::{checksum, TronAddress};
use deposit_verifier::domain::error::ChainError;
use deposit_verifier::ports::{EvmRpc, ReceiptLog};

const GENESIS: u64 = 1_600_000_000;

/// `blocks` blocks mined every 2 seconds.
struct SteadyChain {
    blocks: u64,
}

#[async_trait]
impl EvmRpc for SteadyChain {
    async fn block_number(&self) -> Result<u64, ChainError> {
        Ok(self.blocks - 1)
    }

    async fn block_timestamp(&self, number: u64) -> Result<u64, ChainError> {
        Ok(GENESIS + 2 * number)
    }

    async fn call(&self, _to: Address, _input: Bytes) -> Result<Bytes, ChainError> {
        Err(ChainError::Rpc("not a contract chain".into()))
    }

    async fn receipt_logs(&self, _tx: B256) -> Result<Option<Vec<ReceiptLog>>, ChainError> {
        Ok(None)
    }
}

/// Binary search cost by chain height.
fn bench_block_search(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("block_at_timestamp");

    for blocks in [1_000u64, 1_000_000, 30_000_000] {
        let resolver =
            BlockTimestampResolver::new(Arc::new(SteadyChain { blocks }), RetryPolicy::default());
        let target = GENESIS + blocks; // middle of the chain

        group.bench_with_input(BenchmarkId::from_parameter(blocks), &target, |b, &target| {
            b.to_async(&rt)
                .iter(|| async { black_box(resolver.block_at_timestamp(black_box(target)).await) });
        });
    }
    group.finish();
}

/// Tron address encode and parse.
fn bench_tron_address(c: &mut Criterion) {
    let body = address!("a614f803B6FD780986A42c78Ec9c7f77e6DeD13C");
    let encoded = TronAddress::from_evm(&body).to_string();

    c.bench_function("tron_address_encode", |b| {
        b.iter(|| TronAddress::from_evm(black_box(&body)));
    });
    c.bench_function("tron_address_parse", |b| {
        b.iter(|| black_box(encoded.as_str()).parse::<TronAddress>());
    });
}

/// EVM address parsing in lower case.
fn bench_checksum(c: &mut Criterion) {
    c.bench_function("evm_checksum", |b| {
        b.iter(|| checksum(black_box("0x55d398326f99059ff775485246999027b3197955")));
    });
}

criterion_group!(benches, bench_block_search, bench_tron_address, bench_checksum);
criterion_main!(benches);
