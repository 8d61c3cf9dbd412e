// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Append throughput over pooled segments.

use buffer_pool::{BufferPool, PoolConfig};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use response_builder::{FallbackPolicy, ResponseManager};
use std::sync::Arc;

fn bench_append(c: &mut Criterion) {
    let pool = Arc::new(
        BufferPool::new(PoolConfig {
            capacity: 50,
            slot_size: 32 * 1024,
        })
        .unwrap(),
    );
    let manager = ResponseManager::new(pool, FallbackPolicy::Heap);

    let chunk = vec![0x5au8; 1024];
    let response_len: usize = 16 * 1024;

    let mut group = c.benchmark_group("append");
    group.throughput(Throughput::Bytes(response_len as u64));
    group.bench_function("chunked_16k", |b| {
        b.iter(|| {
            let mut builder = manager.create_builder().unwrap();
            for _ in 0..(response_len / chunk.len()) {
                builder.append(black_box(&chunk)).unwrap();
            }
            black_box(builder.finalize().len());
            builder.release();
        })
    });
    group.finish();
}

criterion_group!(benches, bench_append);
criterion_main!(benches);
