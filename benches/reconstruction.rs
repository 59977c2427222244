//! Benchmarks for MBP reconstruction performance.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use mbp_reconstructor::{
    reconstruct, MboEvent, MboRecord, MbpSnapshot, MbpWriter, OrderBook, Side, PRICE_SCALE,
};

const BASE_PRICE: i64 = 100 * PRICE_SCALE; // $100.00
const TICK: i64 = PRICE_SCALE / 100; // $0.01

/// Adds spread over 100 bid prices, as a worst case for a single ladder.
fn create_bid_adds(count: usize) -> Vec<MboEvent> {
    (0..count)
        .map(|i| {
            let price = BASE_PRICE + ((i % 100) as i64) * TICK;
            MboEvent::add(i as u64 + 1, Side::Bid, price, 100)
        })
        .collect()
}

/// Alternating bid/ask adds with every third order cancelled again.
fn create_mixed_events(count: usize) -> Vec<MboEvent> {
    let mut events = Vec::with_capacity(count + count / 3);

    for i in 0..count {
        let order_id = i as u64 + 1;
        let is_bid = i % 2 == 0;
        let offset = ((i % 10) as i64) * TICK;

        let (side, price) = if is_bid {
            (Side::Bid, BASE_PRICE - offset)
        } else {
            (Side::Ask, BASE_PRICE + TICK + offset)
        };
        let size = (i % 100) as u64 + 1;

        events.push(MboEvent::add(order_id, side, price, size));
        if i % 3 == 2 {
            events.push(MboEvent::cancel(order_id, side, price, size));
        }
    }

    events
}

fn bench_process(c: &mut Criterion) {
    let adds = create_bid_adds(1_000_000);
    let mixed = create_mixed_events(10_000);

    let mut group = c.benchmark_group("process");

    group.throughput(Throughput::Elements(adds.len() as u64));
    group.sample_size(10);
    group.bench_function("bid_adds_100_prices", |b| {
        b.iter(|| {
            let mut book = OrderBook::new();
            for event in &adds {
                let _ = black_box(book.process(event));
            }
            book
        })
    });

    group.throughput(Throughput::Elements(mixed.len() as u64));
    group.bench_function("mixed_add_cancel", |b| {
        b.iter(|| {
            let mut book = OrderBook::new();
            for event in &mixed {
                let _ = black_box(book.process(event));
            }
            book
        })
    });

    group.finish();
}

fn bench_snapshot(c: &mut Criterion) {
    let mut book = OrderBook::new();
    for event in create_mixed_events(1_000) {
        let _ = book.process(&event);
    }

    let mut group = c.benchmark_group("snapshot");

    group.bench_function("top_levels", |b| b.iter(|| black_box(book.top_levels(10))));

    let mut snapshot = MbpSnapshot::new(10);
    group.bench_function("snapshot_into", |b| {
        b.iter(|| {
            book.snapshot_into(&mut snapshot);
            black_box(snapshot.best_bid())
        })
    });

    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let records: Vec<MboRecord> = create_mixed_events(10_000)
        .into_iter()
        .map(|event| MboRecord::from_event(event).with_symbol("ARL"))
        .collect();

    let mut group = c.benchmark_group("pipeline");
    group.throughput(Throughput::Elements(records.len() as u64));

    group.bench_function("reconstruct_to_memory", |b| {
        b.iter_batched(
            || records.clone(),
            |records| {
                let mut book = OrderBook::new();
                let mut writer = MbpWriter::new(Vec::with_capacity(8 << 20), 10);
                black_box(reconstruct(records, &mut book, &mut writer))
            },
            BatchSize::LargeInput,
        )
    });

    group.finish();
}

criterion_group!(benches, bench_process, bench_snapshot, bench_pipeline);
criterion_main!(benches);
