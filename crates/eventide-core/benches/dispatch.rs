//! Dispatch throughput benchmarks: FIFO drain, priority enqueue sorting,
//! and lineage-resolved (ancestor key) delivery.

use std::any::{Any, TypeId};
use std::hint::black_box;
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};
use eventide_core::{CountingListener, Event, EventBroker, ListenerRegistry};

enum Family {}

#[derive(Debug)]
struct Tick {
    priority: i32,
}

impl Event for Tick {
    fn source(&self) -> &(dyn Any + Send + Sync) {
        &self.priority
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn lineage(&self) -> Vec<TypeId> {
        vec![TypeId::of::<Family>()]
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

fn batch(count: usize) -> Vec<Arc<dyn Event>> {
    (0..count)
        .map(|i| Arc::new(Tick { priority: (i % 7) as i32 }) as Arc<dyn Event>)
        .collect()
}

fn bench_fifo_drain(c: &mut Criterion) {
    let registry = Arc::new(ListenerRegistry::new());
    registry.register::<Tick>(Arc::new(CountingListener::new()));

    let broker = EventBroker::fifo();
    broker.set_locator(registry);

    c.bench_function("fifo_drain_1000", |b| {
        b.iter(|| {
            broker
                .dispatch_all(black_box(batch(1000)))
                .expect("dispatch_all")
        });
    });
}

fn bench_priority_enqueue(c: &mut Criterion) {
    let registry = Arc::new(ListenerRegistry::new());
    registry.register::<Tick>(Arc::new(CountingListener::new()));

    let broker = EventBroker::prioritized();
    broker.set_locator(registry);

    c.bench_function("priority_drain_1000", |b| {
        b.iter(|| {
            broker
                .dispatch_all(black_box(batch(1000)))
                .expect("dispatch_all")
        });
    });
}

fn bench_lineage_broadcast(c: &mut Criterion) {
    let registry = Arc::new(ListenerRegistry::new());
    registry.register::<Tick>(Arc::new(CountingListener::new()));
    registry.register::<Family>(Arc::new(CountingListener::new()));

    let broker = EventBroker::fifo();
    broker.set_locator(registry);

    c.bench_function("lineage_drain_1000", |b| {
        b.iter(|| {
            broker
                .dispatch_all(black_box(batch(1000)))
                .expect("dispatch_all")
        });
    });
}

criterion_group!(
    benches,
    bench_fifo_drain,
    bench_priority_enqueue,
    bench_lineage_broadcast
);
criterion_main!(benches);
