//! Benchmarks for the event bus hot paths.

use std::any::Any;
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};
use homehub_core::{BusEvent, EventBus, EventBusConfig, EventHandler};

struct Tick;

impl BusEvent for Tick {
    fn name(&self) -> &str {
        "bench.tick"
    }

    fn priority(&self) -> i8 {
        0
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

struct Noop;

impl EventHandler for Noop {
    fn handle(&self, _event: &dyn BusEvent) {}
}

fn bench_publish(c: &mut Criterion) {
    let bus = EventBus::with_config(EventBusConfig {
        capacity: 4096,
        ..EventBusConfig::default()
    });

    // No handlers registered: measures the queue and wake-signal path.
    c.bench_function("publish_no_handlers", |b| {
        b.iter(|| {
            let _ = bus.publish(Box::new(Tick));
        })
    });
}

fn bench_publish_with_handler(c: &mut Criterion) {
    let bus = EventBus::with_config(EventBusConfig {
        capacity: 4096,
        ..EventBusConfig::default()
    });
    bus.subscribe("bench.tick", Arc::new(Noop)).unwrap();

    c.bench_function("publish_one_handler", |b| {
        b.iter(|| {
            let _ = bus.publish(Box::new(Tick));
        })
    });
}

criterion_group!(benches, bench_publish, bench_publish_with_handler);
criterion_main!(benches);
