use std::cell::Cell;
use std::rc::Rc;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};

use cuesheet_core::{Config, Scheduler, TweenOptions};

fn scheduler_with_tweens(count: usize, duration: f32) -> Scheduler {
    let mut s = Scheduler::new(Config::default());
    for i in 0..count {
        let value = Rc::new(Cell::new(i as f32));
        let reader = Rc::clone(&value);
        let writer = Rc::clone(&value);
        s.interpolate(
            move || reader.get(),
            move |v| writer.set(v),
            1000.0,
            TweenOptions {
                duration: Some(duration),
                ..TweenOptions::default()
            },
        );
    }
    s
}

fn bench_tick(c: &mut Criterion) {
    c.bench_function("tick_1000_tweens_mid_flight", |b| {
        b.iter_batched(
            || {
                let mut s = scheduler_with_tweens(1000, 10.0);
                s.tick(0.0).unwrap();
                s
            },
            |mut s| {
                s.tick(5.0).unwrap();
                s
            },
            BatchSize::SmallInput,
        )
    });

    c.bench_function("schedule_and_drain_100_timers", |b| {
        b.iter_batched(
            || {
                let mut s = Scheduler::new(Config::default());
                for _ in 0..100 {
                    s.timer(0.5);
                }
                s
            },
            |mut s| {
                let mut t = 0.0;
                while !s.tick(t).unwrap().idle {
                    t += 0.1;
                }
                s
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_tick);
criterion_main!(benches);
